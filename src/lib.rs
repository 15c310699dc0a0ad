//! Parses TrueType/sfnt font files and rasterizes text into an RGB pixel
//! buffer: table directory and metrics, a Unicode (format-12) character
//! map, simple and composite glyph outlines, and a scan-line filler driving
//! either fill rule.

pub mod error;
pub mod layout;
pub mod numerics;
pub mod raster;
pub mod reader;
pub mod truetype;

pub use error::{Error, Result};
pub use truetype::font::Font;
