//! Pixel canvas and scan-line fill (spec components F-G).

pub mod canvas;
pub mod fill;
