use std::fmt;

/// Crate-wide error taxonomy (spec section 7), plus `UnsupportedComposite`
/// for the point-match composite-placement open question (spec section 9).
#[derive(Debug)]
pub enum Error {
    IoOpen(std::io::Error),
    IoRead(std::io::Error),
    TruncatedInput,
    MissingTable(&'static str),
    UnsupportedCmapFormat(u16),
    UnsupportedIndexToLocFormat(i16),
    InvalidFlagRun,
    UnknownGlyph(u32),
    GlyphNotFound(char),
    UnsupportedComposite,
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IoOpen(e) => write!(f, "failed to open font file: {e}"),
            Error::IoRead(e) => write!(f, "failed to read font data: {e}"),
            Error::TruncatedInput => write!(f, "unexpected end of input while decoding a value"),
            Error::MissingTable(tag) => write!(f, "required table '{tag}' is missing"),
            Error::UnsupportedCmapFormat(fmt_id) => {
                write!(f, "no format-12 Unicode cmap subtable found (saw format {fmt_id})")
            }
            Error::UnsupportedIndexToLocFormat(v) => {
                write!(f, "head.indexToLocFormat {v} is neither 0 nor 1")
            }
            Error::InvalidFlagRun => write!(f, "simple glyph flag repeat overruns vertex count"),
            Error::UnknownGlyph(ix) => write!(f, "no glyph data for glyph index {ix}"),
            Error::GlyphNotFound(cp) => write!(f, "no glyph mapped for code point U+{:04X}", *cp as u32),
            Error::UnsupportedComposite => {
                write!(f, "composite glyph uses point-match placement (ARGS_ARE_XY_VALUES unset), unsupported")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoOpen(e) | Error::IoRead(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::TruncatedInput
        } else {
            Error::IoRead(e)
        }
    }
}
