//! Traits for decoding tables, and the error they report.

use types::Tag;

use crate::font_data::FontData;

/// A table (or subtable) that can be decoded from its bytes alone.
///
/// Implementations check everything they will later index into, so that
/// accessors on the decoded value only fail for data reached through
/// offsets.
pub trait FontRead<'a>: Sized {
    /// Decode and validate `data`.
    fn read(data: FontData<'a>) -> Result<Self, ReadError>;
}

/// Declares the extra input a table needs to be decoded.
pub trait ReadArgs {
    type Args: Copy;
}

/// A table whose layout depends on a value stored elsewhere in the font,
/// such as `loca`, which takes its offset size from `head`.
pub trait FontReadWithArgs<'a>: Sized + ReadArgs {
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError>;
}

/// An error encountered while decoding font data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// A read or an offset ran past the end of the data.
    OutOfBounds,
    /// A version or format field held an unsupported value.
    InvalidFormat(i64),
    /// The file does not start with a known sfnt version.
    InvalidSfnt(u32),
    /// A byte range did not divide evenly into array elements.
    InvalidArrayLen,
    /// A decoded value did not have the expected type or invariant.
    ValidationError,
    /// A required offset was zero.
    NullOffset,
    /// A required table is not in the font.
    TableIsMissing(Tag),
    MalformedData(&'static str),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::OutOfBounds => f.write_str("read past the end of the data"),
            ReadError::InvalidFormat(x) => write!(f, "unsupported format or version {x}"),
            ReadError::InvalidSfnt(ver) => write!(f, "unknown sfnt version 0x{ver:08X}"),
            ReadError::InvalidArrayLen => {
                f.write_str("array length is not a multiple of the element size")
            }
            ReadError::ValidationError => f.write_str("data failed validation"),
            ReadError::NullOffset => f.write_str("unexpected null offset"),
            ReadError::TableIsMissing(tag) => write!(f, "the '{tag}' table is missing"),
            ReadError::MalformedData(msg) => write!(f, "malformed data: {msg}"),
        }
    }
}

impl std::error::Error for ReadError {}
