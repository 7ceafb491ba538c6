//! PostScript (CFF) common tables.

use std::fmt;

use crate::ReadError;

pub mod charset;
pub mod charstring;
pub mod dict;
mod fd_select;
mod index;
mod stack;
mod string;

pub use charset::{Charset, CharsetFormat};
pub use fd_select::FdSelect;
pub use index::Index;
pub use stack::{Number, Stack};
pub use string::{Latin1String, StringId, STANDARD_STRINGS};

/// Errors that are specific to PostScript processing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The `off_size` field in an INDEX contained an invalid value.
    InvalidIndexOffsetSize(u8),
    /// An INDEX contained a zero offset.
    ZeroOffsetInIndex,
    InvalidFontFormat,
    StackOverflow,
    StackUnderflow,
    InvalidStackAccess(usize),
    ExpectedI32StackEntry(usize),
    InvalidNumber,
    InvalidDictOperator(u8),
    InvalidCharstringOperator(u8),
    CharstringNestingDepthLimitExceeded,
    MissingSubroutines,
    MissingPrivateDict,
    MissingCharstrings,
    /// Underlying parsing error.
    Read(ReadError),
}

impl From<ReadError> for Error {
    fn from(value: ReadError) -> Self {
        Self::Read(value)
    }
}

// Table decoders report `ReadError`, so PostScript failures are folded
// into it when a CFF table is materialized.
impl From<Error> for ReadError {
    fn from(value: Error) -> Self {
        match value {
            Error::Read(err) => err,
            Error::InvalidIndexOffsetSize(size) => ReadError::InvalidFormat(size as i64),
            Error::ZeroOffsetInIndex => ReadError::MalformedData("zero offset in INDEX"),
            Error::InvalidFontFormat => ReadError::MalformedData("invalid CFF font format"),
            Error::InvalidNumber => ReadError::MalformedData("invalid number in DICT"),
            Error::InvalidDictOperator(_) => ReadError::MalformedData("invalid DICT operator"),
            Error::MissingPrivateDict => ReadError::MalformedData("missing Private DICT"),
            Error::MissingCharstrings => ReadError::MalformedData("missing CharStrings INDEX"),
            _ => ReadError::MalformedData("invalid CFF data"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIndexOffsetSize(size) => {
                write!(f, "invalid offset size of {size} for INDEX (expected 1-4)")
            }
            Self::ZeroOffsetInIndex => {
                write!(f, "invalid offset of 0 in INDEX (must be >= 1)")
            }
            Self::InvalidFontFormat => write!(f, "invalid font format"),
            Self::StackOverflow => write!(f, "stack overflow"),
            Self::StackUnderflow => write!(f, "stack underflow"),
            Self::InvalidStackAccess(index) => write!(f, "invalid stack access for index {index}"),
            Self::ExpectedI32StackEntry(index) => {
                write!(f, "attempted to read an integer at stack index {index}, but found a fixed point value")
            }
            Self::InvalidNumber => write!(f, "number is in an invalid format"),
            Self::InvalidDictOperator(operator) => {
                write!(f, "dictionary operator {operator} is invalid")
            }
            Self::InvalidCharstringOperator(operator) => {
                write!(f, "charstring operator {operator} is invalid")
            }
            Self::CharstringNestingDepthLimitExceeded => {
                write!(f, "exceeded subroutine nesting depth limit")
            }
            Self::MissingSubroutines => {
                write!(f, "encountered a callsubr operator but no subroutine index was provided")
            }
            Self::MissingPrivateDict => write!(f, "CFF table does not contain a private dictionary"),
            Self::MissingCharstrings => write!(f, "CFF table does not contain a charstrings index"),
            Self::Read(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            _ => None,
        }
    }
}
