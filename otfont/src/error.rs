//! Errors raised by the font container.

use thiserror::Error;

use crate::{raw::tables::postscript::Error as CffError, FontFlavor, GlyphId, Tag};
use crate::raw::{ReadError, TableError};

/// Errors that may occur when accessing a font.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// A flavor restricted accessor was used on a font of the other flavor.
    #[error("the '{tag}' table requires a {required} font, but this font is {actual}")]
    UnsupportedFlavor {
        tag: Tag,
        required: FontFlavor,
        actual: FontFlavor,
    },
    /// A flavor restricted accessor was used before the version was set.
    #[error("the font flavor has not been set")]
    FlavorNotSet,
    /// The stored flavor disagrees with the tables present in the font.
    #[error("font flavor is {flavor}, but CFF table present is {has_cff}")]
    FlavorMismatch { flavor: FontFlavor, has_cff: bool },
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("PostScript error: {0}")]
    PostScript(#[from] CffError),
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error("glyph {0} was not found in the font")]
    GlyphNotFound(GlyphId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
