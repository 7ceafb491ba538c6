//! A container for a single OpenType font of either outline flavor.
//!
//! An OpenType font stores its glyph outlines either as TrueType quadratic
//! contours in the `glyf` table or as PostScript charstrings in the `CFF `
//! table. [`OpenTypeFont`] decides once, from the sfnt version, which of
//! the two the font uses and refuses access to the other, while parsing
//! each table lazily on first use through a shared
//! [`TableRegistry`](raw::TableRegistry).
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use otfont::OpenTypeFont;
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! let font = OpenTypeFont::load(&font_bytes).unwrap();
//! if font.is_postscript() {
//!     let outline = font.outline_path("A").unwrap();
//! }
//! ```

#![forbid(unsafe_code)]

/// Expose our "raw" underlying parser crate.
pub extern crate otfont_read as raw;

mod error;
mod font;
mod glyph_name;
mod outline;

pub use error::{Error, Result};
pub use font::{FontFlavor, OpenTypeFont, LAYOUT_TABLE_TAGS};
pub use glyph_name::{GlyphNameSource, GlyphNames};
pub use outline::{BezPathPen, CffOutlines, Outline};

/// Type for a glyph identifier.
pub type GlyphId = raw::types::GlyphId;

/// Type for a 4-byte tag used to identify font tables and other resources.
pub type Tag = raw::types::Tag;
