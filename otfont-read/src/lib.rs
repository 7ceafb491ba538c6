//! Reading OpenType tables
//!
//! This crate provides memory safe zero-allocation parsing of the font tables
//! needed to identify and outline glyphs, along with a [`TableRegistry`] that
//! parses each table lazily on first use and caches the result.
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use otfont_read::{tables::maxp::Maxp, TableRegistry};
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! let registry = TableRegistry::new(&font_bytes).expect("failed to read font data");
//! let maxp = registry.get::<Maxp>().expect("malformed maxp").expect("missing maxp");
//! assert!(maxp.num_glyphs() > 0);
//! ```

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod font_data;
mod read;
mod registry;
mod table_directory;
mod table_provider;
pub mod tables;

/// Public re-export of the otfont-types crate.
pub extern crate otfont_types as types;

pub use font_data::{Cursor, FontData, ScalarArray};
pub use read::{FontRead, FontReadWithArgs, ReadArgs, ReadError};
pub use registry::{ParsedTable, SlotState, Table, TableError, TableRegistry};
pub use table_directory::{TableDirectory, TableRecord};
pub use table_provider::TopLevelTable;
