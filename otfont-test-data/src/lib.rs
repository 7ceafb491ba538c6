//! test data shared between the otfont crates.
//!
//! Everything here is assembled in code, so each fixture documents its own
//! layout.

pub mod bebuffer;
pub mod cff;
pub mod fonts;
pub mod layout;
pub mod sfnt;
