//! The tables understood by this crate.

pub mod cff;
pub mod gdef;
pub mod glyf;
pub mod gpos;
pub mod gsub;
pub mod head;
pub mod layout;
pub mod loca;
pub mod maxp;
pub mod post;
pub mod postscript;
