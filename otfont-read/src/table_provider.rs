//! Tags of top-level tables.

use types::Tag;

/// A table found through the table directory, as opposed to a subtable
/// reached through an offset.
pub trait TopLevelTable {
    const TAG: Tag;
}
