//! The [maxp](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp) table

use types::Tag;

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// Version 0.5, used by fonts with CFF outlines.
pub const VERSION_0_5: u32 = 0x00005000;
/// Version 1.0, used by fonts with TrueType outlines.
pub const VERSION_1_0: u32 = 0x00010000;

/// The [maxp](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp)
/// (maximum profile) table.
///
/// Only the glyph count is interpreted; the TrueType limits in version 1.0
/// are checked for length but otherwise ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Maxp {
    version: u32,
    num_glyphs: u16,
}

impl Maxp {
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The number of glyphs in the font.
    pub fn num_glyphs(&self) -> u16 {
        self.num_glyphs
    }
}

impl TopLevelTable for Maxp {
    const TAG: Tag = Tag::new(b"maxp");
}

impl<'a> FontRead<'a> for Maxp {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version: u32 = data.read_at(0)?;
        let min_len = match version {
            VERSION_0_5 => 6,
            VERSION_1_0 => 32,
            other => return Err(ReadError::InvalidFormat(other as i64)),
        };
        if data.len() < min_len {
            return Err(ReadError::OutOfBounds);
        }
        Ok(Self {
            version,
            num_glyphs: data.read_at(4)?,
        })
    }
}
