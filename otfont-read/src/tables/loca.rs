//! The [loca (Index to Location)][loca] table
//!
//! [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca

use crate::{
    read::{FontReadWithArgs, ReadArgs, ReadError},
    table_provider::TopLevelTable,
    FontData, ScalarArray,
};
use types::{GlyphId, Tag};

use super::glyf::{Glyf, Glyph};

/// The [loca] table.
///
/// [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca
#[derive(Clone, Debug)]
pub enum Loca<'a> {
    Short(ScalarArray<'a, u16>),
    Long(ScalarArray<'a, u32>),
}

impl TopLevelTable for Loca<'_> {
    const TAG: Tag = Tag::new(b"loca");
}

impl<'a> Loca<'a> {
    pub fn read(data: FontData<'a>, is_long: bool) -> Result<Self, ReadError> {
        Self::read_with_args(data, &is_long)
    }

    pub fn is_long(&self) -> bool {
        matches!(self, Loca::Long(_))
    }

    /// The number of glyphs covered by the table.
    pub fn len(&self) -> usize {
        match self {
            Loca::Short(data) => data.len().saturating_sub(1),
            Loca::Long(data) => data.len().saturating_sub(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attempt to return the offset for a given glyph id.
    pub fn get_raw(&self, idx: usize) -> Option<u32> {
        match self {
            Loca::Short(data) => data.get(idx).map(|x| x as u32 * 2),
            Loca::Long(data) => data.get(idx),
        }
    }

    /// Returns the glyph with the given id, or `None` if the glyph has no
    /// outline.
    pub fn get_glyf(&self, gid: GlyphId, glyf: &Glyf<'a>) -> Result<Option<Glyph<'a>>, ReadError> {
        let idx = gid.to_u32() as usize;
        let start = self.get_raw(idx).ok_or(ReadError::OutOfBounds)?;
        let end = self.get_raw(idx + 1).ok_or(ReadError::OutOfBounds)?;
        if start == end {
            return Ok(None);
        }
        if start > end {
            return Err(ReadError::MalformedData("loca offsets are not ascending"));
        }
        glyf.glyph_at(start as usize..end as usize).map(Some)
    }
}

impl ReadArgs for Loca<'_> {
    type Args = bool;
}

impl<'a> FontReadWithArgs<'a> for Loca<'a> {
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError> {
        let is_long = *args;
        if is_long {
            data.read_array(0..data.len()).map(Loca::Long)
        } else {
            data.read_array(0..data.len()).map(Loca::Short)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otfont_test_data::be_buffer;

    #[test]
    fn short_offsets_are_doubled() {
        let buf = be_buffer! { [0u16, 5, 5, 12] };
        let loca = Loca::read(FontData::new(&buf), false).unwrap();
        assert!(!loca.is_long());
        assert_eq!(loca.len(), 3);
        assert_eq!(loca.get_raw(1), Some(10));
        assert_eq!(loca.get_raw(3), Some(24));
        assert_eq!(loca.get_raw(4), None);
    }

    #[test]
    fn long_offsets() {
        let buf = be_buffer! { [0u32, 10, 24] };
        let loca = Loca::read(FontData::new(&buf), true).unwrap();
        assert_eq!(loca.len(), 2);
        assert_eq!(loca.get_raw(2), Some(24));
    }

    #[test]
    fn odd_length_is_rejected() {
        let buf = be_buffer! { [0u16, 5], 5u8 };
        assert!(Loca::read(FontData::new(&buf), false).is_err());
    }
}
