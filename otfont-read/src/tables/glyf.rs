//! The [glyf (Glyph Data)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table

use std::ops::Range;

use types::Tag;

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// The [glyf (Glyph Data)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table.
///
/// The table is a bag of glyph records; individual glyphs are located
/// through the [`Loca`](super::loca::Loca) table.
#[derive(Clone, Debug)]
pub struct Glyf<'a> {
    data: FontData<'a>,
}

impl<'a> Glyf<'a> {
    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }

    /// Reads the glyph occupying the given byte range.
    pub fn glyph_at(&self, range: Range<usize>) -> Result<Glyph<'a>, ReadError> {
        let data = self.data.slice(range).ok_or(ReadError::OutOfBounds)?;
        Glyph::read(data)
    }
}

impl TopLevelTable for Glyf<'_> {
    const TAG: Tag = Tag::new(b"glyf");
}

impl<'a> FontRead<'a> for Glyf<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Self { data })
    }
}

/// The header common to simple and composite glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphHeader {
    /// Non-negative for simple glyphs, -1 for composites.
    pub number_of_contours: i16,
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

/// A single glyph record.
///
/// Only the header is decoded; the outline data is exposed as raw bytes.
#[derive(Clone, Debug)]
pub struct Glyph<'a> {
    header: GlyphHeader,
    data: FontData<'a>,
}

impl<'a> Glyph<'a> {
    pub const HEADER_LEN: usize = 10;

    pub fn header(&self) -> GlyphHeader {
        self.header
    }

    pub fn number_of_contours(&self) -> i16 {
        self.header.number_of_contours
    }

    pub fn is_composite(&self) -> bool {
        self.header.number_of_contours < 0
    }

    /// The glyph description following the header.
    pub fn description_data(&self) -> FontData<'a> {
        self.data.split_off(Self::HEADER_LEN).unwrap_or_default()
    }
}

impl<'a> FontRead<'a> for Glyph<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let header = GlyphHeader {
            number_of_contours: cursor.read()?,
            x_min: cursor.read()?,
            y_min: cursor.read()?,
            x_max: cursor.read()?,
            y_max: cursor.read()?,
        };
        Ok(Self { header, data })
    }
}
