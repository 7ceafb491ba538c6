//! the [GDEF] table
//!
//! [GDEF]: https://docs.microsoft.com/en-us/typography/opentype/spec/gdef

pub use super::layout::ClassDef;

use types::{GlyphId, Tag};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// Glyph classes, as assigned by the glyph class definition table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GlyphClassDef {
    Base,
    Ligature,
    Mark,
    Component,
}

impl GlyphClassDef {
    fn new(raw: u16) -> Option<Self> {
        match raw {
            1 => Some(Self::Base),
            2 => Some(Self::Ligature),
            3 => Some(Self::Mark),
            4 => Some(Self::Component),
            _ => None,
        }
    }
}

/// The [Glyph Definition](https://docs.microsoft.com/en-us/typography/opentype/spec/gdef)
/// table.
#[derive(Clone, Debug)]
pub struct Gdef<'a> {
    data: FontData<'a>,
    minor_version: u16,
    glyph_class_def_offset: u16,
    attach_list_offset: u16,
    lig_caret_list_offset: u16,
    mark_attach_class_def_offset: u16,
    mark_glyph_sets_def_offset: Option<u16>,
    item_var_store_offset: Option<u32>,
}

impl<'a> Gdef<'a> {
    pub fn major_version(&self) -> u16 {
        1
    }

    pub fn minor_version(&self) -> u16 {
        self.minor_version
    }

    fn class_def(&self, offset: u16) -> Result<Option<ClassDef<'a>>, ReadError> {
        match offset {
            0 => Ok(None),
            offset => self.data.read_table_at(offset as usize).map(Some),
        }
    }

    /// The glyph class definition table, if present.
    pub fn glyph_class_def(&self) -> Result<Option<ClassDef<'a>>, ReadError> {
        self.class_def(self.glyph_class_def_offset)
    }

    /// The mark attachment class definition table, if present.
    pub fn mark_attach_class_def(&self) -> Result<Option<ClassDef<'a>>, ReadError> {
        self.class_def(self.mark_attach_class_def_offset)
    }

    /// Returns the class of the given glyph, or `None` if it is unclassified.
    pub fn glyph_class(&self, glyph_id: GlyphId) -> Result<Option<GlyphClassDef>, ReadError> {
        Ok(self
            .glyph_class_def()?
            .and_then(|class_def| GlyphClassDef::new(class_def.get(glyph_id))))
    }

    pub fn attach_list_offset(&self) -> Option<u16> {
        (self.attach_list_offset != 0).then_some(self.attach_list_offset)
    }

    pub fn lig_caret_list_offset(&self) -> Option<u16> {
        (self.lig_caret_list_offset != 0).then_some(self.lig_caret_list_offset)
    }

    /// Offset to the mark glyph sets table; version 1.2 and later.
    pub fn mark_glyph_sets_def_offset(&self) -> Option<u16> {
        self.mark_glyph_sets_def_offset.filter(|offset| *offset != 0)
    }

    /// Offset to the item variation store; version 1.3 and later.
    pub fn item_var_store_offset(&self) -> Option<u32> {
        self.item_var_store_offset.filter(|offset| *offset != 0)
    }
}

impl TopLevelTable for Gdef<'_> {
    const TAG: Tag = Tag::new(b"GDEF");
}

impl<'a> FontRead<'a> for Gdef<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let major_version: u16 = cursor.read()?;
        let minor_version: u16 = cursor.read()?;
        if major_version != 1 {
            return Err(ReadError::InvalidFormat(major_version as i64));
        }
        if !matches!(minor_version, 0 | 2 | 3) {
            return Err(ReadError::InvalidFormat(minor_version as i64));
        }
        let glyph_class_def_offset = cursor.read()?;
        let attach_list_offset = cursor.read()?;
        let lig_caret_list_offset = cursor.read()?;
        let mark_attach_class_def_offset = cursor.read()?;
        let mark_glyph_sets_def_offset = if minor_version >= 2 {
            Some(cursor.read()?)
        } else {
            None
        };
        let item_var_store_offset = if minor_version >= 3 {
            Some(cursor.read()?)
        } else {
            None
        };
        Ok(Self {
            data,
            minor_version,
            glyph_class_def_offset,
            attach_list_offset,
            lig_caret_list_offset,
            mark_attach_class_def_offset,
            mark_glyph_sets_def_offset,
            item_var_store_offset,
        })
    }
}
