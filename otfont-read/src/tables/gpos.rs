//! the [GPOS] table
//!
//! [GPOS]: https://docs.microsoft.com/en-us/typography/opentype/spec/gpos

pub use super::layout::{FeatureList, LayoutTable, Lookup, LookupList, ScriptList};

use types::Tag;

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// The kinds of GPOS lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GposLookupType {
    Single,
    Pair,
    Cursive,
    MarkToBase,
    MarkToLig,
    MarkToMark,
    Contextual,
    ChainContextual,
    Extension,
}

impl GposLookupType {
    pub fn new(raw: u16) -> Result<Self, ReadError> {
        Ok(match raw {
            1 => Self::Single,
            2 => Self::Pair,
            3 => Self::Cursive,
            4 => Self::MarkToBase,
            5 => Self::MarkToLig,
            6 => Self::MarkToMark,
            7 => Self::Contextual,
            8 => Self::ChainContextual,
            9 => Self::Extension,
            other => return Err(ReadError::InvalidFormat(other as i64)),
        })
    }
}

/// The [Glyph Positioning](https://docs.microsoft.com/en-us/typography/opentype/spec/gpos)
/// table.
#[derive(Clone, Debug)]
pub struct Gpos<'a> {
    layout: LayoutTable<'a>,
}

impl<'a> Gpos<'a> {
    pub fn layout(&self) -> &LayoutTable<'a> {
        &self.layout
    }

    pub fn script_list(&self) -> &ScriptList<'a> {
        self.layout.script_list()
    }

    pub fn feature_list(&self) -> &FeatureList<'a> {
        self.layout.feature_list()
    }

    pub fn lookup_list(&self) -> &LookupList<'a> {
        self.layout.lookup_list()
    }

    pub fn lookup_type(&self, index: usize) -> Result<GposLookupType, ReadError> {
        GposLookupType::new(self.lookup_list().get(index)?.lookup_type())
    }
}

impl TopLevelTable for Gpos<'_> {
    const TAG: Tag = Tag::new(b"GPOS");
}

impl<'a> FontRead<'a> for Gpos<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Self {
            layout: LayoutTable::read(data)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otfont_test_data::layout as test_data;

    #[test]
    fn pair_lookup_with_variations_offset() {
        let buf = test_data::simple_gpos();
        let gpos = Gpos::read(FontData::new(&buf)).unwrap();
        assert_eq!(gpos.layout().minor_version(), 1);
        assert_eq!(gpos.layout().feature_variations_offset(), None);
        assert_eq!(gpos.lookup_type(0), Ok(GposLookupType::Pair));
        assert_eq!(gpos.feature_list().tags().collect::<Vec<_>>(), [Tag::new(b"kern")]);
    }
}
