//! the [GSUB] table
//!
//! [GSUB]: https://docs.microsoft.com/en-us/typography/opentype/spec/gsub

pub use super::layout::{FeatureList, LayoutTable, Lookup, LookupList, ScriptList};

use types::Tag;

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// The kinds of GSUB lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GsubLookupType {
    Single,
    Multiple,
    Alternate,
    Ligature,
    Contextual,
    ChainContextual,
    Extension,
    ReverseChainSingle,
}

impl GsubLookupType {
    pub fn new(raw: u16) -> Result<Self, ReadError> {
        Ok(match raw {
            1 => Self::Single,
            2 => Self::Multiple,
            3 => Self::Alternate,
            4 => Self::Ligature,
            5 => Self::Contextual,
            6 => Self::ChainContextual,
            7 => Self::Extension,
            8 => Self::ReverseChainSingle,
            other => return Err(ReadError::InvalidFormat(other as i64)),
        })
    }
}

/// The [Glyph Substitution](https://docs.microsoft.com/en-us/typography/opentype/spec/gsub)
/// table.
#[derive(Clone, Debug)]
pub struct Gsub<'a> {
    layout: LayoutTable<'a>,
}

impl<'a> Gsub<'a> {
    /// The script, feature and lookup lists.
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

    /// Returns the type of the lookup at the given index.
    pub fn lookup_type(&self, index: usize) -> Result<GsubLookupType, ReadError> {
        GsubLookupType::new(self.lookup_list().get(index)?.lookup_type())
    }
}

impl TopLevelTable for Gsub<'_> {
    const TAG: Tag = Tag::new(b"GSUB");
}

impl<'a> FontRead<'a> for Gsub<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Self {
            layout: LayoutTable::read(data)?,
        })
    }
}
