//! OpenType Layout common table formats
//!
//! The script, feature and lookup lists shared by GSUB and GPOS, and the
//! class definition tables used by GDEF.

#[path = "./lookupflag.rs"]
mod lookupflag;

pub use lookupflag::LookupFlag;

use types::{GlyphId, Scalar, Tag};

use crate::{FontData, FontRead, ReadError, ScalarArray};

/// A `(tag, offset16)` record, as found in script, language system and
/// feature lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagRecord {
    pub tag: Tag,
    pub offset: u16,
}

impl Scalar for TagRecord {
    const RAW_BYTE_LEN: usize = 6;

    fn read(bytes: &[u8]) -> Option<Self> {
        let bytes: &[u8; 6] = bytes.try_into().ok()?;
        Some(Self {
            tag: Tag::read(&bytes[..4])?,
            offset: u16::read(&bytes[4..])?,
        })
    }
}

/// Reads a `u16` count followed by that many records.
fn read_counted<'a, T: Scalar>(data: FontData<'a>, start: usize) -> Result<ScalarArray<'a, T>, ReadError> {
    let count: u16 = data.read_at(start)?;
    let start = start + 2;
    data.read_array(start..start + count as usize * T::RAW_BYTE_LEN)
}

/// Resolves a non-null offset relative to `data`.
fn resolve<'a, T: FontRead<'a>>(data: FontData<'a>, offset: u16) -> Result<T, ReadError> {
    if offset == 0 {
        return Err(ReadError::NullOffset);
    }
    data.read_table_at(offset as usize)
}

/// The header shared by the GSUB and GPOS tables.
#[derive(Clone, Debug)]
pub struct LayoutTable<'a> {
    major_version: u16,
    minor_version: u16,
    script_list: ScriptList<'a>,
    feature_list: FeatureList<'a>,
    lookup_list: LookupList<'a>,
    feature_variations_offset: Option<u32>,
}

impl<'a> LayoutTable<'a> {
    pub fn major_version(&self) -> u16 {
        self.major_version
    }

    pub fn minor_version(&self) -> u16 {
        self.minor_version
    }

    pub fn script_list(&self) -> &ScriptList<'a> {
        &self.script_list
    }

    pub fn feature_list(&self) -> &FeatureList<'a> {
        &self.feature_list
    }

    pub fn lookup_list(&self) -> &LookupList<'a> {
        &self.lookup_list
    }

    /// Offset to the FeatureVariations table, present in version 1.1.
    pub fn feature_variations_offset(&self) -> Option<u32> {
        self.feature_variations_offset
    }
}

impl<'a> FontRead<'a> for LayoutTable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let major_version: u16 = cursor.read()?;
        let minor_version: u16 = cursor.read()?;
        if major_version != 1 {
            return Err(ReadError::InvalidFormat(major_version as i64));
        }
        let script_list_offset: u16 = cursor.read()?;
        let feature_list_offset: u16 = cursor.read()?;
        let lookup_list_offset: u16 = cursor.read()?;
        let feature_variations_offset = match minor_version {
            0 => None,
            1 => Some(cursor.read::<u32>()?).filter(|offset| *offset != 0),
            other => return Err(ReadError::InvalidFormat(other as i64)),
        };
        Ok(Self {
            major_version,
            minor_version,
            script_list: resolve(data, script_list_offset)?,
            feature_list: resolve(data, feature_list_offset)?,
            lookup_list: resolve(data, lookup_list_offset)?,
            feature_variations_offset,
        })
    }
}

/// A list of scripts, sorted by tag.
#[derive(Clone, Debug)]
pub struct ScriptList<'a> {
    data: FontData<'a>,
    records: ScalarArray<'a, TagRecord>,
}

impl<'a> ScriptList<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = Tag> + 'a {
        self.records.iter().map(|record| record.tag)
    }

    /// Returns the script with the given tag.
    pub fn get(&self, tag: Tag) -> Result<Option<Script<'a>>, ReadError> {
        self.records
            .iter()
            .find(|record| record.tag == tag)
            .map(|record| resolve(self.data, record.offset))
            .transpose()
    }
}

impl<'a> FontRead<'a> for ScriptList<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Self {
            data,
            records: read_counted(data, 0)?,
        })
    }
}

/// A script: a default language system and tagged alternatives.
#[derive(Clone, Debug)]
pub struct Script<'a> {
    data: FontData<'a>,
    default_lang_sys_offset: u16,
    records: ScalarArray<'a, TagRecord>,
}

impl<'a> Script<'a> {
    pub fn default_lang_sys(&self) -> Result<Option<LangSys<'a>>, ReadError> {
        match self.default_lang_sys_offset {
            0 => Ok(None),
            offset => resolve(self.data, offset).map(Some),
        }
    }

    pub fn lang_sys_tags(&self) -> impl Iterator<Item = Tag> + 'a {
        self.records.iter().map(|record| record.tag)
    }

    pub fn lang_sys(&self, tag: Tag) -> Result<Option<LangSys<'a>>, ReadError> {
        self.records
            .iter()
            .find(|record| record.tag == tag)
            .map(|record| resolve(self.data, record.offset))
            .transpose()
    }
}

impl<'a> FontRead<'a> for Script<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Self {
            data,
            default_lang_sys_offset: data.read_at(0)?,
            records: read_counted(data, 2)?,
        })
    }
}

/// A language system: the features enabled for a script and language.
#[derive(Clone, Debug)]
pub struct LangSys<'a> {
    required_feature_index: u16,
    feature_indices: ScalarArray<'a, u16>,
}

impl<'a> LangSys<'a> {
    /// Index of a feature required for this language system, if any.
    pub fn required_feature_index(&self) -> Option<u16> {
        (self.required_feature_index != 0xFFFF).then_some(self.required_feature_index)
    }

    /// Indices into the feature list.
    pub fn feature_indices(&self) -> ScalarArray<'a, u16> {
        self.feature_indices
    }
}

impl<'a> FontRead<'a> for LangSys<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        // offset 0 is the reserved lookupOrderOffset
        Ok(Self {
            required_feature_index: data.read_at(2)?,
            feature_indices: read_counted(data, 4)?,
        })
    }
}

/// The list of all features in the table.
#[derive(Clone, Debug)]
pub struct FeatureList<'a> {
    data: FontData<'a>,
    records: ScalarArray<'a, TagRecord>,
}

impl<'a> FeatureList<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = Tag> + 'a {
        self.records.iter().map(|record| record.tag)
    }

    /// Returns the feature at the given index along with its tag.
    pub fn get(&self, index: usize) -> Result<(Tag, Feature<'a>), ReadError> {
        let record = self.records.get(index).ok_or(ReadError::OutOfBounds)?;
        Ok((record.tag, resolve(self.data, record.offset)?))
    }
}

impl<'a> FontRead<'a> for FeatureList<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Self {
            data,
            records: read_counted(data, 0)?,
        })
    }
}

/// A feature: the lookups applied when it is enabled.
#[derive(Clone, Debug)]
pub struct Feature<'a> {
    feature_params_offset: u16,
    lookup_indices: ScalarArray<'a, u16>,
}

impl<'a> Feature<'a> {
    pub fn feature_params_offset(&self) -> Option<u16> {
        (self.feature_params_offset != 0).then_some(self.feature_params_offset)
    }

    /// Indices into the lookup list.
    pub fn lookup_indices(&self) -> ScalarArray<'a, u16> {
        self.lookup_indices
    }
}

impl<'a> FontRead<'a> for Feature<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Self {
            feature_params_offset: data.read_at(0)?,
            lookup_indices: read_counted(data, 2)?,
        })
    }
}

/// The list of all lookups in the table.
#[derive(Clone, Debug)]
pub struct LookupList<'a> {
    data: FontData<'a>,
    offsets: ScalarArray<'a, u16>,
}

impl<'a> LookupList<'a> {
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<Lookup<'a>, ReadError> {
        let offset = self.offsets.get(index).ok_or(ReadError::OutOfBounds)?;
        resolve(self.data, offset)
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<Lookup<'a>, ReadError>> + '_ {
        (0..self.len()).map(|index| self.get(index))
    }
}

impl<'a> FontRead<'a> for LookupList<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Self {
            data,
            offsets: read_counted(data, 0)?,
        })
    }
}

/// A lookup: a type, flags and the offsets of its subtables.
///
/// The meaning of the type depends on the owning table; see
/// [`GsubLookupType`](super::gsub::GsubLookupType) and
/// [`GposLookupType`](super::gpos::GposLookupType).
#[derive(Clone, Debug)]
pub struct Lookup<'a> {
    data: FontData<'a>,
    lookup_type: u16,
    lookup_flag: LookupFlag,
    subtable_offsets: ScalarArray<'a, u16>,
    mark_filtering_set: Option<u16>,
}

impl<'a> Lookup<'a> {
    pub fn lookup_type(&self) -> u16 {
        self.lookup_type
    }

    pub fn lookup_flag(&self) -> LookupFlag {
        self.lookup_flag
    }

    pub fn subtable_count(&self) -> usize {
        self.subtable_offsets.len()
    }

    /// The raw data of the subtable at the given index.
    pub fn subtable_data(&self, index: usize) -> Result<FontData<'a>, ReadError> {
        let offset = self
            .subtable_offsets
            .get(index)
            .ok_or(ReadError::OutOfBounds)?;
        self.data
            .split_off(offset as usize)
            .ok_or(ReadError::OutOfBounds)
    }

    pub fn mark_filtering_set(&self) -> Option<u16> {
        self.mark_filtering_set
    }
}

impl<'a> FontRead<'a> for Lookup<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let lookup_type: u16 = data.read_at(0)?;
        let lookup_flag: LookupFlag = data.read_at(2)?;
        let subtable_offsets: ScalarArray<u16> = read_counted(data, 4)?;
        let mark_filtering_set = if lookup_flag.use_mark_filtering_set() {
            Some(data.read_at(6 + subtable_offsets.len() * 2)?)
        } else {
            None
        };
        Ok(Self {
            data,
            lookup_type,
            lookup_flag,
            subtable_offsets,
            mark_filtering_set,
        })
    }
}

/// A [class definition](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#class-definition-table)
/// table, mapping glyphs to classes.
#[derive(Clone, Debug)]
pub enum ClassDef<'a> {
    /// A contiguous run of glyphs starting at `start_glyph_id`.
    Format1 {
        start_glyph_id: u16,
        class_values: ScalarArray<'a, u16>,
    },
    /// Ranges of `(start, end, class)` sorted by start glyph.
    Format2(ScalarArray<'a, ClassRangeRecord>),
}

/// A range of glyphs sharing a class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassRangeRecord {
    pub start_glyph_id: u16,
    pub end_glyph_id: u16,
    pub class: u16,
}

impl Scalar for ClassRangeRecord {
    const RAW_BYTE_LEN: usize = 6;

    fn read(bytes: &[u8]) -> Option<Self> {
        let bytes: &[u8; 6] = bytes.try_into().ok()?;
        Some(Self {
            start_glyph_id: u16::read(&bytes[0..2])?,
            end_glyph_id: u16::read(&bytes[2..4])?,
            class: u16::read(&bytes[4..6])?,
        })
    }
}

impl ClassDef<'_> {
    /// Returns the class of the glyph; glyphs not covered are class 0.
    pub fn get(&self, glyph_id: GlyphId) -> u16 {
        let gid = glyph_id.to_u16();
        match self {
            ClassDef::Format1 {
                start_glyph_id,
                class_values,
            } => gid
                .checked_sub(*start_glyph_id)
                .and_then(|ix| class_values.get(ix as usize))
                .unwrap_or(0),
            ClassDef::Format2(ranges) => {
                let (mut lo, mut hi) = (0usize, ranges.len());
                while lo < hi {
                    let mid = lo + (hi - lo) / 2;
                    let Some(range) = ranges.get(mid) else {
                        return 0;
                    };
                    if gid < range.start_glyph_id {
                        hi = mid;
                    } else if gid > range.end_glyph_id {
                        lo = mid + 1;
                    } else {
                        return range.class;
                    }
                }
                0
            }
        }
    }
}

impl<'a> FontRead<'a> for ClassDef<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        match data.read_at::<u16>(0)? {
            1 => Ok(ClassDef::Format1 {
                start_glyph_id: data.read_at(2)?,
                class_values: read_counted(data, 4)?,
            }),
            2 => Ok(ClassDef::Format2(read_counted(data, 2)?)),
            other => Err(ReadError::InvalidFormat(other as i64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otfont_test_data::layout as test_data;

    #[test]
    fn read_layout_header() {
        let buf = test_data::simple_gsub();
        let table = LayoutTable::read(FontData::new(&buf)).unwrap();
        assert_eq!(table.major_version(), 1);
        assert_eq!(table.minor_version(), 0);
        assert_eq!(table.feature_variations_offset(), None);
        let scripts = table.script_list();
        assert_eq!(scripts.tags().collect::<Vec<_>>(), [Tag::new(b"latn")]);
        let latn = scripts.get(Tag::new(b"latn")).unwrap().unwrap();
        let dflt = latn.default_lang_sys().unwrap().unwrap();
        assert_eq!(dflt.required_feature_index(), None);
        assert_eq!(dflt.feature_indices().iter().collect::<Vec<_>>(), [0]);
        assert!(scripts.get(Tag::new(b"cyrl")).unwrap().is_none());
        let (tag, liga) = table.feature_list().get(0).unwrap();
        assert_eq!(tag, Tag::new(b"liga"));
        assert_eq!(liga.lookup_indices().iter().collect::<Vec<_>>(), [0]);
        let lookup = table.lookup_list().get(0).unwrap();
        assert_eq!(lookup.lookup_type(), 4);
        assert_eq!(lookup.subtable_count(), 1);
        assert_eq!(lookup.mark_filtering_set(), None);
    }

    #[test]
    fn bad_versions() {
        // minor version 2
        let mut buf = test_data::simple_gsub();
        buf[3] = 2;
        assert!(matches!(
            LayoutTable::read(FontData::new(&buf)),
            Err(ReadError::InvalidFormat(2))
        ));
        let mut buf = test_data::simple_gsub();
        buf[0] = 2;
        assert!(matches!(
            LayoutTable::read(FontData::new(&buf)),
            Err(ReadError::InvalidFormat(_))
        ));
    }

    #[test]
    fn mark_filtering_set() {
        use otfont_test_data::be_buffer;
        // type 1, flag 0x10, one subtable at 10, filtering set 7
        let buf = be_buffer! { 1u16, 0x0010u16, 1u16, 10u16, 7u16 };
        let lookup = Lookup::read(FontData::new(&buf)).unwrap();
        assert!(lookup.lookup_flag().use_mark_filtering_set());
        assert_eq!(lookup.mark_filtering_set(), Some(7));
        assert!(lookup.subtable_data(0).unwrap().is_empty());
        assert!(lookup.subtable_data(1).is_err());
    }

    #[test]
    fn class_defs() {
        use otfont_test_data::be_buffer;
        let format1 = be_buffer! { 1u16, 10u16, 3u16, [1u16, 2, 3] };
        let class_def = ClassDef::read(FontData::new(&format1)).unwrap();
        assert_eq!(class_def.get(GlyphId::new(9)), 0);
        assert_eq!(class_def.get(GlyphId::new(11)), 2);
        assert_eq!(class_def.get(GlyphId::new(13)), 0);
        let format2 = be_buffer! { 2u16, 2u16, [5u16, 8, 1], [20u16, 20, 3] };
        let class_def = ClassDef::read(FontData::new(&format2)).unwrap();
        assert_eq!(class_def.get(GlyphId::new(4)), 0);
        assert_eq!(class_def.get(GlyphId::new(7)), 1);
        assert_eq!(class_def.get(GlyphId::new(20)), 3);
        assert_eq!(class_def.get(GlyphId::new(21)), 0);
        let format3 = be_buffer! { 3u16 };
        assert!(ClassDef::read(FontData::new(&format3)).is_err());
    }
}
