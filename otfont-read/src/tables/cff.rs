//! The [CFF](https://learn.microsoft.com/en-us/typography/opentype/spec/cff) table

use std::ops::Range;

use types::{Fixed, GlyphId, Tag};

use super::postscript::{dict, Charset, Error, FdSelect, Index, Latin1String, StringId};
use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// The fixed header at the start of a CFF table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CffHeader {
    pub major: u8,
    pub minor: u8,
    pub hdr_size: u8,
    pub off_size: u8,
}

/// The [Compact Font Format](https://learn.microsoft.com/en-us/typography/opentype/spec/cff) table.
///
/// The INDEX structures and the Top DICT of the first (and, in an OpenType
/// font, only) font in the set are parsed up front.
#[derive(Clone)]
pub struct Cff<'a> {
    data: FontData<'a>,
    header: CffHeader,
    names: Index<'a>,
    top_dicts: Index<'a>,
    strings: Index<'a>,
    global_subrs: Index<'a>,
    top_dict: TopDict<'a>,
}

/// Entries from the Top DICT needed to locate glyph data.
#[derive(Clone, Default)]
struct TopDict<'a> {
    charstrings: Option<Index<'a>>,
    charset_offset: usize,
    private_dict_range: Option<Range<usize>>,
    font_dicts: Index<'a>,
    fd_select: Option<FdSelect<'a>>,
    is_cid: bool,
}

impl<'a> TopDict<'a> {
    fn new(table_data: FontData<'a>, top_dict_data: &'a [u8]) -> Result<Self, Error> {
        let mut items = TopDict::default();
        let bytes = table_data.as_bytes();
        for entry in dict::entries(top_dict_data) {
            match entry? {
                dict::Entry::CharstringsOffset(offset) => {
                    items.charstrings =
                        Some(Index::new(bytes.get(offset..).ok_or(ReadError::OutOfBounds)?)?);
                }
                dict::Entry::Charset(offset) => items.charset_offset = offset,
                dict::Entry::PrivateDictRange(range) => {
                    items.private_dict_range = Some(range);
                }
                dict::Entry::FdArrayOffset(offset) => {
                    items.font_dicts =
                        Index::new(bytes.get(offset..).ok_or(ReadError::OutOfBounds)?)?;
                }
                dict::Entry::FdSelectOffset(offset) => {
                    items.fd_select = Some(FdSelect::read(
                        table_data.split_off(offset).ok_or(ReadError::OutOfBounds)?,
                    )?);
                }
                // The ROS operator signifies a CID-keyed font
                // <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=28>
                dict::Entry::Ros { .. } => items.is_cid = true,
                _ => {}
            }
        }
        Ok(items)
    }
}

/// Entries parsed from a Private DICT that are needed for charstring
/// evaluation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrivateDict {
    /// Offset of the local subroutine INDEX, from the start of the table.
    pub subrs_offset: Option<usize>,
    pub default_width_x: Fixed,
    pub nominal_width_x: Fixed,
}

impl PrivateDict {
    fn new(data: FontData, range: Range<usize>) -> Result<Self, Error> {
        let private_dict_data = data
            .slice(range.clone())
            .ok_or(ReadError::OutOfBounds)?
            .as_bytes();
        let mut dict = Self::default();
        for entry in dict::entries(private_dict_data) {
            match entry? {
                // Subrs offset is relative to the private DICT
                dict::Entry::SubrsOffset(offset) => {
                    dict.subrs_offset = Some(
                        range
                            .start
                            .checked_add(offset)
                            .ok_or(ReadError::OutOfBounds)?,
                    );
                }
                dict::Entry::DefaultWidthX(width) => dict.default_width_x = width,
                dict::Entry::NominalWidthX(width) => dict.nominal_width_x = width,
                _ => {}
            }
        }
        Ok(dict)
    }
}

impl<'a> Cff<'a> {
    /// The raw bytes of the table; DICT offsets are relative to this.
    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }

    pub fn header(&self) -> CffHeader {
        self.header
    }

    /// Returns the name index.
    ///
    /// This contains the PostScript names of all fonts in the font set.
    pub fn names(&self) -> Index<'a> {
        self.names.clone()
    }

    /// Returns the PostScript name for the font in the font set at the
    /// given index.
    pub fn name(&self, index: usize) -> Option<Latin1String<'a>> {
        Some(Latin1String::new(self.names.get(index).ok()?))
    }

    /// Returns the top dict index.
    pub fn top_dicts(&self) -> Index<'a> {
        self.top_dicts.clone()
    }

    /// Returns the string index.
    ///
    /// This contains the non-standard strings used by fonts within the font
    /// set, referenced by [`StringId`].
    pub fn strings(&self) -> Index<'a> {
        self.strings.clone()
    }

    /// Returns the associated string for the given identifier.
    ///
    /// If the identifier does not represent a standard string, the result is
    /// looked up in the string index.
    pub fn string(&self, id: StringId) -> Option<Latin1String<'a>> {
        match id.standard_string() {
            Ok(name) => Some(name),
            Err(ix) => self.strings.get(ix).ok().map(Latin1String::new),
        }
    }

    /// Returns the global subroutine index.
    pub fn global_subrs(&self) -> Index<'a> {
        self.global_subrs.clone()
    }

    /// Returns the CharStrings INDEX holding one charstring per glyph.
    pub fn charstrings(&self) -> Result<Index<'a>, Error> {
        self.top_dict
            .charstrings
            .clone()
            .ok_or(Error::MissingCharstrings)
    }

    /// The number of glyphs, as given by the CharStrings INDEX.
    pub fn num_glyphs(&self) -> u32 {
        self.top_dict
            .charstrings
            .as_ref()
            .map(Index::count)
            .unwrap_or_default()
    }

    /// True if the font is CID-keyed.
    pub fn is_cid_keyed(&self) -> bool {
        self.top_dict.is_cid
    }

    /// Returns the character set of the font.
    ///
    /// CID-keyed fonts map glyphs to CIDs rather than names, so they have
    /// no charset in this sense and `None` is returned.
    ///
    /// See "Charsets" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=21>
    pub fn charset(&self) -> Result<Option<Charset<'a>>, Error> {
        if self.top_dict.is_cid || self.top_dict.charstrings.is_none() {
            return Ok(None);
        }
        Ok(Some(Charset::new(
            self.data,
            self.top_dict.charset_offset,
            self.num_glyphs(),
        )?))
    }

    /// Returns the name of the given glyph, as stored in the charset.
    pub fn glyph_name(&self, glyph_id: GlyphId) -> Option<Latin1String<'a>> {
        let sid = self.charset().ok()??.string_id(glyph_id).ok()?;
        self.string(sid)
    }

    /// Returns the FDSelect table for CID-keyed fonts.
    pub fn fd_select(&self) -> Option<&FdSelect<'a>> {
        self.top_dict.fd_select.as_ref()
    }

    /// Returns the index of the Font DICT used by the given glyph.
    ///
    /// Fonts without an FDSelect have a single implicit Font DICT at 0.
    pub fn subfont_index(&self, glyph_id: GlyphId) -> u32 {
        self.top_dict
            .fd_select
            .as_ref()
            .and_then(|select| select.font_index(glyph_id))
            .unwrap_or(0) as u32
    }

    /// Parses the Private DICT for the given subfont.
    pub fn private_dict(&self, subfont_index: u32) -> Result<PrivateDict, Error> {
        let range = if self.top_dict.font_dicts.count() != 0 {
            let font_dict_data = self.top_dict.font_dicts.get(subfont_index as usize)?;
            dict::entries(font_dict_data)
                .find_map(|entry| match entry {
                    Ok(dict::Entry::PrivateDictRange(range)) => Some(Ok(range)),
                    Err(e) => Some(Err(e)),
                    _ => None,
                })
                .transpose()?
        } else {
            self.top_dict.private_dict_range.clone()
        };
        PrivateDict::new(self.data, range.ok_or(Error::MissingPrivateDict)?)
    }

    /// Returns the local subroutine index for the given Private DICT.
    pub fn subrs(&self, private_dict: &PrivateDict) -> Result<Option<Index<'a>>, Error> {
        match private_dict.subrs_offset {
            Some(offset) => {
                let data = self.data.as_bytes().get(offset..).ok_or(ReadError::OutOfBounds)?;
                Ok(Some(Index::new(data)?))
            }
            None => Ok(None),
        }
    }
}

impl TopLevelTable for Cff<'_> {
    const TAG: Tag = Tag::new(b"CFF ");
}

impl<'a> FontRead<'a> for Cff<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let header = CffHeader {
            major: cursor.read()?,
            minor: cursor.read()?,
            hdr_size: cursor.read()?,
            off_size: cursor.read()?,
        };
        if header.major != 1 {
            return Err(ReadError::InvalidFormat(header.major as i64));
        }
        let mut pos = header.hdr_size as usize;
        let mut next_index = || -> Result<Index<'a>, ReadError> {
            let bytes = data.as_bytes().get(pos..).ok_or(ReadError::OutOfBounds)?;
            let index = Index::new(bytes)?;
            pos += index.size_in_bytes();
            Ok(index)
        };
        let names = next_index()?;
        let top_dicts = next_index()?;
        let strings = next_index()?;
        let global_subrs = next_index()?;
        let top_dict_data = top_dicts.get(0)?;
        let top_dict = TopDict::new(data, top_dict_data)?;
        Ok(Self {
            data,
            header,
            names,
            top_dicts,
            strings,
            global_subrs,
            top_dict,
        })
    }
}

impl std::fmt::Debug for Cff<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cff")
            .field("header", &self.header)
            .field("names", &self.names.count())
            .field("strings", &self.strings.count())
            .field("num_glyphs", &self.num_glyphs())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FontData;

    #[test]
    fn read_cff_fixture() {
        let data = otfont_test_data::cff::simple_cff();
        let cff = Cff::read(FontData::new(&data)).unwrap();
        assert_eq!(cff.header().major, 1);
        assert_eq!(cff.name(0).unwrap(), "Fixture");
        assert_eq!(cff.num_glyphs(), 3);
        assert!(!cff.is_cid_keyed());
        assert_eq!(cff.glyph_name(GlyphId::new(0)).unwrap(), ".notdef");
        assert_eq!(cff.glyph_name(GlyphId::new(1)).unwrap(), "A");
        assert_eq!(cff.glyph_name(GlyphId::new(2)).unwrap(), "hello");
        assert!(cff.glyph_name(GlyphId::new(3)).is_none());
    }

    #[test]
    fn private_dict_and_subrs() {
        let bytes = otfont_test_data::cff::simple_cff();
        let cff = Cff::read(FontData::new(&bytes)).unwrap();
        let private = cff.private_dict(cff.subfont_index(GlyphId::new(2))).unwrap();
        assert!(private.subrs_offset.is_some());
        let subrs = cff.subrs(&private).unwrap().unwrap();
        assert_eq!(subrs.count(), 1);
        assert_eq!(cff.global_subrs().count(), 0);
    }

    #[test]
    fn string_lookup() {
        let bytes = otfont_test_data::cff::simple_cff();
        let cff = Cff::read(FontData::new(&bytes)).unwrap();
        assert_eq!(cff.string(StringId::new(34)).unwrap(), "A");
        assert_eq!(cff.string(StringId::new(391)).unwrap(), "hello");
        assert!(cff.string(StringId::new(500)).is_none());
    }

    #[test]
    fn zero_charstrings_offset_fails_to_read() {
        use otfont_test_data::cff::{
            index, simple_cff, NOTDEF_CHARSTRING, SUBR_CHARSTRING, TRIANGLE_CHARSTRING,
        };
        let mut bytes = simple_cff();
        let charstrings = index(&[NOTDEF_CHARSTRING, TRIANGLE_CHARSTRING, SUBR_CHARSTRING]);
        let start = bytes
            .windows(charstrings.len())
            .position(|window| window == charstrings.as_slice())
            .unwrap();
        // count and offSize precede the first offset
        bytes[start + 3] = 0;
        assert_eq!(
            Cff::read(FontData::new(&bytes)).err(),
            Some(ReadError::MalformedData("zero offset in INDEX"))
        );
    }

    #[test]
    fn truncated_table() {
        let bytes = otfont_test_data::cff::simple_cff();
        assert!(Cff::read(FontData::new(&bytes[..10])).is_err());
        assert_eq!(
            Cff::read(FontData::new(&[2, 0, 4, 1])).err(),
            Some(ReadError::InvalidFormat(2))
        );
    }
}
