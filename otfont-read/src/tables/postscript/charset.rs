//! CFF charset support.

use types::GlyphId;

use super::StringId;
use crate::{FontData, ReadError};

/// Character set for mapping from glyph to string identifiers.
///
/// See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=21>
#[derive(Clone, Debug)]
pub struct Charset<'a> {
    kind: CharsetKind<'a>,
    num_glyphs: u32,
}

/// Predefined and custom character sets.
#[derive(Clone, Debug)]
pub enum CharsetKind<'a> {
    IsoAdobe,
    Custom(CustomCharset<'a>),
}

/// The encoding of a custom charset.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CharsetFormat {
    /// An array of string identifiers, one per glyph.
    Format0,
    /// Ranges with an 8-bit count of additional glyphs.
    Format1,
    /// Ranges with a 16-bit count of additional glyphs.
    Format2,
}

/// A charset stored in the font data.
#[derive(Clone, Debug)]
pub struct CustomCharset<'a> {
    format: CharsetFormat,
    data: FontData<'a>,
}

impl<'a> Charset<'a> {
    pub fn new(
        cff_data: FontData<'a>,
        charset_offset: usize,
        num_glyphs: u32,
    ) -> Result<Self, ReadError> {
        let kind = match charset_offset {
            0 => CharsetKind::IsoAdobe,
            // the expert charsets are only used by a handful of legacy fonts
            1 | 2 => return Err(ReadError::InvalidFormat(charset_offset as i64)),
            _ => {
                let data = cff_data
                    .split_off(charset_offset)
                    .ok_or(ReadError::OutOfBounds)?;
                let format = match data.read_at::<u8>(0)? {
                    0 => CharsetFormat::Format0,
                    1 => CharsetFormat::Format1,
                    2 => CharsetFormat::Format2,
                    other => return Err(ReadError::InvalidFormat(other as i64)),
                };
                let data = data.split_off(1).ok_or(ReadError::OutOfBounds)?;
                CharsetKind::Custom(CustomCharset { format, data })
            }
        };
        Ok(Self { kind, num_glyphs })
    }

    pub fn kind(&self) -> &CharsetKind<'a> {
        &self.kind
    }

    /// The format of a custom charset, or `None` for ISOAdobe.
    pub fn format(&self) -> Option<CharsetFormat> {
        match &self.kind {
            CharsetKind::IsoAdobe => None,
            CharsetKind::Custom(custom) => Some(custom.format),
        }
    }

    pub fn num_glyphs(&self) -> u32 {
        self.num_glyphs
    }

    /// Returns the string identifier for the given glyph identifier.
    pub fn string_id(&self, glyph_id: GlyphId) -> Result<StringId, ReadError> {
        let gid = glyph_id.to_u32();
        if gid >= self.num_glyphs {
            return Err(ReadError::OutOfBounds);
        }
        if gid == 0 {
            // .notdef is implied
            return Ok(StringId::new(0));
        }
        match &self.kind {
            CharsetKind::IsoAdobe => {
                // The ISOAdobe charset is an identity mapping of gid->sid up
                // to 228 entries
                if gid <= 228 {
                    Ok(StringId::new(gid as u16))
                } else {
                    Err(ReadError::OutOfBounds)
                }
            }
            CharsetKind::Custom(custom) => custom.string_id(gid),
        }
    }

    /// Returns the glyph identifier for the given string identifier.
    pub fn glyph_id(&self, string_id: StringId) -> Result<GlyphId, ReadError> {
        self.iter()
            .find(|(_, sid)| *sid == string_id)
            .map(|(gid, _)| gid)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Returns an iterator over all of the glyph and string identifier
    /// mappings.
    pub fn iter(&self) -> impl Iterator<Item = (GlyphId, StringId)> + '_ {
        (0..self.num_glyphs.min(u16::MAX as u32 + 1)).map_while(|gid| {
            let gid = GlyphId::new(gid as u16);
            self.string_id(gid).ok().map(|sid| (gid, sid))
        })
    }
}

impl CustomCharset<'_> {
    fn string_id(&self, gid: u32) -> Result<StringId, ReadError> {
        let count_size = match self.format {
            CharsetFormat::Format0 => {
                let offset = (gid as usize - 1) * 2;
                return self.data.read_at::<u16>(offset).map(StringId::new);
            }
            CharsetFormat::Format1 => 1,
            CharsetFormat::Format2 => 2,
        };
        let record_size = 2 + count_size;
        // the first range starts at glyph 1
        let mut first_glyph = 1u32;
        let mut offset = 0;
        loop {
            let first_sid = self.data.read_at::<u16>(offset)? as u32;
            let n_left = match count_size {
                1 => self.data.read_at::<u8>(offset + 2)? as u32,
                _ => self.data.read_at::<u16>(offset + 2)? as u32,
            };
            let last_glyph = first_glyph + n_left;
            if gid <= last_glyph {
                let sid = first_sid + (gid - first_glyph);
                return u16::try_from(sid)
                    .map(StringId::new)
                    .map_err(|_| ReadError::MalformedData("charset SID overflow"));
            }
            first_glyph = last_glyph + 1;
            offset += record_size;
        }
    }
}

#[cfg(test)]
mod tests {
    use otfont_test_data::be_buffer;

    use super::*;

    fn sids(charset: &Charset) -> Vec<u16> {
        charset.iter().map(|(_, sid)| sid.to_u16()).collect()
    }

    #[test]
    fn iso_adobe() {
        let charset = Charset::new(FontData::new(&[]), 0, 5).unwrap();
        assert_eq!(sids(&charset), vec![0, 1, 2, 3, 4]);
        assert!(charset.format().is_none());
        assert!(charset.string_id(GlyphId::new(5)).is_err());
    }

    #[test]
    fn format0() {
        // 4 bytes of junk to exercise the offset
        let buf = be_buffer! { 0u32, 0u8, [34u16, 391, 66] };
        let charset = Charset::new(FontData::new(&buf), 4, 4).unwrap();
        assert_eq!(charset.format(), Some(CharsetFormat::Format0));
        assert_eq!(sids(&charset), vec![0, 34, 391, 66]);
        assert_eq!(
            charset.glyph_id(StringId::new(391)),
            Ok(GlyphId::new(2))
        );
        assert!(charset.glyph_id(StringId::new(7)).is_err());
    }

    #[test]
    fn format1_ranges() {
        // two ranges: sids 10..=12 then 400..=401
        let buf = be_buffer! { 0u32, 1u8, 10u16, 2u8, 400u16, 1u8 };
        let charset = Charset::new(FontData::new(&buf), 4, 6).unwrap();
        assert_eq!(charset.format(), Some(CharsetFormat::Format1));
        assert_eq!(sids(&charset), vec![0, 10, 11, 12, 400, 401]);
    }

    #[test]
    fn expert_charsets_are_unsupported() {
        let data = FontData::new(&[]);
        assert_eq!(
            Charset::new(data, 1, 4).map(|c| c.num_glyphs()),
            Err(ReadError::InvalidFormat(1))
        );
    }

    #[test]
    fn format2_ranges() {
        let buf = be_buffer! { 0u32, 2u8, 100u16, 299u16 };
        let charset = Charset::new(FontData::new(&buf), 4, 301).unwrap();
        assert_eq!(charset.format(), Some(CharsetFormat::Format2));
        assert_eq!(charset.string_id(GlyphId::new(1)).unwrap().to_u16(), 100);
        assert_eq!(charset.string_id(GlyphId::new(300)).unwrap().to_u16(), 399);
        assert_eq!(charset.iter().count(), 301);
    }

    #[test]
    fn truncated_ranges_stop_iteration() {
        let buf = be_buffer! { 0u32, 1u8, 10u16, 0u8 };
        let charset = Charset::new(FontData::new(&buf), 4, 4).unwrap();
        assert_eq!(sids(&charset), vec![0, 10]);
        assert_eq!(
            charset.string_id(GlyphId::new(2)),
            Err(ReadError::OutOfBounds)
        );
    }
}
