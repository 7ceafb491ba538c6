//! Parsing for CFF FDSelect tables.

use types::GlyphId;

use crate::{FontData, FontRead, ReadError};

/// Maps glyphs to font DICTs in CID-keyed fonts.
#[derive(Clone, Debug)]
pub enum FdSelect<'a> {
    /// One byte font DICT index per glyph.
    Format0(FontData<'a>),
    /// Sorted ranges of `(first glyph, font DICT index)`.
    Format3 {
        ranges: FontData<'a>,
        n_ranges: u16,
        sentinel: u16,
    },
}

impl<'a> FontRead<'a> for FdSelect<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        match cursor.read::<u8>()? {
            0 => Ok(Self::Format0(
                cursor.remaining().ok_or(ReadError::OutOfBounds)?,
            )),
            3 => {
                let n_ranges: u16 = cursor.read()?;
                // Range3 records are a u16 first glyph and a u8 index
                let ranges = cursor.read_bytes(n_ranges as usize * 3)?;
                let sentinel: u16 = cursor.read()?;
                Ok(Self::Format3 {
                    ranges: FontData::new(ranges),
                    n_ranges,
                    sentinel,
                })
            }
            other => Err(ReadError::InvalidFormat(other as i64)),
        }
    }
}

impl FdSelect<'_> {
    /// Returns the associated font DICT index for the given glyph identifier.
    pub fn font_index(&self, glyph_id: GlyphId) -> Option<u16> {
        let gid = glyph_id.to_u16();
        match self {
            Self::Format0(fds) => fds.read_at::<u8>(gid as usize).ok().map(|fd| fd as u16),
            Self::Format3 {
                ranges,
                n_ranges,
                sentinel,
            } => {
                if gid >= *sentinel {
                    return None;
                }
                let first = |ix: usize| ranges.read_at::<u16>(ix * 3).ok();
                // find the last range starting at or before gid
                let (mut lo, mut hi) = (0usize, *n_ranges as usize);
                while lo < hi {
                    let mid = lo + (hi - lo) / 2;
                    if first(mid)? <= gid {
                        lo = mid + 1;
                    } else {
                        hi = mid;
                    }
                }
                let ix = lo.checked_sub(1)?;
                ranges.read_at::<u8>(ix * 3 + 2).ok().map(|fd| fd as u16)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FdSelect, GlyphId};
    use crate::{FontData, FontRead};
    use otfont_test_data::bebuffer::BeBuffer;
    use std::ops::Range;

    #[test]
    fn select_font_index() {
        let map = &[
            (0..10, 0),
            (10..32, 4),
            (32..34, 1),
            (34..128, 12),
            (128..1024, 2),
        ];
        for data in make_fd_selects(map) {
            let fd_select = FdSelect::read(FontData::new(&data)).unwrap();
            for (range, font_index) in map {
                for gid in range.clone() {
                    assert_eq!(
                        fd_select.font_index(GlyphId::from(gid)).unwrap() as u8,
                        *font_index
                    )
                }
            }
            assert!(fd_select.font_index(GlyphId::new(1024)).is_none());
        }
    }

    #[test]
    fn unknown_format() {
        assert!(FdSelect::read(FontData::new(&[4, 0, 0])).is_err());
    }

    /// Builds FDSelect structures in both formats for the given
    /// Range<GID> -> font index mapping.
    fn make_fd_selects(map: &[(Range<u16>, u8)]) -> [BeBuffer; 2] {
        let glyph_count = map.last().unwrap().0.end;
        let format0 = {
            let mut fds = vec![0u8; glyph_count as usize];
            for (range, font_index) in map {
                for gid in range.clone() {
                    fds[gid as usize] = *font_index;
                }
            }
            BeBuffer::new().push(0u8).extend(fds)
        };
        let format3 = {
            let mut buf = BeBuffer::new().push(3u8).push(map.len() as u16);
            for (range, font_index) in map {
                buf = buf.push(range.start).push(*font_index);
            }
            buf.push(glyph_count)
        };
        [format0, format3]
    }
}
