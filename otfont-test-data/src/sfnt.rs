//! Assembling tables into an sfnt container.

use otfont_types::Tag;

use crate::bebuffer::BeBuffer;

const HEADER_LEN: usize = 12;
const RECORD_LEN: usize = 16;

/// Builds a font file from a set of tables.
///
/// Records are written sorted by tag, and table data is padded to four
/// byte boundaries. Tables added with the same tag are all kept, in the
/// order they were added.
#[derive(Clone, Debug)]
pub struct SfntBuilder {
    sfnt_version: u32,
    tables: Vec<(Tag, Vec<u8>)>,
}

impl SfntBuilder {
    pub fn new(sfnt_version: u32) -> Self {
        Self {
            sfnt_version,
            tables: Vec::new(),
        }
    }

    pub fn add_table(mut self, tag: Tag, data: impl Into<Vec<u8>>) -> Self {
        self.tables.push((tag, data.into()));
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        // stable, so duplicates keep their relative order
        self.tables.sort_by_key(|(tag, _)| *tag);
        let num_tables = self.tables.len() as u16;
        let entry_selector = num_tables.checked_ilog2().unwrap_or(0) as u16;
        let search_range = (1u16 << entry_selector) * RECORD_LEN as u16;
        let range_shift = (num_tables * RECORD_LEN as u16).saturating_sub(search_range);

        let mut buf = BeBuffer::new()
            .push(self.sfnt_version)
            .extend([num_tables, search_range, entry_selector, range_shift]);
        let mut offset = HEADER_LEN + RECORD_LEN * self.tables.len();
        for (tag, data) in &self.tables {
            buf = buf
                .push(*tag)
                .push(checksum(data))
                .extend([offset as u32, data.len() as u32]);
            offset += padded_len(data.len());
        }
        for (_, data) in &self.tables {
            let padding = padded_len(data.len()) - data.len();
            buf = buf.extend_bytes(data).extend_bytes(&[0u8; 3][..padding]);
        }
        buf.into_vec()
    }
}

fn padded_len(len: usize) -> usize {
    len.next_multiple_of(4)
}

fn checksum(data: &[u8]) -> u32 {
    data.chunks(4)
        .map(|chunk| {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            u32::from_be_bytes(word)
        })
        .fold(0u32, u32::wrapping_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_fields() {
        let font = SfntBuilder::new(0x00010000)
            .add_table(Tag::new(b"b   "), vec![1])
            .add_table(Tag::new(b"a   "), vec![2, 3, 4, 5, 6])
            .add_table(Tag::new(b"c   "), vec![])
            .build();
        // numTables 3, searchRange 32, entrySelector 1, rangeShift 16
        assert_eq!(&font[4..12], &[0, 3, 0, 32, 0, 1, 0, 16]);
        // first record is 'a   ' at offset 60 with length 5
        assert_eq!(&font[12..16], b"a   ");
        assert_eq!(&font[20..28], &[0, 0, 0, 60, 0, 0, 0, 5]);
        // then 'b   ' after 8 bytes of padded data
        assert_eq!(&font[36..44], &[0, 0, 0, 68, 0, 0, 0, 1]);
        assert_eq!(font.len(), 72);
    }

    #[test]
    fn checksums_pad_with_zeros() {
        assert_eq!(checksum(&[0, 0, 0, 1, 0, 0, 0, 2]), 3);
        assert_eq!(checksum(&[1]), 0x01000000);
    }
}
