//! The [table directory] at the start of an sfnt font.
//!
//! [table directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory

use types::{Fixed, Tag, CFF_SFNT_VERSION, TRUE_SFNT_VERSION, TT_SFNT_VERSION};

use crate::{FontData, FontRead, ReadError};

const HEADER_LEN: usize = 12;

/// A record in the table directory, locating a single table.
///
/// Fields are stored as raw big-endian bytes so that the record array can
/// be cast directly from the font data.
#[derive(Clone, Copy, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C)]
pub struct TableRecord {
    tag: Tag,
    checksum: [u8; 4],
    offset: [u8; 4],
    length: [u8; 4],
}

impl TableRecord {
    pub const RAW_BYTE_LEN: usize = 16;

    /// Table identifier.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Checksum of the table; carried but never verified.
    pub fn checksum(&self) -> u32 {
        u32::from_be_bytes(self.checksum)
    }

    /// Offset of the table from the start of the font data.
    pub fn offset(&self) -> u32 {
        u32::from_be_bytes(self.offset)
    }

    /// Length of the table in bytes.
    pub fn length(&self) -> u32 {
        u32::from_be_bytes(self.length)
    }

    /// The byte range of the table within the font data.
    pub fn byte_range(&self) -> Option<std::ops::Range<usize>> {
        let start = self.offset() as usize;
        Some(start..start.checked_add(self.length() as usize)?)
    }
}

impl std::fmt::Debug for TableRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableRecord")
            .field("tag", &self.tag)
            .field("checksum", &format_args!("0x{:08X}", self.checksum()))
            .field("offset", &self.offset())
            .field("length", &self.length())
            .finish()
    }
}

/// The sfnt header and its table records.
#[derive(Clone, Debug)]
pub struct TableDirectory<'a> {
    sfnt_version: u32,
    search_range: u16,
    entry_selector: u16,
    range_shift: u16,
    records: &'a [TableRecord],
}

impl<'a> TableDirectory<'a> {
    /// `0x00010000`, `'true'` or `'OTTO'`.
    pub fn sfnt_version(&self) -> u32 {
        self.sfnt_version
    }

    pub fn num_tables(&self) -> u16 {
        self.records.len() as u16
    }

    pub fn search_range(&self) -> u16 {
        self.search_range
    }

    pub fn entry_selector(&self) -> u16 {
        self.entry_selector
    }

    pub fn range_shift(&self) -> u16 {
        self.range_shift
    }

    /// The table records, in file order.
    pub fn table_records(&self) -> &'a [TableRecord] {
        self.records
    }

    /// Returns true if the records are sorted by tag with no duplicates.
    pub fn is_sorted(&self) -> bool {
        self.records.windows(2).all(|pair| pair[0].tag < pair[1].tag)
    }

    /// The sfnt version as the floating point marker used to pick a font
    /// flavor.
    ///
    /// Both TrueType versions map to exactly `1.0`. Anything else is read as
    /// 16.16 fixed point, which can never produce `1.0`.
    pub fn version_marker(&self) -> f32 {
        match self.sfnt_version {
            TT_SFNT_VERSION | TRUE_SFNT_VERSION => 1.0,
            other => Fixed::from_bits(other as i32).to_f32(),
        }
    }
}

impl<'a> FontRead<'a> for TableDirectory<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let sfnt_version: u32 = cursor.read()?;
        if ![TT_SFNT_VERSION, CFF_SFNT_VERSION, TRUE_SFNT_VERSION].contains(&sfnt_version) {
            return Err(ReadError::InvalidSfnt(sfnt_version));
        }
        let num_tables: u16 = cursor.read()?;
        let search_range = cursor.read()?;
        let entry_selector = cursor.read()?;
        let range_shift = cursor.read()?;
        let records_len = num_tables as usize * TableRecord::RAW_BYTE_LEN;
        let record_bytes = data
            .as_bytes()
            .get(HEADER_LEN..HEADER_LEN + records_len)
            .ok_or(ReadError::OutOfBounds)?;
        let records: &[TableRecord] =
            bytemuck::try_cast_slice(record_bytes).map_err(|_| ReadError::InvalidArrayLen)?;
        for record in records {
            let in_bounds = record
                .byte_range()
                .is_some_and(|range| range.end <= data.len());
            if !in_bounds {
                return Err(ReadError::OutOfBounds);
            }
        }
        Ok(Self {
            sfnt_version,
            search_range,
            entry_selector,
            range_shift,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otfont_test_data::{bebuffer::BeBuffer, sfnt::SfntBuilder};

    fn two_table_font(version: u32) -> Vec<u8> {
        SfntBuilder::new(version)
            .add_table(Tag::new(b"head"), vec![1, 2, 3, 4])
            .add_table(Tag::new(b"GSUB"), vec![5, 6])
            .build()
    }

    #[test]
    fn read_directory() {
        let font = two_table_font(CFF_SFNT_VERSION);
        let directory = TableDirectory::read(FontData::new(&font)).unwrap();
        assert_eq!(directory.sfnt_version(), CFF_SFNT_VERSION);
        assert_eq!(directory.num_tables(), 2);
        assert_eq!(directory.search_range(), 32);
        assert_eq!(directory.entry_selector(), 1);
        assert_eq!(directory.range_shift(), 0);
        assert!(directory.is_sorted());
        let tags = directory
            .table_records()
            .iter()
            .map(TableRecord::tag)
            .collect::<Vec<_>>();
        assert_eq!(tags, [Tag::new(b"GSUB"), Tag::new(b"head")]);
        let head = directory.table_records()[1];
        assert_eq!(head.length(), 4);
        let range = head.byte_range().unwrap();
        assert_eq!(&font[range], &[1, 2, 3, 4]);
    }

    #[test]
    fn version_markers() {
        let marker = |version| {
            let font = two_table_font(version);
            TableDirectory::read(FontData::new(&font))
                .unwrap()
                .version_marker()
        };
        assert_eq!(marker(TT_SFNT_VERSION), 1.0);
        assert_eq!(marker(TRUE_SFNT_VERSION), 1.0);
        assert_ne!(marker(CFF_SFNT_VERSION), 1.0);
    }

    #[test]
    fn bad_sfnt_version() {
        let font = two_table_font(0x00020000);
        assert_eq!(
            TableDirectory::read(FontData::new(&font)).err(),
            Some(ReadError::InvalidSfnt(0x00020000))
        );
    }

    #[test]
    fn record_past_end_of_file() {
        let font = BeBuffer::new()
            .push(TT_SFNT_VERSION)
            .extend([1u16, 16, 0, 0])
            .push(Tag::new(b"head"))
            .extend([0u32, 28, 100]);
        assert_eq!(
            TableDirectory::read(FontData::new(&font)).err(),
            Some(ReadError::OutOfBounds)
        );
    }

    #[test]
    fn truncated_records() {
        let font = BeBuffer::new()
            .push(TT_SFNT_VERSION)
            .extend([3u16, 32, 1, 16])
            .push(Tag::new(b"head"));
        assert_eq!(
            TableDirectory::read(FontData::new(&font)).err(),
            Some(ReadError::OutOfBounds)
        );
    }
}
