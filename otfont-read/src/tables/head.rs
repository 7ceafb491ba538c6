//! The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head) table

use types::{Fixed, Tag};

use crate::{FontData, FontRead, ReadError, TopLevelTable};

/// The value of the `magicNumber` field.
pub const MAGIC_NUMBER: u32 = 0x5F0F3CF5;

/// The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head)
/// (font header) table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Head {
    version: Fixed,
    font_revision: Fixed,
    checksum_adjustment: u32,
    flags: u16,
    units_per_em: u16,
    x_min: i16,
    y_min: i16,
    x_max: i16,
    y_max: i16,
    mac_style: u16,
    lowest_rec_ppem: u16,
    index_to_loc_format: i16,
}

impl Head {
    /// The size of the table in bytes.
    pub const RAW_BYTE_LEN: usize = 54;

    pub fn version(&self) -> Fixed {
        self.version
    }

    pub fn font_revision(&self) -> Fixed {
        self.font_revision
    }

    pub fn checksum_adjustment(&self) -> u32 {
        self.checksum_adjustment
    }

    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// Set to a value from 16 to 16384.
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Minimum x coordinate across all glyph bounding boxes.
    pub fn x_min(&self) -> i16 {
        self.x_min
    }

    /// Minimum y coordinate across all glyph bounding boxes.
    pub fn y_min(&self) -> i16 {
        self.y_min
    }

    /// Maximum x coordinate across all glyph bounding boxes.
    pub fn x_max(&self) -> i16 {
        self.x_max
    }

    /// Maximum y coordinate across all glyph bounding boxes.
    pub fn y_max(&self) -> i16 {
        self.y_max
    }

    pub fn mac_style(&self) -> u16 {
        self.mac_style
    }

    /// Smallest readable size in pixels.
    pub fn lowest_rec_ppem(&self) -> u16 {
        self.lowest_rec_ppem
    }

    /// 0 for short offsets (Offset16), 1 for long (Offset32).
    pub fn index_to_loc_format(&self) -> i16 {
        self.index_to_loc_format
    }
}

impl TopLevelTable for Head {
    const TAG: Tag = Tag::new(b"head");
}

impl<'a> FontRead<'a> for Head {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        if data.len() < Self::RAW_BYTE_LEN {
            return Err(ReadError::OutOfBounds);
        }
        let magic: u32 = data.read_at(12)?;
        if magic != MAGIC_NUMBER {
            return Err(ReadError::ValidationError);
        }
        Ok(Self {
            version: data.read_at(0)?,
            font_revision: data.read_at(4)?,
            checksum_adjustment: data.read_at(8)?,
            flags: data.read_at(16)?,
            units_per_em: data.read_at(18)?,
            // created and modified dates at 20 and 28 are skipped
            x_min: data.read_at(36)?,
            y_min: data.read_at(38)?,
            x_max: data.read_at(40)?,
            y_max: data.read_at(42)?,
            mac_style: data.read_at(44)?,
            lowest_rec_ppem: data.read_at(46)?,
            index_to_loc_format: data.read_at(50)?,
        })
    }
}
