//! Lookup flags.

use types::Scalar;

/// Flags controlling which glyphs a lookup skips.
///
/// The low byte holds single bit flags; the high byte is a mark attachment
/// class filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LookupFlag(u16);

impl LookupFlag {
    pub const RIGHT_TO_LEFT: u16 = 0x0001;
    pub const IGNORE_BASE_GLYPHS: u16 = 0x0002;
    pub const IGNORE_LIGATURES: u16 = 0x0004;
    pub const IGNORE_MARKS: u16 = 0x0008;
    pub const USE_MARK_FILTERING_SET: u16 = 0x0010;
    // bits 5-7 are reserved
    const RESERVED: u16 = 0x00E0;

    /// Build from a raw value, clearing reserved bits.
    pub fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & !Self::RESERVED)
    }

    pub fn to_bits(self) -> u16 {
        self.0
    }

    /// `true` if all bits of `flag` are set.
    pub fn contains(self, flag: u16) -> bool {
        self.0 & flag == flag
    }

    /// `true` if the lookup header carries a mark filtering set index after
    /// its subtable offsets.
    pub fn use_mark_filtering_set(self) -> bool {
        self.contains(Self::USE_MARK_FILTERING_SET)
    }

    /// The mark attachment class to filter on, if any.
    pub fn mark_attachment_class(self) -> Option<u16> {
        match self.0 >> 8 {
            0 => None,
            class => Some(class),
        }
    }
}

impl Scalar for LookupFlag {
    const RAW_BYTE_LEN: usize = 2;

    fn read(bytes: &[u8]) -> Option<Self> {
        u16::read(bytes).map(Self::from_bits_truncate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_bits_are_dropped() {
        let flag = LookupFlag::from_bits_truncate(0x03FF);
        assert_eq!(flag.to_bits(), 0x031F);
        assert!(flag.contains(LookupFlag::IGNORE_MARKS | LookupFlag::RIGHT_TO_LEFT));
        assert_eq!(flag.mark_attachment_class(), Some(3));
        assert_eq!(LookupFlag::default().mark_attachment_class(), None);
    }
}
