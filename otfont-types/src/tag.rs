//! Four byte table tags.

use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

/// A four byte tag naming a table or other resource.
///
/// Well-formed tags are printable ASCII, padded with trailing spaces.
/// Fonts in the wild contain other bytes too, so [`Tag::new`] accepts
/// anything; [`Tag::new_checked`] is for tags coming from user input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::AnyBitPattern))]
#[repr(transparent)]
pub struct Tag([u8; 4]);

impl Tag {
    pub const fn new(src: &[u8; 4]) -> Tag {
        Tag(*src)
    }

    /// Validate and space-pad a tag of one to four bytes.
    ///
    /// `Tag::new_checked(b"CFF")` is the `CFF ` table tag.
    pub const fn new_checked(src: &[u8]) -> Result<Self, InvalidTag> {
        if src.is_empty() || src.len() > 4 {
            return Err(InvalidTag::InvalidLength(src.len()));
        }
        let mut raw = [b' '; 4];
        let mut pos = 0;
        while pos < src.len() {
            let byte = src[pos];
            let printable = byte >= 0x20 && byte <= 0x7E;
            if !printable || (byte == b' ' && pos == 0) {
                return Err(InvalidTag::InvalidByte { pos, byte });
            }
            // padding may only appear at the end
            if pos > 0 && src[pos - 1] == b' ' && byte != b' ' {
                return Err(InvalidTag::ByteAfterSpace { pos });
            }
            raw[pos] = byte;
            pos += 1;
        }
        Ok(Tag(raw))
    }

    pub const fn from_u32(src: u32) -> Self {
        Tag(src.to_be_bytes())
    }

    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0
    }
}

/// The reason [`Tag::new_checked`] rejected its input.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidTag {
    InvalidLength(usize),
    /// Not printable ASCII, or a leading space.
    InvalidByte { pos: usize, byte: u8 },
    ByteAfterSpace { pos: usize },
}

impl std::error::Error for InvalidTag {}

impl Display for InvalidTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidTag::InvalidLength(len) => write!(f, "tag must be 1 to 4 bytes, not {len}"),
            InvalidTag::InvalidByte { pos, byte } => {
                write!(f, "invalid tag byte 0x{byte:02X} at {pos}")
            }
            InvalidTag::ByteAfterSpace { pos } => write!(f, "tag byte after padding at {pos}"),
        }
    }
}

impl FromStr for Tag {
    type Err = InvalidTag;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Tag::new_checked(src.as_bytes())
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            match byte {
                0x20..=0x7E => write!(f, "{}", byte as char)?,
                _ => write!(f, "{{0x{byte:02X}}}")?,
            }
        }
        Ok(())
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag({self})")
    }
}

impl crate::raw::Scalar for Tag {
    const RAW_BYTE_LEN: usize = 4;

    fn read(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Tag)
    }
}

// Tags are strings in serialized form; tags that aren't valid utf-8 fail
// to serialize.
#[cfg(feature = "serde")]
impl serde::Serialize for Tag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let s = std::str::from_utf8(&self.0).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(s)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Tag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_round_trip() {
        let tag = Tag::new(b"OTTO");
        assert_eq!(tag, Tag::from_u32(0x4F54544F));
        assert_eq!(tag.to_u32(), 0x4F54544F);
        assert_eq!(tag, "OTTO");
    }

    #[test]
    fn short_tags_are_padded() {
        assert_eq!(Tag::new_checked(b"CFF"), Ok(Tag::new(b"CFF ")));
        assert_eq!("loc".parse::<Tag>(), Ok(Tag::new(b"loc ")));
    }

    #[test]
    fn checked_rejects_bad_input() {
        assert_eq!(Tag::new_checked(b""), Err(InvalidTag::InvalidLength(0)));
        assert_eq!(Tag::new_checked(b"glyph"), Err(InvalidTag::InvalidLength(5)));
        assert_eq!(
            Tag::new_checked(b" ab"),
            Err(InvalidTag::InvalidByte { pos: 0, byte: b' ' })
        );
        assert_eq!(
            Tag::new_checked(b"a b"),
            Err(InvalidTag::ByteAfterSpace { pos: 2 })
        );
        assert_eq!(
            Tag::new_checked(&[b'a', 0x7F]),
            Err(InvalidTag::InvalidByte { pos: 1, byte: 0x7F })
        );
    }

    #[test]
    fn display_escapes_unprintable() {
        let tag = Tag::new(&[b'G', 0x01, b'U', b'B']);
        assert_eq!(tag.to_string(), "G{0x01}UB");
        assert_eq!(format!("{:?}", Tag::new(b"GSUB")), "Tag(GSUB)");
    }

    #[test]
    #[cfg(feature = "serde")]
    fn serializes_as_string() {
        let tag = Tag::new(b"GPOS");
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, "\"GPOS\"");
        let back: Tag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tag);
    }
}
