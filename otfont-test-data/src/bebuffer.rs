//! small utilities used in tests

use std::collections::HashMap;

use otfont_types::{Fixed, GlyphId, Tag};

/// A type that can be written as big-endian bytes.
pub trait BeEncode: Copy {
    fn write_be(self, out: &mut Vec<u8>);
}

macro_rules! int_encode {
    ($($ty:ty),*) => {
        $(
            impl BeEncode for $ty {
                fn write_be(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_be_bytes());
                }
            }
        )*
    };
}

int_encode!(u8, i8, u16, i16, u32, i32, u64, i64);

impl BeEncode for Tag {
    fn write_be(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_be_bytes());
    }
}

impl BeEncode for GlyphId {
    fn write_be(self, out: &mut Vec<u8>) {
        self.to_u16().write_be(out)
    }
}

impl BeEncode for Fixed {
    fn write_be(self, out: &mut Vec<u8>) {
        self.to_bits().write_be(out)
    }
}

/// A convenience type for generating a buffer of big-endian bytes.
///
/// Every value is written using the width of its type, so integer literals
/// should carry a suffix: an unsuffixed literal falls back to `i32`.
#[derive(Debug, Clone, Default)]
pub struct BeBuffer {
    data: Vec<u8>,
    tagged_locations: HashMap<String, usize>,
}

impl BeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// The current length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer contains zero bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return a reference to the contents of the buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Write any scalar to this buffer.
    pub fn push(mut self, item: impl BeEncode) -> Self {
        item.write_be(&mut self.data);
        self
    }

    /// Write a scalar and remember its position, for [`write_at`](Self::write_at).
    pub fn push_with_tag(mut self, item: impl BeEncode, tag: &str) -> Self {
        self.tagged_locations
            .insert(tag.to_string(), self.data.len());
        item.write_be(&mut self.data);
        self
    }

    /// Write multiple scalars into the buffer
    pub fn extend<T: BeEncode>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            item.write_be(&mut self.data);
        }
        self
    }

    /// Append raw bytes.
    pub fn extend_bytes(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn offset_for(&self, tag: &str) -> usize {
        // panic on unrecognized tags
        self.tagged_locations.get(tag).copied().unwrap()
    }

    /// Overwrite the value previously pushed with `tag`.
    pub fn write_at(&mut self, tag: &str, item: impl BeEncode) {
        let offset = self.offset_for(tag);
        let mut raw = Vec::new();
        item.write_be(&mut raw);
        let data = &mut self.data[offset..];
        if data.len() < raw.len() {
            panic!("not enough room left in buffer for the requested write.");
        }
        data[..raw.len()].copy_from_slice(&raw);
    }
}

impl std::ops::Deref for BeBuffer {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl std::ops::DerefMut for BeBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

impl From<BeBuffer> for Vec<u8> {
    fn from(buf: BeBuffer) -> Self {
        buf.data
    }
}

/// Build a [`BeBuffer`] from a comma separated list of items.
///
/// Items are scalars, `[a, b, c]` arrays of scalars, or `{value => "tag"}`
/// to record the position of a value for a later
/// [`write_at`](BeBuffer::write_at).
#[macro_export]
macro_rules! be_buffer {
    ($($rest:tt)*) => {{
        let builder = $crate::bebuffer::BeBuffer::new();
        $crate::be_buffer_add!(builder; $($rest)*)
    }};
}

#[macro_export]
#[doc(hidden)]
macro_rules! be_buffer_add {
    ($b:expr;) => { $b };
    ($b:expr; [$($v:expr),* $(,)?] $(, $($rest:tt)*)?) => {
        $crate::be_buffer_add!($b.extend([$($v),*]); $($($rest)*)?)
    };
    ($b:expr; {$v:expr => $tag:literal} $(, $($rest:tt)*)?) => {
        $crate::be_buffer_add!($b.push_with_tag($v, $tag); $($($rest)*)?)
    };
    ($b:expr; ($v:expr) $(, $($rest:tt)*)?) => {
        $crate::be_buffer_add!($b.push($v); $($($rest)*)?)
    };
    ($b:expr; $v:literal $(, $($rest:tt)*)?) => {
        $crate::be_buffer_add!($b.push($v); $($($rest)*)?)
    };
    ($b:expr; $v:ident $(, $($rest:tt)*)?) => {
        $crate::be_buffer_add!($b.push($v); $($($rest)*)?)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macro_items() {
        let tag = Tag::new(b"abcd");
        let mut buf = be_buffer! { 1u16, -2i16, [3u8, 4], tag, {5u32 => "five"}, (GlyphId::new(6)) };
        assert_eq!(
            buf.as_slice(),
            &[0, 1, 0xFF, 0xFE, 3, 4, b'a', b'b', b'c', b'd', 0, 0, 0, 5, 0, 6]
        );
        assert_eq!(buf.offset_for("five"), 10);
        buf.write_at("five", 0x01020304u32);
        assert_eq!(&buf[10..14], &[1, 2, 3, 4]);
    }

    #[test]
    fn trailing_comma() {
        let buf = be_buffer! { 1u8, 2u8, };
        assert_eq!(buf.len(), 2);
        let empty = be_buffer!();
        assert!(empty.is_empty());
    }
}
