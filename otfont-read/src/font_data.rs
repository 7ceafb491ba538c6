//! raw font bytes

use std::marker::PhantomData;
use std::ops::{Range, RangeBounds};

use types::Scalar;

use crate::read::{FontRead, FontReadWithArgs, ReadError};

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, that provides convenience methods
/// for parsing and validating that data.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

/// A cursor for validating bytes during parsing.
///
/// Reads advance the position even when they fail; callers propagate the
/// first error with `?`.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

/// An array of big-endian scalars, decoded on access.
#[derive(Clone, Copy)]
pub struct ScalarArray<'a, T> {
    bytes: &'a [u8],
    phantom: PhantomData<T>,
}

impl<'a> FontData<'a> {
    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the data starting at `pos`, or `None` if `pos` is out of bounds.
    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(|bytes| FontData { bytes })
    }

    /// Returns the data in `range`, or `None` if the range is out of bounds.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(|bytes| FontData { bytes })
    }

    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        let end = offset
            .checked_add(T::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        self.bytes
            .get(offset..end)
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Resolve a table at `offset` relative to the start of this data.
    pub fn read_table_at<T: FontRead<'a>>(&self, offset: usize) -> Result<T, ReadError> {
        self.split_off(offset)
            .ok_or(ReadError::OutOfBounds)
            .and_then(T::read)
    }

    pub fn read_with_args<T>(&self, range: Range<usize>, args: &T::Args) -> Result<T, ReadError>
    where
        T: FontReadWithArgs<'a>,
    {
        self.slice(range)
            .ok_or(ReadError::OutOfBounds)
            .and_then(|data| T::read_with_args(data, args))
    }

    pub fn read_array<T: Scalar>(&self, range: Range<usize>) -> Result<ScalarArray<'a, T>, ReadError> {
        let bytes = self
            .bytes
            .get(range)
            .ok_or(ReadError::OutOfBounds)?;
        if bytes.len() % T::RAW_BYTE_LEN != 0 {
            return Err(ReadError::InvalidArrayLen);
        }
        Ok(ScalarArray {
            bytes,
            phantom: PhantomData,
        })
    }

    fn check_in_bounds(&self, offset: usize) -> Result<(), ReadError> {
        self.bytes
            .get(..offset)
            .ok_or(ReadError::OutOfBounds)
            .map(|_| ())
    }

    pub fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> Cursor<'a> {
    pub fn advance<T: Scalar>(&mut self) {
        self.pos = self.pos.saturating_add(T::RAW_BYTE_LEN);
    }

    pub fn advance_by(&mut self, n_bytes: usize) {
        self.pos = self.pos.saturating_add(n_bytes);
    }

    pub fn read<T: Scalar>(&mut self) -> Result<T, ReadError> {
        let temp = self.data.read_at(self.pos);
        self.advance::<T>();
        temp
    }

    pub fn read_array<T: Scalar>(&mut self, len: usize) -> Result<ScalarArray<'a, T>, ReadError> {
        let len = len
            .checked_mul(T::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        let end = self.pos.checked_add(len).ok_or(ReadError::OutOfBounds)?;
        let temp = self.data.read_array(self.pos..end);
        self.pos = end;
        temp
    }

    /// Read `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        let end = self.pos.checked_add(len).ok_or(ReadError::OutOfBounds)?;
        let temp = self
            .data
            .as_bytes()
            .get(self.pos..end)
            .ok_or(ReadError::OutOfBounds);
        self.pos = end;
        temp
    }

    /// return the current position, or an error if we are out of bounds
    pub fn position(&self) -> Result<usize, ReadError> {
        self.data.check_in_bounds(self.pos).map(|_| self.pos)
    }

    // used when handling fields with an implicit length, which must be at the
    // end of a table.
    pub fn remaining_bytes(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// The data following the current position, if any.
    pub fn remaining(&self) -> Option<FontData<'a>> {
        self.data.split_off(self.pos)
    }
}

impl<'a, T: Scalar + 'a> ScalarArray<'a, T> {
    /// An empty array.
    pub const fn empty() -> Self {
        Self {
            bytes: &[],
            phantom: PhantomData,
        }
    }

    /// The number of elements in the array.
    pub fn len(&self) -> usize {
        self.bytes.len() / T::RAW_BYTE_LEN
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode the element at `idx`.
    pub fn get(&self, idx: usize) -> Option<T> {
        let start = idx.checked_mul(T::RAW_BYTE_LEN)?;
        self.bytes
            .get(start..start + T::RAW_BYTE_LEN)
            .and_then(T::read)
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + 'a {
        self.bytes.chunks_exact(T::RAW_BYTE_LEN).filter_map(T::read)
    }
}

impl<T: Scalar + std::fmt::Debug> std::fmt::Debug for ScalarArray<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for FontData<'a> {
    fn from(src: &'a [u8]) -> FontData<'a> {
        FontData::new(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reads_and_tracks_position() {
        let data = FontData::new(&[0, 1, 0, 2, 0xFF, 0xFE, 7]);
        let mut cursor = data.cursor();
        assert_eq!(cursor.read::<u16>(), Ok(1));
        let array = cursor.read_array::<u16>(2).unwrap();
        assert_eq!(array.iter().collect::<Vec<_>>(), vec![2, 0xFFFE]);
        assert_eq!(cursor.position(), Ok(6));
        assert_eq!(cursor.remaining_bytes(), 1);
        assert_eq!(cursor.read::<u16>(), Err(ReadError::OutOfBounds));
        assert_eq!(cursor.position(), Err(ReadError::OutOfBounds));
    }

    #[test]
    fn slicing() {
        let data = FontData::new(&[1, 2, 3, 4]);
        assert_eq!(data.slice(1..3).unwrap().as_bytes(), &[2, 3]);
        assert!(data.slice(2..8).is_none());
        assert_eq!(data.split_off(4).map(|d| d.len()), Some(0));
        assert!(data.split_off(5).is_none());
        assert_eq!(data.read_at::<u32>(0), Ok(0x01020304));
        assert_eq!(data.read_at::<u32>(usize::MAX), Err(ReadError::OutOfBounds));
    }

    #[test]
    fn array_length_must_be_multiple() {
        let data = FontData::new(&[1, 2, 3]);
        assert_eq!(
            data.read_array::<u16>(0..3).map(|a| a.len()),
            Err(ReadError::InvalidArrayLen)
        );
    }
}
