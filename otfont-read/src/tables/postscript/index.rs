//! Parsing for PostScript INDEX objects.
//!
//! See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=12>

use super::Error;
use crate::{FontData, ReadError};

/// An INDEX: a count followed by an array of variable sized objects.
#[derive(Clone, Default)]
pub struct Index<'a> {
    count: u16,
    off_size: u8,
    offsets: &'a [u8],
    data: &'a [u8],
}

impl<'a> Index<'a> {
    /// Creates a new index from the given data.
    ///
    /// Trailing bytes past the end of the last object are ignored; use
    /// [`Index::size_in_bytes`] to find the start of the following structure.
    pub fn new(data: &'a [u8]) -> Result<Self, Error> {
        let data = FontData::new(data);
        let mut cursor = data.cursor();
        let count: u16 = cursor.read()?;
        if count == 0 {
            return Ok(Self::default());
        }
        let off_size: u8 = cursor.read()?;
        if !(1..=4).contains(&off_size) {
            return Err(Error::InvalidIndexOffsetSize(off_size));
        }
        let offsets_len = (count as usize + 1) * off_size as usize;
        let offsets = cursor.read_bytes(offsets_len)?;
        let data = cursor.remaining().map(|d| d.as_bytes()).unwrap_or_default();
        let index = Self {
            count,
            off_size,
            offsets,
            data,
        };
        // the first offset must be 1 and the last must fit the data
        index.get_offset(0)?;
        let end = index.get_offset(count as usize)?;
        if end > data.len() {
            return Err(ReadError::OutOfBounds.into());
        }
        Ok(Index {
            data: data.get(..end).unwrap_or_default(),
            ..index
        })
    }

    /// Returns the number of objects in the index.
    pub fn count(&self) -> u32 {
        self.count as u32
    }

    pub fn off_size(&self) -> u8 {
        self.off_size
    }

    /// Computes a bias that is added to a subroutine operator in a
    /// charstring.
    ///
    /// See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=25>
    pub fn subr_bias(&self) -> i32 {
        let count = self.count();
        if count < 1240 {
            107
        } else if count < 33900 {
            1131
        } else {
            32768
        }
    }

    /// Returns the total size in bytes of the index table.
    pub fn size_in_bytes(&self) -> usize {
        // 2 byte count + 1 byte off_size
        const HEADER_SIZE: usize = 3;
        // An empty CFF index contains only a 2 byte count field
        const EMPTY_SIZE: usize = 2;
        match self.count {
            0 => EMPTY_SIZE,
            _ => HEADER_SIZE + self.offsets.len() + self.data.len(),
        }
    }

    /// Returns the offset of the object at the given index.
    pub fn get_offset(&self, index: usize) -> Result<usize, Error> {
        read_offset(index, self.count as usize, self.off_size, self.offsets)
    }

    /// Returns the data for the object at the given index.
    pub fn get(&self, index: usize) -> Result<&'a [u8], Error> {
        let start = self.get_offset(index)?;
        let end = self.get_offset(index + 1)?;
        self.data
            .get(start..end)
            .ok_or(ReadError::OutOfBounds.into())
    }

    /// Iterates over the objects in the index.
    pub fn iter(&self) -> impl Iterator<Item = Result<&'a [u8], Error>> + '_ {
        (0..self.count as usize).map(|ix| self.get(ix))
    }
}

impl std::fmt::Debug for Index<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index")
            .field("count", &self.count)
            .field("off_size", &self.off_size)
            .finish()
    }
}

/// Reads an offset which is encoded as a variable sized integer.
fn read_offset(
    index: usize,
    count: usize,
    offset_size: u8,
    offset_data: &[u8],
) -> Result<usize, Error> {
    // There are count + 1 entries in the offset array, and offsets are
    // relative to the byte that precedes the object data, so the first
    // offset is always 1.
    if index > count {
        Err(ReadError::OutOfBounds)?;
    }
    let start = index * offset_size as usize;
    let bytes = offset_data
        .get(start..start + offset_size as usize)
        .ok_or(ReadError::OutOfBounds)?;
    if !(1..=4).contains(&offset_size) {
        return Err(Error::InvalidIndexOffsetSize(offset_size));
    }
    let offset = bytes
        .iter()
        .fold(0usize, |acc, byte| (acc << 8) | *byte as usize);
    // As above, subtract one to get the actual offset.
    offset.checked_sub(1).ok_or(Error::ZeroOffsetInIndex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use otfont_test_data::bebuffer::BeBuffer;

    #[test]
    fn index_offsize1_count4() {
        test_index(1, 4);
    }

    #[test]
    fn index_offsize2_count64() {
        test_index(2, 64);
    }

    #[test]
    fn index_offsize3_count128() {
        test_index(3, 128);
    }

    #[test]
    fn index_offsize4_count256() {
        test_index(4, 256);
    }

    #[test]
    fn empty_index() {
        let index = Index::new(&[0, 0, 0xFF]).unwrap();
        assert_eq!(index.count(), 0);
        assert_eq!(index.size_in_bytes(), 2);
        assert!(index.get(0).is_err());
    }

    #[test]
    fn bad_offset_size() {
        assert!(matches!(
            Index::new(&[0, 1, 5, 0, 0]),
            Err(Error::InvalidIndexOffsetSize(5))
        ));
    }

    #[test]
    fn zero_offset() {
        let index = Index::new(&[0, 1, 1, 0, 1]);
        assert!(matches!(index, Err(Error::ZeroOffsetInIndex)));
    }

    #[test]
    fn truncated_object_data() {
        // claims one 4 byte object but only has 2 bytes
        let index = Index::new(&[0, 1, 1, 1, 5, 0xAA, 0xBB]);
        assert!(matches!(index, Err(Error::Read(ReadError::OutOfBounds))));
    }

    fn test_index(off_size: u8, count: usize) {
        let buf = make_index(off_size, count);
        let mut bytes = buf.to_vec();
        // trailing data is not part of the index
        bytes.extend([0xDE, 0xAD]);
        let index = Index::new(&bytes).unwrap();
        assert_eq!(index.off_size(), off_size);
        assert_eq!(index.count(), count as u32);
        assert_eq!(index.size_in_bytes(), buf.len());
        for i in 0..count {
            let object = index.get(i).unwrap();
            let expected_len = (i + 1) * 10;
            let expected_bytes = vec![i as u8; expected_len];
            assert_eq!(object, expected_bytes);
        }
    }

    fn make_index(off_size: u8, count: usize) -> BeBuffer {
        // We'll add `count` objects to the INDEX, each containing
        // `(i + 1) * 10` bytes of the value `i`.
        let mut buf = BeBuffer::new().push(count as u16);
        if count == 0 {
            return buf;
        }
        buf = buf.push(off_size);
        // Offsets start at 1.
        let mut offset = 1usize;
        for i in 0..count + 1 {
            let bytes = (offset as u32).to_be_bytes();
            buf = buf.extend(bytes[4 - off_size as usize..].iter().copied());
            offset += (i + 1) * 10;
        }
        // Now the data
        for i in 0..count {
            buf = buf.extend(std::iter::repeat_n(i as u8, (i + 1) * 10));
        }
        buf
    }
}
