//! Parsing for PostScript DICTs.
//!
//! Only the entries needed to locate glyph data and subroutines are
//! decoded. Every other defined operator is reported as
//! [`Entry::Other`] with its operands discarded.

use std::ops::Range;

use super::{Error, Number, Stack, StringId};
use crate::{types::Fixed, Cursor, ReadError};

/// A DICT operator, identified by its opcode.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Operator {
    /// A one byte operator.
    Single(u8),
    /// A two byte operator; the value is the byte following the escape.
    Escaped(u8),
}

impl Operator {
    pub const CHARSET: Self = Self::Single(15);
    pub const CHARSTRINGS: Self = Self::Single(17);
    pub const PRIVATE: Self = Self::Single(18);
    pub const SUBRS: Self = Self::Single(19);
    pub const DEFAULT_WIDTH_X: Self = Self::Single(20);
    pub const NOMINAL_WIDTH_X: Self = Self::Single(21);
    pub const ROS: Self = Self::Escaped(30);
    pub const FD_ARRAY: Self = Self::Escaped(36);
    pub const FD_SELECT: Self = Self::Escaped(37);

    /// Opcode 12 escapes to a second byte.
    const ESCAPE: u8 = 12;

    /// `true` for operators defined in Top, Font and Private DICTs of CFF
    /// version 1. The CFF2 only operators (22 to 24) are not included.
    fn is_defined(self) -> bool {
        match self {
            Self::Single(op) => matches!(op, 0..=11 | 13..=21),
            Self::Escaped(op) => matches!(op, 0..=14 | 17..=23 | 30..=38),
        }
    }
}

/// A DICT operator with its decoded operands.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Entry {
    Charset(usize),
    CharstringsOffset(usize),
    /// The byte range of the Private DICT, relative to the start of the table.
    PrivateDictRange(Range<usize>),
    /// Marks a CID-keyed font.
    Ros {
        registry: StringId,
        ordering: StringId,
        supplement: Fixed,
    },
    FdArrayOffset(usize),
    FdSelectOffset(usize),
    /// Offset of the local subroutines, relative to the Private DICT.
    SubrsOffset(usize),
    DefaultWidthX(Fixed),
    NominalWidthX(Fixed),
    Other(Operator),
}

/// Iterate over the entries of a DICT.
pub fn entries(dict_data: &[u8]) -> impl Iterator<Item = Result<Entry, Error>> + '_ {
    let mut stack = Stack::new();
    let mut cursor = crate::FontData::new(dict_data).cursor();
    std::iter::from_fn(move || {
        while cursor.remaining_bytes() != 0 {
            let result = match read_operand_or_operator(&mut cursor) {
                Ok(Ok(operand)) => match stack.push(operand) {
                    Ok(()) => continue,
                    Err(e) => Err(e),
                },
                Ok(Err(operator)) => {
                    let entry = decode_entry(operator, &stack);
                    stack.clear();
                    entry
                }
                Err(e) => Err(e),
            };
            return Some(result);
        }
        None
    })
}

/// Reads either an operand (`Ok`) or an operator (`Err`).
fn read_operand_or_operator(cursor: &mut Cursor) -> Result<Result<Number, Operator>, Error> {
    let b0 = cursor.read::<u8>()?;
    let operator = match b0 {
        28 | 29 | 32..=254 => return Ok(Ok(parse_int(cursor, b0)?.into())),
        30 => return Ok(Ok(parse_bcd(cursor)?.into())),
        Operator::ESCAPE => Operator::Escaped(cursor.read::<u8>()?),
        _ => Operator::Single(b0),
    };
    if !operator.is_defined() {
        let opcode = match operator {
            Operator::Single(op) | Operator::Escaped(op) => op,
        };
        return Err(Error::InvalidDictOperator(opcode));
    }
    Ok(Err(operator))
}

fn decode_entry(operator: Operator, stack: &Stack) -> Result<Entry, Error> {
    // operators take their operands from the bottom of the stack
    let offset = |index| to_offset(stack.get_i32(index)?);
    Ok(match operator {
        Operator::CHARSET => Entry::Charset(offset(0)?),
        Operator::CHARSTRINGS => Entry::CharstringsOffset(offset(0)?),
        Operator::PRIVATE => {
            let len = offset(0)?;
            let start = offset(1)?;
            let end = start.checked_add(len).ok_or(ReadError::OutOfBounds)?;
            Entry::PrivateDictRange(start..end)
        }
        Operator::ROS => Entry::Ros {
            registry: stack.get_i32(0)?.into(),
            ordering: stack.get_i32(1)?.into(),
            supplement: stack.get_fixed(2)?,
        },
        Operator::FD_ARRAY => Entry::FdArrayOffset(offset(0)?),
        Operator::FD_SELECT => Entry::FdSelectOffset(offset(0)?),
        Operator::SUBRS => Entry::SubrsOffset(offset(0)?),
        Operator::DEFAULT_WIDTH_X => Entry::DefaultWidthX(stack.get_fixed(0)?),
        Operator::NOMINAL_WIDTH_X => Entry::NominalWidthX(stack.get_fixed(0)?),
        other => Entry::Other(other),
    })
}

// Negative offsets can't point anywhere useful.
fn to_offset(value: i32) -> Result<usize, Error> {
    usize::try_from(value).map_err(|_| ReadError::OutOfBounds.into())
}

/// Decode an integer operand whose first byte is `b0`.
///
/// Shared by DICTs and charstrings; byte 29 only occurs in DICTs.
pub(crate) fn parse_int(cursor: &mut Cursor, b0: u8) -> Result<i32, Error> {
    let b0 = b0 as i32;
    Ok(match b0 {
        32..=246 => b0 - 139,
        247..=250 => (b0 - 247) * 256 + cursor.read::<u8>()? as i32 + 108,
        251..=254 => -(b0 - 251) * 256 - cursor.read::<u8>()? as i32 - 108,
        28 => cursor.read::<i16>()? as i32,
        29 => cursor.read::<i32>()?,
        _ => return Err(Error::InvalidNumber),
    })
}

/// Parses a binary coded decimal real number.
///
/// Each nibble is a digit, a decimal point, an exponent marker, a minus
/// sign or the end marker (0xf). Values that don't fit in 16.16 fixed
/// point saturate.
fn parse_bcd(cursor: &mut Cursor) -> Result<Fixed, Error> {
    let mut text = String::new();
    'outer: loop {
        let byte = cursor.read::<u8>()?;
        for nibble in [byte >> 4, byte & 0xF] {
            match nibble {
                0..=9 => text.push((b'0' + nibble) as char),
                0xA => text.push('.'),
                0xB => text.push('e'),
                0xC => text.push_str("e-"),
                0xE => text.push('-'),
                0xF => break 'outer,
                _ => return Err(Error::InvalidNumber),
            }
        }
    }
    // A bare exponent marker or sign is valid and means zero.
    if !text.bytes().any(|b| b.is_ascii_digit()) {
        return Ok(Fixed::ZERO);
    }
    let value: f64 = text.parse().map_err(|_| Error::InvalidNumber)?;
    Ok(Fixed::from_f64(value.clamp(
        Fixed::MIN.to_f64(),
        Fixed::MAX.to_f64(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FontData;
    use otfont_test_data::bebuffer::BeBuffer;

    #[test]
    fn int_operands() {
        let empty = FontData::new(&[]);
        let min_byte = FontData::new(&[0]);
        let max_byte = FontData::new(&[255]);
        // 32..=246 => -107..=107
        assert_eq!(parse_int(&mut empty.cursor(), 32).unwrap(), -107);
        assert_eq!(parse_int(&mut empty.cursor(), 246).unwrap(), 107);
        // 247..=250 => +108 to +1131
        assert_eq!(parse_int(&mut min_byte.cursor(), 247).unwrap(), 108);
        assert_eq!(parse_int(&mut max_byte.cursor(), 250).unwrap(), 1131);
        // 251..=254 => -1131 to -108
        assert_eq!(parse_int(&mut min_byte.cursor(), 251).unwrap(), -108);
        assert_eq!(parse_int(&mut max_byte.cursor(), 254).unwrap(), -1131);
    }

    #[test]
    fn binary_coded_decimal_operands() {
        // The values -2.25 and 0.140541E-3 from the CFF specification,
        // minus the leading 30 operator byte.
        let bytes = FontData::new(&[0xe2, 0xa2, 0x5f]);
        assert_eq!(
            parse_bcd(&mut bytes.cursor()).unwrap(),
            Fixed::from_f64(-2.25)
        );
        let bytes = FontData::new(&[0x0a, 0x14, 0x05, 0x41, 0xc3, 0xff]);
        assert_eq!(
            parse_bcd(&mut bytes.cursor()).unwrap(),
            Fixed::from_f64(0.140541E-3)
        );
        // 1e10 saturates
        let bytes = FontData::new(&[0x1b, 0x10, 0xff]);
        assert_eq!(parse_bcd(&mut bytes.cursor()).unwrap(), Fixed::MAX);
    }

    #[test]
    fn truncated_bcd_is_an_error() {
        let bytes = FontData::new(&[0x12, 0x34]);
        assert!(parse_bcd(&mut bytes.cursor()).is_err());
    }

    #[test]
    fn top_dict_entries() {
        let mut buf = BeBuffer::new();
        // 1000 charstrings (5 byte int)
        buf = buf.push(29u8).push(1000u32).push(17u8);
        // 20 256 private
        buf = buf.extend([159u8, 247, 148, 18]);
        // ROS 391 392 0
        buf = buf.extend([248u8, 27, 248, 28, 139, 12, 30]);
        let entries = entries(&buf).collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(
            entries,
            vec![
                Entry::CharstringsOffset(1000),
                Entry::PrivateDictRange(256..276),
                Entry::Ros {
                    registry: StringId::new(391),
                    ordering: StringId::new(392),
                    supplement: Fixed::ZERO,
                },
            ]
        );
    }

    #[test]
    fn private_dict_entries() {
        // -20 20 480 20 BlueValues, 200 Subrs, 0.5 defaultWidthX
        let data = [119u8, 159, 248, 116, 159, 6, 247, 92, 19, 30, 0xa5, 0xff, 20];
        let entries = entries(&data).collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(
            entries,
            vec![
                Entry::Other(Operator::Single(6)),
                Entry::SubrsOffset(200),
                Entry::DefaultWidthX(Fixed::from_f64(0.5)),
            ]
        );
    }

    #[test]
    fn escaped_operators() {
        // 1 ItalicAngle (escaped 2), then an undefined escaped operator
        let data = [140u8, 12, 2, 12, 15];
        let mut entries = entries(&data);
        assert_eq!(
            entries.next(),
            Some(Ok(Entry::Other(Operator::Escaped(2))))
        );
        assert_eq!(entries.next(), Some(Err(Error::InvalidDictOperator(15))));
    }

    #[test]
    fn cff2_operators_are_rejected() {
        let data = [139u8, 22];
        assert_eq!(
            entries(&data).next(),
            Some(Err(Error::InvalidDictOperator(22)))
        );
    }

    #[test]
    fn private_dict_range_avoid_overflow() {
        // A Private DICT that tries to extend past the end of memory
        let mut buf = BeBuffer::new();
        buf = buf.push(29u8).push(-1i32).push(29u8).push(i32::MAX).push(18u8);
        assert!(entries(&buf).next().unwrap().is_err());
        let mut buf = BeBuffer::new();
        buf = buf.push(29u8).push(i32::MAX).push(29u8).push(i32::MAX).push(18u8);
        let entry = entries(&buf).next().unwrap().unwrap();
        assert_eq!(
            entry,
            Entry::PrivateDictRange(i32::MAX as usize..i32::MAX as usize * 2)
        );
    }
}
