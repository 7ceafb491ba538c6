//! The operand stack shared by the DICT and charstring interpreters.

use types::Fixed;

use super::Error;

/// Operand limit.
///
/// Type 2 charstrings allow 48 operands, but DICTs may hold more, so the
/// larger CFF2 limit is used for both.
const MAX_STACK: usize = 513;

/// A CFF operand: either a 32-bit integer or a 16.16 fixed point value.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Number {
    I32(i32),
    Fixed(Fixed),
}

impl Number {
    /// The value as 16.16 fixed point; integers are converted.
    pub fn to_fixed(self) -> Fixed {
        match self {
            Self::I32(value) => Fixed::from_i32(value),
            Self::Fixed(value) => value,
        }
    }
}

impl Default for Number {
    fn default() -> Self {
        Self::I32(0)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::I32(value)
    }
}

impl From<Fixed> for Number {
    fn from(value: Fixed) -> Self {
        Self::Fixed(value)
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::I32(value) => value.fmt(f),
            Self::Fixed(value) => value.fmt(f),
        }
    }
}

/// Fixed capacity operand stack.
///
/// Each entry remembers whether it was pushed as an integer or as fixed
/// point. Operators that need integers reject fixed point entries; operators
/// that need coordinates convert integers.
pub struct Stack {
    values: [Number; MAX_STACK],
    len: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            values: [Number::default(); MAX_STACK],
            len: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    fn entries(&self) -> &[Number] {
        &self.values[..self.len]
    }

    /// An odd operand count tells several charstring operators that the
    /// advance width precedes their arguments.
    pub fn len_is_odd(&self) -> bool {
        self.len % 2 == 1
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn push(&mut self, number: impl Into<Number>) -> Result<(), Error> {
        let slot = self
            .values
            .get_mut(self.len)
            .ok_or(Error::StackOverflow)?;
        *slot = number.into();
        self.len += 1;
        Ok(())
    }

    fn get(&self, index: usize) -> Result<Number, Error> {
        self.entries()
            .get(index)
            .copied()
            .ok_or(Error::InvalidStackAccess(index))
    }

    /// The integer at `index`; fixed point entries are an error.
    pub fn get_i32(&self, index: usize) -> Result<i32, Error> {
        match self.get(index)? {
            Number::I32(value) => Ok(value),
            Number::Fixed(_) => Err(Error::ExpectedI32StackEntry(index)),
        }
    }

    /// The entry at `index` as fixed point.
    pub fn get_fixed(&self, index: usize) -> Result<Fixed, Error> {
        self.get(index).map(Number::to_fixed)
    }

    /// Pops an integer. The stack is unchanged on failure.
    pub fn pop_i32(&mut self) -> Result<i32, Error> {
        let top = self.len.checked_sub(1).ok_or(Error::StackUnderflow)?;
        let value = self.get_i32(top)?;
        self.len = top;
        Ok(value)
    }

    /// `N` consecutive entries as fixed point, starting at `first_index`.
    pub fn get_fixed_array<const N: usize>(&self, first_index: usize) -> Result<[Fixed; N], Error> {
        let end = first_index + N;
        let entries = self
            .entries()
            .get(first_index..end)
            .ok_or(Error::InvalidStackAccess(end - 1))?;
        let mut result = [Fixed::ZERO; N];
        for (dest, number) in result.iter_mut().zip(entries) {
            *dest = number.to_fixed();
        }
        Ok(result)
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
