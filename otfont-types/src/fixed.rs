//! fixed-point numerical types

use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::raw::Scalar;

/// 32-bit signed fixed point number with 16 bits of fraction.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fixed(i32);

impl Fixed {
    /// Minimum value.
    pub const MIN: Self = Self(i32::MIN);

    /// Maximum value.
    pub const MAX: Self = Self(i32::MAX);

    /// This type's smallest representable value
    pub const EPSILON: Self = Self(1);

    /// Representation of 0.0.
    pub const ZERO: Self = Self(0);

    /// Representation of 1.0.
    pub const ONE: Self = Self(Self::ONE_BITS);

    const INT_MASK: i32 = !0 << 16;
    const ROUND: i32 = 1 << 15;
    const ONE_BITS: i32 = 1 << 16;

    /// Creates a new fixed point value from the underlying bit representation.
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    /// Returns the underlying bit representation of the value.
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    /// Creates a fixed point value from a 16-bit integer.
    pub const fn from_i32(i: i32) -> Self {
        Self(i << 16)
    }

    /// Returns the value truncated to an integer.
    pub const fn to_i32(self) -> i32 {
        self.0 >> 16
    }

    /// Creates a fixed point value from an `f64`.
    ///
    /// This operation is lossy; the float will be rounded to the nearest
    /// representable value.
    pub fn from_f64(x: f64) -> Self {
        Self((x * Self::ONE_BITS as f64).round() as i32)
    }

    /// Returns the value as an `f64`.
    ///
    /// This operation is lossless: all representable values can be
    /// round-tripped.
    pub fn to_f64(self) -> f64 {
        let int = ((self.0 & Self::INT_MASK) >> 16) as f64;
        let fract = (self.0 & !Self::INT_MASK) as f64 / Self::ONE_BITS as f64;
        int + fract
    }

    /// Returns the value as an `f32`.
    pub fn to_f32(self) -> f32 {
        self.to_f64() as f32
    }

    /// Returns the nearest integer value.
    pub fn round(self) -> Self {
        Self(self.0.wrapping_add(Self::ROUND) & Self::INT_MASK)
    }

    /// Returns the absolute value of the number.
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Returns the largest integer less than or equal to the number.
    pub fn floor(self) -> Self {
        Self(self.0 & Self::INT_MASK)
    }

    /// Wrapping addition.
    pub fn wrapping_add(self, other: Self) -> Self {
        Self(self.0.wrapping_add(other.0))
    }

    /// Wrapping substraction.
    pub fn wrapping_sub(self, other: Self) -> Self {
        Self(self.0.wrapping_sub(other.0))
    }
}

impl Add for Fixed {
    type Output = Self;
    #[inline(always)]
    fn add(self, other: Self) -> Self {
        // same overflow semantics as std: panic in debug, wrap in release
        Self(self.0 + other.0)
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Fixed {
    type Output = Self;
    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Fixed {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl std::fmt::Debug for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

impl std::fmt::Display for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl Scalar for Fixed {
    const RAW_BYTE_LEN: usize = 4;

    fn read(bytes: &[u8]) -> Option<Self> {
        i32::read(bytes).map(Self)
    }
}
