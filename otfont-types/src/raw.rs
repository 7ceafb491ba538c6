//! types for working with raw big-endian bytes

/// A trait for font scalars.
///
/// This is an internal trait for decoding big-endian bytes. Every scalar has
/// a fixed encoded size; reading from a slice of any other length fails.
pub trait Scalar: Sized + Copy {
    /// The number of bytes in the encoded representation.
    const RAW_BYTE_LEN: usize;

    /// Decode an instance of this type from big-endian bytes.
    ///
    /// Returns `None` if `bytes.len()` is not equal to [`Self::RAW_BYTE_LEN`].
    fn read(bytes: &[u8]) -> Option<Self>;
}

macro_rules! int_scalar {
    ($ty:ty, $len:literal) => {
        impl Scalar for $ty {
            const RAW_BYTE_LEN: usize = $len;

            #[inline]
            fn read(bytes: &[u8]) -> Option<Self> {
                let raw: [u8; $len] = bytes.try_into().ok()?;
                Some(<$ty>::from_be_bytes(raw))
            }
        }
    };
}

int_scalar!(u8, 1);
int_scalar!(i8, 1);
int_scalar!(u16, 2);
int_scalar!(i16, 2);
int_scalar!(u32, 4);
int_scalar!(i32, 4);
