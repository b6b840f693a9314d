use core::fmt;

use super::sealed::Sealed;
use crate::{
    ByteReader, ByteWriter, Deserializable, DeserializationError, Serializable, SerializationError,
};

// FIXED WIDTH INTEGERS
// ================================================================================================

/// An integer which can be encoded into a fixed number of big-endian bytes.
///
/// The number of bytes may be smaller than the natural width of the type. In that case only the
/// least significant bytes are written, and signed values are sign-extended when read back.
pub trait FixedWidth: Copy + Eq + fmt::Display + Sealed {
    /// Natural width of the type in bytes.
    const SIZE: usize;

    /// True for two's complement signed types.
    const SIGNED: bool;

    /// Fills `out` with the `out.len()` least significant bytes of `self`, most significant
    /// byte first.
    fn to_truncated_be(self, out: &mut [u8]);

    /// Rebuilds a value from `bytes.len()` big-endian bytes.
    ///
    /// Signed values narrower than the natural width are sign-extended.
    fn from_truncated_be(bytes: &[u8]) -> Self;
}

macro_rules! impl_fixed_width {
    ($($ty:ty),*) => {
        $(
            impl FixedWidth for $ty {
                const SIZE: usize = core::mem::size_of::<$ty>();
                const SIGNED: bool = <$ty>::MIN != 0;

                #[inline]
                fn to_truncated_be(self, out: &mut [u8]) {
                    let len = out.len();
                    debug_assert!(len <= Self::SIZE);
                    for (i, byte) in out.iter_mut().enumerate() {
                        *byte = (self >> ((len - 1 - i) * 8)) as u8;
                    }
                }

                #[inline]
                fn from_truncated_be(bytes: &[u8]) -> Self {
                    let len = bytes.len();
                    debug_assert!(len <= Self::SIZE);

                    let mut value: $ty = 0;
                    for (i, &byte) in bytes.iter().enumerate() {
                        value |= (byte as $ty) << ((len - 1 - i) * 8);
                    }

                    if Self::SIGNED && len > 0 && len < Self::SIZE {
                        let sign_bit: $ty = 1 << (len * 8 - 1);
                        value = (value ^ sign_bit).wrapping_sub(sign_bit);
                    }
                    value
                }
            }
        )*
    };
}

impl_fixed_width!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

// TRUNCATED
// ================================================================================================

/// An integer encoded into `N` big-endian bytes instead of its natural width.
///
/// Encoding fails with [SerializationError::ValueOutOfRange] if the wrapped value does not fit
/// into `N` bytes.
///
/// ```
/// use miden_codec::{Deserializable, Serializable, primitives::Truncated};
///
/// let value = Truncated::<i32, 3>(-0x123456);
/// let bytes = value.to_bytes().unwrap();
/// assert_eq!(bytes, [0xed, 0xcb, 0xaa]);
/// assert_eq!(Truncated::<i32, 3>::read_from_bytes(&bytes).unwrap(), value);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Truncated<T, const N: usize>(pub T);

impl<T: FixedWidth, const N: usize> Serializable for Truncated<T, N> {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write_fixed::<T, N>(self.0)
    }
}

impl<T: FixedWidth, const N: usize> Deserializable for Truncated<T, N> {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        source.read_fixed::<T, N>().map(Self)
    }

    fn min_serialized_size() -> usize {
        N
    }
}

// TESTS
// ================================================================================================
