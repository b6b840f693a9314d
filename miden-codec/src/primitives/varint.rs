use super::sealed::Sealed;
use crate::{
    ByteReader, ByteWriter, Deserializable, DeserializationError, Serializable, SerializationError,
};

// CONSTANTS
// ================================================================================================

/// Maximum number of bytes a variable-length integer of any supported type can occupy.
pub const MAX_VARINT_LEN: usize = (u128::BITS as usize).div_ceil(7);

// UNSIGNED VARINT
// ================================================================================================

/// An unsigned integer which can be split into 7-bit groups.
pub trait UnsignedVarInt: Copy + Eq + Sealed {
    /// Width of the type in bits.
    const BITS: u32;

    /// Maximum number of 7-bit groups a value of this type can occupy.
    const MAX_GROUPS: usize = (Self::BITS as usize).div_ceil(7);

    const ZERO: Self;

    /// Returns the number of 7-bit groups in the minimal encoding of `self`.
    ///
    /// Zero occupies a single group.
    fn group_count(self) -> usize;

    /// Returns the 7-bit group at `index`, counting from the least significant group.
    fn group(self, index: usize) -> u8;

    /// Shifts `self` left by 7 bits and appends the low 7 bits of `group`.
    ///
    /// Returns `None` if any of the top 7 bits of `self` is set, since the shift would lose them.
    fn push_group(self, group: u8) -> Option<Self>;
}

/// An integer which can be encoded as a variable-length integer.
///
/// Unsigned integers are encoded as they are; signed integers are mapped onto their unsigned
/// counterparts with the zigzag transform first, so that small magnitudes of either sign produce
/// short encodings.
pub trait VarIntEncodable: Copy + Sealed {
    /// The unsigned type the value is mapped to before encoding.
    type Unsigned: UnsignedVarInt;

    fn to_unsigned(self) -> Self::Unsigned;

    fn from_unsigned(value: Self::Unsigned) -> Self;
}

macro_rules! impl_unsigned_varint {
    ($($ty:ty),*) => {
        $(
            impl UnsignedVarInt for $ty {
                const BITS: u32 = <$ty>::BITS;
                const ZERO: Self = 0;

                #[inline]
                fn group_count(self) -> usize {
                    let mut remainder = self >> 7;
                    let mut count = 1;
                    while remainder != 0 {
                        remainder >>= 7;
                        count += 1;
                    }
                    count
                }

                #[inline]
                fn group(self, index: usize) -> u8 {
                    ((self >> (index * 7)) & 0x7f) as u8
                }

                #[inline]
                fn push_group(self, group: u8) -> Option<Self> {
                    const HIGH_BITS: $ty = 0x7f << (<$ty>::BITS - 7);
                    if self & HIGH_BITS != 0 {
                        return None;
                    }
                    Some((self << 7) | (group & 0x7f) as $ty)
                }
            }

            impl VarIntEncodable for $ty {
                type Unsigned = $ty;

                #[inline]
                fn to_unsigned(self) -> Self::Unsigned {
                    self
                }

                #[inline]
                fn from_unsigned(value: Self::Unsigned) -> Self {
                    value
                }
            }
        )*
    };
}

impl_unsigned_varint!(u8, u16, u32, u64, u128, usize);

// ZIGZAG
// ================================================================================================

/// A signed integer with a bijective mapping onto the unsigned integer of the same width.
///
/// The mapping interleaves non-negative and negative values: `0 -> 0`, `-1 -> 1`, `1 -> 2`,
/// `-2 -> 3`, and so on.
pub trait ZigZag: Copy + Sealed {
    type Unsigned: UnsignedVarInt;

    fn encode_zigzag(self) -> Self::Unsigned;

    fn decode_zigzag(value: Self::Unsigned) -> Self;
}

/// Maps a signed integer onto its zigzag unsigned counterpart.
pub fn encode_zigzag<T: ZigZag>(value: T) -> T::Unsigned {
    value.encode_zigzag()
}

/// Maps a zigzag-encoded unsigned integer back onto the signed integer it came from.
pub fn decode_zigzag<T: ZigZag>(value: T::Unsigned) -> T {
    T::decode_zigzag(value)
}

macro_rules! impl_zigzag {
    ($($ty:ty => $unsigned:ty),*) => {
        $(
            impl ZigZag for $ty {
                type Unsigned = $unsigned;

                #[inline]
                fn encode_zigzag(self) -> $unsigned {
                    // the arithmetic shift smears the sign bit across the whole word
                    ((self << 1) as $unsigned) ^ ((self >> (<$ty>::BITS - 1)) as $unsigned)
                }

                #[inline]
                fn decode_zigzag(value: $unsigned) -> Self {
                    let half = (value >> 1) as $ty;
                    if value & 1 == 1 { !half } else { half }
                }
            }

            impl VarIntEncodable for $ty {
                type Unsigned = $unsigned;

                #[inline]
                fn to_unsigned(self) -> $unsigned {
                    self.encode_zigzag()
                }

                #[inline]
                fn from_unsigned(value: $unsigned) -> Self {
                    Self::decode_zigzag(value)
                }
            }
        )*
    };
}

impl_zigzag!(i8 => u8, i16 => u16, i32 => u32, i64 => u64, i128 => u128, isize => usize);

// VARINT
// ================================================================================================

/// An integer encoded as a variable-length integer instead of its natural width.
///
/// ```
/// use miden_codec::{Serializable, primitives::VarInt};
///
/// assert_eq!(VarInt(300u32).to_bytes().unwrap(), [0x82, 0x2c]);
/// assert_eq!(VarInt(-1i64).to_bytes().unwrap(), [0x01]);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarInt<T>(pub T);

impl<T: VarIntEncodable> Serializable for VarInt<T> {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write_varint(self.0)
    }
}

impl<T: VarIntEncodable> Deserializable for VarInt<T> {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        source.read_varint().map(Self)
    }

    fn min_serialized_size() -> usize {
        1
    }
}

// TESTS
// ================================================================================================
