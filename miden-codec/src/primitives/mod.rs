//! Scalar encodings used by the [ByteReader](crate::ByteReader) and
//! [ByteWriter](crate::ByteWriter) traits.
//!
//! - fixed-width integers: big-endian two's complement, optionally truncated to fewer bytes than
//!   the natural width of the type and sign-extended on decode.
//! - native numerics: the raw bit pattern of a floating point value in big-endian byte order.
//! - variable-length integers: base-128 groups, most significant group first, with signed values
//!   mapped through the zigzag transform.

mod fixed;
mod native;
mod varint;

pub use fixed::{FixedWidth, Truncated};
pub use native::NativeBits;
pub use varint::{
    MAX_VARINT_LEN, UnsignedVarInt, VarInt, VarIntEncodable, ZigZag, decode_zigzag,
    encode_zigzag,
};

mod sealed {
    pub trait Sealed {}

    macro_rules! impl_sealed {
        ($($ty:ty),*) => {
            $(impl Sealed for $ty {})*
        };
    }

    impl_sealed!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);
}
