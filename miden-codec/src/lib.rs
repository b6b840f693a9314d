//! Compact, deterministic binary serialization.
//!
//! Values are converted to bytes and back through the [Serializable] and [Deserializable]
//! traits. The encoding of every type is chosen at compile time and composes recursively:
//!
//! | Type | Encoding |
//! |---|---|
//! | `bool` | one byte, 1 or 0; any non-zero byte decodes to `true` |
//! | `u8`..`u128`, `i8`..`i128`, `char` | big-endian two's complement, natural width |
//! | [`Truncated<T, N>`] | the `N` least significant bytes, sign-extended on decode |
//! | `usize`, `isize`, [`VarInt<T>`] | base-128 groups, most significant first, zigzag for signed |
//! | `f32`, `f64` | raw bit pattern, big-endian |
//! | `Option<T>` | presence flag, then the value if present |
//! | `Vec<T>`, `[T]`, `String`, `str`, `BTreeSet`, `BTreeMap` | varint length, then elements |
//! | `[T; N]`, tuples | elements in order, no prefix |
//! | tagged unions ([impl_tagged_union]), `Result` | variant index, then the active value |
//!
//! Types from other crates, or types which need an alternative format, are encoded through an
//! [Adapter].
//!
//! ```
//! use miden_codec::{decode, encode, measure};
//!
//! let value = (0x12345678u32, Some(-1i8), String::from("OHAI"));
//!
//! let mut buffer = [0u8; 16];
//! let written = encode(&value, &mut buffer).unwrap();
//! assert_eq!(written, measure(&value).unwrap());
//! assert_eq!(written, 4 + 2 + 5);
//!
//! let (decoded, consumed) = decode::<(u32, Option<i8>, String)>(&buffer).unwrap();
//! assert_eq!(decoded, value);
//! assert_eq!(consumed, written);
//! ```
#![no_std]

extern crate alloc;
#[cfg(any(feature = "std", test))]
extern crate std;

use tracing::debug;

mod adapter;
mod collections;
mod errors;
pub mod primitives;
mod reader;
mod traits;
mod union;
mod writer;

#[cfg(test)]
mod tests;

// RE-EXPORTS
// ================================================================================================

pub use adapter::{Adapted, Adapter};
pub use errors::{DeserializationError, SerializationError};
pub use primitives::{Truncated, VarInt};
pub use reader::{BudgetedReader, ByteReader, MAX_EMPTY_ELEMENTS, ReadManyIter, SliceReader};
pub use traits::{Deserializable, Serializable};
pub use union::IndexEncoding;
pub use writer::{ByteWriter, SizeCounter, SliceWriter};

// ENTRY POINTS
// ================================================================================================

/// Serializes `value` into the beginning of `buffer` and returns the number of bytes written.
///
/// # Errors
/// Returns [SerializationError::CapacityExceeded] as soon as a write does not fit into `buffer`,
/// or [SerializationError::ValueOutOfRange] if an integer does not fit its declared width. Bytes
/// written before the failure are left in `buffer`.
pub fn encode<S: Serializable + ?Sized>(
    value: &S,
    buffer: &mut [u8],
) -> Result<usize, SerializationError> {
    let mut writer = SliceWriter::new(buffer);
    match value.write_into(&mut writer) {
        Ok(()) => Ok(writer.position()),
        Err(err) => {
            debug!(position = writer.position(), %err, "encode failed");
            Err(err)
        },
    }
}

/// Deserializes a value of type `T` from the beginning of `buffer`.
///
/// Returns the value together with the number of bytes it occupied. Bytes after the value are
/// not inspected.
pub fn decode<T: Deserializable>(buffer: &[u8]) -> Result<(T, usize), DeserializationError> {
    let mut reader = SliceReader::new(buffer);
    let value = T::read_from(&mut reader).inspect_err(|err| {
        debug!(position = reader.position(), %err, "decode failed");
    })?;
    Ok((value, reader.position()))
}

/// Deserializes a value of type `T` from `buffer`, reading at most `budget` bytes.
///
/// See [BudgetedReader] for how the budget also bounds sequence preallocation.
pub fn decode_with_budget<T: Deserializable>(
    buffer: &[u8],
    budget: usize,
) -> Result<(T, usize), DeserializationError> {
    let mut reader = BudgetedReader::new(SliceReader::new(buffer), budget);
    let value = T::read_from(&mut reader).inspect_err(|err| {
        debug!(
            position = reader.position(),
            remaining_budget = reader.remaining(),
            %err,
            "budgeted decode failed"
        );
    })?;
    Ok((value, reader.position()))
}

/// Returns the exact number of bytes [encode] writes for `value`.
///
/// The value is run through its regular encode path against a [SizeCounter].
///
/// # Errors
/// Returns an error only if encoding itself is impossible regardless of the buffer size, e.g.
/// because an integer does not fit its declared width.
pub fn measure<S: Serializable + ?Sized>(value: &S) -> Result<usize, SerializationError> {
    value.serialized_size().inspect_err(|err| {
        debug!(%err, "measure failed");
    })
}
