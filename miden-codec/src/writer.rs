use alloc::{string::ToString, vec::Vec};

use crate::{
    Adapter, IndexEncoding, Serializable, SerializationError,
    primitives::{FixedWidth, MAX_VARINT_LEN, NativeBits, UnsignedVarInt, VarIntEncodable},
};

// BYTE WRITER TRAIT
// ================================================================================================

/// Defines how primitive values are to be written into `Self`.
///
/// Every write either stores all of its bytes and advances the writer by exactly that many
/// bytes, or fails without advancing. Composite values are written by a sequence of such
/// writes; if one of them fails, the bytes written before it remain in the target.
pub trait ByteWriter: Sized {
    // REQUIRED METHODS
    // --------------------------------------------------------------------------------------------

    /// Writes a single byte into `self`.
    ///
    /// # Errors
    /// Returns a [SerializationError] if `self` has no capacity left.
    fn write_u8(&mut self, value: u8) -> Result<(), SerializationError>;

    /// Writes a sequence of bytes into `self`.
    ///
    /// # Errors
    /// Returns a [SerializationError] if `self` cannot hold all of `values`; nothing is written
    /// in that case.
    fn write_bytes(&mut self, values: &[u8]) -> Result<(), SerializationError>;

    /// Returns the number of bytes written into `self` so far.
    fn position(&self) -> usize;

    // PROVIDED METHODS
    // --------------------------------------------------------------------------------------------

    /// Writes a boolean value as a single byte: 1 for `true`, 0 for `false`.
    fn write_bool(&mut self, value: bool) -> Result<(), SerializationError> {
        self.write_u8(value as u8)
    }

    /// Writes the `N` least significant bytes of an integer in big-endian byte order.
    ///
    /// `N` must be between 1 and the natural width of `T`; this is checked at compile time.
    ///
    /// # Errors
    /// Returns a [SerializationError] if:
    /// * `value` does not fit into `N` bytes (it would not be read back unchanged).
    /// * `self` cannot hold `N` more bytes.
    fn write_fixed<T: FixedWidth, const N: usize>(
        &mut self,
        value: T,
    ) -> Result<(), SerializationError> {
        const {
            assert!(N > 0 && N <= T::SIZE, "fixed width must be between 1 and the type size");
        }

        let mut bytes = [0u8; N];
        value.to_truncated_be(&mut bytes);
        if N < T::SIZE && T::from_truncated_be(&bytes) != value {
            return Err(SerializationError::ValueOutOfRange {
                value: value.to_string(),
                width: N,
            });
        }
        self.write_bytes(&bytes)
    }

    /// Writes the bit pattern of a floating point value in big-endian byte order.
    fn write_native<T: NativeBits>(&mut self, value: T) -> Result<(), SerializationError> {
        self.write_bytes(value.to_wire_bytes().as_ref())
    }

    /// Writes an integer as a variable-length integer.
    ///
    /// The value is split into 7-bit groups which are written most significant group first,
    /// with the continuation bit (`0x80`) set on every byte but the last one. Signed values are
    /// zigzag-encoded first.
    fn write_varint<T: VarIntEncodable>(&mut self, value: T) -> Result<(), SerializationError> {
        let value = value.to_unsigned();
        let count = value.group_count();

        let mut encoded = [0u8; MAX_VARINT_LEN];
        for (byte, index) in encoded.iter_mut().zip((0..count).rev()) {
            *byte = value.group(index);
            if index > 0 {
                *byte |= 0x80;
            }
        }
        self.write_bytes(&encoded[..count])
    }

    /// Writes a usize value as a variable-length integer.
    ///
    /// This is the encoding of every length prefix.
    fn write_usize(&mut self, value: usize) -> Result<(), SerializationError> {
        self.write_varint(value)
    }

    /// Writes the index of the active alternative of a tagged union.
    ///
    /// # Errors
    /// Returns a [SerializationError] if the index cannot be represented in the requested
    /// encoding, or if `self` runs out of capacity.
    fn write_variant_index(
        &mut self,
        index: usize,
        encoding: IndexEncoding,
    ) -> Result<(), SerializationError> {
        match encoding {
            IndexEncoding::VarInt => self.write_usize(index),
            IndexEncoding::Fixed32 => {
                let index = u32::try_from(index).map_err(|_| {
                    SerializationError::ValueOutOfRange { value: index.to_string(), width: 4 }
                })?;
                self.write_fixed::<u32, 4>(index)
            },
        }
    }

    /// Serializes the provided value into `self`.
    fn write<S: Serializable>(&mut self, value: S) -> Result<(), SerializationError> {
        value.write_into(self)
    }

    /// Serializes the provided value into `self` using an external [Adapter].
    fn write_with<A: Adapter<T>, T>(&mut self, value: &T) -> Result<(), SerializationError> {
        A::write_into(value, self)
    }

    /// Serializes all `elements` into `self`, in order and without a length prefix.
    fn write_many<S, T>(&mut self, elements: T) -> Result<(), SerializationError>
    where
        T: IntoIterator<Item = S>,
        S: Serializable,
    {
        for element in elements {
            element.write_into(self)?;
        }
        Ok(())
    }
}

// SLICE WRITER
// ================================================================================================

/// Implements [ByteWriter] trait for a caller-owned, fixed-capacity slice of bytes.
pub struct SliceWriter<'a> {
    target: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceWriter<'a> {
    /// Creates a new slice writer which starts writing at the beginning of `target`.
    pub fn new(target: &'a mut [u8]) -> Self {
        SliceWriter { target, pos: 0 }
    }

    /// Returns the number of bytes which can still be written.
    pub fn remaining(&self) -> usize {
        self.target.len() - self.pos
    }

    /// Returns the bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.target[..self.pos]
    }

    fn check_capacity(&self, num_bytes: usize) -> Result<(), SerializationError> {
        let remaining = self.remaining();
        if num_bytes > remaining {
            return Err(SerializationError::CapacityExceeded { requested: num_bytes, remaining });
        }
        Ok(())
    }
}

impl ByteWriter for SliceWriter<'_> {
    fn write_u8(&mut self, value: u8) -> Result<(), SerializationError> {
        self.check_capacity(1)?;
        self.target[self.pos] = value;
        self.pos += 1;
        Ok(())
    }

    fn write_bytes(&mut self, values: &[u8]) -> Result<(), SerializationError> {
        self.check_capacity(values.len())?;
        self.target[self.pos..self.pos + values.len()].copy_from_slice(values);
        self.pos += values.len();
        Ok(())
    }

    fn position(&self) -> usize {
        self.pos
    }
}

// SIZE COUNTER
// ================================================================================================

/// A [ByteWriter] which stores nothing and only counts the bytes written into it.
///
/// Running a value's regular encode path against a [SizeCounter] yields exactly the number of
/// bytes the value will occupy, which is how [measure](crate::measure) is computed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SizeCounter {
    len: usize,
}

impl SizeCounter {
    /// Returns a counter which has not counted any bytes yet.
    pub fn new() -> Self {
        Self::default()
    }

    fn advance(&mut self, num_bytes: usize) -> Result<(), SerializationError> {
        self.len = self.len.checked_add(num_bytes).ok_or(SerializationError::CapacityExceeded {
            requested: num_bytes,
            remaining: usize::MAX - self.len,
        })?;
        Ok(())
    }
}

impl ByteWriter for SizeCounter {
    fn write_u8(&mut self, _value: u8) -> Result<(), SerializationError> {
        self.advance(1)
    }

    fn write_bytes(&mut self, values: &[u8]) -> Result<(), SerializationError> {
        self.advance(values.len())
    }

    fn position(&self) -> usize {
        self.len
    }
}

// VEC WRITER
// ================================================================================================

impl ByteWriter for Vec<u8> {
    fn write_u8(&mut self, value: u8) -> Result<(), SerializationError> {
        self.push(value);
        Ok(())
    }

    fn write_bytes(&mut self, values: &[u8]) -> Result<(), SerializationError> {
        self.extend_from_slice(values);
        Ok(())
    }

    fn position(&self) -> usize {
        self.len()
    }
}

// TESTS
// ================================================================================================
