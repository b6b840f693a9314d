// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use alloc::{format, string::String, vec::Vec};
use core::marker::PhantomData;

use tracing::{debug, trace};

use crate::{
    Adapter, Deserializable, DeserializationError, IndexEncoding,
    primitives::{FixedWidth, NativeBits, UnsignedVarInt, VarIntEncodable},
};

// CONSTANTS
// ================================================================================================

/// Maximum number of elements a sequence may declare when its elements can occupy zero bytes.
///
/// Such elements consume no input, so the input length cannot bound their count. Sequences of
/// them are allowed this many elements on top of what the remaining input could hold.
pub const MAX_EMPTY_ELEMENTS: usize = 1 << 16;

// BYTE READER TRAIT
// ================================================================================================

/// Defines how primitive values are to be read from `Self`.
///
/// Whenever data is read from the reader using any of the `read_*` functions, the reader advances
/// to the next unread byte. A primitive read which fails does not advance the reader; however,
/// when a composite value fails half way through, the bytes consumed by its earlier parts are not
/// given back.
pub trait ByteReader: Sized {
    // REQUIRED METHODS
    // --------------------------------------------------------------------------------------------

    /// Returns a single byte read from `self`.
    ///
    /// # Errors
    /// Returns a [DeserializationError] error the reader is at EOF.
    fn read_u8(&mut self) -> Result<u8, DeserializationError>;

    /// Returns the next byte to be read from `self` without advancing the reader to the next byte.
    ///
    /// # Errors
    /// Returns a [DeserializationError] error the reader is at EOF.
    fn peek_u8(&self) -> Result<u8, DeserializationError>;

    /// Returns a slice of bytes of the specified length read from `self`.
    ///
    /// # Errors
    /// Returns a [DeserializationError] if a slice of the specified length could not be read
    /// from `self`.
    fn read_slice(&mut self, len: usize) -> Result<&[u8], DeserializationError>;

    /// Returns a byte array of length `N` read from `self`.
    ///
    /// # Errors
    /// Returns a [DeserializationError] if an array of the specified length could not be read
    /// from `self`.
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DeserializationError>;

    /// Checks if it is possible to read at least `num_bytes` bytes from this reader.
    ///
    /// # Errors
    /// Returns an error if, when reading the requested number of bytes, we go beyond the
    /// the data available in the reader.
    fn check_eor(&self, num_bytes: usize) -> Result<(), DeserializationError>;

    /// Returns true if there are more bytes left to be read from `self`.
    fn has_more_bytes(&self) -> bool;

    /// Returns the number of bytes consumed from `self` so far.
    fn position(&self) -> usize;

    /// Returns the maximum number of elements that can be safely allocated, given each
    /// element occupies at least `element_size` bytes when serialized.
    ///
    /// Sequence decoders check declared lengths against this bound before allocating, so a
    /// length prefix claiming billions of elements is rejected up front.
    ///
    /// The default implementation returns `usize::MAX`, meaning no limit is enforced.
    fn max_alloc(&self, _element_size: usize) -> usize {
        usize::MAX
    }

    // PROVIDED METHODS
    // --------------------------------------------------------------------------------------------

    /// Returns a boolean value read from `self` consuming 1 byte from the reader.
    ///
    /// Zero decodes to `false` and any other value decodes to `true`.
    fn read_bool(&mut self) -> Result<bool, DeserializationError> {
        Ok(self.read_u8()? != 0)
    }

    /// Returns an integer read from `N` big-endian bytes.
    ///
    /// Signed integers narrower than their natural width are sign-extended.
    ///
    /// # Errors
    /// Returns a [DeserializationError] if fewer than `N` bytes are left in `self`.
    fn read_fixed<T: FixedWidth, const N: usize>(&mut self) -> Result<T, DeserializationError> {
        const {
            assert!(N > 0 && N <= T::SIZE, "fixed width must be between 1 and the type size");
        }

        let bytes = self.read_array::<N>()?;
        Ok(T::from_truncated_be(&bytes))
    }

    /// Returns a floating point value read from its big-endian bit pattern.
    fn read_native<T: NativeBits>(&mut self) -> Result<T, DeserializationError> {
        let mut bytes = T::Bytes::default();
        let len = bytes.as_ref().len();
        bytes.as_mut().copy_from_slice(self.read_slice(len)?);
        Ok(T::from_wire_bytes(bytes))
    }

    /// Returns an integer read from its variable-length encoding.
    ///
    /// # Errors
    /// Returns a [DeserializationError] if:
    /// * the encoding is truncated.
    /// * the encoded magnitude does not fit into `T`, or the encoding has more groups than any
    ///   value of `T` needs.
    /// * the encoding starts with an empty continuation group (`0x80`), so it is not the
    ///   shortest one.
    fn read_varint<T: VarIntEncodable>(&mut self) -> Result<T, DeserializationError> {
        let overflow =
            DeserializationError::VarIntOverflow { bits: <T::Unsigned as UnsignedVarInt>::BITS };

        let mut value = <T::Unsigned as UnsignedVarInt>::ZERO;
        let mut num_groups = 0;
        loop {
            if num_groups == <T::Unsigned as UnsignedVarInt>::MAX_GROUPS {
                return Err(overflow);
            }
            let byte = self.read_u8()?;
            if num_groups == 0 && byte == 0x80 {
                return Err(DeserializationError::InvalidValue(
                    "variable-length integer is not minimally encoded".into(),
                ));
            }
            value = value.push_group(byte).ok_or_else(|| overflow.clone())?;
            num_groups += 1;

            if byte & 0x80 == 0 {
                return Ok(T::from_unsigned(value));
            }
        }
    }

    /// Returns a usize value read from its variable-length encoding.
    ///
    /// # Errors
    /// Returns a [DeserializationError] if the encoded value is greater than `usize` maximum
    /// value on a given platform.
    fn read_usize(&mut self) -> Result<usize, DeserializationError> {
        self.read_varint()
    }

    /// Returns the index of the active alternative of a tagged union with `count` alternatives.
    ///
    /// # Errors
    /// Returns [DeserializationError::InvalidVariant] if the index read is not in `0..count`.
    fn read_variant_index(
        &mut self,
        count: usize,
        encoding: IndexEncoding,
    ) -> Result<usize, DeserializationError> {
        let index = match encoding {
            IndexEncoding::VarInt => self.read_usize()?,
            IndexEncoding::Fixed32 => self.read_fixed::<u32, 4>()? as usize,
        };
        if index >= count {
            return Err(DeserializationError::InvalidVariant { index, count });
        }
        Ok(index)
    }

    /// Returns a byte vector of the specified length read from `self`.
    ///
    /// # Errors
    /// Returns a [DeserializationError] if a vector of the specified length could not be read
    /// from `self`.
    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, DeserializationError> {
        let data = self.read_slice(len)?;
        Ok(data.to_vec())
    }

    /// Returns a String of the specified length read from `self`.
    ///
    /// # Errors
    /// Returns a [DeserializationError] if a String of the specified length could not be read
    /// from `self`, or if the bytes are not valid UTF-8.
    fn read_string(&mut self, num_bytes: usize) -> Result<String, DeserializationError> {
        let data = self.read_vec(num_bytes)?;
        String::from_utf8(data).map_err(|err| DeserializationError::InvalidValue(format!("{err}")))
    }

    /// Reads a deserializable value from `self`.
    ///
    /// # Errors
    /// Returns a [DeserializationError] if the specified value could not be read from `self`.
    fn read<D: Deserializable>(&mut self) -> Result<D, DeserializationError> {
        D::read_from(self)
    }

    /// Reads a value of type `T` from `self` using an external [Adapter].
    fn read_with<A: Adapter<T>, T>(&mut self) -> Result<T, DeserializationError> {
        A::read_from(self)
    }

    /// Returns an iterator that deserializes `num_elements` instances of `D` from this reader.
    ///
    /// The requested count is validated against the reader's capacity before the iterator is
    /// returned. Each element is then deserialized lazily as the iterator is consumed.
    ///
    /// # Errors
    /// Returns [DeserializationError::LengthOutOfBounds] if `num_elements` exceeds
    /// `self.max_alloc(D::min_serialized_size())`. For elements whose minimum size is zero the
    /// bound is `self.max_alloc(1)`, raised to at least [MAX_EMPTY_ELEMENTS].
    fn read_many_iter<D: Deserializable>(
        &mut self,
        num_elements: usize,
    ) -> Result<ReadManyIter<'_, Self, D>, DeserializationError> {
        let max_elements = match D::min_serialized_size() {
            0 => self.max_alloc(1).max(MAX_EMPTY_ELEMENTS),
            size => self.max_alloc(size),
        };
        if num_elements > max_elements {
            debug!(
                position = self.position(),
                len = num_elements,
                max = max_elements,
                "rejected sequence length"
            );
            return Err(DeserializationError::LengthOutOfBounds {
                len: num_elements,
                max: max_elements,
            });
        }
        Ok(ReadManyIter {
            reader: self,
            remaining: num_elements,
            _item: PhantomData,
        })
    }
}

// READ MANY ITERATOR
// ================================================================================================

/// Iterator that lazily deserializes elements from a [`ByteReader`].
///
/// Created by [`ByteReader::read_many_iter`]. Each call to `next()` deserializes one element.
pub struct ReadManyIter<'reader, R: ByteReader, D: Deserializable> {
    reader: &'reader mut R,
    remaining: usize,
    _item: PhantomData<D>,
}

impl<R: ByteReader, D: Deserializable> Iterator for ReadManyIter<'_, R, D> {
    type Item = Result<D, DeserializationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining > 0 {
            self.remaining -= 1;
            Some(D::read_from(self.reader))
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<R: ByteReader, D: Deserializable> ExactSizeIterator for ReadManyIter<'_, R, D> {}

// SLICE READER
// ================================================================================================

/// Implements [ByteReader] trait for a slice of bytes.
pub struct SliceReader<'a> {
    source: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    /// Creates a new slice reader from the specified slice.
    pub fn new(source: &'a [u8]) -> Self {
        SliceReader { source, pos: 0 }
    }

    /// Returns the number of bytes left to be read.
    pub fn remaining(&self) -> usize {
        self.source.len() - self.pos
    }
}

impl ByteReader for SliceReader<'_> {
    fn read_u8(&mut self) -> Result<u8, DeserializationError> {
        self.check_eor(1)?;
        let result = self.source[self.pos];
        self.pos += 1;
        Ok(result)
    }

    fn peek_u8(&self) -> Result<u8, DeserializationError> {
        self.check_eor(1)?;
        Ok(self.source[self.pos])
    }

    fn read_slice(&mut self, len: usize) -> Result<&[u8], DeserializationError> {
        self.check_eor(len)?;
        let result = &self.source[self.pos..self.pos + len];
        self.pos += len;
        Ok(result)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DeserializationError> {
        self.check_eor(N)?;
        let mut result = [0_u8; N];
        result.copy_from_slice(&self.source[self.pos..self.pos + N]);
        self.pos += N;
        Ok(result)
    }

    fn check_eor(&self, num_bytes: usize) -> Result<(), DeserializationError> {
        if num_bytes > self.remaining() {
            return Err(DeserializationError::UnexpectedEOF);
        }
        Ok(())
    }

    fn has_more_bytes(&self) -> bool {
        self.pos < self.source.len()
    }

    fn position(&self) -> usize {
        self.pos
    }

    /// A slice cannot hold more elements than its remaining bytes can encode.
    fn max_alloc(&self, element_size: usize) -> usize {
        if element_size == 0 {
            return usize::MAX;
        }
        self.remaining() / element_size
    }
}

// BUDGETED READER
// ================================================================================================

/// A reader wrapper that enforces a byte budget during deserialization.
///
/// Every byte consumed through the wrapper is charged against the budget, and reads which would
/// exceed it fail with [DeserializationError::BudgetExhausted]. The remaining budget also bounds
/// [`max_alloc`](ByteReader::max_alloc), which sequence decoders check before allocating.
///
/// ```
/// use miden_codec::{BudgetedReader, ByteReader, ByteWriter, Deserializable, SliceReader};
///
/// // a length prefix claiming one million u64 values, followed by 1 KiB of data
/// let mut data = Vec::new();
/// data.write_usize(1_000_000).unwrap();
/// data.write_bytes(&[0; 1024]).unwrap();
///
/// // the budget bounds allocations more tightly than the input does
/// assert_eq!(SliceReader::new(&data).max_alloc(8), 128);
/// let reader = BudgetedReader::new(SliceReader::new(&data), 64);
/// assert_eq!(reader.max_alloc(8), 8);
///
/// assert!(Vec::<u64>::read_from_bytes_with_budget(&data, 64).is_err());
/// ```
pub struct BudgetedReader<R> {
    inner: R,
    remaining: usize,
}

impl<R> BudgetedReader<R> {
    /// Wraps a reader with the specified byte budget.
    pub fn new(inner: R, budget: usize) -> Self {
        Self { inner, remaining: budget }
    }

    /// Returns remaining budget in bytes.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Unwraps the inner reader, discarding the remaining budget.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn check_budget(&self, n: usize) -> Result<(), DeserializationError> {
        if n > self.remaining {
            trace!(requested = n, remaining = self.remaining, "read budget exhausted");
            return Err(DeserializationError::BudgetExhausted {
                requested: n,
                remaining: self.remaining,
            });
        }
        Ok(())
    }
}

impl<R: ByteReader> ByteReader for BudgetedReader<R> {
    fn read_u8(&mut self) -> Result<u8, DeserializationError> {
        self.check_budget(1)?;
        let byte = self.inner.read_u8()?;
        self.remaining -= 1;
        Ok(byte)
    }

    fn peek_u8(&self) -> Result<u8, DeserializationError> {
        // peek doesn't consume budget since it doesn't advance the reader
        self.inner.peek_u8()
    }

    fn read_slice(&mut self, len: usize) -> Result<&[u8], DeserializationError> {
        self.check_budget(len)?;
        let slice = self.inner.read_slice(len)?;
        self.remaining -= len;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DeserializationError> {
        self.check_budget(N)?;
        let array = self.inner.read_array()?;
        self.remaining -= N;
        Ok(array)
    }

    fn check_eor(&self, num_bytes: usize) -> Result<(), DeserializationError> {
        self.check_budget(num_bytes)?;
        self.inner.check_eor(num_bytes)
    }

    fn has_more_bytes(&self) -> bool {
        self.remaining > 0 && self.inner.has_more_bytes()
    }

    fn position(&self) -> usize {
        self.inner.position()
    }

    fn max_alloc(&self, element_size: usize) -> usize {
        if element_size == 0 {
            return self.inner.max_alloc(element_size);
        }
        (self.remaining / element_size).min(self.inner.max_alloc(element_size))
    }
}

// TESTS
// ================================================================================================
