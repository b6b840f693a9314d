//! Length-prefixed sequence and string encodings.
//!
//! Every sequence is written as a varint element count followed by its elements in order. Byte
//! strings use the same layout with the UTF-8 bytes as elements.

use alloc::{
    collections::{BTreeMap, BTreeSet},
    string::String,
    vec::Vec,
};

use crate::{
    ByteReader, ByteWriter, Deserializable, DeserializationError, Serializable, SerializationError,
};

// SEQUENCES
// ================================================================================================

impl<T: Serializable> Serializable for [T] {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write_usize(self.len())?;
        target.write_many(self)
    }
}

impl<T: Serializable> Serializable for Vec<T> {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        self.as_slice().write_into(target)
    }
}

impl<T: Deserializable> Deserializable for Vec<T> {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let len = source.read_usize()?;
        read_sequence(source, len)
    }

    fn min_serialized_size() -> usize {
        1
    }
}

/// Reads `len` elements into a vector.
///
/// The length is validated by [ByteReader::read_many_iter] first. The initial reservation is
/// further capped by what the remaining input can back, counting at least one byte per element,
/// so element types without a useful lower bound cannot trigger a huge allocation either.
fn read_sequence<R: ByteReader, T: Deserializable>(
    source: &mut R,
    len: usize,
) -> Result<Vec<T>, DeserializationError> {
    let capacity = len.min(source.max_alloc(T::min_serialized_size().max(1)));

    let mut result = Vec::with_capacity(capacity);
    for element in source.read_many_iter::<T>(len)? {
        result.push(element?);
    }
    Ok(result)
}

// STRINGS
// ================================================================================================

impl Serializable for str {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write_usize(self.len())?;
        target.write_bytes(self.as_bytes())
    }
}

impl Serializable for String {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        self.as_str().write_into(target)
    }
}

impl Deserializable for String {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let len = source.read_usize()?;
        source.read_string(len)
    }

    fn min_serialized_size() -> usize {
        1
    }
}

// ORDERED COLLECTIONS
// ================================================================================================

impl<T: Serializable> Serializable for BTreeSet<T> {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write_usize(self.len())?;
        target.write_many(self)
    }
}

impl<T: Deserializable + Ord> Deserializable for BTreeSet<T> {
    /// Elements must appear in strictly increasing order, which is how they are written.
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let len = source.read_usize()?;

        let mut result = BTreeSet::new();
        for element in source.read_many_iter::<T>(len)? {
            let element = element?;
            if result.last().is_some_and(|last| last >= &element) {
                return Err(DeserializationError::InvalidValue(
                    "set elements are not in strictly increasing order".into(),
                ));
            }
            result.insert(element);
        }
        Ok(result)
    }

    fn min_serialized_size() -> usize {
        1
    }
}

impl<K: Serializable, V: Serializable> Serializable for BTreeMap<K, V> {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write_usize(self.len())?;
        target.write_many(self)
    }
}

impl<K: Deserializable + Ord, V: Deserializable> Deserializable for BTreeMap<K, V> {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let len = source.read_usize()?;

        let mut result = BTreeMap::new();
        for entry in source.read_many_iter::<(K, V)>(len)? {
            let (key, value) = entry?;
            if result.last_key_value().is_some_and(|(last, _)| last >= &key) {
                return Err(DeserializationError::InvalidValue(
                    "map keys are not in strictly increasing order".into(),
                ));
            }
            result.insert(key, value);
        }
        Ok(result)
    }

    fn min_serialized_size() -> usize {
        1
    }
}

// TESTS
// ================================================================================================
