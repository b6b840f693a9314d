//! Encoding strategies registered outside of the value type.
//!
//! A type that cannot implement [Serializable] and [Deserializable] itself (because it is
//! defined in another crate, or because it needs more than one wire format) gets an [Adapter]
//! instead. A field declared as [`Adapted<A, T>`] is encoded by `A`; a field declared as `T` is
//! encoded by `T`'s own implementation. The declared type therefore selects exactly one strategy.
//!
//! ```
//! use core::time::Duration;
//!
//! use miden_codec::{
//!     Adapted, Adapter, ByteReader, ByteWriter, Deserializable, DeserializationError,
//!     Serializable, SerializationError,
//! };
//!
//! struct Millis;
//!
//! impl Adapter<Duration> for Millis {
//!     fn write_into<W: ByteWriter>(
//!         value: &Duration,
//!         target: &mut W,
//!     ) -> Result<(), SerializationError> {
//!         target.write_varint(value.as_millis() as u64)
//!     }
//!
//!     fn read_from<R: ByteReader>(source: &mut R) -> Result<Duration, DeserializationError> {
//!         source.read_varint::<u64>().map(Duration::from_millis)
//!     }
//! }
//!
//! let timeout = Adapted::<Millis, _>::new(Duration::from_millis(1500));
//! let bytes = timeout.to_bytes().unwrap();
//! assert_eq!(bytes, [0x8b, 0x5c]);
//! assert_eq!(Adapted::<Millis, Duration>::read_from_bytes(&bytes).unwrap(), timeout);
//! ```

use core::{fmt, marker::PhantomData, ops::Deref};

use crate::{
    ByteReader, ByteWriter, Deserializable, DeserializationError, Serializable, SerializationError,
};

// ADAPTER TRAIT
// ================================================================================================

/// An encoding strategy for values of type `T`, defined outside of `T`.
pub trait Adapter<T> {
    /// Serializes `value` into the `target`.
    fn write_into<W: ByteWriter>(value: &T, target: &mut W) -> Result<(), SerializationError>;

    /// Reads a value of type `T` from the `source`.
    fn read_from<R: ByteReader>(source: &mut R) -> Result<T, DeserializationError>;

    /// Returns a lower bound on the number of bytes a value occupies in this encoding.
    fn min_serialized_size() -> usize {
        0
    }
}

// ADAPTED VALUE
// ================================================================================================

/// A value of type `T` which is serialized through the [Adapter] `A`.
pub struct Adapted<A, T> {
    value: T,
    _adapter: PhantomData<fn() -> A>,
}

impl<A, T> Adapted<A, T> {
    /// Wraps `value` so that it is serialized through `A`.
    pub fn new(value: T) -> Self {
        Self { value, _adapter: PhantomData }
    }

    /// Returns a reference to the wrapped value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Unwraps the value, discarding the adapter.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<A, T> Deref for Adapted<A, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<A, T> From<T> for Adapted<A, T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

// `A` is a marker type, so these impls place no bounds on it
impl<A, T: fmt::Debug> fmt::Debug for Adapted<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Adapted").field(&self.value).finish()
    }
}

impl<A, T: Clone> Clone for Adapted<A, T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<A, T: PartialEq> PartialEq for Adapted<A, T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<A, T: Eq> Eq for Adapted<A, T> {}

impl<A: Adapter<T>, T> Serializable for Adapted<A, T> {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        A::write_into(&self.value, target)
    }
}

impl<A: Adapter<T>, T> Deserializable for Adapted<A, T> {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        A::read_from(source).map(Self::new)
    }

    fn min_serialized_size() -> usize {
        A::min_serialized_size()
    }
}

// TESTS
// ================================================================================================
