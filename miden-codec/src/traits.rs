use alloc::{boxed::Box, format, vec::Vec};

use crate::{
    BudgetedReader, ByteReader, ByteWriter, DeserializationError, SerializationError, SizeCounter,
    SliceReader,
};

// SERIALIZABLE TRAIT
// ================================================================================================

/// Defines how to serialize `Self` into bytes.
pub trait Serializable {
    // REQUIRED METHODS
    // --------------------------------------------------------------------------------------------

    /// Serializes `self` into bytes and writes these bytes into the `target`.
    ///
    /// # Errors
    /// Returns a [SerializationError] if the target runs out of capacity, or if a part of `self`
    /// cannot be represented in the encoding chosen for it.
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError>;

    // PROVIDED METHODS
    // --------------------------------------------------------------------------------------------

    /// Serializes `self` into a vector of bytes.
    ///
    /// The vector is allocated once, with exactly the capacity the encoding needs.
    fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        let mut result = Vec::with_capacity(self.serialized_size()?);
        self.write_into(&mut result)?;
        Ok(result)
    }

    /// Returns the number of bytes `self` occupies when serialized.
    ///
    /// The size is computed by running the regular encode path against a [SizeCounter], so it
    /// always agrees with what [Self::write_into] produces.
    fn serialized_size(&self) -> Result<usize, SerializationError> {
        let mut counter = SizeCounter::new();
        self.write_into(&mut counter)?;
        Ok(counter.position())
    }
}

impl<T: Serializable + ?Sized> Serializable for &T {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        (*self).write_into(target)
    }
}

impl<T: Serializable + ?Sized> Serializable for Box<T> {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        self.as_ref().write_into(target)
    }
}

impl Serializable for () {
    fn write_into<W: ByteWriter>(&self, _target: &mut W) -> Result<(), SerializationError> {
        Ok(())
    }
}

impl Serializable for bool {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write_bool(*self)
    }
}

impl Serializable for char {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write_fixed::<u32, 4>(*self as u32)
    }
}

impl<T: Serializable> Serializable for Option<T> {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        match self {
            Some(v) => {
                target.write_bool(true)?;
                v.write_into(target)
            },
            None => target.write_bool(false),
        }
    }
}

impl<T: Serializable, const N: usize> Serializable for [T; N] {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write_many(self)
    }
}

// DESERIALIZABLE TRAIT
// ================================================================================================

/// Defines how to deserialize `Self` from bytes.
pub trait Deserializable: Sized {
    // REQUIRED METHODS
    // --------------------------------------------------------------------------------------------

    /// Reads a sequence of bytes from the provided `source`, attempts to deserialize these bytes
    /// into `Self`, and returns the result.
    ///
    /// # Errors
    /// Returns an error if:
    /// * The `source` does not contain enough bytes to deserialize `Self`.
    /// * Bytes read from the `source` do not represent a valid value for `Self`.
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError>;

    // PROVIDED METHODS
    // --------------------------------------------------------------------------------------------

    /// Returns a lower bound on the number of bytes any serialized value of `Self` occupies.
    ///
    /// Sequence decoders divide the remaining input by this bound to reject implausible length
    /// prefixes before allocating. The default of 0 disables that check; types which always
    /// occupy at least one byte should override it.
    fn min_serialized_size() -> usize {
        0
    }

    /// Attempts to deserialize the provided `bytes` into `Self` and returns the result.
    ///
    /// Bytes following the value are ignored.
    ///
    /// # Errors
    /// Returns an error if:
    /// * The `bytes` do not contain enough information to deserialize `Self`.
    /// * The `bytes` do not represent a valid value for `Self`.
    fn read_from_bytes(bytes: &[u8]) -> Result<Self, DeserializationError> {
        Self::read_from(&mut SliceReader::new(bytes))
    }

    /// Deserializes `Self` from bytes, consuming at most `budget` of them.
    ///
    /// Besides capping the bytes read, the budget bounds how many elements a sequence may
    /// preallocate; see [BudgetedReader].
    ///
    /// # Errors
    /// Returns an error if the budget is exhausted or if the bytes do not represent a valid
    /// value for `Self`.
    fn read_from_bytes_with_budget(
        bytes: &[u8],
        budget: usize,
    ) -> Result<Self, DeserializationError> {
        Self::read_from(&mut BudgetedReader::new(SliceReader::new(bytes), budget))
    }
}

impl<T: Deserializable> Deserializable for Box<T> {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        T::read_from(source).map(Box::new)
    }

    fn min_serialized_size() -> usize {
        T::min_serialized_size()
    }
}

impl Deserializable for () {
    fn read_from<R: ByteReader>(_source: &mut R) -> Result<Self, DeserializationError> {
        Ok(())
    }
}

impl Deserializable for bool {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        source.read_bool()
    }

    fn min_serialized_size() -> usize {
        1
    }
}

impl Deserializable for char {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let value = source.read_fixed::<u32, 4>()?;
        char::from_u32(value).ok_or_else(|| {
            DeserializationError::InvalidValue(format!("{value:#x} is not a unicode scalar value"))
        })
    }

    fn min_serialized_size() -> usize {
        4
    }
}

impl<T: Deserializable> Deserializable for Option<T> {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        if source.read_bool()? { Ok(Some(T::read_from(source)?)) } else { Ok(None) }
    }

    fn min_serialized_size() -> usize {
        1
    }
}

impl<T: Deserializable, const N: usize> Deserializable for [T; N] {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let mut result = Vec::with_capacity(N);
        for _ in 0..N {
            result.push(T::read_from(source)?);
        }

        // the vector holds exactly N elements at this point
        result.try_into().map_err(|_| {
            DeserializationError::InvalidValue(format!("failed to collect {N} array elements"))
        })
    }

    fn min_serialized_size() -> usize {
        N.saturating_mul(T::min_serialized_size())
    }
}

// INTEGERS AND FLOATS
// ================================================================================================

macro_rules! impl_fixed_width_integer {
    ($($ty:ty),*) => {
        $(
            impl Serializable for $ty {
                fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
                    target.write_fixed::<$ty, { core::mem::size_of::<$ty>() }>(*self)
                }
            }

            impl Deserializable for $ty {
                fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
                    source.read_fixed::<$ty, { core::mem::size_of::<$ty>() }>()
                }

                fn min_serialized_size() -> usize {
                    core::mem::size_of::<$ty>()
                }
            }
        )*
    };
}

impl_fixed_width_integer!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

// pointer-sized integers have no portable width, so they travel as varints
macro_rules! impl_pointer_sized_integer {
    ($($ty:ty),*) => {
        $(
            impl Serializable for $ty {
                fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
                    target.write_varint(*self)
                }
            }

            impl Deserializable for $ty {
                fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
                    source.read_varint()
                }

                fn min_serialized_size() -> usize {
                    1
                }
            }
        )*
    };
}

impl_pointer_sized_integer!(usize, isize);

macro_rules! impl_float {
    ($($ty:ty),*) => {
        $(
            impl Serializable for $ty {
                fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
                    target.write_native(*self)
                }
            }

            impl Deserializable for $ty {
                fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
                    source.read_native()
                }

                fn min_serialized_size() -> usize {
                    core::mem::size_of::<$ty>()
                }
            }
        )*
    };
}

impl_float!(f32, f64);

// TUPLES
// ================================================================================================

macro_rules! impl_tuple {
    ($($name:ident),+) => {
        impl<$($name: Serializable),+> Serializable for ($($name,)+) {
            #[allow(non_snake_case)]
            fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
                let ($($name,)+) = self;
                $($name.write_into(target)?;)+
                Ok(())
            }
        }

        impl<$($name: Deserializable),+> Deserializable for ($($name,)+) {
            fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
                Ok(($($name::read_from(source)?,)+))
            }

            fn min_serialized_size() -> usize {
                0usize $(.saturating_add($name::min_serialized_size()))+
            }
        }
    };
}

impl_tuple!(A);
impl_tuple!(A, B);
impl_tuple!(A, B, C);
impl_tuple!(A, B, C, D);
impl_tuple!(A, B, C, D, E);
impl_tuple!(A, B, C, D, E, F);

// TESTS
// ================================================================================================
