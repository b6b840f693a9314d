use crate::{
    ByteReader, ByteWriter, Deserializable, DeserializationError, Serializable, SerializationError,
};

// INDEX ENCODING
// ================================================================================================

/// Wire encoding of the index which identifies the active alternative of a tagged union.
///
/// The two encodings are not compatible with each other, and nothing on the wire says which one
/// was used. Every union type commits to one of them when it is declared with
/// [impl_tagged_union](crate::impl_tagged_union).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexEncoding {
    /// The index is a variable-length integer. This is the current format.
    #[default]
    VarInt,
    /// The index is a 4-byte big-endian integer. This is the legacy format.
    Fixed32,
}

impl IndexEncoding {
    /// Returns the number of bytes the smallest index occupies in this encoding.
    pub const fn min_encoded_len(self) -> usize {
        match self {
            Self::VarInt => 1,
            Self::Fixed32 => 4,
        }
    }
}

// TAGGED UNION MACRO
// ================================================================================================

/// Implements [Serializable](crate::Serializable) and [Deserializable](crate::Deserializable)
/// for an enum whose variants each hold exactly one value.
///
/// A union is written as the index of its active variant, in declaration order starting at 0,
/// followed by the variant's value. The index is a varint by default; prefix the enum name
/// with `fixed32` to use the legacy 4-byte index instead.
///
/// ```
/// use miden_codec::{Deserializable, Serializable, impl_tagged_union};
///
/// #[derive(Debug, PartialEq)]
/// enum Reading {
///     Byte(u8),
///     Word(u32),
/// }
///
/// impl_tagged_union!(Reading { Byte(u8), Word(u32) });
///
/// let bytes = Reading::Word(5).to_bytes().unwrap();
/// assert_eq!(bytes, [0x01, 0x00, 0x00, 0x00, 0x05]);
/// assert_eq!(Reading::read_from_bytes(&bytes).unwrap(), Reading::Word(5));
/// ```
#[macro_export]
macro_rules! impl_tagged_union {
    (fixed32 $name:ident { $($variant:ident($ty:ty)),+ $(,)? }) => {
        $crate::impl_tagged_union!(
            @impl $name, $crate::IndexEncoding::Fixed32, { $($variant($ty)),+ }
        );
    };
    ($name:ident { $($variant:ident($ty:ty)),+ $(,)? }) => {
        $crate::impl_tagged_union!(
            @impl $name, $crate::IndexEncoding::VarInt, { $($variant($ty)),+ }
        );
    };
    (@impl $name:ident, $encoding:expr, { $($variant:ident($ty:ty)),+ }) => {
        impl $crate::Serializable for $name {
            fn write_into<W: $crate::ByteWriter>(
                &self,
                target: &mut W,
            ) -> ::core::result::Result<(), $crate::SerializationError> {
                #[allow(dead_code)]
                enum Index { $($variant),+ }

                match self {
                    $(
                        $name::$variant(value) => {
                            target.write_variant_index(Index::$variant as usize, $encoding)?;
                            $crate::Serializable::write_into(value, target)
                        },
                    )+
                }
            }
        }

        impl $crate::Deserializable for $name {
            fn read_from<R: $crate::ByteReader>(
                source: &mut R,
            ) -> ::core::result::Result<Self, $crate::DeserializationError> {
                #[allow(dead_code)]
                enum Index { $($variant),+ }
                const COUNT: usize = [$(stringify!($variant)),+].len();

                let index = source.read_variant_index(COUNT, $encoding)?;
                $(
                    if index == Index::$variant as usize {
                        return <$ty as $crate::Deserializable>::read_from(source)
                            .map($name::$variant);
                    }
                )+
                Err($crate::DeserializationError::InvalidVariant { index, count: COUNT })
            }

            fn min_serialized_size() -> usize {
                $encoding.min_encoded_len()
            }
        }
    };
}

// RESULT
// ================================================================================================

impl<T: Serializable, E: Serializable> Serializable for Result<T, E> {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        match self {
            Ok(value) => {
                target.write_variant_index(0, IndexEncoding::VarInt)?;
                value.write_into(target)
            },
            Err(err) => {
                target.write_variant_index(1, IndexEncoding::VarInt)?;
                err.write_into(target)
            },
        }
    }
}

impl<T: Deserializable, E: Deserializable> Deserializable for Result<T, E> {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        match source.read_variant_index(2, IndexEncoding::VarInt)? {
            0 => T::read_from(source).map(Ok),
            _ => E::read_from(source).map(Err),
        }
    }

    fn min_serialized_size() -> usize {
        IndexEncoding::VarInt.min_encoded_len()
    }
}

// TESTS
// ================================================================================================
