use alloc::string::String;

use thiserror::Error;

// DESERIALIZATION ERROR
// ================================================================================================

/// Defines errors which can occur while decoding a value from bytes.
///
/// When a decode fails, no value is produced. The reader is left wherever the failing operation
/// stopped and should not be reused for the same message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeserializationError {
    /// The input ended before the value was fully decoded.
    #[error("unexpected end of data")]
    UnexpectedEOF,
    /// A tagged union carried an index outside of its set of alternatives.
    #[error("variant index {index} is out of range for a union of {count} alternatives")]
    InvalidVariant { index: usize, count: usize },
    /// A variable-length integer encodes a magnitude wider than its destination.
    #[error("variable-length integer does not fit into {bits} bits")]
    VarIntOverflow { bits: u32 },
    /// A length prefix declares more elements than the remaining input can hold.
    #[error("length prefix of {len} elements exceeds the {max} elements the input can hold")]
    LengthOutOfBounds { len: usize, max: usize },
    /// A budgeted reader ran out of budget.
    #[error("read budget exhausted: requested {requested} bytes, {remaining} remaining")]
    BudgetExhausted { requested: usize, remaining: usize },
    /// The bytes were read successfully but do not describe a valid value.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

// SERIALIZATION ERROR
// ================================================================================================

/// Defines errors which can occur while encoding a value into bytes.
///
/// Bytes written before the failure remain in the target and must be discarded by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializationError {
    /// The target buffer is too small for the encoded value.
    #[error("write of {requested} bytes exceeds the remaining capacity of {remaining} bytes")]
    CapacityExceeded { requested: usize, remaining: usize },
    /// An integer does not fit into the number of bytes chosen for it.
    #[error("value {value} does not fit into {width} bytes")]
    ValueOutOfRange { value: String, width: usize },
}
