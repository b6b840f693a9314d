use alloc::{string::String, vec, vec::Vec};
use core::fmt::Debug;

use assert_matches::assert_matches;
use proptest::prelude::*;
use rstest::rstest;

use crate::{impl_tagged_union, *};

// HELPERS
// ================================================================================================

/// Encodes `value` into a buffer of exactly the measured size and checks that decoding consumes
/// every byte and reproduces the value.
fn roundtrip<T>(value: &T) -> Vec<u8>
where
    T: Serializable + Deserializable + PartialEq + Debug,
{
    let size = measure(value).unwrap();
    let mut buffer = vec![0u8; size];
    assert_eq!(encode(value, &mut buffer).unwrap(), size);

    let (decoded, consumed) = decode::<T>(&buffer).unwrap();
    assert_eq!(&decoded, value);
    assert_eq!(consumed, size);
    buffer
}

// SCENARIOS
// ================================================================================================

#[test]
fn fixed_width_u32() {
    let bytes = roundtrip(&0x12345678u32);
    assert_eq!(hex::encode(bytes), "12345678");
}

#[test]
fn truncated_i32() {
    let bytes = roundtrip(&Truncated::<i32, 3>(-0x123456));
    assert_eq!(hex::encode(bytes), "edcbaa");
}

#[rstest]
#[case::none(None, "00")]
#[case::some(Some(3), "0100000003")]
fn optional_u32(#[case] value: Option<u32>, #[case] expected: &str) {
    assert_eq!(hex::encode(roundtrip(&value)), expected);
}

#[rstest]
#[case::short("OHAI", 5)]
#[case::empty("", 1)]
#[case::one_byte_prefix_max(&"a".repeat(127), 128)]
#[case::two_byte_prefix_min(&"a".repeat(128), 130)]
#[case::two_byte_prefix(&"a".repeat(255), 257)]
fn string_sizes(#[case] value: &str, #[case] expected_len: usize) {
    assert_eq!(measure(value).unwrap(), expected_len);
    assert_eq!(roundtrip(&String::from(value)).len(), expected_len);
}

#[test]
fn fixed_array() {
    let bytes = roundtrip(&[1u32, 2, 3]);
    assert_eq!(bytes.len(), 12);
}

// TAGGED UNIONS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
enum Reading {
    Byte(u8),
    Word(u32),
}

impl_tagged_union!(Reading { Byte(u8), Word(u32) });

#[derive(Debug, PartialEq)]
enum LegacyReading {
    Byte(u8),
    Word(u32),
}

impl_tagged_union!(fixed32 LegacyReading { Byte(u8), Word(u32) });

#[test]
fn union_sizes_per_index_format() {
    assert_eq!(roundtrip(&Reading::Byte(5)).len(), 2);
    assert_eq!(roundtrip(&Reading::Word(5)).len(), 5);
    assert_eq!(roundtrip(&LegacyReading::Byte(5)).len(), 5);
    assert_eq!(roundtrip(&LegacyReading::Word(5)).len(), 8);
}

#[test]
fn union_formats_do_not_cross_decode() {
    let mut buffer = [0u8; 8];

    let written = encode(&LegacyReading::Word(5), &mut buffer).unwrap();
    let (decoded, consumed) = decode::<Reading>(&buffer[..written]).unwrap();
    assert_ne!(decoded, Reading::Word(5));
    assert_ne!(consumed, written);

    let written = encode(&Reading::Word(5), &mut buffer).unwrap();
    assert_matches!(
        decode::<LegacyReading>(&buffer[..written]),
        Err(DeserializationError::InvalidVariant { .. })
    );
}

// USER-DEFINED TYPES
// ------------------------------------------------------------------------------------------------

/// A record which describes its own layout, field by field.
#[derive(Debug, Clone, PartialEq)]
struct Header {
    version: u8,
    length: u32,
}

impl Serializable for Header {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write(self.version)?;
        target.write(self.length)
    }
}

impl Deserializable for Header {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let version = source.read()?;
        let length = source.read()?;
        Ok(Self { version, length })
    }

    fn min_serialized_size() -> usize {
        5
    }
}

/// The same layout registered from the outside, for a type which does not implement the codec
/// traits itself.
#[derive(Debug, Clone, PartialEq)]
struct ForeignHeader {
    version: u8,
    length: u32,
}

struct ForeignHeaderAdapter;

impl Adapter<ForeignHeader> for ForeignHeaderAdapter {
    fn write_into<W: ByteWriter>(
        value: &ForeignHeader,
        target: &mut W,
    ) -> Result<(), SerializationError> {
        target.write(value.version)?;
        target.write(value.length)
    }

    fn read_from<R: ByteReader>(source: &mut R) -> Result<ForeignHeader, DeserializationError> {
        Ok(ForeignHeader { version: source.read()?, length: source.read()? })
    }

    fn min_serialized_size() -> usize {
        5
    }
}

#[test]
fn self_describing_and_adapted_records_share_a_layout() {
    let own = roundtrip(&Header { version: 1, length: 0x0a0b0c0d });
    let adapted = roundtrip(&Adapted::<ForeignHeaderAdapter, _>::new(ForeignHeader {
        version: 1,
        length: 0x0a0b0c0d,
    }));

    assert_eq!(own.len(), 5);
    assert_eq!(own, adapted);
    assert_eq!(hex::encode(own), "010a0b0c0d");
}

/// A record mixing every encoding, nested to a few levels.
#[derive(Debug, Clone, PartialEq)]
struct Frame {
    header: Header,
    sequence: VarInt<u64>,
    offset: Truncated<i64, 5>,
    flags: [bool; 3],
    scale: f32,
    tags: Vec<(String, Option<char>)>,
}

impl Serializable for Frame {
    fn write_into<W: ByteWriter>(&self, target: &mut W) -> Result<(), SerializationError> {
        target.write(&self.header)?;
        target.write(self.sequence)?;
        target.write(self.offset)?;
        target.write(self.flags)?;
        target.write(self.scale)?;
        target.write(&self.tags)
    }
}

impl Deserializable for Frame {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        Ok(Self {
            header: source.read()?,
            sequence: source.read()?,
            offset: source.read()?,
            flags: source.read()?,
            scale: source.read()?,
            tags: source.read()?,
        })
    }
}

fn sample_frame() -> Frame {
    Frame {
        header: Header { version: 2, length: 77 },
        sequence: VarInt(300),
        offset: Truncated(-5),
        flags: [true, false, true],
        scale: 0.5,
        tags: vec![("a".into(), Some('z')), ("bc".into(), None)],
    }
}

#[test]
fn nested_records_roundtrip() {
    let bytes = roundtrip(&sample_frame());
    // 5 + 2 + 5 + 3 + 4 + (1 + (2 + 5) + (3 + 1))
    assert_eq!(bytes.len(), 31);
}

// ENTRY POINTS
// ================================================================================================

#[test]
fn encode_fails_when_the_buffer_is_too_small() {
    let mut buffer = [0u8; 3];
    assert_matches!(
        encode(&0x12345678u32, &mut buffer),
        Err(SerializationError::CapacityExceeded { requested: 4, remaining: 3 })
    );
    // the failed write did not touch the buffer
    assert_eq!(buffer, [0, 0, 0]);

    // a composite value fails part way through
    let mut buffer = [0u8; 4];
    assert_matches!(
        encode(&(1u8, 2u32), &mut buffer),
        Err(SerializationError::CapacityExceeded { requested: 4, remaining: 3 })
    );
    assert_eq!(buffer[0], 1);
}

#[test]
fn measure_fails_only_for_unrepresentable_values() {
    assert_eq!(measure(&vec![0u8; 1000]).unwrap(), 1002);
    assert_matches!(
        measure(&Truncated::<u32, 2>(0x10000)),
        Err(SerializationError::ValueOutOfRange { width: 2, .. })
    );
}

#[test]
fn decode_reports_bytes_consumed() {
    let buffer = [0x00, 0x07, 0xff, 0xff];
    let (value, consumed) = decode::<u16>(&buffer).unwrap();
    assert_eq!(value, 7);
    assert_eq!(consumed, 2);

    assert_eq!(decode::<u32>(&buffer[..3]).unwrap_err(), DeserializationError::UnexpectedEOF);
}

#[test]
fn decode_with_budget_limits_consumption() {
    let frame = sample_frame();
    let bytes = frame.to_bytes().unwrap();

    let (decoded, consumed) = decode_with_budget::<Frame>(&bytes, bytes.len()).unwrap();
    assert_eq!(decoded, frame);
    assert_eq!(consumed, bytes.len());

    assert_matches!(
        decode_with_budget::<Frame>(&bytes, bytes.len() - 1),
        Err(DeserializationError::BudgetExhausted { .. })
    );
}

#[test]
fn empty_input() {
    assert_eq!(decode::<()>(&[]).unwrap(), ((), 0));
    assert_eq!(decode::<bool>(&[]).unwrap_err(), DeserializationError::UnexpectedEOF);
    assert_eq!(decode::<Vec<u8>>(&[]).unwrap_err(), DeserializationError::UnexpectedEOF);
    assert_eq!(encode(&(), &mut []).unwrap(), 0);
}

#[test]
fn empty_elements_cannot_outnumber_the_fixed_limit() {
    assert_matches!(
        decode::<Vec<()>>(&[0x81, 0x80, 0x80, 0x80, 0x00]),
        Err(DeserializationError::LengthOutOfBounds { len: 268_435_456, max: MAX_EMPTY_ELEMENTS })
    );
    assert_matches!(
        decode::<Vec<((), ())>>(&[0x8f, 0xff, 0xff, 0xff, 0x7f]),
        Err(DeserializationError::LengthOutOfBounds { .. })
    );
    assert_eq!(decode::<Vec<()>>(&[0x03]).unwrap(), (vec![(); 3], 1));
}

#[derive(Debug, PartialEq)]
enum LegacyNote {
    Empty(()),
    Text(String),
}

impl_tagged_union!(fixed32 LegacyNote { Empty(()), Text(String) });

#[test]
fn decoded_values_reencode_to_the_bytes_they_came_from() {
    // length prefixes with a leading empty group are not minimal and never decode
    assert_matches!(
        decode::<LegacyNote>(&[0, 0, 0, 1, 0x80, 0x00]),
        Err(DeserializationError::InvalidValue(_))
    );
    assert_matches!(
        decode::<Vec<(String, u32)>>(&[0x80, 0x00]),
        Err(DeserializationError::InvalidValue(_))
    );

    let data = [0, 0, 0, 1, 0x02, b'h', b'i'];
    let (value, consumed) = decode::<LegacyNote>(&data).unwrap();
    assert_eq!(value, LegacyNote::Text("hi".into()));
    assert_eq!(value.to_bytes().unwrap(), &data[..consumed]);
}

// PROPERTIES
// ================================================================================================

fn arb_reading() -> impl Strategy<Value = Reading> {
    prop_oneof![any::<u8>().prop_map(Reading::Byte), any::<u32>().prop_map(Reading::Word)]
}

proptest! {
    #[test]
    fn scalars_roundtrip(
        a in any::<u64>(),
        b in any::<i128>(),
        c in any::<bool>(),
        d in any::<usize>(),
        e in any::<isize>(),
        f in any::<char>(),
    ) {
        roundtrip(&(a, b, c, d, e, f));
    }

    #[test]
    fn floats_keep_their_bit_pattern(bits in any::<u64>()) {
        let value = f64::from_bits(bits);
        let bytes = value.to_bytes().unwrap();
        let (decoded, _) = decode::<f64>(&bytes).unwrap();
        prop_assert_eq!(decoded.to_bits(), bits);
    }

    #[test]
    fn truncated_values_in_range_roundtrip(value in -(1i64 << 39)..(1i64 << 39)) {
        roundtrip(&Truncated::<i64, 5>(value));
    }

    #[test]
    fn varints_roundtrip(value in any::<i64>()) {
        let bytes = roundtrip(&VarInt(value));
        prop_assert!(bytes.len() <= 10);
    }

    #[test]
    fn unions_and_collections_roundtrip(
        readings in prop::collection::vec(arb_reading(), 0..32),
        labels in prop::collection::btree_map(".{0,8}", any::<Option<i16>>(), 0..8),
    ) {
        roundtrip(&readings);
        roundtrip(&labels);
    }

    #[test]
    fn arbitrary_input_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = decode::<Frame>(&bytes);
        let _ = decode::<Vec<Reading>>(&bytes);
        let _ = decode::<(String, Option<u128>, [i16; 4])>(&bytes);
        let _ = decode_with_budget::<Vec<Vec<u64>>>(&bytes, 32);
    }
}
