#![no_main]

use libfuzzer_sys::fuzz_target;
use miden_codec::{Deserializable, Serializable, VarInt, decode};

fuzz_target!(|data: &[u8]| {
    let _ = decode::<VarInt<u8>>(data);
    let _ = decode::<VarInt<i16>>(data);
    let _ = decode::<VarInt<u128>>(data);
    let _ = decode::<usize>(data);
    let _ = decode::<isize>(data);

    // Only minimal encodings decode, so a decoded varint re-encodes to the bytes it came from
    if let Ok((value, consumed)) = decode::<VarInt<u64>>(data) {
        assert!(consumed <= 10);
        let bytes = value.to_bytes().expect("decoded value must encode");
        assert_eq!(bytes, &data[..consumed]);
        assert_eq!(VarInt::<u64>::read_from_bytes(&bytes).ok(), Some(value));
    }

    if let Ok((value, consumed)) = decode::<VarInt<i32>>(data) {
        assert!(consumed <= 5);
        let bytes = value.to_bytes().expect("decoded value must encode");
        assert_eq!(VarInt::<i32>::read_from_bytes(&bytes).ok(), Some(value));
    }
});
