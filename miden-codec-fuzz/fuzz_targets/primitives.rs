#![no_main]

use libfuzzer_sys::fuzz_target;
use miden_codec::{Deserializable, Serializable, Truncated, decode, measure};

fuzz_target!(|data: &[u8]| {
    // None of these should panic, whatever the input
    let _ = decode::<bool>(data);
    let _ = decode::<char>(data);
    let _ = decode::<(u8, i16, u32, i64, u128)>(data);
    let _ = decode::<(f32, f64)>(data);
    let _ = decode::<Truncated<i64, 5>>(data);
    let _ = decode::<Truncated<u32, 3>>(data);
    let _ = decode::<[u16; 7]>(data);
    let _ = decode::<Option<Option<i32>>>(data);

    // Fixed-width values re-encode to the bytes they were decoded from
    if let Ok((value, consumed)) = decode::<(u32, Truncated<i32, 3>, [i8; 2])>(data) {
        let bytes = value.to_bytes().expect("decoded value must encode");
        assert_eq!(bytes, &data[..consumed]);
    }

    // Any non-zero presence flag decodes as present, so only the size is preserved
    if let Ok((value, consumed)) = decode::<Option<u16>>(data) {
        assert_eq!(measure(&value).expect("decoded value must measure"), consumed);
    }

    // Signed truncation survives a roundtrip for every in-range value
    if let Ok(value) = <i64>::read_from_bytes(data.get(..8).unwrap_or_default()) {
        let truncated = Truncated::<i64, 5>(value >> 24);
        let bytes = truncated.to_bytes().expect("value fits in 5 bytes");
        assert_eq!(Truncated::<i64, 5>::read_from_bytes(&bytes).ok(), Some(truncated));
    }
});
