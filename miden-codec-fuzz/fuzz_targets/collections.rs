#![no_main]

use std::collections::{BTreeMap, BTreeSet};

use libfuzzer_sys::fuzz_target;
use miden_codec::{Serializable, decode};

fuzz_target!(|data: &[u8]| {
    // Hostile length prefixes must fail without allocating for the claimed length
    let _ = decode::<Vec<u8>>(data);
    let _ = decode::<Vec<u64>>(data);
    let _ = decode::<Vec<()>>(data);
    let _ = decode::<Vec<Vec<u32>>>(data);
    let _ = decode::<Vec<Option<String>>>(data);
    let _ = decode::<String>(data);
    let _ = decode::<BTreeSet<u16>>(data);
    let _ = decode::<BTreeMap<String, Vec<i8>>>(data);

    if let Ok((value, consumed)) = decode::<Vec<(String, u32)>>(data) {
        let bytes = value.to_bytes().expect("decoded value must encode");
        assert_eq!(bytes.len(), consumed);
    }

    // Ordered collections only accept strictly increasing keys
    if let Ok((value, consumed)) = decode::<BTreeMap<u16, bool>>(data) {
        let bytes = value.to_bytes().expect("decoded value must encode");
        assert_eq!(bytes.len(), consumed);
        assert!(value.keys().zip(value.keys().skip(1)).all(|(a, b)| a < b));
    }
});
