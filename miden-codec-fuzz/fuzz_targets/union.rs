#![no_main]

use libfuzzer_sys::fuzz_target;
use miden_codec::{Serializable, decode, impl_tagged_union};

#[derive(Debug, PartialEq)]
enum Message {
    Ping(()),
    Value(u64),
    Text(String),
    Batch(Vec<u32>),
}

impl_tagged_union!(Message { Ping(()), Value(u64), Text(String), Batch(Vec<u32>) });

#[derive(Debug, PartialEq)]
enum LegacyMessage {
    Ping(()),
    Value(u64),
    Text(String),
}

impl_tagged_union!(fixed32 LegacyMessage { Ping(()), Value(u64), Text(String) });

fuzz_target!(|data: &[u8]| {
    let _ = decode::<Result<u8, String>>(data);

    if let Ok((value, consumed)) = decode::<Message>(data) {
        let bytes = value.to_bytes().expect("decoded value must encode");
        assert_eq!(bytes.len(), consumed);
        assert_eq!(decode::<Message>(&bytes).ok(), Some((value, bytes.len())));
    }

    // The legacy index is fixed-width, so every decoded message is canonical
    if let Ok((value, consumed)) = decode::<LegacyMessage>(data) {
        let bytes = value.to_bytes().expect("decoded value must encode");
        assert_eq!(bytes, &data[..consumed]);
    }
});
