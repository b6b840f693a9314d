#![no_main]

use libfuzzer_sys::fuzz_target;
use miden_codec::{
    BudgetedReader, ByteReader, Deserializable, DeserializationError, SliceReader,
    decode_with_budget,
};

fuzz_target!(|data: &[u8]| {
    let Some((&budget, data)) = data.split_first() else {
        return;
    };
    let budget = budget as usize;

    // A budgeted read never consumes more than its budget
    if let Ok((_, consumed)) = decode_with_budget::<Vec<Vec<u32>>>(data, budget) {
        assert!(consumed <= budget);
    }
    if let Ok((_, consumed)) = decode_with_budget::<Vec<String>>(data, budget) {
        assert!(consumed <= budget);
    }

    // Preallocation is bounded by the budget as well as the input
    let reader = BudgetedReader::new(SliceReader::new(data), budget);
    assert!(reader.max_alloc(1) <= budget.min(data.len()));

    // With fewer budget bytes than input bytes the input can never run out first
    if budget < data.len() {
        if let Err(err) = <Vec<u8>>::read_from_bytes_with_budget(data, budget) {
            assert_ne!(err, DeserializationError::UnexpectedEOF);
        }
    }
});
