#![no_main]
use libfuzzer_sys::fuzz_target;
use lzwtst::{Decoder, Encoder, ResetPolicy};

fuzz_target!(|data: &[u8]| {
    for &policy in &[ResetPolicy::Freeze, ResetPolicy::Reset] {
        let mut encoder = Encoder::with_policy(policy);
        let compressed = encoder.encode(data).expect("encoding into memory can not fail");

        let mut decoder = Decoder::new();
        let result = decoder.decode(&compressed);
        assert!(result.is_ok(), "{:?}", result);
        assert!(result.unwrap() == data);
    }
});
