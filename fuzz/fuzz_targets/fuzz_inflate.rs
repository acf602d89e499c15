#![no_main]

use agora_token::utils::compression::inflate;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary zlib input must fail cleanly or stay under the size cap
    if let Ok(out) = inflate(data) {
        assert!(out.len() <= agora_token::config::MAX_INFLATED_SIZE);
    }
});
