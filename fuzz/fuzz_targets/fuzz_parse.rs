#![no_main]

use agora_token::protocol::AccessToken;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz v007 parsing - test for panics, crashes, infinite loops
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = AccessToken::parse(s);
    }

    // Also feed raw bytes through the compressed body path
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    let _ = AccessToken::parse(&format!("007{}", STANDARD.encode(data)));
});
