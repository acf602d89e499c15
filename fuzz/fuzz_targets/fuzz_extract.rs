#![no_main]

use agora_token::core::identity::UserId;
use agora_token::protocol::AccessTokenLegacy;
use libfuzzer_sys::fuzz_target;

const APP_ID: &str = "970CA35de60c44645bbae8a215061b33";

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = AccessTokenLegacy::extract(s, "cert", "channel", &UserId::Uid(1));
    }

    use base64::{engine::general_purpose::STANDARD, Engine as _};
    let token = format!("006{APP_ID}{}", STANDARD.encode(data));
    let _ = AccessTokenLegacy::extract(&token, "cert", "channel", &UserId::Uid(1));
});
