//! Signaling tokens.
//!
//! `"1:" app_id ":" expired_ts ":" md5hex(account ‖ app_id ‖ app_certificate ‖ expired_ts)`

use super::Client;
use crate::error::Result;
use crate::utils::time;
use md5::{Digest, Md5};

const SIGNALING_VERSION: &str = "1";

/// Token for `account`, valid for `valid_seconds` from now
pub fn build_token(client: &Client, account: &str, valid_seconds: u32) -> Result<String> {
    Ok(build_token_at(client, account, time::expires_in(valid_seconds)?))
}

/// Token for `account` expiring at the absolute timestamp `expired_ts`
pub fn build_token_at(client: &Client, account: &str, expired_ts: u32) -> String {
    let credentials = client.credentials();
    let expired_ts = expired_ts.to_string();

    let mut hasher = Md5::new();
    hasher.update(account.as_bytes());
    hasher.update(credentials.app_id().as_bytes());
    hasher.update(credentials.app_certificate().as_bytes());
    hasher.update(expired_ts.as_bytes());
    let digest = hex::encode(hasher.finalize());

    [SIGNALING_VERSION, credentials.app_id(), &expired_ts, &digest].join(":")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builders::tests::client;

    #[test]
    fn test_pinned_token() {
        assert_eq!(
            build_token_at(&client(), "alice", 1_446_455_471),
            "1:970CA35de60c44645bbae8a215061b33:1446455471:495bb66bd6f3689fe783cc9d46fdd1ca"
        );
    }

    #[test]
    fn test_expiry_is_in_the_future() {
        let now = time::current_timestamp().unwrap();
        let token = build_token(&client(), "alice", 60).unwrap();
        let expired: u32 = token.split(':').nth(2).unwrap().parse().unwrap();
        assert!(expired >= now + 60);
    }
}
