//! Signing primitives for both token versions.
//!
//! v007 derives a per-token key from the app certificate:
//!
//! ```text
//! k1  = HMAC-SHA256(key = u32le(issue_ts), msg = app_certificate)
//! key = HMAC-SHA256(key = u32le(salt),     msg = k1)
//! sig = HMAC-SHA256(key = key,             msg = tail)
//! ```
//!
//! v006 signs directly with the certificate as the key.

use crate::error::{Result, TokenError};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Upper bound of generated salts, kept for compatibility with issued tokens
pub const MAX_SALT: u32 = 99_999_999;

/// HMAC-SHA256 returning the raw 32-byte tag
///
/// # Errors
/// Returns `TokenError::SigningFailure` if the MAC rejects the key
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> Result<[u8; 32]> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| TokenError::SigningFailure)?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().into())
}

/// Per-token signing key for v007, wiped when dropped
pub fn derive_signing_key(
    app_certificate: &str,
    issue_ts: u32,
    salt: u32,
) -> Result<Zeroizing<[u8; 32]>> {
    let k1 = Zeroizing::new(hmac_sha256(
        &issue_ts.to_le_bytes(),
        app_certificate.as_bytes(),
    )?);
    Ok(Zeroizing::new(hmac_sha256(&salt.to_le_bytes(), &k1[..])?))
}

/// v007 signature over the packed token tail
pub fn sign_v007(app_certificate: &str, issue_ts: u32, salt: u32, tail: &[u8]) -> Result<[u8; 32]> {
    let key = derive_signing_key(app_certificate, issue_ts, salt)?;
    hmac_sha256(&key[..], tail)
}

/// v006 signature over `app_id ‖ channel_name ‖ uid ‖ message`
pub fn sign_v006(
    app_certificate: &str,
    app_id: &str,
    channel_name: &str,
    uid: &str,
    message: &[u8],
) -> Result<[u8; 32]> {
    let mut input =
        Vec::with_capacity(app_id.len() + channel_name.len() + uid.len() + message.len());
    input.extend_from_slice(app_id.as_bytes());
    input.extend_from_slice(channel_name.as_bytes());
    input.extend_from_slice(uid.as_bytes());
    input.extend_from_slice(message);
    hmac_sha256(app_certificate.as_bytes(), &input)
}

/// CRC-32 (IEEE) as embedded in v006 tokens
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Random salt in `[1, MAX_SALT]` from the thread-local CSPRNG
pub fn generate_salt() -> u32 {
    rand::rng().random_range(1..=MAX_SALT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_rfc4231_case_2() {
        let tag = hmac_sha256(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            hex::encode(tag),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_signing_key_operand_order() {
        let cert = "a".repeat(32);
        let key = derive_signing_key(&cert, 1_000_000_000, 42).unwrap();
        assert_eq!(
            hex::encode(&key[..]),
            "9491a0ea9121951dbbd2d706b18d180656740c7d4a3e68998c331e7d813b9bb9"
        );

        // Swapping issue_ts and salt must change the key
        let swapped = derive_signing_key(&cert, 42, 1_000_000_000).unwrap();
        assert_ne!(&key[..], &swapped[..]);
    }

    #[test]
    fn test_signature_deterministic() {
        let cert = "a".repeat(32);
        let tail = b"some packed tail";
        let first = sign_v007(&cert, 1_000_000_000, 42, tail).unwrap();
        for _ in 0..10 {
            assert_eq!(sign_v007(&cert, 1_000_000_000, 42, tail).unwrap(), first);
        }
        assert_ne!(sign_v007(&cert, 1_000_000_000, 43, tail).unwrap(), first);
    }

    #[test]
    fn test_crc32_known_values() {
        assert_eq!(crc32(b"7d72365eb983485397e3e3f9d460bdda"), 276_646_071);
        assert_eq!(crc32(b"2882341273"), 3_847_331_927);
        assert_eq!(crc32(b""), 0);
    }

    #[test]
    fn test_salt_range() {
        for _ in 0..1000 {
            let salt = generate_salt();
            assert!((1..=MAX_SALT).contains(&salt));
        }
    }
}
