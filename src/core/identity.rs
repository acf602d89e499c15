//! Application credentials and user identifiers.

use crate::error::{constants, Result, TokenError};
use md5::{Digest, Md5};
use rand::Rng;
use std::fmt;

/// Length of an app id or app certificate in hex characters
pub const CREDENTIAL_LEN: usize = 32;

/// Longest user account accepted, in bytes
pub const MAX_ACCOUNT_LEN: usize = 255;

/// Returns true for exactly 32 hexadecimal characters (either case)
pub fn is_credential_format(value: &str) -> bool {
    value.len() == CREDENTIAL_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// App id and certificate issued by the console
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    app_id: String,
    app_certificate: String,
}

impl Credentials {
    /// # Errors
    /// Returns `TokenError::EmptyRequiredField` if either value is blank.
    /// The 32-hex format is checked later at build time.
    pub fn new(app_id: impl Into<String>, app_certificate: impl Into<String>) -> Result<Self> {
        let app_id = app_id.into();
        let app_certificate = app_certificate.into();
        if app_id.trim().is_empty() {
            return Err(TokenError::EmptyRequiredField("appId".into()));
        }
        if app_certificate.trim().is_empty() {
            return Err(TokenError::EmptyRequiredField("appCertificate".into()));
        }
        Ok(Self {
            app_id,
            app_certificate,
        })
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn app_certificate(&self) -> &str {
        &self.app_certificate
    }

    pub fn is_valid_format(&self) -> bool {
        is_credential_format(&self.app_id) && is_credential_format(&self.app_certificate)
    }

    /// Checks both values against the 32-hex rule
    pub fn validate_format(&self) -> Result<()> {
        if !is_credential_format(&self.app_id) {
            return Err(TokenError::InvalidCredentialFormat(
                constants::ERR_INVALID_APP_ID.into(),
            ));
        }
        if !is_credential_format(&self.app_certificate) {
            return Err(TokenError::InvalidCredentialFormat(
                constants::ERR_INVALID_APP_CERTIFICATE.into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_certificate", &"[REDACTED]")
            .finish()
    }
}

/// A user is identified either by a numeric uid or by an account string.
///
/// `Uid(0)` and an empty account both mean "no user" and render as "".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserId {
    Uid(u32),
    Account(String),
}

impl Default for UserId {
    fn default() -> Self {
        UserId::Uid(0)
    }
}

impl UserId {
    /// Accepts any value in `[0, 4294967295]`, 0 meaning no uid.
    ///
    /// # Errors
    /// `TokenError::InvalidAccountId` for negative or too large values.
    pub fn try_uid(value: i64) -> Result<Self> {
        u32::try_from(value)
            .map(UserId::Uid)
            .map_err(|_| TokenError::InvalidAccountId(constants::ERR_UID_RANGE.into()))
    }

    /// Accepts an ASCII account of at most 255 bytes; empty means no account.
    ///
    /// # Errors
    /// `TokenError::InvalidAccountId` if the account is too long or not ASCII.
    pub fn account(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.len() > MAX_ACCOUNT_LEN {
            return Err(TokenError::InvalidAccountId(
                constants::ERR_ACCOUNT_TOO_LONG.into(),
            ));
        }
        if !value.is_ascii() {
            return Err(TokenError::InvalidAccountId(
                constants::ERR_ACCOUNT_NOT_ASCII.into(),
            ));
        }
        Ok(UserId::Account(value))
    }

    /// Numeric uid, or 0 for accounts
    pub fn uid(&self) -> u32 {
        match self {
            UserId::Uid(uid) => *uid,
            UserId::Account(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            UserId::Uid(uid) => *uid == 0,
            UserId::Account(account) => account.is_empty(),
        }
    }

    /// String form packed into tokens: decimal uid, "" for uid 0, or the account
    pub fn as_account_string(&self) -> String {
        match self {
            UserId::Uid(0) => String::new(),
            UserId::Uid(uid) => uid.to_string(),
            UserId::Account(account) => account.clone(),
        }
    }

    /// Lowercase hex MD5 of [`UserId::as_account_string`]
    pub fn hashed_account(&self) -> String {
        hex::encode(Md5::digest(self.as_account_string().as_bytes()))
    }
}

impl From<u32> for UserId {
    fn from(uid: u32) -> Self {
        UserId::Uid(uid)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_account_string())
    }
}

/// Random uid in `[1, 4294967295]`
pub fn generate_uid() -> u32 {
    rand::rng().random_range(1..=u32::MAX)
}
