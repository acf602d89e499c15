//! # Error Types
//!
//! Error handling for token building and parsing.
//!
//! Every operation in this crate is a deterministic computation over caller
//! supplied values, so an error always means bad input and is never worth
//! retrying.
//!
//! ## Error Categories
//! - **Input Errors**: credentials, account ids, blank required fields
//! - **Format Errors**: truncated buffers, unknown service tags, wrong version prefix
//! - **Encoding Errors**: strings or maps too long for their 16-bit length prefix
//! - **Compression Errors**: deflate/inflate failures, size limit violations
//!
//! ## Example Usage
//! ```rust
//! use agora_token::error::{TokenError, Result};
//! use agora_token::protocol::AccessToken;
//! use tracing::{info, error};
//!
//! fn app_id_of(token: &str) -> Result<String> {
//!     Ok(AccessToken::parse(token)?.app_id)
//! }
//!
//! fn main() {
//!     match app_id_of("006not-a-v007-token") {
//!         Ok(app_id) => info!(app_id, "Parsed token"),
//!         Err(e) => error!(error=%e, "Error parsing token"),
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Credential errors
    pub const ERR_INVALID_APP_ID: &str = "appId must be a 32 character hexadecimal string";
    pub const ERR_INVALID_APP_CERTIFICATE: &str =
        "appCertificate must be a 32 character hexadecimal string";

    /// Account errors
    pub const ERR_UID_RANGE: &str = "The UID value must be an integer in the range [1,4294967295]";
    pub const ERR_ACCOUNT_TOO_LONG: &str =
        "The User account length exceeds the maximum allowed [255] characters";
    pub const ERR_ACCOUNT_NOT_ASCII: &str = "The User account must contain only ASCII characters";

    /// Buffer errors
    pub const ERR_BUFFER_UNDERRUN: &str = "Not enough bytes remaining";
    pub const ERR_INVALID_UTF8: &str = "String field is not valid UTF-8";
    pub const ERR_INVALID_BASE64: &str = "Token body is not valid base64";
    pub const ERR_TRUNCATED_TOKEN: &str = "Token is shorter than its fixed-size header";

    /// System errors
    pub const ERR_SYSTEM_TIME: &str = "System time error: time went backwards";
}

/// TokenError is the error type for all token operations
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum TokenError {
    #[error("I/O error: {0}")]
    #[serde(skip_serializing, skip_deserializing)]
    Io(#[from] io::Error),

    #[error("Invalid credential format: {0}")]
    InvalidCredentialFormat(String),

    #[error("Invalid account id: {0}")]
    InvalidAccountId(String),

    #[error("Malformed data: {0}")]
    MalformedData(String),

    #[error("Unknown service type: {0}")]
    UnknownServiceType(u16),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },

    #[error("Value too long for a 16-bit length prefix: {0}")]
    EncodingOverflow(usize),

    #[error("{0} check failed, should be a non-empty string")]
    EmptyRequiredField(String),

    #[error("Signing failed")]
    SigningFailure,

    #[error("Compression failed")]
    CompressionFailure,

    #[error("Decompression failed")]
    DecompressionFailure,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using TokenError
pub type Result<T> = std::result::Result<T, TokenError>;
