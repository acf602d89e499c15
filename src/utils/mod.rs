//! # Utility Modules
//!
//! Supporting utilities for signing, compression, logging, and timing.
//!
//! ## Components
//! - **Crypto**: HMAC-SHA256 signing, v007 key derivation, CRC32, salt generation
//! - **Compression**: zlib deflate/inflate with an output size limit
//! - **Logging**: Structured logging configuration
//! - **Time**: Unix timestamps in seconds
//!
//! ## Security
//! - Cryptographically secure RNG for salts and uids
//! - Derived signing keys are zeroed on drop (zeroize crate)
//! - Decompression bomb protection (1 MiB limit)

pub mod compression;
pub mod crypto;
pub mod logging;
pub mod time;
