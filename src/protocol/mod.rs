//! # Token Codecs
//!
//! - [`access_token`]: version 007, multi-service, compressed
//! - [`legacy`]: version 006, single channel, CRC fields
//!
//! Both are synchronous and stateless. The only ambient inputs are the
//! system clock and the thread-local RNG, read once per new token.

pub mod access_token;
pub mod legacy;

pub use access_token::AccessToken;
pub use legacy::{AccessTokenLegacy, LegacyContent, Message};
