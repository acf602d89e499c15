//! # agora-token
//!
//! Builds and parses signed, time-limited access tokens for real-time media
//! services (RTC, RTM, Chat, FPA, Apaas).
//!
//! Two wire formats are supported:
//! - **007**: multi-service tokens, zlib-compressed and base64 encoded,
//!   signed with a key derived from the app certificate, issue time and salt
//! - **006**: legacy single-channel tokens carrying CRCs of the channel and uid
//!
//! ## Quick start
//! ```rust
//! use agora_token::builders::{rtc, Client, User};
//! use agora_token::core::identity::{Credentials, UserId};
//! use agora_token::core::privileges::roles;
//! use agora_token::protocol::AccessToken;
//!
//! # fn main() -> agora_token::Result<()> {
//! let client = Client::new(Credentials::new(
//!     "970CA35de60c44645bbae8a215061b33",
//!     "5CFd2fd1755d40ecb72977518be15d3b",
//! )?)
//! .with_expire(600);
//! let user = User::new(UserId::Uid(2882341263))
//!     .with_channel("7d72365eb983485397e3e3f9d460bdda")
//!     .with_role(roles::RTC_PUBLISHER)
//!     .with_privilege_expire(3600);
//!
//! let token = rtc::build_token_with_uid(&client, &user)?;
//! assert!(token.starts_with("007"));
//! assert_eq!(AccessToken::parse(&token)?.app_id, client.app_id());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//! - [`core`]: binary primitives, service records, identities, privilege codes
//! - [`protocol`]: the v007 and v006 token codecs
//! - [`builders`]: per-product helpers that pick privileges and expiries
//! - [`config`]: TOML/env configuration
//! - [`utils`]: signing, compression, logging, time

pub mod builders;
pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::config::{BuildMode, TokenConfig};
pub use crate::core::identity::{Credentials, UserId};
pub use crate::core::service::{Service, ServiceType};
pub use crate::error::{Result, TokenError};
pub use crate::protocol::{AccessToken, AccessTokenLegacy, Message};
