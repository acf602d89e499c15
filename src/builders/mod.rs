//! # Token Builders
//!
//! Per-product helpers that choose the services, privileges and expiries for
//! a token. Each takes a [`Client`] (credentials plus token defaults) and,
//! where the token is user-scoped, a [`User`].
//!
//! | module          | format | services                         |
//! |-----------------|--------|----------------------------------|
//! | [`rtc`]         | 007    | RTC, optionally RTM              |
//! | [`rtm`]         | 007    | RTM                              |
//! | [`chat`]        | 007    | Chat                             |
//! | [`fpa`]         | 007    | FPA                              |
//! | [`apaas`]       | 007    | Apaas, RTM, Chat                 |
//! | [`education`]   | 007    | same layout as [`apaas`]         |
//! | [`rtc_legacy`]  | 006    | RTC privileges on one channel    |
//! | [`rtm_legacy`]  | 006    | RTM login                        |
//! | [`signaling`]   | "1:"   | MD5 signaling token              |

pub mod apaas;
pub mod chat;
pub mod fpa;
pub mod rtc;
pub mod rtc_legacy;
pub mod rtm;
pub mod rtm_legacy;
pub mod signaling;
mod user;

pub use apaas as education;
pub use user::User;

use crate::config::{
    BuildMode, TokenConfig, DEFAULT_EXPIRE_SECONDS, DEFAULT_PRIVILEGE_EXPIRE_SECONDS,
};
use crate::core::identity::{Credentials, UserId};
use crate::error::Result;
use crate::protocol::AccessToken;
use crate::utils::time;

/// Credentials plus the defaults every builder applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    credentials: Credentials,
    expire: u32,
    privilege_expire: u32,
    mode: BuildMode,
}

impl Client {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            expire: DEFAULT_EXPIRE_SECONDS,
            privilege_expire: DEFAULT_PRIVILEGE_EXPIRE_SECONDS,
            mode: BuildMode::Strict,
        }
    }

    /// Client configured from the `credentials` and `token` sections.
    ///
    /// # Errors
    /// `TokenError::EmptyRequiredField` if either credential is unset
    pub fn from_config(config: &TokenConfig) -> Result<Self> {
        Ok(Self::new(config.credentials()?)
            .with_expire(config.token.expire_seconds)
            .with_privilege_expire(config.token.privilege_expire_seconds)
            .with_mode(config.build_mode()))
    }

    /// Token lifetime in seconds
    pub fn with_expire(mut self, expire: u32) -> Self {
        self.expire = expire;
        self
    }

    /// Privilege expiry preset on users created by [`Client::user`]
    pub fn with_privilege_expire(mut self, privilege_expire: u32) -> Self {
        self.privilege_expire = privilege_expire;
        self
    }

    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn app_id(&self) -> &str {
        self.credentials.app_id()
    }

    pub fn expire(&self) -> u32 {
        self.expire
    }

    pub fn privilege_expire(&self) -> u32 {
        self.privilege_expire
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// A user carrying this client's privilege expiry, in seconds from issue
    pub fn user(&self, user_id: UserId) -> User {
        User::new(user_id).with_privilege_expire(self.privilege_expire)
    }

    /// Empty v007 token issued now with this client's lifetime
    pub(crate) fn access_token(&self) -> Result<AccessToken> {
        AccessToken::new(self.app_id(), self.expire)
    }

    pub(crate) fn issue(&self, token: &AccessToken) -> Result<String> {
        token.build_with_mode(self.credentials.app_certificate(), self.mode)
    }
}

/// Absolute unix expiry for a v006 privilege. Zero stays zero (no expiry).
pub(crate) fn legacy_expiry(seconds: u32) -> Result<u32> {
    if seconds == 0 {
        return Ok(0);
    }
    time::expires_in(seconds)
}
