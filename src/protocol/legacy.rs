//! Version 006 access tokens.
//!
//! ```text
//! token   = "006" app_id(32 chars, unprefixed) base64(content)
//! content = [signature: bytes] [crc(channel): u32] [crc(uid): u32] [message: bytes]
//! message = [salt: u32] [ts: u32] [count: u16] ([privilege: u16] [expire: u32])*
//! ```
//!
//! The signature is HMAC-SHA256 keyed by the app certificate over
//! `app_id ‖ channel_name ‖ uid ‖ message`. Both CRCs sit outside it.
//!
//! [`AccessTokenLegacy::extract`] recovers the caller-facing fields of an
//! existing token so they can be reused. It does not verify the signature or
//! the CRCs, and it does not decode the embedded message.

use crate::config::{LEGACY_TOKEN_VERSION, VERSION_LENGTH};
use crate::core::identity::{is_credential_format, UserId, CREDENTIAL_LEN};
use crate::core::primitives::{
    pack_bytes, pack_map_uint32, pack_uint32, unpack_bytes, unpack_uint32,
};
use crate::core::privileges::PrivilegeSet;
use crate::error::{constants, Result, TokenError};
use crate::utils::{crypto, time};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, instrument, warn};

/// Salt, absolute expiry timestamp and privileges of a v006 token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub salt: u32,
    /// Absolute unix seconds, one day after issue
    pub ts: u32,
    pub privileges: PrivilegeSet,
}

impl Message {
    /// Fresh message: random salt, expiring 24 hours from now
    pub fn new() -> Result<Self> {
        Ok(Self::with_parts(
            crypto::generate_salt(),
            time::expires_in(time::SECONDS_PER_DAY)?,
        ))
    }

    pub fn with_parts(salt: u32, ts: u32) -> Self {
        Self {
            salt,
            ts,
            privileges: PrivilegeSet::new(),
        }
    }

    pub fn with_privilege(mut self, privilege: u16, expire: u32) -> Self {
        self.privileges.insert(privilege, expire);
        self
    }

    /// Serialized message bytes, privileges in ascending key order
    pub fn pack_content(&self) -> Result<Vec<u8>> {
        let mut content = Vec::with_capacity(10 + 6 * self.privileges.len());
        pack_uint32(&mut content, self.salt);
        pack_uint32(&mut content, self.ts);
        pack_map_uint32(&mut content, &self.privileges)?;
        Ok(content)
    }
}

/// Decoded content of an extracted v006 token, for inspection only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyContent {
    pub signature: Vec<u8>,
    pub crc_channel_name: u32,
    pub crc_uid: u32,
    /// Message bytes exactly as embedded; never decoded
    pub raw_message: Vec<u8>,
}

/// A single-channel v006 token
#[derive(Clone, PartialEq, Eq)]
pub struct AccessTokenLegacy {
    pub app_id: String,
    pub app_certificate: String,
    pub channel_name: String,
    pub uid: UserId,
    pub message: Message,
}

impl std::fmt::Debug for AccessTokenLegacy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenLegacy")
            .field("app_id", &self.app_id)
            .field("app_certificate", &"[REDACTED]")
            .field("channel_name", &self.channel_name)
            .field("uid", &self.uid)
            .field("message", &self.message)
            .finish()
    }
}

impl AccessTokenLegacy {
    /// Token with a fresh [`Message`].
    ///
    /// # Errors
    /// `TokenError::EmptyRequiredField` if the app id, app certificate or
    /// channel name is blank.
    pub fn new(
        app_id: impl Into<String>,
        app_certificate: impl Into<String>,
        channel_name: impl Into<String>,
        uid: UserId,
    ) -> Result<Self> {
        let token = Self {
            app_id: app_id.into(),
            app_certificate: app_certificate.into(),
            channel_name: channel_name.into(),
            uid,
            message: Message::new()?,
        };
        require_non_blank("appId", &token.app_id)?;
        require_non_blank("appCertificate", &token.app_certificate)?;
        require_non_blank("channelName", &token.channel_name)?;
        Ok(token)
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.message = message;
        self
    }

    pub fn with_privilege(mut self, privilege: u16, expire: u32) -> Self {
        self.message.privileges.insert(privilege, expire);
        self
    }

    /// Builds the wire token.
    ///
    /// # Errors
    /// - `TokenError::InvalidCredentialFormat` if the app id is not 32
    ///   hexadecimal characters, since it is embedded at a fixed width
    /// - `TokenError::EncodingOverflow` if the message exceeds 65535 bytes
    #[instrument(skip(self), fields(app_id = %self.app_id, channel = %self.channel_name))]
    pub fn build(&self) -> Result<String> {
        if !is_credential_format(&self.app_id) {
            return Err(TokenError::InvalidCredentialFormat(
                constants::ERR_INVALID_APP_ID.into(),
            ));
        }

        let uid = self.uid.as_account_string();
        let message = self.message.pack_content()?;
        let signature = crypto::sign_v006(
            &self.app_certificate,
            &self.app_id,
            &self.channel_name,
            &uid,
            &message,
        )?;

        let mut content: Vec<u8> = Vec::with_capacity(48 + message.len());
        pack_bytes(&mut content, &signature)?;
        pack_uint32(&mut content, crypto::crc32(self.channel_name.as_bytes()));
        pack_uint32(&mut content, crypto::crc32(uid.as_bytes()));
        pack_bytes(&mut content, &message)?;

        let token = format!(
            "{LEGACY_TOKEN_VERSION}{}{}",
            self.app_id,
            STANDARD.encode(content)
        );
        debug!(len = token.len(), "Built legacy access token");
        Ok(token)
    }

    /// Recovers a token from its wire form plus the caller-held fields.
    ///
    /// The returned token carries the supplied certificate, channel and uid
    /// and a fresh [`Message`]. CRC mismatches are logged, not rejected.
    ///
    /// # Errors
    /// - `TokenError::EmptyRequiredField` for a blank token, certificate or channel
    /// - `TokenError::VersionMismatch` if the token does not start with "006"
    /// - `TokenError::MalformedData` for a short token, bad base64 or truncated content
    #[instrument(skip(token, app_certificate), fields(channel = %channel_name))]
    pub fn extract(
        token: &str,
        app_certificate: &str,
        channel_name: &str,
        uid: &UserId,
    ) -> Result<(Self, LegacyContent)> {
        require_non_blank("token", token)?;
        require_non_blank("appCertificate", app_certificate)?;
        require_non_blank("channelName", channel_name)?;

        let version = token.get(..VERSION_LENGTH).unwrap_or(token);
        if version != LEGACY_TOKEN_VERSION {
            return Err(TokenError::VersionMismatch {
                expected: LEGACY_TOKEN_VERSION.into(),
                found: version.into(),
            });
        }

        let app_id_end = VERSION_LENGTH + CREDENTIAL_LEN;
        let app_id = token
            .get(VERSION_LENGTH..app_id_end)
            .ok_or_else(|| TokenError::MalformedData(constants::ERR_TRUNCATED_TOKEN.into()))?;
        let encoded = &token[app_id_end..];

        let decoded = STANDARD.decode(encoded).map_err(|e| {
            TokenError::MalformedData(format!("{}: {e}", constants::ERR_INVALID_BASE64))
        })?;
        let mut cursor = decoded.as_slice();
        let content = LegacyContent {
            signature: unpack_bytes(&mut cursor)?,
            crc_channel_name: unpack_uint32(&mut cursor)?,
            crc_uid: unpack_uint32(&mut cursor)?,
            raw_message: unpack_bytes(&mut cursor)?,
        };

        let uid_string = uid.as_account_string();
        if content.crc_channel_name != crypto::crc32(channel_name.as_bytes())
            || content.crc_uid != crypto::crc32(uid_string.as_bytes())
        {
            warn!("Embedded CRCs do not match the supplied channel/uid");
        }

        let recovered = Self {
            app_id: app_id.to_string(),
            app_certificate: app_certificate.to_string(),
            channel_name: channel_name.to_string(),
            uid: uid.clone(),
            message: Message::new()?,
        };
        debug!(app_id = %recovered.app_id, "Extracted legacy access token");
        Ok((recovered, content))
    }
}

fn require_non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(TokenError::EmptyRequiredField(field.into()))
    } else {
        Ok(())
    }
}
