//! Version 007 access tokens.
//!
//! ```text
//! token   = "007" base64( zlib( [signature: string] tail ) )
//! tail    = [app_id: string] [issue_ts: u32] [expire: u32] [salt: u32]
//!           [service_count: u16] service*   (ascending type tag)
//! ```
//!
//! The signature is HMAC-SHA256 over `tail` with a key derived from the app
//! certificate, issue timestamp and salt (see [`crate::utils::crypto`]).
//! [`AccessToken::parse`] recovers every field but does not re-verify the
//! signature; verification belongs to the server side.

use crate::config::{BuildMode, DEFAULT_EXPIRE_SECONDS, TOKEN_VERSION, VERSION_LENGTH};
use crate::core::identity::is_credential_format;
use crate::core::primitives::{
    length_prefix, pack_bytes, pack_string, pack_uint16, pack_uint32, unpack_bytes,
    unpack_string, unpack_uint16, unpack_uint32,
};
use crate::core::service::{Service, ServiceType};
use crate::error::{constants, Result, TokenError};
use crate::utils::{compression, crypto, time};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

/// A v007 token: app id, validity window, salt, and one record per service.
///
/// Services are keyed by type, so adding a second record of the same type
/// replaces the first. `ServiceType` orders by its wire tag, which keeps
/// serialization in ascending tag order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub app_id: String,
    /// Unix seconds at which the token was issued
    pub issue_ts: u32,
    /// Lifetime in seconds counted from `issue_ts`
    pub expire: u32,
    pub salt: u32,
    pub services: BTreeMap<ServiceType, Service>,
}

impl AccessToken {
    /// Token issued now, with a fresh random salt
    pub fn new(app_id: impl Into<String>, expire: u32) -> Result<Self> {
        Ok(Self::with_parts(
            app_id,
            time::current_timestamp()?,
            expire,
            crypto::generate_salt(),
        ))
    }

    /// Token with every header field given explicitly
    pub fn with_parts(app_id: impl Into<String>, issue_ts: u32, expire: u32, salt: u32) -> Self {
        Self {
            app_id: app_id.into(),
            issue_ts,
            expire,
            salt,
            services: BTreeMap::new(),
        }
    }

    /// Adds a service record, replacing any record of the same type
    pub fn with_service(mut self, service: impl Into<Service>) -> Self {
        let service = service.into();
        self.services.insert(service.service_type(), service);
        self
    }

    pub fn service(&self, service_type: ServiceType) -> Option<&Service> {
        self.services.get(&service_type)
    }

    /// Packs everything covered by the signature
    fn pack_tail(&self) -> Result<Vec<u8>> {
        let mut tail = Vec::with_capacity(64 + 32 * self.services.len());
        pack_string(&mut tail, &self.app_id)?;
        pack_uint32(&mut tail, self.issue_ts);
        pack_uint32(&mut tail, self.expire);
        pack_uint32(&mut tail, self.salt);
        pack_uint16(&mut tail, length_prefix(self.services.len())?);
        for service in self.services.values() {
            service.pack(&mut tail)?;
        }
        Ok(tail)
    }

    /// Raw HMAC-SHA256 signature this token carries when built with `app_certificate`
    pub fn signature(&self, app_certificate: &str) -> Result<[u8; 32]> {
        let tail = self.pack_tail()?;
        crypto::sign_v007(app_certificate, self.issue_ts, self.salt, &tail)
    }

    /// Builds the wire token, failing on malformed credentials.
    ///
    /// # Errors
    /// - `TokenError::InvalidCredentialFormat` if the app id or certificate is
    ///   not 32 hexadecimal characters
    /// - `TokenError::EncodingOverflow` if a string field exceeds 65535 bytes
    pub fn build(&self, app_certificate: &str) -> Result<String> {
        self.build_with_mode(app_certificate, BuildMode::Strict)
    }

    /// Builds the wire token.
    ///
    /// In `BuildMode::Lenient` malformed credentials produce `Ok("")`; every
    /// other error is still returned.
    #[instrument(skip(self, app_certificate), fields(app_id = %self.app_id, services = self.services.len()))]
    pub fn build_with_mode(&self, app_certificate: &str, mode: BuildMode) -> Result<String> {
        if let Err(e) = self.validate_credentials(app_certificate) {
            return match mode {
                BuildMode::Strict => Err(e),
                BuildMode::Lenient => {
                    warn!(error = %e, "Credential check failed, returning empty token");
                    Ok(String::new())
                }
            };
        }

        let tail = self.pack_tail()?;
        let signature = crypto::sign_v007(app_certificate, self.issue_ts, self.salt, &tail)?;

        let mut payload = Vec::with_capacity(2 + signature.len() + tail.len());
        pack_bytes(&mut payload, &signature)?;
        payload.extend_from_slice(&tail);

        let compressed = compression::deflate(&payload)?;
        let token = format!("{TOKEN_VERSION}{}", STANDARD.encode(compressed));

        debug!(len = token.len(), "Built access token");
        Ok(token)
    }

    fn validate_credentials(&self, app_certificate: &str) -> Result<()> {
        if !is_credential_format(&self.app_id) {
            return Err(TokenError::InvalidCredentialFormat(
                constants::ERR_INVALID_APP_ID.into(),
            ));
        }
        if !is_credential_format(app_certificate) {
            return Err(TokenError::InvalidCredentialFormat(
                constants::ERR_INVALID_APP_CERTIFICATE.into(),
            ));
        }
        Ok(())
    }

    /// Parses a wire token back into its fields.
    ///
    /// The embedded signature is read and discarded.
    ///
    /// # Errors
    /// - `TokenError::VersionMismatch` if the token does not start with "007"
    /// - `TokenError::MalformedData` for bad base64 or a truncated body
    /// - `TokenError::DecompressionFailure` if the body is not a zlib stream
    /// - `TokenError::UnknownServiceType` for an unrecognized service tag
    #[instrument(skip(token), fields(len = token.len()))]
    pub fn parse(token: &str) -> Result<Self> {
        let version = token.get(..VERSION_LENGTH).unwrap_or(token);
        if version != TOKEN_VERSION {
            return Err(TokenError::VersionMismatch {
                expected: TOKEN_VERSION.into(),
                found: version.into(),
            });
        }

        let compressed = STANDARD
            .decode(&token[VERSION_LENGTH..])
            .map_err(|e| TokenError::MalformedData(format!("{}: {e}", constants::ERR_INVALID_BASE64)))?;
        let payload = compression::inflate(&compressed)?;
        let mut cursor = payload.as_slice();

        let _signature = unpack_bytes(&mut cursor)?;
        let app_id = unpack_string(&mut cursor)?;
        let issue_ts = unpack_uint32(&mut cursor)?;
        let expire = unpack_uint32(&mut cursor)?;
        let salt = unpack_uint32(&mut cursor)?;
        let service_count = unpack_uint16(&mut cursor)?;

        let mut access_token = Self::with_parts(app_id, issue_ts, expire, salt);
        for _ in 0..service_count {
            let tag = unpack_uint16(&mut cursor)?;
            let service = Service::unpack(tag, &mut cursor)?;
            access_token.services.insert(service.service_type(), service);
        }

        if !cursor.is_empty() {
            debug!(trailing = cursor.len(), "Ignoring trailing bytes after services");
        }
        debug!(app_id = %access_token.app_id, services = access_token.services.len(), "Parsed access token");
        Ok(access_token)
    }
}

impl Default for AccessToken {
    fn default() -> Self {
        Self::with_parts(String::new(), 0, DEFAULT_EXPIRE_SECONDS, 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::core::identity::UserId;
    use crate::core::privileges::{chat, rtc, rtm};
    use crate::core::service::{ChatService, RtcService, RtmService, ServiceRecord};

    fn app_id() -> String {
        "a".repeat(32)
    }

    fn scenario() -> AccessToken {
        AccessToken::with_parts(app_id(), 1_000_000_000, 3600, 42).with_service(
            RtcService::new("chan1", &UserId::account("2882341273").unwrap())
                .with_privilege(rtc::JOIN_CHANNEL, 1_000_003_600),
        )
    }

    fn body_of(token: &str) -> Vec<u8> {
        compression::inflate(&STANDARD.decode(&token[3..]).unwrap()).unwrap()
    }

    #[test]
    fn test_pinned_payload() {
        let token = scenario().build(&app_id()).unwrap();
        assert!(token.starts_with("007"));
        assert_eq!(
            hex::encode(body_of(&token)),
            "2000\
             8c3935b22c85870ea5be125ee428eb48d026cb58ac14750601e1ec8fb3decf7a\
             2000616161616161616161616161616161616161616161616161616161616161616100ca9a3b\
             100e00002a0000000100\
             010001000100\
             10d89a3b\
             05006368616e31\
             0a0032383832333431323733"
        );
    }

    #[test]
    fn test_scenario_roundtrip() {
        let original = scenario();
        let parsed = AccessToken::parse(&original.build(&app_id()).unwrap()).unwrap();
        assert_eq!(parsed.app_id, app_id());
        assert_eq!(parsed.issue_ts, 1_000_000_000);
        assert_eq!(parsed.expire, 3600);
        assert_eq!(parsed.salt, 42);
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_services_serialized_in_tag_order() {
        let token = AccessToken::with_parts(app_id(), 1, 2, 3)
            .with_service(ChatService::new("c").with_privilege(chat::USER, 9))
            .with_service(RtmService::new(&UserId::Uid(5)).with_privilege(rtm::LOGIN, 9))
            .with_service(RtcService::new("ch", &UserId::Uid(5)));
        let order: Vec<u16> = token.services.keys().map(|t| t.tag()).collect();
        assert_eq!(order, vec![1, 2, 5]);

        let parsed = AccessToken::parse(&token.build(&app_id()).unwrap()).unwrap();
        assert_eq!(parsed, token);
    }

    #[test]
    fn test_invalid_credentials_strict_and_lenient() {
        let token = AccessToken::with_parts("not-hex-not-32-chars", 1, 2, 3);
        assert!(matches!(
            token.build(&app_id()),
            Err(TokenError::InvalidCredentialFormat(_))
        ));
        assert_eq!(
            token.build_with_mode(&app_id(), BuildMode::Lenient).unwrap(),
            ""
        );

        let token = AccessToken::with_parts(app_id(), 1, 2, 3);
        assert!(matches!(
            token.build("not-hex-not-32-chars"),
            Err(TokenError::InvalidCredentialFormat(_))
        ));
        assert_eq!(
            token
                .build_with_mode("not-hex-not-32-chars", BuildMode::Lenient)
                .unwrap(),
            ""
        );
    }

    #[test]
    fn test_lenient_mode_still_reports_overflow() {
        let token = AccessToken::with_parts(app_id(), 1, 2, 3)
            .with_service(RtcService::new("x".repeat(70_000), &UserId::Uid(1)));
        assert!(matches!(
            token.build_with_mode(&app_id(), BuildMode::Lenient),
            Err(TokenError::EncodingOverflow(70_000))
        ));
    }

    #[test]
    fn test_version_mismatch() {
        assert!(matches!(
            AccessToken::parse("006abc"),
            Err(TokenError::VersionMismatch { found, .. }) if found == "006"
        ));
        assert!(matches!(
            AccessToken::parse("00"),
            Err(TokenError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_bad_base64_is_malformed() {
        assert!(matches!(
            AccessToken::parse("007!!!not base64!!!"),
            Err(TokenError::MalformedData(_))
        ));
    }

    #[test]
    fn test_unknown_service_aborts_parse() {
        let mut tail: Vec<u8> = Vec::new();
        pack_string(&mut tail, &app_id()).unwrap();
        pack_uint32(&mut tail, 1);
        pack_uint32(&mut tail, 2);
        pack_uint32(&mut tail, 3);
        pack_uint16(&mut tail, 1);
        pack_uint16(&mut tail, 3); // no service has tag 3
        pack_uint16(&mut tail, 0);

        let mut payload: Vec<u8> = Vec::new();
        pack_bytes(&mut payload, &[0u8; 32]).unwrap();
        payload.extend_from_slice(&tail);
        let token = format!("007{}", STANDARD.encode(compression::deflate(&payload).unwrap()));

        assert!(matches!(
            AccessToken::parse(&token),
            Err(TokenError::UnknownServiceType(3))
        ));
    }

    #[test]
    fn test_truncated_body_is_malformed() {
        let body = body_of(&scenario().build(&app_id()).unwrap());
        let truncated = &body[..body.len() - 4];
        let token = format!("007{}", STANDARD.encode(compression::deflate(truncated).unwrap()));
        assert!(matches!(
            AccessToken::parse(&token),
            Err(TokenError::MalformedData(_))
        ));
    }

    #[test]
    fn test_signature_matches_embedded_bytes() {
        let token = scenario();
        let body = body_of(&token.build(&app_id()).unwrap());
        let signature = token.signature(&app_id()).unwrap();
        assert_eq!(&body[2..34], &signature[..]);
    }

    #[test]
    fn test_new_uses_current_time_and_salt() {
        let token = AccessToken::new(app_id(), 600).unwrap();
        assert!(token.issue_ts > 1_577_836_800);
        assert!(token.salt >= 1);
        assert!(token.services.is_empty());
    }

    #[test]
    fn test_same_type_replaces_record() {
        let token = AccessToken::with_parts(app_id(), 1, 2, 3)
            .with_service(RtcService::new("first", &UserId::Uid(1)))
            .with_service(RtcService::new("second", &UserId::Uid(1)));
        assert_eq!(token.services.len(), 1);
        match token.service(ServiceType::Rtc) {
            Some(Service::Rtc(rtc)) => assert_eq!(rtc.channel_name, "second"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
