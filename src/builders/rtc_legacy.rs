//! RTC tokens in the legacy 006 format.

use super::{legacy_expiry, Client, User};
use crate::core::privileges::{legacy, roles};
use crate::error::Result;
use crate::protocol::AccessTokenLegacy;
use tracing::instrument;

pub fn build_token_with_uid(client: &Client, user: &User) -> Result<String> {
    build_token_with_user_account(client, user)
}

/// kJoinChannel, plus the publish privileges for attendees, publishers and
/// admins. Every privilege expires `user.privilege_expire()` seconds from now;
/// zero never expires.
///
/// # Errors
/// `TokenError::EmptyRequiredField` if the user has no channel
#[instrument(skip_all, fields(channel = %user.channel()))]
pub fn build_token_with_user_account(client: &Client, user: &User) -> Result<String> {
    let expire = legacy_expiry(user.privilege_expire())?;
    let credentials = client.credentials();
    let token = AccessTokenLegacy::new(
        credentials.app_id(),
        credentials.app_certificate(),
        user.channel(),
        user.user_id().clone(),
    )?
    .with_privilege(legacy::JOIN_CHANNEL, expire);

    let token = match user.role() {
        roles::RTC_ATTENDEE | roles::RTC_PUBLISHER | roles::RTC_ADMIN => token
            .with_privilege(legacy::PUBLISH_VIDEO_STREAM, expire)
            .with_privilege(legacy::PUBLISH_AUDIO_STREAM, expire)
            .with_privilege(legacy::PUBLISH_DATA_STREAM, expire),
        _ => token,
    };
    token.build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builders::tests::{client, APP_CERT, APP_ID};
    use crate::core::identity::UserId;
    use crate::core::primitives::{unpack_map_uint32, unpack_uint32};
    use crate::core::privileges::PrivilegeSet;
    use crate::error::TokenError;
    use crate::utils::time;

    const CHANNEL: &str = "7d72365eb983485397e3e3f9d460bdda";

    fn privilege_map(token: &str, user: &User) -> PrivilegeSet {
        let (recovered, content) =
            AccessTokenLegacy::extract(token, APP_CERT, user.channel(), user.user_id()).unwrap();
        assert_eq!(recovered.app_id, APP_ID);
        let mut message = content.raw_message.as_slice();
        let _salt = unpack_uint32(&mut message).unwrap();
        let _ts = unpack_uint32(&mut message).unwrap();
        unpack_map_uint32(&mut message).unwrap()
    }

    fn privileges_of(token: &str, user: &User) -> Vec<u16> {
        privilege_map(token, user).into_keys().collect()
    }

    #[test]
    fn test_publisher_roles() {
        for role in [roles::RTC_ATTENDEE, roles::RTC_PUBLISHER, roles::RTC_ADMIN] {
            let user = User::new(UserId::Uid(2_882_341_263))
                .with_channel(CHANNEL)
                .with_role(role)
                .with_privilege_expire(3600);
            let token = build_token_with_uid(&client(), &user).unwrap();
            assert!(token.starts_with("006970CA35de60c44645bbae8a215061b33"));
            assert_eq!(privileges_of(&token, &user), vec![1, 2, 3, 4]);
        }
    }

    #[test]
    fn test_subscriber_only_joins() {
        let user = User::new(UserId::account("viewer").unwrap())
            .with_channel(CHANNEL)
            .with_role(roles::RTC_SUBSCRIBER);
        let token = build_token_with_user_account(&client(), &user).unwrap();
        assert_eq!(privileges_of(&token, &user), vec![1]);
    }

    #[test]
    fn test_client_user_expiry_is_absolute() {
        let client = client();
        let user = client
            .user(UserId::Uid(7))
            .with_channel("chan")
            .with_role(roles::RTC_PUBLISHER);
        let before = time::current_timestamp().unwrap();
        let token = build_token_with_uid(&client, &user).unwrap();

        let privileges = privilege_map(&token, &user);
        assert_eq!(privileges.len(), 4);
        for expire in privileges.values() {
            assert!(*expire >= before + 3600);
        }
    }

    #[test]
    fn test_zero_expiry_never_expires() {
        let user = User::new(UserId::Uid(7)).with_channel("chan");
        let token = build_token_with_uid(&client(), &user).unwrap();
        assert_eq!(privilege_map(&token, &user).get(&legacy::JOIN_CHANNEL), Some(&0));
    }

    #[test]
    fn test_channel_required() {
        let user = User::new(UserId::Uid(1));
        assert!(matches!(
            build_token_with_uid(&client(), &user),
            Err(TokenError::EmptyRequiredField(f)) if f == "channelName"
        ));
    }
}
