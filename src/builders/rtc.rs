//! RTC tokens (v007).
//!
//! The uid and user-account variants build identical tokens; the [`UserId`]
//! held by the [`User`] decides how the id is rendered.
//!
//! [`UserId`]: crate::core::identity::UserId

use super::{Client, User};
use crate::core::privileges::{roles, rtc, rtm};
use crate::core::service::{RtcService, RtmService, ServiceRecord};
use crate::error::Result;
use tracing::instrument;

fn rtc_service(user: &User) -> RtcService {
    RtcService {
        channel_name: user.channel().to_string(),
        user_id: user.account(),
        ..RtcService::default()
    }
}

/// JOIN_CHANNEL, plus the three publish privileges for publishers, all
/// expiring at `user.privilege_expire()`
fn role_based_service(user: &User) -> RtcService {
    let expire = user.privilege_expire();
    let service = rtc_service(user).with_privilege(rtc::JOIN_CHANNEL, expire);
    if user.role() == roles::RTC_PUBLISHER {
        service
            .with_privilege(rtc::PUBLISH_AUDIO_STREAM, expire)
            .with_privilege(rtc::PUBLISH_VIDEO_STREAM, expire)
            .with_privilege(rtc::PUBLISH_DATA_STREAM, expire)
    } else {
        service
    }
}

pub fn build_token_with_uid(client: &Client, user: &User) -> Result<String> {
    build_token_with_user_account(client, user)
}

#[instrument(skip_all, fields(channel = %user.channel()))]
pub fn build_token_with_user_account(client: &Client, user: &User) -> Result<String> {
    let token = client.access_token()?.with_service(role_based_service(user));
    client.issue(&token)
}

pub fn build_token_with_uid_and_privilege(client: &Client, user: &User) -> Result<String> {
    build_token_with_user_account_and_privilege(client, user)
}

/// All four RTC privileges, each with its own expiry from `user`.
///
/// The publish privileges only take effect when co-host authentication is
/// enabled for the app.
#[instrument(skip_all, fields(channel = %user.channel()))]
pub fn build_token_with_user_account_and_privilege(client: &Client, user: &User) -> Result<String> {
    let service = rtc_service(user)
        .with_privilege(rtc::JOIN_CHANNEL, user.join_channel_expire())
        .with_privilege(rtc::PUBLISH_AUDIO_STREAM, user.publish_audio_expire())
        .with_privilege(rtc::PUBLISH_VIDEO_STREAM, user.publish_video_expire())
        .with_privilege(rtc::PUBLISH_DATA_STREAM, user.publish_data_stream_expire());
    let token = client.access_token()?.with_service(service);
    client.issue(&token)
}

/// RTC as in [`build_token_with_user_account`] plus RTM login for the token lifetime
#[instrument(skip_all, fields(channel = %user.channel()))]
pub fn build_token_with_rtm(client: &Client, user: &User) -> Result<String> {
    let rtm_service = RtmService {
        user_id: user.account(),
        ..RtmService::default()
    }
    .with_privilege(rtm::LOGIN, client.expire());

    let token = client
        .access_token()?
        .with_service(role_based_service(user))
        .with_service(rtm_service);
    client.issue(&token)
}
