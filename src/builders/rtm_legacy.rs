//! RTM tokens in the legacy 006 format.
//!
//! The account takes the place of the channel name and the uid is left empty.

use super::{legacy_expiry, Client, User};
use crate::core::identity::UserId;
use crate::core::privileges::legacy;
use crate::error::Result;
use crate::protocol::AccessTokenLegacy;
use tracing::instrument;

/// kRtmLogin for `user`, expiring `user.privilege_expire()` seconds from now.
///
/// # Errors
/// `TokenError::EmptyRequiredField` if the user has no account
#[instrument(skip_all)]
pub fn build_token(client: &Client, user: &User) -> Result<String> {
    let expire = legacy_expiry(user.privilege_expire())?;
    let credentials = client.credentials();
    AccessTokenLegacy::new(
        credentials.app_id(),
        credentials.app_certificate(),
        user.account(),
        UserId::Uid(0),
    )?
    .with_privilege(legacy::RTM_LOGIN, expire)
    .build()
}
