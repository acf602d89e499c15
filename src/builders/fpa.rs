//! FPA (accelerated transport) tokens (v007).

use super::Client;
use crate::core::privileges::fpa;
use crate::core::service::{FpaService, ServiceRecord};
use crate::error::Result;
use crate::utils::time::SECONDS_PER_DAY;

/// FPA login, valid for 24 hours regardless of the client's lifetime.
///
/// The privilege expiry is 0, which the server reads as "until the token expires".
pub fn build_token(client: &Client) -> Result<String> {
    let client = client.clone().with_expire(SECONDS_PER_DAY);
    let service = FpaService::new().with_privilege(fpa::LOGIN, 0);
    client.issue(&client.access_token()?.with_service(service))
}
