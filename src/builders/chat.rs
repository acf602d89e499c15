//! Chat tokens (v007).

use super::{Client, User};
use crate::core::privileges::chat;
use crate::core::service::{ChatService, ServiceRecord};
use crate::error::Result;
use tracing::instrument;

/// Client-side login for a single chat user
#[instrument(skip_all)]
pub fn build_user_token(client: &Client, user: &User) -> Result<String> {
    let service =
        ChatService::new(user.account()).with_privilege(chat::USER, user.privilege_expire());
    client.issue(&client.access_token()?.with_service(service))
}

/// Server-side application token; carries no user
#[instrument(skip_all)]
pub fn build_app_token(client: &Client) -> Result<String> {
    let service = ChatService::default().with_privilege(chat::APP, client.expire());
    client.issue(&client.access_token()?.with_service(service))
}
