//! Apaas (flexible classroom) tokens (v007).
//!
//! Also exported as `builders::education`; both products share one layout.

use super::{Client, User};
use crate::core::privileges::{apaas, chat, rtm};
use crate::core::service::{ApaasService, ChatService, RtmService, ServiceRecord};
use crate::error::Result;
use tracing::instrument;

fn apaas_service(user: &User) -> ApaasService {
    ApaasService {
        room_id: user.room_id().to_string(),
        user_id: user.account(),
        role: user.role(),
        ..ApaasService::default()
    }
}

/// Room access plus RTM login and chat login.
///
/// The chat record carries the MD5 digest of the account, not the account.
#[instrument(skip_all, fields(room = %user.room_id()))]
pub fn build_room_user_token(client: &Client, user: &User) -> Result<String> {
    let expire = user.privilege_expire();
    let rtm_service = RtmService {
        user_id: user.account(),
        ..RtmService::default()
    };
    let chat_user = user.clone().with_hash_account(true);

    let token = client
        .access_token()?
        .with_service(apaas_service(user).with_privilege(apaas::ROOM_USER, expire))
        .with_service(rtm_service.with_privilege(rtm::LOGIN, expire))
        .with_service(ChatService::new(chat_user.account()).with_privilege(chat::USER, expire));
    client.issue(&token)
}

/// User-level access without a room
#[instrument(skip_all)]
pub fn build_user_token(client: &Client, user: &User) -> Result<String> {
    let user = user.clone().with_room("");
    let service = apaas_service(&user).with_privilege(apaas::USER, user.privilege_expire());
    client.issue(&client.access_token()?.with_service(service))
}

/// Application-level access; no user, no room
#[instrument(skip_all)]
pub fn build_app_token(client: &Client) -> Result<String> {
    let service = ApaasService::default().with_privilege(apaas::APP, client.expire());
    client.issue(&client.access_token()?.with_service(service))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builders::tests::client;
    use crate::core::identity::UserId;
    use crate::core::privileges::roles;
    use crate::core::service::{Service, ServiceType};
    use crate::protocol::AccessToken;

    fn apaas_of(token: &AccessToken) -> &ApaasService {
        match token.service(ServiceType::Apaas) {
            Some(Service::Apaas(service)) => service,
            other => panic!("expected Apaas service, got {other:?}"),
        }
    }

    fn student() -> User {
        User::new(UserId::Uid(2_882_341_273))
            .with_room("room1")
            .with_role(roles::RTC_PUBLISHER)
            .with_privilege_expire(3600)
    }

    #[test]
    fn test_room_user_token() {
        let token =
            AccessToken::parse(&build_room_user_token(&client(), &student()).unwrap()).unwrap();

        let order: Vec<ServiceType> = token.services.keys().copied().collect();
        assert_eq!(order, vec![ServiceType::Rtm, ServiceType::Chat, ServiceType::Apaas]);

        let service = apaas_of(&token);
        assert_eq!(service.room_id, "room1");
        assert_eq!(service.user_id, "2882341273");
        assert_eq!(service.role, roles::RTC_PUBLISHER);
        assert_eq!(service.privileges[&apaas::ROOM_USER], 3600);

        match token.service(ServiceType::Chat) {
            Some(Service::Chat(chat_service)) => {
                assert_eq!(chat_service.user_id, UserId::Uid(2_882_341_273).hashed_account());
                assert_eq!(chat_service.privileges[&chat::USER], 3600);
            }
            other => panic!("expected Chat service, got {other:?}"),
        }
    }

    #[test]
    fn test_user_token_clears_room() {
        let token = AccessToken::parse(&build_user_token(&client(), &student()).unwrap()).unwrap();
        let service = apaas_of(&token);
        assert_eq!(service.room_id, "");
        assert_eq!(service.user_id, "2882341273");
        assert_eq!(service.privileges[&apaas::USER], 3600);
    }

    #[test]
    fn test_app_token() {
        let token = AccessToken::parse(&build_app_token(&client()).unwrap()).unwrap();
        let service = apaas_of(&token);
        assert_eq!(service.user_id, "");
        assert_eq!(service.role, roles::NONE);
        assert_eq!(service.privileges[&apaas::APP], 600);
    }

    #[test]
    fn test_education_alias() {
        let token = crate::builders::education::build_app_token(&client()).unwrap();
        assert!(AccessToken::parse(&token).is_ok());
    }
}
