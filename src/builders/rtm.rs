//! RTM tokens (v007).

use super::{Client, User};
use crate::core::privileges::rtm;
use crate::core::service::{RtmService, ServiceRecord};
use crate::error::Result;
use tracing::instrument;

/// RTM login for `user`, expiring at `user.privilege_expire()`
#[instrument(skip_all)]
pub fn build_token(client: &Client, user: &User) -> Result<String> {
    let service = RtmService {
        user_id: user.account(),
        ..RtmService::default()
    }
    .with_privilege(rtm::LOGIN, user.privilege_expire());
    client.issue(&client.access_token()?.with_service(service))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builders::tests::client;
    use crate::core::identity::UserId;
    use crate::core::service::{Service, ServiceType};
    use crate::protocol::AccessToken;

    #[test]
    fn test_rtm_login() {
        let user = client().user(UserId::account("test_user").unwrap());
        let token = AccessToken::parse(&build_token(&client(), &user).unwrap()).unwrap();
        assert_eq!(token.services.len(), 1);
        match token.service(ServiceType::Rtm) {
            Some(Service::Rtm(service)) => {
                assert_eq!(service.user_id, "test_user");
                assert_eq!(service.privileges[&rtm::LOGIN], 3600);
            }
            other => panic!("expected RTM service, got {other:?}"),
        }
    }
}
