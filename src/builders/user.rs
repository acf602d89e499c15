use crate::core::identity::UserId;
use crate::core::privileges::roles;

/// Everything a builder needs to know about the grantee.
///
/// Built with consuming `with_*` methods; every builder takes it by reference
/// and never changes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    user_id: UserId,
    channel: String,
    room_id: String,
    role: i16,
    privilege_expire: u32,
    join_channel_expire: u32,
    publish_audio_expire: u32,
    publish_video_expire: u32,
    publish_data_stream_expire: u32,
    hash_account: bool,
}

impl User {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            channel: String::new(),
            room_id: String::new(),
            role: roles::NONE,
            privilege_expire: 0,
            join_channel_expire: 0,
            publish_audio_expire: 0,
            publish_video_expire: 0,
            publish_data_stream_expire: 0,
            hash_account: false,
        }
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    pub fn with_room(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = room_id.into();
        self
    }

    pub fn with_role(mut self, role: i16) -> Self {
        self.role = role;
        self
    }

    /// Seconds from issue. The v006 builders turn it into an absolute time.
    pub fn with_privilege_expire(mut self, expire: u32) -> Self {
        self.privilege_expire = expire;
        self
    }

    pub fn with_join_channel_expire(mut self, expire: u32) -> Self {
        self.join_channel_expire = expire;
        self
    }

    pub fn with_publish_audio_expire(mut self, expire: u32) -> Self {
        self.publish_audio_expire = expire;
        self
    }

    pub fn with_publish_video_expire(mut self, expire: u32) -> Self {
        self.publish_video_expire = expire;
        self
    }

    pub fn with_publish_data_stream_expire(mut self, expire: u32) -> Self {
        self.publish_data_stream_expire = expire;
        self
    }

    /// Present the account as its MD5 hex digest
    pub fn with_hash_account(mut self, hash: bool) -> Self {
        self.hash_account = hash;
        self
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Account string packed into service records
    pub fn account(&self) -> String {
        if self.hash_account {
            self.user_id.hashed_account()
        } else {
            self.user_id.as_account_string()
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn role(&self) -> i16 {
        self.role
    }

    pub fn privilege_expire(&self) -> u32 {
        self.privilege_expire
    }

    pub fn join_channel_expire(&self) -> u32 {
        self.join_channel_expire
    }

    pub fn publish_audio_expire(&self) -> u32 {
        self.publish_audio_expire
    }

    pub fn publish_video_expire(&self) -> u32 {
        self.publish_video_expire
    }

    pub fn publish_data_stream_expire(&self) -> u32 {
        self.publish_data_stream_expire
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let user = User::new(UserId::Uid(0));
        assert_eq!(user.role(), roles::NONE);
        assert_eq!(user.account(), "");
        assert_eq!(user.privilege_expire(), 0);
    }

    #[test]
    fn test_hashed_account() {
        let user = User::new(UserId::account("user1").unwrap()).with_hash_account(true);
        // md5("user1")
        assert_eq!(user.account(), "24c9e15e52afc47c225b757e7bee1f9d");
        assert_eq!(user.clone().with_hash_account(false).account(), "user1");
    }

    #[test]
    fn test_with_methods_leave_original_untouched() {
        let base = User::new(UserId::Uid(5)).with_room("r1");
        let cleared = base.clone().with_room("");
        assert_eq!(base.room_id(), "r1");
        assert_eq!(cleared.room_id(), "");
    }
}
