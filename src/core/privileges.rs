//! Privilege codes and role values.
//!
//! A privilege is a small integer paired with an absolute expiry timestamp.
//! Codes are scoped to their service, so `rtc::JOIN_CHANNEL` and
//! `rtm::LOGIN` share the value 1.

use std::collections::BTreeMap;

/// Privilege code to absolute expiry (unix seconds).
///
/// A `BTreeMap` so serialization always walks keys in ascending order.
pub type PrivilegeSet = BTreeMap<u16, u32>;

pub mod rtc {
    pub const JOIN_CHANNEL: u16 = 1;
    pub const PUBLISH_AUDIO_STREAM: u16 = 2;
    pub const PUBLISH_VIDEO_STREAM: u16 = 3;
    pub const PUBLISH_DATA_STREAM: u16 = 4;
}

pub mod rtm {
    pub const LOGIN: u16 = 1;
}

pub mod fpa {
    pub const LOGIN: u16 = 1;
}

pub mod chat {
    /// Client-side login for a single user
    pub const USER: u16 = 1;
    /// Server-side application privileges
    pub const APP: u16 = 2;
}

pub mod apaas {
    pub const ROOM_USER: u16 = 1;
    pub const USER: u16 = 2;
    pub const APP: u16 = 3;
}

/// Privilege codes of the v006 token format
pub mod legacy {
    pub const JOIN_CHANNEL: u16 = 1;
    pub const PUBLISH_AUDIO_STREAM: u16 = 2;
    pub const PUBLISH_VIDEO_STREAM: u16 = 3;
    pub const PUBLISH_DATA_STREAM: u16 = 4;
    pub const RTM_LOGIN: u16 = 1000;
}

/// Role values carried by users and packed (as `i16`) into Apaas records
pub mod roles {
    pub const NONE: i16 = -1;
    pub const RTC_ATTENDEE: i16 = 0;
    pub const RTC_PUBLISHER: i16 = 1;
    pub const RTC_SUBSCRIBER: i16 = 2;
    pub const RTC_ADMIN: i16 = 101;
    pub const RTM_USER: i16 = 1;
}
