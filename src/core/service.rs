//! # Service Records
//!
//! One binary block per product area. Every record starts with the same base
//! pack and then appends its own fields:
//!
//! ```text
//! [type: u16] [privileges: map<u16,u32>] [service fields...]
//!
//! RTC   : [channel_name: string] [user_id: string]
//! RTM   : [user_id: string]
//! FPA   : (none)
//! Chat  : [user_id: string]
//! Apaas : [room_id: string] [user_id: string] [role: i16]
//! ```
//!
//! The leading type tag is read by the token codec, which then calls
//! [`Service::unpack`] with it. Unknown tags fail the whole parse.

use crate::core::identity::UserId;
use crate::core::primitives::{
    pack_int16, pack_map_uint32, pack_string, pack_uint16, unpack_int16, unpack_map_uint32,
    unpack_string,
};
use crate::core::privileges::{roles, PrivilegeSet};
use crate::error::{Result, TokenError};
use bytes::{Buf, BufMut};

/// Service type tags as they appear on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum ServiceType {
    Rtc = 1,
    Rtm = 2,
    Fpa = 4,
    Chat = 5,
    Apaas = 7,
}

impl ServiceType {
    pub fn tag(self) -> u16 {
        self as u16
    }

    pub fn from_tag(tag: u16) -> Option<Self> {
        match tag {
            1 => Some(ServiceType::Rtc),
            2 => Some(ServiceType::Rtm),
            4 => Some(ServiceType::Fpa),
            5 => Some(ServiceType::Chat),
            7 => Some(ServiceType::Apaas),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ServiceType::Rtc => "RTC",
            ServiceType::Rtm => "RTM",
            ServiceType::Fpa => "FPA",
            ServiceType::Chat => "CHAT",
            ServiceType::Apaas => "APAAS",
        }
    }
}

/// Behaviour shared by every service record.
///
/// Implementors only describe their own fields; the base pack (type tag
/// and privilege map) is written by the provided [`ServiceRecord::pack`].
pub trait ServiceRecord: Sized {
    const SERVICE_TYPE: ServiceType;

    fn privileges(&self) -> &PrivilegeSet;

    fn privileges_mut(&mut self) -> &mut PrivilegeSet;

    /// Writes the fields that follow the base pack
    fn pack_fields<B: BufMut>(&self, buf: &mut B) -> Result<()>;

    /// Reads the fields that follow the base pack
    fn unpack_fields<B: Buf>(privileges: PrivilegeSet, buf: &mut B) -> Result<Self>;

    /// Adds or replaces a privilege
    fn with_privilege(mut self, privilege: u16, expire: u32) -> Self {
        self.privileges_mut().insert(privilege, expire);
        self
    }

    fn pack<B: BufMut>(&self, buf: &mut B) -> Result<()> {
        pack_uint16(buf, Self::SERVICE_TYPE.tag());
        pack_map_uint32(buf, self.privileges())?;
        self.pack_fields(buf)
    }

    /// Reads everything after the type tag
    fn unpack<B: Buf>(buf: &mut B) -> Result<Self> {
        let privileges = unpack_map_uint32(buf)?;
        Self::unpack_fields(privileges, buf)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RtcService {
    pub privileges: PrivilegeSet,
    pub channel_name: String,
    pub user_id: String,
}

impl RtcService {
    pub fn new(channel_name: impl Into<String>, user_id: &UserId) -> Self {
        Self {
            privileges: PrivilegeSet::new(),
            channel_name: channel_name.into(),
            user_id: user_id.as_account_string(),
        }
    }
}

impl ServiceRecord for RtcService {
    const SERVICE_TYPE: ServiceType = ServiceType::Rtc;

    fn privileges(&self) -> &PrivilegeSet {
        &self.privileges
    }

    fn privileges_mut(&mut self) -> &mut PrivilegeSet {
        &mut self.privileges
    }

    fn pack_fields<B: BufMut>(&self, buf: &mut B) -> Result<()> {
        pack_string(buf, &self.channel_name)?;
        pack_string(buf, &self.user_id)
    }

    fn unpack_fields<B: Buf>(privileges: PrivilegeSet, buf: &mut B) -> Result<Self> {
        let channel_name = unpack_string(buf)?;
        let user_id = unpack_string(buf)?;
        Ok(Self {
            privileges,
            channel_name,
            user_id,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RtmService {
    pub privileges: PrivilegeSet,
    pub user_id: String,
}

impl RtmService {
    pub fn new(user_id: &UserId) -> Self {
        Self {
            privileges: PrivilegeSet::new(),
            user_id: user_id.as_account_string(),
        }
    }
}

impl ServiceRecord for RtmService {
    const SERVICE_TYPE: ServiceType = ServiceType::Rtm;

    fn privileges(&self) -> &PrivilegeSet {
        &self.privileges
    }

    fn privileges_mut(&mut self) -> &mut PrivilegeSet {
        &mut self.privileges
    }

    fn pack_fields<B: BufMut>(&self, buf: &mut B) -> Result<()> {
        pack_string(buf, &self.user_id)
    }

    fn unpack_fields<B: Buf>(privileges: PrivilegeSet, buf: &mut B) -> Result<Self> {
        let user_id = unpack_string(buf)?;
        Ok(Self {
            privileges,
            user_id,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FpaService {
    pub privileges: PrivilegeSet,
}

impl FpaService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ServiceRecord for FpaService {
    const SERVICE_TYPE: ServiceType = ServiceType::Fpa;

    fn privileges(&self) -> &PrivilegeSet {
        &self.privileges
    }

    fn privileges_mut(&mut self) -> &mut PrivilegeSet {
        &mut self.privileges
    }

    fn pack_fields<B: BufMut>(&self, _buf: &mut B) -> Result<()> {
        Ok(())
    }

    fn unpack_fields<B: Buf>(privileges: PrivilegeSet, _buf: &mut B) -> Result<Self> {
        Ok(Self { privileges })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatService {
    pub privileges: PrivilegeSet,
    pub user_id: String,
}

impl ChatService {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            privileges: PrivilegeSet::new(),
            user_id: user_id.into(),
        }
    }
}

impl ServiceRecord for ChatService {
    const SERVICE_TYPE: ServiceType = ServiceType::Chat;

    fn privileges(&self) -> &PrivilegeSet {
        &self.privileges
    }

    fn privileges_mut(&mut self) -> &mut PrivilegeSet {
        &mut self.privileges
    }

    fn pack_fields<B: BufMut>(&self, buf: &mut B) -> Result<()> {
        pack_string(buf, &self.user_id)
    }

    fn unpack_fields<B: Buf>(privileges: PrivilegeSet, buf: &mut B) -> Result<Self> {
        let user_id = unpack_string(buf)?;
        Ok(Self {
            privileges,
            user_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApaasService {
    pub privileges: PrivilegeSet,
    pub room_id: String,
    pub user_id: String,
    pub role: i16,
}

impl Default for ApaasService {
    fn default() -> Self {
        Self {
            privileges: PrivilegeSet::new(),
            room_id: String::new(),
            user_id: String::new(),
            role: roles::NONE,
        }
    }
}

impl ApaasService {
    pub fn new(room_id: impl Into<String>, user_id: &UserId, role: i16) -> Self {
        Self {
            privileges: PrivilegeSet::new(),
            room_id: room_id.into(),
            user_id: user_id.as_account_string(),
            role,
        }
    }
}

impl ServiceRecord for ApaasService {
    const SERVICE_TYPE: ServiceType = ServiceType::Apaas;

    fn privileges(&self) -> &PrivilegeSet {
        &self.privileges
    }

    fn privileges_mut(&mut self) -> &mut PrivilegeSet {
        &mut self.privileges
    }

    fn pack_fields<B: BufMut>(&self, buf: &mut B) -> Result<()> {
        pack_string(buf, &self.room_id)?;
        pack_string(buf, &self.user_id)?;
        pack_int16(buf, self.role);
        Ok(())
    }

    fn unpack_fields<B: Buf>(privileges: PrivilegeSet, buf: &mut B) -> Result<Self> {
        let room_id = unpack_string(buf)?;
        let user_id = unpack_string(buf)?;
        let role = unpack_int16(buf)?;
        Ok(Self {
            privileges,
            room_id,
            user_id,
            role,
        })
    }
}

/// A service record of any type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Service {
    Rtc(RtcService),
    Rtm(RtmService),
    Fpa(FpaService),
    Chat(ChatService),
    Apaas(ApaasService),
}

impl Service {
    pub fn service_type(&self) -> ServiceType {
        match self {
            Service::Rtc(_) => ServiceType::Rtc,
            Service::Rtm(_) => ServiceType::Rtm,
            Service::Fpa(_) => ServiceType::Fpa,
            Service::Chat(_) => ServiceType::Chat,
            Service::Apaas(_) => ServiceType::Apaas,
        }
    }

    pub fn privileges(&self) -> &PrivilegeSet {
        match self {
            Service::Rtc(s) => s.privileges(),
            Service::Rtm(s) => s.privileges(),
            Service::Fpa(s) => s.privileges(),
            Service::Chat(s) => s.privileges(),
            Service::Apaas(s) => s.privileges(),
        }
    }

    /// Writes the full record, type tag included
    pub fn pack<B: BufMut>(&self, buf: &mut B) -> Result<()> {
        match self {
            Service::Rtc(s) => s.pack(buf),
            Service::Rtm(s) => s.pack(buf),
            Service::Fpa(s) => s.pack(buf),
            Service::Chat(s) => s.pack(buf),
            Service::Apaas(s) => s.pack(buf),
        }
    }

    /// Reads the record that follows an already consumed type tag.
    ///
    /// # Errors
    /// `TokenError::UnknownServiceType` if `tag` names no known service,
    /// `TokenError::MalformedData` if the record is truncated.
    pub fn unpack<B: Buf>(tag: u16, buf: &mut B) -> Result<Self> {
        match ServiceType::from_tag(tag) {
            Some(ServiceType::Rtc) => RtcService::unpack(buf).map(Service::Rtc),
            Some(ServiceType::Rtm) => RtmService::unpack(buf).map(Service::Rtm),
            Some(ServiceType::Fpa) => FpaService::unpack(buf).map(Service::Fpa),
            Some(ServiceType::Chat) => ChatService::unpack(buf).map(Service::Chat),
            Some(ServiceType::Apaas) => ApaasService::unpack(buf).map(Service::Apaas),
            None => Err(TokenError::UnknownServiceType(tag)),
        }
    }
}

impl From<RtcService> for Service {
    fn from(s: RtcService) -> Self {
        Service::Rtc(s)
    }
}

impl From<RtmService> for Service {
    fn from(s: RtmService) -> Self {
        Service::Rtm(s)
    }
}

impl From<FpaService> for Service {
    fn from(s: FpaService) -> Self {
        Service::Fpa(s)
    }
}

impl From<ChatService> for Service {
    fn from(s: ChatService) -> Self {
        Service::Chat(s)
    }
}

impl From<ApaasService> for Service {
    fn from(s: ApaasService) -> Self {
        Service::Apaas(s)
    }
}
