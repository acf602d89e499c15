//! # Core Token Components
//!
//! Low-level binary packing and the per-service record layouts.
//!
//! This module provides the building blocks both token versions are
//! assembled from.
//!
//! ## Components
//! - **Primitives**: little-endian integers, length-prefixed strings, sorted maps
//! - **Service**: RTC/RTM/FPA/Chat/Apaas records
//! - **Identity**: credentials and the uid/account union
//! - **Privileges**: privilege codes and roles
//!
//! ## Limits
//! - Strings and maps carry a 16-bit count, so at most 65535 bytes/entries
//! - Every read is bounds-checked against the remaining buffer

pub mod identity;
pub mod primitives;
pub mod privileges;
pub mod service;
