//! # Binary Primitives
//!
//! Little-endian packing of fixed-width integers, 16-bit length-prefixed
//! strings and `u16 -> u32` maps.
//!
//! Packing appends to any [`BufMut`]. Unpacking reads from any [`Buf`] and
//! advances it, so a `&mut &[u8]` acts as the cursor over a token body.
//! Every read checks `remaining()` first and fails with
//! [`TokenError::MalformedData`] instead of panicking.
//!
//! ## Wire Format
//! ```text
//! u16 / i16 : 2 bytes LE
//! u32       : 4 bytes LE
//! string    : [len: u16] [bytes: len]
//! map       : [count: u16] ([key: u16] [value: u32]) * count, keys ascending
//! ```

use crate::error::{constants, Result, TokenError};
use bytes::{Buf, BufMut};
use std::collections::BTreeMap;

/// Largest length a 16-bit prefix can describe
pub const MAX_PREFIXED_LEN: usize = u16::MAX as usize;

#[inline]
fn ensure_remaining<B: Buf>(buf: &B, needed: usize) -> Result<()> {
    if buf.remaining() < needed {
        return Err(TokenError::MalformedData(format!(
            "{}: needed {needed}, have {}",
            constants::ERR_BUFFER_UNDERRUN,
            buf.remaining()
        )));
    }
    Ok(())
}

/// Converts a length into its 16-bit prefix, rejecting anything above 65535
#[inline]
pub fn length_prefix(len: usize) -> Result<u16> {
    u16::try_from(len).map_err(|_| TokenError::EncodingOverflow(len))
}

pub fn pack_uint16<B: BufMut>(buf: &mut B, value: u16) {
    buf.put_u16_le(value);
}

pub fn unpack_uint16<B: Buf>(buf: &mut B) -> Result<u16> {
    ensure_remaining(buf, 2)?;
    Ok(buf.get_u16_le())
}

pub fn pack_uint32<B: BufMut>(buf: &mut B, value: u32) {
    buf.put_u32_le(value);
}

pub fn unpack_uint32<B: Buf>(buf: &mut B) -> Result<u32> {
    ensure_remaining(buf, 4)?;
    Ok(buf.get_u32_le())
}

pub fn pack_int16<B: BufMut>(buf: &mut B, value: i16) {
    buf.put_i16_le(value);
}

pub fn unpack_int16<B: Buf>(buf: &mut B) -> Result<i16> {
    ensure_remaining(buf, 2)?;
    Ok(buf.get_i16_le())
}

/// Writes `[len: u16][bytes]`.
///
/// # Errors
/// Returns `TokenError::EncodingOverflow` if `bytes` is longer than 65535.
/// Nothing is written in that case.
pub fn pack_bytes<B: BufMut>(buf: &mut B, bytes: &[u8]) -> Result<()> {
    let len = length_prefix(bytes.len())?;
    buf.put_u16_le(len);
    buf.put_slice(bytes);
    Ok(())
}

/// Reads `[len: u16][bytes]` and returns the bytes
pub fn unpack_bytes<B: Buf>(buf: &mut B) -> Result<Vec<u8>> {
    let len = unpack_uint16(buf)? as usize;
    ensure_remaining(buf, len)?;
    let mut out = vec![0u8; len];
    buf.copy_to_slice(&mut out);
    Ok(out)
}

pub fn pack_string<B: BufMut>(buf: &mut B, value: &str) -> Result<()> {
    pack_bytes(buf, value.as_bytes())
}

/// Reads a length-prefixed string.
///
/// Every string field (app id, channel, user id, account) is text, so a
/// field that is not UTF-8 rejects the whole token.
///
/// # Errors
/// `TokenError::MalformedData` on underrun or when the bytes are not UTF-8.
pub fn unpack_string<B: Buf>(buf: &mut B) -> Result<String> {
    let bytes = unpack_bytes(buf)?;
    String::from_utf8(bytes)
        .map_err(|_| TokenError::MalformedData(constants::ERR_INVALID_UTF8.into()))
}

/// Writes the map as a count followed by `(key, value)` pairs in ascending
/// key order. `BTreeMap` iteration is already sorted, which keeps the output
/// independent of insertion order.
pub fn pack_map_uint32<B: BufMut>(buf: &mut B, map: &BTreeMap<u16, u32>) -> Result<()> {
    let count = length_prefix(map.len())?;
    buf.put_u16_le(count);
    for (&key, &value) in map {
        buf.put_u16_le(key);
        buf.put_u32_le(value);
    }
    Ok(())
}

/// Inverse of [`pack_map_uint32`]. A repeated key keeps its last value.
pub fn unpack_map_uint32<B: Buf>(buf: &mut B) -> Result<BTreeMap<u16, u32>> {
    let count = unpack_uint16(buf)?;
    let mut map = BTreeMap::new();
    for _ in 0..count {
        let key = unpack_uint16(buf)?;
        let value = unpack_uint32(buf)?;
        map.insert(key, value);
    }
    Ok(map)
}
