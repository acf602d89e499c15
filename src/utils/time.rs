use crate::error::{constants, Result, TokenError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds in a day, the lifetime of a v006 message
pub const SECONDS_PER_DAY: u32 = 24 * 3600;

/// Get the current unix timestamp in seconds
///
/// # Errors
/// Returns `TokenError::MalformedData` if the system time is earlier than
/// UNIX_EPOCH, `TokenError::EncodingOverflow` once it no longer fits 32 bits
pub fn current_timestamp() -> Result<u32> {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| TokenError::MalformedData(constants::ERR_SYSTEM_TIME.into()))?
        .as_secs();
    u32::try_from(secs).map_err(|_| TokenError::EncodingOverflow(secs as usize))
}

/// `now + seconds`, saturating at `u32::MAX`
pub fn expires_in(seconds: u32) -> Result<u32> {
    Ok(current_timestamp()?.saturating_add(seconds))
}
