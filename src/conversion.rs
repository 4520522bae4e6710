//! Data conversion utilities for OnStar GPS fields
//!
//! Coordinates are stored as little-endian IEEE-754 doubles scaled by 10^7 and
//! written out as 16 hex characters. Time is stored as GPS week plus
//! time-of-week in milliseconds.

use crate::error::DecodeError;
use crate::types::TIMESTAMP_FORMAT;
use chrono::{DateTime, Utc};

/// Scale applied to raw coordinate doubles (degrees * 10^7)
pub const COORDINATE_SCALE: f64 = 10_000_000.0;

/// Length of a hex-encoded coordinate token
pub const COORDINATE_HEX_LEN: usize = 16;

/// 1980-01-06T00:00:00Z as a Unix timestamp
pub const GPS_EPOCH_UNIX_SECONDS: i64 = 315_964_800;

pub const SECONDS_PER_WEEK: i64 = 604_800;

pub const MILLIS_PER_WEEK: i64 = SECONDS_PER_WEEK * 1000;

/// Upper bound on plausible GPS week numbers (year ~2056)
pub const MAX_GPS_WEEK: i64 = 4000;

/// Decode a 16-character hex token into the raw little-endian double
pub fn decode_raw_hex(hex: &str) -> Result<f64, DecodeError> {
    let len = hex.chars().count();
    if len != COORDINATE_HEX_LEN {
        return Err(DecodeError::HexLength(len));
    }
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DecodeError::InvalidHex(hex.to_string()));
    }

    let mut bytes = [0u8; 8];
    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
            .map_err(|_| DecodeError::InvalidHex(hex.to_string()))?;
    }

    Ok(f64::from_le_bytes(bytes))
}

/// Encode a raw double as the 16-character uppercase hex token used on disk
pub fn encode_raw_hex(raw: f64) -> String {
    raw.to_le_bytes().iter().map(|b| format!("{b:02X}")).collect()
}

/// Convert a hex coordinate token to decimal degrees
pub fn decode_coordinate_hex(hex: &str) -> Result<f64, DecodeError> {
    Ok(decode_raw_hex(hex)? / COORDINATE_SCALE)
}

/// Convert GPS week and time-of-week (milliseconds) to a UTC timestamp.
///
/// This is a fixed linear map from the GPS epoch; no leap-second table is
/// applied.
pub fn gps_time_to_utc(week: i64, time_of_week_ms: i64) -> Result<DateTime<Utc>, DecodeError> {
    let out_of_range = || DecodeError::GpsTimeOutOfRange {
        week,
        time_of_week_ms,
    };

    if !(0..=MAX_GPS_WEEK).contains(&week) || !(0..=MILLIS_PER_WEEK).contains(&time_of_week_ms) {
        return Err(out_of_range());
    }

    let millis = GPS_EPOCH_UNIX_SECONDS * 1000 + week * MILLIS_PER_WEEK + time_of_week_ms;
    DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(out_of_range)
}

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS.mmm`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}
