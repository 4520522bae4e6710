//! Record validation
//!
//! Decides which parsed records are real GPS samples. Rejected records are
//! dropped from the output without raising an error; the reason is only used
//! for diagnostics.

use crate::types::{Field, GpsRecord};
use std::fmt;

/// Earliest calendar year accepted. Garbage decodes tend to land near the
/// 1980 GPS epoch.
pub const MIN_PLAUSIBLE_YEAR: i64 = 2010;

/// Why a record was rejected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    LatitudeUnresolved,
    LatitudeOutOfRange(f64),
    LongitudeUnresolved,
    LongitudeOutOfRange(f64),
    /// Neither complete UTC components nor a GPS timestamp
    NoTime,
    ImplausibleYear(i64),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::LatitudeUnresolved => write!(f, "latitude missing or undecodable"),
            Rejection::LatitudeOutOfRange(v) => write!(f, "latitude {} out of range", v),
            Rejection::LongitudeUnresolved => write!(f, "longitude missing or undecodable"),
            Rejection::LongitudeOutOfRange(v) => write!(f, "longitude {} out of range", v),
            Rejection::NoTime => write!(f, "no usable time information"),
            Rejection::ImplausibleYear(y) => {
                write!(f, "year {} before {}", y, MIN_PLAUSIBLE_YEAR)
            }
        }
    }
}

fn check_coordinate(
    field: &Field<f64>,
    limit: f64,
    unresolved: Rejection,
    out_of_range: fn(f64) -> Rejection,
) -> Option<Rejection> {
    match field {
        // NaN fails the range check as well
        Field::Value(v) if (-limit..=limit).contains(v) => None,
        Field::Value(v) => Some(out_of_range(*v)),
        _ => Some(unresolved),
    }
}

/// First validation rule the record fails, or `None` if it is accepted
pub fn rejection_reason(record: &GpsRecord) -> Option<Rejection> {
    if let Some(reason) = check_coordinate(
        &record.latitude,
        90.0,
        Rejection::LatitudeUnresolved,
        Rejection::LatitudeOutOfRange,
    ) {
        return Some(reason);
    }
    if let Some(reason) = check_coordinate(
        &record.longitude,
        180.0,
        Rejection::LongitudeUnresolved,
        Rejection::LongitudeOutOfRange,
    ) {
        return Some(reason);
    }

    if !record.utc.is_complete() && !record.timestamp.is_value() {
        return Some(Rejection::NoTime);
    }

    match record.effective_year() {
        Some(year) if year >= MIN_PLAUSIBLE_YEAR => None,
        Some(year) => Some(Rejection::ImplausibleYear(year)),
        None => Some(Rejection::NoTime),
    }
}

/// Whether a record is a complete, plausible GPS sample
pub fn is_valid_record(record: &GpsRecord) -> bool {
    rejection_reason(record).is_none()
}
