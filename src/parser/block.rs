//! Candidate block parsing
//!
//! Pulls every known field out of one block and assembles a `GpsRecord`.
//! Field-level decode failures are kept on the record; whether the record is
//! usable is decided later by the validator.

use crate::conversion::{decode_coordinate_hex, gps_time_to_utc};
use crate::parser::extractor::gps_field_patterns;
use crate::types::{CandidateBlock, Field, GpsRecord, UtcComponents};
use chrono::{DateTime, Datelike, Timelike, Utc};

/// Raw field values found in a block, before decoding
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    pub gps_tow: Option<i64>,
    pub gps_week: Option<i64>,
    pub utc: UtcComponents,
    pub lat_hex: Option<String>,
    pub lon_hex: Option<String>,
}

impl RawFields {
    /// Run every field extractor over the block text
    pub fn extract(text: &str) -> Self {
        let patterns = gps_field_patterns();

        Self {
            gps_tow: patterns.gps_tow.extract_number(text),
            gps_week: patterns.gps_week.extract_number(text),
            utc: UtcComponents {
                year: patterns.utc_year.extract_number(text),
                month: patterns.utc_month.extract_number(text),
                day: patterns.utc_day.extract_number(text),
                hour: patterns.utc_hour.extract_number(text),
                minute: patterns.utc_min.extract_number(text),
            },
            lat_hex: patterns.lat.extract_hex(text),
            lon_hex: patterns.lon.extract_hex(text),
        }
    }

    /// No coordinate and no time information at all
    pub fn is_empty(&self) -> bool {
        self.lat_hex.is_none()
            && self.lon_hex.is_none()
            && self.utc.is_empty()
            && self.gps_week.is_none()
            && self.gps_tow.is_none()
    }

    /// Decode coordinates and time into a record
    pub fn into_record(self) -> GpsRecord {
        let latitude = decode_coordinate(self.lat_hex.as_deref());
        let longitude = decode_coordinate(self.lon_hex.as_deref());

        let timestamp = match (self.gps_week, self.gps_tow) {
            (Some(week), Some(tow)) => Field::from(gps_time_to_utc(week, tow)),
            _ => Field::Missing,
        };

        // Explicit calendar fields win; GPS time only fills in when none were found
        let utc = match timestamp.value() {
            Some(ts) if self.utc.is_empty() => utc_components_from(ts),
            _ => self.utc,
        };

        GpsRecord {
            latitude,
            longitude,
            latitude_hex: self.lat_hex,
            longitude_hex: self.lon_hex,
            utc,
            timestamp,
            gps_week: self.gps_week,
            gps_time_of_week: self.gps_tow,
        }
    }
}

fn decode_coordinate(hex: Option<&str>) -> Field<f64> {
    match hex {
        Some(hex) => Field::from(decode_coordinate_hex(hex)),
        None => Field::Missing,
    }
}

/// Calendar components of a derived timestamp
pub fn utc_components_from(ts: &DateTime<Utc>) -> UtcComponents {
    UtcComponents {
        year: Some(i64::from(ts.year())),
        month: Some(i64::from(ts.month())),
        day: Some(i64::from(ts.day())),
        hour: Some(i64::from(ts.hour())),
        minute: Some(i64::from(ts.minute())),
    }
}

/// Parse one block of text. Returns `None` when the block holds no coordinate
/// and no time information.
pub fn parse_block_text(text: &str) -> Option<GpsRecord> {
    let fields = RawFields::extract(text);
    if fields.is_empty() {
        return None;
    }
    Some(fields.into_record())
}

/// Parse one candidate block
pub fn parse_block(block: &CandidateBlock) -> Option<GpsRecord> {
    parse_block_text(&block.text)
}
