use crate::error::DecodeError;
use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Timestamp layout used for CSV output and display
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// A decoded field that may be missing from the block or may have failed to decode
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Field<T> {
    /// No pattern matched in the block
    Missing,
    /// Token was found but could not be decoded
    Invalid(DecodeError),
    Value(T),
}

impl<T> Field<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Field::Value(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Missing
    }
}

impl<T> From<Result<T, DecodeError>> for Field<T> {
    fn from(result: Result<T, DecodeError>) -> Self {
        match result {
            Ok(v) => Field::Value(v),
            Err(e) => Field::Invalid(e),
        }
    }
}

/// Calendar components as found in the block (or derived from GPS time)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UtcComponents {
    pub year: Option<i64>,
    pub month: Option<i64>,
    pub day: Option<i64>,
    pub hour: Option<i64>,
    pub minute: Option<i64>,
}

impl UtcComponents {
    /// All five components are present
    pub fn is_complete(&self) -> bool {
        self.year.is_some()
            && self.month.is_some()
            && self.day.is_some()
            && self.hour.is_some()
            && self.minute.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_none()
            && self.month.is_none()
            && self.day.is_none()
            && self.hour.is_none()
            && self.minute.is_none()
    }

    /// Components in CSV column order
    pub fn as_array(&self) -> [Option<i64>; 5] {
        [self.year, self.month, self.day, self.hour, self.minute]
    }
}

/// One GPS sample parsed from a candidate block
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsRecord {
    pub latitude: Field<f64>,
    pub longitude: Field<f64>,
    pub latitude_hex: Option<String>,
    pub longitude_hex: Option<String>,
    pub utc: UtcComponents,
    /// Timestamp derived from GPS week and time-of-week
    pub timestamp: Field<DateTime<Utc>>,
    pub gps_week: Option<i64>,
    pub gps_time_of_week: Option<i64>,
}

impl GpsRecord {
    /// Derived timestamp as `YYYY-MM-DD HH:MM:SS.mmm`
    pub fn timestamp_text(&self) -> Option<String> {
        self.timestamp
            .value()
            .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
    }

    /// Year used for plausibility checks: explicit UTC year when the calendar
    /// components are complete, otherwise the derived timestamp's year.
    pub fn effective_year(&self) -> Option<i64> {
        use chrono::Datelike;

        if self.utc.is_complete() {
            self.utc.year
        } else {
            self.timestamp.value().map(|ts| i64::from(ts.year()))
        }
    }
}
