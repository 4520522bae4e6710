//! Tolerant key=value field extraction
//!
//! Each GPS field has an ordered list of patterns, most specific first. The
//! first pattern that yields a usable value wins, regardless of where in the
//! block it matched. Lower-priority patterns cover the looser encodings seen
//! in dumps (`gps_week = 2200`, `gps_week:2200`, bare `week=2200`).

use crate::conversion::COORDINATE_HEX_LEN;
use regex::Regex;
use std::sync::OnceLock;

/// One compiled pattern with a single capture group holding the value
#[derive(Debug, Clone)]
pub struct FieldPattern {
    regex: Regex,
}

impl FieldPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// Return the first capture of this pattern in `text`
    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Ordered list of patterns for one field
#[derive(Debug, Clone)]
pub struct FieldPatterns {
    name: &'static str,
    patterns: Vec<FieldPattern>,
}

impl FieldPatterns {
    pub fn new<S: AsRef<str>>(name: &'static str, patterns: &[S]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| FieldPattern::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { name, patterns })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn patterns(&self) -> &[FieldPattern] {
        &self.patterns
    }

    /// Extract a signed decimal integer. Captures that do not fit in an `i64`
    /// fall through to the next pattern.
    pub fn extract_number(&self, text: &str) -> Option<i64> {
        self.patterns
            .iter()
            .filter_map(|p| p.capture(text))
            .find_map(|raw| raw.parse::<i64>().ok())
    }

    /// Extract a 16-character hex token. Non-hex characters are stripped from
    /// the capture; anything other than exactly 16 remaining characters is a
    /// non-match for that pattern.
    pub fn extract_hex(&self, text: &str) -> Option<String> {
        self.patterns
            .iter()
            .filter_map(|p| p.capture(text))
            .find_map(clean_hex_token)
    }
}

/// Strip non-hex characters; keep the token only if exactly 16 remain
pub fn clean_hex_token(raw: &str) -> Option<String> {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_hexdigit()).collect();
    (cleaned.len() == COORDINATE_HEX_LEN).then_some(cleaned)
}

/// Pattern lists for every field the block parser understands
#[derive(Debug, Clone)]
pub struct GpsFieldPatterns {
    pub gps_tow: FieldPatterns,
    pub gps_week: FieldPatterns,
    pub utc_year: FieldPatterns,
    pub utc_month: FieldPatterns,
    pub utc_day: FieldPatterns,
    pub utc_hour: FieldPatterns,
    pub utc_min: FieldPatterns,
    pub lat: FieldPatterns,
    pub lon: FieldPatterns,
}

// ASCII whitespace only; `\s` would also match NBSP/NEL from the ISO-8859-1 decode
const SEP: &str = r"[ \t\r\n]*[=:][ \t\r\n]*";

fn number_patterns(
    name: &'static str,
    bare: &str,
    bare_value: &str,
) -> Result<FieldPatterns, regex::Error> {
    FieldPatterns::new(
        name,
        &[
            format!(r"{name}=(-?[0-9]+)"),
            format!(r"{name}{SEP}(-?[0-9]+)"),
            format!(r"{bare}=({bare_value})"),
        ],
    )
}

fn hex_patterns(name: &'static str) -> Result<FieldPatterns, regex::Error> {
    FieldPatterns::new(
        name,
        &[
            format!(r"{name}=([0-9A-Fa-f]{{16}})(?:[^0-9A-Fa-f]|$)"),
            format!(r"{name}{SEP}([0-9A-Fa-f][0-9A-Fa-f \t\r\n]*)"),
        ],
    )
}

impl GpsFieldPatterns {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            gps_tow: number_patterns("gps_tow", "tow", "-?[0-9]+")?,
            gps_week: number_patterns("gps_week", "week", "-?[0-9]+")?,
            utc_year: number_patterns("utc_year", "year", "[0-9]{4}")?,
            utc_month: number_patterns("utc_month", "month", "-?[0-9]+")?,
            utc_day: number_patterns("utc_day", "day", "-?[0-9]+")?,
            utc_hour: number_patterns("utc_hour", "hour", "-?[0-9]+")?,
            utc_min: number_patterns("utc_min", "min", "-?[0-9]+")?,
            lat: hex_patterns("lat")?,
            lon: hex_patterns("lon")?,
        })
    }
}

/// Shared, lazily compiled pattern set
pub fn gps_field_patterns() -> &'static GpsFieldPatterns {
    static PATTERNS: OnceLock<GpsFieldPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        GpsFieldPatterns::new().expect("built-in GPS field patterns are valid")
    })
}
