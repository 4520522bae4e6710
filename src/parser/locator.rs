//! Candidate block location
//!
//! GPS samples appear in the dump as short runs of ASCII `key=value` text
//! surrounded by binary data. Anchor keys are located in the raw bytes, nearby
//! anchors are grouped into one cluster, and each cluster becomes a window of
//! ISO-8859-1 decoded text for the block parser.

use crate::error::{OnStarError, Result};
use crate::types::CandidateBlock;
use log::debug;
use regex::bytes::Regex;
use std::sync::OnceLock;

/// Keys that mark the presence of a GPS sample
pub const GPS_ANCHORS: [&str; 5] = ["gps_tow", "gps_week", "utc_year", "lat", "lon"];

/// Separator accepted between an anchor key and its value, same as the field extractor
const ANCHOR_SEPARATOR: &str = r"[ \t\r\n]*[=:]";

/// Window sizing for block location, in bytes
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocatorConfig {
    /// Anchors closer than this to the first anchor of a cluster join that cluster
    pub cluster_span: usize,
    /// Bytes kept after the last anchor in a cluster
    pub trailing_window: usize,
    /// Extra context on both sides of the window
    pub padding: usize,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            cluster_span: 1000,
            trailing_window: 200,
            padding: 50,
        }
    }
}

impl LocatorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cluster_span == 0 {
            return Err(OnStarError::Config(
                "cluster span must be greater than zero".to_string(),
            ));
        }
        if self.trailing_window == 0 {
            return Err(OnStarError::Config(
                "trailing window must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Decode bytes as ISO-8859-1. Every byte maps to the code point of the same
/// value, so this never fails and never loses data.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn anchor_regex() -> &'static Regex {
    static ANCHORS: OnceLock<Regex> = OnceLock::new();
    ANCHORS.get_or_init(|| {
        let alternation = GPS_ANCHORS
            .iter()
            .map(|a| regex::escape(a))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!("(?:{alternation}){ANCHOR_SEPARATOR}"))
            .expect("anchor alternation is a valid regex")
    })
}

/// Byte offsets of every anchor in the buffer, in ascending order
pub fn find_anchor_positions(data: &[u8]) -> Vec<usize> {
    anchor_regex().find_iter(data).map(|m| m.start()).collect()
}

/// Slice the buffer into candidate blocks around clusters of anchors.
///
/// Blocks come back in buffer order. The trailing window of one block may
/// overlap the start of the next.
pub fn locate_blocks(data: &[u8], config: &LocatorConfig) -> Vec<CandidateBlock> {
    let positions = find_anchor_positions(data);
    debug!("Found {} GPS anchors in {} bytes", positions.len(), data.len());

    let mut blocks = Vec::new();
    let mut i = 0;
    while i < positions.len() {
        let cluster_start = positions[i];
        let mut cluster_end = cluster_start.saturating_add(config.trailing_window);

        let mut j = i + 1;
        while j < positions.len() && positions[j] - cluster_start < config.cluster_span {
            cluster_end = cluster_end.max(positions[j].saturating_add(config.trailing_window));
            j += 1;
        }

        let start = cluster_start.saturating_sub(config.padding);
        let end = cluster_end.saturating_add(config.padding).min(data.len());
        debug!(
            "Block {}: bytes {}..{} ({} anchors)",
            blocks.len(),
            start,
            end,
            j - i
        );
        blocks.push(CandidateBlock::new(start..end, decode_latin1(&data[start..end])));
        i = j;
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noise(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 7) as u8 | 0x80).collect()
    }

    #[test]
    fn test_decode_latin1_preserves_every_byte() {
        let all: Vec<u8> = (0..=255u8).collect();
        let text = decode_latin1(&all);
        assert_eq!(text.chars().count(), 256);
        for (c, b) in text.chars().zip(all.iter()) {
            assert_eq!(c as u32, u32::from(*b));
        }
    }

    #[test]
    fn test_no_anchors_yields_no_blocks() {
        let data = noise(4096);
        assert!(locate_blocks(&data, &LocatorConfig::default()).is_empty());
        assert!(locate_blocks(b"", &LocatorConfig::default()).is_empty());
    }

    #[test]
    fn test_find_anchor_positions() {
        let data = b"..gps_tow=1..lat=AB..lon=CD..gps_week=2..utc_year=2024";
        assert_eq!(find_anchor_positions(data), vec![2, 13, 21, 29, 41]);
    }

    #[test]
    fn test_anchor_tolerates_spaced_separators() {
        let data = b"..utc_year = 2021..lat :AB..lon\r\n=CD..utc_year 2021..latitude=1";
        assert_eq!(find_anchor_positions(data), vec![2, 19, 28]);
    }

    #[test]
    fn test_window_keeps_spaced_leading_key() {
        let mut data = noise(200);
        let sample_start = data.len();
        data.extend_from_slice(b"\0utc_year = 2021\0utc_month=11\0utc_day=2\0utc_hour=23\0utc_min=59\0");
        data.extend_from_slice(b"lat=00000015703DB941\0lon=00008098CBF6C8C1\0");
        data.extend(noise(200));

        let blocks = locate_blocks(&data, &LocatorConfig::default());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].span.start, sample_start + 1 - 50);
        assert!(blocks[0].text.contains("utc_year = 2021"));
    }

    #[test]
    fn test_nearby_anchors_form_one_block() {
        let mut data = noise(100);
        data.extend_from_slice(b"gps_tow=1 gps_week=2 lat=3 lon=4");
        data.extend(noise(100));

        let blocks = locate_blocks(&data, &LocatorConfig::default());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].span.start, 50);
        assert_eq!(blocks[0].span.end, data.len());
        assert!(blocks[0].text.contains("gps_tow=1 gps_week=2 lat=3 lon=4"));
    }

    #[test]
    fn test_distant_anchors_form_separate_blocks() {
        let mut data = b"lat=1".to_vec();
        data.extend(noise(2000));
        data.extend_from_slice(b"lat=2");
        data.extend(noise(2000));

        let blocks = locate_blocks(&data, &LocatorConfig::default());
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].span.start < blocks[1].span.start);
        assert!(blocks[0].text.starts_with("lat=1"));
        assert!(blocks[1].text.contains("lat=2"));
        assert!(!blocks[0].text.contains("lat=2"));
        // 200 trailing + 50 padding after the anchor
        assert_eq!(blocks[0].len(), 250);
    }

    #[test]
    fn test_window_sizes_are_tunable() {
        let mut data = b"lat=1".to_vec();
        data.extend(noise(300));
        data.extend_from_slice(b"lat=2");
        data.extend(noise(300));

        assert_eq!(locate_blocks(&data, &LocatorConfig::default()).len(), 1);

        let narrow = LocatorConfig {
            cluster_span: 100,
            trailing_window: 50,
            padding: 0,
        };
        let blocks = locate_blocks(&data, &narrow);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].span, 0..50);
    }

    #[test]
    fn test_validate_config() {
        assert!(LocatorConfig::default().validate().is_ok());
        let bad = LocatorConfig {
            cluster_span: 0,
            ..LocatorConfig::default()
        };
        assert!(matches!(bad.validate(), Err(OnStarError::Config(_))));
    }
}
