use crate::filters::rejection_reason;
use crate::parser::block::parse_block;
use crate::parser::locator::{locate_blocks, LocatorConfig};
use crate::types::GpsRecord;
use crate::{OnStarError, Result};
use log::{debug, info};
use std::path::Path;

/// Options for one extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractOptions {
    pub locator: LocatorConfig,
}

/// Counters for one extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractionStats {
    pub bytes_scanned: usize,
    /// Candidate blocks produced by the locator
    pub blocks_found: usize,
    /// Blocks that yielded a record (accepted or not)
    pub records_parsed: usize,
    pub accepted: usize,
    pub rejected: usize,
}

/// Accepted records in buffer order, plus run counters
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Vec<GpsRecord>,
    pub stats: ExtractionStats,
}

/// Extract GPS records from a file on disk
pub fn extract_file(file_path: &Path, options: &ExtractOptions) -> Result<Extraction> {
    let metadata = std::fs::metadata(file_path)?;
    debug!(
        "Reading {:?}: {} bytes ({:.2} MB)",
        file_path,
        metadata.len(),
        metadata.len() as f64 / 1024.0 / 1024.0
    );

    let file_data = std::fs::read(file_path)?;
    extract_with_stats(&file_data, options)
}

/// Extract accepted GPS records from a raw dump using default options.
///
/// A buffer without any GPS markers yields an empty list; only an empty
/// buffer is an error.
pub fn extract(data: &[u8]) -> Result<Vec<GpsRecord>> {
    Ok(extract_with_stats(data, &ExtractOptions::default())?.records)
}

/// Extract accepted GPS records and report how many blocks and records were seen
pub fn extract_with_stats(data: &[u8], options: &ExtractOptions) -> Result<Extraction> {
    if data.is_empty() {
        return Err(OnStarError::EmptyInput);
    }
    options.locator.validate()?;

    let blocks = locate_blocks(data, &options.locator);
    let mut stats = ExtractionStats {
        bytes_scanned: data.len(),
        blocks_found: blocks.len(),
        ..ExtractionStats::default()
    };

    let mut records = Vec::new();
    for block in &blocks {
        let Some(record) = parse_block(block) else {
            debug!("Block at {:?} holds no GPS fields", block.span);
            continue;
        };
        stats.records_parsed += 1;

        match rejection_reason(&record) {
            None => {
                stats.accepted += 1;
                records.push(record);
            }
            Some(reason) => {
                stats.rejected += 1;
                debug!("Rejected block at {:?}: {}", block.span, reason);
            }
        }
    }

    info!(
        "Scanned {} bytes: {} blocks, {} accepted, {} rejected",
        stats.bytes_scanned, stats.blocks_found, stats.accepted, stats.rejected
    );

    Ok(Extraction { records, stats })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_is_an_error() {
        assert!(matches!(extract(b""), Err(OnStarError::EmptyInput)));
    }

    #[test]
    fn test_buffer_without_anchors_is_empty_success() {
        let data = vec![0xA5u8; 8192];
        let extraction = extract_with_stats(&data, &ExtractOptions::default()).unwrap();
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.stats.blocks_found, 0);
        assert_eq!(extraction.stats.bytes_scanned, 8192);
    }

    #[test]
    fn test_invalid_locator_config_is_rejected() {
        let options = ExtractOptions {
            locator: LocatorConfig {
                trailing_window: 0,
                ..LocatorConfig::default()
            },
        };
        assert!(matches!(
            extract_with_stats(b"lat=1", &options),
            Err(OnStarError::Config(_))
        ));
    }

    #[test]
    fn test_incomplete_block_is_counted_as_rejected() {
        let extraction =
            extract_with_stats(b"\x00gps_week=2200 gps_tow=5\x00", &ExtractOptions::default())
                .unwrap();
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.stats.blocks_found, 1);
        assert_eq!(extraction.stats.records_parsed, 1);
        assert_eq!(extraction.stats.rejected, 1);
        assert_eq!(extraction.stats.accepted, 0);
    }
}
