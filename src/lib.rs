//! OnStar GPS extractor library
//!
//! Extracts GPS position and time records from OnStar Gen11 telematics NAND
//! dumps. The dumps are mostly binary; GPS samples show up as short ASCII
//! `key=value` fragments (`gps_week=`, `gps_tow=`, `lat=`, `lon=`, `utc_year=`
//! ...) with coordinates stored as hex-encoded little-endian doubles.
//!
//! # Features
//!
//! - **`csv`** (default): Enable CSV export functionality
//! - **`cli`** (default): Build the command-line interface binary
//! - **`json`**: Enable record export in JSON format
//! - **`xlsx`**: Enable record export as an XLSX workbook
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! Extract records from a dump and write them to CSV:
//! ```rust,no_run
//! use onstar_gps::{extract, write_csv_file};
//! use std::path::Path;
//!
//! let data = std::fs::read("CFL-23-0171.OnStar_NAND.CE0").unwrap();
//! let records = extract(&data).unwrap();
//! println!("Found {} valid GPS entries", records.len());
//! write_csv_file(&records, Path::new("CFL-23-0171.OnStar_NAND.csv")).unwrap();
//! ```
//!
//! With run counters and tuned block windows:
//! ```rust,no_run
//! use onstar_gps::{extract_file, ExtractOptions, LocatorConfig};
//! use std::path::Path;
//!
//! let options = ExtractOptions {
//!     locator: LocatorConfig {
//!         cluster_span: 600,
//!         ..LocatorConfig::default()
//!     },
//! };
//! let extraction = extract_file(Path::new("dump.CE0"), &options).unwrap();
//! println!(
//!     "{} accepted, {} rejected",
//!     extraction.stats.accepted, extraction.stats.rejected
//! );
//! ```
//!
//! # Public API
//!
//! ## Extraction
//! - [`extract`] - Extract accepted records from a byte buffer
//! - [`extract_with_stats`] - Same, with block/accept/reject counters
//! - [`extract_file`] - Read a file and extract
//! - [`locate_blocks`] - Low-level: find candidate blocks in a buffer
//! - [`parse_block`] - Low-level: parse one candidate block
//!
//! ## Conversion
//! - [`decode_coordinate_hex`] - Hex token to decimal degrees
//! - [`gps_time_to_utc`] - GPS week and time-of-week to UTC
//!
//! ## Validation
//! - [`is_valid_record`] / [`rejection_reason`]
//!
//! ## Export
//! - [`serialize`] - Write CSV to any writer
//! - [`write_csv_file`] - Write CSV to a file atomically
//! - [`export_records`] - Write every enabled format for an input file
//! - `export_to_json` / `export_to_xlsx` - Other formats, behind their features
//! - [`dump_plaintext`] - GPS-related printable strings for manual inspection

// Module declarations
pub mod conversion;
pub mod error;
pub mod export;
pub mod filters;
pub mod parser;
pub mod plaintext;
pub mod types;

// Re-export everything from modules for convenience
pub use conversion::*;
pub use error::*;
pub use export::*;
pub use filters::*;
pub use parser::*;
pub use plaintext::*;
pub use types::*;
