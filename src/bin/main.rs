//! CLI binary for the OnStar GPS extractor
//!
//! This provides the command-line interface for the onstar_gps library.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, Command};
use glob::glob;
use onstar_gps::{
    compute_export_paths, export_records, extract_with_stats, write_plaintext_dump,
    ExportOptions, ExtractOptions, LocatorConfig,
};
use std::path::{Path, PathBuf};

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .format_target(true)
        .init();
}

fn expand_patterns(file_patterns: &[&String]) -> Vec<PathBuf> {
    let mut valid_paths = Vec::new();

    for pattern in file_patterns {
        log::debug!("Processing pattern: {pattern}");

        let paths: Vec<_> = if pattern.contains('*') || pattern.contains('?') {
            match glob(pattern) {
                Ok(glob_iter) => match glob_iter.collect::<Result<Vec<_>, _>>() {
                    Ok(paths) => {
                        log::debug!("Glob pattern '{pattern}' matched {} files", paths.len());
                        paths
                    }
                    Err(e) => {
                        eprintln!("Error expanding glob pattern '{pattern}': {e}");
                        continue;
                    }
                },
                Err(e) => {
                    eprintln!("Invalid glob pattern '{pattern}': {e}");
                    continue;
                }
            }
        } else {
            vec![Path::new(pattern.as_str()).to_path_buf()]
        };

        for path in paths {
            if !path.is_file() {
                eprintln!("Warning: File does not exist: {path:?}");
                continue;
            }
            valid_paths.push(path);
        }
    }

    valid_paths
}

fn process_file(
    path: &Path,
    extract_options: &ExtractOptions,
    export_options: &ExportOptions,
) -> Result<()> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {path:?}"))?;
    log::debug!(
        "Read {:?}: {} bytes ({:.2} MB)",
        path,
        data.len(),
        data.len() as f64 / 1024.0 / 1024.0
    );

    let extraction = extract_with_stats(&data, extract_options)
        .with_context(|| format!("Failed to extract GPS data from {path:?}"))?;
    let stats = &extraction.stats;

    println!(
        "Found {} GPS blocks: {} valid entries, {} rejected.",
        stats.blocks_found, stats.accepted, stats.rejected
    );

    let report = export_records(&extraction.records, path, export_options)
        .with_context(|| format!("Failed to export GPS data for {path:?}"))?;
    if let Some(csv_path) = report.csv_path {
        println!("Results written to: {}", csv_path.display());
    }
    if let Some(json_path) = report.json_path {
        println!("JSON written to: {}", json_path.display());
    }
    if let Some(xlsx_path) = report.xlsx_path {
        println!("XLSX written to: {}", xlsx_path.display());
    }

    if export_options.dump_text {
        let text_path = compute_export_paths(path, export_options).text;
        let lines = write_plaintext_dump(&data, &text_path)
            .with_context(|| format!("Failed to write plaintext dump {text_path:?}"))?;
        println!("Plaintext dump ({lines} lines) written to: {}", text_path.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    let defaults = LocatorConfig::default();
    let matches = Command::new("OnStar GPS Extractor")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract GPS position and time records from OnStar Gen11 NAND dumps to CSV.")
        .arg(
            Arg::new("files")
                .help("Dump files to process (supports globbing)")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output and per-block diagnostics")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for output files (default: same as input file)")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("no-csv")
                .long("no-csv")
                .help("Do not write the CSV file")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Also export accepted records as JSON (requires the `json` feature)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("xlsx")
                .long("xlsx")
                .help("Also export accepted records as XLSX (requires the `xlsx` feature)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dump-text")
                .long("dump-text")
                .help("Write GPS-related printable strings to <input>.txt for manual inspection")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("cluster-span")
                .long("cluster-span")
                .help("Bytes within which GPS markers are grouped into one block [default: 1000]")
                .value_name("BYTES")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("trailing-window")
                .long("trailing-window")
                .help("Bytes kept after the last GPS marker of a block [default: 200]")
                .value_name("BYTES")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("padding")
                .long("padding")
                .help("Extra bytes of context on both sides of a block [default: 50]")
                .value_name("BYTES")
                .value_parser(value_parser!(usize)),
        )
        .get_matches();

    let debug = matches.get_flag("debug");
    init_logging(debug);

    let extract_options = ExtractOptions {
        locator: LocatorConfig {
            cluster_span: matches
                .get_one::<usize>("cluster-span")
                .copied()
                .unwrap_or(defaults.cluster_span),
            trailing_window: matches
                .get_one::<usize>("trailing-window")
                .copied()
                .unwrap_or(defaults.trailing_window),
            padding: matches
                .get_one::<usize>("padding")
                .copied()
                .unwrap_or(defaults.padding),
        },
    };

    let export_options = ExportOptions {
        csv: !matches.get_flag("no-csv"),
        json: matches.get_flag("json"),
        xlsx: matches.get_flag("xlsx"),
        dump_text: matches.get_flag("dump-text"),
        output_dir: matches.get_one::<String>("output-dir").cloned(),
    };

    let file_patterns: Vec<&String> = matches
        .get_many::<String>("files")
        .map(|values| values.collect())
        .unwrap_or_default();
    let valid_paths = expand_patterns(&file_patterns);

    if valid_paths.is_empty() {
        eprintln!("Error: No valid files found to process.");
        eprintln!("Input patterns were: {file_patterns:?}");
        std::process::exit(1);
    }

    let mut processed_files = 0;
    for (index, path) in valid_paths.iter().enumerate() {
        if index > 0 {
            println!();
        }

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        println!("Processing: {filename}");

        match process_file(path, &extract_options, &export_options) {
            Ok(()) => processed_files += 1,
            Err(e) => {
                eprintln!("Error processing {filename}: {e:#}");
                eprintln!("Continuing with next file...");
            }
        }
    }

    if processed_files == 0 {
        eprintln!(
            "Error: No files were successfully processed out of {} files found.",
            valid_paths.len()
        );
        eprintln!("Use --debug flag for more detailed error information.");
        std::process::exit(1);
    }

    Ok(())
}
