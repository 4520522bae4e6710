//! CSV output validation through the command-line binary

#![cfg(feature = "cli")]

mod common;

use common::*;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const HEADER: &str =
    "lat,long,utc_year,utc_month,utc_day,utc_hour,utc_min,timestamp_time,,,,,,,lat_hex,lon_hex";

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_onstar_gps"))
        .args(args)
        .output()
        .expect("Failed to run onstar_gps")
}

fn write_input(dir: &Path, name: &str, data: &[u8]) -> String {
    let path = dir.join(name);
    fs::write(&path, data).expect("Failed to write input dump");
    path.to_str().unwrap().to_string()
}

#[test]
fn test_cli_writes_expected_csv() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_input(temp_dir.path(), "CFL-23-0171.OnStar_NAND.CE0", &two_sample_dump());

    let output = run_cli(&[&input]);
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 valid entries"), "stdout was: {stdout}");

    let csv_path = temp_dir.path().join("CFL-23-0171.OnStar_NAND.csv");
    let csv_content = fs::read_to_string(&csv_path).expect("Failed to read generated CSV file");
    let lines: Vec<&str> = csv_content.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], HEADER);
    assert_eq!(
        lines[1],
        format!("42.3456789,-83.7654321,2022,3,6,1,2,2022-03-06 01:02:03.456,,,,,,,{LAT_1_HEX},{LON_1_HEX}")
    );
    assert_eq!(
        lines[2],
        format!("40.1234567,-74.9876543,2023,2,20,0,0,2023-02-20 00:00:00.000,,,,,,,{LAT_2_HEX},{LON_2_HEX}")
    );
}

#[test]
fn test_csv_field_count_consistency() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let data = dump(&[
        gps_fragment(LAT_1_HEX, LON_1_HEX, 2200, 0),
        utc_fragment(LAT_2_HEX, LON_2_HEX, 2019),
        gps_fragment(LAT_2_HEX, LON_1_HEX, 2300, 500_000),
    ]);
    let input = write_input(temp_dir.path(), "dump.bin", &data);

    let output = run_cli(&[&input]);
    assert!(output.status.success());

    let csv_content = fs::read_to_string(temp_dir.path().join("dump.csv")).unwrap();
    let lines: Vec<&str> = csv_content.lines().collect();
    assert_eq!(lines.len(), 4);

    let header_fields = lines[0].split(',').count();
    assert_eq!(header_fields, 16);
    for (i, line) in lines.iter().enumerate().skip(1) {
        assert_eq!(
            line.split(',').count(),
            header_fields,
            "Row {} has the wrong field count: {}",
            i + 1,
            line
        );
    }

    // The explicit-UTC sample has no GPS time
    let utc_row: Vec<&str> = lines[2].split(',').collect();
    assert_eq!(utc_row[2..7], ["2019", "11", "2", "23", "59"]);
    assert_eq!(utc_row[7], "ERROR");
}

#[test]
fn test_cli_output_dir_and_text_dump() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let out_dir = temp_dir.path().join("results").join("gps");
    let input = write_input(temp_dir.path(), "dump.CE0", &two_sample_dump());

    let output = run_cli(&[
        "--output-dir",
        out_dir.to_str().unwrap(),
        "--dump-text",
        &input,
    ]);
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert!(out_dir.join("dump.csv").exists());
    let dump_text = fs::read_to_string(out_dir.join("dump.CE0.txt")).unwrap();
    assert!(dump_text.contains(&format!("lat={LAT_1_HEX}")));
    assert!(dump_text.contains("gps_week=2250"));
}

#[test]
fn test_cli_file_without_markers_writes_header_only() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_input(temp_dir.path(), "blank.bin", &noise(4096));

    let output = run_cli(&[&input]);
    assert!(output.status.success());

    let csv_content = fs::read_to_string(temp_dir.path().join("blank.csv")).unwrap();
    assert_eq!(csv_content, format!("{HEADER}\n"));
}

#[test]
fn test_cli_empty_file_fails_without_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_input(temp_dir.path(), "empty.bin", &[]);

    let output = run_cli(&[&input]);
    assert!(!output.status.success());
    assert!(!temp_dir.path().join("empty.csv").exists());
}

#[test]
fn test_cli_missing_file_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("missing.CE0");

    let output = run_cli(&[missing.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No valid files"));
}

#[test]
fn test_cli_does_not_overwrite_input_named_like_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let original = two_sample_dump();
    let input = write_input(temp_dir.path(), "dump.csv", &original);

    let output = run_cli(&[&input]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("overwrite the input"));
    assert_eq!(fs::read(&input).unwrap(), original);
}

#[test]
fn test_cli_dump_text_without_csv() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_input(temp_dir.path(), "dump.CE0", &two_sample_dump());

    let output = run_cli(&["--no-csv", "--dump-text", &input]);
    assert!(output.status.success());
    assert!(!temp_dir.path().join("dump.csv").exists());
    let dump_text = fs::read_to_string(temp_dir.path().join("dump.CE0.txt")).unwrap();
    assert_eq!(dump_text.lines().count(), 8);
}
