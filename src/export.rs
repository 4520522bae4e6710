//! Export functionality for extracted GPS records
//!
//! CSV is the primary output format. JSON and XLSX are available behind the
//! `json` and `xlsx` features. Files are written to a temporary file next to the destination and
//! renamed into place, so a failed export never leaves a partial file behind.

use crate::filters::MIN_PLAUSIBLE_YEAR;
use crate::types::*;
use crate::Result;
use chrono::Datelike;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Column layout of the CSV output; the six unnamed columns are reserved
pub const CSV_HEADER: [&str; 16] = [
    "lat",
    "long",
    "utc_year",
    "utc_month",
    "utc_day",
    "utc_hour",
    "utc_min",
    "timestamp_time",
    "",
    "",
    "",
    "",
    "",
    "",
    "lat_hex",
    "lon_hex",
];

/// Rendered in place of any field that did not resolve
pub const ERROR_MARKER: &str = "ERROR";

/// Rendered in place of a GPS timestamp that decodes to an implausible year
pub const PRE_2010_MARKER: &str = "INVALID PRE-2010 DATE";

/// Worksheet holding the records in XLSX output
pub const XLSX_SHEET_NAME: &str = "GPS Data";

/// Export options for controlling output formats
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub csv: bool,
    pub json: bool,
    pub xlsx: bool,
    pub dump_text: bool,
    pub output_dir: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            csv: true,
            json: false,
            xlsx: false,
            dump_text: false,
            output_dir: None,
        }
    }
}

/// Output locations derived from an input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub csv: PathBuf,
    pub json: PathBuf,
    pub xlsx: PathBuf,
    pub text: PathBuf,
}

/// Paths of the files actually written by [`export_records`]
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub csv_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
    pub xlsx_path: Option<PathBuf>,
}

/// Compute output paths for an input dump.
///
/// `CFL-23-0171.OnStar_NAND.CE0` becomes `CFL-23-0171.OnStar_NAND.csv`,
/// `CFL-23-0171.OnStar_NAND.json`, `CFL-23-0171.OnStar_NAND.xlsx` and
/// `CFL-23-0171.OnStar_NAND.CE0.txt`,
/// placed in `output_dir` if set, otherwise next to the input.
pub fn compute_export_paths(input_path: &Path, export_options: &ExportOptions) -> ExportPaths {
    let output_dir = export_options
        .output_dir
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| input_path.parent().map(Path::to_path_buf))
        .unwrap_or_default();

    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("onstar");
    let file_name = input_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("onstar");

    ExportPaths {
        csv: output_dir.join(format!("{stem}.csv")),
        json: output_dir.join(format!("{stem}.json")),
        xlsx: output_dir.join(format!("{stem}.xlsx")),
        text: output_dir.join(format!("{file_name}.txt")),
    }
}

/// Write to `path` through a temporary file in the same directory, renaming it
/// into place only after everything was written and synced.
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&File>) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        write(&mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;

    Ok(())
}

fn render_coordinate(field: &Field<f64>) -> String {
    match field {
        Field::Value(v) => v.to_string(),
        _ => ERROR_MARKER.to_string(),
    }
}

fn render_timestamp(record: &GpsRecord) -> String {
    match record.timestamp.value() {
        Some(ts) if i64::from(ts.year()) < MIN_PLAUSIBLE_YEAR => PRE_2010_MARKER.to_string(),
        Some(_) => record
            .timestamp_text()
            .unwrap_or_else(|| ERROR_MARKER.to_string()),
        None => ERROR_MARKER.to_string(),
    }
}

fn render_optional<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| ERROR_MARKER.to_string())
}

/// One CSV row in [`CSV_HEADER`] order
pub fn csv_row(record: &GpsRecord) -> [String; 16] {
    let [year, month, day, hour, minute] = record.utc.as_array();

    [
        render_coordinate(&record.latitude),
        render_coordinate(&record.longitude),
        render_optional(year),
        render_optional(month),
        render_optional(day),
        render_optional(hour),
        render_optional(minute),
        render_timestamp(record),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        render_optional(record.latitude_hex.as_deref()),
        render_optional(record.longitude_hex.as_deref()),
    ]
}

/// Serialize records as CSV: one header row, then one row per record
#[cfg(feature = "csv")]
pub fn serialize<W: Write>(records: &[GpsRecord], sink: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(sink);

    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record(csv_row(record))?;
    }
    writer.flush()?;

    Ok(())
}

/// Write records to a CSV file; either the whole file is written or `path` is left untouched
#[cfg(feature = "csv")]
pub fn write_csv_file(records: &[GpsRecord], path: &Path) -> Result<()> {
    write_atomically(path, |writer| serialize(records, writer))
}

/// Write records to a pretty-printed JSON file
#[cfg(feature = "json")]
pub fn export_to_json(records: &[GpsRecord], path: &Path) -> Result<()> {
    write_atomically(path, |writer| {
        serde_json::to_writer_pretty(&mut *writer, records)?;
        writeln!(writer)?;
        Ok(())
    })
}

/// Write records to an XLSX workbook with the CSV column layout
#[cfg(feature = "xlsx")]
pub fn export_to_xlsx(records: &[GpsRecord], path: &Path) -> Result<()> {
    // Coordinates and calendar fields are stored as numbers when they resolved
    const NUMERIC_COLUMNS: std::ops::Range<u16> = 0..7;

    let mut workbook = rust_xlsxwriter::Workbook::new();
    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(XLSX_SHEET_NAME)?;

        for (col, name) in (0u16..).zip(CSV_HEADER) {
            if !name.is_empty() {
                worksheet.write_string(0, col, name)?;
            }
        }

        for (row, record) in (1u32..).zip(records) {
            for (col, cell) in (0u16..).zip(csv_row(record)) {
                if cell.is_empty() {
                    continue;
                }
                match cell.parse::<f64>() {
                    Ok(number) if NUMERIC_COLUMNS.contains(&col) => {
                        worksheet.write_number(row, col, number)?;
                    }
                    _ => {
                        worksheet.write_string(row, col, cell.as_str())?;
                    }
                }
            }
        }
    }

    let buffer = workbook.save_to_buffer()?;
    write_atomically(path, |writer| {
        writer.write_all(&buffer)?;
        Ok(())
    })
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Export records in every format enabled in `export_options`.
///
/// Nothing is written if an enabled output would land on the input file.
pub fn export_records(
    records: &[GpsRecord],
    input_path: &Path,
    export_options: &ExportOptions,
) -> Result<ExportReport> {
    let paths = compute_export_paths(input_path, export_options);
    let mut report = ExportReport::default();

    let enabled = [
        (export_options.csv, &paths.csv),
        (export_options.json, &paths.json),
        (export_options.xlsx, &paths.xlsx),
    ];
    for (_, output) in enabled.iter().filter(|(on, _)| *on) {
        if is_same_file(output, input_path) {
            return Err(crate::OnStarError::Export(format!(
                "output {} would overwrite the input file",
                output.display()
            )));
        }
    }

    if let Some(dir) = paths.csv.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }

    if export_options.csv {
        #[cfg(feature = "csv")]
        {
            write_csv_file(records, &paths.csv)?;
            report.csv_path = Some(paths.csv);
        }
        #[cfg(not(feature = "csv"))]
        return Err(crate::OnStarError::Export(
            "CSV export requires the `csv` feature".to_string(),
        ));
    }

    if export_options.json {
        #[cfg(feature = "json")]
        {
            export_to_json(records, &paths.json)?;
            report.json_path = Some(paths.json);
        }
        #[cfg(not(feature = "json"))]
        return Err(crate::OnStarError::Export(
            "JSON export requires the `json` feature".to_string(),
        ));
    }

    if export_options.xlsx {
        #[cfg(feature = "xlsx")]
        {
            export_to_xlsx(records, &paths.xlsx)?;
            report.xlsx_path = Some(paths.xlsx);
        }
        #[cfg(not(feature = "xlsx"))]
        return Err(crate::OnStarError::Export(
            "XLSX export requires the `xlsx` feature".to_string(),
        ));
    }

    Ok(report)
}
