//! Plaintext dump of GPS-related strings
//!
//! A `strings`-style pass over the dump that keeps printable ASCII runs which
//! mention a GPS keyword and carry a number or hex value. Used for manual
//! inspection when the structured extraction finds nothing.

use crate::export::write_atomically;
use crate::Result;
use regex::bytes::Regex as BytesRegex;
use regex::Regex;
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;

/// Minimum length of a printable run worth keeping
pub const MIN_RUN_LEN: usize = 4;

/// Substrings that mark a run as GPS-related
pub const DUMP_KEYWORDS: [&str; 6] = ["tow", "week", "gps", "utc", "lat", "lon"];

struct DumpPatterns {
    printable_run: BytesRegex,
    keyword: Regex,
    hex_or_number: Regex,
}

fn dump_patterns() -> &'static DumpPatterns {
    static PATTERNS: OnceLock<DumpPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| DumpPatterns {
        printable_run: BytesRegex::new(&format!(r"(?-u)[\x20-\x7E]{{{MIN_RUN_LEN},}}"))
            .expect("printable run pattern is valid"),
        keyword: Regex::new(&DUMP_KEYWORDS.join("|")).expect("keyword pattern is valid"),
        hex_or_number: Regex::new(r"\b([0-9A-Fa-f]{2,}|[0-9]+(\.[0-9]+)?)\b")
            .expect("hex/number pattern is valid"),
    })
}

/// Printable runs that mention a GPS keyword and contain a hex code or number
pub fn dump_plaintext(data: &[u8]) -> Vec<String> {
    let patterns = dump_patterns();

    patterns
        .printable_run
        .find_iter(data)
        // Printable ASCII is always valid UTF-8
        .filter_map(|m| std::str::from_utf8(m.as_bytes()).ok())
        .filter(|line| patterns.keyword.is_match(line) && patterns.hex_or_number.is_match(line))
        .map(str::to_string)
        .collect()
}

/// Write the plaintext dump to `path`, one run per line. Returns the number of lines.
pub fn write_plaintext_dump(data: &[u8], path: &Path) -> Result<usize> {
    let lines = dump_plaintext(data);
    write_atomically(path, |writer| {
        for line in &lines {
            writeln!(writer, "{line}")?;
        }
        Ok(())
    })?;
    Ok(lines.len())
}
