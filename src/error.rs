use std::fmt;

/// Run-level errors for GPS extraction and export
#[derive(Debug)]
pub enum OnStarError {
    /// I/O errors
    Io(std::io::Error),
    /// Input buffer was empty
    EmptyInput,
    /// Invalid extraction or export configuration
    Config(String),
    /// CSV writer errors
    #[cfg(feature = "csv")]
    Csv(csv::Error),
    /// JSON serialization errors
    #[cfg(feature = "json")]
    Json(serde_json::Error),
    /// XLSX workbook errors
    #[cfg(feature = "xlsx")]
    Xlsx(rust_xlsxwriter::XlsxError),
    /// Export format error
    Export(String),
}

impl fmt::Display for OnStarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnStarError::Io(err) => write!(f, "I/O error: {}", err),
            OnStarError::EmptyInput => write!(f, "Input buffer is empty"),
            OnStarError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
            #[cfg(feature = "csv")]
            OnStarError::Csv(err) => write!(f, "CSV error: {}", err),
            #[cfg(feature = "json")]
            OnStarError::Json(err) => write!(f, "JSON error: {}", err),
            #[cfg(feature = "xlsx")]
            OnStarError::Xlsx(err) => write!(f, "XLSX error: {}", err),
            OnStarError::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for OnStarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OnStarError::Io(err) => Some(err),
            #[cfg(feature = "csv")]
            OnStarError::Csv(err) => Some(err),
            #[cfg(feature = "json")]
            OnStarError::Json(err) => Some(err),
            #[cfg(feature = "xlsx")]
            OnStarError::Xlsx(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for OnStarError {
    fn from(err: std::io::Error) -> Self {
        OnStarError::Io(err)
    }
}

impl From<tempfile::PersistError> for OnStarError {
    fn from(err: tempfile::PersistError) -> Self {
        OnStarError::Io(err.error)
    }
}

#[cfg(feature = "csv")]
impl From<csv::Error> for OnStarError {
    fn from(err: csv::Error) -> Self {
        OnStarError::Csv(err)
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for OnStarError {
    fn from(err: serde_json::Error) -> Self {
        OnStarError::Json(err)
    }
}

#[cfg(feature = "xlsx")]
impl From<rust_xlsxwriter::XlsxError> for OnStarError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        OnStarError::Xlsx(err)
    }
}

pub type Result<T> = std::result::Result<T, OnStarError>;

/// Field-local decode failures. These never abort a record or a run; the
/// affected field is carried as invalid and rendered `ERROR` on export.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecodeError {
    /// Hex token is not exactly 16 characters long
    HexLength(usize),
    /// Hex token contains a non-hex character
    InvalidHex(String),
    /// GPS week / time-of-week outside the convertible range
    GpsTimeOutOfRange { week: i64, time_of_week_ms: i64 },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::HexLength(len) => {
                write!(f, "hex token has {} characters, expected 16", len)
            }
            DecodeError::InvalidHex(token) => write!(f, "invalid hex token: {}", token),
            DecodeError::GpsTimeOutOfRange {
                week,
                time_of_week_ms,
            } => write!(
                f,
                "GPS time out of range: week {} tow {} ms",
                week, time_of_week_ms
            ),
        }
    }
}

impl std::error::Error for DecodeError {}
