/// Error types for loading COVID-19 datasets
use std::fmt;
use thiserror::Error;

/// Failure to read or normalize a single source
#[derive(Error, Debug)]
pub enum CoreError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Server answered but not with a usable body
    #[error("Bad HTTP response: {0}")]
    BadResponse(String),

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Failed to read a local file
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// A required column is absent from the header
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    /// Header matched no known vaccination layout
    #[error("Unrecognized vaccination layout: {0}")]
    UnknownLayout(String),
}

/// Type alias for Results using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;

/// One failed attempt while walking the source list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAttempt {
    pub source: String,
    pub reason: String,
}

impl fmt::Display for SourceAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.source, self.reason)
    }
}

/// Every configured source failed to load or parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No data source could be loaded; tried: {}", format_attempts(.attempts))]
pub struct DataUnavailableError {
    pub attempts: Vec<SourceAttempt>,
}

fn format_attempts(attempts: &[SourceAttempt]) -> String {
    if attempts.is_empty() {
        return "no sources configured".to_string();
    }
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
