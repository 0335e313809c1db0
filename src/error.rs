use std::path::PathBuf;

use thiserror::Error;

/// Result type for report shaping and writing.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Failures while retrieving a report document from the API.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed report document: {0}")]
    Malformed(String),
}

/// Errors raised while shaping or writing a report.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("unknown column key '{0}' (run `pcireport list-columns`)")]
    InvalidColumnKey(String),

    #[error("at least one column must be selected")]
    NoColumns,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to build spreadsheet: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
}
