//! Error handling for tidal analysis operations.
//!
//! Provides error types with context for gauge file parsing, series
//! manipulation, and regression failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TidalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Malformed gauge record in file: {path} - {reason}")]
    MalformedData { path: PathBuf, reason: String },

    #[error("No data marker found in file: {path}")]
    NoDataMarker { path: PathBuf },

    #[error("No station-year files found at: {path}")]
    NoStationFiles { path: PathBuf },

    #[error("Invalid date token '{token}': {reason}")]
    InvalidDate { token: String, reason: String },

    #[error("Unknown tidal constituent: {name}")]
    UnknownConstituent { name: String },

    #[error("Least-squares fit failed: {reason}")]
    FitFailed { reason: String },

    #[error("Processing failed for file: {path} - {reason}")]
    ProcessingFailed { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, TidalError>;
