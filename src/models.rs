//! Core data structures for tidal analysis.
//!
//! Defines station metadata, analysis result types, and processing
//! statistics used throughout the library.

use chrono::{DateTime, Utc};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Metadata extracted from a station-year file preamble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationHeader {
    /// Short station identifier, e.g. "ABE"
    pub station: String,
    /// Calendar year covered by the file
    pub year: i32,
    /// Sea-level unit as recorded by the agency, if present
    pub unit: Option<String>,
}

/// One parsed station-year: header plus the hourly series frame.
///
/// Produced by [`crate::reader::read_station_year`] and consumed by the
/// joiner; not retained after merging.
#[derive(Debug, Clone)]
pub struct StationRecord {
    pub header: StationHeader,
    pub data: DataFrame,
}

/// Amplitude and phase of a single fitted tidal constituent.
///
/// Amplitude is in the sea-level units of the input series; phase is in
/// degrees in [0, 360), relative to the reference epoch of the fit.
#[derive(Debug, Clone, Serialize)]
pub struct ConstituentEstimate {
    pub name: String,
    pub amplitude: f64,
    pub phase: f64,
}

/// Linear sea-level trend fitted against elapsed hours.
#[derive(Debug, Clone, Serialize)]
pub struct TrendEstimate {
    /// Sea-level units per hour
    pub slope: f64,
    /// Sea level at the series start
    pub intercept: f64,
    /// Two-sided p-value for the null hypothesis slope = 0
    pub p_value: f64,
}

/// Summary of one full station analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub station: String,
    pub files_processed: usize,
    pub total_samples: usize,
    pub missing_samples: usize,
    pub span_start: DateTime<Utc>,
    pub span_end: DateTime<Utc>,
    pub constituents: Vec<ConstituentEstimate>,
    pub trend: TrendEstimate,
    pub processing_time_ms: u128,
}
