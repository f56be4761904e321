//! Tidal Analysis
//!
//! A Rust library for estimating harmonic tidal constituents and long-term
//! sea-level trends from fixed-format tide gauge records.
//!
//! This library provides tools for:
//! - Parsing station-year gauge files with embedded quality-flag sentinels
//! - Merging multi-year records into one chronologically ordered series
//! - Extracting calendar-bounded, zero-mean segments
//! - Fitting tidal constituents by SVD least squares against a fixed
//!   astronomical reference table
//! - Fitting a linear sea-level trend with significance testing

pub mod cli;
pub mod constants;
pub mod constituents;
pub mod error;
pub mod harmonics;
pub mod header;
pub mod models;
pub mod processor;
pub mod reader;
pub mod series;
pub mod trend;

// Re-export commonly used types
pub use error::{Result, TidalError};
pub use models::{
    AnalysisReport, ConstituentEstimate, StationHeader, StationRecord, TrendEstimate,
};
