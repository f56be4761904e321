//! Station analysis pipeline.
//!
//! Orchestrates the full workflow for one station: year-file discovery,
//! concurrent parsing, chronological joining, harmonic fitting, trend
//! estimation, and the printed report.

use crate::constants::{PARSE_CONCURRENCY, SEA_LEVEL_COL, STATION_FILE_PATTERN};
use crate::error::{Result, TidalError};
use crate::harmonics::harmonic_analysis;
use crate::models::{AnalysisReport, StationRecord};
use crate::reader::read_station_year;
use crate::series::{join_series, timestamps_ms, zero_mean};
use crate::trend::sea_level_rise;

use chrono::{DateTime, Utc};
use colored::*;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task;
use tracing::{debug, error, warn};

/// Analysis driver for one station's yearly gauge files
pub struct StationProcessor {
    station_path: PathBuf,
    files: Vec<PathBuf>,
    constituents: Vec<String>,
}

impl StationProcessor {
    /// Create a processor for a station directory or a single gauge file.
    pub fn new(station_path: PathBuf, constituents: Vec<String>) -> Result<Self> {
        if !station_path.exists() {
            return Err(TidalError::FileNotFound { path: station_path });
        }

        let files = discover_station_files(&station_path)?;
        if files.is_empty() {
            return Err(TidalError::NoStationFiles { path: station_path });
        }

        Ok(Self {
            station_path,
            files,
            constituents,
        })
    }

    /// Run the full pipeline and print the report.
    ///
    /// Any parse or fit failure halts the run; no partial report is
    /// produced.
    pub async fn process(&self) -> Result<AnalysisReport> {
        let start_time = Instant::now();
        println!("{}", "Starting tidal analysis".bright_green().bold());
        println!(
            "  {} {}",
            "Station path:".bright_cyan(),
            self.station_path.display()
        );
        println!(
            "  {} {} station-year files",
            "Found".bright_cyan(),
            self.files.len().to_string().bright_white().bold()
        );

        let records = self.parse_station_files().await?;

        let station = records[0].header.station.clone();
        if records.iter().any(|r| r.header.station != station) {
            warn!("input files mix station identifiers; reporting as '{}'", station);
        }

        let mut joined: DataFrame = records[0].data.clone();
        for record in &records[1..] {
            joined = join_series(&joined, &record.data)?;
        }

        let total_samples = joined.height();
        let missing_samples = joined.column(SEA_LEVEL_COL)?.null_count();
        let (span_start, span_end) = series_span(&self.station_path, &joined)?;
        debug!(
            "Joined series: {} samples ({} missing), {} to {}",
            total_samples, missing_samples, span_start, span_end
        );

        // Phases are referenced to the start of the joined record
        let names: Vec<&str> = self.constituents.iter().map(String::as_str).collect();
        let segment = zero_mean(&joined)?;
        let constituents = harmonic_analysis(&segment, &names, span_start)?;

        let trend = sea_level_rise(&joined)?;

        let report = AnalysisReport {
            station,
            files_processed: self.files.len(),
            total_samples,
            missing_samples,
            span_start,
            span_end,
            constituents,
            trend,
            processing_time_ms: start_time.elapsed().as_millis(),
        };

        print_report(&report);
        Ok(report)
    }

    /// Parse all discovered year files concurrently, failing fast.
    async fn parse_station_files(&self) -> Result<Vec<StationRecord>> {
        let pb = ProgressBar::new(self.files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.set_message("Parsing station files");

        let pb_clone = pb.clone();
        let mut parsed = stream::iter(self.files.clone())
            .map(|path| {
                let pb = pb_clone.clone();
                async move {
                    let result = task::spawn_blocking({
                        let path = path.clone();
                        move || read_station_year(&path)
                    })
                    .await
                    .map_err(|e| TidalError::ProcessingFailed {
                        path: path.clone(),
                        reason: e.to_string(),
                    })?;
                    pb.inc(1);

                    match &result {
                        Ok(record) => debug!(
                            "Parsed {} ({} samples)",
                            path.display(),
                            record.data.height()
                        ),
                        Err(e) => error!("Failed to parse {}: {}", path.display(), e),
                    }
                    result
                }
            })
            .buffered(PARSE_CONCURRENCY);

        let mut records = Vec::with_capacity(self.files.len());
        while let Some(result) = parsed.next().await {
            records.push(result?);
        }
        pb.finish_with_message("Parsing complete");
        Ok(records)
    }
}

/// Locate the yearly gauge files for a station path.
fn discover_station_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let pattern = path.join(STATION_FILE_PATTERN);
    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .map_err(|e| TidalError::ProcessingFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
        .filter_map(|entry| entry.ok())
        .collect();
    files.sort();

    debug!("Discovered {} gauge files under {}", files.len(), path.display());
    Ok(files)
}

/// First and last timestamps of the joined series.
fn series_span(path: &Path, df: &DataFrame) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let timestamps = timestamps_ms(df)?;
    let first = timestamps.iter().flatten().next().copied();
    let last = timestamps.iter().flatten().next_back().copied();

    match (first, last) {
        (Some(first), Some(last)) => {
            let start = DateTime::from_timestamp_millis(first);
            let end = DateTime::from_timestamp_millis(last);
            match (start, end) {
                (Some(start), Some(end)) => Ok((start, end)),
                _ => Err(TidalError::ProcessingFailed {
                    path: path.to_path_buf(),
                    reason: "series timestamps out of representable range".to_string(),
                }),
            }
        }
        _ => Err(TidalError::ProcessingFailed {
            path: path.to_path_buf(),
            reason: "joined series contains no samples".to_string(),
        }),
    }
}

/// Print the human-readable analysis report to stdout.
fn print_report(report: &AnalysisReport) {
    println!(
        "\n{} {}",
        "Station:".bright_cyan(),
        report.station.bright_white().bold()
    );
    println!(
        "  {} {} hourly samples ({} missing), {} to {}",
        "Record:".bright_cyan(),
        report.total_samples,
        report.missing_samples,
        report.span_start.format("%Y-%m-%d %H:%M"),
        report.span_end.format("%Y-%m-%d %H:%M")
    );

    println!("\n{}", "Harmonic constituents".bright_yellow().bold());
    for estimate in &report.constituents {
        println!(
            "  {:<4} amplitude {:>8.4}   phase {:>7.2} deg",
            estimate.name.bright_white().bold(),
            estimate.amplitude,
            estimate.phase
        );
    }

    println!("\n{}", "Long-term trend".bright_yellow().bold());
    println!(
        "  {} {:+.4e} units/hour (p = {:.3})",
        "Sea-level change:".bright_cyan(),
        report.trend.slope,
        report.trend.p_value
    );

    println!(
        "\n{} {} files in {} ms",
        "Processed".bright_green(),
        report.files_processed,
        report.processing_time_ms
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_is_file_not_found() {
        let result = StationProcessor::new(PathBuf::from("/no/such/station"), vec![]);
        assert!(matches!(result, Err(TidalError::FileNotFound { .. })));
    }

    #[test]
    fn test_empty_directory_has_no_station_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = StationProcessor::new(dir.path().to_path_buf(), vec![]);
        assert!(matches!(result, Err(TidalError::NoStationFiles { .. })));
    }
}
