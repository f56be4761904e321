//! Station-year file header parsing.
//!
//! Parses the preamble of a fixed-format gauge file to extract station
//! metadata and locate the start of the data section for line skipping.

use crate::constants::DATA_MARKER;
use crate::error::{Result, TidalError};
use crate::models::StationHeader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Extract station metadata from a gauge file preamble.
///
/// The preamble is a sequence of `key: value` lines terminated by a line
/// containing only the `data` marker. Returns the header together with the
/// number of lines to skip to reach the first day record.
pub fn parse_station_header(path: &Path) -> Result<(StationHeader, usize)> {
    let file = File::open(path).map_err(TidalError::Io)?;
    let reader = BufReader::new(file);

    let mut builder = StationHeaderBuilder::new();
    let mut skip_rows = None;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(TidalError::Io)?;

        if line.trim() == DATA_MARKER {
            skip_rows = Some(line_num + 1); // Line after "data"
            break;
        }

        builder.parse_line(&line);
    }

    let skip_rows = skip_rows.ok_or_else(|| TidalError::NoDataMarker {
        path: path.to_path_buf(),
    })?;

    let header = builder.build(path)?;

    debug!(
        "Parsed header for {}: station={}, year={}, skip_rows={}",
        path.display(),
        header.station,
        header.year,
        skip_rows
    );

    Ok((header, skip_rows))
}

/// Builder for station header extraction
struct StationHeaderBuilder {
    station: Option<String>,
    year: Option<String>,
    unit: Option<String>,
}

impl StationHeaderBuilder {
    fn new() -> Self {
        Self {
            station: None,
            year: None,
            unit: None,
        }
    }

    fn parse_line(&mut self, line: &str) {
        // Skip comments and empty lines
        if line.trim().is_empty() || line.starts_with('#') {
            return;
        }

        let Some((key, value)) = line.split_once(':') else {
            return;
        };

        let value = value.trim().to_string();
        match key.trim().to_lowercase().as_str() {
            "station" => self.station = Some(value),
            "year" => self.year = Some(value),
            "unit" => self.unit = Some(value),
            _ => {}
        }
    }

    fn build(self, path: &Path) -> Result<StationHeader> {
        let station = self.station.ok_or_else(|| TidalError::MalformedData {
            path: path.to_path_buf(),
            reason: "missing 'station' key in header".to_string(),
        })?;

        let year_str = self.year.ok_or_else(|| TidalError::MalformedData {
            path: path.to_path_buf(),
            reason: "missing 'year' key in header".to_string(),
        })?;

        let year = year_str
            .parse::<i32>()
            .map_err(|_| TidalError::MalformedData {
                path: path.to_path_buf(),
                reason: format!("unparseable year '{}' in header", year_str),
            })?;

        Ok(StationHeader {
            station,
            year,
            unit: self.unit,
        })
    }
}
