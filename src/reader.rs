//! Station-year gauge file parsing.
//!
//! Reads one fixed-format station-year file into an hourly tidal series.
//! Each data line carries one calendar day: a `YYYY/MM/DD` date followed by
//! 24 hourly sea-level readings. Readings flagged by the source agency with
//! a trailing sentinel letter (M = missing, N = not checked, T = tentative)
//! are stored as nulls so the timestamp slot is retained.

use crate::constants::{DAY_DATE_FORMAT, END_DATA_MARKER, MS_PER_HOUR, READINGS_PER_DAY};
use crate::error::{Result, TidalError};
use crate::header::parse_station_header;
use crate::models::StationRecord;
use crate::series::series_frame;
use chrono::{Datelike, NaiveDate, NaiveTime};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Numeric field carrying a trailing quality-flag letter
static SENTINEL_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(?:\.\d+)?[MNT]$").expect("sentinel pattern is valid"));

/// Parse a single hourly sea-level field.
///
/// Returns `Ok(None)` for readings flagged with a sentinel letter, `Ok(Some)`
/// for clean numeric readings, and the offending token otherwise. This is the
/// only place sentinel stripping happens.
pub fn parse_hourly_field(field: &str) -> std::result::Result<Option<f64>, String> {
    if SENTINEL_FIELD.is_match(field) {
        return Ok(None);
    }
    field
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("unparseable sea-level field '{}'", field))
}

/// Read one station-year gauge file into a [`StationRecord`].
///
/// A complete file yields exactly 8760 hourly entries (8784 for a leap
/// year). Missing day lines are tolerated; they simply contribute no rows.
pub fn read_station_year(path: &Path) -> Result<StationRecord> {
    if !path.exists() {
        return Err(TidalError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let (header, skip_rows) = parse_station_header(path)?;

    let file = File::open(path).map_err(TidalError::Io)?;
    let reader = BufReader::new(file);

    let mut timestamps_ms = Vec::new();
    let mut values: Vec<Option<f64>> = Vec::new();
    let mut previous_day: Option<NaiveDate> = None;

    let malformed = |line_num: usize, reason: String| TidalError::MalformedData {
        path: path.to_path_buf(),
        reason: format!("line {}: {}", line_num + 1, reason),
    };

    for (line_num, line) in reader.lines().enumerate().skip(skip_rows) {
        let line = line.map_err(TidalError::Io)?;
        let trimmed = line.trim();

        if trimmed == END_DATA_MARKER {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() != READINGS_PER_DAY + 1 {
            return Err(malformed(
                line_num,
                format!(
                    "expected {} fields (date + {} readings), found {}",
                    READINGS_PER_DAY + 1,
                    READINGS_PER_DAY,
                    fields.len()
                ),
            ));
        }

        let day = NaiveDate::parse_from_str(fields[0], DAY_DATE_FORMAT)
            .map_err(|e| malformed(line_num, format!("bad date '{}': {}", fields[0], e)))?;

        if day.year() != header.year {
            return Err(malformed(
                line_num,
                format!("date {} outside header year {}", day, header.year),
            ));
        }

        if let Some(prev) = previous_day {
            if day <= prev {
                return Err(malformed(
                    line_num,
                    format!("day {} out of order after {}", day, prev),
                ));
            }
        }
        previous_day = Some(day);

        let midnight_ms = day.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
        for (hour, field) in fields[1..].iter().enumerate() {
            let value = parse_hourly_field(field).map_err(|reason| malformed(line_num, reason))?;
            timestamps_ms.push(midnight_ms + hour as i64 * MS_PER_HOUR);
            values.push(value);
        }
    }

    debug!(
        "Read {} hourly samples for station {} year {}",
        timestamps_ms.len(),
        header.station,
        header.year
    );

    let data = series_frame(timestamps_ms, values)?;
    Ok(StationRecord { header, data })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SEA_LEVEL_COL;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Write a synthetic station-year file with constant readings, marking
    /// the first reading of the year with the given sentinel suffix.
    fn write_year_file(dir: &TempDir, station: &str, year: i32, sentinel: Option<char>) -> PathBuf {
        let path = dir.path().join(format!("{}{}.txt", year, station));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "station: {}", station).unwrap();
        writeln!(file, "year: {}", year).unwrap();
        writeln!(file, "unit: m").unwrap();
        writeln!(file, "data").unwrap();

        let mut day = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
        let mut first = true;
        while day.year() == year {
            let mut line = day.format(DAY_DATE_FORMAT).to_string();
            for _ in 0..READINGS_PER_DAY {
                if first && sentinel.is_some() {
                    line.push_str(&format!(" 2.9110{}", sentinel.unwrap()));
                    first = false;
                } else {
                    line.push_str(" 3.0000");
                }
            }
            writeln!(file, "{}", line).unwrap();
            day = day.succ_opt().unwrap();
        }
        writeln!(file, "end data").unwrap();
        path
    }

    #[test]
    fn test_full_year_has_8760_entries() {
        let dir = TempDir::new().unwrap();
        let path = write_year_file(&dir, "ABE", 1947, None);

        let record = read_station_year(&path).unwrap();
        assert_eq!(record.header.station, "ABE");
        assert_eq!(record.header.year, 1947);
        assert_eq!(record.data.height(), 8760);
        assert_eq!(record.data.column(SEA_LEVEL_COL).unwrap().null_count(), 0);
    }

    #[test]
    fn test_leap_year_has_8784_entries() {
        let dir = TempDir::new().unwrap();
        let path = write_year_file(&dir, "ABE", 1948, None);

        let record = read_station_year(&path).unwrap();
        assert_eq!(record.data.height(), 8784);
    }

    #[test]
    fn test_sentinel_readings_become_null() {
        let dir = TempDir::new().unwrap();
        for sentinel in ['M', 'N', 'T'] {
            let path = write_year_file(&dir, "ABE", 1947, Some(sentinel));
            let record = read_station_year(&path).unwrap();

            // Timestamp slot retained, value nulled
            assert_eq!(record.data.height(), 8760);
            assert_eq!(record.data.column(SEA_LEVEL_COL).unwrap().null_count(), 1);
        }
    }

    #[test]
    fn test_missing_file_is_file_not_found() {
        let result = read_station_year(Path::new("missing_file.dat"));
        assert!(matches!(result, Err(TidalError::FileNotFound { .. })));
    }

    #[test]
    fn test_wrong_field_count_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("1947ABE.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "station: ABE").unwrap();
        writeln!(file, "year: 1947").unwrap();
        writeln!(file, "data").unwrap();
        writeln!(file, "1947/01/01 1.0 2.0 3.0").unwrap();

        let result = read_station_year(&path);
        assert!(matches!(result, Err(TidalError::MalformedData { .. })));
    }

    #[test]
    fn test_date_outside_header_year_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("1947ABE.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "station: ABE").unwrap();
        writeln!(file, "year: 1947").unwrap();
        writeln!(file, "data").unwrap();
        let readings = " 3.0000".repeat(READINGS_PER_DAY);
        writeln!(file, "1946/01/01{}", readings).unwrap();

        let result = read_station_year(&path);
        assert!(matches!(result, Err(TidalError::MalformedData { .. })));
    }

    #[test]
    fn test_duplicate_day_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("1947ABE.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "station: ABE").unwrap();
        writeln!(file, "year: 1947").unwrap();
        writeln!(file, "data").unwrap();
        let readings = " 3.0000".repeat(READINGS_PER_DAY);
        writeln!(file, "1947/01/01{}", readings).unwrap();
        writeln!(file, "1947/01/01{}", readings).unwrap();

        let result = read_station_year(&path);
        assert!(matches!(result, Err(TidalError::MalformedData { .. })));
    }

    #[test]
    fn test_parse_hourly_field() {
        assert_eq!(parse_hourly_field("2.9110").unwrap(), Some(2.911));
        assert_eq!(parse_hourly_field("-0.1010").unwrap(), Some(-0.101));
        assert_eq!(parse_hourly_field("2.9110M").unwrap(), None);
        assert_eq!(parse_hourly_field("3N").unwrap(), None);
        assert_eq!(parse_hourly_field("-1.2T").unwrap(), None);
        assert!(parse_hourly_field("garbage").is_err());
        assert!(parse_hourly_field("2.9110X").is_err());
    }
}
