//! Tidal series construction, merging, and subsetting.
//!
//! A tidal series is a DataFrame with a millisecond `datetime` column and a
//! nullable `sea_level` column. Stages exchange owned frames; nothing here
//! mutates its input.

use crate::constants::{DATETIME_COL, MS_PER_DAY, SEA_LEVEL_COL, SECTION_DATE_FORMAT};
use crate::error::{Result, TidalError};
use chrono::{NaiveDate, NaiveTime};
use polars::functions::concat_df_diagonal;
use polars::prelude::*;
use tracing::warn;

/// Build a tidal series frame from parallel timestamp/value vectors.
pub fn series_frame(timestamps_ms: Vec<i64>, values: Vec<Option<f64>>) -> Result<DataFrame> {
    let datetime = Column::new(DATETIME_COL.into(), timestamps_ms)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    let sea_level = Column::new(SEA_LEVEL_COL.into(), values);
    Ok(DataFrame::new(vec![datetime, sea_level])?)
}

/// Merge two tidal series into one chronologically ordered series.
///
/// Uses a diagonal concatenation so operands with partially overlapping
/// schemas still merge: the non-intersecting part is filled with nulls
/// instead of failing. The result has as many rows as both inputs combined.
/// Supplying non-overlapping years is the caller's responsibility.
pub fn join_series(a: &DataFrame, b: &DataFrame) -> Result<DataFrame> {
    let merged = concat_df_diagonal(&[a.clone(), b.clone()])?;

    if merged.column(DATETIME_COL).is_err() {
        // Neither operand carries a timestamp column. Returning the merge
        // unsorted keeps the operation total; see DESIGN.md on this quirk.
        warn!("joined frames share no '{}' column; returning unsorted merge", DATETIME_COL);
        return Ok(merged);
    }

    Ok(merged.sort([DATETIME_COL], SortMultipleOptions::default())?)
}

/// Select one calendar year and remove the segment mean.
///
/// A year with no matching rows yields an empty frame, not an error.
pub fn extract_year(year: &str, df: &DataFrame) -> Result<DataFrame> {
    let year_num: i32 = year.trim().parse().map_err(|_| TidalError::InvalidDate {
        token: year.to_string(),
        reason: "expected a 4-digit year".to_string(),
    })?;

    let start = NaiveDate::from_ymd_opt(year_num, 1, 1).ok_or_else(|| TidalError::InvalidDate {
        token: year.to_string(),
        reason: "year out of supported range".to_string(),
    })?;
    let end = NaiveDate::from_ymd_opt(year_num, 12, 31).ok_or_else(|| TidalError::InvalidDate {
        token: year.to_string(),
        reason: "year out of supported range".to_string(),
    })?;

    let (lo_ms, hi_ms) = day_bounds_ms(start, end);
    zero_mean(&filter_range(df, lo_ms, hi_ms)?)
}

/// Select an inclusive `[start 00:00, end 23:59:59]` window and remove the
/// segment mean. Date tokens are `YYYYMMDD`. An empty selection is returned
/// as an empty frame.
pub fn extract_section(start: &str, end: &str, df: &DataFrame) -> Result<DataFrame> {
    let start_day = parse_section_date(start)?;
    let end_day = parse_section_date(end)?;

    let (lo_ms, hi_ms) = day_bounds_ms(start_day, end_day);
    zero_mean(&filter_range(df, lo_ms, hi_ms)?)
}

/// Subtract the arithmetic mean of the sea-level column, ignoring nulls.
///
/// Empty and all-null segments are returned unchanged.
pub fn zero_mean(df: &DataFrame) -> Result<DataFrame> {
    if df.height() == 0 {
        return Ok(df.clone());
    }

    let levels = df.column(SEA_LEVEL_COL)?.as_materialized_series();
    let Some(mean) = levels.f64()?.mean() else {
        return Ok(df.clone());
    };

    let centred: Float64Chunked = levels
        .f64()?
        .into_iter()
        .map(|value| value.map(|v| v - mean))
        .collect();

    let mut out = df.clone();
    out.replace(
        SEA_LEVEL_COL,
        centred.into_series().with_name(SEA_LEVEL_COL.into()),
    )?;
    Ok(out)
}

/// Timestamps of a series as epoch milliseconds.
pub fn timestamps_ms(df: &DataFrame) -> Result<Vec<Option<i64>>> {
    let physical = df
        .column(DATETIME_COL)?
        .as_materialized_series()
        .cast(&DataType::Int64)?;
    Ok(physical.i64()?.into_iter().collect())
}

/// Sea-level values of a series, nulls preserved.
pub fn sea_levels(df: &DataFrame) -> Result<Vec<Option<f64>>> {
    Ok(df
        .column(SEA_LEVEL_COL)?
        .as_materialized_series()
        .f64()?
        .into_iter()
        .collect())
}

fn parse_section_date(token: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(token.trim(), SECTION_DATE_FORMAT).map_err(|e| {
        TidalError::InvalidDate {
            token: token.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Millisecond bounds of the inclusive day window `[start, end]`.
fn day_bounds_ms(start: NaiveDate, end: NaiveDate) -> (i64, i64) {
    let lo = start.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    let hi = end.and_time(NaiveTime::MIN).and_utc().timestamp_millis() + (MS_PER_DAY - 1);
    (lo, hi)
}

fn filter_range(df: &DataFrame, lo_ms: i64, hi_ms: i64) -> Result<DataFrame> {
    let mask: BooleanChunked = timestamps_ms(df)?
        .iter()
        .map(|ts| Some(matches!(ts, Some(t) if *t >= lo_ms && *t <= hi_ms)))
        .collect();
    Ok(df.filter(&mask)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MS_PER_HOUR;
    use approx::assert_abs_diff_eq;

    /// Hourly frame starting at `start` midnight, `days` days long.
    fn hourly_frame(start: NaiveDate, days: usize, value: impl Fn(usize) -> Option<f64>) -> DataFrame {
        let base = start.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
        let hours = days * 24;
        let timestamps: Vec<i64> = (0..hours).map(|h| base + h as i64 * MS_PER_HOUR).collect();
        let values: Vec<Option<f64>> = (0..hours).map(value).collect();
        series_frame(timestamps, values).unwrap()
    }

    fn full_year(year: i32, value: impl Fn(usize) -> Option<f64>) -> DataFrame {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
        let days = if start.leap_year() { 366 } else { 365 };
        hourly_frame(start, days, value)
    }

    fn mean_of(df: &DataFrame) -> f64 {
        df.column(SEA_LEVEL_COL)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .mean()
            .unwrap()
    }

    #[test]
    fn test_join_disjoint_years() {
        let y1946 = full_year(1946, |h| Some(h as f64));
        let y1947 = full_year(1947, |h| Some(h as f64));

        // Join later year first; output must still be ascending
        let joined = join_series(&y1947, &y1946).unwrap();
        assert_eq!(joined.height(), 8760 * 2);

        let ts: Vec<i64> = timestamps_ms(&joined).unwrap().into_iter().flatten().collect();
        assert!(ts.windows(2).all(|w| w[0] < w[1]));

        let first = NaiveDate::from_ymd_opt(1946, 1, 1)
            .unwrap()
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp_millis();
        assert_eq!(ts[0], first);

        let last = NaiveDate::from_ymd_opt(1947, 12, 31)
            .unwrap()
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp_millis()
            + 23 * MS_PER_HOUR;
        assert_eq!(*ts.last().unwrap(), last);
    }

    #[test]
    fn test_join_partial_schema_does_not_fail() {
        let y1947 = full_year(1947, |_| Some(1.0));
        let bare = DataFrame::new(vec![Column::new("residual".into(), vec![0.5f64, 0.6])]).unwrap();

        let joined = join_series(&y1947, &bare).unwrap();
        assert_eq!(joined.height(), 8760 + 2);
        // Rows from the schemaless operand carry null sea levels
        assert_eq!(joined.column(SEA_LEVEL_COL).unwrap().null_count(), 2);
    }

    #[test]
    fn test_extract_year_is_zero_mean() {
        let y1946 = full_year(1946, |h| Some(3.0 + (h % 12) as f64));
        let y1947 = full_year(1947, |h| Some(5.0 + (h % 12) as f64));
        let joined = join_series(&y1946, &y1947).unwrap();

        let segment = extract_year("1947", &joined).unwrap();
        assert_eq!(segment.height(), 8760);
        assert_abs_diff_eq!(mean_of(&segment), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_extract_missing_year_is_empty() {
        let y1947 = full_year(1947, |_| Some(1.0));
        let segment = extract_year("2001", &y1947).unwrap();
        assert_eq!(segment.height(), 0);
    }

    #[test]
    fn test_extract_year_bad_token() {
        let y1947 = full_year(1947, |_| Some(1.0));
        let result = extract_year("194x", &y1947);
        assert!(matches!(result, Err(TidalError::InvalidDate { .. })));
    }

    #[test]
    fn test_extract_section_spanning_years() {
        let y1946 = full_year(1946, |h| Some(2.0 + (h % 7) as f64));
        let y1947 = full_year(1947, |h| Some(4.0 + (h % 7) as f64));
        let joined = join_series(&y1946, &y1947).unwrap();

        // 17 + 31 + 28 + 10 days = 86 days = 2064 hours
        let segment = extract_section("19461215", "19470310", &joined).unwrap();
        assert_eq!(segment.height(), 2064);
        assert_abs_diff_eq!(mean_of(&segment), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_extract_section_within_one_year() {
        let y1947 = full_year(1947, |h| Some((h % 5) as f64));
        let segment = extract_section("19470115", "19470310", &y1947).unwrap();
        // 17 + 28 + 10 days = 55 days = 1320 hours
        assert_eq!(segment.height(), 1320);
        assert_abs_diff_eq!(mean_of(&segment), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_extract_section_bad_token() {
        let y1947 = full_year(1947, |_| Some(1.0));
        let result = extract_section("1947-01-15", "19470310", &y1947);
        assert!(matches!(result, Err(TidalError::InvalidDate { .. })));
    }

    #[test]
    fn test_zero_mean_ignores_nulls() {
        let df = hourly_frame(NaiveDate::from_ymd_opt(1947, 1, 1).unwrap(), 2, |h| {
            if h % 4 == 0 { None } else { Some(10.0) }
        });
        let centred = zero_mean(&df).unwrap();
        assert_abs_diff_eq!(mean_of(&centred), 0.0, epsilon = 1e-12);
        // Null slots survive mean removal
        assert_eq!(centred.column(SEA_LEVEL_COL).unwrap().null_count(), 12);
    }

    #[test]
    fn test_zero_mean_empty_frame() {
        let df = series_frame(Vec::new(), Vec::new()).unwrap();
        let out = zero_mean(&df).unwrap();
        assert_eq!(out.height(), 0);
    }
}
