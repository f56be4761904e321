//! Long-term sea-level trend estimation.
//!
//! Ordinary least squares of sea level against elapsed hours since the
//! series start, with a two-sided t-test on the slope. Runs on the raw
//! series; it is independent of the harmonic fitter.

use crate::constants::MS_PER_HOUR;
use crate::error::{Result, TidalError};
use crate::models::TrendEstimate;
use crate::series::{sea_levels, timestamps_ms};
use polars::prelude::DataFrame;
use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::debug;

/// Fit a linear sea-level trend to a tidal series.
///
/// Elapsed time is measured in hours from the first timestamp of the
/// series; rows with a null sea level are excluded. The p-value tests the
/// null hypothesis that the slope is zero, against Student's t with n - 2
/// degrees of freedom.
pub fn sea_level_rise(df: &DataFrame) -> Result<TrendEstimate> {
    let timestamps = timestamps_ms(df)?;
    let levels = sea_levels(df)?;

    let origin_ms = timestamps
        .iter()
        .flatten()
        .next()
        .copied()
        .ok_or_else(|| TidalError::FitFailed {
            reason: "series has no timestamps".to_string(),
        })?;

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (ts, level) in timestamps.iter().zip(levels.iter()) {
        if let (Some(ts), Some(level)) = (ts, level) {
            xs.push((*ts - origin_ms) as f64 / MS_PER_HOUR as f64);
            ys.push(*level);
        }
    }

    let n = xs.len();
    if n < 3 {
        return Err(TidalError::FitFailed {
            reason: format!("{} valid samples are too few for a trend fit", n),
        });
    }

    let nf = n as f64;
    let x_mean = xs.iter().sum::<f64>() / nf;
    let y_mean = ys.iter().sum::<f64>() / nf;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - x_mean;
        let dy = y - y_mean;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    if sxx == 0.0 {
        return Err(TidalError::FitFailed {
            reason: "degenerate time axis: all samples share one timestamp".to_string(),
        });
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    let dof = nf - 2.0;
    let sse = (syy - slope * sxy).max(0.0);
    let std_err = (sse / dof / sxx).sqrt();

    let p_value = if std_err == 0.0 {
        // Exact fit: the slope is either trivially significant or the data
        // are constant
        if slope.abs() > 0.0 { 0.0 } else { 1.0 }
    } else {
        let t_stat = slope / std_err;
        let dist = StudentsT::new(0.0, 1.0, dof).map_err(|e| TidalError::FitFailed {
            reason: e.to_string(),
        })?;
        2.0 * (1.0 - dist.cdf(t_stat.abs()))
    };

    debug!(
        "Trend fit over {} samples: slope={:.4e}/hour, p={:.4}",
        n, slope, p_value
    );

    Ok(TrendEstimate {
        slope,
        intercept,
        p_value,
    })
}
