//! Harmonic tidal constituent fitting.
//!
//! Regresses a zero-mean tidal series on cosine/sine pairs at the known
//! angular speeds of the requested constituents and converts the coefficient
//! pairs to amplitude and phase. The system is solved by SVD least squares;
//! normal equations are avoided because long records at closely spaced
//! constituent speeds condition poorly.

use crate::constants::MS_PER_HOUR;
use crate::constituents::{Constituent, lookup};
use crate::error::{Result, TidalError};
use crate::models::ConstituentEstimate;
use crate::series::{sea_levels, timestamps_ms};
use chrono::{DateTime, Utc};
use nalgebra::{DMatrix, DVector};
use polars::prelude::DataFrame;
use tracing::debug;

/// Singular values below this threshold are treated as zero.
const RANK_EPS: f64 = 1e-10;

/// Fit the requested constituents to a (near) zero-mean tidal series.
///
/// `epoch` is the reference instant phases are measured against; it is an
/// external input, not derived from the series, and must be UTC like the
/// series grid itself. Each estimate describes the component
/// `amplitude * cos(speed * t - phase)` with `t` in hours since the epoch.
///
/// Rows with a null sea level are excluded from the design matrix and the
/// target vector together; they are never imputed. Output order follows the
/// input name list.
pub fn harmonic_analysis(
    df: &DataFrame,
    constituent_names: &[&str],
    epoch: DateTime<Utc>,
) -> Result<Vec<ConstituentEstimate>> {
    // Resolve every name before any numeric work
    let constituents: Vec<&'static Constituent> = constituent_names
        .iter()
        .map(|name| lookup(name))
        .collect::<Result<_>>()?;

    if constituents.is_empty() {
        return Ok(Vec::new());
    }

    let epoch_ms = epoch.timestamp_millis();
    let mut hours = Vec::new();
    let mut observed = Vec::new();
    for (ts, level) in timestamps_ms(df)?.iter().zip(sea_levels(df)?.iter()) {
        if let (Some(ts), Some(level)) = (ts, level) {
            hours.push((*ts - epoch_ms) as f64 / MS_PER_HOUR as f64);
            observed.push(*level);
        }
    }

    let n_samples = observed.len();
    let n_coeffs = constituents.len() * 2;
    if n_samples < n_coeffs {
        return Err(TidalError::FitFailed {
            reason: format!(
                "{} valid samples cannot determine {} harmonic coefficients",
                n_samples, n_coeffs
            ),
        });
    }

    let design = DMatrix::from_fn(n_samples, n_coeffs, |row, col| {
        let theta = constituents[col / 2].speed_rad_per_hour() * hours[row];
        if col % 2 == 0 { theta.cos() } else { theta.sin() }
    });
    let target = DVector::from_vec(observed);

    let svd = design.svd(true, true);
    let rank = svd.rank(RANK_EPS);
    if rank < n_coeffs {
        return Err(TidalError::FitFailed {
            reason: format!(
                "design matrix is rank-deficient (rank {} of {}); constituents may be duplicated or unresolvable over this record",
                rank, n_coeffs
            ),
        });
    }

    let coefficients = svd
        .solve(&target, RANK_EPS)
        .map_err(|e| TidalError::FitFailed {
            reason: e.to_string(),
        })?;

    debug!(
        "Fitted {} constituents against {} samples",
        constituents.len(),
        n_samples
    );

    let estimates = constituents
        .iter()
        .enumerate()
        .map(|(i, constituent)| {
            let cos_coef = coefficients[2 * i];
            let sin_coef = coefficients[2 * i + 1];
            let amplitude = cos_coef.hypot(sin_coef) / constituent.nodal_factor;
            let phase =
                (sin_coef.atan2(cos_coef).to_degrees() + constituent.phase_correction).rem_euclid(360.0);
            ConstituentEstimate {
                name: constituent.name.to_string(),
                amplitude,
                phase,
            }
        })
        .collect();

    Ok(estimates)
}
