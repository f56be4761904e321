//! Astronomical tidal constituent reference table.
//!
//! Angular speeds in degrees per mean solar hour follow Schureman (1958).
//! Nodal amplitude factors and phase corrections are the mean-epoch values;
//! the table is fixed at compile time and not user-configurable.

use crate::error::{Result, TidalError};

/// One entry of the constituent reference table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constituent {
    pub name: &'static str,
    /// Angular speed in degrees per mean solar hour
    pub speed_deg_per_hour: f64,
    /// Nodal amplitude factor f
    pub nodal_factor: f64,
    /// Nodal phase correction u, degrees
    pub phase_correction: f64,
}

impl Constituent {
    /// Angular speed in radians per hour, as used by the design matrix.
    pub fn speed_rad_per_hour(&self) -> f64 {
        self.speed_deg_per_hour.to_radians()
    }
}

/// Fixed constituent table: semidiurnal, diurnal, shallow-water, and
/// long-period species.
pub const CONSTITUENT_TABLE: &[Constituent] = &[
    Constituent { name: "M2", speed_deg_per_hour: 28.9841042, nodal_factor: 1.0, phase_correction: 0.0 },
    Constituent { name: "S2", speed_deg_per_hour: 30.0000000, nodal_factor: 1.0, phase_correction: 0.0 },
    Constituent { name: "N2", speed_deg_per_hour: 28.4397295, nodal_factor: 1.0, phase_correction: 0.0 },
    Constituent { name: "K2", speed_deg_per_hour: 30.0821373, nodal_factor: 1.0, phase_correction: 0.0 },
    Constituent { name: "K1", speed_deg_per_hour: 15.0410686, nodal_factor: 1.0, phase_correction: 0.0 },
    Constituent { name: "O1", speed_deg_per_hour: 13.9430356, nodal_factor: 1.0, phase_correction: 0.0 },
    Constituent { name: "P1", speed_deg_per_hour: 14.9589314, nodal_factor: 1.0, phase_correction: 0.0 },
    Constituent { name: "Q1", speed_deg_per_hour: 13.3986609, nodal_factor: 1.0, phase_correction: 0.0 },
    Constituent { name: "M4", speed_deg_per_hour: 57.9682084, nodal_factor: 1.0, phase_correction: 0.0 },
    Constituent { name: "MS4", speed_deg_per_hour: 58.9841042, nodal_factor: 1.0, phase_correction: 0.0 },
    Constituent { name: "MN4", speed_deg_per_hour: 57.4238337, nodal_factor: 1.0, phase_correction: 0.0 },
    Constituent { name: "MF", speed_deg_per_hour: 1.0980331, nodal_factor: 1.0, phase_correction: 0.0 },
    Constituent { name: "MM", speed_deg_per_hour: 0.5443747, nodal_factor: 1.0, phase_correction: 0.0 },
    Constituent { name: "SSA", speed_deg_per_hour: 0.0821373, nodal_factor: 1.0, phase_correction: 0.0 },
    Constituent { name: "SA", speed_deg_per_hour: 0.0410686, nodal_factor: 1.0, phase_correction: 0.0 },
];

/// Look up a constituent by name, case-insensitively.
///
/// An unrecognized name is a configuration error; there is no fallback.
pub fn lookup(name: &str) -> Result<&'static Constituent> {
    CONSTITUENT_TABLE
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| TidalError::UnknownConstituent {
            name: name.to_string(),
        })
}
