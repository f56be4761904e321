//! Command-line interface components.

use crate::constants::DEFAULT_CONSTITUENTS;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tidal-analysis")]
#[command(about = "Estimate harmonic tidal constituents and sea-level trends from tide gauge records")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Station directory of yearly gauge files, or a single station-year file
    #[arg(value_name = "STATION_PATH")]
    pub station_path: PathBuf,

    /// Comma-separated tidal constituents to fit
    #[arg(short, long, value_delimiter = ',', default_value = DEFAULT_CONSTITUENTS)]
    pub constituents: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Log level implied by the verbosity flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constituents_include_principal_semidiurnals() {
        let args = Args::try_parse_from(["tidal-analysis", "data/aberdeen"]).unwrap();
        assert!(args.constituents.iter().any(|c| c == "M2"));
        assert!(args.constituents.iter().any(|c| c == "S2"));
        assert!(!args.verbose);
    }

    #[test]
    fn test_constituent_list_is_comma_split() {
        let args =
            Args::try_parse_from(["tidal-analysis", "-c", "M2,S2,N2", "-v", "data/whitby"]).unwrap();
        assert_eq!(args.constituents, vec!["M2", "S2", "N2"]);
        assert!(args.verbose);
        assert_eq!(args.log_level(), "debug");
    }

    #[test]
    fn test_station_path_is_required() {
        assert!(Args::try_parse_from(["tidal-analysis"]).is_err());
    }
}
