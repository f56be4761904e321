//! Application constants for the tidal analysis tool.
//!
//! Column names, file format markers, and default processing values
//! used throughout the crate.

// =============================================================================
// Series column names
// =============================================================================

/// Timestamp column of a tidal series frame (UTC, millisecond resolution)
pub const DATETIME_COL: &str = "datetime";

/// Sea-level column of a tidal series frame (nullable Float64)
pub const SEA_LEVEL_COL: &str = "sea_level";

// =============================================================================
// Station-year file format
// =============================================================================

/// Marker line separating the preamble from the data section
pub const DATA_MARKER: &str = "data";

/// Optional marker line terminating the data section
pub const END_DATA_MARKER: &str = "end data";

/// Date format of the leading field on each day line
pub const DAY_DATE_FORMAT: &str = "%Y/%m/%d";

/// Hourly readings per day line
pub const READINGS_PER_DAY: usize = 24;

/// Glob pattern for station-year files inside a station directory
pub const STATION_FILE_PATTERN: &str = "*.txt";

// =============================================================================
// Analysis defaults
// =============================================================================

/// Constituents reported by the command-line tool when none are requested
pub const DEFAULT_CONSTITUENTS: &str = "M2,S2,K1,O1";

/// Date tokens accepted by the section extractor
pub const SECTION_DATE_FORMAT: &str = "%Y%m%d";

/// Maximum station-year files parsed concurrently
pub const PARSE_CONCURRENCY: usize = 4;

/// Milliseconds per hour, for elapsed-time conversion
pub const MS_PER_HOUR: i64 = 3_600_000;

/// Milliseconds per day
pub const MS_PER_DAY: i64 = 86_400_000;
