//! Configuration and constants for the CLI.

/// Current JSON export schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Flame graph defaults
pub const DEFAULT_WIDTH: usize = 1200;
pub const DEFAULT_ROW_HEIGHT: usize = 24;
pub const DEFAULT_FONT_SIZE: usize = 12;

/// Default prune threshold, in percent of the root weight
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 0.1;

/// Collapsed-stack weights are `self_time * multiplier`, rounded
pub const DEFAULT_LOG_MULTIPLIER: u64 = 1_000_000;

// Root cumulative time must land within this band of the total self time
// for the inferred roots to be accepted.
pub const ROOT_RATIO_MIN: f64 = 0.8;
pub const ROOT_RATIO_MAX: f64 = 1.2;

/// Separator between frames of a collapsed stack
pub const STACK_SEPARATOR: &str = ";";

// Top-level keys that may hold the function records (different exporters use different names)
pub const RECORD_FIELD_NAMES: &[&str] = &["functions", "stats", "records"];
