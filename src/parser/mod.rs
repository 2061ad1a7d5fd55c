//! Profiling statistics parsing and schema definitions.
//!
//! This module handles:
//! - Input schema (function ids, call stats, per-caller edges)
//! - Reading statistics documents from JSON
//! - Validating stat values

pub mod schema;
pub mod stats_reader;

// Re-export main types
pub use schema::{CallStat, CallerStat, FunctionId, FunctionRecord, StatsFile};
pub use stats_reader::{parse_stats, read_stats, validate_record};
