//! Reader for aggregated profiling statistics.
//!
//! Accepts either a bare array of function records or an object holding
//! the array under one of the known keys, and checks that every time
//! value is usable before the graph is built.

use super::schema::{CallStat, FunctionRecord};
use crate::utils::config::RECORD_FIELD_NAMES;
use crate::utils::error::ParseError;
use log::{debug, info};
use serde::Deserialize;
use std::path::Path;

/// Parse statistics from an already-decoded JSON document
///
/// **Public** - main entry point for parsing
///
/// # Errors
/// * `ParseError::InvalidFormat` - no record array found, or a stat is not usable
/// * `ParseError::JsonError` - a record does not match the schema
pub fn parse_stats(raw: &serde_json::Value) -> Result<Vec<FunctionRecord>, ParseError> {
    let records_value = locate_records(raw)?;
    let records = Vec::<FunctionRecord>::deserialize(records_value)?;

    for record in &records {
        validate_record(record)?;
    }

    debug!("Parsed {} function records", records.len());
    Ok(records)
}

/// Read and parse a statistics file
pub fn read_stats(input_path: impl AsRef<Path>) -> Result<Vec<FunctionRecord>, ParseError> {
    let input_path = input_path.as_ref();

    info!("Reading statistics from: {}", input_path.display());

    let content = std::fs::read_to_string(input_path)?;
    let raw: serde_json::Value = serde_json::from_str(&content)?;

    parse_stats(&raw)
}

/// Find the record array inside the document
///
/// **Private** - internal helper for parse_stats
fn locate_records(raw: &serde_json::Value) -> Result<&serde_json::Value, ParseError> {
    if raw.is_array() {
        return Ok(raw);
    }

    let obj = raw
        .as_object()
        .ok_or_else(|| ParseError::InvalidFormat("Expected an object or an array".to_string()))?;

    for field in RECORD_FIELD_NAMES {
        if let Some(value) = obj.get(*field) {
            if value.is_array() {
                debug!("Found function records under '{}'", field);
                return Ok(value);
            }
        }
    }

    Err(ParseError::InvalidFormat(format!(
        "No function record array found (looked for {})",
        RECORD_FIELD_NAMES.join(", ")
    )))
}

/// Check a record and all of its caller edges
pub fn validate_record(record: &FunctionRecord) -> Result<(), ParseError> {
    let label = record.function.label();
    validate_stat(&label, &record.stat)?;

    for caller in &record.callers {
        let edge = format!("{} -> {}", caller.function, label);
        validate_stat(&edge, &caller.stat)?;
    }

    Ok(())
}

fn validate_stat(what: &str, stat: &CallStat) -> Result<(), ParseError> {
    for (field, value) in [
        ("self_time", stat.self_time),
        ("cumulative_time", stat.cumulative_time),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ParseError::InvalidFormat(format!(
                "{}: {} must be a finite non-negative number, got {}",
                what, field, value
            )));
        }
    }

    Ok(())
}
