//! JSON output writer.
//!
//! Writes the computed block lists for external rectangle renderers, and
//! normalised copies of the input statistics.

use super::{ensure_parent_dir, validate_path};
use crate::flamegraph::layout::{Block, Layout};
use crate::parser::schema::{FunctionRecord, StatsFile};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Exported layout document
#[derive(Debug, Serialize)]
struct LayoutExport<'a> {
    /// Schema version for compatibility checking
    version: &'a str,

    /// Timestamp when the export was generated
    generated_at: String,

    root_weight: f64,
    blocks: &'a [Block],
    caller_blocks: &'a [Block],
}

impl<'a> LayoutExport<'a> {
    fn new(layout: &'a Layout) -> Self {
        Self {
            version: SCHEMA_VERSION,
            generated_at: chrono::Utc::now().to_rfc3339(),
            root_weight: layout.root_weight,
            blocks: &layout.blocks,
            caller_blocks: &layout.caller_blocks,
        }
    }
}

/// Serialize a layout to pretty JSON
pub fn layout_to_string(layout: &Layout) -> Result<String, OutputError> {
    serde_json::to_string_pretty(&LayoutExport::new(layout)).map_err(OutputError::SerializationFailed)
}

/// Write a layout as JSON
///
/// **Public** - main entry point for the structured block export
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_layout(layout: &Layout, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    info!("Writing layout to: {}", output_path.display());

    write_json(&LayoutExport::new(layout), output_path)?;

    info!(
        "Layout written successfully ({} bytes)",
        calculate_file_size(output_path)
    );
    Ok(())
}

/// Write a normalised copy of the input statistics
pub fn write_stats(records: &[FunctionRecord], output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    info!("Saving statistics to: {}", output_path.display());

    let stats = StatsFile {
        version: SCHEMA_VERSION.to_string(),
        functions: records.to_vec(),
    };
    write_json(&stats, output_path)
}

fn write_json<T: Serialize>(value: &T, output_path: &Path) -> Result<(), OutputError> {
    validate_path(output_path)?;
    ensure_parent_dir(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, value).map_err(OutputError::SerializationFailed)?;
    debug!("JSON written to {}", output_path.display());

    Ok(())
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flamegraph::layout::ColorBucket;
    use crate::parser::read_stats;
    use crate::parser::schema::{CallStat, FunctionId};
    use tempfile::NamedTempFile;

    fn create_test_layout() -> Layout {
        let id = FunctionId::new("app.py", 1, "main");
        let block = Block::new(&id, &CallStat::new(1, 1, 1.0, 2.0), 1.0, 0, 0.0, 2.0, ColorBucket::Normal)
            .with_trace(vec![id.clone()], 1.0);

        Layout {
            blocks: vec![block.clone()],
            caller_blocks: vec![block],
            root_weight: 2.0,
        }
    }

    #[test]
    fn test_layout_to_string() {
        let json = layout_to_string(&create_test_layout()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], SCHEMA_VERSION);
        assert_eq!(value["root_weight"], 2.0);
        assert_eq!(value["blocks"][0]["name"], "main");
        assert_eq!(value["blocks"][0]["color"], "normal");
        assert_eq!(value["blocks"][0]["trace"][0]["file"], "app.py");
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn test_write_layout_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/layout.json");

        write_layout(&create_test_layout(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_write_and_read_stats() {
        let records = vec![
            FunctionRecord::new(FunctionId::new("app.py", 1, "main"), CallStat::new(1, 1, 0.5, 1.0)),
            FunctionRecord::new(FunctionId::new("app.py", 5, "work"), CallStat::new(2, 2, 0.5, 0.5))
                .called_by(FunctionId::new("app.py", 1, "main"), CallStat::new(2, 2, 0.5, 0.5)),
        ];
        let temp_file = NamedTempFile::new().unwrap();

        write_stats(&records, temp_file.path()).unwrap();
        let loaded = read_stats(temp_file.path()).unwrap();

        assert_eq!(loaded, records);
    }

    #[test]
    fn test_write_layout_to_directory_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(write_layout(&create_test_layout(), temp_dir.path()).is_err());
    }
}
