use crate::callgraph::build_graph;
use crate::parser::read_stats;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::Path;

/// Validate a statistics JSON file
///
/// Parses the file, builds the call graph and reports how the roots were resolved.
pub fn validate_stats_file(file_path: &Path) -> Result<()> {
    println!("Validating statistics: {}", file_path.display());

    let records = read_stats(file_path)
        .with_context(|| format!("Failed to read statistics from {}", file_path.display()))?;
    let record_count = records.len();
    let graph = build_graph(records).context("Failed to build call graph")?;

    println!("✓ Valid statistics JSON");
    println!("  Records: {}", record_count);
    println!("  Functions: {}", graph.function_count());
    println!("  Call Edges: {}", graph.edge_count());
    println!("  Roots: {}", graph.root_functions().count());
    println!("  Root Weight: {}", graph.total_weight());
    println!("  Root Resolution: {}", graph.resolution().summary());

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("flameprof v{}", env!("CARGO_PKG_VERSION"));
    println!("Layout Export Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Flame graphs from aggregated per-call-edge profiling statistics.");
}
