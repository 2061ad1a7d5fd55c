//! Call graph reconstruction from aggregated statistics.
//!
//! This module turns per-function records into:
//! - A directed graph of functions and call edges
//! - A resolved root set under one synthetic root node

pub mod builder;
pub mod graph;
pub mod roots;

// Re-export main types and functions
pub use builder::{FuncNode, GraphBuilder, NodeId};
pub use graph::StatsGraph;
pub use roots::{resolve_roots, RootResolution};

use crate::parser::schema::FunctionRecord;
use crate::utils::error::GraphError;
use log::info;

/// Build the graph and resolve its roots in one go
pub fn build_graph(records: impl IntoIterator<Item = FunctionRecord>) -> Result<StatsGraph, GraphError> {
    let graph = GraphBuilder::from_records(records)?.resolve_roots();

    info!(
        "Call graph: {} functions, {} edges, root weight {} ({})",
        graph.function_count(),
        graph.edge_count(),
        graph.total_weight(),
        graph.resolution().summary()
    );

    Ok(graph)
}
