//! Read-only call graph with its synthetic root.

use super::builder::{FuncNode, NodeId};
use super::roots::RootResolution;
use crate::parser::schema::{CallStat, FunctionId};
use std::collections::HashMap;

/// Call graph ready for layout
///
/// Nodes are the recorded functions followed by exactly one synthetic root.
#[derive(Debug, Clone)]
pub struct StatsGraph {
    nodes: Vec<FuncNode>,
    index: HashMap<FunctionId, NodeId>,
    edges: HashMap<(NodeId, NodeId), CallStat>,
    root: NodeId,
    resolution: RootResolution,
}

impl StatsGraph {
    pub(crate) fn new(
        nodes: Vec<FuncNode>,
        index: HashMap<FunctionId, NodeId>,
        edges: HashMap<(NodeId, NodeId), CallStat>,
        root: NodeId,
        resolution: RootResolution,
    ) -> Self {
        Self {
            nodes,
            index,
            edges,
            root,
            resolution,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, node: NodeId) -> &FuncNode {
        &self.nodes[node]
    }

    /// Stat of the caller -> callee edge, including root edges
    pub fn edge(&self, caller: NodeId, callee: NodeId) -> Option<&CallStat> {
        self.edges.get(&(caller, callee))
    }

    /// Stat of an edge taken from an adjacency list
    ///
    /// Adjacency and the edge map are built together, so the edge always exists.
    pub(crate) fn edge_stat(&self, caller: NodeId, callee: NodeId) -> CallStat {
        self.edges[&(caller, callee)]
    }

    pub fn lookup(&self, id: &FunctionId) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    /// Real (non-root) nodes, in input order
    pub fn functions(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).filter(move |&n| n != self.root)
    }

    /// Functions attached directly below the synthetic root
    pub fn root_functions(&self) -> impl Iterator<Item = &FunctionId> {
        self.nodes[self.root].calls.iter().map(|&n| &self.nodes[n].id)
    }

    /// Weight of the synthetic root; every layout is scaled against it
    pub fn total_weight(&self) -> f64 {
        self.nodes[self.root].stat.cumulative_time
    }

    pub fn resolution(&self) -> &RootResolution {
        &self.resolution
    }

    /// Number of real functions
    pub fn function_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Number of call edges between real functions
    pub fn edge_count(&self) -> usize {
        self.edges.keys().filter(|(caller, _)| *caller != self.root).count()
    }
}
