//! Build the in-memory call graph from per-function records.
//!
//! Nodes are stored in a vector and addressed by index; edges are keyed by
//! (caller, callee) index pairs. Adjacency lists keep input order so the
//! whole pipeline stays deterministic.

use crate::parser::schema::{CallStat, FunctionId, FunctionRecord};
use crate::utils::error::GraphError;
use log::debug;
use std::collections::HashMap;

/// Index of a node inside a graph
pub type NodeId = usize;

/// A profiled function and its adjacency
#[derive(Debug, Clone)]
pub struct FuncNode {
    pub id: FunctionId,

    /// The function's own totals
    pub stat: CallStat,

    /// Callees, in the order their edges were recorded
    pub calls: Vec<NodeId>,

    /// Callers, in record order
    pub called: Vec<NodeId>,
}

impl FuncNode {
    fn new(id: FunctionId, stat: CallStat) -> Self {
        Self {
            id,
            stat,
            calls: Vec::new(),
            called: Vec::new(),
        }
    }
}

/// Graph of real functions, before the synthetic root exists
///
/// Turn it into a [`StatsGraph`](super::StatsGraph) with
/// [`GraphBuilder::resolve_roots`].
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    pub(crate) nodes: Vec<FuncNode>,
    pub(crate) index: HashMap<FunctionId, NodeId>,
    pub(crate) edges: HashMap<(NodeId, NodeId), CallStat>,

    /// Functions recorded without any caller
    pub(crate) candidate_roots: Vec<NodeId>,
}

impl GraphBuilder {
    /// Build the function graph from statistics records
    ///
    /// **Public** - main entry point for graph construction
    ///
    /// # Errors
    /// * `GraphError::EmptyGraph` - no records at all
    /// * `GraphError::UnknownCaller` - a caller without its own record
    /// * `GraphError::DuplicateEdge` - the same caller -> callee pair twice
    pub fn from_records(
        records: impl IntoIterator<Item = FunctionRecord>,
    ) -> Result<Self, GraphError> {
        let records: Vec<FunctionRecord> = records.into_iter().collect();
        if records.is_empty() {
            return Err(GraphError::EmptyGraph);
        }

        let mut builder = Self {
            nodes: Vec::with_capacity(records.len()),
            index: HashMap::with_capacity(records.len()),
            edges: HashMap::new(),
            candidate_roots: Vec::new(),
        };

        // Nodes first, so callers may appear after their callees
        for record in &records {
            builder.upsert_node(&record.function, record.stat);
        }

        for record in &records {
            let callee = builder.index[&record.function];
            for caller in &record.callers {
                let caller_node = *builder.index.get(&caller.function).ok_or_else(|| {
                    GraphError::UnknownCaller {
                        caller: caller.function.label(),
                        callee: record.function.label(),
                    }
                })?;
                builder.add_edge(caller_node, callee, caller.stat)?;
            }
        }

        builder.candidate_roots = (0..builder.nodes.len())
            .filter(|&n| builder.nodes[n].called.is_empty())
            .collect();

        debug!(
            "Built function graph: {} functions, {} edges, {} candidate roots",
            builder.nodes.len(),
            builder.edges.len(),
            builder.candidate_roots.len()
        );

        Ok(builder)
    }

    /// Create the node or overwrite its stat
    ///
    /// **Private** - internal helper for from_records
    fn upsert_node(&mut self, id: &FunctionId, stat: CallStat) -> NodeId {
        if let Some(&node) = self.index.get(id) {
            self.nodes[node].stat = stat;
            return node;
        }

        let node = self.nodes.len();
        self.nodes.push(FuncNode::new(id.clone(), stat));
        self.index.insert(id.clone(), node);
        node
    }

    fn add_edge(&mut self, caller: NodeId, callee: NodeId, stat: CallStat) -> Result<(), GraphError> {
        if self.edges.contains_key(&(caller, callee)) {
            return Err(GraphError::DuplicateEdge {
                caller: self.nodes[caller].id.label(),
                callee: self.nodes[callee].id.label(),
            });
        }

        self.edges.insert((caller, callee), stat);
        self.nodes[caller].calls.push(callee);
        self.nodes[callee].called.push(caller);
        Ok(())
    }

    /// Number of real functions
    pub fn function_count(&self) -> usize {
        self.nodes.len()
    }

    /// Functions recorded without callers, in input order
    pub fn candidate_roots(&self) -> impl Iterator<Item = &FunctionId> {
        self.candidate_roots.iter().map(|&n| &self.nodes[n].id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> FunctionId {
        FunctionId::new("app.py", 1, name)
    }

    fn stat(tt: f64, ct: f64) -> CallStat {
        CallStat::new(1, 1, tt, ct)
    }

    #[test]
    fn test_builds_bidirectional_adjacency() {
        let records = vec![
            FunctionRecord::new(id("main"), stat(1.0, 10.0)),
            FunctionRecord::new(id("work"), stat(9.0, 9.0)).called_by(id("main"), stat(9.0, 9.0)),
        ];

        let builder = GraphBuilder::from_records(records).unwrap();
        let main = builder.index[&id("main")];
        let work = builder.index[&id("work")];

        assert_eq!(builder.nodes[main].calls, vec![work]);
        assert_eq!(builder.nodes[work].called, vec![main]);
        assert_eq!(builder.edges[&(main, work)].cumulative_time, 9.0);
        assert_eq!(builder.candidate_roots, vec![main]);
    }

    #[test]
    fn test_caller_may_be_recorded_after_callee() {
        let records = vec![
            FunctionRecord::new(id("work"), stat(1.0, 1.0)).called_by(id("main"), stat(1.0, 1.0)),
            FunctionRecord::new(id("main"), stat(0.0, 1.0)),
        ];

        let builder = GraphBuilder::from_records(records).unwrap();
        assert_eq!(builder.function_count(), 2);
        assert_eq!(builder.candidate_roots().next(), Some(&id("main")));
    }

    #[test]
    fn test_empty_input() {
        let result = GraphBuilder::from_records(Vec::new());
        assert_eq!(result.unwrap_err(), GraphError::EmptyGraph);
    }

    #[test]
    fn test_duplicate_edge_fails_fast() {
        let records = vec![
            FunctionRecord::new(id("main"), stat(0.0, 2.0)),
            FunctionRecord::new(id("work"), stat(1.0, 1.0)).called_by(id("main"), stat(1.0, 1.0)),
            FunctionRecord::new(id("work"), stat(1.0, 1.0)).called_by(id("main"), stat(0.5, 0.5)),
        ];

        let result = GraphBuilder::from_records(records);
        assert!(matches!(result, Err(GraphError::DuplicateEdge { .. })));
    }

    #[test]
    fn test_unknown_caller() {
        let records = vec![
            FunctionRecord::new(id("work"), stat(1.0, 1.0)).called_by(id("ghost"), stat(1.0, 1.0)),
        ];

        let err = GraphBuilder::from_records(records).unwrap_err();
        assert_eq!(
            err,
            GraphError::UnknownCaller {
                caller: "app.py:1:ghost".to_string(),
                callee: "app.py:1:work".to_string(),
            }
        );
    }

    #[test]
    fn test_self_recursion_edge() {
        let records = vec![
            FunctionRecord::new(id("main"), stat(0.0, 10.0)),
            FunctionRecord::new(id("fib"), stat(10.0, 10.0))
                .called_by(id("main"), stat(6.0, 10.0))
                .called_by(id("fib"), stat(4.0, 4.0)),
        ];

        let builder = GraphBuilder::from_records(records).unwrap();
        let fib = builder.index[&id("fib")];

        assert!(builder.nodes[fib].calls.contains(&fib));
        assert!(builder.nodes[fib].called.contains(&fib));
    }
}
