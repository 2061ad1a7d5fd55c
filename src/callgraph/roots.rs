//! Root inference.
//!
//! Functions without callers are the natural roots. Their cumulative time
//! should roughly match the total self time of every function; when it
//! does not (threads, generators and other profiler blind spots), one
//! corrective root is tried before falling back to the total self time as
//! the root weight.

use super::builder::{FuncNode, GraphBuilder, NodeId};
use super::graph::StatsGraph;
use crate::parser::schema::{CallStat, FunctionId};
use crate::utils::config::{ROOT_RATIO_MAX, ROOT_RATIO_MIN};
use log::{debug, info, warn};

/// How the root set was settled
#[derive(Debug, Clone, PartialEq)]
pub enum RootResolution {
    /// Caller-less functions account for the total self time
    Consistent,

    /// One extra root had to be added
    Corrected { added: FunctionId },

    /// No consistent root set exists; the root weight is the total self time
    Fallback { root_total: f64, self_total: f64 },
}

impl RootResolution {
    pub fn is_consistent(&self) -> bool {
        !matches!(self, Self::Fallback { .. })
    }

    /// Human-readable summary
    pub fn summary(&self) -> String {
        match self {
            Self::Consistent => "consistent".to_string(),
            Self::Corrected { added } => format!("corrected (added root {})", added),
            Self::Fallback {
                root_total,
                self_total,
            } => format!(
                "inconsistent (root cumulative time {} vs total self time {})",
                root_total, self_total
            ),
        }
    }
}

/// Outcome of root resolution over the real nodes
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoots {
    pub roots: Vec<NodeId>,
    pub total: f64,
    pub resolution: RootResolution,
}

fn within_tolerance(root_total: f64, self_total: f64) -> bool {
    let ratio = root_total / self_total;
    (ROOT_RATIO_MIN..=ROOT_RATIO_MAX).contains(&ratio)
}

/// Settle the root set for a graph
///
/// **Public** - exposed for inspection; `GraphBuilder::resolve_roots` is the usual entry point
pub fn resolve_roots(nodes: &[FuncNode], candidates: &[NodeId]) -> ResolvedRoots {
    let mut roots = candidates.to_vec();
    let root_total: f64 = roots.iter().map(|&r| nodes[r].stat.cumulative_time).sum();
    let self_total: f64 = nodes.iter().map(|n| n.stat.self_time).sum();

    debug!(
        "Root candidates: {} (cumulative {}), total self time {}",
        roots.len(),
        root_total,
        self_total
    );

    if within_tolerance(root_total, self_total) {
        return ResolvedRoots {
            roots,
            total: root_total,
            resolution: RootResolution::Consistent,
        };
    }

    // Try the heaviest non-root; ties keep the first in input order
    let corrective = (0..nodes.len())
        .filter(|n| !roots.contains(n))
        .reduce(|best, n| {
            if nodes[n].stat.cumulative_time > nodes[best].stat.cumulative_time {
                n
            } else {
                best
            }
        });

    if let Some(extra) = corrective {
        let corrected_total = root_total + nodes[extra].stat.cumulative_time;
        if within_tolerance(corrected_total, self_total) {
            info!("Added {} as an extra root", nodes[extra].id);
            roots.push(extra);
            return ResolvedRoots {
                roots,
                total: corrected_total,
                resolution: RootResolution::Corrected {
                    added: nodes[extra].id.clone(),
                },
            };
        }
    }

    warn!(
        "Can't find proper roots, root cumtime is {} but sum tottime is {}",
        root_total, self_total
    );

    ResolvedRoots {
        roots,
        total: self_total,
        resolution: RootResolution::Fallback {
            root_total,
            self_total,
        },
    }
}

/// Identifier of the synthetic root node
pub fn synthetic_root_id() -> FunctionId {
    FunctionId::new("~", 0, "<root>")
}

impl GraphBuilder {
    /// Resolve roots and append the synthetic root node
    ///
    /// **Public** - second build phase, yields the read-only graph
    pub fn resolve_roots(self) -> StatsGraph {
        let GraphBuilder {
            mut nodes,
            index,
            mut edges,
            candidate_roots,
        } = self;

        let resolved = resolve_roots(&nodes, &candidate_roots);

        let root = nodes.len();
        for &r in &resolved.roots {
            edges.insert((root, r), nodes[r].stat);
        }

        nodes.push(FuncNode {
            id: synthetic_root_id(),
            stat: CallStat::new(1, 1, 0.0, resolved.total),
            calls: resolved.roots,
            called: Vec::new(),
        });

        StatsGraph::new(nodes, index, edges, root, resolved.resolution)
    }
}
