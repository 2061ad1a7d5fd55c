//! Flame layout: positioned blocks computed from a call graph.
//!
//! Two panels are produced from the same graph:
//! - forward blocks, the call tree below the synthetic root
//! - caller blocks, an inverted panel showing where each function's time comes from
//!
//! Widths and offsets are in the graph's own time unit; emitters scale them
//! against the root weight.

use super::backward::layout_backward;
use super::forward::{count_edge_paths, layout_forward};
use crate::callgraph::StatsGraph;
use crate::parser::schema::{CallStat, FunctionId};
use crate::utils::config::DEFAULT_THRESHOLD_PERCENT;
use log::{debug, info};
use serde::Serialize;
use std::rc::Rc;

/// Palette selector for a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorBucket {
    /// Ordinary call-tree block
    Normal,

    /// First block of a path reached through a multiply-reached edge
    Recursive,

    /// Caller panel, depth 0, function without callers
    RootLike,

    /// Caller panel, aggregated ancestor above depth 0
    Merged,
}

/// One positioned rectangle of the flame graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    /// Call chain from the root down to this function (forward blocks only)
    pub trace: Vec<FunctionId>,

    /// Row, counted from the root side
    pub level: usize,

    /// Short name drawn inside the block
    pub name: String,

    /// Stable `file:line:name` label
    pub label: String,

    /// Hover text with percentage and counts
    pub tooltip: String,

    /// Portion of the width not covered by drawn children
    pub self_width: f64,

    pub width: f64,

    /// Horizontal offset from the left edge of the panel
    pub x: f64,

    pub color: ColorBucket,
}

impl Block {
    pub(crate) fn new(
        function: &FunctionId,
        stat: &CallStat,
        share: f64,
        level: usize,
        x: f64,
        width: f64,
        color: ColorBucket,
    ) -> Self {
        let label = function.label();
        let tooltip = format!(
            "{} {:.2}% ({} {} {} {})",
            label,
            share * 100.0,
            stat.call_count,
            stat.primitive_call_count,
            stat.self_time,
            stat.cumulative_time
        );

        Self {
            trace: Vec::new(),
            level,
            name: function.name.clone(),
            label,
            tooltip,
            self_width: width,
            width,
            x,
            color,
        }
    }

    pub(crate) fn with_trace(mut self, trace: Vec<FunctionId>, self_width: f64) -> Self {
        self.trace = trace;
        self.self_width = self_width;
        self
    }
}

/// Layout options
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Blocks narrower than this fraction of the root weight are pruned
    pub threshold: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD_PERCENT / 100.0,
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Threshold given in percent, as on the command line
    pub fn with_threshold_percent(self, percent: f64) -> Self {
        self.with_threshold(percent / 100.0)
    }
}

/// Both panels of a flame graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Call tree below the root
    pub blocks: Vec<Block>,

    /// Inverted caller panel
    pub caller_blocks: Vec<Block>,

    /// Width of the whole graph in time units
    pub root_weight: f64,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.caller_blocks.is_empty()
    }
}

/// Compute both panels for a graph
///
/// **Public** - main entry point for layout
pub fn prepare(graph: &StatsGraph, config: &LayoutConfig) -> Layout {
    let multiplicity = count_edge_paths(graph);
    debug!("Counted paths for {} edges", multiplicity.len());

    let blocks = layout_forward(graph, &multiplicity, config.threshold);
    let caller_blocks = layout_backward(graph, config.threshold);

    info!(
        "Layout ready: {} blocks, {} caller blocks (threshold {})",
        blocks.len(),
        caller_blocks.len(),
        config.threshold
    );

    Layout {
        blocks,
        caller_blocks,
        root_weight: graph.total_weight(),
    }
}

/// Keys visited along the current path, shared between sibling frames
///
/// Extending a path allocates one link; the parent path is untouched.
#[derive(Debug)]
pub(crate) struct PathSet<K>(Option<Rc<PathLink<K>>>);

#[derive(Debug)]
struct PathLink<K> {
    key: K,
    parent: PathSet<K>,
}

impl<K> Default for PathSet<K> {
    fn default() -> Self {
        Self(None)
    }
}

impl<K> Clone for PathSet<K> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<K: PartialEq> PathSet<K> {
    pub(crate) fn contains(&self, key: &K) -> bool {
        let mut link = self.0.as_deref();
        while let Some(current) = link {
            if current.key == *key {
                return true;
            }
            link = current.parent.0.as_deref();
        }
        false
    }

    pub(crate) fn with(&self, key: K) -> Self {
        Self(Some(Rc::new(PathLink {
            key,
            parent: self.clone(),
        })))
    }
}
