//! Forward layout: the call tree below the synthetic root.
//!
//! Profiles describe a call graph, a flame graph needs a tree. A first pass
//! counts how many root paths reach every edge. The layout pass then keeps
//! the recorded stats of singly-reached children and rescales the
//! multiply-reached ones into whatever the parent's window has left, so
//! children never overflow their parent.
//!
//! Both passes use explicit work stacks and a path-scoped visited set, so
//! recursion of any depth terminates without growing the native stack.

use super::layout::{Block, ColorBucket, PathSet};
use crate::callgraph::{NodeId, StatsGraph};
use crate::parser::schema::{CallStat, FunctionId};
use std::collections::HashMap;

/// Caller -> callee edge
pub type Edge = (NodeId, NodeId);

/// Number of root paths that reached each edge (capped once an edge is seen twice)
pub type EdgeMultiplicity = HashMap<Edge, u32>;

/// Count, for every edge, the root paths that reach it
///
/// An edge is descended through only the first time it is counted and
/// never when it already lies on the current path.
pub fn count_edge_paths(graph: &StatsGraph) -> EdgeMultiplicity {
    struct Frame {
        node: NodeId,
        next: usize,
        path: PathSet<Edge>,
    }

    let mut counts = EdgeMultiplicity::new();
    let mut stack = vec![Frame {
        node: graph.root(),
        next: 0,
        path: PathSet::default(),
    }];

    while let Some(frame) = stack.last_mut() {
        let Some(&child) = graph.node(frame.node).calls.get(frame.next) else {
            stack.pop();
            continue;
        };
        frame.next += 1;

        let edge = (frame.node, child);
        let count = counts.entry(edge).or_insert(0);
        *count += 1;

        if *count < 2 && !frame.path.contains(&edge) {
            let path = frame.path.with(edge);
            stack.push(Frame {
                node: child,
                next: 0,
                path,
            });
        }
    }

    counts
}

/// A child edge as it will be laid out
#[derive(Debug, Clone, Copy)]
struct PlannedChild {
    node: NodeId,
    stat: CallStat,
    multiplicity: u32,
}

/// Order children and rescale the multiply-reached ones into the window
///
/// Singly-reached children come first, each group sorted by function id.
fn plan_children(
    graph: &StatsGraph,
    counts: &EdgeMultiplicity,
    parent: NodeId,
    window: &CallStat,
    path_multiplicity: u32,
) -> Vec<PlannedChild> {
    let mut children: Vec<PlannedChild> = graph
        .node(parent)
        .calls
        .iter()
        .map(|&child| PlannedChild {
            node: child,
            stat: graph.edge_stat(parent, child),
            multiplicity: counts
                .get(&(parent, child))
                .copied()
                .unwrap_or(1)
                .max(path_multiplicity),
        })
        .collect();
    children.sort_by(|a, b| graph.node(a.node).id.cmp(&graph.node(b.node).id));

    let (mut singly, mut multiply): (Vec<_>, Vec<_>) =
        children.into_iter().partition(|c| c.multiplicity == 1);

    if !multiply.is_empty() {
        let singly_total: f64 = singly.iter().map(|c| c.stat.cumulative_time).sum();
        let multiply_total: f64 = multiply.iter().map(|c| c.stat.cumulative_time).sum();
        let remaining = (window.cumulative_time - window.self_time - singly_total).max(0.0);
        let factor = if multiply_total > 0.0 {
            remaining / multiply_total
        } else {
            1.0
        };

        for child in &mut multiply {
            child.stat = child.stat.scaled(factor);
        }
    }

    singly.append(&mut multiply);
    singly
}

/// Pending children of one laid-out node
struct Frame {
    parent: NodeId,
    children: Vec<PlannedChild>,
    next: usize,
    level: usize,
    origin: f64,
    path: PathSet<Edge>,
    trace: Vec<FunctionId>,
    path_multiplicity: u32,
    /// Block drawn for `parent`; pruned children widen its self part
    block: Option<usize>,
}

/// Lay out the call tree below the root
///
/// **Public** - normally reached through `layout::prepare`
pub fn layout_forward(graph: &StatsGraph, counts: &EdgeMultiplicity, threshold: f64) -> Vec<Block> {
    let max_w = graph.total_weight();
    let mut blocks = Vec::new();
    if max_w <= 0.0 {
        return blocks;
    }

    let root = graph.root();
    let window = CallStat::new(1, 1, 0.0, max_w);
    let mut stack = vec![Frame {
        parent: root,
        children: plan_children(graph, counts, root, &window, 1),
        next: 0,
        level: 0,
        origin: 0.0,
        path: PathSet::default(),
        trace: Vec::new(),
        path_multiplicity: 1,
        block: None,
    }];

    while let Some(frame) = stack.last_mut() {
        let Some(child) = frame.children.get(frame.next).copied() else {
            stack.pop();
            continue;
        };
        frame.next += 1;

        // Siblings advance by the full width, drawn or not
        let x = frame.origin;
        frame.origin += child.stat.cumulative_time;

        let width = child.stat.cumulative_time;
        if width / max_w <= threshold {
            if let Some(parent_block) = frame.block {
                blocks[parent_block].self_width += width;
            }
            continue;
        }

        let function = &graph.node(child.node).id;
        let mut trace = frame.trace.clone();
        trace.push(function.clone());

        let color = if frame.path_multiplicity == 1 && child.multiplicity > 1 {
            ColorBucket::Recursive
        } else {
            ColorBucket::Normal
        };

        let block_index = blocks.len();
        blocks.push(
            Block::new(function, &child.stat, width / max_w, frame.level, x, width, color)
                .with_trace(trace.clone(), child.stat.self_time),
        );

        let edge = (frame.parent, child.node);
        if !frame.path.contains(&edge) {
            let next = Frame {
                parent: child.node,
                children: plan_children(graph, counts, child.node, &child.stat, child.multiplicity),
                next: 0,
                level: frame.level + 1,
                // Self part on the left, callees after it
                origin: x + child.stat.self_time,
                path: frame.path.with(edge),
                trace,
                path_multiplicity: child.multiplicity,
                block: Some(block_index),
            };
            stack.push(next);
        }
    }

    blocks
}
