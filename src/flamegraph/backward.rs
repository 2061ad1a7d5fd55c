//! Backward layout: the inverted "who is responsible" panel.
//!
//! Level 0 holds every function sized by its self time. Each block is then
//! split among the function's callers in proportion to their edge
//! cumulative time, level by level towards the root.

use super::layout::{Block, ColorBucket, PathSet};
use crate::callgraph::{NodeId, StatsGraph};

/// Visited key: a function and the callee it is attributed to
type CallerKey = (NodeId, Option<NodeId>);

/// One level of names waiting to be laid out
struct Frame {
    names: Vec<NodeId>,
    /// Callee the names are attributed to; `None` on level 0
    to: Option<NodeId>,
    factor: f64,
    next: usize,
    level: usize,
    origin: f64,
    path: PathSet<CallerKey>,
}

impl Frame {
    fn new(
        graph: &StatsGraph,
        mut names: Vec<NodeId>,
        to: Option<NodeId>,
        window: f64,
        level: usize,
        origin: f64,
        path: PathSet<CallerKey>,
    ) -> Self {
        names.sort_by(|&a, &b| graph.node(a).id.cmp(&graph.node(b).id));

        // Normalise the callers' edge weights to the callee's window
        let factor = match to {
            Some(callee) if !names.is_empty() => {
                let total: f64 = names
                    .iter()
                    .map(|&name| graph.edge_stat(name, callee).cumulative_time)
                    .sum();
                if total > 0.0 {
                    window / total
                } else {
                    1.0
                }
            }
            _ => 1.0,
        };

        Self {
            names,
            to,
            factor,
            next: 0,
            level,
            origin,
            path,
        }
    }
}

/// Lay out the caller panel for every function
///
/// **Public** - normally reached through `layout::prepare`
pub fn layout_backward(graph: &StatsGraph, threshold: f64) -> Vec<Block> {
    let max_w = graph.total_weight();
    let mut blocks = Vec::new();
    if max_w <= 0.0 {
        return blocks;
    }

    let mut stack = vec![Frame::new(
        graph,
        graph.functions().collect(),
        None,
        max_w,
        0,
        0.0,
        PathSet::default(),
    )];

    while let Some(frame) = stack.last_mut() {
        let Some(&name) = frame.names.get(frame.next) else {
            stack.pop();
            continue;
        };
        frame.next += 1;

        let node = graph.node(name);
        let (stat, weight) = match frame.to {
            Some(callee) => {
                let stat = graph.edge_stat(name, callee);
                (stat, stat.cumulative_time * frame.factor)
            }
            None => (node.stat, node.stat.self_time * frame.factor),
        };

        let x = frame.origin;
        frame.origin += weight;

        if weight / max_w <= threshold {
            continue;
        }

        let color = if frame.level > 0 {
            ColorBucket::Merged
        } else if node.called.is_empty() {
            ColorBucket::RootLike
        } else {
            ColorBucket::Normal
        };

        blocks.push(Block::new(
            &node.id,
            &stat,
            stat.self_time / max_w,
            frame.level,
            x,
            weight,
            color,
        ));

        let key = (name, frame.to);
        if !frame.path.contains(&key) {
            let next = Frame::new(
                graph,
                node.called.clone(),
                Some(name),
                weight,
                frame.level + 1,
                x,
                frame.path.with(key),
            );
            stack.push(next);
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callgraph::build_graph;
    use crate::parser::schema::{CallStat, FunctionId, FunctionRecord};
    use pretty_assertions::assert_eq;

    fn id(name: &str) -> FunctionId {
        FunctionId::new("app.py", 1, name)
    }

    fn stat(tt: f64, ct: f64) -> CallStat {
        CallStat::new(1, 1, tt, ct)
    }

    fn summary(blocks: &[Block]) -> Vec<(usize, &str, f64, f64)> {
        blocks
            .iter()
            .map(|b| (b.level, b.name.as_str(), b.x, b.width))
            .collect()
    }

    #[test]
    fn test_chain_callers() {
        let graph = build_graph(vec![
            FunctionRecord::new(id("a"), stat(1.0, 10.0)),
            FunctionRecord::new(id("b"), stat(9.0, 9.0)).called_by(id("a"), stat(9.0, 9.0)),
        ])
        .unwrap();

        let blocks = layout_backward(&graph, 0.001);

        assert_eq!(
            summary(&blocks),
            vec![(0, "a", 0.0, 1.0), (0, "b", 1.0, 9.0), (1, "a", 1.0, 9.0)]
        );
        assert_eq!(blocks[0].color, ColorBucket::RootLike);
        assert_eq!(blocks[1].color, ColorBucket::Normal);
        assert_eq!(blocks[2].color, ColorBucket::Merged);
        assert!(blocks.iter().all(|b| b.trace.is_empty()));
    }

    #[test]
    fn test_callers_split_proportionally() {
        // work (self 6) is called by two parents, 1:2 by edge cumulative time
        let graph = build_graph(vec![
            FunctionRecord::new(id("main"), stat(0.0, 6.0)),
            FunctionRecord::new(id("left"), stat(0.0, 1.0)).called_by(id("main"), stat(0.0, 1.0)),
            FunctionRecord::new(id("right"), stat(0.0, 5.0)).called_by(id("main"), stat(0.0, 5.0)),
            FunctionRecord::new(id("work"), stat(6.0, 6.0))
                .called_by(id("left"), stat(1.0, 1.0))
                .called_by(id("right"), stat(2.0, 2.0)),
        ])
        .unwrap();

        let blocks = layout_backward(&graph, 0.0);
        let callers: Vec<_> = blocks
            .iter()
            .filter(|b| b.level == 1)
            .map(|b| (b.name.as_str(), b.x, b.width))
            .collect();

        assert_eq!(callers, vec![("left", 0.0, 2.0), ("right", 2.0, 4.0)]);
    }

    #[test]
    fn test_recursive_callers_terminate() {
        let graph = build_graph(vec![
            FunctionRecord::new(id("main"), stat(0.0, 10.0)),
            FunctionRecord::new(id("a"), stat(5.0, 10.0))
                .called_by(id("main"), stat(5.0, 10.0))
                .called_by(id("b"), stat(2.0, 4.0)),
            FunctionRecord::new(id("b"), stat(5.0, 8.0)).called_by(id("a"), stat(3.0, 8.0)),
        ])
        .unwrap();

        let blocks = layout_backward(&graph, 0.0);

        assert!(!blocks.is_empty());
        assert!(blocks.len() < 64);
        assert!(blocks.iter().filter(|b| b.level > 0).all(|b| b.color == ColorBucket::Merged));
    }

    #[test]
    fn test_threshold_prunes_small_self_time() {
        let graph = build_graph(vec![
            FunctionRecord::new(id("main"), stat(99.99, 100.0)),
            FunctionRecord::new(id("tiny"), stat(0.01, 0.01)).called_by(id("main"), stat(0.01, 0.01)),
        ])
        .unwrap();

        let blocks = layout_backward(&graph, 0.001);

        assert_eq!(summary(&blocks), vec![(0, "main", 0.0, 99.99)]);
    }
}
