//! flameprof
//!
//! Flame graphs from aggregated per-call-edge profiling statistics.
//!
//! Profilers that only record totals per (caller, callee) pair lose the
//! exact call stacks. This crate rebuilds the call graph from those totals,
//! infers a consistent root, and distributes each function's time over its
//! call paths to produce:
//!
//! - a two-panel SVG flame graph (call tree plus inverted caller view)
//! - collapsed stack lines for flamegraph.pl, inferno or speedscope
//! - a JSON block list for other renderers
//!
//! ## Getting Started
//!
//! ```bash
//! flameprof render stats.json -o profile.svg
//! flameprof render stats.json --format log > profile.log
//! ```

pub mod callgraph;
pub mod commands;
pub mod flamegraph;
pub mod output;
pub mod parser;
pub mod utils;
