//! Flame graph layout and rendering.
//!
//! This module converts a call graph into positioned blocks and emits them as:
//! - An SVG document with a call-tree panel and an inverted caller panel
//! - Collapsed stack lines for external flame graph renderers
//! - A classic flame graph rendered by inferno from those lines

pub mod backward;
pub mod collapsed;
pub mod forward;
pub mod generator;
pub mod layout;
pub mod palette;

// Re-export main types
pub use collapsed::{
    build_collapsed_stacks, collapsed_text, generate_inferno_flamegraph, CollapsedStack,
};
pub use generator::{generate_flamegraph, layout_rects, FlamegraphConfig, Rect};
pub use layout::{prepare, Block, ColorBucket, Layout, LayoutConfig};
