//! Collapsed stack output.
//!
//! Format: "frame;frame;frame weight", one line per forward block, where the
//! weight is the block's self width times a multiplier. This is what
//! flamegraph.pl, inferno and speedscope expect.
//!
//! Example: "app.py:1:main;app.py:9:work 9000000"

use super::generator::FlamegraphConfig;
use super::layout::Block;
use crate::utils::config::STACK_SEPARATOR;
use crate::utils::error::FlamegraphError;
use inferno::flamegraph::{self, Options};
use log::{debug, info};

/// A single collapsed stack entry
#[derive(Debug, Clone, PartialEq)]
pub struct CollapsedStack {
    /// Stack trace as semicolon-separated string
    pub stack: String,

    /// Scaled, rounded self width
    pub weight: u64,
}

impl CollapsedStack {
    pub fn new(stack: String, weight: u64) -> Self {
        Self { stack, weight }
    }

    pub fn to_line(&self) -> String {
        format!("{} {}", self.stack, self.weight)
    }
}

/// Scale a self width into an integer weight (half-to-even, never negative)
pub fn collapsed_weight(self_width: f64, multiplier: u64) -> u64 {
    (self_width * multiplier as f64).round_ties_even().max(0.0) as u64
}

/// Build collapsed stacks from forward blocks
///
/// **Public** - main entry point for collapsed mode
pub fn build_collapsed_stacks(blocks: &[Block], multiplier: u64) -> Vec<CollapsedStack> {
    debug!("Collapsing {} blocks (multiplier {})", blocks.len(), multiplier);

    blocks
        .iter()
        .map(|block| {
            let stack = block
                .trace
                .iter()
                .map(|f| f.label())
                .collect::<Vec<_>>()
                .join(STACK_SEPARATOR);
            CollapsedStack::new(stack, collapsed_weight(block.self_width, multiplier))
        })
        .collect()
}

/// Render collapsed stacks as text, one line each
pub fn collapsed_text(stacks: &[CollapsedStack]) -> String {
    let mut text = String::new();
    for stack in stacks {
        text.push_str(&stack.to_line());
        text.push('\n');
    }
    text
}

/// Render collapsed stacks as a classic flame graph through inferno
pub fn generate_inferno_flamegraph(
    stacks: &[CollapsedStack],
    config: &FlamegraphConfig,
) -> Result<String, FlamegraphError> {
    if stacks.is_empty() {
        return Err(FlamegraphError::EmptyStacks);
    }

    let mut options = Options::default();
    options.title = config.title.clone();
    options.image_width = Some(config.width);
    options.frame_height = config.row_height;
    options.font_size = config.font_size;

    let lines: Vec<String> = stacks.iter().map(CollapsedStack::to_line).collect();
    let mut svg = Vec::new();
    flamegraph::from_lines(&mut options, lines.iter().map(String::as_str), &mut svg)
        .map_err(|e| FlamegraphError::Render(e.to_string()))?;

    info!("Inferno flamegraph generated ({} bytes)", svg.len());
    Ok(String::from_utf8_lossy(&svg).into_owned())
}
