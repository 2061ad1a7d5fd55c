//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod render;
pub mod utils;

// Re-export main command functions
pub use render::{execute_render, render_layout, stats_path, validate_args, OutputFormat, RenderArgs};
pub use utils::{display_version, validate_stats_file};
