//! Render command implementation.
//!
//! The render command:
//! 1. Reads the statistics file
//! 2. Builds the call graph and resolves its roots
//! 3. Lays out the call tree and caller panels
//! 4. Renders the requested format
//! 5. Writes the result to a file or stdout

use crate::callgraph::build_graph;
use crate::flamegraph::{
    build_collapsed_stacks, collapsed_text, generate_flamegraph, generate_inferno_flamegraph,
    prepare, FlamegraphConfig, Layout, LayoutConfig,
};
use crate::output::{layout_to_string, write_layout, write_stats, write_stdout, write_svg, write_text};
use crate::parser::read_stats;
use crate::utils::config::{DEFAULT_LOG_MULTIPLIER, DEFAULT_THRESHOLD_PERCENT};
use anyhow::{Context, Result};
use clap::ValueEnum;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// What the render command produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Two-panel SVG flame graph
    #[default]
    Svg,

    /// Collapsed stack lines for external renderers
    Log,

    /// Classic flame graph drawn by inferno from the collapsed stacks
    Inferno,

    /// Block lists as JSON
    Json,
}

/// Arguments for the render command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct RenderArgs {
    /// Statistics file to read
    pub input: PathBuf,

    /// Output path (stdout when absent)
    pub output: Option<PathBuf>,

    pub format: OutputFormat,

    /// Prune threshold in percent of the root weight
    pub threshold_percent: f64,

    /// Scale applied to self widths in collapsed stacks
    pub log_multiplier: u64,

    /// Flamegraph configuration
    pub flamegraph_config: FlamegraphConfig,

    /// Also save a normalised copy of the statistics next to the output
    pub save_stats: bool,
}

impl Default for RenderArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("stats.json"),
            output: None,
            format: OutputFormat::default(),
            threshold_percent: DEFAULT_THRESHOLD_PERCENT,
            log_multiplier: DEFAULT_LOG_MULTIPLIER,
            flamegraph_config: FlamegraphConfig::default(),
            save_stats: false,
        }
    }
}

/// Execute the render command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Statistics file cannot be read or parsed
/// * Call graph is structurally invalid
/// * Output cannot be rendered or written
pub fn execute_render(args: RenderArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Rendering {} as {:?}", args.input.display(), args.format);

    // Step 1: Read statistics
    info!("Step 1/5: Reading statistics...");
    let records = read_stats(&args.input)
        .with_context(|| format!("Failed to read statistics from {}", args.input.display()))?;

    debug!("Read {} function records", records.len());

    if args.save_stats {
        if let Some(output) = &args.output {
            let path = stats_path(output);
            write_stats(&records, &path).context("Failed to save statistics")?;
            info!("✓ Statistics saved to: {}", path.display());
        }
    }

    // Step 2: Build call graph
    info!("Step 2/5: Building call graph...");
    let graph = build_graph(records).context("Failed to build call graph")?;

    // Step 3: Layout
    info!("Step 3/5: Computing layout...");
    let layout_config = LayoutConfig::new().with_threshold_percent(args.threshold_percent);
    let layout = prepare(&graph, &layout_config);

    if layout.is_empty() {
        warn!("Layout is empty (root weight {})", layout.root_weight);
    }

    // Steps 4 and 5: Render and write
    match &args.output {
        Some(path) => {
            info!("Step 4/5: Rendering {:?}...", args.format);
            if args.format == OutputFormat::Json {
                info!("Step 5/5: Writing output file...");
                write_layout(&layout, path).context("Failed to write layout JSON")?;
            } else {
                let content = render_layout(&layout, &args)?;
                info!("Step 5/5: Writing output file...");
                match args.format {
                    OutputFormat::Svg | OutputFormat::Inferno => write_svg(&content, path),
                    _ => write_text(&content, path),
                }
                .context("Failed to write output")?;
            }
            info!("✓ Output written to: {}", path.display());
        }
        None => {
            info!("Step 4/5: Rendering {:?}...", args.format);
            let content = render_layout(&layout, &args)?;
            info!("Step 5/5: Writing to stdout...");
            write_stdout(&content).context("Failed to write output")?;
        }
    }

    let elapsed = start_time.elapsed();
    info!("Render completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Render a layout in the requested format
///
/// **Public** - usable without touching the filesystem
pub fn render_layout(layout: &Layout, args: &RenderArgs) -> Result<String> {
    let content = match args.format {
        OutputFormat::Svg => generate_flamegraph(layout, Some(&args.flamegraph_config)),
        OutputFormat::Log => {
            collapsed_text(&build_collapsed_stacks(&layout.blocks, args.log_multiplier))
        }
        OutputFormat::Inferno => {
            let stacks = build_collapsed_stacks(&layout.blocks, args.log_multiplier);
            generate_inferno_flamegraph(&stacks, &args.flamegraph_config)
                .context("Failed to generate inferno flamegraph")?
        }
        OutputFormat::Json => layout_to_string(layout).context("Failed to serialize layout")?,
    };

    Ok(content)
}

/// Where `--save-stats` puts the statistics copy: `<stem>.stats.json` beside the output
pub fn stats_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!("{}.stats.json", stem))
}

/// Validate render arguments
///
/// **Public** - can be called before execute_render for early validation
pub fn validate_args(args: &RenderArgs) -> Result<()> {
    if args.flamegraph_config.width == 0 {
        anyhow::bail!("width must be greater than 0");
    }

    if args.flamegraph_config.row_height == 0 {
        anyhow::bail!("row height must be greater than 0");
    }

    if args.flamegraph_config.font_size == 0 {
        anyhow::bail!("font size must be greater than 0");
    }

    if !(0.0..=100.0).contains(&args.threshold_percent) {
        anyhow::bail!("threshold must be between 0 and 100 percent");
    }

    if args.log_multiplier == 0 {
        anyhow::bail!("log multiplier must be greater than 0");
    }

    if args.save_stats && args.output.is_none() {
        anyhow::bail!("--save-stats requires an output path (-o)");
    }

    Ok(())
}
