//! flameprof CLI
//!
//! Renders flame graphs from aggregated per-call-edge profiling statistics.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use flameprof::commands::{
    display_version, execute_render, validate_args, validate_stats_file, OutputFormat, RenderArgs,
};
use flameprof::flamegraph::FlamegraphConfig;
use flameprof::utils::config::{
    DEFAULT_FONT_SIZE, DEFAULT_LOG_MULTIPLIER, DEFAULT_ROW_HEIGHT, DEFAULT_THRESHOLD_PERCENT,
    DEFAULT_WIDTH,
};

/// flameprof - flame graphs from aggregated profiling statistics
#[derive(Parser, Debug)]
#[command(name = "flameprof")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a statistics file as a flame graph
    Render {
        /// Path to statistics JSON file
        input: PathBuf,

        /// Output path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Svg)]
        format: OutputFormat,

        /// Image width in pixels
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: usize,

        /// Row height in pixels
        #[arg(long, default_value_t = DEFAULT_ROW_HEIGHT)]
        row_height: usize,

        /// Font size in pixels
        #[arg(long, default_value_t = DEFAULT_FONT_SIZE)]
        font_size: usize,

        /// Hide blocks narrower than this percentage of the total
        #[arg(long, env = "FLAMEPROF_THRESHOLD", default_value_t = DEFAULT_THRESHOLD_PERCENT)]
        threshold: f64,

        /// Multiplier applied to self time in collapsed stacks
        #[arg(long, default_value_t = DEFAULT_LOG_MULTIPLIER)]
        log_mult: u64,

        /// Flamegraph title
        #[arg(long)]
        title: Option<String>,

        /// Save a normalised copy of the statistics next to the output
        #[arg(long)]
        save_stats: bool,
    },

    /// Validate a statistics JSON file
    Validate {
        /// Path to statistics JSON file
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Render {
            input,
            output,
            format,
            width,
            row_height,
            font_size,
            threshold,
            log_mult,
            title,
            save_stats,
        } => {
            let mut config = FlamegraphConfig::new()
                .with_width(width)
                .with_row_height(row_height)
                .with_font_size(font_size);

            if let Some(title_str) = title {
                config = config.with_title(title_str);
            }

            let args = RenderArgs {
                input,
                output,
                format,
                threshold_percent: threshold,
                log_multiplier: log_mult,
                flamegraph_config: config,
                save_stats,
            };

            // Validate args first
            validate_args(&args)?;

            execute_render(args)?;
        }

        Commands::Validate { file } => {
            validate_stats_file(&file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
