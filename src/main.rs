//! FFI Bench Charts CLI
//!
//! Turns cross-language interop benchmark results into comparison
//! figures and render-ready figure data.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use ffi_bench_charts::commands::{
    display_schema, display_version, execute_generate, validate_args, validate_payload_file,
    GenerateArgs,
};

/// FFI Bench Charts - figures for cross-language interop benchmarks
#[derive(Parser, Debug)]
#[command(name = "ffi-bench-charts")]
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
    /// Aggregate results and generate figures
    Generate {
        /// Directory containing consolidated.json and complexity.json
        #[arg(short, long, env = "FFI_BENCH_RESULTS", default_value = "tests/results")]
        results: PathBuf,

        /// Output directory for figures and figure data
        #[arg(short, long, default_value = "assets/images")]
        output: PathBuf,

        /// TOML file overriding mechanisms, metrics and reserved ids
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fail when a pair has more than one dedicated mechanism
        #[arg(long)]
        strict: bool,

        /// Only write figure data JSON, no SVG figures
        #[arg(long)]
        no_svg: bool,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Cross-pair figure title
        #[arg(long)]
        title: Option<String>,

        /// Cross-pair figure width in pixels
        #[arg(long, default_value = "1200")]
        width: usize,
    },

    /// Validate a figure data JSON file
    Validate {
        /// Path to figure data JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
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

    match cli.command {
        Commands::Generate {
            results,
            output,
            config,
            strict,
            no_svg,
            summary,
            title,
            width,
        } => {
            let args = GenerateArgs {
                results_dir: results,
                output_dir: output,
                config_path: config,
                strict,
                no_svg,
                print_summary: summary,
                title,
                width,
            };

            // Validate args first
            validate_args(&args)?;

            execute_generate(args)?;
        }

        Commands::Validate { file } => {
            validate_payload_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
