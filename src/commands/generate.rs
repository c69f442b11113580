//! Generate command implementation.
//!
//! The generate command:
//! 1. Loads the results files
//! 2. Aggregates pairs and summarizes complexity (concurrently)
//! 3. Renders and writes each figure
//! 4. Writes the figure data JSON
//!
//! The two figures are independent: a failure in one is reported but does
//! not stop the other from being written.

use super::models::GenerateArgs;
use crate::aggregator::{aggregate, summarize, PairSummary};
use crate::chart::{
    build_complexity_panels, build_pair_chart, generate_text_summary, render_complexity_chart,
    render_pair_chart, ChartConfig, MetricPanel, PairChartData,
};
use crate::output::{write_payload, write_svg, FigurePayload};
use crate::parser::{load_results, parse_latency_records, ComplexityAggregate};
use crate::utils::config::{
    load_config, ComplexityConfig, DedicatedPolicy, FigureConfig, PairConfig,
    COMPLEXITY_FIGURE_FILE, PAIR_FIGURE_FILE, PAYLOAD_FILE,
};
use anyhow::{Context, Result};
use log::{debug, error, info};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Instant;

/// Execute the generate command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// Paths of every file written
///
/// # Errors
/// * Config or results files that cannot be loaded (nothing is written)
/// * Any figure whose data is invalid (the other figure is still written)
/// * File write errors
pub fn execute_generate(args: GenerateArgs) -> Result<Vec<PathBuf>> {
    let start_time = Instant::now();

    let config = resolve_config(&args)?;

    // Step 1: Load results
    info!("Step 1/4: Loading benchmark data...");
    let snapshot = load_results(&args.results_dir).context("Failed to load benchmark results")?;

    // Step 2: Aggregate both datasets
    info!("Step 2/4: Aggregating pairs and complexity metrics...");
    let (pair_result, complexity_result) = rayon::join(
        || build_pair_figure(&snapshot.latency_entries, &config.pairs),
        || build_complexity_figure(&snapshot.complexity, &config.complexity),
    );

    // Step 3: Render and write figures
    info!("Step 3/4: Generating figures...");
    let mut written = Vec::new();
    let mut failures = Vec::new();

    let pairs = match pair_result {
        Ok((summaries, data)) => {
            if args.print_summary {
                println!("\n{}", "=".repeat(80));
                println!("{}", generate_text_summary(&summaries));
                println!("{}", "=".repeat(80));
            }
            if !args.no_svg {
                match write_pair_figure(&args, &data) {
                    Ok(path) => written.push(path),
                    Err(e) => {
                        error!("Cross-pair figure failed: {:#}", e);
                        failures.push("cross-pair");
                    }
                }
            }
            Some(data)
        }
        Err(e) => {
            error!("Cross-pair figure failed: {:#}", e);
            failures.push("cross-pair");
            None
        }
    };

    let complexity = match complexity_result {
        Ok(panels) => {
            if !args.no_svg {
                match write_complexity_figure(&args, &panels) {
                    Ok(path) => written.push(path),
                    Err(e) => {
                        error!("Complexity figure failed: {:#}", e);
                        failures.push("complexity");
                    }
                }
            }
            Some(panels)
        }
        Err(e) => {
            error!("Complexity figure failed: {:#}", e);
            failures.push("complexity");
            None
        }
    };

    // Step 4: Write figure data
    info!("Step 4/4: Writing figure data...");
    if pairs.is_some() || complexity.is_some() {
        let payload_path = args.output_dir.join(PAYLOAD_FILE);
        let payload = FigurePayload::new(pairs, complexity);
        write_payload(&payload, &payload_path).context("Failed to write figure data")?;
        info!("✓ Figure data written to: {}", payload_path.display());
        written.push(payload_path);
    }

    let elapsed = start_time.elapsed();
    info!(
        "Generation finished in {:.2}s ({} files written)",
        elapsed.as_secs_f64(),
        written.len()
    );

    if !failures.is_empty() {
        anyhow::bail!("Failed to generate figure(s): {}", failures.join(", "));
    }

    Ok(written)
}

/// Load the figure config and apply command-line overrides
///
/// **Private** - internal helper for execute_generate
fn resolve_config(args: &GenerateArgs) -> Result<FigureConfig> {
    let mut config = match &args.config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load figure config {}", path.display()))?,
        None => FigureConfig::default(),
    };

    if args.strict {
        config.pairs.dedicated_policy = DedicatedPolicy::Strict;
    }

    debug!("Figure config: {:?}", config);
    Ok(config)
}

/// Parse and aggregate latency entries into chart series
///
/// **Public** - usable without touching the filesystem
pub fn build_pair_figure(
    entries: &[Value],
    config: &PairConfig,
) -> Result<(Vec<PairSummary>, PairChartData)> {
    let records = parse_latency_records(entries).context("Invalid latency records")?;
    let summaries = aggregate(&records, config).context("Failed to aggregate latency records")?;
    let data = build_pair_chart(&summaries);

    debug!("Cross-pair data: {} pairs", data.len());
    Ok((summaries, data))
}

/// Summarize the complexity aggregate into chart panels
///
/// **Public** - usable without touching the filesystem
pub fn build_complexity_figure(
    aggregate: &ComplexityAggregate,
    config: &ComplexityConfig,
) -> Result<Vec<MetricPanel>> {
    let rows = summarize(aggregate, config).context("Failed to summarize complexity metrics")?;
    let panels = build_complexity_panels(&rows, config).context("Failed to build complexity panels")?;

    debug!("Complexity data: {} panels", panels.len());
    Ok(panels)
}

fn write_pair_figure(args: &GenerateArgs, data: &PairChartData) -> Result<PathBuf> {
    let mut chart_config = ChartConfig::new().with_width(args.width);
    if let Some(title) = &args.title {
        chart_config = chart_config.with_title(title.clone());
    }

    let svg = render_pair_chart(data, Some(&chart_config)).context("Failed to render figure")?;
    let path = args.output_dir.join(PAIR_FIGURE_FILE);
    write_svg(&svg, &path).context("Failed to write figure SVG")?;

    info!("✓ Saved {}", path.display());
    Ok(path)
}

fn write_complexity_figure(args: &GenerateArgs, panels: &[MetricPanel]) -> Result<PathBuf> {
    let svg = render_complexity_chart(panels).context("Failed to render figure")?;
    let path = args.output_dir.join(COMPLEXITY_FIGURE_FILE);
    write_svg(&svg, &path).context("Failed to write figure SVG")?;

    info!("✓ Saved {}", path.display());
    Ok(path)
}

/// Validate generate arguments
///
/// **Public** - can be called before execute_generate for early validation
pub fn validate_args(args: &GenerateArgs) -> Result<()> {
    if args.results_dir.as_os_str().is_empty() {
        anyhow::bail!("Results directory cannot be empty");
    }

    if !args.results_dir.is_dir() {
        anyhow::bail!(
            "Results directory does not exist: {}",
            args.results_dir.display()
        );
    }

    if args.output_dir.as_os_str().is_empty() {
        anyhow::bail!("Output directory cannot be empty");
    }

    if args.output_dir.is_file() {
        anyhow::bail!(
            "Output path is a file, not a directory: {}",
            args.output_dir.display()
        );
    }

    if let Some(config_path) = &args.config_path {
        if !config_path.is_file() {
            anyhow::bail!("Config file does not exist: {}", config_path.display());
        }
    }

    if args.width < 400 {
        anyhow::bail!("width is too small (min 400)");
    }

    if args.width > 10_000 {
        anyhow::bail!("width is too large (max 10000)");
    }

    Ok(())
}
