use crate::output::read_payload;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a figure data JSON file
pub fn validate_payload_file(file_path: PathBuf) -> Result<()> {
    println!("Validating figure data: {}", file_path.display());

    let payload = read_payload(&file_path)?;
    payload
        .validate()
        .context("Figure data series are inconsistent")?;

    if payload.version != SCHEMA_VERSION {
        anyhow::bail!(
            "Unsupported schema version {} (expected {})",
            payload.version,
            SCHEMA_VERSION
        );
    }

    println!("✓ Valid figure data JSON");
    println!("  Version: {}", payload.version);
    println!("  Generated: {}", payload.generated_at);
    match &payload.pairs {
        Some(pairs) => println!("  Language Pairs: {}", pairs.len()),
        None => println!("  Language Pairs: (missing)"),
    }
    match &payload.complexity {
        Some(panels) => println!("  Complexity Panels: {}", panels.len()),
        None => println!("  Complexity Panels: (missing)"),
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("FFI Bench Charts Figure Data Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string       - RFC 3339 timestamp");
        println!("  pairs: object?             - Cross-pair latency series");
        println!("    labels: array            - 'host → guest' per pair, sorted");
        println!("    general: array           - General interop layer latency (ns)");
        println!("    dedicated: array         - Dedicated mechanism latency (ns)");
        println!("    rpc: array               - RPC mechanism latency (ns)");
        println!("    dedicated_names: array   - Dedicated mechanism per pair");
        println!("    measured: array          - Which series were measured per pair");
        println!("    axis: object             - Log axis bounds");
        println!("  complexity: array?         - One panel per metric");
        println!("    metric: string           - Aggregate key");
        println!("    title: string            - Panel title");
        println!("    labels: array            - Mechanism display names");
        println!("    values: array            - Metric values");
        println!("    annotations: array       - Rounded value labels");
        println!("    annotation_offset: number - Label distance above bars");
        println!("    axis: object             - Linear axis bound");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("FFI Bench Charts v{}", env!("CARGO_PKG_VERSION"));
    println!("Figure Data Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Aggregation and figures for cross-language interop benchmarks.");
}
