//! Configuration and constants for the CLI.
//!
//! The mechanism and metric lists that drive the figures are data, not
//! logic: [`FigureConfig`] carries them and defaults to the benchmark
//! suite's standard set. A TOML file may override any section.

use crate::utils::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Reserved mechanism identifiers in the results files
pub const GENERAL_MECHANISM_ID: &str = "metaffi";
pub const RPC_MECHANISM_ID: &str = "grpc";
pub const DEDICATED_FALLBACK_NAME: &str = "native";

// Input files and their top-level sections
pub const CONSOLIDATED_FILE: &str = "consolidated.json";
pub const CONSOLIDATED_SECTION: &str = "mechanism_averages_by_pair";
pub const COMPLEXITY_FILE: &str = "complexity.json";
pub const COMPLEXITY_SECTION: &str = "aggregate_by_mechanism";

// Output file names
pub const PAIR_FIGURE_FILE: &str = "perf-cross-pair-summary.svg";
pub const COMPLEXITY_FIGURE_FILE: &str = "perf-complexity-summary.svg";
pub const PAYLOAD_FILE: &str = "figures.json";

// Dark-theme colors
pub const COLOR_GENERAL: &str = "#4da6ff";
pub const COLOR_RPC: &str = "#ff6b6b";
pub const COLOR_DEDICATED: &str = "#66cc66";
pub const TEXT_COLOR: &str = "#e0e0e0";
pub const GRID_COLOR: &str = "#333333";
pub const PANEL_COLOR: &str = "#1a1a1a";

/// Complete figure configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FigureConfig {
    /// How latency records are classified into series
    #[serde(default)]
    pub pairs: PairConfig,

    /// Mechanisms and metrics of the complexity figure
    #[serde(default)]
    pub complexity: ComplexityConfig,
}

/// What to do when a pair carries more than one dedicated mechanism
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DedicatedPolicy {
    /// Keep the lexicographically smallest mechanism id and warn about the rest
    #[default]
    LowestId,
    /// Keep the first record in input order and warn about the rest
    FirstSeen,
    /// Reject the input
    Strict,
}

/// Classification rules for the pair comparison
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PairConfig {
    pub general_id: String,
    pub rpc_id: String,
    pub dedicated_fallback: String,
    pub dedicated_policy: DedicatedPolicy,
}

impl Default for PairConfig {
    fn default() -> Self {
        Self {
            general_id: GENERAL_MECHANISM_ID.to_string(),
            rpc_id: RPC_MECHANISM_ID.to_string(),
            dedicated_fallback: DEDICATED_FALLBACK_NAME.to_string(),
            dedicated_policy: DedicatedPolicy::default(),
        }
    }
}

/// A mechanism shown in the complexity figure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MechanismSpec {
    pub id: String,
    pub display_name: String,
}

/// A metric panel of the complexity figure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MetricSpec {
    /// Key in the aggregate record
    pub key: String,
    /// Panel title
    pub title: String,
}

/// Ordered mechanisms and metrics for the complexity figure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ComplexityConfig {
    pub mechanisms: Vec<MechanismSpec>,
    pub metrics: Vec<MetricSpec>,
}

impl Default for ComplexityConfig {
    fn default() -> Self {
        let mechanism = |id: &str, display_name: &str| MechanismSpec {
            id: id.to_string(),
            display_name: display_name.to_string(),
        };
        let metric = |key: &str, title: &str| MetricSpec {
            key: key.to_string(),
            title: title.to_string(),
        };

        Self {
            mechanisms: vec![
                mechanism(GENERAL_MECHANISM_ID, "MetaFFI"),
                mechanism(RPC_MECHANISM_ID, "gRPC"),
                mechanism(DEDICATED_FALLBACK_NAME, "Dedicated"),
            ],
            metrics: vec![
                metric("avg_benchmark_sloc", "Avg Benchmark SLOC"),
                metric("avg_language_count", "Avg Languages Required"),
                metric("avg_benchmark_max_cc", "Avg Max Cyclomatic Complexity"),
            ],
        }
    }
}

impl FigureConfig {
    /// Check the configuration for values the transforms cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pairs = &self.pairs;
        if pairs.general_id.is_empty() || pairs.rpc_id.is_empty() {
            return Err(ConfigError::Invalid(
                "general_id and rpc_id must not be empty".to_string(),
            ));
        }
        if pairs.general_id == pairs.rpc_id {
            return Err(ConfigError::Invalid(format!(
                "general_id and rpc_id are both '{}'",
                pairs.general_id
            )));
        }

        let complexity = &self.complexity;
        if complexity.mechanisms.is_empty() {
            return Err(ConfigError::Invalid("no mechanisms configured".to_string()));
        }
        if complexity.metrics.is_empty() {
            return Err(ConfigError::Invalid("no metrics configured".to_string()));
        }

        let mut seen = HashSet::new();
        for mechanism in &complexity.mechanisms {
            if !seen.insert(mechanism.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "mechanism '{}' listed twice",
                    mechanism.id
                )));
            }
        }

        let mut seen = HashSet::new();
        for metric in &complexity.metrics {
            if !seen.insert(metric.key.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "metric '{}' listed twice",
                    metric.key
                )));
            }
        }

        Ok(())
    }
}

/// Load figure configuration from a TOML file
///
/// # Errors
/// * `ConfigError::IoError` - If file cannot be read
/// * `ConfigError::ParseFailed` - If TOML is invalid
/// * `ConfigError::Invalid` - If the lists are empty or contain duplicates
///
/// # Example
/// ```ignore
/// let config = load_config("figures.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<FigureConfig, ConfigError> {
    let path = path.as_ref();
    debug!("Loading figure config from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    let config: FigureConfig = toml::from_str(&contents)?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = FigureConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.complexity.mechanisms.len(), 3);
        assert_eq!(config.complexity.metrics[0].key, "avg_benchmark_sloc");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: FigureConfig = toml::from_str(
            r#"
            [pairs]
            dedicated_policy = "strict"
            "#,
        )
        .unwrap();

        assert_eq!(config.pairs.dedicated_policy, DedicatedPolicy::Strict);
        assert_eq!(config.pairs.general_id, GENERAL_MECHANISM_ID);
        assert_eq!(config.complexity, ComplexityConfig::default());
    }

    #[test]
    fn test_load_config_overrides_metrics() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [[complexity.metrics]]
            key = "avg_total_sloc"
            title = "Avg Total SLOC"
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.complexity.metrics.len(), 1);
        assert_eq!(config.complexity.metrics[0].title, "Avg Total SLOC");
        assert_eq!(config.complexity.mechanisms.len(), 3);
    }

    #[test]
    fn test_validate_rejects_duplicate_mechanism() {
        let mut config = FigureConfig::default();
        let first = config.complexity.mechanisms[0].clone();
        config.complexity.mechanisms.push(first);

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_same_general_and_rpc() {
        let mut config = FigureConfig::default();
        config.pairs.rpc_id = config.pairs.general_id.clone();

        assert!(config.validate().is_err());
    }
}
