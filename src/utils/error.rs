//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while grouping latency records into pairs
#[derive(Error, Debug, PartialEq)]
pub enum AggregateError {
    #[error("Malformed latency record at index {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("Pair '{label}' has more than one dedicated mechanism ('{first}' and '{second}')")]
    AmbiguousDedicated {
        label: String,
        first: String,
        second: String,
    },
}

/// Errors that can occur while reshaping the complexity aggregate
#[derive(Error, Debug, PartialEq)]
pub enum SummarizeError {
    #[error("Mechanism '{0}' missing from complexity aggregate")]
    MissingMechanism(String),

    #[error("Metric '{metric}' missing for mechanism '{mechanism}'")]
    MissingMetric { mechanism: String, metric: String },
}

/// Errors that can occur while loading benchmark result files
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required section '{0}'")]
    MissingSection(String),

    #[error("Invalid results format: {0}")]
    InvalidFormat(String),
}

/// Errors that can occur while loading figure configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Invalid figure configuration: {0}")]
    Invalid(String),
}

/// Errors that can occur during chart generation
#[derive(Error, Debug, PartialEq)]
pub enum ChartError {
    #[error("No data to chart")]
    EmptyData,

    #[error("Metric '{metric}' missing for mechanism '{mechanism}'")]
    MissingMetric { mechanism: String, metric: String },

    #[error("Series '{series}' has {actual} values, expected {expected}")]
    LengthMismatch {
        series: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
