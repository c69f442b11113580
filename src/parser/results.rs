//! Benchmark results parser.
//!
//! Reads `consolidated.json` and `complexity.json` and converts their
//! relevant sections into [`LatencyRecord`]s and a [`ComplexityAggregate`].
//! File access lives here so the aggregation core stays free of I/O.

use super::schema::{ComplexityAggregate, LatencyRecord};
use crate::utils::config::{
    COMPLEXITY_FILE, COMPLEXITY_SECTION, CONSOLIDATED_FILE, CONSOLIDATED_SECTION,
};
use crate::utils::error::{AggregateError, LoadError};
use log::{debug, info};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Raw contents of a results directory
#[derive(Debug, Clone)]
pub struct ResultsSnapshot {
    /// Entries of the `mechanism_averages_by_pair` array, unvalidated
    pub latency_entries: Vec<Value>,

    /// Parsed `aggregate_by_mechanism` object
    pub complexity: ComplexityAggregate,
}

/// Load both results files from a directory
///
/// **Public** - main entry point for loading
///
/// # Errors
/// * `LoadError::ReadFailed` - A file is missing or unreadable
/// * `LoadError::JsonError` - A file is not valid JSON
/// * `LoadError::MissingSection` - A required top-level key is absent
/// * `LoadError::InvalidFormat` - A section has the wrong JSON type
pub fn load_results(results_dir: impl AsRef<Path>) -> Result<ResultsSnapshot, LoadError> {
    let results_dir = results_dir.as_ref();
    info!("Loading benchmark data from: {}", results_dir.display());

    let latency_entries = load_latency_entries(results_dir.join(CONSOLIDATED_FILE))?;
    let complexity = load_complexity(results_dir.join(COMPLEXITY_FILE))?;

    Ok(ResultsSnapshot {
        latency_entries,
        complexity,
    })
}

/// Load the per-pair mechanism averages from `consolidated.json`
pub fn load_latency_entries(path: impl AsRef<Path>) -> Result<Vec<Value>, LoadError> {
    let document = read_json(path.as_ref())?;

    match take_section(document, CONSOLIDATED_SECTION)? {
        Value::Array(entries) => {
            debug!("Loaded {} latency entries", entries.len());
            Ok(entries)
        }
        other => Err(LoadError::InvalidFormat(format!(
            "'{}' must be an array, found {}",
            CONSOLIDATED_SECTION,
            json_type_name(&other)
        ))),
    }
}

/// Load the per-mechanism aggregate from `complexity.json`
pub fn load_complexity(path: impl AsRef<Path>) -> Result<ComplexityAggregate, LoadError> {
    let document = read_json(path.as_ref())?;
    let section = take_section(document, COMPLEXITY_SECTION)?;
    parse_complexity_aggregate(&section)
}

/// Convert raw JSON entries into latency records
///
/// Every entry must be an object with string `host`, `guest` and
/// `mechanism` fields and a numeric `average_mean_ns`. Extra fields are
/// ignored.
///
/// # Errors
/// * `AggregateError::MalformedRecord` - identifies the first offending entry
pub fn parse_latency_records(entries: &[Value]) -> Result<Vec<LatencyRecord>, AggregateError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_latency_record(index, entry))
        .collect()
}

fn parse_latency_record(index: usize, entry: &Value) -> Result<LatencyRecord, AggregateError> {
    let malformed = |reason: String| AggregateError::MalformedRecord { index, reason };

    let object = entry
        .as_object()
        .ok_or_else(|| malformed(format!("expected object, found {}", json_type_name(entry))))?;

    let string_field = |name: &str| -> Result<String, AggregateError> {
        match object.get(name) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(malformed(format!(
                "field '{}' must be a string, found {}",
                name,
                json_type_name(other)
            ))),
            None => Err(malformed(format!("missing field '{}'", name))),
        }
    };

    let host = string_field("host")?;
    let guest = string_field("guest")?;
    let mechanism = string_field("mechanism")?;

    let average_mean_ns = match object.get("average_mean_ns") {
        Some(value) => value.as_f64().ok_or_else(|| {
            malformed(format!(
                "field 'average_mean_ns' must be a number, found {}",
                json_type_name(value)
            ))
        })?,
        None => return Err(malformed("missing field 'average_mean_ns'".to_string())),
    };

    Ok(LatencyRecord {
        host,
        guest,
        mechanism,
        average_mean_ns,
    })
}

/// Convert the raw `aggregate_by_mechanism` object
///
/// Non-numeric metric values are dropped; a required metric that was
/// dropped surfaces later as a missing metric.
pub fn parse_complexity_aggregate(section: &Value) -> Result<ComplexityAggregate, LoadError> {
    let mechanisms = section.as_object().ok_or_else(|| {
        LoadError::InvalidFormat(format!(
            "'{}' must be an object, found {}",
            COMPLEXITY_SECTION,
            json_type_name(section)
        ))
    })?;

    let mut aggregate = ComplexityAggregate::with_capacity(mechanisms.len());

    for (mechanism, metrics) in mechanisms {
        let metrics = metrics.as_object().ok_or_else(|| {
            LoadError::InvalidFormat(format!(
                "metrics of mechanism '{}' must be an object, found {}",
                mechanism,
                json_type_name(metrics)
            ))
        })?;

        let mut numeric = HashMap::with_capacity(metrics.len());
        for (name, value) in metrics {
            match value.as_f64() {
                Some(v) => {
                    numeric.insert(name.clone(), v);
                }
                None => debug!(
                    "Skipping non-numeric metric '{}' of mechanism '{}'",
                    name, mechanism
                ),
            }
        }

        aggregate.insert(mechanism.clone(), numeric);
    }

    debug!("Loaded complexity aggregate for {} mechanisms", aggregate.len());
    Ok(aggregate)
}

/// **Private** - open and deserialize a JSON file
fn read_json(path: &Path) -> Result<Value, LoadError> {
    debug!("Reading: {}", path.display());

    let file = File::open(path).map_err(|source| LoadError::ReadFailed {
        path: path.display().to_string(),
        source,
    })?;

    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn take_section(document: Value, section: &str) -> Result<Value, LoadError> {
    match document {
        Value::Object(mut obj) => obj
            .remove(section)
            .ok_or_else(|| LoadError::MissingSection(section.to_string())),
        other => Err(LoadError::InvalidFormat(format!(
            "results document must be an object, found {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_latency_records_valid() {
        let entries = vec![
            json!({"host": "python3", "guest": "jvm", "mechanism": "metaffi", "average_mean_ns": 120.5}),
            json!({"host": "python3", "guest": "jvm", "mechanism": "grpc", "average_mean_ns": 900, "scenarios": 12}),
        ];

        let records = parse_latency_records(&entries).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], LatencyRecord::new("python3", "jvm", "metaffi", 120.5));
        assert_eq!(records[1].average_mean_ns, 900.0);
    }

    #[test]
    fn test_parse_latency_records_missing_field() {
        let entries = vec![
            json!({"host": "go", "guest": "jvm", "mechanism": "metaffi", "average_mean_ns": 1.0}),
            json!({"host": "go", "mechanism": "grpc", "average_mean_ns": 2.0}),
        ];

        let err = parse_latency_records(&entries).unwrap_err();

        assert_eq!(
            err,
            AggregateError::MalformedRecord {
                index: 1,
                reason: "missing field 'guest'".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_latency_records_non_numeric_latency() {
        let entries = vec![json!({"host": "go", "guest": "jvm", "mechanism": "jni", "average_mean_ns": "fast"})];

        let err = parse_latency_records(&entries).unwrap_err();

        assert!(matches!(err, AggregateError::MalformedRecord { index: 0, .. }));
    }

    #[test]
    fn test_parse_latency_records_not_an_object() {
        let entries = vec![json!(["go", "jvm"])];
        assert!(parse_latency_records(&entries).is_err());
    }

    #[test]
    fn test_parse_complexity_aggregate_skips_non_numeric() {
        let section = json!({
            "metaffi": {"avg_benchmark_sloc": 40, "languages": ["go", "python3"]},
            "grpc": {"avg_benchmark_sloc": 210.5}
        });

        let aggregate = parse_complexity_aggregate(&section).unwrap();

        assert_eq!(aggregate["metaffi"].len(), 1);
        assert_eq!(aggregate["metaffi"]["avg_benchmark_sloc"], 40.0);
        assert_eq!(aggregate["grpc"]["avg_benchmark_sloc"], 210.5);
    }

    #[test]
    fn test_parse_complexity_aggregate_rejects_array() {
        let result = parse_complexity_aggregate(&json!([1, 2, 3]));
        assert!(matches!(result, Err(LoadError::InvalidFormat(_))));
    }

    #[test]
    fn test_take_section_missing() {
        let result = take_section(json!({"other": []}), CONSOLIDATED_SECTION);
        assert!(matches!(result, Err(LoadError::MissingSection(_))));
    }
}
