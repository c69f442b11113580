//! Group latency records into per-pair mechanism comparisons.
//!
//! Each (host, guest) pair gets one row holding the general-purpose
//! interop layer, the RPC reference and the pair's dedicated native
//! mechanism. Rows are ordered by the pair itself, so the result does not
//! depend on the order records arrive in.
//!
//! Example: records `(python3, jvm, metaffi, 120)`, `(python3, jvm, grpc, 900)`
//! and `(python3, jvm, jni, 40)` become
//! `python3 → jvm: general 120, dedicated jni 40, rpc 900`.

use crate::parser::schema::LatencyRecord;
use crate::utils::config::{DedicatedPolicy, PairConfig};
use crate::utils::error::AggregateError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Comparison row for one language pair
///
/// **Public** - consumed by the chart data builder
///
/// Absent series are reported as `0` (and the fallback name for the
/// dedicated mechanism); `measured` records which ones were present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairSummary {
    /// "host → guest"
    pub label: String,

    /// General-purpose interop layer latency (ns)
    pub general_ns: f64,

    /// Dedicated mechanism latency (ns)
    pub dedicated_ns: f64,

    /// Dedicated mechanism identifier
    pub dedicated_name: String,

    /// RPC mechanism latency (ns)
    pub rpc_ns: f64,

    /// Which series carry a measurement
    pub measured: MeasuredSeries,
}

/// Presence flags for the three series of a [`PairSummary`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasuredSeries {
    pub general: bool,
    pub dedicated: bool,
    pub rpc: bool,
}

/// Build the display label of a pair
pub fn pair_label(host: &str, guest: &str) -> String {
    format!("{} \u{2192} {}", host, guest)
}

/// Aggregate latency records into one summary per pair
///
/// **Public** - main entry point for the pair comparison
///
/// # Arguments
/// * `records` - Latency records in any order
/// * `config` - Reserved mechanism ids, fallback name and dedicated policy
///
/// # Returns
/// One summary per distinct (host, guest) pair, sorted by (host, guest)
///
/// # Errors
/// * `AggregateError::MalformedRecord` - empty identifiers, a negative or
///   non-finite latency, or a second general/RPC record for a pair
/// * `AggregateError::AmbiguousDedicated` - a pair has two dedicated
///   records and the policy is strict
pub fn aggregate(
    records: &[LatencyRecord],
    config: &PairConfig,
) -> Result<Vec<PairSummary>, AggregateError> {
    debug!("Aggregating {} latency records", records.len());

    let mut pairs: BTreeMap<(&str, &str), PairAccumulator> = BTreeMap::new();

    for (index, record) in records.iter().enumerate() {
        validate_record(index, record)?;

        pairs
            .entry((record.host.as_str(), record.guest.as_str()))
            .or_default()
            .add(index, record, config)?;
    }

    let summaries: Vec<PairSummary> = pairs
        .into_iter()
        .map(|((host, guest), acc)| acc.into_summary(host, guest, config))
        .collect();

    debug!("Aggregated {} language pairs", summaries.len());

    Ok(summaries)
}

/// **Private** - reject records no chart can show
fn validate_record(index: usize, record: &LatencyRecord) -> Result<(), AggregateError> {
    let malformed = |reason: String| AggregateError::MalformedRecord { index, reason };

    for (name, value) in [
        ("host", &record.host),
        ("guest", &record.guest),
        ("mechanism", &record.mechanism),
    ] {
        if value.trim().is_empty() {
            return Err(malformed(format!("field '{}' is empty", name)));
        }
    }

    let ns = record.average_mean_ns;
    if !ns.is_finite() || ns < 0.0 {
        return Err(malformed(format!(
            "average_mean_ns must be a non-negative number, got {}",
            ns
        )));
    }

    Ok(())
}

/// Series found so far for one pair, with the index each came from
#[derive(Default)]
struct PairAccumulator<'a> {
    general: Option<(usize, f64)>,
    rpc: Option<(usize, f64)>,
    dedicated: Option<(&'a str, f64)>,
}

impl<'a> PairAccumulator<'a> {
    fn add(
        &mut self,
        index: usize,
        record: &'a LatencyRecord,
        config: &PairConfig,
    ) -> Result<(), AggregateError> {
        let value = record.average_mean_ns;

        if record.mechanism == config.general_id {
            set_reserved(&mut self.general, index, value, record)
        } else if record.mechanism == config.rpc_id {
            set_reserved(&mut self.rpc, index, value, record)
        } else {
            match self.dedicated {
                None => {
                    self.dedicated = Some((record.mechanism.as_str(), value));
                    Ok(())
                }
                Some((first, first_ns)) => {
                    let label = pair_label(&record.host, &record.guest);
                    let second = record.mechanism.as_str();
                    match config.dedicated_policy {
                        DedicatedPolicy::LowestId => {
                            let (kept, ignored) = if (second, value) < (first, first_ns) {
                                self.dedicated = Some((second, value));
                                (second, first)
                            } else {
                                (first, second)
                            };
                            warn!(
                                "Pair {} has more than one dedicated mechanism; keeping '{}', ignoring '{}'",
                                label, kept, ignored
                            );
                            Ok(())
                        }
                        DedicatedPolicy::FirstSeen => {
                            warn!(
                                "Pair {} has more than one dedicated mechanism; keeping '{}', ignoring '{}'",
                                label, first, second
                            );
                            Ok(())
                        }
                        DedicatedPolicy::Strict => Err(AggregateError::AmbiguousDedicated {
                            label,
                            first: first.to_string(),
                            second: second.to_string(),
                        }),
                    }
                }
            }
        }
    }

    fn into_summary(self, host: &str, guest: &str, config: &PairConfig) -> PairSummary {
        let (dedicated_name, dedicated_ns) = match self.dedicated {
            Some((name, ns)) => (name.to_string(), ns),
            None => (config.dedicated_fallback.clone(), 0.0),
        };

        PairSummary {
            label: pair_label(host, guest),
            general_ns: self.general.map_or(0.0, |(_, ns)| ns),
            dedicated_ns,
            dedicated_name,
            rpc_ns: self.rpc.map_or(0.0, |(_, ns)| ns),
            measured: MeasuredSeries {
                general: self.general.is_some(),
                dedicated: self.dedicated.is_some(),
                rpc: self.rpc.is_some(),
            },
        }
    }
}

fn set_reserved(
    slot: &mut Option<(usize, f64)>,
    index: usize,
    value: f64,
    record: &LatencyRecord,
) -> Result<(), AggregateError> {
    if let Some((first_index, _)) = slot {
        return Err(AggregateError::MalformedRecord {
            index,
            reason: format!(
                "duplicate '{}' record for pair {} (first at index {})",
                record.mechanism,
                pair_label(&record.host, &record.guest),
                first_index
            ),
        });
    }

    *slot = Some((index, value));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rec(host: &str, guest: &str, mechanism: &str, ns: f64) -> LatencyRecord {
        LatencyRecord::new(host, guest, mechanism, ns)
    }

    #[test]
    fn test_full_pair() {
        let records = vec![
            rec("py", "java", "metaffi", 120.0),
            rec("py", "java", "grpc", 900.0),
            rec("py", "java", "jni", 40.0),
        ];

        let summaries = aggregate(&records, &PairConfig::default()).unwrap();

        assert_eq!(
            summaries,
            vec![PairSummary {
                label: "py → java".to_string(),
                general_ns: 120.0,
                dedicated_ns: 40.0,
                dedicated_name: "jni".to_string(),
                rpc_ns: 900.0,
                measured: MeasuredSeries {
                    general: true,
                    dedicated: true,
                    rpc: true,
                },
            }]
        );
    }

    #[test]
    fn test_missing_series_default_to_zero() {
        let records = vec![rec("go", "rust", "metaffi", 60.0)];

        let summaries = aggregate(&records, &PairConfig::default()).unwrap();

        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.label, "go → rust");
        assert_eq!(s.general_ns, 60.0);
        assert_eq!(s.dedicated_ns, 0.0);
        assert_eq!(s.dedicated_name, "native");
        assert_eq!(s.rpc_ns, 0.0);
        assert!(s.measured.general);
        assert!(!s.measured.dedicated);
        assert!(!s.measured.rpc);
    }

    #[test]
    fn test_measured_zero_is_distinguishable() {
        let records = vec![rec("go", "rust", "grpc", 0.0)];

        let summaries = aggregate(&records, &PairConfig::default()).unwrap();

        assert_eq!(summaries[0].rpc_ns, 0.0);
        assert!(summaries[0].measured.rpc);
        assert!(!summaries[0].measured.general);
    }

    #[test]
    fn test_output_sorted_by_pair() {
        let records = vec![
            rec("python3", "jvm", "metaffi", 1.0),
            rec("jvm", "python3", "metaffi", 2.0),
            rec("go", "python3", "metaffi", 3.0),
            rec("go", "jvm", "metaffi", 4.0),
        ];

        let labels: Vec<String> = aggregate(&records, &PairConfig::default())
            .unwrap()
            .into_iter()
            .map(|s| s.label)
            .collect();

        assert_eq!(
            labels,
            vec!["go → jvm", "go → python3", "jvm → python3", "python3 → jvm"]
        );
    }

    #[test]
    fn test_empty_input() {
        let summaries = aggregate(&[], &PairConfig::default()).unwrap();
        assert!(summaries.is_empty());
    }

    #[test]
    fn test_lowest_dedicated_id_wins_in_any_order() {
        let forward = vec![
            rec("go", "python3", "cpython", 10.0),
            rec("go", "python3", "cgo", 20.0),
        ];
        let backward: Vec<LatencyRecord> = forward.iter().rev().cloned().collect();

        let a = aggregate(&forward, &PairConfig::default()).unwrap();
        let b = aggregate(&backward, &PairConfig::default()).unwrap();

        assert_eq!(a, b);
        assert_eq!(a[0].dedicated_name, "cgo");
        assert_eq!(a[0].dedicated_ns, 20.0);
    }

    #[test]
    fn test_first_seen_policy_keeps_input_order() {
        let config = PairConfig {
            dedicated_policy: DedicatedPolicy::FirstSeen,
            ..PairConfig::default()
        };
        let records = vec![
            rec("go", "python3", "cpython", 10.0),
            rec("go", "python3", "cgo", 20.0),
        ];

        let summaries = aggregate(&records, &config).unwrap();

        assert_eq!(summaries[0].dedicated_name, "cpython");
        assert_eq!(summaries[0].dedicated_ns, 10.0);
    }

    #[test]
    fn test_strict_policy_rejects_second_dedicated() {
        let config = PairConfig {
            dedicated_policy: DedicatedPolicy::Strict,
            ..PairConfig::default()
        };
        let records = vec![
            rec("go", "python3", "cpython", 10.0),
            rec("go", "python3", "cgo", 20.0),
        ];

        let err = aggregate(&records, &config).unwrap_err();

        assert_eq!(
            err,
            AggregateError::AmbiguousDedicated {
                label: "go → python3".to_string(),
                first: "cpython".to_string(),
                second: "cgo".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_general_is_malformed() {
        let records = vec![
            rec("go", "jvm", "metaffi", 10.0),
            rec("go", "jvm", "grpc", 100.0),
            rec("go", "jvm", "metaffi", 11.0),
        ];

        let err = aggregate(&records, &PairConfig::default()).unwrap_err();

        assert!(matches!(err, AggregateError::MalformedRecord { index: 2, .. }));
    }

    #[test]
    fn test_negative_latency_is_malformed() {
        let records = vec![
            rec("go", "jvm", "metaffi", 10.0),
            rec("go", "jvm", "grpc", -1.0),
        ];

        let err = aggregate(&records, &PairConfig::default()).unwrap_err();

        assert!(matches!(err, AggregateError::MalformedRecord { index: 1, .. }));
    }

    #[test]
    fn test_nan_latency_is_malformed() {
        let records = vec![rec("go", "jvm", "metaffi", f64::NAN)];
        assert!(aggregate(&records, &PairConfig::default()).is_err());
    }

    #[test]
    fn test_empty_host_is_malformed() {
        let records = vec![rec("", "jvm", "metaffi", 1.0)];

        let err = aggregate(&records, &PairConfig::default()).unwrap_err();

        assert_eq!(
            err,
            AggregateError::MalformedRecord {
                index: 0,
                reason: "field 'host' is empty".to_string(),
            }
        );
    }

    #[test]
    fn test_custom_reserved_ids() {
        let config = PairConfig {
            general_id: "ffi".to_string(),
            rpc_id: "thrift".to_string(),
            dedicated_fallback: "baseline".to_string(),
            ..PairConfig::default()
        };
        let records = vec![
            rec("a", "b", "ffi", 5.0),
            rec("a", "b", "thrift", 50.0),
            rec("a", "b", "metaffi", 7.0),
        ];

        let s = &aggregate(&records, &config).unwrap()[0];

        assert_eq!(s.general_ns, 5.0);
        assert_eq!(s.rpc_ns, 50.0);
        assert_eq!(s.dedicated_name, "metaffi");
    }
}
