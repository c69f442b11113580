//! Render-ready series built from the aggregation output.
//!
//! Nothing here computes or fills in values. Every sequence has exactly
//! one entry per input row, in input order; defaulting has already
//! happened in the aggregator. Only presentation helpers (axis hints and
//! rounded annotation strings) are derived.

use crate::aggregator::{MeasuredSeries, MechanismComplexityRow, PairSummary};
use crate::utils::config::{ComplexityConfig, MetricSpec};
use crate::utils::error::ChartError;
use serde::{Deserialize, Serialize};

/// Linear axes leave this much headroom above the tallest bar
pub const LINEAR_HEADROOM: f64 = 1.2;

/// Value labels sit this fraction of the tallest bar above each bar
pub const ANNOTATION_OFFSET: f64 = 0.02;

/// Axis scaling hint for the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scale", rename_all = "snake_case")]
pub enum AxisHint {
    /// Logarithmic axis spanning the positive values (none if no value is positive)
    Log {
        min_positive: Option<f64>,
        max: Option<f64>,
    },
    /// Linear axis from zero to `max`
    Linear { max: f64 },
}

/// Grouped bar data for the cross-pair latency figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairChartData {
    pub labels: Vec<String>,
    pub general: Vec<f64>,
    pub dedicated: Vec<f64>,
    pub rpc: Vec<f64>,
    pub dedicated_names: Vec<String>,
    pub measured: Vec<MeasuredSeries>,
    pub axis: AxisHint,
}

impl PairChartData {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Check that all series line up with the labels
    pub fn validate(&self) -> Result<(), ChartError> {
        let expected = self.labels.len();
        check_len("general", expected, self.general.len())?;
        check_len("dedicated", expected, self.dedicated.len())?;
        check_len("rpc", expected, self.rpc.len())?;
        check_len("dedicated_names", expected, self.dedicated_names.len())?;
        check_len("measured", expected, self.measured.len())
    }
}

/// One panel of the complexity figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPanel {
    /// Aggregate key of the metric
    pub metric: String,
    pub title: String,
    /// Mechanism display names
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// Display strings for `values`, same order
    pub annotations: Vec<String>,
    /// Distance between a bar top and its annotation
    pub annotation_offset: f64,
    pub axis: AxisHint,
}

impl MetricPanel {
    pub fn validate(&self) -> Result<(), ChartError> {
        let expected = self.labels.len();
        check_len("values", expected, self.values.len())?;
        check_len("annotations", expected, self.annotations.len())
    }
}

fn check_len(series: &'static str, expected: usize, actual: usize) -> Result<(), ChartError> {
    if expected != actual {
        return Err(ChartError::LengthMismatch {
            series,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Build the cross-pair series
///
/// **Public** - adaptation of the pair aggregator output
pub fn build_pair_chart(summaries: &[PairSummary]) -> PairChartData {
    let general: Vec<f64> = summaries.iter().map(|s| s.general_ns).collect();
    let dedicated: Vec<f64> = summaries.iter().map(|s| s.dedicated_ns).collect();
    let rpc: Vec<f64> = summaries.iter().map(|s| s.rpc_ns).collect();

    let positive = || {
        general
            .iter()
            .chain(&dedicated)
            .chain(&rpc)
            .copied()
            .filter(|v| *v > 0.0)
    };
    let axis = AxisHint::Log {
        min_positive: positive().reduce(f64::min),
        max: positive().reduce(f64::max),
    };

    PairChartData {
        labels: summaries.iter().map(|s| s.label.clone()).collect(),
        dedicated_names: summaries.iter().map(|s| s.dedicated_name.clone()).collect(),
        measured: summaries.iter().map(|s| s.measured).collect(),
        general,
        dedicated,
        rpc,
        axis,
    }
}

/// Build one complexity panel
///
/// **Public** - one panel per call, selected by `metric`
///
/// # Errors
/// * `ChartError::MissingMetric` - a row does not carry the metric
pub fn build_metric_panel(
    rows: &[MechanismComplexityRow],
    metric: &MetricSpec,
) -> Result<MetricPanel, ChartError> {
    let values = rows
        .iter()
        .map(|row| {
            row.metric(&metric.key)
                .ok_or_else(|| ChartError::MissingMetric {
                    mechanism: row.mechanism_id.clone(),
                    metric: metric.key.clone(),
                })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let tallest = values.iter().copied().fold(0.0, f64::max);
    // An all-zero panel still needs a non-degenerate axis
    let axis_max = if tallest > 0.0 {
        tallest * LINEAR_HEADROOM
    } else {
        1.0
    };

    Ok(MetricPanel {
        metric: metric.key.clone(),
        title: metric.title.clone(),
        labels: rows.iter().map(|r| r.display_name.clone()).collect(),
        annotations: values.iter().map(|v| format_value_label(*v)).collect(),
        annotation_offset: tallest * ANNOTATION_OFFSET,
        axis: AxisHint::Linear { max: axis_max },
        values,
    })
}

/// Build every configured panel, in configured metric order
pub fn build_complexity_panels(
    rows: &[MechanismComplexityRow],
    config: &ComplexityConfig,
) -> Result<Vec<MetricPanel>, ChartError> {
    config
        .metrics
        .iter()
        .map(|metric| build_metric_panel(rows, metric))
        .collect()
}

/// Bar annotation text: integers without decimals, anything else with one
pub fn format_value_label(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// Latency tick text rounded to whole units with thousands separators
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::NamedMetric;
    use pretty_assertions::assert_eq;

    fn summary(label: &str, general: f64, dedicated: f64, name: &str, rpc: f64) -> PairSummary {
        PairSummary {
            label: label.to_string(),
            general_ns: general,
            dedicated_ns: dedicated,
            dedicated_name: name.to_string(),
            rpc_ns: rpc,
            measured: MeasuredSeries {
                general: general > 0.0,
                dedicated: dedicated > 0.0,
                rpc: rpc > 0.0,
            },
        }
    }

    fn row(id: &str, name: &str, values: &[(&str, f64)]) -> MechanismComplexityRow {
        MechanismComplexityRow {
            mechanism_id: id.to_string(),
            display_name: name.to_string(),
            metrics: values
                .iter()
                .map(|(n, v)| NamedMetric {
                    name: n.to_string(),
                    value: *v,
                })
                .collect(),
        }
    }

    #[test]
    fn test_build_pair_chart_keeps_order() {
        let summaries = vec![
            summary("py → java", 120.0, 40.0, "jni", 900.0),
            summary("go → rust", 60.0, 0.0, "native", 0.0),
        ];

        let data = build_pair_chart(&summaries);

        assert_eq!(data.labels, vec!["py → java", "go → rust"]);
        assert_eq!(data.general, vec![120.0, 60.0]);
        assert_eq!(data.dedicated, vec![40.0, 0.0]);
        assert_eq!(data.rpc, vec![900.0, 0.0]);
        assert_eq!(data.dedicated_names, vec!["jni", "native"]);
        assert_eq!(
            data.axis,
            AxisHint::Log {
                min_positive: Some(40.0),
                max: Some(900.0),
            }
        );
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_build_pair_chart_empty() {
        let data = build_pair_chart(&[]);

        assert!(data.is_empty());
        assert_eq!(
            data.axis,
            AxisHint::Log {
                min_positive: None,
                max: None,
            }
        );
    }

    #[test]
    fn test_validate_detects_length_mismatch() {
        let mut data = build_pair_chart(&[summary("a → b", 1.0, 2.0, "x", 3.0)]);
        data.rpc.push(4.0);

        assert_eq!(
            data.validate(),
            Err(ChartError::LengthMismatch {
                series: "rpc",
                expected: 1,
                actual: 2,
            })
        );
    }

    #[test]
    fn test_build_metric_panel() {
        let rows = vec![
            row("metaffi", "MetaFFI", &[("sloc", 40.0)]),
            row("grpc", "gRPC", &[("sloc", 212.5)]),
            row("native", "Dedicated", &[("sloc", 100.0)]),
        ];
        let metric = MetricSpec {
            key: "sloc".to_string(),
            title: "SLOC".to_string(),
        };

        let panel = build_metric_panel(&rows, &metric).unwrap();

        assert_eq!(panel.labels, vec!["MetaFFI", "gRPC", "Dedicated"]);
        assert_eq!(panel.values, vec![40.0, 212.5, 100.0]);
        assert_eq!(panel.annotations, vec!["40", "212.5", "100"]);
        assert_eq!(panel.axis, AxisHint::Linear { max: 212.5 * 1.2 });
        assert!((panel.annotation_offset - 4.25).abs() < 1e-9);
    }

    #[test]
    fn test_build_metric_panel_missing_metric() {
        let rows = vec![row("metaffi", "MetaFFI", &[("sloc", 40.0)])];
        let metric = MetricSpec {
            key: "cc".to_string(),
            title: "CC".to_string(),
        };

        let err = build_metric_panel(&rows, &metric).unwrap_err();

        assert_eq!(
            err,
            ChartError::MissingMetric {
                mechanism: "metaffi".to_string(),
                metric: "cc".to_string(),
            }
        );
    }

    #[test]
    fn test_build_metric_panel_all_zero() {
        let rows = vec![row("metaffi", "MetaFFI", &[("sloc", 0.0)])];
        let metric = MetricSpec {
            key: "sloc".to_string(),
            title: "SLOC".to_string(),
        };

        let panel = build_metric_panel(&rows, &metric).unwrap();

        assert_eq!(panel.axis, AxisHint::Linear { max: 1.0 });
        assert_eq!(panel.values, vec![0.0]);
    }

    #[test]
    fn test_format_value_label() {
        assert_eq!(format_value_label(3.0), "3");
        assert_eq!(format_value_label(2.24), "2.2");
        assert_eq!(format_value_label(12.36), "12.4");
        assert_eq!(format_value_label(0.0), "0");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.4), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(1234567.8), "1,234,568");
        assert_eq!(format_thousands(-12345.0), "-12,345");
    }
}
