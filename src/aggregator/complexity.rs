//! Reshape the per-mechanism complexity aggregate into ordered rows.
//!
//! Strict lookup only: every configured mechanism and metric must be
//! present. A chart with a missing bar has no valid rendering, so there is
//! no fallback here.

use crate::parser::schema::ComplexityAggregate;
use crate::utils::config::ComplexityConfig;
use crate::utils::error::SummarizeError;
use log::debug;
use serde::{Deserialize, Serialize};

/// A metric value with its aggregate key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedMetric {
    pub name: String,
    pub value: f64,
}

/// Complexity metrics of one mechanism, in configured metric order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanismComplexityRow {
    pub mechanism_id: String,
    pub display_name: String,
    pub metrics: Vec<NamedMetric>,
}

impl MechanismComplexityRow {
    /// Look up a metric by name
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.value)
    }
}

/// Summarize the aggregate for the configured mechanisms
///
/// **Public** - main entry point for the complexity figure
///
/// # Returns
/// One row per configured mechanism, in configured order
///
/// # Errors
/// * `SummarizeError::MissingMechanism` - a configured mechanism is absent
/// * `SummarizeError::MissingMetric` - a configured metric is absent for a
///   present mechanism
pub fn summarize(
    aggregate: &ComplexityAggregate,
    config: &ComplexityConfig,
) -> Result<Vec<MechanismComplexityRow>, SummarizeError> {
    debug!(
        "Summarizing {} mechanisms x {} metrics",
        config.mechanisms.len(),
        config.metrics.len()
    );

    config
        .mechanisms
        .iter()
        .map(|spec| {
            let available = aggregate
                .get(&spec.id)
                .ok_or_else(|| SummarizeError::MissingMechanism(spec.id.clone()))?;

            let metrics = config
                .metrics
                .iter()
                .map(|metric| {
                    available
                        .get(&metric.key)
                        .map(|&value| NamedMetric {
                            name: metric.key.clone(),
                            value,
                        })
                        .ok_or_else(|| SummarizeError::MissingMetric {
                            mechanism: spec.id.clone(),
                            metric: metric.key.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(MechanismComplexityRow {
                mechanism_id: spec.id.clone(),
                display_name: spec.display_name.clone(),
                metrics,
            })
        })
        .collect()
}
