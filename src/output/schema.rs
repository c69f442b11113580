//! Output JSON schema for figure data.
//!
//! This is the render-ready payload written next to the figures.
//! Schema is versioned to allow future evolution.

use crate::chart::{MetricPanel, PairChartData};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::ChartError;
use serde::{Deserialize, Serialize};

/// Top-level figure data written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigurePayload {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the payload was generated
    pub generated_at: String,

    /// Cross-pair latency series (absent if that figure failed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pairs: Option<PairChartData>,

    /// Complexity panels in metric order (absent if that figure failed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Vec<MetricPanel>>,
}

impl FigurePayload {
    pub fn new(pairs: Option<PairChartData>, complexity: Option<Vec<MetricPanel>>) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            pairs,
            complexity,
        }
    }

    /// Check every contained series for consistent lengths
    pub fn validate(&self) -> Result<(), ChartError> {
        if let Some(pairs) = &self.pairs {
            pairs.validate()?;
        }
        for panel in self.complexity.iter().flatten() {
            panel.validate()?;
        }
        Ok(())
    }
}
