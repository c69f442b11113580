//! Input record definitions.
//!
//! These are the shapes the aggregation core consumes. They are built
//! once from a results snapshot and never mutated.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One measured mechanism's average cost for one language pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyRecord {
    /// Source (calling) language
    pub host: String,

    /// Target (called) language
    pub guest: String,

    /// Interop mechanism identifier
    pub mechanism: String,

    /// Average latency in nanoseconds
    pub average_mean_ns: f64,
}

impl LatencyRecord {
    pub fn new(
        host: impl Into<String>,
        guest: impl Into<String>,
        mechanism: impl Into<String>,
        average_mean_ns: f64,
    ) -> Self {
        Self {
            host: host.into(),
            guest: guest.into(),
            mechanism: mechanism.into(),
            average_mean_ns,
        }
    }
}

/// Complexity metrics keyed by mechanism id, then by metric name
pub type ComplexityAggregate = HashMap<String, HashMap<String, f64>>;
