//! Aggregation of benchmark records into comparison tables.
//!
//! This module transforms parsed results into:
//! - Per-pair comparisons of the general, dedicated and RPC mechanisms
//! - Per-mechanism complexity rows in a fixed order
//!
//! Both transforms are pure and independent of each other.

pub mod complexity;
pub mod pairs;

// Re-export main types and functions
pub use complexity::{summarize, MechanismComplexityRow, NamedMetric};
pub use pairs::{aggregate, pair_label, MeasuredSeries, PairSummary};
