//! Results parsing and input record definitions.
//!
//! This module handles:
//! - Reading the consolidated latency and complexity result files
//! - Converting raw JSON entries into typed records
//! - Reporting malformed entries by position

pub mod results;
pub mod schema;

// Re-export main types
pub use results::{
    load_complexity, load_latency_entries, load_results, parse_complexity_aggregate,
    parse_latency_records, ResultsSnapshot,
};
pub use schema::{ComplexityAggregate, LatencyRecord};
