//! FFI Bench Charts
//!
//! Aggregation and figure generation for cross-language interop
//! benchmarks.
//!
//! The core is two pure transforms:
//! - [`aggregator::aggregate`] groups latency records into one row per
//!   (host, guest) pair, comparing the general interop layer, the RPC
//!   reference and the pair's dedicated mechanism
//! - [`aggregator::summarize`] reshapes per-mechanism complexity metrics
//!   into rows for a configured, ordered set of mechanisms
//!
//! [`chart`] adapts both outputs into render-ready series and SVG figures.
//!
//! ## Getting Started
//!
//! ```bash
//! ffi-bench-charts generate --results tests/results --output assets/images
//! ```

pub mod aggregator;
pub mod chart;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
