//! Chart data adaptation and SVG figure generation.
//!
//! `data` turns aggregation output into render-ready series without
//! touching the numbers; `generator` draws those series as SVG.

pub mod data;
pub mod generator;

// Re-export main types
pub use data::{
    build_complexity_panels, build_metric_panel, build_pair_chart, format_thousands,
    format_value_label, AxisHint, MetricPanel, PairChartData,
};
pub use generator::{
    generate_text_summary, render_complexity_chart, render_pair_chart, ChartConfig,
};
