//! SVG figure generation for dark-themed pages.
//!
//! Hand-written SVG, no plotting backend:
//! - Cross-pair figure: horizontal grouped bars on a log latency axis
//! - Complexity figure: one vertical bar panel per metric, value labels on bars
//!
//! Input comes from [`super::data`]; the renderer draws exactly what it
//! is given and only skips bars that were never measured.

use super::data::{format_thousands, AxisHint, MetricPanel, PairChartData};
use crate::aggregator::PairSummary;
use crate::utils::config::{
    COLOR_DEDICATED, COLOR_GENERAL, COLOR_RPC, GRID_COLOR, PANEL_COLOR, TEXT_COLOR,
};
use crate::utils::error::ChartError;
use log::{debug, info, warn};

/// Figure configuration
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub title: String,
    pub width: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: "Cross-Language Call Latency by Mechanism".to_string(),
            width: 1200,
        }
    }
}

impl ChartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
}

const BAR_HEIGHT: f64 = 14.0;
const GROUP_GAP: f64 = 14.0;
const LABEL_MARGIN: f64 = 170.0;
const RIGHT_MARGIN: f64 = 30.0;
const TITLE_MARGIN: f64 = 50.0;
const AXIS_MARGIN: f64 = 90.0;

/// Log axis range (as decades) when there is nothing to plot
const EMPTY_DECADES: (f64, f64) = (0.0, 3.0);

const PANEL_WIDTH: usize = 500;
const PANEL_HEIGHT: usize = 500;

/// Bar colors by position in the complexity figure (general, RPC, dedicated)
const PANEL_COLORS: [&str; 3] = [COLOR_GENERAL, COLOR_RPC, COLOR_DEDICATED];

/// Generate the cross-pair latency figure
///
/// **Public** - main entry point for the pair figure
///
/// With no pairs, or no positive value to place on the log axis, the
/// figure is drawn with an empty 1..1,000 ns axis.
///
/// # Errors
/// * `ChartError::LengthMismatch` - series do not line up
pub fn render_pair_chart(
    data: &PairChartData,
    config: Option<&ChartConfig>,
) -> Result<String, ChartError> {
    data.validate()?;

    let (lo, hi) = match data.axis {
        AxisHint::Log {
            min_positive: Some(min),
            max: Some(max),
        } => log_decades(min, max),
        _ => {
            warn!("No positive latency to plot, drawing an empty axis");
            EMPTY_DECADES
        }
    };

    let config = config.cloned().unwrap_or_default();
    info!("Rendering pair figure with {} pairs", data.len());

    let width = config.width as f64;
    let group_height = 3.0 * BAR_HEIGHT + GROUP_GAP;
    let plot_height = data.len().max(1) as f64 * group_height;
    let height = TITLE_MARGIN + plot_height + AXIS_MARGIN;
    let plot_width = width - LABEL_MARGIN - RIGHT_MARGIN;

    let x_of = |value: f64| LABEL_MARGIN + (value.log10() - lo) / (hi - lo) * plot_width;

    let mut svg = String::new();
    open_svg(&mut svg, width, height);

    // Title
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="30" font-size="16" text-anchor="middle" fill="{}">{}</text>"#,
        width / 2.0,
        TEXT_COLOR,
        escape_xml(&config.title)
    ));

    // Plot area and decade grid
    svg.push_str(&format!(
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" stroke="{}"/>"#,
        LABEL_MARGIN, TITLE_MARGIN, plot_width, plot_height, PANEL_COLOR, GRID_COLOR
    ));
    for exponent in (lo as i32)..=(hi as i32) {
        let value = 10f64.powi(exponent);
        let x = x_of(value);
        svg.push_str(&format!(
            r#"<line x1="{x:.2}" y1="{top:.1}" x2="{x:.2}" y2="{bottom:.1}" stroke="{grid}" stroke-opacity="0.5"/><text x="{x:.2}" y="{label_y:.1}" font-size="12" text-anchor="middle" fill="{text}">{label}</text>"#,
            x = x,
            top = TITLE_MARGIN,
            bottom = TITLE_MARGIN + plot_height,
            grid = GRID_COLOR,
            label_y = TITLE_MARGIN + plot_height + 18.0,
            text = TEXT_COLOR,
            label = format_thousands(value)
        ));
    }

    if data.is_empty() {
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="13" text-anchor="middle" fill="{}">No measurements</text>"#,
            LABEL_MARGIN + plot_width / 2.0,
            TITLE_MARGIN + plot_height / 2.0 + 4.0,
            TEXT_COLOR
        ));
    }

    // Bars, first pair on top, MetaFFI / Dedicated / gRPC within a group
    for i in 0..data.len() {
        let group_top = TITLE_MARGIN + i as f64 * group_height + GROUP_GAP / 2.0;
        let measured = data.measured[i];
        let series = [
            (data.general[i], measured.general, COLOR_GENERAL, "MetaFFI".to_string()),
            (
                data.dedicated[i],
                measured.dedicated,
                COLOR_DEDICATED,
                data.dedicated_names[i].clone(),
            ),
            (data.rpc[i], measured.rpc, COLOR_RPC, "gRPC".to_string()),
        ];

        for (slot, (value, present, color, name)) in series.iter().enumerate() {
            if !present || *value <= 0.0 {
                debug!("Skipping unmeasured bar {} for {}", name, data.labels[i]);
                continue;
            }
            let y = group_top + slot as f64 * BAR_HEIGHT;
            svg.push_str(&format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.2}" height="{:.1}" fill="{}"><title>{}: {} ns</title></rect>"#,
                LABEL_MARGIN,
                y,
                (x_of(*value) - LABEL_MARGIN).max(1.0),
                BAR_HEIGHT,
                color,
                escape_xml(name),
                format_thousands(*value)
            ));
        }

        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="13" text-anchor="end" fill="{}">{}</text>"#,
            LABEL_MARGIN - 8.0,
            group_top + 1.5 * BAR_HEIGHT + 4.0,
            TEXT_COLOR,
            escape_xml(&data.labels[i])
        ));
    }

    // Axis title
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" font-size="14" text-anchor="middle" fill="{}">Average Latency (ns, log scale)</text>"#,
        LABEL_MARGIN + plot_width / 2.0,
        TITLE_MARGIN + plot_height + 42.0,
        TEXT_COLOR
    ));

    render_legend(
        &mut svg,
        LABEL_MARGIN,
        TITLE_MARGIN + plot_height + 70.0,
        &[
            ("MetaFFI", COLOR_GENERAL),
            ("Dedicated (native)", COLOR_DEDICATED),
            ("gRPC", COLOR_RPC),
        ],
    );

    svg.push_str("</svg>");

    info!("Pair figure rendered ({} bytes)", svg.len());
    Ok(svg)
}

/// Generate the complexity figure, one panel per metric
///
/// **Public** - main entry point for the complexity figure
///
/// # Errors
/// * `ChartError::EmptyData` - no panels or a panel without bars
/// * `ChartError::LengthMismatch` - a panel's series do not line up
pub fn render_complexity_chart(panels: &[MetricPanel]) -> Result<String, ChartError> {
    if panels.is_empty() {
        return Err(ChartError::EmptyData);
    }
    for panel in panels {
        panel.validate()?;
        if panel.values.is_empty() {
            return Err(ChartError::EmptyData);
        }
    }

    info!("Rendering complexity figure with {} panels", panels.len());

    let width = (PANEL_WIDTH * panels.len()) as f64;
    let height = PANEL_HEIGHT as f64;

    let mut svg = String::new();
    open_svg(&mut svg, width, height);

    for (i, panel) in panels.iter().enumerate() {
        render_panel(&mut svg, panel, (i * PANEL_WIDTH) as f64);
    }

    svg.push_str("</svg>");

    info!("Complexity figure rendered ({} bytes)", svg.len());
    Ok(svg)
}

/// **Private** - draw one metric panel at horizontal offset `x0`
fn render_panel(out: &mut String, panel: &MetricPanel, x0: f64) {
    let left = x0 + 50.0;
    let top = 50.0;
    let plot_width = PANEL_WIDTH as f64 - 80.0;
    let plot_height = PANEL_HEIGHT as f64 - 110.0;
    let bottom = top + plot_height;

    let axis_max = match panel.axis {
        AxisHint::Linear { max } => max,
        AxisHint::Log { max, .. } => max.unwrap_or(1.0),
    };
    let y_of = |value: f64| bottom - value / axis_max * plot_height;

    out.push_str(&format!(
        r#"<text x="{:.1}" y="30" font-size="14" text-anchor="middle" fill="{}">{}</text>"#,
        left + plot_width / 2.0,
        TEXT_COLOR,
        escape_xml(&panel.title)
    ));
    out.push_str(&format!(
        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" stroke="{}"/>"#,
        left, top, plot_width, plot_height, PANEL_COLOR, GRID_COLOR
    ));

    // Horizontal grid at fifths of the axis
    for step in 1..5 {
        let y = bottom - plot_height * step as f64 / 5.0;
        out.push_str(&format!(
            r#"<line x1="{:.1}" y1="{y:.2}" x2="{:.1}" y2="{y:.2}" stroke="{}" stroke-opacity="0.5"/>"#,
            left,
            left + plot_width,
            GRID_COLOR,
            y = y
        ));
    }

    let slot = plot_width / panel.values.len() as f64;
    let bar_width = slot * 0.6;

    for (i, ((value, label), annotation)) in panel
        .values
        .iter()
        .zip(&panel.labels)
        .zip(&panel.annotations)
        .enumerate()
    {
        let center = left + slot * (i as f64 + 0.5);
        let y = y_of(*value);
        let color = PANEL_COLORS[i % PANEL_COLORS.len()];

        out.push_str(&format!(
            r##"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" stroke="#555"/>"##,
            center - bar_width / 2.0,
            y,
            bar_width,
            bottom - y,
            color
        ));
        out.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-size="12" text-anchor="middle" fill="{}">{}</text>"#,
            center,
            y_of(*value + panel.annotation_offset) - 2.0,
            TEXT_COLOR,
            escape_xml(annotation)
        ));
        out.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-size="13" text-anchor="middle" fill="{}">{}</text>"#,
            center,
            bottom + 20.0,
            TEXT_COLOR,
            escape_xml(label)
        ));
    }
}

fn open_svg(out: &mut String, width: f64, height: f64) {
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" font-family="sans-serif">"#,
        w = width,
        h = height
    ));
}

fn render_legend(out: &mut String, x: f64, y: f64, items: &[(&str, &str)]) {
    for (i, (label, color)) in items.iter().enumerate() {
        let item_x = x + (i * 190) as f64;
        out.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="15" height="15" fill="{}" rx="2"/>"#,
            item_x,
            y - 12.0,
            color
        ));
        out.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="12" fill="{}">{}</text>"#,
            item_x + 20.0,
            y,
            TEXT_COLOR,
            label
        ));
    }
}

/// Whole decades enclosing `[min, max]` as log10 exponents
pub fn log_decades(min: f64, max: f64) -> (f64, f64) {
    let lo = min.log10().floor();
    let mut hi = max.log10().ceil();
    if hi <= lo {
        hi = lo + 1.0;
    }
    (lo, hi)
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn ansi_color(series: usize) -> &'static str {
    match series {
        0 => "\x1b[34m", // Blue
        1 => "\x1b[32m", // Green
        _ => "\x1b[31m", // Red
    }
}

/// Create a text comparison table of the pair summaries
pub fn generate_text_summary(summaries: &[PairSummary]) -> String {
    let reset = "\x1b[0m";
    let mut lines = Vec::new();

    lines.push("  CROSS-LANGUAGE CALL LATENCY (ns)".to_string());
    lines.push(format!(
        "  {:<24} {:>14} {:>24} {:>14}",
        "Pair", "MetaFFI", "Dedicated", "gRPC"
    ));
    lines.push(format!("  {}", "-".repeat(79)));

    let cell = |value: f64, measured: bool| {
        if measured {
            format_thousands(value)
        } else {
            "-".to_string()
        }
    };

    for s in summaries {
        let dedicated = format!(
            "{} ({})",
            cell(s.dedicated_ns, s.measured.dedicated),
            s.dedicated_name
        );
        lines.push(format!(
            "  {:<24} {}{:>14}{} {}{:>24}{} {}{:>14}{}",
            s.label,
            ansi_color(0),
            cell(s.general_ns, s.measured.general),
            reset,
            ansi_color(1),
            dedicated,
            reset,
            ansi_color(2),
            cell(s.rpc_ns, s.measured.rpc),
            reset
        ));
    }

    if summaries.is_empty() {
        lines.push("  (no pairs)".to_string());
    }

    lines.join("\n")
}
