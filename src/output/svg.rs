//! SVG chart rendering and output.
//!
//! Charts are drawn by hand from their `ChartSpec`:
//! - Line charts as polylines with a legend
//! - Bar charts as rects, optionally shaded by a second measure
//! - Heatmaps as a grid of shaded cells
//! - Scalar cards and tables as plain text blocks

use super::{escape_xml, prepare_output_path};
use crate::dashboard::Dashboard;
use crate::presentation::{
    group_thousands, BarChart, ChartSpec, Heatmap, LineChart, Orientation, ScalarCard, TableSpec,
};
use crate::utils::config::{DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH};
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const PALETTE: &[&str] = &["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd"];

/// Light and dark ends of the sequential colour scale
const SCALE_LOW: (f64, f64, f64) = (222.0, 235.0, 247.0);
const SCALE_HIGH: (f64, f64, f64) = (8.0, 48.0, 107.0);

const TITLE_HEIGHT: f64 = 40.0;
const AXIS_HEIGHT: f64 = 50.0;
const RIGHT_MARGIN: f64 = 20.0;
const MAX_X_LABELS: usize = 12;
const TABLE_ROW_HEIGHT: f64 = 24.0;

/// SVG rendering configuration
#[derive(Debug, Clone)]
pub struct SvgConfig {
    pub width: usize,
    pub height: usize,
    pub card_width: usize,
    pub card_height: usize,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
            card_width: 260,
            card_height: 120,
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Drawable region inside the chart frame
struct PlotArea {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl PlotArea {
    fn new(config: &SvgConfig, left_margin: f64) -> Self {
        Self {
            left: left_margin,
            top: TITLE_HEIGHT,
            width: (config.width as f64 - left_margin - RIGHT_MARGIN).max(1.0),
            height: (config.height as f64 - TITLE_HEIGHT - AXIS_HEIGHT).max(1.0),
        }
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn y_of(&self, value: f64, lo: f64, hi: f64) -> f64 {
        self.top + self.height * (1.0 - (value - lo) / (hi - lo))
    }

    fn x_of(&self, value: f64, lo: f64, hi: f64) -> f64 {
        self.left + self.width * (value - lo) / (hi - lo)
    }
}

/// Render one chart to a standalone SVG document
///
/// **Public** - main entry point for SVG rendering
///
/// Empty charts still get a frame and title, with a "No data" message.
pub fn render_chart_svg(chart: &ChartSpec, config: &SvgConfig) -> String {
    let (width, height) = frame_size(chart, config);
    let mut out = String::new();

    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        width, height, width, height
    ));
    out.push_str(
        r#"<style>text { font-family: sans-serif; } .label { font-size: 11px; fill: #444; } .bar:hover, .cell:hover { opacity: 0.8; }</style>"#,
    );
    out.push_str(&format!(
        r#"<rect x="0" y="0" width="{}" height="{}" fill="white"/>"#,
        width, height
    ));

    if !matches!(chart, ChartSpec::ScalarCard(_)) {
        out.push_str(&format!(
            r#"<text x="{}" y="24" font-size="16" text-anchor="middle" font-weight="bold">{}</text>"#,
            width / 2,
            escape_xml(chart.title())
        ));
    }

    if chart.is_empty() {
        out.push_str(&format!(
            r##"<text x="{}" y="{}" font-size="14" text-anchor="middle" fill="#888">No data</text>"##,
            width / 2,
            height / 2
        ));
    } else {
        match chart {
            ChartSpec::Line(line) => render_line(line, config, &mut out),
            ChartSpec::Bar(bar) => match bar.orientation {
                Orientation::Vertical => render_vertical_bar(bar, config, &mut out),
                Orientation::Horizontal => render_horizontal_bar(bar, config, &mut out),
            },
            ChartSpec::Heatmap(heatmap) => render_heatmap(heatmap, config, &mut out),
            ChartSpec::ScalarCard(card) => render_card(card, config, &mut out),
            ChartSpec::Table(table) => render_table(table, config, &mut out),
        }
    }

    out.push_str("</svg>");
    out
}

/// Outer size of the SVG for a chart
///
/// **Private** - cards and tables size to their content
fn frame_size(chart: &ChartSpec, config: &SvgConfig) -> (usize, usize) {
    match chart {
        ChartSpec::ScalarCard(_) => (config.card_width, config.card_height),
        ChartSpec::Table(table) if !table.rows.is_empty() => {
            let rows = table.rows.len() + 1;
            let height = TITLE_HEIGHT + rows as f64 * TABLE_ROW_HEIGHT + 10.0;
            (config.width, height.ceil() as usize)
        }
        _ => (config.width, config.height),
    }
}

/// Value range for an axis, always including zero
fn axis_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, mut hi) = values
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if hi - lo < f64::EPSILON {
        hi = lo + 1.0;
    }
    (lo, hi)
}

/// Interpolate the sequential scale, `t` in [0, 1]
fn scale_color(t: f64) -> String {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let mix = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        mix(SCALE_LOW.0, SCALE_HIGH.0),
        mix(SCALE_LOW.1, SCALE_HIGH.1),
        mix(SCALE_LOW.2, SCALE_HIGH.2)
    )
}

/// Position of `value` between the min and max of `values`
fn normalise(value: f64, values: &[f64]) -> f64 {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if hi - lo < f64::EPSILON {
        1.0
    } else {
        (value - lo) / (hi - lo)
    }
}

fn render_y_axis(out: &mut String, plot: &PlotArea, lo: f64, hi: f64, label: &str) {
    out.push_str(&format!(
        r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#999"/>"##,
        plot.left,
        plot.top,
        plot.left,
        plot.bottom()
    ));

    for i in 0..=4 {
        let value = lo + (hi - lo) * i as f64 / 4.0;
        let y = plot.y_of(value, lo, hi);
        out.push_str(&format!(
            r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#eee"/>"##,
            plot.left,
            y,
            plot.left + plot.width,
            y
        ));
        out.push_str(&format!(
            r#"<text class="label" x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
            plot.left - 6.0,
            y + 4.0,
            group_thousands(value, 0)
        ));
    }

    out.push_str(&format!(
        r#"<text class="label" x="14" y="{:.1}" text-anchor="middle" transform="rotate(-90 14 {:.1})">{}</text>"#,
        plot.top + plot.height / 2.0,
        plot.top + plot.height / 2.0,
        escape_xml(label)
    ));
}

fn render_x_label(out: &mut String, plot: &PlotArea, x: f64, text: &str) {
    out.push_str(&format!(
        r#"<text class="label" x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
        x,
        plot.bottom() + 16.0,
        escape_xml(text)
    ));
}

fn render_line(chart: &LineChart, config: &SvgConfig, out: &mut String) {
    let plot = PlotArea::new(config, 80.0);
    let (lo, hi) = axis_range(chart.series.iter().flat_map(|s| s.values.iter().copied()));
    render_y_axis(out, &plot, lo, hi, &chart.y_label);

    let n = chart.x.len();
    let x_at = |i: usize| {
        if n <= 1 {
            plot.left + plot.width / 2.0
        } else {
            plot.left + plot.width * i as f64 / (n - 1) as f64
        }
    };

    for (index, series) in chart.series.iter().enumerate() {
        let color = PALETTE[index % PALETTE.len()];
        let points: Vec<String> = series
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{:.1},{:.1}", x_at(i), plot.y_of(*v, lo, hi)))
            .collect();

        out.push_str(&format!(
            r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
            color,
            points.join(" ")
        ));

        // Legend
        let legend_x = plot.left + 10.0 + index as f64 * 140.0;
        out.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="12" height="12" fill="{}"/>"#,
            legend_x,
            plot.top + 4.0,
            color
        ));
        out.push_str(&format!(
            r#"<text class="label" x="{:.1}" y="{:.1}">{}</text>"#,
            legend_x + 16.0,
            plot.top + 14.0,
            escape_xml(&series.name)
        ));
    }

    let step = ((n + MAX_X_LABELS - 1) / MAX_X_LABELS).max(1);
    for (i, label) in chart.x.iter().enumerate().step_by(step) {
        render_x_label(out, &plot, x_at(i), label);
    }
}

fn bar_fills(chart: &BarChart) -> Vec<String> {
    match &chart.color {
        Some(series) => series
            .values
            .iter()
            .map(|v| scale_color(0.25 + 0.75 * normalise(*v, &series.values)))
            .collect(),
        None => vec![PALETTE[0].to_string(); chart.values.len()],
    }
}

fn render_vertical_bar(chart: &BarChart, config: &SvgConfig, out: &mut String) {
    let plot = PlotArea::new(config, 80.0);
    let (lo, hi) = axis_range(chart.values.iter().copied());
    render_y_axis(out, &plot, lo, hi, &chart.value_label);

    let fills = bar_fills(chart);
    let band = plot.width / chart.categories.len() as f64;
    let bar_width = band * 0.7;
    let zero_y = plot.y_of(0.0, lo, hi);

    for (i, (label, value)) in chart.categories.iter().zip(&chart.values).enumerate() {
        let x = plot.left + band * i as f64 + (band - bar_width) / 2.0;
        let y = plot.y_of(*value, lo, hi);
        let (top, height) = if y < zero_y { (y, zero_y - y) } else { (zero_y, y - zero_y) };
        let fill = fills.get(i).map(String::as_str).unwrap_or(PALETTE[0]);

        out.push_str(&format!(
            r#"<rect class="bar" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"><title>{}: {}</title></rect>"#,
            x,
            top,
            bar_width,
            height,
            fill,
            escape_xml(label),
            group_thousands(*value, 2)
        ));
        render_x_label(out, &plot, x + bar_width / 2.0, label);
    }
}

fn render_horizontal_bar(chart: &BarChart, config: &SvgConfig, out: &mut String) {
    let plot = PlotArea::new(config, 160.0);
    let (lo, hi) = axis_range(chart.values.iter().copied());

    let fills = bar_fills(chart);
    let band = plot.height / chart.categories.len() as f64;
    let bar_height = band * 0.7;
    let zero_x = plot.x_of(0.0, lo, hi);

    for i in 0..=4 {
        let value = lo + (hi - lo) * i as f64 / 4.0;
        render_x_label(out, &plot, plot.x_of(value, lo, hi), &group_thousands(value, 0));
    }

    for (i, (label, value)) in chart.categories.iter().zip(&chart.values).enumerate() {
        let y = plot.top + band * i as f64 + (band - bar_height) / 2.0;
        let x = plot.x_of(*value, lo, hi);
        let (left, width) = if x < zero_x { (x, zero_x - x) } else { (zero_x, x - zero_x) };
        let fill = fills.get(i).map(String::as_str).unwrap_or(PALETTE[0]);

        out.push_str(&format!(
            r#"<rect class="bar" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"><title>{}: {}</title></rect>"#,
            left,
            y,
            width,
            bar_height,
            fill,
            escape_xml(label),
            group_thousands(*value, 2)
        ));
        out.push_str(&format!(
            r#"<text class="label" x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
            plot.left - 6.0,
            y + bar_height / 2.0 + 4.0,
            escape_xml(label)
        ));
    }

    out.push_str(&format!(
        r#"<text class="label" x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
        plot.left + plot.width / 2.0,
        plot.bottom() + 36.0,
        escape_xml(&chart.value_label)
    ));
}

fn render_heatmap(chart: &Heatmap, config: &SvgConfig, out: &mut String) {
    let plot = PlotArea::new(config, 120.0);
    let cell_width = plot.width / chart.x_labels.len() as f64;
    let cell_height = plot.height / chart.y_labels.len() as f64;
    let max = chart
        .z
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, |m, v| m.max(v.abs()));

    for (row, y_label) in chart.y_labels.iter().enumerate() {
        let y = plot.top + cell_height * row as f64;

        for (col, x_label) in chart.x_labels.iter().enumerate() {
            let value = chart.z.get(row).and_then(|r| r.get(col)).copied().unwrap_or(0.0);
            let t = if max > 0.0 { value.abs() / max } else { 0.0 };
            let x = plot.left + cell_width * col as f64;

            out.push_str(&format!(
                r#"<rect class="cell" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" stroke="white"><title>{} / {}: {}</title></rect>"#,
                x,
                y,
                cell_width,
                cell_height,
                scale_color(t),
                escape_xml(y_label),
                escape_xml(x_label),
                group_thousands(value, 2)
            ));
            out.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="middle" fill="{}">{}</text>"#,
                x + cell_width / 2.0,
                y + cell_height / 2.0 + 4.0,
                if t > 0.5 { "white" } else { "black" },
                group_thousands(value, 0)
            ));
        }

        out.push_str(&format!(
            r#"<text class="label" x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
            plot.left - 6.0,
            y + cell_height / 2.0 + 4.0,
            escape_xml(y_label)
        ));
    }

    for (col, x_label) in chart.x_labels.iter().enumerate() {
        render_x_label(out, &plot, plot.left + cell_width * (col as f64 + 0.5), x_label);
    }
}

fn render_card(card: &ScalarCard, config: &SvgConfig, out: &mut String) {
    let width = config.card_width;
    let height = config.card_height;
    let center = width / 2;

    out.push_str(&format!(
        r##"<rect x="1" y="1" width="{}" height="{}" rx="8" fill="#f0f2f6" stroke="#ddd"/>"##,
        width.saturating_sub(2),
        height.saturating_sub(2)
    ));
    out.push_str(&format!(
        r##"<text x="{}" y="30" font-size="14" text-anchor="middle" fill="#555">{}</text>"##,
        center,
        escape_xml(&card.title)
    ));
    out.push_str(&format!(
        r#"<text x="{}" y="{}" font-size="28" text-anchor="middle" font-weight="bold">{}</text>"#,
        center,
        height / 2 + 10,
        escape_xml(&card.display_value())
    ));

    if let Some(delta) = &card.delta {
        out.push_str(&format!(
            r##"<text x="{}" y="{}" font-size="12" text-anchor="middle" fill="#2ca02c">{}</text>"##,
            center,
            height.saturating_sub(18),
            escape_xml(delta)
        ));
    }
}

fn render_table(table: &TableSpec, config: &SvgConfig, out: &mut String) {
    let columns = table.columns.len().max(1);
    let col_width = config.width as f64 / columns as f64;

    out.push_str(&format!(
        r##"<rect x="0" y="{:.1}" width="{}" height="{:.1}" fill="#f0f2f6"/>"##,
        TITLE_HEIGHT,
        config.width,
        TABLE_ROW_HEIGHT
    ));

    for (col, name) in table.columns.iter().enumerate() {
        out.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="12" font-weight="bold">{}</text>"#,
            col_width * col as f64 + 6.0,
            TITLE_HEIGHT + 16.0,
            escape_xml(name)
        ));
    }

    for (row, cells) in table.rows.iter().enumerate() {
        let y = TITLE_HEIGHT + TABLE_ROW_HEIGHT * (row as f64 + 1.0);
        for (col, cell) in cells.iter().enumerate() {
            out.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
                col_width * col as f64 + 6.0,
                y + 16.0,
                escape_xml(&cell.display())
            ));
        }
    }
}

/// Write SVG content to a file
///
/// **Public** - main entry point for SVG output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is invalid
pub fn write_svg(svg_content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    debug!("Writing SVG to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(svg_content.as_bytes())
        .map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    debug!(
        "SVG written ({} bytes, {:.2} KB)",
        svg_content.len(),
        svg_content.len() as f64 / 1024.0
    );

    Ok(())
}

/// Render every chart of a dashboard into `dir`, one file per chart
///
/// **Public** - used by the render command
///
/// # Returns
/// Paths written, in panel order. File names are numbered so a directory
/// listing keeps the dashboard order.
pub fn write_chart_svgs(
    dashboard: &Dashboard,
    dir: impl AsRef<Path>,
    config: &SvgConfig,
) -> Result<Vec<PathBuf>, OutputError> {
    let dir = dir.as_ref();
    info!("Writing chart SVGs to: {}", dir.display());

    let mut written = Vec::new();
    for (index, chart) in dashboard.charts().enumerate() {
        let path = dir.join(format!("{:02}-{}.svg", index + 1, slugify(chart.title())));
        write_svg(&render_chart_svg(chart, config), &path)?;
        written.push(path);
    }

    info!("{} chart SVGs written", written.len());
    Ok(written)
}

/// Lowercase, dash-separated file stem
fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
