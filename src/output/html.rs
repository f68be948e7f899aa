//! Static HTML dashboard page.
//!
//! Every chart is embedded as inline SVG, so the page has no external
//! assets and opens directly from disk.

use super::svg::{render_chart_svg, SvgConfig};
use super::{escape_xml, prepare_output_path};
use crate::dashboard::Dashboard;
use crate::presentation::ChartSpec;
use crate::utils::error::OutputError;
use log::info;
use std::fs;
use std::path::Path;

const PAGE_STYLE: &str = r#"
body { font-family: sans-serif; margin: 0 auto; max-width: 1280px; padding: 1rem 2rem; color: #222; }
h1 { text-align: center; color: #1f77b4; }
h2 { border-bottom: 1px solid #eee; padding-bottom: 0.3rem; }
.meta { text-align: center; color: #666; }
.notice { background: #fff3cd; border: 1px solid #ffe69c; padding: 0.8rem; border-radius: 6px; }
.cards { display: flex; flex-wrap: wrap; gap: 1rem; }
.charts { display: flex; flex-wrap: wrap; gap: 1rem; }
footer { text-align: center; color: #666; padding: 1rem; border-top: 1px solid #eee; margin-top: 2rem; }
"#;

/// Render the dashboard as a self-contained HTML page
///
/// **Public** - main entry point for HTML output
pub fn render_html(dashboard: &Dashboard, config: &SvgConfig) -> String {
    let mut page = String::new();

    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str("<title>Sales Analytics Dashboard</title>\n");
    page.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", PAGE_STYLE));
    page.push_str("<h1>Sales Analytics Dashboard</h1>\n");
    page.push_str(&format!(
        "<p class=\"meta\">Generated {} | {} of {} records selected</p>\n",
        escape_xml(&dashboard.generated_at),
        dashboard.filtered_records,
        dashboard.total_records
    ));

    if let Some(notice) = &dashboard.notice {
        page.push_str(&format!(
            "<div class=\"notice\">{}</div>\n",
            escape_xml(notice)
        ));
    }

    for panel in &dashboard.panels {
        let class = if panel.charts.iter().all(|c| matches!(c, ChartSpec::ScalarCard(_))) {
            "cards"
        } else {
            "charts"
        };

        page.push_str(&format!(
            "<section id=\"{}\">\n<h2>{}</h2>\n<div class=\"{}\">\n",
            escape_xml(&panel.id),
            escape_xml(&panel.title),
            class
        ));
        for chart in &panel.charts {
            page.push_str(&render_chart_svg(chart, config));
            page.push('\n');
        }
        page.push_str("</div>\n</section>\n");
    }

    page.push_str("<footer>\n<p>Sales Analytics Dashboard</p>\n");
    if let Some(span) = &dashboard.date_span {
        page.push_str(&format!(
            "<p>Data range: {} to {} | Total records: {}</p>\n",
            span.start,
            span.end,
            dashboard.filtered_records
        ));
    }
    page.push_str("</footer>\n</body>\n</html>\n");

    page
}

/// Render and write the HTML page
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is invalid
pub fn write_html(
    dashboard: &Dashboard,
    output_path: impl AsRef<Path>,
    config: &SvgConfig,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    info!("Writing HTML dashboard to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let page = render_html(dashboard, config);
    fs::write(output_path, &page).map_err(OutputError::WriteFailed)?;

    info!("HTML dashboard written ({} bytes)", page.len());
    Ok(())
}
