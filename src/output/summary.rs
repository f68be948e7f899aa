//! Terminal rendering of a dashboard.
//!
//! Gives a compact, human-readable view of every panel with colour cues for
//! the margin health flag and the empty-selection notice.

use crate::dashboard::{Dashboard, Panel};
use crate::presentation::{group_thousands, ChartSpec};
use colored::*;

const RULE: &str = "---------------------------------------------------";
const MAX_LIST_ROWS: usize = 10;

/// Render a human-readable summary of a dashboard for the terminal
pub fn render_text_summary(dashboard: &Dashboard) -> String {
    let mut out = String::new();

    out.push_str(&render_header(dashboard));

    if let Some(notice) = &dashboard.notice {
        out.push_str(&format!("{} {}\n", "⚠".yellow(), notice.yellow()));
        return out;
    }

    for panel in &dashboard.panels {
        out.push_str(&render_panel(panel));
    }

    out
}

fn render_header(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    out.push_str("\n📊 ");
    out.push_str(&"Sales Analytics Dashboard".bold().to_string());
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!(
        "Records:    {} of {}\n",
        dashboard.filtered_records, dashboard.total_records
    ));
    if let Some(span) = &dashboard.date_span {
        out.push_str(&format!("Data range: {} to {}\n", span.start, span.end));
    }
    out.push_str(RULE);
    out.push_str("\n\n");
    out
}

fn render_panel(panel: &Panel) -> String {
    let mut out = format!("{}\n", panel.title.bold());
    for chart in &panel.charts {
        out.push_str(&render_chart(chart));
    }
    out.push('\n');
    out
}

fn render_chart(chart: &ChartSpec) -> String {
    match chart {
        ChartSpec::ScalarCard(card) => {
            let delta = card.delta.as_deref().unwrap_or("");
            let delta = match delta {
                "Healthy" => delta.green().to_string(),
                "Needs attention" => delta.red().to_string(),
                other => other.dimmed().to_string(),
            };
            format!("  {:<22} {:>16}  {}\n", card.title, card.display_value(), delta)
        }
        ChartSpec::Line(line) => {
            let mut out = format!("  {} ({} points)\n", line.title, line.x.len());
            for series in &line.series {
                let total: f64 = series.values.iter().sum();
                out.push_str(&format!(
                    "    {:<20} total {}\n",
                    series.name,
                    group_thousands(total, 2)
                ));
            }
            out
        }
        ChartSpec::Bar(bar) => {
            let mut out = format!("  {}\n", bar.title);
            for (i, (label, value)) in bar
                .categories
                .iter()
                .zip(&bar.values)
                .take(MAX_LIST_ROWS)
                .enumerate()
            {
                out.push_str(&format!(
                    "    {:>2}. {:<20} {:>14}\n",
                    i + 1,
                    label,
                    group_thousands(*value, 2)
                ));
            }
            out
        }
        ChartSpec::Heatmap(heatmap) => {
            let mut out = format!("  {}\n", heatmap.title);
            out.push_str(&format!("    {:<12}", ""));
            for label in &heatmap.x_labels {
                out.push_str(&format!(" {:>14}", label));
            }
            out.push('\n');
            for (label, row) in heatmap.y_labels.iter().zip(&heatmap.z) {
                out.push_str(&format!("    {:<12}", label));
                for value in row {
                    out.push_str(&format!(" {:>14}", group_thousands(*value, 0)));
                }
                out.push('\n');
            }
            out
        }
        ChartSpec::Table(table) => {
            let mut out = format!("  {}\n", table.title);
            out.push_str(&format!("    {}\n", table.columns.join(" | ").dimmed()));
            for row in &table.rows {
                let cells: Vec<String> = row.iter().map(|c| c.display()).collect();
                out.push_str(&format!("    {}\n", cells.join(" | ")));
            }
            out
        }
    }
}
