//! Render command implementation.
//!
//! The render command:
//! 1. Loads the dashboard configuration
//! 2. Loads the sales CSV into the record store
//! 3. Refreshes the dashboard for the requested selection
//! 4. Writes the JSON dashboard
//! 5. Writes optional SVG, HTML and CSV outputs

use super::models::RenderArgs;
use crate::dashboard::{refresh, Dashboard};
use crate::filter;
use crate::output::{
    render_text_summary, write_chart_svgs, write_dashboard, write_html, write_records_csv,
    SvgConfig,
};
use crate::records::RecordStore;
use crate::utils::config::{load_config, DashboardConfig, MAX_TOP_N};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

const CHART_WIDTH_RANGE: std::ops::RangeInclusive<usize> = 200..=4000;
const CHART_HEIGHT_RANGE: std::ops::RangeInclusive<usize> = 100..=4000;

/// Execute the render command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The dashboard that was written
///
/// # Errors
/// * Configuration or CSV load failures
/// * Invalid date range
/// * File write errors
pub fn execute_render(args: RenderArgs) -> Result<Dashboard> {
    let start_time = Instant::now();

    info!("Rendering dashboard from: {}", args.data_path.display());

    // Step 1: Configuration
    info!("Step 1/5: Loading configuration...");
    let mut config = match &args.config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    args.apply_overrides(&mut config);
    validate_config(&config)?;
    debug!("Effective configuration: {:?}", config);

    // Step 2: Records
    info!("Step 2/5: Loading sales data...");
    let (store, report) = RecordStore::load_csv(&args.data_path, config.ingest.policy)
        .with_context(|| format!("Failed to load sales data {}", args.data_path.display()))?;

    if report.rejected() > 0 {
        warn!(
            "{} of {} rows were skipped as invalid",
            report.rejected(),
            report.rows_read
        );
    }

    // Step 3: Refresh
    info!("Step 3/5: Filtering and aggregating...");
    let selection = args.selection(store.date_span());
    let dashboard = refresh(&store, &selection, &config).context("Invalid filter selection")?;

    if let Some(notice) = &dashboard.notice {
        warn!("{}", notice);
    }

    // Step 4: JSON
    info!("Step 4/5: Writing dashboard JSON...");
    write_dashboard(&dashboard, &args.output_json).context("Failed to write dashboard JSON")?;
    info!("✓ Dashboard written to: {}", args.output_json.display());

    // Step 5: Optional outputs
    info!("Step 5/5: Writing additional outputs...");
    let svg_config = SvgConfig::new().with_size(config.chart.width, config.chart.height);

    if let Some(dir) = &args.svg_dir {
        let written = write_chart_svgs(&dashboard, dir, &svg_config)
            .context("Failed to write chart SVGs")?;
        info!("✓ {} charts written to: {}", written.len(), dir.display());
    }

    if let Some(path) = &args.output_html {
        write_html(&dashboard, path, &svg_config).context("Failed to write HTML dashboard")?;
        info!("✓ HTML dashboard written to: {}", path.display());
    }

    if let Some(path) = &args.export_csv {
        let view = filter::apply(store.records(), &selection)?;
        let count = write_records_csv(view, path).context("Failed to export filtered records")?;
        info!("✓ {} filtered records exported to: {}", count, path.display());
    }

    if args.print_summary {
        println!("{}", render_text_summary(&dashboard));
    }

    let elapsed = start_time.elapsed();
    info!("Render completed in {:.2}s", elapsed.as_secs_f64());

    Ok(dashboard)
}

/// Validate render arguments
///
/// **Public** - can be called before execute_render for early validation
pub fn validate_args(args: &RenderArgs) -> Result<()> {
    if args.data_path.as_os_str().is_empty() {
        anyhow::bail!("Data path cannot be empty");
    }

    if let Some(top_n) = args.top_n {
        if top_n == 0 {
            anyhow::bail!("top_n must be greater than 0");
        }
        if top_n > MAX_TOP_N {
            anyhow::bail!("top_n is too large (max {})", MAX_TOP_N);
        }
    }

    if let (Some(from), Some(to)) = (args.from, args.to) {
        if from > to {
            anyhow::bail!("--from {} is after --to {}", from, to);
        }
    }

    Ok(())
}

/// Validate merged configuration values
///
/// **Private** - internal helper for execute_render
fn validate_config(config: &DashboardConfig) -> Result<()> {
    let settings = &config.aggregation;

    if settings.top_n == 0 || settings.top_n > MAX_TOP_N {
        anyhow::bail!("top_n must be between 1 and {}", MAX_TOP_N);
    }

    if settings.frequency_limit == 0 {
        anyhow::bail!("frequency_limit must be greater than 0");
    }

    if !CHART_WIDTH_RANGE.contains(&config.chart.width) {
        anyhow::bail!(
            "chart width {} is outside {}..={}",
            config.chart.width,
            CHART_WIDTH_RANGE.start(),
            CHART_WIDTH_RANGE.end()
        );
    }

    if !CHART_HEIGHT_RANGE.contains(&config.chart.height) {
        anyhow::bail!(
            "chart height {} is outside {}..={}",
            config.chart.height,
            CHART_HEIGHT_RANGE.start(),
            CHART_HEIGHT_RANGE.end()
        );
    }

    Ok(())
}
