use crate::output::read_dashboard;
use crate::records::{IngestPolicy, RecordStore};
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a dashboard JSON file
pub fn validate_dashboard_file(file_path: PathBuf) -> Result<()> {
    println!("Validating dashboard: {}", file_path.display());

    let dashboard = read_dashboard(&file_path)?;

    if dashboard.version != SCHEMA_VERSION {
        println!(
            "⚠ Schema version {} differs from current {}",
            dashboard.version, SCHEMA_VERSION
        );
    }

    println!("✓ Valid dashboard JSON");
    println!("  Version: {}", dashboard.version);
    println!("  Generated: {}", dashboard.generated_at);
    println!(
        "  Records: {} of {}",
        dashboard.filtered_records, dashboard.total_records
    );
    println!("  Panels: {}", dashboard.panels.len());
    println!("  Charts: {}", dashboard.charts().count());
    if let Some(notice) = &dashboard.notice {
        println!("  Notice: {}", notice);
    }

    Ok(())
}

/// Print the values each filter can take
pub fn display_options(data_path: PathBuf) -> Result<()> {
    let (store, report) = RecordStore::load_csv(&data_path, IngestPolicy::Skip)
        .with_context(|| format!("Failed to load sales data {}", data_path.display()))?;
    let options = store.filter_options();

    println!("Filter options for: {}", data_path.display());
    println!("  Records: {} ({} rows skipped)", store.len(), report.rejected());
    if let Some(span) = options.date_span {
        println!("  Date range: {} to {}", span.start, span.end);
    }
    println!("  Categories: {}", options.categories.join(", "));
    println!("  Regions: {}", options.regions.join(", "));
    println!("  Segments: {}", options.segments.join(", "));
    println!("  Products: {}", options.products.len());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Sales Analytics Dashboard Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string     - RFC 3339 timestamp");
        println!("  filter: object           - Selection the panels were computed for");
        println!("    date_range: object?    - Inclusive start/end dates");
        println!("    categories: array      - Selected categories (empty = all)");
        println!("    regions: array         - Selected regions (empty = all)");
        println!("    segments: array        - Selected customer segments (empty = all)");
        println!("    products: array        - Selected products (empty = all)");
        println!("  total_records: number    - Records in the source file");
        println!("  filtered_records: number - Records that passed the filter");
        println!("  date_span: object?       - Date span of the filtered records");
        println!("  notice: string?          - Message for an empty selection");
        println!("  panels: array            - Dashboard sections");
        println!("    id: string             - Stable panel identifier");
        println!("    title: string          - Section heading");
        println!("    charts: array          - Chart specs tagged by `kind`:");
        println!("                             line | bar | heatmap | scalar-card | table");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Sales Analytics Dashboard v{}", env!("CARGO_PKG_VERSION"));
    println!("Dashboard Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Filter, aggregate and chart transactional sales data from CSV.");
}
