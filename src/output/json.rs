//! JSON dashboard output writer.
//!
//! Writes Dashboard structs to JSON files with proper formatting.

use super::prepare_output_path;
use crate::dashboard::Dashboard;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write a dashboard to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `dashboard` - Dashboard to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let dashboard = refresh(&store, &selection, &config)?;
/// write_dashboard(&dashboard, "artifacts/dashboard.json")?;
/// ```
pub fn write_dashboard(
    dashboard: &Dashboard,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing dashboard to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, dashboard).map_err(OutputError::SerializationFailed)?;

    info!(
        "Dashboard written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a dashboard from a JSON file
///
/// **Public** - used by the validate command and tests
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_dashboard(input_path: impl AsRef<Path>) -> Result<Dashboard, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading dashboard from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;

    let dashboard: Dashboard =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Dashboard loaded: version {}, {} panels, {} records",
        dashboard.version,
        dashboard.panels.len(),
        dashboard.filtered_records
    );

    Ok(dashboard)
}
