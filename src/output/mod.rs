//! Output writers for dashboards and their charts.
//!
//! This module handles writing data to disk in various formats:
//! - JSON dashboards (pretty)
//! - SVG charts, one file per chart
//! - A static HTML page embedding every chart
//! - CSV export of the filtered records
//! - Text summaries for the terminal

pub mod csv_export;
pub mod html;
pub mod json;
pub mod summary;
pub mod svg;

// Re-export main functions
pub use csv_export::write_records_csv;
pub use html::{render_html, write_html};
pub use json::{read_dashboard, write_dashboard};
pub use summary::render_text_summary;
pub use svg::{render_chart_svg, write_chart_svgs, write_svg, SvgConfig};

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Validate the path and create missing parent directories
///
/// **Private** - shared by every writer in this module
pub(crate) fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    validate_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

/// Escape text for embedding in SVG or HTML
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
