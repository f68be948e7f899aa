//! CSV export of filtered records.
//!
//! Uses the input column layout so an export can be loaded again.

use super::prepare_output_path;
use crate::records::{CsvRow, TransactionRecord};
use crate::utils::error::OutputError;
use csv::Writer;
use log::info;
use std::path::Path;

/// Write records to a CSV file with a header row
///
/// **Public** - main entry point for CSV export
///
/// # Returns
/// Number of data rows written
///
/// # Errors
/// * `OutputError::CsvFailed` - Serialization or write error
/// * `OutputError::InvalidPath` - Path is invalid
pub fn write_records_csv<'a>(
    records: impl IntoIterator<Item = &'a TransactionRecord>,
    output_path: impl AsRef<Path>,
) -> Result<usize, OutputError> {
    let output_path = output_path.as_ref();
    info!("Exporting records to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let mut writer = Writer::from_path(output_path)?;
    let mut count = 0;

    for record in records {
        writer.serialize(CsvRow::from(record))?;
        count += 1;
    }

    writer.flush().map_err(OutputError::WriteFailed)?;

    info!("Exported {} records", count);
    Ok(count)
}
