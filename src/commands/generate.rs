//! Generate command implementation.
//!
//! Writes a synthetic sales CSV that `render` can load directly.

use super::models::GenerateArgs;
use crate::generator::{generate_sales_data, GeneratorConfig};
use crate::output::write_records_csv;
use crate::records::date_span;
use anyhow::{Context, Result};
use log::info;

const MAX_RECORDS: usize = 1_000_000;

/// Execute the generate command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// Number of records written
pub fn execute_generate(args: GenerateArgs) -> Result<usize> {
    let mut config = GeneratorConfig::new()
        .with_records(args.records)
        .with_seed(args.seed);
    if let Some(end_date) = args.end_date {
        config = config.with_end_date(end_date);
    }

    let records = generate_sales_data(&config);
    let count = write_records_csv(&records, &args.output).context("Failed to write sample data")?;

    info!("✓ Sample data written to: {}", args.output.display());
    println!("Records generated: {}", count);
    if let Some(span) = date_span(&records) {
        println!("Date range: {} to {}", span.start, span.end);
    }

    Ok(count)
}

/// Validate generate arguments
pub fn validate_generate_args(args: &GenerateArgs) -> Result<()> {
    if args.records == 0 {
        anyhow::bail!("records must be greater than 0");
    }

    if args.records > MAX_RECORDS {
        anyhow::bail!("records is too large (max {})", MAX_RECORDS);
    }

    if args.output.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_generate_args() {
        assert!(validate_generate_args(&GenerateArgs::default()).is_ok());

        let zero = GenerateArgs {
            records: 0,
            ..Default::default()
        };
        assert!(validate_generate_args(&zero).is_err());

        let huge = GenerateArgs {
            records: MAX_RECORDS + 1,
            ..Default::default()
        };
        assert!(validate_generate_args(&huge).is_err());
    }
}
