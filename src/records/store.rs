//! In-memory record store and CSV ingestion.
//!
//! The store is loaded once and never mutated afterwards; every refresh
//! borrows from it.

use super::schema::{CsvRow, DateRange, TransactionRecord};
use crate::utils::error::IngestError;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// How invalid rows are treated during load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IngestPolicy {
    /// Log and drop the row
    #[default]
    Skip,

    /// Fail the whole load on the first bad row
    Strict,
}

/// A row that was dropped during load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejection {
    /// 1-based line number in the source file (header is line 1)
    pub line: u64,
    pub reason: String,
}

/// Outcome counters for one load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub accepted: usize,
    pub rejections: Vec<RowRejection>,
}

impl LoadReport {
    pub fn rejected(&self) -> usize {
        self.rejections.len()
    }
}

/// Distinct filterable values present in the store, sorted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub date_span: Option<DateRange>,
    pub categories: Vec<String>,
    pub regions: Vec<String>,
    pub segments: Vec<String>,
    pub products: Vec<String>,
}

/// Immutable table of transaction records
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<TransactionRecord>,
}

impl RecordStore {
    pub fn from_records(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }

    /// Load records from a CSV file
    ///
    /// **Public** - main entry point for ingestion
    ///
    /// # Errors
    /// * `IngestError::Io` - File cannot be opened
    /// * `IngestError::Csv` - Header or framing is unreadable
    /// * `IngestError::InvalidRow` - Bad row under `IngestPolicy::Strict`
    /// * `IngestError::NoValidRows` - Every row was rejected
    pub fn load_csv(
        path: impl AsRef<Path>,
        policy: IngestPolicy,
    ) -> Result<(Self, LoadReport), IngestError> {
        let path = path.as_ref();
        info!("Loading sales data from: {}", path.display());

        let file = File::open(path)?;
        Self::from_reader(file, policy)
    }

    /// Load records from any CSV source with a header row
    pub fn from_reader<R: Read>(
        reader: R,
        policy: IngestPolicy,
    ) -> Result<(Self, LoadReport), IngestError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        debug!("CSV headers: {:?}", headers);

        let mut records = Vec::new();
        let mut report = LoadReport::default();

        for result in csv_reader.byte_records() {
            report.rows_read += 1;

            let (line, parsed) = match result {
                Ok(raw) => {
                    let line = raw.position().map(|p| p.line()).unwrap_or(0);
                    let parsed = StringRecord::from_byte_record(raw)
                        .map_err(|e| format!("{}", e.utf8_error()))
                        .and_then(|raw| parse_row(&raw, &headers));
                    (line, parsed)
                }
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or(0);
                    (line, Err(format!("malformed row: {}", e)))
                }
            };

            match parsed {
                Ok(record) => records.push(record),
                Err(reason) => {
                    if policy == IngestPolicy::Strict {
                        return Err(IngestError::InvalidRow { line, reason });
                    }
                    warn!("Skipping line {}: {}", line, reason);
                    report.rejections.push(RowRejection { line, reason });
                }
            }
        }

        report.accepted = records.len();

        if records.is_empty() && report.rows_read > 0 {
            return Err(IngestError::NoValidRows(report.rows_read));
        }

        info!(
            "Loaded {} records ({} rejected)",
            report.accepted,
            report.rejected()
        );

        Ok((Self::from_records(records), report))
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Borrowed view over every record, in load order
    pub fn view(&self) -> Vec<&TransactionRecord> {
        self.records.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest record dates
    pub fn date_span(&self) -> Option<DateRange> {
        date_span(self.records.iter())
    }

    /// Distinct values for each filterable dimension
    pub fn filter_options(&self) -> FilterOptions {
        let mut categories = BTreeSet::new();
        let mut regions = BTreeSet::new();
        let mut segments = BTreeSet::new();
        let mut products = BTreeSet::new();

        for record in &self.records {
            categories.insert(record.category.clone());
            regions.insert(record.region.clone());
            segments.insert(record.customer_segment.clone());
            products.insert(record.product.clone());
        }

        FilterOptions {
            date_span: self.date_span(),
            categories: categories.into_iter().collect(),
            regions: regions.into_iter().collect(),
            segments: segments.into_iter().collect(),
            products: products.into_iter().collect(),
        }
    }
}

/// Earliest and latest dates over any record sequence
pub fn date_span<'a>(records: impl IntoIterator<Item = &'a TransactionRecord>) -> Option<DateRange> {
    records.into_iter().fold(None, |span, record| match span {
        None => Some(DateRange::new(record.date, record.date)),
        Some(DateRange { start, end }) => {
            Some(DateRange::new(start.min(record.date), end.max(record.date)))
        }
    })
}

/// Deserialize and validate one CSV row
///
/// **Private** - internal helper for from_reader
fn parse_row(raw: &StringRecord, headers: &StringRecord) -> Result<TransactionRecord, String> {
    let row: CsvRow = raw
        .deserialize(Some(headers))
        .map_err(|e| format!("malformed row: {}", e))?;
    TransactionRecord::try_from(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const HEADER: &str =
        "Date,Product,Category,Region,Sales,Quantity,Customer_ID,Customer_Segment,Discount,Profit\n";

    fn csv_with(rows: &[&str]) -> String {
        let mut content = HEADER.to_string();
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        content
    }

    #[test]
    fn test_load_valid_rows() {
        let content = csv_with(&[
            "2024-01-02,Laptop,Electronics,East,1500.00,1,CUST_00001,Consumer,0,225.50",
            "2024-01-01,Jeans,Clothing,West,80.00,2,CUST_00002,Corporate,10,30.00",
        ]);

        let (store, report) = RecordStore::from_reader(content.as_bytes(), IngestPolicy::Skip).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(report.rows_read, 2);
        assert_eq!(report.accepted, 2);
        assert_eq!(report.rejected(), 0);
        // load order is kept
        assert_eq!(store.records()[0].product, "Laptop");
        assert_eq!(store.records()[1].discount, 0.1);
    }

    #[test]
    fn test_skip_policy_drops_bad_rows() {
        let content = csv_with(&[
            "2024-01-02,Laptop,Electronics,East,1500.00,1,CUST_00001,Consumer,0,225.50",
            "not-a-date,Jeans,Clothing,West,80.00,2,CUST_00002,Corporate,0,30.00",
            "2024-01-03,Jeans,Clothing,West,abc,2,CUST_00002,Corporate,0,30.00",
        ]);

        let (store, report) = RecordStore::from_reader(content.as_bytes(), IngestPolicy::Skip).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(report.rejected(), 2);
        assert_eq!(report.rejections[0].line, 3);
        assert!(report.rejections[0].reason.contains("date"));
    }

    #[test]
    fn test_strict_policy_fails_on_bad_row() {
        let content = csv_with(&[
            "2024-01-02,Laptop,Electronics,East,1500.00,1,CUST_00001,Consumer,0,225.50",
            "2024-01-03,Jeans,Clothing,West,80.00,0,CUST_00002,Corporate,0,30.00",
        ]);

        let err = RecordStore::from_reader(content.as_bytes(), IngestPolicy::Strict).unwrap_err();
        match err {
            IngestError::InvalidRow { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_row_is_rejected_not_fatal() {
        let content = csv_with(&[
            "2024-01-02,Laptop,Electronics,East,1500.00,1,CUST_00001,Consumer,0,225.50",
            "2024-01-03,Jeans,Clothing",
        ]);
        let (store, report) = RecordStore::from_reader(content.as_bytes(), IngestPolicy::Skip).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(report.rejected(), 1);
    }

    #[test]
    fn test_invalid_utf8_row_is_rejected_not_fatal() {
        let mut content = csv_with(&[
            "2024-01-01,Laptop,Electronics,East,1500.00,1,CUST_00001,Consumer,0,225.50",
            "2024-01-02,Jeans,Clothing,West,80.00,2,CUST_00002,Corporate,0,30.00",
        ])
        .into_bytes();
        content.extend_from_slice(b"2024-01-03,Caf\xe9,Books,East,10.00,1,CUST_00003,Consumer,0,2.00\n");

        let (store, report) = RecordStore::from_reader(content.as_slice(), IngestPolicy::Skip).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.rejected(), 1);
        assert_eq!(report.rejections[0].line, 4);
        assert!(report.rejections[0].reason.to_lowercase().contains("utf-8"));

        let err = RecordStore::from_reader(content.as_slice(), IngestPolicy::Strict).unwrap_err();
        assert!(matches!(err, IngestError::InvalidRow { line: 4, .. }));
    }

    #[test]
    fn test_all_rows_invalid_is_error() {
        let content = csv_with(&["bad,Laptop,Electronics,East,1,1,C1,Consumer,0,1"]);
        let err = RecordStore::from_reader(content.as_bytes(), IngestPolicy::Skip).unwrap_err();
        assert!(matches!(err, IngestError::NoValidRows(1)));
    }

    #[test]
    fn test_header_only_is_empty_store() {
        let (store, report) = RecordStore::from_reader(HEADER.as_bytes(), IngestPolicy::Skip).unwrap();
        assert!(store.is_empty());
        assert_eq!(report.rows_read, 0);
        assert!(store.date_span().is_none());
    }

    #[test]
    fn test_filter_options_sorted_and_distinct() {
        let content = csv_with(&[
            "2024-02-01,Laptop,Electronics,West,1500.00,1,CUST_00001,Corporate,0,225.50",
            "2024-01-01,Jeans,Clothing,East,80.00,2,CUST_00002,Consumer,0,30.00",
            "2024-01-15,Laptop,Electronics,East,900.00,1,CUST_00003,Consumer,0,100.00",
        ]);
        let (store, _) = RecordStore::from_reader(content.as_bytes(), IngestPolicy::Skip).unwrap();

        let options = store.filter_options();
        assert_eq!(options.categories, vec!["Clothing", "Electronics"]);
        assert_eq!(options.regions, vec!["East", "West"]);
        assert_eq!(options.segments, vec!["Consumer", "Corporate"]);
        assert_eq!(options.products, vec!["Jeans", "Laptop"]);

        let span = options.date_span.unwrap();
        assert_eq!(span.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(span.end, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }
}
