//! Record Store: transaction schema and CSV ingestion.
//!
//! This module handles:
//! - Reading the sales CSV
//! - Validating rows against the record invariants
//! - Holding the immutable table for the session

pub mod schema;
pub mod store;

// Re-export main types
pub use schema::{parse_date, CsvRow, DateRange, TransactionRecord};
pub use store::{date_span, FilterOptions, IngestPolicy, LoadReport, RecordStore, RowRejection};
