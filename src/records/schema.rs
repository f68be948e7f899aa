//! Transaction record definitions and the CSV row schema.
//!
//! `CsvRow` mirrors the file layout column for column; `TransactionRecord`
//! is the validated in-memory form the rest of the crate works on.

use crate::utils::config::{DATETIME_FORMATS, DATE_FORMAT};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One sale event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub product: String,
    pub category: String,
    pub region: String,

    /// Revenue for the order, never negative
    pub sales_amount: f64,

    /// Units sold, at least 1
    pub quantity: u32,

    pub customer_id: String,
    pub customer_segment: String,

    /// Fraction in [0, 1]
    pub discount: f64,

    /// May be negative
    pub profit: f64,
}

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }
}

/// Raw CSV row, one field per input column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvRow {
    #[serde(rename = "Date")]
    pub date: String,

    #[serde(rename = "Product")]
    pub product: String,

    #[serde(rename = "Category")]
    pub category: String,

    #[serde(rename = "Region")]
    pub region: String,

    #[serde(rename = "Sales")]
    pub sales: f64,

    #[serde(rename = "Quantity")]
    pub quantity: u32,

    #[serde(rename = "Customer_ID")]
    pub customer_id: String,

    #[serde(rename = "Customer_Segment")]
    pub customer_segment: String,

    #[serde(rename = "Discount")]
    pub discount: f64,

    #[serde(rename = "Profit")]
    pub profit: f64,
}

impl TryFrom<CsvRow> for TransactionRecord {
    /// Human-readable rejection reason
    type Error = String;

    fn try_from(row: CsvRow) -> Result<Self, Self::Error> {
        let date = parse_date(&row.date).ok_or_else(|| format!("unparseable date '{}'", row.date))?;

        for (name, value) in [
            ("Product", &row.product),
            ("Category", &row.category),
            ("Region", &row.region),
            ("Customer_ID", &row.customer_id),
            ("Customer_Segment", &row.customer_segment),
        ] {
            if value.is_empty() {
                return Err(format!("empty {} field", name));
            }
        }

        if !row.sales.is_finite() || row.sales < 0.0 {
            return Err(format!("sales amount {} must be non-negative", row.sales));
        }

        if row.quantity < 1 {
            return Err("quantity must be at least 1".to_string());
        }

        if !row.profit.is_finite() {
            return Err(format!("profit {} is not a number", row.profit));
        }

        let discount = normalize_discount(row.discount)
            .ok_or_else(|| format!("discount {} is outside [0, 1] and [0, 100]%", row.discount))?;

        Ok(TransactionRecord {
            date,
            product: row.product,
            category: row.category,
            region: row.region,
            sales_amount: row.sales,
            quantity: row.quantity,
            customer_id: row.customer_id,
            customer_segment: row.customer_segment,
            discount,
            profit: row.profit,
        })
    }
}

impl From<&TransactionRecord> for CsvRow {
    fn from(record: &TransactionRecord) -> Self {
        Self {
            date: record.date.format(DATE_FORMAT).to_string(),
            product: record.product.clone(),
            category: record.category.clone(),
            region: record.region.clone(),
            sales: record.sales_amount,
            quantity: record.quantity,
            customer_id: record.customer_id.clone(),
            customer_segment: record.customer_segment.clone(),
            discount: record.discount,
            profit: record.profit,
        }
    }
}

/// Parse a date or timestamp, keeping only the calendar date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Some(date);
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
}

/// Normalize a discount column value to a fraction in [0, 1]
///
/// Values in [0, 1] are taken as fractions as-is, so a literal `1` means a
/// 100% discount, not 1%. Values in (1, 100] are whole percentages and are
/// divided by 100. Negative, non-finite or larger values are rejected.
fn normalize_discount(value: f64) -> Option<f64> {
    if !value.is_finite() || value < 0.0 {
        None
    } else if value <= 1.0 {
        Some(value)
    } else if value <= 100.0 {
        Some(value / 100.0)
    } else {
        None
    }
}
