//! Filter Engine.
//!
//! A `FilterSelection` is the user's current choice of date range and
//! dimension values. Applying it to a record sequence keeps the records that
//! satisfy every restriction, in their original order.

use crate::records::{DateRange, TransactionRecord};
use crate::utils::error::FilterError;
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// User-selected predicates. An empty set places no restriction on its
/// dimension; an absent date range places none on dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,

    #[serde(default)]
    pub categories: BTreeSet<String>,

    #[serde(default)]
    pub regions: BTreeSet<String>,

    #[serde(default)]
    pub segments: BTreeSet<String>,

    #[serde(default)]
    pub products: BTreeSet<String>,
}

impl FilterSelection {
    /// Selection that keeps every record
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some(DateRange::new(start, end));
        self
    }

    pub fn with_categories<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_regions<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_segments<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.segments = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_products<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.products = values.into_iter().map(Into::into).collect();
        self
    }

    /// True when no predicate restricts anything
    pub fn is_unrestricted(&self) -> bool {
        self.date_range.is_none()
            && self.categories.is_empty()
            && self.regions.is_empty()
            && self.segments.is_empty()
            && self.products.is_empty()
    }

    /// Reject selections that cannot match a well-formed date
    pub fn validate(&self) -> Result<(), FilterError> {
        match self.date_range {
            Some(range) if !range.is_valid() => Err(FilterError::InvalidDateRange {
                start: range.start,
                end: range.end,
            }),
            _ => Ok(()),
        }
    }

    /// Per-record predicate
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        self.date_range.map_or(true, |range| range.contains(record.date))
            && allows(&self.categories, &record.category)
            && allows(&self.regions, &record.region)
            && allows(&self.segments, &record.customer_segment)
            && allows(&self.products, &record.product)
    }
}

fn allows(selected: &BTreeSet<String>, value: &str) -> bool {
    selected.is_empty() || selected.contains(value)
}

/// Apply a selection to a record sequence
///
/// **Public** - main entry point for filtering
///
/// The selection is validated first; the output keeps input order and may
/// be empty.
///
/// # Errors
/// * `FilterError::InvalidDateRange` - start date is after end date
pub fn apply<'a, I>(records: I, selection: &FilterSelection) -> Result<Vec<&'a TransactionRecord>, FilterError>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    selection.validate()?;

    let filtered: Vec<&TransactionRecord> = records
        .into_iter()
        .filter(|record| selection.matches(record))
        .collect();

    debug!("Filter kept {} records", filtered.len());

    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(day: u32, category: &str, region: &str, segment: &str, product: &str) -> TransactionRecord {
        TransactionRecord {
            date: date(2024, 1, day),
            product: product.to_string(),
            category: category.to_string(),
            region: region.to_string(),
            sales_amount: 10.0 * day as f64,
            quantity: 1,
            customer_id: format!("C{}", day),
            customer_segment: segment.to_string(),
            discount: 0.0,
            profit: 1.0,
        }
    }

    fn sample() -> Vec<TransactionRecord> {
        vec![
            record(1, "A", "East", "Consumer", "Pen"),
            record(2, "B", "West", "Corporate", "Desk"),
            record(3, "A", "West", "Home Office", "Pen"),
            record(4, "C", "East", "Consumer", "Lamp"),
        ]
    }

    #[test]
    fn test_unrestricted_keeps_everything_in_order() {
        let records = sample();
        let selection = FilterSelection::new();
        assert!(selection.is_unrestricted());

        let filtered = apply(&records, &selection).unwrap();
        let days: Vec<u32> = filtered.iter().map(|r| r.date.day()).collect();
        assert_eq!(days, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let records = sample();
        let selection = FilterSelection::new().with_date_range(date(2024, 1, 2), date(2024, 1, 3));
        let filtered = apply(&records, &selection).unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].category, "B");
        assert_eq!(filtered[1].category, "A");
    }

    #[test]
    fn test_dimensions_combine_with_and() {
        let records = sample();
        let selection = FilterSelection::new()
            .with_categories(["A", "C"])
            .with_regions(["East"]);
        let filtered = apply(&records, &selection).unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.region == "East"));
    }

    #[test]
    fn test_segment_and_product_restrictions() {
        let records = sample();
        let by_segment = FilterSelection::new().with_segments(["Home Office"]);
        assert_eq!(apply(&records, &by_segment).unwrap().len(), 1);

        let by_product = FilterSelection::new().with_products(["Pen"]);
        assert_eq!(apply(&records, &by_product).unwrap().len(), 2);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let records = sample();
        let selection = FilterSelection::new().with_regions(["North"]);
        assert!(apply(&records, &selection).unwrap().is_empty());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let records = sample();
        let selection = FilterSelection::new().with_date_range(date(2024, 1, 5), date(2024, 1, 1));
        assert_eq!(
            apply(&records, &selection).unwrap_err(),
            FilterError::InvalidDateRange {
                start: date(2024, 1, 5),
                end: date(2024, 1, 1),
            }
        );
    }

    #[test]
    fn test_apply_accepts_borrowed_view() {
        let records = sample();
        let view: Vec<&TransactionRecord> = records.iter().collect();
        let selection = FilterSelection::new().with_categories(["A"]);
        let filtered = apply(view.iter().copied(), &selection).unwrap();
        assert_eq!(filtered.len(), 2);
    }
}
