//! Customer-oriented breakdowns: segment totals and purchase frequency.

use crate::records::TransactionRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Totals for one customer segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub segment: String,
    pub sales: f64,

    /// Number of records in the segment
    pub orders: usize,

    pub unique_customers: usize,
    pub quantity: u64,

    /// Sales divided by unique customers
    pub sales_per_customer: f64,

    /// Share of the breakdown's total sales, in percent
    pub share_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentBreakdown {
    pub rows: Vec<SegmentSummary>,
}

impl SegmentBreakdown {
    pub fn total_sales(&self) -> f64 {
        self.rows.iter().map(|r| r.sales).sum()
    }
}

/// Group by customer segment, summing sales and counting records
///
/// **Public** - main entry point for the segment view
pub fn segment_breakdown(records: &[&TransactionRecord]) -> SegmentBreakdown {
    let mut groups: BTreeMap<&str, (f64, usize, u64, HashSet<&str>)> = BTreeMap::new();

    for record in records {
        let (sales, orders, quantity, customers) = groups
            .entry(record.customer_segment.as_str())
            .or_insert_with(|| (0.0, 0, 0, HashSet::new()));
        *sales += record.sales_amount;
        *orders += 1;
        *quantity += u64::from(record.quantity);
        customers.insert(record.customer_id.as_str());
    }

    let total: f64 = groups.values().map(|(sales, ..)| *sales).sum();

    let rows = groups
        .into_iter()
        .map(|(segment, (sales, orders, quantity, customers))| SegmentSummary {
            segment: segment.to_string(),
            sales,
            orders,
            unique_customers: customers.len(),
            quantity,
            sales_per_customer: if customers.is_empty() {
                0.0
            } else {
                sales / customers.len() as f64
            },
            share_percent: if total > 0.0 { sales / total * 100.0 } else { 0.0 },
        })
        .collect();

    SegmentBreakdown { rows }
}

/// Customers that placed exactly `order_count` orders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyBucket {
    pub order_count: usize,
    pub customer_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseFrequency {
    pub buckets: Vec<FrequencyBucket>,
}

/// Histogram of orders per customer
///
/// **Public** - repeat-customer analysis
///
/// # Returns
/// Buckets ascending by order count, at most `limit` of them
pub fn purchase_frequency(records: &[&TransactionRecord], limit: usize) -> PurchaseFrequency {
    let mut orders_by_customer: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *orders_by_customer.entry(record.customer_id.as_str()).or_insert(0) += 1;
    }

    let mut histogram: BTreeMap<usize, usize> = BTreeMap::new();
    for count in orders_by_customer.into_values() {
        *histogram.entry(count).or_insert(0) += 1;
    }

    let buckets = histogram
        .into_iter()
        .take(limit)
        .map(|(order_count, customer_count)| FrequencyBucket {
            order_count,
            customer_count,
        })
        .collect();

    PurchaseFrequency { buckets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::test_support::rec;

    fn with_segment(mut record: TransactionRecord, segment: &str) -> TransactionRecord {
        record.customer_segment = segment.to_string();
        record
    }

    #[test]
    fn test_segment_breakdown() {
        let records = vec![
            with_segment(rec((2024, 1, 1), "Pen", "East", 100.0, 1.0, "C1"), "Consumer"),
            with_segment(rec((2024, 1, 2), "Desk", "West", 300.0, 1.0, "C2"), "Corporate"),
            with_segment(rec((2024, 1, 3), "Lamp", "West", 50.0, 1.0, "C1"), "Consumer"),
            with_segment(rec((2024, 1, 4), "Lamp", "West", 50.0, 1.0, "C3"), "Consumer"),
        ];
        let view: Vec<&TransactionRecord> = records.iter().collect();
        let breakdown = segment_breakdown(&view);

        assert_eq!(breakdown.rows.len(), 2);
        let consumer = &breakdown.rows[0];
        assert_eq!(consumer.segment, "Consumer");
        assert_eq!(consumer.sales, 200.0);
        assert_eq!(consumer.orders, 3);
        assert_eq!(consumer.unique_customers, 2);
        assert_eq!(consumer.sales_per_customer, 100.0);

        assert_eq!(breakdown.rows[1].segment, "Corporate");
        assert_eq!(breakdown.total_sales(), 500.0);
        let shares: Vec<f64> = breakdown.rows.iter().map(|r| r.share_percent).collect();
        assert_eq!(shares, vec![40.0, 60.0]);
    }

    #[test]
    fn test_segment_breakdown_empty() {
        let breakdown = segment_breakdown(&[]);
        assert!(breakdown.rows.is_empty());
        assert_eq!(breakdown.total_sales(), 0.0);
    }

    #[test]
    fn test_segment_share_zero_when_no_sales() {
        let records = vec![
            with_segment(rec((2024, 1, 1), "Pen", "East", 0.0, 0.0, "C1"), "Consumer"),
            with_segment(rec((2024, 1, 2), "Pen", "East", 0.0, 0.0, "C2"), "Corporate"),
        ];
        let view: Vec<&TransactionRecord> = records.iter().collect();
        let breakdown = segment_breakdown(&view);

        assert!(breakdown.rows.iter().all(|r| r.share_percent == 0.0));
    }

    #[test]
    fn test_purchase_frequency() {
        let records = vec![
            rec((2024, 1, 1), "Pen", "East", 1.0, 1.0, "C1"),
            rec((2024, 1, 2), "Pen", "East", 1.0, 1.0, "C1"),
            rec((2024, 1, 3), "Pen", "East", 1.0, 1.0, "C2"),
            rec((2024, 1, 4), "Pen", "East", 1.0, 1.0, "C3"),
            rec((2024, 1, 5), "Pen", "East", 1.0, 1.0, "C1"),
        ];
        let view: Vec<&TransactionRecord> = records.iter().collect();
        let freq = purchase_frequency(&view, 10);

        assert_eq!(
            freq.buckets,
            vec![
                FrequencyBucket { order_count: 1, customer_count: 2 },
                FrequencyBucket { order_count: 3, customer_count: 1 },
            ]
        );

        let limited = purchase_frequency(&view, 1);
        assert_eq!(limited.buckets.len(), 1);
        assert_eq!(limited.buckets[0].order_count, 1);
    }
}
