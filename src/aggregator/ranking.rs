//! Top-N rankings and per-group totals.
//!
//! Rankings order groups by summed metric, highest first. Equal totals
//! fall back to ascending label so repeated runs give the same order.

use super::{Dimension, Metric};
use crate::records::TransactionRecord;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One ranked group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub label: String,
    pub value: f64,
}

/// Top groups of a dimension by a metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub dimension: Dimension,
    pub metric: Metric,
    /// Requested length; `entries` may be shorter
    pub limit: usize,
    pub entries: Vec<RankedEntry>,
}

/// Rank the groups of `dimension` by summed `metric`
///
/// **Public** - main entry point for leaderboard views
///
/// # Arguments
/// * `records` - Filtered record view
/// * `dimension` - Grouping column
/// * `n` - Maximum number of entries returned
/// * `metric` - Column to sum
///
/// # Returns
/// At most `n` entries, descending by value, ties by ascending label
pub fn top_n(records: &[&TransactionRecord], dimension: Dimension, n: usize, metric: Metric) -> Ranking {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();

    for record in records {
        *totals.entry(dimension.label_of(record)).or_insert(0.0) += metric.value_of(record);
    }

    let mut entries: Vec<RankedEntry> = totals
        .into_iter()
        .map(|(label, value)| RankedEntry {
            label: label.to_string(),
            value,
        })
        .collect();

    entries.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.label.cmp(&b.label)));
    entries.truncate(n);

    debug!(
        "Top {} {:?} by {}: {} entries",
        n,
        dimension,
        metric,
        entries.len()
    );

    Ranking {
        dimension,
        metric,
        limit: n,
        entries,
    }
}

/// Full totals for one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    pub label: String,
    pub sales: f64,
    pub profit: f64,
    pub quantity: u64,
    pub orders: usize,
    pub unique_customers: usize,
}

/// Every group of a dimension with all its totals, sorted by label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotals {
    pub dimension: Dimension,
    pub rows: Vec<GroupRow>,
}

impl GroupTotals {
    pub fn get(&self, label: &str) -> Option<&GroupRow> {
        self.rows.iter().find(|row| row.label == label)
    }
}

/// Sum sales, profit and quantity per group and count orders and customers
///
/// **Public** - used for the regional performance view
pub fn group_totals(records: &[&TransactionRecord], dimension: Dimension) -> GroupTotals {
    struct Acc<'r> {
        sales: f64,
        profit: f64,
        quantity: u64,
        orders: usize,
        customers: HashSet<&'r str>,
    }

    let mut groups: BTreeMap<&str, Acc> = BTreeMap::new();

    for record in records {
        let acc = groups.entry(dimension.label_of(record)).or_insert_with(|| Acc {
            sales: 0.0,
            profit: 0.0,
            quantity: 0,
            orders: 0,
            customers: HashSet::new(),
        });
        acc.sales += record.sales_amount;
        acc.profit += record.profit;
        acc.quantity += u64::from(record.quantity);
        acc.orders += 1;
        acc.customers.insert(&record.customer_id);
    }

    let rows = groups
        .into_iter()
        .map(|(label, acc)| GroupRow {
            label: label.to_string(),
            sales: acc.sales,
            profit: acc.profit,
            quantity: acc.quantity,
            orders: acc.orders,
            unique_customers: acc.customers.len(),
        })
        .collect();

    GroupTotals { dimension, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::test_support::rec;

    fn sample() -> Vec<TransactionRecord> {
        vec![
            rec((2024, 1, 1), "Pen", "East", 50.0, 5.0, "C1"),
            rec((2024, 1, 2), "Desk", "West", 300.0, -20.0, "C2"),
            rec((2024, 1, 3), "Lamp", "East", 120.0, 30.0, "C1"),
            rec((2024, 1, 4), "Pen", "West", 70.0, 7.0, "C3"),
            rec((2024, 1, 5), "Chair", "North", 120.0, 12.0, "C4"),
        ]
    }

    #[test]
    fn test_top_n_orders_descending() {
        let records = sample();
        let view: Vec<&TransactionRecord> = records.iter().collect();
        let ranking = top_n(&view, Dimension::Product, 10, Metric::Sales);

        let labels: Vec<&str> = ranking.entries.iter().map(|e| e.label.as_str()).collect();
        // Chair and Lamp tie at 120 and Pen sums to 120 as well
        assert_eq!(labels, vec!["Desk", "Chair", "Lamp", "Pen"]);
        assert_eq!(ranking.entries[0].value, 300.0);
    }

    #[test]
    fn test_top_n_truncates() {
        let records = sample();
        let view: Vec<&TransactionRecord> = records.iter().collect();
        let ranking = top_n(&view, Dimension::Region, 2, Metric::Sales);

        assert_eq!(ranking.entries.len(), 2);
        assert_eq!(ranking.limit, 2);
        assert_eq!(ranking.entries[0].label, "West");
        assert_eq!(ranking.entries[0].value, 370.0);
        assert_eq!(ranking.entries[1].label, "East");
    }

    #[test]
    fn test_top_n_by_profit_handles_negatives() {
        let records = sample();
        let view: Vec<&TransactionRecord> = records.iter().collect();
        let ranking = top_n(&view, Dimension::Product, 10, Metric::Profit);

        assert_eq!(ranking.entries.first().unwrap().label, "Lamp");
        assert_eq!(ranking.entries.last().unwrap().label, "Desk");
        assert_eq!(ranking.entries.last().unwrap().value, -20.0);
    }

    #[test]
    fn test_top_n_is_idempotent() {
        let records = sample();
        let view: Vec<&TransactionRecord> = records.iter().collect();
        let first = top_n(&view, Dimension::Product, 3, Metric::Sales);
        let second = top_n(&view, Dimension::Product, 3, Metric::Sales);
        assert_eq!(first, second);
    }

    #[test]
    fn test_top_n_empty_and_zero() {
        assert!(top_n(&[], Dimension::Product, 5, Metric::Sales).entries.is_empty());

        let records = sample();
        let view: Vec<&TransactionRecord> = records.iter().collect();
        assert!(top_n(&view, Dimension::Product, 0, Metric::Sales).entries.is_empty());
    }

    #[test]
    fn test_group_totals_counts_customers() {
        let records = sample();
        let view: Vec<&TransactionRecord> = records.iter().collect();
        let totals = group_totals(&view, Dimension::Region);

        let labels: Vec<&str> = totals.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["East", "North", "West"]);

        let east = totals.get("East").unwrap();
        assert_eq!(east.sales, 170.0);
        assert_eq!(east.profit, 35.0);
        assert_eq!(east.orders, 2);
        assert_eq!(east.unique_customers, 1);

        let west = totals.get("West").unwrap();
        assert_eq!(west.unique_customers, 2);
        assert!(totals.get("South").is_none());
    }
}
