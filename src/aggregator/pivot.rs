//! Two-dimensional cross-tabulation of a metric.

use super::{Dimension, Metric};
use crate::records::TransactionRecord;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Dense pivot table; `cells[row][col]` is 0 where no record falls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    pub row_dimension: Dimension,
    pub col_dimension: Dimension,
    pub metric: Metric,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub cells: Vec<Vec<f64>>,
}

impl PivotTable {
    /// Cell value by labels, `None` if either label is absent
    pub fn value(&self, row: &str, col: &str) -> Option<f64> {
        let r = self.row_labels.iter().position(|l| l == row)?;
        let c = self.col_labels.iter().position(|l| l == col)?;
        Some(self.cells[r][c])
    }

    /// Sum across each row, aligned with `row_labels`
    pub fn row_totals(&self) -> Vec<f64> {
        self.cells.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty()
    }
}

/// Sum `metric` for every (row, column) combination
///
/// **Public** - main entry point for heatmap views
///
/// Rows and columns are sorted by label. Combinations that never occur are
/// reported as zero.
pub fn pivot(
    records: &[&TransactionRecord],
    row_dimension: Dimension,
    col_dimension: Dimension,
    metric: Metric,
) -> PivotTable {
    let mut sums: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    let mut rows: BTreeSet<&str> = BTreeSet::new();
    let mut cols: BTreeSet<&str> = BTreeSet::new();

    for record in records {
        let row = row_dimension.label_of(record);
        let col = col_dimension.label_of(record);
        rows.insert(row);
        cols.insert(col);
        *sums.entry((row, col)).or_insert(0.0) += metric.value_of(record);
    }

    let cells = rows
        .iter()
        .map(|row| {
            cols.iter()
                .map(|col| sums.get(&(*row, *col)).copied().unwrap_or(0.0))
                .collect()
        })
        .collect();

    debug!("Pivot {:?} x {:?}: {} x {}", row_dimension, col_dimension, rows.len(), cols.len());

    PivotTable {
        row_dimension,
        col_dimension,
        metric,
        row_labels: rows.into_iter().map(str::to_string).collect(),
        col_labels: cols.into_iter().map(str::to_string).collect(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::test_support::rec;
    use crate::aggregator::{group_totals, top_n};

    fn sample() -> Vec<TransactionRecord> {
        vec![
            rec((2024, 1, 1), "Pen", "East", 50.0, 5.0, "C1"),
            rec((2024, 1, 2), "Desk", "West", 300.0, -20.0, "C2"),
            rec((2024, 1, 3), "Lamp", "East", 120.0, 30.0, "C1"),
            rec((2024, 1, 4), "Pen", "West", 70.0, 7.0, "C3"),
        ]
    }

    #[test]
    fn test_pivot_fills_missing_with_zero() {
        let records = sample();
        let view: Vec<&TransactionRecord> = records.iter().collect();
        let table = pivot(&view, Dimension::Region, Dimension::Category, Metric::Sales);

        assert_eq!(table.row_labels, vec!["East", "West"]);
        assert_eq!(table.col_labels, vec!["Desk-cat", "Lamp-cat", "Pen-cat"]);
        assert_eq!(table.value("East", "Desk-cat"), Some(0.0));
        assert_eq!(table.value("West", "Desk-cat"), Some(300.0));
        assert_eq!(table.value("East", "Pen-cat"), Some(50.0));
        assert_eq!(table.value("South", "Pen-cat"), None);
    }

    #[test]
    fn test_row_totals_match_group_sums() {
        let records = sample();
        let view: Vec<&TransactionRecord> = records.iter().collect();
        let table = pivot(&view, Dimension::Region, Dimension::Product, Metric::Profit);
        let totals = group_totals(&view, Dimension::Region);
        let ranking = top_n(&view, Dimension::Region, usize::MAX, Metric::Profit);

        for (label, total) in table.row_labels.iter().zip(table.row_totals()) {
            assert_eq!(totals.get(label).unwrap().profit, total);
            let ranked = ranking.entries.iter().find(|e| &e.label == label).unwrap();
            assert_eq!(ranked.value, total);
        }
    }

    #[test]
    fn test_empty_pivot() {
        let table = pivot(&[], Dimension::Region, Dimension::Category, Metric::Sales);
        assert!(table.is_empty());
        assert!(table.cells.is_empty());
        assert!(table.row_totals().is_empty());
    }
}
