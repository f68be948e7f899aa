//! Aggregation Engine.
//!
//! Pure summaries over a filtered record view:
//! - Time-bucketed totals
//! - Top-N rankings and per-group totals
//! - Two-dimensional pivots
//! - Scalar KPIs
//! - Customer segment and purchase frequency breakdowns
//!
//! Every function takes `&[&TransactionRecord]` and returns an empty or
//! zero-valued result for an empty view.

pub mod kpi;
pub mod pivot;
pub mod ranking;
pub mod segments;
pub mod time_series;

use crate::records::TransactionRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export main types and functions
pub use kpi::{kpis, Kpis};
pub use pivot::{pivot, PivotTable};
pub use ranking::{group_totals, top_n, GroupRow, GroupTotals, RankedEntry, Ranking};
pub use segments::{
    purchase_frequency, segment_breakdown, FrequencyBucket, PurchaseFrequency, SegmentBreakdown,
    SegmentSummary,
};
pub use time_series::{time_series, Bucket, EmptyBucketPolicy, TimePoint, TimeSeries};

/// Categorical column used for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dimension {
    Product,
    Category,
    Region,
    Segment,
    Customer,
}

impl Dimension {
    /// The record's value for this dimension
    pub fn label_of<'r>(&self, record: &'r TransactionRecord) -> &'r str {
        match self {
            Self::Product => &record.product,
            Self::Category => &record.category,
            Self::Region => &record.region,
            Self::Segment => &record.customer_segment,
            Self::Customer => &record.customer_id,
        }
    }

    /// Display name used in chart axes
    pub fn title(&self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::Category => "Product Category",
            Self::Region => "Region",
            Self::Segment => "Customer Segment",
            Self::Customer => "Customer",
        }
    }
}

/// Numeric column being summed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    Sales,
    Profit,
    Quantity,
}

impl Metric {
    pub fn value_of(&self, record: &TransactionRecord) -> f64 {
        match self {
            Self::Sales => record.sales_amount,
            Self::Profit => record.profit,
            Self::Quantity => f64::from(record.quantity),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Sales => "Sales ($)",
            Self::Profit => "Profit ($)",
            Self::Quantity => "Units",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sales => "sales",
            Self::Profit => "profit",
            Self::Quantity => "quantity",
        };
        f.write_str(name)
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sales" => Ok(Self::Sales),
            "profit" => Ok(Self::Profit),
            "quantity" => Ok(Self::Quantity),
            other => Err(format!("unknown metric '{}'", other)),
        }
    }
}

/// One derived summary, shaped for the view that displays it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "kebab-case")]
pub enum AggregateResult {
    TimeSeries(TimeSeries),
    Ranking(Ranking),
    GroupTotals(GroupTotals),
    Pivot(PivotTable),
    Kpis {
        kpis: Kpis,
        /// Margin above which the margin card reads "Healthy"
        healthy_margin_percent: f64,
    },
    Segments(SegmentBreakdown),
    Frequency(PurchaseFrequency),
}


#[cfg(test)]
mod tests {
    use super::test_support::rec;
    use super::*;

    #[test]
    fn test_dimension_labels() {
        let record = rec((2024, 1, 1), "Pen", "East", 10.0, 2.0, "C1");
        assert_eq!(Dimension::Product.label_of(&record), "Pen");
        assert_eq!(Dimension::Category.label_of(&record), "Pen-cat");
        assert_eq!(Dimension::Region.label_of(&record), "East");
        assert_eq!(Dimension::Segment.label_of(&record), "Consumer");
        assert_eq!(Dimension::Customer.label_of(&record), "C1");
    }

    #[test]
    fn test_metric_values() {
        let mut record = rec((2024, 1, 1), "Pen", "East", 10.0, -2.0, "C1");
        record.quantity = 3;
        assert_eq!(Metric::Sales.value_of(&record), 10.0);
        assert_eq!(Metric::Profit.value_of(&record), -2.0);
        assert_eq!(Metric::Quantity.value_of(&record), 3.0);
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("Sales".parse::<Metric>().unwrap(), Metric::Sales);
        assert_eq!("profit".parse::<Metric>().unwrap(), Metric::Profit);
        assert!("margin".parse::<Metric>().is_err());
    }
}
