//! Scalar key performance indicators.

use crate::records::TransactionRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Headline numbers for a record view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_sales: f64,
    pub total_profit: f64,
    pub total_quantity: u64,

    /// One record is one order
    pub order_count: usize,

    pub unique_customers: usize,

    /// `total_sales / order_count`, 0 for an empty view
    pub avg_order_value: f64,

    /// `total_profit / total_sales * 100`, 0 when there are no sales
    pub profit_margin_percent: f64,

    /// 0 when there are no customers
    pub orders_per_customer: f64,
}

impl Kpis {
    /// Margin strictly above `threshold_percent`
    pub fn is_healthy(&self, threshold_percent: f64) -> bool {
        self.profit_margin_percent > threshold_percent
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "Sales: {:.2} | Profit: {:.2} | Orders: {} | Customers: {} | AOV: {:.2} | Margin: {:.1}%",
            self.total_sales,
            self.total_profit,
            self.order_count,
            self.unique_customers,
            self.avg_order_value,
            self.profit_margin_percent
        )
    }
}

/// Compute the KPI set
///
/// **Public** - main entry point for the KPI cards
pub fn kpis(records: &[&TransactionRecord]) -> Kpis {
    if records.is_empty() {
        return Kpis::default();
    }

    let total_sales: f64 = records.iter().map(|r| r.sales_amount).sum();
    let total_profit: f64 = records.iter().map(|r| r.profit).sum();
    let total_quantity: u64 = records.iter().map(|r| u64::from(r.quantity)).sum();
    let order_count = records.len();
    let unique_customers = records
        .iter()
        .map(|r| r.customer_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let profit_margin_percent = if total_sales > 0.0 {
        total_profit / total_sales * 100.0
    } else {
        0.0
    };

    let orders_per_customer = if unique_customers > 0 {
        order_count as f64 / unique_customers as f64
    } else {
        0.0
    };

    Kpis {
        total_sales,
        total_profit,
        total_quantity,
        order_count,
        unique_customers,
        avg_order_value: total_sales / order_count as f64,
        profit_margin_percent,
        orders_per_customer,
    }
}
