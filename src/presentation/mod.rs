//! Presentation Adapter.
//!
//! Reshapes aggregation results into renderer-neutral chart specifications:
//! - `line` for time series
//! - `bar` for rankings, group totals and frequency histograms
//! - `heatmap` for pivots
//! - `scalar-card` for KPIs
//! - `table` for segment breakdowns

pub mod adapter;
pub mod chart;

// Re-export main types and functions
pub use adapter::to_charts;
pub use chart::{
    group_thousands, BarChart, Cell, ChartSpec, Heatmap, LineChart, Orientation, ScalarCard,
    Series, TableSpec, ValueFormat,
};
