//! Sales Analytics Dashboard
//!
//! Loads transactional sales records from CSV, filters them by date range,
//! category, region, segment and product, and turns the filtered view into
//! KPI cards, trend lines, rankings, pivots and customer breakdowns.
//!
//! This crate provides the core implementation for the `sales-dash` CLI.
//!
//! ## Getting Started
//!
//! ```bash
//! sales-dash generate --output data/sales_data.csv
//! sales-dash render --data data/sales_data.csv --html dashboard.html --summary
//! ```
//!
//! Data flow per refresh is strictly linear:
//! records -> `filter::apply` -> `aggregator` -> `presentation::to_charts`
//! -> `dashboard::Dashboard`.

pub mod aggregator;
pub mod commands;
pub mod dashboard;
pub mod filter;
pub mod generator;
pub mod output;
pub mod presentation;
pub mod records;
pub mod utils;
