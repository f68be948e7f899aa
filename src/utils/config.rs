//! Configuration and constants for the dashboard.
//!
//! Defaults live here as constants; `DashboardConfig` layers an optional
//! TOML file on top of them and the CLI layers its flags on top of that.

use crate::aggregator::{Bucket, EmptyBucketPolicy};
use crate::records::IngestPolicy;
use crate::utils::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current dashboard output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Number of entries shown in ranking panels
pub const DEFAULT_TOP_N: usize = 10;
pub const MAX_TOP_N: usize = 1000;

/// Purchase frequency histogram rows (orders-per-customer values)
pub const DEFAULT_FREQUENCY_LIMIT: usize = 10;

/// Profit margin (percent) above which the margin card reads "Healthy"
pub const DEFAULT_HEALTHY_MARGIN_PERCENT: f64 = 20.0;

pub const DEFAULT_CHART_WIDTH: usize = 900;
pub const DEFAULT_CHART_HEIGHT: usize = 400;

/// Message attached to a dashboard whose filter matched nothing
pub const EMPTY_SELECTION_NOTICE: &str =
    "No data available for the selected filters. Please adjust your selection.";

/// Accepted date layouts. Timestamps are truncated to their date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Complete dashboard configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub aggregation: AggregationSettings,

    #[serde(default)]
    pub ingest: IngestSettings,

    #[serde(default)]
    pub chart: ChartSettings,
}

/// Settings for the Aggregation Engine panels
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AggregationSettings {
    /// Entries per ranking panel
    pub top_n: usize,

    /// Time-series bucket width
    pub bucket: Bucket,

    /// Whether buckets without sales are reported as zero or omitted
    pub empty_buckets: EmptyBucketPolicy,

    /// Rows in the purchase frequency histogram
    pub frequency_limit: usize,

    /// Margin threshold for the "Healthy" flag
    pub healthy_margin_percent: f64,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            bucket: Bucket::Day,
            empty_buckets: EmptyBucketPolicy::ZeroFill,
            frequency_limit: DEFAULT_FREQUENCY_LIMIT,
            healthy_margin_percent: DEFAULT_HEALTHY_MARGIN_PERCENT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IngestSettings {
    pub policy: IngestPolicy,
}

/// Pixel size of rendered charts
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartSettings {
    pub width: usize,
    pub height: usize,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
        }
    }
}

/// Load dashboard configuration from a TOML file
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::Parse` - If TOML is invalid
///
/// # Example
/// ```ignore
/// let config = load_config("dashboard.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<DashboardConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: DashboardConfig = toml::from_str(&contents)?;
    Ok(config)
}
