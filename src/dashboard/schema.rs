//! Dashboard JSON schema.
//!
//! This is the document written to disk after every refresh. It is versioned
//! so consumers can check compatibility.

use crate::filter::FilterSelection;
use crate::presentation::ChartSpec;
use crate::records::DateRange;
use serde::{Deserialize, Serialize};

/// Top-level dashboard structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the dashboard was generated (RFC 3339)
    pub generated_at: String,

    /// Selection the panels were computed for
    pub filter: FilterSelection,

    /// Records in the store
    pub total_records: usize,

    /// Records that passed the filter
    pub filtered_records: usize,

    /// Date span of the filtered records, absent when none passed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_span: Option<DateRange>,

    /// User-facing message, e.g. when the selection matches nothing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,

    pub panels: Vec<Panel>,
}

impl Dashboard {
    pub fn panel(&self, id: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    /// Every chart across all panels, in panel order
    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.panels.iter().flat_map(|p| p.charts.iter())
    }

    pub fn is_empty_selection(&self) -> bool {
        self.filtered_records == 0
    }
}

/// One section of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Stable identifier, e.g. `kpis` or `top-products`
    pub id: String,
    pub title: String,
    pub charts: Vec<ChartSpec>,
}
