use crate::aggregator::Bucket;
use crate::filter::FilterSelection;
use crate::records::DateRange;
use crate::utils::config::DashboardConfig;
use chrono::NaiveDate;
use std::path::PathBuf;

/// Arguments for the render command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct RenderArgs {
    /// Input CSV with sales records
    pub data_path: PathBuf,

    /// Optional TOML dashboard configuration
    pub config_path: Option<PathBuf>,

    /// Inclusive start of the date filter
    pub from: Option<NaiveDate>,

    /// Inclusive end of the date filter
    pub to: Option<NaiveDate>,

    pub categories: Vec<String>,
    pub regions: Vec<String>,
    pub segments: Vec<String>,
    pub products: Vec<String>,

    /// Overrides `[aggregation] bucket`
    pub bucket: Option<Bucket>,

    /// Overrides `[aggregation] top_n`
    pub top_n: Option<usize>,

    /// Output path for JSON dashboard
    pub output_json: PathBuf,

    /// Directory for per-chart SVG files (optional)
    pub svg_dir: Option<PathBuf>,

    /// Output path for the HTML page (optional)
    pub output_html: Option<PathBuf>,

    /// Output path for the filtered records (optional)
    pub export_csv: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Fail on the first invalid CSV row instead of skipping it
    pub strict: bool,
}

impl Default for RenderArgs {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/sales_data.csv"),
            config_path: None,
            from: None,
            to: None,
            categories: Vec::new(),
            regions: Vec::new(),
            segments: Vec::new(),
            products: Vec::new(),
            bucket: None,
            top_n: None,
            output_json: PathBuf::from("artifacts/dashboard.json"),
            svg_dir: None,
            output_html: None,
            export_csv: None,
            print_summary: false,
            strict: false,
        }
    }
}

impl RenderArgs {
    /// Build the filter selection
    ///
    /// A missing bound is taken from `data_span`, so `--from` alone means
    /// "from this date to the last record". A filled-in bound never crosses
    /// the given one: a lone bound outside the data yields an empty
    /// selection, not an inverted range.
    pub fn selection(&self, data_span: Option<DateRange>) -> FilterSelection {
        let selection = FilterSelection::new()
            .with_categories(self.categories.iter().cloned())
            .with_regions(self.regions.iter().cloned())
            .with_segments(self.segments.iter().cloned())
            .with_products(self.products.iter().cloned());

        let (start, end) = match (self.from, self.to) {
            (None, None) => return selection,
            (Some(start), Some(end)) => (start, end),
            (Some(start), None) => (start, data_span.map_or(start, |span| span.end.max(start))),
            (None, Some(end)) => (data_span.map_or(end, |span| span.start.min(end)), end),
        };

        selection.with_date_range(start, end)
    }

    /// Apply command-line overrides on top of file configuration
    pub fn apply_overrides(&self, config: &mut DashboardConfig) {
        if let Some(bucket) = self.bucket {
            config.aggregation.bucket = bucket;
        }
        if let Some(top_n) = self.top_n {
            config.aggregation.top_n = top_n;
        }
        if self.strict {
            config.ingest.policy = crate::records::IngestPolicy::Strict;
        }
    }
}

/// Arguments for the generate command
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub records: usize,
    pub seed: u64,

    /// Last sale date; today when absent
    pub end_date: Option<NaiveDate>,

    /// Output CSV path
    pub output: PathBuf,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            records: crate::generator::DEFAULT_RECORDS,
            seed: crate::generator::DEFAULT_SEED,
            end_date: None,
            output: PathBuf::from("data/sales_data.csv"),
        }
    }
}
