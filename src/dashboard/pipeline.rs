//! Refresh pipeline: filter, aggregate, present.
//!
//! One call is one refresh. Nothing is cached between calls; the store is
//! only borrowed.

use super::schema::{Dashboard, Panel};
use crate::aggregator::{
    group_totals, kpis, pivot, purchase_frequency, segment_breakdown, time_series, top_n,
    AggregateResult, Dimension, Metric,
};
use crate::filter::{self, FilterSelection};
use crate::presentation::to_charts;
use crate::records::{date_span, RecordStore, TransactionRecord};
use crate::utils::config::{AggregationSettings, DashboardConfig, EMPTY_SELECTION_NOTICE, SCHEMA_VERSION};
use crate::utils::error::FilterError;
use chrono::Utc;
use log::{debug, info};

/// Recompute the whole dashboard for one selection
///
/// **Public** - main entry point for a refresh
///
/// # Arguments
/// * `store` - Loaded records, never modified
/// * `selection` - Current filter selection
/// * `config` - Panel settings
///
/// # Returns
/// Every panel, even when no record matches. An empty selection also sets
/// the dashboard notice.
///
/// # Errors
/// * `FilterError::InvalidDateRange` - start date is after end date
pub fn refresh(
    store: &RecordStore,
    selection: &FilterSelection,
    config: &DashboardConfig,
) -> Result<Dashboard, FilterError> {
    info!("Refreshing dashboard over {} records", store.len());
    if selection.is_unrestricted() {
        debug!("No filter restrictions selected");
    }

    let view = filter::apply(store.records(), selection)?;
    debug!("Filter kept {} of {} records", view.len(), store.len());

    let notice = if view.is_empty() {
        info!("{}", EMPTY_SELECTION_NOTICE);
        Some(EMPTY_SELECTION_NOTICE.to_string())
    } else {
        None
    };

    let panels = build_panels(&view, &config.aggregation)
        .into_iter()
        .map(|(id, title, results)| Panel {
            id: id.to_string(),
            title: title.to_string(),
            charts: results.iter().flat_map(to_charts).collect(),
        })
        .collect::<Vec<_>>();

    debug!("Built {} panels", panels.len());

    Ok(Dashboard {
        version: SCHEMA_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        filter: selection.clone(),
        total_records: store.len(),
        filtered_records: view.len(),
        date_span: date_span(view.iter().copied()),
        notice,
        panels,
    })
}

/// Run every aggregation the dashboard displays
///
/// **Public** - useful when the raw results are wanted without presentation
///
/// # Returns
/// `(panel id, panel title, results)` in display order
pub fn build_panels(
    view: &[&TransactionRecord],
    settings: &AggregationSettings,
) -> Vec<(&'static str, &'static str, Vec<AggregateResult>)> {
    let summary = kpis(view);
    debug!("KPIs: {}", summary.summary());

    vec![
        (
            "kpis",
            "Key Performance Indicators",
            vec![AggregateResult::Kpis {
                kpis: summary,
                healthy_margin_percent: settings.healthy_margin_percent,
            }],
        ),
        (
            "sales-trends",
            "Sales Trends Over Time",
            vec![AggregateResult::TimeSeries(time_series(
                view,
                settings.bucket,
                settings.empty_buckets,
            ))],
        ),
        (
            "top-products",
            "Top Products",
            vec![AggregateResult::Ranking(top_n(
                view,
                Dimension::Product,
                settings.top_n,
                Metric::Sales,
            ))],
        ),
        (
            "regional-performance",
            "Regional Performance",
            vec![AggregateResult::GroupTotals(group_totals(view, Dimension::Region))],
        ),
        (
            "customer-analysis",
            "Customer Analysis",
            vec![
                AggregateResult::Segments(segment_breakdown(view)),
                AggregateResult::Frequency(purchase_frequency(view, settings.frequency_limit)),
            ],
        ),
        (
            "sales-heatmap",
            "Sales Heatmap",
            vec![AggregateResult::Pivot(pivot(
                view,
                Dimension::Region,
                Dimension::Category,
                Metric::Sales,
            ))],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::ChartSpec;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn record(day: u32, category: &str, region: &str, sales: f64) -> TransactionRecord {
        TransactionRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            product: format!("{} item", category),
            category: category.to_string(),
            region: region.to_string(),
            sales_amount: sales,
            quantity: 1,
            customer_id: format!("CUST_{:05}", day),
            customer_segment: "Consumer".to_string(),
            discount: 0.0,
            profit: sales / 4.0,
        }
    }

    fn store() -> RecordStore {
        RecordStore::from_records(vec![
            record(1, "A", "East", 100.0),
            record(2, "B", "West", 200.0),
            record(3, "A", "West", 50.0),
        ])
    }

    #[test]
    fn test_refresh_full_selection() {
        let dashboard = refresh(&store(), &FilterSelection::new(), &DashboardConfig::default()).unwrap();

        assert_eq!(dashboard.version, SCHEMA_VERSION);
        assert_eq!(dashboard.total_records, 3);
        assert_eq!(dashboard.filtered_records, 3);
        assert_eq!(dashboard.notice, None);

        let ids: Vec<&str> = dashboard.panels.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "kpis",
                "sales-trends",
                "top-products",
                "regional-performance",
                "customer-analysis",
                "sales-heatmap",
            ]
        );

        assert_eq!(dashboard.panel("kpis").unwrap().charts.len(), 5);
        assert_eq!(dashboard.panel("customer-analysis").unwrap().charts.len(), 2);
    }

    #[test]
    fn test_refresh_empty_selection_keeps_panels() {
        let selection = FilterSelection::new().with_regions(["Nowhere"]);
        let dashboard = refresh(&store(), &selection, &DashboardConfig::default()).unwrap();

        assert_eq!(dashboard.filtered_records, 0);
        assert!(dashboard.is_empty_selection());
        assert_eq!(dashboard.notice.as_deref(), Some(EMPTY_SELECTION_NOTICE));
        assert_eq!(dashboard.date_span, None);
        assert_eq!(dashboard.panels.len(), 6);

        let ChartSpec::ScalarCard(card) = &dashboard.panel("kpis").unwrap().charts[0] else {
            panic!("expected scalar card");
        };
        assert_eq!(card.value, 0.0);
        assert!(dashboard
            .charts()
            .filter(|c| c.kind() != "scalar-card")
            .all(|c| c.is_empty()));
    }

    #[test]
    fn test_refresh_rejects_inverted_range() {
        let selection = FilterSelection::new().with_date_range(
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        let result = refresh(&store(), &selection, &DashboardConfig::default());
        assert!(matches!(result, Err(FilterError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_build_panels_uses_settings() {
        let store = store();
        let view = store.view();
        let settings = AggregationSettings {
            top_n: 1,
            ..Default::default()
        };

        let panels = build_panels(&view, &settings);
        let (_, _, results) = &panels[2];
        let AggregateResult::Ranking(ranking) = &results[0] else {
            panic!("expected ranking");
        };
        assert_eq!(ranking.entries.len(), 1);
        assert_eq!(ranking.entries[0].label, "B item");
    }
}
