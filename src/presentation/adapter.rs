//! Map aggregation results onto chart specifications.
//!
//! No arithmetic happens here beyond copying numbers into the right slots
//! and formatting captions.

use super::chart::{
    BarChart, Cell, ChartSpec, Heatmap, LineChart, Orientation, ScalarCard, Series, TableSpec,
    ValueFormat,
};
use crate::aggregator::{
    AggregateResult, Dimension, GroupTotals, Kpis, PivotTable, PurchaseFrequency, Ranking,
    SegmentBreakdown, TimeSeries,
};

/// Translate one aggregation result into the charts that display it
///
/// **Public** - main entry point for presentation
///
/// KPIs become one scalar card per indicator; every other result becomes a
/// single chart.
pub fn to_charts(result: &AggregateResult) -> Vec<ChartSpec> {
    match result {
        AggregateResult::TimeSeries(series) => vec![time_series_chart(series)],
        AggregateResult::Ranking(ranking) => vec![ranking_chart(ranking)],
        AggregateResult::GroupTotals(totals) => vec![group_totals_chart(totals)],
        AggregateResult::Pivot(table) => vec![pivot_chart(table)],
        AggregateResult::Kpis {
            kpis,
            healthy_margin_percent,
        } => kpi_cards(kpis, *healthy_margin_percent),
        AggregateResult::Segments(breakdown) => vec![segment_table(breakdown)],
        AggregateResult::Frequency(freq) => vec![frequency_chart(freq)],
    }
}

fn time_series_chart(series: &TimeSeries) -> ChartSpec {
    ChartSpec::Line(LineChart {
        title: "Sales and Profit Trends Over Time".to_string(),
        x_label: "Date".to_string(),
        y_label: "Amount ($)".to_string(),
        x: series
            .points
            .iter()
            .map(|p| series.bucket.label(p.period_start))
            .collect(),
        series: vec![
            Series {
                name: "Sales Revenue".to_string(),
                values: series.points.iter().map(|p| p.sales).collect(),
            },
            Series {
                name: "Profit".to_string(),
                values: series.points.iter().map(|p| p.profit).collect(),
            },
        ],
    })
}

fn ranking_chart(ranking: &Ranking) -> ChartSpec {
    ChartSpec::Bar(BarChart {
        title: format!(
            "Top {} {} by {}",
            ranking.limit,
            plural(ranking.dimension),
            ranking.metric.title().trim_end_matches(" ($)")
        ),
        orientation: Orientation::Horizontal,
        category_label: ranking.dimension.title().to_string(),
        value_label: ranking.metric.title().to_string(),
        categories: ranking.entries.iter().map(|e| e.label.clone()).collect(),
        values: ranking.entries.iter().map(|e| e.value).collect(),
        color: None,
    })
}

fn group_totals_chart(totals: &GroupTotals) -> ChartSpec {
    ChartSpec::Bar(BarChart {
        title: format!("Sales Performance by {}", totals.dimension.title()),
        orientation: Orientation::Vertical,
        category_label: totals.dimension.title().to_string(),
        value_label: "Sales Revenue ($)".to_string(),
        categories: totals.rows.iter().map(|r| r.label.clone()).collect(),
        values: totals.rows.iter().map(|r| r.sales).collect(),
        color: Some(Series {
            name: "Profit".to_string(),
            values: totals.rows.iter().map(|r| r.profit).collect(),
        }),
    })
}

fn pivot_chart(table: &PivotTable) -> ChartSpec {
    ChartSpec::Heatmap(Heatmap {
        title: format!(
            "{} Heatmap: {} vs {}",
            table.metric.title().trim_end_matches(" ($)"),
            table.row_dimension.title(),
            table.col_dimension.title()
        ),
        x_label: table.col_dimension.title().to_string(),
        y_label: table.row_dimension.title().to_string(),
        value_label: table.metric.title().to_string(),
        x_labels: table.col_labels.clone(),
        y_labels: table.row_labels.clone(),
        z: table.cells.clone(),
    })
}

fn kpi_cards(kpis: &Kpis, healthy_margin_percent: f64) -> Vec<ChartSpec> {
    let margin_note = if kpis.is_healthy(healthy_margin_percent) {
        "Healthy"
    } else {
        "Needs attention"
    };

    vec![
        card(
            "Total Sales",
            kpis.total_sales,
            ValueFormat::Currency,
            format!("{} orders", kpis.order_count),
        ),
        card(
            "Total Profit",
            kpis.total_profit,
            ValueFormat::Currency,
            format!("{:.1}% margin", kpis.profit_margin_percent),
        ),
        card(
            "Average Order Value",
            kpis.avg_order_value,
            ValueFormat::Currency,
            format!("{} items sold", kpis.total_quantity),
        ),
        card(
            "Unique Customers",
            kpis.unique_customers as f64,
            ValueFormat::Count,
            format!("{:.1} orders/customer", kpis.orders_per_customer),
        ),
        card(
            "Profit Margin",
            kpis.profit_margin_percent,
            ValueFormat::Percent,
            margin_note.to_string(),
        ),
    ]
}

fn card(title: &str, value: f64, format: ValueFormat, delta: String) -> ChartSpec {
    ChartSpec::ScalarCard(ScalarCard {
        title: title.to_string(),
        value,
        format,
        delta: Some(delta),
    })
}

fn segment_table(breakdown: &SegmentBreakdown) -> ChartSpec {
    let rows = breakdown
        .rows
        .iter()
        .map(|row| {
            vec![
                Cell::Text(row.segment.clone()),
                Cell::Number(row.sales),
                Cell::Number(row.share_percent),
                Cell::Number(row.orders as f64),
                Cell::Number(row.unique_customers as f64),
                Cell::Number(row.sales_per_customer),
            ]
        })
        .collect();

    ChartSpec::Table(TableSpec {
        title: "Sales Distribution by Customer Segment".to_string(),
        columns: [
            "Customer Segment",
            "Sales",
            "Share (%)",
            "Orders",
            "Customers",
            "Sales per Customer",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect(),
        rows,
    })
}

fn frequency_chart(freq: &PurchaseFrequency) -> ChartSpec {
    ChartSpec::Bar(BarChart {
        title: "Customer Purchase Frequency Distribution".to_string(),
        orientation: Orientation::Vertical,
        category_label: "Number of Orders".to_string(),
        value_label: "Number of Customers".to_string(),
        categories: freq.buckets.iter().map(|b| b.order_count.to_string()).collect(),
        values: freq.buckets.iter().map(|b| b.customer_count as f64).collect(),
        color: None,
    })
}

fn plural(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Product => "Products",
        Dimension::Category => "Categories",
        Dimension::Region => "Regions",
        Dimension::Segment => "Segments",
        Dimension::Customer => "Customers",
    }
}
