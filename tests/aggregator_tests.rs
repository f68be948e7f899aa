use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sales_analytics_dashboard::aggregator::{
    group_totals, kpis, pivot, segment_breakdown, time_series, top_n, Bucket, Dimension,
    EmptyBucketPolicy, Metric,
};
use sales_analytics_dashboard::generator::{generate_sales_data, GeneratorConfig};
use sales_analytics_dashboard::records::TransactionRecord;

const TOLERANCE: f64 = 1e-6;

fn sample() -> Vec<TransactionRecord> {
    let config = GeneratorConfig::new()
        .with_records(2000)
        .with_end_date(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    generate_sales_data(&config)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn test_kpi_total_sales_matches_sum() {
    let records = sample();
    let view: Vec<&TransactionRecord> = records.iter().collect();

    let expected: f64 = records.iter().map(|r| r.sales_amount).sum();
    let k = kpis(&view);

    assert_eq!(k.total_sales, expected);
    assert_eq!(k.order_count, records.len());
    assert!(close(k.avg_order_value, expected / records.len() as f64));
}

#[test]
fn test_empty_input_yields_zero_values() {
    let view: Vec<&TransactionRecord> = Vec::new();

    let k = kpis(&view);
    assert_eq!(k.total_sales, 0.0);
    assert_eq!(k.total_profit, 0.0);
    assert_eq!(k.total_quantity, 0);
    assert_eq!(k.unique_customers, 0);
    assert_eq!(k.avg_order_value, 0.0);

    assert!(top_n(&view, Dimension::Product, 10, Metric::Sales).entries.is_empty());
    assert!(pivot(&view, Dimension::Region, Dimension::Category, Metric::Sales).is_empty());
    assert!(segment_breakdown(&view).rows.is_empty());
    assert!(time_series(&view, Bucket::Month, EmptyBucketPolicy::ZeroFill).points.is_empty());
}

#[test]
fn test_top_n_is_bounded_descending_and_idempotent() {
    let records = sample();
    let view: Vec<&TransactionRecord> = records.iter().collect();

    for n in [0, 1, 5, 10, 100] {
        let ranking = top_n(&view, Dimension::Product, n, Metric::Sales);
        assert!(ranking.entries.len() <= n);
        assert!(ranking
            .entries
            .windows(2)
            .all(|w| w[0].value > w[1].value
                || (w[0].value == w[1].value && w[0].label < w[1].label)));

        let again = top_n(&view, Dimension::Product, n, Metric::Sales);
        assert_eq!(ranking, again);
    }
}

#[test]
fn test_pivot_rows_match_group_totals() {
    let records = sample();
    let view: Vec<&TransactionRecord> = records.iter().collect();

    let table = pivot(&view, Dimension::Region, Dimension::Category, Metric::Sales);
    let totals = group_totals(&view, Dimension::Region);
    let ranking = top_n(&view, Dimension::Region, usize::MAX, Metric::Sales);

    assert_eq!(table.row_labels.len(), totals.rows.len());
    for (label, row_sum) in table.row_labels.iter().zip(table.row_totals()) {
        let group = totals.get(label).unwrap();
        assert!(close(row_sum, group.sales), "{}: {} vs {}", label, row_sum, group.sales);

        let entry = ranking.entries.iter().find(|e| &e.label == label).unwrap();
        assert!(close(row_sum, entry.value));
    }
}

#[test]
fn test_zero_fill_is_contiguous() {
    let records = sample();
    let view: Vec<&TransactionRecord> = records.iter().collect();

    for bucket in [Bucket::Day, Bucket::Week, Bucket::Month, Bucket::Quarter] {
        let series = time_series(&view, bucket, EmptyBucketPolicy::ZeroFill);
        assert!(series
            .points
            .windows(2)
            .all(|w| bucket.next(w[0].period_start) == Some(w[1].period_start)));
        assert!(close(series.total_sales(), records.iter().map(|r| r.sales_amount).sum()));
    }
}

#[test]
fn test_omit_only_reports_populated_buckets() {
    let records = sample();
    let view: Vec<&TransactionRecord> = records.iter().collect();

    let series = time_series(&view, Bucket::Day, EmptyBucketPolicy::Omit);
    assert!(series.points.iter().all(|p| p.orders > 0));
}

#[test]
fn test_segment_breakdown_counts_every_record() {
    let records = sample();
    let view: Vec<&TransactionRecord> = records.iter().collect();

    let breakdown = segment_breakdown(&view);
    let orders: usize = breakdown.rows.iter().map(|r| r.orders).sum();
    let labels: Vec<&str> = breakdown.rows.iter().map(|r| r.segment.as_str()).collect();

    assert_eq!(orders, records.len());
    assert_eq!(labels, vec!["Consumer", "Corporate", "Home Office"]);
    assert!(close(breakdown.rows.iter().map(|r| r.share_percent).sum::<f64>(), 100.0));
}
