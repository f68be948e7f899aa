//! Calendar-bucketed totals.
//!
//! Records are grouped by the start date of their bucket. Buckets between
//! the first and last populated one are zero-filled unless the policy says
//! to omit them.

use crate::records::TransactionRecord;
use chrono::{Datelike, Days, Months, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Fixed-width calendar interval
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bucket {
    #[default]
    Day,
    /// ISO week, starting Monday
    Week,
    Month,
    Quarter,
}

impl Bucket {
    /// First day of the bucket containing `date`
    pub fn start_of(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => date
                .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
                .unwrap_or(date),
            Self::Month => date.with_day(1).unwrap_or(date),
            Self::Quarter => {
                let first_month = (date.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(date.year(), first_month, 1).unwrap_or(date)
            }
        }
    }

    /// Start of the bucket after the one starting at `start`
    pub fn next(&self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Day => start.checked_add_days(Days::new(1)),
            Self::Week => start.checked_add_days(Days::new(7)),
            Self::Month => start.checked_add_months(Months::new(1)),
            Self::Quarter => start.checked_add_months(Months::new(3)),
        }
    }

    /// Axis label for a bucket starting at `start`
    pub fn label(&self, start: NaiveDate) -> String {
        match self {
            Self::Day | Self::Week => start.format("%Y-%m-%d").to_string(),
            Self::Month => start.format("%Y-%m").to_string(),
            Self::Quarter => format!("{}-Q{}", start.year(), start.month0() / 3 + 1),
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
        };
        f.write_str(name)
    }
}

impl FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(Self::Day),
            "week" | "weekly" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            "quarter" | "quarterly" => Ok(Self::Quarter),
            other => Err(format!("unknown bucket '{}' (day, week, month, quarter)", other)),
        }
    }
}

/// Treatment of buckets with no records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyBucketPolicy {
    /// Report every bucket between the first and last populated one
    #[default]
    ZeroFill,
    /// Report populated buckets only
    Omit,
}

impl FromStr for EmptyBucketPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero-fill" | "zero" => Ok(Self::ZeroFill),
            "omit" => Ok(Self::Omit),
            other => Err(format!("unknown empty-bucket policy '{}'", other)),
        }
    }
}

/// Totals for one bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub period_start: NaiveDate,
    pub sales: f64,
    pub profit: f64,
    pub quantity: u64,
    pub orders: usize,
}

impl TimePoint {
    fn empty(period_start: NaiveDate) -> Self {
        Self {
            period_start,
            sales: 0.0,
            profit: 0.0,
            quantity: 0,
            orders: 0,
        }
    }
}

/// Ascending sequence of bucket totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub bucket: Bucket,
    pub points: Vec<TimePoint>,
}

impl TimeSeries {
    pub fn total_sales(&self) -> f64 {
        self.points.iter().map(|p| p.sales).sum()
    }
}

/// Group records by calendar bucket and sum their sales
///
/// **Public** - main entry point for trend views
///
/// # Arguments
/// * `records` - Filtered record view
/// * `bucket` - Bucket width
/// * `policy` - Whether gaps are zero-filled or omitted
///
/// # Returns
/// Points ordered by `period_start`; empty for an empty view
pub fn time_series(
    records: &[&TransactionRecord],
    bucket: Bucket,
    policy: EmptyBucketPolicy,
) -> TimeSeries {
    let mut buckets: BTreeMap<NaiveDate, TimePoint> = BTreeMap::new();

    for record in records {
        let start = bucket.start_of(record.date);
        let point = buckets.entry(start).or_insert_with(|| TimePoint::empty(start));
        point.sales += record.sales_amount;
        point.profit += record.profit;
        point.quantity += u64::from(record.quantity);
        point.orders += 1;
    }

    let populated = buckets.len();
    let points = match policy {
        EmptyBucketPolicy::Omit => buckets.into_values().collect(),
        EmptyBucketPolicy::ZeroFill => zero_fill(buckets, bucket),
    };

    debug!(
        "Time series by {}: {} populated buckets, {} reported",
        bucket,
        populated,
        points.len()
    );

    TimeSeries { bucket, points }
}

/// Walk from the first to the last populated bucket, inserting empty points
///
/// **Private** - internal helper for time_series
fn zero_fill(mut buckets: BTreeMap<NaiveDate, TimePoint>, bucket: Bucket) -> Vec<TimePoint> {
    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Vec::new();
    };

    let mut points = Vec::new();
    let mut cursor = Some(first);

    while let Some(start) = cursor {
        if start > last {
            break;
        }
        points.push(buckets.remove(&start).unwrap_or_else(|| TimePoint::empty(start)));
        cursor = bucket.next(start);
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::test_support::rec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_bucket_start_of() {
        // 2024-01-10 is a Wednesday
        assert_eq!(Bucket::Day.start_of(date(2024, 1, 10)), date(2024, 1, 10));
        assert_eq!(Bucket::Week.start_of(date(2024, 1, 10)), date(2024, 1, 8));
        assert_eq!(Bucket::Week.start_of(date(2024, 1, 8)), date(2024, 1, 8));
        assert_eq!(Bucket::Month.start_of(date(2024, 1, 10)), date(2024, 1, 1));
        assert_eq!(Bucket::Quarter.start_of(date(2024, 5, 20)), date(2024, 4, 1));
        assert_eq!(Bucket::Quarter.start_of(date(2024, 12, 31)), date(2024, 10, 1));
    }

    #[test]
    fn test_bucket_labels() {
        assert_eq!(Bucket::Month.label(date(2024, 2, 1)), "2024-02");
        assert_eq!(Bucket::Quarter.label(date(2024, 10, 1)), "2024-Q4");
        assert_eq!(Bucket::Week.label(date(2024, 1, 8)), "2024-01-08");
    }

    #[test]
    fn test_same_month_single_bucket() {
        let a = rec((2024, 1, 3), "Pen", "East", 100.0, 10.0, "C1");
        let b = rec((2024, 1, 28), "Pen", "East", 250.0, 20.0, "C2");
        let series = time_series(&[&a, &b], Bucket::Month, EmptyBucketPolicy::ZeroFill);

        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].period_start, date(2024, 1, 1));
        assert_eq!(series.points[0].sales, 350.0);
        assert_eq!(series.points[0].profit, 30.0);
        assert_eq!(series.points[0].orders, 2);
    }

    #[test]
    fn test_zero_fill_inserts_gaps() {
        let a = rec((2024, 1, 1), "Pen", "East", 10.0, 1.0, "C1");
        let b = rec((2024, 1, 4), "Pen", "East", 20.0, 1.0, "C2");
        let series = time_series(&[&b, &a], Bucket::Day, EmptyBucketPolicy::ZeroFill);

        let sales: Vec<f64> = series.points.iter().map(|p| p.sales).collect();
        assert_eq!(sales, vec![10.0, 0.0, 0.0, 20.0]);
        assert_eq!(series.points[1].period_start, date(2024, 1, 2));
        assert_eq!(series.points[1].orders, 0);
    }

    #[test]
    fn test_omit_keeps_only_populated() {
        let a = rec((2024, 1, 1), "Pen", "East", 10.0, 1.0, "C1");
        let b = rec((2024, 3, 4), "Pen", "East", 20.0, 1.0, "C2");
        let series = time_series(&[&a, &b], Bucket::Month, EmptyBucketPolicy::Omit);

        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[1].period_start, date(2024, 3, 1));
    }

    #[test]
    fn test_zero_fill_across_year_by_quarter() {
        let a = rec((2023, 11, 1), "Pen", "East", 10.0, 1.0, "C1");
        let b = rec((2024, 5, 4), "Pen", "East", 20.0, 1.0, "C2");
        let series = time_series(&[&a, &b], Bucket::Quarter, EmptyBucketPolicy::ZeroFill);

        let starts: Vec<NaiveDate> = series.points.iter().map(|p| p.period_start).collect();
        assert_eq!(starts, vec![date(2023, 10, 1), date(2024, 1, 1), date(2024, 4, 1)]);
        assert_eq!(series.total_sales(), 30.0);
    }

    #[test]
    fn test_empty_input_empty_series() {
        let series = time_series(&[], Bucket::Week, EmptyBucketPolicy::ZeroFill);
        assert!(series.points.is_empty());
        assert_eq!(series.total_sales(), 0.0);
    }

    #[test]
    fn test_bucket_from_str() {
        assert_eq!("Monthly".parse::<Bucket>().unwrap(), Bucket::Month);
        assert_eq!("week".parse::<Bucket>().unwrap(), Bucket::Week);
        assert!("hour".parse::<Bucket>().is_err());
        assert_eq!("omit".parse::<EmptyBucketPolicy>().unwrap(), EmptyBucketPolicy::Omit);
    }
}
