//! Time-bucketed aggregation of revision activity.
//!
//! Buckets revisions by day, month, or year and aggregates edit counts or
//! byte churn per bucket. The output is gap-free: every bucket between the
//! first and last observed revision appears, zero-valued when quiet, so the
//! series plots correctly without a separate reindexing step.

use std::collections::HashMap;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use wikipulse_core::{Granularity, RevisionTable, ValueSelector};

/// One time bucket and its aggregate value.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use wikipulse_metrics::temporal::Bucket;
///
/// let b = Bucket {
///     start: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
///     value: 12,
/// };
/// assert_eq!(b.value, 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    /// First day of the bucket.
    pub start: NaiveDate,
    /// Aggregate for the bucket (edit count or byte-delta sum).
    pub value: i64,
}

/// A gap-free, chronologically ordered series of buckets for one subject.
///
/// # Examples
///
/// ```
/// use wikipulse_core::{Granularity, ValueSelector};
/// use wikipulse_metrics::temporal::BucketSeries;
///
/// let series = BucketSeries {
///     subject: "Harry Styles".into(),
///     granularity: Granularity::Month,
///     selector: ValueSelector::EditCount,
///     buckets: vec![],
/// };
/// assert_eq!(series.total(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketSeries {
    /// Subject the series was derived from.
    pub subject: String,
    /// Bucket width.
    pub granularity: Granularity,
    /// What each bucket aggregates.
    pub selector: ValueSelector,
    /// Buckets in chronological order, no gaps.
    pub buckets: Vec<Bucket>,
}

impl BucketSeries {
    /// Sum of all bucket values.
    pub fn total(&self) -> i64 {
        self.buckets.iter().map(|b| b.value).sum()
    }

    /// Rendered bucket keys (`2021-01-05` / `2021-01` / `2021`), in order.
    pub fn labels(&self) -> Vec<String> {
        self.buckets
            .iter()
            .map(|b| label(self.granularity, b.start))
            .collect()
    }
}

/// Render a bucket key for the given granularity.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use wikipulse_core::Granularity;
/// use wikipulse_metrics::temporal::label;
///
/// let date = NaiveDate::from_ymd_opt(2021, 1, 5).unwrap();
/// assert_eq!(label(Granularity::Day, date), "2021-01-05");
/// assert_eq!(label(Granularity::Month, date), "2021-01");
/// assert_eq!(label(Granularity::Year, date), "2021");
/// ```
pub fn label(granularity: Granularity, date: NaiveDate) -> String {
    match granularity {
        Granularity::Day => date.format("%Y-%m-%d").to_string(),
        Granularity::Month => date.format("%Y-%m").to_string(),
        Granularity::Year => date.format("%Y").to_string(),
    }
}

/// Aggregate a revision table into a gap-free bucket series.
///
/// An empty table yields an empty series; a single record yields a single
/// bucket. With [`ValueSelector::ByteDeltaSum`], records without a byte
/// delta contribute nothing to their bucket's sum (they still define the
/// observed range).
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use wikipulse_core::{Editor, Granularity, RevisionRecord, RevisionTable, ValueSelector};
/// use wikipulse_metrics::temporal::aggregate;
///
/// let table = RevisionTable::from_records("A", vec![RevisionRecord {
///     id: 1,
///     timestamp: Utc.with_ymd_and_hms(2021, 1, 5, 0, 0, 0).unwrap(),
///     editor: Editor::Registered { id: 42, name: "alice".into() },
///     byte_delta: Some(50),
///     minor: false,
///     comment: None,
/// }]);
/// let series = aggregate(&table, Granularity::Month, ValueSelector::EditCount);
/// assert_eq!(series.labels(), vec!["2021-01"]);
/// assert_eq!(series.total(), 1);
/// ```
pub fn aggregate(
    table: &RevisionTable,
    granularity: Granularity,
    selector: ValueSelector,
) -> BucketSeries {
    let mut sums: HashMap<NaiveDate, i64> = HashMap::new();
    for record in &table.records {
        let key = bucket_floor(granularity, record.timestamp.date_naive());
        let value = match selector {
            ValueSelector::EditCount => 1,
            ValueSelector::ByteDeltaSum => record.byte_delta.unwrap_or(0),
        };
        *sums.entry(key).or_default() += value;
    }

    let buckets = match (table.records.first(), table.records.last()) {
        (Some(first), Some(last)) => {
            let start = bucket_floor(granularity, first.timestamp.date_naive());
            let end = bucket_floor(granularity, last.timestamp.date_naive());
            fill_range(granularity, start, end, &sums)
        }
        _ => Vec::new(),
    };

    BucketSeries {
        subject: table.subject.clone(),
        granularity,
        selector,
        buckets,
    }
}

/// Running total of a series, same keys and metric.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use wikipulse_core::{Granularity, ValueSelector};
/// use wikipulse_metrics::temporal::{cumulative, Bucket, BucketSeries};
///
/// let day = |d: u32| NaiveDate::from_ymd_opt(2021, 1, d).unwrap();
/// let series = BucketSeries {
///     subject: "A".into(),
///     granularity: Granularity::Day,
///     selector: ValueSelector::EditCount,
///     buckets: vec![
///         Bucket { start: day(1), value: 2 },
///         Bucket { start: day(2), value: 0 },
///         Bucket { start: day(3), value: 1 },
///     ],
/// };
/// let running = cumulative(&series);
/// let values: Vec<i64> = running.buckets.iter().map(|b| b.value).collect();
/// assert_eq!(values, vec![2, 2, 3]);
/// ```
pub fn cumulative(series: &BucketSeries) -> BucketSeries {
    let mut running = 0i64;
    let buckets = series
        .buckets
        .iter()
        .map(|b| {
            running += b.value;
            Bucket {
                start: b.start,
                value: running,
            }
        })
        .collect();

    BucketSeries {
        subject: series.subject.clone(),
        granularity: series.granularity,
        selector: series.selector,
        buckets,
    }
}

/// First day of the bucket containing `date`.
pub(crate) fn bucket_floor(granularity: Granularity, date: NaiveDate) -> NaiveDate {
    match granularity {
        Granularity::Day => date,
        // from_ymd_opt cannot fail for day 1 of a valid year/month
        Granularity::Month => {
            NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
        }
        Granularity::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
    }
}

/// First day of the bucket after the one starting at `start`.
pub(crate) fn bucket_next(granularity: Granularity, start: NaiveDate) -> NaiveDate {
    match granularity {
        Granularity::Day => start + Days::new(1),
        Granularity::Month => start + Months::new(1),
        Granularity::Year => start + Months::new(12),
    }
}

/// Walk from `start` to `end` inclusive, zero-filling buckets absent from
/// `sums`.
pub(crate) fn fill_range(
    granularity: Granularity,
    start: NaiveDate,
    end: NaiveDate,
    sums: &HashMap<NaiveDate, i64>,
) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    let mut current = start;
    while current <= end {
        buckets.push(Bucket {
            start: current,
            value: sums.get(&current).copied().unwrap_or(0),
        });
        current = bucket_next(granularity, current);
    }
    buckets
}
