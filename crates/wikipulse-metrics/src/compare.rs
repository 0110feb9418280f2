//! Cross-subject alignment of derived metrics.
//!
//! Pairs two subjects' series on a shared key set so that side-by-side
//! plots compare like with like. Missing keys on either side are filled
//! with zero, never dropped — dropping them would bias the visual
//! comparison toward whichever subject has the denser history.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use wikipulse_core::{Granularity, RevisionTable, ValueSelector, WikipulseError};

use crate::temporal::{self, BucketSeries};

/// One aligned key with both subjects' values.
///
/// # Examples
///
/// ```
/// use wikipulse_metrics::compare::ComparisonRow;
///
/// let row = ComparisonRow { key: "2021-01".into(), left: 2, right: 0 };
/// assert_eq!(row.right, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    /// Shared bucket or category key.
    pub key: String,
    /// Value for the left subject.
    pub left: i64,
    /// Value for the right subject.
    pub right: i64,
}

/// Two subjects' bucket series aligned on one gap-free key set.
///
/// # Examples
///
/// ```
/// use wikipulse_core::{Granularity, ValueSelector};
/// use wikipulse_metrics::compare::SeriesComparison;
///
/// let comparison = SeriesComparison {
///     left_subject: "Harry Styles".into(),
///     right_subject: "Louis Tomlinson".into(),
///     granularity: Granularity::Month,
///     selector: ValueSelector::EditCount,
///     rows: vec![],
/// };
/// assert!(comparison.rows.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesComparison {
    /// Subject behind the `left` column.
    pub left_subject: String,
    /// Subject behind the `right` column.
    pub right_subject: String,
    /// Bucket width shared by both sides.
    pub granularity: Granularity,
    /// Aggregate shared by both sides.
    pub selector: ValueSelector,
    /// Aligned rows in chronological order, no gaps across the combined span.
    pub rows: Vec<ComparisonRow>,
}

/// Two subjects' per-category counts aligned on the key union.
///
/// # Examples
///
/// ```
/// use wikipulse_metrics::compare::CategoryComparison;
///
/// let comparison = CategoryComparison {
///     left_subject: "A".into(),
///     right_subject: "B".into(),
///     rows: vec![],
/// };
/// assert!(comparison.rows.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryComparison {
    /// Subject behind the `left` column.
    pub left_subject: String,
    /// Subject behind the `right` column.
    pub right_subject: String,
    /// Aligned rows, combined count descending, ties lexical by key.
    pub rows: Vec<ComparisonRow>,
}

/// Align two already-aggregated bucket series.
///
/// # Errors
///
/// Returns [`WikipulseError::MetricMismatch`] when the two series were
/// built with different granularities or selectors — comparing those is a
/// usage error, surfaced immediately rather than papered over.
///
/// # Examples
///
/// ```
/// use wikipulse_core::{Granularity, RevisionTable, ValueSelector};
/// use wikipulse_metrics::compare::compare_series;
/// use wikipulse_metrics::temporal::aggregate;
///
/// let a = aggregate(&RevisionTable::from_records("A", vec![]), Granularity::Month, ValueSelector::EditCount);
/// let b = aggregate(&RevisionTable::from_records("B", vec![]), Granularity::Day, ValueSelector::EditCount);
/// assert!(compare_series(&a, &b).is_err());
/// ```
pub fn compare_series(
    left: &BucketSeries,
    right: &BucketSeries,
) -> Result<SeriesComparison, WikipulseError> {
    if left.granularity != right.granularity {
        return Err(WikipulseError::MetricMismatch(format!(
            "granularity {:?} vs {:?}",
            left.granularity, right.granularity
        )));
    }
    if left.selector != right.selector {
        return Err(WikipulseError::MetricMismatch(format!(
            "selector {:?} vs {:?}",
            left.selector, right.selector
        )));
    }
    Ok(align(left, right))
}

/// Aggregate two tables with the same metric and align the results.
///
/// Same-metric by construction, so this cannot mismatch.
///
/// # Examples
///
/// ```
/// use wikipulse_core::{Granularity, RevisionTable, ValueSelector};
/// use wikipulse_metrics::compare::compare_tables;
///
/// let a = RevisionTable::from_records("A", vec![]);
/// let b = RevisionTable::from_records("B", vec![]);
/// let comparison = compare_tables(&a, &b, Granularity::Month, ValueSelector::EditCount);
/// assert!(comparison.rows.is_empty());
/// ```
pub fn compare_tables(
    left: &RevisionTable,
    right: &RevisionTable,
    granularity: Granularity,
    selector: ValueSelector,
) -> SeriesComparison {
    let left_series = temporal::aggregate(left, granularity, selector);
    let right_series = temporal::aggregate(right, granularity, selector);
    align(&left_series, &right_series)
}

/// Align two subjects' per-editor edit counts on the editor-key union.
///
/// Rows are sorted by combined count descending, ties lexical, so the most
/// contested editors come first.
///
/// # Examples
///
/// ```
/// use wikipulse_core::RevisionTable;
/// use wikipulse_metrics::compare::compare_editor_counts;
///
/// let a = RevisionTable::from_records("A", vec![]);
/// let b = RevisionTable::from_records("B", vec![]);
/// assert!(compare_editor_counts(&a, &b).rows.is_empty());
/// ```
pub fn compare_editor_counts(left: &RevisionTable, right: &RevisionTable) -> CategoryComparison {
    let mut merged: HashMap<&str, (i64, i64)> = HashMap::new();
    for record in &left.records {
        merged.entry(record.editor.key()).or_default().0 += 1;
    }
    for record in &right.records {
        merged.entry(record.editor.key()).or_default().1 += 1;
    }

    let mut rows: Vec<ComparisonRow> = merged
        .into_iter()
        .map(|(key, (l, r))| ComparisonRow {
            key: key.to_string(),
            left: l,
            right: r,
        })
        .collect();
    rows.sort_by(|a, b| {
        (b.left + b.right)
            .cmp(&(a.left + a.right))
            .then_with(|| a.key.cmp(&b.key))
    });

    CategoryComparison {
        left_subject: left.subject.clone(),
        right_subject: right.subject.clone(),
        rows,
    }
}

/// Zero-fill both series over their combined bucket span.
///
/// Walks from the earliest bucket either side observed to the latest, so
/// the aligned key set stays gap-free even when the two observed ranges
/// are disjoint.
fn align(left: &BucketSeries, right: &BucketSeries) -> SeriesComparison {
    let left_values: HashMap<_, _> = left.buckets.iter().map(|b| (b.start, b.value)).collect();
    let right_values: HashMap<_, _> = right.buckets.iter().map(|b| (b.start, b.value)).collect();

    let starts = left
        .buckets
        .first()
        .into_iter()
        .chain(right.buckets.first())
        .map(|b| b.start);
    let ends = left
        .buckets
        .last()
        .into_iter()
        .chain(right.buckets.last())
        .map(|b| b.start);

    let rows = match (starts.min(), ends.max()) {
        (Some(start), Some(end)) => {
            let mut rows = Vec::new();
            let mut current = start;
            while current <= end {
                rows.push(ComparisonRow {
                    key: temporal::label(left.granularity, current),
                    left: left_values.get(&current).copied().unwrap_or(0),
                    right: right_values.get(&current).copied().unwrap_or(0),
                });
                current = temporal::bucket_next(left.granularity, current);
            }
            rows
        }
        _ => Vec::new(),
    };

    SeriesComparison {
        left_subject: left.subject.clone(),
        right_subject: right.subject.clone(),
        granularity: left.granularity,
        selector: left.selector,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use wikipulse_core::{Editor, RevisionRecord};

    fn make_record(id: u64, ts: &str, editor: &str) -> RevisionRecord {
        RevisionRecord {
            id,
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S")
                .expect("test timestamp")
                .and_utc(),
            editor: Editor::Registered {
                id: 42,
                name: editor.into(),
            },
            byte_delta: Some(10),
            minor: false,
            comment: None,
        }
    }

    #[test]
    fn two_empty_tables_compare_to_empty_key_set() {
        let a = RevisionTable::from_records("A", vec![]);
        let b = RevisionTable::from_records("B", vec![]);
        let comparison = compare_tables(&a, &b, Granularity::Month, ValueSelector::EditCount);
        assert!(comparison.rows.is_empty());
        assert_eq!(comparison.left_subject, "A");
        assert_eq!(comparison.right_subject, "B");
    }

    #[test]
    fn union_keys_are_zero_filled_on_the_quiet_side() {
        let a = RevisionTable::from_records(
            "A",
            vec![
                make_record(1, "2021-01-05 12:00:00", "alice"),
                make_record(2, "2021-01-20 12:00:00", "bob"),
            ],
        );
        let b = RevisionTable::from_records(
            "B",
            vec![make_record(3, "2021-02-01 12:00:00", "alice")],
        );
        let comparison = compare_tables(&a, &b, Granularity::Month, ValueSelector::EditCount);

        let keys: Vec<&str> = comparison.rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["2021-01", "2021-02"]);
        assert_eq!(comparison.rows[0].left, 2);
        assert_eq!(comparison.rows[0].right, 0);
        assert_eq!(comparison.rows[1].left, 0);
        assert_eq!(comparison.rows[1].right, 1);
    }

    #[test]
    fn disjoint_spans_stay_gap_free() {
        let a = RevisionTable::from_records(
            "A",
            vec![make_record(1, "2021-01-05 12:00:00", "alice")],
        );
        let b = RevisionTable::from_records(
            "B",
            vec![make_record(2, "2021-04-05 12:00:00", "bob")],
        );
        let comparison = compare_tables(&a, &b, Granularity::Month, ValueSelector::EditCount);

        let keys: Vec<&str> = comparison.rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["2021-01", "2021-02", "2021-03", "2021-04"]);
        assert_eq!(comparison.rows[1].left, 0);
        assert_eq!(comparison.rows[1].right, 0);
    }

    #[test]
    fn one_empty_side_keeps_the_other_side_whole() {
        let a = RevisionTable::from_records(
            "A",
            vec![
                make_record(1, "2021-01-05 12:00:00", "alice"),
                make_record(2, "2021-03-05 12:00:00", "alice"),
            ],
        );
        let b = RevisionTable::from_records("B", vec![]);
        let comparison = compare_tables(&a, &b, Granularity::Month, ValueSelector::EditCount);

        assert_eq!(comparison.rows.len(), 3);
        assert!(comparison.rows.iter().all(|r| r.right == 0));
        let left_total: i64 = comparison.rows.iter().map(|r| r.left).sum();
        assert_eq!(left_total, 2);
    }

    #[test]
    fn mismatched_granularity_fails_fast() {
        let table = RevisionTable::from_records("A", vec![]);
        let monthly = temporal::aggregate(&table, Granularity::Month, ValueSelector::EditCount);
        let daily = temporal::aggregate(&table, Granularity::Day, ValueSelector::EditCount);
        let err = compare_series(&monthly, &daily).unwrap_err();
        assert!(err.to_string().contains("metric mismatch"));
    }

    #[test]
    fn mismatched_selector_fails_fast() {
        let table = RevisionTable::from_records("A", vec![]);
        let counts = temporal::aggregate(&table, Granularity::Month, ValueSelector::EditCount);
        let churn = temporal::aggregate(&table, Granularity::Month, ValueSelector::ByteDeltaSum);
        assert!(compare_series(&counts, &churn).is_err());
    }

    #[test]
    fn editor_counts_union_with_zero_fill() {
        let a = RevisionTable::from_records(
            "A",
            vec![
                make_record(1, "2021-01-05 12:00:00", "alice"),
                make_record(2, "2021-01-06 12:00:00", "alice"),
                make_record(3, "2021-01-07 12:00:00", "bob"),
            ],
        );
        let b = RevisionTable::from_records(
            "B",
            vec![make_record(4, "2021-01-05 12:00:00", "carol")],
        );
        let comparison = compare_editor_counts(&a, &b);

        assert_eq!(comparison.rows.len(), 3);
        assert_eq!(comparison.rows[0].key, "alice");
        assert_eq!(comparison.rows[0].left, 2);
        assert_eq!(comparison.rows[0].right, 0);
        // bob and carol tie on combined count; lexical order decides
        assert_eq!(comparison.rows[1].key, "bob");
        assert_eq!(comparison.rows[2].key, "carol");
        assert_eq!(comparison.rows[2].right, 1);
    }

    #[test]
    fn comparison_is_deterministic() {
        let a = RevisionTable::from_records(
            "A",
            vec![make_record(1, "2021-01-05 12:00:00", "alice")],
        );
        let b = RevisionTable::from_records(
            "B",
            vec![make_record(2, "2021-02-05 12:00:00", "bob")],
        );
        let first = compare_tables(&a, &b, Granularity::Month, ValueSelector::EditCount);
        let second = compare_tables(&a, &b, Granularity::Month, ValueSelector::EditCount);
        assert_eq!(first, second);
    }
}
