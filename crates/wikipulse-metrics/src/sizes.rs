//! Edit-size distribution profiling.
//!
//! Summarizes the byte-delta distribution of a revision table: central
//! tendency, spread, and the grow/shrink/no-op split. Records without a
//! byte delta are excluded from the numeric aggregates and reported via a
//! separate missing count, never coerced to zero.

use serde::{Deserialize, Serialize};
use wikipulse_core::RevisionTable;

/// Byte-delta distribution summary for one subject.
///
/// # Examples
///
/// ```
/// use wikipulse_metrics::sizes::SizeProfile;
///
/// let profile = SizeProfile {
///     subject: "Harry Styles".into(),
///     sampled: 10,
///     missing: 2,
///     mean: 14.5,
///     median: 6.0,
///     variance: 120.25,
///     negative: 3,
///     zero: 1,
///     positive: 6,
///     negative_share: 0.3,
///     zero_share: 0.1,
///     positive_share: 0.6,
///     minor_edits: 4,
/// };
/// assert_eq!(profile.sampled, profile.negative + profile.zero + profile.positive);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeProfile {
    /// Subject the profile was derived from.
    pub subject: String,
    /// Records with a byte delta, i.e. the sample behind the numeric fields.
    pub sampled: usize,
    /// Records without a byte delta, excluded from the numbers below.
    pub missing: usize,
    /// Mean byte delta (0.0 when nothing was sampled).
    pub mean: f64,
    /// Median byte delta (0.0 when nothing was sampled).
    pub median: f64,
    /// Population variance of the byte deltas.
    pub variance: f64,
    /// Sampled records that shrank the page.
    pub negative: usize,
    /// Sampled records with a zero delta.
    pub zero: usize,
    /// Sampled records that grew the page.
    pub positive: usize,
    /// `negative / sampled` (0.0 when nothing was sampled).
    pub negative_share: f64,
    /// `zero / sampled` (0.0 when nothing was sampled).
    pub zero_share: f64,
    /// `positive / sampled` (0.0 when nothing was sampled).
    pub positive_share: f64,
    /// Records flagged as minor edits (counted over the whole table).
    pub minor_edits: usize,
}

/// Profile the byte-delta distribution of a revision table.
///
/// An empty table (or one where every delta is missing) yields a zeroed
/// profile rather than an error.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use wikipulse_core::{Editor, RevisionRecord, RevisionTable};
/// use wikipulse_metrics::sizes::profile;
///
/// let record = |id, delta| RevisionRecord {
///     id,
///     timestamp: Utc.with_ymd_and_hms(2021, 1, 5, 0, 0, 0).unwrap(),
///     editor: Editor::Registered { id: 42, name: "alice".into() },
///     byte_delta: delta,
///     minor: false,
///     comment: None,
/// };
/// let table = RevisionTable::from_records("A", vec![
///     record(1, Some(50)),
///     record(2, Some(-10)),
///     record(3, None),
/// ]);
/// let p = profile(&table);
/// assert_eq!(p.sampled, 2);
/// assert_eq!(p.missing, 1);
/// assert_eq!(p.mean, 20.0);
/// ```
pub fn profile(table: &RevisionTable) -> SizeProfile {
    let deltas: Vec<i64> = table
        .records
        .iter()
        .filter_map(|r| r.byte_delta)
        .collect();
    let missing = table.len() - deltas.len();
    let minor_edits = table.records.iter().filter(|r| r.minor).count();

    let negative = deltas.iter().filter(|&&d| d < 0).count();
    let zero = deltas.iter().filter(|&&d| d == 0).count();
    let positive = deltas.iter().filter(|&&d| d > 0).count();
    let share = |count: usize| {
        if deltas.is_empty() {
            0.0
        } else {
            count as f64 / deltas.len() as f64
        }
    };

    let (mean, median, variance) = if deltas.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let n = deltas.len() as f64;
        let mean = deltas.iter().map(|&d| d as f64).sum::<f64>() / n;
        let variance = deltas
            .iter()
            .map(|&d| {
                let diff = d as f64 - mean;
                diff * diff
            })
            .sum::<f64>()
            / n;
        (mean, median_of(&deltas), variance)
    };

    SizeProfile {
        subject: table.subject.clone(),
        sampled: deltas.len(),
        missing,
        mean,
        median,
        variance,
        negative,
        zero,
        positive,
        negative_share: share(negative),
        zero_share: share(zero),
        positive_share: share(positive),
        minor_edits,
    }
}

/// Median of a nonempty slice; averages the middle pair for even lengths.
fn median_of(deltas: &[i64]) -> f64 {
    let mut sorted = deltas.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid] as f64
    } else {
        (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
    }
}
