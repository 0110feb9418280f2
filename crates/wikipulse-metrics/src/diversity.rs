//! Editor diversity and contribution concentration.
//!
//! Characterizes how many distinct editors touched a subject's page, how
//! contributions split between registered and anonymous editors, and how
//! concentrated the editing is (top-k share and Gini index). Also flags
//! "superfans" — the small group of editors active on an outsized number of
//! distinct days.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use wikipulse_core::RevisionTable;

/// One editor's contribution to a subject.
///
/// # Examples
///
/// ```
/// use wikipulse_metrics::diversity::EditorActivity;
///
/// let activity = EditorActivity {
///     editor: "alice".into(),
///     edits: 15,
///     share: 0.75,
///     anonymous: false,
/// };
/// assert!(activity.share > 0.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorActivity {
    /// Editor key (account name, or address for anonymous editors).
    pub editor: String,
    /// Number of revisions by this editor.
    pub edits: u32,
    /// `edits / total_edits` for the subject.
    pub share: f64,
    /// Whether the editor is unregistered.
    pub anonymous: bool,
}

/// Summary of editor diversity for one subject.
///
/// # Examples
///
/// ```
/// use wikipulse_metrics::diversity::DiversitySummary;
///
/// let summary = DiversitySummary {
///     subject: "Harry Styles".into(),
///     total_edits: 100,
///     unique_editors: 40,
///     registered_editors: 30,
///     anonymous_editors: 10,
///     anonymous_edits: 18,
///     top_editors: vec![],
///     top_share: 0.42,
///     gini: 0.6,
/// };
/// assert!(summary.unique_editors <= summary.total_edits as usize);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiversitySummary {
    /// Subject the summary was derived from.
    pub subject: String,
    /// Number of valid revisions.
    pub total_edits: u32,
    /// Number of distinct editor keys.
    pub unique_editors: usize,
    /// Distinct registered editors.
    pub registered_editors: usize,
    /// Distinct anonymous editors.
    pub anonymous_editors: usize,
    /// Revisions made by anonymous editors.
    pub anonymous_edits: u32,
    /// The k most active editors, most edits first; ties broken by lexical
    /// order of editor key.
    pub top_editors: Vec<EditorActivity>,
    /// Fraction of all edits made by the editors in `top_editors`.
    pub top_share: f64,
    /// Gini index of the per-editor edit counts (0 = evenly spread,
    /// approaching 1 = dominated by few editors).
    pub gini: f64,
}

/// An editor's daily-activity standing.
///
/// # Examples
///
/// ```
/// use wikipulse_metrics::diversity::Superfan;
///
/// let fan = Superfan {
///     editor: "alice".into(),
///     active_days: 120,
///     is_superfan: true,
/// };
/// assert!(fan.is_superfan);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Superfan {
    /// Editor key.
    pub editor: String,
    /// Distinct days on which the editor made at least one revision.
    pub active_days: u32,
    /// Whether the editor's active-day count reaches the requested quantile.
    pub is_superfan: bool,
}

/// Analyze editor diversity over a revision table.
///
/// An empty table yields a zeroed summary. `top_k` bounds the ranked list;
/// ties are broken by lexical order of editor key so the ranking is
/// deterministic.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use wikipulse_core::{Editor, RevisionRecord, RevisionTable};
/// use wikipulse_metrics::diversity::analyze;
///
/// let record = |id, name: &str| RevisionRecord {
///     id,
///     timestamp: Utc.with_ymd_and_hms(2021, 1, 5, 0, 0, 0).unwrap(),
///     editor: Editor::Registered { id, name: name.into() },
///     byte_delta: Some(10),
///     minor: false,
///     comment: None,
/// };
/// let table = RevisionTable::from_records("A", vec![record(1, "alice"), record(2, "bob")]);
/// let summary = analyze(&table, 5);
/// assert_eq!(summary.unique_editors, 2);
/// ```
pub fn analyze(table: &RevisionTable, top_k: usize) -> DiversitySummary {
    let mut counts: HashMap<&str, (u32, bool)> = HashMap::new();
    let mut anonymous_edits = 0u32;

    for record in &table.records {
        let entry = counts
            .entry(record.editor.key())
            .or_insert((0, record.editor.is_anonymous()));
        entry.0 += 1;
        if record.editor.is_anonymous() {
            anonymous_edits += 1;
        }
    }

    let total_edits = table.len() as u32;
    let unique_editors = counts.len();
    let anonymous_editors = counts.values().filter(|(_, anon)| *anon).count();
    let registered_editors = unique_editors - anonymous_editors;

    let mut ranked: Vec<EditorActivity> = counts
        .into_iter()
        .map(|(editor, (edits, anonymous))| EditorActivity {
            editor: editor.to_string(),
            edits,
            share: if total_edits > 0 {
                f64::from(edits) / f64::from(total_edits)
            } else {
                0.0
            },
            anonymous,
        })
        .collect();
    ranked.sort_by(|a, b| b.edits.cmp(&a.edits).then_with(|| a.editor.cmp(&b.editor)));

    let gini = gini_index(&ranked.iter().map(|a| a.edits).collect::<Vec<_>>());

    ranked.truncate(top_k);
    let top_edits: u32 = ranked.iter().map(|a| a.edits).sum();
    let top_share = if total_edits > 0 {
        f64::from(top_edits) / f64::from(total_edits)
    } else {
        0.0
    };

    DiversitySummary {
        subject: table.subject.clone(),
        total_edits,
        unique_editors,
        registered_editors,
        anonymous_editors,
        anonymous_edits,
        top_editors: ranked,
        top_share,
        gini,
    }
}

/// Flag editors whose distinct-active-day count reaches `quantile` of the
/// per-editor distribution.
///
/// Revisions are first compressed to at most one per editor per day, so an
/// editor hammering a page fifty times in one afternoon counts the same as
/// one quiet daily edit. Result is sorted by active days descending, ties
/// by lexical order of editor key.
///
/// # Examples
///
/// ```
/// use wikipulse_core::RevisionTable;
/// use wikipulse_metrics::diversity::find_superfans;
///
/// let table = RevisionTable::from_records("A", vec![]);
/// assert!(find_superfans(&table, 0.95).is_empty());
/// ```
pub fn find_superfans(table: &RevisionTable, quantile: f64) -> Vec<Superfan> {
    let mut active: HashMap<&str, HashSet<NaiveDate>> = HashMap::new();
    for record in &table.records {
        active
            .entry(record.editor.key())
            .or_default()
            .insert(record.timestamp.date_naive());
    }

    let mut fans: Vec<Superfan> = active
        .into_iter()
        .map(|(editor, days)| Superfan {
            editor: editor.to_string(),
            active_days: days.len() as u32,
            is_superfan: false,
        })
        .collect();

    if fans.is_empty() {
        return fans;
    }

    let mut day_counts: Vec<f64> = fans.iter().map(|f| f64::from(f.active_days)).collect();
    day_counts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let cutoff = quantile_linear(&day_counts, quantile.clamp(0.0, 1.0));

    for fan in &mut fans {
        fan.is_superfan = f64::from(fan.active_days) >= cutoff;
    }

    fans.sort_by(|a, b| {
        b.active_days
            .cmp(&a.active_days)
            .then_with(|| a.editor.cmp(&b.editor))
    });
    fans
}

/// Gini index over per-editor edit counts. 0.0 for empty or uniform input.
fn gini_index(counts: &[u32]) -> f64 {
    let n = counts.len();
    let total: u64 = counts.iter().map(|&c| u64::from(c)).sum();
    if n == 0 || total == 0 {
        return 0.0;
    }

    let mut sorted: Vec<u64> = counts.iter().map(|&c| u64::from(c)).collect();
    sorted.sort_unstable();

    // G = sum_i (2i - n - 1) x_i / (n * sum x), with i starting at 1
    let mut weighted = 0i64;
    for (i, &x) in sorted.iter().enumerate() {
        let coefficient = 2 * (i as i64 + 1) - n as i64 - 1;
        weighted += coefficient * x as i64;
    }
    weighted as f64 / (n as f64 * total as f64)
}

/// Linearly interpolated quantile over sorted values (pandas default).
fn quantile_linear(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let position = q * (n - 1) as f64;
            let lower = position.floor() as usize;
            let upper = position.ceil() as usize;
            let fraction = position - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
        }
    }
}
