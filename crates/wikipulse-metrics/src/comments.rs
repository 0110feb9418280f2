//! Phrase and wiki-link mining over edit summaries.
//!
//! Edit summaries describe what an editor was revising, so counting phrase
//! occurrences across them is a cheap proxy for topical attention (e.g. how
//! often one subject's history mentions the other subject).

use regex::Regex;
use serde::{Deserialize, Serialize};
use wikipulse_core::{RevisionTable, WikipulseError};

/// Phrase-occurrence counts over a table's edit summaries.
///
/// # Examples
///
/// ```
/// use wikipulse_metrics::comments::MentionStats;
///
/// let stats = MentionStats {
///     matching_revisions: 3,
///     total_occurrences: 5,
///     empty_comments: 12,
/// };
/// assert!(stats.total_occurrences >= stats.matching_revisions);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentionStats {
    /// Revisions whose comment contains the phrase at least once.
    pub matching_revisions: usize,
    /// Total occurrences across all comments.
    pub total_occurrences: usize,
    /// Revisions with no comment (or an empty one), reported rather than
    /// silently treated as non-matches.
    pub empty_comments: usize,
}

/// Count case-insensitive whole-word occurrences of `phrase` in comments.
///
/// # Errors
///
/// Returns [`WikipulseError::Pattern`] if the phrase cannot be compiled
/// into a search pattern.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use wikipulse_core::{Editor, RevisionRecord, RevisionTable};
/// use wikipulse_metrics::comments::count_phrase;
///
/// let table = RevisionTable::from_records("A", vec![RevisionRecord {
///     id: 1,
///     timestamp: Utc.with_ymd_and_hms(2021, 1, 5, 0, 0, 0).unwrap(),
///     editor: Editor::Registered { id: 42, name: "alice".into() },
///     byte_delta: Some(10),
///     minor: false,
///     comment: Some("updated Tour dates, tour setlist".into()),
/// }]);
/// let stats = count_phrase(&table, "tour").unwrap();
/// assert_eq!(stats.matching_revisions, 1);
/// assert_eq!(stats.total_occurrences, 2);
/// ```
pub fn count_phrase(table: &RevisionTable, phrase: &str) -> Result<MentionStats, WikipulseError> {
    let pattern = format!(r"(?i)\b{}\b", regex::escape(phrase));
    let re = compile(&pattern)?;

    let mut stats = MentionStats {
        matching_revisions: 0,
        total_occurrences: 0,
        empty_comments: 0,
    };
    for record in &table.records {
        match record.comment.as_deref() {
            None | Some("") => stats.empty_comments += 1,
            Some(comment) => {
                let occurrences = re.find_iter(comment).count();
                if occurrences > 0 {
                    stats.matching_revisions += 1;
                    stats.total_occurrences += occurrences;
                }
            }
        }
    }
    Ok(stats)
}

/// Count revisions whose comment links to `target` through a piped wiki
/// link (`[[Some Page|target]]`), case-insensitively.
///
/// # Errors
///
/// Returns [`WikipulseError::Pattern`] if the target cannot be compiled
/// into a search pattern.
///
/// # Examples
///
/// ```
/// use wikipulse_core::RevisionTable;
/// use wikipulse_metrics::comments::wikilink_mentions;
///
/// let table = RevisionTable::from_records("A", vec![]);
/// assert_eq!(wikilink_mentions(&table, "Louis Tomlinson").unwrap(), 0);
/// ```
pub fn wikilink_mentions(table: &RevisionTable, target: &str) -> Result<usize, WikipulseError> {
    let pattern = format!(r"(?i)\[\[.*?\|{}\]\]", regex::escape(target));
    let re = compile(&pattern)?;

    Ok(table
        .records
        .iter()
        .filter_map(|r| r.comment.as_deref())
        .filter(|c| re.is_match(c))
        .count())
}

fn compile(pattern: &str) -> Result<Regex, WikipulseError> {
    Regex::new(pattern).map_err(|e| WikipulseError::Pattern(format!("{pattern}: {e}")))
}
