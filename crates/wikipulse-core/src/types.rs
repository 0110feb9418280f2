//! Revision data model and the validating input boundary.
//!
//! External loaders hand over loosely typed rows ([`RawRevision`]); this
//! module converts them into the typed [`RevisionRecord`] schema exactly
//! once, counting rather than propagating per-row failures.

use std::net::IpAddr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// The identity behind a revision.
///
/// MediaWiki records unregistered editors under their network address and
/// reports a user id of 0 for them; registered editors carry a nonzero id
/// and an account name.
///
/// # Examples
///
/// ```
/// use wikipulse_core::Editor;
///
/// let alice = Editor::Registered { id: 42, name: "alice".into() };
/// let anon = Editor::Anonymous { address: "203.0.113.7".into() };
/// assert!(!alice.is_anonymous());
/// assert!(anon.is_anonymous());
/// assert_eq!(alice.key(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Editor {
    /// An editor with a registered account.
    Registered {
        /// MediaWiki user id (nonzero).
        id: u64,
        /// Account name.
        name: String,
    },
    /// An unregistered editor, known only by network address.
    Anonymous {
        /// IPv4 or IPv6 address as recorded in the history.
        address: String,
    },
}

impl Editor {
    /// The identifier used to group revisions by editor: the account name
    /// for registered editors, the address for anonymous ones.
    pub fn key(&self) -> &str {
        match self {
            Editor::Registered { name, .. } => name,
            Editor::Anonymous { address } => address,
        }
    }

    /// Whether this editor is unregistered.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Editor::Anonymous { .. })
    }
}

/// One edit event in a subject's revision history.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use wikipulse_core::{Editor, RevisionRecord};
///
/// let rec = RevisionRecord {
///     id: 1001,
///     timestamp: Utc.with_ymd_and_hms(2021, 1, 5, 12, 0, 0).unwrap(),
///     editor: Editor::Registered { id: 42, name: "alice".into() },
///     byte_delta: Some(50),
///     minor: false,
///     comment: Some("added discography section".into()),
/// };
/// assert_eq!(rec.byte_delta, Some(50));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionRecord {
    /// Revision id, unique within a subject's history.
    pub id: u64,
    /// When the edit was made (UTC).
    pub timestamp: DateTime<Utc>,
    /// Who made the edit.
    pub editor: Editor,
    /// Change in page size in bytes. `None` when the source row carried no
    /// delta; such records stay in the table but are excluded from numeric
    /// size aggregates and reported separately.
    pub byte_delta: Option<i64>,
    /// Whether the edit was flagged as minor.
    pub minor: bool,
    /// Free-text edit summary, if any.
    pub comment: Option<String>,
}

/// A loosely typed revision row as supplied by an external loader.
///
/// Everything is optional and string-typed where the storage format is
/// untrustworthy; [`RevisionTable::from_raw`] does the one-time conversion
/// into [`RevisionRecord`].
///
/// # Examples
///
/// ```
/// use wikipulse_core::RawRevision;
///
/// let raw: RawRevision = serde_json::from_str(r#"{
///     "revisionId": 1001,
///     "timestamp": "2021-01-05T12:00:00Z",
///     "editorId": 42,
///     "editorName": "alice",
///     "byteDelta": "50",
///     "minor": false
/// }"#).unwrap();
/// assert_eq!(raw.editor_name.as_deref(), Some("alice"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRevision {
    /// Revision id.
    pub revision_id: Option<u64>,
    /// Timestamp text: RFC 3339, `YYYY-MM-DD HH:MM:SS`, or bare `YYYY-MM-DD`.
    pub timestamp: Option<String>,
    /// MediaWiki user id; 0 or absent for anonymous editors.
    pub editor_id: Option<u64>,
    /// Account name, or network address for anonymous editors.
    pub editor_name: Option<String>,
    /// Byte delta text; may be absent.
    pub byte_delta: Option<String>,
    /// Minor-edit flag; absent means not minor.
    #[serde(default)]
    pub minor: bool,
    /// Edit summary.
    pub comment: Option<String>,
}

/// Counts of rows dropped at the validation boundary, by failure kind.
///
/// # Examples
///
/// ```
/// use wikipulse_core::SkippedRows;
///
/// let skipped = SkippedRows { missing_field: 2, type_mismatch: 1 };
/// assert_eq!(skipped.total(), 3);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRows {
    /// Rows missing a required field (timestamp or editor identity).
    pub missing_field: usize,
    /// Rows with a field present but not coercible (bad timestamp or
    /// non-numeric byte delta).
    pub type_mismatch: usize,
}

impl SkippedRows {
    /// Total rows excluded from the table.
    pub fn total(&self) -> usize {
        self.missing_field + self.type_mismatch
    }
}

/// The full revision history of one subject, sorted and validated.
///
/// Records are ordered by timestamp (ties broken by revision id) at
/// construction; metric functions may rely on that ordering. The table also
/// carries the [`SkippedRows`] tally from validation so that derived metrics
/// can surface how much input was discarded.
///
/// # Examples
///
/// ```
/// use wikipulse_core::{RawRevision, RevisionTable};
///
/// let rows = vec![
///     RawRevision {
///         revision_id: Some(1),
///         timestamp: Some("2021-01-05T12:00:00Z".into()),
///         editor_id: Some(42),
///         editor_name: Some("alice".into()),
///         byte_delta: Some("50".into()),
///         ..RawRevision::default()
///     },
///     RawRevision::default(), // no timestamp, no editor: skipped
/// ];
/// let table = RevisionTable::from_raw("Harry Styles", &rows);
/// assert_eq!(table.records.len(), 1);
/// assert_eq!(table.skipped.missing_field, 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionTable {
    /// The subject (page title) all records belong to.
    pub subject: String,
    /// Validated records in chronological order.
    pub records: Vec<RevisionRecord>,
    /// Rows excluded during validation.
    pub skipped: SkippedRows,
}

impl RevisionTable {
    /// Build a table from already-typed records, enforcing chronological
    /// order.
    pub fn from_records(subject: impl Into<String>, mut records: Vec<RevisionRecord>) -> Self {
        records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Self {
            subject: subject.into(),
            records,
            skipped: SkippedRows::default(),
        }
    }

    /// Validate loose loader rows into a typed table.
    ///
    /// Per-row failures never abort the conversion: a row missing its
    /// timestamp or editor identity, or carrying an unparseable timestamp
    /// or byte delta, is dropped and counted in [`SkippedRows`]. A row with
    /// no byte delta at all is kept with `byte_delta = None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wikipulse_core::{RawRevision, RevisionTable};
    ///
    /// let rows = vec![RawRevision {
    ///     revision_id: Some(7),
    ///     timestamp: Some("not a date".into()),
    ///     editor_name: Some("alice".into()),
    ///     editor_id: Some(42),
    ///     ..RawRevision::default()
    /// }];
    /// let table = RevisionTable::from_raw("Louis Tomlinson", &rows);
    /// assert!(table.records.is_empty());
    /// assert_eq!(table.skipped.type_mismatch, 1);
    /// ```
    pub fn from_raw(subject: impl Into<String>, rows: &[RawRevision]) -> Self {
        let mut records = Vec::with_capacity(rows.len());
        let mut skipped = SkippedRows::default();

        for row in rows {
            let Some(ts_text) = row.timestamp.as_deref() else {
                skipped.missing_field += 1;
                continue;
            };
            let Some(timestamp) = parse_timestamp(ts_text) else {
                skipped.type_mismatch += 1;
                continue;
            };

            let Some(editor) = resolve_editor(row) else {
                skipped.missing_field += 1;
                continue;
            };

            let byte_delta = match row.byte_delta.as_deref() {
                None => None,
                Some(text) => match text.trim().parse::<i64>() {
                    Ok(delta) => Some(delta),
                    Err(_) => {
                        skipped.type_mismatch += 1;
                        continue;
                    }
                },
            };

            records.push(RevisionRecord {
                id: row.revision_id.unwrap_or(0),
                timestamp,
                editor,
                byte_delta,
                minor: row.minor,
                comment: row.comment.clone(),
            });
        }

        let mut table = Self::from_records(subject, records);
        table.skipped = skipped;
        table
    }

    /// Number of validated records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no validated records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse a loader timestamp.
///
/// Accepts RFC 3339 (the MediaWiki API format), `YYYY-MM-DD HH:MM:SS`, and
/// bare dates (taken as midnight UTC).
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

/// Classify a row's editor identity.
///
/// Anonymous when the name parses as an IP address (IPv4 or IPv6, the two
/// forms MediaWiki uses for unregistered editors) or the user id is 0 or
/// absent. A row with neither name nor id has no identity at all.
fn resolve_editor(row: &RawRevision) -> Option<Editor> {
    match (&row.editor_name, row.editor_id) {
        (Some(name), id) => {
            let anonymous = name.parse::<IpAddr>().is_ok() || id.unwrap_or(0) == 0;
            if anonymous {
                Some(Editor::Anonymous {
                    address: name.clone(),
                })
            } else {
                Some(Editor::Registered {
                    id: id.unwrap_or(0),
                    name: name.clone(),
                })
            }
        }
        (None, _) => None,
    }
}

/// Time-bucket width for temporal aggregation.
///
/// # Examples
///
/// ```
/// use wikipulse_core::Granularity;
///
/// let g: Granularity = serde_json::from_str("\"month\"").unwrap();
/// assert_eq!(g, Granularity::Month);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per calendar day.
    Day,
    /// One bucket per calendar month.
    #[default]
    Month,
    /// One bucket per calendar year.
    Year,
}

/// What to aggregate per bucket.
///
/// # Examples
///
/// ```
/// use wikipulse_core::ValueSelector;
///
/// assert_eq!(ValueSelector::default(), ValueSelector::EditCount);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueSelector {
    /// Number of revisions in the bucket.
    #[default]
    EditCount,
    /// Sum of byte deltas in the bucket (missing deltas contribute nothing).
    ByteDeltaSum,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(ts: &str, name: &str, id: Option<u64>, delta: Option<&str>) -> RawRevision {
        RawRevision {
            revision_id: Some(1),
            timestamp: Some(ts.into()),
            editor_id: id,
            editor_name: Some(name.into()),
            byte_delta: delta.map(Into::into),
            minor: false,
            comment: None,
        }
    }

    #[test]
    fn rfc3339_and_plain_formats_parse() {
        assert!(parse_timestamp("2021-01-05T12:00:00Z").is_some());
        assert!(parse_timestamp("2021-01-05 12:00:00").is_some());
        assert!(parse_timestamp("2021-01-05").is_some());
        assert!(parse_timestamp("Jan 5 2021").is_none());
    }

    #[test]
    fn ip_named_editors_are_anonymous() {
        let v4 = raw("2021-01-05", "203.0.113.7", Some(0), None);
        let v6 = raw("2021-01-05", "2001:db8::1", None, None);
        let registered = raw("2021-01-05", "alice", Some(42), None);

        assert!(resolve_editor(&v4).unwrap().is_anonymous());
        assert!(resolve_editor(&v6).unwrap().is_anonymous());
        assert!(!resolve_editor(&registered).unwrap().is_anonymous());
    }

    #[test]
    fn zero_user_id_is_anonymous() {
        let row = raw("2021-01-05", "somename", Some(0), None);
        assert!(resolve_editor(&row).unwrap().is_anonymous());
    }

    #[test]
    fn missing_fields_are_counted_not_fatal() {
        let rows = vec![
            raw("2021-01-05T12:00:00Z", "alice", Some(42), Some("50")),
            RawRevision {
                timestamp: None,
                ..raw("x", "bob", Some(7), None)
            },
            RawRevision {
                editor_name: None,
                ..raw("2021-01-06T12:00:00Z", "x", None, None)
            },
        ];
        let table = RevisionTable::from_raw("A", &rows);
        assert_eq!(table.len(), 1);
        assert_eq!(table.skipped.missing_field, 2);
        assert_eq!(table.skipped.total(), 2);
    }

    #[test]
    fn bad_byte_delta_is_type_mismatch() {
        let rows = vec![
            raw("2021-01-05T12:00:00Z", "alice", Some(42), Some("fifty")),
            raw("2021-01-06T12:00:00Z", "alice", Some(42), None),
        ];
        let table = RevisionTable::from_raw("A", &rows);
        assert_eq!(table.len(), 1);
        assert_eq!(table.skipped.type_mismatch, 1);
        // absent delta stays, as None
        assert_eq!(table.records[0].byte_delta, None);
    }

    #[test]
    fn records_are_sorted_by_timestamp_then_id() {
        let mut later = raw("2021-02-01T00:00:00Z", "bob", Some(7), None);
        later.revision_id = Some(9);
        let mut earlier = raw("2021-01-01T00:00:00Z", "alice", Some(42), None);
        earlier.revision_id = Some(3);
        let mut tie = raw("2021-01-01T00:00:00Z", "carol", Some(8), None);
        tie.revision_id = Some(2);

        let table = RevisionTable::from_raw("A", &[later, earlier, tie]);
        let ids: Vec<u64> = table.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 9]);
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let table = RevisionTable::from_raw("A", &[]);
        assert!(table.is_empty());
        assert_eq!(table.skipped.total(), 0);
    }

    #[test]
    fn raw_revision_roundtrips_camel_case() {
        let json = r#"{"revisionId":5,"timestamp":"2021-01-05","editorId":0,"editorName":"198.51.100.3","byteDelta":"-12","minor":true,"comment":"rm vandalism"}"#;
        let raw: RawRevision = serde_json::from_str(json).unwrap();
        let table = RevisionTable::from_raw("A", &[raw]);
        let rec = &table.records[0];
        assert!(rec.editor.is_anonymous());
        assert_eq!(rec.byte_delta, Some(-12));
        assert!(rec.minor);
    }
}
