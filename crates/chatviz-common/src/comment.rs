//! Live-chat comment records and the cleaning pass that types them

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Offset layouts tried after RFC 3339: colon-less offsets, `Z`, minute precision.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Naive layouts tried last; interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// One element of the exported JSON array, before any typing.
///
/// Every known key is kept as a raw JSON value so that a record with an
/// unexpected type in one column still loads. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawComment {
    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<Value>,
    #[serde(rename = "likeCount", default)]
    pub like_count: Option<Value>,
    #[serde(default)]
    pub debate_number: Option<Value>,
    #[serde(default)]
    pub author: Option<Value>,
    #[serde(default)]
    pub text: Option<Value>,
    #[serde(rename = "Source", default)]
    pub source: Option<Value>,
}

/// A cleaned comment row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    /// Parsed publish time, `None` when unparseable
    pub published_at: Option<DateTime<Utc>>,
    /// Like count, 0 when missing or not numeric
    pub like_count: u64,
    /// Debate identifier as text
    pub debate_number: String,
    pub author: Option<String>,
    /// Comment body; only JSON strings survive
    pub text: Option<String>,
    /// Platform or feed name
    pub source: Option<String>,
    /// UTC calendar date of `published_at`
    pub date: Option<NaiveDate>,
}

/// Tally of the row-level fallbacks taken while cleaning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub rows: usize,
    /// Rows whose `publishedAt` was present but did not parse
    pub unparsed_timestamps: usize,
    /// Rows whose `publishedAt` was absent or null
    pub missing_timestamps: usize,
    /// Rows whose `likeCount` was present but not numeric
    pub invalid_like_counts: usize,
    /// Rows whose `text` was present but not a string
    pub non_string_texts: usize,
}

impl Comment {
    /// Clean a raw record, recording fallbacks in `report`
    pub fn clean(raw: &RawComment, report: &mut CleaningReport) -> Self {
        let published_at = match raw.published_at.as_ref() {
            None => {
                report.missing_timestamps += 1;
                None
            }
            Some(value) => {
                let parsed = parse_timestamp(value);
                if parsed.is_none() {
                    report.unparsed_timestamps += 1;
                    tracing::debug!(value = %value, "unparseable publishedAt");
                }
                parsed
            }
        };

        let like_count = match raw.like_count.as_ref() {
            None => 0,
            Some(value) => coerce_like_count(value).unwrap_or_else(|| {
                report.invalid_like_counts += 1;
                tracing::debug!(value = %value, "non-numeric likeCount, using 0");
                0
            }),
        };

        let text = match raw.text.as_ref() {
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                report.non_string_texts += 1;
                None
            }
            None => None,
        };

        report.rows += 1;

        Self {
            date: published_at.map(|ts| ts.date_naive()),
            published_at,
            like_count,
            debate_number: stringify(raw.debate_number.as_ref()),
            author: label(raw.author.as_ref()),
            text,
            source: label(raw.source.as_ref()),
        }
    }
}

/// Parse a timestamp leniently: RFC 3339, naive date-times, then bare dates
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?.trim();
    if raw.is_empty() {
        return None;
    }

    let with_offset = DateTime::parse_from_rfc3339(raw).ok().or_else(|| {
        OFFSET_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    });
    if let Some(dt) = with_offset {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Coerce a like count. `None` means the value is not numeric at all;
/// numeric values that are negative or not finite clamp to 0.
pub fn coerce_like_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                Some(v)
            } else if n.is_i64() {
                Some(0)
            } else {
                n.as_f64().map(float_to_count)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(v) = s.parse::<u64>() {
                Some(v)
            } else if s.parse::<i64>().is_ok() {
                Some(0)
            } else {
                s.parse::<f64>().ok().map(float_to_count)
            }
        }
        Value::Bool(b) => Some(u64::from(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn float_to_count(v: f64) -> u64 {
    if v.is_finite() && v > 0.0 {
        // `as` truncates toward zero and saturates at u64::MAX
        v as u64
    } else {
        0
    }
}

/// Render any JSON value as text; null and missing become "null"
pub fn stringify(value: Option<&Value>) -> String {
    match value {
        None => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Categorical label: strings kept, scalars stringified, null dropped
fn label(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

/// The cleaned, read-only table every chart reads from
#[derive(Debug, Clone, Default)]
pub struct CommentTable {
    comments: Vec<Comment>,
    report: CleaningReport,
}

impl CommentTable {
    /// Clean raw records in their original order
    pub fn from_raw(raw: &[RawComment]) -> Self {
        let mut report = CleaningReport::default();
        let comments = raw.iter().map(|r| Comment::clean(r, &mut report)).collect();
        Self { comments, report }
    }

    /// Build a table from already-cleaned rows
    pub fn from_comments(comments: Vec<Comment>) -> Self {
        let report = CleaningReport {
            rows: comments.len(),
            ..Default::default()
        };
        Self { comments, report }
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Comment> {
        self.comments.iter()
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn report(&self) -> &CleaningReport {
        &self.report
    }

    /// Number of rows that have a derived date
    pub fn dated_len(&self) -> usize {
        self.comments.iter().filter(|c| c.date.is_some()).count()
    }
}

impl<'a> IntoIterator for &'a CommentTable {
    type Item = &'a Comment;
    type IntoIter = std::slice::Iter<'a, Comment>;

    fn into_iter(self) -> Self::IntoIter {
        self.comments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use serde_json::json;

    fn raw(value: Value) -> RawComment {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_clean_reference_record() {
        let mut report = CleaningReport::default();
        let comment = Comment::clean(
            &raw(json!({
                "publishedAt": "2024-01-01T10:00:00Z",
                "likeCount": "5",
                "debate_number": 1,
                "author": "alice",
                "text": "hello world",
                "Source": "youtube"
            })),
            &mut report,
        );

        assert_eq!(comment.like_count, 5);
        assert_eq!(comment.debate_number, "1");
        assert_eq!(comment.date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(
            comment.published_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(comment.author.as_deref(), Some("alice"));
        assert_eq!(comment.source.as_deref(), Some("youtube"));
        assert_eq!(report.rows, 1);
        assert_eq!(report.invalid_like_counts, 0);
    }

    #[test]
    fn test_invalid_like_count_becomes_zero() {
        let mut report = CleaningReport::default();
        let comment = Comment::clean(&raw(json!({"likeCount": "not_a_number"})), &mut report);
        assert_eq!(comment.like_count, 0);
        assert_eq!(report.invalid_like_counts, 1);
    }

    #[test]
    fn test_invalid_timestamp_is_kept_without_date() {
        let mut report = CleaningReport::default();
        let comment = Comment::clean(&raw(json!({"publishedAt": "invalid", "author": "bob"})), &mut report);
        assert!(comment.published_at.is_none());
        assert!(comment.date.is_none());
        assert_eq!(comment.author.as_deref(), Some("bob"));
        assert_eq!(report.unparsed_timestamps, 1);
        assert_eq!(report.missing_timestamps, 0);
    }

    #[test]
    fn test_like_count_coercion_variants() {
        assert_eq!(coerce_like_count(&json!(12)), Some(12));
        assert_eq!(coerce_like_count(&json!(-3)), Some(0));
        assert_eq!(coerce_like_count(&json!(7.9)), Some(7));
        assert_eq!(coerce_like_count(&json!(" 42 ")), Some(42));
        assert_eq!(coerce_like_count(&json!("3.5")), Some(3));
        assert_eq!(coerce_like_count(&json!("-8")), Some(0));
        assert_eq!(coerce_like_count(&json!("NaN")), Some(0));
        assert_eq!(coerce_like_count(&json!(true)), Some(1));
        assert_eq!(coerce_like_count(&json!("")), None);
        assert_eq!(coerce_like_count(&json!([1])), None);
    }

    #[test]
    fn test_timestamp_formats() {
        let offset = parse_timestamp(&json!("2024-03-05T23:30:00-02:00")).unwrap();
        assert_eq!(offset.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());

        let spaced = parse_timestamp(&json!("2024-03-05 08:15:30.250")).unwrap();
        assert_eq!(spaced.hour(), 8);

        let bare = parse_timestamp(&json!("2024-03-05")).unwrap();
        assert_eq!(bare.hour(), 0);

        let ten = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        for raw in [
            "2024-01-01T10:00Z",
            "2024-01-01T10:00+00:00",
            "2024-01-01T10:00:00+0000",
            "2024-01-01T12:00:00.000+0200",
            "2024-01-01 10:00:00+00:00",
            "2024-01-01T10:00",
            "2024-01-01 10:00",
        ] {
            assert_eq!(parse_timestamp(&json!(raw)), Some(ten), "{raw}");
        }

        assert!(parse_timestamp(&json!(1_700_000_000)).is_none());
        assert!(parse_timestamp(&json!("  ")).is_none());
    }

    #[test]
    fn test_debate_number_stringification() {
        assert_eq!(stringify(Some(&json!(4))), "4");
        assert_eq!(stringify(Some(&json!("4b"))), "4b");
        assert_eq!(stringify(Some(&json!(4.5))), "4.5");
        assert_eq!(stringify(Some(&json!(false))), "false");
        assert_eq!(stringify(None), "null");
    }

    #[test]
    fn test_non_string_text_dropped() {
        let mut report = CleaningReport::default();
        let comment = Comment::clean(&raw(json!({"text": 17})), &mut report);
        assert!(comment.text.is_none());
        assert_eq!(report.non_string_texts, 1);
    }

    #[test]
    fn test_table_preserves_order_and_counts_dates() {
        let rows = vec![
            raw(json!({"publishedAt": "2024-01-01T00:00:00Z", "author": "a"})),
            raw(json!({"publishedAt": "bogus", "author": "b"})),
            raw(json!({"author": "c"})),
        ];
        let table = CommentTable::from_raw(&rows);

        assert_eq!(table.len(), 3);
        assert_eq!(table.dated_len(), 1);
        let authors: Vec<_> = table.iter().filter_map(|c| c.author.as_deref()).collect();
        assert_eq!(authors, ["a", "b", "c"]);
        assert_eq!(table.report().missing_timestamps, 1);
        assert_eq!(table.report().unparsed_timestamps, 1);
    }
}
