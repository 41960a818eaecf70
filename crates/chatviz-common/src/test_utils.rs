//! Test utilities and shared fixtures for chatviz.
//!
//! Available to other crates' tests through the `testing` feature.

use crate::{Comment, CommentTable};
use chrono::{DateTime, TimeZone, Utc};
use std::path::PathBuf;
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging for tests; safe to call from every test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Test fixture for creating a mock timestamp.
pub fn mock_timestamp(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, sec).unwrap()
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Build a cleaned comment directly, bypassing JSON
pub fn comment(
    published_at: Option<DateTime<Utc>>,
    author: &str,
    text: &str,
    like_count: u64,
    source: &str,
) -> Comment {
    Comment {
        published_at,
        like_count,
        debate_number: "4".to_string(),
        author: Some(author.to_string()),
        text: Some(text.to_string()),
        source: Some(source.to_string()),
        date: published_at.map(|ts| ts.date_naive()),
    }
}

/// Small export covering every cleaning path
pub const SAMPLE_EXPORT: &str = r#"[
  {"publishedAt": "2024-01-01T10:00:00Z", "likeCount": "5", "debate_number": 4, "author": "alice", "text": "The economy matters", "Source": "youtube"},
  {"publishedAt": "2024-01-01T10:00:00Z", "likeCount": 12, "debate_number": "4", "author": "bob", "text": "Economy economy jobs", "Source": "youtube"},
  {"publishedAt": "2024-01-01T10:05:00Z", "likeCount": "not_a_number", "debate_number": 4, "author": "alice", "text": "Jobs and healthcare", "Source": "twitch"},
  {"publishedAt": "2024-01-02T09:00:00Z", "likeCount": 3.7, "debate_number": 4, "author": "carol", "text": 42, "Source": "youtube"},
  {"publishedAt": "invalid", "likeCount": null, "debate_number": null, "author": "dave", "text": "healthcare costs", "Source": "facebook"}
]"#;

/// The sample export as a cleaned table
pub fn sample_table() -> CommentTable {
    crate::parse_export(SAMPLE_EXPORT).unwrap()
}

/// Write `content` as an export file inside `dir`
pub fn write_export(dir: &std::path::Path, content: &str) -> PathBuf {
    let path = dir.join(crate::DEFAULT_INPUT_PATH);
    std::fs::write(&path, content).unwrap();
    path
}
