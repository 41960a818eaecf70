//! Loading a live-chat JSON export into a cleaned table

use crate::{CommentTable, RawComment, Result};
use std::path::Path;
use tracing::{info, instrument, warn};

/// Default export file name, relative to the working directory
pub const DEFAULT_INPUT_PATH: &str = "debate_4_livechat.json";

/// Parse and clean an export held in memory
pub fn parse_export(content: &str) -> Result<CommentTable> {
    let raw: Vec<RawComment> = serde_json::from_str(content)?;
    Ok(CommentTable::from_raw(&raw))
}

/// Read, parse and clean the export at `path`.
///
/// A missing file or malformed JSON is fatal; row-level problems are not.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_export<P: AsRef<Path>>(path: P) -> Result<CommentTable> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let table = parse_export(&content)?;

    let report = table.report();
    if report.unparsed_timestamps > 0 {
        warn!(
            rows = report.unparsed_timestamps,
            "publishedAt did not parse; rows kept without a date"
        );
    }
    if report.invalid_like_counts > 0 {
        warn!(rows = report.invalid_like_counts, "non-numeric likeCount replaced with 0");
    }
    info!(rows = table.len(), dated = table.dated_len(), "loaded comment export");

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChatvizError;
    use std::io::Write;

    #[test]
    fn test_parse_export_array() {
        let table = parse_export(
            r#"[{"author": "a", "likeCount": 3, "extra": {"nested": true}}, {"author": "b"}]"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.comments()[0].like_count, 3);
    }

    #[test]
    fn test_parse_export_empty_array() {
        let table = parse_export("[]").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let err = parse_export("[{\"author\": ").unwrap_err();
        assert!(matches!(err, ChatvizError::Serialization(_)));
    }

    #[test]
    fn test_non_array_is_fatal() {
        let err = parse_export(r#"{"author": "a"}"#).unwrap_err();
        assert!(matches!(err, ChatvizError::Serialization(_)));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_export(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ChatvizError::Io(_)));
    }

    #[test]
    fn test_load_export_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"publishedAt": "2024-01-01T10:00:00Z", "likeCount": "5", "debate_number": 1}}]"#
        )
        .unwrap();

        let table = load_export(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.comments()[0].debate_number, "1");
    }
}
