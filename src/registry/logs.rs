//! Usage-log filtering.
//!
//! The Quay logs endpoint returns heterogeneous event records. This module
//! narrows them down to attributable pull events: `pull_repo` records that
//! carry a datetime and a version reference (tag or manifest digest).
//! Everything else is dropped; a record lacking both references is not an
//! error, just noise.

use chrono::{DateTime, Duration, NaiveDate};

use super::types::{LogReference, PullLogEntry, RawLogRecord};

/// Datetime format used in Quay log records, e.g. `Mon, 09 Jun 2025 16:23:18 -0000`.
const QUAY_LOG_DATETIME_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Extract the calendar date from a Quay log datetime string.
pub fn extract_date(datetime_str: &str) -> Option<NaiveDate> {
    DateTime::parse_from_str(datetime_str, QUAY_LOG_DATETIME_FORMAT)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Filter raw log records down to pull events with a version reference.
///
/// A record survives when its kind is `pull_repo`, its datetime parses, and
/// its metadata carries a tag or a manifest digest (tag preferred when both
/// are present).
pub fn filter_pull_logs(records: &[RawLogRecord]) -> Vec<PullLogEntry> {
    let mut entries = Vec::new();

    for record in records {
        if record.kind.as_deref() != Some("pull_repo") {
            continue;
        }
        let Some(metadata) = &record.metadata else {
            continue;
        };
        let Some(date) = record.datetime.as_deref().and_then(extract_date) else {
            continue;
        };

        let reference = if let Some(tag) = &metadata.tag {
            LogReference::Tag(tag.clone())
        } else if let Some(digest) = &metadata.manifest_digest {
            LogReference::Digest(digest.clone())
        } else {
            continue;
        };

        entries.push(PullLogEntry { date, reference });
    }

    entries
}

/// Date range covering the last `log_days` completed days before `today`.
///
/// E.g. with `log_days = 7` on May 8th, the window is May 1st through
/// May 7th inclusive. Used as the `starttime`/`endtime` log query bounds.
pub fn log_window(today: NaiveDate, log_days: u32) -> (NaiveDate, NaiveDate) {
    let end = today - Duration::days(1);
    let start = end - Duration::days(i64::from(log_days.saturating_sub(1)));
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::types::LogMetadata;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn pull_record(datetime: &str, tag: Option<&str>, digest: Option<&str>) -> RawLogRecord {
        RawLogRecord {
            kind: Some("pull_repo".into()),
            datetime: Some(datetime.into()),
            metadata: Some(LogMetadata {
                tag: tag.map(str::to_string),
                manifest_digest: digest.map(str::to_string),
            }),
        }
    }

    #[test]
    fn extract_date_parses_quay_format() {
        assert_eq!(
            extract_date("Mon, 09 Jun 2025 16:23:18 -0000"),
            Some(date("2025-06-09"))
        );
    }

    #[test]
    fn extract_date_rejects_malformed_input() {
        assert_eq!(extract_date("2025-06-09T16:23:18Z"), None);
        assert_eq!(extract_date(""), None);
    }

    #[test]
    fn filter_keeps_pull_events_with_tag() {
        let records = vec![pull_record("Mon, 09 Jun 2025 16:23:18 -0000", Some("v1"), None)];
        let entries = filter_pull_logs(&records);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, date("2025-06-09"));
        assert_eq!(entries[0].reference, LogReference::Tag("v1".into()));
    }

    #[test]
    fn filter_prefers_tag_over_digest() {
        let records = vec![pull_record(
            "Mon, 09 Jun 2025 16:23:18 -0000",
            Some("v1"),
            Some("sha256:d1"),
        )];
        let entries = filter_pull_logs(&records);
        assert_eq!(entries[0].reference, LogReference::Tag("v1".into()));
    }

    #[test]
    fn filter_falls_back_to_digest() {
        let records = vec![pull_record(
            "Mon, 09 Jun 2025 16:23:18 -0000",
            None,
            Some("sha256:d1"),
        )];
        let entries = filter_pull_logs(&records);
        assert_eq!(entries[0].reference, LogReference::Digest("sha256:d1".into()));
    }

    #[test]
    fn filter_drops_non_pull_kinds() {
        let mut record = pull_record("Mon, 09 Jun 2025 16:23:18 -0000", Some("v1"), None);
        record.kind = Some("push_repo".into());
        assert!(filter_pull_logs(&[record]).is_empty());
    }

    #[test]
    fn filter_drops_records_without_references() {
        let records = vec![pull_record("Mon, 09 Jun 2025 16:23:18 -0000", None, None)];
        assert!(filter_pull_logs(&records).is_empty());
    }

    #[test]
    fn filter_drops_records_without_datetime_or_metadata() {
        let records = vec![
            RawLogRecord {
                kind: Some("pull_repo".into()),
                datetime: None,
                metadata: Some(LogMetadata::default()),
            },
            RawLogRecord {
                kind: Some("pull_repo".into()),
                datetime: Some("Mon, 09 Jun 2025 16:23:18 -0000".into()),
                metadata: None,
            },
        ];
        assert!(filter_pull_logs(&records).is_empty());
    }

    #[test]
    fn log_window_covers_last_completed_days() {
        let (start, end) = log_window(date("2025-05-08"), 7);
        assert_eq!(start, date("2025-05-01"));
        assert_eq!(end, date("2025-05-07"));
    }

    #[test]
    fn log_window_single_day_is_yesterday() {
        let (start, end) = log_window(date("2025-05-08"), 1);
        assert_eq!(start, date("2025-05-07"));
        assert_eq!(end, date("2025-05-07"));
    }
}
