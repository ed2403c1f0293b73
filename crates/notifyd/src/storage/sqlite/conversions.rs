//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use chrono::NaiveDateTime;
use rusqlite::Row;

use notifyd_core::notification::{Notification, NotificationId, NotificationType};

/// Storage format for `created_at`: local date-time, no offset.
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Convert a SQLite row to a Notification.
///
/// Expected columns: id, type, recipient, subject, content, created_at
pub fn row_to_notification(row: &Row) -> rusqlite::Result<Notification> {
    let id: i64 = row.get(0)?;
    let kind: String = row.get(1)?;
    let recipient: String = row.get(2)?;
    let subject: String = row.get(3)?;
    let content: String = row.get(4)?;
    let created_at: String = row.get(5)?;

    Ok(Notification {
        id: NotificationId::new(id),
        kind: parse_kind(1, &kind)?,
        recipient,
        subject,
        content,
        created_at: parse_datetime(5, &created_at)?,
    })
}

fn parse_kind(column: usize, s: &str) -> rusqlite::Result<NotificationType> {
    s.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_datetime(column: usize, s: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Format a NaiveDateTime for SQLite storage.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_datetime_whole_seconds() {
        let dt = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();

        assert_eq!(format_datetime(&dt), "2024-06-15T10:30:00");
    }

    #[test]
    fn test_datetime_keeps_fraction() {
        let dt = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_micro_opt(10, 30, 0, 123_456)
            .unwrap();

        let formatted = format_datetime(&dt);
        assert_eq!(formatted, "2024-06-15T10:30:00.123456");
        assert_eq!(parse_datetime(5, &formatted).unwrap(), dt);
    }

    #[test]
    fn test_parse_datetime_invalid() {
        assert!(parse_datetime(5, "yesterday").is_err());
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind(1, "sms").unwrap(), NotificationType::Sms);
        assert!(parse_kind(1, "fax").is_err());
    }
}
