//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O.

/// SQL statement to create all tables.
///
/// `AUTOINCREMENT` keeps SQLite from handing out the id of a deleted row again.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS notifications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    type TEXT NOT NULL CHECK (type IN ('email', 'sms')),
    recipient TEXT NOT NULL,
    subject TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_notifications_created_at ON notifications(created_at);
"#;

pub const INSERT_NOTIFICATION: &str = r#"
INSERT INTO notifications (type, recipient, subject, content, created_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_NOTIFICATION_BY_ID: &str = r#"
SELECT id, type, recipient, subject, content, created_at
FROM notifications
WHERE id = ?1
"#;

pub const UPDATE_NOTIFICATION: &str = r#"
UPDATE notifications
SET subject = ?2, content = ?3
WHERE id = ?1
"#;

pub const EXISTS_NOTIFICATION: &str = r#"
SELECT EXISTS(SELECT 1 FROM notifications WHERE id = ?1)
"#;

pub const DELETE_NOTIFICATION: &str = r#"
DELETE FROM notifications WHERE id = ?1
"#;

pub const COUNT_NOTIFICATIONS: &str = r#"
SELECT COUNT(*) FROM notifications
"#;
