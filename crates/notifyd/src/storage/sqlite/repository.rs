//! SQLite repository implementation.
//!
//! Implements `NotificationRepository` from `notifyd_core::storage` using SQLite.

use async_trait::async_trait;
use tokio_rusqlite::Connection;

use notifyd_core::notification::{NewNotification, Notification, NotificationId};
use notifyd_core::storage::{NotificationRepository, RepositoryError, Result};

use super::conversions::{format_datetime, row_to_notification};
use super::error::map_tokio_rusqlite_error_with_id;
use super::schema;

const ENTITY: &str = "Notification";

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based repository implementation.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl NotificationRepository for SqliteRepository {
    async fn insert(&self, notification: &NewNotification) -> Result<Notification> {
        let draft = notification.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_NOTIFICATION,
                    rusqlite::params![
                        draft.kind.as_str(),
                        &draft.recipient,
                        &draft.subject,
                        &draft.content,
                        format_datetime(&draft.created_at),
                    ],
                )
                .map_err(wrap_err)?;

                let id = NotificationId::new(conn.last_insert_rowid());
                Ok(draft.into_notification(id))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, ENTITY, "unknown"))
    }

    async fn save(&self, notification: &Notification) -> Result<Notification> {
        let id = notification.id;
        let subject = notification.subject.clone();
        let content = notification.content.clone();

        self.conn
            .call(move |conn| {
                let changed = conn
                    .execute(
                        schema::UPDATE_NOTIFICATION,
                        rusqlite::params![id.value(), subject, content],
                    )
                    .map_err(wrap_err)?;

                if changed == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }

                conn.query_row(
                    schema::SELECT_NOTIFICATION_BY_ID,
                    [id.value()],
                    row_to_notification,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, ENTITY, id.to_string()))
    }

    async fn find_by_id(&self, id: NotificationId) -> Result<Option<Notification>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_NOTIFICATION_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([id.value()], row_to_notification) {
                    Ok(notification) => Ok(Some(notification)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, ENTITY, id.to_string()))
    }

    async fn exists_by_id(&self, id: NotificationId) -> Result<bool> {
        self.conn
            .call(move |conn| {
                conn.query_row(schema::EXISTS_NOTIFICATION, [id.value()], |row| {
                    row.get::<_, bool>(0)
                })
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, ENTITY, id.to_string()))
    }

    async fn delete_by_id(&self, id: NotificationId) -> Result<()> {
        self.conn
            .call(move |conn| {
                let deleted = conn
                    .execute(schema::DELETE_NOTIFICATION, [id.value()])
                    .map_err(wrap_err)?;

                if deleted == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, ENTITY, id.to_string()))
    }

    async fn count(&self) -> Result<u64> {
        self.conn
            .call(|conn| {
                conn.query_row(schema::COUNT_NOTIFICATIONS, [], |row| row.get::<_, i64>(0))
                    .map_err(wrap_err)
            })
            .await
            .map(|n| n.max(0) as u64)
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, ENTITY, "unknown"))
    }
}
