// SPDX-License-Identifier: MPL-2.0
//! SQLite-backed media store.
//!
//! One database file holds at most five records, keyed by slot. The
//! connection is opened and closed per operation; SQLite serializes
//! concurrent transactions itself, and a busy timeout absorbs transient
//! lock contention. Blocking database work runs on the tokio blocking
//! pool so the async caller never stalls.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::paths;
use crate::slot::{MediaKind, SlotId};
use crate::store::{MediaRecord, MediaStore};

/// Database file name inside the app data directory.
pub const DB_FILE: &str = "custom-media.db";

/// Schema version recorded in `PRAGMA user_version`.
const SCHEMA_VERSION: i32 = 1;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Durable media store backed by a single SQLite database file.
///
/// Cloning is cheap; clones address the same database file.
#[derive(Debug, Clone)]
pub struct SqliteMediaStore {
    db_path: PathBuf,
}

impl SqliteMediaStore {
    /// Opens the store at the default platform location.
    ///
    /// Resolves the data directory (see [`paths`]) and creates it if
    /// missing; the database file itself is created on first use.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` when no data directory can be
    /// determined or it cannot be created.
    pub fn open_default() -> Result<Self> {
        let dir = paths::get_app_data_dir()
            .ok_or_else(|| Error::StorageUnavailable("no platform data directory".to_string()))?;
        std::fs::create_dir_all(&dir)?;
        Ok(Self::at_path(dir.join(DB_FILE)))
    }

    /// Points the store at an explicit database file path.
    ///
    /// Intended for tests and embedders that manage their own storage
    /// location. Parent directories must already exist.
    #[must_use]
    pub fn at_path(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Returns the database file path this store addresses.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn open_connection(path: &Path) -> Result<Connection> {
        let conn =
            Connection::open(path).map_err(|e| Error::StorageUnavailable(e.to_string()))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| Error::StorageUnavailable(e.to_string()))?;
        ensure_schema(&conn)?;
        Ok(conn)
    }

    /// Opens a fresh connection on the blocking pool and runs `op` on it.
    async fn run_blocking<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = Self::open_connection(&path)?;
            op(&conn)
        })
        .await
        .map_err(|e| Error::StorageUnavailable(format!("storage task failed: {e}")))?
    }
}

fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS media (
            id        TEXT PRIMARY KEY,
            kind      TEXT NOT NULL,
            payload   BLOB NOT NULL,
            stored_at INTEGER NOT NULL
        )",
    )
    .map_err(|e| Error::StorageUnavailable(e.to_string()))?;

    let version: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| Error::StorageUnavailable(e.to_string()))?;
    if version < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(|e| Error::StorageUnavailable(e.to_string()))?;
    }
    Ok(())
}

#[async_trait]
impl MediaStore for SqliteMediaStore {
    async fn save(&self, slot: SlotId, kind: MediaKind, payload: Vec<u8>) -> Result<()> {
        let stored_at = Utc::now();
        let byte_count = payload.len();
        self.run_blocking(move |conn| {
            conn.execute(
                "INSERT INTO media (id, kind, payload, stored_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE
                 SET kind = excluded.kind,
                     payload = excluded.payload,
                     stored_at = excluded.stored_at",
                params![
                    slot.storage_key(),
                    kind.as_str(),
                    payload,
                    stored_at.timestamp_millis()
                ],
            )
            .map_err(|e| Error::StorageWriteFailure(e.to_string()))?;
            Ok(())
        })
        .await?;
        debug!(
            slot = slot.storage_key(),
            bytes = byte_count,
            "media record saved"
        );
        Ok(())
    }

    async fn load(&self, slot: SlotId) -> Result<Option<MediaRecord>> {
        self.run_blocking(move |conn| {
            let row = conn
                .query_row(
                    "SELECT kind, payload, stored_at FROM media WHERE id = ?1",
                    [slot.storage_key()],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, Vec<u8>>(1)?,
                            row.get::<_, i64>(2)?,
                        ))
                    },
                )
                .optional()
                .map_err(|e| Error::StorageReadFailure(e.to_string()))?;

            let Some((kind_tag, payload, stored_at_millis)) = row else {
                return Ok(None);
            };

            let kind = MediaKind::from_tag(&kind_tag).ok_or_else(|| {
                Error::StorageReadFailure(format!(
                    "unknown kind tag {kind_tag:?} for slot {}",
                    slot.storage_key()
                ))
            })?;
            let stored_at =
                DateTime::from_timestamp_millis(stored_at_millis).ok_or_else(|| {
                    Error::StorageReadFailure(format!(
                        "timestamp out of range for slot {}",
                        slot.storage_key()
                    ))
                })?;

            Ok(Some(MediaRecord {
                slot,
                kind,
                payload,
                stored_at,
            }))
        })
        .await
    }

    async fn delete(&self, slot: SlotId) {
        let outcome = self
            .run_blocking(move |conn| {
                conn.execute("DELETE FROM media WHERE id = ?1", [slot.storage_key()])
                    .map_err(|e| Error::StorageWriteFailure(e.to_string()))?;
                Ok(())
            })
            .await;
        if let Err(e) = outcome {
            warn!(
                slot = slot.storage_key(),
                "failed to delete media record: {e}"
            );
        }
    }

    async fn clear_all(&self) {
        let outcome = self
            .run_blocking(|conn| {
                conn.execute("DELETE FROM media", [])
                    .map_err(|e| Error::StorageWriteFailure(e.to_string()))?;
                Ok(())
            })
            .await;
        if let Err(e) = outcome {
            warn!("failed to clear media store: {e}");
        }
    }

    async fn stored_slots(&self) -> Result<Vec<SlotId>> {
        let keys = self
            .run_blocking(|conn| {
                let mut stmt = conn
                    .prepare("SELECT id FROM media")
                    .map_err(|e| Error::StorageReadFailure(e.to_string()))?;
                let keys = stmt
                    .query_map([], |row| row.get::<_, String>(0))
                    .map_err(|e| Error::StorageReadFailure(e.to_string()))?
                    .collect::<std::result::Result<Vec<String>, _>>()
                    .map_err(|e| Error::StorageReadFailure(e.to_string()))?;
                Ok(keys)
            })
            .await?;

        // Ids that do not map to a known slot are skipped, not fatal.
        Ok(SlotId::ALL
            .into_iter()
            .filter(|slot| keys.iter().any(|key| key == slot.storage_key()))
            .collect())
    }
}
