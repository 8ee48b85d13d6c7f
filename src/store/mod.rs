// SPDX-License-Identifier: MPL-2.0
//! Durable media storage port.
//!
//! This module defines the [`MediaStore`] trait for persisting slot-keyed
//! media records across sessions, and the [`MediaRecord`] unit it stores.
//! The production adapter is [`SqliteMediaStore`]; tests supply doubles.

pub mod sqlite;

pub use sqlite::SqliteMediaStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::slot::{MediaKind, SlotId};

/// A persisted unit of media tied to a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRecord {
    /// The slot this record belongs to.
    pub slot: SlotId,
    /// Kind tag recorded at save time.
    pub kind: MediaKind,
    /// Opaque payload bytes (UTF-8 for text records).
    pub payload: Vec<u8>,
    /// Instant of the most recent save for this slot.
    pub stored_at: DateTime<Utc>,
}

/// Port for durable slot-keyed media storage.
///
/// At most one record exists per slot at any time; [`save`](Self::save)
/// upserts. Read and write failures are reported through the crate's
/// error taxonomy, while the two cleanup operations are best-effort by
/// contract (see each method).
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the session drives them from
/// async tasks that may overlap.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upserts the record for `slot` with a fresh timestamp.
    ///
    /// Repeated saves to the same slot replace the record; the store
    /// never holds duplicates.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` when the database cannot be opened,
    /// `StorageWriteFailure` when the write transaction aborts. Failures
    /// are surfaced to the caller, never absorbed.
    async fn save(&self, slot: SlotId, kind: MediaKind, payload: Vec<u8>) -> Result<()>;

    /// Loads the record for `slot`, or `Ok(None)` when nothing is stored.
    ///
    /// A missing record is an ordinary outcome, not an error.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` when the database cannot be opened,
    /// `StorageReadFailure` when a stored record cannot be read back.
    async fn load(&self, slot: SlotId) -> Result<Option<MediaRecord>>;

    /// Removes the record for `slot` if present.
    ///
    /// Best-effort: a missing record is a no-op, and failures are logged
    /// by the implementation and absorbed.
    async fn delete(&self, slot: SlotId);

    /// Removes every record in the store.
    ///
    /// Best-effort: failures are logged by the implementation and
    /// absorbed, so a reset always completes from the caller's view.
    async fn clear_all(&self);

    /// Lists the slots currently holding a record, in display order.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` when the database cannot be opened,
    /// `StorageReadFailure` when the listing query fails.
    async fn stored_slots(&self) -> Result<Vec<SlotId>>;
}
