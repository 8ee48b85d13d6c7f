// SPDX-License-Identifier: MPL-2.0
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::tempdir;

use valentine_media::defaults::Defaults;
use valentine_media::error::{Error, Result};
use valentine_media::session::{MediaSession, MediaSource, SlotState};
use valentine_media::slot::{MediaKind, PHOTO_SLOT_COUNT, SlotId};
use valentine_media::store::sqlite::DB_FILE;
use valentine_media::store::{MediaRecord, MediaStore, SqliteMediaStore};

/// Store double that can be told to fail saves for one slot.
///
/// Everything else passes through to a real SQLite store, so recovery
/// after the flag is cleared behaves exactly like production.
struct FlakyStore {
    inner: SqliteMediaStore,
    failing_slot: Arc<Mutex<Option<SlotId>>>,
}

impl FlakyStore {
    fn new(inner: SqliteMediaStore) -> (Self, Arc<Mutex<Option<SlotId>>>) {
        let failing_slot = Arc::new(Mutex::new(None));
        (
            Self {
                inner,
                failing_slot: Arc::clone(&failing_slot),
            },
            failing_slot,
        )
    }
}

#[async_trait]
impl MediaStore for FlakyStore {
    async fn save(&self, slot: SlotId, kind: MediaKind, payload: Vec<u8>) -> Result<()> {
        if *self.failing_slot.lock().unwrap() == Some(slot) {
            return Err(Error::StorageWriteFailure(
                "simulated write failure".to_string(),
            ));
        }
        self.inner.save(slot, kind, payload).await
    }

    async fn load(&self, slot: SlotId) -> Result<Option<MediaRecord>> {
        self.inner.load(slot).await
    }

    async fn delete(&self, slot: SlotId) {
        self.inner.delete(slot).await;
    }

    async fn clear_all(&self) {
        self.inner.clear_all().await;
    }

    async fn stored_slots(&self) -> Result<Vec<SlotId>> {
        self.inner.stored_slots().await
    }
}

#[tokio::test]
async fn fresh_session_initializes_to_defaults() {
    let dir = tempdir().expect("failed to create temp dir");
    let store = SqliteMediaStore::at_path(dir.path().join(DB_FILE));
    let mut session = MediaSession::new(store, Defaults::default());

    assert!(session.is_loading());

    session.initialize().await;

    assert!(!session.is_loading());
    let defaults = Defaults::default();
    for index in 0..PHOTO_SLOT_COUNT {
        assert_eq!(
            session.photo_source(index).locator(),
            defaults.photo_path(index)
        );
    }
    assert_eq!(session.audio_source().locator(), defaults.audio_path());
    assert_eq!(session.feelings_text(), defaults.feelings_text());
    for slot in SlotId::ALL {
        assert_eq!(session.slot_state(slot), SlotState::Default);
    }
}

#[tokio::test]
async fn custom_message_survives_across_sessions() {
    let dir = tempdir().expect("failed to create temp dir");
    let db_path = dir.path().join(DB_FILE);

    // 1. First session: the user writes their own message.
    {
        let store = SqliteMediaStore::at_path(db_path.clone());
        let mut session = MediaSession::new(store, Defaults::default());
        session.initialize().await;

        session.set_preview_feelings("I love you".to_string());
        session.apply_custom_media().await.expect("apply should succeed");
        assert_eq!(session.feelings_text(), "I love you");
    }

    // 2. Second session: the message is restored from storage.
    let store = SqliteMediaStore::at_path(db_path);
    let mut session = MediaSession::new(store, Defaults::default());
    session.initialize().await;

    assert_eq!(session.feelings_text(), "I love you");
    assert_eq!(session.slot_state(SlotId::Feelings), SlotState::Persisted);
}

#[tokio::test]
async fn custom_photos_and_audio_survive_across_sessions() {
    let dir = tempdir().expect("failed to create temp dir");
    let db_path = dir.path().join(DB_FILE);

    {
        let store = SqliteMediaStore::at_path(db_path.clone());
        let mut session = MediaSession::new(store, Defaults::default());
        session.initialize().await;

        session.set_preview_photo(0, vec![0xAB; 64]);
        session.set_preview_audio(vec![0xCD; 32]);
        session.apply_custom_media().await.expect("apply should succeed");
    }

    let store = SqliteMediaStore::at_path(db_path);
    let mut session = MediaSession::new(store, Defaults::default());
    session.initialize().await;

    assert_eq!(session.live_handle_count(), 2);
    match session.photo_source(0).clone() {
        MediaSource::Stored(uri) => {
            let bytes = session
                .resource_bytes(&uri)
                .expect("photo handle should resolve");
            assert_eq!(bytes.as_slice(), &[0xAB; 64]);
        }
        MediaSource::BuiltIn(path) => panic!("expected stored photo, got {path}"),
    }
    match session.audio_source().clone() {
        MediaSource::Stored(uri) => {
            let bytes = session
                .resource_bytes(&uri)
                .expect("audio handle should resolve");
            assert_eq!(bytes.as_slice(), &[0xCD; 32]);
        }
        MediaSource::BuiltIn(path) => panic!("expected stored audio, got {path}"),
    }
}

#[tokio::test]
async fn reset_returns_store_and_display_to_defaults() {
    let dir = tempdir().expect("failed to create temp dir");
    let db_path = dir.path().join(DB_FILE);

    let store = SqliteMediaStore::at_path(db_path.clone());
    let mut session = MediaSession::new(store, Defaults::default());
    session.initialize().await;

    // 1. Customize two slots.
    session.set_preview_photo(0, vec![1; 8]);
    session.set_preview_audio(vec![2; 8]);
    session.apply_custom_media().await.expect("apply should succeed");
    assert_eq!(session.live_handle_count(), 2);

    // 2. Reset everything.
    session.reset_to_defaults().await;

    // 3. The store holds zero records.
    let checker = SqliteMediaStore::at_path(db_path);
    let slots = checker.stored_slots().await.expect("listing should succeed");
    assert!(slots.is_empty());

    // 4. The display equals the built-in defaults for all 5 slots.
    let defaults = Defaults::default();
    for index in 0..PHOTO_SLOT_COUNT {
        assert_eq!(
            session.photo_source(index).locator(),
            defaults.photo_path(index)
        );
    }
    assert_eq!(session.audio_source().locator(), defaults.audio_path());
    assert_eq!(session.feelings_text(), defaults.feelings_text());

    // 5. No previews and no live handles remain.
    assert!(!session.has_pending_previews());
    assert_eq!(session.live_handle_count(), 0);
    for slot in SlotId::ALL {
        assert_eq!(session.slot_state(slot), SlotState::Default);
    }
}

#[tokio::test]
async fn reset_twice_matches_reset_once() {
    let dir = tempdir().expect("failed to create temp dir");
    let db_path = dir.path().join(DB_FILE);

    let store = SqliteMediaStore::at_path(db_path.clone());
    let mut session = MediaSession::new(store, Defaults::default());
    session.initialize().await;

    session.set_preview_feelings("be mine".to_string());
    session.apply_custom_media().await.expect("apply should succeed");

    session.reset_to_defaults().await;
    let after_once = (
        session.feelings_text().to_string(),
        session.audio_source().locator().to_string(),
        session.live_handle_count(),
    );

    session.reset_to_defaults().await;
    let after_twice = (
        session.feelings_text().to_string(),
        session.audio_source().locator().to_string(),
        session.live_handle_count(),
    );

    assert_eq!(after_once, after_twice);
    let checker = SqliteMediaStore::at_path(db_path);
    let slots = checker.stored_slots().await.expect("listing should succeed");
    assert!(slots.is_empty());
}

#[tokio::test]
async fn failed_apply_keeps_preview_for_retry() {
    let dir = tempdir().expect("failed to create temp dir");
    let inner = SqliteMediaStore::at_path(dir.path().join(DB_FILE));
    let (store, failing_slot) = FlakyStore::new(inner);
    let mut session = MediaSession::new(store, Defaults::default());
    session.initialize().await;

    *failing_slot.lock().unwrap() = Some(SlotId::Photo0);
    session.set_preview_photo(0, vec![5; 16]);

    let result = session.apply_custom_media().await;
    assert!(matches!(result, Err(Error::StorageWriteFailure(_))));

    // The display is unchanged and the preview is still pending.
    assert!(!session.photo_source(0).is_stored());
    assert_eq!(session.preview_photo(0), Some(&[5u8; 16][..]));

    // The store recovers; the retry needs no re-selection.
    *failing_slot.lock().unwrap() = None;
    session.apply_custom_media().await.expect("retry should succeed");
    assert!(session.photo_source(0).is_stored());
    assert_eq!(session.preview_photo(0), None);
}

#[tokio::test]
async fn failed_slot_does_not_roll_back_earlier_slots() {
    let dir = tempdir().expect("failed to create temp dir");
    let inner = SqliteMediaStore::at_path(dir.path().join(DB_FILE));
    let (store, failing_slot) = FlakyStore::new(inner);
    let mut session = MediaSession::new(store, Defaults::default());
    session.initialize().await;

    *failing_slot.lock().unwrap() = Some(SlotId::Audio);
    session.set_preview_photo(0, vec![1; 8]);
    session.set_preview_audio(vec![2; 8]);

    let result = session.apply_custom_media().await;
    assert!(result.is_err());

    // Photo 0 was applied before the failure and stays applied.
    assert!(session.photo_source(0).is_stored());
    assert_eq!(session.preview_photo(0), None);

    // The audio slot is untouched and still pending.
    assert!(!session.audio_source().is_stored());
    assert_eq!(session.preview_audio(), Some(&[2u8; 8][..]));

    *failing_slot.lock().unwrap() = None;
    session.apply_custom_media().await.expect("retry should succeed");
    assert!(session.audio_source().is_stored());
    assert!(!session.has_pending_previews());
}

#[tokio::test]
async fn blank_message_preview_is_not_persisted() {
    let dir = tempdir().expect("failed to create temp dir");
    let db_path = dir.path().join(DB_FILE);

    let store = SqliteMediaStore::at_path(db_path.clone());
    let mut session = MediaSession::new(store, Defaults::default());
    session.initialize().await;

    session.set_preview_feelings("   ".to_string());
    session.apply_custom_media().await.expect("apply should succeed");

    let checker = SqliteMediaStore::at_path(db_path);
    let loaded = checker.load(SlotId::Feelings).await.expect("load should succeed");
    assert!(loaded.is_none(), "blank message must not reach the store");
    assert!(!session.has_pending_previews());
    assert_eq!(session.feelings_text(), Defaults::default().feelings_text());
}

#[tokio::test]
async fn reinitialize_replaces_handles_without_leaking() {
    let dir = tempdir().expect("failed to create temp dir");
    let store = SqliteMediaStore::at_path(dir.path().join(DB_FILE));
    let mut session = MediaSession::new(store, Defaults::default());
    session.initialize().await;

    session.set_preview_photo(0, vec![9; 8]);
    session.apply_custom_media().await.expect("apply should succeed");
    let first_uri = match session.photo_source(0) {
        MediaSource::Stored(uri) => uri.clone(),
        MediaSource::BuiltIn(_) => panic!("expected stored photo"),
    };

    session.initialize().await;

    assert_eq!(session.live_handle_count(), 1);
    assert!(session.resource_bytes(&first_uri).is_none());
    assert!(session.photo_source(0).is_stored());
}

#[tokio::test]
async fn session_survives_unavailable_storage() {
    // A directory path is not an openable database file.
    let dir = tempdir().expect("failed to create temp dir");
    let store = SqliteMediaStore::at_path(dir.path().to_path_buf());
    let mut session = MediaSession::new(store, Defaults::default());

    session.initialize().await;
    assert!(!session.is_loading());
    assert_eq!(session.feelings_text(), Defaults::default().feelings_text());

    session.set_preview_photo(1, vec![3; 4]);
    let result = session.apply_custom_media().await;
    assert!(matches!(result, Err(Error::StorageUnavailable(_))));
    assert!(!session.photo_source(1).is_stored());
    assert_eq!(session.preview_photo(1), Some(&[3u8; 4][..]));
}
