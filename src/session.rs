// SPDX-License-Identifier: MPL-2.0
//! Session-lifetime media state.
//!
//! [`MediaSession`] is the single source of truth for what the page
//! displays and which edits are pending. The embedding UI constructs one
//! session per page mount, calls [`initialize`](MediaSession::initialize)
//! once to resolve persisted records, pushes previews as the user picks
//! files or edits text, commits them with
//! [`apply_custom_media`](MediaSession::apply_custom_media), and calls
//! [`close`](MediaSession::close) (or drops the session) on unmount.
//!
//! Every slot always resolves to something displayable: a built-in asset
//! locator until a stored record exists, then a session-scoped resource
//! handle backed by the stored payload.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::defaults::Defaults;
use crate::error::Result;
use crate::resource::{ResourceRegistry, ResourceUri};
use crate::slot::{MediaKind, PHOTO_SLOT_COUNT, SlotId};
use crate::store::{MediaRecord, MediaStore};

/// Where a slot's displayable value currently comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// A built-in asset locator, served with the page bundle.
    BuiltIn(String),
    /// A session-scoped handle backed by a stored payload.
    Stored(ResourceUri),
}

impl MediaSource {
    /// Returns the string the UI hands to its media element.
    #[must_use]
    pub fn locator(&self) -> &str {
        match self {
            MediaSource::BuiltIn(path) => path,
            MediaSource::Stored(uri) => uri.as_str(),
        }
    }

    /// Returns `true` when the source is a stored-payload handle.
    #[must_use]
    pub fn is_stored(&self) -> bool {
        matches!(self, MediaSource::Stored(_))
    }
}

/// Lifecycle of a slot's displayed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Showing the built-in default.
    Default,
    /// A database read is in flight.
    Loading,
    /// Showing a value resolved from a stored record.
    Persisted,
}

fn position(slot: SlotId) -> usize {
    match slot {
        SlotId::Photo0 => 0,
        SlotId::Photo1 => 1,
        SlotId::Photo2 => 2,
        SlotId::Audio => 3,
        SlotId::Feelings => 4,
    }
}

/// Session-lifetime state container bridging the store and the UI.
///
/// The session owns the displayed sources and pending previews, plus
/// every resource handle it creates; no other component may hold or
/// release those handles. Construction is explicit (no ambient
/// singleton): create on page mount, [`close`](Self::close) or drop on
/// unmount.
pub struct MediaSession<S> {
    store: S,
    defaults: Defaults,
    resources: ResourceRegistry,
    photo_sources: [MediaSource; PHOTO_SLOT_COUNT],
    audio_source: MediaSource,
    feelings_text: String,
    states: [SlotState; SlotId::ALL.len()],
    is_loading: bool,
    preview_photos: [Option<Vec<u8>>; PHOTO_SLOT_COUNT],
    preview_audio: Option<Vec<u8>>,
    preview_feelings: Option<String>,
}

impl<S: MediaStore> MediaSession<S> {
    /// Creates a session showing the defaults, with loading pending.
    ///
    /// Call [`initialize`](Self::initialize) once after construction to
    /// resolve persisted records; until then every slot shows its
    /// default and [`is_loading`](Self::is_loading) reports `true`.
    #[must_use]
    pub fn new(store: S, defaults: Defaults) -> Self {
        let photo_sources = [
            MediaSource::BuiltIn(defaults.photo_path(0).to_string()),
            MediaSource::BuiltIn(defaults.photo_path(1).to_string()),
            MediaSource::BuiltIn(defaults.photo_path(2).to_string()),
        ];
        let audio_source = MediaSource::BuiltIn(defaults.audio_path().to_string());
        let feelings_text = defaults.feelings_text().to_string();
        Self {
            store,
            defaults,
            resources: ResourceRegistry::new(),
            photo_sources,
            audio_source,
            feelings_text,
            states: [SlotState::Default; SlotId::ALL.len()],
            is_loading: true,
            preview_photos: [None, None, None],
            preview_audio: None,
            preview_feelings: None,
        }
    }

    /// Resolves persisted records into the displayed sources.
    ///
    /// All five slots load concurrently; the loading flag clears only
    /// after every slot has settled. A slot whose record cannot be
    /// loaded or decoded falls back to its default. Never fails the
    /// caller: first paint must not be blocked by storage problems.
    pub async fn initialize(&mut self) {
        self.is_loading = true;
        for state in &mut self.states {
            *state = SlotState::Loading;
        }

        let store = &self.store;
        let (photo0, photo1, photo2, audio, feelings) = tokio::join!(
            store.load(SlotId::Photo0),
            store.load(SlotId::Photo1),
            store.load(SlotId::Photo2),
            store.load(SlotId::Audio),
            store.load(SlotId::Feelings),
        );

        for (index, outcome) in [photo0, photo1, photo2].into_iter().enumerate() {
            match Self::payload_from(outcome, SlotId::photo(index)) {
                Some(payload) => self.promote_photo(index, payload),
                None => self.restore_photo_default(index),
            }
        }

        match Self::payload_from(audio, SlotId::Audio) {
            Some(payload) => self.promote_audio(payload),
            None => self.restore_audio_default(),
        }

        match Self::payload_from(feelings, SlotId::Feelings) {
            Some(payload) => match String::from_utf8(payload) {
                Ok(text) => self.promote_feelings(text),
                Err(_) => {
                    warn!("stored message is not valid UTF-8, using default");
                    self.restore_feelings_default();
                }
            },
            None => self.restore_feelings_default(),
        }

        self.is_loading = false;
        let persisted = self
            .states
            .iter()
            .filter(|state| **state == SlotState::Persisted)
            .count();
        debug!(persisted_slots = persisted, "media session initialized");
    }

    /// Records a candidate photo for a collage slot.
    ///
    /// Overwrites any pending preview for that slot. The displayed
    /// value and durable storage stay untouched until
    /// [`apply_custom_media`](Self::apply_custom_media).
    ///
    /// # Panics
    ///
    /// Panics if `index >= PHOTO_SLOT_COUNT`.
    pub fn set_preview_photo(&mut self, index: usize, bytes: Vec<u8>) {
        assert!(
            index < PHOTO_SLOT_COUNT,
            "photo slot index out of range: {index}"
        );
        self.preview_photos[index] = Some(bytes);
    }

    /// Records a candidate audio track.
    pub fn set_preview_audio(&mut self, bytes: Vec<u8>) {
        self.preview_audio = Some(bytes);
    }

    /// Records a candidate message text.
    pub fn set_preview_feelings(&mut self, text: String) {
        self.preview_feelings = Some(text);
    }

    /// Discards the pending photo preview for a slot, if any.
    ///
    /// # Panics
    ///
    /// Panics if `index >= PHOTO_SLOT_COUNT`.
    pub fn clear_preview_photo(&mut self, index: usize) {
        assert!(
            index < PHOTO_SLOT_COUNT,
            "photo slot index out of range: {index}"
        );
        self.preview_photos[index] = None;
    }

    /// Discards the pending audio preview, if any.
    pub fn clear_preview_audio(&mut self) {
        self.preview_audio = None;
    }

    /// Discards the pending message preview, if any.
    pub fn clear_preview_feelings(&mut self) {
        self.preview_feelings = None;
    }

    /// Returns `true` while any slot has an uncommitted preview.
    #[must_use]
    pub fn has_pending_previews(&self) -> bool {
        self.preview_photos.iter().any(Option::is_some)
            || self.preview_audio.is_some()
            || self.preview_feelings.is_some()
    }

    /// Persists every pending preview and promotes it into the display.
    ///
    /// Slots are processed in display order. A slot's display flips only
    /// after its durable write succeeded, at which point its preview is
    /// cleared and the handle it supersedes is released. On the first
    /// failure the error is logged and returned: already-applied slots
    /// stay applied (the upsert makes re-apply safe), while the failed
    /// slot keeps its current display and its pending preview, so the
    /// caller can retry without re-selecting anything.
    ///
    /// A whitespace-only pending message is not persisted (the message
    /// cannot become blank) but is cleared when the apply reaches it.
    ///
    /// # Errors
    ///
    /// Returns the first `save` failure encountered.
    pub async fn apply_custom_media(&mut self) -> Result<()> {
        for index in 0..PHOTO_SLOT_COUNT {
            let Some(preview) = &self.preview_photos[index] else {
                continue;
            };
            let slot = SlotId::photo(index);
            if let Err(e) = self.store.save(slot, MediaKind::Photo, preview.clone()).await {
                error!(slot = slot.storage_key(), "failed to apply custom media: {e}");
                return Err(e);
            }
            if let Some(bytes) = self.preview_photos[index].take() {
                self.promote_photo(index, bytes);
            }
        }

        if let Some(preview) = &self.preview_audio {
            if let Err(e) = self
                .store
                .save(SlotId::Audio, MediaKind::Audio, preview.clone())
                .await
            {
                error!(
                    slot = SlotId::Audio.storage_key(),
                    "failed to apply custom media: {e}"
                );
                return Err(e);
            }
            if let Some(bytes) = self.preview_audio.take() {
                self.promote_audio(bytes);
            }
        }

        if let Some(preview) = &self.preview_feelings {
            if preview.trim().is_empty() {
                // A blank edit never overwrites the message.
                self.preview_feelings = None;
            } else {
                let payload = preview.as_bytes().to_vec();
                if let Err(e) = self
                    .store
                    .save(SlotId::Feelings, MediaKind::Text, payload)
                    .await
                {
                    error!(
                        slot = SlotId::Feelings.storage_key(),
                        "failed to apply custom media: {e}"
                    );
                    return Err(e);
                }
                if let Some(text) = self.preview_feelings.take() {
                    self.promote_feelings(text);
                }
            }
        }

        Ok(())
    }

    /// Clears the store and restores every slot to its built-in default.
    ///
    /// Clearing is best-effort (the store absorbs and logs failures), so
    /// the visible reset always completes: handles are released and
    /// every slot returns to its default, with pending previews dropped.
    /// Idempotent: a second call leaves the same end state.
    pub async fn reset_to_defaults(&mut self) {
        self.store.clear_all().await;

        self.resources.release_all();
        for index in 0..PHOTO_SLOT_COUNT {
            self.photo_sources[index] =
                MediaSource::BuiltIn(self.defaults.photo_path(index).to_string());
        }
        self.audio_source = MediaSource::BuiltIn(self.defaults.audio_path().to_string());
        self.feelings_text = self.defaults.feelings_text().to_string();
        self.states = [SlotState::Default; SlotId::ALL.len()];
        self.preview_photos = [None, None, None];
        self.preview_audio = None;
        self.preview_feelings = None;
        debug!("media session reset to defaults");
    }

    /// Releases every resource handle this session owns.
    ///
    /// Call on page unmount for deterministic teardown; dropping the
    /// session releases the same handles through ownership. Stored
    /// sources fall back to their defaults so no released handle stays
    /// reachable through the read surface.
    pub fn close(&mut self) {
        self.resources.release_all();
        for index in 0..PHOTO_SLOT_COUNT {
            if self.photo_sources[index].is_stored() {
                self.photo_sources[index] =
                    MediaSource::BuiltIn(self.defaults.photo_path(index).to_string());
                self.states[position(SlotId::photo(index))] = SlotState::Default;
            }
        }
        if self.audio_source.is_stored() {
            self.audio_source = MediaSource::BuiltIn(self.defaults.audio_path().to_string());
            self.states[position(SlotId::Audio)] = SlotState::Default;
        }
    }

    /// Returns the displayable source for a photo slot.
    ///
    /// # Panics
    ///
    /// Panics if `index >= PHOTO_SLOT_COUNT`.
    #[must_use]
    pub fn photo_source(&self, index: usize) -> &MediaSource {
        assert!(
            index < PHOTO_SLOT_COUNT,
            "photo slot index out of range: {index}"
        );
        &self.photo_sources[index]
    }

    /// Returns the displayable source for the audio slot.
    #[must_use]
    pub fn audio_source(&self) -> &MediaSource {
        &self.audio_source
    }

    /// Returns the current message text.
    #[must_use]
    pub fn feelings_text(&self) -> &str {
        &self.feelings_text
    }

    /// Returns `true` until the first [`initialize`](Self::initialize)
    /// completes.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Returns the lifecycle state of a slot's displayed value.
    #[must_use]
    pub fn slot_state(&self, slot: SlotId) -> SlotState {
        self.states[position(slot)]
    }

    /// Returns the pending photo preview for a slot, if any.
    ///
    /// # Panics
    ///
    /// Panics if `index >= PHOTO_SLOT_COUNT`.
    #[must_use]
    pub fn preview_photo(&self, index: usize) -> Option<&[u8]> {
        assert!(
            index < PHOTO_SLOT_COUNT,
            "photo slot index out of range: {index}"
        );
        self.preview_photos[index].as_deref()
    }

    /// Returns the pending audio preview, if any.
    #[must_use]
    pub fn preview_audio(&self) -> Option<&[u8]> {
        self.preview_audio.as_deref()
    }

    /// Returns the pending message preview, if any.
    #[must_use]
    pub fn preview_feelings(&self) -> Option<&str> {
        self.preview_feelings.as_deref()
    }

    /// Resolves a stored-source handle to its payload bytes.
    ///
    /// Returns `None` once the handle has been released (superseded,
    /// reset, or closed).
    #[must_use]
    pub fn resource_bytes(&self, uri: &ResourceUri) -> Option<Arc<Vec<u8>>> {
        self.resources.resolve(uri)
    }

    /// Returns the number of live resource handles this session owns.
    ///
    /// At most one handle is live per binary slot.
    #[must_use]
    pub fn live_handle_count(&self) -> usize {
        self.resources.len()
    }

    /// Extracts a payload from a load outcome, logging failures.
    fn payload_from(outcome: Result<Option<MediaRecord>>, slot: SlotId) -> Option<Vec<u8>> {
        match outcome {
            Ok(Some(record)) => Some(record.payload),
            Ok(None) => None,
            Err(e) => {
                warn!(
                    slot = slot.storage_key(),
                    "falling back to default: {e}"
                );
                None
            }
        }
    }

    fn promote_photo(&mut self, index: usize, payload: Vec<u8>) {
        self.release_photo_handle(index);
        let uri = self.resources.register(payload);
        self.photo_sources[index] = MediaSource::Stored(uri);
        self.states[position(SlotId::photo(index))] = SlotState::Persisted;
    }

    fn promote_audio(&mut self, payload: Vec<u8>) {
        self.release_audio_handle();
        let uri = self.resources.register(payload);
        self.audio_source = MediaSource::Stored(uri);
        self.states[position(SlotId::Audio)] = SlotState::Persisted;
    }

    fn promote_feelings(&mut self, text: String) {
        self.feelings_text = text;
        self.states[position(SlotId::Feelings)] = SlotState::Persisted;
    }

    fn release_photo_handle(&mut self, index: usize) {
        if let MediaSource::Stored(uri) = &self.photo_sources[index] {
            self.resources.release(uri);
        }
    }

    fn release_audio_handle(&mut self) {
        if let MediaSource::Stored(uri) = &self.audio_source {
            self.resources.release(uri);
        }
    }

    fn restore_photo_default(&mut self, index: usize) {
        self.release_photo_handle(index);
        self.photo_sources[index] =
            MediaSource::BuiltIn(self.defaults.photo_path(index).to_string());
        self.states[position(SlotId::photo(index))] = SlotState::Default;
    }

    fn restore_audio_default(&mut self) {
        self.release_audio_handle();
        self.audio_source = MediaSource::BuiltIn(self.defaults.audio_path().to_string());
        self.states[position(SlotId::Audio)] = SlotState::Default;
    }

    fn restore_feelings_default(&mut self) {
        self.feelings_text = self.defaults.feelings_text().to_string();
        self.states[position(SlotId::Feelings)] = SlotState::Default;
    }
}
