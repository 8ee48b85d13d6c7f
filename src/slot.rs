// SPDX-License-Identifier: MPL-2.0
//! Slot identifiers and media kinds.
//!
//! The page always displays exactly five media positions: three collage
//! photos, one background audio track, and one free-form message. These
//! types give each position a stable identity and storage key.

/// Number of photo slots in the collage.
pub const PHOTO_SLOT_COUNT: usize = 3;

/// The kind of payload a slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Still image bytes (JPEG, PNG, WebP as supplied by the picker).
    Photo,
    /// Audio track bytes (MPEG).
    Audio,
    /// UTF-8 text.
    Text,
}

impl MediaKind {
    /// Returns the stable tag stored alongside each record.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Audio => "audio",
            MediaKind::Text => "text",
        }
    }

    /// Parses a stored tag back into a kind.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "photo" => Some(MediaKind::Photo),
            "audio" => Some(MediaKind::Audio),
            "text" => Some(MediaKind::Text),
            _ => None,
        }
    }
}

/// One of the five fixed media positions.
///
/// # Example
///
/// ```
/// use valentine_media::slot::SlotId;
///
/// assert_eq!(SlotId::Photo1.storage_key(), "photo-1");
/// assert_eq!(SlotId::from_storage_key("audio"), Some(SlotId::Audio));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotId {
    /// First collage photo.
    Photo0,
    /// Second collage photo.
    Photo1,
    /// Third collage photo.
    Photo2,
    /// Background audio track.
    Audio,
    /// The customizable message.
    Feelings,
}

impl SlotId {
    /// Every slot, in display order.
    pub const ALL: [SlotId; 5] = [
        SlotId::Photo0,
        SlotId::Photo1,
        SlotId::Photo2,
        SlotId::Audio,
        SlotId::Feelings,
    ];

    /// Photo slots only, indexable by collage position.
    pub const PHOTOS: [SlotId; PHOTO_SLOT_COUNT] =
        [SlotId::Photo0, SlotId::Photo1, SlotId::Photo2];

    /// Returns the stable key this slot is stored under.
    #[must_use]
    pub fn storage_key(self) -> &'static str {
        match self {
            SlotId::Photo0 => "photo-0",
            SlotId::Photo1 => "photo-1",
            SlotId::Photo2 => "photo-2",
            SlotId::Audio => "audio",
            SlotId::Feelings => "feelings",
        }
    }

    /// Parses a storage key back into a slot id.
    #[must_use]
    pub fn from_storage_key(key: &str) -> Option<Self> {
        match key {
            "photo-0" => Some(SlotId::Photo0),
            "photo-1" => Some(SlotId::Photo1),
            "photo-2" => Some(SlotId::Photo2),
            "audio" => Some(SlotId::Audio),
            "feelings" => Some(SlotId::Feelings),
            _ => None,
        }
    }

    /// Returns the kind of payload this slot holds.
    #[must_use]
    pub fn kind(self) -> MediaKind {
        match self {
            SlotId::Photo0 | SlotId::Photo1 | SlotId::Photo2 => MediaKind::Photo,
            SlotId::Audio => MediaKind::Audio,
            SlotId::Feelings => MediaKind::Text,
        }
    }

    /// Returns the photo slot for a collage index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= PHOTO_SLOT_COUNT`.
    #[must_use]
    pub fn photo(index: usize) -> Self {
        assert!(
            index < PHOTO_SLOT_COUNT,
            "photo slot index out of range: {index}"
        );
        Self::PHOTOS[index]
    }

    /// Returns the collage index for photo slots, `None` otherwise.
    #[must_use]
    pub fn photo_index(self) -> Option<usize> {
        match self {
            SlotId::Photo0 => Some(0),
            SlotId::Photo1 => Some(1),
            SlotId::Photo2 => Some(2),
            SlotId::Audio | SlotId::Feelings => None,
        }
    }
}
