// SPDX-License-Identifier: MPL-2.0
//! Built-in media shown before any customization.
//!
//! Asset locators point into the bundle served alongside the page; the
//! embedding UI resolves them. This crate treats them as opaque strings
//! and never opens them.

use crate::slot::PHOTO_SLOT_COUNT;

/// Collage photos shipped with the page, in display order.
pub const DEFAULT_PHOTO_PATHS: [&str; PHOTO_SLOT_COUNT] = [
    "/assets/generated/couple-photo-1.dim_1200x1600.png",
    "/assets/generated/couple-photo-2.dim_1200x1600.png",
    "/assets/generated/couple-photo-3.dim_1200x1600.png",
];

/// Background track shipped with the page.
pub const DEFAULT_AUDIO_PATH: &str = "/assets/generated/valentine-song.mp3";

/// Message shown until the user writes their own.
pub const DEFAULT_FEELINGS_TEXT: &str = "Every moment with you feels like a dream come true. \
    You bring so much joy, laughter, and love into my life. I can't imagine my days without \
    your smile, your warmth, and your beautiful heart. You are my everything, and I'm so \
    grateful to have you by my side. Here's to us and all the wonderful memories we'll \
    create together! 💕";

/// The complete default set for one session.
///
/// [`Defaults::default`] yields the shipped assets; embedders can supply
/// their own locators and message through [`Defaults::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    photo_paths: [String; PHOTO_SLOT_COUNT],
    audio_path: String,
    feelings_text: String,
}

impl Defaults {
    /// Creates a default set from custom locators and message text.
    #[must_use]
    pub fn new(
        photo_paths: [String; PHOTO_SLOT_COUNT],
        audio_path: String,
        feelings_text: String,
    ) -> Self {
        Self {
            photo_paths,
            audio_path,
            feelings_text,
        }
    }

    /// Returns the default locator for a photo slot.
    ///
    /// # Panics
    ///
    /// Panics if `index >= PHOTO_SLOT_COUNT`.
    #[must_use]
    pub fn photo_path(&self, index: usize) -> &str {
        assert!(
            index < PHOTO_SLOT_COUNT,
            "photo slot index out of range: {index}"
        );
        &self.photo_paths[index]
    }

    /// Returns the default locator for the audio slot.
    #[must_use]
    pub fn audio_path(&self) -> &str {
        &self.audio_path
    }

    /// Returns the default message text.
    #[must_use]
    pub fn feelings_text(&self) -> &str {
        &self.feelings_text
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            photo_paths: DEFAULT_PHOTO_PATHS.map(str::to_string),
            audio_path: DEFAULT_AUDIO_PATH.to_string(),
            feelings_text: DEFAULT_FEELINGS_TEXT.to_string(),
        }
    }
}
