// SPDX-License-Identifier: MPL-2.0
//! `valentine-media` is the persistence core of a customizable proposal page.
//!
//! It provides a durable slot-keyed media store (three collage photos, one
//! audio track, one message) backed by SQLite, and the session-lifetime
//! state container that bridges the store to an embedding UI: load persisted
//! media on mount, stage previews as the user edits, commit them atomically
//! per slot, and reset back to the built-in defaults.

#![doc(html_root_url = "https://docs.rs/valentine-media/0.1.0")]

pub mod defaults;
pub mod error;
pub mod paths;
pub mod resource;
pub mod session;
pub mod slot;
pub mod store;
