// SPDX-License-Identifier: MPL-2.0
//! Session-scoped resource handles for stored payloads.
//!
//! A stored blob becomes displayable through a handle: an opaque URI the
//! embedding UI can hand to its image or audio element, resolvable to the
//! payload bytes only while the handle is registered. The registry is the
//! explicit ownership record; releasing a handle makes its URI stop
//! resolving.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Scheme prefix for registry-backed URIs.
const URI_SCHEME: &str = "media://";

/// An opaque locator for a registered payload.
///
/// The string form is `media://{uuid}`. Each registration mints a fresh
/// URI; URIs are never reused, and resolve only while their handle is
/// live.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceUri(String);

impl ResourceUri {
    fn new_unique() -> Self {
        Self(format!("{URI_SCHEME}{}", Uuid::new_v4()))
    }

    /// Returns the URI as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ownership record for live resource handles.
///
/// # Example
///
/// ```
/// use valentine_media::resource::ResourceRegistry;
///
/// let mut registry = ResourceRegistry::new();
/// let uri = registry.register(vec![1, 2, 3]);
/// assert!(registry.resolve(&uri).is_some());
///
/// registry.release(&uri);
/// assert!(registry.resolve(&uri).is_none());
/// ```
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    entries: HashMap<ResourceUri, Arc<Vec<u8>>>,
}

impl ResourceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a payload and returns its freshly minted handle.
    ///
    /// Dropping the returned URI without releasing it strands the entry
    /// until [`release_all`](Self::release_all), so hold on to it.
    #[must_use]
    pub fn register(&mut self, payload: Vec<u8>) -> ResourceUri {
        let uri = ResourceUri::new_unique();
        self.entries.insert(uri.clone(), Arc::new(payload));
        uri
    }

    /// Resolves a handle to its payload, or `None` once released.
    #[must_use]
    pub fn resolve(&self, uri: &ResourceUri) -> Option<Arc<Vec<u8>>> {
        self.entries.get(uri).map(Arc::clone)
    }

    /// Releases a handle. Returns `false` if it was not live.
    pub fn release(&mut self, uri: &ResourceUri) -> bool {
        self.entries.remove(uri).is_some()
    }

    /// Releases every live handle.
    pub fn release_all(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of live handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no handles are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
