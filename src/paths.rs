// SPDX-License-Identifier: MPL-2.0
//! Centralized path resolution for the media database.
//!
//! This module is the single source of truth for where durable media
//! records live on disk.
//!
//! # Path Resolution Order
//!
//! Paths are resolved in the following priority order:
//! 1. **Explicit override** - parameter to `_with_override()` (for tests
//!    and embedders that manage their own storage location)
//! 2. **Environment variable** (`VALENTINE_MEDIA_DATA_DIR`)
//! 3. **Platform default** - via `dirs` crate

use std::path::PathBuf;

/// Application name used for directory naming.
const APP_NAME: &str = "ValentineMedia";

/// Environment variable to override the data directory.
pub const ENV_DATA_DIR: &str = "VALENTINE_MEDIA_DATA_DIR";

/// Returns the application data directory path.
///
/// # Resolution Order
///
/// 1. `VALENTINE_MEDIA_DATA_DIR` environment variable (if set and non-empty)
/// 2. Platform-specific data directory:
///    - Linux: `~/.local/share/ValentineMedia/`
///    - macOS: `~/Library/Application Support/ValentineMedia/`
///    - Windows: `C:\Users\<User>\AppData\Roaming\ValentineMedia\`
///
/// Returns `None` if the data directory cannot be determined (rare edge case).
pub fn get_app_data_dir() -> Option<PathBuf> {
    get_app_data_dir_with_override(None)
}

/// Returns the application data directory path with an optional override.
///
/// # Resolution Order
///
/// 1. `override_path` parameter (if `Some`) - most specific, for tests
/// 2. `VALENTINE_MEDIA_DATA_DIR` environment variable (if set and non-empty)
/// 3. Platform-specific data directory (with app name appended)
pub fn get_app_data_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    // Priority 1: Explicit override (for tests)
    if let Some(path) = override_path {
        return Some(path);
    }

    // Priority 2: Environment variable
    if let Ok(env_path) = std::env::var(ENV_DATA_DIR) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    // Priority 3: Platform default with app name
    dirs::data_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}
