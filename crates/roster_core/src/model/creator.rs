//! Creator domain model.
//!
//! # Invariants
//! - `handle` is non-empty and trimmed.
//! - `profile_url` is derived from `handle` and never set independently.

/// Prefix joined with the handle to build a profile link.
pub const PROFILE_URL_PREFIX: &str = "https://www.tiktok.com/@";

/// One roster entry. Identity is the handle string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Creator {
    pub handle: String,
    pub profile_url: String,
}

impl Creator {
    /// Builds a creator from a raw handle.
    ///
    /// Returns `None` when the trimmed handle is empty.
    pub fn new(handle: &str) -> Option<Self> {
        let handle = handle.trim();
        if handle.is_empty() {
            return None;
        }

        Some(Self {
            handle: handle.to_string(),
            profile_url: profile_url(handle),
        })
    }
}

/// Derives the profile link for `handle`.
pub fn profile_url(handle: &str) -> String {
    format!("{PROFILE_URL_PREFIX}{handle}")
}
