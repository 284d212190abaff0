//! Sound fingerprinting.
//!
//! A [`Fingerprint`] is a short, stable key derived from the source identifier
//! handed to the playback substrate.  Two flavours of source exist:
//!
//! | Source | Fingerprint |
//! |--------|-------------|
//! | `data:` URI with a `,` separator | interior window of the payload (chars 100..300 by default) |
//! | `data:` URI without a separator | prefix of the whole input (200 chars by default) |
//! | anything else (remote address) | the address itself, verbatim |
//!
//! Sounds from the same family share their leading header bytes, so the
//! window is sampled from inside the payload rather than from its start.

use std::fmt;

use serde::{Deserialize, Serialize};

const DATA_SCHEME: &str = "data:";

// ---------------------------------------------------------------------------
// Fingerprint
// ---------------------------------------------------------------------------

/// Derived key used to recognise a recurring sound.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap an already-derived key (e.g. one read back from the store).
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `max_chars` characters, for log lines and diagnostics.
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.0.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// FingerprintWindow
// ---------------------------------------------------------------------------

/// Where inside an embedded payload the fingerprint is sampled.
///
/// Changing these values invalidates every learned mapping, so they are only
/// exposed through configuration for installations that start from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintWindow {
    /// Characters skipped at the start of the payload.
    pub offset: usize,
    /// Length of the sampled window in characters.
    pub length: usize,
    /// Prefix length used when a `data:` URI has no payload separator.
    pub fallback_length: usize,
}

impl Default for FingerprintWindow {
    fn default() -> Self {
        Self {
            offset: 100,
            length: 200,
            fallback_length: 200,
        }
    }
}

// ---------------------------------------------------------------------------
// fingerprint
// ---------------------------------------------------------------------------

/// Fingerprint `source` with the default [`FingerprintWindow`].
///
/// ```
/// use custom_sound::fingerprint::fingerprint;
///
/// assert!(fingerprint("").is_none());
/// assert_eq!(
///     fingerprint("https://example.com/ding.mp3").unwrap().as_str(),
///     "https://example.com/ding.mp3"
/// );
/// ```
pub fn fingerprint(source: &str) -> Option<Fingerprint> {
    fingerprint_with(source, &FingerprintWindow::default())
}

/// Fingerprint `source` using an explicit window.
///
/// Returns `None` for empty input and for embedded payloads too short to
/// reach the window.
pub fn fingerprint_with(source: &str, window: &FingerprintWindow) -> Option<Fingerprint> {
    if source.is_empty() {
        return None;
    }

    if !source.starts_with(DATA_SCHEME) {
        return Some(Fingerprint::new(source));
    }

    let key: String = match source.find(',') {
        Some(comma) => source[comma + 1..]
            .chars()
            .skip(window.offset)
            .take(window.length)
            .collect(),
        None => source.chars().take(window.fallback_length).collect(),
    };

    if key.is_empty() {
        None
    } else {
        Some(Fingerprint::new(key))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
