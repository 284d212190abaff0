//! Playback substrate seam.
//!
//! The crate never decodes audio.  Whatever actually makes noise implements
//! [`Player`]; [`LogPlayer`] stands in for it in the headless binary.

use std::sync::Mutex;

use thiserror::Error;

/// Errors reported by a [`Player`].
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Nothing to play.
    #[error("empty source")]
    EmptySource,

    /// The substrate refused or failed to start playback.
    #[error("playback rejected: {0}")]
    Rejected(String),
}

/// Something that starts playback of a source identifier.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn Player>`).
pub trait Player: Send + Sync {
    fn play(&self, source: &str) -> Result<(), PlaybackError>;
}

// ---------------------------------------------------------------------------
// LogPlayer
// ---------------------------------------------------------------------------

/// Logs each playback request instead of producing sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPlayer;

impl Player for LogPlayer {
    fn play(&self, source: &str) -> Result<(), PlaybackError> {
        if source.is_empty() {
            return Err(PlaybackError::EmptySource);
        }
        log::info!("play | src: {}", preview(source, 80));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RecordingPlayer
// ---------------------------------------------------------------------------

/// Remembers every source it was asked to play.
#[derive(Debug, Default)]
pub struct RecordingPlayer {
    played: Mutex<Vec<String>>,
}

impl RecordingPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sources played so far, oldest first.
    pub fn played(&self) -> Vec<String> {
        self.played.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Player for RecordingPlayer {
    fn play(&self, source: &str) -> Result<(), PlaybackError> {
        if source.is_empty() {
            return Err(PlaybackError::EmptySource);
        }
        if let Ok(mut played) = self.played.lock() {
            played.push(source.to_string());
        }
        Ok(())
    }
}

/// Truncate long `data:` URIs for log output.
pub(crate) fn preview(source: &str, max_chars: usize) -> String {
    match source.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &source[..idx]),
        None => source.to_string(),
    }
}
