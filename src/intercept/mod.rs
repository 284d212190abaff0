//! Interception of playback requests.
//!
//! The platform integration registers one callback, [`PlaybackHook::before_play`],
//! which the [`Router`] satisfies.  [`InterceptionShim`] applies it on the two
//! paths through which a page can start a sound:
//!
//! 1. **Construct** — an audio element is created for a source
//!    ([`InterceptionShim::construct`]).
//! 2. **Play** — `play()` is invoked on an element that already has a source
//!    ([`InterceptionShim::play`]).
//!
//! A construct that substitutes a replacement is usually followed by a play
//! of the same element; the router's self-suppression keeps that second pass
//! from replacing the replacement.

pub mod player;

pub use player::{LogPlayer, PlaybackError, Player, RecordingPlayer};

use std::sync::Arc;

use crate::router::Router;

use player::preview;

// ---------------------------------------------------------------------------
// PlaybackHook
// ---------------------------------------------------------------------------

/// Callback consulted immediately before playback.
pub trait PlaybackHook {
    /// `Some(replacement)` to substitute the source, `None` to leave it.
    fn before_play(&mut self, source: &str) -> Option<String>;
}

impl PlaybackHook for Router {
    fn before_play(&mut self, source: &str) -> Option<String> {
        self.decide(source).map(|asset| asset.into_inner())
    }
}

// ---------------------------------------------------------------------------
// AudioElement
// ---------------------------------------------------------------------------

/// Minimal model of a platform audio element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioElement {
    /// Source explicitly assigned to the element.
    pub src: String,
    /// Source the element resolved and is currently using, if different.
    pub current_src: String,
}

impl AudioElement {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            current_src: String::new(),
        }
    }

    /// `src` when set, otherwise `current_src`.
    pub fn effective_src(&self) -> &str {
        if self.src.is_empty() {
            &self.current_src
        } else {
            &self.src
        }
    }
}

// ---------------------------------------------------------------------------
// InterceptionShim
// ---------------------------------------------------------------------------

/// Applies a [`PlaybackHook`] on both playback paths and forwards to the
/// underlying [`Player`].
#[derive(Clone)]
pub struct InterceptionShim {
    player: Arc<dyn Player>,
}

impl InterceptionShim {
    pub fn new(player: Arc<dyn Player>) -> Self {
        Self { player }
    }

    /// The underlying player, for callers that must bypass interception.
    pub fn player(&self) -> &Arc<dyn Player> {
        &self.player
    }

    /// Construct path: build an element for `src`, substituting if the hook
    /// asks for it.  Does not start playback.
    pub fn construct(&self, hook: &mut dyn PlaybackHook, src: Option<&str>) -> AudioElement {
        let src = src.unwrap_or_default();
        log::debug!("Audio() intercepted | src: {}", preview(src, 80));

        match hook.before_play(src) {
            Some(replacement) => {
                log::info!("Replacing with custom sound");
                AudioElement::new(replacement)
            }
            None => AudioElement::new(src),
        }
    }

    /// Play path: substitute the element's source if the hook asks for it,
    /// then start playback.
    pub fn play(
        &self,
        hook: &mut dyn PlaybackHook,
        element: &mut AudioElement,
    ) -> Result<(), PlaybackError> {
        let src = element.effective_src().to_string();
        log::debug!("play() intercepted | src: {}", preview(&src, 80));

        if let Some(replacement) = hook.before_play(&src) {
            log::info!("Replacing with custom sound");
            element.src = replacement;
        }

        self.player.play(element.effective_src())
    }

    /// Construct-then-play, the common `new Audio(src).play()` idiom.
    pub fn play_source(
        &self,
        hook: &mut dyn PlaybackHook,
        src: &str,
    ) -> Result<AudioElement, PlaybackError> {
        let mut element = self.construct(hook, Some(src));
        self.play(hook, &mut element)?;
        Ok(element)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
