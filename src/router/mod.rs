//! Sound classification and routing.
//!
//! The [`Router`] decides, for every intercepted playback, whether to swap the
//! requested sound for one of the user's replacement assets.  It owns all
//! classifier state ([`SoundState`]) and writes each mutation straight
//! through to a [`KeyValueStore`](crate::store::KeyValueStore).
//!
//! # Decision order
//!
//! ```text
//! disabled ─────────────────────────────▶ none
//! source is a configured asset ─────────▶ none
//! no fingerprint ───────────────────────▶ none
//! fingerprint of a configured asset ────▶ none
//! pending tag ──learn + consume─────────▶ tagged category's asset (or none)
//! learned fingerprint with asset ───────▶ learned category's asset
//! exactly one asset configured ─────────▶ that asset
//! several assets configured ──warn──────▶ first-declared configured asset
//! nothing configured ───────────────────▶ none
//! ```

pub mod category;
pub mod classifier;
pub mod state;
pub mod status;

pub use category::{Category, ReplacementAsset};
pub use classifier::{Decision, Router, RouterError};
pub use state::{AssetSlot, SoundState, StorageKeys, DEFAULT_KEY_PREFIX};
pub use status::{AssetStatus, Status};
