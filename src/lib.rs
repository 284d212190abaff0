//! Replace a platform's built-in sounds with your own, per category.
//!
//! Every intercepted playback is fingerprinted and routed:
//!
//! ```text
//! playback attempt ─▶ InterceptionShim ─▶ Router::decide(source) ─▶ replacement | unchanged
//! ```
//!
//! The router learns which category a sound belongs to through tag mode
//! ("the next sound that plays is a trade sound") and remembers the
//! association in a persistent key-value store.
//!
//! * [`fingerprint`] — stable keys for sound sources.
//! * [`router`] — categories, assets, learned map and the decision procedure.
//! * [`store`] — persistent key-value storage.
//! * [`intercept`] — playback hook and the playback substrate seam.
//! * [`control`] — control-surface actions, asset ingestion, sessions.
//! * [`notify`] — user-visible notification side channel.
//! * [`config`] — TOML settings and platform paths.

pub mod config;
pub mod control;
pub mod fingerprint;
pub mod intercept;
pub mod notify;
pub mod router;
pub mod store;
