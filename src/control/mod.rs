//! User-facing control surface.
//!
//! This module provides:
//! * [`ControlAction`] — the actions a menu/CLI can request.
//! * [`Command`] — a control action, an intercepted playback, rejected
//!   input, or quit.
//! * [`Session`] — executes commands against the router and reports each
//!   outcome as a [`Notification`](crate::notify::Notification).
//! * [`AssetLoader`] / [`FileAssetLoader`] — file → `data:` asset ingestion.
//! * [`parse_command`] — line-oriented command parser for the binary.

pub mod ingest;
pub mod parse;
pub mod session;

pub use ingest::{mime_for, AssetLoader, FileAssetLoader, IngestError, LoadedAsset};
pub use parse::{parse_command, ParseError};
pub use session::Session;

use std::path::PathBuf;

use crate::router::Category;

// ---------------------------------------------------------------------------
// ControlAction
// ---------------------------------------------------------------------------

/// Actions exposed to the menu collaborator.
///
/// Destructive actions carry a `confirmed` flag; without it the session asks
/// for confirmation instead of acting.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    /// Ingest `path` and bind it to `category`.
    Upload { category: Category, path: PathBuf },
    /// Play the raw asset of `category`, bypassing the router.
    Test { category: Category },
    /// Remove the asset of `category`.
    Clear { category: Category, confirmed: bool },
    /// Learn the next intercepted sound as `category`.
    TagNext { category: Category },
    /// Forget every learned fingerprint.
    ResetLearned { confirmed: bool },
    /// Flip the enabled flag.
    Toggle,
    /// Report enabled state, assets and learned count.
    Status,
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Everything a [`Session`] can be asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A playback attempt observed by the interception shim.
    Play(String),
    Control(ControlAction),
    /// Input that could not be parsed; reported back through the session.
    Invalid { input: String, reason: String },
    Quit,
}
