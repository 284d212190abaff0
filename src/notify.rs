//! User-visible notification side channel.
//!
//! Control actions and the router's diagnostics are reported as
//! [`Notification`] values instead of blocking dialogs.  A [`Notifier`] is a
//! cheap-to-clone handle around an unbounded `tokio` sender; a notifier
//! without a receiver silently drops everything, which keeps tests and
//! headless embeddings free of any UI dependency.

use std::fmt;

use tokio::sync::mpsc;

use crate::router::{Category, Status};

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// Outcome or diagnostic surfaced to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Tag mode bound the sound to `category`.
    Tagged {
        category: Category,
        fingerprint: String,
        replaced: bool,
    },
    /// Several assets are configured and the sound is not learned yet; the
    /// `fallback` category's asset was used.
    UnknownSound {
        fingerprint: String,
        fallback: Category,
    },
    /// The next intercepted sound will be tagged as `category`.
    TagModeArmed { category: Category },
    Uploaded {
        category: Category,
        file_name: String,
        size_kb: f64,
    },
    UploadFailed { category: Category, reason: String },
    Testing { category: Category },
    NothingToTest { category: Category },
    PlaybackFailed { reason: String },
    NothingToClear { category: Category },
    AssetCleared { category: Category },
    NothingToReset,
    LearnedReset { count: usize },
    /// A destructive action was requested without confirmation.
    ConfirmationRequired { prompt: String },
    Toggled { enabled: bool },
    Status(Status),
    UnknownCategory { name: String },
    StorageFailed { reason: String },
    InvalidCommand { input: String, reason: String },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Tagged {
                category,
                fingerprint,
                ..
            } => write!(f, "Tagged sound as \"{category}\" (fingerprint: {fingerprint}...)"),
            Notification::UnknownSound {
                fingerprint,
                fallback,
            } => write!(
                f,
                "Unknown sound detected! Use \"tag <category>\" to teach me. \
                 Playing the {fallback} sound for now. Fingerprint: {fingerprint}..."
            ),
            Notification::TagModeArmed { category } => write!(
                f,
                "Tag mode: {}. The next sound that plays will be remembered as a {} sound.",
                category.as_str().to_uppercase(),
                category.label()
            ),
            Notification::Uploaded {
                category,
                file_name,
                size_kb,
            } => write!(
                f,
                "{} sound uploaded! File: {file_name}, Size: {size_kb:.1} KB",
                category.label()
            ),
            Notification::UploadFailed { category, reason } => {
                write!(f, "Failed to read the {category} audio file: {reason}")
            }
            Notification::Testing { category } => write!(f, "Testing {category} sound..."),
            Notification::NothingToTest { category } => {
                write!(f, "No {category} sound uploaded yet.")
            }
            Notification::PlaybackFailed { reason } => write!(f, "Playback failed: {reason}"),
            Notification::NothingToClear { category } => {
                write!(f, "No {category} sound to clear.")
            }
            Notification::AssetCleared { category } => {
                write!(f, "{} sound removed.", category.label())
            }
            Notification::NothingToReset => f.write_str("No learned tags to reset."),
            Notification::LearnedReset { count } => {
                write!(f, "All learned tags cleared ({count} removed).")
            }
            Notification::ConfirmationRequired { prompt } => {
                write!(f, "{prompt} Repeat the command with --yes to confirm.")
            }
            Notification::Toggled { enabled } => {
                f.write_str(if *enabled { "Enabled" } else { "Disabled" })
            }
            Notification::Status(status) => write!(f, "{status}"),
            Notification::UnknownCategory { name } => write!(f, "Unknown category \"{name}\"."),
            Notification::StorageFailed { reason } => write!(f, "Could not save: {reason}"),
            Notification::InvalidCommand { input, reason } => {
                write!(f, "Cannot run \"{input}\": {reason}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Sending half of the notification channel.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    tx: Option<mpsc::UnboundedSender<Notification>>,
}

impl Notifier {
    /// A notifier connected to a fresh receiver.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A notifier that drops every notification.
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Fire-and-forget; a closed receiver is not an error.
    pub fn notify(&self, notification: Notification) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(notification);
        }
    }
}
