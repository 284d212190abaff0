//! Command execution against a single router.
//!
//! [`Session`] is the only writer of router state: intercepted playbacks and
//! control actions are executed one at a time, in arrival order.

use std::sync::Arc;

use crate::intercept::{AudioElement, InterceptionShim, PlaybackError};
use crate::notify::{Notification, Notifier};
use crate::router::{Category, Router, RouterError};

use super::ingest::AssetLoader;
use super::{Command, ControlAction};

/// Owns the router, the interception shim and the asset loader.
pub struct Session {
    router: Router,
    shim: InterceptionShim,
    loader: Arc<dyn AssetLoader>,
    notifier: Notifier,
}

impl Session {
    /// Build a session; the router's diagnostics are routed to `notifier`.
    pub fn new(
        router: Router,
        shim: InterceptionShim,
        loader: Arc<dyn AssetLoader>,
        notifier: Notifier,
    ) -> Self {
        Self {
            router: router.with_notifier(notifier.clone()),
            shim,
            loader,
            notifier,
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Execute one command.  Returns `false` once the session should stop.
    pub async fn execute(&mut self, command: Command) -> bool {
        match command {
            Command::Play(src) => {
                if let Err(e) = self.intercept(&src) {
                    log::warn!("Playback failed: {e}");
                    self.notifier.notify(Notification::PlaybackFailed {
                        reason: e.to_string(),
                    });
                }
                true
            }
            Command::Control(action) => {
                self.handle(action).await;
                true
            }
            Command::Invalid { input, reason } => {
                self.notifier.notify(Notification::InvalidCommand { input, reason });
                true
            }
            Command::Quit => false,
        }
    }

    /// Intercepted playback: construct, then play, through the router.
    pub fn intercept(&mut self, src: &str) -> Result<AudioElement, PlaybackError> {
        self.shim.play_source(&mut self.router, src)
    }

    /// Execute a control action, reporting the outcome as a notification.
    pub async fn handle(&mut self, action: ControlAction) {
        let notification = match action {
            ControlAction::Upload { category, path } => {
                if !self.router.state().is_declared(&category) {
                    return self.unknown(&category);
                }
                match self.loader.load(&path).await {
                    Ok(loaded) => {
                        let size_kb = loaded.size_kb();
                        let file_name = loaded.file_name.clone();
                        match self.router.set_asset(&category, loaded.asset) {
                            Ok(()) => Notification::Uploaded {
                                category,
                                file_name,
                                size_kb,
                            },
                            Err(e) => self.router_failure(e),
                        }
                    }
                    Err(e) => {
                        log::warn!("Failed to read file: {e}");
                        Notification::UploadFailed {
                            category,
                            reason: e.to_string(),
                        }
                    }
                }
            }

            ControlAction::Test { category } => {
                if !self.router.state().is_declared(&category) {
                    return self.unknown(&category);
                }
                let Some(asset) = self.router.state().asset(&category).cloned() else {
                    return self.notifier.notify(Notification::NothingToTest { category });
                };
                log::info!("Testing {category} sound...");
                self.notifier.notify(Notification::Testing {
                    category: category.clone(),
                });
                match self.shim.player().play(asset.as_str()) {
                    Ok(()) => return,
                    Err(e) => {
                        log::warn!("Playback failed: {e}");
                        Notification::PlaybackFailed {
                            reason: e.to_string(),
                        }
                    }
                }
            }

            ControlAction::Clear {
                category,
                confirmed,
            } => {
                if !self.router.state().is_declared(&category) {
                    return self.unknown(&category);
                }
                if self.router.state().asset(&category).is_none() {
                    Notification::NothingToClear { category }
                } else if !confirmed {
                    Notification::ConfirmationRequired {
                        prompt: format!("Remove {category} sound?"),
                    }
                } else {
                    match self.router.clear_asset(&category) {
                        Ok(_) => Notification::AssetCleared { category },
                        Err(e) => self.router_failure(e),
                    }
                }
            }

            ControlAction::TagNext { category } => match self.router.set_pending_tag(&category) {
                Ok(_) => Notification::TagModeArmed { category },
                Err(e) => self.router_failure(e),
            },

            ControlAction::ResetLearned { confirmed } => {
                let count = self.router.state().learned().len();
                if count == 0 {
                    Notification::NothingToReset
                } else if !confirmed {
                    Notification::ConfirmationRequired {
                        prompt: format!("Reset {count} learned tag(s)?"),
                    }
                } else {
                    match self.router.reset_learned_map() {
                        Ok(count) => Notification::LearnedReset { count },
                        Err(e) => self.router_failure(e),
                    }
                }
            }

            ControlAction::Toggle => match self.router.toggle_enabled() {
                Ok(enabled) => Notification::Toggled { enabled },
                Err(e) => self.router_failure(e),
            },

            ControlAction::Status => Notification::Status(self.router.status()),
        };

        self.notifier.notify(notification);
    }

    fn unknown(&self, category: &Category) {
        self.notifier.notify(Notification::UnknownCategory {
            name: category.to_string(),
        });
    }

    fn router_failure(&self, error: RouterError) -> Notification {
        match error {
            RouterError::UnknownCategory(category) => Notification::UnknownCategory {
                name: category.to_string(),
            },
            RouterError::Store(e) => {
                log::warn!("Storage failure: {e}");
                Notification::StorageFailed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
