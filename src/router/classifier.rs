//! The classifier/router and its tag-mode learning state machine.

use thiserror::Error;

use crate::fingerprint::{fingerprint_with, Fingerprint, FingerprintWindow};
use crate::notify::{Notification, Notifier};
use crate::store::{KeyValueStore, StoreError};

use super::category::{Category, ReplacementAsset};
use super::state::{SoundState, StorageKeys};
use super::status::Status;

/// Fingerprint characters included in log lines and diagnostics.
const TAG_PREVIEW_CHARS: usize = 30;
const UNKNOWN_PREVIEW_CHARS: usize = 50;

// ---------------------------------------------------------------------------
// RouterError
// ---------------------------------------------------------------------------

/// Errors from explicit (user-requested) router operations.
///
/// [`Router::decide`] never fails; storage problems during classification are
/// logged and the in-memory decision stands.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The category is not part of the configured set.
    #[error("unknown category: {0}")]
    UnknownCategory(Category),

    /// The in-memory change was applied but could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Which rule produced the routing outcome for a single source.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Substitution is switched off.
    Disabled,
    /// The source is (or fingerprints like) one of our own assets.
    OwnAsset,
    /// The source yielded no fingerprint.
    NoFingerprint,
    /// A pending tag was consumed and the fingerprint learned.
    Tagged {
        category: Category,
        fingerprint: Fingerprint,
        replacement: Option<ReplacementAsset>,
    },
    /// The fingerprint was learned earlier.
    Learned {
        category: Category,
        replacement: ReplacementAsset,
    },
    /// Only one asset is configured; it replaces everything.
    SoleAsset {
        category: Category,
        replacement: ReplacementAsset,
    },
    /// Several assets are configured and nothing was learned for this sound.
    AmbiguousDefault {
        category: Category,
        replacement: ReplacementAsset,
    },
    /// No asset is configured at all.
    Unconfigured,
}

impl Decision {
    pub fn replacement(&self) -> Option<&ReplacementAsset> {
        match self {
            Decision::Tagged { replacement, .. } => replacement.as_ref(),
            Decision::Learned { replacement, .. }
            | Decision::SoleAsset { replacement, .. }
            | Decision::AmbiguousDefault { replacement, .. } => Some(replacement),
            _ => None,
        }
    }

    pub fn into_replacement(self) -> Option<ReplacementAsset> {
        match self {
            Decision::Tagged { replacement, .. } => replacement,
            Decision::Learned { replacement, .. }
            | Decision::SoleAsset { replacement, .. }
            | Decision::AmbiguousDefault { replacement, .. } => Some(replacement),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Owns the classifier state and decides replacements for intercepted sounds.
///
/// Single-writer: every mutation goes through a `&mut self` method and is
/// persisted immediately.
///
/// # Example
/// ```
/// use custom_sound::router::{Category, ReplacementAsset, Router, SoundState};
/// use custom_sound::store::MemoryStore;
///
/// let mut router = Router::new(SoundState::default(), Box::new(MemoryStore::new()));
/// let ding = ReplacementAsset::new("https://example.com/ding.mp3").unwrap();
/// router.set_asset(&Category::trade(), ding.clone()).unwrap();
///
/// // The only configured asset replaces any unknown sound...
/// assert_eq!(router.decide("https://example.com/original.mp3"), Some(ding.clone()));
/// // ...but never itself.
/// assert_eq!(router.decide(ding.as_str()), None);
/// ```
pub struct Router {
    state: SoundState,
    store: Box<dyn KeyValueStore>,
    keys: StorageKeys,
    window: FingerprintWindow,
    notifier: Notifier,
}

impl Router {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Wrap already-loaded `state`, persisting future mutations to `store`
    /// under the default [`StorageKeys`].
    pub fn new(state: SoundState, store: Box<dyn KeyValueStore>) -> Self {
        Self {
            state,
            store,
            keys: StorageKeys::default(),
            window: FingerprintWindow::default(),
            notifier: Notifier::disconnected(),
        }
    }

    /// Load state for `categories` from `store` and build a router over it.
    pub fn open(
        store: Box<dyn KeyValueStore>,
        keys: StorageKeys,
        categories: impl IntoIterator<Item = Category>,
    ) -> Result<Self, StoreError> {
        let state = SoundState::load(store.as_ref(), &keys, categories)?;
        log::info!(
            "Router ready | enabled: {} | assets: {} | learned mappings: {}",
            state.enabled(),
            state.configured().count(),
            state.learned().len()
        );
        Ok(Self::new(state, store).with_keys(keys))
    }

    pub fn with_keys(mut self, keys: StorageKeys) -> Self {
        self.keys = keys;
        self
    }

    pub fn with_window(mut self, window: FingerprintWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn state(&self) -> &SoundState {
        &self.state
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn status(&self) -> Status {
        Status::from_state(&self.state)
    }

    // -----------------------------------------------------------------------
    // Decision
    // -----------------------------------------------------------------------

    /// The asset to play instead of `source`, or `None` to leave it alone.
    pub fn decide(&mut self, source: &str) -> Option<ReplacementAsset> {
        self.classify(source).into_replacement()
    }

    /// Run the full decision procedure and report which rule fired.
    ///
    /// Consumes the pending tag whenever the tag-mode step is reached.
    pub fn classify(&mut self, source: &str) -> Decision {
        if !self.state.enabled() {
            return Decision::Disabled;
        }

        if self.state.configured().any(|(_, asset)| asset.as_str() == source) {
            return Decision::OwnAsset;
        }

        let Some(fp) = fingerprint_with(source, &self.window) else {
            return Decision::NoFingerprint;
        };

        if self.is_own_fingerprint(&fp) {
            log::debug!("Fingerprint belongs to a configured asset; leaving it alone");
            return Decision::OwnAsset;
        }

        if let Some(tag) = self.state.take_pending_tag() {
            return self.learn(fp, tag);
        }

        if let Some(category) = self.state.learned().get(&fp) {
            log::info!("Matched fingerprint -> {category}");
            if let Some(asset) = self.state.asset(category) {
                return Decision::Learned {
                    category: category.clone(),
                    replacement: asset.clone(),
                };
            }
        }

        self.fallback(&fp)
    }

    fn is_own_fingerprint(&self, fp: &Fingerprint) -> bool {
        self.state
            .configured()
            .any(|(_, asset)| fingerprint_with(asset.as_str(), &self.window).as_ref() == Some(fp))
    }

    fn learn(&mut self, fp: Fingerprint, tag: Category) -> Decision {
        self.state.learn(fp.clone(), tag.clone());
        if let Err(e) = self.persist_learned() {
            log::warn!("Could not persist learned mapping: {e}");
        }
        log::info!(
            "Tagged sound as \"{tag}\" (fingerprint: {}...)",
            fp.preview(TAG_PREVIEW_CHARS)
        );

        let replacement = self.state.asset(&tag).cloned();
        self.notifier.notify(Notification::Tagged {
            category: tag.clone(),
            fingerprint: fp.preview(TAG_PREVIEW_CHARS).to_string(),
            replaced: replacement.is_some(),
        });

        Decision::Tagged {
            category: tag,
            fingerprint: fp,
            replacement,
        }
    }

    fn fallback(&self, fp: &Fingerprint) -> Decision {
        let mut configured = self.state.configured();
        match (configured.next(), configured.next()) {
            (None, _) => Decision::Unconfigured,
            (Some((category, asset)), None) => Decision::SoleAsset {
                category: category.clone(),
                replacement: asset.clone(),
            },
            (Some((category, asset)), Some(_)) => {
                let preview = fp.preview(UNKNOWN_PREVIEW_CHARS);
                log::warn!(
                    "Unknown sound detected; tag it to teach the router. \
                     Falling back to {category}. Fingerprint: {preview}..."
                );
                self.notifier.notify(Notification::UnknownSound {
                    fingerprint: preview.to_string(),
                    fallback: category.clone(),
                });
                Decision::AmbiguousDefault {
                    category: category.clone(),
                    replacement: asset.clone(),
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Arm tag mode: the next classified sound is learned as `category`.
    ///
    /// Last write wins; returns the tag that was discarded, if any.
    pub fn set_pending_tag(&mut self, category: &Category) -> Result<Option<Category>, RouterError> {
        self.ensure_declared(category)?;
        let previous = self.state.replace_pending_tag(Some(category.clone()));
        log::info!("Tag mode ON: next intercepted sound will be tagged as {category}");
        Ok(previous)
    }

    /// Leave tag mode without learning anything.
    pub fn clear_pending_tag(&mut self) -> Option<Category> {
        self.state.replace_pending_tag(None)
    }

    /// Bind `asset` to `category`, replacing any previous asset.
    ///
    /// Learned mappings pointing at `category` are kept.
    pub fn set_asset(
        &mut self,
        category: &Category,
        asset: ReplacementAsset,
    ) -> Result<(), RouterError> {
        self.ensure_declared(category)?;
        let value = serde_json::to_value(&asset).map_err(StoreError::from)?;
        self.state.bind_asset(category, Some(asset));
        self.store.set(&self.keys.asset(category), value)?;
        log::info!("{} sound set", category.label());
        Ok(())
    }

    /// Unbind the asset of `category`; returns the removed asset.
    pub fn clear_asset(
        &mut self,
        category: &Category,
    ) -> Result<Option<ReplacementAsset>, RouterError> {
        self.ensure_declared(category)?;
        let previous = self.state.asset(category).cloned();
        self.state.bind_asset(category, None);
        self.store
            .set(&self.keys.asset(category), serde_json::Value::String(String::new()))?;
        log::info!("{} sound cleared", category.label());
        Ok(previous)
    }

    /// Forget every learned mapping; returns how many were removed.
    pub fn reset_learned_map(&mut self) -> Result<usize, RouterError> {
        let count = self.state.forget_all();
        self.persist_learned()?;
        log::info!("Learned tags reset ({count} removed)");
        Ok(count)
    }

    pub fn set_enabled(&mut self, enabled: bool) -> Result<(), RouterError> {
        self.state.set_enabled(enabled);
        self.store
            .set(&self.keys.enabled(), serde_json::Value::Bool(enabled))?;
        log::info!("Toggled: {}", if enabled { "ON" } else { "OFF" });
        Ok(())
    }

    /// Flip the enabled flag; returns the new value.
    pub fn toggle_enabled(&mut self) -> Result<bool, RouterError> {
        let enabled = !self.state.enabled();
        self.set_enabled(enabled)?;
        Ok(enabled)
    }

    fn ensure_declared(&self, category: &Category) -> Result<(), RouterError> {
        if self.state.is_declared(category) {
            Ok(())
        } else {
            Err(RouterError::UnknownCategory(category.clone()))
        }
    }

    fn persist_learned(&mut self) -> Result<(), StoreError> {
        let value = self.state.learned_json()?;
        self.store.set(&self.keys.learned_map(), value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::fingerprint;
    use crate::store::MemoryStore;
    use serde_json::{json, Value};

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    const TRADE_ASSET: &str = "https://assets.local/my-trade.mp3";
    const ALERT_ASSET: &str = "https://assets.local/my-alert.mp3";

    /// A platform sound: shared header, distinct interior.
    fn sound(marker: char) -> String {
        format!(
            "data:audio/mpeg;base64,{}{}",
            "SUQz".repeat(25),
            marker.to_string().repeat(300)
        )
    }

    fn asset(reference: &str) -> ReplacementAsset {
        ReplacementAsset::new(reference).unwrap()
    }

    fn router() -> Router {
        Router::new(SoundState::default(), Box::new(MemoryStore::new()))
    }

    fn router_with(trade: bool, alert: bool) -> Router {
        let mut r = router();
        if trade {
            r.set_asset(&Category::trade(), asset(TRADE_ASSET)).unwrap();
        }
        if alert {
            r.set_asset(&Category::alert(), asset(ALERT_ASSET)).unwrap();
        }
        r
    }

    /// Store double whose writes always fail.
    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<Value>, StoreError> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: Value) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    // -----------------------------------------------------------------------
    // Short-circuits
    // -----------------------------------------------------------------------

    #[test]
    fn disabled_returns_none_even_for_learned_sounds() {
        let mut r = router_with(true, true);
        r.set_pending_tag(&Category::alert()).unwrap();
        assert_eq!(r.decide(&sound('a')), Some(asset(ALERT_ASSET)));

        r.set_enabled(false).unwrap();
        assert_eq!(r.classify(&sound('a')), Decision::Disabled);
        assert_eq!(r.decide(&sound('z')), None);
        assert_eq!(r.decide("https://elsewhere/beep.wav"), None);
    }

    #[test]
    fn disabled_does_not_consume_pending_tag() {
        let mut r = router_with(true, true);
        r.set_enabled(false).unwrap();
        r.set_pending_tag(&Category::trade()).unwrap();
        r.decide(&sound('a'));
        assert_eq!(r.state().pending_tag(), Some(&Category::trade()));
    }

    #[test]
    fn configured_assets_are_never_replaced() {
        let mut r = router_with(true, true);
        assert_eq!(r.classify(TRADE_ASSET), Decision::OwnAsset);
        assert_eq!(r.decide(ALERT_ASSET), None);
    }

    #[test]
    fn own_asset_does_not_consume_pending_tag() {
        let mut r = router_with(true, false);
        r.set_pending_tag(&Category::alert()).unwrap();
        assert_eq!(r.decide(TRADE_ASSET), None);
        assert_eq!(r.state().pending_tag(), Some(&Category::alert()));
        assert!(r.state().learned().is_empty());
    }

    #[test]
    fn asset_fingerprint_is_treated_as_own() {
        let mut r = router();
        let uploaded = sound('u');
        r.set_asset(&Category::trade(), asset(&uploaded)).unwrap();

        // Same payload behind a different mime header.
        let reobserved = uploaded.replace("audio/mpeg", "audio/mp3");
        r.set_pending_tag(&Category::trade()).unwrap();
        assert_eq!(r.classify(&reobserved), Decision::OwnAsset);
        assert!(r.state().learned().is_empty());
    }

    #[test]
    fn unfingerprintable_source_returns_none() {
        let mut r = router_with(true, false);
        r.set_pending_tag(&Category::trade()).unwrap();
        assert_eq!(r.classify(""), Decision::NoFingerprint);
        assert_eq!(r.classify("data:audio/mpeg;base64,AAAA"), Decision::NoFingerprint);
        assert_eq!(r.state().pending_tag(), Some(&Category::trade()));
    }

    // -----------------------------------------------------------------------
    // Tag mode
    // -----------------------------------------------------------------------

    #[test]
    fn tag_mode_is_consumed_exactly_once() {
        let mut r = router_with(true, true);
        r.set_pending_tag(&Category::alert()).unwrap();

        let first = r.classify(&sound('a'));
        assert!(matches!(first, Decision::Tagged { ref category, .. } if *category == Category::alert()));
        assert!(r.state().pending_tag().is_none());

        let second = r.classify(&sound('b'));
        assert!(matches!(second, Decision::AmbiguousDefault { .. }));
        assert_eq!(r.state().learned().len(), 1);
        assert_eq!(
            r.state().learned().get(&fingerprint(&sound('a')).unwrap()),
            Some(&Category::alert())
        );
    }

    #[test]
    fn tag_mode_without_asset_learns_but_does_not_replace() {
        let mut r = router_with(true, false);
        r.set_pending_tag(&Category::alert()).unwrap();

        assert_eq!(r.decide(&sound('a')), None);
        assert!(r.state().pending_tag().is_none());
        assert_eq!(r.state().learned().len(), 1);

        // Learned category has no asset: falls through to the sole asset.
        let d = r.classify(&sound('a'));
        assert!(matches!(d, Decision::SoleAsset { .. }));
        assert_eq!(d.into_replacement(), Some(asset(TRADE_ASSET)));
    }

    #[test]
    fn tag_mode_overrides_existing_mapping() {
        let mut r = router_with(true, true);
        r.set_pending_tag(&Category::trade()).unwrap();
        r.decide(&sound('a'));
        r.set_pending_tag(&Category::alert()).unwrap();
        assert_eq!(r.decide(&sound('a')), Some(asset(ALERT_ASSET)));
        assert_eq!(r.decide(&sound('a')), Some(asset(ALERT_ASSET)));
    }

    #[test]
    fn pending_tag_is_last_write_wins() {
        let mut r = router_with(true, true);
        assert_eq!(r.set_pending_tag(&Category::trade()).unwrap(), None);
        assert_eq!(
            r.set_pending_tag(&Category::alert()).unwrap(),
            Some(Category::trade())
        );
        assert_eq!(r.decide(&sound('a')), Some(asset(ALERT_ASSET)));
    }

    #[test]
    fn pending_tag_can_be_cancelled() {
        let mut r = router_with(true, true);
        r.set_pending_tag(&Category::trade()).unwrap();
        assert_eq!(r.clear_pending_tag(), Some(Category::trade()));
        assert!(matches!(r.classify(&sound('a')), Decision::AmbiguousDefault { .. }));
        assert!(r.state().learned().is_empty());
    }

    #[test]
    fn tagging_persists_learned_map() {
        let mut r = router_with(true, true);
        r.set_pending_tag(&Category::trade()).unwrap();
        r.decide(&sound('a'));

        let fp = fingerprint(&sound('a')).unwrap();
        let stored = r.store().get("tv_custom_sound_map").unwrap().unwrap();
        assert_eq!(stored, json!({ (fp.as_str()): "trade" }));
    }

    #[test]
    fn tagging_survives_storage_failure_in_memory() {
        let mut r = Router::new(SoundState::default(), Box::new(FailingStore));
        r.set_pending_tag(&Category::trade()).unwrap();
        r.decide(&sound('a'));
        assert_eq!(r.state().learned().len(), 1);
        assert!(r.state().pending_tag().is_none());
    }

    #[test]
    fn tagging_emits_notification() {
        let (notifier, mut rx) = Notifier::channel();
        let mut r = router_with(true, true).with_notifier(notifier);
        r.set_pending_tag(&Category::trade()).unwrap();
        r.decide(&sound('a'));

        match rx.try_recv().unwrap() {
            Notification::Tagged {
                category,
                fingerprint,
                replaced,
            } => {
                assert_eq!(category, Category::trade());
                assert_eq!(fingerprint.len(), TAG_PREVIEW_CHARS);
                assert!(replaced);
            }
            other => panic!("unexpected notification: {other:?}"),
        }
    }

    // -----------------------------------------------------------------------
    // Learned lookup and fallbacks
    // -----------------------------------------------------------------------

    #[test]
    fn learned_sound_is_recalled_every_time() {
        let mut r = router_with(true, true);
        r.set_pending_tag(&Category::alert()).unwrap();
        r.decide(&sound('a'));

        for _ in 0..3 {
            assert_eq!(
                r.classify(&sound('a')),
                Decision::Learned {
                    category: Category::alert(),
                    replacement: asset(ALERT_ASSET),
                }
            );
        }
    }

    #[test]
    fn sole_asset_replaces_unknown_sounds() {
        let mut r = router_with(true, false);
        assert_eq!(r.decide(&sound('x')), Some(asset(TRADE_ASSET)));
        assert_eq!(r.decide("https://elsewhere/beep.wav"), Some(asset(TRADE_ASSET)));

        let mut r = router_with(false, true);
        assert_eq!(r.decide(&sound('x')), Some(asset(ALERT_ASSET)));
    }

    #[test]
    fn ambiguous_falls_back_to_first_declared_and_warns() {
        let (notifier, mut rx) = Notifier::channel();
        let mut r = router_with(true, true).with_notifier(notifier);

        assert_eq!(
            r.classify(&sound('q')),
            Decision::AmbiguousDefault {
                category: Category::trade(),
                replacement: asset(TRADE_ASSET),
            }
        );
        assert!(matches!(
            rx.try_recv().unwrap(),
            Notification::UnknownSound { fallback, .. } if fallback == Category::trade()
        ));
    }

    #[test]
    fn nothing_configured_returns_none() {
        let mut r = router();
        assert_eq!(r.classify(&sound('q')), Decision::Unconfigured);
    }

    #[test]
    fn declaration_order_decides_default() {
        let state = SoundState::new(vec![Category::alert(), Category::trade()]);
        let mut r = Router::new(state, Box::new(MemoryStore::new()));
        r.set_asset(&Category::trade(), asset(TRADE_ASSET)).unwrap();
        r.set_asset(&Category::alert(), asset(ALERT_ASSET)).unwrap();
        assert_eq!(r.decide(&sound('q')), Some(asset(ALERT_ASSET)));
    }

    #[test]
    fn three_categories_use_first_configured_default() {
        let chime = Category::new("chime");
        let state = SoundState::new(vec![Category::trade(), Category::alert(), chime.clone()]);
        let mut r = Router::new(state, Box::new(MemoryStore::new()));
        r.set_asset(&Category::alert(), asset(ALERT_ASSET)).unwrap();
        r.set_asset(&chime, asset("https://assets.local/chime.ogg")).unwrap();

        // trade unconfigured: alert is the first configured category.
        assert_eq!(r.decide(&sound('q')), Some(asset(ALERT_ASSET)));

        r.set_pending_tag(&chime).unwrap();
        r.decide(&sound('c'));
        assert_eq!(
            r.decide(&sound('c')),
            Some(asset("https://assets.local/chime.ogg"))
        );
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    #[test]
    fn reset_clears_only_learned_entries() {
        let mut r = router_with(true, true);
        r.set_pending_tag(&Category::alert()).unwrap();
        r.decide(&sound('a'));

        assert_eq!(r.reset_learned_map().unwrap(), 1);
        assert!(r.state().learned().is_empty());
        assert!(r.state().enabled());
        assert_eq!(r.state().configured().count(), 2);
        assert!(matches!(r.classify(&sound('a')), Decision::AmbiguousDefault { .. }));
        assert_eq!(r.store().get("tv_custom_sound_map").unwrap(), Some(json!({})));
    }

    #[test]
    fn changing_asset_keeps_learned_entries() {
        let mut r = router_with(true, true);
        r.set_pending_tag(&Category::alert()).unwrap();
        r.decide(&sound('a'));

        let louder = "https://assets.local/louder-alert.mp3";
        r.set_asset(&Category::alert(), asset(louder)).unwrap();
        assert_eq!(r.decide(&sound('a')), Some(asset(louder)));
        assert_eq!(r.state().learned().len(), 1);
    }

    #[test]
    fn clearing_asset_persists_empty_value() {
        let mut r = router_with(true, true);
        let removed = r.clear_asset(&Category::trade()).unwrap();
        assert_eq!(removed, Some(asset(TRADE_ASSET)));
        assert_eq!(
            r.store().get("tv_custom_sound_trade_base64").unwrap(),
            Some(json!(""))
        );
        // Only alert is left: sole-asset fallback.
        assert_eq!(r.decide(&sound('q')), Some(asset(ALERT_ASSET)));
    }

    #[test]
    fn toggle_flips_and_persists() {
        let mut r = router();
        assert!(!r.toggle_enabled().unwrap());
        assert_eq!(r.store().get("tv_custom_sound_enabled").unwrap(), Some(json!(false)));
        assert!(r.toggle_enabled().unwrap());
    }

    #[test]
    fn unknown_category_is_rejected() {
        let mut r = router();
        let bogus = Category::new("bogus");
        assert!(matches!(
            r.set_pending_tag(&bogus),
            Err(RouterError::UnknownCategory(_))
        ));
        assert!(matches!(
            r.set_asset(&bogus, asset(TRADE_ASSET)),
            Err(RouterError::UnknownCategory(_))
        ));
        assert!(r.state().pending_tag().is_none());
    }

    #[test]
    fn explicit_actions_surface_storage_failure() {
        let mut r = Router::new(SoundState::default(), Box::new(FailingStore));
        let err = r.set_asset(&Category::trade(), asset(TRADE_ASSET)).unwrap_err();
        assert!(matches!(err, RouterError::Store(_)));
        // In-memory state still reflects the change for this process.
        assert_eq!(r.decide(&sound('q')), Some(asset(TRADE_ASSET)));
    }

    #[test]
    fn open_reloads_persisted_state() {
        let mut r = router_with(true, true);
        r.set_pending_tag(&Category::alert()).unwrap();
        r.decide(&sound('a'));

        let mut copy = MemoryStore::new();
        for key in [
            "tv_custom_sound_trade_base64",
            "tv_custom_sound_alert_base64",
            "tv_custom_sound_map",
        ] {
            if let Some(v) = r.store().get(key).unwrap() {
                copy.set(key, v).unwrap();
            }
        }

        let mut reopened =
            Router::open(Box::new(copy), StorageKeys::default(), Category::defaults()).unwrap();
        assert_eq!(reopened.decide(&sound('a')), Some(asset(ALERT_ASSET)));
    }

    // -----------------------------------------------------------------------
    // End to end
    // -----------------------------------------------------------------------

    #[test]
    fn tag_then_recall_then_unknown() {
        let (notifier, mut rx) = Notifier::channel();
        let mut r = router_with(true, true).with_notifier(notifier);
        let payload1 = sound('p');

        r.set_pending_tag(&Category::trade()).unwrap();
        assert_eq!(r.decide(&payload1), Some(asset(TRADE_ASSET)));
        assert_eq!(
            r.state().learned().get(&fingerprint(&payload1).unwrap()),
            Some(&Category::trade())
        );
        assert!(matches!(rx.try_recv().unwrap(), Notification::Tagged { .. }));

        // Same interior window, different header bytes.
        let same_fp = payload1.replacen("SUQz", "//uQ", 1);
        assert_eq!(fingerprint(&same_fp), fingerprint(&payload1));
        assert_eq!(r.decide(&same_fp), Some(asset(TRADE_ASSET)));
        assert!(rx.try_recv().is_err());

        assert_eq!(r.decide(&sound('u')), Some(asset(TRADE_ASSET)));
        assert!(matches!(rx.try_recv().unwrap(), Notification::UnknownSound { .. }));
    }
}
