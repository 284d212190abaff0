//! Router-owned state and its storage layout.
//!
//! [`SoundState`] holds the four pieces of state the classifier works on:
//!
//! | Piece | Persisted under | Default |
//! |-------|-----------------|---------|
//! | asset per category | `{prefix}_{category}_base64` | empty |
//! | enabled flag | `{prefix}_enabled` | `true` |
//! | learned map | `{prefix}_map` | `{}` |
//! | pending tag | not persisted | none |
//!
//! Fields are private; only the [`Router`](super::Router) mutates them.

use std::collections::HashMap;

use serde_json::Value;

use crate::fingerprint::Fingerprint;
use crate::store::{KeyValueStore, StoreError};

use super::category::{Category, ReplacementAsset};

pub const DEFAULT_KEY_PREFIX: &str = "tv_custom_sound";

// ---------------------------------------------------------------------------
// StorageKeys
// ---------------------------------------------------------------------------

/// Store keys derived from a common prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    prefix: String,
}

impl StorageKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn asset(&self, category: &Category) -> String {
        format!("{}_{}_base64", self.prefix, category.as_str())
    }

    pub fn enabled(&self) -> String {
        format!("{}_enabled", self.prefix)
    }

    pub fn learned_map(&self) -> String {
        format!("{}_map", self.prefix)
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX)
    }
}

// ---------------------------------------------------------------------------
// AssetSlot
// ---------------------------------------------------------------------------

/// A declared category and the asset currently bound to it.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSlot {
    pub category: Category,
    pub asset: Option<ReplacementAsset>,
}

// ---------------------------------------------------------------------------
// SoundState
// ---------------------------------------------------------------------------

/// Asset bindings, learned map, pending tag and enabled flag.
#[derive(Debug, Clone)]
pub struct SoundState {
    slots: Vec<AssetSlot>,
    learned: HashMap<Fingerprint, Category>,
    pending_tag: Option<Category>,
    enabled: bool,
}

impl SoundState {
    /// Fresh state for the given categories, in declaration order.
    ///
    /// Duplicate declarations are dropped (first one wins).
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut slots: Vec<AssetSlot> = Vec::new();
        for category in categories {
            if slots.iter().all(|s| s.category != category) {
                slots.push(AssetSlot {
                    category,
                    asset: None,
                });
            }
        }

        Self {
            slots,
            learned: HashMap::new(),
            pending_tag: None,
            enabled: true,
        }
    }

    /// Read persisted state from `store`.
    ///
    /// Missing keys take their defaults.  Values of the wrong JSON type are
    /// logged and ignored rather than treated as errors.
    pub fn load(
        store: &dyn KeyValueStore,
        keys: &StorageKeys,
        categories: impl IntoIterator<Item = Category>,
    ) -> Result<Self, StoreError> {
        let mut state = Self::new(categories);

        for slot in &mut state.slots {
            let key = keys.asset(&slot.category);
            slot.asset = match store.get(&key)? {
                Some(Value::String(s)) => ReplacementAsset::new(s),
                Some(other) => {
                    log::warn!("Ignoring non-string asset under {key}: {other}");
                    None
                }
                None => None,
            };
        }

        let key = keys.enabled();
        state.enabled = match store.get(&key)? {
            Some(Value::Bool(b)) => b,
            Some(other) => {
                log::warn!("Ignoring non-boolean flag under {key}: {other}");
                true
            }
            None => true,
        };

        let key = keys.learned_map();
        match store.get(&key)? {
            Some(Value::Object(map)) => {
                for (fp, category) in map {
                    match category {
                        Value::String(name) => {
                            state.learned.insert(Fingerprint::new(fp), Category::new(name));
                        }
                        other => log::warn!("Skipping learned entry with value {other}"),
                    }
                }
            }
            Some(other) => log::warn!("Ignoring non-object learned map under {key}: {other}"),
            None => {}
        }

        Ok(state)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn slots(&self) -> &[AssetSlot] {
        &self.slots
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.slots.iter().map(|s| &s.category)
    }

    pub fn is_declared(&self, category: &Category) -> bool {
        self.slots.iter().any(|s| &s.category == category)
    }

    pub fn asset(&self, category: &Category) -> Option<&ReplacementAsset> {
        self.slots
            .iter()
            .find(|s| &s.category == category)
            .and_then(|s| s.asset.as_ref())
    }

    /// Categories with an asset bound, in declaration order.
    pub fn configured(&self) -> impl Iterator<Item = (&Category, &ReplacementAsset)> {
        self.slots
            .iter()
            .filter_map(|s| s.asset.as_ref().map(|a| (&s.category, a)))
    }

    pub fn learned(&self) -> &HashMap<Fingerprint, Category> {
        &self.learned
    }

    pub fn pending_tag(&self) -> Option<&Category> {
        self.pending_tag.as_ref()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// The learned map in its persisted JSON shape.
    pub fn learned_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(&self.learned)
    }

    // -----------------------------------------------------------------------
    // Mutation (router only)
    // -----------------------------------------------------------------------

    /// No-op for an undeclared `category`; the router checks first.
    pub(super) fn bind_asset(&mut self, category: &Category, asset: Option<ReplacementAsset>) {
        if let Some(slot) = self.slots.iter_mut().find(|s| &s.category == category) {
            slot.asset = asset;
        }
    }

    pub(super) fn learn(&mut self, fingerprint: Fingerprint, category: Category) {
        self.learned.insert(fingerprint, category);
    }

    /// Clears the map and returns how many entries were dropped.
    pub(super) fn forget_all(&mut self) -> usize {
        let count = self.learned.len();
        self.learned.clear();
        count
    }

    pub(super) fn replace_pending_tag(&mut self, tag: Option<Category>) -> Option<Category> {
        std::mem::replace(&mut self.pending_tag, tag)
    }

    pub(super) fn take_pending_tag(&mut self) -> Option<Category> {
        self.pending_tag.take()
    }

    pub(super) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl Default for SoundState {
    fn default() -> Self {
        Self::new(Category::defaults())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
