//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::fingerprint::FingerprintWindow;
use crate::router::{Category, StorageKeys, DEFAULT_KEY_PREFIX};

// ---------------------------------------------------------------------------
// RouterConfig
// ---------------------------------------------------------------------------

/// Classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Declared categories, in order.  The first one with an asset is the
    /// default when a sound is unknown and several assets are configured.
    pub categories: Vec<String>,
    /// Fingerprint sampling window for embedded payloads.
    pub fingerprint: FingerprintWindow,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            categories: vec![Category::TRADE.into(), Category::ALERT.into()],
            fingerprint: FingerprintWindow::default(),
        }
    }
}

impl RouterConfig {
    /// Declared categories as [`Category`] values (blank names dropped).
    pub fn categories(&self) -> Vec<Category> {
        self.categories
            .iter()
            .filter(|name| !name.trim().is_empty())
            .map(Category::new)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// StorageConfig
// ---------------------------------------------------------------------------

/// Where and under which keys router state is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Store file override — `None` means `<config dir>/store.json`.
    pub store_file: Option<PathBuf>,
    /// Prefix shared by every persisted key.
    pub key_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_file: None,
            key_prefix: DEFAULT_KEY_PREFIX.into(),
        }
    }
}

impl StorageConfig {
    pub fn keys(&self) -> StorageKeys {
        StorageKeys::new(self.key_prefix.clone())
    }

    /// The configured store file, or the platform default.
    pub fn resolve_store_file(&self, paths: &AppPaths) -> PathBuf {
        self.store_file
            .clone()
            .unwrap_or_else(|| paths.store_file.clone())
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use custom_sound::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub router: RouterConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
