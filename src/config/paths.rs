//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout (config dir holds both settings and the key-value store):
//!   Windows: %APPDATA%\custom-sound\
//!   macOS:   ~/Library/Application Support/custom-sound/
//!   Linux:   ~/.config/custom-sound/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml` and `store.json`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Full path to the persisted key-value store.
    pub store_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "custom-sound";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let store_file = config_dir.join("store.json");

        Self {
            config_dir,
            settings_file,
            store_file,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
