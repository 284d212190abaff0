//! Configuration module for the custom sound router.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the router and
//! storage, `AppPaths` for cross-platform directories, and TOML persistence
//! via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, RouterConfig, StorageConfig};
