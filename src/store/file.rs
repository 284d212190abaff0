//! JSON-file-backed [`KeyValueStore`].
//!
//! All keys live in a single JSON object.  The whole document is rewritten on
//! every [`set`](KeyValueStore::set) by writing a sibling temp file and
//! renaming it over the target, so a crash mid-write leaves the previous
//! document intact.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::{KeyValueStore, StoreError};

/// Persists every key of the store into one JSON document on disk.
#[derive(Debug)]
pub struct JsonFileStore {
    values: Map<String, Value>,
    path: PathBuf,
}

impl JsonFileStore {
    /// Open the document at `path`.
    ///
    /// A missing file is treated as an empty store; the file (and its parent
    /// directories) are created on the first write.  A document that does not
    /// parse is moved aside to `<file>.bak` and the store starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            if data.trim().is_empty() {
                Map::new()
            } else {
                match serde_json::from_str(&data) {
                    Ok(values) => values,
                    Err(e) => {
                        let backup = sibling(&path, "bak");
                        log::warn!(
                            "Store {} is malformed ({e}); moving it to {} and starting empty",
                            path.display(),
                            backup.display()
                        );
                        std::fs::rename(&path, &backup)?;
                        Map::new()
                    }
                }
            }
        } else {
            Map::new()
        };

        log::debug!("Opened store {} ({} keys)", path.display(), values.len());
        Ok(Self { values, path })
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&self.values)?;
        let tmp = sibling(&self.path, "tmp");
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// `store.json` → `store.json.<suffix>`, in the same directory.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
