//! Persistent key-value storage.
//!
//! The router reads its state once at startup and writes each mutated piece
//! back immediately through a [`KeyValueStore`].  Values are JSON so that
//! strings, booleans and the learned map share one storage model.
//!
//! * [`MemoryStore`] — process-local map, used by tests and dry runs.
//! * [`JsonFileStore`] — one JSON document on disk, rewritten on every `set`.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use serde_json::Value;
use thiserror::Error;

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Errors raised by a [`KeyValueStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document is not valid JSON (or could not be serialised).
    #[error("storage document is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// KeyValueStore
// ---------------------------------------------------------------------------

/// Synchronous get/set storage surviving process restarts.
///
/// Implementors must be `Send` so a router owning one can move onto the
/// session task.
pub trait KeyValueStore: Send {
    /// Read the value stored under `key`, `None` when never written.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
}
