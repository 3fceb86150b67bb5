//! Key-value storage trait for persisted snapshots.
//!
//! The todo list is persisted as a single JSON string under one key, the way a
//! browser's local storage holds it. This module defines that abstraction so the
//! domain never touches a concrete backend.
//!
//! # Implementations
//!
//! - `FileStorage` (in the `todo-list` crate): JSON file on disk
//! - `MemoryStorage` (in the `todo-store-testing` crate): Fast, deterministic testing
//!
//! # Example
//!
//! ```no_run
//! use todo_store_core::storage::{KeyValueStorage, StorageError};
//!
//! fn example<S: KeyValueStorage>(storage: &S) -> Result<(), StorageError> {
//!     storage.set_item("todos", r#"[{"text":"Buy milk","completed":false}]"#)?;
//!     let raw = storage.get_item("todos")?;
//!     assert!(raw.is_some());
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Errors that can occur during storage access.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend cannot be used right now (quota, permissions, disabled).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The backend's own container could not be decoded.
    #[error("Storage corrupt: {0}")]
    Corrupt(String),
}

/// Synchronous string key-value storage.
///
/// Mirrors the browser local storage contract: string keys, string values,
/// whole-value replacement on write. Access is synchronous and may block, so
/// async callers run it on the blocking pool.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a single instance can be shared
/// between the store and its spawned persistence effects.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the value cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for std::sync::Arc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}
