//! # Todo Store Testing
//!
//! Testing utilities and helpers for the reducer-driven todo store.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then builder for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use todo_store_testing::{MemoryStorage, test_clock};
//! use todo_store_runtime::Store;
//!
//! #[tokio::test]
//! async fn adds_a_todo() {
//!     let storage = Arc::new(MemoryStorage::new());
//!     let store = Store::new(TodoListState::default(), TodoReducer::new(), env(storage));
//!
//!     store.send(TodoAction::AddTodo { text: "Buy milk".into() }).await?;
//!
//!     assert_eq!(store.state(|s| s.todos.len()).await, 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use todo_store_core::environment::Clock;

/// Given-When-Then testing for reducers
pub mod reducer_test;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, PoisonError};
    use todo_store_core::storage::{KeyValueStorage, StorageError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todo_store_testing::mocks::FixedClock;
    /// use todo_store_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::days(20_089))
    }

    /// In-memory key-value storage
    ///
    /// Counts writes so tests can assert that persistence happened, and how often.
    #[derive(Debug, Default)]
    pub struct MemoryStorage {
        items: Mutex<HashMap<String, String>>,
        writes: AtomicUsize,
    }

    impl MemoryStorage {
        /// Create empty storage
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create storage pre-populated with one key
        #[must_use]
        pub fn with_item(key: &str, value: &str) -> Self {
            let storage = Self::new();
            storage
                .items
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.to_string(), value.to_string());
            storage
        }

        /// Raw value under `key`
        #[must_use]
        pub fn raw(&self, key: &str) -> Option<String> {
            self.items
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned()
        }

        /// Number of successful `set_item` calls
        #[must_use]
        pub fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    impl KeyValueStorage for MemoryStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.raw(key))
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.items
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.to_string(), value.to_string());
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.items
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(key);
            Ok(())
        }
    }

    /// Storage whose every call fails
    ///
    /// Exercises the paths where persistence is best-effort.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct FailingStorage;

    impl KeyValueStorage for FailingStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("storage disabled".to_string()))
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("storage disabled".to_string()))
        }

        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("storage disabled".to_string()))
        }
    }
}

// Re-export commonly used items
pub use mocks::{FailingStorage, FixedClock, MemoryStorage, test_clock};
pub use reducer_test::{ReducerTest, assertions};

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use todo_store_core::storage::KeyValueStorage;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
        assert_eq!(time1.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("todos").unwrap(), None);

        storage.set_item("todos", "[]").unwrap();
        assert_eq!(storage.get_item("todos").unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.writes(), 1);

        storage.remove_item("todos").unwrap();
        assert_eq!(storage.raw("todos"), None);
    }

    #[test]
    fn failing_storage_fails() {
        assert!(FailingStorage.get_item("todos").is_err());
        assert!(FailingStorage.set_item("todos", "[]").is_err());
    }
}
