//! Snapshot persistence for the todo list.
//!
//! The whole `todos` array is stored as one JSON string under one key.
//! Reading never fails the caller: anything unusable falls back to the
//! configured default list. Writing is best effort and ordered by revision.

use crate::config::TodoConfig;
use crate::types::Todo;
use serde::Deserialize;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use todo_store_core::storage::{KeyValueStorage, StorageError};
use tokio::sync::watch;

/// Errors from encoding, decoding, or storing a snapshot
#[derive(Error, Debug)]
pub enum PersistError {
    /// Backend failure
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Snapshot is not a JSON array of todos
    #[error("invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Item shapes accepted on read
///
/// Older snapshots stored bare strings instead of `{text, completed}` objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTodo {
    Full(Todo),
    Legacy(String),
}

impl StoredTodo {
    fn into_todo(self) -> (Todo, bool) {
        match self {
            Self::Full(todo) => (todo, false),
            Self::Legacy(text) => (Todo::new(text), true),
        }
    }
}

/// Where hydrated todos came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationSource {
    /// Canonical snapshot read as-is
    Stored,
    /// Snapshot contained legacy string items
    Migrated,
    /// Key absent
    Missing,
    /// Value was not a valid snapshot
    Invalid,
    /// Backend could not be read
    Unreadable,
}

/// Result of reading storage at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hydrated {
    /// Todos to start the session with
    pub todos: Vec<Todo>,
    /// How they were obtained
    pub source: HydrationSource,
}

impl Hydrated {
    /// True when storage should be overwritten with the hydrated list
    #[must_use]
    pub const fn needs_rewrite(&self) -> bool {
        !matches!(self.source, HydrationSource::Stored)
    }
}

/// Serialize todos to the stored JSON shape
///
/// # Errors
///
/// Returns [`PersistError::Json`] if serialization fails.
pub fn encode_todos(todos: &[Todo]) -> Result<String, PersistError> {
    Ok(serde_json::to_string(todos)?)
}

/// Parse a stored snapshot, returning the todos and whether legacy items were migrated
///
/// # Errors
///
/// Returns [`PersistError::Json`] if `raw` is not an array of todos or strings.
pub fn decode_todos(raw: &str) -> Result<(Vec<Todo>, bool), PersistError> {
    let stored: Vec<StoredTodo> = serde_json::from_str(raw)?;
    let mut migrated = false;
    let todos = stored
        .into_iter()
        .map(|item| {
            let (todo, legacy) = item.into_todo();
            migrated |= legacy;
            todo
        })
        .collect();
    Ok((todos, migrated))
}

/// Todos used when storage holds nothing usable
#[must_use]
pub fn fallback_todos(config: &TodoConfig) -> Vec<Todo> {
    if config.seed_when_empty {
        vec![Todo::new("Sample Todo")]
    } else {
        Vec::new()
    }
}

/// Read the initial todo list from storage
///
/// An absent key, an unreadable backend, or a malformed value all resolve to
/// [`fallback_todos`]. A stored empty array is respected and not seeded.
pub fn hydrate(storage: &dyn KeyValueStorage, config: &TodoConfig) -> Hydrated {
    let key = config.storage_key.as_str();

    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "No stored todos, starting from default list");
            return Hydrated {
                todos: fallback_todos(config),
                source: HydrationSource::Missing,
            };
        },
        Err(error) => {
            tracing::warn!(key, %error, "Failed to read stored todos, starting from default list");
            return Hydrated {
                todos: fallback_todos(config),
                source: HydrationSource::Unreadable,
            };
        },
    };

    match decode_todos(&raw) {
        Ok((todos, false)) => {
            tracing::debug!(key, count = todos.len(), "Hydrated todos");
            Hydrated {
                todos,
                source: HydrationSource::Stored,
            }
        },
        Ok((todos, true)) => {
            tracing::info!(key, count = todos.len(), "Migrated legacy string todos");
            Hydrated {
                todos,
                source: HydrationSource::Migrated,
            }
        },
        Err(error) => {
            tracing::warn!(key, %error, "Stored todos are invalid, starting from default list");
            Hydrated {
                todos: fallback_todos(config),
                source: HydrationSource::Invalid,
            }
        },
    }
}

/// What happened to a write request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The snapshot was stored
    Written,
    /// A newer revision was already handled; nothing stored
    Stale,
}

struct WriterInner {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    /// Highest revision handed to storage
    last_revision: Mutex<u64>,
    /// Same value, observable by `settled`
    settled: watch::Sender<u64>,
}

/// Serialises snapshot writes and keeps them in revision order
///
/// Persistence effects may finish in any order. The writer holds a lock for the
/// duration of each storage call and ignores any revision that is not newer
/// than the last one handled, so stored data never moves backwards.
#[derive(Clone)]
pub struct SnapshotWriter {
    inner: Arc<WriterInner>,
}

impl SnapshotWriter {
    /// Create a writer whose next accepted revision is `initial_revision + 1`
    #[must_use]
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        key: impl Into<String>,
        initial_revision: u64,
    ) -> Self {
        let (settled, _) = watch::channel(initial_revision);
        Self {
            inner: Arc::new(WriterInner {
                storage,
                key: key.into(),
                last_revision: Mutex::new(initial_revision),
                settled,
            }),
        }
    }

    /// Storage key written to
    #[must_use]
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// Highest revision handled so far
    #[must_use]
    pub fn settled_revision(&self) -> u64 {
        *self.inner.settled.borrow()
    }

    /// Store `json` as revision `revision`
    ///
    /// A failed write still counts as handled: an older revision arriving
    /// afterwards is not allowed to replace it.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Storage`] if the backend rejects the write.
    pub fn write(&self, revision: u64, json: &str) -> Result<WriteOutcome, PersistError> {
        let mut last = self
            .inner
            .last_revision
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if revision <= *last {
            return Ok(WriteOutcome::Stale);
        }
        *last = revision;

        let result = self.inner.storage.set_item(&self.inner.key, json);
        self.inner.settled.send_replace(revision);
        result?;
        Ok(WriteOutcome::Written)
    }

    /// Mark `revision` as handled without storing anything
    pub fn skip(&self, revision: u64) {
        let mut last = self
            .inner
            .last_revision
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if revision > *last {
            *last = revision;
            self.inner.settled.send_replace(revision);
        }
    }

    /// Wait until `revision` (or a newer one) has been handled
    pub async fn settled(&self, revision: u64) {
        let mut rx = self.inner.settled.subscribe();
        let _ = rx.wait_for(|settled| *settled >= revision).await;
    }
}

impl std::fmt::Debug for SnapshotWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotWriter")
            .field("key", &self.inner.key)
            .field("settled", &self.settled_revision())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use todo_store_testing::{FailingStorage, MemoryStorage};

    fn config() -> TodoConfig {
        TodoConfig::default()
    }

    #[test]
    fn encode_matches_stored_shape() {
        let json = encode_todos(&[Todo::new("a"), Todo {
            text: "b".to_string(),
            completed: true,
        }])
        .unwrap();
        assert_eq!(
            json,
            r#"[{"text":"a","completed":false},{"text":"b","completed":true}]"#
        );
    }

    #[test]
    fn decode_round_trips() {
        let todos = vec![Todo::new("a"), Todo::new("b")];
        let (decoded, migrated) = decode_todos(&encode_todos(&todos).unwrap()).unwrap();
        assert_eq!(decoded, todos);
        assert!(!migrated);
    }

    #[test]
    fn decode_migrates_legacy_strings() {
        let (todos, migrated) = decode_todos(r#"["Buy milk", {"text":"Walk dog","completed":true}]"#).unwrap();
        assert!(migrated);
        assert_eq!(todos[0], Todo::new("Buy milk"));
        assert!(todos[1].completed);
    }

    #[test]
    fn decode_defaults_missing_completed() {
        let (todos, _) = decode_todos(r#"[{"text":"a"}]"#).unwrap();
        assert_eq!(todos, vec![Todo::new("a")]);
    }

    #[test]
    fn decode_rejects_non_array() {
        assert!(decode_todos("null").is_err());
        assert!(decode_todos("{not json").is_err());
        assert!(decode_todos(r#"{"text":"a"}"#).is_err());
    }

    #[test]
    fn hydrate_missing_key_is_empty() {
        let hydrated = hydrate(&MemoryStorage::new(), &config());
        assert_eq!(hydrated.source, HydrationSource::Missing);
        assert!(hydrated.todos.is_empty());
    }

    #[test]
    fn hydrate_invalid_json_falls_back() {
        let storage = MemoryStorage::with_item("todos", "{{garbage");
        let hydrated = hydrate(&storage, &config());
        assert_eq!(hydrated.source, HydrationSource::Invalid);
        assert!(hydrated.todos.is_empty());
        assert!(hydrated.needs_rewrite());
    }

    #[test]
    fn hydrate_seeds_when_enabled() {
        let storage = MemoryStorage::with_item("todos", "{{garbage");
        let hydrated = hydrate(&storage, &config().with_seed_when_empty(true));
        assert_eq!(hydrated.todos, vec![Todo::new("Sample Todo")]);
    }

    #[test]
    fn hydrate_keeps_stored_empty_list() {
        let storage = MemoryStorage::with_item("todos", "[]");
        let hydrated = hydrate(&storage, &config().with_seed_when_empty(true));
        assert_eq!(hydrated.source, HydrationSource::Stored);
        assert!(hydrated.todos.is_empty());
        assert!(!hydrated.needs_rewrite());
    }

    #[test]
    fn hydrate_unreadable_backend_falls_back() {
        let hydrated = hydrate(&FailingStorage, &config());
        assert_eq!(hydrated.source, HydrationSource::Unreadable);
        assert!(hydrated.todos.is_empty());
    }

    #[test]
    fn writer_skips_stale_revisions() {
        let storage = Arc::new(MemoryStorage::new());
        let writer = SnapshotWriter::new(storage.clone(), "todos", 0);

        assert_eq!(writer.write(2, "[2]").unwrap(), WriteOutcome::Written);
        assert_eq!(writer.write(1, "[1]").unwrap(), WriteOutcome::Stale);
        assert_eq!(writer.write(2, "[2b]").unwrap(), WriteOutcome::Stale);

        assert_eq!(storage.raw("todos").as_deref(), Some("[2]"));
        assert_eq!(storage.writes(), 1);
        assert_eq!(writer.settled_revision(), 2);
    }

    #[test]
    fn writer_failure_still_settles() {
        let writer = SnapshotWriter::new(Arc::new(FailingStorage), "todos", 0);

        assert!(matches!(writer.write(1, "[]"), Err(PersistError::Storage(_))));
        assert_eq!(writer.settled_revision(), 1);
        assert_eq!(writer.write(1, "[]").unwrap(), WriteOutcome::Stale);
    }

    #[test]
    fn skip_settles_without_writing() {
        let storage = Arc::new(MemoryStorage::new());
        let writer = SnapshotWriter::new(storage.clone(), "todos", 0);

        writer.skip(2);
        assert_eq!(writer.settled_revision(), 2);
        assert_eq!(writer.write(2, "[]").unwrap(), WriteOutcome::Stale);
        assert_eq!(storage.writes(), 0);
    }

    #[tokio::test]
    async fn settled_returns_once_revision_written() {
        let writer = SnapshotWriter::new(Arc::new(MemoryStorage::new()), "todos", 0);
        writer.settled(0).await;

        let background = writer.clone();
        let task = tokio::spawn(async move { background.settled(3).await });

        writer.write(3, "[]").unwrap();
        task.await.unwrap();
    }
}
