//! `TodoStore`: the presentation layer's handle on the todo list.
//!
//! Wraps the generic runtime store with one method per operation. Each method
//! reduces its action and returns the snapshot the presentation layer should
//! render.

use crate::config::{ConfigError, TodoConfig};
use crate::persistence::{SnapshotWriter, encode_todos, hydrate};
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{TodoAction, TodoListState};
use std::sync::Arc;
use todo_store_core::environment::Clock;
use todo_store_core::storage::KeyValueStorage;
use todo_store_runtime::{Store, StoreError};
use tokio::sync::watch;

/// Runtime store specialised to the todo list
pub type TodoRuntime = Store<TodoListState, TodoAction, TodoEnvironment, TodoReducer>;

/// Todo list store
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use todo_list::{FileStorage, TodoConfig, TodoStore};
/// use todo_store_core::environment::SystemClock;
///
/// # async fn run() -> anyhow::Result<()> {
/// let config = TodoConfig::from_env()?;
/// let storage = Arc::new(FileStorage::open(&config.storage_path)?);
/// let store = TodoStore::open(config, storage, Arc::new(SystemClock))?;
///
/// let state = store.add_todo("Buy milk").await?;
/// assert_eq!(state.count(), 1);
///
/// store.shutdown().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TodoStore {
    runtime: TodoRuntime,
    writer: SnapshotWriter,
    config: TodoConfig,
}

impl TodoStore {
    /// Hydrate from `storage` and start the store
    ///
    /// Unusable stored data never fails opening; it is replaced by the default
    /// list, which is written back straight away along with migrated data.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` is invalid.
    pub fn open(
        config: TodoConfig,
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let hydrated = hydrate(storage.as_ref(), &config);
        tracing::info!(
            key = %config.storage_key,
            count = hydrated.todos.len(),
            source = ?hydrated.source,
            "Opening todo store"
        );

        let writer = SnapshotWriter::new(storage, config.storage_key.clone(), 0);
        let mut state = TodoListState::with_todos(hydrated.todos.clone());

        if hydrated.needs_rewrite() {
            let revision = state.bump_revision();
            let written =
                encode_todos(&state.todos).and_then(|json| writer.write(revision, &json));
            if let Err(error) = written {
                tracing::warn!(%error, "Failed to write normalised todos");
            }
        }

        let env = TodoEnvironment::new(clock, writer.clone(), config.notification_ttl());
        let runtime = Store::new(state, TodoReducer::new(), env);

        Ok(Self {
            runtime,
            writer,
            config,
        })
    }

    /// Configuration this store was opened with
    #[must_use]
    pub const fn config(&self) -> &TodoConfig {
        &self.config
    }

    /// Underlying runtime store
    #[must_use]
    pub const fn runtime(&self) -> &TodoRuntime {
        &self.runtime
    }

    /// Reduce `action` and return the resulting snapshot
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn dispatch(&self, action: TodoAction) -> Result<TodoListState, StoreError> {
        self.runtime.send(action).await?;
        Ok(self.runtime.snapshot().await)
    }

    /// Append a todo
    ///
    /// # Errors
    ///
    /// See [`TodoStore::dispatch`].
    pub async fn add_todo(&self, text: impl Into<String>) -> Result<TodoListState, StoreError> {
        self.dispatch(TodoAction::AddTodo { text: text.into() })
            .await
    }

    /// Record a keystroke in the add field
    ///
    /// # Errors
    ///
    /// See [`TodoStore::dispatch`].
    pub async fn update_draft_input(
        &self,
        text: impl Into<String>,
    ) -> Result<TodoListState, StoreError> {
        self.dispatch(TodoAction::UpdateDraftInput { text: text.into() })
            .await
    }

    /// Stage deletion of the item at `index`
    ///
    /// # Errors
    ///
    /// See [`TodoStore::dispatch`].
    pub async fn request_delete(
        &self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<TodoListState, StoreError> {
        self.dispatch(TodoAction::RequestDelete {
            index,
            name: name.into(),
        })
        .await
    }

    /// Carry out the staged deletion
    ///
    /// # Errors
    ///
    /// See [`TodoStore::dispatch`].
    pub async fn confirm_delete(&self) -> Result<TodoListState, StoreError> {
        self.dispatch(TodoAction::ConfirmDelete).await
    }

    /// Drop the staged deletion
    ///
    /// # Errors
    ///
    /// See [`TodoStore::dispatch`].
    pub async fn cancel_delete(&self) -> Result<TodoListState, StoreError> {
        self.dispatch(TodoAction::CancelDelete).await
    }

    /// Open an edit session on the item at `index`
    ///
    /// # Errors
    ///
    /// See [`TodoStore::dispatch`].
    pub async fn begin_edit(&self, index: usize) -> Result<TodoListState, StoreError> {
        self.dispatch(TodoAction::BeginEdit { index }).await
    }

    /// Record a keystroke in the edit field
    ///
    /// # Errors
    ///
    /// See [`TodoStore::dispatch`].
    pub async fn update_edit_draft(
        &self,
        text: impl Into<String>,
    ) -> Result<TodoListState, StoreError> {
        self.dispatch(TodoAction::UpdateEditDraft { text: text.into() })
            .await
    }

    /// Apply the edit session
    ///
    /// # Errors
    ///
    /// See [`TodoStore::dispatch`].
    pub async fn commit_edit(&self) -> Result<TodoListState, StoreError> {
        self.dispatch(TodoAction::CommitEdit).await
    }

    /// Close the edit session without applying it
    ///
    /// # Errors
    ///
    /// See [`TodoStore::dispatch`].
    pub async fn cancel_edit(&self) -> Result<TodoListState, StoreError> {
        self.dispatch(TodoAction::CancelEdit).await
    }

    /// Flip the completed flag of the item at `index`
    ///
    /// # Errors
    ///
    /// See [`TodoStore::dispatch`].
    pub async fn toggle_completed(&self, index: usize) -> Result<TodoListState, StoreError> {
        self.dispatch(TodoAction::ToggleCompleted { index }).await
    }

    /// Stage deletion of every item
    ///
    /// # Errors
    ///
    /// See [`TodoStore::dispatch`].
    pub async fn request_clear_all(&self) -> Result<TodoListState, StoreError> {
        self.dispatch(TodoAction::RequestClearAll).await
    }

    /// Delete every item
    ///
    /// # Errors
    ///
    /// See [`TodoStore::dispatch`].
    pub async fn confirm_clear_all(&self) -> Result<TodoListState, StoreError> {
        self.dispatch(TodoAction::ConfirmClearAll).await
    }

    /// Drop the staged bulk deletion
    ///
    /// # Errors
    ///
    /// See [`TodoStore::dispatch`].
    pub async fn cancel_clear_all(&self) -> Result<TodoListState, StoreError> {
        self.dispatch(TodoAction::CancelClearAll).await
    }

    /// Close the current notification early
    ///
    /// # Errors
    ///
    /// See [`TodoStore::dispatch`].
    pub async fn dismiss_notification(&self) -> Result<TodoListState, StoreError> {
        self.dispatch(TodoAction::DismissNotification).await
    }

    /// Current snapshot
    pub async fn snapshot(&self) -> TodoListState {
        self.runtime.snapshot().await
    }

    /// Snapshots published after every reduced action, including timer expiry
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TodoListState> {
        self.runtime.subscribe_state()
    }

    /// Wait until the current `todos` have been handed to storage
    pub async fn flush(&self) {
        let revision = self.runtime.state(TodoListState::revision).await;
        self.writer.settled(revision).await;
    }

    /// Flush pending writes, cancel timers, and stop accepting operations
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
    /// when the configured timeout expires.
    pub async fn shutdown(&self) -> Result<(), StoreError> {
        self.flush().await;
        self.runtime.shutdown_default().await
    }
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore")
            .field("config", &self.config)
            .field("writer", &self.writer)
            .finish_non_exhaustive()
    }
}
