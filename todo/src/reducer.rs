//! Reducer logic for the todo list.
//!
//! Each intent is validated first. A rejected intent is recorded in
//! `last_error`; user-facing rejections also update the notification or the
//! duplicate indicator, logic faults are only logged. Every change to `todos`
//! bumps the revision and emits a persist effect carrying the full snapshot.

use crate::error::{InputField, TodoError};
use crate::persistence::{SnapshotWriter, WriteOutcome, encode_todos};
use crate::types::{
    EditSession, Notification, NotificationKind, PendingDelete, Todo, TodoAction, TodoListState,
    messages,
};
use std::sync::Arc;
use std::time::Duration;
use todo_store_core::{
    SmallVec,
    effect::{Effect, EffectId},
    environment::Clock,
    reducer::Reducer,
};

/// Identifier of the notification auto-clear timer
pub const NOTIFICATION_TIMER: EffectId = EffectId::new("notification-expiry");

type Effects = SmallVec<[Effect<TodoAction>; 4]>;

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for notification expiry timestamps
    pub clock: Arc<dyn Clock>,
    /// Destination of persisted snapshots
    pub writer: SnapshotWriter,
    /// How long a notification stays up
    pub notification_ttl: Duration,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, writer: SnapshotWriter, notification_ttl: Duration) -> Self {
        Self {
            clock,
            writer,
            notification_ttl,
        }
    }
}

/// Reducer for the todo list
#[derive(Clone, Debug)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn check_index(state: &TodoListState, index: usize) -> Result<(), TodoError> {
        if index < state.count() {
            Ok(())
        } else {
            Err(TodoError::IndexOutOfRange {
                index,
                len: state.count(),
            })
        }
    }

    /// Validates an add, returning the trimmed text to store
    fn validate_add(state: &TodoListState, text: &str) -> Result<String, TodoError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(TodoError::EmptyInput {
                field: InputField::Draft,
            });
        }
        if state.contains_text(trimmed) {
            return Err(TodoError::DuplicateEntry {
                text: trimmed.to_string(),
            });
        }
        Ok(trimmed.to_string())
    }

    /// Validates a commit, returning the open session
    fn validate_commit(state: &TodoListState) -> Result<EditSession, TodoError> {
        let Some(session) = state.editing.clone() else {
            return Err(TodoError::NoEditSession);
        };
        if session.draft_text.trim().is_empty() {
            return Err(TodoError::EmptyInput {
                field: InputField::Edit,
            });
        }
        Self::check_index(state, session.index)?;
        Ok(session)
    }

    /// Shows a notification and re-arms the auto-clear timer
    fn notify(
        state: &mut TodoListState,
        env: &TodoEnvironment,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> Effect<TodoAction> {
        state.notifications_issued = state.notifications_issued.wrapping_add(1);
        let generation = state.notifications_issued;

        let now = env.clock.now();
        let expires_at = chrono::Duration::from_std(env.notification_ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(now);

        state.notification = Some(Notification {
            message: message.into(),
            kind,
            generation,
            expires_at,
        });

        Effect::delay(
            env.notification_ttl,
            TodoAction::NotificationExpired { generation },
        )
        .cancellable(NOTIFICATION_TIMER)
    }

    /// Bumps the revision and describes the write of the current `todos`
    fn persist(state: &mut TodoListState, env: &TodoEnvironment) -> Effect<TodoAction> {
        let revision = state.bump_revision();
        let json = match encode_todos(&state.todos) {
            Ok(json) => json,
            Err(error) => {
                tracing::warn!(revision, %error, "Failed to encode todos, skipping write");
                env.writer.skip(revision);
                return Effect::None;
            },
        };

        let writer = env.writer.clone();
        Effect::future(async move {
            // Storage backends do blocking I/O.
            let blocking = writer.clone();
            let outcome =
                tokio::task::spawn_blocking(move || blocking.write(revision, &json)).await;
            match outcome {
                Ok(Ok(WriteOutcome::Written)) => {
                    tracing::debug!(revision, key = writer.key(), "Persisted todos");
                },
                Ok(Ok(WriteOutcome::Stale)) => {
                    tracing::trace!(revision, "Skipped stale snapshot");
                },
                Ok(Err(error)) => {
                    tracing::warn!(revision, %error, "Failed to persist todos");
                },
                Err(error) => {
                    tracing::warn!(revision, %error, "Persist task did not complete");
                    writer.skip(revision);
                },
            }
            None
        })
    }

    /// Recomputes the duplicate indicator from the current draft
    fn refresh_draft_exists(state: &mut TodoListState) {
        state.draft_exists = state.contains_text(&state.draft_input);
    }

    /// Records a rejected intent and applies its user-visible consequence
    fn reject(state: &mut TodoListState, env: &TodoEnvironment, error: TodoError) -> Effects {
        let mut effects = Effects::new();

        match &error {
            TodoError::EmptyInput { field } => {
                tracing::debug!(%error, "Rejected blank input");
                let message = match field {
                    InputField::Draft => {
                        state.focus_requests = state.focus_requests.wrapping_add(1);
                        messages::EMPTY_ADD
                    },
                    InputField::Edit => messages::EMPTY_EDIT,
                };
                effects.push(Self::notify(state, env, message, NotificationKind::Failure));
            },
            TodoError::DuplicateEntry { .. } => {
                tracing::debug!(%error, "Rejected duplicate todo");
                state.draft_exists = true;
            },
            TodoError::IndexOutOfRange { .. }
            | TodoError::NoEditSession
            | TodoError::NothingPending => {
                tracing::warn!(%error, "Ignored inconsistent request");
            },
        }

        state.last_error = Some(error);
        effects
    }

    fn add_todo(
        state: &mut TodoListState,
        env: &TodoEnvironment,
        text: &str,
    ) -> Result<Effects, TodoError> {
        let text = Self::validate_add(state, text)?;

        state.todos.push(Todo::new(text));
        state.draft_input.clear();
        Self::refresh_draft_exists(state);

        let mut effects = Effects::new();
        effects.push(Self::persist(state, env));
        Ok(effects)
    }

    fn confirm_delete(
        state: &mut TodoListState,
        env: &TodoEnvironment,
    ) -> Result<Effects, TodoError> {
        let PendingDelete { index, name } =
            state.pending_delete.take().ok_or(TodoError::NothingPending)?;
        Self::check_index(state, index)?;

        state.todos.remove(index);
        state.editing = match state.editing.take() {
            Some(session) if session.index == index => None,
            Some(session) if session.index > index => Some(EditSession {
                index: session.index - 1,
                ..session
            }),
            other => other,
        };
        state.draft_input.clear();
        Self::refresh_draft_exists(state);

        let mut effects = Effects::new();
        effects.push(Self::persist(state, env));
        effects.push(Self::notify(
            state,
            env,
            messages::deleted(&name),
            NotificationKind::Success,
        ));
        Ok(effects)
    }

    fn begin_edit(state: &mut TodoListState, index: usize) -> Result<Effects, TodoError> {
        Self::check_index(state, index)?;
        state.editing = Some(EditSession {
            index,
            draft_text: state.todos[index].text.clone(),
        });
        Ok(Effects::new())
    }

    fn update_edit_draft(state: &mut TodoListState, text: String) -> Result<Effects, TodoError> {
        let session = state.editing.as_mut().ok_or(TodoError::NoEditSession)?;
        session.draft_text = text;
        Ok(Effects::new())
    }

    fn commit_edit(
        state: &mut TodoListState,
        env: &TodoEnvironment,
    ) -> Result<Effects, TodoError> {
        let session = match Self::validate_commit(state) {
            Ok(session) => session,
            Err(error) => {
                // A session pointing past the list can never be committed.
                if matches!(error, TodoError::IndexOutOfRange { .. }) {
                    state.editing = None;
                }
                return Err(error);
            },
        };
        state.editing = None;

        let mut effects = Effects::new();
        let todo = &mut state.todos[session.index];
        if todo.text == session.draft_text {
            return Ok(effects);
        }

        let old = std::mem::replace(&mut todo.text, session.draft_text);
        let message = messages::updated(&old, &todo.text);
        Self::refresh_draft_exists(state);

        effects.push(Self::persist(state, env));
        effects.push(Self::notify(state, env, message, NotificationKind::Success));
        Ok(effects)
    }

    fn toggle_completed(
        state: &mut TodoListState,
        env: &TodoEnvironment,
        index: usize,
    ) -> Result<Effects, TodoError> {
        Self::check_index(state, index)?;
        state.todos[index].toggle();

        let mut effects = Effects::new();
        effects.push(Self::persist(state, env));
        Ok(effects)
    }

    fn confirm_clear_all(state: &mut TodoListState, env: &TodoEnvironment) -> Effects {
        let message = if state.count() > 1 {
            messages::ALL_DELETED
        } else {
            messages::ONE_DELETED
        };

        state.todos.clear();
        state.pending_clear_all = false;
        state.pending_delete = None;
        state.editing = None;
        state.draft_input.clear();
        Self::refresh_draft_exists(state);

        let mut effects = Effects::new();
        effects.push(Self::persist(state, env));
        effects.push(Self::notify(state, env, message, NotificationKind::Success));
        effects
    }
}

impl Default for TodoReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for TodoReducer {
    type State = TodoListState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if action.is_intent() {
            state.last_error = None;
        }

        let result = match action {
            // ========== Add field ==========
            TodoAction::AddTodo { text } => Self::add_todo(state, env, &text),
            TodoAction::UpdateDraftInput { text } => {
                state.draft_input = text;
                Self::refresh_draft_exists(state);
                Ok(Effects::new())
            },

            // ========== Single delete ==========
            TodoAction::RequestDelete { index, name } => {
                state.pending_delete = Some(PendingDelete { index, name });
                Ok(Effects::new())
            },
            TodoAction::ConfirmDelete => Self::confirm_delete(state, env),
            TodoAction::CancelDelete => {
                state.pending_delete = None;
                Ok(Effects::new())
            },

            // ========== Edit session ==========
            TodoAction::BeginEdit { index } => Self::begin_edit(state, index),
            TodoAction::UpdateEditDraft { text } => Self::update_edit_draft(state, text),
            TodoAction::CommitEdit => Self::commit_edit(state, env),
            TodoAction::CancelEdit => {
                state.editing = None;
                Ok(Effects::new())
            },

            TodoAction::ToggleCompleted { index } => Self::toggle_completed(state, env, index),

            // ========== Clear all ==========
            TodoAction::RequestClearAll => {
                state.pending_clear_all = true;
                Ok(Effects::new())
            },
            TodoAction::ConfirmClearAll => Ok(Self::confirm_clear_all(state, env)),
            TodoAction::CancelClearAll => {
                state.pending_clear_all = false;
                Ok(Effects::new())
            },

            // ========== Notification ==========
            TodoAction::DismissNotification => {
                state.notification = None;
                let mut effects = Effects::new();
                effects.push(Effect::Cancel(NOTIFICATION_TIMER));
                Ok(effects)
            },
            TodoAction::NotificationExpired { generation } => {
                if state
                    .notification
                    .as_ref()
                    .is_some_and(|n| n.generation == generation)
                {
                    state.notification = None;
                } else {
                    tracing::trace!(generation, "Ignored expiry of a replaced notification");
                }
                Ok(Effects::new())
            },
        };

        result.unwrap_or_else(|error| Self::reject(state, env, error))
    }
}
