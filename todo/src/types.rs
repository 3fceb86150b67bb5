//! Domain types for the todo list.
//!
//! A todo is identified by its position in the list. Everything other than
//! `todos` on [`TodoListState`] is transient UI state that is never persisted.

use crate::error::TodoError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use todo_store_macros::{Action, State};

/// User-visible strings produced by the store
pub mod messages {
    /// Add submitted with blank text
    pub const EMPTY_ADD: &str = "Please add a todo...";
    /// Edit committed with blank text
    pub const EMPTY_EDIT: &str = "Please enter a valid todo";
    /// Clear-all with more than one item
    pub const ALL_DELETED: &str = "All todos have been deleted!";
    /// Clear-all with at most one item
    pub const ONE_DELETED: &str = "The todo has been deleted!";
    /// Standing duplicate indicator
    pub const ALREADY_EXISTS: &str = "Todo already exists";
    /// Shown in place of an empty list
    pub const EMPTY_LIST: &str = "No todos left";

    /// Single item deleted
    #[must_use]
    pub fn deleted(name: &str) -> String {
        format!("{name} has been deleted")
    }

    /// Item text changed by an edit
    #[must_use]
    pub fn updated(old: &str, new: &str) -> String {
        format!("Todo \"{old}\" has been updated to \"{new}\"")
    }

    /// Confirmation prompt for a single delete
    #[must_use]
    pub fn delete_prompt(name: &str) -> String {
        format!("Are you sure to delete this \"{name}\"?")
    }
}

/// A single todo item, as persisted
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Label shown to the user
    pub text: String,
    /// Whether the todo is completed
    #[serde(default)]
    pub completed: bool,
}

impl Todo {
    /// Creates an open todo
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }

    /// Flips the completed flag
    pub const fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// The single item currently being edited
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditSession {
    /// Position of the item being edited
    pub index: usize,
    /// Uncommitted replacement text
    pub draft_text: String,
}

/// A single-item deletion awaiting confirmation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingDelete {
    /// Position of the item to delete
    pub index: usize,
    /// Label used in the prompt and the notification
    pub name: String,
}

/// Tone of a notification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    /// Operation completed
    Success,
    /// Validation failed
    Failure,
}

/// Transient message that clears itself after the configured TTL
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Text to show
    pub message: String,
    /// Success or failure styling
    pub kind: NotificationKind,
    /// Sequence number; only the expiry for the latest notification clears it
    pub generation: u64,
    /// When the auto-clear is due
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    /// True for success notifications
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.kind, NotificationKind::Success)
    }
}

/// Whole-session state of the todo list
///
/// `editing`, `pending_delete`, `pending_clear_all` and `notification` are
/// independent of each other; the presentation layer decides which
/// combinations to show.
#[derive(State, Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoListState {
    /// Ordered items; the only persisted field
    pub todos: Vec<Todo>,
    /// Current text of the "add" field, untrimmed
    pub draft_input: String,
    /// Standing "already exists" indicator for the draft
    pub draft_exists: bool,
    /// Active edit session, if any
    pub editing: Option<EditSession>,
    /// Staged single-item deletion
    pub pending_delete: Option<PendingDelete>,
    /// Bulk deletion awaiting confirmation
    pub pending_clear_all: bool,
    /// Transient message
    pub notification: Option<Notification>,
    /// Bumped whenever the add field should regain focus
    pub focus_requests: u64,
    /// Outcome of the most recent rejected intent
    pub last_error: Option<TodoError>,
    /// Notifications issued so far, source of `Notification::generation`
    pub notifications_issued: u64,
    /// Bumped on every mutation of `todos`
    #[revision]
    pub revision: u64,
}

impl TodoListState {
    /// Creates an empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state holding hydrated todos
    #[must_use]
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos,
            ..Self::default()
        }
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns true when there are no todos
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Returns the number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    /// Returns the number of open todos
    #[must_use]
    pub fn remaining_count(&self) -> usize {
        self.count() - self.completed_count()
    }

    /// Returns a todo by position
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Todo> {
        self.todos.get(index)
    }

    /// Exact text match against stored items
    #[must_use]
    pub fn contains_text(&self, text: &str) -> bool {
        self.todos.iter().any(|t| t.text == text)
    }

    /// True when `index` is the item being edited
    #[must_use]
    pub fn is_editing(&self, index: usize) -> bool {
        self.editing.as_ref().is_some_and(|e| e.index == index)
    }

    /// Label for the bulk-delete button
    #[must_use]
    pub fn clear_all_label(&self) -> &'static str {
        if self.count() > 1 {
            "Clear All Todos"
        } else {
            "Clear Todo"
        }
    }

    /// Prompt for the bulk-delete confirmation
    #[must_use]
    pub fn clear_all_prompt(&self) -> &'static str {
        if self.count() > 1 {
            "Are you sure to delete all these todos?"
        } else {
            "Are you sure to delete this todo?"
        }
    }

    /// Prompt for the staged single-item delete
    #[must_use]
    pub fn delete_prompt(&self) -> Option<String> {
        self.pending_delete
            .as_ref()
            .map(|pending| messages::delete_prompt(&pending.name))
    }

    /// Placeholder shown instead of an empty list
    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        self.is_empty().then_some(messages::EMPTY_LIST)
    }

    /// Text of the standing duplicate indicator, when active
    #[must_use]
    pub const fn duplicate_indicator(&self) -> Option<&'static str> {
        if self.draft_exists {
            Some(messages::ALREADY_EXISTS)
        } else {
            None
        }
    }
}

/// Everything the presentation layer can ask of the store, plus timer feedback
#[derive(Action, Clone, Debug, PartialEq, Eq)]
pub enum TodoAction {
    /// Append a todo from raw input
    #[intent]
    AddTodo {
        /// Candidate text, trimmed before validation
        text: String,
    },

    /// Keystroke in the "add" field
    #[intent]
    UpdateDraftInput {
        /// New field contents, kept verbatim
        text: String,
    },

    /// Stage deletion of one item
    #[intent]
    RequestDelete {
        /// Item position
        index: usize,
        /// Label for prompt and notification
        name: String,
    },

    /// Carry out the staged deletion
    #[intent]
    ConfirmDelete,

    /// Drop the staged deletion
    #[intent]
    CancelDelete,

    /// Open an edit session on one item
    #[intent]
    BeginEdit {
        /// Item position
        index: usize,
    },

    /// Keystroke in the edit field
    #[intent]
    UpdateEditDraft {
        /// New field contents
        text: String,
    },

    /// Apply the edit session
    #[intent]
    CommitEdit,

    /// Close the edit session without applying it
    #[intent]
    CancelEdit,

    /// Flip an item's completed flag
    #[intent]
    ToggleCompleted {
        /// Item position
        index: usize,
    },

    /// Stage deletion of every item
    #[intent]
    RequestClearAll,

    /// Delete every item
    #[intent]
    ConfirmClearAll,

    /// Drop the staged bulk deletion
    #[intent]
    CancelClearAll,

    /// Close the notification before its timer fires
    #[intent]
    DismissNotification,

    /// The auto-clear timer for a notification fired
    #[feedback]
    NotificationExpired {
        /// Generation the timer was armed for
        generation: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_new_is_open() {
        let todo = Todo::new("Buy milk");
        assert_eq!(todo.text, "Buy milk");
        assert!(!todo.completed);
    }

    #[test]
    fn todo_toggle() {
        let mut todo = Todo::new("Buy milk");
        todo.toggle();
        assert!(todo.completed);
        todo.toggle();
        assert!(!todo.completed);
    }

    #[test]
    fn todo_json_shape() {
        let json = serde_json::to_string(&Todo::new("a")).unwrap_or_default();
        assert_eq!(json, r#"{"text":"a","completed":false}"#);
    }

    #[test]
    fn state_counts() {
        let mut state = TodoListState::with_todos(vec![Todo::new("a"), Todo::new("b")]);
        state.todos[1].toggle();

        assert_eq!(state.count(), 2);
        assert_eq!(state.completed_count(), 1);
        assert_eq!(state.remaining_count(), 1);
        assert!(state.contains_text("a"));
        assert!(!state.contains_text(" a"));
    }

    #[test]
    fn labels_follow_count() {
        let one = TodoListState::with_todos(vec![Todo::new("a")]);
        assert_eq!(one.clear_all_label(), "Clear Todo");
        assert_eq!(one.clear_all_prompt(), "Are you sure to delete this todo?");

        assert_eq!(one.empty_message(), None);
        assert_eq!(TodoListState::new().empty_message(), Some("No todos left"));

        let two = TodoListState::with_todos(vec![Todo::new("a"), Todo::new("b")]);
        assert_eq!(two.clear_all_label(), "Clear All Todos");
        assert_eq!(two.clear_all_prompt(), "Are you sure to delete all these todos?");
    }

    #[test]
    fn delete_prompt_quotes_name() {
        let mut state = TodoListState::new();
        assert_eq!(state.delete_prompt(), None);

        state.pending_delete = Some(PendingDelete {
            index: 0,
            name: "Buy milk".to_string(),
        });
        assert_eq!(
            state.delete_prompt().as_deref(),
            Some("Are you sure to delete this \"Buy milk\"?")
        );
    }

    #[test]
    fn action_classification() {
        assert!(TodoAction::ConfirmClearAll.is_intent());
        assert!(TodoAction::NotificationExpired { generation: 1 }.is_feedback());
        assert_eq!(TodoAction::CommitEdit.name(), "CommitEdit");
    }

    #[test]
    fn revision_bumps() {
        let mut state = TodoListState::new();
        assert_eq!(state.revision(), 0);
        assert_eq!(state.bump_revision(), 1);
    }
}
