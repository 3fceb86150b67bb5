//! Error kinds recorded by the todo reducer.
//!
//! None of these escape as `Err` from a store operation. User-facing kinds
//! (`EmptyInput`, `DuplicateEntry`) drive a notification or the duplicate
//! indicator; the rest are logic faults that are logged and otherwise ignored.

use thiserror::Error;

/// Which input a validation failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    /// The "add" field
    Draft,
    /// The edit field of the active edit session
    Edit,
}

impl std::fmt::Display for InputField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => f.write_str("draft"),
            Self::Edit => f.write_str("edit"),
        }
    }
}

/// Outcome of a rejected operation, kept on the state as `last_error`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// Submitted text was blank after trimming
    #[error("{field} input is empty")]
    EmptyInput {
        /// Input that was submitted
        field: InputField,
    },

    /// A todo with the same text already exists
    #[error("todo \"{text}\" already exists")]
    DuplicateEntry {
        /// Rejected text (trimmed)
        text: String,
    },

    /// An index no longer addresses an item
    #[error("index {index} out of range for {len} todos")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// List length at the time
        len: usize,
    },

    /// An edit operation arrived with no edit session open
    #[error("no edit session is active")]
    NoEditSession,

    /// A confirmation arrived with nothing staged
    #[error("nothing is pending confirmation")]
    NothingPending,
}

impl TodoError {
    /// True for the kinds a user can cause and correct
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::EmptyInput { .. } | Self::DuplicateEntry { .. })
    }
}
