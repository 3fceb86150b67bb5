//! Persistent todo-list store.
//!
//! Owns the whole state of a todo-list widget and exposes one operation per
//! user interaction. The presentation layer calls those operations and renders
//! the snapshot each one returns.
//!
//! - Items are `{text, completed}` pairs identified by position
//! - The list is persisted as one JSON array under a single storage key
//! - Notifications clear themselves after a configurable TTL
//! - Validation failures never surface as errors, only as state
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todo_list::{TodoConfig, TodoStore};
//! use todo_store_core::environment::SystemClock;
//! use todo_store_testing::MemoryStorage;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = TodoStore::open(
//!     TodoConfig::default(),
//!     Arc::new(MemoryStorage::new()),
//!     Arc::new(SystemClock),
//! )?;
//!
//! store.add_todo("Buy milk").await?;
//! store.toggle_completed(0).await?;
//!
//! let state = store.snapshot().await;
//! println!("Completed: {}/{}", state.completed_count(), state.count());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod persistence;
pub mod reducer;
pub mod storage;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::{ConfigError, TodoConfig};
pub use error::{InputField, TodoError};
pub use reducer::{NOTIFICATION_TIMER, TodoEnvironment, TodoReducer};
pub use storage::FileStorage;
pub use store::{TodoRuntime, TodoStore};
pub use types::{
    EditSession, Notification, NotificationKind, PendingDelete, Todo, TodoAction, TodoListState,
    messages,
};
