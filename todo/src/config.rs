//! Configuration for the todo store.
//!
//! Defaults match the browser widget this store backs. Every value can be
//! overridden from the environment:
//!
//! | Variable               | Field              | Default             |
//! |------------------------|--------------------|---------------------|
//! | `TODO_STORAGE_KEY`     | `storage_key`      | `todos`             |
//! | `TODO_NOTIFICATION_MS` | `notification_ttl` | `2000`              |
//! | `TODO_SEED_DEFAULT`    | `seed_when_empty`  | `false`             |
//! | `TODO_STORAGE_PATH`    | `storage_path`     | `todo-storage.json` |
//!
//! # Example
//!
//! ```no_run
//! use todo_list::config::TodoConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TodoConfig::from_env()?;
//! println!("Persisting under key {}", config.storage_key);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default storage key holding the JSON array
pub const DEFAULT_STORAGE_KEY: &str = "todos";

/// Default notification lifetime in milliseconds
pub const DEFAULT_NOTIFICATION_MS: u64 = 2000;

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable held an unparsable value
    #[error("Failed to parse {var}={value:?}")]
    Parse {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

/// Todo store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoConfig {
    /// Storage key holding the JSON array
    pub storage_key: String,
    /// Notification lifetime in milliseconds
    pub notification_ttl_ms: u64,
    /// Seed a sample todo when storage holds nothing usable
    pub seed_when_empty: bool,
    /// File used by `FileStorage`
    pub storage_path: PathBuf,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            notification_ttl_ms: DEFAULT_NOTIFICATION_MS,
            seed_when_empty: false,
            storage_path: PathBuf::from("todo-storage.json"),
        }
    }
}

impl TodoConfig {
    /// Load from process environment variables
    ///
    /// # Errors
    ///
    /// Returns error if a variable cannot be parsed or the result is invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns error if a variable cannot be parsed or the result is invalid
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(key) = lookup("TODO_STORAGE_KEY") {
            config.storage_key = key;
        }

        if let Some(value) = lookup("TODO_NOTIFICATION_MS") {
            config.notification_ttl_ms =
                value.trim().parse().map_err(|_| ConfigError::Parse {
                    var: "TODO_NOTIFICATION_MS",
                    value: value.clone(),
                })?;
        }

        if let Some(value) = lookup("TODO_SEED_DEFAULT") {
            config.seed_when_empty = parse_bool(&value).ok_or_else(|| ConfigError::Parse {
                var: "TODO_SEED_DEFAULT",
                value: value.clone(),
            })?;
        }

        if let Some(path) = lookup("TODO_STORAGE_PATH") {
            config.storage_path = PathBuf::from(path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if the storage key is blank or the notification TTL is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "storage_key cannot be empty".to_string(),
            ));
        }
        if self.notification_ttl_ms == 0 {
            return Err(ConfigError::Validation(
                "notification_ttl_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Notification lifetime as a `Duration`
    #[must_use]
    pub const fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    /// Override the storage key
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Override the notification lifetime
    #[must_use]
    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Enable or disable seeding
    #[must_use]
    pub const fn with_seed_when_empty(mut self, seed: bool) -> Self {
        self.seed_when_empty = seed;
        self
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
