//! Metrics emitted by the store runtime.
//!
//! The runtime records through the [`metrics`] facade only. Nothing is exported
//! unless the host application installs a recorder; without one every macro
//! call is a no-op.
//!
//! # Example
//!
//! ```ignore
//! // After installing a recorder of your choice:
//! todo_store_runtime::metrics::register_metrics();
//! ```

use metrics::{describe_counter, describe_histogram};

// Re-export metrics macros for use in other crates
pub use metrics::{counter, histogram};

/// Actions reduced by any store
pub const ACTIONS_TOTAL: &str = "store.actions.total";

/// Effects started, labelled by `type`
pub const EFFECTS_EXECUTED: &str = "store.effects.executed";

/// Cancellable effects aborted by `Cancel`, replacement, or shutdown
pub const EFFECTS_CANCELLED: &str = "store.effects.cancelled";

/// Actions rejected because the store was shutting down
pub const SHUTDOWN_REJECTED: &str = "store.shutdown.rejected_actions";

/// Time spent inside `Reducer::reduce`
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Register all metric descriptions with the installed recorder.
pub fn register_metrics() {
    describe_counter!(ACTIONS_TOTAL, "Total number of actions processed by the store");
    describe_counter!(
        EFFECTS_EXECUTED,
        "Total number of effects started, by effect type"
    );
    describe_counter!(
        EFFECTS_CANCELLED,
        "Total number of cancellable effects aborted before completion"
    );
    describe_counter!(
        SHUTDOWN_REJECTED,
        "Total number of actions rejected during shutdown"
    );
    describe_histogram!(REDUCER_DURATION, "Time taken to execute the reducer");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_without_recorder_is_noop() {
        register_metrics();
        counter!(ACTIONS_TOTAL).increment(1);
    }

    #[test]
    fn metric_names_share_prefix() {
        for name in [
            ACTIONS_TOTAL,
            EFFECTS_EXECUTED,
            EFFECTS_CANCELLED,
            SHUTDOWN_REJECTED,
            REDUCER_DURATION,
        ] {
            assert!(name.starts_with("store."), "{name}");
        }
    }
}
