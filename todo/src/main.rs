//! Scripted demo session against a file-backed todo store.
//!
//! Run twice to see the list reloaded from `TODO_STORAGE_PATH`.

use std::sync::Arc;
use todo_list::{FileStorage, TodoConfig, TodoListState, TodoStore};
use todo_store_core::environment::SystemClock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_list(state: &TodoListState) {
    if let Some(message) = state.empty_message() {
        println!("  {message}");
    }
    for (index, todo) in state.todos.iter().enumerate() {
        let status = if todo.completed { "✓" } else { " " };
        println!("  {index}. [{status}] {}", todo.text);
    }
    if let Some(notification) = &state.notification {
        let tone = if notification.is_success() { "ok" } else { "!!" };
        println!("  ({tone}) {}", notification.message);
    }
    if let Some(indicator) = state.duplicate_indicator() {
        println!("  ({indicator})");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_list=debug,todo_store_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    todo_store_runtime::metrics::register_metrics();

    let config = TodoConfig::from_env()?;
    let storage = Arc::new(FileStorage::open(&config.storage_path)?);
    tracing::info!(path = %storage.path().display(), "Using file storage");

    let store = TodoStore::open(config, storage, Arc::new(SystemClock))?;

    println!("=== Todo List ===\n");
    println!("Loaded:");
    print_list(&store.snapshot().await);

    println!("\nAdding todos...");
    store.add_todo("Buy milk").await?;
    store.add_todo("Write documentation").await?;
    let state = store.add_todo("   ").await?;
    print_list(&state);

    println!("\nTyping a duplicate...");
    let state = store.update_draft_input("Buy milk").await?;
    print_list(&state);
    store.update_draft_input("").await?;

    println!("\nEditing item 0...");
    store.begin_edit(0).await?;
    store.update_edit_draft("Buy oat milk").await?;
    let state = store.commit_edit().await?;
    print_list(&state);

    println!("\nCompleting item 1...");
    let state = store.toggle_completed(1).await?;
    print_list(&state);
    println!(
        "\nCompleted: {}/{} ({})",
        state.completed_count(),
        state.count(),
        state.clear_all_label()
    );

    store.flush().await;
    store.shutdown().await?;

    println!("\n=== Demo Complete ===");
    Ok(())
}
