//! Tests for #[derive(State)] macro

use todo_store_macros::State;

#[derive(State, Clone, Debug, Default)]
struct ListState {
    pub items: Vec<String>,
    #[revision]
    pub revision: u64,
}

#[derive(State, Clone, Debug)]
struct PlainState {
    pub count: i32,
}

#[test]
fn test_revision_accessor() {
    let state = ListState {
        items: vec!["a".to_string()],
        revision: 5,
    };

    assert_eq!(state.revision(), 5);
}

#[test]
fn test_bump_revision() {
    let mut state = ListState::default();

    assert_eq!(state.bump_revision(), 1);
    assert_eq!(state.bump_revision(), 2);
    assert_eq!(state.revision(), 2);
}

#[test]
fn test_state_without_revision_compiles() {
    let state = PlainState { count: 1 };
    assert_eq!(state.count, 1);
}
