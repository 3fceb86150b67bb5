//! Tests for #[derive(Action)] macro

use todo_store_macros::Action;

#[derive(Action, Clone, Debug, PartialEq)]
enum ListAction {
    #[intent]
    AddItem { text: String },

    #[intent]
    ClearAll,

    #[intent]
    Toggle(usize),

    #[feedback]
    TimerFired { generation: u64 },

    Untagged,
}

#[test]
fn test_is_intent() {
    let action = ListAction::AddItem {
        text: "Buy milk".to_string(),
    };
    assert!(action.is_intent());
    assert!(!action.is_feedback());
}

#[test]
fn test_is_feedback() {
    let action = ListAction::TimerFired { generation: 3 };
    assert!(action.is_feedback());
    assert!(!action.is_intent());
}

#[test]
fn test_unit_and_tuple_variants() {
    assert!(ListAction::ClearAll.is_intent());
    assert!(ListAction::Toggle(0).is_intent());
}

#[test]
fn test_untagged_variant_is_neither() {
    assert!(!ListAction::Untagged.is_intent());
    assert!(!ListAction::Untagged.is_feedback());
}

#[test]
fn test_name() {
    assert_eq!(
        ListAction::AddItem {
            text: String::new()
        }
        .name(),
        "AddItem"
    );
    assert_eq!(ListAction::Toggle(2).name(), "Toggle");
    assert_eq!(ListAction::TimerFired { generation: 0 }.name(), "TimerFired");
    assert_eq!(ListAction::Untagged.name(), "Untagged");
}
