//! Integration tests for cancellable effects
//!
//! A cancellable effect registered under an id replaces any effect already
//! running under that id. This is what lets a UI timer be re-armed.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use std::time::Duration;
use todo_store_core::{
    SmallVec,
    effect::{Effect, EffectId},
    reducer::Reducer,
    smallvec,
};
use todo_store_runtime::{Store, StoreError};

const TIMER: EffectId = EffectId::new("timer");

#[derive(Debug, Clone, PartialEq)]
enum TestAction {
    /// Arm (or re-arm) the timer with a label
    Arm { label: u32 },
    /// Stop the timer
    Disarm,
    /// Timer fired
    Fired { label: u32 },
}

#[derive(Debug, Clone, Default)]
struct TestState {
    armed: Vec<u32>,
    fired: Vec<u32>,
}

struct TestEnvironment;

struct TestReducer;

impl Reducer for TestReducer {
    type State = TestState;
    type Action = TestAction;
    type Environment = TestEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TestAction::Arm { label } => {
                state.armed.push(label);
                smallvec![
                    Effect::delay(Duration::from_millis(100), TestAction::Fired { label })
                        .cancellable(TIMER)
                ]
            },
            TestAction::Disarm => smallvec![Effect::Cancel(TIMER)],
            TestAction::Fired { label } => {
                state.fired.push(label);
                SmallVec::new()
            },
        }
    }
}

fn store() -> Store<TestState, TestAction, TestEnvironment, TestReducer> {
    Store::new(TestState::default(), TestReducer, TestEnvironment)
}

#[tokio::test(start_paused = true)]
async fn timer_fires_once() {
    let store = store();

    let mut handle = store.send(TestAction::Arm { label: 1 }).await.unwrap();
    handle.wait().await;

    assert_eq!(store.state(|s| s.fired.clone()).await, vec![1]);
}

#[tokio::test(start_paused = true)]
async fn rearming_replaces_previous_timer() {
    let store = store();

    let mut first = store.send(TestAction::Arm { label: 1 }).await.unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;
    let mut second = store.send(TestAction::Arm { label: 2 }).await.unwrap();

    // The first timer would have fired at 100ms; it must not.
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(store.state(|s| s.fired.is_empty()).await);

    first.wait().await;
    second.wait().await;
    assert_eq!(store.state(|s| s.fired.clone()).await, vec![2]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_rearms_keep_last_reduced_timer() {
    let store = store();

    let senders: Vec<_> = (0..16)
        .map(|label| {
            let store = store.clone();
            tokio::spawn(async move { store.send(TestAction::Arm { label }).await.unwrap() })
        })
        .collect();

    for sender in senders {
        let mut handle = sender.await.unwrap();
        handle.wait().await;
    }

    let (armed, fired) = store.state(|s| (s.armed.clone(), s.fired.clone())).await;
    assert_eq!(armed.len(), 16);
    assert_eq!(fired, vec![*armed.last().unwrap()]);
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_running_timer() {
    let store = store();

    let mut armed = store.send(TestAction::Arm { label: 7 }).await.unwrap();
    let _ = store.send(TestAction::Disarm).await.unwrap();

    armed.wait().await;
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert!(store.state(|s| s.fired.is_empty()).await);
    assert_eq!(store.pending_effects(), 0);
}

#[tokio::test(start_paused = true)]
async fn shutdown_aborts_timers() {
    let store = store();
    let _ = store.send(TestAction::Arm { label: 3 }).await.unwrap();

    store.shutdown(Duration::from_secs(1)).await.unwrap();

    assert!(store.state(|s| s.fired.is_empty()).await);
    assert_eq!(
        store.send(TestAction::Arm { label: 4 }).await.unwrap_err(),
        StoreError::ShutdownInProgress
    );
}
