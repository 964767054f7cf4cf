//! Integration tests for Counter with Store
//!
//! These tests run the demo store end to end, including the increment that
//! is dispatched later from a tokio task.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use counter::{CounterAction, CounterState, build_store};
use reflux_runtime::StoreConfig;
use reflux_testing::StateRecorder;
use std::time::Duration;

#[test]
fn test_counter_with_store() {
    let store = build_store(StoreConfig::default().with_name("counter-test"));
    let recorder = StateRecorder::new();
    let _subscription = store.subscribe(recorder.listener()).unwrap();

    assert_eq!(store.get_state().count, 0);

    store
        .dispatch_all([
            CounterAction::Increment,
            CounterAction::Increment,
            CounterAction::Decrement,
            CounterAction::Reset,
        ])
        .unwrap();

    let counts: Vec<i64> = recorder.states().iter().map(|state| state.count).collect();
    assert_eq!(counts, vec![1, 2, 1, 0]);
    assert_eq!(store.get_state().revision, 4);
}

#[test]
fn test_concurrent_increments() {
    let store = build_store(StoreConfig::default());

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let store = store.clone();
            std::thread::spawn(move || store.dispatch(CounterAction::Increment))
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    assert_eq!(store.get_state().count, 10);
}

#[tokio::test]
async fn test_increment_later_arrives_after_delay() {
    let store = build_store(StoreConfig::default());
    let (latest, mut updates) = tokio::sync::watch::channel(store.get_state());
    let _subscription = store
        .subscribe_fn(move |state: &CounterState| {
            latest.send_replace(state.clone());
        })
        .unwrap();

    store.dispatch(CounterAction::IncrementLater { delay_ms: 20 }).unwrap();
    assert_eq!(store.get_state().count, 0);

    tokio::time::timeout(Duration::from_secs(5), updates.wait_for(|state| state.count == 1))
        .await
        .expect("delayed increment should arrive")
        .unwrap();

    assert_eq!(store.get_state(), CounterState { count: 1, revision: 1 });
}
