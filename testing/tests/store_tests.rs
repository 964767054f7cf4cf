//! Integration tests for the store contract
//!
//! Dispatch/get-state agreement with a sequential fold, listener order,
//! unsubscribe semantics and the reentrancy guard.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use proptest::prelude::*;
use reflux_core::{Listener, Reducer, Store, StoreError};
use reflux_runtime::{ReentrancyPolicy, StoreConfig, create_store, store_creator_with_config};
use reflux_testing::properties::{action_sequence, sequential_states};
use reflux_testing::{ActionLog, ReducerTest, StateRecorder};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct AccountState {
    balance: i64,
    history: Vec<i64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AccountAction {
    Deposit(i64),
    Withdraw(i64),
    Reset,
}

struct AccountReducer;

impl Reducer for AccountReducer {
    type State = AccountState;
    type Action = AccountAction;

    fn reduce(&self, state: &mut Self::State, action: Self::Action) {
        match action {
            AccountAction::Deposit(amount) => state.balance += amount,
            AccountAction::Withdraw(amount) if amount <= state.balance => state.balance -= amount,
            AccountAction::Withdraw(_) => {},
            AccountAction::Reset => *state = AccountState::default(),
        }
        state.history.push(state.balance);
    }
}

fn account_action() -> impl Strategy<Value = AccountAction> {
    prop_oneof![
        (0_i64..1_000).prop_map(AccountAction::Deposit),
        (0_i64..1_000).prop_map(AccountAction::Withdraw),
        Just(AccountAction::Reset),
    ]
}

/// A store whose reducer misbehaves by calling `misuse` with the store itself
fn misbehaving_store<F>(config: StoreConfig, misuse: F) -> Store<i64, i64>
where
    F: Fn(&Store<i64, i64>) + Send + Sync + 'static,
{
    let handle: Arc<OnceLock<Store<i64, i64>>> = Arc::new(OnceLock::new());
    let reducer_handle = Arc::clone(&handle);
    let store = store_creator_with_config(config).create(
        reflux_core::reducer_fn(move |state: &mut i64, action: i64| {
            *state += action;
            if let Some(store) = reducer_handle.get() {
                misuse(store);
            }
        }),
        0,
    );
    handle.set(store.clone()).unwrap();
    store
}

// ============================================================================
// Reducer
// ============================================================================

#[test]
fn test_reducer_rejects_overdraft() {
    ReducerTest::new(AccountReducer)
        .given_state(AccountState::default())
        .when_actions([AccountAction::Deposit(50), AccountAction::Withdraw(80)])
        .then_state(|state| {
            assert_eq!(state.balance, 50);
            assert_eq!(state.history, vec![50, 50]);
        })
        .run();
}

// ============================================================================
// Dispatch and get-state
// ============================================================================

proptest! {
    #[test]
    fn prop_state_matches_sequential_fold(actions in action_sequence(account_action(), 40)) {
        let store = create_store(AccountReducer, AccountState::default());
        let expected = sequential_states(AccountState::default(), &actions, |state, action| {
            AccountReducer.reduce(state, action);
        });

        prop_assert_eq!(store.get_state(), expected[0].clone());
        for (action, expected_state) in actions.iter().zip(expected.iter().skip(1)) {
            store.dispatch(*action).unwrap();
            prop_assert_eq!(&store.get_state(), expected_state);
        }
    }
}

#[test]
fn test_get_state_before_any_dispatch_is_initial_state() {
    let initial = AccountState {
        balance: 7,
        history: vec![7],
    };
    let store = create_store(AccountReducer, initial.clone());

    assert_eq!(store.get_state(), initial);
}

// ============================================================================
// Listeners
// ============================================================================

#[test]
fn test_every_listener_notified_once_in_subscription_order() {
    let store = create_store(AccountReducer, AccountState::default());
    let order = ActionLog::new();

    for index in 0..5 {
        let order = order.clone();
        store
            .subscribe_fn(move |state: &AccountState| order.record((index, state.balance)))
            .unwrap();
    }

    store.dispatch(AccountAction::Deposit(30)).unwrap();

    assert_eq!(order.entries(), (0..5).map(|index| (index, 30)).collect::<Vec<_>>());
}

#[test]
fn test_unsubscribed_listener_is_not_notified() {
    let store = create_store(AccountReducer, AccountState::default());
    let kept = StateRecorder::new();
    let dropped = StateRecorder::new();

    let _kept = store.subscribe(kept.listener()).unwrap();
    let subscription = store.subscribe(dropped.listener()).unwrap();

    store.dispatch(AccountAction::Deposit(1)).unwrap();
    subscription.unsubscribe();
    subscription.unsubscribe();
    store.dispatch(AccountAction::Deposit(2)).unwrap();

    assert_eq!(kept.count(), 2);
    assert_eq!(dropped.count(), 1);
    assert_eq!(dropped.states()[0].balance, 1);
}

#[test]
fn test_identical_callbacks_are_distinct_subscriptions() {
    let store = create_store(AccountReducer, AccountState::default());
    let hits = ActionLog::new();
    let make = || {
        let hits = hits.clone();
        Listener::new(move |_: &AccountState| hits.record(()))
    };

    let first = store.subscribe(make()).unwrap();
    let _second = store.subscribe(make()).unwrap();
    first.unsubscribe();

    store.dispatch(AccountAction::Reset).unwrap();

    assert_eq!(hits.len(), 1);
}

#[test]
fn test_unsubscribe_during_notification_takes_effect_next_dispatch() {
    let store = create_store(AccountReducer, AccountState::default());
    let later = StateRecorder::new();
    let subscription: Arc<OnceLock<reflux_core::Subscription>> = Arc::new(OnceLock::new());

    let remover = Arc::clone(&subscription);
    store
        .subscribe_fn(move |_: &AccountState| {
            if let Some(subscription) = remover.get() {
                subscription.unsubscribe();
            }
        })
        .unwrap();
    subscription.set(store.subscribe(later.listener()).unwrap()).unwrap();

    store.dispatch(AccountAction::Deposit(1)).unwrap();
    store.dispatch(AccountAction::Deposit(1)).unwrap();

    // The pass that removed it had already snapshotted the listener list
    assert_eq!(later.count(), 1);
}

#[test]
fn test_listener_nested_dispatch_completes_before_dispatch_returns() {
    let store = create_store(AccountReducer, AccountState::default());
    let inner = store.clone();

    store
        .subscribe_fn(move |state: &AccountState| {
            if state.balance == 10 {
                inner.dispatch(AccountAction::Deposit(5)).unwrap();
            }
        })
        .unwrap();

    store.dispatch(AccountAction::Deposit(10)).unwrap();

    assert_eq!(store.get_state().balance, 15);
    assert_eq!(store.get_state().history, vec![10, 15]);
}

// ============================================================================
// Reentrancy
// ============================================================================

#[test]
fn test_dispatch_from_reducer_returns_error_every_time() {
    let outcomes = ActionLog::new();
    let sink = outcomes.clone();
    let store = misbehaving_store(StoreConfig::default(), move |store| sink.record(store.dispatch(100)));

    store.dispatch(1).unwrap();
    store.dispatch(1).unwrap();

    assert_eq!(
        outcomes.entries(),
        vec![Err(StoreError::ReducerDispatched), Err(StoreError::ReducerDispatched)]
    );
    assert_eq!(store.get_state(), 2);
}

#[test]
fn test_subscribe_from_reducer_returns_error() {
    let outcomes = ActionLog::new();
    let sink = outcomes.clone();
    let store = misbehaving_store(StoreConfig::default(), move |store| {
        sink.record(store.subscribe_fn(|_| {}).map(|_| ()));
    });

    store.dispatch(1).unwrap();

    assert_eq!(outcomes.entries(), vec![Err(StoreError::SubscribeWhileReducing)]);
}

#[test]
#[should_panic(expected = "You may not subscribe while the reducer is executing")]
fn test_subscribe_from_reducer_panics_under_panic_policy() {
    let config = StoreConfig::default().with_reentrancy_policy(ReentrancyPolicy::Panic);
    let store = misbehaving_store(config, |store| {
        let _ = store.subscribe_fn(|_| {});
    });

    let _ = store.dispatch(1);
}

#[test]
fn test_store_recovers_after_reducer_panic() {
    let store = create_store(
        reflux_core::reducer_fn(|state: &mut i64, action: i64| {
            assert!(action >= 0, "negative action");
            *state += action;
        }),
        0,
    );

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| store.dispatch(-1)));
    assert!(outcome.is_err());

    store.dispatch(4).unwrap();
    assert_eq!(store.get_state(), 4);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_slow_listener_does_not_see_states_out_of_order() {
    let store = create_store(reflux_core::reducer_fn(|count: &mut i64, step: i64| *count += step), 0);
    let seen = ActionLog::new();
    let sink = seen.clone();
    store
        .subscribe_fn(move |count: &i64| {
            if *count == 1 {
                std::thread::sleep(Duration::from_millis(200));
            }
            sink.record(*count);
        })
        .unwrap();

    let first = {
        let store = store.clone();
        std::thread::spawn(move || store.dispatch(1))
    };
    std::thread::sleep(Duration::from_millis(50));
    store.dispatch(1).unwrap();
    first.join().unwrap().unwrap();

    assert_eq!(seen.entries(), vec![1, 2]);
    assert_eq!(seen.last(), Some(store.get_state()));
}

#[test]
fn test_concurrent_dispatches_notify_in_reduction_order() {
    let store = create_store(reflux_core::reducer_fn(|count: &mut i64, step: i64| *count += step), 0);
    let seen = ActionLog::new();
    let sink = seen.clone();
    store.subscribe_fn(move |count: &i64| sink.record(*count)).unwrap();

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            std::thread::spawn(move || {
                for _ in 0..50 {
                    store.dispatch(1).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(seen.entries(), (1..=200).collect::<Vec<i64>>());
    assert_eq!(store.get_state(), 200);
}
