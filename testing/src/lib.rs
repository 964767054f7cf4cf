//! # Reflux Testing
//!
//! Testing utilities and helpers for Reflux stores.
//!
//! This crate provides:
//! - [`ReducerTest`], a Given-When-Then helper for reducers
//! - Explicit-context recorders: [`ActionLog`], [`RecordingMiddleware`],
//!   [`StateRecorder`] and [`logging_enhancer`]
//! - Property-based testing utilities
//! - Tracing setup for tests that want to see store logs
//!
//! ## Example
//!
//! ```
//! use reflux_core::{Middleware, reducer_fn};
//! use reflux_runtime::{apply_middleware, store_creator};
//! use reflux_testing::{ActionLog, RecordingMiddleware, StateRecorder};
//!
//! let actions = ActionLog::new();
//! let recorder = StateRecorder::new();
//!
//! let middlewares: Vec<Box<dyn Middleware<i32, i32>>> =
//!     vec![Box::new(RecordingMiddleware::new(actions.clone()))];
//! let store = apply_middleware(middlewares)
//!     .apply(store_creator())
//!     .create(reducer_fn(|total: &mut i32, n: i32| *total += n), 0);
//! store.subscribe(recorder.listener())?;
//! store.dispatch_all([1, 2, 3])?;
//!
//! assert_eq!(actions.entries(), vec![1, 2, 3]);
//! assert_eq!(recorder.states(), vec![1, 3, 6]);
//! # Ok::<(), reflux_core::StoreError>(())
//! ```


/// Recorders for observing a store from tests
pub mod recorders;

/// Test helpers and utilities
pub mod helpers {
    /// Route `tracing` output to the test harness
    ///
    /// Honors `RUST_LOG` and defaults to `debug`. Safe to call from every
    /// test; only the first call installs the subscriber.
    pub fn init_tracing() {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing utilities
///
/// Strategies for driving a store with generated action sequences.
pub mod properties {
    use proptest::collection::vec;
    use proptest::prelude::*;

    /// Sequences of up to `max_len` actions drawn from `action`
    pub fn action_sequence<A>(action: A, max_len: usize) -> impl Strategy<Value = Vec<A::Value>>
    where
        A: Strategy,
    {
        vec(action, 0..=max_len)
    }

    /// Fold `actions` through `reduce` starting at `initial_state`
    ///
    /// The sequential model a store must agree with after every dispatch.
    /// Returns every intermediate state, first entry included.
    pub fn sequential_states<S, A, F>(initial_state: S, actions: &[A], reduce: F) -> Vec<S>
    where
        S: Clone,
        A: Clone,
        F: Fn(&mut S, A),
    {
        let mut states = Vec::with_capacity(actions.len() + 1);
        let mut state = initial_state;
        states.push(state.clone());
        for action in actions {
            reduce(&mut state, action.clone());
            states.push(state.clone());
        }
        states
    }
}

// Re-export commonly used items
pub use recorders::{ActionLog, RecordingMiddleware, StateRecorder, logging_enhancer};
pub use reducer_test::ReducerTest;
