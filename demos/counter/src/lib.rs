//! # Counter Example
//!
//! A simple counter demonstrating Reflux.
//!
//! This example showcases:
//! - A plain reducer over a small state
//! - Middleware that defers work to a tokio task and re-dispatches later
//! - Composing the middleware enhancer with other enhancers
//! - Listeners observing every new state
//!
//! ## Example
//!
//! ```
//! use counter::{CounterAction, build_store};
//! use reflux_runtime::StoreConfig;
//!
//! let store = build_store(StoreConfig::default().with_name("counter"));
//!
//! store.dispatch(CounterAction::Increment)?;
//! store.dispatch(CounterAction::Increment)?;
//! store.dispatch(CounterAction::Decrement)?;
//! assert_eq!(store.get_state().count, 1);
//! # Ok::<(), reflux_core::StoreError>(())
//! ```

use reflux_core::composition::{CombinedReducer, combine_reducers, scope_reducer};
use reflux_core::{Dispatch, Enhancer, Middleware, MiddlewareApi, Reducer, Store, StoreCreator, StoreError};
use reflux_runtime::{LoggingMiddleware, MetricsMiddleware, StoreConfig, apply_middleware, store_creator_with_config};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

/// Counter state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterState {
    /// Current count value
    pub count: i64,
    /// Number of actions the reducer has applied
    pub revision: u64,
}

/// Counter actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterAction {
    /// Increment the counter by 1
    Increment,
    /// Decrement the counter by 1
    Decrement,
    /// Reset the counter to 0
    Reset,
    /// Increment the counter by 1 after `delay_ms` milliseconds
    ///
    /// Handled by [`DelayedIncrement`]; never reaches the reducer.
    IncrementLater {
        /// Delay before the increment is dispatched
        delay_ms: u64,
    },
}

/// Arithmetic on the count alone
#[derive(Debug, Clone, Copy, Default)]
pub struct CountReducer;

impl Reducer for CountReducer {
    type State = i64;
    type Action = CounterAction;

    fn reduce(&self, count: &mut Self::State, action: Self::Action) {
        match action {
            CounterAction::Increment => *count += 1,
            CounterAction::Decrement => *count -= 1,
            CounterAction::Reset => *count = 0,
            // Consumed by middleware
            CounterAction::IncrementLater { .. } => {},
        }
    }
}

/// Bumps the revision for every action the reducer applies
#[derive(Debug, Clone, Copy, Default)]
pub struct RevisionReducer;

impl Reducer for RevisionReducer {
    type State = CounterState;
    type Action = CounterAction;

    fn reduce(&self, state: &mut Self::State, action: Self::Action) {
        if !matches!(action, CounterAction::IncrementLater { .. }) {
            state.revision += 1;
        }
    }
}

fn count_of(state: &CounterState) -> &i64 {
    &state.count
}

fn set_count(state: &mut CounterState, count: i64) {
    state.count = count;
}

/// Counter reducer: [`CountReducer`] scoped to `count`, then [`RevisionReducer`]
#[must_use]
pub fn counter_reducer() -> CombinedReducer<CounterState, CounterAction> {
    combine_reducers(vec![
        Box::new(scope_reducer(CountReducer, count_of, set_count)),
        Box::new(RevisionReducer),
    ])
}

/// Middleware that turns `IncrementLater` into a deferred `Increment`
///
/// The increment is dispatched from a tokio task through the forwarding
/// dispatch, so it passes through the whole middleware chain again. Outside
/// a tokio runtime the increment is dispatched immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelayedIncrement;

impl Middleware<CounterState, CounterAction> for DelayedIncrement {
    fn handle(
        &self,
        api: &MiddlewareApi<CounterState, CounterAction>,
        action: CounterAction,
        next: &Dispatch<CounterAction>,
    ) -> Result<(), StoreError> {
        let CounterAction::IncrementLater { delay_ms } = action else {
            return next(action);
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No tokio runtime, incrementing immediately");
            return api.dispatch(CounterAction::Increment);
        };

        let dispatch = api.dispatcher();
        runtime.spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            if let Err(error) = dispatch(CounterAction::Increment) {
                tracing::warn!(%error, "Delayed increment dropped");
            }
        });
        tracing::debug!(delay_ms, "Increment scheduled");
        Ok(())
    }
}

/// Enhancer that emits one `TRACE` event per completed dispatch
#[must_use]
pub fn trace_dispatches() -> Enhancer<CounterState, CounterAction> {
    Enhancer::new(|create: StoreCreator<CounterState, CounterAction>| {
        StoreCreator::new(move |reducer, initial_state| {
            let store = create.create_shared(reducer, initial_state);
            let inner = store.dispatcher();
            let get_state = store.state_reader();
            store.with_dispatch(Arc::new(move |action: CounterAction| {
                inner(action)?;
                tracing::trace!(?action, count = get_state().count, "Dispatch complete");
                Ok(())
            }))
        })
    })
}

/// Build the demo store: metrics, logging and delayed increments, traced
#[must_use]
pub fn build_store(config: StoreConfig) -> Store<CounterState, CounterAction> {
    let middlewares: Vec<Box<dyn Middleware<CounterState, CounterAction>>> = vec![
        Box::new(MetricsMiddleware::new(config.name.clone())),
        Box::new(LoggingMiddleware::new(Level::DEBUG)),
        Box::new(DelayedIncrement),
    ];

    let enhancer = apply_middleware(middlewares) >> trace_dispatches();

    enhancer
        .apply(store_creator_with_config(config))
        .create(counter_reducer(), CounterState::default())
}
