//! # Reflux Core
//!
//! Core traits and types for Reflux, a unidirectional state container.
//!
//! A store owns a single state cell that changes only through a pure
//! [`Reducer`]. Listeners observe every new state, middleware intercepts
//! dispatched actions, and enhancers transform the store constructor itself.
//!
//! ## Core Concepts
//!
//! - **State**: Application-defined value, replaced wholesale on every dispatch
//! - **Action**: Application-defined enum handed to the reducer
//! - **Reducer**: Pure function `(State, Action) → State`, written in place
//! - **Listener**: Identity-bearing callback notified after every dispatch
//! - **Middleware**: Interceptor sitting between `dispatch` and the reducer
//! - **Enhancer**: Function from store constructor to store constructor
//!
//! The concrete store lives in `reflux-runtime`; this crate only defines the
//! vocabulary every layer speaks.
//!
//! ## Example
//!
//! ```
//! use reflux_core::reducer::{Reducer, reducer_fn};
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct Counter {
//!     count: i64,
//! }
//!
//! enum CounterAction {
//!     Increment,
//!     Add(i64),
//! }
//!
//! let reducer = reducer_fn(|state: &mut Counter, action: CounterAction| match action {
//!     CounterAction::Increment => state.count += 1,
//!     CounterAction::Add(n) => state.count += n,
//! });
//!
//! let mut state = Counter::default();
//! reducer.reduce(&mut state, CounterAction::Increment);
//! reducer.reduce(&mut state, CounterAction::Add(41));
//! assert_eq!(state.count, 42);
//! ```

/// The composition operator (`compose`, `compose!`)
pub mod compose;

/// Reducer composition utilities
pub mod composition;

/// Listener handles and subscriptions
pub mod listener;

/// Middleware trait and the API handed to middleware
pub mod middleware;

/// Store handle, store constructor and store enhancer types
pub mod store;

pub use compose::compose;
pub use listener::{Listener, Subscription};
pub use middleware::{Middleware, MiddlewareApi, middleware_fn};
pub use reducer::{Reducer, SharedReducer, reducer_fn};
pub use store::{Dispatch, DispatchFn, Enhancer, GetState, Store, StoreCreator, Subscribe};
pub use error::StoreError;

/// Error types shared by every store layer
pub mod error {
    use thiserror::Error;

    /// Errors that can occur while talking to a store
    ///
    /// Reentrancy violations are programmer errors. By default the store
    /// surfaces them as values so the caller can decide what to do; a store
    /// configured for fatal reentrancy panics with the same message instead.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// `dispatch` was called while a reducer was executing
        ///
        /// Reducers must be pure. Dispatch follow-up actions from middleware
        /// or from a listener instead.
        #[error("Reducers may not dispatch actions")]
        ReducerDispatched,

        /// `subscribe` was called while a reducer was executing
        #[error(
            "You may not subscribe while the reducer is executing. \
             Subscribe outside the update cycle and read get_state() from the listener instead"
        )]
        SubscribeWhileReducing,

        /// A forwarding dispatch arrived after the enhanced store was dropped
        ///
        /// Middleware that defers re-dispatch (timers, spawned tasks) can
        /// outlive the store it was built for.
        #[error("Store was dropped before the action could be dispatched")]
        StoreDropped,
    }
}

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action) → State`. This crate uses
/// the in-place form, where the reducer receives the next state slot and
/// writes to it. A reducer must never call back into the store.
pub mod reducer {
    use std::marker::PhantomData;
    use std::sync::Arc;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Example
    ///
    /// ```
    /// use reflux_core::Reducer;
    ///
    /// #[derive(Clone, Default)]
    /// struct TitleState {
    ///     title: String,
    /// }
    ///
    /// enum TitleAction {
    ///     SetTitle(String),
    ///     Clear,
    /// }
    ///
    /// struct TitleReducer;
    ///
    /// impl Reducer for TitleReducer {
    ///     type State = TitleState;
    ///     type Action = TitleAction;
    ///
    ///     fn reduce(&self, state: &mut Self::State, action: Self::Action) {
    ///         match action {
    ///             TitleAction::SetTitle(title) => state.title = title,
    ///             TitleAction::Clear => state.title.clear(),
    ///         }
    ///     }
    /// }
    ///
    /// let mut state = TitleState::default();
    /// TitleReducer.reduce(&mut state, TitleAction::SetTitle("hello".into()));
    /// assert_eq!(state.title, "hello");
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// Apply `action` to `state`
        ///
        /// The store hands the reducer a private copy of the current state and
        /// publishes it only after this method returns, so a reducer can never
        /// expose a partial write.
        fn reduce(&self, state: &mut Self::State, action: Self::Action);
    }

    /// A reducer shared between a store and the constructors wrapping it
    pub type SharedReducer<S, A> = Arc<dyn Reducer<State = S, Action = A> + Send + Sync>;

    impl<R> Reducer for Box<R>
    where
        R: Reducer + ?Sized,
    {
        type State = R::State;
        type Action = R::Action;

        fn reduce(&self, state: &mut Self::State, action: Self::Action) {
            (**self).reduce(state, action);
        }
    }

    impl<R> Reducer for Arc<R>
    where
        R: Reducer + ?Sized,
    {
        type State = R::State;
        type Action = R::Action;

        fn reduce(&self, state: &mut Self::State, action: Self::Action) {
            (**self).reduce(state, action);
        }
    }

    /// A reducer backed by a closure
    ///
    /// Created by [`reducer_fn`].
    pub struct FnReducer<S, A, F> {
        f: F,
        _phantom: PhantomData<fn(&mut S, A)>,
    }

    impl<S, A, F> Reducer for FnReducer<S, A, F>
    where
        F: Fn(&mut S, A),
    {
        type State = S;
        type Action = A;

        fn reduce(&self, state: &mut S, action: A) {
            (self.f)(state, action);
        }
    }

    impl<S, A, F> std::fmt::Debug for FnReducer<S, A, F> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("FnReducer").finish_non_exhaustive()
        }
    }

    /// Turn a closure `Fn(&mut State, Action)` into a [`Reducer`]
    #[must_use]
    pub const fn reducer_fn<S, A, F>(f: F) -> FnReducer<S, A, F>
    where
        F: Fn(&mut S, A),
    {
        FnReducer {
            f,
            _phantom: PhantomData,
        }
    }
}
