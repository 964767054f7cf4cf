//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers in various ways:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Focus a reducer on a subset of state
//!
//! A store takes exactly one reducer; these helpers let an application build
//! that reducer out of smaller ones.
//!
//! # Examples
//!
//! ## Combining Reducers
//!
//! ```
//! use reflux_core::Reducer;
//! use reflux_core::composition::combine_reducers;
//!
//! #[derive(Clone, Default)]
//! struct MyState {
//!     count: i32,
//!     name: String,
//! }
//!
//! #[derive(Clone)]
//! enum MyAction {
//!     Increment,
//!     SetName(String),
//! }
//!
//! struct CounterReducer;
//! struct NameReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = MyState;
//!     type Action = MyAction;
//!
//!     fn reduce(&self, state: &mut Self::State, action: Self::Action) {
//!         if matches!(action, MyAction::Increment) {
//!             state.count += 1;
//!         }
//!     }
//! }
//!
//! impl Reducer for NameReducer {
//!     type State = MyState;
//!     type Action = MyAction;
//!
//!     fn reduce(&self, state: &mut Self::State, action: Self::Action) {
//!         if let MyAction::SetName(name) = action {
//!             state.name = name;
//!         }
//!     }
//! }
//!
//! let combined = combine_reducers(vec![Box::new(CounterReducer), Box::new(NameReducer)]);
//!
//! let mut state = MyState::default();
//! combined.reduce(&mut state, MyAction::Increment);
//! combined.reduce(&mut state, MyAction::SetName("Alice".into()));
//! assert_eq!((state.count, state.name.as_str()), (1, "Alice"));
//! ```

use crate::reducer::Reducer;

/// Boxed reducer accepted by [`combine_reducers`]
pub type BoxedReducer<S, A> = Box<dyn Reducer<State = S, Action = A> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence on the same state slot, so later reducers
/// observe the writes of earlier ones. Every reducer receives its own clone
/// of the action.
#[must_use]
pub fn combine_reducers<S, A>(reducers: Vec<BoxedReducer<S, A>>) -> CombinedReducer<S, A>
where
    A: Clone,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A> {
    reducers: Vec<BoxedReducer<S, A>>,
}

impl<S, A> CombinedReducer<S, A> {
    /// Number of reducers in the combination
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Whether the combination holds no reducers
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A> std::fmt::Debug for CombinedReducer<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedReducer")
            .field("reducers", &self.reducers.len())
            .finish()
    }
}

impl<S, A> Reducer for CombinedReducer<S, A>
where
    A: Clone,
{
    type State = S;
    type Action = A;

    fn reduce(&self, state: &mut Self::State, action: Self::Action) {
        let Some((last, rest)) = self.reducers.split_last() else {
            return;
        };

        for reducer in rest {
            reducer.reduce(state, action.clone());
        }
        last.reduce(state, action);
    }
}

/// Scopes a reducer to operate on a subset of a larger state.
///
/// `get_state` borrows the child state out of the parent, `set_state` writes
/// the updated child back. Parent fields outside the child are untouched.
///
/// # Examples
///
/// ```
/// use reflux_core::Reducer;
/// use reflux_core::composition::scope_reducer;
///
/// #[derive(Clone, Default)]
/// struct CounterState {
///     count: i32,
/// }
///
/// enum CounterAction {
///     Increment,
/// }
///
/// struct CounterReducer;
///
/// impl Reducer for CounterReducer {
///     type State = CounterState;
///     type Action = CounterAction;
///
///     fn reduce(&self, state: &mut Self::State, _action: Self::Action) {
///         state.count += 1;
///     }
/// }
///
/// #[derive(Clone, Default)]
/// struct AppState {
///     counter: CounterState,
///     other_data: String,
/// }
///
/// let scoped = scope_reducer(
///     CounterReducer,
///     |app_state: &AppState| &app_state.counter,
///     |app_state: &mut AppState, counter: CounterState| {
///         app_state.counter = counter;
///     },
/// );
///
/// let mut state = AppState::default();
/// scoped.reduce(&mut state, CounterAction::Increment);
/// assert_eq!(state.counter.count, 1);
/// ```
pub fn scope_reducer<S, SubS, R>(
    reducer: R,
    get_state: fn(&S) -> &SubS,
    set_state: fn(&mut S, SubS),
) -> ScopedReducer<S, SubS, R>
where
    SubS: Clone,
    R: Reducer<State = SubS>,
{
    ScopedReducer {
        reducer,
        get_state,
        set_state,
    }
}

/// A scoped reducer that operates on a subset of state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, R> {
    reducer: R,
    get_state: fn(&S) -> &SubS,
    set_state: fn(&mut S, SubS),
}

impl<S, SubS, R> Reducer for ScopedReducer<S, SubS, R>
where
    SubS: Clone,
    R: Reducer<State = SubS>,
{
    type State = S;
    type Action = R::Action;

    fn reduce(&self, state: &mut Self::State, action: Self::Action) {
        let mut sub_state = (self.get_state)(state).clone();
        self.reducer.reduce(&mut sub_state, action);
        (self.set_state)(state, sub_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct TestState {
        counter: i32,
        name: String,
        trail: Vec<&'static str>,
    }

    #[derive(Clone)]
    enum TestAction {
        Increment,
        Decrement,
        SetName(String),
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = TestState;
        type Action = TestAction;

        fn reduce(&self, state: &mut Self::State, action: Self::Action) {
            match action {
                TestAction::Increment => state.counter += 1,
                TestAction::Decrement => state.counter -= 1,
                TestAction::SetName(_) => {},
            }
            state.trail.push("counter");
        }
    }

    struct NameReducer;

    impl Reducer for NameReducer {
        type State = TestState;
        type Action = TestAction;

        fn reduce(&self, state: &mut Self::State, action: Self::Action) {
            if let TestAction::SetName(name) = action {
                state.name = name;
            }
            state.trail.push("name");
        }
    }

    #[test]
    fn test_combine_reducers() {
        let combined = combine_reducers(vec![Box::new(CounterReducer), Box::new(NameReducer)]);
        assert_eq!(combined.len(), 2);

        let mut state = TestState::default();

        combined.reduce(&mut state, TestAction::Increment);
        assert_eq!(state.counter, 1);

        combined.reduce(&mut state, TestAction::SetName("Alice".to_string()));
        assert_eq!(state.name, "Alice");

        combined.reduce(&mut state, TestAction::Decrement);
        assert_eq!(state.counter, 0);
        assert_eq!(state.name, "Alice");
    }

    #[test]
    fn test_combine_reducers_runs_in_order() {
        let combined = combine_reducers(vec![Box::new(NameReducer), Box::new(CounterReducer)]);
        let mut state = TestState::default();

        combined.reduce(&mut state, TestAction::Increment);

        assert_eq!(state.trail, vec!["name", "counter"]);
    }

    #[test]
    fn test_combine_no_reducers_leaves_state_alone() {
        let combined = combine_reducers::<TestState, TestAction>(Vec::new());
        assert!(combined.is_empty());

        let mut state = TestState::default();
        combined.reduce(&mut state, TestAction::Increment);

        assert_eq!(state.counter, 0);
        assert!(state.trail.is_empty());
    }

    #[derive(Clone, Default)]
    struct SubState {
        value: i32,
    }

    enum SubAction {
        Add(i32),
        Multiply(i32),
    }

    struct SubReducer;

    impl Reducer for SubReducer {
        type State = SubState;
        type Action = SubAction;

        fn reduce(&self, state: &mut Self::State, action: Self::Action) {
            match action {
                SubAction::Add(n) => state.value += n,
                SubAction::Multiply(n) => state.value *= n,
            }
        }
    }

    #[derive(Clone, Default)]
    struct ParentState {
        sub: SubState,
        other: String,
    }

    #[test]
    fn test_scope_reducer() {
        let scoped = scope_reducer(
            SubReducer,
            |parent: &ParentState| &parent.sub,
            |parent: &mut ParentState, sub: SubState| {
                parent.sub = sub;
            },
        );

        let mut state = ParentState {
            sub: SubState { value: 5 },
            other: "test".to_string(),
        };

        scoped.reduce(&mut state, SubAction::Add(3));
        assert_eq!(state.sub.value, 8);
        assert_eq!(state.other, "test");

        scoped.reduce(&mut state, SubAction::Multiply(2));
        assert_eq!(state.sub.value, 16);
        assert_eq!(state.other, "test");
    }
}
