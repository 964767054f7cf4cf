//! Store handle, store constructor and store enhancer types
//!
//! A store is exposed as three bound functions: dispatch, subscribe and
//! get-state. [`Store`] bundles them so the handle can be cloned and passed
//! around, while still letting an enhancer swap any one of them out.
//!
//! A [`StoreCreator`] turns `(reducer, initial_state)` into a [`Store`]; an
//! [`Enhancer`] turns one creator into another. Enhancers compose left to
//! right with `>>`:
//!
//! ```text
//! (a >> b).apply(base)  ==  b.apply(a.apply(base))
//! ```
//!
//! so `b` wraps whatever `a` produced and its dispatch is the outermost.

use crate::compose::compose;
use crate::error::StoreError;
use crate::listener::{Listener, Subscription};
use crate::reducer::{Reducer, SharedReducer};
use std::fmt;
use std::ops::Shr;
use std::sync::Arc;

/// Unsized dispatch function
pub type DispatchFn<A> = dyn Fn(A) -> Result<(), StoreError> + Send + Sync;

/// Shared dispatch function
pub type Dispatch<A> = Arc<DispatchFn<A>>;

/// Shared subscribe function
pub type Subscribe<S> = Arc<dyn Fn(Listener<S>) -> Result<Subscription, StoreError> + Send + Sync>;

/// Shared get-state function
pub type GetState<S> = Arc<dyn Fn() -> S + Send + Sync>;

type CreateFn<S, A> = dyn Fn(SharedReducer<S, A>, S) -> Store<S, A> + Send + Sync;

type EnhanceFn<S, A> = dyn Fn(StoreCreator<S, A>) -> StoreCreator<S, A> + Send + Sync;

/// Handle to a store: its dispatch, subscribe and get-state functions
///
/// Cloning the handle is cheap and every clone talks to the same store.
pub struct Store<S, A> {
    dispatch: Dispatch<A>,
    subscribe: Subscribe<S>,
    get_state: GetState<S>,
}

impl<S, A> Store<S, A>
where
    S: 'static,
    A: 'static,
{
    /// Assemble a handle from its three functions
    #[must_use]
    pub fn from_parts(dispatch: Dispatch<A>, subscribe: Subscribe<S>, get_state: GetState<S>) -> Self {
        Self {
            dispatch,
            subscribe,
            get_state,
        }
    }

    /// Split the handle into `(dispatch, subscribe, get_state)`
    #[must_use]
    pub fn into_parts(self) -> (Dispatch<A>, Subscribe<S>, GetState<S>) {
        (self.dispatch, self.subscribe, self.get_state)
    }

    /// Replace the dispatch function, keeping subscribe and get-state
    ///
    /// This is how enhancers wrap a store.
    #[must_use]
    pub fn with_dispatch(self, dispatch: Dispatch<A>) -> Self {
        Self { dispatch, ..self }
    }

    /// Send an action through the store
    ///
    /// Returns once the reducer has run and every listener has been
    /// notified, or once middleware has decided to stop the action.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReducerDispatched`] when called from inside a
    /// reducer, or [`StoreError::StoreDropped`] when a deferred forwarding
    /// dispatch outlives its store.
    pub fn dispatch(&self, action: A) -> Result<(), StoreError> {
        (self.dispatch)(action)
    }

    /// Dispatch each action in order, stopping at the first error
    ///
    /// # Errors
    ///
    /// Returns the first error any single dispatch produced.
    pub fn dispatch_all<I>(&self, actions: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = A>,
    {
        actions.into_iter().try_for_each(|action| self.dispatch(action))
    }

    /// Register a listener, notified with every new state
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SubscribeWhileReducing`] when called from inside
    /// a reducer.
    pub fn subscribe(&self, listener: Listener<S>) -> Result<Subscription, StoreError> {
        (self.subscribe)(listener)
    }

    /// Register a closure as a fresh listener
    ///
    /// # Errors
    ///
    /// Same as [`subscribe`](Self::subscribe).
    pub fn subscribe_fn<F>(&self, callback: F) -> Result<Subscription, StoreError>
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.subscribe(Listener::new(callback))
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn get_state(&self) -> S {
        (self.get_state)()
    }

    /// Owned copy of the dispatch function
    #[must_use]
    pub fn dispatcher(&self) -> Dispatch<A> {
        Arc::clone(&self.dispatch)
    }

    /// Owned copy of the subscribe function
    #[must_use]
    pub fn subscriber(&self) -> Subscribe<S> {
        Arc::clone(&self.subscribe)
    }

    /// Owned copy of the get-state function
    #[must_use]
    pub fn state_reader(&self) -> GetState<S> {
        Arc::clone(&self.get_state)
    }
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            dispatch: Arc::clone(&self.dispatch),
            subscribe: Arc::clone(&self.subscribe),
            get_state: Arc::clone(&self.get_state),
        }
    }
}

impl<S, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

/// A store constructor: `(reducer, initial_state) → Store`
pub struct StoreCreator<S, A> {
    create: Arc<CreateFn<S, A>>,
}

impl<S, A> StoreCreator<S, A>
where
    S: 'static,
    A: 'static,
{
    /// Wrap a constructor function
    pub fn new<F>(create: F) -> Self
    where
        F: Fn(SharedReducer<S, A>, S) -> Store<S, A> + Send + Sync + 'static,
    {
        Self {
            create: Arc::new(create),
        }
    }

    /// Build a store from a reducer and its initial state
    #[must_use]
    pub fn create<R>(&self, reducer: R, initial_state: S) -> Store<S, A>
    where
        R: Reducer<State = S, Action = A> + Send + Sync + 'static,
    {
        self.create_shared(Arc::new(reducer), initial_state)
    }

    /// Build a store from an already shared reducer
    ///
    /// Enhancers use this to hand the reducer they received to the
    /// constructor they wrap.
    #[must_use]
    pub fn create_shared(&self, reducer: SharedReducer<S, A>, initial_state: S) -> Store<S, A> {
        (self.create)(reducer, initial_state)
    }
}

impl<S, A> Clone for StoreCreator<S, A> {
    fn clone(&self) -> Self {
        Self {
            create: Arc::clone(&self.create),
        }
    }
}

impl<S, A> fmt::Debug for StoreCreator<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreCreator").finish_non_exhaustive()
    }
}

/// A store enhancer: `StoreCreator → StoreCreator`
///
/// # Example
///
/// ```
/// use reflux_core::{Enhancer, StoreCreator};
/// use std::sync::Arc;
///
/// // Forward every action twice.
/// let doubling: Enhancer<i32, i32> = Enhancer::new(|create: StoreCreator<i32, i32>| {
///     StoreCreator::new(move |reducer, initial_state| {
///         let store = create.create_shared(reducer, initial_state);
///         let inner = store.dispatcher();
///         store.with_dispatch(Arc::new(move |action: i32| {
///             inner(action)?;
///             inner(action)
///         }))
///     })
/// });
///
/// let composed = doubling.clone() >> Enhancer::identity() >> doubling;
/// # let _ = composed;
/// ```
pub struct Enhancer<S, A> {
    enhance: Arc<EnhanceFn<S, A>>,
}

impl<S, A> Enhancer<S, A>
where
    S: 'static,
    A: 'static,
{
    /// Wrap an enhancing function
    pub fn new<F>(enhance: F) -> Self
    where
        F: Fn(StoreCreator<S, A>) -> StoreCreator<S, A> + Send + Sync + 'static,
    {
        Self {
            enhance: Arc::new(enhance),
        }
    }

    /// The enhancer that returns its creator unchanged
    #[must_use]
    pub fn identity() -> Self {
        Self::new(|create| create)
    }

    /// Enhance a store constructor
    #[must_use]
    pub fn apply(&self, create: StoreCreator<S, A>) -> StoreCreator<S, A> {
        (self.enhance)(create)
    }

    /// Run `self` first, then `next` around its result
    ///
    /// Same as `self >> next`.
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        let first = self.enhance;
        let second = next.enhance;
        Self::new(compose(
            move |create: StoreCreator<S, A>| first(create),
            move |create: StoreCreator<S, A>| second(create),
        ))
    }
}

impl<S, A> Shr for Enhancer<S, A>
where
    S: 'static,
    A: 'static,
{
    type Output = Self;

    fn shr(self, rhs: Self) -> Self::Output {
        self.then(rhs)
    }
}

impl<S, A> Clone for Enhancer<S, A> {
    fn clone(&self) -> Self {
        Self {
            enhance: Arc::clone(&self.enhance),
        }
    }
}

impl<S, A> fmt::Debug for Enhancer<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enhancer").finish_non_exhaustive()
    }
}
