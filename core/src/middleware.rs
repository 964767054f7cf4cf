//! Middleware trait and the API handed to middleware
//!
//! Middleware sits between a caller's `dispatch` and the store's own
//! dispatch:
//!
//! ```text
//! dispatch(action) → m1 → m2 → ... → mn → store dispatch → reducer → listeners
//! ```
//!
//! Each middleware receives the action together with `next`, the handler
//! for the layer inside it. It may:
//! - call `next(action)` to continue the chain,
//! - call `next` with a different action to replace it,
//! - not call `next` at all to suppress the action,
//! - call [`MiddlewareApi::dispatch`] to start a brand-new dispatch from the
//!   outermost layer,
//! - clone `next` or [`MiddlewareApi::dispatcher`] and call them later, from
//!   another task or thread.
//!
//! The chain itself is built by `reflux_runtime::apply_middleware`.

use crate::error::StoreError;
use crate::store::{Dispatch, GetState};
use std::fmt;
use std::sync::Arc;

/// What a middleware may see of the store it wraps
///
/// `get_state` reads the underlying store. `dispatch` re-enters the whole
/// middleware chain from the top, exactly like a caller's dispatch would.
pub struct MiddlewareApi<S, A> {
    get_state: GetState<S>,
    dispatch: Dispatch<A>,
}

impl<S, A> MiddlewareApi<S, A> {
    /// Bundle the store's get-state with the chain's forwarding dispatch
    #[must_use]
    pub const fn new(get_state: GetState<S>, dispatch: Dispatch<A>) -> Self {
        Self {
            get_state,
            dispatch,
        }
    }

    /// Snapshot of the store's current state
    #[must_use]
    pub fn get_state(&self) -> S {
        (self.get_state)()
    }

    /// Dispatch a new action through the full middleware chain
    ///
    /// The nested dispatch completes before this call returns.
    ///
    /// # Errors
    ///
    /// Whatever the chain returns for `action`: [`StoreError::ReducerDispatched`]
    /// if this runs inside a reducer, [`StoreError::StoreDropped`] if the store
    /// is gone.
    pub fn dispatch(&self, action: A) -> Result<(), StoreError> {
        (self.dispatch)(action)
    }

    /// Owned forwarding dispatch, for re-dispatching from another task later
    #[must_use]
    pub fn dispatcher(&self) -> Dispatch<A> {
        Arc::clone(&self.dispatch)
    }
}

impl<S, A> Clone for MiddlewareApi<S, A> {
    fn clone(&self) -> Self {
        Self {
            get_state: Arc::clone(&self.get_state),
            dispatch: Arc::clone(&self.dispatch),
        }
    }
}

impl<S, A> fmt::Debug for MiddlewareApi<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareApi").finish_non_exhaustive()
    }
}

/// Middleware trait - intercepts actions before they reach the store
///
/// This is the uncurried form of `(get_state, dispatch) → (next) → (action)`:
/// `api` carries the first pair, `next` the inner layer.
///
/// # Example
///
/// ```
/// use reflux_core::{Dispatch, Middleware, MiddlewareApi, StoreError};
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum Action {
///     Ping,
///     Pong,
/// }
///
/// /// Answers every `Ping` with a `Pong` instead.
/// struct PingPong;
///
/// impl Middleware<u32, Action> for PingPong {
///     fn handle(
///         &self,
///         _api: &MiddlewareApi<u32, Action>,
///         action: Action,
///         next: &Dispatch<Action>,
///     ) -> Result<(), StoreError> {
///         match action {
///             Action::Ping => next(Action::Pong),
///             other => next(other),
///         }
///     }
/// }
/// ```
pub trait Middleware<S, A>: Send + Sync {
    /// Handle one dispatched action
    ///
    /// # Errors
    ///
    /// Propagate the error of `next` or of [`MiddlewareApi::dispatch`];
    /// a middleware that suppresses an action returns `Ok(())`.
    fn handle(&self, api: &MiddlewareApi<S, A>, action: A, next: &Dispatch<A>) -> Result<(), StoreError>;
}

impl<S, A, F> Middleware<S, A> for F
where
    F: Fn(&MiddlewareApi<S, A>, A, &Dispatch<A>) -> Result<(), StoreError> + Send + Sync,
{
    fn handle(&self, api: &MiddlewareApi<S, A>, action: A, next: &Dispatch<A>) -> Result<(), StoreError> {
        self(api, action, next)
    }
}

/// Box a closure as middleware, inferring its argument types
///
/// # Example
///
/// ```
/// use reflux_core::middleware_fn;
///
/// // Drops every negative number on the floor.
/// let non_negative = middleware_fn::<i64, i64, _>(|_api, action, next| {
///     if action < 0 { Ok(()) } else { next(action) }
/// });
/// # let _ = non_negative;
/// ```
pub fn middleware_fn<S, A, F>(handle: F) -> Box<dyn Middleware<S, A>>
where
    S: 'static,
    A: 'static,
    F: Fn(&MiddlewareApi<S, A>, A, &Dispatch<A>) -> Result<(), StoreError> + Send + Sync + 'static,
{
    Box::new(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording_root(log: Arc<Mutex<Vec<i32>>>) -> Dispatch<i32> {
        Arc::new(move |action| {
            log.lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(action);
            Ok(())
        })
    }

    #[test]
    fn test_closure_middleware_can_replace_action() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let next = recording_root(Arc::clone(&log));
        let api: MiddlewareApi<i32, i32> = MiddlewareApi::new(Arc::new(|| 7), Arc::clone(&next));
        let add_state = middleware_fn::<i32, i32, _>(|api, action, next| next(action + api.get_state()));

        assert_eq!(add_state.handle(&api, 1, &next), Ok(()));

        let log = log.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        assert_eq!(*log, vec![8]);
    }

    #[test]
    fn test_api_dispatch_and_dispatcher_share_target() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let root = recording_root(Arc::clone(&log));
        let api: MiddlewareApi<(), i32> = MiddlewareApi::new(Arc::new(|| ()), root);

        assert_eq!(api.dispatch(1), Ok(()));
        assert_eq!(api.clone().dispatcher()(2), Ok(()));

        let log = log.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        assert_eq!(*log, vec![1, 2]);
    }
}
