//! Listener handles and subscriptions
//!
//! Callbacks are not comparable, so a store cannot find "the same" listener
//! by value. A [`Listener`] therefore carries identity: the allocation behind
//! it. Clones share that identity; two listeners built from textually
//! identical closures do not.

use std::fmt;
use std::sync::Arc;

type Callback<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// A state observer registered with a store
///
/// # Example
///
/// ```
/// use reflux_core::Listener;
///
/// let first = Listener::new(|count: &i32| println!("count is {count}"));
/// let second = Listener::new(|count: &i32| println!("count is {count}"));
///
/// assert!(first.same_as(&first.clone()));
/// assert!(!first.same_as(&second));
/// ```
pub struct Listener<S> {
    callback: Callback<S>,
}

impl<S> Listener<S> {
    /// Wrap `callback` in a new listener with its own identity
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Deliver a new state to the callback
    pub fn notify(&self, state: &S) {
        (self.callback)(state);
    }

    /// Whether `other` is this listener (or a clone of it)
    ///
    /// An inspection helper. Stores do not use it: unsubscribing goes through
    /// the [`Subscription`] of one registration, so a listener registered twice
    /// is removed one registration at a time.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.callback), Arc::as_ptr(&other.callback))
    }
}

impl<S> Clone for Listener<S> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<S> fmt::Debug for Listener<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &Arc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

/// Handle returned by `subscribe`
///
/// Calling [`unsubscribe`](Self::unsubscribe) removes exactly the registration
/// it was created for. It is safe to call more than once. Dropping the handle
/// does not unsubscribe; a listener stays registered until asked to leave.
#[derive(Clone)]
pub struct Subscription {
    cancel: Arc<dyn Fn() + Send + Sync>,
}

impl Subscription {
    /// Build a subscription from its cancellation routine
    ///
    /// `cancel` may run several times and must tolerate that.
    pub fn new<F>(cancel: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            cancel: Arc::new(cancel),
        }
    }

    /// A subscription with nothing to cancel
    #[must_use]
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    /// Remove the listener from the store
    pub fn unsubscribe(&self) {
        (self.cancel)();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
