//! Recorders for observing a store from tests
//!
//! Every recorder is an explicit context object: create it in the test, hand
//! clones to the middleware, listener or enhancer that writes to it, and read
//! it back afterwards. Nothing here is process-wide, so tests can run in
//! parallel.

use reflux_core::{Dispatch, Enhancer, Listener, Middleware, MiddlewareApi, StoreCreator, StoreError};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A shared, ordered record of values
///
/// Clones write to the same record.
///
/// # Example
///
/// ```
/// use reflux_testing::ActionLog;
///
/// let log = ActionLog::new();
/// let writer = log.clone();
///
/// writer.record("first");
/// writer.record("second");
///
/// assert_eq!(log.entries(), vec!["first", "second"]);
/// ```
pub struct ActionLog<T> {
    entries: Arc<Mutex<Vec<T>>>,
}

impl<T> ActionLog<T> {
    /// An empty log
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an entry
    pub fn record(&self, entry: T) {
        self.lock().push(entry);
    }

    /// Forget every entry
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<T: Clone> ActionLog<T> {
    /// Snapshot of every entry in recording order
    #[must_use]
    pub fn entries(&self) -> Vec<T> {
        self.lock().clone()
    }

    /// The most recent entry
    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.lock().last().cloned()
    }
}

impl<T> Clone for ActionLog<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T> Default for ActionLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ActionLog<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActionLog").field(&*self.lock()).finish()
    }
}

type ActionFilter<A> = Box<dyn Fn(&A) -> bool + Send + Sync>;

/// Middleware that records actions passing through it, then calls `next`
pub struct RecordingMiddleware<A> {
    log: ActionLog<A>,
    filter: Option<ActionFilter<A>>,
}

impl<A> RecordingMiddleware<A> {
    /// Record every action into `log`
    #[must_use]
    pub const fn new(log: ActionLog<A>) -> Self {
        Self { log, filter: None }
    }

    /// Record only the actions for which `filter` returns `true`
    ///
    /// Every action is still passed on to `next`.
    #[must_use]
    pub fn matching<F>(log: ActionLog<A>, filter: F) -> Self
    where
        F: Fn(&A) -> bool + Send + Sync + 'static,
    {
        Self {
            log,
            filter: Some(Box::new(filter)),
        }
    }
}

impl<A> fmt::Debug for RecordingMiddleware<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingMiddleware")
            .field("filtered", &self.filter.is_some())
            .finish_non_exhaustive()
    }
}

impl<S, A> Middleware<S, A> for RecordingMiddleware<A>
where
    A: Clone + Send,
{
    fn handle(&self, _api: &MiddlewareApi<S, A>, action: A, next: &Dispatch<A>) -> Result<(), StoreError> {
        if self.filter.as_ref().is_none_or(|filter| filter(&action)) {
            self.log.record(action.clone());
        }
        next(action)
    }
}

/// Listener that records every state it is notified with
///
/// # Example
///
/// ```
/// use reflux_testing::StateRecorder;
///
/// let recorder = StateRecorder::new();
/// let listener = recorder.listener();
///
/// listener.notify(&1);
/// listener.notify(&2);
///
/// assert_eq!(recorder.states(), vec![1, 2]);
/// ```
#[derive(Debug)]
pub struct StateRecorder<S> {
    log: ActionLog<S>,
}

impl<S> StateRecorder<S>
where
    S: Clone + Send + 'static,
{
    /// A recorder with nothing recorded yet
    #[must_use]
    pub fn new() -> Self {
        Self { log: ActionLog::new() }
    }

    /// A fresh listener writing into this recorder
    ///
    /// Each call returns a listener with its own identity.
    #[must_use]
    pub fn listener(&self) -> Listener<S> {
        let log = self.log.clone();
        Listener::new(move |state: &S| log.record(state.clone()))
    }

    /// States received so far, oldest first
    #[must_use]
    pub fn states(&self) -> Vec<S> {
        self.log.entries()
    }

    /// Number of notifications received
    #[must_use]
    pub fn count(&self) -> usize {
        self.log.len()
    }
}

impl<S> Clone for StateRecorder<S> {
    fn clone(&self) -> Self {
        Self { log: self.log.clone() }
    }
}

impl<S> Default for StateRecorder<S>
where
    S: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Enhancer that writes `tag` into `log` after every dispatch it forwards
///
/// The tag is recorded only once the inner dispatch has returned
/// successfully, so stacked logging enhancers record innermost first.
///
/// # Example
///
/// ```
/// use reflux_core::{Store, StoreCreator, Subscription, reducer_fn};
/// use reflux_testing::{ActionLog, logging_enhancer};
/// use std::sync::Arc;
///
/// let log = ActionLog::new();
/// let base: StoreCreator<(), ()> = StoreCreator::new(|_reducer, _state| {
///     Store::from_parts(
///         Arc::new(|_action: ()| Ok(())),
///         Arc::new(|_listener| Ok(Subscription::noop())),
///         Arc::new(|| ()),
///     )
/// });
///
/// let enhancer = logging_enhancer("inner", &log) >> logging_enhancer("outer", &log);
/// let store = enhancer.apply(base).create(reducer_fn(|_: &mut (), _: ()| {}), ());
/// store.dispatch(())?;
///
/// assert_eq!(log.entries(), vec!["inner", "outer"]);
/// # Ok::<(), reflux_core::StoreError>(())
/// ```
#[must_use]
pub fn logging_enhancer<S, A>(tag: &'static str, log: &ActionLog<&'static str>) -> Enhancer<S, A>
where
    S: 'static,
    A: 'static,
{
    let log = log.clone();
    Enhancer::new(move |create: StoreCreator<S, A>| {
        let log = log.clone();
        StoreCreator::new(move |reducer, initial_state| {
            let store = create.create_shared(reducer, initial_state);
            let inner = store.dispatcher();
            let log = log.clone();
            store.with_dispatch(Arc::new(move |action: A| {
                inner(action)?;
                log.record(tag);
                Ok(())
            }))
        })
    })
}
