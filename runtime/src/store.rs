//! The concrete store
//!
//! A store owns one state cell, an ordered listener list and a dispatch
//! phase. A dispatch runs the reducer on a private copy of the state,
//! publishes the result, and then notifies every listener in subscription
//! order before returning.
//!
//! # Reentrancy
//!
//! The phase is `Idle` or `Reducing(thread)`. A dispatch or subscribe issued
//! by the thread that is currently inside the reducer is a misuse and is
//! handled according to the store's [`ReentrancyPolicy`]. Listeners run after
//! the phase is back to `Idle`, so a listener may dispatch, subscribe or
//! unsubscribe freely.
//!
//! # Threads
//!
//! A dispatch holds the store's turn from reduction until its last listener
//! returns, so notification passes reach listeners in the order the states
//! were produced. The turn is reentrant for the thread holding it, which lets
//! a listener dispatch again. Other threads wait for the turn.
//!
//! Misuse is only detected on the thread running the reducer. A reducer or
//! listener that hands a dispatch to another thread and then joins it waits
//! on its own turn forever.

use crate::config::{ReentrancyPolicy, StoreConfig};
use crate::metrics::StoreMetrics;
use reflux_core::{Listener, Reducer, SharedReducer, Store, StoreCreator, StoreError, Subscription};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, ThreadId};

/// Create a store with the default configuration
///
/// # Example
///
/// ```
/// use reflux_core::reducer_fn;
/// use reflux_runtime::create_store;
///
/// let store = create_store(reducer_fn(|count: &mut u32, step: u32| *count += step), 0);
/// let _subscription = store.subscribe_fn(|count| println!("count = {count}"))?;
///
/// store.dispatch(2)?;
/// store.dispatch(3)?;
/// assert_eq!(store.get_state(), 5);
/// # Ok::<(), reflux_core::StoreError>(())
/// ```
#[must_use]
pub fn create_store<S, A, R>(reducer: R, initial_state: S) -> Store<S, A>
where
    S: Clone + Send + 'static,
    A: 'static,
    R: Reducer<State = S, Action = A> + Send + Sync + 'static,
{
    store_creator().create(reducer, initial_state)
}

/// The base store constructor, ready to be enhanced
#[must_use]
pub fn store_creator<S, A>() -> StoreCreator<S, A>
where
    S: Clone + Send + 'static,
    A: 'static,
{
    store_creator_with_config(StoreConfig::default())
}

/// A base store constructor whose stores use `config`
#[must_use]
pub fn store_creator_with_config<S, A>(config: StoreConfig) -> StoreCreator<S, A>
where
    S: Clone + Send + 'static,
    A: 'static,
{
    StoreCreator::new(move |reducer, initial_state| StoreCore::spawn(&config, reducer, initial_state))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DispatchPhase {
    Idle,
    Reducing(ThreadId),
}

/// Resets the phase to `Idle` on drop, including when the reducer panics.
struct ReducingGuard<'a> {
    phase: &'a Mutex<DispatchPhase>,
}

impl<'a> ReducingGuard<'a> {
    fn enter(phase: &'a Mutex<DispatchPhase>) -> Self {
        *lock(phase) = DispatchPhase::Reducing(thread::current().id());
        Self { phase }
    }
}

impl Drop for ReducingGuard<'_> {
    fn drop(&mut self) {
        *lock(self.phase) = DispatchPhase::Idle;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Exclusive right to reduce and notify, reentrant for its holder
#[derive(Default)]
struct DispatchTurn {
    /// Holding thread and how many nested dispatches it is inside
    holder: Mutex<Option<(ThreadId, usize)>>,
    released: Condvar,
}

impl DispatchTurn {
    fn take(&self) -> TurnGuard<'_> {
        let me = thread::current().id();
        let mut holder = lock(&self.holder);
        loop {
            match *holder {
                None => {
                    *holder = Some((me, 1));
                    break;
                },
                Some((owner, depth)) if owner == me => {
                    *holder = Some((owner, depth + 1));
                    break;
                },
                Some(_) => {
                    holder = self.released.wait(holder).unwrap_or_else(PoisonError::into_inner);
                },
            }
        }
        TurnGuard { turn: self }
    }
}

/// Gives the turn back on drop, including when a reducer or listener panics.
struct TurnGuard<'a> {
    turn: &'a DispatchTurn,
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        let mut holder = lock(&self.turn.holder);
        *holder = match *holder {
            Some((owner, depth)) if depth > 1 => Some((owner, depth - 1)),
            _ => None,
        };
        if holder.is_none() {
            self.turn.released.notify_one();
        }
    }
}

struct StoreCore<S, A> {
    name: String,
    policy: ReentrancyPolicy,
    reducer: SharedReducer<S, A>,
    state: Mutex<S>,
    phase: Mutex<DispatchPhase>,
    /// Held from reduction until the last listener returns
    turn: DispatchTurn,
    /// Registrations in subscription order, keyed by subscription id
    listeners: Mutex<Vec<(u64, Listener<S>)>>,
    next_subscription: AtomicU64,
}

impl<S, A> StoreCore<S, A>
where
    S: Clone + Send + 'static,
    A: 'static,
{
    fn spawn(config: &StoreConfig, reducer: SharedReducer<S, A>, initial_state: S) -> Store<S, A> {
        let core = Arc::new(Self {
            name: config.name.clone(),
            policy: config.reentrancy_policy,
            reducer,
            state: Mutex::new(initial_state),
            phase: Mutex::new(DispatchPhase::Idle),
            turn: DispatchTurn::default(),
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
        });

        tracing::debug!(store = %core.name, policy = ?core.policy, "Store created");

        let dispatch_core = Arc::clone(&core);
        let subscribe_core = Arc::clone(&core);
        Store::from_parts(
            Arc::new(move |action: A| dispatch_core.dispatch(action)),
            Arc::new(move |listener: Listener<S>| Self::subscribe(&subscribe_core, listener)),
            Arc::new(move || core.get_state()),
        )
    }

    fn reducing_on_this_thread(&self) -> bool {
        *lock(&self.phase) == DispatchPhase::Reducing(thread::current().id())
    }

    /// Apply the reentrancy policy to a rejected call
    #[allow(clippy::panic)] // Fatal reentrancy is opt-in via ReentrancyPolicy::Panic
    fn reject(&self, operation: &'static str, error: StoreError) -> StoreError {
        tracing::warn!(store = %self.name, operation, "{error}");
        StoreMetrics::record_reentrancy_rejected(&self.name, operation);

        match self.policy {
            ReentrancyPolicy::Error => error,
            ReentrancyPolicy::Panic => panic!("{error}"),
        }
    }

    fn dispatch(&self, action: A) -> Result<(), StoreError> {
        if self.reducing_on_this_thread() {
            return Err(self.reject("dispatch", StoreError::ReducerDispatched));
        }

        let _turn = self.turn.take();
        let next_state = {
            let _reducing = ReducingGuard::enter(&self.phase);

            let mut next_state = lock(&self.state).clone();
            self.reducer.reduce(&mut next_state, action);
            lock(&self.state).clone_from(&next_state);
            next_state
        };

        StoreMetrics::record_dispatch(&self.name);

        // Listeners subscribed or removed during this pass take effect next time
        let listeners: Vec<Listener<S>> = lock(&self.listeners)
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        tracing::trace!(store = %self.name, listeners = listeners.len(), "Action reduced, notifying listeners");

        for listener in &listeners {
            listener.notify(&next_state);
        }
        StoreMetrics::record_listeners_notified(&self.name, listeners.len());

        Ok(())
    }

    fn subscribe(core: &Arc<Self>, listener: Listener<S>) -> Result<Subscription, StoreError> {
        if core.reducing_on_this_thread() {
            return Err(core.reject("subscribe", StoreError::SubscribeWhileReducing));
        }

        // A listener may be registered more than once; each registration
        // gets its own id so unsubscribing one leaves the others in place.
        let id = core.next_subscription.fetch_add(1, Ordering::Relaxed);
        let total = {
            let mut listeners = lock(&core.listeners);
            listeners.push((id, listener));
            listeners.len()
        };
        tracing::debug!(store = %core.name, subscription = id, listeners = total, "Listener subscribed");

        let weak: Weak<Self> = Arc::downgrade(core);
        Ok(Subscription::new(move || {
            if let Some(core) = weak.upgrade() {
                core.unsubscribe(id);
            }
        }))
    }

    fn unsubscribe(&self, id: u64) {
        let mut listeners = lock(&self.listeners);
        if let Some(index) = listeners.iter().position(|(entry, _)| *entry == id) {
            listeners.remove(index);
            tracing::debug!(store = %self.name, subscription = id, listeners = listeners.len(), "Listener unsubscribed");
        }
    }

    fn get_state(&self) -> S {
        lock(&self.state).clone()
    }
}
