//! Middleware chain builder and built-in middleware
//!
//! [`apply_middleware`] turns an ordered list of middleware into a store
//! [`Enhancer`]. The first middleware in the list is the outermost layer: it
//! sees every action first and its call to `next` reaches the second one, and
//! so on down to the wrapped store's own dispatch.
//!
//! ```text
//! apply_middleware([m1, m2])
//!
//!   caller ─► m1 ─► m2 ─► store dispatch
//!              ▲     │
//!              └─────┘  api.dispatch(..) restarts at m1
//! ```

mod logging;
mod metrics;

pub use logging::LoggingMiddleware;
pub use metrics::MetricsMiddleware;

use reflux_core::{
    Dispatch, DispatchFn, Enhancer, Middleware, MiddlewareApi, Store, StoreCreator, StoreError,
};
use std::sync::{Arc, OnceLock, Weak};

/// Build an enhancer that runs every action through `middlewares`
///
/// The chain is built once per created store by folding the list in reverse
/// around the store's dispatch. Each middleware gets a [`MiddlewareApi`]
/// whose `dispatch` forwards to the finished chain, so a re-dispatch always
/// starts again at the outermost middleware.
///
/// The forwarding dispatch holds the chain weakly. Once every handle to the
/// enhanced store is gone, a deferred re-dispatch returns
/// [`StoreError::StoreDropped`] instead of keeping the store alive.
///
/// # Example
///
/// ```
/// use reflux_core::{middleware_fn, reducer_fn};
/// use reflux_runtime::{apply_middleware, store_creator};
///
/// let ignore_zero = middleware_fn::<i32, i32, _>(|_api, action, next| {
///     if action == 0 { Ok(()) } else { next(action) }
/// });
///
/// let create = apply_middleware(vec![ignore_zero]).apply(store_creator());
/// let store = create.create(reducer_fn(|total: &mut i32, n: i32| *total += n), 0);
///
/// store.dispatch_all([3, 0, 4])?;
/// assert_eq!(store.get_state(), 7);
/// # Ok::<(), reflux_core::StoreError>(())
/// ```
#[must_use]
pub fn apply_middleware<S, A>(middlewares: Vec<Box<dyn Middleware<S, A>>>) -> Enhancer<S, A>
where
    S: 'static,
    A: 'static,
{
    let middlewares: Arc<[Arc<dyn Middleware<S, A>>]> =
        middlewares.into_iter().map(Arc::from).collect();

    Enhancer::new(move |create: StoreCreator<S, A>| {
        let middlewares = Arc::clone(&middlewares);
        StoreCreator::new(move |reducer, initial_state| {
            let store = create.create_shared(reducer, initial_state);
            chain_store(&middlewares, store)
        })
    })
}

fn chain_store<S, A>(middlewares: &[Arc<dyn Middleware<S, A>>], store: Store<S, A>) -> Store<S, A>
where
    S: 'static,
    A: 'static,
{
    let (root, subscribe, get_state) = store.into_parts();

    // Bound once the chain exists; until then nothing can call it
    let patched: Arc<OnceLock<Weak<DispatchFn<A>>>> = Arc::new(OnceLock::new());
    let forwarding: Dispatch<A> = {
        let patched = Arc::clone(&patched);
        Arc::new(move |action: A| {
            let chain = patched
                .get()
                .and_then(Weak::upgrade)
                .ok_or(StoreError::StoreDropped)?;
            chain(action)
        })
    };
    let api = MiddlewareApi::new(Arc::clone(&get_state), forwarding);

    let chain = middlewares.iter().rev().fold(root, |next, middleware| {
        let middleware = Arc::clone(middleware);
        let api = api.clone();
        let handler: Dispatch<A> = Arc::new(move |action: A| middleware.handle(&api, action, &next));
        handler
    });

    let _ = patched.set(Arc::downgrade(&chain));
    tracing::debug!(middlewares = middlewares.len(), "Middleware chain built");

    Store::from_parts(chain, subscribe, get_state)
}
