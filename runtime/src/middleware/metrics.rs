use crate::metrics::MiddlewareMetrics;
use reflux_core::{Dispatch, Middleware, MiddlewareApi, StoreError};

/// Counts actions entering the chain at this point and those rejected below it
///
/// Counters are labelled with `store`, see [`crate::metrics`].
#[derive(Debug, Clone)]
pub struct MetricsMiddleware {
    store: String,
}

impl MetricsMiddleware {
    /// Count under the given store label
    #[must_use]
    pub fn new(store: impl Into<String>) -> Self {
        Self { store: store.into() }
    }
}

impl<S, A> Middleware<S, A> for MetricsMiddleware {
    fn handle(&self, _api: &MiddlewareApi<S, A>, action: A, next: &Dispatch<A>) -> Result<(), StoreError> {
        MiddlewareMetrics::record_action(&self.store);

        next(action).inspect_err(|_| MiddlewareMetrics::record_rejected(&self.store))
    }
}
