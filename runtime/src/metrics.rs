//! Store and middleware metrics.
//!
//! Everything here goes through the [`metrics`] facade. Without an installed
//! recorder the calls are no-ops; an application that wants the numbers
//! installs an exporter of its choice and calls [`describe_metrics`] once.
//!
//! Every metric carries a `store` label with the configured store name.

use metrics::{counter, describe_counter};

/// Dispatches that reached a store's reducer
pub const DISPATCH_TOTAL: &str = "reflux_store_dispatch_total";

/// Dispatch or subscribe calls rejected because a reducer was running
pub const REENTRANCY_REJECTED_TOTAL: &str = "reflux_store_reentrancy_rejected_total";

/// Individual listener invocations
pub const LISTENERS_NOTIFIED_TOTAL: &str = "reflux_store_listeners_notified_total";

/// Actions seen by a [`MetricsMiddleware`](crate::middleware::MetricsMiddleware)
pub const MIDDLEWARE_ACTIONS_TOTAL: &str = "reflux_middleware_actions_total";

/// Actions whose inner chain returned an error
pub const MIDDLEWARE_REJECTED_TOTAL: &str = "reflux_middleware_rejected_total";

/// Register descriptions for every metric this crate emits.
pub fn describe_metrics() {
    describe_counter!(DISPATCH_TOTAL, "Total number of actions reduced by the store");
    describe_counter!(
        REENTRANCY_REJECTED_TOTAL,
        "Total number of dispatch or subscribe calls made from inside a reducer"
    );
    describe_counter!(
        LISTENERS_NOTIFIED_TOTAL,
        "Total number of listener invocations after dispatch"
    );
    describe_counter!(
        MIDDLEWARE_ACTIONS_TOTAL,
        "Total number of actions entering a metrics middleware"
    );
    describe_counter!(
        MIDDLEWARE_REJECTED_TOTAL,
        "Total number of actions the inner middleware chain rejected"
    );
}

/// Store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record one completed reducer run.
    pub fn record_dispatch(store: &str) {
        counter!(DISPATCH_TOTAL, "store" => store.to_string()).increment(1);
    }

    /// Record a rejected reentrant call; `operation` is `dispatch` or `subscribe`.
    pub fn record_reentrancy_rejected(store: &str, operation: &'static str) {
        counter!(
            REENTRANCY_REJECTED_TOTAL,
            "store" => store.to_string(),
            "operation" => operation
        )
        .increment(1);
    }

    /// Record a notification pass over `count` listeners.
    pub fn record_listeners_notified(store: &str, count: usize) {
        counter!(LISTENERS_NOTIFIED_TOTAL, "store" => store.to_string()).increment(count as u64);
    }
}

/// Middleware metrics recorder.
pub struct MiddlewareMetrics;

impl MiddlewareMetrics {
    /// Record an action entering the middleware.
    pub fn record_action(store: &str) {
        counter!(MIDDLEWARE_ACTIONS_TOTAL, "store" => store.to_string()).increment(1);
    }

    /// Record an action the inner chain rejected.
    pub fn record_rejected(store: &str) {
        counter!(MIDDLEWARE_REJECTED_TOTAL, "store" => store.to_string()).increment(1);
    }
}
