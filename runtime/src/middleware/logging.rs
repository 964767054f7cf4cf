use reflux_core::{Dispatch, Middleware, MiddlewareApi, StoreError};
use std::fmt::Debug;
use tracing::Level;

/// Logs every action with the state before and after it
///
/// Emits one event when the action arrives and one once the inner chain has
/// returned, both at the configured level. Errors from the inner chain are
/// logged at `WARN` and passed through unchanged.
#[derive(Debug, Clone, Copy)]
pub struct LoggingMiddleware {
    level: Level,
}

impl LoggingMiddleware {
    /// Log at `level`
    #[must_use]
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    /// The level this middleware logs at
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new(Level::DEBUG)
    }
}

// `tracing` needs the level at compile time.
macro_rules! event_at {
    ($level:expr, $($rest:tt)+) => {{
        let level = $level;
        if level == Level::ERROR {
            tracing::error!($($rest)+);
        } else if level == Level::WARN {
            tracing::warn!($($rest)+);
        } else if level == Level::INFO {
            tracing::info!($($rest)+);
        } else if level == Level::DEBUG {
            tracing::debug!($($rest)+);
        } else {
            tracing::trace!($($rest)+);
        }
    }};
}

impl<S, A> Middleware<S, A> for LoggingMiddleware
where
    S: Debug,
    A: Debug,
{
    fn handle(&self, api: &MiddlewareApi<S, A>, action: A, next: &Dispatch<A>) -> Result<(), StoreError> {
        event_at!(self.level, action = ?action, state = ?api.get_state(), "Dispatching action");

        let result = next(action);

        match &result {
            Ok(()) => {
                event_at!(self.level, state = ?api.get_state(), "Action dispatched");
            },
            Err(error) => tracing::warn!(%error, "Action rejected"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;
    use crate::apply_middleware;
    use crate::store::store_creator;
    use reflux_core::reducer_fn;

    #[test]
    fn test_logging_middleware_passes_actions_through() {
        let _ = tracing_subscriber::fmt().with_test_writer().with_max_level(Level::TRACE).try_init();

        for level in [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE] {
            let logging: Box<dyn Middleware<Vec<String>, String>> = Box::new(LoggingMiddleware::new(level));
            let store = apply_middleware(vec![logging])
                .apply(store_creator())
                .create(reducer_fn(|log: &mut Vec<String>, entry: String| log.push(entry)), Vec::new());

            store.dispatch("hello".to_string()).unwrap();

            assert_eq!(store.get_state(), vec!["hello".to_string()]);
        }
    }

    #[test]
    fn test_default_level_is_debug() {
        assert_eq!(LoggingMiddleware::default().level(), Level::DEBUG);
    }
}
