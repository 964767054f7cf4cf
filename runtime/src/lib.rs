//! # Reflux Runtime
//!
//! The concrete store and middleware chain for Reflux.
//!
//! ## Core Components
//!
//! - **Store**: [`create_store`] and the base constructor [`store_creator`],
//!   holding state, listeners and the reentrancy guard
//! - **Middleware chain**: [`apply_middleware`], an enhancer that wraps a
//!   store's dispatch in an ordered list of [`Middleware`](reflux_core::Middleware)
//! - **Built-in middleware**: [`LoggingMiddleware`] and [`MetricsMiddleware`]
//! - **Configuration**: [`StoreConfig`] and [`ReentrancyPolicy`]
//!
//! ## Example
//!
//! ```
//! use reflux_core::{Enhancer, Middleware, reducer_fn};
//! use reflux_runtime::{LoggingMiddleware, MetricsMiddleware, apply_middleware, store_creator};
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct Todos {
//!     items: Vec<String>,
//! }
//!
//! #[derive(Debug)]
//! enum TodoAction {
//!     Add(String),
//!     Clear,
//! }
//!
//! let middlewares: Vec<Box<dyn Middleware<Todos, TodoAction>>> = vec![
//!     Box::new(MetricsMiddleware::new("todos")),
//!     Box::new(LoggingMiddleware::default()),
//! ];
//! let enhancer = Enhancer::identity() >> apply_middleware(middlewares);
//!
//! let store = enhancer.apply(store_creator()).create(
//!     reducer_fn(|todos: &mut Todos, action: TodoAction| match action {
//!         TodoAction::Add(item) => todos.items.push(item),
//!         TodoAction::Clear => todos.items.clear(),
//!     }),
//!     Todos::default(),
//! );
//!
//! store.dispatch(TodoAction::Add("write docs".into()))?;
//! assert_eq!(store.get_state().items, vec!["write docs".to_string()]);
//!
//! store.dispatch(TodoAction::Clear)?;
//! assert!(store.get_state().items.is_empty());
//! # Ok::<(), reflux_core::StoreError>(())
//! ```

/// Store configuration
pub mod config;

/// Middleware chain builder and built-in middleware
pub mod middleware;

/// Store and middleware metrics
pub mod metrics;

/// The concrete store
pub mod store;

pub use config::{ReentrancyPolicy, StoreConfig};
pub use middleware::{LoggingMiddleware, MetricsMiddleware, apply_middleware};
pub use reflux_core::StoreError;
pub use store::{create_store, store_creator, store_creator_with_config};
