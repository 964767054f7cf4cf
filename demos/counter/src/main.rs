//! Counter example binary
//!
//! Demonstrates Reflux with a counter: a store built from middleware and
//! enhancers, a listener, and an increment dispatched later from a tokio task.

use counter::{CounterAction, CounterState, build_store};
use reflux_runtime::StoreConfig;
use std::time::Duration;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "counter=debug,reflux_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Counter Example: Reflux ===\n");

    let store = build_store(StoreConfig::default().with_name("counter"));

    let (latest, mut updates) = watch::channel(store.get_state());
    let subscription = store.subscribe_fn(move |state: &CounterState| {
        println!("  listener: count = {}, revision = {}", state.count, state.revision);
        latest.send_replace(state.clone());
    })?;

    println!("Initial count: {}", store.get_state().count);

    for action in [
        CounterAction::Increment,
        CounterAction::Increment,
        CounterAction::Increment,
        CounterAction::Decrement,
    ] {
        println!("\n>>> Dispatching: {action:?}");
        store.dispatch(action)?;
    }

    println!("\n>>> Dispatching: IncrementLater {{ delay_ms: 200 }}");
    store.dispatch(CounterAction::IncrementLater { delay_ms: 200 })?;
    let expected = store.get_state().count + 1;
    println!("Count right after scheduling: {}", store.get_state().count);

    tokio::time::timeout(Duration::from_secs(2), updates.wait_for(|state| state.count == expected)).await??;
    println!("Count after delayed increment: {}", store.get_state().count);

    println!("\n>>> Dispatching: Reset");
    store.dispatch(CounterAction::Reset)?;

    subscription.unsubscribe();
    store.dispatch(CounterAction::Increment)?;
    println!("\nAfter unsubscribe (no listener output): {}", store.get_state().count);

    println!("\n=== Demonstration Complete ===");
    println!("\nKey concepts demonstrated:");
    println!("  • Reducer: the only place state changes");
    println!("  • Listener: notified after every dispatch, until unsubscribed");
    println!("  • Middleware: metrics, logging and a deferred re-dispatch");
    println!("  • Enhancers: the middleware chain composed with a tracing enhancer");

    Ok(())
}
