//! Counter Store
//!
//! This example wires a reducer, a middleware and two subscribers into a
//! store and dispatches a handful of actions.
//!
//! Key concepts:
//! - Reducers produce the next state from the current one
//! - Middleware cancels actions it does not like
//! - Blocking vs concurrent notification
//! - Walking back through earlier snapshots
//!
//! Run with: RUST_LOG=debug cargo run --example counter

use crossbeam_channel::unbounded;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use unistate::{
    Action, Middleware, NotifyMode, Reducer, State, StateStoreBuilder, Subscriber,
};

const INCREMENT: &str = "INCREMENT";
const DECREMENT: &str = "DECREMENT";
const COUNTER: &str = "COUNTER";

fn main() -> unistate::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Counter Store Example ===\n");

    let store = StateStoreBuilder::new()
        .reducer(Reducer::new(|action, state| {
            let count = state.get_or(COUNTER, 0_i32).unwrap_or_default();
            let delta = action.payload_or(1_i32).unwrap_or(1);
            match action.kind() {
                INCREMENT => state.put(COUNTER, count + delta),
                DECREMENT => state.put(COUNTER, count - delta),
                _ => state.clone(),
            }
        }))
        .middleware(Middleware::new(|action, _| {
            let delta = action.payload_or(1_i32).unwrap_or(0);
            if delta < 1 {
                println!("Rejected {action}: delta should be at least 1");
                return false;
            }
            true
        }))
        .notify_mode(NotifyMode::Blocking)
        .build();

    store.subscribe(Subscriber::new(|state: &State| {
        println!("Counter: {}", state.get_or(COUNTER, 0_i32).unwrap_or_default());
    }));

    store.dispatch(&Action::new(INCREMENT)?)?;
    store.dispatch(&Action::with_payload(INCREMENT, 5_i32)?)?;
    store.dispatch(&Action::with_payload(DECREMENT, 2_i32)?)?;
    store.dispatch(&Action::with_payload(INCREMENT, -3_i32)?)?;

    println!("\nHistory (newest first):");
    for snapshot in store.state().history() {
        println!("  {snapshot}");
    }

    println!("\nConcurrent notification:");
    let (tx, rx) = unbounded();
    let id = store.subscribe(Subscriber::new(move |state: &State| {
        let worker = std::thread::current().name().map(str::to_string);
        let _ = tx.send((worker, state.get_or(COUNTER, 0_i32).unwrap_or_default()));
    }));
    store.concurrent_dispatch(&Action::new(INCREMENT)?)?;
    if let Ok((worker, count)) = rx.recv_timeout(Duration::from_secs(1)) {
        println!("  worker {worker:?} saw counter {count}");
    }
    store.unsubscribe(id);

    println!("\n=== Example Complete ===");
    Ok(())
}
