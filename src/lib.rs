//! Unistate: a minimal unidirectional state store
//!
//! State lives in an immutable, structure-sharing snapshot. The only way to
//! move it forward is to dispatch an [`Action`]: middleware may veto it,
//! reducers turn it into the next snapshot, and subscribers hear about the
//! result.
//!
//! # Core Concepts
//!
//! - **State**: Persistent key-value snapshot linked to its predecessor
//! - **Reducers**: Pure functions producing the next state
//! - **Middleware**: Pure predicates that may cancel a dispatch
//! - **Store**: Serialises updates and notifies subscribers
//!
//! # Example
//!
//! ```rust
//! use unistate::{Action, Middleware, Reducer, State, StateStore, Subscriber};
//! use std::sync::atomic::{AtomicI32, Ordering};
//! use std::sync::Arc;
//!
//! let store = StateStore::new();
//!
//! store.add_reducer(Reducer::new(|action: &Action, state: &State| {
//!     if action.kind() != "INC" {
//!         return state.clone();
//!     }
//!     let current = state.get_or("V", 0_i32).unwrap_or_default();
//!     let delta = action.payload_or(1_i32).unwrap_or(1);
//!     state.put("V", current + delta)
//! }));
//! store.add_middleware(Middleware::new(|action: &Action, _: &State| {
//!     action.payload_or(1_i32).is_ok_and(|delta| delta >= 1)
//! }));
//!
//! let seen = Arc::new(AtomicI32::new(0));
//! let sink = Arc::clone(&seen);
//! store.subscribe(Subscriber::new(move |state: &State| {
//!     sink.store(state.get_or("V", 0_i32).unwrap_or_default(), Ordering::SeqCst);
//! }));
//!
//! for _ in 0..3 {
//!     store.blocking_dispatch(&Action::new("INC").unwrap()).unwrap();
//! }
//! let outcome = store
//!     .blocking_dispatch(&Action::with_payload("INC", -5_i32).unwrap())
//!     .unwrap();
//!
//! assert!(outcome.is_rejected());
//! assert_eq!(store.state().get_or("V", 0_i32).unwrap(), 3);
//! assert_eq!(seen.load(Ordering::SeqCst), 3);
//! ```

pub mod core;
pub mod error;
pub mod store;

// Re-export commonly used types
pub use crate::core::{Action, Middleware, Reducer, State, Value};
pub use error::{Result, StoreError};
pub use store::{
    DispatchOutcome, NotifyMode, StateStore, StateStoreBuilder, StoreConfig, Subscriber,
    SubscriberId,
};
