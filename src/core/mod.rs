//! Pure building blocks of the store.
//!
//! - `Value` for type-erased payloads and entries
//! - `Action` describing a requested change
//! - `PersistentMap` and `State` for immutable, structure-sharing snapshots
//! - `Reducer` and `Middleware` for composable pure functions
//!
//! Nothing in this module locks, spawns or logs.

mod action;
mod map;
mod middleware;
mod reducer;
mod state;
mod value;

pub use action::Action;
pub use map::{Iter, PersistentMap};
pub use middleware::Middleware;
pub use reducer::Reducer;
pub use state::State;
pub use value::Value;
