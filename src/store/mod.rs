//! The stateful shell around the pure core.
//!
//! [`StateStore`] owns the current snapshot, the reducer and middleware
//! chains and the subscribers, and runs the dispatch pipeline under
//! concurrent access. Notifications either run on the dispatching thread or
//! on a single background worker.

mod builder;
mod config;
mod notifier;
mod state_store;
mod subscription;

pub use builder::StateStoreBuilder;
pub use config::{NotifyMode, StoreConfig};
pub use state_store::{DispatchOutcome, StateStore};
pub use subscription::{Subscriber, SubscriberId};
