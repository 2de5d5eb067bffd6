//! Subscriber handles and their identifiers.

use crate::core::State;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Identifier handed out by [`StateStore::subscribe`](super::StateStore::subscribe).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

type NotifyFn = dyn Fn(&State) + Send + Sync;

/// Callback invoked with every new state.
///
/// Clones share identity; subscribing a clone of an already registered
/// subscriber returns the existing id.
#[derive(Clone)]
pub struct Subscriber {
    f: Arc<NotifyFn>,
}

impl Subscriber {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&State) + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    pub fn notify(&self, state: &State) {
        (self.f)(state)
    }
}

impl PartialEq for Subscriber {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.f), Arc::as_ptr(&other.f))
    }
}

impl Eq for Subscriber {}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Subscriber({:p})", Arc::as_ptr(&self.f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn ids_are_unique() {
        assert_ne!(SubscriberId::new(), SubscriberId::new());
    }

    #[test]
    fn id_serializes_as_plain_uuid() {
        let id = SubscriberId::new();
        let json = serde_json::to_string(&id).unwrap();

        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
        assert_eq!(serde_json::from_str::<SubscriberId>(&json).unwrap(), id);
    }

    #[test]
    fn notify_calls_the_callback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let subscriber = Subscriber::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        subscriber.notify(&State::new());
        subscriber.clone().notify(&State::new());

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn equality_is_identity() {
        let a = Subscriber::new(|_| {});
        let b = Subscriber::new(|_| {});

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
