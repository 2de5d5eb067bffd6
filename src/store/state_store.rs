//! The state store: filter, reduce, swap, notify.

use super::config::{NotifyMode, StoreConfig};
use super::notifier::Notifier;
use super::subscription::{Subscriber, SubscriberId};
use crate::core::{Action, Middleware, Reducer, State};
use crate::error::Result;
use arc_swap::ArcSwap;
use parking_lot::{Mutex, ReentrantMutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace};

/// Result of a single dispatch.
#[derive(Clone, Debug)]
pub enum DispatchOutcome {
    /// Middleware accepted the action; carries the state that was swapped in.
    Applied(State),

    /// Middleware vetoed the action; nothing changed and nobody was notified.
    Rejected,
}

impl DispatchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected)
    }

    /// The new state, if the action was applied.
    pub fn state(&self) -> Option<&State> {
        match self {
            Self::Applied(state) => Some(state),
            Self::Rejected => None,
        }
    }
}

/// Holds the current [`State`] and moves it forward one action at a time.
///
/// A dispatch runs the middleware chain against a snapshot of the current
/// state, then (if accepted) applies the reducer chain, swaps the result in
/// and notifies every subscriber.
///
/// Only the reduce-swap-notify section is serialised. Middleware sees a
/// snapshot read outside that section, so its decision may race with a
/// concurrent dispatch. Reading [`StateStore::state`] never blocks.
///
/// # Example
///
/// ```rust
/// use unistate::core::{Action, Reducer, State};
/// use unistate::store::StateStore;
///
/// let store = StateStore::new();
/// store.add_reducer(Reducer::new(|action: &Action, state: &State| {
///     if action.kind() != "INC" {
///         return state.clone();
///     }
///     let count = state.get_or("count", 0_i32).unwrap_or_default();
///     state.put("count", count + 1)
/// }));
///
/// store.blocking_dispatch(&Action::new("INC").unwrap()).unwrap();
/// store.blocking_dispatch(&Action::new("INC").unwrap()).unwrap();
///
/// assert_eq!(store.state().get_or("count", 0_i32).unwrap(), 2);
/// ```
pub struct StateStore {
    current: ArcSwap<State>,
    // Re-entrant so that a blocking subscriber may dispatch again.
    write_lock: ReentrantMutex<()>,
    root_reducer: ArcSwap<Reducer>,
    root_middleware: ArcSwap<Middleware>,
    reducers: Mutex<Vec<Reducer>>,
    middlewares: Mutex<Vec<Middleware>>,
    subscribers: Mutex<Vec<(SubscriberId, Subscriber)>>,
    non_blocking: AtomicBool,
    worker_name: String,
    notifier: OnceLock<Notifier>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    /// Empty state, no reducers, no middleware, concurrent notification.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_state(initial: State) -> Self {
        Self::from_parts(initial, None, None, StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self::from_parts(State::new(), None, None, config)
    }

    pub(crate) fn from_parts(
        initial: State,
        reducer: Option<Reducer>,
        middleware: Option<Middleware>,
        config: StoreConfig,
    ) -> Self {
        let reducers: Vec<Reducer> = reducer.into_iter().collect();
        let middlewares: Vec<Middleware> = middleware.into_iter().collect();

        Self {
            current: ArcSwap::from_pointee(initial),
            write_lock: ReentrantMutex::new(()),
            root_reducer: ArcSwap::from_pointee(Reducer::combine_all(reducers.iter().cloned())),
            root_middleware: ArcSwap::from_pointee(Middleware::combine_all(
                middlewares.iter().cloned(),
            )),
            reducers: Mutex::new(reducers),
            middlewares: Mutex::new(middlewares),
            subscribers: Mutex::new(Vec::new()),
            non_blocking: AtomicBool::new(config.notify_mode.is_non_blocking()),
            worker_name: config.worker_name,
            notifier: OnceLock::new(),
        }
    }

    /// The process-wide store, created with defaults on first access.
    ///
    /// ```rust
    /// use unistate::store::StateStore;
    ///
    /// assert!(std::ptr::eq(StateStore::global(), StateStore::global()));
    /// ```
    pub fn global() -> &'static StateStore {
        static GLOBAL: OnceLock<StateStore> = OnceLock::new();
        GLOBAL.get_or_init(StateStore::new)
    }

    /// The current snapshot.
    pub fn state(&self) -> State {
        State::clone(&self.current.load_full())
    }

    /// Dispatch using the store's default notification mode.
    pub fn dispatch(&self, action: &Action) -> Result<DispatchOutcome> {
        self.dispatch_with(action, self.is_non_blocking())
    }

    /// Dispatch and notify every subscriber before returning.
    pub fn blocking_dispatch(&self, action: &Action) -> Result<DispatchOutcome> {
        self.dispatch_with(action, false)
    }

    /// Dispatch and hand notifications to the background worker.
    pub fn concurrent_dispatch(&self, action: &Action) -> Result<DispatchOutcome> {
        self.dispatch_with(action, true)
    }

    fn dispatch_with(&self, action: &Action, non_blocking: bool) -> Result<DispatchOutcome> {
        let middleware = self.root_middleware.load_full();
        if !middleware.process(action, &self.state()) {
            debug!(action = %action.kind(), "dispatch rejected by middleware");
            return Ok(DispatchOutcome::Rejected);
        }

        // Start the worker before touching state so a spawn failure leaves
        // the store unchanged.
        let notifier = if non_blocking {
            Some(self.notifier()?)
        } else {
            None
        };
        let reducer = self.root_reducer.load_full();

        let _guard = self.write_lock.lock();
        let next = reducer.reduce(action, &self.state());
        self.current.store(Arc::new(next.clone()));

        let subscribers = self.subscribers.lock().clone();
        debug!(
            action = %action.kind(),
            subscribers = subscribers.len(),
            non_blocking,
            "dispatch applied"
        );
        match notifier {
            Some(notifier) => {
                for (_, subscriber) in subscribers {
                    let state = next.clone();
                    notifier.submit(move || subscriber.notify(&state));
                }
            }
            None => {
                // A subscriber may dispatch again; later ones see the latest
                // state, not this dispatch's result.
                for (_, subscriber) in &subscribers {
                    subscriber.notify(&self.state());
                }
            }
        }

        Ok(DispatchOutcome::Applied(next))
    }

    fn notifier(&self) -> Result<&Notifier> {
        if let Some(notifier) = self.notifier.get() {
            return Ok(notifier);
        }
        // Racing first callers may each spawn a worker; only the one stored
        // here ever receives tasks, the others exit immediately.
        let spawned = Notifier::spawn(&self.worker_name)?;
        Ok(self.notifier.get_or_init(|| spawned))
    }

    /// Register `subscriber`, or return its id if it is already registered.
    pub fn subscribe(&self, subscriber: Subscriber) -> SubscriberId {
        let mut subscribers = self.subscribers.lock();
        if let Some((id, _)) = subscribers.iter().find(|(_, s)| *s == subscriber) {
            trace!(%id, "subscriber already registered");
            return *id;
        }
        let id = SubscriberId::new();
        subscribers.push((id, subscriber));
        trace!(%id, "subscriber registered");
        id
    }

    /// Remove the subscriber registered under `id`, if any.
    pub fn unsubscribe(&self, id: SubscriberId) {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        if subscribers.len() != before {
            trace!(%id, "subscriber removed");
        }
    }

    /// Remove `subscriber`, if it is registered.
    pub fn unsubscribe_subscriber(&self, subscriber: &Subscriber) {
        let found = self
            .subscribers
            .lock()
            .iter()
            .find(|(_, s)| s == subscriber)
            .map(|(id, _)| *id);
        if let Some(id) = found {
            self.unsubscribe(id);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Append `reducer` to the chain. Returns `false` if it was already there.
    pub fn add_reducer(&self, reducer: Reducer) -> bool {
        let mut reducers = self.reducers.lock();
        if reducers.contains(&reducer) {
            return false;
        }
        reducers.push(reducer);
        self.root_reducer
            .store(Arc::new(Reducer::combine_all(reducers.iter().cloned())));
        debug!(reducers = reducers.len(), "reducer added");
        true
    }

    /// Drop `reducer` from the chain. Returns `false` if it was not there.
    pub fn remove_reducer(&self, reducer: &Reducer) -> bool {
        let mut reducers = self.reducers.lock();
        let before = reducers.len();
        reducers.retain(|r| r != reducer);
        self.root_reducer
            .store(Arc::new(Reducer::combine_all(reducers.iter().cloned())));
        debug!(reducers = reducers.len(), "reducer removed");
        reducers.len() != before
    }

    /// Append `middleware` to the chain. Returns `false` if it was already there.
    pub fn add_middleware(&self, middleware: Middleware) -> bool {
        let mut middlewares = self.middlewares.lock();
        if middlewares.contains(&middleware) {
            return false;
        }
        middlewares.push(middleware);
        self.root_middleware
            .store(Arc::new(Middleware::combine_all(middlewares.iter().cloned())));
        debug!(middlewares = middlewares.len(), "middleware added");
        true
    }

    /// Drop `middleware` from the chain. Returns `false` if it was not there.
    pub fn remove_middleware(&self, middleware: &Middleware) -> bool {
        let mut middlewares = self.middlewares.lock();
        let before = middlewares.len();
        middlewares.retain(|m| m != middleware);
        self.root_middleware
            .store(Arc::new(Middleware::combine_all(middlewares.iter().cloned())));
        debug!(middlewares = middlewares.len(), "middleware removed");
        middlewares.len() != before
    }

    /// Whether [`StateStore::dispatch`] notifies on the background worker.
    pub fn is_non_blocking(&self) -> bool {
        self.non_blocking.load(Ordering::Relaxed)
    }

    pub fn set_non_blocking(&self, non_blocking: bool) {
        self.non_blocking.store(non_blocking, Ordering::Relaxed);
    }

    /// The default notification mode as a [`NotifyMode`].
    pub fn notify_mode(&self) -> NotifyMode {
        if self.is_non_blocking() {
            NotifyMode::Concurrent
        } else {
            NotifyMode::Blocking
        }
    }
}
