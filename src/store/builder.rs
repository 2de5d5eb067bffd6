//! Fluent construction of a [`StateStore`].

use super::config::{NotifyMode, StoreConfig};
use super::state_store::StateStore;
use crate::core::{Middleware, Reducer, State};

/// Builder for a [`StateStore`] with an initial state, a root reducer and a
/// root middleware.
///
/// The root reducer and middleware become the first entries of their chains
/// and can later be removed like any other.
///
/// ```rust
/// use unistate::core::{Action, Middleware, Reducer, State};
/// use unistate::store::{NotifyMode, StateStoreBuilder};
///
/// let store = StateStoreBuilder::new()
///     .initial_state(State::new().put("count", 10_i32))
///     .reducer(Reducer::new(|_, s: &State| {
///         let n = s.get_or("count", 0_i32).unwrap_or_default();
///         s.put("count", n + 1)
///     }))
///     .middleware(Middleware::new(|a: &Action, _: &State| a.kind() == "INC"))
///     .notify_mode(NotifyMode::Blocking)
///     .build();
///
/// store.dispatch(&Action::new("INC").unwrap()).unwrap();
/// store.dispatch(&Action::new("NOPE").unwrap()).unwrap();
///
/// assert_eq!(store.state().get_or("count", 0_i32).unwrap(), 11);
/// ```
#[derive(Default)]
pub struct StateStoreBuilder {
    initial: Option<State>,
    reducer: Option<Reducer>,
    middleware: Option<Middleware>,
    config: StoreConfig,
}

impl StateStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starting state. Defaults to an empty state.
    pub fn initial_state(mut self, state: State) -> Self {
        self.initial = Some(state);
        self
    }

    /// Root reducer. Defaults to none, which behaves as [`Reducer::noop`].
    pub fn reducer(mut self, reducer: Reducer) -> Self {
        self.reducer = Some(reducer);
        self
    }

    /// Root middleware. Defaults to none, which accepts everything.
    pub fn middleware(mut self, middleware: Middleware) -> Self {
        self.middleware = Some(middleware);
        self
    }

    pub fn notify_mode(mut self, mode: NotifyMode) -> Self {
        self.config.notify_mode = mode;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> StateStore {
        StateStore::from_parts(
            self.initial.unwrap_or_default(),
            self.reducer,
            self.middleware,
            self.config,
        )
    }
}
