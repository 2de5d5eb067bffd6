//! Reducers: pure functions producing the next state.

use super::action::Action;
use super::state::State;
use std::fmt;
use std::sync::{Arc, OnceLock};

type ReduceFn = dyn Fn(&Action, &State) -> State + Send + Sync;

/// Shared pure function mapping `(action, state)` to the next state.
///
/// A `Reducer` is a handle: clones share identity, and two reducers are equal
/// only if they are clones of the same handle. The store relies on this to
/// ignore duplicate registrations.
///
/// # Example
///
/// ```rust
/// use unistate::core::{Action, Reducer, State};
///
/// let add_one = Reducer::new(|_, s: &State| {
///     let n = s.get_or("n", 0_i32).unwrap_or_default();
///     s.put("n", n + 1)
/// });
/// let double = Reducer::new(|_, s: &State| {
///     let n = s.get_or("n", 0_i32).unwrap_or_default();
///     s.put("n", n * 2)
/// });
///
/// let chain = add_one.and_then(&double);
/// let action = Action::new("ANY").unwrap();
/// let next = chain.reduce(&action, &State::new().put("n", 3_i32));
///
/// assert_eq!(next.get_or("n", 0_i32).unwrap(), 8);
/// ```
#[derive(Clone)]
pub struct Reducer {
    f: Arc<ReduceFn>,
}

impl Reducer {
    /// Wrap a pure function. It must be total and never panic on valid state.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Action, &State) -> State + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// The canonical reducer that hands back the state it was given.
    pub fn noop() -> Self {
        static NOOP: OnceLock<Reducer> = OnceLock::new();
        NOOP.get_or_init(|| Reducer::new(|_, state| state.clone()))
            .clone()
    }

    pub fn reduce(&self, action: &Action, state: &State) -> State {
        (self.f)(action, state)
    }

    /// Run `self`, then feed its output to `other`.
    pub fn and_then(&self, other: &Reducer) -> Reducer {
        let (first, second) = (self.clone(), other.clone());
        Reducer::new(move |action, state| second.reduce(action, &first.reduce(action, state)))
    }

    /// Chain `first` with `others`, left to right.
    ///
    /// Without `first` the result is [`Reducer::noop`]. With no `others`
    /// the result is `first` itself. `None` entries are skipped.
    pub fn combine<I>(first: Option<Reducer>, others: I) -> Reducer
    where
        I: IntoIterator<Item = Option<Reducer>>,
    {
        let Some(first) = first else {
            return Reducer::noop();
        };
        others
            .into_iter()
            .flatten()
            .fold(first, |chain, next| chain.and_then(&next))
    }

    /// Chain every reducer of a collection, left to right. An empty
    /// collection yields [`Reducer::noop`].
    pub fn combine_all<I>(reducers: I) -> Reducer
    where
        I: IntoIterator<Item = Reducer>,
    {
        let mut reducers = reducers.into_iter();
        match reducers.next() {
            Some(first) => Reducer::combine(Some(first), reducers.map(Some)),
            None => Reducer::noop(),
        }
    }
}

impl PartialEq for Reducer {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.f), Arc::as_ptr(&other.f))
    }
}

impl Eq for Reducer {}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reducer({:p})", Arc::as_ptr(&self.f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action() -> Action {
        Action::new("TEST").unwrap()
    }

    fn value(state: &State) -> i32 {
        state.get_or("v", 0_i32).unwrap()
    }

    fn add_one() -> Reducer {
        Reducer::new(|_, s| s.put("v", value(s) + 1))
    }

    fn times_two() -> Reducer {
        Reducer::new(|_, s| s.put("v", value(s) * 2))
    }

    #[test]
    fn noop_returns_same_snapshot() {
        let state = State::new().put("v", 1_i32);
        let next = Reducer::noop().reduce(&action(), &state);

        assert!(State::ptr_eq(&state, &next));
    }

    #[test]
    fn noop_is_canonical() {
        assert_eq!(Reducer::noop(), Reducer::noop());
    }

    #[test]
    fn and_then_applies_left_first() {
        let state = State::new().put("v", 3_i32);

        let chain = add_one().and_then(&times_two());
        assert_eq!(value(&chain.reduce(&action(), &state)), 8);

        let reversed = times_two().and_then(&add_one());
        assert_eq!(value(&reversed.reduce(&action(), &state)), 7);
    }

    #[test]
    fn combine_without_first_is_noop() {
        let combined = Reducer::combine(None, [Some(add_one())]);
        assert_eq!(combined, Reducer::noop());
    }

    #[test]
    fn combine_without_others_returns_first() {
        let first = add_one();
        let combined = Reducer::combine(Some(first.clone()), std::iter::empty());

        assert_eq!(combined, first);
    }

    #[test]
    fn combine_skips_missing_entries() {
        let combined = Reducer::combine(Some(add_one()), [None, Some(times_two()), None]);
        let state = State::new().put("v", 3_i32);

        assert_eq!(value(&combined.reduce(&action(), &state)), 8);
    }

    #[test]
    fn combine_all_of_empty_is_noop() {
        assert_eq!(Reducer::combine_all(Vec::new()), Reducer::noop());
    }

    #[test]
    fn combine_all_keeps_order() {
        let combined = Reducer::combine_all([add_one(), times_two(), add_one()]);
        let state = State::new().put("v", 3_i32);

        assert_eq!(value(&combined.reduce(&action(), &state)), 9);
    }

    #[test]
    fn equality_is_identity() {
        let a = add_one();
        let b = add_one();

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
