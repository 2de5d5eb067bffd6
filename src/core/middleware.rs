//! Middleware: predicates that may veto a dispatch before any reducer runs.

use super::action::Action;
use super::state::State;
use std::fmt;
use std::sync::{Arc, OnceLock};

type ProcessFn = dyn Fn(&Action, &State) -> bool + Send + Sync;

/// Shared predicate deciding whether an action reaches the reducers.
///
/// Returning `false` cancels the dispatch silently. Like [`Reducer`](super::Reducer),
/// a `Middleware` is a handle whose equality is identity.
///
/// # Example
///
/// ```rust
/// use unistate::core::{Action, Middleware, State};
///
/// let positive_only = Middleware::new(|action: &Action, _: &State| {
///     action.payload_or(1_i32).is_ok_and(|delta| delta >= 1)
/// });
///
/// let state = State::new();
/// assert!(positive_only.process(&Action::new("INC").unwrap(), &state));
/// assert!(!positive_only.process(&Action::with_payload("INC", -5_i32).unwrap(), &state));
/// ```
#[derive(Clone)]
pub struct Middleware {
    f: Arc<ProcessFn>,
}

impl Middleware {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Action, &State) -> bool + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// The canonical middleware that accepts everything.
    pub fn noop() -> Self {
        static NOOP: OnceLock<Middleware> = OnceLock::new();
        NOOP.get_or_init(|| Middleware::new(|_, _| true)).clone()
    }

    pub fn process(&self, action: &Action, state: &State) -> bool {
        (self.f)(action, state)
    }

    /// Accept only if both accept. `other` is not evaluated when `self`
    /// rejects.
    pub fn and_then(&self, other: &Middleware) -> Middleware {
        let (first, second) = (self.clone(), other.clone());
        Middleware::new(move |action, state| {
            first.process(action, state) && second.process(action, state)
        })
    }

    /// Chain `first` with `others`, left to right, short-circuiting on the
    /// first rejection.
    ///
    /// Without `first` the result is [`Middleware::noop`]. With no `others`
    /// the result is `first` itself. `None` entries are skipped.
    pub fn combine<I>(first: Option<Middleware>, others: I) -> Middleware
    where
        I: IntoIterator<Item = Option<Middleware>>,
    {
        let Some(first) = first else {
            return Middleware::noop();
        };
        others
            .into_iter()
            .flatten()
            .fold(first, |chain, next| chain.and_then(&next))
    }

    /// Chain every middleware of a collection. An empty collection yields
    /// [`Middleware::noop`].
    pub fn combine_all<I>(middlewares: I) -> Middleware
    where
        I: IntoIterator<Item = Middleware>,
    {
        let mut middlewares = middlewares.into_iter();
        match middlewares.next() {
            Some(first) => Middleware::combine(Some(first), middlewares.map(Some)),
            None => Middleware::noop(),
        }
    }
}

impl PartialEq for Middleware {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.f), Arc::as_ptr(&other.f))
    }
}

impl Eq for Middleware {}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Middleware({:p})", Arc::as_ptr(&self.f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn action() -> Action {
        Action::new("TEST").unwrap()
    }

    fn counting(result: bool) -> (Middleware, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let middleware = Middleware::new(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            result
        });
        (middleware, calls)
    }

    #[test]
    fn noop_accepts_everything() {
        assert!(Middleware::noop().process(&action(), &State::new()));
        assert_eq!(Middleware::noop(), Middleware::noop());
    }

    #[test]
    fn rejection_short_circuits() {
        let (deny, deny_calls) = counting(false);
        let (never, never_calls) = counting(true);

        let chain = Middleware::combine(Some(deny), [Some(never)]);

        assert!(!chain.process(&action(), &State::new()));
        assert_eq!(deny_calls.load(Ordering::SeqCst), 1);
        assert_eq!(never_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn acceptance_evaluates_next() {
        let (allow, allow_calls) = counting(true);
        let (deny, deny_calls) = counting(false);

        let chain = allow.and_then(&deny);

        assert!(!chain.process(&action(), &State::new()));
        assert_eq!(allow_calls.load(Ordering::SeqCst), 1);
        assert_eq!(deny_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn combine_without_first_is_noop() {
        let (deny, _) = counting(false);
        let combined = Middleware::combine(None, [Some(deny)]);

        assert_eq!(combined, Middleware::noop());
        assert!(combined.process(&action(), &State::new()));
    }

    #[test]
    fn combine_without_others_returns_first() {
        let (first, _) = counting(true);
        let combined = Middleware::combine(Some(first.clone()), std::iter::empty());

        assert_eq!(combined, first);
    }

    #[test]
    fn combine_skips_missing_entries() {
        let (allow, _) = counting(true);
        let (deny, deny_calls) = counting(false);

        let combined = Middleware::combine(Some(allow), [None, Some(deny), None]);

        assert!(!combined.process(&action(), &State::new()));
        assert_eq!(deny_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn combine_all_of_empty_accepts() {
        let combined = Middleware::combine_all(Vec::new());
        assert!(combined.process(&action(), &State::new()));
    }

    #[test]
    fn middleware_can_inspect_state() {
        let locked = Middleware::new(|_, s| !s.has_key("locked"));

        assert!(locked.process(&action(), &State::new()));
        assert!(!locked.process(&action(), &State::new().put("locked", true)));
    }
}
