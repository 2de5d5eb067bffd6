//! Immutable state snapshots.
//!
//! A [`State`] is a persistent key-value snapshot. Every update returns a new
//! snapshot that shares structure with the old one and remembers it as its
//! predecessor, so callers can walk back through earlier snapshots.

use super::map::PersistentMap;
use super::value::Value;
use crate::error::Result;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Immutable snapshot of key-value entries with a link to its predecessor.
///
/// `State` is a cheap handle: cloning shares the snapshot. Use
/// [`State::ptr_eq`] to test whether two handles refer to the same snapshot.
///
/// # Example
///
/// ```rust
/// use unistate::core::State;
///
/// let empty = State::new();
/// let one = empty.put("count", 1_i32);
///
/// assert!(empty.is_empty());
/// assert_eq!(one.get_or("count", 0_i32).unwrap(), 1);
/// assert!(one.can_time_travel());
/// assert!(State::ptr_eq(one.previous().unwrap(), &empty));
/// ```
#[derive(Clone)]
pub struct State {
    inner: Arc<Snapshot>,
}

struct Snapshot {
    entries: PersistentMap<Value>,
    previous: Option<State>,
}

// Unlink ancestors one at a time so that dropping a long lineage does not
// recurse once per snapshot.
impl Drop for Snapshot {
    fn drop(&mut self) {
        let mut next = self.previous.take();
        while let Some(state) = next {
            match Arc::try_unwrap(state.inner) {
                Ok(mut snapshot) => next = snapshot.previous.take(),
                Err(_) => break,
            }
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    /// Create an empty root snapshot.
    pub fn new() -> Self {
        Self::from_map(PersistentMap::new(), None)
    }

    /// Create a root snapshot holding `entries`. It has no predecessor.
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<Arc<str>>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::from_map(entries.into_iter().collect(), None)
    }

    fn from_map(entries: PersistentMap<Value>, previous: Option<State>) -> Self {
        Self {
            inner: Arc::new(Snapshot { entries, previous }),
        }
    }

    /// Untyped lookup.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.entries.get(key).cloned()
    }

    /// Typed lookup returning a clone of the stored value.
    ///
    /// Fails with [`StoreError::TypeMismatch`](crate::StoreError::TypeMismatch)
    /// if the key holds something other than a `T`.
    pub fn get_as<T: Any + Clone>(&self, key: &str) -> Result<Option<T>> {
        self.inner
            .entries
            .get(key)
            .map(Value::downcast::<T>)
            .transpose()
    }

    /// Typed lookup borrowing the stored value.
    pub fn get_ref<T: Any>(&self, key: &str) -> Result<Option<&T>> {
        self.inner
            .entries
            .get(key)
            .map(Value::try_ref::<T>)
            .transpose()
    }

    /// The stored value as a `T`, or `default` if the key is absent.
    ///
    /// The stored value is cast to the type of `default`; a value of another
    /// type fails with [`StoreError::TypeMismatch`](crate::StoreError::TypeMismatch).
    pub fn get_or<T: Any + Clone>(&self, key: &str, default: T) -> Result<T> {
        Ok(self.get_as(key)?.unwrap_or(default))
    }

    /// The raw stored value without any cast, or `None`.
    pub fn get_or_null(&self, key: &str) -> Option<Value> {
        self.get(key)
    }

    /// Return a new snapshot with `key` bound to `value`, whose predecessor
    /// is `self`.
    pub fn put<T: Any + Send + Sync>(&self, key: impl Into<Arc<str>>, value: T) -> State {
        self.put_value(key, Value::new(value))
    }

    /// Like [`State::put`] for an already type-erased value.
    pub fn put_value(&self, key: impl Into<Arc<str>>, value: Value) -> State {
        Self::from_map(self.inner.entries.insert(key, value), Some(self.clone()))
    }

    /// Overlay `theirs` on `ours`, preferring `theirs` on conflicting keys.
    ///
    /// A merged snapshot has two parents and therefore no predecessor:
    /// merging gives up time travel.
    pub fn merge(ours: &State, theirs: &State) -> State {
        Self::from_map(ours.inner.entries.union(&theirs.inner.entries), None)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner.entries.keys()
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.inner.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    /// Whether the snapshot holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Whether `key` is bound, whatever its value type.
    pub fn has_key(&self, key: &str) -> bool {
        self.inner.entries.contains_key(key)
    }

    /// Whether a predecessor is reachable through [`State::previous`].
    pub fn can_time_travel(&self) -> bool {
        self.inner.previous.is_some()
    }

    /// The snapshot this one was derived from by [`State::put`].
    pub fn previous(&self) -> Option<&State> {
        self.inner.previous.as_ref()
    }

    /// Walk this snapshot and then each predecessor, newest first.
    ///
    /// ```rust
    /// use unistate::core::State;
    ///
    /// let state = State::new().put("n", 1_i32).put("n", 2_i32);
    /// let values: Vec<i32> = state
    ///     .history()
    ///     .map(|s| s.get_or("n", 0_i32).unwrap())
    ///     .collect();
    ///
    /// assert_eq!(values, vec![2, 1, 0]);
    /// ```
    pub fn history(&self) -> impl Iterator<Item = &State> + '_ {
        std::iter::successors(Some(self), |s| s.previous())
    }

    /// Whether both handles refer to the same snapshot.
    pub fn ptr_eq(a: &State, b: &State) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("State [entries='")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "['{key}':'{value}']")?;
        }
        f.write_str("']")
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("entries", &self.inner.entries)
            .field("can_time_travel", &self.can_time_travel())
            .finish()
    }
}
