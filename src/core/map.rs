//! Persistent ordered map with structural sharing.
//!
//! A height-balanced (AVL) binary search tree whose nodes live behind `Arc`.
//! Inserting copies only the nodes on the path from the root to the touched
//! leaf; every other subtree is shared with the map it was derived from.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

type Link<V> = Option<Arc<Node<V>>>;

struct Node<V> {
    key: Arc<str>,
    value: V,
    height: u8,
    len: usize,
    left: Link<V>,
    right: Link<V>,
}

/// Immutable map from string keys to `V`, iterated in ascending key order.
///
/// # Example
///
/// ```rust
/// use unistate::core::PersistentMap;
///
/// let empty = PersistentMap::new();
/// let one = empty.insert("a", 1);
/// let two = one.insert("b", 2);
///
/// assert!(empty.is_empty());
/// assert_eq!(one.len(), 1);
/// assert_eq!(two.get("b"), Some(&2));
/// assert_eq!(two.keys().collect::<Vec<_>>(), vec!["a", "b"]);
/// ```
pub struct PersistentMap<V> {
    root: Link<V>,
}

impl<V> Clone for PersistentMap<V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

impl<V> Default for PersistentMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> PersistentMap<V> {
    pub fn new() -> Self {
        Self { root: None }
    }

    pub fn len(&self) -> usize {
        len(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let mut link = &self.root;
        while let Some(node) = link {
            match key.cmp(&*node.key) {
                Ordering::Less => link = &node.left,
                Ordering::Greater => link = &node.right,
                Ordering::Equal => return Some(&node.value),
            }
        }
        None
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, V> {
        let mut iter = Iter { stack: Vec::new() };
        iter.descend(&self.root);
        iter
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Whether both maps share the same root node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<V: Clone> PersistentMap<V> {
    /// Return a new map with `key` bound to `value`. `self` is untouched.
    pub fn insert(&self, key: impl Into<Arc<str>>, value: V) -> Self {
        Self {
            root: Some(insert(&self.root, key.into(), value)),
        }
    }

    /// Overlay every entry of `theirs` onto `self`; `theirs` wins on
    /// conflicting keys.
    pub fn union(&self, theirs: &Self) -> Self {
        let (mut base, overlay, prefer_overlay) = if self.len() >= theirs.len() {
            (self.clone(), theirs, true)
        } else {
            (theirs.clone(), self, false)
        };
        for (key, value) in overlay.iter_shared() {
            if !prefer_overlay && base.contains_key(&key) {
                continue;
            }
            base = base.insert(key, value.clone());
        }
        base
    }

    fn iter_shared(&self) -> impl Iterator<Item = (Arc<str>, &V)> + '_ {
        let mut iter = Iter { stack: Vec::new() };
        iter.descend(&self.root);
        std::iter::from_fn(move || iter.next_node().map(|n| (n.key.clone(), &n.value)))
    }
}

impl<K: Into<Arc<str>>, V: Clone> FromIterator<(K, V)> for PersistentMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (k, v)| map.insert(k, v))
    }
}

impl<V: fmt::Debug> fmt::Debug for PersistentMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// In-order iterator over a [`PersistentMap`].
pub struct Iter<'a, V> {
    stack: Vec<&'a Node<V>>,
}

impl<'a, V> Iter<'a, V> {
    fn descend(&mut self, mut link: &'a Link<V>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = &node.left;
        }
    }

    fn next_node(&mut self) -> Option<&'a Node<V>> {
        let node = self.stack.pop()?;
        self.descend(&node.right);
        Some(node)
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.next_node().map(|n| (&*n.key, &n.value))
    }
}

fn height<V>(link: &Link<V>) -> u8 {
    link.as_ref().map_or(0, |n| n.height)
}

fn len<V>(link: &Link<V>) -> usize {
    link.as_ref().map_or(0, |n| n.len)
}

fn node<V>(key: Arc<str>, value: V, left: Link<V>, right: Link<V>) -> Arc<Node<V>> {
    Arc::new(Node {
        height: 1 + height(&left).max(height(&right)),
        len: 1 + len(&left) + len(&right),
        key,
        value,
        left,
        right,
    })
}

fn balance<V: Clone>(key: Arc<str>, value: V, left: Link<V>, right: Link<V>) -> Arc<Node<V>> {
    let (hl, hr) = (height(&left), height(&right));

    if hl > hr + 1 {
        if let Some(l) = &left {
            if height(&l.left) >= height(&l.right) {
                let lowered = node(key, value, l.right.clone(), right);
                return node(l.key.clone(), l.value.clone(), l.left.clone(), Some(lowered));
            }
            if let Some(lr) = &l.right {
                let new_left = node(l.key.clone(), l.value.clone(), l.left.clone(), lr.left.clone());
                let new_right = node(key, value, lr.right.clone(), right);
                return node(lr.key.clone(), lr.value.clone(), Some(new_left), Some(new_right));
            }
        }
    } else if hr > hl + 1 {
        if let Some(r) = &right {
            if height(&r.right) >= height(&r.left) {
                let lowered = node(key, value, left, r.left.clone());
                return node(r.key.clone(), r.value.clone(), Some(lowered), r.right.clone());
            }
            if let Some(rl) = &r.left {
                let new_left = node(key, value, left, rl.left.clone());
                let new_right = node(r.key.clone(), r.value.clone(), rl.right.clone(), r.right.clone());
                return node(rl.key.clone(), rl.value.clone(), Some(new_left), Some(new_right));
            }
        }
    }

    node(key, value, left, right)
}

fn insert<V: Clone>(link: &Link<V>, key: Arc<str>, value: V) -> Arc<Node<V>> {
    let Some(n) = link else {
        return node(key, value, None, None);
    };

    match key.cmp(&n.key) {
        Ordering::Less => balance(
            n.key.clone(),
            n.value.clone(),
            Some(insert(&n.left, key, value)),
            n.right.clone(),
        ),
        Ordering::Greater => balance(
            n.key.clone(),
            n.value.clone(),
            n.left.clone(),
            Some(insert(&n.right, key, value)),
        ),
        // Same shape, only the value changes.
        Ordering::Equal => Arc::new(Node {
            key: n.key.clone(),
            value,
            height: n.height,
            len: n.len,
            left: n.left.clone(),
            right: n.right.clone(),
        }),
    }
}
