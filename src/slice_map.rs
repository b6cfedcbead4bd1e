//! SliceMap: a hash map that remembers an order for its keys.
//!
//! Entries live in a `hashbrown` table; a parallel `Vec` of keys records the
//! order used by iteration and positional access. The order is insertion
//! order unless a sort function is installed, in which case new keys are
//! spliced into sorted position as they arrive.

use crate::map_like::MapLike;
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashMap;
use std::collections::hash_map::RandomState;
use std::sync::Arc;

/// Strict "a sorts before b" relation over `(key_a, key_b, value_a, value_b)`.
pub type LessFn<K, V> = Arc<dyn Fn(&K, &K, &V, &V) -> bool + Send + Sync>;

/// Order-preserving map.
///
/// Invariants between calls:
/// - `order` and the keys of `items` are the same set, with no duplicate
///   in `order`.
/// - With a sort function, `order` is sorted by it. Updating the value of an
///   existing key never moves it; delete and set again to re-place it.
/// - Without one, `order` is insertion order except where `set_at` placed a
///   key explicitly.
#[derive(Clone)]
pub struct SliceMap<K, V, S = RandomState> {
    pub(crate) items: HashMap<K, V, S>,
    pub(crate) order: Vec<K>,
    pub(crate) less: Option<LessFn<K, V>>,
}

impl<K, V> SliceMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K, V, S: Default> Default for SliceMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> SliceMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            items: HashMap::with_hasher(hasher),
            order: Vec::new(),
            less: None,
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            items: HashMap::with_capacity_and_hasher(capacity, hasher),
            order: Vec::with_capacity(capacity),
            less: None,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of entries the table holds without reallocating; zero until
    /// the first write and again after `clear`.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// The installed sort function, if any. Decoding never restores one, so
    /// keep this around to reinstall it with `set_shared_sort_func`.
    pub fn sort_func(&self) -> Option<LessFn<K, V>> {
        self.less.clone()
    }

    pub fn keys_iter(&self) -> core::slice::Iter<'_, K> {
        self.order.iter()
    }
}

impl<K, V, S> SliceMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    /// Build a map from several sources, later sources updating earlier keys
    /// in place.
    pub fn from_maps<I, M>(sources: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: IntoIterator<Item = (K, V)>,
        S: Default,
    {
        let mut m = Self::default();
        for source in sources {
            m.extend(source);
        }
        m
    }

    /// Keep the map sorted by `f` from now on. Existing entries are re-sorted
    /// immediately with a stable sort.
    pub fn set_sort_func<F>(&mut self, f: F)
    where
        F: Fn(&K, &K, &V, &V) -> bool + Send + Sync + 'static,
    {
        self.set_shared_sort_func(Some(Arc::new(f)));
    }

    /// Stop sorting. The current order stays; new keys append.
    pub fn clear_sort_func(&mut self) {
        self.set_shared_sort_func(None);
    }

    pub fn set_shared_sort_func(&mut self, f: Option<LessFn<K, V>>) {
        self.less = f;
        if self.less.is_some() {
            self.resort();
            log::debug!("slice map: sort function installed over {} entries", self.len());
        } else {
            log::debug!("slice map: sort function removed");
        }
    }

    pub(crate) fn resort(&mut self) {
        let Some(less) = self.less.as_ref() else {
            return;
        };
        let items = &self.items;
        self.order.sort_by(|a, b| {
            let (va, vb) = (&items[a], &items[b]);
            if less(a, b, va, vb) {
                Ordering::Less
            } else if less(b, a, vb, va) {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        });
    }

    /// Insert or update `key`.
    ///
    /// A new key appends, or lands at its sorted position when a sort
    /// function is installed. An existing key keeps its position and only
    /// its value changes.
    pub fn set(&mut self, key: K, value: V) {
        if let Some(slot) = self.items.get_mut(&key) {
            *slot = value;
            return;
        }
        match &self.less {
            Some(less) => {
                let items = &self.items;
                let at = self
                    .order
                    .partition_point(|k| !less(&key, k, &value, &items[k]));
                self.order.insert(at, key.clone());
            }
            None => self.order.push(key.clone()),
        }
        self.items.insert(key, value);
    }

    /// Insert `key` at position `index`, shifting later entries back.
    ///
    /// Negative indices count from the end, so `-1` puts the key just before
    /// the last entry; anything at or below `-len` means the front. An index
    /// at or past the end appends. An existing key is moved to the new
    /// position.
    ///
    /// # Panics
    ///
    /// If a sort function is installed; positional placement and sorting
    /// cannot both hold.
    pub fn set_at(&mut self, index: isize, key: K, value: V) {
        assert!(
            self.less.is_none(),
            "cannot use set_at on a slice map that has a sort function"
        );
        if index >= self.order.len() as isize {
            self.set(key, value);
            return;
        }
        self.delete(&key);

        let len = self.order.len() as isize;
        let at = if index <= -len {
            0
        } else if index < 0 {
            len + index
        } else {
            index
        };
        self.order.insert(at as usize, key.clone());
        self.items.insert(key, value);
    }

    /// Remove `key` and return its value; `None` if it was not present.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (stored, value) = self.items.get_key_value(key)?;
        if let Some(at) = self.position_of(stored, value) {
            self.order.remove(at);
        }
        self.items.remove(key)
    }

    // Sorted maps binary search for the start of the key's rank and walk the
    // run of equally ranked keys. Values updated in place can leave the order
    // out of step with the sort function, so fall back to a scan.
    fn position_of(&self, key: &K, value: &V) -> Option<usize> {
        if let Some(less) = &self.less {
            let items = &self.items;
            let start = self
                .order
                .partition_point(|k| less(k, key, &items[k], value));
            for (i, k) in self.order[start..].iter().enumerate() {
                if k == key {
                    return Some(start + i);
                }
                if less(key, k, value, &items[k]) {
                    break;
                }
            }
        }
        self.order.iter().position(|k| k == key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.items.get(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.items.get_mut(key)
    }

    /// The value for `key` and whether it was present. A missing key reports
    /// `V::default()`.
    pub fn load<Q>(&self, key: &Q) -> (V, bool)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone + Default,
    {
        match self.items.get(key) {
            Some(v) => (v.clone(), true),
            None => (V::default(), false),
        }
    }

    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.items.contains_key(key)
    }

    /// Value at `position` in the current order.
    pub fn get_at(&self, position: usize) -> Option<&V> {
        self.order.get(position).map(|k| &self.items[k])
    }

    /// Key at `position` in the current order.
    pub fn get_key_at(&self, position: usize) -> Option<&K> {
        self.order.get(position)
    }

    /// Snapshot of the keys in order.
    pub fn keys(&self) -> Vec<K> {
        self.order.clone()
    }

    /// Snapshot of the values in order.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.values_iter().cloned().collect()
    }

    /// Visit entries in order until `f` returns `false`.
    pub fn range<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        for (k, v) in self.iter() {
            if !f(k, v) {
                break;
            }
        }
    }

    /// Remove all entries and release their storage. The sort function stays
    /// installed.
    pub fn clear(&mut self) {
        self.items.clear();
        self.items.shrink_to_fit();
        self.order = Vec::new();
    }

    /// Remove every entry for which `f` returns `true`, visiting in order.
    pub fn delete_func<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let items = &mut self.items;
        self.order.retain(|k| {
            let doomed = f(k, &items[k]);
            if doomed {
                items.remove(k);
            }
            !doomed
        });
    }

    /// `set` every pair, in order.
    pub fn insert<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in iter {
            self.set(k, v);
        }
    }

    pub fn iter(&self) -> Iter<'_, K, V, S> {
        Iter {
            keys: self.order.iter(),
            items: &self.items,
        }
    }

    pub fn values_iter(&self) -> Values<'_, K, V, S> {
        Values { inner: self.iter() }
    }
}

/// Iterator over `(&K, &V)` in map order.
pub struct Iter<'a, K, V, S> {
    keys: core::slice::Iter<'a, K>,
    items: &'a HashMap<K, V, S>,
}

impl<'a, K, V, S> Iterator for Iter<'a, K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let items = self.items;
        self.keys.next().map(|k| (k, &items[k]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<'a, K, V, S> DoubleEndedIterator for Iter<'a, K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        let items = self.items;
        self.keys.next_back().map(|k| (k, &items[k]))
    }
}

impl<'a, K, V, S> ExactSizeIterator for Iter<'a, K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
}

/// Iterator over `&V` in map order.
pub struct Values<'a, K, V, S> {
    inner: Iter<'a, K, V, S>,
}

impl<'a, K, V, S> Iterator for Values<'a, K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = &'a V;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V, S> ExactSizeIterator for Values<'a, K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
}

/// Owning iterator over `(K, V)` in map order.
pub struct IntoIter<K, V, S> {
    keys: std::vec::IntoIter<K>,
    items: HashMap<K, V, S>,
}

impl<K, V, S> Iterator for IntoIter<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = (K, V);
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.keys.next()?;
        let v = self.items.remove(&k)?;
        Some((k, v))
    }
}

impl<'a, K, V, S> IntoIterator for &'a SliceMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, S>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for SliceMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, S>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            keys: self.order.into_iter(),
            items: self.items,
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for SliceMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::default();
        m.insert(iter);
        m
    }
}

impl<K, V, S> Extend<(K, V)> for SliceMap<K, V, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.insert(iter);
    }
}

impl<K, V, S> MapLike for SliceMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    type Key = K;
    type Value = V;

    fn set(&mut self, key: K, value: V) {
        SliceMap::set(self, key, value)
    }
    fn get(&self, key: &K) -> Option<V> {
        SliceMap::get(self, key).cloned()
    }
    fn has(&self, key: &K) -> bool {
        SliceMap::has(self, key)
    }
    fn delete(&mut self, key: &K) -> Option<V> {
        SliceMap::delete(self, key)
    }
    fn keys(&self) -> Vec<K> {
        SliceMap::keys(self)
    }
    fn values(&self) -> Vec<V> {
        SliceMap::values(self)
    }
    fn len(&self) -> usize {
        SliceMap::len(self)
    }
    fn range<F>(&self, f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        SliceMap::range(self, f)
    }
    fn clear(&mut self) {
        SliceMap::clear(self)
    }
    fn all(&self) -> impl Iterator<Item = (K, V)> + '_ {
        self.iter().map(|(k, v)| (k.clone(), v.clone()))
    }
    fn keys_iter(&self) -> impl Iterator<Item = K> + '_ {
        self.order.iter().cloned()
    }
    fn values_iter(&self) -> impl Iterator<Item = V> + '_ {
        SliceMap::values_iter(self).cloned()
    }
    fn delete_func<F>(&mut self, f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        SliceMap::delete_func(self, f)
    }
}

/// `{"k":v,"k2":v2}` in map order, using each key's and value's `Debug`
/// form.
impl<K, V, S> fmt::Display for SliceMap<K, V, S>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{:?}:{:?}", k, v)?;
        }
        f.write_str("}")
    }
}

impl<K, V, S> fmt::Debug for SliceMap<K, V, S>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    fn by_key(m: &mut SliceMap<String, i32>) {
        m.set_sort_func(|a, b, _, _| a < b);
    }

    fn keys_of(m: &SliceMap<String, i32>) -> Vec<&str> {
        m.keys_iter().map(String::as_str).collect()
    }

    /// Invariant: with no sort function, fresh keys iterate in insertion order.
    #[test]
    fn fifo_order() {
        let mut m = SliceMap::new();
        m.set("c".to_string(), 3);
        m.set("a".to_string(), 1);
        m.set("b".to_string(), 2);
        assert_eq!(keys_of(&m), ["c", "a", "b"]);
        assert_eq!(m.values(), [3, 1, 2]);
    }

    /// Invariant: updating an existing key changes its value but not its
    /// position, with or without a sort function.
    #[test]
    fn update_keeps_position() {
        let mut m = SliceMap::new();
        m.set("b".to_string(), 2);
        m.set("a".to_string(), 1);
        m.set("b".to_string(), 20);
        assert_eq!(keys_of(&m), ["b", "a"]);
        assert_eq!(m.get("b"), Some(&20));

        let mut sorted: SliceMap<String, i32> = SliceMap::new();
        sorted.set_sort_func(|_, _, a, b| a < b);
        sorted.set("x".to_string(), 1);
        sorted.set("y".to_string(), 2);
        // y would sort first by value now, but updates never move a key.
        sorted.set("y".to_string(), 0);
        assert_eq!(keys_of(&sorted), ["x", "y"]);
    }

    /// Invariant: installing a sort function re-sorts existing entries and
    /// new keys are placed in sorted position afterwards.
    #[test]
    fn sort_func_sorts_existing_and_new() {
        let mut m = SliceMap::new();
        m.set("b".to_string(), 2);
        m.set("a".to_string(), 1);
        assert_eq!(m.to_string(), r#"{"b":2,"a":1}"#);
        by_key(&mut m);
        assert_eq!(m.to_string(), r#"{"a":1,"b":2}"#);

        for k in ["d", "c", "e", "0"] {
            m.set(k.to_string(), 9);
            let keys = m.keys();
            let mut sorted = keys.clone();
            sorted.sort();
            assert_eq!(keys, sorted);
        }
        assert_eq!(keys_of(&m), ["0", "a", "b", "c", "d", "e"]);
    }

    /// Invariant: equally ranked entries keep insertion order, both when the
    /// sort function is installed (stable sort) and for later inserts.
    #[test]
    fn sort_is_stable_for_ties() {
        let mut m = SliceMap::new();
        m.set("b1".to_string(), 1);
        m.set("a0".to_string(), 0);
        m.set("a1".to_string(), 1);
        m.set_sort_func(|_, _, a: &i32, b: &i32| a < b);
        assert_eq!(keys_of(&m), ["a0", "b1", "a1"]);
        m.set("c1".to_string(), 1);
        m.set("z0".to_string(), 0);
        assert_eq!(keys_of(&m), ["a0", "z0", "b1", "a1", "c1"]);
    }

    /// Invariant: removing the sort function keeps the order and appends new keys.
    #[test]
    fn clearing_sort_func_appends_again() {
        let mut m = SliceMap::new();
        m.set("b".to_string(), 2);
        m.set("a".to_string(), 1);
        by_key(&mut m);
        m.clear_sort_func();
        assert!(m.sort_func().is_none());
        m.set("0".to_string(), 0);
        assert_eq!(keys_of(&m), ["a", "b", "0"]);
    }

    /// Invariant: `set_at` handles in-range, negative, clamped and past-end
    /// indices and moves existing keys.
    #[test]
    fn set_at_positions() {
        let mut m = SliceMap::new();
        m.set("b".to_string(), 2);
        m.set("a".to_string(), 1);
        m.set_at(1, "c".to_string(), 3);
        assert_eq!(keys_of(&m), ["b", "c", "a"]);
        assert_eq!(m.get_at(1), Some(&3));

        m.set_at(-1, "d".to_string(), 4);
        assert_eq!(keys_of(&m), ["b", "c", "d", "a"]);

        m.set_at(-100, "e".to_string(), 5);
        assert_eq!(keys_of(&m), ["e", "b", "c", "d", "a"]);

        m.set_at(99, "f".to_string(), 6);
        assert_eq!(m.get_key_at(5).map(String::as_str), Some("f"));

        // Existing key moves to the requested slot with its new value.
        m.set_at(0, "a".to_string(), 10);
        assert_eq!(keys_of(&m), ["a", "e", "b", "c", "d", "f"]);
        assert_eq!(m.get("a"), Some(&10));
        assert_eq!(m.len(), 6);
    }

    /// Invariant: moving an existing key to its own end slot keeps the
    /// bijection (the index is re-evaluated after the old entry is removed).
    #[test]
    fn set_at_existing_key_near_end() {
        let mut m = SliceMap::new();
        for (i, k) in ["a", "b", "c"].iter().enumerate() {
            m.set(k.to_string(), i as i32);
        }
        m.set_at(2, "a".to_string(), 7);
        assert_eq!(keys_of(&m), ["b", "c", "a"]);
        m.set_at(-3, "c".to_string(), 8);
        assert_eq!(keys_of(&m), ["c", "b", "a"]);
        assert_eq!(m.len(), 3);
    }

    /// Invariant: `set_at` with a sort function installed panics.
    #[test]
    #[should_panic(expected = "sort function")]
    fn set_at_with_sort_func_panics() {
        let mut m = SliceMap::new();
        by_key(&mut m);
        m.set_at(0, "a".to_string(), 1);
    }

    /// Invariant: delete removes from table and order; a missing key is a no-op.
    #[test]
    fn delete_present_and_missing() {
        let mut m = SliceMap::new();
        m.set("a".to_string(), 1);
        m.set("b".to_string(), 2);
        assert_eq!(m.delete("a"), Some(1));
        assert_eq!(keys_of(&m), ["b"]);
        assert_eq!(m.delete("zz"), None);
        assert_eq!(m.len(), 1);
    }

    /// Invariant: deleting under a sort function finds the right key even
    /// among equally ranked entries and after in-place updates broke the
    /// sort order.
    #[test]
    fn delete_under_sort_func() {
        let mut m = SliceMap::new();
        m.set_sort_func(|_, _, a: &i32, b: &i32| a < b);
        for (k, v) in [("p", 1), ("q", 1), ("r", 1), ("s", 2)] {
            m.set(k.to_string(), v);
        }
        assert_eq!(m.delete("q"), Some(1));
        assert_eq!(keys_of(&m), ["p", "r", "s"]);

        m.set("s".to_string(), 0); // now out of sort order
        assert_eq!(m.delete("s"), Some(0));
        assert_eq!(keys_of(&m), ["p", "r"]);
        assert_eq!(m.len(), m.items.len());
    }

    /// Invariant: reads on a never-written map return empty results and the
    /// table stays unallocated.
    #[test]
    fn empty_map_reads() {
        let m: SliceMap<String, i32> = SliceMap::new();
        assert_eq!(m.get("a"), None);
        assert_eq!(m.load("a"), (0, false));
        assert!(!m.has("a"));
        assert_eq!(m.get_at(0), None);
        assert_eq!(m.get_key_at(0), None);
        assert!(m.keys().is_empty());
        assert!(m.values().is_empty());
        assert_eq!(m.len(), 0);
        assert_eq!(m.iter().count(), 0);
        assert_eq!(m.to_string(), "{}");
        let mut visits = 0;
        m.range(|_, _| {
            visits += 1;
            true
        });
        assert_eq!(visits, 0);
        assert_eq!(m.capacity(), 0);
    }

    /// Invariant: `clear` empties and releases storage but keeps the sort function.
    #[test]
    fn clear_keeps_sort_func() {
        let mut m = SliceMap::new();
        by_key(&mut m);
        m.set("b".to_string(), 2);
        m.set("a".to_string(), 1);
        m.clear();
        assert!(m.is_empty());
        assert_eq!(m.capacity(), 0);
        assert!(m.sort_func().is_some());
        m.set("z".to_string(), 26);
        m.set("y".to_string(), 25);
        assert_eq!(keys_of(&m), ["y", "z"]);
    }

    /// Invariant: `range` stops as soon as the visitor returns false.
    #[test]
    fn range_stops_early() {
        let m: SliceMap<i32, i32> = (0..5).map(|i| (i, i * 10)).collect();
        let mut seen = Vec::new();
        m.range(|k, _| {
            seen.push(*k);
            seen.len() < 2
        });
        assert_eq!(seen, [0, 1]);
    }

    /// Invariant: `delete_func` removes every match without skipping neighbours.
    #[test]
    fn delete_func_removes_adjacent_matches() {
        let mut m: SliceMap<i32, i32> = (0..8).map(|i| (i, i)).collect();
        m.delete_func(|k, _| *k == 2 || *k == 3 || *k == 7);
        assert_eq!(m.keys(), [0, 1, 4, 5, 6]);
        assert!(!m.has(&3));
        assert_eq!(m.items.len(), 5);
    }

    /// Invariant: clones own their storage and share the sort function.
    #[test]
    fn clone_is_independent() {
        let mut a = SliceMap::new();
        by_key(&mut a);
        a.set("x".to_string(), 1);
        let mut b = a.clone();
        b.set("x".to_string(), 2);
        b.set("a".to_string(), 0);
        assert_eq!(a.get("x"), Some(&1));
        assert_eq!(a.len(), 1);
        assert_eq!(keys_of(&b), ["a", "x"]);
    }

    /// Invariant: the sort function is only consulted for new keys, not on
    /// update, so the number of calls stays flat when updating.
    #[test]
    fn updates_do_not_consult_sort_func() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut m = SliceMap::new();
        m.set_sort_func(move |a: &i32, b: &i32, _: &i32, _: &i32| {
            counter.fetch_add(1, AtomicOrdering::Relaxed);
            a < b
        });
        m.set(1, 1);
        m.set(2, 2);
        let before = calls.load(AtomicOrdering::Relaxed);
        m.set(1, 100);
        assert_eq!(calls.load(AtomicOrdering::Relaxed), before);
    }

    /// Invariant: iterators walk in order from both ends and report their length.
    #[test]
    fn iterators_follow_order() {
        let mut m = SliceMap::new();
        m.set("b", 2);
        m.set("a", 1);
        m.set("c", 3);
        let fwd: Vec<_> = m.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(fwd, [("b", 2), ("a", 1), ("c", 3)]);
        let back: Vec<_> = m.iter().rev().map(|(k, _)| *k).collect();
        assert_eq!(back, ["c", "a", "b"]);
        assert_eq!(m.iter().len(), 3);
        assert_eq!(m.values_iter().copied().collect::<Vec<_>>(), [2, 1, 3]);
        let owned: Vec<_> = m.into_iter().collect();
        assert_eq!(owned, [("b", 2), ("a", 1), ("c", 3)]);
    }

    /// Invariant: `from_maps` applies sources in order with update-in-place.
    #[test]
    fn from_maps_merges_sources() {
        let m: SliceMap<&str, i32> =
            SliceMap::from_maps([vec![("a", 1), ("b", 2)], vec![("c", 3), ("a", 10)]]);
        assert_eq!(m.keys(), ["a", "b", "c"]);
        assert_eq!(m.get("a"), Some(&10));
    }

    /// Invariant: Display renders Debug forms in order without a trailing comma.
    #[test]
    fn display_format() {
        let mut m = SliceMap::new();
        m.set("b".to_string(), 2);
        m.set("a".to_string(), 1);
        m.set_at(1, "c".to_string(), 3);
        assert_eq!(m.to_string(), r#"{"b":2,"c":3,"a":1}"#);
        assert_eq!(format!("{:?}", m), r#"{"b": 2, "c": 3, "a": 1}"#);
    }
}
