//! SliceSet: an order-preserving set built on `SliceMap<K, ()>`.
//!
//! Members come back in insertion order, or sorted once a sort function is
//! installed. Everything else is delegated to the map.

use crate::set::fmt_members;
use crate::set_like::SetLike;
use crate::slice_map::SliceMap;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

#[derive(Clone)]
pub struct SliceSet<K, S = RandomState> {
    pub(crate) map: SliceMap<K, (), S>,
}

impl<K> SliceSet<K> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K, S: Default> Default for SliceSet<K, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, S> SliceSet<K, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            map: SliceMap::with_hasher(hasher),
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            map: SliceMap::with_capacity_and_hasher(capacity, hasher),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Members in set order.
    pub fn iter(&self) -> core::slice::Iter<'_, K> {
        self.map.keys_iter()
    }
}

impl<K, S> SliceSet<K, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    /// Keep members sorted by `less` from now on, re-sorting existing ones.
    pub fn set_sort_func<F>(&mut self, less: F)
    where
        F: Fn(&K, &K) -> bool + Send + Sync + 'static,
    {
        self.map.set_sort_func(move |a, b, _, _| less(a, b));
    }

    /// Stop sorting; new members append from now on.
    pub fn clear_sort_func(&mut self) {
        self.map.clear_sort_func();
    }

    pub fn add(&mut self, item: K) -> &mut Self {
        self.map.set(item, ());
        self
    }

    pub fn has<Q>(&self, item: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.has(item)
    }

    pub fn delete<Q>(&mut self, item: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.delete(item).is_some()
    }

    /// Member at `position` in set order.
    pub fn get_at(&self, position: usize) -> Option<&K> {
        self.map.get_key_at(position)
    }

    pub fn values(&self) -> Vec<K> {
        self.map.keys()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K, S> FromIterator<K> for SliceSet<K, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut s = Self::default();
        s.extend(iter);
        s
    }
}

impl<K, S> Extend<K> for SliceSet<K, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for item in iter {
            self.add(item);
        }
    }
}

impl<'a, K, S> IntoIterator for &'a SliceSet<K, S> {
    type Item = &'a K;
    type IntoIter = core::slice::Iter<'a, K>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, S> SetLike for SliceSet<K, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    type Item = K;

    fn add(&mut self, item: K) -> &mut Self {
        SliceSet::add(self, item)
    }
    fn has(&self, item: &K) -> bool {
        self.map.has(item)
    }
    fn delete(&mut self, item: &K) -> bool {
        SliceSet::delete(self, item)
    }
    fn len(&self) -> usize {
        self.map.len()
    }
    fn clear(&mut self) {
        self.map.clear()
    }
    fn range<F>(&self, mut f: F)
    where
        F: FnMut(&K) -> bool,
    {
        for item in self.iter() {
            if !f(item) {
                break;
            }
        }
    }
    fn values(&self) -> Vec<K> {
        self.map.keys()
    }
    fn all(&self) -> impl Iterator<Item = K> + '_ {
        self.iter().cloned()
    }
    fn delete_func<F>(&mut self, mut f: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.map.delete_func(|k, _| f(k));
    }
}

impl<K: fmt::Debug, S> fmt::Display for SliceSet<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_members(f, self.iter())
    }
}

impl<K: fmt::Debug, S> fmt::Debug for SliceSet<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
