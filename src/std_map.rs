//! StdMap: the plain hash map behind the `MapLike` interface.
//!
//! Iteration order is whatever the table yields and may differ between
//! two maps holding the same entries.

use crate::map_like::MapLike;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashMap;
use std::collections::hash_map::RandomState;

#[derive(Clone)]
pub struct StdMap<K, V, S = RandomState> {
    pub(crate) items: HashMap<K, V, S>,
}

impl<K, V> StdMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K, V, S: Default> Default for StdMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> StdMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            items: HashMap::with_hasher(hasher),
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            items: HashMap::with_capacity_and_hasher(capacity, hasher),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn iter(&self) -> hashbrown::hash_map::Iter<'_, K, V> {
        self.items.iter()
    }

    /// Unwrap into the underlying table.
    pub fn into_inner(self) -> HashMap<K, V, S> {
        self.items
    }
}

impl<K, V, S> StdMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn set(&mut self, key: K, value: V) {
        self.items.insert(key, value);
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.items.get(key)
    }

    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.items.contains_key(key)
    }

    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.items.remove(key)
    }

    /// Drop every entry and its storage.
    pub fn clear(&mut self) {
        self.items.clear();
        self.items.shrink_to_fit();
    }
}

impl<K, V, S> From<HashMap<K, V, S>> for StdMap<K, V, S> {
    fn from(items: HashMap<K, V, S>) -> Self {
        Self { items }
    }
}

impl<K, V, S> FromIterator<(K, V)> for StdMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<K, V, S> Extend<(K, V)> for StdMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<'a, K, V, S> IntoIterator for &'a StdMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = hashbrown::hash_map::Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<K, V, S> MapLike for StdMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    type Key = K;
    type Value = V;

    fn set(&mut self, key: K, value: V) {
        StdMap::set(self, key, value)
    }
    fn get(&self, key: &K) -> Option<V> {
        self.items.get(key).cloned()
    }
    fn has(&self, key: &K) -> bool {
        self.items.contains_key(key)
    }
    fn delete(&mut self, key: &K) -> Option<V> {
        self.items.remove(key)
    }
    fn keys(&self) -> Vec<K> {
        self.items.keys().cloned().collect()
    }
    fn values(&self) -> Vec<V> {
        self.items.values().cloned().collect()
    }
    fn len(&self) -> usize {
        self.items.len()
    }
    fn range<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        for (k, v) in &self.items {
            if !f(k, v) {
                break;
            }
        }
    }
    fn clear(&mut self) {
        StdMap::clear(self)
    }
    fn all(&self) -> impl Iterator<Item = (K, V)> + '_ {
        self.items.iter().map(|(k, v)| (k.clone(), v.clone()))
    }
    fn delete_func<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.items.retain(|k, v| !f(k, v));
    }
}

impl<K, V, S> fmt::Display for StdMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{:?}:{:?}", k, v)?;
        }
        f.write_str("}")
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for StdMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.items.iter()).finish()
    }
}
