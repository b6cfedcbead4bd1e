//! Set: plain hash set behind the `SetLike` interface.

use crate::set_like::SetLike;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashSet;
use std::collections::hash_map::RandomState;

#[derive(Clone)]
pub struct Set<K, S = RandomState> {
    pub(crate) items: HashSet<K, S>,
}

impl<K> Set<K> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K, S: Default> Default for Set<K, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, S> Set<K, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            items: HashSet::with_hasher(hasher),
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            items: HashSet::with_capacity_and_hasher(capacity, hasher),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> hashbrown::hash_set::Iter<'_, K> {
        self.items.iter()
    }
}

impl<K, S> Set<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn add(&mut self, item: K) -> &mut Self {
        self.items.insert(item);
        self
    }

    pub fn has<Q>(&self, item: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.items.contains(item)
    }

    pub fn delete<Q>(&mut self, item: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.items.remove(item)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.items.shrink_to_fit();
    }
}

impl<K, S> FromIterator<K> for Set<K, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<K, S> Extend<K> for Set<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<'a, K, S> IntoIterator for &'a Set<K, S> {
    type Item = &'a K;
    type IntoIter = hashbrown::hash_set::Iter<'a, K>;
    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<K, S> SetLike for Set<K, S>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    type Item = K;

    fn add(&mut self, item: K) -> &mut Self {
        Set::add(self, item)
    }
    fn has(&self, item: &K) -> bool {
        self.items.contains(item)
    }
    fn delete(&mut self, item: &K) -> bool {
        self.items.remove(item)
    }
    fn len(&self) -> usize {
        self.items.len()
    }
    fn clear(&mut self) {
        Set::clear(self)
    }
    fn range<F>(&self, mut f: F)
    where
        F: FnMut(&K) -> bool,
    {
        for item in &self.items {
            if !f(item) {
                break;
            }
        }
    }
    fn values(&self) -> Vec<K> {
        self.items.iter().cloned().collect()
    }
    fn all(&self) -> impl Iterator<Item = K> + '_ {
        self.items.iter().cloned()
    }
    fn delete_func<F>(&mut self, mut f: F)
    where
        F: FnMut(&K) -> bool,
    {
        self.items.retain(|item| !f(item));
    }
}

/// Writes `{"a","b"}` using each member's `Debug` form. Shared by every set
/// type so they all print alike.
pub(crate) fn fmt_members<'a, K, I>(f: &mut fmt::Formatter<'_>, members: I) -> fmt::Result
where
    K: fmt::Debug + 'a,
    I: IntoIterator<Item = &'a K>,
{
    f.write_str("{")?;
    for (i, item) in members.into_iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{:?}", item)?;
    }
    f.write_str("}")
}

impl<K: fmt::Debug, S> fmt::Display for Set<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_members(f, &self.items)
    }
}

impl<K: fmt::Debug, S> fmt::Debug for Set<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.items.iter()).finish()
    }
}
