//! OrderedSet: a hash set whose reads come back in `Ord` order.
//!
//! Writes go straight to a plain [`Set`]; every ordered read (values, range,
//! iteration, display, encoding) collects and sorts the members first.

use crate::set::{fmt_members, Set};
use crate::set_like::SetLike;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

#[derive(Clone)]
pub struct OrderedSet<K, S = RandomState> {
    pub(crate) set: Set<K, S>,
}

impl<K> OrderedSet<K> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K, S: Default> Default for OrderedSet<K, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, S> OrderedSet<K, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            set: Set::with_hasher(hasher),
        }
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Borrowed members, sorted.
    pub fn sorted(&self) -> Vec<&K>
    where
        K: Ord,
    {
        let mut members: Vec<&K> = self.set.iter().collect();
        members.sort_unstable();
        members
    }
}

impl<K, S> OrderedSet<K, S>
where
    K: Ord + Hash + Clone,
    S: BuildHasher,
{
    pub fn add(&mut self, item: K) -> &mut Self {
        self.set.add(item);
        self
    }

    pub fn has<Q>(&self, item: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.set.has(item)
    }

    pub fn delete<Q>(&mut self, item: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.set.delete(item)
    }

    /// Owned members, sorted.
    pub fn values(&self) -> Vec<K> {
        self.sorted().into_iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.set.clear();
    }
}

impl<K, S> FromIterator<K> for OrderedSet<K, S>
where
    K: Ord + Hash + Clone,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            set: iter.into_iter().collect(),
        }
    }
}

impl<K, S> Extend<K> for OrderedSet<K, S>
where
    K: Ord + Hash + Clone,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        self.set.extend(iter);
    }
}

impl<K, S> SetLike for OrderedSet<K, S>
where
    K: Ord + Hash + Clone,
    S: BuildHasher,
{
    type Item = K;

    fn add(&mut self, item: K) -> &mut Self {
        OrderedSet::add(self, item)
    }
    fn has(&self, item: &K) -> bool {
        self.set.has(item)
    }
    fn delete(&mut self, item: &K) -> bool {
        self.set.delete(item)
    }
    fn len(&self) -> usize {
        self.set.len()
    }
    fn clear(&mut self) {
        self.set.clear()
    }
    fn range<F>(&self, mut f: F)
    where
        F: FnMut(&K) -> bool,
    {
        for item in self.sorted() {
            if !f(item) {
                break;
            }
        }
    }
    fn values(&self) -> Vec<K> {
        OrderedSet::values(self)
    }
    fn all(&self) -> impl Iterator<Item = K> + '_ {
        self.sorted().into_iter().cloned()
    }
    fn delete_func<F>(&mut self, f: F)
    where
        F: FnMut(&K) -> bool,
    {
        SetLike::delete_func(&mut self.set, f)
    }
}

impl<K: Ord + fmt::Debug, S> fmt::Display for OrderedSet<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_members(f, self.sorted())
    }
}

impl<K: Ord + fmt::Debug, S> fmt::Debug for OrderedSet<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.sorted()).finish()
    }
}
