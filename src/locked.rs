//! Locked / LockedSet: readers-writer lock around any map or set.
//!
//! Every mutating call takes the write lock and every read takes the read
//! lock, so a `Locked<M>` can be shared between threads behind an `Arc` and
//! used through `&self`. Guards are released on every exit path, including
//! unwinding out of a user callback (`parking_lot` locks do not poison).
//!
//! Each call is atomic on its own; sequences of calls are not. Use
//! [`Locked::with_write`] for compound updates. Calling back into the same
//! wrapper from inside a `range` visitor deadlocks.
//!
//! The `MapLike`/`SetLike` impls take `&mut self` and reach the inner
//! container through `RwLock::get_mut` without locking, so generic code pays
//! nothing for the lock when it already has exclusive access.

use crate::equal::{equal_values, Equaler};
use crate::map_like::MapLike;
use crate::ordered_set::OrderedSet;
use crate::set::Set;
use crate::set_like::SetLike;
use crate::slice_map::SliceMap;
use crate::slice_set::SliceSet;
use crate::std_map::StdMap;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use parking_lot::RwLock;
use std::collections::hash_map::RandomState;

/// Thread-safe map wrapper.
pub struct Locked<M> {
    inner: RwLock<M>,
}

/// Thread-safe set wrapper.
pub struct LockedSet<T> {
    inner: RwLock<T>,
}

pub type SafeMap<K, V, S = RandomState> = Locked<StdMap<K, V, S>>;
pub type SafeSliceMap<K, V, S = RandomState> = Locked<SliceMap<K, V, S>>;
pub type SafeSet<K, S = RandomState> = LockedSet<Set<K, S>>;
pub type SafeSliceSet<K, S = RandomState> = LockedSet<SliceSet<K, S>>;
pub type SafeOrderedSet<K, S = RandomState> = LockedSet<OrderedSet<K, S>>;

// Shared plumbing for both wrappers; only the contract-specific methods
// differ.
macro_rules! lock_plumbing {
    ($wrapper:ident) => {
        impl<T> $wrapper<T> {
            pub fn new(inner: T) -> Self {
                Self {
                    inner: RwLock::new(inner),
                }
            }

            pub fn into_inner(self) -> T {
                self.inner.into_inner()
            }

            /// Exclusive access without locking.
            pub fn get_mut(&mut self) -> &mut T {
                self.inner.get_mut()
            }

            /// Run `f` with the read lock held.
            pub fn with_read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
                f(&*self.inner.read())
            }

            /// Run `f` with the write lock held; use for read-modify-write
            /// sequences that must be atomic.
            pub fn with_write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
                f(&mut *self.inner.write())
            }
        }

        impl<T: Default> Default for $wrapper<T> {
            fn default() -> Self {
                Self::new(T::default())
            }
        }

        impl<T> From<T> for $wrapper<T> {
            fn from(inner: T) -> Self {
                Self::new(inner)
            }
        }

        /// Clones the contents under one read lock into a fresh lock.
        impl<T: Clone> Clone for $wrapper<T> {
            fn clone(&self) -> Self {
                Self::new(self.inner.read().clone())
            }
        }

        impl<T: fmt::Display> fmt::Display for $wrapper<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&*self.inner.read(), f)
            }
        }

        impl<T: fmt::Debug> fmt::Debug for $wrapper<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(&*self.inner.read(), f)
            }
        }
    };
}

lock_plumbing!(Locked);
lock_plumbing!(LockedSet);

impl<M: MapLike> Locked<M> {
    pub fn set(&self, key: M::Key, value: M::Value) {
        self.inner.write().set(key, value);
    }

    pub fn get(&self, key: &M::Key) -> Option<M::Value> {
        self.inner.read().get(key)
    }

    pub fn load(&self, key: &M::Key) -> (M::Value, bool)
    where
        M::Value: Default,
    {
        self.inner.read().load(key)
    }

    pub fn has(&self, key: &M::Key) -> bool {
        self.inner.read().has(key)
    }

    pub fn delete(&self, key: &M::Key) -> Option<M::Value> {
        self.inner.write().delete(key)
    }

    pub fn keys(&self) -> Vec<M::Key> {
        self.inner.read().keys()
    }

    pub fn values(&self) -> Vec<M::Value> {
        self.inner.read().values()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Visit entries with the read lock held for the whole walk.
    pub fn range<F>(&self, f: F)
    where
        F: FnMut(&M::Key, &M::Value) -> bool,
    {
        self.inner.read().range(f);
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Upsert every entry of `other`. `other` is read first, then this map is
    /// written, so copying a wrapper into itself does not deadlock.
    pub fn copy_from<O>(&self, other: &O)
    where
        O: MapLike<Key = M::Key, Value = M::Value> + ?Sized,
    {
        let entries: Vec<_> = other.all().collect();
        self.inner.write().insert(entries);
    }

    /// Order-free comparison with `other`. `other` is snapshotted before
    /// this map's read lock is taken, so the two locks are never held
    /// together and crossed or self comparisons cannot deadlock.
    pub fn equal<O>(&self, other: &O) -> bool
    where
        O: MapLike<Key = M::Key, Value = M::Value> + ?Sized,
        M::Value: Equaler,
    {
        let entries: Vec<_> = other.all().collect();
        let inner = self.inner.read();
        inner.len() == entries.len()
            && entries
                .iter()
                .all(|(k, v)| matches!(inner.get(k), Some(mine) if equal_values(&mine, v)))
    }

    /// Snapshot of the entries taken under one read lock.
    pub fn all(&self) -> std::vec::IntoIter<(M::Key, M::Value)> {
        let entries: Vec<_> = self.inner.read().all().collect();
        entries.into_iter()
    }

    pub fn insert<I>(&self, iter: I)
    where
        I: IntoIterator<Item = (M::Key, M::Value)>,
    {
        self.inner.write().insert(iter);
    }

    pub fn delete_func<F>(&self, f: F)
    where
        F: FnMut(&M::Key, &M::Value) -> bool,
    {
        self.inner.write().delete_func(f);
    }
}

impl<K, V, S> Locked<SliceMap<K, V, S>>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// See [`SliceMap::set_at`]; panics the same way, releasing the lock.
    pub fn set_at(&self, index: isize, key: K, value: V) {
        self.inner.write().set_at(index, key, value);
    }

    pub fn get_at(&self, position: usize) -> Option<V> {
        self.inner.read().get_at(position).cloned()
    }

    pub fn get_key_at(&self, position: usize) -> Option<K> {
        self.inner.read().get_key_at(position).cloned()
    }

    pub fn set_sort_func<F>(&self, f: F)
    where
        F: Fn(&K, &K, &V, &V) -> bool + Send + Sync + 'static,
    {
        self.inner.write().set_sort_func(f);
    }

    pub fn clear_sort_func(&self) {
        self.inner.write().clear_sort_func();
    }
}

impl<M: MapLike> MapLike for Locked<M> {
    type Key = M::Key;
    type Value = M::Value;

    fn set(&mut self, key: M::Key, value: M::Value) {
        self.inner.get_mut().set(key, value)
    }
    fn get(&self, key: &M::Key) -> Option<M::Value> {
        self.inner.read().get(key)
    }
    fn has(&self, key: &M::Key) -> bool {
        self.inner.read().has(key)
    }
    fn delete(&mut self, key: &M::Key) -> Option<M::Value> {
        self.inner.get_mut().delete(key)
    }
    fn keys(&self) -> Vec<M::Key> {
        self.inner.read().keys()
    }
    fn values(&self) -> Vec<M::Value> {
        self.inner.read().values()
    }
    fn len(&self) -> usize {
        self.inner.read().len()
    }
    fn range<F>(&self, f: F)
    where
        F: FnMut(&M::Key, &M::Value) -> bool,
    {
        self.inner.read().range(f)
    }
    fn clear(&mut self) {
        self.inner.get_mut().clear()
    }
    fn all(&self) -> impl Iterator<Item = (M::Key, M::Value)> + '_ {
        Locked::all(self)
    }
    fn equal<O>(&self, other: &O) -> bool
    where
        O: MapLike<Key = M::Key, Value = M::Value> + ?Sized,
        Self::Value: Equaler,
    {
        Locked::equal(self, other)
    }
    fn delete_func<F>(&mut self, f: F)
    where
        F: FnMut(&M::Key, &M::Value) -> bool,
    {
        self.inner.get_mut().delete_func(f)
    }
}

impl<T: SetLike> LockedSet<T> {
    /// Add `item`; returns `self` so calls can be chained.
    pub fn add(&self, item: T::Item) -> &Self {
        self.inner.write().add(item);
        self
    }

    pub fn has(&self, item: &T::Item) -> bool {
        self.inner.read().has(item)
    }

    pub fn delete(&self, item: &T::Item) -> bool {
        self.inner.write().delete(item)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Visit members with the read lock held for the whole walk.
    pub fn range<F>(&self, f: F)
    where
        F: FnMut(&T::Item) -> bool,
    {
        self.inner.read().range(f);
    }

    pub fn values(&self) -> Vec<T::Item> {
        self.inner.read().values()
    }

    pub fn copy_from<O>(&self, other: &O)
    where
        O: SetLike<Item = T::Item> + ?Sized,
    {
        let items: Vec<_> = other.all().collect();
        self.inner.write().insert(items);
    }

    /// Same locking discipline as [`Locked::equal`].
    pub fn equal<O>(&self, other: &O) -> bool
    where
        O: SetLike<Item = T::Item> + ?Sized,
    {
        let items: Vec<_> = other.all().collect();
        let inner = self.inner.read();
        inner.len() == items.len() && items.iter().all(|item| inner.has(item))
    }

    /// Snapshot of the members taken under one read lock.
    pub fn all(&self) -> std::vec::IntoIter<T::Item> {
        self.values().into_iter()
    }

    pub fn insert<I>(&self, iter: I)
    where
        I: IntoIterator<Item = T::Item>,
    {
        self.inner.write().insert(iter);
    }

    pub fn delete_func<F>(&self, f: F)
    where
        F: FnMut(&T::Item) -> bool,
    {
        self.inner.write().delete_func(f);
    }
}

impl<K, S> LockedSet<SliceSet<K, S>>
where
    K: Eq + Hash + Clone,
    S: BuildHasher,
{
    pub fn set_sort_func<F>(&self, less: F)
    where
        F: Fn(&K, &K) -> bool + Send + Sync + 'static,
    {
        self.inner.write().set_sort_func(less);
    }

    pub fn get_at(&self, position: usize) -> Option<K> {
        self.inner.read().get_at(position).cloned()
    }
}

impl<T: SetLike> SetLike for LockedSet<T> {
    type Item = T::Item;

    fn add(&mut self, item: T::Item) -> &mut Self {
        self.inner.get_mut().add(item);
        self
    }
    fn has(&self, item: &T::Item) -> bool {
        self.inner.read().has(item)
    }
    fn delete(&mut self, item: &T::Item) -> bool {
        self.inner.get_mut().delete(item)
    }
    fn len(&self) -> usize {
        self.inner.read().len()
    }
    fn clear(&mut self) {
        self.inner.get_mut().clear()
    }
    fn range<F>(&self, f: F)
    where
        F: FnMut(&T::Item) -> bool,
    {
        self.inner.read().range(f)
    }
    fn values(&self) -> Vec<T::Item> {
        self.inner.read().values()
    }
    fn all(&self) -> impl Iterator<Item = T::Item> + '_ {
        LockedSet::all(self)
    }
    fn equal<O>(&self, other: &O) -> bool
    where
        O: SetLike<Item = T::Item> + ?Sized,
    {
        LockedSet::equal(self, other)
    }
    fn delete_func<F>(&mut self, f: F)
    where
        F: FnMut(&T::Item) -> bool,
    {
        self.inner.get_mut().delete_func(f)
    }
}
