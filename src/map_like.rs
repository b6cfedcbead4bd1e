//! MapLike: the interface shared by every map in the crate.
//!
//! Code written against `MapLike` works unchanged with [`StdMap`],
//! [`SliceMap`] and the lock wrapper [`Locked`]. Values cross the interface
//! by clone so that wrappers which cannot hand out references into guarded
//! storage still satisfy it.
//!
//! [`StdMap`]: crate::StdMap
//! [`SliceMap`]: crate::SliceMap
//! [`Locked`]: crate::Locked

use crate::equal::{equal_values, Equaler};
use core::hash::Hash;

pub trait MapLike {
    type Key: Eq + Hash + Clone;
    type Value: Clone;

    /// Insert or update `key`.
    fn set(&mut self, key: Self::Key, value: Self::Value);

    fn get(&self, key: &Self::Key) -> Option<Self::Value>;

    /// The value for `key` and whether it was present; the default value
    /// stands in for a missing key.
    fn load(&self, key: &Self::Key) -> (Self::Value, bool)
    where
        Self::Value: Default,
    {
        match self.get(key) {
            Some(v) => (v, true),
            None => (Default::default(), false),
        }
    }

    fn has(&self, key: &Self::Key) -> bool;

    /// Remove `key`, returning its value. Missing keys are a no-op.
    fn delete(&mut self, key: &Self::Key) -> Option<Self::Value>;

    fn keys(&self) -> Vec<Self::Key>;

    fn values(&self) -> Vec<Self::Value>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visit entries until `f` returns `false`.
    ///
    /// Lock wrappers hold their lock for the whole walk; calling back into the
    /// same wrapper from `f` deadlocks.
    fn range<F>(&self, f: F)
    where
        F: FnMut(&Self::Key, &Self::Value) -> bool;

    fn clear(&mut self);

    /// Upsert every entry of `other`, visited in `other`'s order.
    fn copy_from<M>(&mut self, other: &M)
    where
        M: MapLike<Key = Self::Key, Value = Self::Value> + ?Sized,
    {
        other.range(|k, v| {
            self.set(k.clone(), v.clone());
            true
        });
    }

    #[deprecated(note = "use `copy_from`")]
    fn merge<M>(&mut self, other: &M)
    where
        M: MapLike<Key = Self::Key, Value = Self::Value> + ?Sized,
    {
        self.copy_from(other);
    }

    /// Same keys with equal values, in any order.
    fn equal<M>(&self, other: &M) -> bool
    where
        M: MapLike<Key = Self::Key, Value = Self::Value> + ?Sized,
        Self::Value: Equaler,
    {
        if self.len() != other.len() {
            return false;
        }
        let mut same = true;
        other.range(|k, v| match self.get(k) {
            Some(mine) if equal_values(&mine, v) => true,
            _ => {
                same = false;
                false
            }
        });
        same
    }

    /// Iterate over owned `(key, value)` pairs.
    fn all(&self) -> impl Iterator<Item = (Self::Key, Self::Value)> + '_;

    fn keys_iter(&self) -> impl Iterator<Item = Self::Key> + '_ {
        self.all().map(|(k, _)| k)
    }

    fn values_iter(&self) -> impl Iterator<Item = Self::Value> + '_ {
        self.all().map(|(_, v)| v)
    }

    /// `set` every pair of `iter`, in order.
    fn insert<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (Self::Key, Self::Value)>,
    {
        for (k, v) in iter {
            self.set(k, v);
        }
    }

    /// Remove every entry for which `f` returns `true`.
    fn delete_func<F>(&mut self, f: F)
    where
        F: FnMut(&Self::Key, &Self::Value) -> bool;
}
