//! SetLike: the interface shared by every set in the crate.

use core::hash::Hash;

pub trait SetLike {
    type Item: Eq + Hash + Clone;

    /// Add `item`; adding a present item changes nothing. Returns `self` so
    /// calls can be chained.
    fn add(&mut self, item: Self::Item) -> &mut Self;

    fn has(&self, item: &Self::Item) -> bool;

    /// Remove `item`, reporting whether it was present.
    fn delete(&mut self, item: &Self::Item) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);

    /// Visit members until `f` returns `false`.
    fn range<F>(&self, f: F)
    where
        F: FnMut(&Self::Item) -> bool;

    fn values(&self) -> Vec<Self::Item>;

    /// Add every member of `other`.
    fn copy_from<T>(&mut self, other: &T)
    where
        T: SetLike<Item = Self::Item> + ?Sized,
    {
        other.range(|item| {
            self.add(item.clone());
            true
        });
    }

    #[deprecated(note = "use `copy_from`")]
    fn merge<T>(&mut self, other: &T)
    where
        T: SetLike<Item = Self::Item> + ?Sized,
    {
        self.copy_from(other);
    }

    /// Same members, in any order.
    fn equal<T>(&self, other: &T) -> bool
    where
        T: SetLike<Item = Self::Item> + ?Sized,
    {
        if self.len() != other.len() {
            return false;
        }
        let mut same = true;
        other.range(|item| {
            same = self.has(item);
            same
        });
        same
    }

    fn all(&self) -> impl Iterator<Item = Self::Item> + '_;

    fn insert<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = Self::Item>,
    {
        for item in iter {
            self.add(item);
        }
    }

    /// Remove every member for which `f` returns `true`.
    fn delete_func<F>(&mut self, f: F)
    where
        F: FnMut(&Self::Item) -> bool;
}
