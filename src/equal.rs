//! Value equality used by `equal` on maps.
//!
//! Any `PartialEq` type compares with `==`. A value type that has no
//! `PartialEq` (or wants a looser notion of equality than the one it derives
//! elsewhere) implements [`Equaler`] directly. Map equality is only available
//! when the value type has one of the two, so there is no run-time failure
//! for values that cannot be compared.

/// Custom equality capability for map values.
pub trait Equaler {
    fn equal(&self, other: &Self) -> bool;
}

impl<T> Equaler for T
where
    T: PartialEq + ?Sized,
{
    #[inline]
    fn equal(&self, other: &Self) -> bool {
        self == other
    }
}

/// Compare two values with their [`Equaler`] implementation.
#[inline]
pub fn equal_values<T>(a: &T, b: &T) -> bool
where
    T: Equaler + ?Sized,
{
    a.equal(b)
}
