//! slice-maps: hash maps and sets that remember an order, behind one
//! interface.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a family of containers that code can swap freely because they
//!   share one contract, with an order-preserving map at the center.
//! - Layers:
//!   - SliceMap<K, V, S>: `hashbrown` table plus a `Vec` of keys giving
//!     the iteration order (insertion order, or sorted by an installed
//!     sort function). Positional reads and writes go through the vector.
//!   - StdMap / Set: thin `hashbrown` newtypes with unspecified order.
//!   - SliceSet / OrderedSet: sets layered on SliceMap and Set; OrderedSet
//!     sorts at read time with `Ord`.
//!   - Locked<M> / LockedSet<T>: `parking_lot::RwLock` around any of the
//!     above for sharing between threads.
//!   - MapLike / SetLike: the contract every container implements, so
//!     generic code and the shared test suite work across all of them.
//!
//! Constraints
//! - Between calls a SliceMap's order lists every table key exactly once.
//! - With a sort function installed the order is sorted by it; updating
//!   an existing key never moves it.
//! - Reads never fail; a missing key is `None`, `false` or the default.
//! - Decoding is all-or-nothing: on error the target is unchanged.
//!
//! Notes and non-goals
//! - Sort functions are never encoded; reinstall one after decoding into a
//!   fresh map (`SliceMap::sort_func` hands it out for that purpose).
//! - `set_at` is positional and panics while a sort function is installed.
//! - Lock wrappers make each call atomic, not sequences of calls; use
//!   `with_write` for compound updates.
//! - Nothing here logs unless the application installs a `log` backend.

mod codec;
mod equal;
mod error;
mod locked;
mod map_like;
mod ordered_set;
mod set;
mod set_like;
mod slice_map;
mod slice_map_proptest;
mod slice_set;
mod std_map;

// Public surface
pub use codec::{BinaryCodec, JsonCodec};
pub use equal::{equal_values, Equaler};
pub use error::{Error, Result};
pub use locked::{
    Locked, LockedSet, SafeMap, SafeOrderedSet, SafeSet, SafeSliceMap, SafeSliceSet,
};
pub use map_like::MapLike;
pub use ordered_set::OrderedSet;
pub use set::Set;
pub use set_like::SetLike;
pub use slice_map::{IntoIter, Iter, LessFn, SliceMap, Values};
pub use slice_set::SliceSet;
pub use std_map::StdMap;
