#![cfg(test)]

// Property tests for SliceMap kept inside the crate so they can check the
// table/order bijection directly.

use crate::slice_map::SliceMap;
use proptest::prelude::*;
use std::fmt;
use std::hash::Hasher;

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations: indices shrink to earlier keys, the pool shrinks,
// op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Set(usize, i32),
    SetAt(isize, usize, i32),
    Delete(usize),
    Get(usize),
    Has(String),
    GetAt(usize),
    DeleteOdd,
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let has_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Set(i, v)),
            2 => (-10isize..10, idx.clone(), any::<i32>()).prop_map(|(at, i, v)| OpI::SetAt(at, i, v)),
            2 => idx.clone().prop_map(OpI::Delete),
            1 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![has_pool.prop_map(|s: String| s), "[a-z]{0,5}".prop_map(|s| s)]
                .prop_map(OpI::Has),
            1 => (0usize..10).prop_map(OpI::GetAt),
            1 => Just(OpI::DeleteOdd),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Reference behavior over a plain vector of pairs.
#[derive(Default)]
struct Model {
    entries: Vec<(Key, i32)>,
    sorted: bool,
}

impl Model {
    fn position(&self, k: &Key) -> Option<usize> {
        self.entries.iter().position(|(mk, _)| mk == k)
    }

    fn set(&mut self, k: Key, v: i32) {
        if let Some(at) = self.position(&k) {
            self.entries[at].1 = v;
        } else if self.sorted {
            let at = self.entries.partition_point(|(mk, _)| mk <= &k);
            self.entries.insert(at, (k, v));
        } else {
            self.entries.push((k, v));
        }
    }

    fn set_at(&mut self, index: isize, k: Key, v: i32) {
        if index >= self.entries.len() as isize {
            self.set(k, v);
            return;
        }
        self.delete(&k);
        let len = self.entries.len() as isize;
        let at = if index <= -len {
            0
        } else if index < 0 {
            len + index
        } else {
            index
        };
        self.entries.insert(at as usize, (k, v));
    }

    fn delete(&mut self, k: &Key) -> Option<i32> {
        let at = self.position(k)?;
        Some(self.entries.remove(at).1)
    }
}

fn check_consistent<S: std::hash::BuildHasher>(
    sut: &SliceMap<Key, i32, S>,
    model: &Model,
) -> Result<(), TestCaseError> {
    // Bijection between table and order.
    prop_assert_eq!(sut.items.len(), sut.order.len());
    for k in &sut.order {
        prop_assert!(sut.items.contains_key(k));
    }
    let got: Vec<(Key, i32)> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
    prop_assert_eq!(&got, &model.entries);
    prop_assert_eq!(sut.len(), model.entries.len());
    prop_assert_eq!(sut.is_empty(), model.entries.is_empty());
    Ok(())
}

fn run_ops<S: std::hash::BuildHasher>(
    sut: &mut SliceMap<Key, i32, S>,
    model: &mut Model,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    for op in ops {
        match op {
            OpI::Set(i, v) => {
                let k = key_from(pool, i);
                sut.set(k.clone(), v);
                model.set(k, v);
            }
            OpI::SetAt(at, i, v) => {
                // Positional inserts are only legal without a sort function.
                if !model.sorted {
                    let k = key_from(pool, i);
                    sut.set_at(at, k.clone(), v);
                    model.set_at(at, k, v);
                }
            }
            OpI::Delete(i) => {
                let k = key_from(pool, i);
                prop_assert_eq!(sut.delete(&k), model.delete(&k));
            }
            OpI::Get(i) => {
                let k = key_from(pool, i);
                let want = model.position(&k).map(|at| model.entries[at].1);
                prop_assert_eq!(sut.get(&k).copied(), want);
                prop_assert_eq!(sut.load(&k), (want.unwrap_or_default(), want.is_some()));
            }
            OpI::Has(s) => {
                let has_model = model.entries.iter().any(|(k, _)| k.0 == s);
                prop_assert_eq!(sut.has(s.as_str()), has_model);
            }
            OpI::GetAt(p) => {
                let want = model.entries.get(p);
                prop_assert_eq!(sut.get_key_at(p), want.map(|(k, _)| k));
                prop_assert_eq!(sut.get_at(p), want.map(|(_, v)| v));
            }
            OpI::DeleteOdd => {
                sut.delete_func(|_, v| v % 2 != 0);
                model.entries.retain(|(_, v)| v % 2 == 0);
            }
            OpI::Clear => {
                sut.clear();
                model.entries.clear();
            }
        }
        check_consistent(sut, model)?;
    }
    Ok(())
}

// Property: state-machine equivalence against a vector of pairs in both
// insertion-ordered and key-sorted modes.
// - Order after every op equals the model's, including set_at placement,
//   negative indices and moves of existing keys.
// - Updates never move a key; deletes (single and predicate) keep the
//   table and order in step; positional reads out of range return None.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: SliceMap<Key, i32> = SliceMap::new();
        let mut model = Model::default();
        run_ops(&mut sut, &mut model, &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_sorted((pool, ops) in arb_scenario()) {
        let mut sut: SliceMap<Key, i32> = SliceMap::new();
        sut.set_sort_func(|a, b, _, _| a < b);
        let mut model = Model { sorted: true, ..Model::default() };
        run_ops(&mut sut, &mut model, &pool, ops)?;
    }
}

// Collision variant using a constant hasher so every lookup goes through
// key equality.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl std::hash::BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let mut sut: SliceMap<Key, i32, ConstBuildHasher> = SliceMap::with_hasher(ConstBuildHasher);
        let mut model = Model::default();
        run_ops(&mut sut, &mut model, &pool, ops)?;
    }
}
