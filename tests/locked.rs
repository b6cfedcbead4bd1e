use slice_maps::{Locked, SafeMap, SafeOrderedSet, SafeSliceMap, SafeSliceSet, SliceMap};
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const PER_THREAD: usize = 200;

/// Invariant: concurrent writers through `&self` never lose an entry and the
/// order stays a bijection with the table.
#[test]
fn concurrent_writers_and_readers() {
    let m: Arc<SafeSliceMap<String, usize>> = Arc::new(Locked::default());
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let m = Arc::clone(&m);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let k = format!("t{t}-{i}");
                    m.set(k.clone(), i);
                    assert_eq!(m.get(&k), Some(i));
                    // Readers interleave with writers.
                    let _ = m.keys().len();
                    if i % 4 == 0 {
                        m.delete(&k);
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let expected = THREADS * (PER_THREAD - PER_THREAD / 4);
    assert_eq!(m.len(), expected);
    assert_eq!(m.keys().len(), expected);
    assert_eq!(m.values().len(), expected);

    // Each thread's surviving keys keep that thread's insertion order.
    let keys = m.keys();
    for t in 0..THREADS {
        let prefix = format!("t{t}-");
        let seq: Vec<usize> = keys
            .iter()
            .filter_map(|k| k.strip_prefix(&prefix))
            .map(|n| n.parse().unwrap())
            .collect();
        assert!(seq.windows(2).all(|w| w[0] < w[1]));
    }
}

/// Invariant: `with_write` makes a read-modify-write atomic across threads.
#[test]
fn compound_updates_with_write() {
    let m: Arc<SafeMap<&'static str, u64>> = Arc::new(Locked::default());
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let m = Arc::clone(&m);
            thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    m.with_write(|inner| {
                        let n = inner.get("hits").copied().unwrap_or(0);
                        inner.set("hits", n + 1);
                    });
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(m.get(&"hits"), Some((THREADS * PER_THREAD) as u64));
}

#[test]
fn sorted_map_under_lock() {
    let m: SafeSliceMap<u32, u32> = Locked::default();
    m.set_sort_func(|a, b, _, _| a < b);
    let shared = Arc::new(m);
    let handles: Vec<_> = (0..4u32)
        .map(|t| {
            let m = Arc::clone(&shared);
            thread::spawn(move || {
                for i in 0..50u32 {
                    m.set(i * 4 + t, i);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(shared.keys(), (0..200).collect::<Vec<_>>());
    assert_eq!(shared.get_key_at(0), Some(0));
    assert_eq!(shared.get_at(199), Some(49));
}

#[test]
fn locked_sets_share_across_threads() {
    let s: Arc<SafeSliceSet<u32>> = Arc::new(Default::default());
    let o: Arc<SafeOrderedSet<u32>> = Arc::new(Default::default());
    let handles: Vec<_> = (0..4u32)
        .map(|t| {
            let (s, o) = (Arc::clone(&s), Arc::clone(&o));
            thread::spawn(move || {
                for i in 0..25u32 {
                    s.add(i).add(100 + t);
                    o.add(i * 4 + t);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(s.len(), 29);
    assert_eq!(o.values(), (0..100).collect::<Vec<_>>());
    assert_eq!(o.to_string().matches(',').count(), 99);
}

#[test]
fn snapshots_and_clone_are_detached() {
    let m: SafeSliceMap<i32, i32> = Locked::new((0..5).map(|i| (i, i)).collect::<SliceMap<_, _>>());
    let snapshot = m.all();
    let copy = m.clone();
    m.clear();
    assert_eq!(snapshot.count(), 5);
    assert_eq!(copy.len(), 5);
    assert!(m.is_empty());
    assert_eq!(copy.into_inner().keys(), [0, 1, 2, 3, 4]);
}

/// Invariant: `equal` never holds both wrappers' locks at once, so crossed
/// and self comparisons finish while writers are queued on both maps.
#[test]
fn crossed_equal_with_writers() {
    const ROUNDS: u32 = 2_000;
    let a: Arc<SafeSliceMap<u32, u32>> = Arc::new(Locked::default());
    let b: Arc<SafeSliceMap<u32, u32>> = Arc::new(Locked::default());
    let sa: Arc<SafeSliceSet<u32>> = Arc::new(Default::default());
    let sb: Arc<SafeSliceSet<u32>> = Arc::new(Default::default());

    let mut handles = Vec::new();
    for flip in [false, true] {
        let (x, y) = if flip { (&b, &a) } else { (&a, &b) };
        let (x, y) = (Arc::clone(x), Arc::clone(y));
        let (sx, sy) = if flip { (&sb, &sa) } else { (&sa, &sb) };
        let (sx, sy) = (Arc::clone(sx), Arc::clone(sy));
        handles.push(thread::spawn(move || {
            for _ in 0..ROUNDS {
                let _ = x.equal(&*y);
                let _ = x.equal(&*x);
                let _ = sx.equal(&*sy);
                let _ = sx.equal(&*sx);
            }
        }));
    }
    for (m, s) in [(&a, &sa), (&b, &sb)] {
        let (m, s) = (Arc::clone(m), Arc::clone(s));
        handles.push(thread::spawn(move || {
            for i in 0..ROUNDS {
                m.set(i % 64, i);
                s.add(i % 64);
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    assert!(a.equal(&*b));
    assert!(sa.equal(&*sb));
}
