use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use slice_maps::{BinaryCodec, SafeSliceMap, SliceMap};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(n: usize, seed: u64) -> (SliceMap<String, u64>, Vec<String>) {
    let keys: Vec<_> = lcg(seed).take(n).map(key).collect();
    let mut m = SliceMap::new();
    for (i, k) in keys.iter().enumerate() {
        m.set(k.clone(), i as u64);
    }
    (m, keys)
}

fn bench_set_fifo(c: &mut Criterion) {
    let keys: Vec<_> = lcg(1).take(10_000).map(key).collect();
    c.bench_function("slice_map_set_fifo_10k", |b| {
        b.iter_batched(
            || keys.clone(),
            |keys| {
                let mut m = SliceMap::new();
                for (i, k) in keys.into_iter().enumerate() {
                    m.set(k, i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_set_sorted(c: &mut Criterion) {
    let keys: Vec<_> = lcg(3).take(2_000).map(key).collect();
    c.bench_function("slice_map_set_sorted_2k", |b| {
        b.iter_batched(
            || keys.clone(),
            |keys| {
                let mut m = SliceMap::new();
                m.set_sort_func(|a: &String, b: &String, _: &u64, _: &u64| a < b);
                for (i, k) in keys.into_iter().enumerate() {
                    m.set(k, i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    let (m, keys) = filled(20_000, 7);
    let mut it = keys.iter().cycle();
    c.bench_function("slice_map_get_hit", |b| {
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(m.get(k));
        })
    });
}

fn bench_delete_reinsert(c: &mut Criterion) {
    let (mut m, keys) = filled(5_000, 11);
    let mut it = keys.iter().cycle();
    c.bench_function("slice_map_delete_reinsert_5k", |b| {
        b.iter(|| {
            let k = it.next().unwrap();
            let v = m.delete(k).unwrap();
            m.set(k.clone(), v);
        })
    });
}

fn bench_iterate(c: &mut Criterion) {
    let (m, _) = filled(10_000, 13);
    c.bench_function("slice_map_iterate_10k", |b| {
        b.iter(|| black_box(m.iter().map(|(_, v)| *v).sum::<u64>()))
    });
}

fn bench_binary_round_trip(c: &mut Criterion) {
    let (m, _) = filled(10_000, 17);
    c.bench_function("slice_map_binary_round_trip_10k", |b| {
        b.iter(|| {
            let bytes = m.marshal_binary().unwrap();
            let mut back: SliceMap<String, u64> = SliceMap::new();
            back.unmarshal_binary(&bytes).unwrap();
            black_box(back)
        })
    });
}

fn bench_locked_set_get(c: &mut Criterion) {
    let m: SafeSliceMap<String, u64> = filled(10_000, 19).0.into();
    let keys: Vec<_> = m.keys();
    let mut it = keys.iter().cycle();
    c.bench_function("safe_slice_map_get_set", |b| {
        b.iter(|| {
            let k = it.next().unwrap();
            let v = m.get(k).unwrap_or(0);
            m.set(k.clone(), v + 1);
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_set_fifo, bench_set_sorted, bench_get_hit, bench_delete_reinsert,
        bench_iterate, bench_binary_round_trip, bench_locked_set_get
}
criterion_main!(benches);
