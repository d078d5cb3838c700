//! Benchmarks for the note registry hot paths.
//!
//! Run with: cargo bench
//!
//! Nothing here sits on an audio deadline, but key-range changes happen on
//! the UI thread while a render may be pending, so the worst-case scans
//! (128-key search per note) should stay comfortably in the microseconds.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tempodrone_core::{build_snapshot, KeyRange, NoteRegistry, SoundParams};

const KEY_COUNT: usize = 128;

/// Sparse mask: only the extremes valid, forcing maximal scans.
fn sparse_mask() -> KeyRange {
    let mut valid = [false; KEY_COUNT];
    for key in 0..12 {
        valid[key] = true;
    }
    valid[127] = true;
    KeyRange::try_new(valid).unwrap()
}

fn bench_round_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry/round_key");

    // Dense: desired key already valid, search terminates immediately.
    let mut dense = NoteRegistry::new(1);
    let dense_handle = dense.add_note().unwrap();
    group.bench_function("dense", |b| {
        b.iter(|| dense.round_key(dense_handle, black_box(60)).unwrap())
    });

    // Sparse: full forward scan plus a near-full backward scan.
    let mut sparse = NoteRegistry::new(1);
    let sparse_handle = sparse.add_note().unwrap();
    sparse.set_key_range(sparse_mask()).unwrap();
    group.bench_function("sparse", |b| {
        b.iter(|| sparse.round_key(sparse_handle, black_box(60)).unwrap())
    });

    group.finish();
}

fn bench_key_range_change(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry/set_key_range");

    for &notes in &[1usize, 8, 32] {
        let mut registry = NoteRegistry::new(notes);
        for _ in 0..notes {
            registry.add_note().unwrap();
        }
        let narrow = KeyRange::from_bounds(48, 72).unwrap();
        let open = KeyRange::full();
        group.bench_with_input(BenchmarkId::from_parameter(notes), &notes, |b, _| {
            b.iter(|| {
                registry.set_key_range(black_box(narrow.clone())).unwrap();
                registry.set_key_range(black_box(open.clone())).unwrap();
            })
        });
    }

    group.finish();
}

fn bench_build_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/build_snapshot");

    for &notes in &[1usize, 8, 32] {
        let mut registry = NoteRegistry::new(notes);
        for _ in 0..notes {
            registry.add_note().unwrap();
        }
        let params = SoundParams::new(6);
        group.bench_with_input(BenchmarkId::from_parameter(notes), &notes, |b, _| {
            b.iter(|| build_snapshot(black_box(&registry), black_box(&params)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_round_key,
    bench_key_range_change,
    bench_build_snapshot,
);
criterion_main!(benches);
