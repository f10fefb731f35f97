//! Performance benchmarks for the combinatorial core.
//!
//! Run with: `cargo bench --bench canonical`
//!
//! ## Scaling
//!
//! | Operation | Cost | Notes |
//! |-----------|------|-------|
//! | Canonicalize | O(n²) | All rotations, each renumbered |
//! | Genus | O(n) | Face tracing over half-edges |
//! | Complete neighbors | O(n³) | Dominated by R3 triples |
//! | Subdiagrams | O(2ⁿ · n²) | One canonicalization per subset |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use gauss_kernel::{
    enumerate_complete_neighbors, explore, genus, subdiagrams, Code, ElementModel, ExplorePolicyV1,
};

/// Alternating closed braid of `n` chords: `O0 U1 O2 ... U0 O1 U2 ...`.
fn braid(n: usize) -> Code {
    let mut text = String::new();
    for pass in 0..2 {
        for id in 0..n {
            let role = if (id + pass) % 2 == 0 { 'O' } else { 'U' };
            text.push_str(&format!("{}+{}", role, id));
        }
    }
    Code::parse(&text).unwrap_or_else(|e| panic!("bad bench code {}: {}", text, e))
}

/// Same braid, rotated so canonicalization has work to do.
fn rotated_braid(n: usize) -> Code {
    let code = braid(n);
    let mut elements = code.elements().to_vec();
    elements.rotate_left(n / 2 + 1);
    Code::new(elements)
}

fn bench_canonicalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonicalize");

    for n in [3, 6, 9, 12] {
        let code = rotated_braid(n);
        group.throughput(Throughput::Elements(code.len() as u64));
        group.bench_with_input(BenchmarkId::new("chords", n), &code, |b, code| {
            b.iter(|| black_box(code).canonicalize())
        });
    }

    group.finish();
}

fn bench_genus(c: &mut Criterion) {
    let mut group = c.benchmark_group("genus");

    for n in [3, 6, 9, 12] {
        let code = braid(n);
        group.bench_with_input(BenchmarkId::new("chords", n), &code, |b, code| {
            b.iter(|| genus(black_box(code)))
        });
    }

    group.finish();
}

fn bench_complete_neighbors(c: &mut Criterion) {
    let mut group = c.benchmark_group("complete_neighbors");

    for n in [1, 3, 5] {
        let code = braid(n);
        group.bench_with_input(BenchmarkId::new("chords", n), &code, |b, code| {
            b.iter(|| enumerate_complete_neighbors(black_box(code), ElementModel::Oriented))
        });
    }

    group.finish();
}

fn bench_subdiagrams(c: &mut Criterion) {
    let mut group = c.benchmark_group("subdiagrams");

    for n in [4, 6, 8] {
        let code = braid(n);
        group.throughput(Throughput::Elements(1 << n));
        group.bench_with_input(BenchmarkId::new("chords", n), &code, |b, code| {
            b.iter(|| subdiagrams(black_box(code), 12))
        });
    }

    group.finish();
}

fn bench_explore_default(c: &mut Criterion) {
    let policy = ExplorePolicyV1::default();
    c.bench_function("explore_default", |b| {
        b.iter(|| {
            let report = explore(black_box(&policy))
                .unwrap_or_else(|e| panic!("explore failed: {}", e));
            assert!(report.is_consistent());
            report
        })
    });
}

criterion_group!(
    benches,
    bench_canonicalize,
    bench_genus,
    bench_complete_neighbors,
    bench_subdiagrams,
    bench_explore_default,
);

criterion_main!(benches);
