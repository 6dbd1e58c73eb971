//! Benchmarks for the digit cipher.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use draper_rs::{draperize, undraperize, Cipher, Config};

/// Encoding cost at the default width and at the widest padded width.
fn bench_draperize(c: &mut Criterion) {
    let mut group = c.benchmark_group("draperize");
    for length in [10usize, 19] {
        group.bench_with_input(BenchmarkId::from_parameter(length), &length, |b, &length| {
            b.iter(|| draperize(black_box(1_234_567), black_box(1), length));
        });
    }
    group.finish();
}

fn bench_undraperize(c: &mut Criterion) {
    let encoded = draperize(1_234_567, 1, 10);
    c.bench_function("undraperize", |b| {
        b.iter(|| undraperize(black_box(&encoded), black_box(1)).unwrap());
    });
}

/// `Cipher::new` checks the substitution tables of every position.
fn bench_cipher_new(c: &mut Criterion) {
    let config = Config::new().spin(1);
    c.bench_function("cipher_new", |b| {
        b.iter(|| Cipher::new(black_box(&config)).unwrap());
    });
}

criterion_group!(benches, bench_draperize, bench_undraperize, bench_cipher_new);
criterion_main!(benches);
