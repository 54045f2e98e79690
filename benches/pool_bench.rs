//! Benchmarks for bufrs.
//!
//! Run with:
//!     cargo bench

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use bufrs::{Buffer, BufferPool, PoolConfig};

fn bench_checkout(c: &mut Criterion) {
    let mut group = c.benchmark_group("checkout");

    for size in [256usize, 4 * 1024, 64 * 1024] {
        let payload: Vec<u8> = (0..size).map(|i| (i * 7 + 13) as u8).collect();

        group.throughput(Throughput::Bytes(size as u64));

        // Pooled: get, fill, put
        let pool = BufferPool::default();
        group.bench_with_input(format!("pooled_{size}b"), &payload, |b, payload| {
            b.iter(|| {
                let mut buf = pool.get();
                buf.extend_from_slice(black_box(payload));
                let len = buf.len();
                pool.put(buf);
                black_box(len)
            });
        });

        // Baseline: fresh allocation every time
        group.bench_with_input(format!("fresh_{size}b"), &payload, |b, payload| {
            b.iter(|| {
                let mut buf = Buffer::new();
                buf.extend_from_slice(black_box(payload));
                black_box(buf.len())
            });
        });
    }

    group.finish();
}

fn bench_read_from(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_from");
    let size = 1024 * 1024; // 1 MB
    let data: Vec<u8> = (0..size).map(|i| (i * 7 + 13) as u8).collect();

    group.throughput(Throughput::Bytes(size as u64));

    group.bench_function("pooled", |b| {
        let pool = BufferPool::default();
        b.iter(|| {
            let mut buf = pool.get();
            let n = buf.read_from(&mut black_box(&data[..])).unwrap();
            pool.put(buf);
            black_box(n)
        });
    });

    group.bench_function("bootstrap", |b| {
        b.iter(|| {
            let mut buf = Buffer::new();
            let n = buf.read_from(&mut black_box(&data[..])).unwrap();
            black_box(n)
        });
    });

    group.finish();
}

fn bench_calibration(c: &mut Criterion) {
    let mut group = c.benchmark_group("calibration");

    // Every iteration's put crosses the threshold, so this measures the
    // cost of the full record + drain + percentile scan cycle.
    group.bench_function("every_put", |b| {
        let pool = BufferPool::new(PoolConfig::default().with_calibrate_threshold(1)).unwrap();
        b.iter(|| {
            let mut buf = pool.get();
            buf.extend_from_slice(black_box(&[0u8; 512]));
            pool.put(buf);
            black_box(pool.default_size())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_checkout, bench_read_from, bench_calibration);
criterion_main!(benches);
