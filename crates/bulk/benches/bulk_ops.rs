//! Bulk operation benchmarks across representative buffer sizes.
//!
//! Run: `cargo bench -p bulk`
//! Native: `RUSTFLAGS='-C target-cpu=native' cargo bench -p bulk`

use core::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

/// Standard benchmark sizes.
const SIZES: [usize; 5] = [64, 256, 4096, 65536, 1048576];

fn pattern(len: usize, seed: u8) -> Vec<u8> {
  (0..len).map(|i| (i as u8).wrapping_mul(59).wrapping_add(seed)).collect()
}

fn bench_copy(c: &mut Criterion) {
  let mut group = c.benchmark_group("bulk/copy");
  eprintln!("bulk kernels: {}", bulk::kernel_name());

  for size in SIZES {
    let src = pattern(size, 1);
    let mut dst = vec![0u8; size];

    group.throughput(Throughput::Bytes(size as u64));
    group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
      b.iter(|| bulk::copy(black_box(&mut dst), black_box(&src)));
    });
  }
  group.finish();
}

fn bench_copy_aligned(c: &mut Criterion) {
  let mut group = c.benchmark_group("bulk/copy_aligned");
  for size in SIZES {
    let src = pattern(size, 2);
    let mut dst = vec![0u8; size];

    group.throughput(Throughput::Bytes(size as u64));
    group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
      b.iter(|| bulk::copy_aligned(black_box(&mut dst), black_box(&src), 64));
    });
  }
  group.finish();
}

fn bench_fill(c: &mut Criterion) {
  let mut group = c.benchmark_group("bulk/fill");
  for size in SIZES {
    let mut dst = vec![0u8; size];

    group.throughput(Throughput::Bytes(size as u64));
    group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
      b.iter(|| bulk::fill(black_box(&mut dst), black_box(0x5A)));
    });
  }
  group.finish();
}

fn bench_xor(c: &mut Criterion) {
  let mut group = c.benchmark_group("bulk/xor");
  for size in SIZES {
    let a = pattern(size, 3);
    let b_buf = pattern(size, 4);
    let mut out = vec![0u8; size];

    group.throughput(Throughput::Bytes(size as u64));
    group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
      b.iter(|| bulk::xor(black_box(&a), black_box(&b_buf), black_box(&mut out)));
    });
  }
  group.finish();
}

fn bench_compare(c: &mut Criterion) {
  let mut group = c.benchmark_group("bulk/compare");
  for size in SIZES {
    // Equal buffers: worst case, the whole range is scanned.
    let a = pattern(size, 5);
    let b_buf = a.clone();

    group.throughput(Throughput::Bytes(size as u64));
    group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
      b.iter(|| black_box(bulk::compare(black_box(&a), black_box(&b_buf))));
    });
  }
  group.finish();
}

criterion_group!(benches, bench_copy, bench_copy_aligned, bench_fill, bench_xor, bench_compare);
criterion_main!(benches);
