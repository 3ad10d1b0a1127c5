//! Single-worker fill throughput.
//!
//! Run: `cargo bench -p dataset`

use core::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use dataset::run_init_worker;

fn bench_fill_rate(c: &mut Criterion) {
  let cache: Vec<u8> = (0..256 * 1024).map(|i| (i as u8).wrapping_mul(73)).collect();

  let mut group = c.benchmark_group("worker/fill");
  for size in [1usize << 20, 8 << 20] {
    let mut dataset = vec![0u8; size];

    group.throughput(Throughput::Bytes(size as u64));
    group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
      b.iter(|| {
        run_init_worker(black_box(&mut dataset), 0, size, black_box(&cache), 0);
      });
    });
  }
  group.finish();
}

criterion_group!(benches, bench_fill_rate);
criterion_main!(benches);
