//! Parallel dataset initialization primitives for RISC-V.
//!
//! `rvfill` fills a large precomputed working set ("dataset") in parallel
//! across CPU cores from a smaller read-only seed buffer ("cache"),
//! wrapping the cache cyclically. It bundles the pieces that job needs:
//!
//! - capability detection for the atomic/vector/bit-manipulation
//!   extensions, computed once per process
//! - lock-free atomic cells and explicit memory fences
//! - bulk byte operations (copy, fill, xor, compare) with a vector (RVV)
//!   and a scalar path that agree bit-for-bit
//! - a cache-line-aware copier with software prefetch
//! - the per-worker fill routine, with core pinning and periodic fencing
//!
//! # Quick Start
//!
//! ```
//! // Dual-path bulk ops: the selected kernel set is invisible to callers.
//! let a = [0x0Fu8; 130];
//! let b = [0xF0u8; 130];
//! let mut out = [0u8; 130];
//! rvfill::xor(&a, &b, &mut out);
//! assert!(out.iter().all(|&x| x == 0xFF));
//!
//! // Fill a dataset slice from a cyclic cache.
//! let cache: Vec<u8> = (0..4096).map(|i| i as u8).collect();
//! let mut dataset = vec![0u8; 64 * 1024];
//! rvfill::run_init_worker(&mut dataset, 0, 64 * 1024, &cache, 0);
//! assert_eq!(dataset[4096], cache[0]);
//! ```
//!
//! # Feature Flags
//!
//! | Feature   | Default | Description                                     |
//! |-----------|---------|-------------------------------------------------|
//! | `std`     | Yes     | Runtime CPU detection, `OnceLock` caching       |
//! | `dataset` | Yes     | Fill workers (threads + OS affinity, needs std) |
//!
//! Without `std`, capability detection is compile-time only and caching
//! falls back to atomics.

#![cfg_attr(not(feature = "std"), no_std)]

// =============================================================================
// Platform
// =============================================================================

pub use platform::{
  Arch,
  CacheTopology,
  Caps,
  caps,
  detect_uncached,
  get,
  has_override,
  init_with_caps,
  set_caps_override,
  topology,
};

/// Capability bit constants, by architecture.
pub mod isa {
  pub use platform::caps::riscv;
}

// =============================================================================
// Atomics, Fences, Bits
// =============================================================================

pub use atomics::{Atomic32, Atomic64, bits, fence, ordering_path};

// =============================================================================
// Bulk Operations
// =============================================================================

pub use bulk::{compare, copy, copy_aligned, fill, kernel_name, prefetch, xor};

// =============================================================================
// Dataset Workers
// =============================================================================

#[cfg(feature = "dataset")]
pub use dataset::{
  Progress,
  optimal_thread_count,
  partition_chunk_size,
  pin_current_thread,
  run_init_worker,
  run_init_worker_with_progress,
  work_chunk_size,
};

// =============================================================================
// Facade smoke tests
// =============================================================================

#[cfg(test)]
mod tests {
  #[test]
  fn detection_and_kernels_are_consistent() {
    let caps = crate::caps();
    let kernel = crate::kernel_name();

    if kernel == "riscv64/rvv" {
      assert!(caps.has_vector());
    }
    assert!(crate::ordering_path() == "amo" || crate::ordering_path() == "relaxed");
  }

  #[cfg(feature = "dataset")]
  #[test]
  fn end_to_end_fill_through_the_facade() {
    let cache: Vec<u8> = (0..1024).map(|i| (i % 251) as u8).collect();
    let mut dataset = vec![0u8; 10_000];

    crate::run_init_worker(&mut dataset, 0, 10_000, &cache, 0);
    for i in 0..10_000 {
      assert_eq!(dataset[i], cache[i % 1024]);
    }
  }
}
