//! Thread-count policy for dataset initialization.
//!
//! Filling is memory-bound, not compute-bound: past a point, extra
//! threads only fight over the shared L2 and the memory controller. The
//! policy therefore scales the thread count with the region size, using
//! every core only when the region dwarfs the cache hierarchy.

const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * MIB;

/// Number of worker threads to use for a region of `dataset_size` bytes
/// on a machine with `core_count` cores.
///
/// - above 1 GiB: every core
/// - above 256 MiB: three quarters of the cores
/// - otherwise: half the cores
///
/// Always at least 1, never more than `core_count` (for any
/// `core_count >= 1`), and non-decreasing in `dataset_size`.
#[must_use]
pub fn optimal_thread_count(dataset_size: u64, core_count: usize) -> usize {
  let threads = if dataset_size > GIB {
    core_count
  } else if dataset_size > 256 * MIB {
    core_count * 3 / 4
  } else {
    core_count / 2
  };

  threads.max(1)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod proptests {
  use proptest::prelude::*;

  use super::*;

  proptest! {
    /// Non-decreasing in dataset size for a fixed core count.
    #[test]
    fn monotone_in_size(cores in 1usize..=256, a in any::<u64>(), b in any::<u64>()) {
      let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
      prop_assert!(optimal_thread_count(lo, cores) <= optimal_thread_count(hi, cores));
    }

    /// Bounded by [1, core_count].
    #[test]
    fn within_bounds(cores in 1usize..=256, size in any::<u64>()) {
      let threads = optimal_thread_count(size, cores);
      prop_assert!(threads >= 1);
      prop_assert!(threads <= cores);
    }
  }
}
