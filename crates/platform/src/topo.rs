//! Cache topology hints.
//!
//! `CacheTopology` answers: "How is memory organized on this machine?"
//!
//! Unlike [`Caps`](crate::Caps) (which describes what instructions are
//! *possible*), `CacheTopology` describes the memory hierarchy that chunking,
//! prefetching, and alignment decisions are derived from:
//!
//! - cache line size (copy granularity, prefetch stride)
//! - L1/L2 data cache sizes (working-set chunk bounds)
//! - core count (affinity range, partitioning)
//!
//! # Design
//!
//! RISC-V exposes no portable instruction for cache geometry, and the
//! deployment targets (single-board RV64 machines) rarely populate sysfs
//! completely. Detection therefore starts from conservative defaults that
//! match the common single-board parts (64-byte lines, 32 KiB L1, 512 KiB
//! L2, 8 cores) and upgrades only the core count from the OS. Embedders
//! with better knowledge inject exact values via
//! [`init_with_caps`](crate::init_with_caps).

// ─────────────────────────────────────────────────────────────────────────────
// CacheTopology
// ─────────────────────────────────────────────────────────────────────────────

/// Cache and core geometry used for chunking and prefetch decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheTopology {
  /// Cache line size in bytes. Power of two, at least 8.
  pub cache_line_size: usize,
  /// L1 data cache size in bytes.
  pub l1_size: usize,
  /// L2 cache size in bytes.
  pub l2_size: usize,
  /// Number of logical cores usable for affinity pinning.
  pub num_cores: usize,
}

impl CacheTopology {
  /// Conservative defaults for unknown machines.
  ///
  /// Matches the common RV64 single-board configuration: 64-byte lines,
  /// 32 KiB L1 data, 512 KiB shared L2, 8 cores.
  pub const DEFAULT: Self = Self {
    cache_line_size: 64,
    l1_size: 32 * 1024,
    l2_size: 512 * 1024,
    num_cores: 8,
  };

  /// Create a topology with explicit values.
  ///
  /// # Panics
  ///
  /// Panics if `cache_line_size` is zero, not a power of two, or smaller
  /// than 8, or if any other field is zero. These values feed directly
  /// into alignment masks and divisions; garbage here would corrupt copies
  /// much later, so it is rejected at construction.
  #[must_use]
  pub fn new(cache_line_size: usize, l1_size: usize, l2_size: usize, num_cores: usize) -> Self {
    assert!(
      cache_line_size.is_power_of_two() && cache_line_size >= 8,
      "cache_line_size must be a power of two >= 8, got {cache_line_size}"
    );
    assert!(l1_size > 0, "l1_size must be non-zero");
    assert!(l2_size > 0, "l2_size must be non-zero");
    assert!(num_cores > 0, "num_cores must be non-zero");

    Self {
      cache_line_size,
      l1_size,
      l2_size,
      num_cores,
    }
  }

  /// Detect the topology for the current machine.
  ///
  /// Starts from [`DEFAULT`](Self::DEFAULT); with `std`, the core count is
  /// replaced by the OS-reported parallelism. Cache sizes keep their
  /// defaults (see module docs).
  #[must_use]
  pub fn detect() -> Self {
    #[allow(unused_mut)]
    let mut topo = Self::DEFAULT;

    #[cfg(feature = "std")]
    {
      if let Ok(n) = std::thread::available_parallelism() {
        topo.num_cores = n.get();
      }
    }

    topo
  }
}

impl Default for CacheTopology {
  #[inline]
  fn default() -> Self {
    Self::DEFAULT
  }
}

impl core::fmt::Display for CacheTopology {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(
      f,
      "CacheTopology(line={}, l1={}, l2={}, cores={})",
      self.cache_line_size, self.l1_size, self.l2_size, self.num_cores
    )
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
