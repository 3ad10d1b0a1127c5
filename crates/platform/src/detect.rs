//! Runtime CPU detection.
//!
//! This module provides the unified `get()` function that returns detected
//! CPU capabilities and cache topology. It handles:
//!
//! - Compile-time detection (via `cfg!(target_feature = "...")`)
//! - Runtime detection (via the hwcap-backed std probes on RISC-V Linux)
//! - Caching (via `OnceLock` with `std`, atomics without)
//! - User-supplied overrides for bare metal and testing
//! - Miri fallback (always returns portable caps)
//!
//! # Detection order
//!
//! Build-time target configuration wins first: a feature baked into the
//! target (`-C target-feature=+v`) is marked present unconditionally.
//! Runtime probing then unions in whatever the OS reports. Anything not
//! claimed by either source is treated as absent, which merely selects the
//! portable path; absence is never an error.
//!
//! # Overrides
//!
//! For bare metal or testing scenarios where runtime detection isn't
//! available or desirable:
//!
//! ```ignore
//! // Initialize with known capabilities (call before any get())
//! platform::init_with_caps(my_caps, my_topo);
//!
//! // Or force the portable path in a test, then restore detection
//! platform::set_caps_override(Some((Caps::NONE, CacheTopology::DEFAULT)));
//! platform::set_caps_override(None);
//! ```

use core::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use crate::{caps::Caps, topo::CacheTopology};

// ─────────────────────────────────────────────────────────────────────────────
// Override Support
// ─────────────────────────────────────────────────────────────────────────────
//
// The override is stored in plain atomics rather than a OnceLock so that it
// can be set and cleared repeatedly (tests flip between forced-portable and
// detected configurations). Publication order: fields first, flag last, with
// Release/Acquire pairing on the flag.

static OVERRIDE_SET: AtomicBool = AtomicBool::new(false);

mod override_storage {
  use super::*;

  pub static CAPS: AtomicU64 = AtomicU64::new(0);
  pub static LINE: AtomicUsize = AtomicUsize::new(0);
  pub static L1: AtomicUsize = AtomicUsize::new(0);
  pub static L2: AtomicUsize = AtomicUsize::new(0);
  pub static CORES: AtomicUsize = AtomicUsize::new(0);
}

/// Initialize with user-supplied capabilities and topology.
///
/// Call this before any call to `get()` to bypass runtime detection.
/// This is useful for:
/// - Bare metal environments without runtime detection support
/// - Embedded systems where the CPU is known at deployment
/// - Testing specific code paths
pub fn init_with_caps(caps: Caps, topo: CacheTopology) {
  set_caps_override(Some((caps, topo)));
}

/// Set or clear the capabilities override.
///
/// When set, `get()` returns the override value instead of detecting.
/// Pass `None` to clear the override and resume detection.
///
/// # Thread Safety
///
/// Thread-safe, but consumers that have already resolved a kernel from an
/// earlier `get()` keep that kernel; set overrides early, before first use.
pub fn set_caps_override(value: Option<(Caps, CacheTopology)>) {
  match value {
    Some((caps, topo)) => {
      override_storage::CAPS.store(caps.0, Ordering::Release);
      override_storage::LINE.store(topo.cache_line_size, Ordering::Release);
      override_storage::L1.store(topo.l1_size, Ordering::Release);
      override_storage::L2.store(topo.l2_size, Ordering::Release);
      override_storage::CORES.store(topo.num_cores, Ordering::Release);
      OVERRIDE_SET.store(true, Ordering::Release);
    }
    None => {
      OVERRIDE_SET.store(false, Ordering::Release);
    }
  }
}

/// Check if an override is currently set.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  OVERRIDE_SET.load(Ordering::Acquire)
}

/// Get the current override, if any.
fn get_override() -> Option<(Caps, CacheTopology)> {
  if !OVERRIDE_SET.load(Ordering::Acquire) {
    return None;
  }

  let caps = Caps(override_storage::CAPS.load(Ordering::Acquire));
  let topo = CacheTopology {
    cache_line_size: override_storage::LINE.load(Ordering::Acquire),
    l1_size: override_storage::L1.load(Ordering::Acquire),
    l2_size: override_storage::L2.load(Ordering::Acquire),
    num_cores: override_storage::CORES.load(Ordering::Acquire),
  };
  Some((caps, topo))
}

// ─────────────────────────────────────────────────────────────────────────────
// Cache Infrastructure (no_std)
// ─────────────────────────────────────────────────────────────────────────────

/// Cache state for no_std builds.
#[cfg(not(feature = "std"))]
mod cache {
  use core::sync::atomic::AtomicU8;

  use super::*;

  /// Initialization state.
  /// 0 = uninitialized, 1 = initializing, 2 = initialized
  static STATE: AtomicU8 = AtomicU8::new(0);

  static CACHED_CAPS: AtomicU64 = AtomicU64::new(0);
  static CACHED_LINE: AtomicUsize = AtomicUsize::new(0);
  static CACHED_L1: AtomicUsize = AtomicUsize::new(0);
  static CACHED_L2: AtomicUsize = AtomicUsize::new(0);
  static CACHED_CORES: AtomicUsize = AtomicUsize::new(0);

  /// Try to get cached value, or compute and cache.
  #[inline]
  pub fn get_or_init(f: fn() -> (Caps, CacheTopology)) -> (Caps, CacheTopology) {
    // Fast path: already initialized
    if STATE.load(Ordering::Acquire) == 2 {
      return load_cached();
    }

    // Slow path: try to claim initialization
    match STATE.compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire) {
      Ok(_) => {
        let result = f();
        store_cached(result);
        STATE.store(2, Ordering::Release);
        result
      }
      Err(1) => {
        // Someone else is initializing, spin wait
        while STATE.load(Ordering::Acquire) == 1 {
          core::hint::spin_loop();
        }
        load_cached()
      }
      Err(_) => load_cached(),
    }
  }

  fn load_cached() -> (Caps, CacheTopology) {
    let caps = Caps(CACHED_CAPS.load(Ordering::Acquire));
    let topo = CacheTopology {
      cache_line_size: CACHED_LINE.load(Ordering::Acquire),
      l1_size: CACHED_L1.load(Ordering::Acquire),
      l2_size: CACHED_L2.load(Ordering::Acquire),
      num_cores: CACHED_CORES.load(Ordering::Acquire),
    };
    (caps, topo)
  }

  fn store_cached((caps, topo): (Caps, CacheTopology)) {
    CACHED_CAPS.store(caps.0, Ordering::Release);
    CACHED_LINE.store(topo.cache_line_size, Ordering::Release);
    CACHED_L1.store(topo.l1_size, Ordering::Release);
    CACHED_L2.store(topo.l2_size, Ordering::Release);
    CACHED_CORES.store(topo.num_cores, Ordering::Release);
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main API
// ─────────────────────────────────────────────────────────────────────────────

/// Get detected CPU capabilities and cache topology.
///
/// This is the main entry point for capability-based path selection.
///
/// # Caching
///
/// - With `std`: Results are cached in a `OnceLock` (one-time detection).
/// - Without `std`: Results are cached using atomics (one-time detection).
///
/// # Override
///
/// If an override has been set via [`init_with_caps`] or
/// [`set_caps_override`], that value is returned instead of detected
/// capabilities.
///
/// # Miri
///
/// Under Miri, always returns portable-only capabilities to avoid
/// interpreting inline assembly.
#[inline]
#[must_use]
pub fn get() -> (Caps, CacheTopology) {
  // Miri cannot interpret the accelerated kernels, so always go portable.
  #[cfg(miri)]
  {
    return (Caps::NONE, CacheTopology::DEFAULT);
  }

  #[cfg(not(miri))]
  {
    // Check for user-supplied override first
    if let Some(result) = get_override() {
      return result;
    }

    #[cfg(feature = "std")]
    {
      use std::sync::OnceLock;
      static CACHED: OnceLock<(Caps, CacheTopology)> = OnceLock::new();
      *CACHED.get_or_init(detect_uncached)
    }

    #[cfg(not(feature = "std"))]
    {
      cache::get_or_init(detect_uncached)
    }
  }
}

/// Get just the capabilities (convenience function).
#[inline]
#[must_use]
pub fn caps() -> Caps {
  get().0
}

/// Get just the cache topology (convenience function).
#[inline]
#[must_use]
pub fn topology() -> CacheTopology {
  get().1
}

/// Detect capabilities without caching.
///
/// This is useful for testing or when you need fresh detection.
#[inline]
#[must_use]
pub fn detect_uncached() -> (Caps, CacheTopology) {
  (detect_caps(), CacheTopology::detect())
}

fn detect_caps() -> Caps {
  #[cfg(any(target_arch = "riscv64", target_arch = "riscv32"))]
  {
    caps_static() | caps_runtime()
  }

  #[cfg(not(any(target_arch = "riscv64", target_arch = "riscv32")))]
  {
    // Development hosts (x86_64, aarch64) run the portable paths; the
    // accelerated kernels only exist on RISC-V targets.
    Caps::NONE
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// RISC-V detection
// ─────────────────────────────────────────────────────────────────────────────

/// Compile-time detected RISC-V features.
///
/// A feature baked into the compilation target is present on every
/// machine the binary may legally run on, so it is claimed without a
/// runtime probe.
#[cfg(any(target_arch = "riscv64", target_arch = "riscv32"))]
const fn caps_static() -> Caps {
  use crate::caps::riscv;

  #[allow(unused_mut)]
  let mut caps = Caps::NONE;

  #[cfg(target_feature = "a")]
  {
    caps = caps.union(riscv::A);
  }

  #[cfg(target_feature = "v")]
  {
    caps = caps.union(riscv::V);
  }

  #[cfg(target_feature = "zbb")]
  {
    caps = caps.union(riscv::ZBB);
  }

  #[cfg(target_feature = "zbkb")]
  {
    caps = caps.union(riscv::ZBKB);
  }

  caps
}

/// Runtime detected RISC-V features.
///
/// `std::arch::is_riscv_feature_detected!` only accepts a subset of RISC-V
/// feature strings today; vector (`v`) in particular is rejected on the
/// toolchains this workspace targets. The runtime probe therefore covers
/// only the scalar extensions and `caps_static()` remains the sole source
/// for `a` and `v`.
#[cfg(all(
  any(target_arch = "riscv64", target_arch = "riscv32"),
  feature = "std",
  any(target_os = "linux", target_os = "android")
))]
fn caps_runtime() -> Caps {
  use crate::caps::riscv;

  let mut caps = Caps::NONE;

  if std::arch::is_riscv_feature_detected!("zbb") {
    caps |= riscv::ZBB;
  }
  if std::arch::is_riscv_feature_detected!("zbkb") {
    caps |= riscv::ZBKB;
  }

  caps
}

#[cfg(all(
  any(target_arch = "riscv64", target_arch = "riscv32"),
  not(all(feature = "std", any(target_os = "linux", target_os = "android")))
))]
fn caps_runtime() -> Caps {
  // Runtime probing is only implemented on Linux-like platforms today.
  Caps::NONE
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn get_returns_valid_topology() {
    let (_caps, topo) = get();
    assert!(topo.cache_line_size.is_power_of_two());
    assert!(topo.num_cores >= 1);
    assert!(topo.l2_size > 0);
  }

  #[test]
  fn detect_uncached_is_deterministic() {
    let (caps1, topo1) = detect_uncached();
    let (caps2, topo2) = detect_uncached();
    assert_eq!(caps1, caps2);
    assert_eq!(topo1, topo2);
  }

  #[test]
  fn caps_never_lose_bits_across_calls() {
    // Once observed set, a capability bit stays set for the process.
    let first = caps();
    for _ in 0..8 {
      assert!(caps().has(first));
    }
  }

  #[test]
  #[cfg(not(any(target_arch = "riscv64", target_arch = "riscv32")))]
  fn non_riscv_hosts_are_portable() {
    if !has_override() {
      let (c, _) = detect_uncached();
      assert_eq!(c, Caps::NONE);
    }
  }

  #[test]
  fn convenience_functions_agree() {
    let (c, t) = get();
    assert_eq!(caps(), c);
    assert_eq!(topology(), t);
  }

  // Override set/clear is exercised in tests/override.rs: it mutates
  // process-global state and must not run beside the unit tests here.

  #[test]
  #[cfg(miri)]
  fn miri_returns_portable() {
    let (caps, topo) = get();
    assert_eq!(caps, Caps::NONE);
    assert_eq!(topo, CacheTopology::DEFAULT);
  }
}
