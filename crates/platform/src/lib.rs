//! CPU detection, capabilities, and cache topology for rvfill.
//!
//! This crate is the **single source of truth** for CPU feature detection
//! and code-path selection across the rvfill workspace.
//!
//! # Core Types
//!
//! - [`Caps`]: What instructions can run on this machine (capabilities)
//! - [`CacheTopology`]: How memory is organized (line size, L1/L2, cores)
//!
//! # Main Entry Point
//!
//! ```ignore
//! use platform::caps::riscv;
//!
//! let (caps, topo) = platform::get();
//!
//! // Check capabilities
//! if caps.has(riscv::V) {
//!     // Use the RVV bulk kernels
//! }
//!
//! // Derive chunking from topology
//! let stride = topo.cache_line_size;
//! ```
//!
//! # Design Philosophy
//!
//! 1. **One API**: Consumers query `platform::get()` instead of doing ad-hoc
//!    detection.
//! 2. **Capabilities vs Topology**: `Caps` says what's *possible*;
//!    `CacheTopology` says how to *shape* the work.
//! 3. **Zero-cost when possible**: Compile-time features are detected via
//!    `cfg!`, avoiding runtime overhead.
//! 4. **Cached otherwise**: Runtime detection runs once and is cached in
//!    `OnceLock` (std) or atomics (no_std); the result never changes for
//!    the process lifetime.
//! 5. **Miri-safe**: Under Miri, always returns portable-only caps.

#![no_std]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

#[cfg(feature = "std")]
extern crate std;

// ─────────────────────────────────────────────────────────────────────────────
// Core modules
// ─────────────────────────────────────────────────────────────────────────────

pub mod caps;
mod detect;
pub mod topo;

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

pub use caps::{Arch, Caps};
pub use topo::CacheTopology;

/// Get detected CPU capabilities and cache topology.
///
/// This is the main entry point for capability-based path selection.
/// Detection runs once per process and the result is cached; the returned
/// value is immutable for the process lifetime.
#[inline]
#[must_use]
pub fn get() -> (Caps, CacheTopology) {
  detect::get()
}

/// Get just the CPU capabilities.
///
/// Convenience wrapper around [`get()`].
#[inline]
#[must_use]
pub fn caps() -> Caps {
  detect::caps()
}

/// Get just the cache topology.
///
/// Convenience wrapper around [`get()`].
#[inline]
#[must_use]
pub fn topology() -> CacheTopology {
  detect::topology()
}

/// Detect capabilities and topology without caching.
///
/// Useful for diagnostics; normal consumers should call [`get()`].
#[inline]
#[must_use]
pub fn detect_uncached() -> (Caps, CacheTopology) {
  detect::detect_uncached()
}

/// Initialize with user-supplied capabilities and topology.
///
/// Call this before any call to [`get()`] to bypass runtime detection.
/// This is useful for:
/// - Bare metal environments without runtime detection support
/// - Embedded systems where the CPU is known at deployment
/// - Testing specific code paths
///
/// # Example
///
/// ```ignore
/// use platform::{Caps, CacheTopology, caps::riscv};
///
/// // A board whose geometry is known exactly
/// platform::init_with_caps(
///   riscv::A.union(riscv::V),
///   CacheTopology::new(64, 32 * 1024, 512 * 1024, 8),
/// );
/// ```
#[inline]
pub fn init_with_caps(caps: Caps, topo: CacheTopology) {
  detect::init_with_caps(caps, topo);
}

/// Set or clear the capabilities override.
///
/// When set, [`get()`] will return the override value instead of detecting.
/// Pass `None` to clear the override and resume detection.
///
/// # Thread Safety
///
/// This function is thread-safe but should typically be called early in
/// program initialization, before any calls to [`get()`]: consumers that
/// have already resolved a kernel keep the one they resolved.
#[inline]
pub fn set_caps_override(value: Option<(Caps, CacheTopology)>) {
  detect::set_caps_override(value);
}

/// Check if an override is currently set.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  detect::has_override()
}
