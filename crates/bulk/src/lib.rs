//! Dual-path bulk byte operations for rvfill.
//!
//! Four operations over byte buffers, each with one logical contract and
//! two interchangeable implementations:
//!
//! - [`copy`]: `dst[i] = src[i]`
//! - [`fill`]: `dst[i] = value`
//! - [`xor`]: `out[i] = a[i] ^ b[i]`
//! - [`compare`]: 0 iff byte-equal, else the first byte difference
//!
//! The vector (RVV) kernels process 64-byte blocks and hand remainders to
//! the scalar code; the portable kernels are plain scalar loops. Which set
//! runs is decided **once per process** from
//! [`platform::caps()`](platform::caps): the kernels must be, and are,
//! indistinguishable by output, so the choice is invisible to callers.
//!
//! Also provided:
//!
//! - [`copier::copy_aligned`]: cache-line-aware copy with software
//!   prefetch, the building block of the dataset fill worker
//! - [`prefetch`]: raw prefetch hints
//! - [`kernel_test`]: run-every-kernel helpers for differential tests
//!
//! # Example
//!
//! ```
//! let a = [0x0Fu8; 130];
//! let b = [0xF0u8; 130];
//! let mut out = [0u8; 130];
//!
//! bulk::xor(&a, &b, &mut out);
//! assert!(out.iter().all(|&x| x == 0xFF));
//! assert_eq!(bulk::compare(&a, &a), 0);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod copier;
mod portable;
pub mod prefetch;
#[cfg(target_arch = "riscv64")]
mod riscv64;

use backend::{Candidate, OnceCache, Selected, select};

// ─────────────────────────────────────────────────────────────────────────────
// Kernel Table
// ─────────────────────────────────────────────────────────────────────────────

/// Signature for copy kernels.
pub type CopyFn = fn(&mut [u8], &[u8]);
/// Signature for fill kernels.
pub type FillFn = fn(&mut [u8], u8);
/// Signature for xor kernels.
pub type XorFn = fn(&[u8], &[u8], &mut [u8]);
/// Signature for compare kernels.
pub type CompareFn = fn(&[u8], &[u8]) -> i32;

/// One coherent set of kernels; ops from different sets never mix.
#[derive(Clone, Copy)]
struct Kernels {
  copy: CopyFn,
  fill: FillFn,
  xor: XorFn,
  compare: CompareFn,
}

static PORTABLE: Kernels = Kernels {
  copy: portable::copy,
  fill: portable::fill,
  xor: portable::xor,
  compare: portable::compare,
};

#[cfg(target_arch = "riscv64")]
static RVV: Kernels = Kernels {
  copy: riscv64::copy,
  fill: riscv64::fill,
  xor: riscv64::xor,
  compare: riscv64::compare,
};

/// The table selected for this process, resolved on first use.
static ACTIVE: OnceCache<Selected<&'static Kernels>> = OnceCache::new();

#[inline]
fn active() -> Selected<&'static Kernels> {
  ACTIVE.get_or_init(|| {
    let caps = platform::caps();

    #[cfg(target_arch = "riscv64")]
    {
      select(caps, &[
        Candidate::new("riscv64/rvv", platform::caps::riscv::V, &RVV),
        Candidate::new("portable", platform::Caps::NONE, &PORTABLE),
      ])
    }

    #[cfg(not(target_arch = "riscv64"))]
    {
      select(caps, &[Candidate::new("portable", platform::Caps::NONE, &PORTABLE)])
    }
  })
}

/// Name of the kernel set in use, for diagnostics.
#[inline]
#[must_use]
pub fn kernel_name() -> &'static str {
  active().name
}

// ─────────────────────────────────────────────────────────────────────────────
// Public Operations
// ─────────────────────────────────────────────────────────────────────────────

/// Copy `src` into `dst`.
///
/// # Panics
///
/// Panics if the lengths differ.
#[inline]
pub fn copy(dst: &mut [u8], src: &[u8]) {
  assert_eq!(dst.len(), src.len(), "copy length mismatch");
  (active().func.copy)(dst, src);
}

/// Set every byte of `dst` to `value`.
#[inline]
pub fn fill(dst: &mut [u8], value: u8) {
  (active().func.fill)(dst, value);
}

/// XOR `a` and `b` bytewise into `out`.
///
/// # Panics
///
/// Panics if the lengths differ.
#[inline]
pub fn xor(a: &[u8], b: &[u8], out: &mut [u8]) {
  assert_eq!(a.len(), b.len(), "xor length mismatch");
  assert_eq!(a.len(), out.len(), "xor length mismatch");
  (active().func.xor)(a, b, out);
}

/// Compare `a` and `b` bytewise.
///
/// Returns 0 iff the buffers are byte-equal. The non-zero value is the
/// difference of the first unequal byte pair; callers should rely on the
/// zero/non-zero distinction and the sign, not the magnitude.
///
/// # Panics
///
/// Panics if the lengths differ.
#[inline]
#[must_use]
pub fn compare(a: &[u8], b: &[u8]) -> i32 {
  assert_eq!(a.len(), b.len(), "compare length mismatch");
  (active().func.compare)(a, b)
}

pub use copier::copy_aligned;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
