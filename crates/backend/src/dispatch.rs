//! Kernel dispatch: selection from capability-ordered candidate lists.
//!
//! This module provides the core dispatch primitives for rvfill:
//!
//! - [`Candidate`]: A kernel with capability requirements
//! - [`Selected`]: The result of kernel selection
//! - [`select`]: Choose the best kernel from a candidate list
//!
//! # Design
//!
//! Strategies are selected **once per process**, not per call: the caller
//! resolves a candidate list against the detected capabilities, caches the
//! result in an [`OnceCache`](crate::OnceCache), and every subsequent call
//! is a direct (or single indirect) call. This keeps both strategies of a
//! dual-path operation unit-testable in isolation while avoiding per-call
//! branching.
//!
//! # Usage
//!
//! Kernel crates register implementations as an ordered list of
//! `Candidate`s, best first, portable fallback last:
//!
//! ```ignore
//! use backend::dispatch::{Candidate, Selected, select};
//! use platform::{Caps, caps::riscv};
//!
//! fn select_copy() -> Selected<fn(&mut [u8], &[u8])> {
//!     let caps = platform::caps();
//!     let candidates = &[
//!         Candidate::new("riscv64/rvv", riscv::V, rvv_copy),
//!         Candidate::new("portable", Caps::NONE, portable_copy),
//!     ];
//!     select(caps, candidates)
//! }
//! ```

use platform::Caps;

// ─────────────────────────────────────────────────────────────────────────────
// Core Types
// ─────────────────────────────────────────────────────────────────────────────

/// A candidate kernel with capability requirements.
///
/// Candidates are ordered from best to worst. The dispatcher selects the
/// first candidate whose requirements are satisfied by the detected
/// capabilities.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<F> {
  /// Human-readable name for diagnostics (e.g., "riscv64/rvv").
  pub name: &'static str,
  /// Required CPU capabilities. Must be a subset of detected caps.
  pub requires: Caps,
  /// The kernel function pointer.
  pub func: F,
}

impl<F> Candidate<F> {
  /// Create a new candidate.
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, requires: Caps, func: F) -> Self {
    Self { name, requires, func }
  }
}

/// The result of kernel selection.
///
/// Contains the selected kernel's name and function pointer.
#[derive(Clone, Copy, Debug)]
pub struct Selected<F> {
  /// Human-readable name of the selected kernel.
  pub name: &'static str,
  /// The selected kernel function.
  pub func: F,
}

impl<F> Selected<F> {
  /// Create a new selected result.
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, func: F) -> Self {
    Self { name, func }
  }
}

/// Select the best kernel from a candidate list.
///
/// Returns the first candidate whose `requires` is satisfied by `caps`.
///
/// # Panics
///
/// Panics if no candidate matches. The last candidate should always have
/// `requires = Caps::NONE` as a portable fallback, which makes this
/// unreachable for well-formed lists.
#[inline]
#[must_use]
pub fn select<F: Copy>(caps: Caps, candidates: &[Candidate<F>]) -> Selected<F> {
  for candidate in candidates {
    if caps.has(candidate.requires) {
      return Selected::new(candidate.name, candidate.func);
    }
  }

  panic!("no matching kernel; candidate list must end with a portable fallback");
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use platform::caps::riscv;

  use super::*;

  fn accel(x: u32) -> u32 {
    x.wrapping_mul(2)
  }

  fn portable(x: u32) -> u32 {
    x.wrapping_add(x)
  }

  fn candidates() -> [Candidate<fn(u32) -> u32>; 2] {
    [
      Candidate::new("riscv64/rvv", riscv::V, accel as fn(u32) -> u32),
      Candidate::new("portable", Caps::NONE, portable as fn(u32) -> u32),
    ]
  }

  #[test]
  fn selects_first_satisfied_candidate() {
    let selected = select(riscv::V | riscv::A, &candidates());
    assert_eq!(selected.name, "riscv64/rvv");
    assert_eq!((selected.func)(21), 42);
  }

  #[test]
  fn falls_back_to_portable() {
    let selected = select(Caps::NONE, &candidates());
    assert_eq!(selected.name, "portable");

    // A capability that doesn't satisfy the accelerated requirement also
    // falls through.
    let selected = select(riscv::A, &candidates());
    assert_eq!(selected.name, "portable");
  }

  #[test]
  #[should_panic(expected = "portable fallback")]
  fn panics_without_fallback() {
    let only_accel = [Candidate::new("riscv64/rvv", riscv::V, accel as fn(u32) -> u32)];
    let _ = select(Caps::NONE, &only_accel);
  }
}
