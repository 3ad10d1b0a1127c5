//! Atomic cells with process-wide ordering selection.
//!
//! # Design
//!
//! The ordering strategy is a property of the machine, not of the call
//! site: it is resolved exactly once from [`platform::caps()`] and cached,
//! so every cell in the process uses the same orderings for its whole
//! lifetime. Two strategies exist:
//!
//! - **amo** (atomic extension present): `Acquire` loads, `Release`
//!   stores, `AcqRel` read-modify-writes. On RISC-V these lower to the
//!   AMO/LR/SC instructions with the corresponding `aq`/`rl` bits.
//! - **relaxed** (no atomic extension): the same atomic instructions with
//!   `Relaxed` ordering. Plain non-atomic accesses to shared memory are
//!   not a sound option in Rust, so the fallback keeps atomicity and drops
//!   only the ordering guarantees; callers that need ordering on this path
//!   use the explicit fences in [`crate::fence`].
//!
//! # Failure semantics
//!
//! None of these operations can fail. [`compare_and_swap`]
//! (Atomic64::compare_and_swap) returning `false` is an ordinary outcome
//! (the observed value differed), not an error; callers own any retry
//! policy. Each call is a single bounded attempt: the strong
//! compare-exchange never fails spuriously, and the LR/SC retry that
//! implements it on RISC-V is bounded inside the instruction sequence.

use core::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use backend::OnceCache;

// ─────────────────────────────────────────────────────────────────────────────
// Ordering Strategy
// ─────────────────────────────────────────────────────────────────────────────

/// Memory-ordering strategy, fixed per process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
  /// Acquire/Release/AcqRel orderings (atomic extension present).
  AcqRel,
  /// Relaxed orderings (no atomic extension).
  Relaxed,
}

static MODE: OnceCache<Mode> = OnceCache::new();

#[inline]
fn mode() -> Mode {
  MODE.get_or_init(|| {
    if platform::caps().has_atomic() {
      Mode::AcqRel
    } else {
      Mode::Relaxed
    }
  })
}

/// Name of the ordering strategy in use, for diagnostics.
#[inline]
#[must_use]
pub fn ordering_path() -> &'static str {
  match mode() {
    Mode::AcqRel => "amo",
    Mode::Relaxed => "relaxed",
  }
}

#[inline]
fn load_ordering() -> Ordering {
  match mode() {
    Mode::AcqRel => Ordering::Acquire,
    Mode::Relaxed => Ordering::Relaxed,
  }
}

#[inline]
fn store_ordering() -> Ordering {
  match mode() {
    Mode::AcqRel => Ordering::Release,
    Mode::Relaxed => Ordering::Relaxed,
  }
}

#[inline]
fn rmw_ordering() -> Ordering {
  match mode() {
    Mode::AcqRel => Ordering::AcqRel,
    Mode::Relaxed => Ordering::Relaxed,
  }
}

#[inline]
fn rmw_failure_ordering() -> Ordering {
  match mode() {
    Mode::AcqRel => Ordering::Acquire,
    Mode::Relaxed => Ordering::Relaxed,
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Atomic32
// ─────────────────────────────────────────────────────────────────────────────

/// A 32-bit cell accessed exclusively through atomic operations.
#[derive(Debug, Default)]
#[repr(transparent)]
pub struct Atomic32(AtomicU32);

impl Atomic32 {
  /// Create a new cell holding `value`.
  #[inline]
  #[must_use]
  pub const fn new(value: u32) -> Self {
    Self(AtomicU32::new(value))
  }

  /// Load the current value.
  ///
  /// Acquire semantics on the amo path, relaxed otherwise.
  #[inline]
  #[must_use]
  pub fn load(&self) -> u32 {
    self.0.load(load_ordering())
  }

  /// Store `value`.
  ///
  /// Release semantics on the amo path, relaxed otherwise.
  #[inline]
  pub fn store(&self, value: u32) {
    self.0.store(value, store_ordering());
  }

  /// Atomically add `delta`, returning the value before the addition.
  #[inline]
  pub fn fetch_add(&self, delta: u32) -> u32 {
    self.0.fetch_add(delta, rmw_ordering())
  }

  /// Atomically replace the value with `desired` iff it currently equals
  /// `expected`.
  ///
  /// Returns `true` on success. On failure the cell is left unchanged and
  /// the observed value is discarded; callers that want retry-until-success
  /// loop externally.
  #[inline]
  pub fn compare_and_swap(&self, expected: u32, desired: u32) -> bool {
    self
      .0
      .compare_exchange(expected, desired, rmw_ordering(), rmw_failure_ordering())
      .is_ok()
  }

  /// Consume the cell, returning the inner value.
  #[inline]
  #[must_use]
  pub fn into_inner(self) -> u32 {
    self.0.into_inner()
  }
}

impl From<u32> for Atomic32 {
  #[inline]
  fn from(value: u32) -> Self {
    Self::new(value)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Atomic64
// ─────────────────────────────────────────────────────────────────────────────

/// A 64-bit cell accessed exclusively through atomic operations.
#[derive(Debug, Default)]
#[repr(transparent)]
pub struct Atomic64(AtomicU64);

impl Atomic64 {
  /// Create a new cell holding `value`.
  #[inline]
  #[must_use]
  pub const fn new(value: u64) -> Self {
    Self(AtomicU64::new(value))
  }

  /// Load the current value.
  ///
  /// Acquire semantics on the amo path, relaxed otherwise.
  #[inline]
  #[must_use]
  pub fn load(&self) -> u64 {
    self.0.load(load_ordering())
  }

  /// Store `value`.
  ///
  /// Release semantics on the amo path, relaxed otherwise.
  #[inline]
  pub fn store(&self, value: u64) {
    self.0.store(value, store_ordering());
  }

  /// Atomically add `delta`, returning the value before the addition.
  #[inline]
  pub fn fetch_add(&self, delta: u64) -> u64 {
    self.0.fetch_add(delta, rmw_ordering())
  }

  /// Atomically replace the value with `desired` iff it currently equals
  /// `expected`.
  ///
  /// Returns `true` on success. On failure the cell is left unchanged and
  /// the observed value is discarded; callers that want retry-until-success
  /// loop externally.
  #[inline]
  pub fn compare_and_swap(&self, expected: u64, desired: u64) -> bool {
    self
      .0
      .compare_exchange(expected, desired, rmw_ordering(), rmw_failure_ordering())
      .is_ok()
  }

  /// Consume the cell, returning the inner value.
  #[inline]
  #[must_use]
  pub fn into_inner(self) -> u64 {
    self.0.into_inner()
  }
}

impl From<u64> for Atomic64 {
  #[inline]
  fn from(value: u64) -> Self {
    Self::new(value)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
