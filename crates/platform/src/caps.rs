//! CPU capability detection and representation.
//!
//! This module provides the capability model used for all code-path
//! selection in the workspace. It answers the question: "What instructions
//! can I legally run on this machine?"
//!
//! # Design
//!
//! [`Caps`] is a 64-bit bitset of ISA extensions. The interesting bits are
//! RISC-V extensions (atomics, vector, bit-manipulation); on any other
//! architecture detection yields [`Caps::NONE`] and every consumer takes
//! its portable path.
//!
//! Capabilities are detected once per process and never change afterwards:
//! a bit that has been observed set stays set for the process lifetime.
//!
//! # Usage
//!
//! ```ignore
//! use platform::caps::riscv;
//!
//! let c = platform::caps();
//! if c.has(riscv::V) {
//!     // Vector (RVV) kernels are safe to execute
//! }
//! ```

// alloc is only needed for tests (feature_names collection into Vec)
#[cfg(test)]
extern crate alloc;

// ─────────────────────────────────────────────────────────────────────────────
// Core Capability Type
// ─────────────────────────────────────────────────────────────────────────────

/// CPU capabilities: a 64-bit feature bitset.
///
/// This is the core type for capability-based path selection. Use
/// [`has()`](Caps::has) to check if required features are available.
///
/// # Thread Safety
///
/// `Caps` is `Copy`, `Send`, and `Sync`. It can be freely shared across
/// threads.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Caps(pub(crate) u64);

impl Caps {
  /// Empty capability set (no features).
  pub const NONE: Self = Self(0);

  /// Create a capability set from a raw bit word.
  ///
  /// Primarily useful for testing and fuzzing; normal usage should prefer
  /// the predefined constants in [`riscv`].
  #[cfg(any(test, feature = "testing"))]
  #[inline]
  #[must_use]
  pub const fn from_raw(bits: u64) -> Self {
    Self(bits)
  }

  /// Access the raw underlying bit word.
  #[cfg(any(test, feature = "testing"))]
  #[inline]
  #[must_use]
  pub const fn as_raw(self) -> u64 {
    self.0
  }

  /// Check if all features in `required` are present.
  ///
  /// This is the core selection check, marked `#[inline(always)]` so it
  /// folds to a single mask-and-compare.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    (self.0 & required.0) == required.0
  }

  /// Union of two capability sets.
  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self(self.0 | other.0)
  }

  /// Intersection of two capability sets.
  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self(self.0 & other.0)
  }

  /// Check if the capability set is empty.
  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }

  /// Count the number of features present.
  #[inline]
  #[must_use]
  pub const fn count(self) -> u32 {
    self.0.count_ones()
  }

  /// Create a capability set with a single bit set.
  #[inline]
  #[must_use]
  pub const fn bit(bit: u8) -> Self {
    debug_assert!(bit < 64);
    Self(1u64 << (bit as u64 & 63))
  }

  /// Check if a specific bit is set.
  #[inline]
  #[must_use]
  pub const fn has_bit(self, bit: u8) -> bool {
    (self.0 & (1u64 << (bit as u64 & 63))) != 0
  }

  /// Whether the atomic (A) extension path may be used.
  #[inline]
  #[must_use]
  pub const fn has_atomic(self) -> bool {
    self.has(riscv::A)
  }

  /// Whether the vector (V) extension path may be used.
  #[inline]
  #[must_use]
  pub const fn has_vector(self) -> bool {
    self.has(riscv::V)
  }

  /// Whether the bit-manipulation (Zbb) extension is available.
  #[inline]
  #[must_use]
  pub const fn has_bitmanip(self) -> bool {
    self.has(riscv::ZBB)
  }
}

impl core::ops::BitOr for Caps {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self::Output {
    self.union(rhs)
  }
}

impl core::ops::BitAnd for Caps {
  type Output = Self;

  #[inline]
  fn bitand(self, rhs: Self) -> Self::Output {
    self.intersection(rhs)
  }
}

impl core::ops::BitOrAssign for Caps {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Architecture Identification
// ─────────────────────────────────────────────────────────────────────────────

/// Target architecture enumeration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Arch {
  Riscv64,
  Riscv32,
  X86_64,
  Aarch64,
  #[default]
  Other,
}

impl Arch {
  /// Get the architecture for the current compilation target.
  #[inline]
  #[must_use]
  pub const fn current() -> Self {
    #[cfg(target_arch = "riscv64")]
    {
      Self::Riscv64
    }
    #[cfg(target_arch = "riscv32")]
    {
      Self::Riscv32
    }
    #[cfg(target_arch = "x86_64")]
    {
      Self::X86_64
    }
    #[cfg(target_arch = "aarch64")]
    {
      Self::Aarch64
    }
    #[cfg(not(any(
      target_arch = "riscv64",
      target_arch = "riscv32",
      target_arch = "x86_64",
      target_arch = "aarch64"
    )))]
    {
      Self::Other
    }
  }

  /// Returns the human-readable name for this architecture.
  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Riscv64 => "riscv64",
      Self::Riscv32 => "riscv32",
      Self::X86_64 => "x86_64",
      Self::Aarch64 => "aarch64",
      Self::Other => "other",
    }
  }
}

impl core::fmt::Display for Arch {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// RISC-V Features
// ─────────────────────────────────────────────────────────────────────────────

/// RISC-V CPU features.
///
/// Only the extensions this workspace branches on are modeled. `ZBKB` is
/// detected and reported for diagnostics but no kernel currently requires
/// it.
pub mod riscv {
  use super::Caps;

  /// A: standard atomics (LR/SC, AMO).
  pub const A: Caps = Caps::bit(0);
  /// V: vector extension (RVV 1.0).
  pub const V: Caps = Caps::bit(1);
  /// Zbb: basic bit manipulation (rotate, cpop, ctz).
  pub const ZBB: Caps = Caps::bit(2);
  /// Zbkb: bit manipulation for cryptography.
  pub const ZBKB: Caps = Caps::bit(3);
}

// ─────────────────────────────────────────────────────────────────────────────
// Feature Name Lookup (for diagnostics)
// ─────────────────────────────────────────────────────────────────────────────

/// Feature name entry: (bit_index, name).
type FeatureEntry = (u8, &'static str);

/// RISC-V feature names.
const RISCV_FEATURES: &[FeatureEntry] = &[(0, "a"), (1, "v"), (2, "zbb"), (3, "zbkb")];

impl Caps {
  /// Returns an iterator over the names of all set feature bits.
  pub fn feature_names(self) -> impl Iterator<Item = &'static str> {
    RISCV_FEATURES
      .iter()
      .filter_map(move |(bit, name)| if self.has_bit(*bit) { Some(*name) } else { None })
  }
}

impl core::fmt::Debug for Caps {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    let arch = Arch::current();
    write!(f, "Caps({arch}")?;

    let mut iter = self.feature_names().peekable();
    if iter.peek().is_none() {
      write!(f, ", none)")
    } else {
      write!(f, ", [")?;
      let mut first = true;
      for name in iter {
        if !first {
          write!(f, ", ")?;
        }
        first = false;
        write!(f, "{name}")?;
      }
      write!(f, "])")
    }
  }
}

impl core::fmt::Display for Caps {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    core::fmt::Debug::fmt(self, f)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn caps_basic() {
    let empty = Caps::NONE;
    assert!(empty.is_empty());
    assert_eq!(empty.count(), 0);

    let a = riscv::A;
    assert!(!a.is_empty());
    assert_eq!(a.count(), 1);
    assert!(a.has_bit(0));
    assert!(!a.has_bit(1));
  }

  #[test]
  fn caps_union_intersection() {
    let av = riscv::A | riscv::V;

    assert!(av.has(riscv::A));
    assert!(av.has(riscv::V));
    assert!(!av.has(riscv::ZBB));
    assert_eq!(av.count(), 2);

    assert!(!riscv::A.has(av));
    assert_eq!(av & riscv::A, riscv::A);
  }

  #[test]
  fn caps_predicates() {
    assert!(riscv::A.has_atomic());
    assert!(!riscv::A.has_vector());
    assert!(riscv::V.has_vector());
    assert!(riscv::ZBB.has_bitmanip());
    assert!(!Caps::NONE.has_atomic());
    assert!(!Caps::NONE.has_vector());
    assert!(!Caps::NONE.has_bitmanip());
  }

  #[test]
  fn caps_operators() {
    let a = riscv::A;
    let v = riscv::V;

    assert_eq!(a | v, a.union(v));
    assert_eq!((a | v) & a, a);

    let mut c = a;
    c |= v;
    assert_eq!(c, a | v);
  }

  #[test]
  fn feature_names_round_trip() {
    let caps = riscv::V | riscv::ZBB;
    let names: alloc::vec::Vec<_> = caps.feature_names().collect();
    assert!(names.contains(&"v"));
    assert!(names.contains(&"zbb"));
    assert!(!names.contains(&"a"));
  }

  #[test]
  fn debug_impl_lists_features() {
    let caps = riscv::A | riscv::V;
    let s = alloc::format!("{caps:?}");
    assert!(s.contains("Caps("));
    assert!(s.contains("a"));
    assert!(s.contains("v"));
  }

  #[test]
  fn debug_impl_empty() {
    let s = alloc::format!("{:?}", Caps::NONE);
    assert!(s.contains("none"));
  }

  #[test]
  fn arch_current_matches_target() {
    let arch = Arch::current();
    #[cfg(target_arch = "riscv64")]
    assert_eq!(arch, Arch::Riscv64);
    #[cfg(target_arch = "x86_64")]
    assert_eq!(arch, Arch::X86_64);
    #[cfg(target_arch = "aarch64")]
    assert_eq!(arch, Arch::Aarch64);
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Property-Based Tests (proptest)
// Note: proptest uses filesystem for failure persistence, which Miri doesn't
// support.
// ─────────────────────────────────────────────────────────────────────────────
