//! Memory barriers.
//!
//! Three fences with decreasing strength, matching the `fence` instruction
//! predecessor/successor sets used on RISC-V:
//!
//! | operation   | riscv64        | other targets           |
//! |-------------|----------------|-------------------------|
//! | [`full`]    | `fence rw, rw` | `fence(SeqCst)`         |
//! | [`read`]    | `fence r, rw`  | `fence(Acquire)`        |
//! | [`write`]   | `fence rw, w`  | `fence(Release)`        |
//!
//! Fences are synchronization points, not suspension points: they enforce
//! ordering of memory operations across cores, never block, never yield,
//! and cannot fail. Each also acts as a compiler barrier (the asm forms
//! carry an implicit memory clobber; the portable forms are compiler
//! fences by definition).

// SAFETY: This module wraps bare fence instructions. They have no operands,
// touch no memory themselves, and cannot fault.
#![allow(unsafe_code)]

#[cfg(not(target_arch = "riscv64"))]
use core::sync::atomic::{Ordering, fence};

/// Full barrier: all prior loads and stores are ordered before all
/// subsequent loads and stores.
#[inline(always)]
pub fn full() {
  #[cfg(target_arch = "riscv64")]
  unsafe {
    core::arch::asm!("fence rw, rw", options(nostack, preserves_flags));
  }

  #[cfg(not(target_arch = "riscv64"))]
  fence(Ordering::SeqCst);
}

/// Read barrier: all prior loads are ordered before all subsequent loads
/// and stores.
#[inline(always)]
pub fn read() {
  #[cfg(target_arch = "riscv64")]
  unsafe {
    core::arch::asm!("fence r, rw", options(nostack, preserves_flags));
  }

  #[cfg(not(target_arch = "riscv64"))]
  fence(Ordering::Acquire);
}

/// Write barrier: all prior loads and stores are ordered before all
/// subsequent stores.
#[inline(always)]
pub fn write() {
  #[cfg(target_arch = "riscv64")]
  unsafe {
    core::arch::asm!("fence rw, w", options(nostack, preserves_flags));
  }

  #[cfg(not(target_arch = "riscv64"))]
  fence(Ordering::Release);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
