//! riscv64 vector (RVV) bulk kernels.
//!
//! Each operation streams 64-byte blocks through the vector unit
//! (`vsetvli e8, m8` over the v0/v8 register groups) and hands any
//! remainder to the scalar code shared with the portable kernels, so the
//! two paths agree bit-for-bit on every length.
//!
//! The 64-byte threshold matches the block width: shorter inputs cannot
//! fill a block, and the `vsetvli` setup would dominate anyway.
//!
//! # Safety
//!
//! Uses `unsafe` for RISC-V vector inline assembly. Callers must ensure
//! the vector extension is available before executing the accelerated
//! path; the dispatcher does this, and the safe wrappers in this module
//! document the requirement.
#![allow(unsafe_code)]
// Kernels are wired up via the dispatcher; on a non-vector machine they
// are selected never but compiled always.
#![allow(dead_code)]

use core::arch::asm;

use super::portable;

/// Vector block width in bytes (e8 elements, LMUL=8, VLEN>=64).
const BLOCK: usize = 64;

// ─────────────────────────────────────────────────────────────────────────────
// Safe wrappers (dispatch targets)
// ─────────────────────────────────────────────────────────────────────────────

/// Vector copy. Requires the V extension (guaranteed by the dispatcher).
#[inline]
pub(crate) fn copy(dst: &mut [u8], src: &[u8]) {
  // SAFETY: This kernel is only ever selected when `caps().has_vector()`,
  // so the `v` instructions are executable on this machine.
  unsafe { copy_rvv(dst, src) }
}

/// Vector fill. Requires the V extension (guaranteed by the dispatcher).
#[inline]
pub(crate) fn fill(dst: &mut [u8], value: u8) {
  // SAFETY: As for `copy`.
  unsafe { fill_rvv(dst, value) }
}

/// Vector XOR. Requires the V extension (guaranteed by the dispatcher).
#[inline]
pub(crate) fn xor(a: &[u8], b: &[u8], out: &mut [u8]) {
  // SAFETY: As for `copy`.
  unsafe { xor_rvv(a, b, out) }
}

/// Vector compare. Requires the V extension (guaranteed by the dispatcher).
#[inline]
pub(crate) fn compare(a: &[u8], b: &[u8]) -> i32 {
  // SAFETY: As for `copy`.
  unsafe { compare_rvv(a, b) }
}

// ─────────────────────────────────────────────────────────────────────────────
// Kernels
// ─────────────────────────────────────────────────────────────────────────────

#[target_feature(enable = "v")]
unsafe fn copy_rvv(dst: &mut [u8], src: &[u8]) {
  debug_assert_eq!(dst.len(), src.len());

  let total = dst.len();
  let blocks = total / BLOCK * BLOCK;

  let mut d = dst.as_mut_ptr();
  let mut s = src.as_ptr();
  let mut done = 0usize;

  while done < blocks {
    // SAFETY: `done + BLOCK <= blocks <= total`, so both pointers address
    // BLOCK in-bounds bytes. The v0 group (m8: v0-v7) is clobbered.
    unsafe {
      asm!(
        "vsetvli t0, {avl}, e8, m8, ta, ma",
        "vle8.v v0, ({src})",
        "vse8.v v0, ({dst})",
        avl = in(reg) BLOCK,
        src = in(reg) s,
        dst = in(reg) d,
        out("t0") _,
        out("v0") _,
        out("v1") _,
        out("v2") _,
        out("v3") _,
        out("v4") _,
        out("v5") _,
        out("v6") _,
        out("v7") _,
        options(nostack)
      );
      s = s.add(BLOCK);
      d = d.add(BLOCK);
    }
    done += BLOCK;
  }

  // Remainder is handled scalar on both paths.
  portable::copy(&mut dst[blocks..], &src[blocks..]);
}

#[target_feature(enable = "v")]
unsafe fn fill_rvv(dst: &mut [u8], value: u8) {
  let total = dst.len();
  let blocks = total / BLOCK * BLOCK;

  let mut d = dst.as_mut_ptr();
  let mut done = 0usize;

  while done < blocks {
    // SAFETY: `done + BLOCK <= blocks <= total`; v0 group clobbered.
    unsafe {
      asm!(
        "vsetvli t0, {avl}, e8, m8, ta, ma",
        "vmv.v.x v0, {val}",
        "vse8.v v0, ({dst})",
        avl = in(reg) BLOCK,
        val = in(reg) value as usize,
        dst = in(reg) d,
        out("t0") _,
        out("v0") _,
        out("v1") _,
        out("v2") _,
        out("v3") _,
        out("v4") _,
        out("v5") _,
        out("v6") _,
        out("v7") _,
        options(nostack)
      );
      d = d.add(BLOCK);
    }
    done += BLOCK;
  }

  portable::fill(&mut dst[blocks..], value);
}

#[target_feature(enable = "v")]
unsafe fn xor_rvv(a: &[u8], b: &[u8], out: &mut [u8]) {
  debug_assert_eq!(a.len(), b.len());
  debug_assert_eq!(a.len(), out.len());

  let total = out.len();
  let blocks = total / BLOCK * BLOCK;

  let mut pa = a.as_ptr();
  let mut pb = b.as_ptr();
  let mut po = out.as_mut_ptr();
  let mut done = 0usize;

  while done < blocks {
    // SAFETY: all three pointers address BLOCK in-bounds bytes; the v0 and
    // v8 groups (m8) are clobbered.
    unsafe {
      asm!(
        "vsetvli t0, {avl}, e8, m8, ta, ma",
        "vle8.v v0, ({a})",
        "vle8.v v8, ({b})",
        "vxor.vv v0, v0, v8",
        "vse8.v v0, ({dst})",
        avl = in(reg) BLOCK,
        a = in(reg) pa,
        b = in(reg) pb,
        dst = in(reg) po,
        out("t0") _,
        out("v0") _,
        out("v1") _,
        out("v2") _,
        out("v3") _,
        out("v4") _,
        out("v5") _,
        out("v6") _,
        out("v7") _,
        out("v8") _,
        out("v9") _,
        out("v10") _,
        out("v11") _,
        out("v12") _,
        out("v13") _,
        out("v14") _,
        out("v15") _,
        options(nostack)
      );
      pa = pa.add(BLOCK);
      pb = pb.add(BLOCK);
      po = po.add(BLOCK);
    }
    done += BLOCK;
  }

  portable::xor(&a[blocks..], &b[blocks..], &mut out[blocks..]);
}

#[target_feature(enable = "v")]
unsafe fn compare_rvv(a: &[u8], b: &[u8]) -> i32 {
  debug_assert_eq!(a.len(), b.len());

  let total = a.len();
  let blocks = total / BLOCK * BLOCK;

  let mut done = 0usize;

  while done < blocks {
    let first_diff: i64;
    // SAFETY: both pointers address BLOCK in-bounds bytes; v0/v8 groups
    // and the v16 mask register are clobbered.
    unsafe {
      asm!(
        "vsetvli t0, {avl}, e8, m8, ta, ma",
        "vle8.v v0, ({a})",
        "vle8.v v8, ({b})",
        "vmsne.vv v16, v0, v8",
        "vfirst.m {first}, v16",
        avl = in(reg) BLOCK,
        a = in(reg) a.as_ptr().add(done),
        b = in(reg) b.as_ptr().add(done),
        first = lateout(reg) first_diff,
        out("t0") _,
        out("v0") _,
        out("v1") _,
        out("v2") _,
        out("v3") _,
        out("v4") _,
        out("v5") _,
        out("v6") _,
        out("v7") _,
        out("v8") _,
        out("v9") _,
        out("v10") _,
        out("v11") _,
        out("v12") _,
        out("v13") _,
        out("v14") _,
        out("v15") _,
        out("v16") _,
        options(nostack)
      );
    }

    if first_diff >= 0 {
      // The mask only says that this block differs somewhere; rescan it
      // scalar for the exact signed result.
      return portable::compare(&a[done..done + BLOCK], &b[done..done + BLOCK]);
    }
    done += BLOCK;
  }

  portable::compare(&a[blocks..], &b[blocks..])
}
