//! Cross-kernel equivalence tests.
//!
//! Every kernel executable on this machine must agree with the portable
//! oracle for any input: any length (block multiples, remainders, empty),
//! any contents. On a vector-capable riscv64 machine this exercises the
//! RVV kernels against the scalar ones; elsewhere it pins down the oracle
//! against independently computed expectations so the contract is still
//! checked.

use bulk::kernel_test::{
  run_all_compare_kernels, run_all_copy_kernels, run_all_fill_kernels, run_all_xor_kernels,
};
use proptest::prelude::*;

fn pattern(len: usize, seed: u8) -> Vec<u8> {
  (0..len).map(|i| (i as u8).wrapping_mul(131).wrapping_add(seed)).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Exhaustive small-length sweeps
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn copy_kernels_agree_for_all_lengths_up_to_4096() {
  for len in 0..=4096usize {
    let src = pattern(len, 17);
    let results = run_all_copy_kernels(&src);

    let oracle = &results[0];
    assert_eq!(oracle.name, "portable");
    assert_eq!(oracle.output, src);

    for r in &results[1..] {
      assert_eq!(r.output, oracle.output, "kernel {} diverged at len={len}", r.name);
    }
  }
}

#[test]
fn fill_kernels_agree_for_all_lengths_up_to_4096() {
  for len in 0..=4096usize {
    let value = (len % 251) as u8;
    let results = run_all_fill_kernels(len, value);

    let oracle = &results[0];
    assert!(oracle.output.iter().all(|&b| b == value));

    for r in &results[1..] {
      assert_eq!(r.output, oracle.output, "kernel {} diverged at len={len}", r.name);
    }
  }
}

#[test]
fn xor_kernels_agree_for_all_lengths_up_to_4096() {
  for len in 0..=4096usize {
    let a = pattern(len, 3);
    let b = pattern(len, 201);
    let results = run_all_xor_kernels(&a, &b);

    let expected: Vec<u8> = a.iter().zip(&b).map(|(&x, &y)| x ^ y).collect();
    let oracle = &results[0];
    assert_eq!(oracle.output, expected);

    for r in &results[1..] {
      assert_eq!(r.output, oracle.output, "kernel {} diverged at len={len}", r.name);
    }
  }
}

#[test]
fn compare_kernels_agree_on_equal_and_flipped_inputs() {
  for len in 0..=2048usize {
    let a = pattern(len, 90);

    let equal = run_all_compare_kernels(&a, &a);
    for r in &equal {
      assert_eq!(r.output, 0, "kernel {} nonzero on equal input, len={len}", r.name);
    }

    if len == 0 {
      continue;
    }

    // Flip one byte at positions that straddle block boundaries.
    for &pos in &[0, len / 2, len - 1] {
      let mut b = a.clone();
      b[pos] = b[pos].wrapping_add(1);
      let results = run_all_compare_kernels(&a, &b);

      let oracle = results[0].output;
      assert_ne!(oracle, 0);
      for r in &results[1..] {
        assert_eq!(r.output, oracle, "kernel {} diverged at len={len} pos={pos}", r.name);
      }
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pinned cases
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn xor_130_bytes_two_blocks_plus_tail() {
  // 130 = two 64-byte vector blocks plus a 2-byte scalar tail; the seam
  // between the block loop and the remainder handling must be invisible.
  let a = pattern(130, 14);
  let b = pattern(130, 77);

  let mut out = vec![0u8; 130];
  bulk::xor(&a, &b, &mut out);

  for i in 0..130 {
    assert_eq!(out[i], a[i] ^ b[i], "byte {i}");
  }

  for r in run_all_xor_kernels(&a, &b) {
    assert_eq!(r.output, out, "kernel {}", r.name);
  }
}

#[test]
fn compare_difference_in_tail_only() {
  // Equal across every full block, unequal only in the scalar tail.
  let a = pattern(130, 8);
  let mut b = a.clone();
  b[129] ^= 1;

  let results = run_all_compare_kernels(&a, &b);
  let oracle = results[0].output;
  assert_ne!(oracle, 0);
  for r in &results {
    assert_eq!(r.output, oracle, "kernel {}", r.name);
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Property-based sweeps
// ─────────────────────────────────────────────────────────────────────────────

proptest! {
  #[test]
  fn copy_kernels_agree(src in proptest::collection::vec(any::<u8>(), 0..4096)) {
    let results = run_all_copy_kernels(&src);
    prop_assert_eq!(&results[0].output, &src);
    for r in &results[1..] {
      prop_assert_eq!(&r.output, &results[0].output, "kernel {}", r.name);
    }
  }

  #[test]
  fn xor_kernels_agree(
    pair in proptest::collection::vec(any::<(u8, u8)>(), 0..4096),
  ) {
    let a: Vec<u8> = pair.iter().map(|&(x, _)| x).collect();
    let b: Vec<u8> = pair.iter().map(|&(_, y)| y).collect();

    let expected: Vec<u8> = a.iter().zip(&b).map(|(&x, &y)| x ^ y).collect();
    for r in run_all_xor_kernels(&a, &b) {
      prop_assert_eq!(&r.output, &expected, "kernel {}", r.name);
    }
  }

  #[test]
  fn fill_kernels_agree(len in 0usize..4096, value in any::<u8>()) {
    for r in run_all_fill_kernels(len, value) {
      prop_assert!(r.output.iter().all(|&x| x == value), "kernel {}", r.name);
      prop_assert_eq!(r.output.len(), len);
    }
  }

  #[test]
  fn compare_kernels_agree(
    pair in proptest::collection::vec(any::<(u8, u8)>(), 0..4096),
  ) {
    let a: Vec<u8> = pair.iter().map(|&(x, _)| x).collect();
    let b: Vec<u8> = pair.iter().map(|&(_, y)| y).collect();

    let results = run_all_compare_kernels(&a, &b);
    let oracle = results[0].output;

    // Zero/non-zero must match bytewise equality; every kernel must agree
    // exactly, sign included.
    prop_assert_eq!(oracle == 0, a == b);
    for r in &results {
      prop_assert_eq!(r.output, oracle, "kernel {}", r.name);
    }
  }

  #[test]
  fn copy_aligned_is_byte_identical(
    src in proptest::collection::vec(any::<u8>(), 0..8192),
    line_shift in 3u32..8,
  ) {
    let line = 1usize << line_shift;
    let mut dst = vec![0u8; src.len()];
    bulk::copy_aligned(&mut dst, &src, line);
    prop_assert_eq!(dst, src);
  }
}
