//! Differential fuzzing of the bulk kernels.
//!
//! Runs every kernel executable on this machine over the same input and
//! asserts cross-kernel agreement, plus self-consistency of the public
//! dispatched API against a plain scalar computation.

#![no_main]

use arbitrary::Arbitrary;
use bulk::kernel_test::{
  run_all_compare_kernels, run_all_copy_kernels, run_all_fill_kernels, run_all_xor_kernels,
};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  a: Vec<u8>,
  b: Vec<u8>,
  value: u8,
}

fuzz_target!(|input: Input| {
  let Input { a, b, value } = input;
  let len = a.len().min(b.len());
  let a = &a[..len];
  let b = &b[..len];

  // ─── copy ───
  let copies = run_all_copy_kernels(a);
  for r in &copies {
    assert_eq!(r.output.as_slice(), a, "copy kernel {} diverged", r.name);
  }

  // ─── fill ───
  for r in run_all_fill_kernels(len, value) {
    assert!(r.output.iter().all(|&x| x == value), "fill kernel {} diverged", r.name);
  }

  // ─── xor ───
  let expected: Vec<u8> = a.iter().zip(b).map(|(&x, &y)| x ^ y).collect();
  for r in run_all_xor_kernels(a, b) {
    assert_eq!(r.output, expected, "xor kernel {} diverged", r.name);
  }

  // Dispatched public API agrees with the expectation too.
  let mut out = vec![0u8; len];
  bulk::xor(a, b, &mut out);
  assert_eq!(out, expected, "dispatched xor diverged");

  // ─── compare ───
  let results = run_all_compare_kernels(a, b);
  let oracle = results[0].output;
  assert_eq!(oracle == 0, a == b, "compare zero/non-zero mismatch");
  for r in &results {
    assert_eq!(r.output, oracle, "compare kernel {} diverged", r.name);
  }
});
