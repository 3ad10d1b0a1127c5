//! Fuzzing the cache-aware copier against a plain copy.
//!
//! Whatever the alignment of the (heap-allocated, arbitrarily-sliced)
//! buffers, `copy_aligned` must be byte-identical to a plain copy.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  src: Vec<u8>,
  // Shift the window start to vary base alignment.
  skip: u8,
  line_shift: u8,
}

fuzz_target!(|input: Input| {
  let Input { src, skip, line_shift } = input;

  let line = 1usize << (3 + (line_shift % 5)); // 8..=128
  let skip = (skip as usize).min(src.len());
  let src = &src[skip..];

  let mut dst = vec![0u8; src.len()];
  bulk::copy_aligned(&mut dst, src, line);

  assert_eq!(dst.as_slice(), src, "copy_aligned diverged from plain copy (line={line})");
});
