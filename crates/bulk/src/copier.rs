//! Cache-line-aware block copy with software prefetch.
//!
//! [`copy_aligned`] is the copy primitive used by the dataset fill worker.
//! When both buffers sit on cache-line boundaries and the span is long
//! enough to amortize the setup, it walks the buffers one cache line at a
//! time, prefetching two lines ahead on both streams and moving each line
//! in 8-byte words. Anything else (misaligned bases, short spans, tail
//! bytes) goes through the plain bytewise route.
//!
//! The path split is a performance decision only: the result is
//! byte-identical to a plain copy for every input.

use crate::prefetch;

/// Lines of lookahead for the software prefetch.
const PREFETCH_LINES: usize = 2;

/// Minimum span (in cache lines) for the line-copy path.
const MIN_LINES: usize = 4;

/// Copy `src` into `dst`, optimizing for cache-line-aligned spans.
///
/// `cache_line_size` is the line size to align on, typically
/// `platform::topology().cache_line_size`.
///
/// # Panics
///
/// Panics if the slice lengths differ, or if `cache_line_size` is not a
/// power of two of at least 8 (the line-copy path moves 8-byte words, so a
/// line must hold a whole number of them).
pub fn copy_aligned(dst: &mut [u8], src: &[u8], cache_line_size: usize) {
  assert_eq!(dst.len(), src.len(), "copy_aligned length mismatch");
  assert!(
    cache_line_size.is_power_of_two() && cache_line_size >= 8,
    "cache_line_size must be a power of two >= 8, got {cache_line_size}"
  );

  let len = dst.len();
  let mask = cache_line_size - 1;
  let dst_off = dst.as_ptr() as usize & mask;
  let src_off = src.as_ptr() as usize & mask;

  if dst_off != 0 || src_off != 0 || len < cache_line_size * MIN_LINES {
    // Bytewise route: misaligned or too short to be worth the line loop.
    dst.copy_from_slice(src);
    return;
  }

  let aligned_len = len & !mask;
  let lookahead = PREFETCH_LINES * cache_line_size;

  let mut pos = 0usize;
  while pos < aligned_len {
    if pos + lookahead < aligned_len {
      // SAFETY: prefetch is a hint; the wrapping addresses stay inside the
      // aligned span here anyway.
      unsafe {
        prefetch::read(src.as_ptr().wrapping_add(pos + lookahead));
        prefetch::write(dst.as_ptr().wrapping_add(pos + lookahead));
      }
    }

    copy_line_words(&mut dst[pos..pos + cache_line_size], &src[pos..pos + cache_line_size]);
    pos += cache_line_size;
  }

  // Tail bytes are always bytewise, whichever route ran above.
  dst[aligned_len..].copy_from_slice(&src[aligned_len..]);
}

/// Copy one cache line in 8-byte words.
///
/// Both slices are exactly one line long and 8-byte aligned (the caller
/// checked line alignment of the bases and walks in line multiples).
#[inline(always)]
fn copy_line_words(dst: &mut [u8], src: &[u8]) {
  for (d, s) in dst.chunks_exact_mut(8).zip(src.chunks_exact(8)) {
    let mut word = [0u8; 8];
    word.copy_from_slice(s);
    d.copy_from_slice(&u64::from_ne_bytes(word).to_ne_bytes());
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
