//! Chunk sizing strategies.
//!
//! Two deliberately separate heuristics govern two different granularities:
//!
//! - [`partition_chunk_size`] sizes the pieces the **total** region is
//!   divided into when handing ranges to threads. It is L2-per-thread
//!   driven and bounded to [1 MiB, 64 MiB].
//! - [`work_chunk_size`] sizes one **copy iteration** inside a worker's
//!   fill loop. It is a fixed fraction of L2 and bounded to
//!   [4 KiB, 64 KiB], small enough that the source window, the
//!   destination line, and the prefetch lookahead coexist in cache.
//!
//! The two are independent knobs and are never derived from each other.

/// Lower bound for [`partition_chunk_size`]: 1 MiB.
pub const MIN_PARTITION_CHUNK: usize = 1024 * 1024;

/// Upper bound for [`partition_chunk_size`]: 64 MiB.
pub const MAX_PARTITION_CHUNK: usize = 64 * 1024 * 1024;

/// Lower bound for [`work_chunk_size`]: 4 KiB.
pub const MIN_WORK_CHUNK: usize = 4 * 1024;

/// Upper bound for [`work_chunk_size`]: 64 KiB.
pub const MAX_WORK_CHUNK: usize = 64 * 1024;

/// Size of the per-thread partition chunk.
///
/// The base is the L2 share of one thread (`l2_size / num_threads`),
/// clamped to `[1 MiB, 64 MiB]` and rounded up to the next
/// `cache_line_size` multiple. The result is a pure function of its
/// arguments.
///
/// `total_size` is part of the signature for callers that partition by
/// both region and machine, but the heuristic is cache-driven: today the
/// region size does not move the result.
///
/// # Panics
///
/// Panics if `num_threads` is zero or `cache_line_size` is not a power of
/// two.
#[must_use]
pub fn partition_chunk_size(total_size: u64, num_threads: usize, l2_size: usize, cache_line_size: usize) -> usize {
  assert!(num_threads >= 1, "num_threads must be at least 1");
  assert!(
    cache_line_size.is_power_of_two(),
    "cache_line_size must be a power of two, got {cache_line_size}"
  );
  let _ = total_size;

  let base = l2_size / num_threads;
  let clamped = base.clamp(MIN_PARTITION_CHUNK, MAX_PARTITION_CHUNK);

  // Round up to the line boundary. MAX_PARTITION_CHUNK is itself a line
  // multiple for every supported line size, so the bound still holds.
  (clamped + cache_line_size - 1) & !(cache_line_size - 1)
}

/// Size of one copy iteration inside the fill loop.
///
/// A quarter of L2, clamped to `[4 KiB, 64 KiB]`.
#[must_use]
pub const fn work_chunk_size(l2_size: usize) -> usize {
  let base = l2_size / 4;
  if base < MIN_WORK_CHUNK {
    MIN_WORK_CHUNK
  } else if base > MAX_WORK_CHUNK {
    MAX_WORK_CHUNK
  } else {
    base
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partition_chunk_clamps_small_l2_share() {
    // 512 KiB L2 over 8 threads is far below the floor.
    let size = partition_chunk_size(1 << 30, 8, 512 * 1024, 64);
    assert_eq!(size, MIN_PARTITION_CHUNK);
  }

  #[test]
  fn partition_chunk_clamps_huge_l2_share() {
    // Absurd L2 with one thread hits the ceiling.
    let size = partition_chunk_size(1 << 30, 1, 256 * 1024 * 1024, 64);
    assert_eq!(size, MAX_PARTITION_CHUNK);
  }

  #[test]
  fn partition_chunk_is_line_multiple() {
    for line in [16usize, 64, 128] {
      for threads in 1..=16 {
        let size = partition_chunk_size(0, threads, 512 * 1024, line);
        assert_eq!(size % line, 0, "threads={threads} line={line}");
      }
    }
  }

  #[test]
  fn partition_chunk_ignores_total_size() {
    let a = partition_chunk_size(0, 4, 2 * 1024 * 1024, 64);
    let b = partition_chunk_size(u64::MAX, 4, 2 * 1024 * 1024, 64);
    assert_eq!(a, b);
  }

  #[test]
  #[should_panic(expected = "num_threads")]
  fn partition_chunk_rejects_zero_threads() {
    let _ = partition_chunk_size(1024, 0, 512 * 1024, 64);
  }

  #[test]
  fn work_chunk_quarter_of_l2_within_bounds() {
    // 512 KiB L2 / 4 = 128 KiB, above the ceiling.
    assert_eq!(work_chunk_size(512 * 1024), MAX_WORK_CHUNK);
    // 8 KiB L2 / 4 = 2 KiB, below the floor.
    assert_eq!(work_chunk_size(8 * 1024), MIN_WORK_CHUNK);
    // 128 KiB L2 / 4 = 32 KiB, in range.
    assert_eq!(work_chunk_size(128 * 1024), 32 * 1024);
  }

  #[test]
  fn work_chunk_bounds_hold_for_any_l2() {
    for l2 in [0usize, 1, 4096, 64 * 1024, 512 * 1024, 16 * 1024 * 1024] {
      let size = work_chunk_size(l2);
      assert!((MIN_WORK_CHUNK..=MAX_WORK_CHUNK).contains(&size), "l2={l2}");
    }
  }
}

#[cfg(test)]
mod proptests {
  use proptest::prelude::*;

  use super::*;

  proptest! {
    /// The partition chunk always lands in [1 MiB, 64 MiB] and on a line
    /// boundary, whatever the machine looks like.
    #[test]
    fn partition_chunk_bounds(
      total in any::<u64>(),
      threads in 1usize..=256,
      l2 in 0usize..=1 << 30,
      line_shift in 3u32..=8,
    ) {
      let line = 1usize << line_shift;
      let size = partition_chunk_size(total, threads, l2, line);

      prop_assert!(size >= MIN_PARTITION_CHUNK);
      prop_assert!(size <= MAX_PARTITION_CHUNK);
      prop_assert_eq!(size % line, 0);
    }

    /// More threads never ask for a bigger per-thread chunk.
    #[test]
    fn partition_chunk_antitone_in_threads(
      threads in 1usize..=128,
      l2 in 0usize..=1 << 30,
    ) {
      let small = partition_chunk_size(0, threads + 1, l2, 64);
      let large = partition_chunk_size(0, threads, l2, 64);
      prop_assert!(small <= large);
    }

    /// The work chunk always lands in [4 KiB, 64 KiB].
    #[test]
    fn work_chunk_bounds(l2 in any::<usize>()) {
      let size = work_chunk_size(l2);
      prop_assert!(size >= MIN_WORK_CHUNK);
      prop_assert!(size <= MAX_WORK_CHUNK);
    }
  }
}
