//! Per-thread dataset fill worker.
//!
//! Each worker owns a disjoint destination range and replays the shared
//! read-only cache buffer into it, wrapping cyclically when the range is
//! larger than the cache. A worker runs the same fixed sequence every
//! time:
//!
//! 1. best-effort pin to its core (never fatal)
//! 2. full fence, then the fill loop in work-chunk steps with prefetch,
//!    fencing every 16th iteration to bound cross-core staleness
//! 3. one final full fence, after which the filled range is visible to
//!    any thread that synchronizes with this worker's completion
//!
//! There are no retries and no partial-failure states: the worker either
//! completes its whole range or a precondition was violated (and the
//! assertions below turn that into a panic before any memory is
//! corrupted). A chunk copy is never interrupted mid-chunk.
//!
//! # Concurrency
//!
//! Destination disjointness is expressed in the types: each worker holds
//! `&mut` on its own slice, so overlap is unrepresentable. The cache is
//! shared `&[u8]` and read-only for the whole pass. Cross-worker shared
//! state (such as [`Progress`]) goes through atomic cells only.

use atomics::{Atomic64, fence};
use bulk::prefetch;

use crate::{affinity, chunk};

// ─────────────────────────────────────────────────────────────────────────────
// Progress Counter
// ─────────────────────────────────────────────────────────────────────────────

/// Shared byte counter for observing a multi-worker fill.
///
/// Workers add to it with an atomic read-modify-write; any thread may read
/// it concurrently. The count is monotone during a pass; readers see it
/// lag at most one work chunk per worker behind the bytes actually
/// written.
#[derive(Debug, Default)]
pub struct Progress(Atomic64);

impl Progress {
  /// New counter at zero.
  #[must_use]
  pub const fn new() -> Self {
    Self(Atomic64::new(0))
  }

  /// Record `n` more bytes as filled.
  #[inline]
  pub fn add_bytes(&self, n: u64) {
    let _ = self.0.fetch_add(n);
  }

  /// Total bytes recorded so far.
  #[inline]
  #[must_use]
  pub fn bytes(&self) -> u64 {
    self.0.load()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Worker Entry Points
// ─────────────────────────────────────────────────────────────────────────────

/// Fill `dataset[start_offset..start_offset + size]` from `cache`,
/// wrapping the cache cyclically.
///
/// `thread_id` doubles as the core id for affinity pinning; ids outside
/// the machine's core range skip pinning. After this function returns,
/// every byte `i` of the worker's range satisfies
/// `dataset[start_offset + i] == cache[i % cache.len()]`, and the final
/// fence guarantees the writes are visible to any thread that
/// subsequently synchronizes with this worker (joins it or observes a
/// completion flag through an atomic cell).
///
/// `size == 0` is valid and completes trivially.
///
/// # Panics
///
/// Panics if `start_offset + size` overflows or exceeds `dataset.len()`,
/// or if `cache` is empty while `size > 0`.
pub fn run_init_worker(dataset: &mut [u8], start_offset: usize, size: usize, cache: &[u8], thread_id: usize) {
  run_worker(dataset, start_offset, size, cache, thread_id, None);
}

/// [`run_init_worker`], additionally bumping `progress` once per work
/// chunk.
pub fn run_init_worker_with_progress(
  dataset: &mut [u8],
  start_offset: usize,
  size: usize,
  cache: &[u8],
  thread_id: usize,
  progress: &Progress,
) {
  run_worker(dataset, start_offset, size, cache, thread_id, Some(progress));
}

fn run_worker(
  dataset: &mut [u8],
  start_offset: usize,
  size: usize,
  cache: &[u8],
  thread_id: usize,
  progress: Option<&Progress>,
) {
  let end = start_offset.checked_add(size);
  assert!(
    end.is_some_and(|e| e <= dataset.len()),
    "worker range {start_offset}+{size} exceeds dataset of {} bytes",
    dataset.len()
  );
  assert!(!cache.is_empty() || size == 0, "cache must be non-empty for a non-empty fill");

  let topo = platform::topology();

  // Idle -> AffinityBound. Binding failure is recovered locally: the
  // worker proceeds unbound.
  if affinity::pin_current_thread(thread_id, topo.num_cores) {
    log::trace!("worker {thread_id}: pinned to core {thread_id}");
  } else if thread_id < topo.num_cores {
    log::warn!("worker {thread_id}: affinity binding failed, running unbound");
  } else {
    log::debug!("worker {thread_id}: core id out of range ({} cores), running unbound", topo.num_cores);
  }

  // AffinityBound -> Filling.
  fence::full();

  let work_chunk = chunk::work_chunk_size(topo.l2_size);
  let line = topo.cache_line_size;
  let cache_len = cache.len();
  let dest = &mut dataset[start_offset..start_offset + size];

  log::trace!("worker {thread_id}: filling {size} bytes in {work_chunk}-byte chunks from a {cache_len}-byte cache");

  let mut offset = 0usize;
  let mut iteration = 0usize;
  while offset < size {
    let chunk_len = work_chunk.min(size - offset);

    // One work chunk may straddle the cache end; split it there so every
    // destination byte i gets cache[i % cache_len] exactly.
    let mut copied = 0usize;
    while copied < chunk_len {
      let pos = offset + copied;
      let src_off = pos % cache_len;
      let span = (chunk_len - copied).min(cache_len - src_off);
      let src = &cache[src_off..src_off + span];

      // Walk the source span one line ahead of the copy.
      let mut p = 0usize;
      while p < span {
        // SAFETY: prefetch is a hint and the wrapping address is inside
        // (or one line past) the span.
        unsafe {
          prefetch::read(src.as_ptr().wrapping_add(p));
        }
        p += line;
      }

      bulk::copy_aligned(&mut dest[pos..pos + span], src, line);
      copied += span;
    }

    if let Some(progress) = progress {
      progress.add_bytes(chunk_len as u64);
    }

    // Periodic, not per-iteration: bounds staleness at a bounded
    // synchronization cost.
    if iteration % 16 == 15 {
      fence::full();
    }

    offset += chunk_len;
    iteration += 1;
  }

  // Filling -> Barriered -> Done.
  fence::full();

  log::trace!("worker {thread_id}: done");
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
