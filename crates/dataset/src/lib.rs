//! Parallel dataset initialization for rvfill.
//!
//! This crate turns the lower layers (capability detection, fences, bulk
//! copy) into the per-worker fill routine and the policies around it:
//!
//! - [`optimal_thread_count`]: how many workers a region deserves
//! - [`partition_chunk_size`]: how the total region is divided between
//!   threads
//! - [`work_chunk_size`]: how big one copy iteration is inside a worker
//! - [`pin_current_thread`]: best-effort core affinity
//! - [`run_init_worker`]: the per-thread fill routine
//! - [`Progress`]: an atomic byte counter shared across workers
//!
//! The crate spawns no threads itself. An orchestrator splits the
//! destination into disjoint `&mut` slices (`split_at_mut`, `chunks_mut`)
//! and runs one worker per slice on whatever parallelism it owns:
//!
//! ```
//! use dataset::{Progress, optimal_thread_count, run_init_worker_with_progress};
//!
//! let cache: Vec<u8> = (0..4096).map(|i| i as u8).collect();
//! let mut buffer = vec![0u8; 1 << 20];
//!
//! let threads = optimal_thread_count(buffer.len() as u64, 8);
//! let per_worker = buffer.len() / threads;
//! let progress = Progress::new();
//!
//! std::thread::scope(|s| {
//!   for (id, slice) in buffer.chunks_mut(per_worker).enumerate() {
//!     let cache = &cache;
//!     let progress = &progress;
//!     s.spawn(move || {
//!       run_init_worker_with_progress(slice, 0, slice.len(), cache, id, progress);
//!     });
//!   }
//! });
//!
//! assert_eq!(progress.bytes(), 1 << 20);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod affinity;
pub mod chunk;
pub mod threads;
pub mod worker;

pub use affinity::pin_current_thread;
pub use chunk::{partition_chunk_size, work_chunk_size};
pub use threads::optimal_thread_count;
pub use worker::{Progress, run_init_worker, run_init_worker_with_progress};
