//! Backend crate: dispatch and caching primitives for rvfill.
//!
//! This crate provides the foundation for the rvfill acceleration
//! subsystem:
//!
//! - **Dispatch**: capability-ordered kernel selection ([`dispatch`])
//! - **Caching**: one-time resolution storage ([`OnceCache`])
//!
//! # Architecture
//!
//! Every dual-path operation in the workspace follows the same shape:
//!
//! 1. Register kernels as an ordered [`Candidate`](dispatch::Candidate)
//!    list, best first, portable fallback last.
//! 2. Resolve the list against `platform::caps()` exactly once, storing the
//!    [`Selected`](dispatch::Selected) result in a static [`OnceCache`].
//! 3. Call through the cached function pointer thereafter.
//!
//! The strategy is thereby fixed for the process lifetime; the accelerated
//! and portable implementations never interleave on the same location.
//!
//! ```ignore
//! use backend::{OnceCache, dispatch::{Candidate, Selected, select}};
//!
//! static COPY: OnceCache<Selected<CopyFn>> = OnceCache::new();
//!
//! fn copy_kernel() -> Selected<CopyFn> {
//!     COPY.get_or_init(|| select(platform::caps(), CANDIDATES))
//! }
//! ```

// Fallibility discipline: deny unwrap/expect in production, allow in tests.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod cache;
pub mod dispatch;

// Re-export core dispatch types for convenience.
pub use cache::OnceCache;
pub use dispatch::{Candidate, Selected, select};
