//! Atomic cells, memory fences, and scalar bit primitives for rvfill.
//!
//! This crate is the only sanctioned mechanism for sharing mutable state
//! across fill workers. It provides:
//!
//! - [`Atomic32`] / [`Atomic64`]: lock-free load/store/fetch-add/
//!   compare-and-swap cells whose memory orderings are selected once per
//!   process from the detected capability set ([`cell`])
//! - [`fence`]: full/read/write memory barriers
//! - [`bits`]: rotate, population-count, and trailing-zero primitives that
//!   lower to the Zbb instructions when the target enables them
//!
//! # Concurrency contract
//!
//! A memory location accessed by more than one worker must go through an
//! atomic cell for **every** access once the second worker starts. Mixing
//! cell access with plain reads or writes of the same location is not
//! expressible through this API, which is the point.
//!
//! Fences order memory operations between cores; they never block and
//! never fail. See [`fence`] for the exact ordering each barrier provides.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod bits;
pub mod cell;
pub mod fence;

pub use cell::{Atomic32, Atomic64, ordering_path};
