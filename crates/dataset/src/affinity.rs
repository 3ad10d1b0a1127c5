//! Thread-to-core affinity binding.
//!
//! Pinning a fill worker to one core keeps its working set in that core's
//! L1/L2 instead of migrating mid-fill. Binding is strictly best-effort:
//! an out-of-range core id, an unsupported platform, or an OS refusal all
//! leave the thread unbound and the fill proceeds anyway.

/// Pin the calling thread to `core_id`.
///
/// Returns `true` if the affinity mask was applied. Ids outside
/// `[0, num_cores)` are a no-op returning `false`, not an error; so is
/// any platform without affinity support.
#[cfg(target_os = "linux")]
#[must_use]
pub fn pin_current_thread(core_id: usize, num_cores: usize) -> bool {
  if core_id >= num_cores {
    return false;
  }

  // SAFETY: cpu_set_t is a plain bitmask, so the zeroed value is valid;
  // sched_setaffinity(0, ...) only reads the set and affects the calling
  // thread.
  unsafe {
    let mut set: libc::cpu_set_t = core::mem::zeroed();
    libc::CPU_SET(core_id, &mut set);
    libc::sched_setaffinity(0, core::mem::size_of::<libc::cpu_set_t>(), &set) == 0
  }
}

/// Pin the calling thread to `core_id`.
///
/// Affinity control is not available on this platform; always returns
/// `false` and the thread stays unbound.
#[cfg(not(target_os = "linux"))]
#[must_use]
pub fn pin_current_thread(core_id: usize, num_cores: usize) -> bool {
  let _ = (core_id, num_cores);
  false
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn out_of_range_core_is_a_noop() {
    assert!(!pin_current_thread(usize::MAX, 8));
    assert!(!pin_current_thread(8, 8));
    assert!(!pin_current_thread(0, 0));
  }

  #[test]
  #[cfg(target_os = "linux")]
  fn pinning_to_an_allowed_core_succeeds() {
    // Pick a core from the mask we already have (containers may confine
    // us), pin to it, then restore the original mask so sibling tests are
    // not affected.
    // SAFETY: sched_getaffinity fills `original` for the calling thread;
    // cpu_set_t is a plain bitmask.
    unsafe {
      let mut original: libc::cpu_set_t = core::mem::zeroed();
      if libc::sched_getaffinity(0, core::mem::size_of::<libc::cpu_set_t>(), &mut original) != 0 {
        return; // no affinity support here, nothing to verify
      }

      let allowed = (0..libc::CPU_SETSIZE as usize).find(|&c| libc::CPU_ISSET(c, &original));
      if let Some(core) = allowed {
        assert!(pin_current_thread(core, core + 1));
        let _ = libc::sched_setaffinity(0, core::mem::size_of::<libc::cpu_set_t>(), &original);
      }
    }
  }

  #[test]
  fn in_range_result_is_a_bool_not_a_panic() {
    // Whatever the platform says, the call must come back.
    let _ = pin_current_thread(0, 1024);
  }
}
