//! Capability override behavior.
//!
//! Runs in its own test binary, as a single test: the override is
//! process-global state, and flipping it from concurrent tests would make
//! every `get()` assertion racy.

use platform::{Caps, CacheTopology};

#[test]
#[cfg_attr(miri, ignore = "get() pins to the portable configuration under Miri")]
fn override_set_and_clear() {
  let detected = platform::get();

  let forced_topo = CacheTopology::new(128, 16 * 1024, 256 * 1024, 2);
  platform::set_caps_override(Some((Caps::NONE, forced_topo)));
  assert!(platform::has_override());
  assert_eq!(platform::get(), (Caps::NONE, forced_topo));
  assert_eq!(platform::caps(), Caps::NONE);
  assert_eq!(platform::topology(), forced_topo);

  platform::set_caps_override(None);
  assert!(!platform::has_override());
  assert_eq!(platform::get(), detected);

  // init_with_caps is the same mechanism; the last write wins and
  // clearing restores detection.
  platform::init_with_caps(Caps::NONE, CacheTopology::DEFAULT);
  assert!(platform::has_override());
  assert_eq!(platform::caps(), Caps::NONE);

  platform::set_caps_override(None);
  assert_eq!(platform::get(), detected);
}
