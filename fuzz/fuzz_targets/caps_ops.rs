//! Fuzz target for Caps binary operations (union, intersection).
//!
//! Tests algebraic properties:
//! - Commutativity: a | b == b | a, a & b == b & a
//! - Associativity: (a | b) | c == a | (b | c)
//! - Distributivity: a & (b | c) == (a & b) | (a & c)
//! - Subset relationships after operations

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use platform::Caps;

#[derive(Arbitrary, Debug)]
struct Input {
  a: u64,
  b: u64,
  c: u64,
}

fuzz_target!(|input: Input| {
  let a = Caps::from_raw(input.a);
  let b = Caps::from_raw(input.b);
  let c = Caps::from_raw(input.c);

  // ─── Commutativity ───
  assert_eq!(a | b, b | a, "union must be commutative");
  assert_eq!(a & b, b & a, "intersection must be commutative");

  // ─── Associativity ───
  assert_eq!((a | b) | c, a | (b | c), "union must be associative");
  assert_eq!((a & b) & c, a & (b & c), "intersection must be associative");

  // ─── Distributivity ───
  assert_eq!(a & (b | c), (a & b) | (a & c), "intersection must distribute over union");

  // ─── Subset relationships ───
  let union = a | b;
  assert!(union.has(a), "union must contain a");
  assert!(union.has(b), "union must contain b");

  let intersection = a & b;
  assert!(a.has(intersection), "a must contain intersection");
  assert!(b.has(intersection), "b must contain intersection");

  // ─── Counting ───
  assert!(union.count() >= a.count().max(b.count()));
  assert!(intersection.count() <= a.count().min(b.count()));
  assert_eq!(a.is_empty(), a.count() == 0);
});
