//! CPU capability representation.
//!
//! [`Caps`] is a 64-bit feature bitset. It answers one question for the
//! kernel dispatcher: "which instructions can legally run on this machine?"
//!
//! # Bit Layout
//!
//! - Bits 0-31: x86/x86_64 features
//! - Bits 32-63: aarch64 features
//!
//! Kernels never test single bits directly; they test the `*_READY` bundles,
//! which name every feature a kernel's `#[target_feature]` list enables.

use core::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Core Capability Type
// ─────────────────────────────────────────────────────────────────────────────

/// CPU capabilities as a feature bitset.
///
/// `Caps` is `Copy` and freely shareable across threads.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Caps(pub(crate) u64);

impl Caps {
  /// Empty capability set. Only portable kernels qualify.
  pub const NONE: Self = Self(0);

  /// Create a capability set from raw bits.
  #[cfg(any(test, feature = "testing"))]
  #[inline]
  #[must_use]
  pub const fn from_raw(bits: u64) -> Self {
    Self(bits)
  }

  /// Raw underlying bits.
  #[inline]
  #[must_use]
  pub const fn bits(self) -> u64 {
    self.0
  }

  /// Check that every feature in `required` is present.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    self.0 & required.0 == required.0
  }

  /// Union of two capability sets.
  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self(self.0 | other.0)
  }

  /// Intersection of two capability sets.
  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self(self.0 & other.0)
  }

  /// Features of `self` that are missing from `available`.
  #[inline]
  #[must_use]
  pub const fn missing_from(self, available: Self) -> Self {
    Self(self.0 & !available.0)
  }

  /// Check if the capability set is empty.
  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }

  /// Number of features present.
  #[inline]
  #[must_use]
  pub const fn count(self) -> u32 {
    self.0.count_ones()
  }

  /// Capability set with a single bit set.
  ///
  /// # Panics
  ///
  /// Panics at compile time when `bit >= 64` in const contexts.
  #[inline]
  #[must_use]
  pub const fn bit(bit: u8) -> Self {
    assert!(bit < 64, "capability bit out of range");
    Self(1u64 << bit)
  }

  /// Names of the known features present in this set, in bit order.
  pub fn names(self) -> impl Iterator<Item = &'static str> {
    NAMES.iter().filter(move |(caps, _)| self.has(*caps)).map(|(_, name)| *name)
  }
}

impl core::ops::BitOr for Caps {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self {
    self.union(rhs)
  }
}

impl core::ops::BitAnd for Caps {
  type Output = Self;

  #[inline]
  fn bitand(self, rhs: Self) -> Self {
    self.intersection(rhs)
  }
}

impl core::ops::BitOrAssign for Caps {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    self.0 |= rhs.0;
  }
}

impl fmt::Display for Caps {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut names = self.names();
    match names.next() {
      None => f.write_str("none"),
      Some(first) => {
        f.write_str(first)?;
        for name in names {
          write!(f, "+{name}")?;
        }
        Ok(())
      }
    }
  }
}

impl fmt::Debug for Caps {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Caps({self})")
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86 / x86_64 Features
// ─────────────────────────────────────────────────────────────────────────────

/// x86 and x86_64 features used by CRC kernels.
pub mod x86 {
  use super::Caps;

  pub const SSE2: Caps = Caps::bit(0);
  pub const SSSE3: Caps = Caps::bit(1);
  pub const SSE41: Caps = Caps::bit(2);
  pub const SSE42: Caps = Caps::bit(3);
  pub const PCLMULQDQ: Caps = Caps::bit(4);

  /// Everything the 128-bit CLMUL folding kernel enables:
  /// `pshufb` (SSSE3), SSE4.1 and `pclmulqdq`.
  pub const CLMUL_READY: Caps = Caps(SSSE3.0 | SSE41.0 | PCLMULQDQ.0);

  /// SSE4.2 `crc32` instruction (CRC-32C polynomial only).
  pub const CRC32C_READY: Caps = SSE42;
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64 Features
// ─────────────────────────────────────────────────────────────────────────────

/// aarch64 features used by CRC kernels.
pub mod aarch64 {
  use super::Caps;

  pub const NEON: Caps = Caps::bit(32);
  pub const AES: Caps = Caps::bit(33);
  pub const PMULL: Caps = Caps::bit(34);
  pub const CRC: Caps = Caps::bit(35);

  /// NEON table lookups plus 64x64 polynomial multiply.
  ///
  /// Rust gates `vmull_p64` behind the `aes` target feature.
  pub const PMULL_READY: Caps = Caps(NEON.0 | AES.0 | PMULL.0);

  /// ARMv8 CRC32 extension (both CRC-32 and CRC-32C instructions).
  pub const CRC_READY: Caps = CRC;
}

const NAMES: [(Caps, &str); 9] = [
  (x86::SSE2, "sse2"),
  (x86::SSSE3, "ssse3"),
  (x86::SSE41, "sse4.1"),
  (x86::SSE42, "sse4.2"),
  (x86::PCLMULQDQ, "pclmulqdq"),
  (aarch64::NEON, "neon"),
  (aarch64::AES, "aes"),
  (aarch64::PMULL, "pmull"),
  (aarch64::CRC, "crc"),
];

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::{string::ToString, vec::Vec};

  use super::*;

  #[test]
  fn has_requires_every_bit() {
    let caps = x86::SSSE3 | x86::PCLMULQDQ;
    assert!(caps.has(x86::PCLMULQDQ));
    assert!(!caps.has(x86::CLMUL_READY));
    assert!((caps | x86::SSE41).has(x86::CLMUL_READY));
    assert!(caps.has(Caps::NONE));
  }

  #[test]
  fn missing_from_reports_gap() {
    let available = x86::SSSE3 | x86::PCLMULQDQ;
    assert_eq!(x86::CLMUL_READY.missing_from(available), x86::SSE41);
    assert!(x86::CLMUL_READY.missing_from(x86::CLMUL_READY).is_empty());
  }

  #[test]
  fn bundles_do_not_overlap_arches() {
    assert!(x86::CLMUL_READY.intersection(aarch64::PMULL_READY).is_empty());
    assert_eq!(aarch64::PMULL_READY.count(), 3);
  }

  #[test]
  fn display_lists_names() {
    assert_eq!(Caps::NONE.to_string(), "none");
    assert_eq!((x86::SSE42 | x86::SSE2).to_string(), "sse2+sse4.2");
    let names: Vec<_> = aarch64::PMULL_READY.names().collect();
    assert_eq!(names, ["neon", "aes", "pmull"]);
  }

  #[test]
  fn raw_round_trip() {
    let caps = Caps::from_raw(0b1011);
    assert_eq!(caps.bits(), 0b1011);
    assert_eq!(caps.count(), 3);
  }
}
