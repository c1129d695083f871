//! Kernel equivalence harness.
//!
//! Runs a kernel over every start offset `s` in `0..16` and every length `n`
//! in `0..64` of a fixed 80-byte pattern in a 16-aligned buffer, and compares
//! against the bitwise reference for the same polynomial:
//!
//! ```text
//! buf[k] = (k * 0x76543210) >> 24      (32-bit wrapping)
//! K(buf[s..s + n], seed) == reference(buf[s..s + n], seed)
//! ```
//!
//! Seeds are [`SEED32`] and [`SEED64`]. The first disagreement is returned as
//! a [`Mismatch`].

use core::fmt;

use backend::dispatch::{Crc32Fn, Crc64Fn};

use crate::{
  common::reference::{crc32_bitwise, crc64_bitwise},
  constants::{crc32, crc32c, crc64},
  kernel::Width,
};

/// Seed for 32-bit sweeps.
pub const SEED32: u32 = 0x0123_4567;
/// Seed for 64-bit sweeps.
pub const SEED64: u64 = 0x0123_4567_89AB_CDEF;

/// Start offsets checked: `0..OFFSETS`.
pub const OFFSETS: usize = 16;
/// Lengths checked: `0..LENGTHS`.
pub const LENGTHS: usize = 64;

const PATTERN_LEN: usize = 80;
const _: () = assert!(OFFSETS - 1 + LENGTHS - 1 <= PATTERN_LEN);

#[repr(align(16))]
struct Pattern([u8; PATTERN_LEN]);

static PATTERN: Pattern = Pattern(pattern());

#[allow(clippy::indexing_slicing)]
const fn pattern() -> [u8; PATTERN_LEN] {
  let mut buf = [0u8; PATTERN_LEN];
  let mut k = 0;
  while k < PATTERN_LEN {
    buf[k] = ((k as u32).wrapping_mul(0x7654_3210) >> 24) as u8;
    k += 1;
  }
  buf
}

/// The first input on which a kernel disagreed with the reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mismatch {
  pub width: Width,
  /// Kernel name, e.g. `"portable/slice4"`.
  pub kernel: &'static str,
  /// Start offset into the pattern.
  pub s: usize,
  /// Input length.
  pub n: usize,
  pub expected: u64,
  pub actual: u64,
}

impl Mismatch {
  /// Process exit status for a failed run.
  #[must_use]
  pub const fn exit_code(&self) -> i32 {
    1
  }
}

impl fmt::Display for Mismatch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} {} mismatch at (s={}, n={}): expected {:#x}, got {:#x}",
      self.width, self.kernel, self.s, self.n, self.expected, self.actual
    )
  }
}

impl core::error::Error for Mismatch {}

fn sweep<W: Copy + Eq + Into<u64>>(
  width: Width,
  name: &'static str,
  seed: W,
  kernel: fn(W, &[u8]) -> W,
  reference: impl Fn(W, &[u8]) -> W,
) -> Result<(), Mismatch> {
  for s in 0..OFFSETS {
    for n in 0..LENGTHS {
      let Some(input) = PATTERN.0.get(s..s + n) else {
        continue;
      };
      let expected = reference(seed, input);
      let actual = kernel(seed, input);
      if actual != expected {
        let mismatch = Mismatch {
          width,
          kernel: name,
          s,
          n,
          expected: expected.into(),
          actual: actual.into(),
        };
        crate::log_error!("{mismatch}");
        return Err(mismatch);
      }
    }
  }
  Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Single kernels
// ─────────────────────────────────────────────────────────────────────────────

/// Sweep one CRC-32 kernel.
///
/// # Errors
///
/// The first `(s, n)` where `kernel` disagrees with the reference.
pub fn check_crc32_kernel(name: &'static str, kernel: Crc32Fn) -> Result<(), Mismatch> {
  sweep(Width::Crc32, name, SEED32, kernel, |c, d| crc32_bitwise(crc32::POLY, c, d))
}

/// Sweep one CRC-64/XZ kernel.
///
/// # Errors
///
/// The first `(s, n)` where `kernel` disagrees with the reference.
pub fn check_crc64_kernel(name: &'static str, kernel: Crc64Fn) -> Result<(), Mismatch> {
  sweep(Width::Crc64, name, SEED64, kernel, |c, d| crc64_bitwise(crc64::POLY, c, d))
}

/// Sweep one CRC-32C kernel against the Castagnoli reference.
///
/// # Errors
///
/// The first `(s, n)` where `kernel` disagrees with the reference.
pub fn check_crc32c_kernel(name: &'static str, kernel: Crc32Fn) -> Result<(), Mismatch> {
  sweep(Width::Crc32c, name, SEED32, kernel, |c, d| crc32_bitwise(crc32c::POLY, c, d))
}

// ─────────────────────────────────────────────────────────────────────────────
// Every available kernel
// ─────────────────────────────────────────────────────────────────────────────

/// Sweep every CRC-32 kernel the CPU can run, plus the software CLMUL model.
///
/// # Errors
///
/// The first failing kernel's [`Mismatch`].
pub fn check_crc32() -> Result<(), Mismatch> {
  for selected in crate::crc32::REGISTRY.available(platform::caps()) {
    check_crc32_kernel(selected.name, selected.func.1)?;
  }
  check_crc32_kernel(crate::simd::soft::NAME, crate::simd::soft::crc32_soft)
}

/// Sweep every CRC-64/XZ kernel the CPU can run, plus the software CLMUL model.
///
/// # Errors
///
/// The first failing kernel's [`Mismatch`].
pub fn check_crc64() -> Result<(), Mismatch> {
  for selected in crate::crc64::REGISTRY.available(platform::caps()) {
    check_crc64_kernel(selected.name, selected.func.1)?;
  }
  check_crc64_kernel(crate::simd::soft::NAME, crate::simd::soft::crc64_soft)
}

/// Sweep every CRC-32C kernel the CPU can run.
///
/// # Errors
///
/// The first failing kernel's [`Mismatch`].
pub fn check_crc32c() -> Result<(), Mismatch> {
  for selected in crate::crc32c::REGISTRY.available(platform::caps()) {
    check_crc32c_kernel(selected.name, selected.func.1)?;
  }
  Ok(())
}

/// Sweep every kernel of every width.
///
/// # Errors
///
/// The first failing kernel's [`Mismatch`].
pub fn check_all() -> Result<(), Mismatch> {
  check_crc32()?;
  check_crc64()?;
  check_crc32c()
}
