//! Kernel selection overrides.
//!
//! A forced kernel is a *request*: selection clamps it to what the running
//! CPU and the polynomial provide, falling back to auto selection (see
//! [`crate::diag`] for which one happened).
//!
//! Sources, highest priority first:
//!
//! 1. [`set_force`], called before the width's first checksum
//! 2. `CRCFOLD_CRC32_KERNEL`, `CRCFOLD_CRC64_KERNEL`, `CRCFOLD_CRC32C_KERNEL`
//!    (std only, read once)
//! 3. [`Force::Auto`]
//!
//! Accepted names are [`Kernel::as_str`] values, a few aliases, or `auto`.

use core::{
  fmt,
  str::FromStr,
  sync::atomic::{AtomicU8, Ordering},
};

use crate::kernel::{Kernel, Width};

/// Requested kernel selection for one width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Force {
  /// Pick the best available kernel.
  #[default]
  Auto,
  /// Use this kernel if it can run, auto otherwise.
  Kernel(Kernel),
}

impl Force {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::Kernel(kernel) => kernel.as_str(),
    }
  }

  const fn encode(self) -> u8 {
    match self {
      Self::Auto => AUTO,
      Self::Kernel(kernel) => FIRST_KERNEL + kernel as u8,
    }
  }

  fn decode(raw: u8) -> Option<Self> {
    match raw {
      UNSET => None,
      AUTO => Some(Self::Auto),
      _ => Kernel::ALL.get(usize::from(raw - FIRST_KERNEL)).copied().map(Self::Kernel),
    }
  }
}

impl fmt::Display for Force {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A kernel name did not parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct ParseKernelError;

impl fmt::Display for ParseKernelError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("unknown kernel name (expected bitwise, sarwate, slice4, clsim, clsim-hw, clmul, hw, hw-parallel4 or auto)")
  }
}

impl core::error::Error for ParseKernelError {}

impl FromStr for Kernel {
  type Err = ParseKernelError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    const ALIASES: [(&str, Kernel); 7] = [
      ("reference", Kernel::Bitwise),
      ("micro", Kernel::Bitwise),
      ("table", Kernel::Sarwate),
      ("clmul2", Kernel::ClsimHw),
      ("pclmul", Kernel::Clmul),
      ("pmull", Kernel::Clmul),
      ("parallel4", Kernel::HwParallel4),
    ];

    let s = s.trim();
    Kernel::ALL
      .iter()
      .map(|&k| (k.as_str(), k))
      .chain(ALIASES)
      .find(|(name, _)| s.eq_ignore_ascii_case(name))
      .map(|(_, k)| k)
      .ok_or(ParseKernelError)
  }
}

impl FromStr for Force {
  type Err = ParseKernelError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s.trim().eq_ignore_ascii_case("auto") {
      return Ok(Self::Auto);
    }
    s.parse().map(Self::Kernel)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Overrides
// ─────────────────────────────────────────────────────────────────────────────

const UNSET: u8 = 0;
const AUTO: u8 = 1;
const FIRST_KERNEL: u8 = 2;

static PROGRAMMATIC: [AtomicU8; 3] = [AtomicU8::new(UNSET), AtomicU8::new(UNSET), AtomicU8::new(UNSET)];

const fn slot(width: Width) -> usize {
  match width {
    Width::Crc32 => 0,
    Width::Crc64 => 1,
    Width::Crc32c => 2,
  }
}

/// Force kernel selection for `width`.
///
/// Takes priority over the environment. Dispatch binds once per width, so
/// this only affects checksums if called before the first one;
/// [`crate::crc32_with`] and friends are unaffected.
pub fn set_force(width: Width, force: Force) {
  if let Some(cell) = PROGRAMMATIC.get(slot(width)) {
    cell.store(force.encode(), Ordering::Relaxed);
  }
}

/// Remove a programmatic override for `width`.
pub fn clear_force(width: Width) {
  if let Some(cell) = PROGRAMMATIC.get(slot(width)) {
    cell.store(UNSET, Ordering::Relaxed);
  }
}

/// The environment variable consulted for `width`.
#[must_use]
pub const fn env_var(width: Width) -> &'static str {
  match width {
    Width::Crc32 => "CRCFOLD_CRC32_KERNEL",
    Width::Crc64 => "CRCFOLD_CRC64_KERNEL",
    Width::Crc32c => "CRCFOLD_CRC32C_KERNEL",
  }
}

#[cfg(feature = "std")]
fn env_force(width: Width) -> Force {
  use std::sync::OnceLock;

  fn read(width: Width) -> Force {
    let Ok(value) = std::env::var(env_var(width)) else {
      return Force::Auto;
    };
    match value.parse() {
      Ok(force) => force,
      Err(err) => {
        crate::log_warn!("ignoring {}={value:?}: {err}", env_var(width));
        Force::Auto
      }
    }
  }

  static ENV: [OnceLock<Force>; 3] = [OnceLock::new(), OnceLock::new(), OnceLock::new()];
  match ENV.get(slot(width)) {
    Some(cell) => *cell.get_or_init(|| read(width)),
    None => Force::Auto,
  }
}

#[cfg(not(feature = "std"))]
fn env_force(_width: Width) -> Force {
  Force::Auto
}

/// The requested selection for `width`, before clamping to CPU features.
#[must_use]
pub fn force(width: Width) -> Force {
  PROGRAMMATIC
    .get(slot(width))
    .and_then(|cell| Force::decode(cell.load(Ordering::Relaxed)))
    .unwrap_or_else(|| env_force(width))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_names_and_aliases() {
    for kernel in Kernel::ALL {
      assert_eq!(kernel.as_str().parse::<Kernel>(), Ok(kernel));
      assert_eq!(kernel.as_str().to_ascii_uppercase().parse::<Kernel>(), Ok(kernel));
    }
    assert_eq!(" pmull ".parse::<Kernel>(), Ok(Kernel::Clmul));
    assert_eq!("table".parse::<Kernel>(), Ok(Kernel::Sarwate));
    assert_eq!("clmul2".parse::<Kernel>(), Ok(Kernel::ClsimHw));
    assert_eq!("avx512".parse::<Kernel>(), Err(ParseKernelError));
  }

  #[test]
  fn parses_force() {
    assert_eq!("Auto".parse::<Force>(), Ok(Force::Auto));
    assert_eq!("hw-parallel4".parse::<Force>(), Ok(Force::Kernel(Kernel::HwParallel4)));
    assert!("".parse::<Force>().is_err());
  }

  #[test]
  fn encoding_round_trips() {
    assert_eq!(Force::decode(Force::Auto.encode()), Some(Force::Auto));
    for kernel in Kernel::ALL {
      assert_eq!(Force::decode(Force::Kernel(kernel).encode()), Some(Force::Kernel(kernel)));
    }
    assert_eq!(Force::decode(UNSET), None);
    assert_eq!(Force::decode(0xFF), None);
  }

  #[test]
  fn programmatic_force_wins() {
    // Crc32c slot only; other tests bind the remaining widths.
    set_force(Width::Crc32c, Force::Kernel(Kernel::Bitwise));
    assert_eq!(force(Width::Crc32c), Force::Kernel(Kernel::Bitwise));
    clear_force(Width::Crc32c);
    assert_eq!(force(Width::Crc32c), env_force(Width::Crc32c));
  }
}
