//! Kernel selection diagnostics.
//!
//! Recomputes the selection a width's dispatcher makes (or made) from the
//! current override and CPU capabilities, without binding anything.

use core::fmt;

use platform::Caps;

use crate::{
  config::Force,
  kernel::{Kernel, Width},
};

/// How a selection was reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionReason {
  /// No override; best available kernel.
  Auto,
  /// The forced kernel is available and was used.
  Forced,
  /// A kernel was forced but cannot run here; auto selection was used.
  ForceUnavailable,
}

/// Selection outcome for one width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionDiag {
  pub width: Width,
  /// The override in effect, before clamping.
  pub requested: Force,
  pub kernel: Kernel,
  /// Candidate name, e.g. `"x86_64/clmul"`.
  pub name: &'static str,
  pub reason: SelectionReason,
  /// Capabilities the selection was made against.
  pub caps: Caps,
}

impl fmt::Display for SelectionDiag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {} ({}", self.width, self.name, self.kernel)?;
    match self.reason {
      SelectionReason::Auto => f.write_str(", auto")?,
      SelectionReason::Forced => f.write_str(", forced")?,
      SelectionReason::ForceUnavailable => write!(f, ", {} unavailable", self.requested)?,
    }
    write!(f, ") caps={}", self.caps)
  }
}

/// Diagnose CRC-32 selection.
#[must_use]
pub fn crc32() -> SelectionDiag {
  crate::crc32::diag(platform::caps())
}

/// Diagnose CRC-64/XZ selection.
#[must_use]
pub fn crc64() -> SelectionDiag {
  crate::crc64::diag(platform::caps())
}

/// Diagnose CRC-32C selection.
#[must_use]
pub fn crc32c() -> SelectionDiag {
  crate::crc32c::diag(platform::caps())
}

/// Diagnose selection for `width`.
#[must_use]
pub fn for_width(width: Width) -> SelectionDiag {
  match width {
    Width::Crc32 => crc32(),
    Width::Crc64 => crc64(),
    Width::Crc32c => crc32c(),
  }
}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::string::ToString;

  use super::*;

  #[test]
  fn display_mentions_unavailable_request() {
    let diag = SelectionDiag {
      width: Width::Crc64,
      requested: Force::Kernel(Kernel::Clmul),
      kernel: Kernel::Slice4,
      name: "portable/slice4",
      reason: SelectionReason::ForceUnavailable,
      caps: Caps::NONE,
    };
    assert_eq!(diag.to_string(), "crc64: portable/slice4 (slice4, clmul unavailable) caps=none");
  }

  #[test]
  fn diag_agrees_with_width() {
    for width in Width::ALL {
      assert_eq!(for_width(width).width, width);
    }
  }
}
