//! Kernel selection errors.

use core::fmt;

use platform::Caps;

use crate::kernel::{Kernel, Width};

/// A requested kernel cannot run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KernelError {
  /// The kernel exists for this polynomial but the CPU lacks `missing`.
  Unavailable {
    kernel: Kernel,
    width: Width,
    missing: Caps,
  },
  /// No instance of the kernel exists for this polynomial on this target.
  Unsupported { kernel: Kernel, width: Width },
}

impl KernelError {
  /// The kernel that was requested.
  #[inline]
  #[must_use]
  pub const fn kernel(&self) -> Kernel {
    match *self {
      Self::Unavailable { kernel, .. } | Self::Unsupported { kernel, .. } => kernel,
    }
  }
}

impl fmt::Display for KernelError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Unavailable { kernel, width, missing } => {
        write!(f, "{width} kernel `{kernel}` unavailable: cpu lacks {missing}")
      }
      Self::Unsupported { kernel, width } => write!(f, "{width} has no `{kernel}` kernel on this target"),
    }
  }
}

impl core::error::Error for KernelError {}
