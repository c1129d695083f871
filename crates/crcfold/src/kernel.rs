//! The closed set of kernels and the polynomials they serve.

use core::fmt;

/// A CRC kernel family.
///
/// Not every kernel exists for every [`Width`]; see
/// [`crate::crc32_with`] and friends for what each polynomial provides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kernel {
  /// One bit per step. The reference oracle.
  Bitwise,
  /// One 256-entry table lookup per byte.
  Sarwate,
  /// Four tables, one 32-bit word per step.
  Slice4,
  /// CLMUL simulated with shift/XOR cascades on 64-bit words.
  Clsim,
  /// The [`Kernel::Clsim`] word walk with scalar 64-bit PCLMULQDQ or PMULL
  /// products in place of the cascades.
  ClsimHw,
  /// 128-bit CLMUL folding (PCLMULQDQ or PMULL).
  Clmul,
  /// Native CRC instructions.
  Hw,
  /// Native CRC instructions on four interleaved 4 KiB streams.
  HwParallel4,
}

impl Kernel {
  /// Every kernel, cheapest CPU requirements first.
  pub const ALL: [Self; 8] = [
    Self::Bitwise,
    Self::Sarwate,
    Self::Slice4,
    Self::Clsim,
    Self::ClsimHw,
    Self::Clmul,
    Self::Hw,
    Self::HwParallel4,
  ];

  /// Stable lowercase name, as accepted by the `CRCFOLD_*_KERNEL` variables.
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Bitwise => "bitwise",
      Self::Sarwate => "sarwate",
      Self::Slice4 => "slice4",
      Self::Clsim => "clsim",
      Self::ClsimHw => "clsim-hw",
      Self::Clmul => "clmul",
      Self::Hw => "hw",
      Self::HwParallel4 => "hw-parallel4",
    }
  }

  /// Whether the kernel needs CPU features beyond baseline.
  #[must_use]
  pub const fn is_accelerated(self) -> bool {
    matches!(self, Self::ClsimHw | Self::Clmul | Self::Hw | Self::HwParallel4)
  }
}

impl fmt::Display for Kernel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A supported CRC polynomial.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Width {
  /// CRC-32 (ISO-HDLC), reflected `0xEDB88320`.
  Crc32,
  /// CRC-64/XZ, reflected `0xC96C5795D7870F42`.
  Crc64,
  /// CRC-32C (Castagnoli), reflected `0x82F63B78`.
  Crc32c,
}

impl Width {
  pub const ALL: [Self; 3] = [Self::Crc32, Self::Crc64, Self::Crc32c];

  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Crc32 => "crc32",
      Self::Crc64 => "crc64",
      Self::Crc32c => "crc32c",
    }
  }
}

impl fmt::Display for Width {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
