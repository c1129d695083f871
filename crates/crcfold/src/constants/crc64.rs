//! CRC-64/XZ constants.
//!
//! Polynomial: 0x42F0E1EBA9EA3693 (reflected: 0xC96C5795D7870F42)
//! Used by: XZ Utils, 7-Zip

use super::Aligned64;
use crate::common::{
  gf2::{calc_hi64, calc_lo64},
  tables::{sarwate64, slice4_64},
};

/// CRC-64/XZ polynomial in reflected (bit-reversed) form.
pub const POLY: u64 = 0xC96C_5795_D787_0F42;

/// Sarwate lookup table (2 KiB).
pub static SARWATE: Aligned64<[u64; 256]> = Aligned64(sarwate64(POLY));

/// Slice-by-4 lookup tables (8 KiB).
pub static SLICE4: Aligned64<[[u64; 256]; 4]> = Aligned64(slice4_64(POLY));

/// Multiplicative constants, shared by the CLMUL fold and its simulation.
///
/// Vector layouts are `(low lane, high lane)`.
pub mod fold {
  use super::{POLY, calc_hi64, calc_lo64};

  /// `P << 1` truncated: Barrett modulus.
  pub const I0: u64 = 0x92D8_AF2B_AF0E_1E84;
  /// `calc_lo(P, 1, 64)`: Barrett quotient.
  pub const I1: u64 = 0x9C3E_466C_1729_63D5;
  /// `calc_hi(P, 1, 64)`: `x^64 mod P`.
  pub const I2: u64 = 0xDABE_95AF_C787_5F40;
  /// `calc_hi(P, I2, 64)`: `x^128 mod P`.
  pub const I3: u64 = 0xE05D_D497_CA39_3AE4;

  /// Fold 16 bytes forward.
  pub const FOLD16: (u64, u64) = (I3, I2);
  /// Barrett reduction to 64 bits.
  pub const FOLD8: (u64, u64) = (I1, I0);

  const _: () = assert!(I0 == POLY << 1);
  const _: () = assert!(I1 == calc_lo64(POLY, 1, 64));
  const _: () = assert!(I2 == calc_hi64(POLY, 1, 64));
  const _: () = assert!(I3 == calc_hi64(POLY, I2, 64));
}
