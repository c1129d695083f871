//! CRC-32 (ISO-HDLC) constants.
//!
//! Polynomial: 0x04C11DB7 (reflected: 0xEDB88320)
//! Used by: gzip, PKZIP, PNG

use super::Aligned64;
use crate::common::{
  gf2::{calc_hi32, calc_lo32, x8n_32},
  tables::{sarwate32, slice4_32},
};

/// CRC-32 polynomial in reflected (bit-reversed) form.
pub const POLY: u32 = 0xEDB8_8320;

/// Sarwate lookup table (1 KiB).
pub static SARWATE: Aligned64<[u32; 256]> = Aligned64(sarwate32(POLY));

/// Slice-by-4 lookup tables (4 KiB).
pub static SLICE4: Aligned64<[[u32; 256]; 4]> = Aligned64(slice4_32(POLY));

/// 128-bit CLMUL folding constants.
///
/// 33-bit values, shifted left by one so a 64×64 product lines up with the
/// 32-bit register. Vector layouts are `(low lane, high lane)`.
pub mod fold {
  use super::{POLY, calc_hi32, calc_lo32};

  /// `P << 1`: Barrett reduction modulus.
  pub const I0: u64 = 0x1_DB71_0640;
  /// Barrett quotient, `calc_lo(P, P, 32) << 1 | 1`.
  pub const I1: u64 = 0x1_F701_1641;
  /// `calc_hi(P, P, 32) << 1`: 64-bit to 32-bit step.
  pub const I2: u64 = 0x1_63CD_6124;
  /// `calc_hi(P, P, 64) << 1`: high half of a 16-byte fold.
  pub const I3: u64 = 0x0_CCAA_009E;
  /// `calc_hi(P, P, 128) << 1`: low half of a 16-byte fold.
  pub const I4: u64 = 0x1_7519_97D0;

  /// Fold 16 bytes forward.
  pub const FOLD16: (u64, u64) = (I4, I3);
  /// Reduce 128 bits to 96.
  pub const FOLD8: (u64, u64) = (I2, 0);
  /// Barrett reduction to 32 bits.
  pub const FOLD4: (u64, u64) = (I0, I1);

  const _: () = assert!(I0 == (POLY as u64) << 1);
  const _: () = assert!(I1 == ((calc_lo32(POLY, POLY, 32) as u64) << 1 | 1));
  const _: () = assert!(I2 == (calc_hi32(POLY, POLY, 32) as u64) << 1);
  const _: () = assert!(I3 == (calc_hi32(POLY, POLY, 64) as u64) << 1);
  const _: () = assert!(I4 == (calc_hi32(POLY, POLY, 128) as u64) << 1);
}

/// Constants baked into the CLMUL-simulation shift/XOR cascades.
pub mod sim {
  use super::{POLY, calc_hi32, calc_lo32};

  /// `P << 1` truncated to 32 bits: Barrett modulus.
  pub const I0: u32 = 0xDB71_0640;
  /// `calc_lo(P, 1, 32)`: Barrett quotient.
  pub const I1: u32 = 0xF701_1641;
  /// `calc_hi(P, 1, 32)`: `x^32 mod P`, folds the high word.
  pub const I2: u32 = 0xB8BC_6765;
  /// `calc_hi(P, I2, 32)`: `x^64 mod P`, folds the low word.
  pub const I3: u32 = 0xCCAA_009E;

  const _: () = assert!(I0 == POLY << 1);
  const _: () = assert!(I1 == calc_lo32(POLY, 1, 32));
  const _: () = assert!(I2 == calc_hi32(POLY, 1, 32));
  const _: () = assert!(I3 == calc_hi32(POLY, I2, 32));
}

/// Stream recombination multipliers for the parallel-by-four hardware kernel.
pub mod parallel {
  use super::{POLY, calc_hi32, x8n_32};

  /// Bytes per stream.
  pub const STREAM: usize = 4096;

  /// `x^(8·4096) mod P`
  pub const M1: u32 = 0x09FE_548F;
  /// `x^(8·8192) mod P`
  pub const M2: u32 = 0x8385_2D0F;
  /// `x^(8·12288) mod P`
  pub const M3: u32 = 0xE4B5_4665;

  const BITS: u32 = (STREAM * 8) as u32;
  const _: () = assert!(M1 == calc_hi32(POLY, POLY, BITS - 32));
  const _: () = assert!(M2 == calc_hi32(POLY, POLY, 2 * BITS - 32));
  const _: () = assert!(M3 == calc_hi32(POLY, POLY, 3 * BITS - 32));
  const _: () = assert!(M1 == x8n_32(POLY, STREAM as u64));
  const _: () = assert!(M3 == x8n_32(POLY, 3 * STREAM as u64));
}
