//! CRC-32C (Castagnoli) constants.
//!
//! Polynomial: 0x1EDC6F41 (reflected: 0x82F63B78)
//! Used by: iSCSI, ext4, the SSE4.2 `crc32` instruction

use super::Aligned64;
use crate::common::{
  gf2::{calc_hi32, x8n_32},
  tables::sarwate32,
};

/// CRC-32C polynomial in reflected (bit-reversed) form.
pub const POLY: u32 = 0x82F6_3B78;

/// Sarwate lookup table (1 KiB).
pub static SARWATE: Aligned64<[u32; 256]> = Aligned64(sarwate32(POLY));

/// Stream recombination multipliers for the parallel-by-four hardware kernel.
pub mod parallel {
  use super::{POLY, calc_hi32, x8n_32};

  /// Bytes per stream.
  pub const STREAM: usize = 4096;

  /// `x^(8·4096) mod P`
  pub const M1: u32 = 0x35D7_3A62;
  /// `x^(8·8192) mod P`
  pub const M2: u32 = 0x2846_1564;
  /// `x^(8·12288) mod P`
  pub const M3: u32 = 0x43EE_FC9F;

  const BITS: u32 = (STREAM * 8) as u32;
  const _: () = assert!(M1 == calc_hi32(POLY, POLY, BITS - 32));
  const _: () = assert!(M2 == calc_hi32(POLY, POLY, 2 * BITS - 32));
  const _: () = assert!(M3 == calc_hi32(POLY, POLY, 3 * BITS - 32));
  const _: () = assert!(M2 == x8n_32(POLY, 2 * STREAM as u64));
}
