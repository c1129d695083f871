//! Table and bitwise CRC-32 kernels over finalized running values.

use crate::{
  common::{portable, reference},
  constants::crc32::{POLY, SARWATE, SLICE4},
};

/// One bit per step.
#[must_use]
pub(crate) fn crc32_bitwise(crc: u32, data: &[u8]) -> u32 {
  reference::crc32_bitwise(POLY, crc, data)
}

/// One table lookup per byte.
#[must_use]
pub(crate) fn crc32_sarwate(crc: u32, data: &[u8]) -> u32 {
  !portable::sarwate32(!crc, data, &SARWATE.0)
}

/// Four table lookups per aligned word.
#[must_use]
pub(crate) fn crc32_slice4(crc: u32, data: &[u8]) -> u32 {
  !portable::slice4_32(!crc, data, &SLICE4.0)
}
