//! Table and bitwise CRC-64/XZ kernels over finalized running values.

use crate::{
  common::{portable, reference},
  constants::crc64::{POLY, SARWATE, SLICE4},
};

/// One bit per step.
#[must_use]
pub(crate) fn crc64_bitwise(crc: u64, data: &[u8]) -> u64 {
  reference::crc64_bitwise(POLY, crc, data)
}

/// One table lookup per byte.
#[must_use]
pub(crate) fn crc64_sarwate(crc: u64, data: &[u8]) -> u64 {
  !portable::sarwate64(!crc, data, &SARWATE.0)
}

/// Four table lookups per aligned 32-bit word.
#[must_use]
pub(crate) fn crc64_slice4(crc: u64, data: &[u8]) -> u64 {
  !portable::slice4_64(!crc, data, &SLICE4.0)
}
