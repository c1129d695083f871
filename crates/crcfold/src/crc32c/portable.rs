//! Table and bitwise CRC-32C kernels over finalized running values.

use crate::{
  common::{portable, reference},
  constants::crc32c::{POLY, SARWATE},
};

/// One bit per step.
#[must_use]
pub(crate) fn crc32c_bitwise(crc: u32, data: &[u8]) -> u32 {
  reference::crc32_bitwise(POLY, crc, data)
}

/// One table lookup per byte.
#[must_use]
pub(crate) fn crc32c_sarwate(crc: u32, data: &[u8]) -> u32 {
  !portable::sarwate32(!crc, data, &SARWATE.0)
}
