//! ARMv8 `crc32{b,h,w,x}` instance of the hardware CRC skeleton.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::aarch64::{__crc32b, __crc32d, __crc32h, __crc32w};

use crate::{
  common::hwcrc::{self, CrcInstr},
  constants::crc32::{POLY, parallel},
};

pub(crate) struct Armv8;

impl CrcInstr for Armv8 {
  const POLY: u32 = POLY;
  const M1: u32 = parallel::M1;
  const M2: u32 = parallel::M2;
  const M3: u32 = parallel::M3;

  #[inline(always)]
  unsafe fn byte(crc: u32, data: u8) -> u32 {
    __crc32b(crc, data)
  }

  #[inline(always)]
  unsafe fn half(crc: u32, data: u16) -> u32 {
    __crc32h(crc, data)
  }

  #[inline(always)]
  unsafe fn word(crc: u32, data: u32) -> u32 {
    __crc32w(crc, data)
  }

  #[inline(always)]
  unsafe fn dword(crc: u32, data: u64) -> u32 {
    __crc32d(crc, data)
  }
}

#[target_feature(enable = "crc")]
unsafe fn update(crc: u32, data: &[u8]) -> u32 {
  hwcrc::update::<Armv8>(crc, data)
}

#[target_feature(enable = "crc")]
unsafe fn update_parallel4(crc: u32, data: &[u8]) -> u32 {
  hwcrc::update_parallel4::<Armv8>(crc, data)
}

/// CRC-32 with one `crc32x` chain.
#[inline]
pub(crate) fn crc32_hw(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: dispatch selects this kernel only when `platform::caps()` reports crc.
  !unsafe { update(!crc, data) }
}

/// CRC-32 with four interleaved `crc32x` chains per 16 KiB window.
#[inline]
pub(crate) fn crc32_hw_parallel4(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: dispatch selects this kernel only when `platform::caps()` reports crc.
  !unsafe { update_parallel4(!crc, data) }
}
