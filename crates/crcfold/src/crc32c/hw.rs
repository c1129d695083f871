//! CRC-32C instances of the hardware CRC skeleton.
//!
//! | Target | Instance | Instructions | Feature |
//! |--------|----------|--------------|---------|
//! | x86_64 | `Sse42` | `crc32{b,w,l,q}` | `sse4.2` |
//! | aarch64 | `Armv8` | `crc32c{b,h,w,x}` | `crc` |

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use crate::{
  common::hwcrc::{self, CrcInstr},
  constants::crc32c::{POLY, parallel},
};

// ─────────────────────────────────────────────────────────────────────────────
// x86_64
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "x86_64")]
mod imp {
  use core::arch::x86_64::{_mm_crc32_u8, _mm_crc32_u16, _mm_crc32_u32, _mm_crc32_u64};

  use super::*;

  pub(crate) struct Sse42;

  impl CrcInstr for Sse42 {
    const POLY: u32 = POLY;
    const M1: u32 = parallel::M1;
    const M2: u32 = parallel::M2;
    const M3: u32 = parallel::M3;

    #[inline(always)]
    unsafe fn byte(crc: u32, data: u8) -> u32 {
      _mm_crc32_u8(crc, data)
    }

    #[inline(always)]
    unsafe fn half(crc: u32, data: u16) -> u32 {
      _mm_crc32_u16(crc, data)
    }

    #[inline(always)]
    unsafe fn word(crc: u32, data: u32) -> u32 {
      _mm_crc32_u32(crc, data)
    }

    #[inline(always)]
    unsafe fn dword(crc: u32, data: u64) -> u32 {
      _mm_crc32_u64(u64::from(crc), data) as u32
    }
  }

  #[target_feature(enable = "sse4.2")]
  pub(super) unsafe fn update(crc: u32, data: &[u8]) -> u32 {
    hwcrc::update::<Sse42>(crc, data)
  }

  #[target_feature(enable = "sse4.2")]
  pub(super) unsafe fn update_parallel4(crc: u32, data: &[u8]) -> u32 {
    hwcrc::update_parallel4::<Sse42>(crc, data)
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "aarch64")]
mod imp {
  use core::arch::aarch64::{__crc32cb, __crc32cd, __crc32ch, __crc32cw};

  use super::*;

  pub(crate) struct Armv8;

  impl CrcInstr for Armv8 {
    const POLY: u32 = POLY;
    const M1: u32 = parallel::M1;
    const M2: u32 = parallel::M2;
    const M3: u32 = parallel::M3;

    #[inline(always)]
    unsafe fn byte(crc: u32, data: u8) -> u32 {
      __crc32cb(crc, data)
    }

    #[inline(always)]
    unsafe fn half(crc: u32, data: u16) -> u32 {
      __crc32ch(crc, data)
    }

    #[inline(always)]
    unsafe fn word(crc: u32, data: u32) -> u32 {
      __crc32cw(crc, data)
    }

    #[inline(always)]
    unsafe fn dword(crc: u32, data: u64) -> u32 {
      __crc32cd(crc, data)
    }
  }

  #[target_feature(enable = "crc")]
  pub(super) unsafe fn update(crc: u32, data: &[u8]) -> u32 {
    hwcrc::update::<Armv8>(crc, data)
  }

  #[target_feature(enable = "crc")]
  pub(super) unsafe fn update_parallel4(crc: u32, data: &[u8]) -> u32 {
    hwcrc::update_parallel4::<Armv8>(crc, data)
  }
}

/// CRC-32C with one instruction chain.
#[inline]
pub(crate) fn crc32c_hw(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: dispatch selects this kernel only when `platform::caps()` reports
  // sse4.2 (x86_64) or crc (aarch64).
  !unsafe { imp::update(!crc, data) }
}

/// CRC-32C with four interleaved chains per 16 KiB window.
#[inline]
pub(crate) fn crc32c_hw_parallel4(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: dispatch selects this kernel only when `platform::caps()` reports
  // sse4.2 (x86_64) or crc (aarch64).
  !unsafe { imp::update_parallel4(!crc, data) }
}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::vec::Vec;

  use super::*;
  use crate::common::reference::crc32_bitwise;

  fn available() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
      std::arch::is_x86_feature_detected!("sse4.2")
    }
    #[cfg(target_arch = "aarch64")]
    {
      std::arch::is_aarch64_feature_detected!("crc")
    }
  }

  #[test]
  fn matches_castagnoli_reference() {
    if !available() {
      return;
    }
    let data: Vec<u8> = (0..40_000u32).map(|k| (k.wrapping_mul(0x7654_3210) >> 24) as u8).collect();
    for len in [0, 1, 7, 8, 9, 63, 4096, 16_384, 16_385, 40_000] {
      for start in 0..8 {
        let input = &data[start..len.max(start)];
        let want = crc32_bitwise(POLY, 0x0123_4567, input);
        assert_eq!(crc32c_hw(0x0123_4567, input), want, "start={start} len={len}");
        assert_eq!(crc32c_hw_parallel4(0x0123_4567, input), want, "start={start} len={len}");
      }
    }
    assert_eq!(crc32c_hw(0, b"123456789"), 0xE306_9283);
  }
}
