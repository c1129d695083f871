//! NEON + PMULL backend.
//!
//! `tbl` zeroes lanes whose index is 16 or more, so `shuffle_lo` is a plain
//! table lookup. `shuffle_hi` flips the top nibble, mapping negative indices
//! `0xF1..=0xFF` onto `1..=15` and everything else out of range.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::aarch64::*;

use super::{Simd128, crc32_fold, crc64_fold};

#[derive(Clone, Copy)]
pub(crate) struct Neon(uint8x16_t);

impl Neon {
  #[inline(always)]
  unsafe fn u64s(self) -> uint64x2_t {
    vreinterpretq_u64_u8(self.0)
  }

  #[inline(always)]
  unsafe fn pmull(a: u64, b: u64) -> Self {
    Self(vreinterpretq_u8_p128(vmull_p64(a, b)))
  }
}

impl Simd128 for Neon {
  #[inline(always)]
  unsafe fn load(bytes: &[u8; 16]) -> Self {
    Self(vld1q_u8(bytes.as_ptr()))
  }

  #[inline(always)]
  unsafe fn from_lanes(lo: u64, hi: u64) -> Self {
    Self(vreinterpretq_u8_u64(vcombine_u64(vcreate_u64(lo), vcreate_u64(hi))))
  }

  #[inline(always)]
  unsafe fn zero() -> Self {
    Self(vdupq_n_u8(0))
  }

  #[inline(always)]
  unsafe fn xor(self, rhs: Self) -> Self {
    Self(veorq_u8(self.0, rhs.0))
  }

  #[inline(always)]
  unsafe fn or(self, rhs: Self) -> Self {
    Self(vorrq_u8(self.0, rhs.0))
  }

  #[inline(always)]
  unsafe fn and(self, rhs: Self) -> Self {
    Self(vandq_u8(self.0, rhs.0))
  }

  #[inline(always)]
  unsafe fn shuffle_lo(self, mask: Self) -> Self {
    Self(vqtbl1q_u8(self.0, mask.0))
  }

  #[inline(always)]
  unsafe fn shuffle_hi(self, mask: Self) -> Self {
    Self(vqtbl1q_u8(self.0, veorq_u8(mask.0, vdupq_n_u8(0xF0))))
  }

  #[inline(always)]
  unsafe fn alignr8(hi: Self, lo: Self) -> Self {
    Self(vextq_u8::<8>(lo.0, hi.0))
  }

  #[inline(always)]
  unsafe fn shl32_lanes(self) -> Self {
    Self(vreinterpretq_u8_u64(vshlq_n_u64::<32>(self.u64s())))
  }

  #[inline(always)]
  unsafe fn clmul_ll(self, k: Self) -> Self {
    Self::pmull(vgetq_lane_u64::<0>(self.u64s()), vgetq_lane_u64::<0>(k.u64s()))
  }

  #[inline(always)]
  unsafe fn clmul_hh(self, k: Self) -> Self {
    Self::pmull(vgetq_lane_u64::<1>(self.u64s()), vgetq_lane_u64::<1>(k.u64s()))
  }

  #[inline(always)]
  unsafe fn clmul_lh(self, k: Self) -> Self {
    Self::pmull(vgetq_lane_u64::<0>(self.u64s()), vgetq_lane_u64::<1>(k.u64s()))
  }

  #[inline(always)]
  unsafe fn lanes(self) -> [u64; 2] {
    let v = self.u64s();
    [vgetq_lane_u64::<0>(v), vgetq_lane_u64::<1>(v)]
  }
}

#[target_feature(enable = "neon,aes")]
unsafe fn crc32_neon(crc: u32, data: &[u8]) -> u32 {
  crc32_fold::<Neon>(crc, data, data.as_ptr() as usize)
}

#[target_feature(enable = "neon,aes")]
unsafe fn crc64_neon(crc: u64, data: &[u8]) -> u64 {
  crc64_fold::<Neon>(crc, data, data.as_ptr() as usize)
}

/// CRC-32 via PMULL folding.
#[inline]
pub(crate) fn crc32_pmull(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: dispatch selects this kernel only when `platform::caps()` reports
  // neon + aes + pmull.
  unsafe { crc32_neon(crc, data) }
}

/// CRC-64 via PMULL folding.
#[inline]
pub(crate) fn crc64_pmull(crc: u64, data: &[u8]) -> u64 {
  // SAFETY: dispatch selects this kernel only when `platform::caps()` reports
  // neon + aes + pmull.
  unsafe { crc64_neon(crc, data) }
}
