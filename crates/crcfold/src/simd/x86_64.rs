//! SSE + PCLMULQDQ backend.
//!
//! Byte shuffles use `pshufb`, which zeroes lanes whose mask byte has the top
//! bit set. `shuffle_hi` flips that bit so negative indices select `m + 16`.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::x86_64::*;

use super::{Simd128, crc32_fold, crc64_fold};

#[derive(Clone, Copy)]
pub(crate) struct Sse(__m128i);

impl Simd128 for Sse {
  #[inline(always)]
  unsafe fn load(bytes: &[u8; 16]) -> Self {
    #[allow(clippy::cast_ptr_alignment)]
    Self(_mm_loadu_si128(bytes.as_ptr() as *const __m128i))
  }

  #[inline(always)]
  unsafe fn from_lanes(lo: u64, hi: u64) -> Self {
    Self(_mm_set_epi64x(hi as i64, lo as i64))
  }

  #[inline(always)]
  unsafe fn zero() -> Self {
    Self(_mm_setzero_si128())
  }

  #[inline(always)]
  unsafe fn xor(self, rhs: Self) -> Self {
    Self(_mm_xor_si128(self.0, rhs.0))
  }

  #[inline(always)]
  unsafe fn or(self, rhs: Self) -> Self {
    Self(_mm_or_si128(self.0, rhs.0))
  }

  #[inline(always)]
  unsafe fn and(self, rhs: Self) -> Self {
    Self(_mm_and_si128(self.0, rhs.0))
  }

  #[inline(always)]
  unsafe fn shuffle_lo(self, mask: Self) -> Self {
    Self(_mm_shuffle_epi8(self.0, mask.0))
  }

  #[inline(always)]
  unsafe fn shuffle_hi(self, mask: Self) -> Self {
    Self(_mm_shuffle_epi8(self.0, _mm_xor_si128(mask.0, _mm_set1_epi8(-128))))
  }

  #[inline(always)]
  unsafe fn alignr8(hi: Self, lo: Self) -> Self {
    Self(_mm_alignr_epi8(hi.0, lo.0, 8))
  }

  #[inline(always)]
  unsafe fn shl32_lanes(self) -> Self {
    Self(_mm_slli_epi64(self.0, 32))
  }

  #[inline(always)]
  unsafe fn clmul_ll(self, k: Self) -> Self {
    Self(_mm_clmulepi64_si128(self.0, k.0, 0x00))
  }

  #[inline(always)]
  unsafe fn clmul_hh(self, k: Self) -> Self {
    Self(_mm_clmulepi64_si128(self.0, k.0, 0x11))
  }

  #[inline(always)]
  unsafe fn clmul_lh(self, k: Self) -> Self {
    Self(_mm_clmulepi64_si128(self.0, k.0, 0x10))
  }

  #[inline(always)]
  unsafe fn lanes(self) -> [u64; 2] {
    let mut out = [0u64; 2];
    #[allow(clippy::cast_ptr_alignment)]
    _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, self.0);
    out
  }
}

#[target_feature(enable = "pclmulqdq,ssse3,sse4.1")]
unsafe fn crc32_sse(crc: u32, data: &[u8]) -> u32 {
  crc32_fold::<Sse>(crc, data, data.as_ptr() as usize)
}

#[target_feature(enable = "pclmulqdq,ssse3,sse4.1")]
unsafe fn crc64_sse(crc: u64, data: &[u8]) -> u64 {
  crc64_fold::<Sse>(crc, data, data.as_ptr() as usize)
}

/// CRC-32 via PCLMULQDQ folding.
///
/// Only reachable through dispatch after `x86::CLMUL_READY` was detected.
#[inline]
pub(crate) fn crc32_clmul(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: dispatch selects this kernel only when `platform::caps()` reports
  // pclmulqdq + ssse3 + sse4.1.
  unsafe { crc32_sse(crc, data) }
}

/// CRC-64 via PCLMULQDQ folding.
#[inline]
pub(crate) fn crc64_clmul(crc: u64, data: &[u8]) -> u64 {
  // SAFETY: dispatch selects this kernel only when `platform::caps()` reports
  // pclmulqdq + ssse3 + sse4.1.
  unsafe { crc64_sse(crc, data) }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    common::reference::{crc32_bitwise, crc64_bitwise},
    constants::{crc32, crc64},
  };

  fn available() -> bool {
    std::arch::is_x86_feature_detected!("pclmulqdq")
      && std::arch::is_x86_feature_detected!("ssse3")
      && std::arch::is_x86_feature_detected!("sse4.1")
  }

  #[test]
  fn matches_reference_at_every_offset() {
    if !available() {
      return;
    }
    let data: [u8; 80] = core::array::from_fn(|k| ((k as u32).wrapping_mul(0x7654_3210) >> 24) as u8);
    for start in 0..16 {
      for len in 0..(data.len() - start) {
        let input = &data[start..start + len];
        assert_eq!(crc32_clmul(0x0123_4567, input), crc32_bitwise(crc32::POLY, 0x0123_4567, input));
        assert_eq!(
          crc64_clmul(0x0123_4567_89AB_CDEF, input),
          crc64_bitwise(crc64::POLY, 0x0123_4567_89AB_CDEF, input)
        );
      }
    }
  }
}
