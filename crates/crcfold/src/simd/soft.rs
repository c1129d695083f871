//! Scalar model of [`Simd128`], byte 0 in the least significant position.
//!
//! Slow, but it runs the exact folding sequence the hardware backends run, so
//! the boundary logic is testable on any target.

use super::Simd128;
use crate::common::clmul::clmul64;

/// Kernel name used by the harness and kernel listings.
pub(crate) const NAME: &str = "portable/clmul-soft";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Soft(u128);

impl Soft {
  #[inline(always)]
  fn bytes(self) -> [u8; 16] {
    self.0.to_le_bytes()
  }

  #[inline(always)]
  fn lo(self) -> u64 {
    self.0 as u64
  }

  #[inline(always)]
  fn hi(self) -> u64 {
    (self.0 >> 64) as u64
  }
}

#[allow(unsafe_code)]
impl Simd128 for Soft {
  unsafe fn load(bytes: &[u8; 16]) -> Self {
    Self(u128::from_le_bytes(*bytes))
  }

  unsafe fn from_lanes(lo: u64, hi: u64) -> Self {
    Self(u128::from(lo) | (u128::from(hi) << 64))
  }

  unsafe fn zero() -> Self {
    Self(0)
  }

  unsafe fn xor(self, rhs: Self) -> Self {
    Self(self.0 ^ rhs.0)
  }

  unsafe fn or(self, rhs: Self) -> Self {
    Self(self.0 | rhs.0)
  }

  unsafe fn and(self, rhs: Self) -> Self {
    Self(self.0 & rhs.0)
  }

  unsafe fn shuffle_lo(self, mask: Self) -> Self {
    let src = self.bytes();
    let out = mask.bytes().map(|m| src.get(usize::from(m)).copied().unwrap_or(0));
    Self(u128::from_le_bytes(out))
  }

  unsafe fn shuffle_hi(self, mask: Self) -> Self {
    let src = self.bytes();
    let out = mask.bytes().map(|m| {
      if m >= 0xF0 {
        src.get(usize::from(m.wrapping_add(16))).copied().unwrap_or(0)
      } else {
        0
      }
    });
    Self(u128::from_le_bytes(out))
  }

  unsafe fn alignr8(hi: Self, lo: Self) -> Self {
    Self((lo.0 >> 64) | (hi.0 << 64))
  }

  unsafe fn shl32_lanes(self) -> Self {
    Self::from_lanes(self.lo() << 32, self.hi() << 32)
  }

  unsafe fn clmul_ll(self, k: Self) -> Self {
    Self(clmul64(self.lo(), k.lo()))
  }

  unsafe fn clmul_hh(self, k: Self) -> Self {
    Self(clmul64(self.hi(), k.hi()))
  }

  unsafe fn clmul_lh(self, k: Self) -> Self {
    Self(clmul64(self.lo(), k.hi()))
  }

  unsafe fn lanes(self) -> [u64; 2] {
    [self.lo(), self.hi()]
  }
}

/// CRC-32 through the software CLMUL model.
#[must_use]
pub(crate) fn crc32_soft(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: `Soft` has no CPU requirements.
  unsafe { super::crc32_fold::<Soft>(crc, data, data.as_ptr() as usize) }
}

/// CRC-64 through the software CLMUL model.
#[must_use]
pub(crate) fn crc64_soft(crc: u64, data: &[u8]) -> u64 {
  // SAFETY: `Soft` has no CPU requirements.
  unsafe { super::crc64_fold::<Soft>(crc, data, data.as_ptr() as usize) }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    common::reference::{crc32_bitwise, crc64_bitwise},
    constants::{crc32, crc64},
  };

  fn pattern() -> [u8; 80] {
    core::array::from_fn(|k| ((k as u32).wrapping_mul(0x7654_3210) >> 24) as u8)
  }

  #[test]
  fn shuffles_split_on_mask_sign() {
    // SAFETY: `Soft` has no CPU requirements.
    unsafe {
      let v = Soft::load(&core::array::from_fn(|i| i as u8 + 1));
      let mask = Soft::load(&core::array::from_fn(|i| (i as u8).wrapping_sub(3)));
      let lo = v.shuffle_lo(mask).bytes();
      let hi = v.shuffle_hi(mask).bytes();
      assert_eq!(&lo[..3], &[0, 0, 0]);
      assert_eq!(lo[3], 1);
      assert_eq!(&hi[..3], &[14, 15, 16]);
      assert_eq!(hi[3], 0);
    }
  }

  #[test]
  fn every_skip_and_length_matches_reference() {
    let data = pattern();
    for skip in 0..16 {
      for start in 0..16 {
        for len in 0..(data.len() - start) {
          let input = &data[start..start + len];
          // SAFETY: `Soft` has no CPU requirements.
          let (a, b) = unsafe {
            (
              crate::simd::crc32_fold::<Soft>(0x0123_4567, input, skip),
              crate::simd::crc64_fold::<Soft>(0x0123_4567_89AB_CDEF, input, skip),
            )
          };
          assert_eq!(a, crc32_bitwise(crc32::POLY, 0x0123_4567, input), "skip={skip} start={start} len={len}");
          assert_eq!(b, crc64_bitwise(crc64::POLY, 0x0123_4567_89AB_CDEF, input), "skip={skip} start={start} len={len}");
        }
      }
    }
  }
}
