//! Scalar carry-less multiplication.
//!
//! [`clmul64`] backs the portable SIMD model and checks the CLMUL-simulation
//! cascades. [`ScalarClmul`] abstracts one 64×64 product so the simulation's
//! word walk can also run on PCLMULQDQ or PMULL.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

/// Carry-less 64×64→128 multiply.
#[inline]
#[must_use]
pub(crate) const fn clmul64(a: u64, b: u64) -> u128 {
  let mut acc = 0u128;
  let mut i = 0;
  while i < 64 {
    if (b >> i) & 1 != 0 {
      acc ^= (a as u128) << i;
    }
    i += 1;
  }
  acc
}

/// One full 64×64→128 carry-less product.
#[cfg_attr(not(any(target_arch = "x86_64", target_arch = "aarch64", test)), allow(dead_code))]
pub(crate) trait ScalarClmul {
  /// # Safety
  ///
  /// The CPU must support the implementation's instructions.
  unsafe fn clmul(a: u64, b: u64) -> u128;
}

/// [`clmul64`] behind the trait.
#[cfg(test)]
pub(crate) struct SoftClmul;

#[cfg(test)]
impl ScalarClmul for SoftClmul {
  #[inline(always)]
  unsafe fn clmul(a: u64, b: u64) -> u128 {
    clmul64(a, b)
  }
}

/// `pclmulqdq` on the low lanes.
#[cfg(target_arch = "x86_64")]
pub(crate) struct Pclmul;

#[cfg(target_arch = "x86_64")]
impl ScalarClmul for Pclmul {
  #[inline(always)]
  unsafe fn clmul(a: u64, b: u64) -> u128 {
    use core::arch::x86_64::*;

    let p = _mm_clmulepi64_si128(_mm_cvtsi64_si128(a as i64), _mm_cvtsi64_si128(b as i64), 0x00);
    let lo = _mm_cvtsi128_si64(p) as u64;
    let hi = _mm_cvtsi128_si64(_mm_unpackhi_epi64(p, p)) as u64;
    u128::from(hi) << 64 | u128::from(lo)
  }
}

/// `pmull` on 64-bit polynomials.
#[cfg(target_arch = "aarch64")]
pub(crate) struct Pmull;

#[cfg(target_arch = "aarch64")]
impl ScalarClmul for Pmull {
  #[inline(always)]
  unsafe fn clmul(a: u64, b: u64) -> u128 {
    core::arch::aarch64::vmull_p64(a, b)
  }
}
