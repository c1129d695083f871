//! CRC-32 with carry-less products simulated by shift/XOR cascades.
//!
//! Each multiplier is fixed, so `clmul(v, K)` unrolls into a short
//! run of shifts and XORs over 64-bit words. No tables, no CPU features.
//!
//! | Step | Product (constants from [`crate::constants::crc32::sim`]) |
//! |------|---------|
//! | [`barrett`] | `x = lo32(v * I1)`, `c = hi32(x * I0)` |
//! | [`mul_i3`] | `lo32(f) * I3` (fold the low word 64 bits forward) |
//! | [`mul_i2`] | `x * I2` (fold a 32-bit word 32 bits forward) |
//!
//! The input is walked as 8-byte words aligned to the real address; the
//! partial first and last words come from bounce buffers.
//!
//! The walk is generic over [`Products`]: [`Cascade`] is the portable
//! `Clsim` kernel, and every [`ScalarClmul`] computes the same three
//! products in hardware for `ClsimHw`.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use crate::{
  common::{
    blocks::{self, le_u64},
    clmul::ScalarClmul,
  },
  constants::crc32::sim,
};

/// Barrett step. Returns `(lo32(v * I1), hi32(x * I0))`.
#[inline(always)]
const fn barrett(v: u32) -> (u32, u32) {
  let y = v ^ v << 19;
  let u = y ^ y << 6 ^ y << 9;
  let x = u ^ y << 2;
  let x = u ^ x << 10 ^ x << 24;

  let y = x >> 1 ^ x >> 4;
  let u = x >> 16 ^ y ^ y >> 1;
  let c = x >> 12 ^ y >> 22 ^ u ^ u >> 6;
  (x, c)
}

/// `lo32(f) * I3`.
#[inline(always)]
const fn mul_i3(f: u64) -> u64 {
  let g = f & 0xFFFF_FFFF;
  let yy = g ^ g << 1;
  let uu = yy ^ yy << 1 ^ yy << 9;
  g << 7 ^ yy << 1 ^ yy << 3 ^ uu << 17 ^ uu << 21
}

/// `x * I2` for `x < 2^32`.
#[inline(always)]
const fn mul_i2(x: u64) -> u64 {
  let yy = x ^ x << 8;
  let uu = yy ^ yy << 2;
  let tt = yy ^ yy << 1;
  x << 9 ^ x << 18 ^ uu ^ uu << 21 ^ tt << 5 ^ tt << 19
}

/// The three fixed-multiplier products the word walk needs.
pub(crate) trait Products {
  /// `(lo32(v * I1), hi32(x * I0))`.
  ///
  /// # Safety
  ///
  /// The CPU must support the implementation's instructions.
  unsafe fn barrett(v: u32) -> (u32, u32);
  /// `lo32(f) * I3`.
  ///
  /// # Safety
  ///
  /// As for [`Products::barrett`].
  unsafe fn mul_i3(f: u64) -> u64;
  /// `x * I2` for `x < 2^32`.
  ///
  /// # Safety
  ///
  /// As for [`Products::barrett`].
  unsafe fn mul_i2(x: u64) -> u64;
}

/// Shift/XOR cascades. No CPU requirements.
pub(crate) struct Cascade;

impl Products for Cascade {
  #[inline(always)]
  unsafe fn barrett(v: u32) -> (u32, u32) {
    barrett(v)
  }

  #[inline(always)]
  unsafe fn mul_i3(f: u64) -> u64 {
    mul_i3(f)
  }

  #[inline(always)]
  unsafe fn mul_i2(x: u64) -> u64 {
    mul_i2(x)
  }
}

/// Products from a scalar carry-less multiply.
impl<C: ScalarClmul> Products for C {
  #[inline(always)]
  unsafe fn barrett(v: u32) -> (u32, u32) {
    let x = C::clmul(v.into(), sim::I1.into()) as u32;
    let c = (C::clmul(x.into(), sim::I0.into()) >> 32) as u32;
    (x, c)
  }

  #[inline(always)]
  unsafe fn mul_i3(f: u64) -> u64 {
    C::clmul(f & 0xFFFF_FFFF, sim::I3.into()) as u64
  }

  #[inline(always)]
  unsafe fn mul_i2(x: u64) -> u64 {
    C::clmul(x, sim::I2.into()) as u64
  }
}

/// Fold `f` forward 64 bits.
#[inline(always)]
unsafe fn fold64<P: Products>(f: u64) -> u64 {
  P::mul_i3(f) ^ P::mul_i2(f >> 32)
}

/// CRC-32 over a finalized running value, walking words as if `data`
/// started `skip` bytes into an 8-byte word.
///
/// # Safety
///
/// The CPU must support `P`'s instructions.
#[inline(always)]
#[must_use]
pub(crate) unsafe fn compute<P: Products>(crc: u32, data: &[u8], skip: usize) -> u32 {
  let n = data.len();
  if n == 0 {
    return crc;
  }
  let c = !crc;

  // `f` is the 64-bit accumulator still to be reduced; `v` the bits of the
  // running CRC that shifted past it.
  let (f, mut v) = if n <= 8 {
    let bits = n * 8;
    let f = u64::from(c);
    let v = (f >> 8 >> (bits - 8)) as u32;
    ((f ^ le_u64(data)) << (64 - bits), v)
  } else {
    let r = skip & 7;
    let split = blocks::split::<8>(data, r);

    let mut h = u64::from(c);
    let mut f = (h ^ (u64::from_le_bytes(split.head) >> (r * 8))) << (r * 8);
    h = h >> 8 >> (56 - r * 8);

    for word in split.body {
      h ^= fold64::<P>(f);
      f = h ^ u64::from_le_bytes(*word);
      h = 0;
    }
    h ^= u64::from_le_bytes(split.last.unwrap_or_default());

    // Bits left in `f:h`, 72..=128.
    let nb = (n + r - 8 * split.body.len()) * 8;
    h <<= 128 - nb;
    h ^= f >> 8 >> (nb - 72);
    f <<= 128 - nb;
    (h ^ fold64::<P>(f), 0)
  };

  let h = f >> 32 ^ P::mul_i2(f & 0xFFFF_FFFF);
  v ^= (h >> 32) as u32;
  let (x, c) = P::barrett(h as u32);
  !(c ^ x ^ v)
}

/// CRC-32 via CLMUL simulation.
#[inline]
#[must_use]
pub(crate) fn crc32_clsim(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: the cascades are plain integer arithmetic.
  unsafe { compute::<Cascade>(crc, data, data.as_ptr() as usize) }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "pclmulqdq")]
unsafe fn compute_pclmul(crc: u32, data: &[u8]) -> u32 {
  compute::<crate::common::clmul::Pclmul>(crc, data, data.as_ptr() as usize)
}

/// CRC-32 via CLMUL simulation with PCLMULQDQ products.
#[cfg(target_arch = "x86_64")]
#[inline]
pub(crate) fn crc32_clsim_pclmul(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: dispatch selects this kernel only when `platform::caps()` reports
  // pclmulqdq.
  unsafe { compute_pclmul(crc, data) }
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon,aes")]
unsafe fn compute_pmull(crc: u32, data: &[u8]) -> u32 {
  compute::<crate::common::clmul::Pmull>(crc, data, data.as_ptr() as usize)
}

/// CRC-32 via CLMUL simulation with PMULL products.
#[cfg(target_arch = "aarch64")]
#[inline]
pub(crate) fn crc32_clsim_pmull(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: dispatch selects this kernel only when `platform::caps()` reports
  // neon + aes + pmull.
  unsafe { compute_pmull(crc, data) }
}
