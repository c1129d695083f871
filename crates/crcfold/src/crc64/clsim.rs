//! CRC-64 with carry-less products simulated by shift/XOR cascades.
//!
//! | Step | Product (constants from [`crate::constants::crc64::fold`]) |
//! |------|---------|
//! | [`barrett`] | `x = lo64(v * I1)`, `c = hi64(x * I0)` |
//! | [`mul_i3`] | `c * I3` as `(lo, hi)` (fold 128 bits forward) |
//! | [`mul_i2`] | `x * I2` as `(lo, hi)` (fold 64 bits forward) |
//!
//! Leading bytes up to the first 8-aligned address are absorbed with one
//! partial Barrett step. Aligned words are folded two at a time, an odd word
//! gets a full Barrett step and trailing bytes another partial one.
//!
//! [`Cascade`] backs `Clsim`; a [`ScalarClmul`] backs `ClsimHw`.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use crate::{
  common::{blocks::le_u64, clmul::ScalarClmul},
  constants::crc64::fold,
};

/// Barrett step. Returns `(lo64(v * I1), hi64(x * I0))`.
#[inline(always)]
const fn barrett(v: u64) -> (u64, u64) {
  let t = v ^ v << 4;
  let mut u = t ^ v << 22;
  let mut x = t << 2;
  let mut y = v ^ v << 6 ^ v << 30 ^ v << 44;
  let t = y << 7;
  y ^= t ^ y << 11;
  u ^= y << 8;
  x ^= t ^ y << 9 ^ u ^ u << 20;

  let c = x ^ x >> 18;
  let y = c ^ x >> 3 ^ x >> 16;
  let u = y ^ y >> 20 ^ y >> 26 ^ y >> 45;
  let c = x >> 36 ^ u >> 1 ^ u >> 7 ^ c >> 13 ^ u >> 9 ^ c >> 22;
  (x, c)
}

/// `c * I3` as `(lo, hi)`.
#[inline(always)]
const fn mul_i3(c: u64) -> (u64, u64) {
  let v = c ^ c << 4;
  let y = v ^ c << 31;
  let u = y << 12;
  let u = u ^ (y ^ u) << 23;
  let v = (v ^ u) << 7;
  let lo = c << 5 ^ c << 24 ^ v ^ (y ^ v) << 2 ^ u ^ u << 8;

  let y = c ^ c >> 10 ^ c >> 14;
  let mut hi = y >> 2 ^ y >> 48;
  let u = y ^ y >> 3 ^ y >> 25;
  let y = c ^ c >> 1 ^ c >> 23;
  hi ^= u ^ u >> 18 ^ u >> 20;
  hi ^= y ^ y >> 21 ^ y >> 51;
  (lo, hi)
}

/// `x * I2` as `(lo, hi)`.
#[inline(always)]
const fn mul_i2(x: u64) -> (u64, u64) {
  let mut t = x ^ x << 6;
  let y = t ^ x << 1;
  let mut u = y << 10;
  let mut lo = t << 6 ^ u;
  u ^= y << 1;
  u = y << 25 ^ u ^ u << 34;
  t ^= u;
  lo ^= u << 7 ^ t << 24 ^ t << 37;

  let y = x ^ x >> 2 ^ x >> 28;
  let u = y ^ y >> 9;
  let mut u = y >> 24 ^ u >> 1 ^ u >> 7 ^ u >> 17;
  let y = x ^ x >> 14;
  u ^= y >> 2 ^ y >> 19 ^ y >> 36;
  u ^= u >> 8;
  (lo, u ^ u >> 2)
}

/// The three fixed-multiplier products the word walk needs.
pub(crate) trait Products {
  /// `(lo64(v * I1), hi64(x * I0))`.
  ///
  /// # Safety
  ///
  /// The CPU must support the implementation's instructions.
  unsafe fn barrett(v: u64) -> (u64, u64);
  /// # Safety
  ///
  /// As for [`Products::barrett`].
  unsafe fn mul_i3(c: u64) -> (u64, u64);
  /// # Safety
  ///
  /// As for [`Products::barrett`].
  unsafe fn mul_i2(x: u64) -> (u64, u64);
}

pub(crate) struct Cascade;

impl Products for Cascade {
  #[inline(always)]
  unsafe fn barrett(v: u64) -> (u64, u64) {
    barrett(v)
  }

  #[inline(always)]
  unsafe fn mul_i3(c: u64) -> (u64, u64) {
    mul_i3(c)
  }

  #[inline(always)]
  unsafe fn mul_i2(x: u64) -> (u64, u64) {
    mul_i2(x)
  }
}

#[inline(always)]
const fn halves(p: u128) -> (u64, u64) {
  (p as u64, (p >> 64) as u64)
}

/// Products from a scalar carry-less multiply.
impl<C: ScalarClmul> Products for C {
  #[inline(always)]
  unsafe fn barrett(v: u64) -> (u64, u64) {
    let x = C::clmul(v, fold::I1) as u64;
    (x, (C::clmul(x, fold::I0) >> 64) as u64)
  }

  #[inline(always)]
  unsafe fn mul_i3(c: u64) -> (u64, u64) {
    halves(C::clmul(c, fold::I3))
  }

  #[inline(always)]
  unsafe fn mul_i2(x: u64) -> (u64, u64) {
    halves(C::clmul(x, fold::I2))
  }
}

/// Absorb 1..=8 bytes into the raw register.
#[inline(always)]
unsafe fn partial<P: Products>(c: u64, bytes: &[u8]) -> u64 {
  let bits = bytes.len() * 8;
  let v = c >> 8 >> (bits - 8);
  let (x, c) = P::barrett((c ^ le_u64(bytes)) << (64 - bits));
  c ^ x ^ v
}

/// CRC-64 over a finalized running value, as if `data` started `skip`
/// bytes into an 8-byte word.
///
/// # Safety
///
/// The CPU must support `P`'s instructions.
#[inline(always)]
#[must_use]
pub(crate) unsafe fn compute<P: Products>(crc: u64, data: &[u8], skip: usize) -> u64 {
  if data.is_empty() {
    return crc;
  }
  let mut c = !crc;

  let r = skip & 7;
  let lead = if r == 0 { 0 } else { (8 - r).min(data.len()) };
  let (head, rest) = data.split_at(lead);
  if !head.is_empty() {
    c = partial::<P>(c, head);
  }

  let (words, tail) = rest.as_chunks::<8>();
  let (pairs, odd) = words.as_chunks::<2>();

  if let Some(([w0, w1], more)) = pairs.split_first() {
    c ^= u64::from_le_bytes(*w0);
    let mut x = u64::from_le_bytes(*w1);
    for [p0, p1] in more {
      let (v, w) = P::mul_i3(c);
      let (v3, w3) = P::mul_i2(x);
      c = u64::from_le_bytes(*p0) ^ v ^ v3;
      x = u64::from_le_bytes(*p1) ^ w ^ w3;
    }
    let (v, w) = P::mul_i2(c);
    let (xb, cb) = P::barrett(v ^ x);
    c = cb ^ xb ^ w;
  }

  if let Some(word) = odd.first() {
    let (x, cb) = P::barrett(c ^ u64::from_le_bytes(*word));
    c = cb ^ x;
  }

  if !tail.is_empty() {
    c = partial::<P>(c, tail);
  }
  !c
}

/// CRC-64 via CLMUL simulation.
#[inline]
#[must_use]
pub(crate) fn crc64_clsim(crc: u64, data: &[u8]) -> u64 {
  // SAFETY: the cascades are plain integer arithmetic.
  unsafe { compute::<Cascade>(crc, data, data.as_ptr() as usize) }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "pclmulqdq")]
unsafe fn compute_pclmul(crc: u64, data: &[u8]) -> u64 {
  compute::<crate::common::clmul::Pclmul>(crc, data, data.as_ptr() as usize)
}

/// CRC-64 via CLMUL simulation with PCLMULQDQ products.
#[cfg(target_arch = "x86_64")]
#[inline]
pub(crate) fn crc64_clsim_pclmul(crc: u64, data: &[u8]) -> u64 {
  // SAFETY: dispatch selects this kernel only when `platform::caps()` reports
  // pclmulqdq.
  unsafe { compute_pclmul(crc, data) }
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon,aes")]
unsafe fn compute_pmull(crc: u64, data: &[u8]) -> u64 {
  compute::<crate::common::clmul::Pmull>(crc, data, data.as_ptr() as usize)
}

/// CRC-64 via CLMUL simulation with PMULL products.
#[cfg(target_arch = "aarch64")]
#[inline]
pub(crate) fn crc64_clsim_pmull(crc: u64, data: &[u8]) -> u64 {
  // SAFETY: dispatch selects this kernel only when `platform::caps()` reports
  // neon + aes + pmull.
  unsafe { compute_pmull(crc, data) }
}
