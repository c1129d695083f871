//! 128-bit CLMUL folding, written once against a SIMD primitive trait.
//!
//! | Backend | Module | Features |
//! |---------|--------|----------|
//! | SSE | [`x86_64`] | `pclmulqdq` + `ssse3` + `sse4.1` |
//! | NEON | [`aarch64`] | `neon` + `aes` (PMULL) |
//! | Software | [`soft`] | none |
//!
//! # Folding
//!
//! The state is two 128-bit registers `v0`, `v1`. One fold step carries `v0`
//! forward 16 bytes and merges it into `v1`:
//!
//! ```text
//! v1 ^= clmul(v0.lo, k.lo)
//! v0  = v1 ^ clmul(v0.hi, k.hi)
//! ```
//!
//! # Boundaries
//!
//! The input is viewed as aligned 16-byte blocks (see [`crate::common::blocks`]).
//! Byte shuffles driven by three masks place the running CRC and trim the
//! final block, so short, misaligned and ragged inputs take the same path:
//!
//! - `mask_s = ramp - skip_s` where `skip_s = addr(data) % 16`
//! - `mask_e = ramp - skip_e` where `skip_e = -addr(data + len) % 16`
//! - `mask_l = ramp + (len - 16)` for inputs that fit in one register pair
//!
//! Mask bytes are either `0..=15` or negative (`0xF1..=0xFF`).
//! [`Simd128::shuffle_lo`] keeps lanes with non-negative indices and
//! [`Simd128::shuffle_hi`] keeps lanes with negative ones, reading `m + 16`.
#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

#[cfg(target_arch = "aarch64")]
pub(crate) mod aarch64;
pub(crate) mod soft;
#[cfg(target_arch = "x86_64")]
pub(crate) mod x86_64;

use crate::{
  common::blocks,
  constants::{crc32, crc64},
};

/// The vector primitives the folding kernel needs.
///
/// Every method is `unsafe` because hardware implementations require CPU
/// features; callers run inside a matching `#[target_feature]` function.
pub(crate) trait Simd128: Copy {
  /// Load 16 bytes.
  unsafe fn load(bytes: &[u8; 16]) -> Self;
  /// Build from 64-bit lanes.
  unsafe fn from_lanes(lo: u64, hi: u64) -> Self;
  unsafe fn zero() -> Self;
  unsafe fn xor(self, rhs: Self) -> Self;
  unsafe fn or(self, rhs: Self) -> Self;
  unsafe fn and(self, rhs: Self) -> Self;
  /// `out[i] = mask[i] < 16 ? self[mask[i]] : 0`
  unsafe fn shuffle_lo(self, mask: Self) -> Self;
  /// `out[i] = mask[i] >= 0xF0 ? self[mask[i] + 16] : 0`
  unsafe fn shuffle_hi(self, mask: Self) -> Self;
  /// Bytes 8..16 of `lo` followed by bytes 0..8 of `hi`.
  unsafe fn alignr8(hi: Self, lo: Self) -> Self;
  /// Shift each 64-bit lane left by 32 bits.
  unsafe fn shl32_lanes(self) -> Self;
  /// `clmul(self.lo, k.lo)`
  unsafe fn clmul_ll(self, k: Self) -> Self;
  /// `clmul(self.hi, k.hi)`
  unsafe fn clmul_hh(self, k: Self) -> Self;
  /// `clmul(self.lo, k.hi)`
  unsafe fn clmul_lh(self, k: Self) -> Self;
  /// `[lo, hi]`
  unsafe fn lanes(self) -> [u64; 2];
}

const RAMP: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

/// `ramp + delta`, wrapping per byte.
#[inline(always)]
fn ramp_plus(delta: u8) -> [u8; 16] {
  RAMP.map(|i| i.wrapping_add(delta))
}

#[inline(always)]
unsafe fn fold16<V: Simd128>(v0: V, v1: V, k: V) -> (V, V) {
  let v1 = v1.xor(v0.clmul_ll(k));
  (v1.xor(v0.clmul_hh(k)), v1)
}

/// Fold `data` into the register pair, leaving 32 bytes of state.
///
/// `vcrc` holds the complemented running CRC in its low bytes. `skip` is
/// the alignment of the first byte within its 16-byte block.
///
/// # Safety
///
/// The CPU must support `V`'s features. `data` must not be empty.
#[inline(always)]
unsafe fn fold_blocks<V: Simd128>(vcrc: V, data: &[u8], skip: usize, k16: V) -> (V, V) {
  let skip = skip & 15;
  let len = data.len();
  let skip_e = (skip + len).wrapping_neg() & 15;

  let mask_s = V::load(&ramp_plus((skip as u8).wrapping_neg()));
  let mask_e = V::load(&ramp_plus((skip_e as u8).wrapping_neg()));

  let split = blocks::split::<16>(data, skip);
  // Bytes before `skip` are zero in the bounce buffer already.
  let data0 = V::load(&split.head);
  let mut rest = split.after_head();

  let Some(first) = rest.next() else {
    // Everything lives in one block.
    let mask_l = V::load(&ramp_plus((len as u8).wrapping_sub(16)));
    let v0 = vcrc.shuffle_lo(mask_l).xor(data0.shuffle_lo(mask_e));
    let v1 = vcrc.shuffle_hi(mask_l);
    return (v0, V::alignr8(v1, v0));
  };
  let data1 = V::load(&first);

  if len <= 16 {
    // Short input straddling a block boundary.
    let mask_l = V::load(&ramp_plus((len as u8).wrapping_sub(16)));
    let v0 = vcrc
      .shuffle_lo(mask_l)
      .xor(data0.shuffle_hi(mask_e))
      .xor(data1.shuffle_lo(mask_e));
    let v1 = vcrc.shuffle_hi(mask_l);
    return (v0, V::alignr8(v1, v0));
  }

  let mut v0 = vcrc.shuffle_lo(mask_s).xor(data0);
  let mut v1 = vcrc.shuffle_hi(mask_s).xor(data1);

  for block in rest {
    (v0, _) = fold16(v0, v1, k16);
    v1 = V::load(&block);
  }

  if skip_e != 0 {
    // Drop the bounce-buffer padding: shift everything right by `skip_e`.
    let v2 = v0.shuffle_hi(mask_e);
    v0 = v0.shuffle_lo(mask_e);
    v1 = v1.shuffle_lo(mask_e).or(v2);
  }

  let (v0, _) = fold16(v0, v1, k16);
  (v0, V::alignr8(V::zero(), v0))
}

/// CRC-32 over a finalized running value.
///
/// # Safety
///
/// The CPU must support `V`'s features.
#[inline(always)]
pub(crate) unsafe fn crc32_fold<V: Simd128>(crc: u32, data: &[u8], skip: usize) -> u32 {
  if data.is_empty() {
    return crc;
  }

  let k16 = V::from_lanes(crc32::fold::FOLD16.0, crc32::fold::FOLD16.1);
  let k8 = V::from_lanes(crc32::fold::FOLD8.0, crc32::fold::FOLD8.1);
  let k4 = V::from_lanes(crc32::fold::FOLD4.0, crc32::fold::FOLD4.1);

  let (v0, v1) = fold_blocks(V::from_lanes(u64::from(!crc), 0), data, skip, k16);

  // 128 + 64 bits down to 96.
  let v1 = v0.clmul_lh(k16).xor(v1);
  let v2 = v1.and(V::from_lanes(0xFFFF_FFFF_0000_0000, u64::MAX));
  let v0 = v1.shl32_lanes().clmul_ll(k8).xor(v2);

  // Barrett.
  let v2 = v0.clmul_lh(k4).clmul_ll(k4);
  let [_, hi] = v0.xor(v2).lanes();
  !(hi as u32)
}

/// CRC-64 over a finalized running value.
///
/// # Safety
///
/// The CPU must support `V`'s features.
#[inline(always)]
pub(crate) unsafe fn crc64_fold<V: Simd128>(crc: u64, data: &[u8], skip: usize) -> u64 {
  if data.is_empty() {
    return crc;
  }

  let k16 = V::from_lanes(crc64::fold::FOLD16.0, crc64::fold::FOLD16.1);
  let k8 = V::from_lanes(crc64::fold::FOLD8.0, crc64::fold::FOLD8.1);

  let (v0, v1) = fold_blocks(V::from_lanes(!crc, 0), data, skip, k16);

  let v1 = v0.clmul_lh(k16).xor(v1);

  // Barrett.
  let v0 = v1.clmul_ll(k8);
  let v2 = v0.clmul_lh(k8);
  let [_, hi] = v1.xor(V::alignr8(v0, V::zero())).xor(v2).lanes();
  !hi
}
