//! Hardware CRC instruction skeleton.
//!
//! Native CRC instructions come in byte/half/word/doubleword flavors and all
//! operate on the raw (uncomplemented) register. The skeleton here is written
//! once against [`CrcInstr`]; each instance supplies the four instructions and
//! its recombination multipliers:
//!
//! | Instance | Polynomial | Target |
//! |----------|------------|--------|
//! | `crc32::hw::Armv8` | CRC-32 | aarch64 `crc32{b,h,w,x}` |
//! | `crc32c::hw::Sse42` | CRC-32C | x86_64 SSE4.2 `crc32` |
//! | `crc32c::hw::Armv8` | CRC-32C | aarch64 `crc32c{b,h,w,x}` |
//!
//! # Parallel-by-four
//!
//! A single `crc32` chain is latency bound. [`update_parallel4`] cuts each
//! 16 KiB window into four 4 KiB streams, runs four independent chains
//! interleaved, then shifts the first three into place:
//!
//! ```text
//! c  = multmodp(M3, !c) ^ multmodp(M2, !c1) ^ multmodp(M1, !c2) ^ c3
//! ```
//!
//! Streams 1..3 start at `!0`, which is why their complements are what gets
//! shifted. Bytes after the last full window go through [`update`].
#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]
#![cfg_attr(not(any(target_arch = "x86_64", target_arch = "aarch64")), allow(dead_code))]

use crate::common::gf2::multmodp32;

/// One polynomial's CRC instructions plus its recombination constants.
pub(crate) trait CrcInstr {
  /// Reflected polynomial.
  const POLY: u32;
  /// `x^(8·4096) mod P`
  const M1: u32;
  /// `x^(8·8192) mod P`
  const M2: u32;
  /// `x^(8·12288) mod P`
  const M3: u32;

  unsafe fn byte(crc: u32, data: u8) -> u32;
  unsafe fn half(crc: u32, data: u16) -> u32;
  unsafe fn word(crc: u32, data: u32) -> u32;
  unsafe fn dword(crc: u32, data: u64) -> u32;
}

/// Bytes per stream in the parallel kernel.
const STREAM: usize = 4096;
const WINDOW: usize = 4 * STREAM;

const _: () = assert!(STREAM == crate::constants::crc32::parallel::STREAM);
const _: () = assert!(STREAM == crate::constants::crc32c::parallel::STREAM);

/// Advance a raw residue using one instruction chain.
///
/// Leading bytes go through b/h/w steps until the pointer is 8-aligned, the
/// bulk runs on doublewords, and the tail goes through w/h/b.
///
/// # Safety
///
/// The CPU must support `I`'s instructions.
#[inline(always)]
pub(crate) unsafe fn update<I: CrcInstr>(mut crc: u32, data: &[u8]) -> u32 {
  let lead = data.as_ptr().align_offset(8).min(data.len());
  let (head, rest) = data.split_at(lead);

  let mut head = head;
  if lead & 1 != 0 {
    if let Some((&b, tail)) = head.split_first() {
      crc = I::byte(crc, b);
      head = tail;
    }
  }
  if lead & 2 != 0 {
    if let Some((h, tail)) = head.split_first_chunk::<2>() {
      crc = I::half(crc, u16::from_le_bytes(*h));
      head = tail;
    }
  }
  if lead & 4 != 0 {
    if let Some((w, _)) = head.split_first_chunk::<4>() {
      crc = I::word(crc, u32::from_le_bytes(*w));
    }
  }

  let (dwords, tail) = rest.as_chunks::<8>();
  for d in dwords {
    crc = I::dword(crc, u64::from_le_bytes(*d));
  }

  tail_steps::<I>(crc, tail)
}

#[inline(always)]
unsafe fn tail_steps<I: CrcInstr>(mut crc: u32, mut tail: &[u8]) -> u32 {
  if let Some((w, rest)) = tail.split_first_chunk::<4>() {
    crc = I::word(crc, u32::from_le_bytes(*w));
    tail = rest;
  }
  if let Some((h, rest)) = tail.split_first_chunk::<2>() {
    crc = I::half(crc, u16::from_le_bytes(*h));
    tail = rest;
  }
  if let Some(&b) = tail.first() {
    crc = I::byte(crc, b);
  }
  crc
}

/// Advance a raw residue with four interleaved chains per 16 KiB window.
///
/// # Safety
///
/// The CPU must support `I`'s instructions.
#[inline(always)]
pub(crate) unsafe fn update_parallel4<I: CrcInstr>(mut crc: u32, data: &[u8]) -> u32 {
  let (body, rest) = data.split_at(data.len() - data.len() % WINDOW);
  let (streams, _) = body.as_chunks::<STREAM>();
  let (windows, _) = streams.as_chunks::<4>();

  for [s0, s1, s2, s3] in windows {
    let (w0, _) = s0.as_chunks::<8>();
    let (w1, _) = s1.as_chunks::<8>();
    let (w2, _) = s2.as_chunks::<8>();
    let (w3, _) = s3.as_chunks::<8>();

    let (mut c0, mut c1, mut c2, mut c3) = (crc, !0u32, !0u32, !0u32);
    for (((d0, d1), d2), d3) in w0.iter().zip(w1).zip(w2).zip(w3) {
      c0 = I::dword(c0, u64::from_le_bytes(*d0));
      c1 = I::dword(c1, u64::from_le_bytes(*d1));
      c2 = I::dword(c2, u64::from_le_bytes(*d2));
      c3 = I::dword(c3, u64::from_le_bytes(*d3));
    }

    crc = multmodp32(I::POLY, I::M3, !c0) ^ multmodp32(I::POLY, I::M2, !c1) ^ multmodp32(I::POLY, I::M1, !c2) ^ c3;
  }

  update::<I>(crc, rest)
}

/// Software model of a CRC instruction set, for testing the skeleton.
#[cfg(test)]
pub(crate) mod model {
  use super::CrcInstr;
  use crate::common::reference::residue32;

  pub(crate) struct Table<const POLY: u32, const M1: u32, const M2: u32, const M3: u32>;

  impl<const POLY: u32, const M1: u32, const M2: u32, const M3: u32> CrcInstr for Table<POLY, M1, M2, M3> {
    const POLY: u32 = POLY;
    const M1: u32 = M1;
    const M2: u32 = M2;
    const M3: u32 = M3;

    unsafe fn byte(crc: u32, data: u8) -> u32 {
      residue32(POLY, crc, &[data])
    }
    unsafe fn half(crc: u32, data: u16) -> u32 {
      residue32(POLY, crc, &data.to_le_bytes())
    }
    unsafe fn word(crc: u32, data: u32) -> u32 {
      residue32(POLY, crc, &data.to_le_bytes())
    }
    unsafe fn dword(crc: u32, data: u64) -> u32 {
      residue32(POLY, crc, &data.to_le_bytes())
    }
  }
}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::vec::Vec;

  use super::{model::Table, *};
  use crate::{
    common::reference::residue32,
    constants::{crc32, crc32c},
  };

  type Ieee = Table<{ crc32::POLY }, { crc32::parallel::M1 }, { crc32::parallel::M2 }, { crc32::parallel::M3 }>;
  type Castagnoli = Table<{ crc32c::POLY }, { crc32c::parallel::M1 }, { crc32c::parallel::M2 }, { crc32c::parallel::M3 }>;

  fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|k| ((k as u32).wrapping_mul(0x7654_3210) >> 24) as u8).collect()
  }

  #[test]
  fn single_chain_matches_reference_at_every_alignment() {
    let data = pattern(96);
    for start in 0..8 {
      for len in 0..80 {
        let input = &data[start..start + len];
        // SAFETY: the software model has no CPU requirements.
        let got = unsafe { update::<Ieee>(0x1234_5678, input) };
        assert_eq!(got, residue32(crc32::POLY, 0x1234_5678, input), "start={start} len={len}");
      }
    }
  }

  #[test]
  fn parallel_recombination_matches_reference() {
    let data = pattern(2 * WINDOW + 13);
    for len in [0, 1, WINDOW - 1, WINDOW, WINDOW + 7, 2 * WINDOW + 13] {
      let input = &data[..len];
      // SAFETY: the software model has no CPU requirements.
      let (ieee, castagnoli) = unsafe { (update_parallel4::<Ieee>(!0, input), update_parallel4::<Castagnoli>(!0, input)) };
      assert_eq!(ieee, residue32(crc32::POLY, !0, input), "len={len}");
      assert_eq!(castagnoli, residue32(crc32c::POLY, !0, input), "len={len}");
    }
  }

  #[test]
  fn leftover_streams_go_through_single_chain() {
    // Whole streams past the last window must not be taken as a window.
    let data = pattern(3 * WINDOW + 3 * STREAM + 5);
    for len in [STREAM, 3 * STREAM, WINDOW + 2 * STREAM + 5, 3 * WINDOW + 3 * STREAM + 5] {
      let input = &data[..len];
      // SAFETY: the software model has no CPU requirements.
      let got = unsafe { update_parallel4::<Ieee>(0x0BAD_F00D, input) };
      assert_eq!(got, residue32(crc32::POLY, 0x0BAD_F00D, input), "len={len}");
    }
  }
}
