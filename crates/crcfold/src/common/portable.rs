//! Table-driven kernels shared by every polynomial.
//!
//! All functions here advance a raw (uncomplemented) residue; the width
//! modules wrap them with the complement-in/complement-out convention.
//!
//! | Width | Algorithm | Bytes/iter | Tables |
//! |-------|-----------|------------|--------|
//! | 32-bit | Sarwate | 1 | 1×256×u32 |
//! | 32-bit | slice-by-4 | 4 | 4×256×u32 |
//! | 64-bit | Sarwate | 1 | 1×256×u64 |
//! | 64-bit | slice-by-4 | 4 | 4×256×u64 |
//!
//! Slice-by-4 runs byte-at-a-time until the pointer is 4-aligned (only when
//! at least four bytes remain), then folds one little-endian word per step,
//! then finishes byte-at-a-time.

// Table indices are masked to 0..=255 (or shifted down from the top byte).
#![allow(clippy::indexing_slicing)]

// ─────────────────────────────────────────────────────────────────────────────
// Sarwate
// ─────────────────────────────────────────────────────────────────────────────

/// One table lookup per byte.
#[inline]
#[must_use]
pub(crate) fn sarwate32(mut crc: u32, data: &[u8], table: &[u32; 256]) -> u32 {
  for &byte in data {
    crc = table[((crc ^ byte as u32) & 0xFF) as usize] ^ (crc >> 8);
  }
  crc
}

/// One table lookup per byte.
#[inline]
#[must_use]
pub(crate) fn sarwate64(mut crc: u64, data: &[u8], table: &[u64; 256]) -> u64 {
  for &byte in data {
    crc = table[((crc ^ byte as u64) & 0xFF) as usize] ^ (crc >> 8);
  }
  crc
}

// ─────────────────────────────────────────────────────────────────────────────
// Slice-by-4
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
fn split_aligned4(data: &[u8]) -> (&[u8], &[[u8; 4]], &[u8]) {
  let lead = if data.len() >= 4 {
    data.as_ptr().align_offset(4).min(data.len())
  } else {
    data.len()
  };
  let (prelude, rest) = data.split_at(lead);
  let (words, postlude) = rest.as_chunks::<4>();
  (prelude, words, postlude)
}

/// Four lookups per little-endian word.
#[inline]
#[must_use]
pub(crate) fn slice4_32(crc: u32, data: &[u8], tables: &[[u32; 256]; 4]) -> u32 {
  let (prelude, words, postlude) = split_aligned4(data);

  let mut crc = sarwate32(crc, prelude, &tables[0]);
  for word in words {
    let c = crc ^ u32::from_le_bytes(*word);
    crc = tables[3][(c & 0xFF) as usize]
      ^ tables[2][((c >> 8) & 0xFF) as usize]
      ^ tables[1][((c >> 16) & 0xFF) as usize]
      ^ tables[0][(c >> 24) as usize];
  }
  sarwate32(crc, postlude, &tables[0])
}

/// Four lookups per little-endian word; the upper half of the register
/// shifts down past the word.
#[inline]
#[must_use]
pub(crate) fn slice4_64(crc: u64, data: &[u8], tables: &[[u64; 256]; 4]) -> u64 {
  let (prelude, words, postlude) = split_aligned4(data);

  let mut crc = sarwate64(crc, prelude, &tables[0]);
  for word in words {
    let x = (crc as u32) ^ u32::from_le_bytes(*word);
    crc = tables[3][(x & 0xFF) as usize]
      ^ tables[2][((x >> 8) & 0xFF) as usize]
      ^ tables[1][((x >> 16) & 0xFF) as usize]
      ^ tables[0][(x >> 24) as usize]
      ^ (crc >> 32);
  }
  sarwate64(crc, postlude, &tables[0])
}
