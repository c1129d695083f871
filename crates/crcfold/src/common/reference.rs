//! Bitwise reference implementations.
//!
//! One bit per step, no tables. Every other kernel is verified against
//! these.
//!
//! | Function | Works on |
//! |----------|----------|
//! | [`residue32`] / [`residue64`] | the raw register, no complement |
//! | [`crc32_bitwise`] / [`crc64_bitwise`] | finalized running CRCs |
//!
//! The finalized form complements on the way in and on the way out, so
//! `crc(a ++ b, 0) == crc(b, crc(a, 0))` and `crc(empty, s) == s`.

/// Advance a raw 32-bit residue over `data`, bit by bit.
#[must_use]
pub const fn residue32(poly: u32, mut crc: u32, data: &[u8]) -> u32 {
  let mut rest = data;
  while let [byte, tail @ ..] = rest {
    crc ^= *byte as u32;
    let mut bit = 0;
    while bit < 8 {
      crc = (crc >> 1) ^ if crc & 1 != 0 { poly } else { 0 };
      bit += 1;
    }
    rest = tail;
  }
  crc
}

/// Advance a raw 64-bit residue over `data`, bit by bit.
#[must_use]
pub const fn residue64(poly: u64, mut crc: u64, data: &[u8]) -> u64 {
  let mut rest = data;
  while let [byte, tail @ ..] = rest {
    crc ^= *byte as u64;
    let mut bit = 0;
    while bit < 8 {
      crc = (crc >> 1) ^ if crc & 1 != 0 { poly } else { 0 };
      bit += 1;
    }
    rest = tail;
  }
  crc
}

/// Bitwise CRC over a finalized running value.
#[must_use]
pub const fn crc32_bitwise(poly: u32, crc: u32, data: &[u8]) -> u32 {
  !residue32(poly, !crc, data)
}

/// Bitwise CRC over a finalized running value.
#[must_use]
pub const fn crc64_bitwise(poly: u64, crc: u64, data: &[u8]) -> u64 {
  !residue64(poly, !crc, data)
}
