//! Const-fn lookup table generation.
//!
//! | Table | Entries | Size (CRC-32) | Size (CRC-64) |
//! |-------|---------|---------------|---------------|
//! | Sarwate | 1×256 | 1 KiB | 2 KiB |
//! | Slice-by-4 | 4×256 | 4 KiB | 8 KiB |
//!
//! `T0[b]` is the residue of byte `b`. `Tj[b]` pushes `T(j-1)[b]` through
//! eight more reduction steps, i.e. byte `b` seen `j` bytes earlier.

// All indexing is bounded by the 256-entry loops below.
#![allow(clippy::indexing_slicing)]

macro_rules! define_tables {
  ($word:ty, $sarwate:ident, $slice4:ident) => {
    /// Single-table (Sarwate) lookup for a reflected polynomial.
    #[must_use]
    pub const fn $sarwate(poly: $word) -> [$word; 256] {
      let mut table = [0; 256];
      let mut i = 0;
      while i < 256 {
        let mut crc = i as $word;
        let mut bit = 0;
        while bit < 8 {
          crc = (crc >> 1) ^ if crc & 1 != 0 { poly } else { 0 };
          bit += 1;
        }
        table[i] = crc;
        i += 1;
      }
      table
    }

    /// Four slice-by-4 tables for a reflected polynomial.
    #[must_use]
    pub const fn $slice4(poly: $word) -> [[$word; 256]; 4] {
      let mut tables = [[0; 256]; 4];
      tables[0] = $sarwate(poly);
      let mut i = 0;
      while i < 256 {
        let mut j = 1;
        while j < 4 {
          let prev = tables[j - 1][i];
          tables[j][i] = (prev >> 8) ^ tables[0][(prev & 0xFF) as usize];
          j += 1;
        }
        i += 1;
      }
      tables
    }
  };
}

define_tables!(u32, sarwate32, slice4_32);
define_tables!(u64, sarwate64, slice4_64);
