//! Bit-reflected GF(2)[x] arithmetic modulo a CRC polynomial.
//!
//! Every value here is a polynomial in reflected order: bit `W-1` holds the
//! coefficient of `x^0` and bit 0 holds `x^(W-1)`. This matches how the
//! running CRC register is stored, so the results plug straight into kernels.
//!
//! | Function | Computes |
//! |----------|----------|
//! | `calc_hi(p, a, n)` | `a * x^n mod P` |
//! | `calc_lo(p, a, n)` | low `n` quotient bits of `a * x^n / P` |
//! | `multmodp(p, a, b)` | `a * b mod P` |
//! | `x8n(p, n)` | `x^(8n) mod P` |
//!
//! All of them are `const fn`, so folding constants are derived and checked
//! at compile time.

macro_rules! define_gf2 {
  ($word:ty, $bits:expr, $calc_lo:ident, $calc_hi:ident, $multmodp:ident, $x8n:ident) => {
    /// Low `n` bits of the reverse-shift quotient of `a` by `poly`.
    ///
    /// Each step shifts one reduction bit into the quotient from the top.
    #[must_use]
    pub const fn $calc_lo(poly: $word, mut a: $word, n: u32) -> $word {
      let mut b: $word = 0;
      let mut i = 0;
      while i < n {
        b = (b >> 1) | ((a & 1) << (n - 1));
        a = (a >> 1) ^ if a & 1 != 0 { poly } else { 0 };
        i += 1;
      }
      b
    }

    /// `a * x^n mod poly`.
    #[must_use]
    pub const fn $calc_hi(poly: $word, mut a: $word, n: u32) -> $word {
      let mut i = 0;
      while i < n {
        a = (a >> 1) ^ if a & 1 != 0 { poly } else { 0 };
        i += 1;
      }
      a
    }

    /// `a * b mod poly`.
    #[must_use]
    pub const fn $multmodp(poly: $word, mut a: $word, mut b: $word) -> $word {
      const TOP: $word = 1 << ($bits - 1);
      let mut x: $word = 0;
      while a != 0 {
        if a & TOP != 0 {
          x ^= b;
        }
        b = (b >> 1) ^ if b & 1 != 0 { poly } else { 0 };
        a <<= 1;
      }
      x
    }

    /// `x^(8n) mod poly`: the multiplier that appends `n` zero bytes.
    ///
    /// Square-and-multiply over `n`, starting from `x^8`.
    #[must_use]
    pub const fn $x8n(poly: $word, mut n: u64) -> $word {
      const TOP: $word = 1 << ($bits - 1);
      let mut result: $word = TOP;
      let mut base: $word = TOP >> 8;
      while n != 0 {
        if n & 1 != 0 {
          result = $multmodp(poly, result, base);
        }
        base = $multmodp(poly, base, base);
        n >>= 1;
      }
      result
    }
  };
}

define_gf2!(u32, 32, calc_lo32, calc_hi32, multmodp32, x8n_32);
define_gf2!(u64, 64, calc_lo64, calc_hi64, multmodp64, x8n_64);

#[cfg(test)]
mod tests {
  use super::*;
  use crate::common::reference::{residue32, residue64};

  const P32: u32 = 0xEDB8_8320;
  const P64: u64 = 0xC96C_5795_D787_0F42;

  #[test]
  fn one_is_multiplicative_identity() {
    let one32 = 1u32 << 31;
    let one64 = 1u64 << 63;
    for v in [0u32, 1, 0xDEAD_BEEF, u32::MAX] {
      assert_eq!(multmodp32(P32, one32, v), v);
      assert_eq!(multmodp32(P32, v, one32), v);
    }
    for v in [0u64, 1, 0x0123_4567_89AB_CDEF, u64::MAX] {
      assert_eq!(multmodp64(P64, one64, v), v);
    }
  }

  #[test]
  fn multmodp_commutes() {
    let pairs = [(0x1234_5678u32, 0x9ABC_DEF0u32), (0xFFFF_FFFF, 0x8000_0001), (3, 5)];
    for (a, b) in pairs {
      assert_eq!(multmodp32(P32, a, b), multmodp32(P32, b, a));
    }
  }

  #[test]
  fn calc_hi_shifts_by_x_power() {
    // x^n applied to a is the same as multiplying by x^n.
    let a = 0x1234_5678u32;
    let x32 = calc_hi32(P32, 1u32 << 31, 32);
    assert_eq!(calc_hi32(P32, a, 32), multmodp32(P32, a, x32));
    assert_eq!(x8n_32(P32, 4), x32);
  }

  #[test]
  fn x8n_matches_zero_bytes() {
    for n in [0usize, 1, 7, 64, 4096] {
      let zeros = [0u8; 4096];
      let zeros = zeros.get(..n).unwrap();
      let r32 = 0xA5A5_1234u32;
      assert_eq!(residue32(P32, r32, zeros), multmodp32(P32, x8n_32(P32, n as u64), r32));
      let r64 = 0x0123_4567_89AB_CDEFu64;
      assert_eq!(residue64(P64, r64, zeros), multmodp64(P64, x8n_64(P64, n as u64), r64));
    }
  }

  #[test]
  fn calc_lo_is_quotient_of_low_bits() {
    assert_eq!(calc_lo32(P32, 1, 32), 0xF701_1641);
    assert_eq!(calc_lo64(P64, 1, 64), 0x9C3E_466C_1729_63D5);
  }
}
