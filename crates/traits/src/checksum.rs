//! Streaming checksum traits.
//!
//! A CRC here is always carried in finalized form: the value a hasher
//! reports from [`Checksum::finalize`] is also a valid starting point for
//! [`Checksum::with_initial`]. Splitting the input anywhere and chaining the
//! pieces through that value gives the same result as one pass.

use core::fmt::Debug;

/// A checksum that can be computed incrementally.
///
/// ```rust,ignore
/// use crcfold::{Checksum, Crc32};
///
/// let mut hasher = Crc32::new();
/// hasher.update(b"1234");
/// let head = hasher.finalize();
///
/// let mut tail = Crc32::with_initial(head);
/// tail.update(b"56789");
/// assert_eq!(tail.finalize(), Crc32::checksum(b"123456789"));
/// ```
///
/// # Implementor Requirements
///
/// - `new()` equals `Default::default()` and `with_initial(0)`
/// - `finalize()` does not change state
/// - `with_initial(h.finalize())` continues where `h` left off
pub trait Checksum: Clone + Default {
  /// Output size in bytes: 4 for CRC-32 and CRC-32C, 8 for CRC-64.
  const OUTPUT_SIZE: usize;

  /// `u32` or `u64`.
  type Output: Copy + Eq + Debug + Default;

  /// A hasher over the empty input.
  #[must_use]
  fn new() -> Self;

  /// A hasher continuing from a finalized checksum.
  #[must_use]
  fn with_initial(initial: Self::Output) -> Self;

  /// Append `data`.
  fn update(&mut self, data: &[u8]);

  /// The checksum of everything appended so far.
  #[must_use]
  fn finalize(&self) -> Self::Output;

  /// Forget everything appended.
  fn reset(&mut self);

  /// One-shot checksum of `data`.
  #[inline]
  #[must_use]
  fn checksum(data: &[u8]) -> Self::Output {
    let mut h = Self::new();
    h.update(data);
    h.finalize()
  }
}

/// Checksums whose values can be joined without the data.
///
/// Computes `crc(A || B)` from `crc(A)`, `crc(B)` and `len(B)`:
///
/// ```text
/// crc(A || B) = crc(A) * x^(8*len(B)) mod P  XOR  crc(B)
/// ```
///
/// The power of `x` is found by square-and-multiply, so the cost is
/// logarithmic in `len(B)`.
pub trait ChecksumCombine: Checksum {
  /// `crc(A || B)` given `crc_a = crc(A)`, `crc_b = crc(B)` and `len_b = len(B)`.
  #[must_use]
  fn combine(crc_a: Self::Output, crc_b: Self::Output, len_b: usize) -> Self::Output;
}
