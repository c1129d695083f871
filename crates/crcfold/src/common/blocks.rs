//! Alignment-mirroring block split with bounce buffers.
//!
//! Vector and word kernels want to see the input as a run of aligned
//! `N`-byte blocks. Loading the aligned-down first block or the rounded-up
//! last block straight from memory would read outside the slice, so the two
//! partial blocks are copied into zeroed buffers instead:
//!
//! ```text
//!   addr % N = skip
//!   |<- skip ->|<------------- data ------------->|
//!   [ 0 0 0 0  h h h h ][ b b b b b b b b ] ... [ t t 0 0 0 0 0 0 ]
//!          head               body                    last
//! ```
//!
//! Byte `k` of the input sits at position `(skip + k) % N` of its block, just
//! as it would after an aligned load, so mask arithmetic keyed on the real
//! address works unchanged.

/// Input viewed as `N`-byte blocks, partial ends zero-padded.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Blocks<'a, const N: usize> {
  /// `skip` zero bytes, then up to `N - skip` leading input bytes.
  pub head: [u8; N],
  /// Full blocks between `head` and `last`, borrowed from the input.
  pub body: &'a [[u8; N]],
  /// The final block, if the input extends past `head`.
  pub last: Option<[u8; N]>,
}

impl<'a, const N: usize> Blocks<'a, N> {
  /// Blocks after `head`: `body` followed by `last`.
  #[inline]
  pub fn after_head(&self) -> impl Iterator<Item = [u8; N]> + 'a {
    self.body.iter().copied().chain(self.last)
  }
}

/// Split `data` as if it started `skip` bytes into an aligned block.
///
/// `skip` is reduced modulo `N`.
#[inline]
#[must_use]
pub(crate) fn split<const N: usize>(data: &[u8], skip: usize) -> Blocks<'_, N> {
  let skip = skip % N;
  let head_len = (N - skip).min(data.len());
  let (first, rest) = data.split_at(head_len);

  let mut head = [0u8; N];
  if let Some(dst) = head.get_mut(skip..skip + head_len) {
    dst.copy_from_slice(first);
  }

  if rest.is_empty() {
    return Blocks { head, body: &[], last: None };
  }

  let (chunks, tail) = rest.as_chunks::<N>();
  if tail.is_empty() {
    match chunks.split_last() {
      Some((last, body)) => Blocks {
        head,
        body,
        last: Some(*last),
      },
      None => Blocks { head, body: &[], last: None },
    }
  } else {
    Blocks {
      head,
      body: chunks,
      last: Some(zero_padded(tail)),
    }
  }
}

/// Copy up to `N` bytes into a zeroed array.
#[inline]
#[must_use]
pub(crate) fn zero_padded<const N: usize>(bytes: &[u8]) -> [u8; N] {
  let mut out = [0u8; N];
  let len = bytes.len().min(N);
  if let (Some(dst), Some(src)) = (out.get_mut(..len), bytes.get(..len)) {
    dst.copy_from_slice(src);
  }
  out
}

/// Little-endian value of up to 8 bytes, zero-extended.
#[inline]
#[must_use]
pub(crate) fn le_u64(bytes: &[u8]) -> u64 {
  u64::from_le_bytes(zero_padded(bytes))
}
