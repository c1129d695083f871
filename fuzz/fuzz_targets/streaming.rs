//! Streaming, resume and combine fuzzing.
//!
//! Splitting the input at arbitrary points must not change the checksum,
//! whether the pieces are fed to one hasher, chained through `resume`, or
//! checksummed separately and combined.

#![no_main]

use arbitrary::Arbitrary;
use crcfold::{Checksum, ChecksumCombine, Crc32, Crc32c, Crc64};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  data: Vec<u8>,
  /// Chunk sizes for streaming updates.
  chunk_sizes: Vec<u16>,
}

fuzz_target!(|input: Input| {
  check::<Crc32>(&input.data, &input.chunk_sizes, Crc32::resume, "crc32");
  check::<Crc64>(&input.data, &input.chunk_sizes, Crc64::resume, "crc64");
  check::<Crc32c>(&input.data, &input.chunk_sizes, Crc32c::resume, "crc32c");
});

fn check<C: ChecksumCombine>(data: &[u8], chunk_sizes: &[u16], resume: fn(C::Output) -> C, name: &str) {
  let expected = C::checksum(data);

  let mut streamed = C::new();
  let mut chained = C::new().finalize();
  let mut combined = C::new().finalize();

  let mut rest = data;
  let mut sizes = chunk_sizes.iter().cycle();
  while !rest.is_empty() {
    let size = sizes.next().map_or(1, |&s| usize::from(s).max(1)).min(rest.len());
    let (chunk, tail) = rest.split_at(size);

    streamed.update(chunk);

    let mut next = resume(chained);
    next.update(chunk);
    chained = next.finalize();

    combined = C::combine(combined, C::checksum(chunk), chunk.len());
    rest = tail;
  }

  assert_eq!(streamed.finalize(), expected, "{name} streaming mismatch");
  assert_eq!(chained, expected, "{name} resume mismatch");
  assert_eq!(combined, expected, "{name} combine mismatch");
}
