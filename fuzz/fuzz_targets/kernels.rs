//! Cross-kernel equivalence fuzzing.
//!
//! Every kernel the CPU can run, plus the software CLMUL model, must match
//! the bitwise reference on arbitrary data, seeds and start offsets.

#![no_main]

use arbitrary::Arbitrary;
use crcfold::kernel_test::{run_all_crc32_kernels, run_all_crc32c_kernels, run_all_crc64_kernels, verify_kernel_agreement};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  seed: u64,
  /// Bytes to skip, so misaligned starts are covered.
  skip: u8,
  data: Vec<u8>,
}

fuzz_target!(|input: Input| {
  let skip = usize::from(input.skip % 16).min(input.data.len());
  let data = input.data.get(skip..).unwrap_or_default();

  if let Err(msg) = verify_kernel_agreement(&run_all_crc32_kernels(input.seed as u32, data)) {
    panic!("crc32: {msg}, len={}", data.len());
  }
  if let Err(msg) = verify_kernel_agreement(&run_all_crc64_kernels(input.seed, data)) {
    panic!("crc64: {msg}, len={}", data.len());
  }
  if let Err(msg) = verify_kernel_agreement(&run_all_crc32c_kernels((input.seed >> 32) as u32, data)) {
    panic!("crc32c: {msg}, len={}", data.len());
  }
});
