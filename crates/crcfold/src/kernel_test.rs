//! Run every available kernel on one input.
//!
//! Used by fuzz targets and integration tests to check cross-kernel
//! agreement on arbitrary data. The first result is always the bitwise
//! reference; the software CLMUL model is included for the folding widths.

use alloc::{format, string::String, vec::Vec};

use crate::{
  common::reference::{crc32_bitwise, crc64_bitwise},
  constants::{crc32, crc32c, crc64},
};

/// One kernel's output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KernelResult {
  /// Kernel name, e.g. `"reference"`, `"portable/slice4"`, `"x86_64/clmul"`.
  pub name: &'static str,
  /// Finalized checksum, widened to 64 bits.
  pub checksum: u64,
}

/// Every CRC-32 kernel on `data`, continuing from `seed`.
#[must_use]
pub fn run_all_crc32_kernels(seed: u32, data: &[u8]) -> Vec<KernelResult> {
  let mut results = Vec::with_capacity(8);
  results.push(KernelResult {
    name: "reference",
    checksum: crc32_bitwise(crc32::POLY, seed, data).into(),
  });
  for selected in crate::crc32::REGISTRY.available(platform::caps()) {
    results.push(KernelResult {
      name: selected.name,
      checksum: (selected.func.1)(seed, data).into(),
    });
  }
  results.push(KernelResult {
    name: crate::simd::soft::NAME,
    checksum: crate::simd::soft::crc32_soft(seed, data).into(),
  });
  results
}

/// Every CRC-64/XZ kernel on `data`, continuing from `seed`.
#[must_use]
pub fn run_all_crc64_kernels(seed: u64, data: &[u8]) -> Vec<KernelResult> {
  let mut results = Vec::with_capacity(8);
  results.push(KernelResult {
    name: "reference",
    checksum: crc64_bitwise(crc64::POLY, seed, data),
  });
  for selected in crate::crc64::REGISTRY.available(platform::caps()) {
    results.push(KernelResult {
      name: selected.name,
      checksum: (selected.func.1)(seed, data),
    });
  }
  results.push(KernelResult {
    name: crate::simd::soft::NAME,
    checksum: crate::simd::soft::crc64_soft(seed, data),
  });
  results
}

/// Every CRC-32C kernel on `data`, continuing from `seed`.
#[must_use]
pub fn run_all_crc32c_kernels(seed: u32, data: &[u8]) -> Vec<KernelResult> {
  let mut results = Vec::with_capacity(6);
  results.push(KernelResult {
    name: "reference",
    checksum: crc32_bitwise(crc32c::POLY, seed, data).into(),
  });
  for selected in crate::crc32c::REGISTRY.available(platform::caps()) {
    results.push(KernelResult {
      name: selected.name,
      checksum: (selected.func.1)(seed, data).into(),
    });
  }
  results
}

/// Check that every result equals the first.
///
/// # Errors
///
/// Names the first kernel that disagrees with the reference.
pub fn verify_kernel_agreement(results: &[KernelResult]) -> Result<u64, String> {
  let Some(first) = results.first() else {
    return Err(String::from("no kernels available"));
  };

  for result in results.iter().skip(1) {
    if result.checksum != first.checksum {
      return Err(format!(
        "kernel mismatch: {} produced {:#x}, but {} produced {:#x}",
        first.name, first.checksum, result.name, result.checksum
      ));
    }
  }
  Ok(first.checksum)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn all_kernels_agree() {
    let data: Vec<u8> = (0..1000u32).map(|i| (i * 7 + 3) as u8).collect();
    for start in 0..16 {
      let input = &data[start..];
      verify_kernel_agreement(&run_all_crc32_kernels(0, input)).unwrap();
      verify_kernel_agreement(&run_all_crc64_kernels(0, input)).unwrap();
      verify_kernel_agreement(&run_all_crc32c_kernels(0, input)).unwrap();
    }
  }

  #[test]
  fn reference_comes_first() {
    assert_eq!(run_all_crc64_kernels(0, b"123456789")[0].name, "reference");
    assert_eq!(
      verify_kernel_agreement(&run_all_crc32_kernels(0, b"123456789")),
      Ok(0xCBF4_3926)
    );
  }

  #[test]
  fn disagreement_is_reported() {
    let results = [
      KernelResult {
        name: "reference",
        checksum: 1,
      },
      KernelResult { name: "bad", checksum: 2 },
    ];
    let err = verify_kernel_agreement(&results).unwrap_err();
    assert!(err.contains("bad"));
    assert!(verify_kernel_agreement(&[]).is_err());
  }
}
