//! CRC-32 and CRC-64/XZ with a family of interchangeable kernels.
//!
//! Every kernel computes the same function. They differ only in speed and
//! CPU requirements, and dispatch binds the fastest one once per process.
//!
//! | Kernel | CRC-32 | CRC-64/XZ | CRC-32C | Requires |
//! |--------|:------:|:---------:|:-------:|----------|
//! | [`Kernel::Bitwise`] | ✓ | ✓ | ✓ | none |
//! | [`Kernel::Sarwate`] | ✓ | ✓ | ✓ | none |
//! | [`Kernel::Slice4`] | ✓ | ✓ | | none |
//! | [`Kernel::Clsim`] | ✓ | ✓ | | none |
//! | [`Kernel::ClsimHw`] | ✓ | ✓ | | PCLMULQDQ / NEON+PMULL |
//! | [`Kernel::Clmul`] | ✓ | ✓ | | PCLMULQDQ+SSSE3+SSE4.1 / NEON+PMULL |
//! | [`Kernel::Hw`] | aarch64 | | ✓ | ARMv8 CRC / SSE4.2 |
//! | [`Kernel::HwParallel4`] | aarch64 | | ✓ | ARMv8 CRC / SSE4.2 |
//!
//! # Conventions
//!
//! Seeds and results are finalized CRCs: seed `0` gives the standard
//! checksum, `crc(empty, s) == s`, and `crc(a ++ b, 0) == crc(b, crc(a, 0))`.
//!
//! ```
//! use crcfold::{Kernel, crc32, crc32_with, crc64};
//!
//! assert_eq!(crc32(b"123456789", 0), 0xCBF4_3926);
//! assert_eq!(crc64(b"123456789", 0), 0x995D_C9BB_DF19_39FA);
//!
//! let head = crc32(b"1234", 0);
//! assert_eq!(crc32(b"56789", head), 0xCBF4_3926);
//!
//! assert_eq!(crc32_with(Kernel::Clsim, b"123456789", 0), Ok(0xCBF4_3926));
//! ```
//!
//! # Selection
//!
//! - [`config`]: force a kernel per width (env or [`config::set_force`])
//! - [`diag`]: which kernel was chosen and why
//! - [`harness`]: offset/length sweep of every kernel against the reference
//!
//! # no_std
//!
//! Disable default features for `no_std`. Detection then relies on
//! compile-time target features and an atomic cache.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

// Internal macros must be declared before modules that use them.
mod macros;
pub(crate) use macros::{define_crc_type, log_debug, log_error, log_warn};

mod common;
pub mod config;
pub mod constants;
mod crc32;
mod crc32c;
mod crc64;
pub mod diag;
mod error;
pub mod harness;
mod kernel;
#[cfg(feature = "alloc")]
pub mod kernel_test;
mod registry;
mod simd;

pub use common::{gf2, reference};
pub use crc32::Crc32;
pub use crc32c::Crc32c;
pub use crc64::Crc64;
pub use error::KernelError;
pub use kernel::{Kernel, Width};
pub use traits::{Checksum, ChecksumCombine};

// ─────────────────────────────────────────────────────────────────────────────
// One-shot API
// ─────────────────────────────────────────────────────────────────────────────

/// CRC-32 of `data`, continuing from `seed`.
#[inline]
#[must_use]
pub fn crc32(data: &[u8], seed: u32) -> u32 {
  crc32::compute(seed, data)
}

/// CRC-64/XZ of `data`, continuing from `seed`.
#[inline]
#[must_use]
pub fn crc64(data: &[u8], seed: u64) -> u64 {
  crc64::compute(seed, data)
}

/// CRC-32C of `data`, continuing from `seed`.
#[inline]
#[must_use]
pub fn crc32c(data: &[u8], seed: u32) -> u32 {
  crc32c::compute(seed, data)
}

/// CRC-32 through a specific kernel.
///
/// # Errors
///
/// [`KernelError`] if `kernel` has no CRC-32 instance on this target or the
/// CPU lacks its features.
pub fn crc32_with(kernel: Kernel, data: &[u8], seed: u32) -> Result<u32, KernelError> {
  crc32::compute_with(kernel, seed, data)
}

/// CRC-64/XZ through a specific kernel.
///
/// # Errors
///
/// [`KernelError`] if `kernel` has no CRC-64 instance or the CPU lacks its
/// features.
pub fn crc64_with(kernel: Kernel, data: &[u8], seed: u64) -> Result<u64, KernelError> {
  crc64::compute_with(kernel, seed, data)
}

/// CRC-32C through a specific kernel.
///
/// # Errors
///
/// [`KernelError`] if `kernel` has no CRC-32C instance on this target or the
/// CPU lacks its features.
pub fn crc32c_with(kernel: Kernel, data: &[u8], seed: u32) -> Result<u32, KernelError> {
  crc32c::compute_with(kernel, seed, data)
}

/// Name of the kernel bound for CRC-32, e.g. `"x86_64/clmul"`.
#[must_use]
pub fn backend_crc32() -> &'static str {
  crc32::backend_name()
}

/// Name of the kernel bound for CRC-64/XZ.
#[must_use]
pub fn backend_crc64() -> &'static str {
  crc64::backend_name()
}

/// Name of the kernel bound for CRC-32C.
#[must_use]
pub fn backend_crc32c() -> &'static str {
  crc32c::backend_name()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn check_values() {
    assert_eq!(crc32(b"123456789", 0), 0xCBF4_3926);
    assert_eq!(crc64(b"123456789", 0), 0x995D_C9BB_DF19_39FA);
    assert_eq!(crc32c(b"123456789", 0), 0xE306_9283);
  }

  #[test]
  fn empty_input_returns_seed() {
    assert_eq!(crc32(&[], 0xDEAD_BEEF), 0xDEAD_BEEF);
    assert_eq!(crc64(&[], 42), 42);
    assert_eq!(crc32c(&[], 7), 7);
  }

  #[test]
  fn backend_names_are_registered() {
    assert!(!backend_crc32().is_empty());
    assert!(backend_crc64().contains('/'));
    assert!(backend_crc32c().contains('/'));
  }
}
