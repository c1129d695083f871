//! Cross-kernel equivalence against the bitwise reference.
//!
//! Covers the full offset/length sweep, the check string through every
//! registered kernel, and kernel resolution under synthesized capability
//! sets (always subsets of what the CPU really has).

use crcfold::{Kernel, KernelError, Width, crc32_with, crc32c_with, crc64_with, diag, harness};
use platform::Caps;

const CHECK: &[u8] = b"123456789";
const CRC32_CHECK: u32 = 0xCBF4_3926;
const CRC64_CHECK: u64 = 0x995D_C9BB_DF19_39FA;
const CRC32C_CHECK: u32 = 0xE306_9283;

// ─────────────────────────────────────────────────────────────────────────────
// Offset / length sweep
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn every_kernel_matches_reference_for_all_offsets_and_lengths() {
  if let Err(mismatch) = harness::check_all() {
    panic!("{mismatch} (exit code {})", mismatch.exit_code());
  }
}

#[test]
fn sweep_reports_first_failure() {
  fn off_by_one(crc: u64, data: &[u8]) -> u64 {
    let crc = crcfold::reference::crc64_bitwise(crcfold::constants::crc64::POLY, crc, data);
    if data.len() == 40 { crc ^ 1 } else { crc }
  }

  let mismatch = harness::check_crc64_kernel("test/off-by-one", off_by_one).unwrap_err();
  assert_eq!(mismatch.width, Width::Crc64);
  assert_eq!((mismatch.s, mismatch.n), (0, 40));
  assert_ne!(mismatch.exit_code(), 0);
  assert!(mismatch.to_string().contains("mismatch at (s=0, n=40)"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Check string through every kernel
// ─────────────────────────────────────────────────────────────────────────────

/// Run `f` for every kernel, asserting it either yields `expected` or fails
/// with a well-formed error. Returns how many kernels ran.
fn each_kernel<W: Copy + PartialEq + core::fmt::Debug>(
  width: Width,
  expected: W,
  f: impl Fn(Kernel) -> Result<W, KernelError>,
) -> usize {
  let mut ran = 0;
  for kernel in Kernel::ALL {
    match f(kernel) {
      Ok(value) => {
        assert_eq!(value, expected, "{width} kernel {kernel}");
        ran += 1;
      }
      Err(err) => assert_eq!(err.kernel(), kernel, "{width}: {err}"),
    }
  }
  ran
}

#[test]
fn check_string_via_every_kernel() {
  // Bitwise, Sarwate, Slice4 and Clsim run everywhere.
  assert!(each_kernel(Width::Crc32, CRC32_CHECK, |k| crc32_with(k, CHECK, 0)) >= 4);
  assert!(each_kernel(Width::Crc64, CRC64_CHECK, |k| crc64_with(k, CHECK, 0)) >= 4);
  assert!(each_kernel(Width::Crc32c, CRC32C_CHECK, |k| crc32c_with(k, CHECK, 0)) >= 2);
}

#[test]
fn portable_kernels_are_never_unavailable() {
  for kernel in [Kernel::Bitwise, Kernel::Sarwate, Kernel::Slice4, Kernel::Clsim] {
    assert_eq!(crc32_with(kernel, CHECK, 0), Ok(CRC32_CHECK), "{kernel}");
    assert_eq!(crc64_with(kernel, CHECK, 0), Ok(CRC64_CHECK), "{kernel}");
  }
}

#[test]
fn missing_instances_are_unsupported() {
  assert!(matches!(
    crc64_with(Kernel::Hw, CHECK, 0),
    Err(KernelError::Unsupported {
      kernel: Kernel::Hw,
      width: Width::Crc64
    })
  ));
  assert!(matches!(
    crc32c_with(Kernel::Clsim, CHECK, 0),
    Err(KernelError::Unsupported { .. })
  ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Synthesized capability sets
// ─────────────────────────────────────────────────────────────────────────────

/// Feature groups the kernels key on for this target.
fn feature_groups() -> Vec<Caps> {
  #[cfg(target_arch = "x86_64")]
  {
    use platform::caps::x86;
    vec![x86::SSSE3, x86::SSE41, x86::PCLMULQDQ, x86::SSE42]
  }
  #[cfg(target_arch = "aarch64")]
  {
    use platform::caps::aarch64;
    vec![aarch64::NEON, aarch64::AES, aarch64::PMULL, aarch64::CRC]
  }
  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
  {
    Vec::new()
  }
}

/// Every subset of the feature groups, clamped to what the CPU has.
fn synthesized_caps() -> Vec<Caps> {
  let detected = platform::detect_uncached();
  let groups = feature_groups();
  let mut out = Vec::new();
  for bits in 0u32..(1 << groups.len()) {
    let mut caps = Caps::NONE;
    for (i, group) in groups.iter().enumerate() {
      if bits & (1 << i) != 0 {
        caps |= *group;
      }
    }
    let caps = caps & detected;
    if !out.contains(&caps) {
      out.push(caps);
    }
  }
  out
}

#[test]
fn check_string_under_synthesized_caps() {
  for caps in synthesized_caps() {
    platform::set_caps_override(Some(caps));

    each_kernel(Width::Crc32, CRC32_CHECK, |k| crc32_with(k, CHECK, 0));
    each_kernel(Width::Crc64, CRC64_CHECK, |k| crc64_with(k, CHECK, 0));
    each_kernel(Width::Crc32c, CRC32C_CHECK, |k| crc32c_with(k, CHECK, 0));

    for width in Width::ALL {
      let diag = diag::for_width(width);
      assert_eq!(diag.caps, caps);
      // Whatever auto picks must be runnable under these caps.
      let ok = match width {
        Width::Crc32 => crc32_with(diag.kernel, CHECK, 0) == Ok(CRC32_CHECK),
        Width::Crc64 => crc64_with(diag.kernel, CHECK, 0) == Ok(CRC64_CHECK),
        Width::Crc32c => crc32c_with(diag.kernel, CHECK, 0) == Ok(CRC32C_CHECK),
      };
      assert!(ok, "{diag}");
    }

    if let Err(mismatch) = harness::check_all() {
      platform::set_caps_override(None);
      panic!("caps={caps}: {mismatch}");
    }
  }

  platform::set_caps_override(Some(Caps::NONE));
  for width in Width::ALL {
    let diag = diag::for_width(width);
    assert!(!diag.kernel.is_accelerated(), "{diag}");
    assert!(diag.name.starts_with("portable/"), "{diag}");
  }
  assert!(matches!(
    crc32c_with(Kernel::Hw, CHECK, 0),
    Err(KernelError::Unavailable { .. }) | Err(KernelError::Unsupported { .. })
  ));

  // Claiming every feature must not expose kernels beyond what is detected.
  let everything = (0..64u8).fold(Caps::NONE, |acc, bit| acc | Caps::bit(bit));
  platform::set_caps_override(Some(everything));
  let claimed = platform::caps();
  let runnable: Vec<(Kernel, bool, bool, bool)> = Kernel::ALL
    .iter()
    .map(|&k| (k, crc32_with(k, CHECK, 0).is_ok(), crc64_with(k, CHECK, 0).is_ok(), crc32c_with(k, CHECK, 0).is_ok()))
    .collect();
  platform::set_caps_override(None);

  assert_eq!(claimed, platform::detect_uncached());
  for (kernel, crc32, crc64, crc32c) in runnable {
    assert_eq!(crc32, crc32_with(kernel, CHECK, 0).is_ok(), "crc32 {kernel}");
    assert_eq!(crc64, crc64_with(kernel, CHECK, 0).is_ok(), "crc64 {kernel}");
    assert_eq!(crc32c, crc32c_with(kernel, CHECK, 0).is_ok(), "crc32c {kernel}");
  }
}
