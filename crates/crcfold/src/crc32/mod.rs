//! CRC-32 (ISO-HDLC): kernels, registry and dispatch.
//!
//! | Kernel | Name | Requires |
//! |--------|------|----------|
//! | `HwParallel4` | `aarch64/crc-4way` | CRC |
//! | `Clmul` | `x86_64/clmul`, `aarch64/pmull` | PCLMULQDQ+SSSE3+SSE4.1, NEON+AES+PMULL |
//! | `Hw` | `aarch64/crc` | CRC |
//! | `ClsimHw` | `x86_64/clsim-pclmul`, `aarch64/clsim-pmull` | PCLMULQDQ, NEON+AES+PMULL |
//! | `Slice4` | `portable/slice4` | none |
//! | `Sarwate` | `portable/sarwate` | none |
//! | `Clsim` | `portable/clsim` | none |
//! | `Bitwise` | `portable/bitwise` | none |
//!
//! x86_64 has no CRC-32 (IEEE) instruction, so `Hw` is unsupported there.

pub(crate) mod clsim;
#[cfg(target_arch = "aarch64")]
mod hw;
pub(crate) mod portable;

use backend::dispatch::{Candidate, Crc32Dispatcher, Crc32Fn, Selected};
use platform::Caps;
#[cfg(target_arch = "aarch64")]
use platform::caps::aarch64;
#[cfg(target_arch = "x86_64")]
use platform::caps::x86;

use self::{
  clsim::crc32_clsim,
  portable::{crc32_bitwise, crc32_sarwate, crc32_slice4},
};
use crate::{
  config,
  constants::crc32::POLY,
  diag::SelectionDiag,
  error::KernelError,
  kernel::{Kernel, Width},
  registry::{Entry, Registry, entry32},
};

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "x86_64")]
const ACCELERATED: &[Candidate<Entry<Crc32Fn>>] = backend::candidates![
  "x86_64/clmul" => x86::CLMUL_READY => entry32(Kernel::Clmul, crate::simd::x86_64::crc32_clmul),
  "x86_64/clsim-pclmul" => x86::PCLMULQDQ => entry32(Kernel::ClsimHw, clsim::crc32_clsim_pclmul),
];

#[cfg(target_arch = "aarch64")]
const ACCELERATED: &[Candidate<Entry<Crc32Fn>>] = backend::candidates![
  "aarch64/crc-4way" => aarch64::CRC_READY => entry32(Kernel::HwParallel4, hw::crc32_hw_parallel4),
  "aarch64/pmull" => aarch64::PMULL_READY => entry32(Kernel::Clmul, crate::simd::aarch64::crc32_pmull),
  "aarch64/crc" => aarch64::CRC_READY => entry32(Kernel::Hw, hw::crc32_hw),
  "aarch64/clsim-pmull" => aarch64::PMULL_READY => entry32(Kernel::ClsimHw, clsim::crc32_clsim_pmull),
];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
const ACCELERATED: &[Candidate<Entry<Crc32Fn>>] = &[];

const PORTABLE: &[Candidate<Entry<Crc32Fn>>] = backend::candidates![
  "portable/slice4" => Caps::NONE => entry32(Kernel::Slice4, crc32_slice4),
  "portable/sarwate" => Caps::NONE => entry32(Kernel::Sarwate, crc32_sarwate),
  "portable/clsim" => Caps::NONE => entry32(Kernel::Clsim, crc32_clsim),
  "portable/bitwise" => Caps::NONE => entry32(Kernel::Bitwise, crc32_bitwise),
];

pub(crate) static REGISTRY: Registry<Crc32Fn> = Registry {
  width: Width::Crc32,
  accelerated: ACCELERATED,
  portable: PORTABLE,
  fallback: Selected::new("portable/slice4", entry32(Kernel::Slice4, crc32_slice4)),
};

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch
// ─────────────────────────────────────────────────────────────────────────────

fn select_crc32() -> Selected<Crc32Fn> {
  let plan = REGISTRY.plan(config::force(Width::Crc32), platform::caps());
  crate::log_debug!("crc32: bound {} ({:?})", plan.selected.name, plan.reason);
  plan.into_selected()
}

static DISPATCHER: Crc32Dispatcher = Crc32Dispatcher::new(select_crc32);

/// Dispatched CRC-32 over a finalized running value.
#[inline]
pub(crate) fn compute(crc: u32, data: &[u8]) -> u32 {
  DISPATCHER.call(crc, data)
}

/// Run a specific kernel.
pub(crate) fn compute_with(kernel: Kernel, crc: u32, data: &[u8]) -> Result<u32, KernelError> {
  let selected = REGISTRY.resolve(kernel, platform::caps())?;
  Ok((selected.func.1)(crc, data))
}

pub(crate) fn backend_name() -> &'static str {
  DISPATCHER.backend_name()
}

pub(crate) fn diag(caps: Caps) -> SelectionDiag {
  let requested = config::force(Width::Crc32);
  let plan = REGISTRY.plan(requested, caps);
  SelectionDiag {
    width: Width::Crc32,
    requested,
    kernel: plan.kernel(),
    name: plan.selected.name,
    reason: plan.reason,
    caps,
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Streaming type
// ─────────────────────────────────────────────────────────────────────────────

crate::define_crc_type! {
  /// CRC-32 checksum (ISO-HDLC).
  ///
  /// Used by gzip, PKZIP and PNG.
  ///
  /// # Properties
  ///
  /// - **Polynomial**: 0x04C11DB7 (normal), 0xEDB88320 (reflected)
  /// - **Initial value / final XOR**: 0xFFFFFFFF
  /// - **Check** (`"123456789"`): 0xCBF43926
  ///
  /// ```
  /// use crcfold::{Checksum, Crc32};
  ///
  /// let mut hasher = Crc32::new();
  /// hasher.update(b"1234");
  /// hasher.update(b"56789");
  /// assert_eq!(hasher.finalize(), 0xCBF4_3926);
  /// ```
  pub struct Crc32 {
    word: u32,
    poly: POLY,
    compute: compute,
    backend: backend_name,
    multmodp: crate::gf2::multmodp32,
    x8n: crate::gf2::x8n_32,
  }
}

#[cfg(test)]
mod tests {
  use traits::{Checksum, ChecksumCombine};

  use super::*;

  const CHECK: &[u8] = b"123456789";

  #[test]
  fn every_portable_kernel_hits_check_value() {
    for candidate in PORTABLE {
      assert_eq!((candidate.func.1)(0, CHECK), 0xCBF4_3926, "{}", candidate.name);
    }
  }

  #[test]
  fn every_available_kernel_hits_check_value() {
    for selected in REGISTRY.available(platform::caps()) {
      assert_eq!((selected.func.1)(0, CHECK), 0xCBF4_3926, "{}", selected.name);
    }
  }

  #[test]
  fn hw_is_never_supported_on_x86() {
    if cfg!(target_arch = "x86_64") {
      assert_eq!(
        REGISTRY.resolve(Kernel::Hw, platform::caps()).unwrap_err(),
        KernelError::Unsupported {
          kernel: Kernel::Hw,
          width: Width::Crc32,
        }
      );
    }
  }

  #[test]
  fn clsim_hw_needs_carryless_multiply() {
    let err = REGISTRY.resolve(Kernel::ClsimHw, Caps::NONE).unwrap_err();
    if cfg!(any(target_arch = "x86_64", target_arch = "aarch64")) {
      assert!(matches!(err, KernelError::Unavailable { kernel: Kernel::ClsimHw, .. }), "{err}");
    } else {
      assert!(matches!(err, KernelError::Unsupported { kernel: Kernel::ClsimHw, .. }), "{err}");
    }
  }

  #[test]
  fn portable_caps_select_slice4() {
    assert_eq!(REGISTRY.auto(Caps::NONE).name, "portable/slice4");
  }

  #[test]
  fn streaming_and_combine() {
    let mut hasher = Crc32::new();
    for chunk in CHECK.chunks(2) {
      hasher.update(chunk);
    }
    assert_eq!(hasher.finalize(), Crc32::checksum(CHECK));

    let (a, b) = CHECK.split_at(4);
    assert_eq!(Crc32::combine(Crc32::checksum(a), Crc32::checksum(b), b.len()), 0xCBF4_3926);

    let mut resumed = Crc32::resume(Crc32::checksum(a));
    resumed.update(b);
    assert_eq!(resumed.finalize(), 0xCBF4_3926);

    resumed.reset();
    assert_eq!(resumed.finalize(), 0);
  }
}
