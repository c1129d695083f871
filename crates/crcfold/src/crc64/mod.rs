//! CRC-64/XZ: kernels, registry and dispatch.
//!
//! | Kernel | Name | Requires |
//! |--------|------|----------|
//! | `Clmul` | `x86_64/clmul`, `aarch64/pmull` | PCLMULQDQ+SSSE3+SSE4.1, NEON+AES+PMULL |
//! | `ClsimHw` | `x86_64/clsim-pclmul`, `aarch64/clsim-pmull` | PCLMULQDQ, NEON+AES+PMULL |
//! | `Slice4` | `portable/slice4` | none |
//! | `Sarwate` | `portable/sarwate` | none |
//! | `Clsim` | `portable/clsim` | none |
//! | `Bitwise` | `portable/bitwise` | none |
//!
//! No CPU has a CRC-64 instruction; `Hw` and `HwParallel4` are unsupported.

pub(crate) mod clsim;
pub(crate) mod portable;

use backend::dispatch::{Candidate, Crc64Dispatcher, Crc64Fn, Selected};
use platform::Caps;
#[cfg(target_arch = "aarch64")]
use platform::caps::aarch64;
#[cfg(target_arch = "x86_64")]
use platform::caps::x86;

use self::{
  clsim::crc64_clsim,
  portable::{crc64_bitwise, crc64_sarwate, crc64_slice4},
};
use crate::{
  config,
  constants::crc64::POLY,
  diag::SelectionDiag,
  error::KernelError,
  kernel::{Kernel, Width},
  registry::{Entry, Registry, entry64},
};

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "x86_64")]
const ACCELERATED: &[Candidate<Entry<Crc64Fn>>] = backend::candidates![
  "x86_64/clmul" => x86::CLMUL_READY => entry64(Kernel::Clmul, crate::simd::x86_64::crc64_clmul),
  "x86_64/clsim-pclmul" => x86::PCLMULQDQ => entry64(Kernel::ClsimHw, clsim::crc64_clsim_pclmul),
];

#[cfg(target_arch = "aarch64")]
const ACCELERATED: &[Candidate<Entry<Crc64Fn>>] = backend::candidates![
  "aarch64/pmull" => aarch64::PMULL_READY => entry64(Kernel::Clmul, crate::simd::aarch64::crc64_pmull),
  "aarch64/clsim-pmull" => aarch64::PMULL_READY => entry64(Kernel::ClsimHw, clsim::crc64_clsim_pmull),
];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
const ACCELERATED: &[Candidate<Entry<Crc64Fn>>] = &[];

const PORTABLE: &[Candidate<Entry<Crc64Fn>>] = backend::candidates![
  "portable/slice4" => Caps::NONE => entry64(Kernel::Slice4, crc64_slice4),
  "portable/sarwate" => Caps::NONE => entry64(Kernel::Sarwate, crc64_sarwate),
  "portable/clsim" => Caps::NONE => entry64(Kernel::Clsim, crc64_clsim),
  "portable/bitwise" => Caps::NONE => entry64(Kernel::Bitwise, crc64_bitwise),
];

pub(crate) static REGISTRY: Registry<Crc64Fn> = Registry {
  width: Width::Crc64,
  accelerated: ACCELERATED,
  portable: PORTABLE,
  fallback: Selected::new("portable/slice4", entry64(Kernel::Slice4, crc64_slice4)),
};

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch
// ─────────────────────────────────────────────────────────────────────────────

fn select_crc64() -> Selected<Crc64Fn> {
  let plan = REGISTRY.plan(config::force(Width::Crc64), platform::caps());
  crate::log_debug!("crc64: bound {} ({:?})", plan.selected.name, plan.reason);
  plan.into_selected()
}

static DISPATCHER: Crc64Dispatcher = Crc64Dispatcher::new(select_crc64);

/// Dispatched CRC-64 over a finalized running value.
#[inline]
pub(crate) fn compute(crc: u64, data: &[u8]) -> u64 {
  DISPATCHER.call(crc, data)
}

/// Run a specific kernel.
pub(crate) fn compute_with(kernel: Kernel, crc: u64, data: &[u8]) -> Result<u64, KernelError> {
  let selected = REGISTRY.resolve(kernel, platform::caps())?;
  Ok((selected.func.1)(crc, data))
}

pub(crate) fn backend_name() -> &'static str {
  DISPATCHER.backend_name()
}

pub(crate) fn diag(caps: Caps) -> SelectionDiag {
  let requested = config::force(Width::Crc64);
  let plan = REGISTRY.plan(requested, caps);
  SelectionDiag {
    width: Width::Crc64,
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
  /// CRC-64/XZ checksum.
  ///
  /// Used by XZ Utils and 7-Zip.
  ///
  /// # Properties
  ///
  /// - **Polynomial**: 0x42F0E1EBA9EA3693 (normal), 0xC96C5795D7870F42 (reflected)
  /// - **Initial value / final XOR**: 0xFFFFFFFFFFFFFFFF
  /// - **Check** (`"123456789"`): 0x995DC9BBDF1939FA
  ///
  /// ```
  /// use crcfold::{Checksum, Crc64};
  ///
  /// assert_eq!(Crc64::checksum(b"123456789"), 0x995D_C9BB_DF19_39FA);
  /// ```
  pub struct Crc64 {
    word: u64,
    poly: POLY,
    compute: compute,
    backend: backend_name,
    multmodp: crate::gf2::multmodp64,
    x8n: crate::gf2::x8n_64,
  }
}

#[cfg(test)]
mod tests {
  use traits::{Checksum, ChecksumCombine};

  use super::*;

  const CHECK: &[u8] = b"123456789";

  #[test]
  fn every_available_kernel_hits_check_value() {
    for selected in REGISTRY.available(platform::caps()) {
      assert_eq!((selected.func.1)(0, CHECK), 0x995D_C9BB_DF19_39FA, "{}", selected.name);
    }
  }

  #[test]
  fn hardware_crc_is_unsupported() {
    for kernel in [Kernel::Hw, Kernel::HwParallel4] {
      assert!(matches!(
        REGISTRY.resolve(kernel, platform::caps()),
        Err(KernelError::Unsupported { width: Width::Crc64, .. })
      ));
    }
  }

  #[test]
  fn portable_caps_select_slice4() {
    assert_eq!(REGISTRY.auto(Caps::NONE).name, "portable/slice4");
  }

  #[test]
  fn streaming_and_combine() {
    let data: [u8; 256] = core::array::from_fn(|i| i as u8);
    let whole = Crc64::checksum(&data);
    assert_eq!(whole, 0x7241_4B2F_65DB_3AB0);

    let mut hasher = Crc64::new();
    for chunk in data.chunks(37) {
      hasher.update(chunk);
    }
    assert_eq!(hasher.finalize(), whole);

    let (a, b) = data.split_at(100);
    assert_eq!(Crc64::combine(Crc64::checksum(a), Crc64::checksum(b), b.len()), whole);
    assert_eq!(Crc64::combine(whole, 0, 0), whole);
  }
}
