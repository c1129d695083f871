//! CRC-32C (Castagnoli): kernels, registry and dispatch.
//!
//! A separate instance of the hardware CRC skeleton with its own derived
//! recombination constants.
//!
//! | Kernel | Name | Requires |
//! |--------|------|----------|
//! | `HwParallel4` | `x86_64/sse4.2-4way`, `aarch64/crc-4way` | SSE4.2, CRC |
//! | `Hw` | `x86_64/sse4.2`, `aarch64/crc` | SSE4.2, CRC |
//! | `Sarwate` | `portable/sarwate` | none |
//! | `Bitwise` | `portable/bitwise` | none |

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
mod hw;
pub(crate) mod portable;

use backend::dispatch::{Candidate, Crc32Dispatcher, Crc32Fn, Selected};
use platform::Caps;
#[cfg(target_arch = "aarch64")]
use platform::caps::aarch64;
#[cfg(target_arch = "x86_64")]
use platform::caps::x86;

use self::portable::{crc32c_bitwise, crc32c_sarwate};
use crate::{
  config,
  constants::crc32c::POLY,
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
  "x86_64/sse4.2-4way" => x86::CRC32C_READY => entry32(Kernel::HwParallel4, hw::crc32c_hw_parallel4),
  "x86_64/sse4.2" => x86::CRC32C_READY => entry32(Kernel::Hw, hw::crc32c_hw),
];

#[cfg(target_arch = "aarch64")]
const ACCELERATED: &[Candidate<Entry<Crc32Fn>>] = backend::candidates![
  "aarch64/crc-4way" => aarch64::CRC_READY => entry32(Kernel::HwParallel4, hw::crc32c_hw_parallel4),
  "aarch64/crc" => aarch64::CRC_READY => entry32(Kernel::Hw, hw::crc32c_hw),
];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
const ACCELERATED: &[Candidate<Entry<Crc32Fn>>] = &[];

const PORTABLE: &[Candidate<Entry<Crc32Fn>>] = backend::candidates![
  "portable/sarwate" => Caps::NONE => entry32(Kernel::Sarwate, crc32c_sarwate),
  "portable/bitwise" => Caps::NONE => entry32(Kernel::Bitwise, crc32c_bitwise),
];

pub(crate) static REGISTRY: Registry<Crc32Fn> = Registry {
  width: Width::Crc32c,
  accelerated: ACCELERATED,
  portable: PORTABLE,
  fallback: Selected::new("portable/sarwate", entry32(Kernel::Sarwate, crc32c_sarwate)),
};

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch
// ─────────────────────────────────────────────────────────────────────────────

fn select_crc32c() -> Selected<Crc32Fn> {
  let plan = REGISTRY.plan(config::force(Width::Crc32c), platform::caps());
  crate::log_debug!("crc32c: bound {} ({:?})", plan.selected.name, plan.reason);
  plan.into_selected()
}

static DISPATCHER: Crc32Dispatcher = Crc32Dispatcher::new(select_crc32c);

/// Dispatched CRC-32C over a finalized running value.
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
  let requested = config::force(Width::Crc32c);
  let plan = REGISTRY.plan(requested, caps);
  SelectionDiag {
    width: Width::Crc32c,
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
  /// CRC-32C checksum (Castagnoli).
  ///
  /// Used by iSCSI and ext4; SSE4.2 and ARMv8 compute it natively.
  ///
  /// # Properties
  ///
  /// - **Polynomial**: 0x1EDC6F41 (normal), 0x82F63B78 (reflected)
  /// - **Initial value / final XOR**: 0xFFFFFFFF
  /// - **Check** (`"123456789"`): 0xE3069283
  ///
  /// ```
  /// use crcfold::{Checksum, Crc32c};
  ///
  /// assert_eq!(Crc32c::checksum(b"123456789"), 0xE306_9283);
  /// ```
  pub struct Crc32c {
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
  fn every_available_kernel_hits_check_value() {
    for selected in REGISTRY.available(platform::caps()) {
      assert_eq!((selected.func.1)(0, CHECK), 0xE306_9283, "{}", selected.name);
    }
  }

  #[test]
  fn folding_kernels_are_unsupported() {
    for kernel in [Kernel::Slice4, Kernel::Clsim, Kernel::ClsimHw, Kernel::Clmul] {
      assert!(matches!(
        REGISTRY.resolve(kernel, platform::caps()),
        Err(KernelError::Unsupported { width: Width::Crc32c, .. })
      ));
    }
  }

  #[test]
  fn portable_caps_select_sarwate() {
    assert_eq!(REGISTRY.auto(Caps::NONE).name, "portable/sarwate");
  }

  #[test]
  fn combine_matches_one_shot() {
    let (a, b) = CHECK.split_at(3);
    assert_eq!(Crc32c::combine(Crc32c::checksum(a), Crc32c::checksum(b), b.len()), 0xE306_9283);
  }
}
