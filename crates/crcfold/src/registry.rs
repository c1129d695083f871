//! Per-polynomial kernel registries.
//!
//! Each width lists its kernels as two ordered candidate tables, tagged with
//! the [`Kernel`] they implement:
//!
//! - `accelerated`: CPU-specific kernels for this target, best first
//! - `portable`: kernels every target can run, best first, ending in a
//!   `Caps::NONE` entry
//!
//! Auto selection takes the first satisfied accelerated entry, then the first
//! portable one. Forced selection looks a kernel up by tag and reports why it
//! cannot run.

use backend::dispatch::{Candidate, Crc32Fn, Crc64Fn, Selected, select};
use platform::Caps;

use crate::{
  config::Force,
  diag::SelectionReason,
  error::KernelError,
  kernel::{Kernel, Width},
};

/// A kernel function tagged with the family it implements.
pub(crate) type Entry<F> = (Kernel, F);

/// Tag a 32-bit kernel function.
#[inline]
pub(crate) const fn entry32(kernel: Kernel, func: Crc32Fn) -> Entry<Crc32Fn> {
  (kernel, func)
}

/// Tag a 64-bit kernel function.
#[inline]
pub(crate) const fn entry64(kernel: Kernel, func: Crc64Fn) -> Entry<Crc64Fn> {
  (kernel, func)
}

pub(crate) struct Registry<F: 'static> {
  pub width: Width,
  pub accelerated: &'static [Candidate<Entry<F>>],
  pub portable: &'static [Candidate<Entry<F>>],
  /// Used when no portable entry matches (never, with a `Caps::NONE` tail).
  pub fallback: Selected<Entry<F>>,
}

/// A selection together with how it was reached.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Plan<F> {
  pub selected: Selected<Entry<F>>,
  pub reason: SelectionReason,
}

impl<F> Plan<F> {
  #[inline]
  pub fn kernel(&self) -> Kernel {
    self.selected.func.0
  }

  /// Drop the tag for the dispatcher.
  #[inline]
  pub fn into_selected(self) -> Selected<F> {
    Selected::new(self.selected.name, self.selected.func.1)
  }
}

impl<F: Copy> Registry<F> {
  fn all(&self) -> impl Iterator<Item = &Candidate<Entry<F>>> {
    self.accelerated.iter().chain(self.portable)
  }

  /// Best kernel for `caps`.
  #[must_use]
  pub fn auto(&self, caps: Caps) -> Selected<Entry<F>> {
    select(caps, self.accelerated)
      .or_else(|| select(caps, self.portable))
      .unwrap_or(self.fallback)
  }

  /// Look up `kernel` for `caps`.
  ///
  /// # Errors
  ///
  /// [`KernelError::Unsupported`] when this width has no such kernel on the
  /// target, [`KernelError::Unavailable`] when `caps` lacks its features.
  pub fn resolve(&self, kernel: Kernel, caps: Caps) -> Result<Selected<Entry<F>>, KernelError> {
    let mut missing = None;
    for candidate in self.all().filter(|c| c.func.0 == kernel) {
      if caps.has(candidate.requires) {
        return Ok(Selected::new(candidate.name, candidate.func));
      }
      missing.get_or_insert(candidate.requires.missing_from(caps));
    }

    Err(match missing {
      Some(missing) => KernelError::Unavailable {
        kernel,
        width: self.width,
        missing,
      },
      None => KernelError::Unsupported {
        kernel,
        width: self.width,
      },
    })
  }

  /// Apply `force` to `caps`, clamping unavailable requests back to auto.
  #[must_use]
  pub fn plan(&self, force: Force, caps: Caps) -> Plan<F> {
    match force {
      Force::Auto => Plan {
        selected: self.auto(caps),
        reason: SelectionReason::Auto,
      },
      Force::Kernel(kernel) => match self.resolve(kernel, caps) {
        Ok(selected) => Plan {
          selected,
          reason: SelectionReason::Forced,
        },
        Err(_) => Plan {
          selected: self.auto(caps),
          reason: SelectionReason::ForceUnavailable,
        },
      },
    }
  }

  /// Every kernel that runs under `caps`, in table order.
  pub fn available(&self, caps: Caps) -> impl Iterator<Item = Selected<Entry<F>>> + '_ {
    self
      .all()
      .filter(move |c| caps.has(c.requires))
      .map(|c| Selected::new(c.name, c.func))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn slow(crc: u32, _: &[u8]) -> u32 {
    crc
  }

  fn fast(crc: u32, _: &[u8]) -> u32 {
    !crc
  }

  const FAST: Caps = Caps::bit(4);

  static REGISTRY: Registry<Crc32Fn> = Registry {
    width: Width::Crc32,
    accelerated: backend::candidates![
      "test/fast" => FAST => entry32(Kernel::Clmul, fast),
    ],
    portable: backend::candidates![
      "test/slow" => Caps::NONE => entry32(Kernel::Sarwate, slow),
    ],
    fallback: Selected::new("test/slow", entry32(Kernel::Sarwate, slow)),
  };

  #[test]
  fn auto_prefers_accelerated() {
    assert_eq!(REGISTRY.auto(FAST).name, "test/fast");
    assert_eq!(REGISTRY.auto(Caps::NONE).name, "test/slow");
  }

  #[test]
  fn resolve_reports_missing_features() {
    assert_eq!(
      REGISTRY.resolve(Kernel::Clmul, Caps::NONE).unwrap_err(),
      KernelError::Unavailable {
        kernel: Kernel::Clmul,
        width: Width::Crc32,
        missing: FAST,
      }
    );
    assert_eq!(
      REGISTRY.resolve(Kernel::Hw, FAST).unwrap_err(),
      KernelError::Unsupported {
        kernel: Kernel::Hw,
        width: Width::Crc32,
      }
    );
    assert_eq!(REGISTRY.resolve(Kernel::Sarwate, Caps::NONE).unwrap().name, "test/slow");
  }

  #[test]
  fn plan_clamps_unavailable_force() {
    let plan = REGISTRY.plan(Force::Kernel(Kernel::Clmul), Caps::NONE);
    assert_eq!(plan.reason, SelectionReason::ForceUnavailable);
    assert_eq!(plan.kernel(), Kernel::Sarwate);

    let plan = REGISTRY.plan(Force::Kernel(Kernel::Sarwate), FAST);
    assert_eq!(plan.reason, SelectionReason::Forced);
    assert_eq!(plan.into_selected().name, "test/slow");
  }

  #[test]
  fn available_filters_by_caps() {
    assert_eq!(REGISTRY.available(Caps::NONE).count(), 1);
    assert_eq!(REGISTRY.available(FAST).count(), 2);
  }
}
