//! Kernel dispatch: selection and caching.
//!
//! - [`Candidate`]: a kernel with capability requirements
//! - [`Selected`]: the result of kernel selection
//! - [`select`]: choose the best kernel from a candidate list
//! - Newtype dispatchers: [`Crc32Dispatcher`], [`Crc64Dispatcher`]
//!
//! A dispatcher runs its selector once, on first use, and every later call
//! is a single indirect call. Changing the platform override afterwards does
//! not rebind an already initialized dispatcher.

use platform::Caps;

// ─────────────────────────────────────────────────────────────────────────────
// Core Types
// ─────────────────────────────────────────────────────────────────────────────

/// A candidate kernel with capability requirements.
///
/// Candidates are ordered from best to worst. The dispatcher selects the
/// first candidate whose requirements are satisfied by the detected capabilities.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<F> {
  /// Human-readable name for diagnostics (e.g., "x86_64/clmul").
  pub name: &'static str,
  /// Required CPU capabilities. Must be a subset of detected caps.
  pub requires: Caps,
  /// The kernel function pointer.
  pub func: F,
}

impl<F> Candidate<F> {
  /// Create a new candidate.
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, requires: Caps, func: F) -> Self {
    Self { name, requires, func }
  }
}

/// The result of kernel selection.
#[derive(Clone, Copy, Debug)]
pub struct Selected<F> {
  /// Human-readable name of the selected kernel.
  pub name: &'static str,
  /// The selected kernel function.
  pub func: F,
}

impl<F> Selected<F> {
  /// Create a new selected result.
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, func: F) -> Self {
    Self { name, func }
  }
}

/// Select the best kernel from a candidate list.
///
/// Returns the first candidate whose `requires` is satisfied by `caps`, or
/// `None` when nothing matches. Lists that end in a `Caps::NONE` entry
/// always produce a kernel.
#[inline]
#[must_use]
pub fn select<F: Copy>(caps: Caps, candidates: &[Candidate<F>]) -> Option<Selected<F>> {
  candidates
    .iter()
    .find(|candidate| caps.has(candidate.requires))
    .map(|candidate| Selected::new(candidate.name, candidate.func))
}

/// Build a `&[Candidate<_>]` from `name => requires => func` rows.
#[macro_export]
macro_rules! candidates {
  ($($name:expr => $requires:expr => $func:expr),+ $(,)?) => {
    &[$($crate::dispatch::Candidate::new($name, $requires, $func)),+]
  };
}

// ─────────────────────────────────────────────────────────────────────────────
// Newtype Dispatchers
// ─────────────────────────────────────────────────────────────────────────────
//
// Each CRC width gets its own dispatcher type so a 32-bit kernel can never be
// bound where a 64-bit one is expected.

/// Signature for CRC-32/CRC-32C kernels: `fn(crc: u32, data: &[u8]) -> u32`
pub type Crc32Fn = fn(u32, &[u8]) -> u32;

/// Signature for CRC-64 kernels: `fn(crc: u64, data: &[u8]) -> u64`
pub type Crc64Fn = fn(u64, &[u8]) -> u64;

macro_rules! define_dispatcher {
  ($(#[$meta:meta])* $name:ident, $fn_ty:ty, $word:ty) => {
    $(#[$meta])*
    pub struct $name {
      #[cfg(feature = "std")]
      inner: std::sync::OnceLock<Selected<$fn_ty>>,

      #[cfg(not(feature = "std"))]
      func: core::sync::atomic::AtomicPtr<()>,
      #[cfg(not(feature = "std"))]
      name_ptr: core::sync::atomic::AtomicPtr<u8>,
      #[cfg(not(feature = "std"))]
      name_len: core::sync::atomic::AtomicUsize,

      selector: fn() -> Selected<$fn_ty>,
    }

    impl $name {
      /// Create a new dispatcher with the given selector function.
      ///
      /// The selector is called once on first access to choose the kernel.
      #[must_use]
      pub const fn new(selector: fn() -> Selected<$fn_ty>) -> Self {
        Self {
          #[cfg(feature = "std")]
          inner: std::sync::OnceLock::new(),

          #[cfg(not(feature = "std"))]
          func: core::sync::atomic::AtomicPtr::new(core::ptr::null_mut()),
          #[cfg(not(feature = "std"))]
          name_ptr: core::sync::atomic::AtomicPtr::new(core::ptr::null_mut()),
          #[cfg(not(feature = "std"))]
          name_len: core::sync::atomic::AtomicUsize::new(0),

          selector,
        }
      }

      /// Get the selected kernel, initializing on first call.
      #[inline]
      #[must_use]
      pub fn get(&self) -> Selected<$fn_ty> {
        #[cfg(feature = "std")]
        {
          *self.inner.get_or_init(|| (self.selector)())
        }

        #[cfg(not(feature = "std"))]
        {
          use core::sync::atomic::Ordering;

          let func_ptr = self.func.load(Ordering::Acquire);
          if func_ptr.is_null() {
            let selected = (self.selector)();

            // Name first: a non-null func publishes a complete entry.
            self.name_ptr.store(selected.name.as_ptr() as *mut u8, Ordering::Release);
            self.name_len.store(selected.name.len(), Ordering::Release);
            self.func.store(selected.func as *mut (), Ordering::Release);

            selected
          } else {
            // SAFETY: func_ptr was stored from a valid kernel of this exact signature.
            #[allow(unsafe_code)]
            let func: $fn_ty = unsafe { core::mem::transmute::<*mut (), $fn_ty>(func_ptr) };

            let name_ptr = self.name_ptr.load(Ordering::Acquire);
            let name_len = self.name_len.load(Ordering::Acquire);

            let name = if name_ptr.is_null() || name_len == 0 {
              "unknown"
            } else {
              // SAFETY: name_ptr and name_len were stored from a valid &'static str.
              #[allow(unsafe_code)]
              unsafe {
                core::str::from_utf8_unchecked(core::slice::from_raw_parts(name_ptr, name_len))
              }
            };
            Selected { name, func }
          }
        }
      }

      /// Get the name of the selected backend.
      #[inline]
      #[must_use]
      pub fn backend_name(&self) -> &'static str {
        self.get().name
      }

      /// Call the selected kernel.
      #[inline]
      #[must_use]
      pub fn call(&self, crc: $word, data: &[u8]) -> $word {
        (self.get().func)(crc, data)
      }
    }

    // SAFETY: initialization goes through OnceLock (std) or atomics (no_std);
    // the stored function pointer and name are immutable once published.
    #[allow(unsafe_code)]
    unsafe impl Sync for $name {}
    #[allow(unsafe_code)]
    unsafe impl Send for $name {}
  };
}

define_dispatcher!(
  /// Dispatcher for CRC-32 and CRC-32C kernels.
  ///
  /// ```ignore
  /// static DISPATCH: Crc32Dispatcher = Crc32Dispatcher::new(select_crc32);
  ///
  /// fn compute(crc: u32, data: &[u8]) -> u32 {
  ///     DISPATCH.call(crc, data)
  /// }
  /// ```
  Crc32Dispatcher,
  Crc32Fn,
  u32
);

define_dispatcher!(
  /// Dispatcher for CRC-64 kernels.
  Crc64Dispatcher,
  Crc64Fn,
  u64
);

#[cfg(test)]
mod tests {
  use super::*;

  fn portable_crc32(_crc: u32, _data: &[u8]) -> u32 {
    0xDEADBEEF
  }

  fn fast_crc32(_crc: u32, _data: &[u8]) -> u32 {
    0xCAFEBABE
  }

  fn portable_crc64(crc: u64, data: &[u8]) -> u64 {
    crc ^ data.len() as u64
  }

  #[test]
  fn test_candidate_creation() {
    let c: Candidate<Crc32Fn> = Candidate::new("test", Caps::NONE, portable_crc32);
    assert_eq!(c.name, "test");
    assert_eq!(c.requires, Caps::NONE);
  }

  #[test]
  fn test_select_portable_fallback() {
    let candidates: &[Candidate<Crc32Fn>] = crate::candidates![
      "fast" => Caps::bit(0) => fast_crc32,
      "portable" => Caps::NONE => portable_crc32,
    ];

    let selected = select(Caps::NONE, candidates).unwrap();
    assert_eq!(selected.name, "portable");
    assert_eq!((selected.func)(0, &[]), 0xDEADBEEF);
  }

  #[test]
  fn test_select_best_match() {
    let candidates: &[Candidate<Crc32Fn>] = &[
      Candidate::new("fast", Caps::bit(0), fast_crc32),
      Candidate::new("portable", Caps::NONE, portable_crc32),
    ];

    let selected = select(Caps::bit(0), candidates).unwrap();
    assert_eq!(selected.name, "fast");
    assert_eq!((selected.func)(0, &[]), 0xCAFEBABE);
  }

  #[test]
  fn test_select_skips_unavailable() {
    let caps = Caps::bit(0);
    let candidates: &[Candidate<Crc32Fn>] = &[
      Candidate::new("needs_bit1", Caps::bit(1), fast_crc32),
      Candidate::new("needs_bit0", Caps::bit(0), fast_crc32),
      Candidate::new("portable", Caps::NONE, portable_crc32),
    ];

    assert_eq!(select(caps, candidates).unwrap().name, "needs_bit0");
  }

  #[test]
  fn test_select_without_fallback_is_none() {
    let candidates: &[Candidate<Crc32Fn>] = &[Candidate::new("needs_bit1", Caps::bit(1), fast_crc32)];
    assert!(select(Caps::bit(0), candidates).is_none());
    assert!(select::<Crc32Fn>(Caps::NONE, &[]).is_none());
  }

  fn test_selector() -> Selected<Crc32Fn> {
    Selected::new("test", portable_crc32)
  }

  #[test]
  fn test_crc32_dispatcher() {
    static DISPATCH: Crc32Dispatcher = Crc32Dispatcher::new(test_selector);

    assert_eq!(DISPATCH.get().name, "test");
    assert_eq!(DISPATCH.get().name, "test");
    assert_eq!(DISPATCH.call(0, &[]), 0xDEADBEEF);
  }

  #[test]
  fn test_crc64_dispatcher() {
    static DISPATCH: Crc64Dispatcher = Crc64Dispatcher::new(|| Selected::new("portable/test", portable_crc64 as Crc64Fn));

    assert_eq!(DISPATCH.backend_name(), "portable/test");
    assert_eq!(DISPATCH.call(1, &[0u8; 4]), 5);
  }
}
