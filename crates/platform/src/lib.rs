//! CPU detection for crcfold kernel dispatch.
//!
//! This crate is the single source of truth for "which CRC kernels can run
//! here". Algorithm code queries [`caps()`] instead of doing ad-hoc detection.
//!
//! ```ignore
//! use platform::caps::x86;
//!
//! if platform::caps().has(x86::CLMUL_READY) {
//!     // SSE4.1 + PCLMULQDQ folding kernel
//! }
//! ```
//!
//! # Design
//!
//! 1. **One API**: [`caps()`] returns a [`Caps`] bitset.
//! 2. **Zero-cost when possible**: compile-time features are folded in via `cfg!`.
//! 3. **Cached otherwise**: runtime detection is cached in `OnceLock` (std) or atomics (no_std).
//! 4. **Overridable**: [`set_caps_override`] hides features to synthesize weaker CPUs for tests.
//!    It can never add a feature detection did not find.
//! 5. **Miri-safe**: under Miri, always reports no features.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
mod detect;

pub use caps::Caps;

/// Detected CPU capabilities, narrowed by the active override.
#[inline]
#[must_use]
pub fn caps() -> Caps {
  detect::caps()
}

/// Detect capabilities fresh, ignoring the cache and any override.
#[inline]
#[must_use]
pub fn detect_uncached() -> Caps {
  detect::detect_uncached()
}

/// Set or clear the capabilities override.
///
/// When set, [`caps()`] returns the override intersected with detected
/// features, so bits the CPU lacks are dropped. Kernels bound before the
/// call keep their binding.
///
/// ```ignore
/// platform::set_caps_override(Some(platform::Caps::NONE));
/// // ... exercise portable kernels ...
/// platform::set_caps_override(None);
/// ```
#[inline]
pub fn set_caps_override(value: Option<Caps>) {
  detect::set_caps_override(value);
}

/// Check if an override is currently set.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  detect::has_override()
}
