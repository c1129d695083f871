//! Runtime CPU detection.
//!
//! Handles:
//!
//! - Compile-time detection (via `cfg!(target_feature = "...")`)
//! - Runtime detection (`is_x86_feature_detected!` / `is_aarch64_feature_detected!`, std only)
//! - Caching (via `OnceLock` with `std`, atomics without)
//! - User-supplied overrides that hide features for testing
//! - Miri fallback (always returns portable caps)

use core::sync::atomic::{AtomicBool, Ordering};

use crate::caps::Caps;

// ─────────────────────────────────────────────────────────────────────────────
// Override Support
// ─────────────────────────────────────────────────────────────────────────────
//
// The override narrows detection and may be changed at any time. It is
// always intersected with what the CPU reports. Dispatchers that already
// bound a kernel keep it.

static OVERRIDE_SET: AtomicBool = AtomicBool::new(false);

#[cfg(feature = "std")]
static OVERRIDE: std::sync::RwLock<Option<Caps>> = std::sync::RwLock::new(None);

#[cfg(all(not(feature = "std"), target_has_atomic = "64"))]
static OVERRIDE_BITS: core::sync::atomic::AtomicU64 = core::sync::atomic::AtomicU64::new(0);

/// Set or clear the capabilities override.
pub fn set_caps_override(value: Option<Caps>) {
  #[cfg(feature = "std")]
  {
    match OVERRIDE.write() {
      Ok(mut guard) => *guard = value,
      Err(poisoned) => *poisoned.into_inner() = value,
    }
  }

  #[cfg(all(not(feature = "std"), target_has_atomic = "64"))]
  {
    if let Some(caps) = value {
      OVERRIDE_BITS.store(caps.0, Ordering::Release);
    }
  }

  OVERRIDE_SET.store(value.is_some(), Ordering::Release);
}

/// Check if an override is currently set.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  OVERRIDE_SET.load(Ordering::Acquire)
}

fn get_override() -> Option<Caps> {
  if !OVERRIDE_SET.load(Ordering::Acquire) {
    return None;
  }

  #[cfg(feature = "std")]
  {
    match OVERRIDE.read() {
      Ok(guard) => *guard,
      Err(poisoned) => *poisoned.into_inner(),
    }
  }

  #[cfg(all(not(feature = "std"), target_has_atomic = "64"))]
  {
    Some(Caps(OVERRIDE_BITS.load(Ordering::Acquire)))
  }

  #[cfg(all(not(feature = "std"), not(target_has_atomic = "64")))]
  {
    None
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main API
// ─────────────────────────────────────────────────────────────────────────────

/// Detected CPU capabilities, cached after the first call.
///
/// An active override is intersected with detection, so it can hide
/// features but never report one the CPU lacks.
#[inline]
#[must_use]
pub fn caps() -> Caps {
  // Miri cannot interpret SIMD intrinsics, so always return portable.
  #[cfg(miri)]
  {
    Caps::NONE
  }

  #[cfg(not(miri))]
  {
    let detected = detected();
    match get_override() {
      Some(ov) => ov.intersection(detected),
      None => detected,
    }
  }
}

#[cfg(not(miri))]
#[inline]
fn detected() -> Caps {
  #[cfg(feature = "std")]
  {
    static CACHED: std::sync::OnceLock<Caps> = std::sync::OnceLock::new();
    *CACHED.get_or_init(detect_uncached)
  }

  #[cfg(all(not(feature = "std"), target_has_atomic = "64"))]
  {
    cache::get_or_init(detect_uncached)
  }

  #[cfg(all(not(feature = "std"), not(target_has_atomic = "64")))]
  {
    detect_uncached()
  }
}

/// Detect capabilities without caching or overrides.
#[inline]
#[must_use]
pub fn detect_uncached() -> Caps {
  compile_time().union(runtime())
}

#[cfg(all(not(feature = "std"), target_has_atomic = "64", not(miri)))]
mod cache {
  use core::sync::atomic::{AtomicU8, AtomicU64, Ordering};

  use crate::caps::Caps;

  /// 0 = uninitialized, 1 = initializing, 2 = initialized
  static STATE: AtomicU8 = AtomicU8::new(0);
  static BITS: AtomicU64 = AtomicU64::new(0);

  #[inline]
  pub fn get_or_init(f: fn() -> Caps) -> Caps {
    if STATE.load(Ordering::Acquire) == 2 {
      return Caps(BITS.load(Ordering::Acquire));
    }

    match STATE.compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire) {
      Ok(_) => {
        let caps = f();
        BITS.store(caps.0, Ordering::Release);
        STATE.store(2, Ordering::Release);
        caps
      }
      Err(_) => {
        while STATE.load(Ordering::Acquire) == 1 {
          core::hint::spin_loop();
        }
        Caps(BITS.load(Ordering::Acquire))
      }
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Compile-time detection
// ─────────────────────────────────────────────────────────────────────────────

#[allow(unused_mut)]
const fn compile_time() -> Caps {
  let mut caps = Caps::NONE;

  #[cfg(target_arch = "x86_64")]
  {
    use crate::caps::x86;

    caps = caps.union(x86::SSE2);
    #[cfg(target_feature = "ssse3")]
    {
      caps = caps.union(x86::SSSE3);
    }
    #[cfg(target_feature = "sse4.1")]
    {
      caps = caps.union(x86::SSE41);
    }
    #[cfg(target_feature = "sse4.2")]
    {
      caps = caps.union(x86::SSE42);
    }
    #[cfg(target_feature = "pclmulqdq")]
    {
      caps = caps.union(x86::PCLMULQDQ);
    }
  }

  #[cfg(target_arch = "aarch64")]
  {
    use crate::caps::aarch64;

    caps = caps.union(aarch64::NEON);
    #[cfg(target_feature = "aes")]
    {
      caps = caps.union(aarch64::AES).union(aarch64::PMULL);
    }
    #[cfg(target_feature = "crc")]
    {
      caps = caps.union(aarch64::CRC);
    }
  }

  caps
}

// ─────────────────────────────────────────────────────────────────────────────
// Runtime detection
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(all(feature = "std", target_arch = "x86_64"))]
fn runtime() -> Caps {
  use crate::caps::x86;

  let mut caps = Caps::NONE;
  if std::arch::is_x86_feature_detected!("ssse3") {
    caps |= x86::SSSE3;
  }
  if std::arch::is_x86_feature_detected!("sse4.1") {
    caps |= x86::SSE41;
  }
  if std::arch::is_x86_feature_detected!("sse4.2") {
    caps |= x86::SSE42;
  }
  if std::arch::is_x86_feature_detected!("pclmulqdq") {
    caps |= x86::PCLMULQDQ;
  }
  caps
}

#[cfg(all(feature = "std", target_arch = "aarch64"))]
fn runtime() -> Caps {
  use crate::caps::aarch64;

  let mut caps = Caps::NONE;
  if std::arch::is_aarch64_feature_detected!("aes") {
    caps |= aarch64::AES;
  }
  if std::arch::is_aarch64_feature_detected!("pmull") {
    caps |= aarch64::PMULL;
  }
  if std::arch::is_aarch64_feature_detected!("crc") {
    caps |= aarch64::CRC;
  }
  caps
}

#[cfg(not(all(feature = "std", any(target_arch = "x86_64", target_arch = "aarch64"))))]
fn runtime() -> Caps {
  Caps::NONE
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn detection_includes_compile_time_features() {
    let detected = detect_uncached();
    assert!(detected.has(compile_time()));
  }

  #[test]
  #[cfg(target_arch = "x86_64")]
  fn x86_64_always_has_sse2() {
    assert!(detect_uncached().has(crate::caps::x86::SSE2));
  }

  #[test]
  #[cfg(target_arch = "aarch64")]
  fn aarch64_always_has_neon() {
    assert!(detect_uncached().has(crate::caps::aarch64::NEON));
  }

  #[test]
  #[cfg(all(feature = "std", not(miri)))]
  fn override_cannot_add_features() {
    let detected = detect_uncached();
    let phantom = Caps::bit(63);
    assert!(!detected.has(phantom));

    set_caps_override(Some(detected | phantom));
    let seen = caps();
    set_caps_override(None);

    assert!(!seen.has(phantom));
    assert_eq!(seen, detected);
  }

  #[test]
  #[cfg(all(feature = "std", not(miri)))]
  fn override_can_remove_features() {
    set_caps_override(Some(Caps::NONE));
    let seen = caps();
    set_caps_override(None);
    assert_eq!(seen, Caps::NONE);
  }

  #[test]
  fn cached_caps_are_stable() {
    if has_override() {
      return;
    }
    assert_eq!(caps(), caps());
  }
}
