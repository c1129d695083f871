//! Internal macros: streaming checksum types and optional logging.

/// Generate a streaming checksum type over a dispatched kernel.
///
/// The state is the finalized running CRC, so `resume(crc)` continues a
/// checksum from any earlier `finalize()`.
///
/// - `word`: `u32` or `u64`
/// - `compute`: dispatched `fn(crc, data) -> crc`
/// - `backend`: name of the bound kernel
/// - `multmodp` / `x8n`: GF(2) helpers for this width, `poly` their modulus
macro_rules! define_crc_type {
  (
    $(#[$outer:meta])*
    $vis:vis struct $name:ident {
      word: $word:ty,
      poly: $poly:expr,
      compute: $compute:path,
      backend: $backend:path,
      multmodp: $multmodp:path,
      x8n: $x8n:path,
    }
  ) => {
    $(#[$outer])*
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    $vis struct $name {
      state: $word,
    }

    impl $name {
      /// Continue from a previously finalized CRC.
      #[inline]
      #[must_use]
      pub const fn resume(crc: $word) -> Self {
        Self { state: crc }
      }

      /// Name of the kernel bound for this polynomial.
      #[must_use]
      pub fn backend_name() -> &'static str {
        $backend()
      }
    }

    impl $crate::Checksum for $name {
      const OUTPUT_SIZE: usize = core::mem::size_of::<$word>();
      type Output = $word;

      #[inline]
      fn new() -> Self {
        Self { state: 0 }
      }

      #[inline]
      fn with_initial(initial: $word) -> Self {
        Self { state: initial }
      }

      #[inline]
      fn update(&mut self, data: &[u8]) {
        self.state = $compute(self.state, data);
      }

      #[inline]
      fn finalize(&self) -> $word {
        self.state
      }

      #[inline]
      fn reset(&mut self) {
        self.state = 0;
      }
    }

    impl $crate::ChecksumCombine for $name {
      fn combine(crc_a: $word, crc_b: $word, len_b: usize) -> $word {
        $multmodp($poly, $x8n($poly, len_b as u64), crc_a) ^ crc_b
      }
    }
  };
}

pub(crate) use define_crc_type;

// ─────────────────────────────────────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────────────────────────────────────
//
// With the `log` feature these forward to the `log` crate under the
// `crcfold` target. Without it they type-check their arguments and emit
// nothing.

#[cfg(feature = "log")]
macro_rules! log_debug {
  ($($arg:tt)+) => { ::log::debug!(target: "crcfold", $($arg)+) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
  ($($arg:tt)+) => {
    if false {
      let _ = format_args!($($arg)+);
    }
  };
}

#[cfg(feature = "log")]
macro_rules! log_warn {
  ($($arg:tt)+) => { ::log::warn!(target: "crcfold", $($arg)+) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
  ($($arg:tt)+) => {
    if false {
      let _ = format_args!($($arg)+);
    }
  };
}

#[cfg(feature = "log")]
macro_rules! log_error {
  ($($arg:tt)+) => { ::log::error!(target: "crcfold", $($arg)+) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_error {
  ($($arg:tt)+) => {
    if false {
      let _ = format_args!($($arg)+);
    }
  };
}

pub(crate) use {log_debug, log_error, log_warn};
