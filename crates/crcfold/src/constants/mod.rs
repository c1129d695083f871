//! Polynomials, lookup tables and folding constants.
//!
//! Every literal constant in this module is recomputed at compile time from
//! its `const fn` derivation in [`crate::gf2`]; a wrong literal fails the
//! build.
//!
//! | Module | Polynomial (reflected) | Width |
//! |--------|------------------------|-------|
//! | [`crc32`] | `0xEDB88320` | 32 |
//! | [`crc64`] | `0xC96C5795D7870F42` | 64 |
//! | [`crc32c`] | `0x82F63B78` | 32 |
//!
//! Lookup tables are 64-byte (cache line) aligned using [`Aligned64`].

pub mod crc32;
pub mod crc32c;
pub mod crc64;

/// Wrapper type to force 64-byte (cache line) alignment.
#[derive(Debug)]
#[repr(align(64))]
pub struct Aligned64<T>(pub T);
