//! Shared building blocks for every kernel.
//!
//! - GF(2) arithmetic for constants, recombination and `combine()`
//! - Bitwise reference oracles
//! - Const-fn lookup tables and the table-driven kernels
//! - Block split with bounce buffers
//! - The hardware CRC instruction skeleton

pub(crate) mod blocks;
pub(crate) mod clmul;
pub mod gf2;
pub(crate) mod hwcrc;
pub(crate) mod portable;
pub mod reference;
pub(crate) mod tables;
