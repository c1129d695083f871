//! Core checksum traits for crcfold.
//!
//! This crate is `no_std` compatible and has zero dependencies.
//!
//! | Trait | Purpose | Examples |
//! |-------|---------|----------|
//! | [`Checksum`] | Streaming checksums | CRC-32, CRC-64/XZ, CRC-32C |
//! | [`ChecksumCombine`] | Parallel checksum combination | CRC with O(log n) combine |
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

mod checksum;

pub use checksum::{Checksum, ChecksumCombine};
