//! Kernel selection and cached dispatch for crcfold.
//!
//! - **Selection**: pick the first [`dispatch::Candidate`] whose capability requirements are met
//! - **Caching**: [`dispatch::Crc32Dispatcher`] / [`dispatch::Crc64Dispatcher`] bind once
//! - **Capabilities**: re-exported from `platform`
//!
//! # Usage
//!
//! Algorithm crates register kernels as an ordered list of `Candidate`s.
//! Use the [`candidates!`] macro for concise syntax:
//!
//! ```ignore
//! use backend::dispatch::{select, Selected};
//! use platform::caps::{x86, Caps};
//!
//! fn select_crc64() -> Selected<fn(u64, &[u8]) -> u64> {
//!     select(platform::caps(), backend::candidates![
//!         "x86_64/clmul" => x86::CLMUL_READY => clmul_kernel,
//!         "portable/slice4" => Caps::NONE => slice4_kernel,
//!     ])
//!     .unwrap_or(Selected::new("portable/slice4", slice4_kernel))
//! }
//! ```
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod dispatch;

pub use dispatch::{Candidate, Crc32Dispatcher, Crc32Fn, Crc64Dispatcher, Crc64Fn, Selected, select};
pub use platform;
