//! Agora Common Library
//!
//! Shared foundation for the Agora governance protocol contracts: core
//! types, typed errors, protocol events, constants, and the phase clock
//! that derives proposal lifecycle state from elapsed time.
//!
//! ## Protocol Shape
//!
//! - **Explicit ledgers**: all state lives in ledger values passed by
//!   reference to each operation; there is no ambient singleton.
//! - **Derived phase**: a proposal's phase is a pure function of
//!   `(now, created_at, tallies, config)`, never a stored enum.
//! - **Injected clock**: every time-dependent operation takes `now` as a
//!   parameter, so tests drive the clock deterministically.
//! - **Self-amending config**: governance parameters are ledger state
//!   that an executed proposal may rewrite.
//!
//! This crate is `no_std` compatible when built without the default
//! `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export alloc types for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::{string::String, vec::Vec};
#[cfg(feature = "std")]
pub use std::{string::String, vec::Vec};

pub mod constants;
pub mod errors;
pub mod events;
pub mod phase;
pub mod types;

// Re-exports for convenience
pub use constants::*;
pub use errors::*;
pub use events::*;
pub use phase::*;
pub use types::*;
