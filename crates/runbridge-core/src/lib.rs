//! runbridge core: lifetime bridges between owned Rust objects and external,
//! callback-driven consumers.
//!
//! - [`delegate`]: run metrics exported to a layout engine through a fixed
//!   callback table and a refcon that owns one strong reference.
//! - [`proxy`]: a weak forwarding proxy that breaks retain cycles with APIs
//!   that hold their callback target strongly.
//!
//! The two halves share nothing but the error type.
//!
//! Panics, `unwrap`, and `expect` are compile-denied here; fallible paths
//! surface as `RunBridgeError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod delegate;
pub mod error;
pub mod proxy;

/// Shared result type.
pub use error::{ErrorCode, Result, RunBridgeError};
