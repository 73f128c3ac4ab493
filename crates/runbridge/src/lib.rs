//! Top-level facade crate for runbridge.
//!
//! Re-exports the core bridge types and the reference host so users can depend on a single crate.

pub mod core {
    pub use runbridge_core::*;
}

pub mod host {
    pub use runbridge_host::*;
}
