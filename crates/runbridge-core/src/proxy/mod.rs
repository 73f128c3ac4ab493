//! Weak forwarding: let an API retain a callback target without keeping the
//! real object alive.
//!
//! Dispatch is closed: a target lists what it services in a [`MethodTable`]
//! and exposes it through [`Responder`]. [`WeakProxy`] relays to that surface
//! only while the target lives.

pub mod responder;
pub mod signature;
pub mod table;
pub mod weak;

pub use responder::Responder;
pub use signature::{ArgKind, Signature};
pub use table::MethodTable;
pub use weak::{ProxyState, WeakProxy};
