//! runbridge reference host.
//!
//! Plays the external side of both bridges: a typesetter that consumes run
//! delegate handles and a repeating timer that retains its target. Used by the
//! demo binary (`main.rs`) and by integration tests.

pub mod config;
pub mod timer;
pub mod typeset;
