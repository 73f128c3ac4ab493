//! Minimal typesetter standing in for an external layout engine.
//!
//! It only measures: text runs from a font size, attachment runs through
//! their run delegate handles. Handles are queried on every measurement and
//! released when their run is dropped.

pub mod line;

pub use line::{FontMetrics, Line, Run};
