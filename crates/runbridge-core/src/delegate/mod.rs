//! Run delegates: caller-supplied metrics for runs the layout engine cannot measure.
//!
//! - `handle`: the engine-facing callback table and owned handle.
//! - `run_delegate`: the metrics object and its export path.

pub mod handle;
pub mod run_delegate;

pub use handle::{RunDelegateCallbacks, RunDelegateHandle, RUN_DELEGATE_VERSION_1};
pub use run_delegate::{RunMetrics, TextRunDelegate, UserInfo, ARCHIVE_VERSION};

/// Character that stands in for an attachment inside attributed text.
pub const OBJECT_REPLACEMENT_CHAR: char = '\u{FFFC}';
