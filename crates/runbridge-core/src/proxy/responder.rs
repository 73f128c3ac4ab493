//! Responder trait: the named-operation surface a proxy forwards to.

use serde_json::Value;

use super::signature::Signature;
use crate::error::Result;

/// Something an external API can direct named operations at.
///
/// Implementors usually delegate both methods to a [`super::MethodTable`].
pub trait Responder: Send + Sync {
    /// Calling convention for `op`, or `None` if `op` is not serviced.
    fn method_signature(&self, op: &str) -> Option<Signature>;

    /// Runs `op`. `None` means no handler for `op`.
    fn perform(&self, op: &str, args: &[Value]) -> Option<Result<Value>>;

    fn responds_to(&self, op: &str) -> bool {
        self.method_signature(op).is_some()
    }
}
