//! Weak forwarding proxy.
//!
//! Hand a `WeakProxy` to any API that keeps its callback target alive (a
//! repeating timer, a display link, an observer list). The API owns the proxy;
//! the proxy only observes the real target, so the target can still be dropped
//! and the cycle never forms. Operations that arrive after the target is gone
//! are swallowed.

use std::fmt;
use std::sync::{Arc, Weak};

use serde_json::Value;

use super::responder::Responder;
use super::signature::Signature;
use crate::error::Result;

/// Whether the proxy's target is still alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyState {
    Bound,
    Unbound,
}

/// Non-owning stand-in for `T`.
///
/// Deliberately neither `Clone` nor serializable: it is a relay, not a value.
pub struct WeakProxy<T: ?Sized> {
    target: Weak<T>,
}

impl<T: ?Sized + Responder> WeakProxy<T> {
    pub fn new(target: &Arc<T>) -> Self {
        Self {
            target: Arc::downgrade(target),
        }
    }

    /// Convenience for handing the proxy straight to an API that wants an `Arc`.
    pub fn shared(target: &Arc<T>) -> Arc<Self> {
        Arc::new(Self::new(target))
    }

    /// The target, if it is still alive.
    pub fn target(&self) -> Option<Arc<T>> {
        self.target.upgrade()
    }

    pub fn state(&self) -> ProxyState {
        if self.target.strong_count() > 0 {
            ProxyState::Bound
        } else {
            ProxyState::Unbound
        }
    }

    pub fn is_bound(&self) -> bool {
        self.state() == ProxyState::Bound
    }

    /// True if the live target is the same object as `other`.
    pub fn is_proxy_for(&self, other: &Arc<T>) -> bool {
        self.target()
            .is_some_and(|t| Arc::as_ptr(&t) as *const () == Arc::as_ptr(other) as *const ())
    }

    /// Relays `op` to the target and returns its result unchanged.
    ///
    /// Returns `Value::Null` without failing when the target is gone, does not
    /// service `op`, rejects the arguments, or reports an error. The target is
    /// kept alive for the duration of the call.
    pub fn forward(&self, op: &str, args: &[Value]) -> Value {
        let Some(target) = self.target.upgrade() else {
            tracing::trace!(op, "weak proxy target released; operation dropped");
            return Value::Null;
        };
        match target.perform(op, args) {
            Some(Ok(v)) => v,
            Some(Err(e)) => {
                tracing::debug!(op, code = e.code().as_str(), error = %e, "forwarded operation failed");
                Value::Null
            }
            None => {
                tracing::debug!(op, "weak proxy target does not respond to operation");
                Value::Null
            }
        }
    }
}

impl<T: ?Sized + Responder> Responder for WeakProxy<T> {
    fn method_signature(&self, op: &str) -> Option<Signature> {
        self.target()?.method_signature(op)
    }

    fn perform(&self, op: &str, args: &[Value]) -> Option<Result<Value>> {
        Some(Ok(self.forward(op, args)))
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for WeakProxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target.upgrade() {
            Some(t) => f.debug_tuple("WeakProxy").field(&t).finish(),
            None => f.write_str("WeakProxy(<released>)"),
        }
    }
}
