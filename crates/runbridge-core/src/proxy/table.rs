//! Per-type method table backing `Responder` implementations.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;

use super::signature::Signature;
use crate::error::Result;

type Invoker<T> = Arc<dyn Fn(&T, &[Value]) -> Result<Value> + Send + Sync>;

struct Method<T: ?Sized> {
    signature: Signature,
    invoke: Invoker<T>,
}

impl<T: ?Sized> Clone for Method<T> {
    fn clone(&self) -> Self {
        Self {
            signature: self.signature.clone(),
            invoke: Arc::clone(&self.invoke),
        }
    }
}

/// Named operations a type agrees to service.
///
/// This is the closed dispatch surface for [`super::Responder`]: only names
/// registered here can be forwarded, and every call is checked against the
/// registered [`Signature`] before the invoker runs.
pub struct MethodTable<T: ?Sized> {
    methods: DashMap<&'static str, Method<T>>,
}

impl<T: ?Sized> MethodTable<T> {
    pub fn new() -> Self {
        Self {
            methods: DashMap::new(),
        }
    }

    /// Registers (or replaces) the handler for `name`.
    pub fn register<F>(&self, name: &'static str, signature: Signature, invoke: F)
    where
        F: Fn(&T, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let method = Method {
            signature,
            invoke: Arc::new(invoke),
        };
        if self.methods.insert(name, method).is_some() {
            tracing::debug!(name, "method table entry replaced");
        }
    }

    /// Builder form of [`MethodTable::register`].
    pub fn with<F>(self, name: &'static str, signature: Signature, invoke: F) -> Self
    where
        F: Fn(&T, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.register(name, signature, invoke);
        self
    }

    pub fn signature(&self, name: &str) -> Option<Signature> {
        self.methods.get(name).map(|m| m.value().signature.clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.methods.iter().map(|e| *e.key()).collect();
        names.sort_unstable();
        names
    }

    /// Runs `name` on `target`.
    ///
    /// `None` when nothing is registered under `name`; otherwise the signature
    /// check result or the handler's own result.
    pub fn perform(&self, target: &T, name: &str, args: &[Value]) -> Option<Result<Value>> {
        let method = self.methods.get(name)?.value().clone();
        Some(
            method
                .signature
                .check(args)
                .and_then(|()| (method.invoke)(target, args)),
        )
    }
}

impl<T: ?Sized> Default for MethodTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
