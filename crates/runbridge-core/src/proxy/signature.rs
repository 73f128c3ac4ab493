//! Calling conventions for forwardable operations.

use serde_json::Value;

use crate::error::{Result, RunBridgeError};

/// Kind of a single argument or return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Anything, including null.
    Any,
    /// Only null. Used as the return kind of operations with no result.
    Null,
    Bool,
    /// Integral number (signed or unsigned).
    Int,
    /// Any number.
    Float,
    Str,
    Array,
    Object,
}

impl ArgKind {
    pub fn matches(self, v: &Value) -> bool {
        match self {
            ArgKind::Any => true,
            ArgKind::Null => v.is_null(),
            ArgKind::Bool => v.is_boolean(),
            ArgKind::Int => v.is_i64() || v.is_u64(),
            ArgKind::Float => v.is_number(),
            ArgKind::Str => v.is_string(),
            ArgKind::Array => v.is_array(),
            ArgKind::Object => v.is_object(),
        }
    }
}

/// Parameter and return kinds of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<ArgKind>,
    pub returns: ArgKind,
}

impl Signature {
    pub fn new(params: impl IntoIterator<Item = ArgKind>, returns: ArgKind) -> Self {
        Self {
            params: params.into_iter().collect(),
            returns,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Checks `args` against the parameter list (count, then kinds).
    pub fn check(&self, args: &[Value]) -> Result<()> {
        if args.len() != self.params.len() {
            return Err(RunBridgeError::BadArguments(format!(
                "expected {} argument(s), got {}",
                self.params.len(),
                args.len()
            )));
        }
        for (i, (kind, arg)) in self.params.iter().zip(args).enumerate() {
            if !kind.matches(arg) {
                return Err(RunBridgeError::BadArguments(format!(
                    "argument {i}: expected {kind:?}, got {arg}"
                )));
            }
        }
        Ok(())
    }

    pub fn accepts(&self, args: &[Value]) -> bool {
        self.check(args).is_ok()
    }
}
