//! Shared error type across runbridge crates.

use thiserror::Error;

/// Stable error codes (safe to log or surface to callers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Arguments do not match the operation's signature.
    BadArguments,
    /// No handler registered under the requested name.
    NotFound,
    /// Archive could not be encoded or decoded.
    Codec,
    /// Configuration rejected by strict parsing or validation.
    InvalidConfig,
    /// Unsupported archive or config version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadArguments => "BAD_ARGUMENTS",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Codec => "CODEC",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RunBridgeError>;

/// Unified error type used by core and host.
#[derive(Debug, Error)]
pub enum RunBridgeError {
    #[error("bad arguments: {0}")]
    BadArguments(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("codec: {0}")]
    Codec(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unsupported version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl RunBridgeError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            RunBridgeError::BadArguments(_) => ErrorCode::BadArguments,
            RunBridgeError::NotFound(_) => ErrorCode::NotFound,
            RunBridgeError::Codec(_) => ErrorCode::Codec,
            RunBridgeError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            RunBridgeError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            RunBridgeError::Internal(_) => ErrorCode::Internal,
        }
    }
}
