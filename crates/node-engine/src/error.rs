//! Error types for the node engine

use thiserror::Error;

/// Result type alias using NodeEngineError
pub type Result<T> = std::result::Result<T, NodeEngineError>;

/// Errors that can occur in the node engine
#[derive(Debug, Error)]
pub enum NodeEngineError {
    /// Document is missing required fields or has the wrong shape
    #[error("Invalid app format: {0}")]
    InvalidFormat(String),

    /// A node handler failed
    #[error("Node execution failed: {0}")]
    ExecutionFailed(String),

    /// Connection rejected by the document editing helpers
    #[error("Invalid connection: {0}")]
    InvalidConnection(String),

    /// function-call referenced a function with no define node
    #[error("Function '{0}' not found")]
    FunctionNotFound(String),

    /// Nested function calls exceeded the configured depth
    #[error("Call depth limit reached ({0})")]
    CallDepthExceeded(usize),

    /// An app or resource could not be found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Identifier rejected by the app store
    #[error("Invalid ID: {0}")]
    InvalidId(String),

    /// Host capability failure that was not handled by the node
    #[error(transparent)]
    Host(#[from] HostError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NodeEngineError {
    /// Create an execution failed error with a message
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    /// Create an invalid format error with a message
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }
}

/// Failure reported by a host capability (network, storage, hardware)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    /// The capability is not provided by this host
    #[error("{0} is not available on this host")]
    Unavailable(&'static str),

    /// The user or platform denied access
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The operation did not finish in time
    #[error("Timed out after {0} ms")]
    Timeout(u64),

    /// Request refused before it was sent
    #[error("Request blocked: {0}")]
    Blocked(String),

    /// Anything else the host reports
    #[error("{0}")]
    Failed(String),
}

impl HostError {
    /// Create a generic failure with a message
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}
