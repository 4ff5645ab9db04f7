//! Error types for lock operations.

use thiserror::Error;

/// Errors that can surface from lock operations.
///
/// Store-level failures (unreachable node, timed-out call) are deliberately
/// absent: the quorum algorithm treats them as "this store did not grant the
/// lock" and they can never fail an operation on their own. What remains is
/// caller mistakes and explicit cancellation.
#[derive(Error, Debug)]
pub enum LockError {
    /// Lock operation was cancelled by the caller.
    #[error("lock operation was cancelled")]
    Cancelled,

    /// Resource name is empty or otherwise unusable.
    #[error("invalid resource name: {0}")]
    InvalidResource(String),

    /// Requested TTL is zero.
    #[error("invalid ttl: {0}")]
    InvalidTtl(String),

    /// Configuration rejected at construction time.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to establish a store connection (builder path only).
    #[error("connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for lock operations.
pub type LockResult<T> = Result<T, LockError>;
