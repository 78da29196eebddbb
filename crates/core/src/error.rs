//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns belong elsewhere.
///
/// `NotFound`, `Conflict` and `InvariantViolation` are detected before any
/// write: an operation that returns one of them has had no partial effect.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource does not exist or is soft-deleted.
    #[error("not found")]
    NotFound,

    /// A conflict occurred (e.g. a uniqueness rule over non-deleted rows).
    #[error("conflict: {0}")]
    Conflict(String),

    /// No authenticated principal/session.
    #[error("unauthorized")]
    Unauthorized,

    /// Principal authenticated but holds none of the required permissions.
    ///
    /// Intentionally carries no detail beyond the required set the caller
    /// already knows, so denials do not enumerate the permission catalog.
    #[error("forbidden")]
    Forbidden,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
