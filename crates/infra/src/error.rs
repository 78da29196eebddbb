//! Infra-level error model.

use thiserror::Error;

use branchline_core::DomainError;

use crate::store::StoreError;

/// Error surfaced by administrative operations (create/update/assign/...).
///
/// Cascade operations have their own error type because partial completion
/// must stay distinguishable from both success and ordinary failures; see
/// [`crate::cascade::CascadeError`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Domain(DomainError::conflict(msg))
    }

    pub fn not_found() -> Self {
        Self::Domain(DomainError::NotFound)
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Domain(DomainError::invariant(msg))
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
