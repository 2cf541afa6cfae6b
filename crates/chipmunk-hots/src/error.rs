//! HOTS-local error type: a thin union of the shared domain error taxonomy
//! and the ring's arithmetic precondition error (`# 7`).

use chipmunk_core::verify::{DomainError, DomainPreconditionError};
use thiserror::Error;

/// Everything that can go wrong building, signing with, or shape-checking a
/// HOTS key or signature, short of the signature simply being invalid (that
/// outcome is a [`chipmunk_core::Validity`], not an error).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HotsError {
    /// A malformed input shape (wrong vector length, index out of range, ...).
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// A polynomial arrived in the wrong domain for the operation attempted.
    #[error(transparent)]
    Precondition(#[from] DomainPreconditionError),
}
