//! HVC-local error type (`# 7`): malformed tree/proof shapes and the
//! arithmetic precondition errors the hasher's ring operations can surface.

use chipmunk_core::verify::{DomainError, DomainPreconditionError};
use thiserror::Error;

/// Everything that can go wrong building an [`crate::HvcTree`], hashing a
/// pair with [`crate::HvcHasher`], or shape-checking a
/// [`crate::MembershipPath`], short of a path simply failing to verify
/// (that outcome is a [`chipmunk_core::Validity`], not an error).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HvcError {
    /// A malformed input shape (wrong leaf count, index out of range, ...).
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// A polynomial arrived in the wrong domain for the operation attempted.
    #[error(transparent)]
    Precondition(#[from] DomainPreconditionError),
}
