//! Codec-local error type (`# 4.7`): "Decoders reject inputs whose byte
//! length is not exactly the required length for the declared parameters."

use chipmunk_core::verify::{DomainError, DomainPreconditionError};
use thiserror::Error;

/// Everything that can go wrong decoding a Chipmunk key, signature, path, or
/// aggregate from bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A malformed input shape (wrong byte length, index out of range, ...).
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// A polynomial arrived in the wrong domain for the operation attempted
    /// (surfaced here only if a downstream ring/HOTS/HVC operation rejects
    /// a decoded value; decoding itself never mixes domains).
    #[error(transparent)]
    Precondition(#[from] DomainPreconditionError),
    /// A HOTS-level operation rejected a decoded key or signature.
    #[error(transparent)]
    Hots(#[from] chipmunk_hots::HotsError),
    /// An HVC-level operation rejected a decoded path.
    #[error(transparent)]
    Hvc(#[from] chipmunk_hvc::HvcError),
}
