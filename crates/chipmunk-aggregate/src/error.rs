//! Aggregator-local error type (`# 7`'s "aggregation failure" kind): a
//! named participant's pre-aggregation verification can fail, which is
//! reported with that participant's index rather than a bare boolean.

use chipmunk_core::verify::DomainError;
use chipmunk_hots::HotsError;
use chipmunk_hvc::HvcError;
use thiserror::Error;

/// Which pre-aggregation check a failing participant failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantFailure {
    /// The participant's individual HOTS signature did not verify.
    HotsSignature,
    /// The participant's HVC membership path did not verify against the
    /// shared tree root.
    MembershipPath,
}

/// Everything that can go wrong building or checking an aggregate
/// signature, short of the aggregate simply being invalid (that outcome is
/// a [`chipmunk_core::Validity`], not an error).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// A malformed input shape (wrong participant count, duplicate index, ...).
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// A HOTS-level operation (sign/verify/combine) failed.
    #[error(transparent)]
    Hots(#[from] HotsError),
    /// An HVC-level operation (hash/tree) failed.
    #[error(transparent)]
    Hvc(#[from] HvcError),
    /// A named participant failed a pre-aggregation check (`# 4.6`'s
    /// "aggregation fails with a participant-index error").
    #[error("participant {index} failed pre-aggregation check: {reason:?}")]
    ParticipantFailed {
        /// The failing participant's leaf index.
        index: u32,
        /// Which check it failed.
        reason: ParticipantFailure,
    },
}
