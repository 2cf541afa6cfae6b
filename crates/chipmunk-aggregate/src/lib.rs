//! Aggregator (`# 4.6`): combine individually-verified signer contributions
//! into one constant-size multi-signature, and verify it.

mod aggregate;
mod error;
mod individual;

pub use aggregate::{aggregate, verify, AggregateSignature, ParticipantEntry};
pub use error::{AggregateError, ParticipantFailure};
pub use individual::IndividualSignature;
