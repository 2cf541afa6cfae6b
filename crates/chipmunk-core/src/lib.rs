//! Shared base primitives for the Chipmunk post-quantum multi-signature scheme.

/// Domain parameters shared by every Chipmunk component.
pub mod params;
/// Seed type with zeroize-on-drop semantics.
pub mod seed;
/// Shared error taxonomy and the valid/invalid verification outcome.
pub mod verify;

pub use params::DomainParams;
pub use seed::Seed;
pub use verify::{DomainError, Validity};
