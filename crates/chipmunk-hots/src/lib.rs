//! The homomorphic one-time signature (`# 4.3`): setup, keygen, sign, verify.
//!
//! HOTS is linear in the secret (`σ = s0·H(m) + s1`), the property
//! `chipmunk-aggregate` leans on to combine many signers' signatures into
//! one constant-size artifact.

mod error;
mod keys;
mod params;
mod signature;

pub use error::HotsError;
pub use keys::{keygen, HotsPublicKey, HotsSecretKey};
pub use params::HotsParams;
pub use signature::{combine, norm_bound, sign, verify, verify_combined, HotsSignature};
