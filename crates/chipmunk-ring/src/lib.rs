//! Degree-`N` polynomial ring arithmetic modulo a prime `q`, with
//! NTT-domain multiplication (`# 4.1` of the Chipmunk core spec).
//!
//! This is the leaf dependency of the whole workspace: every other
//! `chipmunk-*` crate builds on [`Poly`] and never reduces coefficients or
//! runs an NTT itself.

mod modulus;
mod ntt;
mod poly;

pub use poly::{Poly, dot, small_mul, sum};

pub use chipmunk_core::verify::{DomainPreconditionError, PolyDomain};
