//! Deterministic seed expansion for Chipmunk (`# 4.2`): this crate turns a
//! [`chipmunk_core::Seed`] into uniform `Rq` elements, ternary small
//! polynomials, and sparse challenge polynomials, all by keying a
//! SHA-256-based expansion stream ([`xof::Xof`]) with a domain separator.

mod sampler;
mod xof;

pub use sampler::{challenge, expand_matrix, sample_small};
pub use xof::Xof;
