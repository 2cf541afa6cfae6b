//! Domain parameters (`# 3`): the fixed configuration every Chipmunk
//! operation is parameterized over.
//!
//! `DomainParams` is a plain value, not a process-wide singleton — `# 5`
//! only requires that *tables derived from it* (NTT roots of unity) be
//! computed once and shared immutably, which `chipmunk-ring` does by keying
//! a lazily-built table cache off of `(n, q)`. The params value itself is
//! cheap to construct and copy.

use serde::{Deserialize, Serialize};

/// Ring degree, modulus, and the scheme-wide widths/bounds that signer and
/// verifier must agree on (`# 6`: "domain-parameter choices ... MUST match
/// between signer and verifier for interoperability").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DomainParams {
    /// Ring degree `N`: polynomials have this many coefficients. Power of two.
    pub n: u32,
    /// HOTS ring modulus `q`.
    pub q: u32,
    /// HVC ring modulus `q_hvc`. May equal `q`.
    pub q_hvc: u32,
    /// Width of the HOTS matrix `A` (number of `Rq` polynomials per secret vector).
    pub gamma: u32,
    /// Number of `Rq_hvc` polynomials in the HVC hasher matrix.
    pub hvc_width: u32,
    /// Maximum supported tree height (`LEAF_COUNT_MAX = 2^(TREE_HEIGHT_MAX - 1)`).
    pub tree_height_max: u32,
    /// Coefficient bound for "small" secret/challenge polynomials: coefficients
    /// lie in `[-small_bound, small_bound]`.
    pub small_bound: i64,
    /// Hamming-weight-like parameter for the challenge polynomial `H(m)`:
    /// exactly this many coefficients are nonzero.
    pub challenge_weight: u32,
}

/// Errors constructing or validating a [`DomainParams`] value.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum ParamsError {
    /// `n` was not a power of two.
    #[error("ring degree {0} is not a power of two")]
    RingDegreeNotPowerOfTwo(u32),
    /// `challenge_weight` exceeded `n`.
    #[error("challenge weight {weight} exceeds ring degree {n}")]
    ChallengeWeightTooLarge {
        /// The requested weight.
        weight: u32,
        /// The ring degree it was checked against.
        n: u32,
    },
    /// `tree_height_max` was zero.
    #[error("tree_height_max must be at least 1")]
    ZeroTreeHeight,
}

impl DomainParams {
    /// The maximum number of leaves a tree built under these parameters can hold.
    #[must_use]
    pub const fn leaf_count_max(&self) -> u32 {
        1u32 << (self.tree_height_max - 1)
    }

    /// Validate internal consistency (power-of-two degree, weight within
    /// bounds, nonzero height). Construction via [`Self::standard`] or
    /// [`Self::compact`] always produces a value that passes this.
    ///
    /// # Errors
    /// Returns [`ParamsError`] describing the first inconsistency found.
    pub const fn validate(&self) -> Result<(), ParamsError> {
        if !self.n.is_power_of_two() {
            return Err(ParamsError::RingDegreeNotPowerOfTwo(self.n));
        }
        if self.tree_height_max == 0 {
            return Err(ParamsError::ZeroTreeHeight);
        }
        if self.challenge_weight > self.n {
            return Err(ParamsError::ChallengeWeightTooLarge {
                weight: self.challenge_weight,
                n: self.n,
            });
        }
        Ok(())
    }

    /// The standard parameter profile.
    ///
    /// `N = 512`, `q = 12289` (the Falcon/NewHope NTT-friendly prime:
    /// `q - 1 = 12288 = 2^12 * 3`, so `q ≡ 1 (mod 2N)` holds for every
    /// `N <= 4096`, which is what makes the negacyclic NTT in
    /// `chipmunk-ring` well-defined). `q_hvc` reuses `q` rather than
    /// standing up a second modulus and NTT table, a decision recorded in
    /// `DESIGN.md` against spec `# 3`'s "may equal q or differ".
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            n: 512,
            q: 12289,
            q_hvc: 12289,
            gamma: 4,
            hvc_width: 4,
            tree_height_max: 10, // LEAF_COUNT_MAX = 512
            small_bound: 1,
            challenge_weight: 60,
        }
    }

    /// A smaller profile for tests and embedded callers, following the
    /// original codebase's selectable "ring size" key type (see
    /// `SPEC_FULL.md`'s "Ring-size variants" section).
    #[must_use]
    pub const fn compact() -> Self {
        Self {
            n: 64,
            q: 12289,
            q_hvc: 12289,
            gamma: 2,
            hvc_width: 2,
            tree_height_max: 4, // LEAF_COUNT_MAX = 8
            small_bound: 1,
            challenge_weight: 8,
        }
    }
}
