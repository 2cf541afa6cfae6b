//! `HVCHasher` (`# 4.4`): a collision-resistant, SIS-style hash of two
//! `Rq_hvc` polynomials into one, keyed by a matrix derived from a seed.
//!
//! The construction decomposes each operand into short base-`B` digit
//! polynomials, concatenates the two decompositions, and takes their inner
//! product against a uniformly random matrix — the standard
//! "decompose-then-matrix-multiply" SIS hash `# 4.4`'s security rationale
//! names. Grounded on `chipmunk-sampler::expand_matrix` for the matrix
//! itself (the same uniform-expansion primitive `chipmunk-hots::HotsParams`
//! uses for its public matrix `A`).

use chipmunk_core::{DomainParams, Seed};
use chipmunk_ring::{dot, Poly};

use crate::error::HvcError;

const HASHER_DOMAIN_SEPARATOR: &[u8] = b"chipmunk-hvc-hasher-matrix";

/// Smallest base `B` such that `B^width >= q`, i.e. `width` base-`B` digits
/// can represent any centered coefficient of an `Rq_hvc` element.
fn decomposition_base(q: u32, width: u32) -> i64 {
    if width == 0 {
        return i64::from(q);
    }
    let mut base: i64 = 2;
    loop {
        let mut power: i64 = 1;
        for _ in 0..width {
            power = power.saturating_mul(base);
        }
        if power >= i64::from(q) {
            return base;
        }
        base = base.saturating_add(1);
    }
}

/// Decompose a signed magnitude into `width` signed base-`base` digits, most
/// significant digit last: `value == Σ_j digit_j * base^j`. The sign is
/// carried on every digit rather than only the leading one, so each digit
/// stays in `[-(base-1), base-1]` — "short" relative to the ring modulus.
#[allow(
    clippy::arithmetic_side_effects,
    reason = "base >= 2 by construction; magnitude shrinks each iteration and sign is +-1"
)]
fn decompose_value(value: i64, base: i64, width: u32) -> Vec<i64> {
    let sign = if value < 0 { -1 } else { 1 };
    let mut magnitude = value.abs();
    let mut digits = Vec::with_capacity(width as usize);
    for _ in 0..width {
        digits.push(sign * (magnitude % base));
        magnitude /= base;
    }
    digits
}

/// Decompose `poly` into `width` short normal-domain polynomials such that
/// `poly == Σ_j base^j * digits[j]` coefficient-wise (`# 4.4`'s "fixed
/// base-B representation").
fn decompose(poly: &Poly, base: i64, width: u32) -> Vec<Poly> {
    let centered = poly.centered_coeffs();
    let mut columns: Vec<Vec<i64>> = (0..width).map(|_| Vec::with_capacity(centered.len())).collect();
    for &value in &centered {
        for (column, digit) in columns.iter_mut().zip(decompose_value(value, base, width)) {
            column.push(digit);
        }
    }
    columns.into_iter().map(|coeffs| Poly::from_wide_coeffs(&coeffs, poly.modulus())).collect()
}

/// The `HVC_WIDTH`-wide matrix hasher: `2 * HVC_WIDTH` `Rq_hvc` polynomials
/// in NTT domain (one slot per decomposition digit of each of the two
/// operands), immutable once built and freely shareable across threads
/// (`# 5`: "HVCHasher: immutable after init").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HvcHasher {
    matrix: Vec<Poly>,
    base: i64,
    width: u32,
    domain_params: DomainParams,
}

impl HvcHasher {
    /// Expand `seed` into the hasher's matrix under `domain_params`
    /// (`# 4.4`'s `init`).
    #[must_use]
    pub fn init(seed: &Seed, domain_params: DomainParams) -> Self {
        let n = usize::try_from(domain_params.n).unwrap_or(usize::MAX);
        let width = domain_params.hvc_width;
        let base = decomposition_base(domain_params.q_hvc, width);
        let count = usize::try_from(width).unwrap_or(usize::MAX).saturating_mul(2);
        let normal = chipmunk_sampler::expand_matrix(
            seed.as_bytes(),
            HASHER_DOMAIN_SEPARATOR,
            count,
            n,
            domain_params.q_hvc,
        );
        let matrix = normal
            .into_iter()
            .map(|p| p.ntt().expect("freshly expanded matrix entries are always normal-domain"))
            .collect();
        tracing::debug!(width, base, "derived HVC hasher matrix");
        Self { matrix, base, width, domain_params }
    }

    /// The domain parameters this hasher was derived under.
    #[must_use]
    pub const fn domain_params(&self) -> DomainParams {
        self.domain_params
    }

    /// Hash a pair of `Rq_hvc` polynomials into their parent (`# 4.4`'s
    /// `hash_pair`). Deterministic: the same `(hasher, left, right)` always
    /// yields the same parent.
    ///
    /// # Errors
    /// Returns [`HvcError`] if `left` or `right` is not a normal-domain
    /// polynomial over this hasher's ring degree and `q_hvc` modulus.
    pub fn hash_pair(&self, left: &Poly, right: &Poly) -> Result<Poly, HvcError> {
        let mut digits = decompose(left, self.base, self.width);
        digits.extend(decompose(right, self.base, self.width));
        let ntt_digits: Vec<Poly> = digits
            .into_iter()
            .map(|p| p.ntt())
            .collect::<Result<_, _>>()?;
        let parent_ntt = dot(&self.matrix, &ntt_digits)?;
        Ok(parent_ntt.intt()?.reduce())
    }

    /// The canonical zero polynomial used to pad a tree's leaves beyond the
    /// real participant count (`# 4.5`'s "leaves beyond n are zero
    /// polynomials with defined hashing behavior").
    #[must_use]
    pub fn zero_leaf(&self) -> Poly {
        let n = usize::try_from(self.domain_params.n).unwrap_or(usize::MAX);
        Poly::zero(n, self.domain_params.q_hvc)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::as_conversions, reason = "test fixtures cast known-in-range constants")]
    use super::*;

    fn hasher() -> HvcHasher {
        HvcHasher::init(&Seed::new([1; 32]), DomainParams::compact())
    }

    #[test]
    fn decomposition_base_represents_full_modulus_range() {
        let base = decomposition_base(12289, 2);
        assert!(base.saturating_pow(2) >= 12289);
    }

    #[test]
    fn decompose_reconstructs_original_value() {
        let base = decomposition_base(12289, 4);
        for value in [-6144, -1, 0, 1, 6144] {
            let digits = decompose_value(value, base, 4);
            let reconstructed: i64 = digits.iter().enumerate().map(|(j, d)| d * base.pow(j as u32)).sum();
            assert_eq!(reconstructed, value);
        }
    }

    #[test]
    fn hash_pair_is_deterministic() {
        let h = hasher();
        let dp = h.domain_params();
        let left = chipmunk_sampler::expand_matrix(b"l", b"t", 1, dp.n as usize, dp.q_hvc)
            .into_iter()
            .next()
            .expect("one element requested");
        let right = chipmunk_sampler::expand_matrix(b"r", b"t", 1, dp.n as usize, dp.q_hvc)
            .into_iter()
            .next()
            .expect("one element requested");
        let a = h.hash_pair(&left, &right).expect("valid inputs");
        let b = h.hash_pair(&left, &right).expect("valid inputs");
        assert_eq!(a, b);
    }

    #[test]
    fn hash_pair_is_order_sensitive() {
        let h = hasher();
        let dp = h.domain_params();
        let left = chipmunk_sampler::expand_matrix(b"l", b"t", 1, dp.n as usize, dp.q_hvc)
            .into_iter()
            .next()
            .expect("one element requested");
        let right = chipmunk_sampler::expand_matrix(b"r", b"t", 1, dp.n as usize, dp.q_hvc)
            .into_iter()
            .next()
            .expect("one element requested");
        let forward = h.hash_pair(&left, &right).expect("valid inputs");
        let backward = h.hash_pair(&right, &left).expect("valid inputs");
        assert_ne!(forward, backward);
    }

    #[test]
    fn hashing_zero_leaves_is_well_defined() {
        let h = hasher();
        let zero = h.zero_leaf();
        let parent_a = h.hash_pair(&zero, &zero).expect("valid inputs");
        let parent_b = h.hash_pair(&zero, &zero).expect("valid inputs");
        assert_eq!(parent_a, parent_b);
    }
}
