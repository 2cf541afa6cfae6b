//! Deterministic expansion of a seed into `Rq` elements and the two
//! bounded/sparse polynomial families HOTS and the challenge hash need
//! (`# 4.2`): uniform matrix entries, ternary "small" secrets, and sparse
//! `{-1, 0, 1}`-weighted challenge polynomials.
//!
//! Every function here is total and seed-keyed: the same `(seed, domain
//! separator, ...)` input always expands to the same output, and distinct
//! domain separators carve independent streams out of one seed so a HOTS
//! keypair's public matrix and its secret key never share randomness.

use chipmunk_ring::Poly;

use crate::xof::Xof;

/// Rejection-sampling bound for a uniform value in `[0, q)` drawn from a
/// 16-bit sample: the largest multiple of `q` that fits in `u16::MAX + 1`.
fn rejection_bound(q: u32) -> u32 {
    let span = u32::from(u16::MAX) + 1;
    (span / q) * q
}

/// Expand `seed` under `domain_separator` into `count` uniformly random
/// normal-domain polynomials over `Z_q`, each of degree `n` (`§4.2`'s
/// `expand_matrix`, used for both the HOTS public matrix `A` and the HVC
/// hasher's matrices).
#[must_use]
pub fn expand_matrix(seed: &[u8], domain_separator: &[u8], count: usize, n: usize, q: u32) -> Vec<Poly> {
    let mut xof = Xof::new(seed, domain_separator);
    let bound = rejection_bound(q);
    (0..count)
        .map(|_| {
            let coeffs = (0..n)
                .map(|_| loop {
                    let sample = u32::from(xof.next_u16());
                    if sample < bound {
                        return sample % q;
                    }
                })
                .collect();
            Poly::from_coeffs(coeffs, q)
        })
        .collect()
}

/// Expand `seed` under `domain_separator` into one ternary-coefficient
/// polynomial of degree `n`, each coefficient independently drawn from
/// `{-bound, 0, bound}` (`§4.2`'s `sample_small`; Chipmunk's own bound is
/// always `1`, giving `{-1, 0, 1}` secret/nonce coefficients).
#[must_use]
pub fn sample_small(seed: &[u8], domain_separator: &[u8], n: usize, q: u32, bound: i64) -> Poly {
    let mut xof = Xof::new(seed, domain_separator);
    // Reject bytes >= 252 (252 = 84 * 3) so `byte % 3` is unbiased over {0,1,2}.
    let ternary_bound = 252u8;
    let coeffs: Vec<i64> = (0..n)
        .map(|_| loop {
            let byte = xof.next_byte();
            if byte < ternary_bound {
                return match byte % 3 {
                    0 => 0,
                    1 => bound,
                    _ => -bound,
                };
            }
        })
        .collect();
    Poly::from_wide_coeffs(&coeffs, q)
}

/// Derive the sparse challenge polynomial for `message` (`§4.2`'s
/// `challenge`): exactly `weight` of the `n` coefficients are set to `+1`
/// or `-1` (chosen uniformly among the remaining free positions and an
/// independent sign bit each), the rest are zero.
///
/// This is Fisher-Yates position selection driven by the XOF rather than a
/// fixed "first `weight` distinct samples" loop, so it terminates in
/// exactly `weight` draws instead of needing rejection for repeats.
#[must_use]
pub fn challenge(message: &[u8], n: usize, q: u32, weight: u32) -> Poly {
    debug_assert!(u64::from(weight) <= n as u64, "challenge weight must not exceed ring degree");
    let mut xof = Xof::new(message, b"chipmunk-sampler-challenge");
    let mut positions: Vec<usize> = (0..n).collect();
    let mut coeffs = vec![0i64; n];
    let weight = weight.min(u32::try_from(n).unwrap_or(u32::MAX));
    for _ in 0..weight {
        let remaining = positions.len();
        if remaining == 0 {
            break;
        }
        let idx = usize::from(xof.next_u16()) % remaining;
        let position = positions.swap_remove(idx);
        let sign = if xof.next_byte() & 1 == 0 { 1 } else { -1 };
        if let Some(slot) = coeffs.get_mut(position) {
            *slot = sign;
        }
    }
    Poly::from_wide_coeffs(&coeffs, q)
}
