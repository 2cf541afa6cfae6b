//! Forward/inverse number-theoretic transform with a negacyclic twist, so
//! that `mul_ntt` (pointwise product in the transformed domain) computes
//! multiplication modulo `x^N + 1` exactly (`# 4.1`'s algorithmic note).
//!
//! Twiddle tables are derived from `(n, q)` once and cached process-wide —
//! `# 5`: "PolyRing tables (roots of unity, reduction constants): process-wide,
//! initialized once, immutable thereafter" — behind a `Mutex<HashMap<..>>`
//! rather than one global `LazyLock`, because this workspace supports more
//! than one `DomainParams` profile (`standard` vs `compact`) sharing a
//! process, each needing its own table.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crate::modulus;

/// Precomputed twiddle factors for one `(n, q)` pair.
#[derive(Debug)]
pub struct NttTable {
    n: usize,
    q: u32,
    /// `psi^i mod q` for `i` in `0..n` (negacyclic twist, forward direction).
    psi_powers: Vec<u32>,
    /// `psi^{-i} mod q` for `i` in `0..n` (twist, inverse direction).
    psi_inv_powers: Vec<u32>,
    /// `omega^k mod q` for `k` in `0..n/2`, `omega = psi^2` a primitive `n`-th root.
    omega_powers: Vec<u32>,
    /// `omega^{-k} mod q` for `k` in `0..n/2`.
    omega_inv_powers: Vec<u32>,
    /// `n^{-1} mod q`.
    n_inv: u32,
}

type TableCache = Mutex<HashMap<(usize, u32), Arc<NttTable>>>;

static TABLE_CACHE: OnceLock<TableCache> = OnceLock::new();

/// Fetch (building and caching if necessary) the twiddle table for `(n, q)`.
///
/// # Panics
/// Panics if `n` is not a power of two or if `q` does not admit a primitive
/// `2n`-th root of unity (i.e. `2n` does not divide `q - 1`). Both are
/// `DomainParams` construction invariants enforced by
/// [`chipmunk_core::DomainParams::validate`] long before this is called, so
/// a panic here indicates a params value that skipped validation.
pub fn table(n: usize, q: u32) -> Arc<NttTable> {
    let cache = TABLE_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = cache.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    if let Some(existing) = guard.get(&(n, q)) {
        return Arc::clone(existing);
    }
    let built = Arc::new(build_table(n, q));
    guard.insert((n, q), Arc::clone(&built));
    built
}

#[allow(
    clippy::arithmetic_side_effects,
    reason = "n, q are validated DomainParams-derived sizes; 2n divides q-1 by construction"
)]
fn build_table(n: usize, q: u32) -> NttTable {
    assert!(n.is_power_of_two(), "ring degree must be a power of two");
    let two_n = u32::try_from(2 * n).expect("2n fits in u32 for supported ring degrees");
    assert_eq!((q - 1) % two_n, 0, "q - 1 must be divisible by 2n");

    let generator = find_generator(q);
    let psi = modulus::pow(generator, (q - 1) / two_n, q);
    let psi_inv = modulus::inv(psi, q).expect("psi is nonzero mod prime q");
    let omega = modulus::mul(psi, psi, q);
    let omega_inv = modulus::mul(psi_inv, psi_inv, q);

    let psi_powers = powers_of(psi, n, q);
    let psi_inv_powers = powers_of(psi_inv, n, q);
    let omega_powers = powers_of(omega, n / 2, q);
    let omega_inv_powers = powers_of(omega_inv, n / 2, q);
    let n_inv = modulus::inv(u32::try_from(n).expect("n fits in u32") % q, q)
        .expect("n is nonzero mod prime q for supported ring degrees");

    NttTable {
        n,
        q,
        psi_powers,
        psi_inv_powers,
        omega_powers,
        omega_inv_powers,
        n_inv,
    }
}

fn powers_of(base: u32, count: usize, q: u32) -> Vec<u32> {
    let mut out = Vec::with_capacity(count);
    let mut acc = 1u32 % q;
    for _ in 0..count {
        out.push(acc);
        acc = modulus::mul(acc, base, q);
    }
    out
}

/// Find a generator of `(Z/qZ)^*` by trial, for prime `q`. `q - 1` is
/// factored by trial division, which is fine for the small moduli Chipmunk
/// uses (`q = 12289`); this is init-time work done once per `(n, q)`, not a
/// hot path.
#[allow(
    clippy::arithmetic_side_effects,
    reason = "candidate/divisor increments are bounded by q, checked via the loop's own assert"
)]
fn find_generator(q: u32) -> u32 {
    let order = q - 1;
    let prime_factors = distinct_prime_factors(order);
    let mut candidate = 2u32;
    loop {
        let is_generator = prime_factors
            .iter()
            .all(|&p| modulus::pow(candidate, order / p, q) != 1);
        if is_generator {
            return candidate;
        }
        candidate += 1;
        assert!(candidate < q, "no generator found for prime q = {q}");
    }
}

#[allow(
    clippy::arithmetic_side_effects,
    reason = "trial division over u32 value, divisor bounded by sqrt(value)"
)]
fn distinct_prime_factors(mut value: u32) -> Vec<u32> {
    let mut factors = Vec::new();
    let mut divisor = 2u32;
    while divisor * divisor <= value {
        if value % divisor == 0 {
            factors.push(divisor);
            while value % divisor == 0 {
                value /= divisor;
            }
        }
        divisor += 1;
    }
    if value > 1 {
        factors.push(value);
    }
    factors
}

/// In-place forward transform: applies the negacyclic twist, then a
/// standard iterative Cooley-Tukey DFT over `omega`.
pub fn forward(table: &NttTable, coeffs: &mut [u32]) {
    assert_eq!(coeffs.len(), table.n, "coefficient buffer must have length n");
    for (c, psi_i) in coeffs.iter_mut().zip(&table.psi_powers) {
        *c = modulus::mul(*c, *psi_i, table.q);
    }
    dft(coeffs, &table.omega_powers, table.q);
}

/// In-place inverse transform: inverse DFT over `omega^{-1}`, scaled by
/// `n^{-1}`, then the inverse negacyclic twist.
pub fn inverse(table: &NttTable, values: &mut [u32]) {
    assert_eq!(values.len(), table.n, "coefficient buffer must have length n");
    dft(values, &table.omega_inv_powers, table.q);
    for (c, psi_inv_i) in values.iter_mut().zip(&table.psi_inv_powers) {
        *c = modulus::mul(modulus::mul(*c, table.n_inv, table.q), *psi_inv_i, table.q);
    }
}

#[allow(
    clippy::arithmetic_side_effects,
    reason = "all index arithmetic is bounded by the power-of-two loop structure of a CT butterfly"
)]
fn dft(a: &mut [u32], omega_powers: &[u32], q: u32) {
    let n = a.len();
    bit_reverse_permute(a);
    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let step = n / len;
        let mut start = 0;
        while start < n {
            for j in 0..half {
                #[allow(clippy::indexing_slicing, reason = "j * step < n/2 by construction")]
                let w = omega_powers[j * step];
                #[allow(clippy::indexing_slicing, reason = "start + j < n by loop bounds")]
                let u = a[start + j];
                #[allow(clippy::indexing_slicing, reason = "start + j + half < n by loop bounds")]
                let v = modulus::mul(a[start + j + half], w, q);
                a[start + j] = modulus::add(u, v, q);
                a[start + j + half] = modulus::sub(u, v, q);
            }
            start += len;
        }
        len *= 2;
    }
}

fn bit_reverse_permute(a: &mut [u32]) {
    let n = a.len();
    let bits = n.trailing_zeros();
    for i in 0..n {
        let j = i.reverse_bits() >> (usize::BITS - bits);
        if i < j {
            a.swap(i, j);
        }
    }
}
