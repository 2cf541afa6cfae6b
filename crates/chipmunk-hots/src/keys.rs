//! HOTS key types and `keygen` (`# 4.3`, `# 3`'s `HOTSSecretKey`/`HOTSPublicKey`).

use chipmunk_core::{DomainParams, Seed};
use chipmunk_ring::{Poly, dot};
use zeroize::Zeroize;

use crate::error::HotsError;
use crate::params::HotsParams;

const S0_DOMAIN_SEPARATOR: &[u8] = b"chipmunk-hots-secret-s0";
const S1_DOMAIN_SEPARATOR: &[u8] = b"chipmunk-hots-secret-s1";

fn counter_tag(base: &[u8], counter: u32) -> Vec<u8> {
    let mut tag = base.to_vec();
    tag.extend_from_slice(&counter.to_le_bytes());
    tag
}

/// The HOTS secret key: two length-`GAMMA` vectors of small, NTT-domain
/// polynomials.
///
/// `Poly` derives `Zeroize` over its coefficient vector, so `s0`/`s1` scrub
/// their backing memory (not just drop their elements) on the way out; see
/// the manual [`Drop`] impl below and `DESIGN.md`.
#[derive(Clone)]
pub struct HotsSecretKey {
    domain_params: DomainParams,
    s0: Vec<Poly>,
    s1: Vec<Poly>,
}

impl std::fmt::Debug for HotsSecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HotsSecretKey").field("domain_params", &self.domain_params).finish_non_exhaustive()
    }
}

impl Drop for HotsSecretKey {
    fn drop(&mut self) {
        self.s0.zeroize();
        self.s1.zeroize();
    }
}

impl HotsSecretKey {
    /// The `s0` vector (NTT domain, `GAMMA` small polynomials).
    #[must_use]
    pub fn s0(&self) -> &[Poly] {
        &self.s0
    }

    /// The `s1` vector (NTT domain, `GAMMA` small polynomials).
    #[must_use]
    pub fn s1(&self) -> &[Poly] {
        &self.s1
    }

    /// The domain parameters this key was derived under.
    #[must_use]
    pub const fn domain_params(&self) -> DomainParams {
        self.domain_params
    }

    /// Rebuild a secret key from its already-derived `s0`/`s1` vectors, for
    /// `chipmunk-codec` decoding a previously serialized key without
    /// re-running [`crate::keygen`].
    #[must_use]
    pub const fn from_parts(domain_params: DomainParams, s0: Vec<Poly>, s1: Vec<Poly>) -> Self {
        Self { domain_params, s0, s1 }
    }
}

/// The HOTS public key: `v0 = Σ A_i·s0_i`, `v1 = Σ A_i·s1_i`, both NTT domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotsPublicKey {
    v0: Poly,
    v1: Poly,
}

impl HotsPublicKey {
    /// `v0 = Σ A_i·s0_i`.
    #[must_use]
    pub const fn v0(&self) -> &Poly {
        &self.v0
    }

    /// `v1 = Σ A_i·s1_i`.
    #[must_use]
    pub const fn v1(&self) -> &Poly {
        &self.v1
    }

    /// Rebuild a public key from its `v0`/`v1` components, for
    /// `chipmunk-codec` decoding a previously serialized key.
    #[must_use]
    pub const fn from_parts(v0: Poly, v1: Poly) -> Self {
        Self { v0, v1 }
    }
}

/// Derive a HOTS keypair from `seed` and `counter` (`# 4.3`'s `keygen`).
///
/// Each `(seed, counter)` pair deterministically yields one keypair; reusing
/// a pair to sign two different messages is a protocol error the core does
/// not detect (`# 8`'s documented one-time misuse scenario) — enforcing
/// single-use is the caller's responsibility.
///
/// # Errors
/// Returns [`HotsError`] if `params`'s matrix and the freshly sampled secret
/// vectors disagree in length or domain (never happens for a well-formed
/// [`HotsParams`]; surfaced here rather than panicking per `# 7`'s
/// precondition-error policy).
pub fn keygen(params: &HotsParams, seed: &Seed, counter: u32) -> Result<(HotsPublicKey, HotsSecretKey), HotsError> {
    let dp = params.domain_params();
    let n = usize::try_from(dp.n).unwrap_or(usize::MAX);
    let gamma = usize::try_from(dp.gamma).unwrap_or(usize::MAX);

    let s0: Vec<Poly> = (0..gamma)
        .map(|i| {
            let tag = counter_tag(S0_DOMAIN_SEPARATOR, counter);
            let tagged = [tag.as_slice(), &i.to_le_bytes()].concat();
            chipmunk_sampler::sample_small(seed.as_bytes(), &tagged, n, dp.q, dp.small_bound)
                .ntt()
                .expect("freshly sampled small polynomial is normal-domain")
        })
        .collect();
    let s1: Vec<Poly> = (0..gamma)
        .map(|i| {
            let tag = counter_tag(S1_DOMAIN_SEPARATOR, counter);
            let tagged = [tag.as_slice(), &i.to_le_bytes()].concat();
            chipmunk_sampler::sample_small(seed.as_bytes(), &tagged, n, dp.q, dp.small_bound)
                .ntt()
                .expect("freshly sampled small polynomial is normal-domain")
        })
        .collect();

    let v0 = dot(params.matrix(), &s0)?;
    let v1 = dot(params.matrix(), &s1)?;

    tracing::debug!(counter, "derived HOTS keypair");
    Ok((
        HotsPublicKey { v0, v1 },
        HotsSecretKey { domain_params: dp, s0, s1 },
    ))
}
