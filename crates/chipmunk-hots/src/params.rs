//! `HOTSParams`: the GAMMA-wide public matrix `A`, shared by every key under
//! one [`DomainParams`] profile (`# 4.3`'s `setup`, `# 3`'s "created once per
//! system; immutable for the lifetime of the process").

use chipmunk_core::DomainParams;
use chipmunk_ring::Poly;

const SETUP_DOMAIN_SEPARATOR: &[u8] = b"chipmunk-hots-setup-matrix-a";

/// The public matrix `A`: `GAMMA` polynomials in NTT domain, deterministically
/// derived from a fixed domain separator so every party in a system built
/// under the same [`DomainParams`] agrees on it without coordination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotsParams {
    matrix: Vec<Poly>,
    domain_params: DomainParams,
}

impl HotsParams {
    /// Derive the public matrix `A` for `domain_params`. Deterministic: the
    /// only input is the domain separator and `domain_params` itself, so two
    /// processes calling this with equal params always agree.
    #[must_use]
    pub fn setup(domain_params: DomainParams) -> Self {
        let n = usize::try_from(domain_params.n).unwrap_or(usize::MAX);
        let gamma = usize::try_from(domain_params.gamma).unwrap_or(usize::MAX);
        let normal = chipmunk_sampler::expand_matrix(
            &[],
            SETUP_DOMAIN_SEPARATOR,
            gamma,
            n,
            domain_params.q,
        );
        let matrix = normal
            .into_iter()
            .map(|p| p.ntt().expect("freshly expanded matrix entries are always normal-domain"))
            .collect();
        tracing::debug!(n = domain_params.n, gamma = domain_params.gamma, "derived HOTS public matrix A");
        Self { matrix, domain_params }
    }

    /// The `GAMMA` NTT-domain matrix entries.
    #[must_use]
    pub fn matrix(&self) -> &[Poly] {
        &self.matrix
    }

    /// The domain parameters this matrix was derived under.
    #[must_use]
    pub const fn domain_params(&self) -> DomainParams {
        self.domain_params
    }
}
