//! Converting a HOTS public key into an HVC leaf polynomial (`# 2`'s "Convert
//! each HOTS public key to an HVC leaf polynomial" and `# 4.5`'s `Leaf`
//! glossary entry).
//!
//! `q_hvc` may differ from the HOTS ring's `q` (`# 3`), so this cannot just
//! reinterpret `v0`/`v1`'s coefficients under the new modulus. Instead it
//! serializes the normal-domain coefficients of both and re-expands them
//! through [`chipmunk_sampler::expand_matrix`] (the same uniform-expansion
//! primitive [`chipmunk_hots::HotsParams::setup`] uses), deterministically
//! compressing an arbitrary-modulus public key into one `Rq_hvc` element.

use chipmunk_core::DomainParams;
use chipmunk_hots::HotsPublicKey;
use chipmunk_ring::Poly;

use crate::error::HvcError;

const LEAF_DOMAIN_SEPARATOR: &[u8] = b"chipmunk-hvc-leaf";

fn pack_coeffs(poly: &Poly) -> Vec<u8> {
    poly.coeffs().iter().flat_map(|c| c.to_be_bytes()).collect()
}

/// Derive the HVC leaf polynomial for a participant's HOTS public key.
///
/// # Errors
/// Returns [`HvcError`] if `public_key`'s `v0`/`v1` are not in NTT domain
/// (an invariant [`chipmunk_hots::keygen`] always establishes).
pub fn leaf_from_hots_public_key(public_key: &HotsPublicKey, domain_params: DomainParams) -> Result<Poly, HvcError> {
    let v0 = public_key.v0().intt()?;
    let v1 = public_key.v1().intt()?;
    let mut bytes = pack_coeffs(&v0);
    bytes.extend(pack_coeffs(&v1));

    let n = usize::try_from(domain_params.n).unwrap_or(usize::MAX);
    let leaf = chipmunk_sampler::expand_matrix(&bytes, LEAF_DOMAIN_SEPARATOR, 1, n, domain_params.q_hvc)
        .into_iter()
        .next()
        .expect("expand_matrix(count = 1) always returns exactly one polynomial");
    Ok(leaf)
}
