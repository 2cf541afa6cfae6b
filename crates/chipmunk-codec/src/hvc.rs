//! HVC membership-path byte encoding (`# 4.7`): `index (u32) || leaf_polynomial
//! || sibling[0] || ... || sibling[H-2]`.
//!
//! The path's height isn't carried as an explicit field; a decoder infers
//! the sibling count from the remaining byte length after the fixed
//! `index` and `leaf` fields, divided by one polynomial's packed length —
//! the same "exact declared length or reject" discipline `# 4.7` asks for,
//! just applied per-field instead of to the whole buffer up front.

use chipmunk_core::verify::{DomainError, PolyDomain};
use chipmunk_hvc::MembershipPath;

use crate::error::CodecError;
use crate::poly::{decode_poly, encode_poly};

/// Encode a membership path.
#[must_use]
pub fn encode_membership_path(path: &MembershipPath) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&path.index().to_be_bytes());
    out.extend(encode_poly(path.leaf()));
    for sibling in path.siblings() {
        out.extend(encode_poly(sibling));
    }
    out
}

/// Decode a membership path over an `Rq_hvc` ring of degree `n` and modulus
/// `q_hvc`.
///
/// # Errors
/// Returns [`CodecError::Domain`] if `bytes` is shorter than `4 +
/// packed_len(n, q_hvc)`, or the remaining bytes are not an exact multiple
/// of one polynomial's packed length.
pub fn decode_membership_path(bytes: &[u8], n: usize, q_hvc: u32) -> Result<MembershipPath, CodecError> {
    let poly_len = crate::bitpack::packed_len(n, crate::bitpack::bits_per_coeff(q_hvc));
    let min_len = 4usize.saturating_add(poly_len);
    if bytes.len() < min_len {
        return Err(CodecError::Domain(DomainError::WrongLength { expected: min_len, actual: bytes.len() }));
    }
    let remainder = bytes.len().saturating_sub(min_len);
    if poly_len == 0 || !remainder.is_multiple_of(poly_len) {
        return Err(CodecError::Domain(DomainError::WrongLength { expected: min_len, actual: bytes.len() }));
    }

    let mut index_bytes = [0u8; 4];
    index_bytes.copy_from_slice(bytes.get(0..4).ok_or(CodecError::Domain(DomainError::WrongLength {
        expected: 4,
        actual: bytes.len(),
    }))?);
    let index = u32::from_be_bytes(index_bytes);

    let leaf_bytes = bytes.get(4..min_len).ok_or(CodecError::Domain(DomainError::WrongLength {
        expected: min_len,
        actual: bytes.len(),
    }))?;
    let leaf = decode_poly(leaf_bytes, n, q_hvc, PolyDomain::Normal)?;

    let siblings = bytes
        .get(min_len..)
        .unwrap_or(&[])
        .chunks_exact(poly_len)
        .map(|chunk| decode_poly(chunk, n, q_hvc, PolyDomain::Normal))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MembershipPath::from_parts(index, leaf, siblings))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::as_conversions, reason = "test fixtures cast known-in-range constants")]
    use super::*;
    use chipmunk_core::{DomainParams, Seed};
    use chipmunk_hvc::{HvcHasher, HvcTree};

    fn sample_tree(n: usize) -> HvcTree {
        let dp = DomainParams::compact();
        let hasher = HvcHasher::init(&Seed::new([3; 32]), dp);
        let leaves: Vec<_> = (0..n)
            .map(|i| {
                chipmunk_sampler::expand_matrix(&[i as u8], b"codec-test", 1, dp.n as usize, dp.q_hvc)
                    .into_iter()
                    .next()
                    .expect("one element requested")
            })
            .collect();
        HvcTree::build(hasher, leaves, n).expect("valid build")
    }

    #[test]
    fn membership_path_round_trips() {
        let dp = DomainParams::compact();
        let tree = sample_tree(5);
        let path = tree.gen_proof(2).expect("index in range");
        let bytes = encode_membership_path(&path);
        let decoded = decode_membership_path(&bytes, dp.n as usize, dp.q_hvc).expect("valid encoding");
        assert_eq!(decoded, path);
    }

    #[test]
    fn decoded_path_still_verifies() {
        let dp = DomainParams::compact();
        let tree = sample_tree(8);
        let path = tree.gen_proof(7).expect("index in range");
        let bytes = encode_membership_path(&path);
        let decoded = decode_membership_path(&bytes, dp.n as usize, dp.q_hvc).expect("valid encoding");
        let validity = HvcTree::verify_path(&decoded, tree.root(), tree.hasher()).expect("valid shapes");
        assert_eq!(validity, chipmunk_core::Validity::Valid);
    }

    #[test]
    fn rejects_truncated_path() {
        let dp = DomainParams::compact();
        let tree = sample_tree(4);
        let path = tree.gen_proof(0).expect("index in range");
        let mut bytes = encode_membership_path(&path);
        bytes.pop();
        assert!(decode_membership_path(&bytes, dp.n as usize, dp.q_hvc).is_err());
    }
}
