//! Polynomial byte encoding (`# 4.7`): the building block every other
//! Chipmunk codec function packs and unpacks.

use chipmunk_core::verify::{DomainError, PolyDomain};
use chipmunk_ring::Poly;

use crate::bitpack::{bits_per_coeff, pack, packed_len, unpack};
use crate::error::CodecError;

/// Encode a polynomial's `N` coefficients, `ceil(log2(q))` bits each,
/// big-endian, zero-padded to a whole byte.
#[must_use]
pub fn encode_poly(poly: &Poly) -> Vec<u8> {
    let bits = bits_per_coeff(poly.modulus());
    pack(poly.coeffs(), bits)
}

/// Decode a polynomial of degree `n` over modulus `q`, tagged with `domain`
/// (the caller knows this from context — a HOTS public key's `v0`/`v1` are
/// always NTT domain, for instance — the wire format itself carries no tag).
///
/// # Errors
/// Returns [`CodecError::Domain`] if `bytes` is not exactly the length
/// [`crate::bitpack::packed_len`] requires for `(n, q)`.
pub fn decode_poly(bytes: &[u8], n: usize, q: u32, domain: PolyDomain) -> Result<Poly, CodecError> {
    let bits = bits_per_coeff(q);
    let expected = packed_len(n, bits);
    if bytes.len() != expected {
        return Err(CodecError::Domain(DomainError::WrongLength { expected, actual: bytes.len() }));
    }
    let coeffs = unpack(bytes, n, bits).ok_or(CodecError::Domain(DomainError::WrongLength {
        expected,
        actual: bytes.len(),
    }))?;
    Ok(match domain {
        PolyDomain::Normal => Poly::from_coeffs(coeffs, q),
        PolyDomain::Ntt => Poly::from_ntt_coeffs(coeffs, q),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode_round_trips_normal_domain() {
        let coeffs: Vec<u32> = (0..64).map(|i| (i * 91) % 12289).collect();
        let poly = Poly::from_coeffs(coeffs, 12289);
        let bytes = encode_poly(&poly);
        let decoded = decode_poly(&bytes, 64, 12289, PolyDomain::Normal).expect("valid length");
        assert_eq!(decoded, poly);
    }

    #[test]
    fn encode_then_decode_round_trips_ntt_domain() {
        let coeffs: Vec<u32> = (0..64).map(|i| (i * 13) % 12289).collect();
        let poly = Poly::from_ntt_coeffs(coeffs, 12289);
        let bytes = encode_poly(&poly);
        let decoded = decode_poly(&bytes, 64, 12289, PolyDomain::Ntt).expect("valid length");
        assert_eq!(decoded, poly);
        assert_eq!(decoded.domain(), PolyDomain::Ntt);
    }

    #[test]
    fn decode_rejects_truncated_bytes() {
        let coeffs: Vec<u32> = (0..64).map(|i| (i * 91) % 12289).collect();
        let poly = Poly::from_coeffs(coeffs, 12289);
        let mut bytes = encode_poly(&poly);
        bytes.pop();
        assert!(decode_poly(&bytes, 64, 12289, PolyDomain::Normal).is_err());
    }

    #[test]
    fn decode_rejects_oversized_bytes() {
        let coeffs: Vec<u32> = (0..64).map(|i| (i * 91) % 12289).collect();
        let poly = Poly::from_coeffs(coeffs, 12289);
        let mut bytes = encode_poly(&poly);
        bytes.push(0);
        assert!(decode_poly(&bytes, 64, 12289, PolyDomain::Normal).is_err());
    }
}
