//! Aggregate-signature byte encoding (`# 4.7`): `root || message_hash[32] ||
//! n (u32) || for each participant in leaf-index order: index (u32) ||
//! public_key || path`.
//!
//! `chipmunk_aggregate::AggregateSignature` carries one combined, constant-size
//! HOTS artifact rather than one `σ_i` per participant (see
//! `chipmunk-aggregate::aggregate`'s module doc and `DESIGN.md`), so this
//! format places `combined_signature` once, after `n`, instead of inside
//! each participant's entry.

use chipmunk_aggregate::{AggregateSignature, ParticipantEntry};
use chipmunk_core::verify::DomainError;
use chipmunk_core::DomainParams;
use chipmunk_hots::HotsSignature;

use crate::error::CodecError;
use crate::hots::{decode_hots_public_key, decode_hots_signature, encode_hots_public_key, encode_hots_signature};
use crate::hvc::{decode_membership_path, encode_membership_path};
use crate::poly::{decode_poly, encode_poly};

fn gamma(dp: &DomainParams) -> usize {
    usize::try_from(dp.gamma).unwrap_or(usize::MAX)
}

fn n(dp: &DomainParams) -> usize {
    usize::try_from(dp.n).unwrap_or(usize::MAX)
}

fn hots_poly_len(dp: &DomainParams) -> usize {
    crate::bitpack::packed_len(n(dp), crate::bitpack::bits_per_coeff(dp.q))
}

fn hvc_poly_len(dp: &DomainParams) -> usize {
    crate::bitpack::packed_len(n(dp), crate::bitpack::bits_per_coeff(dp.q_hvc))
}

/// Encode an aggregate signature.
#[must_use]
pub fn encode_aggregate_signature(agg: &AggregateSignature, dp: &DomainParams) -> Vec<u8> {
    let mut out = encode_poly(agg.root());
    out.extend_from_slice(agg.message_hash());
    let participant_count = u32::try_from(agg.participants().len()).unwrap_or(u32::MAX);
    out.extend_from_slice(&participant_count.to_be_bytes());
    out.extend(encode_hots_signature(agg.combined_signature()));
    for participant in agg.participants() {
        out.extend_from_slice(&participant.index().to_be_bytes());
        out.extend(encode_hots_public_key(participant.public_key()));
        out.extend(encode_membership_path(participant.path()));
    }
    out
}

/// Decode an aggregate signature encoded by [`encode_aggregate_signature`].
///
/// # Errors
/// Returns [`CodecError::Domain`] if the fixed-size header is truncated, the
/// participant section does not divide evenly by the declared participant
/// count, or any embedded public key, signature, or path fails to decode.
pub fn decode_aggregate_signature(bytes: &[u8], dp: &DomainParams) -> Result<AggregateSignature, CodecError> {
    let root_len = hvc_poly_len(dp);
    let combined_sig_len = hots_poly_len(dp).saturating_mul(gamma(dp));
    let header_len = root_len.saturating_add(32).saturating_add(4).saturating_add(combined_sig_len);
    if bytes.len() < header_len {
        return Err(CodecError::Domain(DomainError::WrongLength { expected: header_len, actual: bytes.len() }));
    }

    let root_bytes = bytes.get(0..root_len).ok_or_else(|| wrong_length(header_len, bytes.len()))?;
    let root = decode_poly(root_bytes, n(dp), dp.q_hvc, chipmunk_core::verify::PolyDomain::Normal)?;

    let hash_start = root_len;
    let hash_end = hash_start.saturating_add(32);
    let mut message_hash = [0u8; 32];
    message_hash.copy_from_slice(bytes.get(hash_start..hash_end).ok_or_else(|| wrong_length(header_len, bytes.len()))?);

    let count_end = hash_end.saturating_add(4);
    let mut count_bytes = [0u8; 4];
    count_bytes.copy_from_slice(bytes.get(hash_end..count_end).ok_or_else(|| wrong_length(header_len, bytes.len()))?);
    let participant_count = usize::try_from(u32::from_be_bytes(count_bytes)).unwrap_or(usize::MAX);

    let sig_end = count_end.saturating_add(combined_sig_len);
    let combined_signature: HotsSignature =
        decode_hots_signature(bytes.get(count_end..sig_end).ok_or_else(|| wrong_length(header_len, bytes.len()))?, dp)?;

    let remaining = bytes.get(sig_end..).unwrap_or(&[]);
    if participant_count == 0 {
        return Err(CodecError::Domain(DomainError::InvalidParticipantCount { n: 0, leaf_count_max: dp.leaf_count_max() as usize }));
    }
    if !remaining.len().is_multiple_of(participant_count) {
        return Err(CodecError::Domain(DomainError::WrongLength { expected: header_len, actual: bytes.len() }));
    }
    let per_participant_len = remaining.len() / participant_count;
    let pk_len = hots_poly_len(dp).saturating_mul(2);
    if per_participant_len < 4 + pk_len {
        return Err(CodecError::Domain(DomainError::WrongLength { expected: header_len, actual: bytes.len() }));
    }

    let participants = remaining
        .chunks_exact(per_participant_len)
        .map(|chunk| decode_participant(chunk, dp, pk_len))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AggregateSignature::from_parts(root, message_hash, participants, combined_signature))
}

fn decode_participant(chunk: &[u8], dp: &DomainParams, pk_len: usize) -> Result<ParticipantEntry, CodecError> {
    let mut index_bytes = [0u8; 4];
    index_bytes.copy_from_slice(chunk.get(0..4).ok_or_else(|| wrong_length(4, chunk.len()))?);
    let index = u32::from_be_bytes(index_bytes);

    let pk_bytes = chunk.get(4..4 + pk_len).ok_or_else(|| wrong_length(4 + pk_len, chunk.len()))?;
    let public_key = decode_hots_public_key(pk_bytes, dp)?;

    let path_bytes = chunk.get(4 + pk_len..).unwrap_or(&[]);
    let path = decode_membership_path(path_bytes, n(dp), dp.q_hvc)?;

    Ok(ParticipantEntry::from_parts(index, public_key, path))
}

fn wrong_length(expected: usize, actual: usize) -> CodecError {
    CodecError::Domain(DomainError::WrongLength { expected, actual })
}
