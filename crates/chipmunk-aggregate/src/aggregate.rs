//! `Aggregator` (`# 4.6`): combine per-signer HOTS signatures and HVC
//! membership proofs into one multi-signature bound to a shared tree root,
//! and verify it.
//!
//! Combining rule (resolving `# 9`'s open question, recorded in
//! `DESIGN.md`): because HOTS is linear in the secret, `Σ_i σ_i` verifies
//! against `Σ_i v0_i`, `Σ_i v1_i` under the shared challenge — exactly what
//! [`chipmunk_hots::combine`]/[`chipmunk_hots::verify_combined`] implement.
//! The aggregate therefore carries one constant-size combined HOTS artifact
//! plus, per participant, only what a verifier needs to reconstruct that
//! participant's contribution to the equation: its leaf index, its public
//! key, and its membership path. It does not additionally carry each
//! participant's individual `σ_i` (`# 4.7`'s literal byte layout lists one,
//! but `# 4.6`'s prose — "a signature bundle whose size is independent of n
//! in the HOTS component" — is the binding requirement; `DESIGN.md` records
//! this as the deliberate resolution).

use std::collections::BTreeSet;

use chipmunk_core::verify::{DomainError, Validity};
use chipmunk_hots::{HotsParams, HotsPublicKey, HotsSignature};
use chipmunk_hvc::{HvcHasher, HvcTree, MembershipPath};
use chipmunk_ring::Poly;
use sha2::{Digest, Sha256};

use crate::error::{AggregateError, ParticipantFailure};
use crate::individual::IndividualSignature;

/// One participant's record inside an [`AggregateSignature`]: enough to
/// reconstruct their leaf and re-verify their membership path, without
/// carrying their individual HOTS signature (folded into
/// [`AggregateSignature::combined_signature`] instead).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantEntry {
    index: u32,
    public_key: HotsPublicKey,
    path: MembershipPath,
}

impl ParticipantEntry {
    /// This participant's leaf index.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// This participant's HOTS public key.
    #[must_use]
    pub const fn public_key(&self) -> &HotsPublicKey {
        &self.public_key
    }

    /// This participant's membership path.
    #[must_use]
    pub const fn path(&self) -> &MembershipPath {
        &self.path
    }

    /// Rebuild a participant entry from its decoded parts, for `chipmunk-codec`.
    #[must_use]
    pub const fn from_parts(index: u32, public_key: HotsPublicKey, path: MembershipPath) -> Self {
        Self { index, public_key, path }
    }
}

/// A single signature standing in for `n` individual signatures on the
/// same message (`# 3`'s `AggregateSignature`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSignature {
    root: Poly,
    message_hash: [u8; 32],
    participants: Vec<ParticipantEntry>,
    combined_signature: HotsSignature,
}

impl AggregateSignature {
    /// The shared HVC tree root every participant's path was checked against.
    #[must_use]
    pub const fn root(&self) -> &Poly {
        &self.root
    }

    /// `SHA-256` of the signed message, carried for the `# 4.7` byte format.
    #[must_use]
    pub const fn message_hash(&self) -> &[u8; 32] {
        &self.message_hash
    }

    /// The participant records, ordered by leaf index (`# 4.6`'s "the
    /// aggregator sorts them before combining").
    #[must_use]
    pub fn participants(&self) -> &[ParticipantEntry] {
        &self.participants
    }

    /// The combined, constant-size HOTS artifact.
    #[must_use]
    pub const fn combined_signature(&self) -> &HotsSignature {
        &self.combined_signature
    }

    /// Rebuild an aggregate signature from its decoded parts, for
    /// `chipmunk-codec`.
    #[must_use]
    pub const fn from_parts(
        root: Poly,
        message_hash: [u8; 32],
        participants: Vec<ParticipantEntry>,
        combined_signature: HotsSignature,
    ) -> Self {
        Self { root, message_hash, participants, combined_signature }
    }
}

fn message_hash(message: &[u8]) -> [u8; 32] {
    Sha256::digest(message).into()
}

/// Combine `n >= 1` individual signer contributions on `message` into one
/// [`AggregateSignature`] bound to `tree`'s root (`# 4.6`'s `aggregate`).
///
/// Every individual signature and membership path is checked before
/// combining; a failure names its participant's leaf index rather than
/// failing opaquely.
///
/// # Errors
/// Returns [`AggregateError::Domain`] if `individuals` is empty, any leaf
/// index exceeds the tree's leaf count, or two participants share an index;
/// [`AggregateError::ParticipantFailed`] if a participant's own HOTS
/// signature or membership path does not verify.
pub fn aggregate(
    hots_params: &HotsParams,
    tree: &HvcTree,
    message: &[u8],
    individuals: &[IndividualSignature],
) -> Result<AggregateSignature, AggregateError> {
    if individuals.is_empty() {
        return Err(AggregateError::Domain(DomainError::InvalidParticipantCount {
            n: 0,
            leaf_count_max: tree.leaf_count(),
        }));
    }

    let mut seen_indices = BTreeSet::new();
    for individual in individuals {
        let index = individual.leaf_index();
        if usize::try_from(index).unwrap_or(usize::MAX) >= tree.leaf_count() {
            return Err(AggregateError::Domain(DomainError::IndexOutOfRange {
                index,
                leaf_count_max: u32::try_from(tree.leaf_count()).unwrap_or(u32::MAX),
            }));
        }
        if !seen_indices.insert(index) {
            return Err(AggregateError::Domain(DomainError::DuplicateIndex(index)));
        }

        let hots_valid = chipmunk_hots::verify(hots_params, individual.hots_public_key(), message, individual.hots_signature())?;
        if hots_valid != Validity::Valid {
            return Err(AggregateError::ParticipantFailed { index, reason: ParticipantFailure::HotsSignature });
        }

        let path_valid = HvcTree::verify_path(individual.membership_path(), tree.root(), tree.hasher())?;
        if path_valid != Validity::Valid {
            return Err(AggregateError::ParticipantFailed { index, reason: ParticipantFailure::MembershipPath });
        }
    }

    let mut ordered: Vec<&IndividualSignature> = individuals.iter().collect();
    ordered.sort_by_key(|individual| individual.leaf_index());

    let signatures: Vec<&HotsSignature> = ordered.iter().map(|individual| individual.hots_signature()).collect();
    let combined_signature = chipmunk_hots::combine(&signatures)?;

    let participants = ordered
        .into_iter()
        .map(|individual| ParticipantEntry {
            index: individual.leaf_index(),
            public_key: individual.hots_public_key().clone(),
            path: individual.membership_path().clone(),
        })
        .collect();

    tracing::debug!(n = individuals.len(), "produced aggregate signature");
    Ok(AggregateSignature { root: tree.root().clone(), message_hash: message_hash(message), participants, combined_signature })
}

/// Verify `aggregate` against `message` (`# 4.6`'s `verify`): every
/// participant's path must verify against the stored root, and the
/// combined HOTS equation must hold.
///
/// # Errors
/// Returns [`AggregateError`] only on malformed shapes or a domain
/// precondition violation; a tampered message, path, public key, or
/// combined signature is reported as [`Validity::Invalid`], not an error.
pub fn verify(hots_params: &HotsParams, hvc_hasher: &HvcHasher, aggregate: &AggregateSignature, message: &[u8]) -> Result<Validity, AggregateError> {
    if aggregate.participants.is_empty() {
        return Err(AggregateError::Domain(DomainError::InvalidParticipantCount { n: 0, leaf_count_max: 0 }));
    }

    for participant in &aggregate.participants {
        let path_valid = HvcTree::verify_path(participant.path(), &aggregate.root, hvc_hasher)?;
        if path_valid != Validity::Valid {
            tracing::debug!(index = participant.index(), "aggregate verification rejected: bad membership path");
            return Ok(Validity::Invalid);
        }
    }

    let public_keys: Vec<&HotsPublicKey> = aggregate.participants.iter().map(ParticipantEntry::public_key).collect();
    let equation_valid = chipmunk_hots::verify_combined(hots_params, &public_keys, message, &aggregate.combined_signature)?;

    if equation_valid != Validity::Valid {
        tracing::debug!("aggregate verification rejected: combined HOTS equation failed");
    }
    Ok(equation_valid)
}
