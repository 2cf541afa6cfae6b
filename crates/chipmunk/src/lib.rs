//! Chipmunk: a post-quantum, hash-based multi-signature scheme (`# 1`).
//!
//! This crate is the single entry point a caller depends on; the
//! `chipmunk-*` crates underneath it each own one layer of `# 2`'s causal
//! chain (ring arithmetic, seed expansion, one-time signing, vector
//! commitment, aggregation, byte encoding) and are reachable directly for
//! callers that only need one layer, but most callers should use the
//! re-exports here plus [`health_check`].
//!
//! ```text
//! keygen -> sign -> (HVC leaf, tree build) -> individual verify
//!        -> aggregate -> aggregate verify
//! ```

mod health;

pub use chipmunk_aggregate::{aggregate, verify as verify_aggregate, AggregateError, AggregateSignature, IndividualSignature, ParticipantEntry, ParticipantFailure};
pub use chipmunk_codec::{
    decode_aggregate_signature, decode_hots_public_key, decode_hots_secret_key, decode_hots_signature,
    decode_membership_path, decode_poly, encode_aggregate_signature, encode_hots_public_key, encode_hots_secret_key,
    encode_hots_signature, encode_membership_path, encode_poly, CodecError,
};
pub use chipmunk_core::{DomainError, DomainParams, Seed, Validity};
pub use chipmunk_hots::{combine, keygen, norm_bound, sign, verify, verify_combined, HotsError, HotsParams, HotsPublicKey, HotsSecretKey, HotsSignature};
pub use chipmunk_hvc::{leaf_from_hots_public_key, HvcError, HvcHasher, HvcTree, MembershipPath};
pub use chipmunk_ring::Poly;
pub use health::{health_check, HealthCheckError, HealthReport, StageResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_chain_round_trips_through_the_facade() {
        let domain_params = DomainParams::compact();
        let hots_params = HotsParams::setup(domain_params);
        let hvc_hasher = HvcHasher::init(&Seed::new([9; 32]), domain_params);

        let message = b"facade smoke test";
        let mut leaves = Vec::new();
        let mut individuals = Vec::new();
        for i in 0..3u8 {
            let (pk, sk) = keygen(&hots_params, &Seed::new([i.wrapping_add(20); 32]), 0).expect("valid params");
            let sig = sign(&hots_params, &sk, message).expect("valid sk");
            leaves.push(leaf_from_hots_public_key(&pk, domain_params).expect("ntt pk"));
            individuals.push((u32::from(i), sig, pk));
        }
        let tree = HvcTree::build(hvc_hasher.clone(), leaves, 3).expect("valid build");
        let individuals: Vec<_> = individuals
            .into_iter()
            .map(|(index, sig, pk)| {
                let path = tree.gen_proof(index).expect("index in range");
                IndividualSignature::new(index, sig, pk, path)
            })
            .collect();

        let agg = aggregate(&hots_params, &tree, message, &individuals).expect("all valid");
        let bytes = encode_aggregate_signature(&agg, &domain_params);
        let decoded = decode_aggregate_signature(&bytes, &domain_params).expect("valid encoding");
        let validity = verify_aggregate(&hots_params, &hvc_hasher, &decoded, message).expect("valid shapes");
        assert_eq!(validity, Validity::Valid);
    }
}
