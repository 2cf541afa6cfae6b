//! `HVCTree` and `MembershipPath` (`# 4.5`): a balanced binary tree of HVC
//! polynomials over up to `LEAF_COUNT_MAX` leaves, with membership-proof
//! generation and verification.
//!
//! Sized to `ceil(log2(n)) + 1` levels for the actual leaf count `n`, not a
//! fixed `CHIPMUNK_TREE_LEAF_COUNT_DEFAULT`-style constant — `# 9`'s design
//! note flags the original's fixed padding as "a performance hazard for
//! small n", so this reimplementation grows the tree to fit `n` instead.

use chipmunk_core::verify::{DomainError, Validity};
use chipmunk_ring::Poly;

use crate::error::HvcError;
use crate::hasher::HvcHasher;

/// Smallest `H >= 2` such that `2^(H-1) >= n` (`# 4.5`'s height formula,
/// clamped to the "at least 2" floor so even `n = 1` has one sibling level).
fn tree_height(n: usize) -> u32 {
    if n <= 2 {
        return 2;
    }
    #[allow(clippy::arithmetic_side_effects, reason = "n > 2 here, so n - 1 cannot underflow")]
    let ceil_log2 = usize::BITS - (n - 1).leading_zeros();
    ceil_log2.saturating_add(1)
}

/// The ordered sequence of sibling polynomials from a leaf to the root,
/// plus the leaf index and the leaf itself (`# 4.5`'s `MembershipPath`:
/// "length = tree height - 1 ... the leaf itself is the final element
/// carried in the path").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipPath {
    index: u32,
    leaf: Poly,
    siblings: Vec<Poly>,
}

impl MembershipPath {
    /// The leaf's position in the (padded) tree.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// The leaf polynomial this path proves membership of.
    #[must_use]
    pub const fn leaf(&self) -> &Poly {
        &self.leaf
    }

    /// The sibling polynomials, ordered from leaf level upward.
    #[must_use]
    pub fn siblings(&self) -> &[Poly] {
        &self.siblings
    }

    /// Rebuild a membership path from its decoded parts, for `chipmunk-codec`.
    #[must_use]
    pub const fn from_parts(index: u32, leaf: Poly, siblings: Vec<Poly>) -> Self {
        Self { index, leaf, siblings }
    }
}

/// A balanced binary tree of `Rq_hvc` polynomials (`# 4.5`'s `HVCTree`):
/// owns the hasher, the padded leaf array, and every internal level up to
/// the cached root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HvcTree {
    hasher: HvcHasher,
    levels: Vec<Vec<Poly>>,
    leaf_count: usize,
}

impl HvcTree {
    /// Build a tree over `leaves[..n]`, padding with the hasher's canonical
    /// zero polynomial up to `2^(height-1)` (`# 4.5`'s `build`).
    ///
    /// # Errors
    /// Returns [`HvcError`] if `n` is zero, exceeds `leaf_count_max`, or
    /// exceeds `leaves.len()`.
    pub fn build(hasher: HvcHasher, leaves: Vec<Poly>, n: usize) -> Result<Self, HvcError> {
        let leaf_count_max = hasher.domain_params().leaf_count_max() as usize;
        if n == 0 || n > leaf_count_max {
            return Err(HvcError::Domain(DomainError::InvalidParticipantCount { n, leaf_count_max }));
        }
        if n > leaves.len() {
            return Err(HvcError::Domain(DomainError::InvalidParticipantCount { n, leaf_count_max: leaves.len() }));
        }

        let height = tree_height(n);
        let padded_len = 1usize << (height.saturating_sub(1));
        let mut level0: Vec<Poly> = leaves.into_iter().take(n).collect();
        level0.resize_with(padded_len, || hasher.zero_leaf());

        let mut levels = vec![level0];
        while levels.len() < height as usize {
            #[allow(clippy::indexing_slicing, reason = "levels is non-empty; just pushed above")]
            let prior = &levels[levels.len() - 1];
            let mut next = Vec::with_capacity(prior.len() / 2);
            for pair in prior.chunks_exact(2) {
                #[allow(clippy::indexing_slicing, reason = "chunks_exact(2) guarantees two elements")]
                next.push(hasher.hash_pair(&pair[0], &pair[1])?);
            }
            levels.push(next);
        }

        tracing::debug!(n, height, padded_len, "built HVC tree");
        Ok(Self { hasher, levels, leaf_count: n })
    }

    /// The number of real (non-padding) leaves this tree was built over.
    #[must_use]
    pub const fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// The tree's height (number of levels, including the leaf level).
    #[must_use]
    pub fn height(&self) -> u32 {
        u32::try_from(self.levels.len()).unwrap_or(u32::MAX)
    }

    /// The root polynomial (the top, single-element level).
    #[must_use]
    pub fn root(&self) -> &Poly {
        #[allow(clippy::indexing_slicing, reason = "build always produces at least one level with one element")]
        let top = &self.levels[self.levels.len() - 1];
        #[allow(clippy::indexing_slicing, reason = "the top level always has exactly one node")]
        &top[0]
    }

    /// The hasher this tree was built with; callers verifying a path must
    /// reuse this same hasher (`# 3`'s invariant).
    #[must_use]
    pub const fn hasher(&self) -> &HvcHasher {
        &self.hasher
    }

    /// Generate a membership path for the leaf at `index` (`# 4.5`'s
    /// `gen_proof`).
    ///
    /// # Errors
    /// Returns [`HvcError`] if `index` is outside the (padded) leaf range.
    pub fn gen_proof(&self, index: u32) -> Result<MembershipPath, HvcError> {
        #[allow(clippy::indexing_slicing, reason = "levels is non-empty by construction")]
        let level0 = &self.levels[0];
        let idx = usize::try_from(index).unwrap_or(usize::MAX);
        let Some(leaf) = level0.get(idx) else {
            let leaf_count_max = level0.len();
            return Err(HvcError::Domain(DomainError::IndexOutOfRange { index, leaf_count_max: leaf_count_max as u32 }));
        };

        let mut siblings = Vec::with_capacity(self.levels.len().saturating_sub(1));
        let mut current_index = idx;
        for level in &self.levels[..self.levels.len().saturating_sub(1)] {
            let sibling_index = current_index ^ 1;
            #[allow(clippy::indexing_slicing, reason = "sibling_index < level.len() by pairing invariant")]
            siblings.push(level[sibling_index].clone());
            current_index /= 2;
        }

        Ok(MembershipPath { index, leaf: leaf.clone(), siblings })
    }

    /// Verify `path` against `expected_root` under `hasher` (`# 4.5`'s
    /// `verify_path`): recompute from the leaf upward, combining with each
    /// sibling in the order bit `k` of the index selects.
    ///
    /// # Errors
    /// Returns [`HvcError`] only if a hash step hits a domain precondition
    /// violation; a mismatched root is reported as [`Validity::Invalid`],
    /// not an error.
    pub fn verify_path(path: &MembershipPath, expected_root: &Poly, hasher: &HvcHasher) -> Result<Validity, HvcError> {
        let mut current = path.leaf.clone();
        let mut index = path.index;
        for sibling in &path.siblings {
            let (left, right) = if index.is_multiple_of(2) { (&current, sibling) } else { (sibling, &current) };
            current = hasher.hash_pair(left, right)?;
            index /= 2;
        }
        let matches = current == *expected_root;
        if !matches {
            tracing::debug!("HVC membership path failed to verify against expected root");
        }
        Ok(Validity::from_bool(matches))
    }
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::indexing_slicing,
        clippy::as_conversions,
        reason = "test fixtures index small fixed-size vectors and cast known-in-range test constants"
    )]
    use super::*;
    use chipmunk_core::{DomainParams, Seed};

    fn sample_leaves(hasher: &HvcHasher, count: usize) -> Vec<Poly> {
        let dp = hasher.domain_params();
        (0..count)
            .map(|i| {
                chipmunk_sampler::expand_matrix(&[i as u8], b"test-leaf", 1, dp.n as usize, dp.q_hvc)
                    .into_iter()
                    .next()
                    .expect("one element requested")
            })
            .collect()
    }

    #[test]
    fn every_leaf_proof_verifies() {
        let hasher = HvcHasher::init(&Seed::new([1; 32]), DomainParams::compact());
        let leaves = sample_leaves(&hasher, 8);
        let tree = HvcTree::build(hasher.clone(), leaves, 8).expect("valid build");
        for i in 0..8u32 {
            let path = tree.gen_proof(i).expect("index in range");
            let validity = HvcTree::verify_path(&path, tree.root(), &hasher).expect("valid path shape");
            assert_eq!(validity, Validity::Valid, "leaf {i} failed to verify");
        }
    }

    #[test]
    fn corrupting_a_sibling_invalidates_the_proof() {
        let hasher = HvcHasher::init(&Seed::new([2; 32]), DomainParams::compact());
        let leaves = sample_leaves(&hasher, 4);
        let tree = HvcTree::build(hasher.clone(), leaves, 4).expect("valid build");
        let mut path = tree.gen_proof(1).expect("index in range");
        let mut coeffs = path.siblings[0].coeffs().to_vec();
        coeffs[0] ^= 1;
        path.siblings[0] = Poly::from_coeffs(coeffs, hasher.domain_params().q_hvc);
        let validity = HvcTree::verify_path(&path, tree.root(), &hasher).expect("valid path shape");
        assert_eq!(validity, Validity::Invalid);
    }

    #[test]
    fn corrupting_the_leaf_invalidates_the_proof() {
        let hasher = HvcHasher::init(&Seed::new([3; 32]), DomainParams::compact());
        let leaves = sample_leaves(&hasher, 8);
        let tree = HvcTree::build(hasher.clone(), leaves, 8).expect("valid build");
        for index in [0u32, 1, 4, 7] {
            let mut path = tree.gen_proof(index).expect("index in range");
            let mut coeffs = path.leaf.coeffs().to_vec();
            coeffs[0] ^= 1;
            path.leaf = Poly::from_coeffs(coeffs, hasher.domain_params().q_hvc);
            let validity = HvcTree::verify_path(&path, tree.root(), &hasher).expect("valid path shape");
            assert_eq!(validity, Validity::Invalid, "index {index}");
        }
    }

    #[test]
    fn single_leaf_tree_has_trivial_path() {
        let hasher = HvcHasher::init(&Seed::new([4; 32]), DomainParams::compact());
        let leaves = sample_leaves(&hasher, 1);
        let tree = HvcTree::build(hasher.clone(), leaves, 1).expect("valid build");
        let path = tree.gen_proof(0).expect("index in range");
        assert_eq!(path.siblings().len(), 1);
        let validity = HvcTree::verify_path(&path, tree.root(), &hasher).expect("valid path shape");
        assert_eq!(validity, Validity::Valid);
    }

    #[test]
    fn leaf_count_max_tree_builds_and_verifies() {
        let dp = DomainParams::compact();
        let hasher = HvcHasher::init(&Seed::new([5; 32]), dp);
        let max = dp.leaf_count_max() as usize;
        let leaves = sample_leaves(&hasher, max);
        let tree = HvcTree::build(hasher.clone(), leaves, max).expect("valid build");
        for i in [0u32, 1, (max / 2) as u32, (max - 1) as u32] {
            let path = tree.gen_proof(i).expect("index in range");
            assert_eq!(HvcTree::verify_path(&path, tree.root(), &hasher).expect("valid shape"), Validity::Valid);
        }
    }

    #[test]
    fn rejects_zero_participants() {
        let hasher = HvcHasher::init(&Seed::new([6; 32]), DomainParams::compact());
        let leaves = sample_leaves(&hasher, 1);
        assert!(HvcTree::build(hasher, leaves, 0).is_err());
    }

    #[test]
    fn rejects_n_over_leaf_count_max() {
        let dp = DomainParams::compact();
        let hasher = HvcHasher::init(&Seed::new([7; 32]), dp);
        let max = dp.leaf_count_max() as usize;
        let leaves = sample_leaves(&hasher, max);
        assert!(HvcTree::build(hasher, leaves, max + 1).is_err());
    }
}

#[cfg(test)]
mod proptests {
    #![allow(
        clippy::indexing_slicing,
        clippy::as_conversions,
        reason = "test fixtures index small fixed-size vectors and cast known-in-range test constants"
    )]
    use super::*;
    use chipmunk_core::{DomainParams, Seed};
    use proptest::prelude::*;

    fn leaves_for(hasher: &HvcHasher, count: usize, tag: u8) -> Vec<Poly> {
        let dp = hasher.domain_params();
        (0..count)
            .map(|i| {
                let byte = u8::try_from(i).unwrap_or(u8::MAX).wrapping_add(tag);
                chipmunk_sampler::expand_matrix(&[byte], b"proptest-leaf", 1, dp.n as usize, dp.q_hvc)
                    .into_iter()
                    .next()
                    .expect("one element requested")
            })
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// `# 8`: "for any tree built from leaves L[0..n): for every i in
        /// [0, n), verify_path(gen_proof(i), root(), hasher) == true".
        #[test]
        fn every_leaf_in_every_tree_size_verifies(n in 1usize..=16, seed_tag in any::<u8>(), index_tag in 0u32..16) {
            let hasher = HvcHasher::init(&Seed::new([seed_tag; 32]), DomainParams::compact());
            let leaves = leaves_for(&hasher, n, seed_tag);
            let tree = HvcTree::build(hasher.clone(), leaves, n).expect("n within bounds");
            let index = index_tag % u32::try_from(n).unwrap_or(1);
            let path = tree.gen_proof(index).expect("index in range");
            let validity = HvcTree::verify_path(&path, tree.root(), &hasher).expect("valid shape");
            prop_assert_eq!(validity, Validity::Valid);
        }

        /// `# 8`: "for any tree and any i, if any byte of a sibling in
        /// gen_proof(i) is flipped, verify_path(...) == false".
        #[test]
        fn flipping_a_sibling_byte_invalidates_the_proof(n in 2usize..=16, seed_tag in any::<u8>(), index_tag in 0u32..16) {
            let hasher = HvcHasher::init(&Seed::new([seed_tag; 32]), DomainParams::compact());
            let leaves = leaves_for(&hasher, n, seed_tag);
            let tree = HvcTree::build(hasher.clone(), leaves, n).expect("n within bounds");
            let index = index_tag % u32::try_from(n).unwrap_or(1);
            let mut path = tree.gen_proof(index).expect("index in range");
            let mut coeffs = path.siblings[0].coeffs().to_vec();
            coeffs[0] ^= 1;
            path.siblings[0] = Poly::from_coeffs(coeffs, hasher.domain_params().q_hvc);
            let validity = HvcTree::verify_path(&path, tree.root(), &hasher).expect("valid shape");
            prop_assert_eq!(validity, Validity::Invalid);
        }
    }
}
