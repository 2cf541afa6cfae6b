//! The homomorphic vector commitment (`# 4.4`, `# 4.5`): a matrix-keyed
//! hash of polynomial pairs, and the membership-proof tree built from it.
//!
//! Depends on `chipmunk-hots` only for [`leaf::leaf_from_hots_public_key`],
//! the bridge `# 2`'s data flow describes ("Convert each HOTS public key to
//! an HVC leaf polynomial") — the hasher and tree themselves know nothing
//! about HOTS.

mod error;
mod hasher;
mod leaf;
mod tree;

pub use error::HvcError;
pub use hasher::HvcHasher;
pub use leaf::leaf_from_hots_public_key;
pub use tree::{HvcTree, MembershipPath};
