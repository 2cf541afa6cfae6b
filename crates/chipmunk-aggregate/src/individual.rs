//! `IndividualSignature` (`# 3`): one participant's contribution to an
//! aggregate before combining — their HOTS signature, public key, and HVC
//! membership path, tagged with the leaf index they signed from.

use chipmunk_hots::{HotsPublicKey, HotsSignature};
use chipmunk_hvc::MembershipPath;

/// One signer's materials, ready to be folded into an
/// [`crate::AggregateSignature`] by [`crate::aggregate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndividualSignature {
    leaf_index: u32,
    hots_signature: HotsSignature,
    hots_public_key: HotsPublicKey,
    membership_path: MembershipPath,
}

impl IndividualSignature {
    /// Bundle one signer's HOTS signature, public key, and membership path.
    #[must_use]
    pub const fn new(
        leaf_index: u32,
        hots_signature: HotsSignature,
        hots_public_key: HotsPublicKey,
        membership_path: MembershipPath,
    ) -> Self {
        Self { leaf_index, hots_signature, hots_public_key, membership_path }
    }

    /// This signer's leaf index in the shared tree.
    #[must_use]
    pub const fn leaf_index(&self) -> u32 {
        self.leaf_index
    }

    /// The signer's one-time signature on the aggregate's message.
    #[must_use]
    pub const fn hots_signature(&self) -> &HotsSignature {
        &self.hots_signature
    }

    /// The signer's HOTS public key.
    #[must_use]
    pub const fn hots_public_key(&self) -> &HotsPublicKey {
        &self.hots_public_key
    }

    /// The signer's membership path to the shared tree root.
    #[must_use]
    pub const fn membership_path(&self) -> &MembershipPath {
        &self.membership_path
    }
}
