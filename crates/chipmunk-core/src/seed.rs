//! Seed type shared by the sampler and HOTS key generation.
//!
//! Grounded on `zair-sdk::seed::parse_seed_hex`, which wraps a decoded seed
//! in `zeroize::Zeroizing` immediately so it is scrubbed on drop even on an
//! early return. `Seed` generalizes that pattern into a reusable newtype
//! instead of an ad-hoc wrapper at each call site.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A 32-byte seed for deterministic key derivation.
///
/// Derives [`ZeroizeOnDrop`] so the bytes are scrubbed when the seed goes
/// out of scope, matching `# 3`'s lifecycle note that "the HOTS secret is
/// burned after one signature in the caller's discipline" — the seed that
/// produced it deserves the same treatment.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; 32]);

impl Seed {
    /// Wrap a 32-byte buffer as a seed.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Borrow the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for Seed {
    /// Deliberately redacted: a seed must never appear in a log line or a
    /// debug dump, only in the byte buffer a caller explicitly asked for.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Seed(..)")
    }
}

impl From<[u8; 32]> for Seed {
    fn from(bytes: [u8; 32]) -> Self {
        Self::new(bytes)
    }
}
