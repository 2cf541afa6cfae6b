//! A counter-mode SHA-256 expansion stream standing in for the
//! "sponge/XOF keyed by the seed" `# 4.2` calls for.
//!
//! `sha2` has no native arbitrary-length XOF (unlike SHAKE), but the
//! standard counter-mode construction — hash `prefix || counter` for
//! increasing `counter` and concatenate the digests — gives the same
//! deterministic, seed-keyed, arbitrary-length byte stream property the
//! spec asks for, and keeps the dependency set aligned with the teacher's
//! stack (`sha2` is already a workspace dependency used by `zair-core`).

use sha2::{Digest, Sha256};

/// A deterministic byte stream keyed by `prefix = seed || domain separator`.
pub struct Xof {
    prefix: Vec<u8>,
    counter: u64,
    buffer: Vec<u8>,
    offset: usize,
}

impl Xof {
    /// Start a stream keyed by `seed` bytes under the given domain
    /// separator tag. Distinct tags (e.g. `b"chipmunk-hots-s0"` vs.
    /// `b"chipmunk-hots-s1"`) derive independent streams from the same seed.
    #[must_use]
    pub fn new(seed: &[u8], domain_separator: &[u8]) -> Self {
        let mut prefix = Vec::with_capacity(seed.len() + domain_separator.len() + 1);
        prefix.extend_from_slice(domain_separator);
        prefix.push(0xff); // fixed separator byte between tag and seed
        prefix.extend_from_slice(seed);
        Self {
            prefix,
            counter: 0,
            buffer: Vec::new(),
            offset: 0,
        }
    }

    fn refill(&mut self) {
        let mut hasher = Sha256::new();
        hasher.update(&self.prefix);
        hasher.update(self.counter.to_le_bytes());
        self.buffer = hasher.finalize().to_vec();
        self.offset = 0;
        self.counter = self.counter.wrapping_add(1);
    }

    /// Pull the next byte from the stream.
    pub fn next_byte(&mut self) -> u8 {
        if self.offset >= self.buffer.len() {
            self.refill();
        }
        #[allow(clippy::indexing_slicing, reason = "offset < buffer.len() after refill")]
        let byte = self.buffer[self.offset];
        self.offset += 1;
        byte
    }

    /// Pull the next two bytes as a big-endian `u16`.
    pub fn next_u16(&mut self) -> u16 {
        let hi = self.next_byte();
        let lo = self.next_byte();
        u16::from_be_bytes([hi, lo])
    }

    /// Fill `out` with fresh stream bytes.
    pub fn fill(&mut self, out: &mut [u8]) {
        for slot in out {
            *slot = self.next_byte();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_and_tag_is_deterministic() {
        let mut a = Xof::new(b"seed", b"tag");
        let mut b = Xof::new(b"seed", b"tag");
        let bytes_a: Vec<u8> = (0..100).map(|_| a.next_byte()).collect();
        let bytes_b: Vec<u8> = (0..100).map(|_| b.next_byte()).collect();
        assert_eq!(bytes_a, bytes_b);
    }

    #[test]
    fn distinct_tags_diverge() {
        let mut a = Xof::new(b"seed", b"tag-a");
        let mut b = Xof::new(b"seed", b"tag-b");
        let bytes_a: Vec<u8> = (0..32).map(|_| a.next_byte()).collect();
        let bytes_b: Vec<u8> = (0..32).map(|_| b.next_byte()).collect();
        assert_ne!(bytes_a, bytes_b);
    }

    #[test]
    fn distinct_seeds_diverge() {
        let mut a = Xof::new(b"seed-a", b"tag");
        let mut b = Xof::new(b"seed-b", b"tag");
        assert_ne!(a.next_u16(), b.next_u16());
    }

    #[test]
    fn stream_extends_past_one_block() {
        let mut x = Xof::new(b"seed", b"tag");
        let bytes: Vec<u8> = (0..1000).map(|_| x.next_byte()).collect();
        // Not all-equal across block boundaries (trivially true for SHA-256 output).
        assert!(bytes[..32] != bytes[32..64]);
    }
}
