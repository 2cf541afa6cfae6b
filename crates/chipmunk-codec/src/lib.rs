//! Fixed-endian byte encoding and decoding of Chipmunk keys and signatures
//! (`# 4.7`): big-endian coefficient packing throughout, except the HOTS
//! secret key's `counter` field, which is little-endian as the spec states.
//!
//! Every decoder rejects a buffer whose length isn't exactly what the
//! declared [`chipmunk_core::DomainParams`] requires — no partial decode,
//! no silent truncation.

mod aggregate;
mod bitpack;
mod error;
mod hots;
mod hvc;
mod poly;

pub use aggregate::{decode_aggregate_signature, encode_aggregate_signature};
pub use error::CodecError;
pub use hots::{
    decode_hots_public_key, decode_hots_secret_key, decode_hots_signature, encode_hots_public_key,
    encode_hots_secret_key, encode_hots_signature,
};
pub use hvc::{decode_membership_path, encode_membership_path};
pub use poly::{decode_poly, encode_poly};
