//! Canonical (hardened) serialization and domain-tagged hashing helpers.
//!
//! All wire bytes go through compressed encoding with canonical validation on
//! the way back in. Every Fiat-Shamir challenge and context digest in the
//! crate is a SHA-256 over a domain tag followed by canonical encodings, so
//! two different hash sites can never collide on input bytes.

use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, Compress, Validate};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Serialize to canonical compressed bytes.
pub fn to_canonical_bytes<T: CanonicalSerialize>(value: &T) -> Vec<u8> {
    let mut out = Vec::new();
    value
        .serialize_with_mode(&mut out, Compress::Yes)
        .expect("in-memory serialization");
    out
}

/// Deserialize with canonical validation (Validate::Yes) from a byte slice.
pub fn from_canonical_bytes<T: CanonicalDeserialize>(bytes: &[u8]) -> Result<T> {
    let mut cursor = std::io::Cursor::new(bytes);
    T::deserialize_with_mode(&mut cursor, Compress::Yes, Validate::Yes).map_err(|_| Error::Decoding)
}

/// Absorb a group element or scalar into a running hash via its canonical
/// compressed encoding.
pub fn absorb<T: CanonicalSerialize>(hasher: &mut Sha256, value: &T) {
    let mut bytes = Vec::new();
    value
        .serialize_compressed(&mut bytes)
        .expect("in-memory serialization");
    hasher.update(&bytes);
}

/// Domain-tagged SHA-256 over raw byte chunks.
pub fn tagged_digest(tag: &[u8], chunks: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(tag);
    for chunk in chunks {
        hasher.update(chunk);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Reduce a finished tagged hash into the scalar field.
pub fn digest_to_scalar<F: PrimeField>(hasher: Sha256) -> F {
    F::from_le_bytes_mod_order(&hasher.finalize())
}

/// Domain-tagged hash-to-field over raw byte chunks. Used to encode
/// categorical labels as committed scalars.
pub fn hash_to_scalar<F: PrimeField>(tag: &[u8], chunks: &[&[u8]]) -> F {
    F::from_le_bytes_mod_order(&tagged_digest(tag, chunks))
}
