//! Pedersen commitment engine.
//!
//! `commit(v, r) = v·G + r·H` over two G1 generators with no known discrete-log
//! relation. `H` is derived by domain-tagged try-and-increment so neither
//! party can have chosen it with a trapdoor. Commitments are binding and
//! hiding under the discrete-log assumption.

use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::codec::to_canonical_bytes;
use crate::scalar::{BlindingFactor, SecretScalar};

/// A hiding commitment to one secret scalar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Commitment<E: Pairing>(pub E::G1Affine);

impl<E: Pairing> Commitment<E> {
    /// Constant-time equality on canonical encodings; used where a comparison
    /// sits next to secret-derived data.
    pub fn ct_eq(&self, other: &Self) -> bool {
        let a = to_canonical_bytes(&self.0);
        let b = to_canonical_bytes(&other.0);
        a.ct_eq(&b).unwrap_u8() == 1
    }
}

/// The two independent G1 generators commitments are formed over.
#[derive(Clone, Debug)]
pub struct CommitmentBasis<E: Pairing> {
    pub g: E::G1Affine,
    pub h: E::G1Affine,
}

impl<E: Pairing> CommitmentBasis<E> {
    /// Derive a basis from a domain tag. `G` is the curve generator; `H` is
    /// hashed to the curve by try-and-increment, so its discrete log with
    /// respect to `G` is unknown to everyone.
    pub fn derive(domain_tag: &[u8]) -> Self {
        let g = E::G1Affine::generator();
        let h = hash_to_g1::<E>(domain_tag);
        Self { g, h }
    }

    /// `secret·G + blinding·H`. Deterministic and side-effect-free; the
    /// blinding factor must come from the caller's own nonce manager, never
    /// from a counterparty.
    pub fn commit(
        &self,
        secret: &SecretScalar<E::ScalarField>,
        blinding: &BlindingFactor<E::ScalarField>,
    ) -> Commitment<E> {
        let point =
            self.g.into_group() * *secret.expose() + self.h.into_group() * *blinding.expose();
        Commitment(point.into_affine())
    }

    /// `C - value·G`: re-anchors a commitment to `v` as a commitment to
    /// `v - value` under the same blinding. Statement modules use this to tie
    /// sub-proofs back to the original commitment.
    pub fn shift_down(&self, commitment: &Commitment<E>, value: E::ScalarField) -> E::G1Affine {
        (commitment.0.into_group() - self.g.into_group() * value).into_affine()
    }

    /// `value·G - C`: commitment to `value - v` under blinding `-r`.
    pub fn shift_negate(&self, commitment: &Commitment<E>, value: E::ScalarField) -> E::G1Affine {
        (self.g.into_group() * value - commitment.0.into_group()).into_affine()
    }
}

fn hash_to_g1<E: Pairing>(domain_tag: &[u8]) -> E::G1Affine {
    // Two hash blocks cover the base field encoding of every supported curve;
    // from_random_bytes rejects non-canonical or off-curve candidates and we
    // advance the counter until one lands.
    for counter in 0u32.. {
        let mut bytes = Vec::with_capacity(64);
        for block in 0u8..2 {
            let mut hasher = Sha256::new();
            hasher.update(b"ZKEDGE/PEDERSEN/H");
            hasher.update(domain_tag);
            hasher.update(counter.to_le_bytes());
            hasher.update([block]);
            bytes.extend_from_slice(&hasher.finalize());
        }
        if let Some(point) = E::G1Affine::from_random_bytes(&bytes) {
            let cleared = point.clear_cofactor();
            if !cleared.is_zero() {
                return cleared;
            }
        }
    }
    unreachable!("try-and-increment terminates")
}

/// Shared default basis for the BLS12-381 instantiation.
pub static BLS12_381_BASIS: Lazy<CommitmentBasis<ark_bls12_381::Bls12_381>> =
    Lazy::new(|| CommitmentBasis::derive(b"zk-edge-v1"));
