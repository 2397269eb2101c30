//! Transcript signatures.
//!
//! Schnorr over G1 with a domain-tagged SHA-256 challenge. The signature
//! covers the exact canonical bytes of the transcript payload; any mismatch is
//! a hard rejection, there is no partial trust in a transcript.

use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup, PrimeGroup};
use ark_ff::{PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::UniformRand;
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use crate::codec::absorb;

/// Public verification key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct VerifyingKey<E: Pairing>(pub E::G1Affine);

/// Signing keypair. The secret scalar is cleared on drop.
#[derive(Debug)]
pub struct Keypair<E: Pairing> {
    sk: E::ScalarField,
    pk: VerifyingKey<E>,
}

impl<E: Pairing> Keypair<E> {
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let sk = E::ScalarField::rand(rng);
        let pk = VerifyingKey((E::G1::generator() * sk).into_affine());
        Self { sk, pk }
    }

    pub fn verifying_key(&self) -> &VerifyingKey<E> {
        &self.pk
    }

    pub fn sign<R: RngCore + CryptoRng>(&self, payload: &[u8], rng: &mut R) -> Signature<E> {
        let k = E::ScalarField::rand(rng);
        let nonce_point = (E::G1::generator() * k).into_affine();
        let e = challenge::<E>(&nonce_point, &self.pk, payload);
        Signature {
            nonce_point,
            response: k + e * self.sk,
        }
    }
}

impl<E: Pairing> Drop for Keypair<E> {
    fn drop(&mut self) {
        self.sk = E::ScalarField::zero();
    }
}

#[derive(Clone, Debug, CanonicalSerialize, CanonicalDeserialize)]
pub struct Signature<E: Pairing> {
    pub nonce_point: E::G1Affine,
    pub response: E::ScalarField,
}

/// `s·G == R + e·pk` over the recomputed challenge.
pub fn verify_signature<E: Pairing>(
    pk: &VerifyingKey<E>,
    payload: &[u8],
    signature: &Signature<E>,
) -> bool {
    let e = challenge::<E>(&signature.nonce_point, pk, payload);
    let lhs = E::G1::generator() * signature.response;
    let rhs = signature.nonce_point.into_group() + pk.0.into_group() * e;
    lhs == rhs
}

fn challenge<E: Pairing>(
    nonce_point: &E::G1Affine,
    pk: &VerifyingKey<E>,
    payload: &[u8],
) -> E::ScalarField {
    let mut hasher = Sha256::new();
    hasher.update(b"ZKEDGE/SIG");
    absorb(&mut hasher, nonce_point);
    absorb(&mut hasher, &pk.0);
    hasher.update(payload);
    E::ScalarField::from_le_bytes_mod_order(&hasher.finalize())
}
