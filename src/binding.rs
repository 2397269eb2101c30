//! Challenge-response correctness binding.
//!
//! Binds a verifier-issued challenge into the inference pipeline so the prover
//! cannot run the proof machinery on an arbitrary, unchallenged value and
//! substitute it for the real inference. The prover evaluates the opaque
//! inference map at the challenge, at the secret, and at their product, lifts
//! the results to the pairing groups, and the verifier checks
//!
//! `e(f(c)·G1, f(s)·G2) == e(f(c·s)·G1, H2)`
//!
//! recomputing `f(c)·G1` itself from the challenge it issued. The proof also
//! digests the commitment it was produced for, so a binding cannot be moved
//! between commitments. Challenge freshness is the verifier's concern; the
//! challenge arrives here as an opaque, already-fresh scalar.

use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup, PrimeGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::codec::{tagged_digest, to_canonical_bytes};
use crate::pedersen::Commitment;
use crate::scalar::SecretScalar;

/// The pairing-checkable correctness assertion.
#[derive(Clone, Debug, CanonicalSerialize, CanonicalDeserialize)]
pub struct ChallengeBindingProof<E: Pairing> {
    /// `f(challenge)·G1`; recomputed by the verifier.
    pub challenge_eval: E::G1Affine,
    /// `f(secret)·G2`; hides `f(secret)` under discrete log.
    pub secret_eval: E::G2Affine,
    /// `f(challenge·secret)·G1`.
    pub product_eval: E::G1Affine,
    /// Digest of the commitment this binding was produced for.
    pub commitment_digest: [u8; 32],
}

fn commitment_digest<E: Pairing>(commitment: &Commitment<E>) -> [u8; 32] {
    tagged_digest(b"ZKEDGE/BINDING", &[&to_canonical_bytes(&commitment.0)])
}

/// Evaluate the inference map at the challenge, the secret, and their product,
/// and lift the results into the pairing groups.
pub fn bind_challenge<E, F>(
    inference: F,
    challenge: &E::ScalarField,
    secret: &SecretScalar<E::ScalarField>,
    commitment: &Commitment<E>,
) -> ChallengeBindingProof<E>
where
    E: Pairing,
    F: Fn(&E::ScalarField) -> E::ScalarField,
{
    let s = *secret.expose();
    let product = *challenge * s;

    let g1 = E::G1::generator();
    let g2 = E::G2::generator();

    ChallengeBindingProof {
        challenge_eval: (g1 * inference(challenge)).into_affine(),
        secret_eval: (g2 * inference(&s)).into_affine(),
        product_eval: (g1 * inference(&product)).into_affine(),
        commitment_digest: commitment_digest(commitment),
    }
}

/// Recompute the challenge leg and the pairing equation. Rejects a binding
/// produced for any other challenge or commitment.
pub fn verify_challenge_binding<E, F>(
    inference: F,
    challenge: &E::ScalarField,
    commitment: &Commitment<E>,
    proof: &ChallengeBindingProof<E>,
) -> bool
where
    E: Pairing,
    F: Fn(&E::ScalarField) -> E::ScalarField,
{
    if proof.commitment_digest != commitment_digest(commitment) {
        return false;
    }

    let expected = (E::G1::generator() * inference(challenge)).into_affine();
    if proof.challenge_eval != expected {
        return false;
    }

    // Degenerate legs would make the pairing equation vacuous.
    if proof.challenge_eval.is_zero() || proof.secret_eval.is_zero() {
        return false;
    }

    let lhs = E::pairing(proof.challenge_eval, proof.secret_eval);
    let rhs = E::pairing(proof.product_eval, E::G2Affine::generator());
    lhs == rhs
}
