//! Zero-knowledge set-membership proofs over committed values.
//!
//! Proves that `C = v·G + r·H` commits to one element of a public, enumerated
//! set without revealing which. Membership is treated as a disjunction of
//! equality statements: for each allowed `a_j` the claim is knowledge of `r`
//! with `C - a_j·G = r·H`. Every branch except the real one is simulated
//! against a pre-chosen challenge, and the Fiat-Shamir challenge is split
//! across branches so exactly one must be answered honestly.
//!
//! A singleton set degenerates to a plain Schnorr equality proof; the empty
//! set is rejected as a malformed statement.

use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::UniformRand;
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use crate::codec::absorb;
use crate::context::SessionBinding;
use crate::error::{Error, Result};
use crate::pedersen::{Commitment, CommitmentBasis};
use crate::scalar::{BlindingFactor, SecretScalar};

/// One announcement, branch challenge, and response per set element. The
/// branch challenges must sum to the Fiat-Shamir challenge.
#[derive(Clone, Debug, CanonicalSerialize, CanonicalDeserialize)]
pub struct MembershipProof<E: Pairing> {
    pub announcements: Vec<E::G1Affine>,
    pub challenges: Vec<E::ScalarField>,
    pub responses: Vec<E::ScalarField>,
}

/// Construct a membership proof for `commitment = secret·G + blinding·H`.
///
/// Refuses with [`Error::InvalidStatement`] on an empty set and with
/// [`Error::StatementFalse`] when the secret is not in the set.
pub fn prove_membership<E: Pairing, R: RngCore + CryptoRng>(
    basis: &CommitmentBasis<E>,
    commitment: &Commitment<E>,
    secret: &SecretScalar<E::ScalarField>,
    blinding: &BlindingFactor<E::ScalarField>,
    allowed: &[E::ScalarField],
    session: &SessionBinding,
    rng: &mut R,
) -> Result<MembershipProof<E>> {
    if allowed.is_empty() {
        return Err(Error::InvalidStatement);
    }
    let real = allowed
        .iter()
        .position(|a| a == secret.expose())
        .ok_or(Error::StatementFalse)?;

    let h = basis.h.into_group();
    let m = allowed.len();

    let mut announcements = vec![E::G1Affine::zero(); m];
    let mut challenges = vec![E::ScalarField::zero(); m];
    let mut responses = vec![E::ScalarField::zero(); m];

    // Simulate every branch but the real one.
    for j in 0..m {
        if j == real {
            continue;
        }
        let x_j = E::ScalarField::rand(rng);
        let z_j = E::ScalarField::rand(rng);
        let target = basis.shift_down(commitment, allowed[j]);
        announcements[j] = (h * z_j - target.into_group() * x_j).into_affine();
        challenges[j] = x_j;
        responses[j] = z_j;
    }

    let w = E::ScalarField::rand(rng);
    announcements[real] = (h * w).into_affine();

    let x = challenge::<E>(session, basis, commitment, allowed, &announcements);
    let mut x_real = x;
    for (j, x_j) in challenges.iter().enumerate() {
        if j != real {
            x_real -= x_j;
        }
    }
    challenges[real] = x_real;
    responses[real] = w + x_real * blinding.expose();

    Ok(MembershipProof {
        announcements,
        challenges,
        responses,
    })
}

/// Deterministic, side-effect-free verification. Returns `false` on any
/// malformed or non-verifying proof content.
pub fn verify_membership<E: Pairing>(
    basis: &CommitmentBasis<E>,
    commitment: &Commitment<E>,
    allowed: &[E::ScalarField],
    session: &SessionBinding,
    proof: &MembershipProof<E>,
) -> bool {
    let m = allowed.len();
    if m == 0
        || proof.announcements.len() != m
        || proof.challenges.len() != m
        || proof.responses.len() != m
    {
        return false;
    }

    let x = challenge::<E>(session, basis, commitment, allowed, &proof.announcements);
    let mut sum = E::ScalarField::zero();
    for x_j in &proof.challenges {
        sum += x_j;
    }
    if sum != x {
        return false;
    }

    let h = basis.h.into_group();
    for j in 0..m {
        let target = basis.shift_down(commitment, allowed[j]);
        let lhs = h * proof.responses[j];
        let rhs = proof.announcements[j].into_group() + target.into_group() * proof.challenges[j];
        if lhs != rhs {
            return false;
        }
    }
    true
}

fn challenge<E: Pairing>(
    session: &SessionBinding,
    basis: &CommitmentBasis<E>,
    commitment: &Commitment<E>,
    allowed: &[E::ScalarField],
    announcements: &[E::G1Affine],
) -> E::ScalarField {
    let mut hasher = Sha256::new();
    hasher.update(b"ZKEDGE/FS/MEMBERSHIP");
    hasher.update(session.as_bytes());
    absorb(&mut hasher, &basis.g);
    absorb(&mut hasher, &basis.h);
    absorb(&mut hasher, &commitment.0);
    hasher.update((allowed.len() as u32).to_le_bytes());
    for a in allowed {
        absorb(&mut hasher, a);
    }
    for t in announcements {
        absorb(&mut hasher, t);
    }
    crate::codec::digest_to_scalar(hasher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextId;
    use crate::scalar::label_to_scalar;
    use ark_bls12_381::{Bls12_381, Fr};
    use ark_std::rand::rngs::StdRng;
    use ark_std::rand::SeedableRng;

    type E = Bls12_381;

    fn setup() -> (CommitmentBasis<E>, SessionBinding, StdRng) {
        let basis = CommitmentBasis::derive(b"membership-test");
        let ctx = ContextId::derive(b"verifier", b"tier");
        let session = SessionBinding::new(&ctx, &Fr::from(5u64));
        (basis, session, StdRng::seed_from_u64(9))
    }

    fn tiers() -> Vec<Fr> {
        [b"silver".as_slice(), b"gold", b"bronze"]
            .iter()
            .map(|l| label_to_scalar::<Fr>(l))
            .collect()
    }

    #[test]
    fn completeness_for_each_position() {
        let (basis, session, mut rng) = setup();
        let allowed = tiers();
        for secret_value in &allowed {
            let secret = SecretScalar::new(*secret_value);
            let blinding = BlindingFactor::mint(Fr::rand(&mut rng));
            let c = basis.commit(&secret, &blinding);
            let proof =
                prove_membership(&basis, &c, &secret, &blinding, &allowed, &session, &mut rng)
                    .unwrap();
            assert!(verify_membership(&basis, &c, &allowed, &session, &proof));
        }
    }

    #[test]
    fn singleton_set_degenerates_to_equality() {
        let (basis, session, mut rng) = setup();
        let allowed = vec![label_to_scalar::<Fr>(b"gold")];
        let secret = SecretScalar::new(allowed[0]);
        let blinding = BlindingFactor::mint(Fr::rand(&mut rng));
        let c = basis.commit(&secret, &blinding);
        let proof =
            prove_membership(&basis, &c, &secret, &blinding, &allowed, &session, &mut rng).unwrap();
        assert!(verify_membership(&basis, &c, &allowed, &session, &proof));
    }

    #[test]
    fn absent_secret_refuses_construction() {
        let (basis, session, mut rng) = setup();
        let secret = SecretScalar::new(label_to_scalar::<Fr>(b"gold"));
        let blinding = BlindingFactor::mint(Fr::rand(&mut rng));
        let c = basis.commit(&secret, &blinding);
        let reduced = vec![
            label_to_scalar::<Fr>(b"silver"),
            label_to_scalar::<Fr>(b"bronze"),
        ];
        assert_eq!(
            prove_membership(&basis, &c, &secret, &blinding, &reduced, &session, &mut rng)
                .unwrap_err(),
            Error::StatementFalse
        );
    }

    #[test]
    fn empty_set_refuses_construction() {
        let (basis, session, mut rng) = setup();
        let secret = SecretScalar::new(label_to_scalar::<Fr>(b"gold"));
        let blinding = BlindingFactor::mint(Fr::rand(&mut rng));
        let c = basis.commit(&secret, &blinding);
        assert_eq!(
            prove_membership(&basis, &c, &secret, &blinding, &[], &session, &mut rng).unwrap_err(),
            Error::InvalidStatement
        );
    }

    #[test]
    fn proof_does_not_transfer_to_other_set() {
        let (basis, session, mut rng) = setup();
        let allowed = tiers();
        let secret = SecretScalar::new(allowed[1]);
        let blinding = BlindingFactor::mint(Fr::rand(&mut rng));
        let c = basis.commit(&secret, &blinding);
        let proof =
            prove_membership(&basis, &c, &secret, &blinding, &allowed, &session, &mut rng).unwrap();

        let extended: Vec<Fr> = allowed
            .iter()
            .copied()
            .chain([label_to_scalar::<Fr>(b"platinum")])
            .collect();
        assert!(!verify_membership(&basis, &c, &extended, &session, &proof));
    }

    #[test]
    fn tampered_challenge_split_rejected() {
        let (basis, session, mut rng) = setup();
        let allowed = tiers();
        let secret = SecretScalar::new(allowed[0]);
        let blinding = BlindingFactor::mint(Fr::rand(&mut rng));
        let c = basis.commit(&secret, &blinding);
        let mut proof =
            prove_membership(&basis, &c, &secret, &blinding, &allowed, &session, &mut rng).unwrap();
        proof.challenges[2] += Fr::from(1u64);
        assert!(!verify_membership(&basis, &c, &allowed, &session, &proof));
    }
}
