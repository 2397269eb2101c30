//! Two-role party capability set.
//!
//! Prover and verifier are the same capability set, not a hierarchy: either
//! side can commit, prove, sign, issue challenges, and check transcripts. A
//! party owns its signing keypair and its nonce manager; blinding factors for
//! its own secrets never come from anywhere else.

use ark_ec::pairing::Pairing;
use ark_std::UniformRand;
use rand_core::{CryptoRng, RngCore};

use crate::binding::bind_challenge;
use crate::codec::to_canonical_bytes;
use crate::context::{ContextId, SessionBinding};
use crate::engine::{self, VerificationResult};
use crate::error::Result;
use crate::membership::prove_membership;
use crate::nonce::NonceManager;
use crate::pedersen::CommitmentBasis;
use crate::range::prove_range;
use crate::scalar::SecretScalar;
use crate::sig::{Keypair, VerifyingKey};
use crate::statement::Statement;
use crate::transcript::{ProofBody, ProofTranscript, StatementProof};

pub struct Party<E: Pairing> {
    keypair: Keypair<E>,
    nonces: NonceManager<E::ScalarField>,
}

impl<E: Pairing> Party<E> {
    /// Fresh keypair, true-random blinding issuance.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self {
            keypair: Keypair::generate(rng),
            nonces: NonceManager::random(),
        }
    }

    /// Assemble a party from existing key material and a configured nonce
    /// manager (deterministic mode, persistent store).
    pub fn new(keypair: Keypair<E>, nonces: NonceManager<E::ScalarField>) -> Self {
        Self { keypair, nonces }
    }

    pub fn verifying_key(&self) -> &VerifyingKey<E> {
        self.keypair.verifying_key()
    }

    /// Verifier role: issue a fresh session challenge.
    pub fn issue_challenge<R: RngCore + CryptoRng>(rng: &mut R) -> E::ScalarField {
        E::ScalarField::rand(rng)
    }

    /// Prover role: commit to a numeric inference, prove it lies in
    /// `[low, high]`, bind the verifier's challenge, sign, and assemble the
    /// wire transcript. The secret and its blinding are dropped (and cleared)
    /// before this returns.
    #[allow(clippy::too_many_arguments)]
    pub fn attest_range<R, F>(
        &self,
        basis: &CommitmentBasis<E>,
        ctx: &ContextId,
        value: u64,
        low: u64,
        high: u64,
        challenge: &E::ScalarField,
        inference: F,
        rng: &mut R,
    ) -> Result<ProofTranscript<E>>
    where
        R: RngCore + CryptoRng,
        F: Fn(&E::ScalarField) -> E::ScalarField,
    {
        let secret = SecretScalar::from_u64(value);
        let blinding = self.nonces.next_blinding(ctx, rng)?;
        let commitment = basis.commit(&secret, &blinding);
        let session = SessionBinding::new(ctx, challenge);

        let range = prove_range(basis, &commitment, value, &blinding, low, high, &session, rng)?;
        let proof = StatementProof {
            commitment,
            body: ProofBody::Range(range),
        };
        let statement = Statement::Range { low, high };
        let binding = bind_challenge(inference, challenge, &secret, &commitment);

        Ok(self.sign_and_assemble(proof, statement, binding, rng))
    }

    /// Prover role: commit to a categorical inference and prove it belongs to
    /// the public allowed set.
    #[allow(clippy::too_many_arguments)]
    pub fn attest_membership<R, F>(
        &self,
        basis: &CommitmentBasis<E>,
        ctx: &ContextId,
        secret: SecretScalar<E::ScalarField>,
        allowed: Vec<E::ScalarField>,
        challenge: &E::ScalarField,
        inference: F,
        rng: &mut R,
    ) -> Result<ProofTranscript<E>>
    where
        R: RngCore + CryptoRng,
        F: Fn(&E::ScalarField) -> E::ScalarField,
    {
        let blinding = self.nonces.next_blinding(ctx, rng)?;
        let commitment = basis.commit(&secret, &blinding);
        let session = SessionBinding::new(ctx, challenge);

        let membership = prove_membership(
            basis,
            &commitment,
            &secret,
            &blinding,
            &allowed,
            &session,
            rng,
        )?;
        let proof = StatementProof {
            commitment,
            body: ProofBody::Membership(membership),
        };
        let statement = Statement::Membership { allowed };
        let binding = bind_challenge(inference, challenge, &secret, &commitment);

        Ok(self.sign_and_assemble(proof, statement, binding, rng))
    }

    fn sign_and_assemble<R: RngCore + CryptoRng>(
        &self,
        proof: StatementProof<E>,
        statement: Statement<E::ScalarField>,
        binding: crate::binding::ChallengeBindingProof<E>,
        rng: &mut R,
    ) -> ProofTranscript<E> {
        let binding_bytes = to_canonical_bytes(&binding);
        let payload =
            ProofTranscript::<E>::signing_payload(&proof.to_bytes(), &statement, &binding_bytes);
        let signature = self.keypair.sign(&payload, rng);
        ProofTranscript::assemble(signature, &proof, statement, &binding)
    }

    /// Verifier role: run the verification engine against a counterparty
    /// transcript.
    pub fn check<F>(
        &self,
        basis: &CommitmentBasis<E>,
        transcript: &ProofTranscript<E>,
        peer: &VerifyingKey<E>,
        ctx: &ContextId,
        challenge: &E::ScalarField,
        inference: F,
    ) -> VerificationResult
    where
        F: Fn(&E::ScalarField) -> E::ScalarField,
    {
        engine::verify(basis, transcript, peer, ctx, challenge, inference)
    }
}
