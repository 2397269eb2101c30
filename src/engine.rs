//! Transcript verification engine.
//!
//! Stateless and safe to call on untrusted input: nothing here returns an
//! error past the engine boundary. Checks run in strict order (signature,
//! challenge binding, then the statement-specific proof) and short-circuit
//! with the first failing stage as a reason code. On all-pass, opaque decision
//! data folds through an application-supplied predicate to produce the final
//! decision-usable result.

use ark_ec::pairing::Pairing;
use rayon::prelude::*;

use crate::context::{ContextId, SessionBinding};
use crate::pedersen::CommitmentBasis;
use crate::sig::{verify_signature, VerifyingKey};
use crate::statement::Statement;
use crate::transcript::{ProofBody, ProofTranscript, StatementProof};

/// Why a transcript was rejected; the first failing stage wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Embedded bytes did not decode canonically.
    MalformedEncoding,
    SignatureInvalid,
    ChallengeBindingFailed,
    ProofVerificationFailed,
    /// All cryptographic checks passed but the decision predicate declined.
    DecisionDeclined,
}

/// Outcome of checking one transcript. Consumed by external decision logic;
/// never re-enters the protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerificationResult {
    Accept,
    Reject(RejectReason),
}

impl VerificationResult {
    pub fn is_accept(&self) -> bool {
        matches!(self, VerificationResult::Accept)
    }
}

/// Run the full check sequence against a transcript.
///
/// `challenge` is the scalar this verifier issued for the session; `ctx` is
/// the session context the prover was expected to bind to.
pub fn verify<E, F>(
    basis: &CommitmentBasis<E>,
    transcript: &ProofTranscript<E>,
    peer: &VerifyingKey<E>,
    ctx: &ContextId,
    challenge: &E::ScalarField,
    inference: F,
) -> VerificationResult
where
    E: Pairing,
    F: Fn(&E::ScalarField) -> E::ScalarField,
{
    // Stage 1: provenance. Nothing else is inspected before this holds.
    if !verify_signature(peer, &transcript.payload(), &transcript.signature) {
        return VerificationResult::Reject(RejectReason::SignatureInvalid);
    }

    let proof = match transcript.decode_proof() {
        Ok(proof) => proof,
        Err(_) => return VerificationResult::Reject(RejectReason::MalformedEncoding),
    };
    let binding = match transcript.decode_binding() {
        Ok(binding) => binding,
        Err(_) => return VerificationResult::Reject(RejectReason::MalformedEncoding),
    };

    // Stage 2: the proof must be about the challenged computation.
    if !crate::binding::verify_challenge_binding(&inference, challenge, &proof.commitment, &binding)
    {
        return VerificationResult::Reject(RejectReason::ChallengeBindingFailed);
    }

    // Stage 3: statement dispatch, exhaustive over the closed variant set.
    if transcript.statement.validate().is_err() {
        return VerificationResult::Reject(RejectReason::ProofVerificationFailed);
    }
    let session = SessionBinding::new(ctx, challenge);
    let proof_ok = match (&transcript.statement, &proof) {
        (
            Statement::Range { low, high },
            StatementProof {
                commitment,
                body: ProofBody::Range(range),
            },
        ) => crate::range::verify_range(basis, commitment, *low, *high, &session, range),
        (
            Statement::Membership { allowed },
            StatementProof {
                commitment,
                body: ProofBody::Membership(membership),
            },
        ) => {
            crate::membership::verify_membership(basis, commitment, allowed, &session, membership)
        }
        // Statement kind and proof kind disagree.
        _ => false,
    };
    if !proof_ok {
        return VerificationResult::Reject(RejectReason::ProofVerificationFailed);
    }

    VerificationResult::Accept
}

/// [`verify`], then fold the verified statement through the caller's decision
/// predicate. The predicate closes over whatever (possibly hidden) decision
/// data the verifier holds; the engine never inspects it.
pub fn verify_and_decide<E, F, D>(
    basis: &CommitmentBasis<E>,
    transcript: &ProofTranscript<E>,
    peer: &VerifyingKey<E>,
    ctx: &ContextId,
    challenge: &E::ScalarField,
    inference: F,
    decide: D,
) -> VerificationResult
where
    E: Pairing,
    F: Fn(&E::ScalarField) -> E::ScalarField,
    D: FnOnce(&Statement<E::ScalarField>) -> bool,
{
    match verify(basis, transcript, peer, ctx, challenge, inference) {
        VerificationResult::Accept => {
            if decide(&transcript.statement) {
                VerificationResult::Accept
            } else {
                VerificationResult::Reject(RejectReason::DecisionDeclined)
            }
        }
        reject => reject,
    }
}

/// One transcript plus the session material it must be checked against.
pub struct BatchItem<'a, E: Pairing> {
    pub transcript: &'a ProofTranscript<E>,
    pub peer: &'a VerifyingKey<E>,
    pub ctx: ContextId,
    pub challenge: E::ScalarField,
}

/// Check many transcripts in parallel. Verification is read-only, so items
/// split freely across threads.
pub fn verify_batch<E, F>(
    basis: &CommitmentBasis<E>,
    items: &[BatchItem<'_, E>],
    inference: F,
) -> Vec<VerificationResult>
where
    E: Pairing,
    F: Fn(&E::ScalarField) -> E::ScalarField + Sync,
{
    items
        .par_iter()
        .map(|item| {
            verify(
                basis,
                item.transcript,
                item.peer,
                &item.ctx,
                &item.challenge,
                &inference,
            )
        })
        .collect()
}
