//! Adversarial checks: tampering, substitution, and forgery attempts.

use ark_bls12_381::{Bls12_381, Fr};
use ark_std::rand::rngs::StdRng;
use ark_std::rand::SeedableRng;
use ark_std::UniformRand;

use zk_edge::{
    CommitmentBasis, ContextId, NonceManager, Party, ProofTranscript, RejectReason, SecretScalar,
    SessionBinding, Statement, VerificationResult, BLS12_381_BASIS,
};

type E = Bls12_381;

fn inference(x: &Fr) -> Fr {
    *x
}

struct Session {
    prover: Party<E>,
    verifier: Party<E>,
    ctx: ContextId,
    challenge: Fr,
    transcript: ProofTranscript<E>,
    rng: StdRng,
}

fn range_session(seed: u64) -> Session {
    let mut rng = StdRng::seed_from_u64(seed);
    let prover = Party::<E>::generate(&mut rng);
    let verifier = Party::<E>::generate(&mut rng);
    let ctx = ContextId::derive(b"verifier-1", b"risk-score");
    let challenge = Party::<E>::issue_challenge(&mut rng);
    let transcript = prover
        .attest_range(
            &BLS12_381_BASIS,
            &ctx,
            42,
            0,
            100,
            &challenge,
            inference,
            &mut rng,
        )
        .unwrap();
    Session {
        prover,
        verifier,
        ctx,
        challenge,
        transcript,
        rng,
    }
}

fn check(s: &Session, transcript: &ProofTranscript<E>, challenge: &Fr) -> VerificationResult {
    s.verifier.check(
        &BLS12_381_BASIS,
        transcript,
        s.prover.verifying_key(),
        &s.ctx,
        challenge,
        inference,
    )
}

#[test]
fn any_bit_flip_in_proof_bytes_is_a_signature_reject() {
    let s = range_session(200);
    // Sample positions across the whole field; every flip must die at the
    // signature stage, before any proof content is inspected.
    let len = s.transcript.proof_bytes.len();
    for position in (0..len).step_by((len / 16).max(1)) {
        for bit in [0u8, 3, 7] {
            let mut tampered = s.transcript.clone();
            tampered.proof_bytes[position] ^= 1 << bit;
            assert_eq!(
                check(&s, &tampered, &s.challenge),
                VerificationResult::Reject(RejectReason::SignatureInvalid),
                "flip at byte {position} bit {bit} must invalidate the signature"
            );
        }
    }
}

#[test]
fn bit_flip_in_binding_bytes_is_a_signature_reject() {
    let s = range_session(201);
    let mut tampered = s.transcript.clone();
    let last = tampered.binding_bytes.len() - 1;
    tampered.binding_bytes[last] ^= 0x80;
    assert_eq!(
        check(&s, &tampered, &s.challenge),
        VerificationResult::Reject(RejectReason::SignatureInvalid)
    );
}

#[test]
fn statement_substitution_is_a_signature_reject() {
    let s = range_session(202);
    let mut tampered = s.transcript.clone();
    // Widen the proven range after signing.
    tampered.statement = Statement::Range { low: 0, high: 1000 };
    assert_eq!(
        check(&s, &tampered, &s.challenge),
        VerificationResult::Reject(RejectReason::SignatureInvalid)
    );
}

#[test]
fn attacker_resigned_transcript_rejected() {
    let mut s = range_session(203);
    // An attacker with its own key builds a wider attestation; checked
    // against the honest prover's key it never reaches the proof stage.
    let attacker = Party::<E>::generate(&mut s.rng);
    let widened = attacker
        .attest_range(
            &BLS12_381_BASIS,
            &s.ctx,
            42,
            0,
            1000,
            &s.challenge,
            inference,
            &mut s.rng,
        )
        .unwrap();
    assert_eq!(
        check(&s, &widened, &s.challenge),
        VerificationResult::Reject(RejectReason::SignatureInvalid)
    );
}

#[test]
fn transcript_bound_to_issued_challenge() {
    let mut s = range_session(204);
    let other_challenge = Party::<E>::issue_challenge(&mut s.rng);
    assert_eq!(
        check(&s, &s.transcript, &other_challenge),
        VerificationResult::Reject(RejectReason::ChallengeBindingFailed)
    );
}

#[test]
fn replayed_proof_fails_for_fresh_session() {
    let mut s = range_session(205);
    // The verifier opens a new session (new challenge) for the same context;
    // the old transcript must not carry over.
    let fresh = Party::<E>::issue_challenge(&mut s.rng);
    assert_ne!(fresh, s.challenge);
    assert!(!check(&s, &s.transcript, &fresh).is_accept());
}

#[test]
fn forged_range_proofs_do_not_verify() {
    // Commitment to an out-of-range value plus transplanted proof material.
    // Success probability is challenge-guessing, negligible even over many
    // attempts.
    let mut rng = StdRng::seed_from_u64(206);
    let basis: &CommitmentBasis<E> = &BLS12_381_BASIS;
    let ctx = ContextId::derive(b"verifier-1", b"risk-score");
    let nonces = NonceManager::<Fr>::random();

    for attempt in 0..32u64 {
        let challenge = Fr::rand(&mut rng);
        let session = SessionBinding::new(&ctx, &challenge);
        let blinding = nonces.next_blinding(&ctx, &mut rng).unwrap();
        let commitment = basis.commit(&SecretScalar::from_u64(150), &blinding);

        // Honest proof for a different, in-range commitment, replayed here.
        let donor_blinding = nonces.next_blinding(&ctx, &mut rng).unwrap();
        let donor = basis.commit(&SecretScalar::from_u64(attempt), &donor_blinding);
        let proof = zk_edge::prove_range(
            basis,
            &donor,
            attempt,
            &donor_blinding,
            0,
            100,
            &session,
            &mut rng,
        )
        .unwrap();

        assert!(
            !zk_edge::verify_range(basis, &commitment, 0, 100, &session, &proof),
            "transplanted proof must not verify (attempt {attempt})"
        );
    }
}

#[test]
fn hiding_commitments_do_not_leak_equality() {
    // Commitments to equal and to distinct secrets are equally unlinkable
    // without the blinding factors.
    let mut rng = StdRng::seed_from_u64(207);
    let basis: &CommitmentBasis<E> = &BLS12_381_BASIS;
    let ctx = ContextId::derive(b"verifier-1", b"risk-score");
    let nonces = NonceManager::<Fr>::random();

    let mut all = std::collections::HashSet::new();
    for value in [42u64, 42, 42, 7, 7, 99] {
        let blinding = nonces.next_blinding(&ctx, &mut rng).unwrap();
        let c = basis.commit(&SecretScalar::from_u64(value), &blinding);
        assert!(
            all.insert(zk_edge::codec::to_canonical_bytes(&c)),
            "fresh blinding must make every commitment distinct"
        );
    }
}
