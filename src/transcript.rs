//! Proof transcript assembly.
//!
//! The transcript is the wire unit exchanged between parties:
//! `{signature, proof, statement, challenge binding}`. The assembler is pure
//! aggregation; the signature covers the canonical concatenation
//! `proof_bytes || statement_bytes || binding_bytes` in exactly that order,
//! so the transcript is immutable once signed.

use ark_ec::pairing::Pairing;
use ark_serialize::{CanonicalDeserialize, Compress, Validate};

use crate::binding::ChallengeBindingProof;
use crate::codec::to_canonical_bytes;
use crate::error::{Error, Result};
use crate::membership::MembershipProof;
use crate::pedersen::Commitment;
use crate::range::RangeProof;
use crate::sig::Signature;
use crate::statement::Statement;

const PROOF_KIND_RANGE: u8 = 1;
const PROOF_KIND_MEMBERSHIP: u8 = 2;

/// A statement proof together with the commitment it certifies.
#[derive(Clone, Debug)]
pub struct StatementProof<E: Pairing> {
    pub commitment: Commitment<E>,
    pub body: ProofBody<E>,
}

#[derive(Clone, Debug)]
pub enum ProofBody<E: Pairing> {
    Range(RangeProof<E>),
    Membership(MembershipProof<E>),
}

impl<E: Pairing> StatementProof<E> {
    /// Kind tag, then commitment, then proof body, all canonical.
    pub fn to_bytes(&self) -> Vec<u8> {
        let (tag, body) = match &self.body {
            ProofBody::Range(p) => (PROOF_KIND_RANGE, to_canonical_bytes(p)),
            ProofBody::Membership(p) => (PROOF_KIND_MEMBERSHIP, to_canonical_bytes(p)),
        };
        let mut out = vec![tag];
        out.extend_from_slice(&to_canonical_bytes(&self.commitment));
        out.extend_from_slice(&body);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (&tag, rest) = bytes.split_first().ok_or(Error::Decoding)?;
        let mut cursor = std::io::Cursor::new(rest);
        let commitment =
            Commitment::<E>::deserialize_with_mode(&mut cursor, Compress::Yes, Validate::Yes)?;
        let body = match tag {
            PROOF_KIND_RANGE => ProofBody::Range(RangeProof::<E>::deserialize_with_mode(
                &mut cursor,
                Compress::Yes,
                Validate::Yes,
            )?),
            PROOF_KIND_MEMBERSHIP => {
                ProofBody::Membership(MembershipProof::<E>::deserialize_with_mode(
                    &mut cursor,
                    Compress::Yes,
                    Validate::Yes,
                )?)
            }
            _ => return Err(Error::Decoding),
        };
        if cursor.position() != rest.len() as u64 {
            return Err(Error::Decoding);
        }
        Ok(Self { commitment, body })
    }
}

/// The signed wire unit. Field order is significant: the signature is checked
/// against `proof_bytes || statement_bytes || binding_bytes`.
#[derive(Clone, Debug)]
pub struct ProofTranscript<E: Pairing> {
    pub signature: Signature<E>,
    pub proof_bytes: Vec<u8>,
    pub statement: Statement<E::ScalarField>,
    pub binding_bytes: Vec<u8>,
}

impl<E: Pairing> ProofTranscript<E> {
    /// The byte string the signature must cover.
    pub fn signing_payload(
        proof_bytes: &[u8],
        statement: &Statement<E::ScalarField>,
        binding_bytes: &[u8],
    ) -> Vec<u8> {
        let statement_bytes = statement.to_bytes();
        let mut payload =
            Vec::with_capacity(proof_bytes.len() + statement_bytes.len() + binding_bytes.len());
        payload.extend_from_slice(proof_bytes);
        payload.extend_from_slice(&statement_bytes);
        payload.extend_from_slice(binding_bytes);
        payload
    }

    pub fn assemble(
        signature: Signature<E>,
        proof: &StatementProof<E>,
        statement: Statement<E::ScalarField>,
        binding: &ChallengeBindingProof<E>,
    ) -> Self {
        Self {
            signature,
            proof_bytes: proof.to_bytes(),
            statement,
            binding_bytes: to_canonical_bytes(binding),
        }
    }

    pub fn payload(&self) -> Vec<u8> {
        Self::signing_payload(&self.proof_bytes, &self.statement, &self.binding_bytes)
    }

    pub fn decode_proof(&self) -> Result<StatementProof<E>> {
        StatementProof::from_bytes(&self.proof_bytes)
    }

    pub fn decode_binding(&self) -> Result<ChallengeBindingProof<E>> {
        crate::codec::from_canonical_bytes(&self.binding_bytes)
    }

    /// Full wire encoding: four length-prefixed fields in canonical order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let signature_bytes = to_canonical_bytes(&self.signature);
        let statement_bytes = self.statement.to_bytes();
        let mut out = Vec::new();
        for field in [
            &signature_bytes,
            &self.proof_bytes,
            &statement_bytes,
            &self.binding_bytes,
        ] {
            out.extend_from_slice(&(field.len() as u32).to_le_bytes());
            out.extend_from_slice(field);
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut rest = bytes;
        let mut fields: Vec<&[u8]> = Vec::with_capacity(4);
        for _ in 0..4 {
            if rest.len() < 4 {
                return Err(Error::Decoding);
            }
            let len = u32::from_le_bytes(rest[..4].try_into().expect("length checked")) as usize;
            rest = &rest[4..];
            if rest.len() < len {
                return Err(Error::Decoding);
            }
            fields.push(&rest[..len]);
            rest = &rest[len..];
        }
        if !rest.is_empty() {
            return Err(Error::Decoding);
        }
        Ok(Self {
            signature: crate::codec::from_canonical_bytes(fields[0])?,
            proof_bytes: fields[1].to_vec(),
            statement: Statement::from_bytes(fields[2])?,
            binding_bytes: fields[3].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ContextId, SessionBinding};
    use crate::pedersen::CommitmentBasis;
    use crate::range::prove_range;
    use crate::scalar::{BlindingFactor, SecretScalar};
    use crate::sig::Keypair;
    use ark_bls12_381::{Bls12_381, Fr};
    use ark_std::rand::rngs::StdRng;
    use ark_std::rand::SeedableRng;
    use ark_std::UniformRand;

    type E = Bls12_381;

    fn sample_transcript() -> ProofTranscript<E> {
        let mut rng = StdRng::seed_from_u64(33);
        let basis = CommitmentBasis::<E>::derive(b"transcript-test");
        let secret = SecretScalar::from_u64(42);
        let blinding = BlindingFactor::mint(Fr::rand(&mut rng));
        let commitment = basis.commit(&secret, &blinding);
        let ctx = ContextId::derive(b"verifier", b"inference");
        let challenge = Fr::rand(&mut rng);
        let session = SessionBinding::new(&ctx, &challenge);

        let range =
            prove_range(&basis, &commitment, 42, &blinding, 0, 100, &session, &mut rng).unwrap();
        let proof = StatementProof {
            commitment,
            body: ProofBody::Range(range),
        };
        let statement = Statement::Range { low: 0, high: 100 };
        let binding =
            crate::binding::bind_challenge(|x| *x, &challenge, &secret, &commitment);

        let keypair = Keypair::<E>::generate(&mut rng);
        let binding_bytes = to_canonical_bytes(&binding);
        let payload =
            ProofTranscript::<E>::signing_payload(&proof.to_bytes(), &statement, &binding_bytes);
        let signature = keypair.sign(&payload, &mut rng);
        ProofTranscript::assemble(signature, &proof, statement, &binding)
    }

    #[test]
    fn wire_roundtrip() {
        let transcript = sample_transcript();
        let bytes = transcript.to_bytes();
        let back = ProofTranscript::<E>::from_bytes(&bytes).unwrap();
        assert_eq!(back.proof_bytes, transcript.proof_bytes);
        assert_eq!(back.statement, transcript.statement);
        assert_eq!(back.binding_bytes, transcript.binding_bytes);
        assert_eq!(back.payload(), transcript.payload());
    }

    #[test]
    fn proof_bytes_roundtrip() {
        let transcript = sample_transcript();
        let proof = transcript.decode_proof().unwrap();
        assert_eq!(proof.to_bytes(), transcript.proof_bytes);
    }

    #[test]
    fn truncated_wire_fails() {
        let bytes = sample_transcript().to_bytes();
        assert_eq!(
            ProofTranscript::<E>::from_bytes(&bytes[..bytes.len() - 1]).unwrap_err(),
            Error::Decoding
        );
    }

    #[test]
    fn trailing_garbage_fails() {
        let mut bytes = sample_transcript().to_bytes();
        bytes.push(0);
        assert_eq!(
            ProofTranscript::<E>::from_bytes(&bytes).unwrap_err(),
            Error::Decoding
        );
    }

    #[test]
    fn unknown_proof_kind_fails() {
        let transcript = sample_transcript();
        let mut bytes = transcript.proof_bytes.clone();
        bytes[0] = 9;
        assert_eq!(
            StatementProof::<E>::from_bytes(&bytes).unwrap_err(),
            Error::Decoding
        );
    }
}
