//! ZK-Edge: proving bounded statements about private inferences
//!
//! Two-party protocol core. A prover commits to a private inference value,
//! proves a range or set-membership statement about it in zero knowledge,
//! binds the proof to a verifier-issued challenge through a pairing check,
//! and signs the whole transcript. The verifier re-runs every check without
//! learning the committed value.
//!
//! Properties:
//! - Commitments are binding and hiding under discrete log
//! - Blinding factors are single-use, enforced by an append-only ledger
//! - Proofs bind to their session: commitment, statement, and challenge
//! - Transcripts are immutable once signed; any mutation is a hard reject
//!
//! The inference function, transport, key distribution, and the verifier's
//! decision policy are collaborators supplied by the application; the core
//! treats them as opaque.

pub mod binding;
pub mod codec;
pub mod context;
pub mod engine;
pub mod error;
pub mod membership;
pub mod nonce;
pub mod party;
pub mod pedersen;
pub mod range;
pub mod scalar;
pub mod sig;
pub mod statement;
pub mod transcript;

// Re-exports - Public API
pub use binding::{bind_challenge, verify_challenge_binding, ChallengeBindingProof};
pub use context::{ContextId, SessionBinding};
pub use engine::{verify, verify_and_decide, verify_batch, BatchItem, RejectReason, VerificationResult};
pub use error::{Error, Result};
pub use membership::{prove_membership, verify_membership, MembershipProof};
pub use nonce::{MemoryNonceStore, NonceManager, NonceStore};
pub use party::Party;
pub use pedersen::{Commitment, CommitmentBasis, BLS12_381_BASIS};
pub use range::{prove_range, verify_range, RangeProof};
pub use scalar::{label_to_scalar, BlindingFactor, SecretScalar};
pub use sig::{verify_signature, Keypair, Signature, VerifyingKey};
pub use statement::Statement;
pub use transcript::{ProofBody, ProofTranscript, StatementProof};
