//! Blinding factor issuance with a no-reuse ledger.
//!
//! The manager is the only mint for [`BlindingFactor`]s. Every issued value is
//! recorded (as a digest, never the scalar itself) in an append-only ledger
//! keyed by [`ContextId`]; a would-be repeat fails with [`Error::NonceReuse`]
//! and must abort the session. The ledger is the one piece of shared mutable
//! state in the crate and is mutex-guarded.
//!
//! Two issuance modes:
//! - true-random sampling, checked against the ledger;
//! - deterministic derivation from a per-context seed and a monotonically
//!   increasing counter, in the manner of deterministic-nonce signatures.
//!   A rolled-back counter regenerates an earlier value and is caught by the
//!   ledger as reuse rather than silently re-issued.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use ark_ff::PrimeField;
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::codec::to_canonical_bytes;
use crate::context::ContextId;
use crate::error::{Error, Result};
use crate::scalar::BlindingFactor;

/// Durable backing for the ledger, keyed by context. Implementations append
/// digests as they are issued and replay them on first touch after a restart.
pub trait NonceStore: Send + Sync {
    fn load(&self, ctx: &ContextId) -> (Vec<[u8; 32]>, u64);
    fn append(&self, ctx: &ContextId, digest: [u8; 32], counter: u64);
}

/// In-memory store; survives nothing, useful as the default and in tests.
#[derive(Default)]
pub struct MemoryNonceStore {
    entries: Mutex<HashMap<ContextId, (Vec<[u8; 32]>, u64)>>,
}

impl NonceStore for MemoryNonceStore {
    fn load(&self, ctx: &ContextId) -> (Vec<[u8; 32]>, u64) {
        self.entries
            .lock()
            .expect("nonce store lock")
            .get(ctx)
            .cloned()
            .unwrap_or_default()
    }

    fn append(&self, ctx: &ContextId, digest: [u8; 32], counter: u64) {
        let mut entries = self.entries.lock().expect("nonce store lock");
        let entry = entries.entry(*ctx).or_default();
        entry.0.push(digest);
        entry.1 = counter;
    }
}

enum Mode {
    Random,
    Deterministic { seed: [u8; 32] },
}

impl Drop for Mode {
    fn drop(&mut self) {
        if let Mode::Deterministic { seed } = self {
            seed.zeroize();
        }
    }
}

struct Ledger {
    issued: HashSet<[u8; 32]>,
    counter: u64,
}

pub struct NonceManager<F: PrimeField> {
    mode: Mode,
    ledgers: Mutex<HashMap<ContextId, Ledger>>,
    store: Option<Arc<dyn NonceStore>>,
    _field: std::marker::PhantomData<fn() -> F>,
}

impl<F: PrimeField> NonceManager<F> {
    pub fn random() -> Self {
        Self::build(Mode::Random, None)
    }

    /// Deterministic derivation from a master seed. Each context gets its own
    /// derived seed, so ledgers for different counterparties stay uncorrelated.
    pub fn deterministic(seed: [u8; 32]) -> Self {
        Self::build(Mode::Deterministic { seed }, None)
    }

    pub fn with_store(mut self, store: Arc<dyn NonceStore>) -> Self {
        self.store = Some(store);
        self
    }

    fn build(mode: Mode, store: Option<Arc<dyn NonceStore>>) -> Self {
        Self {
            mode,
            ledgers: Mutex::new(HashMap::new()),
            store,
            _field: std::marker::PhantomData,
        }
    }

    /// Issue a fresh blinding factor for `ctx`. Fails with
    /// [`Error::NonceReuse`] if the candidate value was ever issued for this
    /// context before; the caller must treat that as fatal for the session.
    pub fn next_blinding<R: RngCore + CryptoRng>(
        &self,
        ctx: &ContextId,
        rng: &mut R,
    ) -> Result<BlindingFactor<F>> {
        use ark_std::UniformRand;

        let mut ledgers = self.ledgers.lock().expect("nonce ledger lock");
        let ledger = ledgers.entry(*ctx).or_insert_with(|| {
            let (digests, counter) = match &self.store {
                Some(store) => store.load(ctx),
                None => (Vec::new(), 0),
            };
            Ledger {
                issued: digests.into_iter().collect(),
                counter,
            }
        });

        let candidate = match &self.mode {
            Mode::Random => F::rand(rng),
            Mode::Deterministic { seed } => derive_scalar::<F>(seed, ctx, ledger.counter),
        };

        let digest = blinding_digest(&candidate);
        if ledger.issued.contains(&digest) {
            return Err(Error::NonceReuse);
        }
        ledger.issued.insert(digest);
        ledger.counter += 1;
        if let Some(store) = &self.store {
            store.append(ctx, digest, ledger.counter);
        }
        Ok(BlindingFactor::mint(candidate))
    }
}

fn derive_scalar<F: PrimeField>(seed: &[u8; 32], ctx: &ContextId, counter: u64) -> F {
    let mut hasher = Sha256::new();
    hasher.update(b"ZKEDGE/NONCE");
    hasher.update(seed);
    hasher.update(ctx.as_bytes());
    hasher.update(counter.to_le_bytes());
    F::from_le_bytes_mod_order(&hasher.finalize())
}

fn blinding_digest<F: PrimeField>(value: &F) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"ZKEDGE/NONCE/DIGEST");
    hasher.update(to_canonical_bytes(value));
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}
