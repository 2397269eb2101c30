//! Secret scalar and blinding factor wrappers.
//!
//! Both wrappers clear their field element on drop so a secret does not
//! outlive the commitment or proof built from it. Neither type ever appears
//! in wire encodings.

use ark_ff::{PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, Compress, Validate};

use crate::codec::hash_to_scalar;
use crate::error::{Error, Result};

const LABEL_TAG: &[u8] = b"ZKEDGE/LABEL";

/// A private field element: input feature, inference output, or decision
/// parameter. Cleared on drop.
#[derive(Clone, Debug)]
pub struct SecretScalar<F: PrimeField>(F);

impl<F: PrimeField> SecretScalar<F> {
    pub fn new(value: F) -> Self {
        Self(value)
    }

    /// Quantized numeric inference output.
    pub fn from_u64(value: u64) -> Self {
        Self(F::from(value))
    }

    /// Categorical inference output, encoded by domain-tagged hash-to-field.
    /// The same label always encodes to the same scalar, so public allowed
    /// sets and committed values agree on the encoding.
    pub fn from_label(label: &[u8]) -> Self {
        Self(hash_to_scalar(LABEL_TAG, &[label]))
    }

    /// Strict canonical decoding; encodings at or above the field modulus are
    /// rejected rather than reduced.
    pub fn from_canonical_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = std::io::Cursor::new(bytes);
        let value = F::deserialize_with_mode(&mut cursor, Compress::Yes, Validate::Yes)
            .map_err(|_| Error::InvalidScalar)?;
        Ok(Self(value))
    }

    pub fn expose(&self) -> &F {
        &self.0
    }
}

impl<F: PrimeField> Drop for SecretScalar<F> {
    fn drop(&mut self) {
        self.0 = F::zero();
    }
}

/// A single-use blinding factor. Minted only by the nonce manager; lifetime is
/// one commitment. Cleared on drop.
#[derive(Debug)]
pub struct BlindingFactor<F: PrimeField>(F);

impl<F: PrimeField> BlindingFactor<F> {
    pub(crate) fn mint(value: F) -> Self {
        Self(value)
    }

    pub fn expose(&self) -> &F {
        &self.0
    }
}

impl<F: PrimeField> Drop for BlindingFactor<F> {
    fn drop(&mut self) {
        self.0 = F::zero();
    }
}

/// Public counterpart of [`SecretScalar::from_label`] for building allowed
/// sets on the verifier side.
pub fn label_to_scalar<F: PrimeField>(label: &[u8]) -> F {
    hash_to_scalar(LABEL_TAG, &[label])
}
