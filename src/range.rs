//! Zero-knowledge range proofs over committed values.
//!
//! Proves `low <= v <= high` for `C = v·G + r·H` without revealing `v`. The
//! argument is a two-sided bit decomposition: commit to each bit of `v - low`
//! and of `high - v` over `n` bits (where `n` is the bit-width of the range),
//! prove each bit commitment opens to 0 or 1 with a two-branch OR proof, and
//! tie the weighted bit sums back to the original commitment with a Schnorr
//! proof over `H`. Both sub-arguments anchor to `C` itself through the
//! homomorphic shifts `C - low·G` and `high·G - C`, so the proof cannot be
//! detached from the commitment it was built for.
//!
//! Proof size is linear in `n`, hence logarithmic in the range width.
//!
//! Non-interactive via domain-tagged SHA-256 Fiat-Shamir: one challenge over
//! the session binding, the statement, and every announcement; each OR proof
//! splits that challenge across its two branches.

use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{AdditiveGroup, One, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::UniformRand;
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use crate::codec::absorb;
use crate::context::SessionBinding;
use crate::error::{Error, Result};
use crate::pedersen::{Commitment, CommitmentBasis};
use crate::scalar::BlindingFactor;

/// Two-branch OR proof that a bit commitment opens to 0 or 1.
/// `x1` is derived as `x - x0` by the verifier.
#[derive(Clone, Debug, CanonicalSerialize, CanonicalDeserialize)]
pub struct BitProof<E: Pairing> {
    pub t0: E::G1Affine,
    pub t1: E::G1Affine,
    pub x0: E::ScalarField,
    pub z0: E::ScalarField,
    pub z1: E::ScalarField,
}

/// One side of the range argument: bit commitments for a shifted value in
/// `[0, 2^n)`, their OR proofs, and the Schnorr link to the shifted
/// commitment.
#[derive(Clone, Debug, CanonicalSerialize, CanonicalDeserialize)]
pub struct SideProof<E: Pairing> {
    pub bits: Vec<E::G1Affine>,
    pub bit_proofs: Vec<BitProof<E>>,
    pub link_t: E::G1Affine,
    pub link_z: E::ScalarField,
}

#[derive(Clone, Debug, CanonicalSerialize, CanonicalDeserialize)]
pub struct RangeProof<E: Pairing> {
    pub lower: SideProof<E>,
    pub upper: SideProof<E>,
}

/// Bits needed to cover `[0, high - low]`.
fn range_bits(low: u64, high: u64) -> usize {
    let width = high - low;
    (64 - width.leading_zeros()).max(1) as usize
}

// Prover-side working state for one side, kept until the shared Fiat-Shamir
// challenge is known.
struct SideState<E: Pairing> {
    bits: Vec<E::G1Affine>,
    bit_values: Vec<bool>,
    bit_blindings: Vec<E::ScalarField>,
    announcements: Vec<(E::G1Affine, E::G1Affine)>,
    // Simulated branch: (fake challenge, fake response). Real branch witness w.
    simulated: Vec<(E::ScalarField, E::ScalarField)>,
    witnesses: Vec<E::ScalarField>,
    link_t: E::G1Affine,
    link_w: E::ScalarField,
    link_delta: E::ScalarField,
}

impl<E: Pairing> SideState<E> {
    /// Commit to the bits of `value` and lay down all announcements for a
    /// shifted commitment with blinding `shifted_blinding`.
    fn announce<R: RngCore + CryptoRng>(
        basis: &CommitmentBasis<E>,
        value: u64,
        shifted_blinding: E::ScalarField,
        n: usize,
        rng: &mut R,
    ) -> Self {
        let g = basis.g.into_group();
        let h = basis.h.into_group();

        let mut bits = Vec::with_capacity(n);
        let mut bit_values = Vec::with_capacity(n);
        let mut bit_blindings = Vec::with_capacity(n);
        let mut announcements = Vec::with_capacity(n);
        let mut simulated = Vec::with_capacity(n);
        let mut witnesses = Vec::with_capacity(n);

        for i in 0..n {
            let bit = (value >> i) & 1 == 1;
            let s = E::ScalarField::rand(rng);
            let d = if bit { g + h * s } else { h * s };
            let d = d.into_affine();

            let w = E::ScalarField::rand(rng);
            let x_fake = E::ScalarField::rand(rng);
            let z_fake = E::ScalarField::rand(rng);
            // Real branch announces w·H; the other branch is simulated against
            // its pre-chosen challenge so it verifies by construction.
            let (t0, t1) = if bit {
                let t0 = (h * z_fake - d.into_group() * x_fake).into_affine();
                let t1 = (h * w).into_affine();
                (t0, t1)
            } else {
                let t0 = (h * w).into_affine();
                let t1 = (h * z_fake - (d.into_group() - g) * x_fake).into_affine();
                (t0, t1)
            };

            bits.push(d);
            bit_values.push(bit);
            bit_blindings.push(s);
            announcements.push((t0, t1));
            simulated.push((x_fake, z_fake));
            witnesses.push(w);
        }

        // delta = r_shifted - sum 2^i s_i, the gap between the shifted
        // commitment's blinding and the weighted bit blindings.
        let mut weighted = E::ScalarField::zero();
        let mut pow = E::ScalarField::one();
        for s in &bit_blindings {
            weighted += pow * s;
            pow.double_in_place();
        }
        let link_delta = shifted_blinding - weighted;
        let link_w = E::ScalarField::rand(rng);
        let link_t = (h * link_w).into_affine();

        Self {
            bits,
            bit_values,
            bit_blindings,
            announcements,
            simulated,
            witnesses,
            link_t,
            link_w,
            link_delta,
        }
    }

    fn finalize(self, x: E::ScalarField) -> SideProof<E> {
        let mut bit_proofs = Vec::with_capacity(self.bits.len());
        for i in 0..self.bits.len() {
            let (t0, t1) = self.announcements[i];
            let (x_fake, z_fake) = self.simulated[i];
            let s = self.bit_blindings[i];
            let w = self.witnesses[i];
            let proof = if self.bit_values[i] {
                let x1 = x - x_fake;
                BitProof {
                    t0,
                    t1,
                    x0: x_fake,
                    z0: z_fake,
                    z1: w + x1 * s,
                }
            } else {
                let x0 = x - x_fake;
                BitProof {
                    t0,
                    t1,
                    x0,
                    z0: w + x0 * s,
                    z1: z_fake,
                }
            };
            bit_proofs.push(proof);
        }
        SideProof {
            bits: self.bits,
            bit_proofs,
            link_t: self.link_t,
            link_z: self.link_w + x * self.link_delta,
        }
    }
}

/// Construct a range proof for `commitment = value·G + blinding·H`.
///
/// Refuses with [`Error::InvalidStatement`] when `low > high` and with
/// [`Error::StatementFalse`] when the value lies outside the range; a proof of
/// a false statement is never fabricated.
pub fn prove_range<E: Pairing, R: RngCore + CryptoRng>(
    basis: &CommitmentBasis<E>,
    commitment: &Commitment<E>,
    value: u64,
    blinding: &BlindingFactor<E::ScalarField>,
    low: u64,
    high: u64,
    session: &SessionBinding,
    rng: &mut R,
) -> Result<RangeProof<E>> {
    if low > high {
        return Err(Error::InvalidStatement);
    }
    if value < low || value > high {
        return Err(Error::StatementFalse);
    }

    let n = range_bits(low, high);
    let r = *blinding.expose();

    // C - low·G commits to value-low with blinding r; high·G - C commits to
    // high-value with blinding -r.
    let lower = SideState::<E>::announce(basis, value - low, r, n, rng);
    let upper = SideState::<E>::announce(basis, high - value, -r, n, rng);

    let x = challenge::<E>(
        session,
        basis,
        commitment,
        low,
        high,
        [&lower, &upper].map(|side| (&side.bits, &side.announcements, &side.link_t)),
    );

    Ok(RangeProof {
        lower: lower.finalize(x),
        upper: upper.finalize(x),
    })
}

/// Deterministic, side-effect-free verification. Returns `false` on any
/// malformed or non-verifying proof content.
pub fn verify_range<E: Pairing>(
    basis: &CommitmentBasis<E>,
    commitment: &Commitment<E>,
    low: u64,
    high: u64,
    session: &SessionBinding,
    proof: &RangeProof<E>,
) -> bool {
    if low > high {
        return false;
    }
    let n = range_bits(low, high);
    for side in [&proof.lower, &proof.upper] {
        if side.bits.len() != n || side.bit_proofs.len() != n {
            return false;
        }
    }

    let announcements = |side: &SideProof<E>| -> Vec<(E::G1Affine, E::G1Affine)> {
        side.bit_proofs.iter().map(|p| (p.t0, p.t1)).collect()
    };
    let lower_ann = announcements(&proof.lower);
    let upper_ann = announcements(&proof.upper);
    let x = challenge::<E>(
        session,
        basis,
        commitment,
        low,
        high,
        [
            (&proof.lower.bits, &lower_ann, &proof.lower.link_t),
            (&proof.upper.bits, &upper_ann, &proof.upper.link_t),
        ],
    );

    let anchors = [
        basis.shift_down(commitment, E::ScalarField::from(low)),
        basis.shift_negate(commitment, E::ScalarField::from(high)),
    ];
    for (side, anchor) in [&proof.lower, &proof.upper].into_iter().zip(anchors) {
        if !verify_side(basis, side, anchor, x) {
            return false;
        }
    }
    true
}

fn verify_side<E: Pairing>(
    basis: &CommitmentBasis<E>,
    side: &SideProof<E>,
    anchor: E::G1Affine,
    x: E::ScalarField,
) -> bool {
    let g = basis.g.into_group();
    let h = basis.h.into_group();

    for (d, p) in side.bits.iter().zip(&side.bit_proofs) {
        let x1 = x - p.x0;
        // Branch 0: D = s·H. Branch 1: D - G = s·H.
        if h * p.z0 != p.t0.into_group() + d.into_group() * p.x0 {
            return false;
        }
        if h * p.z1 != p.t1.into_group() + (d.into_group() - g) * x1 {
            return false;
        }
    }

    // anchor - sum 2^i D_i must open to zero over H with the proven delta.
    let mut weighted = E::G1::zero();
    let mut pow = E::ScalarField::one();
    for d in &side.bits {
        weighted += d.into_group() * pow;
        pow.double_in_place();
    }
    let gap = anchor.into_group() - weighted;
    h * side.link_z == side.link_t.into_group() + gap * x
}

fn challenge<E: Pairing>(
    session: &SessionBinding,
    basis: &CommitmentBasis<E>,
    commitment: &Commitment<E>,
    low: u64,
    high: u64,
    sides: [(
        &Vec<E::G1Affine>,
        &Vec<(E::G1Affine, E::G1Affine)>,
        &E::G1Affine,
    ); 2],
) -> E::ScalarField {
    let mut hasher = Sha256::new();
    hasher.update(b"ZKEDGE/FS/RANGE");
    hasher.update(session.as_bytes());
    absorb(&mut hasher, &basis.g);
    absorb(&mut hasher, &basis.h);
    absorb(&mut hasher, &commitment.0);
    hasher.update(low.to_le_bytes());
    hasher.update(high.to_le_bytes());
    for (bits, announcements, link_t) in sides {
        for d in bits {
            absorb(&mut hasher, d);
        }
        for (t0, t1) in announcements {
            absorb(&mut hasher, t0);
            absorb(&mut hasher, t1);
        }
        absorb(&mut hasher, link_t);
    }
    crate::codec::digest_to_scalar(hasher)
}
