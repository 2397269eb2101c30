//! Public statements about a hidden value.
//!
//! A closed variant set, dispatched exhaustively by the verification engine.
//! Wire encoding is a kind tag followed by the parameters; the encoding is
//! part of the signed transcript payload, so it must stay canonical.

use ark_ff::{PrimeField, Zero};
use ark_serialize::CanonicalSerialize;

use crate::codec::to_canonical_bytes;
use crate::error::{Error, Result};

const KIND_RANGE: u8 = 1;
const KIND_MEMBERSHIP: u8 = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement<F: PrimeField> {
    /// The committed value lies in `[low, high]`, inclusive.
    Range { low: u64, high: u64 },
    /// The committed value is one element of a public, enumerated set.
    Membership { allowed: Vec<F> },
}

impl<F: PrimeField> Statement<F> {
    /// Structural validity of the public parameters, checked before any proof
    /// is constructed or verified.
    pub fn validate(&self) -> Result<()> {
        match self {
            Statement::Range { low, high } => {
                if low > high {
                    return Err(Error::InvalidStatement);
                }
                Ok(())
            }
            Statement::Membership { allowed } => {
                if allowed.is_empty() {
                    return Err(Error::InvalidStatement);
                }
                Ok(())
            }
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Statement::Range { low, high } => {
                let mut out = Vec::with_capacity(17);
                out.push(KIND_RANGE);
                out.extend_from_slice(&low.to_le_bytes());
                out.extend_from_slice(&high.to_le_bytes());
                out
            }
            Statement::Membership { allowed } => {
                let mut out = vec![KIND_MEMBERSHIP];
                out.extend_from_slice(&(allowed.len() as u32).to_le_bytes());
                for element in allowed {
                    out.extend_from_slice(&to_canonical_bytes(element));
                }
                out
            }
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (&kind, rest) = bytes.split_first().ok_or(Error::Decoding)?;
        match kind {
            KIND_RANGE => {
                if rest.len() != 16 {
                    return Err(Error::Decoding);
                }
                let low = u64::from_le_bytes(rest[..8].try_into().expect("length checked"));
                let high = u64::from_le_bytes(rest[8..].try_into().expect("length checked"));
                Ok(Statement::Range { low, high })
            }
            KIND_MEMBERSHIP => {
                if rest.len() < 4 {
                    return Err(Error::Decoding);
                }
                let count = u32::from_le_bytes(rest[..4].try_into().expect("length checked"));
                let body = &rest[4..];
                let width = F::zero().compressed_size();
                if body.len() != width.checked_mul(count as usize).ok_or(Error::Decoding)? {
                    return Err(Error::Decoding);
                }
                let mut allowed = Vec::with_capacity(count as usize);
                for chunk in body.chunks_exact(width) {
                    allowed.push(crate::codec::from_canonical_bytes(chunk)?);
                }
                Ok(Statement::Membership { allowed })
            }
            _ => Err(Error::Decoding),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr;

    #[test]
    fn range_roundtrip() {
        let s = Statement::<Fr>::Range { low: 3, high: 90 };
        assert_eq!(Statement::from_bytes(&s.to_bytes()).unwrap(), s);
    }

    #[test]
    fn membership_roundtrip() {
        let s = Statement::Membership {
            allowed: vec![Fr::from(1u64), Fr::from(5u64)],
        };
        assert_eq!(Statement::from_bytes(&s.to_bytes()).unwrap(), s);
    }

    #[test]
    fn inverted_bounds_are_invalid() {
        let s = Statement::<Fr>::Range { low: 9, high: 1 };
        assert_eq!(s.validate().unwrap_err(), Error::InvalidStatement);
    }

    #[test]
    fn empty_set_is_invalid() {
        let s = Statement::<Fr>::Membership { allowed: vec![] };
        assert_eq!(s.validate().unwrap_err(), Error::InvalidStatement);
    }

    #[test]
    fn unknown_kind_fails_decoding() {
        assert_eq!(
            Statement::<Fr>::from_bytes(&[9u8, 0, 0]).unwrap_err(),
            Error::Decoding
        );
    }
}
