//! Error taxonomy for proof construction.
//!
//! Construction-side failures abort proof creation and surface to the caller.
//! Verification-side failures never leave the verification engine as errors;
//! they fold into a rejected [`crate::engine::VerificationResult`].

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Bytes did not decode to a canonical scalar in the curve's scalar field.
    InvalidScalar,
    /// A blinding factor would repeat a previously issued value for the same
    /// context. Fatal: the session must abort, never re-randomize silently.
    NonceReuse,
    /// The secret does not satisfy the requested statement. Construction
    /// refuses; a proof of a false statement is never fabricated.
    StatementFalse,
    /// Malformed public statement parameters (empty allowed-set, low > high).
    InvalidStatement,
    /// Malformed wire bytes.
    Decoding,
}

pub type Result<T> = core::result::Result<T, Error>;

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidScalar => write!(f, "bytes are not a canonical scalar field element"),
            Error::NonceReuse => write!(f, "blinding factor reuse detected for this context"),
            Error::StatementFalse => write!(f, "secret does not satisfy the statement"),
            Error::InvalidStatement => write!(f, "malformed statement parameters"),
            Error::Decoding => write!(f, "malformed wire bytes"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ark_serialize::SerializationError> for Error {
    fn from(_: ark_serialize::SerializationError) -> Self {
        Error::Decoding
    }
}
