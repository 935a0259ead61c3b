use anchor_core::{CoreError, ReasonCode};
use anchor_crypto::CryptoError;
use anchor_identity::IdentityError;

/// Credential system errors.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("{0}")]
    SignatureInvalid(String),

    #[error("challenge mismatch: {0}")]
    ChallengeMismatch(String),

    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CredentialError {
    /// Reason code surfaced in a rejection verdict.
    pub fn reason_code(&self) -> ReasonCode {
        match self {
            Self::MalformedInput(_) | Self::Crypto(_) => ReasonCode::MalformedInput,
            Self::Core(CoreError::InvalidStateTransition { .. }) => ReasonCode::InternalError,
            Self::Core(_) => ReasonCode::MalformedInput,
            Self::SignatureInvalid(_) => ReasonCode::SignatureInvalid,
            Self::ChallengeMismatch(_) => ReasonCode::ChallengeMismatch,
            Self::Identity(e) => e.reason_code(),
            Self::Serialization(_) | Self::Internal(_) => ReasonCode::InternalError,
        }
    }

    /// Whether retrying the whole verification may succeed.
    pub fn is_retryable(&self) -> bool {
        self.reason_code().is_retryable()
    }
}
