use anchor_core::{CoreError, ReasonCode};
use anchor_crypto::CryptoError;

/// Identity-layer errors.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("DID not found: {0}")]
    DidNotFound(String),

    #[error("verification method not found: {0}")]
    VerificationMethodNotFound(String),

    #[error("service not found: {0}")]
    ServiceNotFound(String),

    #[error("document fetch failed: {0}")]
    DocumentFetch(String),

    #[error("transport timeout: {0}")]
    TransportTimeout(String),

    #[error("transport unavailable: {0}")]
    TransportUnavailable(String),

    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IdentityError {
    /// Reason code surfaced in a rejection verdict.
    pub fn reason_code(&self) -> ReasonCode {
        match self {
            Self::MalformedInput(_) | Self::Core(_) | Self::Crypto(_) => ReasonCode::MalformedInput,
            Self::DidNotFound(_) => ReasonCode::DidNotFound,
            Self::VerificationMethodNotFound(_) => ReasonCode::VerificationMethodNotFound,
            Self::ServiceNotFound(_) => ReasonCode::ServiceNotFound,
            Self::DocumentFetch(_) => ReasonCode::DocumentFetchError,
            Self::TransportTimeout(_) => ReasonCode::TransportTimeout,
            Self::TransportUnavailable(_) => ReasonCode::TransportUnavailable,
            Self::Internal(_) => ReasonCode::InternalError,
        }
    }

    /// Whether the failure is transient.
    pub fn is_retryable(&self) -> bool {
        self.reason_code().is_retryable()
    }

    /// Classify an HTTP client failure.
    pub(crate) fn from_transport(context: &str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::TransportTimeout(format!("{}: {}", context, e))
        } else if e.is_builder() {
            Self::DocumentFetch(format!("{}: invalid request: {}", context, e))
        } else if e.is_decode() {
            Self::DocumentFetch(format!("{}: undecodable response: {}", context, e))
        } else {
            Self::TransportUnavailable(format!("{}: {}", context, e))
        }
    }
}
