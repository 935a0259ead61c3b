use crate::verification_state::VerificationState;

/// Core protocol errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        from: VerificationState,
        to: VerificationState,
    },

    #[error("invalid DID format: {0}")]
    InvalidDid(String),

    #[error("invalid account address: {0}")]
    InvalidAddress(String),

    #[error("invalid DID URL: {0}")]
    InvalidDidUrl(String),

    #[error("unsupported DID method: expected {expected}, got {actual}")]
    UnsupportedMethod { expected: String, actual: String },

    #[error("unsupported fragment: #{0}")]
    UnsupportedFragment(String),
}
