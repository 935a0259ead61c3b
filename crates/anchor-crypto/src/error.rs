/// Cryptographic operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("malformed ledger handle: {0}")]
    MalformedHandle(String),

    #[error("invalid content identifier: {0}")]
    InvalidContentId(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid signature encoding: {0}")]
    InvalidSignature(String),
}
