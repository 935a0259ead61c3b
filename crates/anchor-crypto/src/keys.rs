use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// secp256k1 signing key with its public half.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a fresh random keypair.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Build a keypair from a 32-byte secret scalar.
    pub fn from_secret_bytes(secret: &[u8]) -> Result<Self, CryptoError> {
        let signing_key = SigningKey::from_slice(secret)
            .map_err(|e| CryptoError::InvalidKey(format!("invalid secret key: {}", e)))?;
        Ok(Self { signing_key })
    }

    /// Build a keypair from a hex secret.
    ///
    /// Wallet exports sometimes carry a leading `00` byte (33 bytes); it is stripped.
    pub fn from_secret_hex(secret_hex: &str) -> Result<Self, CryptoError> {
        let bytes = Zeroizing::new(
            hex::decode(secret_hex.trim())
                .map_err(|e| CryptoError::InvalidKey(format!("invalid secret hex: {}", e)))?,
        );
        match bytes.len() {
            32 => Self::from_secret_bytes(&bytes),
            33 if bytes[0] == 0 => Self::from_secret_bytes(&bytes[1..]),
            n => Err(CryptoError::InvalidKey(format!(
                "secret key must be 32 bytes, got {}",
                n
            ))),
        }
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Compressed SEC1 public key (33 bytes).
    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }

    /// Compressed public key as upper-case hex, the form published in identity documents.
    pub fn public_key_hex(&self) -> String {
        hex::encode_upper(self.public_key_bytes())
    }

    /// Uncompressed SEC1 public key (65 bytes).
    pub fn public_key_bytes_uncompressed(&self) -> Vec<u8> {
        self.verifying_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec()
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}
