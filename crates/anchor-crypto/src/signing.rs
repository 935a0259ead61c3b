use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, VerifyingKey};

use crate::error::CryptoError;
use crate::keys::KeyPair;

/// Proof types backed by secp256k1 ECDSA with DER signatures.
pub const SECP256K1_PROOF_TYPES: &[&str] = &[
    "EcdsaSecp256k1RecoveryMethod2020",
    "EcdsaSecp256k1Signature2019",
    "EcdsaSecp256k1VerificationKey2019",
];

/// Whether a proof `type` is verified by this module.
pub fn is_supported_proof_type(proof_type: &str) -> bool {
    SECP256K1_PROOF_TYPES.contains(&proof_type)
}

/// Sign a message with ECDSA over SHA-256, returning the DER encoding.
pub fn sign(message: &[u8], keypair: &KeyPair) -> Vec<u8> {
    let signature: Signature = keypair.signing_key().sign(message);
    signature.to_der().as_bytes().to_vec()
}

/// Sign a message and hex-encode the DER signature.
pub fn sign_hex(message: &[u8], keypair: &KeyPair) -> String {
    hex::encode(sign(message, keypair))
}

/// Parse a SEC1 public key (compressed or uncompressed).
pub fn parse_public_key(bytes: &[u8]) -> Result<VerifyingKey, CryptoError> {
    VerifyingKey::from_sec1_bytes(bytes).map_err(|e| CryptoError::InvalidKey(e.to_string()))
}

/// Parse a DER signature, normalising it to low-S form.
pub fn parse_der_signature(bytes: &[u8]) -> Result<Signature, CryptoError> {
    let signature =
        Signature::from_der(bytes).map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    Ok(signature.normalize_s().unwrap_or(signature))
}

/// Verify a DER-encoded ECDSA signature over `signing_input`.
///
/// Never fails: a malformed key or signature is reported as `false`.
pub fn verify(signing_input: &[u8], signature_der: &[u8], public_key: &[u8]) -> bool {
    let key = match parse_public_key(public_key) {
        Ok(key) => key,
        Err(e) => {
            tracing::debug!(error = %e, "rejecting malformed public key");
            return false;
        }
    };
    let signature = match parse_der_signature(signature_der) {
        Ok(sig) => sig,
        Err(e) => {
            tracing::debug!(error = %e, "rejecting malformed signature");
            return false;
        }
    };
    key.verify(signing_input, &signature).is_ok()
}

/// Hex convenience over [`verify`]; bad hex is also `false`.
pub fn verify_hex(signing_input: &[u8], signature_hex: &str, public_key_hex: &str) -> bool {
    match (hex::decode(signature_hex), hex::decode(public_key_hex)) {
        (Ok(signature), Ok(public_key)) => verify(signing_input, &signature, &public_key),
        _ => {
            tracing::debug!("rejecting non-hex signature or public key");
            false
        }
    }
}
