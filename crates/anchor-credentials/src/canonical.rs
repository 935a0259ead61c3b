//! Signing-input reconstruction.
//!
//! Credential: compact JSON of the credential with `proof` removed, members
//! in received order and numbers in their received text.
//!
//! Presentation: the same serialization of the presentation, immediately
//! followed by the UTF-8 bytes of the proof's `challenge` and then its
//! `domain`. There is no separator or length prefix between the three
//! parts, so distinct (document, challenge, domain) triples can collide.
//! Existing signatures depend on this layout; do not change it.

use serde_json::{Map, Value};

use crate::error::CredentialError;
use crate::proof::Proof;

fn without_proof(document: &Value) -> Result<Map<String, Value>, CredentialError> {
    let object = document.as_object().ok_or_else(|| {
        CredentialError::MalformedInput("signed document is not a JSON object".into())
    })?;
    Ok(object
        .iter()
        .filter(|(key, _)| key.as_str() != "proof")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect())
}

fn serialize(map: &Map<String, Value>) -> Result<Vec<u8>, CredentialError> {
    serde_json::to_vec(map).map_err(|e| CredentialError::Serialization(e.to_string()))
}

/// Bytes the issuer signed for `credential`.
pub fn credential_signing_input(credential: &Value) -> Result<Vec<u8>, CredentialError> {
    serialize(&without_proof(credential)?)
}

/// Bytes the holder signed for `presentation`.
///
/// The presentation's proof must carry `challenge` and `domain`.
pub fn presentation_signing_input(presentation: &Value) -> Result<Vec<u8>, CredentialError> {
    let proof = Proof::from_document(presentation)?;
    let (challenge, domain) = proof.replay_fields()?;

    let mut input = serialize(&without_proof(presentation)?)?;
    input.extend_from_slice(challenge.as_bytes());
    input.extend_from_slice(domain.as_bytes());
    Ok(input)
}
