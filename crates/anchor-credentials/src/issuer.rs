use chrono::Utc;
use serde_json::{Map, Value};

use anchor_core::Did;
use anchor_crypto::{sign_hex, KeyPair};

use crate::canonical::credential_signing_input;
use crate::error::CredentialError;
use crate::proof::{Proof, ASSERTION_METHOD, DEFAULT_PROOF_TYPE};

/// Value of the `context` member of issued credentials and presentations.
pub const CREDENTIALS_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// ISO-8601 UTC timestamp with millisecond precision.
pub(crate) fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

pub(crate) fn proof_value(proof: &Proof) -> Result<Value, CredentialError> {
    serde_json::to_value(proof).map_err(|e| CredentialError::Serialization(e.to_string()))
}

/// Attach an `assertionMethod` proof to an unsigned credential.
///
/// The signature covers the credential exactly as given; the proof is
/// appended as the last member.
pub fn sign_credential(
    credential: Value,
    verification_method: &str,
    keypair: &KeyPair,
) -> Result<Value, CredentialError> {
    let mut object = match credential {
        Value::Object(object) => object,
        _ => {
            return Err(CredentialError::MalformedInput(
                "credential is not a JSON object".into(),
            ))
        }
    };
    if object.contains_key("proof") {
        return Err(CredentialError::MalformedInput(
            "credential already carries a proof".into(),
        ));
    }

    let input = credential_signing_input(&Value::Object(object.clone()))?;
    let proof = Proof {
        proof_type: DEFAULT_PROOF_TYPE.to_string(),
        created: timestamp(),
        proof_purpose: ASSERTION_METHOD.to_string(),
        verification_method: verification_method.to_string(),
        challenge: None,
        domain: None,
        signature: sign_hex(&input, keypair),
    };
    object.insert("proof".into(), proof_value(&proof)?);
    Ok(Value::Object(object))
}

/// Issues credentials signed with the issuer's published key.
pub struct CredentialIssuer {
    did: Did,
    keypair: KeyPair,
    verification_method: String,
}

impl CredentialIssuer {
    /// Create an issuer signing as `<did>#keys-1`.
    pub fn new(did: Did, keypair: KeyPair) -> Self {
        let verification_method = did.with_fragment("keys-1").to_string();
        Self {
            did,
            keypair,
            verification_method,
        }
    }

    /// Sign with a different published verification method.
    pub fn with_verification_method(mut self, verification_method: impl Into<String>) -> Self {
        self.verification_method = verification_method.into();
        self
    }

    pub fn did(&self) -> &Did {
        &self.did
    }

    pub fn verification_method(&self) -> &str {
        &self.verification_method
    }

    /// Public key to publish in the issuer's identity document.
    pub fn public_key_hex(&self) -> String {
        self.keypair.public_key_hex()
    }

    /// Build and sign a credential about `subject`.
    ///
    /// `claims` must be a JSON object; its members are placed in
    /// `credentialSubject` after the subject `id`.
    pub fn issue(&self, subject: &Did, claims: Value) -> Result<Value, CredentialError> {
        let claims = match claims {
            Value::Object(claims) => claims,
            _ => {
                return Err(CredentialError::MalformedInput(
                    "claims must be a JSON object".into(),
                ))
            }
        };

        let mut credential_subject = Map::new();
        credential_subject.insert("id".into(), Value::String(subject.to_string()));
        credential_subject.extend(claims);

        let mut credential = Map::new();
        credential.insert("context".into(), Value::String(CREDENTIALS_CONTEXT.into()));
        credential.insert(
            "type".into(),
            Value::Array(vec![Value::String("VerifiableCredential".into())]),
        );
        credential.insert("issuer".into(), Value::String(self.did.to_string()));
        credential.insert("issuanceDate".into(), Value::String(timestamp()));
        credential.insert("credentialSubject".into(), Value::Object(credential_subject));

        let signed = self.sign(Value::Object(credential))?;

        tracing::info!(
            issuer = %self.did,
            subject = %subject,
            "credential issued"
        );

        Ok(signed)
    }

    /// Sign a caller-built credential.
    pub fn sign(&self, credential: Value) -> Result<Value, CredentialError> {
        sign_credential(credential, &self.verification_method, &self.keypair)
    }
}
