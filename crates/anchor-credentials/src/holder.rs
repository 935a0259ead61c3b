use serde_json::{Map, Value};

use anchor_core::Did;
use anchor_crypto::{sign_hex, KeyPair};

use crate::canonical::presentation_signing_input;
use crate::error::CredentialError;
use crate::issuer::{proof_value, timestamp, CREDENTIALS_CONTEXT};
use crate::proof::{Proof, AUTHENTICATION, DEFAULT_PROOF_TYPE};

/// Wrap credentials in a presentation bound to `challenge` and `domain`.
pub fn sign_presentation(
    credentials: Vec<Value>,
    verification_method: &str,
    challenge: &str,
    domain: &str,
    keypair: &KeyPair,
) -> Result<Value, CredentialError> {
    let mut presentation = Map::new();
    presentation.insert("context".into(), Value::String(CREDENTIALS_CONTEXT.into()));
    presentation.insert("type".into(), Value::String("VerifiablePresentation".into()));
    presentation.insert("verifiableCredential".into(), Value::Array(credentials));

    let mut proof = Proof {
        proof_type: DEFAULT_PROOF_TYPE.to_string(),
        created: timestamp(),
        proof_purpose: AUTHENTICATION.to_string(),
        verification_method: verification_method.to_string(),
        challenge: Some(challenge.to_string()),
        domain: Some(domain.to_string()),
        signature: String::new(),
    };
    presentation.insert("proof".into(), proof_value(&proof)?);

    let input = presentation_signing_input(&Value::Object(presentation.clone()))?;
    proof.signature = sign_hex(&input, keypair);
    presentation.insert("proof".into(), proof_value(&proof)?);

    Ok(Value::Object(presentation))
}

/// Presents credentials under the holder's own DID.
pub struct CredentialHolder {
    did: Did,
    keypair: KeyPair,
    verification_method: String,
}

impl CredentialHolder {
    /// Create a holder signing as `<did>#keys-1`.
    pub fn new(did: Did, keypair: KeyPair) -> Self {
        let verification_method = did.with_fragment("keys-1").to_string();
        Self {
            did,
            keypair,
            verification_method,
        }
    }

    pub fn with_verification_method(mut self, verification_method: impl Into<String>) -> Self {
        self.verification_method = verification_method.into();
        self
    }

    pub fn did(&self) -> &Did {
        &self.did
    }

    pub fn public_key_hex(&self) -> String {
        self.keypair.public_key_hex()
    }

    /// Build a signed presentation of `credentials` for one verifier session.
    pub fn present(
        &self,
        credentials: Vec<Value>,
        challenge: &str,
        domain: &str,
    ) -> Result<Value, CredentialError> {
        let count = credentials.len();
        let presentation = sign_presentation(
            credentials,
            &self.verification_method,
            challenge,
            domain,
            &self.keypair,
        )?;
        tracing::info!(holder = %self.did, credentials = count, domain, "presentation signed");
        Ok(presentation)
    }
}
