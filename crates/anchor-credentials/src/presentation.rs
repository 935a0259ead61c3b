//! Checked views over received credentials and presentations.
//!
//! The raw JSON is kept as received: signing inputs are rebuilt from it, so
//! nothing here may reorder or normalise fields.

use serde_json::Value;

use anchor_core::Did;

use crate::error::CredentialError;
use crate::proof::Proof;

/// A credential whose `issuer` and `proof` have been checked for shape.
#[derive(Debug, Clone)]
pub struct Credential<'a> {
    raw: &'a Value,
    issuer: Did,
    proof: Proof,
}

impl<'a> Credential<'a> {
    pub fn from_value(raw: &'a Value) -> Result<Self, CredentialError> {
        if !raw.is_object() {
            return Err(CredentialError::MalformedInput(
                "credential is not a JSON object".into(),
            ));
        }
        let issuer = raw
            .get("issuer")
            .and_then(Value::as_str)
            .ok_or_else(|| CredentialError::MalformedInput("credential lacks issuer".into()))?;
        let issuer = Did::parse(issuer)?;
        let proof = Proof::from_document(raw)?;
        Ok(Self { raw, issuer, proof })
    }

    pub fn raw(&self) -> &'a Value {
        self.raw
    }

    pub fn issuer(&self) -> &Did {
        &self.issuer
    }

    pub fn proof(&self) -> &Proof {
        &self.proof
    }

    /// `credentialSubject.id` when it names a DID.
    pub fn subject_did(&self) -> Option<&'a str> {
        self.raw
            .get("credentialSubject")
            .and_then(|subject| subject.get("id"))
            .and_then(Value::as_str)
            .filter(|id| id.starts_with("did:"))
    }
}

/// A presentation whose proof and credential list have been checked for shape.
///
/// Embedded credentials are checked individually during evaluation so a
/// malformed one is reported with its index.
#[derive(Debug, Clone)]
pub struct Presentation<'a> {
    raw: &'a Value,
    credentials: &'a [Value],
    proof: Proof,
}

impl<'a> Presentation<'a> {
    pub fn from_value(raw: &'a Value) -> Result<Self, CredentialError> {
        if !raw.is_object() {
            return Err(CredentialError::MalformedInput(
                "presentation is not a JSON object".into(),
            ));
        }
        let credentials = raw
            .get("verifiableCredential")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                CredentialError::MalformedInput(
                    "presentation lacks a verifiableCredential array".into(),
                )
            })?;
        let proof = Proof::from_document(raw)?;
        proof.replay_fields()?;
        Ok(Self {
            raw,
            credentials: credentials.as_slice(),
            proof,
        })
    }

    pub fn raw(&self) -> &'a Value {
        self.raw
    }

    pub fn credentials(&self) -> &'a [Value] {
        self.credentials
    }

    pub fn proof(&self) -> &Proof {
        &self.proof
    }
}
