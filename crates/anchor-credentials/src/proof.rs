use serde::{Deserialize, Serialize};
use serde_json::Value;

use anchor_core::DidUrl;

use crate::error::CredentialError;

/// Proof type attached by this crate's signers.
pub const DEFAULT_PROOF_TYPE: &str = "EcdsaSecp256k1RecoveryMethod2020";

/// Proof purpose of a credential proof.
pub const ASSERTION_METHOD: &str = "assertionMethod";

/// Proof purpose of a presentation proof.
pub const AUTHENTICATION: &str = "authentication";

/// A proof block attached to a credential or presentation.
///
/// Serialized field order is the order signers emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    #[serde(rename = "type")]
    pub proof_type: String,
    /// ISO-8601 creation time.
    pub created: String,
    #[serde(rename = "proofPurpose")]
    pub proof_purpose: String,
    /// DID URL of the signing key.
    #[serde(rename = "verificationMethod")]
    pub verification_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Hex DER signature.
    pub signature: String,
}

impl Proof {
    /// Read the `proof` member of a signed document.
    pub fn from_document(document: &Value) -> Result<Self, CredentialError> {
        let proof = document
            .get("proof")
            .ok_or_else(|| CredentialError::MalformedInput("missing proof block".into()))?;
        serde_json::from_value(proof.clone())
            .map_err(|e| CredentialError::MalformedInput(format!("malformed proof block: {}", e)))
    }

    /// Parsed `verificationMethod`.
    pub fn verification_method_url(&self) -> Result<DidUrl, CredentialError> {
        Ok(DidUrl::parse(&self.verification_method)?)
    }

    /// `challenge` and `domain`, both required on a presentation proof.
    pub fn replay_fields(&self) -> Result<(&str, &str), CredentialError> {
        match (self.challenge.as_deref(), self.domain.as_deref()) {
            (Some(challenge), Some(domain)) => Ok((challenge, domain)),
            _ => Err(CredentialError::MalformedInput(
                "presentation proof lacks challenge or domain".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_document() {
        let doc = serde_json::json!({
            "issuer": "did:xrpl:1:rffGVvdyzRxT1KJLs6K4ZaNj5LiDJGxNvu",
            "proof": {
                "type": "EcdsaSecp256k1RecoveryMethod2020",
                "created": "2024-04-25T13:30:08.925Z",
                "proofPurpose": "assertionMethod",
                "verificationMethod": "did:xrpl:1:rffGVvdyzRxT1KJLs6K4ZaNj5LiDJGxNvu#keys-1",
                "signature": "3045"
            }
        });
        let proof = Proof::from_document(&doc).unwrap();
        assert_eq!(proof.proof_purpose, ASSERTION_METHOD);
        assert!(proof.challenge.is_none());
        assert!(proof.replay_fields().is_err());
        assert_eq!(proof.verification_method_url().unwrap().fragment(), Some("keys-1"));
    }

    #[test]
    fn test_missing_proof() {
        let doc = serde_json::json!({"issuer": "x"});
        assert!(matches!(
            Proof::from_document(&doc),
            Err(CredentialError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_proof_missing_signature() {
        let doc = serde_json::json!({"proof": {
            "type": "EcdsaSecp256k1RecoveryMethod2020",
            "created": "2024-04-25T13:30:08.925Z",
            "proofPurpose": "assertionMethod",
            "verificationMethod": "did:xrpl:1:rffGVvdyzRxT1KJLs6K4ZaNj5LiDJGxNvu#keys-1"
        }});
        assert!(Proof::from_document(&doc).is_err());
    }

    #[test]
    fn test_serialized_field_order() {
        let proof = Proof {
            proof_type: DEFAULT_PROOF_TYPE.into(),
            created: "t".into(),
            proof_purpose: AUTHENTICATION.into(),
            verification_method: "vm".into(),
            challenge: Some("c".into()),
            domain: Some("d".into()),
            signature: "s".into(),
        };
        let json = serde_json::to_string(&proof).unwrap();
        assert_eq!(
            json,
            r#"{"type":"EcdsaSecp256k1RecoveryMethod2020","created":"t","proofPurpose":"authentication","verificationMethod":"vm","challenge":"c","domain":"d","signature":"s"}"#
        );
    }
}
