use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use anchor_core::Did;

use crate::error::IdentityError;

/// Verification method type published for secp256k1 keys.
pub const SECP256K1_METHOD_TYPE: &str = "EcdsaSecp256k1RecoveryMethod2020";

/// Service type of an issuer's public profile.
pub const PROFILE_SERVICE_TYPE: &str = "Public Profile";

const DID_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// A verification method within an identity document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationMethod {
    /// Verification method identifier (e.g., "did:xrpl:1:r...#keys-1").
    pub id: String,
    /// Type of the verification method.
    #[serde(rename = "type")]
    pub method_type: String,
    /// The DID that controls this verification method.
    pub controller: String,
    /// Hex-encoded SEC1 public key.
    #[serde(rename = "publicKeyHex")]
    pub public_key_hex: String,
}

impl VerificationMethod {
    /// Decoded public key material.
    pub fn public_key_bytes(&self) -> Result<Vec<u8>, IdentityError> {
        hex::decode(&self.public_key_hex).map_err(|e| {
            IdentityError::DocumentFetch(format!(
                "verification method {} has non-hex key material: {}",
                self.id, e
            ))
        })
    }
}

/// A service entry in an identity document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Service identifier (e.g., "did:xrpl:1:r...#profile").
    pub id: String,
    /// Service type (e.g., "Public Profile").
    #[serde(rename = "type")]
    pub service_type: String,
    /// URL of the resource.
    #[serde(rename = "serviceEndpoint")]
    pub service_endpoint: String,
}

/// Identity document published on the content network.
///
/// Untrusted input: every document is validated with [`IdentityDocument::validate`]
/// before any field is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityDocument {
    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
    /// The DID subject.
    pub id: String,
    /// DID controlling the document.
    pub controller: String,
    /// Public keys, in published order.
    #[serde(rename = "verificationMethod")]
    pub verification_methods: Vec<VerificationMethod>,
    /// Services, in published order.
    #[serde(rename = "service", default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<Service>,
}

impl IdentityDocument {
    /// Create a self-controlled document with a single `#keys-1` method.
    pub fn new(did: &Did, public_key_hex: &str) -> Self {
        let id = did.to_string();
        Self {
            context: Some(serde_json::Value::String(DID_CONTEXT.into())),
            verification_methods: vec![VerificationMethod {
                id: format!("{}#keys-1", id),
                method_type: SECP256K1_METHOD_TYPE.to_string(),
                controller: id.clone(),
                public_key_hex: public_key_hex.to_string(),
            }],
            services: Vec::new(),
            controller: id.clone(),
            id,
        }
    }

    /// Add the `#profile` service pointing at the issuer profile.
    pub fn with_profile(mut self, endpoint: &str) -> Self {
        self.services.push(Service {
            id: format!("{}#profile", self.id),
            service_type: PROFILE_SERVICE_TYPE.to_string(),
            service_endpoint: endpoint.to_string(),
        });
        self
    }

    /// Add another verification method as `#keys-<n>`.
    pub fn add_verification_method(&mut self, method_type: &str, public_key_hex: &str) {
        let idx = self.verification_methods.len() + 1;
        self.verification_methods.push(VerificationMethod {
            id: format!("{}#keys-{}", self.id, idx),
            method_type: method_type.to_string(),
            controller: self.id.clone(),
            public_key_hex: public_key_hex.to_string(),
        });
    }

    /// Parse fetched bytes and validate them as the document of `did`.
    pub fn from_slice(bytes: &[u8], did: &Did) -> Result<Self, IdentityError> {
        let doc: Self = serde_json::from_slice(bytes).map_err(|e| {
            IdentityError::DocumentFetch(format!("identity document of {} is malformed: {}", did, e))
        })?;
        doc.validate(did)?;
        Ok(doc)
    }

    /// Check the structural invariants of a published document.
    ///
    /// - `id` equals the DID it was resolved for
    /// - every method and service id is unique and starts with `<id>#`
    /// - key material is non-empty hex
    pub fn validate(&self, did: &Did) -> Result<(), IdentityError> {
        let expected = did.to_string();
        if self.id != expected {
            return Err(IdentityError::DocumentFetch(format!(
                "document id {} does not match {}",
                self.id, expected
            )));
        }

        let prefix = format!("{}#", self.id);
        let mut seen = HashSet::new();
        let ids = self
            .verification_methods
            .iter()
            .map(|vm| vm.id.as_str())
            .chain(self.services.iter().map(|s| s.id.as_str()));
        for id in ids {
            if !id.starts_with(&prefix) || id.len() == prefix.len() {
                return Err(IdentityError::DocumentFetch(format!(
                    "entry {} is not scoped to {}",
                    id, self.id
                )));
            }
            if !seen.insert(id) {
                return Err(IdentityError::DocumentFetch(format!("duplicate entry id {}", id)));
            }
        }

        for vm in &self.verification_methods {
            if vm.public_key_bytes()?.is_empty() {
                return Err(IdentityError::DocumentFetch(format!(
                    "verification method {} has empty key material",
                    vm.id
                )));
            }
        }

        Ok(())
    }

    /// Find a verification method by its full DID URL.
    pub fn find_verification_method(&self, id: &str) -> Option<&VerificationMethod> {
        self.verification_methods.iter().find(|vm| vm.id == id)
    }

    /// Find a service by its full DID URL.
    pub fn find_service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    /// Serialize for publishing.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, IdentityError> {
        serde_json::to_vec(self).map_err(|e| IdentityError::Internal(e.to_string()))
    }
}
