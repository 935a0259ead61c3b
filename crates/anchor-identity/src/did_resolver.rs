use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anchor_core::{DidUrl, FragmentKind, DEFAULT_DID_METHOD};
use anchor_crypto::decode_ledger_handle;

use crate::document::IdentityDocument;
use crate::error::IdentityError;
use crate::ledger::LedgerClient;
use crate::store::DocumentStore;

/// Default bound on every ledger and store call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(15);

/// What a DID URL resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedTarget {
    /// Bare DID: the whole identity document.
    Document(IdentityDocument),
    /// `#key...` fragment: the public key material of that method.
    VerificationKey(Vec<u8>),
    /// `#profile...` / `#service...` fragment: the JSON behind the service endpoint.
    ServiceResource(serde_json::Value),
}

/// Trait for resolving DID URLs.
#[async_trait]
pub trait DidResolver: Send + Sync {
    /// Resolve a DID URL to a document, key or service resource.
    async fn resolve(&self, did_url: &DidUrl) -> Result<ResolvedTarget, IdentityError>;

    /// Resolve a `#key...` DID URL to its public key bytes.
    async fn resolve_key(&self, did_url: &DidUrl) -> Result<Vec<u8>, IdentityError> {
        match self.resolve(did_url).await? {
            ResolvedTarget::VerificationKey(key) => Ok(key),
            _ => Err(IdentityError::MalformedInput(format!(
                "{} does not name a verification method",
                did_url
            ))),
        }
    }

    /// Resolve a service DID URL to the resource behind it.
    async fn resolve_service(&self, did_url: &DidUrl) -> Result<serde_json::Value, IdentityError> {
        match self.resolve(did_url).await? {
            ResolvedTarget::ServiceResource(value) => Ok(value),
            _ => Err(IdentityError::MalformedInput(format!(
                "{} does not name a service",
                did_url
            ))),
        }
    }
}

/// Resolves DIDs through the ledger and the document store.
///
/// Holds no state between calls: every resolution reads the current ledger
/// record and the current published document.
pub struct LedgerDidResolver {
    ledger: Arc<dyn LedgerClient>,
    store: Arc<dyn DocumentStore>,
    method: String,
    call_timeout: Duration,
}

impl LedgerDidResolver {
    /// Create a resolver for the default DID method.
    pub fn new(ledger: Arc<dyn LedgerClient>, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            ledger,
            store,
            method: DEFAULT_DID_METHOD.to_string(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Accept a different DID method.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Bound each ledger and store call.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// DID method accepted by this resolver.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Parse a DID URL, requiring this resolver's method.
    pub fn parse(&self, input: &str) -> Result<DidUrl, IdentityError> {
        Ok(DidUrl::parse_with_method(input, &self.method)?)
    }

    async fn bounded<T, F>(&self, what: &str, call: F) -> Result<T, IdentityError>
    where
        F: Future<Output = Result<T, IdentityError>>,
    {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(IdentityError::TransportTimeout(format!(
                "{} exceeded {:?}",
                what, self.call_timeout
            ))),
        }
    }

    /// Ledger record → content identifier → validated document.
    async fn fetch_document(&self, did_url: &DidUrl) -> Result<IdentityDocument, IdentityError> {
        let did = did_url.did();

        let record = self
            .bounded("ledger lookup", self.ledger.fetch_account_record(did.address()))
            .await?
            .ok_or_else(|| IdentityError::DidNotFound(did.to_string()))?;

        let cid = decode_ledger_handle(&record.handle)?;
        tracing::debug!(did = %did, cid = %cid, "ledger record resolved");

        let bytes = self
            .bounded("document fetch", self.store.fetch_by_identifier(&cid))
            .await?
            .ok_or_else(|| {
                IdentityError::DocumentFetch(format!("document {} of {} not found", cid, did))
            })?;

        IdentityDocument::from_slice(&bytes, did)
    }
}

#[async_trait]
impl DidResolver for LedgerDidResolver {
    async fn resolve(&self, did_url: &DidUrl) -> Result<ResolvedTarget, IdentityError> {
        if did_url.did().method() != self.method {
            return Err(IdentityError::MalformedInput(format!(
                "unsupported DID method {} (expected {})",
                did_url.did().method(),
                self.method
            )));
        }
        let kind = did_url.fragment_kind()?;
        let document = self.fetch_document(did_url).await?;
        let target = did_url.to_string();

        match kind {
            None => Ok(ResolvedTarget::Document(document)),

            Some(FragmentKind::VerificationMethod) => {
                let method = document
                    .find_verification_method(&target)
                    .ok_or_else(|| IdentityError::VerificationMethodNotFound(target.clone()))?;
                tracing::debug!(did_url = %target, "verification method resolved");
                Ok(ResolvedTarget::VerificationKey(method.public_key_bytes()?))
            }

            Some(FragmentKind::Service) => {
                let service = document
                    .find_service(&target)
                    .ok_or_else(|| IdentityError::ServiceNotFound(target.clone()))?;

                let bytes = self
                    .bounded(
                        "service fetch",
                        self.store.fetch_by_url(&service.service_endpoint),
                    )
                    .await?
                    .ok_or_else(|| {
                        IdentityError::DocumentFetch(format!(
                            "service endpoint {} not found",
                            service.service_endpoint
                        ))
                    })?;

                let resource: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
                    IdentityError::DocumentFetch(format!(
                        "service resource at {} is malformed: {}",
                        service.service_endpoint, e
                    ))
                })?;
                if !resource.is_object() {
                    return Err(IdentityError::DocumentFetch(format!(
                        "service resource at {} is not a JSON object",
                        service.service_endpoint
                    )));
                }
                tracing::debug!(did_url = %target, endpoint = %service.service_endpoint, "service resolved");
                Ok(ResolvedTarget::ServiceResource(resource))
            }
        }
    }
}
