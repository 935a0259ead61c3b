//! Content-addressed document fetching.

use async_trait::async_trait;
use dashmap::DashMap;

use anchor_core::config::{NetworkConfig, StoreConfig};
use anchor_crypto::ContentId;

use crate::error::IdentityError;

/// Fetches raw document bytes. `Ok(None)` means the resource does not exist.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by content identifier.
    async fn fetch_by_identifier(&self, cid: &ContentId) -> Result<Option<Vec<u8>>, IdentityError>;

    /// Fetch a resource by URL (e.g. a service endpoint).
    async fn fetch_by_url(&self, url: &str) -> Result<Option<Vec<u8>>, IdentityError>;
}

/// Reads documents through an HTTP gateway of the content network.
pub struct IpfsGatewayStore {
    http: reqwest::Client,
    gateway_url: String,
    max_document_bytes: usize,
}

impl IpfsGatewayStore {
    /// Build a store with connect and request timeouts applied.
    pub fn new(store: &StoreConfig, network: &NetworkConfig) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .connect_timeout(network.connect_timeout())
            .timeout(network.request_timeout())
            .build()
            .map_err(|e| IdentityError::Internal(format!("http client: {}", e)))?;

        let mut gateway_url = store.gateway_url.clone();
        if !gateway_url.ends_with('/') {
            gateway_url.push('/');
        }
        Ok(Self {
            http,
            gateway_url,
            max_document_bytes: store.max_document_bytes,
        })
    }

    /// Gateway URL of a content identifier.
    pub fn url_for(&self, cid: &str) -> String {
        format!("{}{}", self.gateway_url, cid)
    }

    /// `ipfs://<cid>[/path]` endpoints are served through the gateway.
    fn rewrite(&self, url: &str) -> String {
        match url.strip_prefix("ipfs://") {
            Some(rest) => self.url_for(rest),
            None => url.to_string(),
        }
    }

    async fn get(&self, url: &str) -> Result<Option<Vec<u8>>, IdentityError> {
        let mut response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| IdentityError::from_transport(url, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status.is_server_error() {
            return Err(IdentityError::TransportUnavailable(format!(
                "{} returned HTTP {}",
                url, status
            )));
        }
        if !status.is_success() {
            return Err(IdentityError::DocumentFetch(format!(
                "{} returned HTTP {}",
                url, status
            )));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_document_bytes as u64 {
                return Err(oversized(url, self.max_document_bytes));
            }
        }
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| IdentityError::from_transport(url, e))?
        {
            append_capped(&mut body, &chunk, self.max_document_bytes, url)?;
        }
        tracing::debug!(url, len = body.len(), "fetched document");
        Ok(Some(body))
    }
}

fn oversized(url: &str, limit: usize) -> IdentityError {
    IdentityError::DocumentFetch(format!("{} is larger than {} bytes", url, limit))
}

/// Gateway bodies are untrusted; stop reading once `limit` is exceeded.
fn append_capped(
    body: &mut Vec<u8>,
    chunk: &[u8],
    limit: usize,
    url: &str,
) -> Result<(), IdentityError> {
    if body.len() + chunk.len() > limit {
        return Err(oversized(url, limit));
    }
    body.extend_from_slice(chunk);
    Ok(())
}

#[async_trait]
impl DocumentStore for IpfsGatewayStore {
    async fn fetch_by_identifier(&self, cid: &ContentId) -> Result<Option<Vec<u8>>, IdentityError> {
        self.get(&self.url_for(cid.as_str())).await
    }

    async fn fetch_by_url(&self, url: &str) -> Result<Option<Vec<u8>>, IdentityError> {
        self.get(&self.rewrite(url)).await
    }
}

/// In-memory document store keyed by content identifier and by URL.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: DashMap<String, Vec<u8>>,
    resources: DashMap<String, Vec<u8>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store bytes under a content identifier.
    pub fn insert_document(&self, cid: &ContentId, bytes: Vec<u8>) {
        self.documents.insert(cid.as_str().to_string(), bytes);
    }

    /// Store bytes under a URL.
    pub fn insert_resource(&self, url: &str, bytes: Vec<u8>) {
        self.resources.insert(url.to_string(), bytes);
    }

    pub fn remove_document(&self, cid: &ContentId) -> bool {
        self.documents.remove(cid.as_str()).is_some()
    }

    pub fn len(&self) -> usize {
        self.documents.len() + self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn fetch_by_identifier(&self, cid: &ContentId) -> Result<Option<Vec<u8>>, IdentityError> {
        Ok(self.documents.get(cid.as_str()).map(|e| e.value().clone()))
    }

    async fn fetch_by_url(&self, url: &str) -> Result<Option<Vec<u8>>, IdentityError> {
        Ok(self.resources.get(url).map(|e| e.value().clone()))
    }
}
