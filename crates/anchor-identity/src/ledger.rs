//! Ledger record lookup.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;

use anchor_core::config::{LedgerConfig, NetworkConfig};

use crate::error::IdentityError;

/// Identity record of an account: the hex handle of its published document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    pub handle: String,
}

/// Reads identity records from validated ledger state.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fetch the record of `address`. `Ok(None)` means no record exists.
    async fn fetch_account_record(
        &self,
        address: &str,
    ) -> Result<Option<LedgerRecord>, IdentityError>;
}

/// JSON-RPC client querying `account_objects` on an XRPL node.
pub struct XrplLedgerClient {
    http: reqwest::Client,
    rpc_url: String,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: AccountObjectsResult,
}

#[derive(Deserialize)]
struct AccountObjectsResult {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    account_objects: Vec<LedgerObject>,
}

#[derive(Deserialize)]
struct LedgerObject {
    #[serde(rename = "LedgerEntryType", default)]
    entry_type: Option<String>,
    #[serde(rename = "DIDDocument", default)]
    did_document: Option<String>,
}

impl XrplLedgerClient {
    /// Build a client with connect and request timeouts applied.
    pub fn new(ledger: &LedgerConfig, network: &NetworkConfig) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .connect_timeout(network.connect_timeout())
            .timeout(network.request_timeout())
            .build()
            .map_err(|e| IdentityError::Internal(format!("http client: {}", e)))?;
        Ok(Self {
            http,
            rpc_url: ledger.rpc_url.clone(),
        })
    }

    fn request_body(address: &str) -> serde_json::Value {
        serde_json::json!({
            "method": "account_objects",
            "params": [{
                "account": address,
                "ledger_index": "validated",
                "type": "did"
            }]
        })
    }

    fn interpret(address: &str, result: AccountObjectsResult) -> Result<Option<LedgerRecord>, IdentityError> {
        if let Some(error) = result.error {
            let message = result.error_message.unwrap_or_default();
            return match error.as_str() {
                "actNotFound" => Ok(None),
                "actMalformed" | "invalidParams" => Err(IdentityError::MalformedInput(format!(
                    "ledger rejected {}: {} {}",
                    address, error, message
                ))),
                _ => Err(IdentityError::TransportUnavailable(format!(
                    "ledger error for {}: {} {}",
                    address, error, message
                ))),
            };
        }

        let record = result
            .account_objects
            .into_iter()
            .filter(|obj| obj.entry_type.as_deref().map_or(true, |t| t == "DID"))
            .find_map(|obj| obj.did_document)
            .map(|handle| LedgerRecord { handle });
        Ok(record)
    }
}

#[async_trait]
impl LedgerClient for XrplLedgerClient {
    async fn fetch_account_record(
        &self,
        address: &str,
    ) -> Result<Option<LedgerRecord>, IdentityError> {
        let response = self
            .http
            .post(&self.rpc_url)
            .json(&Self::request_body(address))
            .send()
            .await
            .map_err(|e| IdentityError::from_transport("ledger request", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::TransportUnavailable(format!(
                "ledger returned HTTP {}",
                status
            )));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::from_transport("ledger response", e))?;

        let record = Self::interpret(address, body.result)?;
        tracing::debug!(address, found = record.is_some(), "ledger record lookup");
        Ok(record)
    }
}

/// In-memory ledger: address → handle.
#[derive(Default)]
pub struct InMemoryLedger {
    records: DashMap<String, String>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) the handle stored for an account.
    pub fn set_record(&self, address: &str, handle: &str) {
        self.records.insert(address.to_string(), handle.to_string());
    }

    /// Delete an account's record.
    pub fn remove_record(&self, address: &str) -> Option<String> {
        self.records.remove(address).map(|(_, handle)| handle)
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn fetch_account_record(
        &self,
        address: &str,
    ) -> Result<Option<LedgerRecord>, IdentityError> {
        Ok(self.records.get(address).map(|entry| LedgerRecord {
            handle: entry.value().clone(),
        }))
    }
}
