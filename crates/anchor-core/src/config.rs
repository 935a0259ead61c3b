use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::DEFAULT_DID_METHOD;

/// Full configuration for resolution and verification.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnchorConfig {
    /// Ledger settings.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Content-addressed document store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Timeouts applied to every network call.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Trust-chain evaluation settings.
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint of a ledger node.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// DID method accepted by the resolver.
    #[serde(default = "default_did_method")]
    pub did_method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Gateway prefix; the content identifier is appended to it.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
    /// Largest document or profile body accepted from the gateway, in bytes.
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Whole-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Maximum number of credentials checked concurrently.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Resolve each verified issuer's `#profile` service for display.
    #[serde(default = "default_true")]
    pub fetch_issuer_profiles: bool,
    /// TTL of the resolution cache. Absent means no caching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_rpc_url() -> String {
    "https://s.devnet.rippletest.net:51234/".into()
}
fn default_did_method() -> String {
    DEFAULT_DID_METHOD.into()
}
fn default_gateway_url() -> String {
    "https://gateway.pinata.cloud/ipfs/".into()
}
fn default_max_document_bytes() -> usize {
    1024 * 1024
}
fn default_connect_timeout_ms() -> u64 {
    5_000
}
fn default_request_timeout_ms() -> u64 {
    15_000
}
fn default_parallelism() -> usize {
    4
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            did_method: default_did_method(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
            max_document_bytes: default_max_document_bytes(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
            fetch_issuer_profiles: true,
            cache_ttl_secs: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl NetworkConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl VerificationConfig {
    /// Parallelism clamped to at least one task.
    pub fn effective_parallelism(&self) -> usize {
        self.parallelism.max(1)
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }
}
