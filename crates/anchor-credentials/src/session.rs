use serde_json::Value;
use std::sync::Arc;

use anchor_core::{AnchorConfig, DidUrl, ReasonCode, Verdict};
use anchor_identity::{
    CachingResolver, DidResolver, IdentityError, IpfsGatewayStore, LedgerDidResolver,
    ResolvedTarget, XrplLedgerClient,
};

use crate::evaluator::{EvaluatorOptions, TrustChainEvaluator, VerificationReport};

/// Ledger and document-store clients scoped to one top-level call.
///
/// Nothing is shared between sessions. Consuming methods release the
/// clients when the call returns.
pub struct VerificationSession {
    resolver: Arc<dyn DidResolver>,
    options: EvaluatorOptions,
}

impl VerificationSession {
    /// Build fresh clients from configuration.
    pub fn open(config: &AnchorConfig) -> Result<Self, IdentityError> {
        let ledger = XrplLedgerClient::new(&config.ledger, &config.network)?;
        let store = IpfsGatewayStore::new(&config.store, &config.network)?;
        let resolver = LedgerDidResolver::new(Arc::new(ledger), Arc::new(store))
            .with_method(config.ledger.did_method.clone())
            .with_call_timeout(config.network.request_timeout());

        let resolver: Arc<dyn DidResolver> = match config.verification.cache_ttl() {
            Some(ttl) => Arc::new(CachingResolver::new(resolver, ttl)),
            None => Arc::new(resolver),
        };

        tracing::debug!(
            rpc_url = %config.ledger.rpc_url,
            gateway_url = %config.store.gateway_url,
            "verification session opened"
        );

        Ok(Self {
            resolver,
            options: EvaluatorOptions::from_config(&config.verification),
        })
    }

    /// Use an existing resolver (e.g. over in-memory collaborators).
    pub fn with_resolver(resolver: Arc<dyn DidResolver>, options: EvaluatorOptions) -> Self {
        Self { resolver, options }
    }

    pub fn options_mut(&mut self) -> &mut EvaluatorOptions {
        &mut self.options
    }

    /// Resolve a DID URL with this session's clients.
    pub async fn resolve(self, did_url: &DidUrl) -> Result<ResolvedTarget, IdentityError> {
        self.resolver.resolve(did_url).await
    }

    /// Verify a presentation with this session's clients.
    pub async fn verify_presentation(self, presentation: &Value) -> VerificationReport {
        TrustChainEvaluator::new(self.resolver, self.options)
            .verify_presentation(presentation)
            .await
    }
}

/// Verify a presentation with clients built from `config` for this call only.
///
/// Client construction failures are reported as an `InternalError` verdict.
pub async fn verify_presentation(
    config: &AnchorConfig,
    presentation: &Value,
    options: EvaluatorOptions,
) -> VerificationReport {
    match VerificationSession::open(config) {
        Ok(mut session) => {
            *session.options_mut() = options;
            session.verify_presentation(presentation).await
        }
        Err(e) => VerificationReport {
            verdict: Verdict::rejected(ReasonCode::InternalError, None, e.to_string()),
            issuer_profiles: Vec::new(),
        },
    }
}
