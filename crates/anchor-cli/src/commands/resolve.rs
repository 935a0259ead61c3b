//! `anchor resolve` — Resolve a DID or DID URL.

use clap::Args;

use anchor_core::{AnchorConfig, DidUrl};
use anchor_credentials::VerificationSession;
use anchor_identity::ResolvedTarget;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// DID or DID URL (e.g. did:xrpl:1:r...#keys-1).
    pub did_url: String,
}

pub async fn run(args: &ResolveArgs, config: &AnchorConfig) -> anyhow::Result<()> {
    let did_url = DidUrl::parse_with_method(&args.did_url, &config.ledger.did_method)?;
    let session = VerificationSession::open(config)?;
    tracing::debug!(did_url = %did_url, rpc_url = %config.ledger.rpc_url, "resolving");

    match session.resolve(&did_url).await {
        Ok(ResolvedTarget::Document(document)) => {
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        Ok(ResolvedTarget::VerificationKey(key)) => {
            println!("{}", hex::encode_upper(key));
        }
        Ok(ResolvedTarget::ServiceResource(resource)) => {
            println!("{}", serde_json::to_string_pretty(&resource)?);
        }
        Err(e) => {
            let hint = if e.is_retryable() { " (transient, retry later)" } else { "" };
            anyhow::bail!("resolve failed [{}]{}: {}", e.reason_code(), hint, e);
        }
    }

    Ok(())
}
