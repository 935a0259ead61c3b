//! `anchor verify` — Verify a presentation and the credentials it carries.

use clap::Args;
use std::path::PathBuf;

use anchor_core::{AnchorConfig, Verdict};
use anchor_credentials::{verify_presentation, EvaluatorOptions};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Presentation JSON file.
    pub presentation: PathBuf,

    /// Require this challenge in the presentation proof.
    #[arg(long)]
    pub challenge: Option<String>,

    /// Require this domain in the presentation proof.
    #[arg(long)]
    pub domain: Option<String>,

    /// Override the configured credential parallelism.
    #[arg(long)]
    pub parallelism: Option<usize>,

    /// Skip issuer profile lookups.
    #[arg(long)]
    pub no_profiles: bool,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: &VerifyArgs, config: &AnchorConfig) -> anyhow::Result<()> {
    let contents = std::fs::read(&args.presentation)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", args.presentation.display(), e))?;
    let presentation: serde_json::Value = serde_json::from_slice(&contents)
        .map_err(|e| anyhow::anyhow!("invalid presentation JSON: {}", e))?;
    tracing::debug!(path = %args.presentation.display(), "presentation loaded");

    let mut options = EvaluatorOptions::from_config(&config.verification);
    options.expected_challenge = args.challenge.clone();
    options.expected_domain = args.domain.clone();
    if let Some(parallelism) = args.parallelism {
        options.parallelism = parallelism.max(1);
    }
    if args.no_profiles {
        options.fetch_issuer_profiles = false;
    }

    let report = verify_presentation(config, &presentation, options).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for profile in &report.issuer_profiles {
            println!(
                "credential {} issuer {} profile:\n{}",
                profile.index,
                profile.issuer,
                serde_json::to_string_pretty(&profile.profile)?
            );
        }
        println!("{}", report.verdict);
    }

    match &report.verdict {
        Verdict::Accepted => Ok(()),
        Verdict::Rejected(rejection) => {
            let hint = if rejection.reason.is_retryable() {
                " (transient, retry later)"
            } else {
                ""
            };
            anyhow::bail!("presentation rejected [{}]{}", rejection.reason, hint)
        }
    }
}
