use futures::stream::{self, StreamExt};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use anchor_core::config::VerificationConfig;
use anchor_core::{
    Did, ReasonCode, Verdict, VerificationEvent, VerificationState, VerificationStateMachine,
};
use anchor_crypto::{is_supported_proof_type, verify};
use anchor_identity::DidResolver;

use crate::canonical::{credential_signing_input, presentation_signing_input};
use crate::error::CredentialError;
use crate::presentation::{Credential, Presentation};
use crate::proof::Proof;

/// Tunables of one evaluation.
#[derive(Debug, Clone)]
pub struct EvaluatorOptions {
    /// Maximum number of credentials checked concurrently.
    pub parallelism: usize,
    /// Resolve each verified issuer's `#profile` service.
    pub fetch_issuer_profiles: bool,
    /// Required value of the presentation proof's `challenge`.
    pub expected_challenge: Option<String>,
    /// Required value of the presentation proof's `domain`.
    pub expected_domain: Option<String>,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self::from_config(&VerificationConfig::default())
    }
}

impl EvaluatorOptions {
    pub fn from_config(config: &VerificationConfig) -> Self {
        Self {
            parallelism: config.effective_parallelism(),
            fetch_issuer_profiles: config.fetch_issuer_profiles,
            expected_challenge: None,
            expected_domain: None,
        }
    }

    pub fn with_challenge(mut self, challenge: impl Into<String>) -> Self {
        self.expected_challenge = Some(challenge.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.expected_domain = Some(domain.into());
        self
    }
}

/// Issuer profile fetched for a verified credential. Informational only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssuerProfile {
    pub index: usize,
    pub issuer: String,
    pub profile: Value,
}

/// Outcome of a presentation verification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    pub verdict: Verdict,
    /// Profiles of verified issuers, by credential index. Only filled for
    /// accepted presentations.
    pub issuer_profiles: Vec<IssuerProfile>,
}

impl VerificationReport {
    fn rejected(reason: ReasonCode, index: Option<usize>, detail: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::rejected(reason, index, detail),
            issuer_profiles: Vec::new(),
        }
    }
}

/// Walks the trust chain of a presentation: holder proof first, then every
/// embedded credential against its issuer's published key.
///
/// Fail-fast: the first failing proof decides the verdict. Credentials may
/// be checked concurrently, but the reported failure is always the one with
/// the lowest index.
pub struct TrustChainEvaluator {
    resolver: Arc<dyn DidResolver>,
    options: EvaluatorOptions,
}

impl TrustChainEvaluator {
    pub fn new(resolver: Arc<dyn DidResolver>, options: EvaluatorOptions) -> Self {
        Self { resolver, options }
    }

    pub fn options(&self) -> &EvaluatorOptions {
        &self.options
    }

    /// Verify a presentation and every credential it carries.
    ///
    /// Always returns a verdict; failures are reported as rejections.
    pub async fn verify_presentation(&self, presentation: &Value) -> VerificationReport {
        let report = match self.evaluate(presentation).await {
            Ok(report) => report,
            Err(e) => VerificationReport::rejected(e.reason_code(), None, e.to_string()),
        };
        match &report.verdict {
            Verdict::Accepted => tracing::info!(
                profiles = report.issuer_profiles.len(),
                "presentation accepted"
            ),
            Verdict::Rejected(r) => tracing::info!(
                reason = %r.reason,
                index = ?r.index,
                detail = %r.detail,
                "presentation rejected"
            ),
        }
        report
    }

    /// Verify a single credential against its issuer's key.
    pub async fn verify_credential(&self, credential: &Value) -> Verdict {
        match self.check_credential(credential).await {
            Ok(_) => Verdict::Accepted,
            Err(e) => Verdict::rejected(e.reason_code(), None, e.to_string()),
        }
    }

    /// State machine driver. `Err` only for faults of the machine itself.
    async fn evaluate(&self, presentation: &Value) -> Result<VerificationReport, CredentialError> {
        let mut state = VerificationState::Start;
        state = VerificationStateMachine::transition(state, VerificationEvent::Begin)?;

        let (credentials, holder) = match self.check_presentation_proof(presentation).await {
            Ok(checked) => checked,
            Err(e) => {
                VerificationStateMachine::transition(
                    state,
                    VerificationEvent::PresentationProofFailed,
                )?;
                return Ok(VerificationReport::rejected(
                    e.reason_code(),
                    None,
                    e.to_string(),
                ));
            }
        };
        state = VerificationStateMachine::transition(
            state,
            VerificationEvent::PresentationProofVerified,
        )?;

        let evaluator = self;
        let holder = &holder;
        let mut checks = stream::iter(credentials.iter().enumerate())
            .map(move |(index, credential)| async move {
                (index, evaluator.check_presented(credential, holder).await)
            })
            .buffered(self.options.parallelism.max(1));

        let mut issuers = Vec::with_capacity(credentials.len());
        while let Some((index, result)) = checks.next().await {
            match result {
                Ok(issuer) => {
                    tracing::debug!(index, "credential verified");
                    issuers.push((index, issuer));
                }
                Err(e) => {
                    VerificationStateMachine::transition(
                        state,
                        VerificationEvent::CredentialFailed,
                    )?;
                    tracing::debug!(index, error = %e, "credential rejected");
                    return Ok(VerificationReport::rejected(
                        e.reason_code(),
                        Some(index),
                        e.to_string(),
                    ));
                }
            }
        }

        VerificationStateMachine::transition(state, VerificationEvent::CredentialsVerified)?;
        Ok(VerificationReport {
            verdict: Verdict::Accepted,
            issuer_profiles: self.fetch_issuer_profiles(issuers).await,
        })
    }

    /// Verify the holder's proof; on success return the embedded credentials
    /// and the DID whose key signed the presentation.
    async fn check_presentation_proof<'a>(
        &self,
        presentation: &'a Value,
    ) -> Result<(&'a [Value], Did), CredentialError> {
        let vp = Presentation::from_value(presentation)?;
        let proof = vp.proof();
        let (challenge, domain) = proof.replay_fields()?;

        if let Some(expected) = &self.options.expected_challenge {
            if expected != challenge {
                return Err(CredentialError::ChallengeMismatch(format!(
                    "expected challenge {}, got {}",
                    expected, challenge
                )));
            }
        }
        if let Some(expected) = &self.options.expected_domain {
            if expected != domain {
                return Err(CredentialError::ChallengeMismatch(format!(
                    "expected domain {}, got {}",
                    expected, domain
                )));
            }
        }

        let holder = proof.verification_method_url()?.did().clone();
        let input = presentation_signing_input(presentation)?;
        self.check_signature(proof, &input, "invalid VP signature")
            .await?;
        tracing::debug!(holder = %proof.verification_method, "presentation proof verified");
        Ok((vp.credentials(), holder))
    }

    async fn check_credential(&self, credential: &Value) -> Result<Did, CredentialError> {
        let vc = Credential::from_value(credential)?;
        let proof = vc.proof();

        let method = proof.verification_method_url()?;
        if method.did() != vc.issuer() {
            return Err(CredentialError::SignatureInvalid(format!(
                "invalid credential signature: {} is not a key of issuer {}",
                proof.verification_method,
                vc.issuer()
            )));
        }

        let input = credential_signing_input(credential)?;
        self.check_signature(proof, &input, "invalid credential signature")
            .await?;
        Ok(vc.issuer().clone())
    }

    /// A presented credential must also be about the holder when its subject
    /// names a DID.
    async fn check_presented(&self, credential: &Value, holder: &Did) -> Result<Did, CredentialError> {
        let vc = Credential::from_value(credential)?;
        if let Some(subject) = vc.subject_did() {
            if subject != holder.to_string() {
                return Err(CredentialError::SignatureInvalid(format!(
                    "credential subject {} is not the presenting holder {}",
                    subject, holder
                )));
            }
        }
        self.check_credential(credential).await
    }

    /// Best-effort profile lookups for verified issuers; never affects the verdict.
    async fn fetch_issuer_profiles(&self, issuers: Vec<(usize, Did)>) -> Vec<IssuerProfile> {
        if !self.options.fetch_issuer_profiles {
            return Vec::new();
        }
        let resolver = &self.resolver;
        stream::iter(issuers)
            .map(move |(index, issuer)| async move {
                let profile_url = issuer.with_fragment("profile");
                match resolver.resolve_service(&profile_url).await {
                    Ok(profile) => Some(IssuerProfile {
                        index,
                        issuer: issuer.to_string(),
                        profile,
                    }),
                    Err(e) => {
                        tracing::warn!(index, issuer = %issuer, error = %e, "issuer profile unavailable");
                        None
                    }
                }
            })
            .buffered(self.options.parallelism.max(1))
            .filter_map(|profile| async move { profile })
            .collect()
            .await
    }

    async fn check_signature(
        &self,
        proof: &Proof,
        input: &[u8],
        rejection: &str,
    ) -> Result<(), CredentialError> {
        if !is_supported_proof_type(&proof.proof_type) {
            return Err(CredentialError::MalformedInput(format!(
                "unsupported proof type {}",
                proof.proof_type
            )));
        }
        let key = self
            .resolver
            .resolve_key(&proof.verification_method_url()?)
            .await?;
        let valid = hex::decode(&proof.signature)
            .map(|signature| verify(input, &signature, &key))
            .unwrap_or(false);
        if valid {
            Ok(())
        } else {
            Err(CredentialError::SignatureInvalid(rejection.to_string()))
        }
    }
}
