//! Integration test: presentation verification end to end.
//!
//! Holder and issuer identities are published on an in-memory ledger and
//! document store; presentations are signed with anchor-credentials and
//! verified through the DID resolver.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use anchor_core::{ReasonCode, Verdict};
use anchor_credentials::{EvaluatorOptions, TrustChainEvaluator, VerificationSession};
use anchor_crypto::ContentId;
use anchor_identity::{DocumentStore, IdentityError, LedgerDidResolver};
use anchor_integration_tests::*;

fn options() -> EvaluatorOptions {
    EvaluatorOptions::default()
}

// =========================================================================
// Reference scenarios
// =========================================================================

#[tokio::test]
async fn test_empty_presentation_accepted() {
    let network = TestNetwork::new();
    let holder = Identity::generate(HOLDER_DID);
    network.publish(&holder);

    let vp = holder.present(vec![]);
    let report = network.evaluator(options()).verify_presentation(&vp).await;
    assert_eq!(report.verdict, Verdict::Accepted);
}

#[tokio::test]
async fn test_reference_example_accepted() {
    let (network, vp) = reference_scenario();
    let report = network.evaluator(options()).verify_presentation(&vp).await;
    assert!(report.verdict.is_accepted(), "{}", report.verdict);

    assert_eq!(report.issuer_profiles.len(), 1);
    assert_eq!(report.issuer_profiles[0].issuer, ISSUER_DID);
    assert_eq!(
        report.issuer_profiles[0].profile["name"],
        "rffGVvdyzRxT1KJLs6K4ZaNj5LiDJGxNvu"
    );
}

#[tokio::test]
async fn test_reference_example_with_expected_challenge() {
    let (network, vp) = reference_scenario();
    let report = network
        .evaluator(options().with_challenge(CHALLENGE).with_domain(DOMAIN))
        .verify_presentation(&vp)
        .await;
    assert!(report.verdict.is_accepted());
}

#[tokio::test]
async fn test_altered_credential_signature_rejected_at_index_0() {
    let (network, vp) = reference_scenario();
    let holder = Identity::new(HOLDER_DID, reference_keypair());

    // Re-sign the envelope so only the credential proof is broken.
    let mut vc = vp["verifiableCredential"][0].clone();
    tamper_signature(&mut vc);
    let vp = holder.present(vec![vc]);

    let report = network.evaluator(options()).verify_presentation(&vp).await;
    assert_eq!(report.verdict.reason(), Some(ReasonCode::SignatureInvalid));
    assert_eq!(report.verdict.index(), Some(0));
    assert!(report.issuer_profiles.is_empty());
}

#[tokio::test]
async fn test_credential_altered_inside_signed_envelope_fails_envelope() {
    let (network, mut vp) = reference_scenario();
    tamper_signature(&mut vp["verifiableCredential"][0]);

    let report = network.evaluator(options()).verify_presentation(&vp).await;
    assert_eq!(report.verdict.reason(), Some(ReasonCode::SignatureInvalid));
    assert_eq!(report.verdict.index(), None);
}

#[tokio::test]
async fn test_missing_ledger_record_is_did_not_found() {
    let (network, vp) = reference_scenario();
    network.ledger.remove_record("rp5vPZ49XvsqVtuWvaCSgwSbcya1HVpnaZ");

    let report = network.evaluator(options()).verify_presentation(&vp).await;
    assert_eq!(report.verdict.reason(), Some(ReasonCode::DidNotFound));
}

#[tokio::test]
async fn test_legacy_reference_signature_not_accepted() {
    let (network, _) = reference_scenario();
    let holder = Identity::new(HOLDER_DID, reference_keypair());

    let mut vc = reference_credential();
    vc["proof"] = json!({
        "type": "EcdsaSecp256k1RecoveryMethod2020",
        "created": "2024-04-25T13:30:08.925Z",
        "proofPurpose": "assertionMethod",
        "verificationMethod": "did:xrpl:1:rffGVvdyzRxT1KJLs6K4ZaNj5LiDJGxNvu#keys-1",
        "signature": "304502205ff2a72c8d51b23be64e6c5a59b15c4b9868b6b165f591bb5ae2e2fd7aec609d022100f05d21d38ffce93a974043f1654bb621f3418cbea48bf7130c8cfa069d92ac10"
    });
    let vp = holder.present(vec![vc]);

    let report = network.evaluator(options()).verify_presentation(&vp).await;
    assert_eq!(report.verdict.reason(), Some(ReasonCode::SignatureInvalid));
    assert_eq!(report.verdict.index(), Some(0));
}

// =========================================================================
// Fail-fast ordering
// =========================================================================

fn issue_many(issuer: &Identity, n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            let mut vc = reference_credential();
            vc["credentialSubject"]["serial"] = json!(i);
            issuer.sign_credential(vc)
        })
        .collect()
}

#[tokio::test]
async fn test_first_invalid_index_reported() {
    let network = TestNetwork::new();
    let holder = Identity::generate(HOLDER_DID);
    let issuer = Identity::generate(ISSUER_DID);
    network.publish(&holder);
    network.publish(&issuer);

    for k in 0..6 {
        for parallelism in [1, 3, 8] {
            let mut credentials = issue_many(&issuer, 6);
            tamper_signature(&mut credentials[k]);
            // Break every later credential in a different way too.
            for later in credentials.iter_mut().skip(k + 1).step_by(2) {
                later["credentialSubject"]["serial"] = json!("forged");
            }
            let vp = holder.present(credentials);

            let report = network
                .evaluator(EvaluatorOptions {
                    parallelism,
                    ..options()
                })
                .verify_presentation(&vp)
                .await;
            assert_eq!(
                report.verdict.index(),
                Some(k),
                "k={} parallelism={}",
                k,
                parallelism
            );
            assert_eq!(report.verdict.reason(), Some(ReasonCode::SignatureInvalid));
        }
    }
}

#[tokio::test]
async fn test_unresolvable_issuer_reported_at_its_index() {
    let network = TestNetwork::new();
    let holder = Identity::generate(HOLDER_DID);
    let issuer = Identity::generate(ISSUER_DID);
    let unknown = Identity::generate(THIRD_DID);
    network.publish(&holder);
    network.publish(&issuer);

    let mut foreign = reference_credential();
    foreign["issuer"] = json!(THIRD_DID);
    let credentials = vec![
        issuer.sign_credential(reference_credential()),
        unknown.sign_credential(foreign),
        issuer.sign_credential(reference_credential()),
    ];
    let vp = holder.present(credentials);

    let report = network.evaluator(options()).verify_presentation(&vp).await;
    assert_eq!(report.verdict.reason(), Some(ReasonCode::DidNotFound));
    assert_eq!(report.verdict.index(), Some(1));
}

#[tokio::test]
async fn test_mixed_issuers_accepted() {
    let network = TestNetwork::new();
    let holder = Identity::generate(HOLDER_DID);
    let issuer = Identity::generate(ISSUER_DID);
    let other = Identity::generate(THIRD_DID);
    network.publish(&holder);
    network.publish(&issuer);
    network.publish(&other);

    let mut other_vc = reference_credential();
    other_vc["issuer"] = json!(THIRD_DID);
    let vp = holder.present(vec![
        issuer.sign_credential(reference_credential()),
        other.sign_credential(other_vc),
    ]);

    let report = network.evaluator(options()).verify_presentation(&vp).await;
    assert!(report.verdict.is_accepted(), "{}", report.verdict);
    let issuers: Vec<&str> = report
        .issuer_profiles
        .iter()
        .map(|p| p.issuer.as_str())
        .collect();
    assert_eq!(issuers, [ISSUER_DID, THIRD_DID]);
}

#[tokio::test]
async fn test_holder_credential_relayed_by_third_party_rejected() {
    let (network, vp) = reference_scenario();
    let relay = Identity::generate(THIRD_DID);
    network.publish(&relay);

    let relayed = relay.present(vec![vp["verifiableCredential"][0].clone()]);
    let report = network.evaluator(options()).verify_presentation(&relayed).await;
    assert_eq!(report.verdict.reason(), Some(ReasonCode::SignatureInvalid));
    assert_eq!(report.verdict.index(), Some(0));
}

// =========================================================================
// Current published state is always used
// =========================================================================

#[tokio::test]
async fn test_key_rotation_seen_by_next_verification() {
    let network = TestNetwork::new();
    let holder = Identity::generate(HOLDER_DID);
    let issuer = Identity::generate(ISSUER_DID);
    network.publish(&holder);
    network.publish(&issuer);

    let vp = holder.present(vec![issuer.sign_credential(reference_credential())]);
    let evaluator = network.evaluator(options());
    assert!(evaluator.verify_presentation(&vp).await.verdict.is_accepted());

    // Issuer publishes a new key; old signatures no longer verify.
    network.publish(&Identity::generate(ISSUER_DID));
    let report = evaluator.verify_presentation(&vp).await;
    assert_eq!(report.verdict.reason(), Some(ReasonCode::SignatureInvalid));
    assert_eq!(report.verdict.index(), Some(0));
}

// =========================================================================
// Transport failures
// =========================================================================

struct StalledStore;

#[async_trait]
impl DocumentStore for StalledStore {
    async fn fetch_by_identifier(
        &self,
        _cid: &ContentId,
    ) -> Result<Option<Vec<u8>>, IdentityError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(None)
    }

    async fn fetch_by_url(&self, _url: &str) -> Result<Option<Vec<u8>>, IdentityError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(None)
    }
}

#[tokio::test]
async fn test_stalled_store_is_retryable_timeout() {
    let (network, vp) = reference_scenario();
    let resolver = LedgerDidResolver::new(network.ledger.clone(), Arc::new(StalledStore))
        .with_call_timeout(Duration::from_millis(50));
    let evaluator = TrustChainEvaluator::new(Arc::new(resolver), options());

    let report = evaluator.verify_presentation(&vp).await;
    let reason = report.verdict.reason().unwrap();
    assert_eq!(reason, ReasonCode::TransportTimeout);
    assert!(reason.is_retryable());
}

#[tokio::test]
async fn test_session_over_in_memory_network() {
    let (network, vp) = reference_scenario();
    let session = VerificationSession::with_resolver(network.resolver(), options());
    let report = session.verify_presentation(&vp).await;
    assert!(report.verdict.is_accepted());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["verdict"]["verdict"], "accepted");
}
