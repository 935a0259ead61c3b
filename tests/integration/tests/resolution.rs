//! Integration test: DID resolution through ledger record, content
//! identifier and published document.

use std::time::Duration;

use anchor_core::{Did, DidUrl, ReasonCode};
use anchor_crypto::{content_id_to_handle, decode_ledger_handle};
use anchor_identity::{
    CachingResolver, DidResolver, IdentityDocument, IdentityError, LedgerDidResolver,
    ResolvedTarget,
};
use anchor_integration_tests::*;

fn url(s: &str) -> DidUrl {
    DidUrl::parse(s).expect("fixture DID URL")
}

#[tokio::test]
async fn test_resolve_full_document() {
    let network = TestNetwork::new();
    let issuer = Identity::generate(ISSUER_DID);
    network.publish(&issuer);

    match network.resolver().resolve(&url(ISSUER_DID)).await.unwrap() {
        ResolvedTarget::Document(doc) => {
            assert_eq!(doc.id, ISSUER_DID);
            assert_eq!(doc.controller, ISSUER_DID);
            assert_eq!(doc.verification_methods[0].id, issuer.key_url());
            assert_eq!(doc.services[0].service_endpoint, issuer.profile_url());
        }
        other => panic!("expected a document, got {:?}", other),
    }
}

#[tokio::test]
async fn test_resolve_key_returns_published_material() {
    let network = TestNetwork::new();
    let issuer = Identity::generate(ISSUER_DID);
    network.publish(&issuer);

    let key = network
        .resolver()
        .resolve_key(&url(&issuer.key_url()))
        .await
        .unwrap();
    assert_eq!(key, issuer.keypair.public_key_bytes());
}

#[tokio::test]
async fn test_second_key_resolves() {
    let network = TestNetwork::new();
    let issuer = Identity::generate(ISSUER_DID);
    let second = anchor_crypto::KeyPair::generate();
    let mut doc = IdentityDocument::new(&issuer.did, &issuer.keypair.public_key_hex());
    doc.add_verification_method("EcdsaSecp256k1VerificationKey2019", &second.public_key_hex());
    network.publish_document(&issuer.did, &doc);

    let key = network
        .resolver()
        .resolve_key(&url(&format!("{}#keys-2", ISSUER_DID)))
        .await
        .unwrap();
    assert_eq!(key, second.public_key_bytes());
}

#[tokio::test]
async fn test_absent_key_fragment() {
    let network = TestNetwork::new();
    network.publish(&Identity::generate(ISSUER_DID));

    let err = network
        .resolver()
        .resolve(&url(&format!("{}#keys-7", ISSUER_DID)))
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::VerificationMethodNotFound(_)));
    assert_eq!(err.reason_code(), ReasonCode::VerificationMethodNotFound);
}

#[tokio::test]
async fn test_resolve_profile_service() {
    let network = TestNetwork::new();
    let issuer = Identity::generate(ISSUER_DID);
    network.publish(&issuer);

    let profile = network
        .resolver()
        .resolve_service(&issuer.did.with_fragment("profile"))
        .await
        .unwrap();
    assert_eq!(profile["type"], "Issuer Profile");
}

#[tokio::test]
async fn test_document_without_services() {
    let network = TestNetwork::new();
    let issuer = Identity::generate(ISSUER_DID);
    let doc = IdentityDocument::new(&issuer.did, &issuer.keypair.public_key_hex());
    network.publish_document(&issuer.did, &doc);

    let err = network
        .resolver()
        .resolve(&issuer.did.with_fragment("profile"))
        .await
        .unwrap_err();
    assert_eq!(err.reason_code(), ReasonCode::ServiceNotFound);
}

#[tokio::test]
async fn test_document_published_for_another_did() {
    let network = TestNetwork::new();
    let holder = Identity::generate(HOLDER_DID);
    let issuer_did = Did::parse(ISSUER_DID).unwrap();
    // Issuer's ledger record points at the holder's document.
    let doc = IdentityDocument::new(&holder.did, &holder.keypair.public_key_hex());
    network.publish_document(&issuer_did, &doc);

    let err = network
        .resolver()
        .resolve(&url(ISSUER_DID))
        .await
        .unwrap_err();
    assert_eq!(err.reason_code(), ReasonCode::DocumentFetchError);
}

#[tokio::test]
async fn test_unknown_account() {
    let network = TestNetwork::new();
    let err = network
        .resolver()
        .resolve(&url(THIRD_DID))
        .await
        .unwrap_err();
    assert_eq!(err.reason_code(), ReasonCode::DidNotFound);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_ledger_handle_matches_store_identifier() {
    let network = TestNetwork::new();
    let issuer = Identity::generate(ISSUER_DID);
    let cid = network.publish(&issuer);

    let record = anchor_identity::LedgerClient::fetch_account_record(
        network.ledger.as_ref(),
        issuer.did.address(),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(decode_ledger_handle(&record.handle).unwrap(), cid);
    assert_eq!(content_id_to_handle(cid.as_str()).unwrap(), record.handle);
}

#[tokio::test]
async fn test_cache_serves_stale_until_invalidated() {
    let network = TestNetwork::new();
    let issuer = Identity::generate(ISSUER_DID);
    network.publish(&issuer);

    let resolver = LedgerDidResolver::new(network.ledger.clone(), network.store.clone());
    let cache = CachingResolver::new(resolver, Duration::from_secs(300));
    let key_url = url(&issuer.key_url());
    assert_eq!(
        cache.resolve_key(&key_url).await.unwrap(),
        issuer.keypair.public_key_bytes()
    );

    let rotated = Identity::generate(ISSUER_DID);
    network.publish(&rotated);
    assert_eq!(
        cache.resolve_key(&key_url).await.unwrap(),
        issuer.keypair.public_key_bytes()
    );

    cache.invalidate(&key_url);
    assert_eq!(
        cache.resolve_key(&key_url).await.unwrap(),
        rotated.keypair.public_key_bytes()
    );
}
