//! Fixtures shared by the end-to-end tests: an in-memory ledger and document
//! store, identity publishing, and the reference holder/issuer example.

use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anchor_core::Did;
use anchor_credentials::{
    sign_credential, sign_presentation, EvaluatorOptions, TrustChainEvaluator,
};
use anchor_crypto::{decode_ledger_handle, ContentId, KeyPair};
use anchor_identity::{
    DidResolver, IdentityDocument, InMemoryDocumentStore, InMemoryLedger, LedgerDidResolver,
};

pub const HOLDER_DID: &str = "did:xrpl:1:rp5vPZ49XvsqVtuWvaCSgwSbcya1HVpnaZ";
pub const ISSUER_DID: &str = "did:xrpl:1:rffGVvdyzRxT1KJLs6K4ZaNj5LiDJGxNvu";
pub const THIRD_DID: &str = "did:xrpl:1:rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

/// Secret used by both parties in the reference example.
pub const REFERENCE_SECRET: &str =
    "0041A2F8C0D2CAFC0E2DDC6BD490F047B091FD6F2BEFA942E59C8AFEED91235667";
pub const CHALLENGE: &str = "4b7bb9630a3f83384eb940473a99e30b51f9890b4afada73f9c17b847381806f";
pub const DOMAIN: &str = "http://xyz:5001/api/v1/auth/vp-signin";

/// An identity that can sign as `<did>#keys-1`.
pub struct Identity {
    pub did: Did,
    pub keypair: KeyPair,
}

impl Identity {
    pub fn new(did: &str, keypair: KeyPair) -> Self {
        Self {
            did: Did::parse(did).expect("fixture DID"),
            keypair,
        }
    }

    pub fn generate(did: &str) -> Self {
        Self::new(did, KeyPair::generate())
    }

    pub fn key_url(&self) -> String {
        self.did.with_fragment("keys-1").to_string()
    }

    pub fn profile_url(&self) -> String {
        format!("https://gateway.example/ipfs/profile-{}", self.did.address())
    }

    /// Sign an unsigned credential as this identity.
    pub fn sign_credential(&self, credential: Value) -> Value {
        sign_credential(credential, &self.key_url(), &self.keypair).expect("sign credential")
    }

    /// Present credentials as this identity.
    pub fn present(&self, credentials: Vec<Value>) -> Value {
        sign_presentation(credentials, &self.key_url(), CHALLENGE, DOMAIN, &self.keypair)
            .expect("sign presentation")
    }
}

/// Ledger and content store, both in memory.
#[derive(Default)]
pub struct TestNetwork {
    pub ledger: Arc<InMemoryLedger>,
    pub store: Arc<InMemoryDocumentStore>,
    next_handle: AtomicU64,
}

impl TestNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish (or republish) an identity document with a `#profile`
    /// service and point the ledger record at it.
    pub fn publish(&self, identity: &Identity) -> ContentId {
        let document = IdentityDocument::new(&identity.did, &identity.keypair.public_key_hex())
            .with_profile(&identity.profile_url());
        let cid = self.publish_document(&identity.did, &document);
        self.store.insert_resource(
            &identity.profile_url(),
            json!({
                "type": "Issuer Profile",
                "name": identity.did.address(),
            })
            .to_string()
            .into_bytes(),
        );
        cid
    }

    /// Store an arbitrary document and anchor it for `did`.
    pub fn publish_document(&self, did: &Did, document: &IdentityDocument) -> ContentId {
        let n = self.next_handle.fetch_add(1, Ordering::SeqCst) + 1;
        let handle = format!("{:064X}", n);
        let cid = decode_ledger_handle(&handle).expect("fixture handle");
        self.store
            .insert_document(&cid, document.to_json_bytes().expect("serialize document"));
        self.ledger.set_record(did.address(), &handle);
        tracing::debug!(did = %did, cid = %cid, "fixture document published");
        cid
    }

    pub fn resolver(&self) -> Arc<dyn DidResolver> {
        Arc::new(LedgerDidResolver::new(self.ledger.clone(), self.store.clone()))
    }

    pub fn evaluator(&self, options: EvaluatorOptions) -> TrustChainEvaluator {
        TrustChainEvaluator::new(self.resolver(), options)
    }
}

/// The reference credential, unsigned.
pub fn reference_credential() -> Value {
    json!({
        "context": "https://www.w3.org/2018/credentials/v1",
        "type": ["VerifiableCredential"],
        "issuer": ISSUER_DID,
        "issuanceDate": "2024-04-25T13:30:08.916Z",
        "credentialSubject": {
            "id": HOLDER_DID,
            "degree": {
                "type": "MasterDegree",
                "name": "Computer Science"
            }
        }
    })
}

/// The reference example, signed with the reference key: holder and issuer
/// published on a fresh network, one credential in the presentation.
pub fn reference_scenario() -> (TestNetwork, Value) {
    let network = TestNetwork::new();
    let holder = Identity::new(HOLDER_DID, reference_keypair());
    let issuer = Identity::new(ISSUER_DID, reference_keypair());
    network.publish(&holder);
    network.publish(&issuer);

    let mut vc = issuer.sign_credential(reference_credential());
    // Not part of the signing input.
    vc["proof"]["created"] = json!("2024-04-25T13:30:08.925Z");

    let vp = holder.present(vec![vc]);
    (network, vp)
}

pub fn reference_keypair() -> KeyPair {
    KeyPair::from_secret_hex(REFERENCE_SECRET).expect("reference secret")
}

/// Replace the last hex digit of a proof signature.
pub fn tamper_signature(document: &mut Value) {
    let signature = document["proof"]["signature"]
        .as_str()
        .expect("signed document")
        .to_string();
    let (head, last) = signature.split_at(signature.len() - 1);
    let replacement = if last == "0" { "1" } else { "0" };
    document["proof"]["signature"] = Value::String(format!("{}{}", head, replacement));
}
