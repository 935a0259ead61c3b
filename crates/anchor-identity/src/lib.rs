//! Anchor Identity Layer
//!
//! Resolves ledger-anchored DIDs:
//! - identity documents and their structural validation
//! - ledger record lookup (XRPL JSON-RPC, in-memory)
//! - content-addressed document fetching (IPFS gateway, in-memory)
//! - DID URL resolution to documents, keys and service resources
//! - an optional TTL cache over any resolver

pub mod cache;
pub mod did_resolver;
pub mod document;
pub mod error;
pub mod ledger;
pub mod store;

pub use cache::CachingResolver;
pub use did_resolver::{DidResolver, LedgerDidResolver, ResolvedTarget};
pub use document::{IdentityDocument, Service, VerificationMethod};
pub use error::IdentityError;
pub use ledger::{InMemoryLedger, LedgerClient, LedgerRecord, XrplLedgerClient};
pub use store::{DocumentStore, InMemoryDocumentStore, IpfsGatewayStore};
