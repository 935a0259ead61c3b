//! Anchor Credentials — signing-input canonicalization, trust-chain
//! evaluation of presentations, and credential/presentation signing.

pub mod canonical;
pub mod error;
pub mod evaluator;
pub mod holder;
pub mod issuer;
pub mod presentation;
pub mod proof;
pub mod session;

pub use canonical::{credential_signing_input, presentation_signing_input};
pub use error::CredentialError;
pub use evaluator::{EvaluatorOptions, IssuerProfile, TrustChainEvaluator, VerificationReport};
pub use holder::{sign_presentation, CredentialHolder};
pub use issuer::{sign_credential, CredentialIssuer, CREDENTIALS_CONTEXT};
pub use presentation::{Credential, Presentation};
pub use proof::Proof;
pub use session::{verify_presentation, VerificationSession};
