//! Anchor Core — Fundamental types, verdicts and configuration for
//! resolving ledger-anchored DIDs and verifying presentations.

pub mod config;
pub mod error;
pub mod types;
pub mod verdict;
pub mod verification_state;

pub use config::AnchorConfig;
pub use error::CoreError;
pub use types::{Did, DidUrl, FragmentKind, DEFAULT_DID_METHOD};
pub use verdict::{ReasonCode, Rejection, Verdict};
pub use verification_state::{VerificationEvent, VerificationState, VerificationStateMachine};
