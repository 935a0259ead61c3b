use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-readable reason attached to a rejected verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Bad DID syntax, bad hex, missing proof fields.
    MalformedInput,
    /// A ledger or document-store call exceeded its timeout.
    TransportTimeout,
    /// A ledger or document-store endpoint could not be reached.
    TransportUnavailable,
    /// The ledger holds no identity record for the DID.
    DidNotFound,
    /// The identity document has no matching verification method.
    VerificationMethodNotFound,
    /// The identity document has no matching service entry.
    ServiceNotFound,
    /// The document could not be fetched or is not a well-formed identity document.
    DocumentFetchError,
    /// Cryptographic rejection.
    SignatureInvalid,
    /// The presentation was bound to a different challenge or domain.
    ChallengeMismatch,
    /// Unexpected fault inside the verifier.
    InternalError,
}

impl ReasonCode {
    /// Whether retrying the whole verification may produce a different outcome.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransportTimeout | Self::TransportUnavailable)
    }

    /// Stable string form, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedInput => "malformed_input",
            Self::TransportTimeout => "transport_timeout",
            Self::TransportUnavailable => "transport_unavailable",
            Self::DidNotFound => "did_not_found",
            Self::VerificationMethodNotFound => "verification_method_not_found",
            Self::ServiceNotFound => "service_not_found",
            Self::DocumentFetchError => "document_fetch_error",
            Self::SignatureInvalid => "signature_invalid",
            Self::ChallengeMismatch => "challenge_mismatch",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a presentation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// Reason code callers branch on.
    pub reason: ReasonCode,
    /// Index of the failing credential; `None` when the presentation itself failed.
    pub index: Option<usize>,
    /// Human-readable detail. Informational only.
    pub detail: String,
}

/// Final outcome of verifying a presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
}

impl Verdict {
    /// Build a rejection verdict.
    pub fn rejected(reason: ReasonCode, index: Option<usize>, detail: impl Into<String>) -> Self {
        Self::Rejected(Rejection {
            reason,
            index,
            detail: detail.into(),
        })
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Accepted => None,
            Self::Rejected(r) => Some(r),
        }
    }

    pub fn reason(&self) -> Option<ReasonCode> {
        self.rejection().map(|r| r.reason)
    }

    pub fn index(&self) -> Option<usize> {
        self.rejection().and_then(|r| r.index)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => write!(f, "accepted"),
            Self::Rejected(r) => match r.index {
                Some(i) => write!(f, "rejected ({}, credential {}): {}", r.reason, i, r.detail),
                None => write!(f, "rejected ({}): {}", r.reason, r.detail),
            },
        }
    }
}
