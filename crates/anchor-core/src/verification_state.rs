use std::fmt;

use crate::error::CoreError;

/// States of a presentation verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum VerificationState {
    /// Nothing examined yet.
    Start,
    /// Checking the presentation's own proof.
    VerifyingPresentationProof,
    /// Presentation proof verified; walking the embedded credentials.
    VerifyingCredentials,
    /// Every proof verified. Final state.
    Accepted,
    /// A proof failed or could not be checked. Final state.
    Rejected,
}

impl VerificationState {
    /// Whether this is a final (terminal) state.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

impl fmt::Display for VerificationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "Start"),
            Self::VerifyingPresentationProof => write!(f, "VerifyingPresentationProof"),
            Self::VerifyingCredentials => write!(f, "VerifyingCredentials"),
            Self::Accepted => write!(f, "Accepted"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Events that drive a verification forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationEvent {
    /// Verification of a presentation begins.
    Begin,
    /// The presentation proof verified against the holder's key.
    PresentationProofVerified,
    /// The presentation proof failed; nothing it carries is examined.
    PresentationProofFailed,
    /// All embedded credentials verified.
    CredentialsVerified,
    /// An embedded credential failed.
    CredentialFailed,
}

/// Valid transitions:
/// - Start → VerifyingPresentationProof (Begin)
/// - VerifyingPresentationProof → VerifyingCredentials (PresentationProofVerified)
/// - VerifyingPresentationProof → Rejected (PresentationProofFailed)
/// - VerifyingCredentials → Accepted (CredentialsVerified)
/// - VerifyingCredentials → Rejected (CredentialFailed)
pub struct VerificationStateMachine;

impl VerificationStateMachine {
    /// Attempt a state transition based on an event.
    pub fn transition(
        current: VerificationState,
        event: VerificationEvent,
    ) -> Result<VerificationState, CoreError> {
        use VerificationEvent as E;
        use VerificationState as S;

        let new_state = match (current, event) {
            (S::Start, E::Begin) => S::VerifyingPresentationProof,

            (S::VerifyingPresentationProof, E::PresentationProofVerified) => {
                S::VerifyingCredentials
            }
            (S::VerifyingPresentationProof, E::PresentationProofFailed) => S::Rejected,

            (S::VerifyingCredentials, E::CredentialsVerified) => S::Accepted,
            (S::VerifyingCredentials, E::CredentialFailed) => S::Rejected,

            _ => {
                let target = match event {
                    E::Begin => S::VerifyingPresentationProof,
                    E::PresentationProofVerified => S::VerifyingCredentials,
                    E::CredentialsVerified => S::Accepted,
                    E::PresentationProofFailed | E::CredentialFailed => S::Rejected,
                };
                return Err(CoreError::InvalidStateTransition {
                    from: current,
                    to: target,
                });
            }
        };

        tracing::debug!(
            from = %current,
            to = %new_state,
            event = ?event,
            "verification state transition"
        );

        Ok(new_state)
    }

    /// Check if a transition is valid without performing it.
    pub fn can_transition(current: VerificationState, event: VerificationEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}
