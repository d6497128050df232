//! Registration and dispatch errors.

use crate::core::Signature;
use crate::engine::transition::TransitionFailure;
use thiserror::Error;

/// Errors raised while registering transitions.
///
/// These indicate a programming mistake in how a workflow is assembled and
/// are not meant to be retried.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistrationError {
    #[error("A transition for signature {signature} is already registered")]
    DuplicateTransition { signature: Signature },

    #[error("Invalid transition shape: {reason}")]
    InvalidTransitionShape { reason: String },
}

/// Errors returned from `continue_with`.
///
/// The current state is left as it was before the failing step.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No transition is registered for the live state and input types.
    #[error("No transition matches signature {signature}")]
    NoMatchingTransition { signature: Signature },

    /// The matched transition reported a failure.
    #[error("Transition failed")]
    TransitionFailed(#[source] TransitionFailure),

    /// An epsilon chain ran past the configured step limit.
    #[error("Epsilon chain exceeded the limit of {limit} steps")]
    EpsilonLimitExceeded { limit: usize },
}

impl DispatchError {
    /// The failure reported by a transition, if this is one.
    pub fn failure(&self) -> Option<&TransitionFailure> {
        match self {
            Self::TransitionFailed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatchingTransition { .. })
    }
}
