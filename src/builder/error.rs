//! Build errors for the workflow builder.

use crate::engine::RegistrationError;
use thiserror::Error;

/// Errors that can occur when building a workflow.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Every registration problem found, in registration order.
    #[error("Workflow has {} invalid registration(s): {}", .0.len(), join(.0))]
    Registration(Vec<RegistrationError>),
}

impl BuildError {
    pub fn errors(&self) -> &[RegistrationError] {
        match self {
            Self::Registration(errors) => errors,
        }
    }
}

impl From<RegistrationError> for BuildError {
    fn from(error: RegistrationError) -> Self {
        Self::Registration(vec![error])
    }
}

fn join(errors: &[RegistrationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
