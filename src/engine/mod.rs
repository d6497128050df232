//! Type-directed dispatch engine.
//!
//! This module is the imperative shell around the core value types:
//! registering transitions, running instances, and composing workflows.
//!
//! # Key Concepts
//!
//! - **Workflow**: registry of transitions keyed by signature, plus observers
//! - **WorkflowInstance**: one running machine with its own lock
//! - **Epsilon transitions**: zero-input transitions chained automatically
//!   after every successful transition
//! - **Submachines**: states that own a nested instance receive inputs until
//!   the nested instance terminates
//!
//! # Dispatch
//!
//! For each call to `continue_with`:
//! 1. A non-terminated submachine state gets the inputs first; if it is still
//!    running afterwards, the call is done. Once it terminates, the same
//!    inputs are dispatched against the outer state.
//! 2. The signature `(state type, input types..)` selects the transition.
//! 3. On failure the failure observer runs and the state is unchanged.
//! 4. On success the state is replaced and the success observer runs.
//! 5. Zero-input transitions from the new state are chained until none
//!    matches, one fails, or a terminal state is reached.
//!
//! Chained steps go through the same delegation as step 1. If a
//! zero-input transition is registered for a composite state whose nested
//! instance is still running, entering that state forwards an empty input
//! list to the nested instance. Unless the nested workflow has a zero-input
//! transition of its own, the call then fails with the nested
//! `NoMatchingTransition`, and the outer state stays at the composite state
//! already reached.

mod config;
mod error;
mod instance;
mod submachine;
mod transition;
mod workflow;

pub use config::WorkflowConfig;
pub use error::{DispatchError, RegistrationError};
pub use instance::WorkflowInstance;
pub use submachine::Submachine;
pub use transition::{IntoOutcome, IntoTransition, Transition, TransitionFailure};
pub use workflow::{FailedAction, SucceededAction, Workflow};
