//! Builder for assembling workflows.

use crate::builder::error::BuildError;
use crate::core::{Inputs, Signature, State};
use crate::engine::{
    FailedAction, IntoTransition, RegistrationError, SucceededAction, Transition,
    TransitionFailure, Workflow, WorkflowConfig,
};
use std::collections::HashSet;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

struct PendingTransition {
    transition: Transition,
    terminating: bool,
}

/// Builder for constructing workflows with a fluent API.
///
/// Unlike registering directly on a [`Workflow`], the builder checks every
/// transition before building and reports all problems at once.
///
/// # Example
///
/// ```rust
/// use typeflow::builder::WorkflowBuilder;
/// use typeflow::states;
///
/// #[derive(Clone, Debug)]
/// struct Idle;
/// #[derive(Clone, Debug)]
/// struct Busy;
/// states!(Idle, Busy);
///
/// #[derive(Clone, Debug)]
/// struct Start;
///
/// let workflow = WorkflowBuilder::new()
///     .transition(|_: Idle, _: Start| Busy)
///     .build()
///     .unwrap();
///
/// let instance = workflow.new_instance(Idle);
/// instance.continue_with(Start).unwrap();
/// assert!(instance.current_state().is::<Busy>());
/// ```
pub struct WorkflowBuilder {
    transitions: Vec<PendingTransition>,
    on_succeeded: Option<SucceededAction>,
    on_failed: Option<FailedAction>,
    config: WorkflowConfig,
}

impl WorkflowBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            on_succeeded: None,
            on_failed: None,
            config: WorkflowConfig::default(),
        }
    }

    /// Add a transition.
    pub fn transition<Args, T: IntoTransition<Args>>(mut self, transition: T) -> Self {
        self.transitions.push(PendingTransition {
            transition: transition.into_transition(),
            terminating: false,
        });
        self
    }

    /// Add a transition whose result state terminates the workflow.
    pub fn termination<Args, T: IntoTransition<Args>>(mut self, transition: T) -> Self {
        self.transitions.push(PendingTransition {
            transition: transition.into_transition(),
            terminating: true,
        });
        self
    }

    /// Add a handler over boxed values for an explicit signature.
    pub fn raw<F>(self, signature: Signature, handler: F) -> Self
    where
        F: Fn(Box<dyn State>, Inputs) -> Result<Box<dyn State>, TransitionFailure>
            + Send
            + Sync
            + 'static,
    {
        self.transition(Transition::raw(signature, handler))
    }

    /// Set the success observer.
    pub fn on_success<F>(mut self, action: F) -> Self
    where
        F: Fn(&dyn State, &dyn State, &Inputs) + Send + Sync + 'static,
    {
        self.on_succeeded = Some(Box::new(action));
        self
    }

    /// Set the failure observer.
    pub fn on_failure<F>(mut self, action: F) -> Self
    where
        F: Fn(&TransitionFailure, &dyn State, &Inputs) + Send + Sync + 'static,
    {
        self.on_failed = Some(Box::new(action));
        self
    }

    pub fn config(mut self, config: WorkflowConfig) -> Self {
        self.config = config;
        self
    }

    /// Check all pending transitions, accumulating every problem.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<RegistrationError>> {
        let mut seen = HashSet::new();
        let checks: Vec<Validation<(), NonEmptyVec<RegistrationError>>> = self
            .transitions
            .iter()
            .map(|pending| {
                if let Err(error) = pending.transition.check_shape(pending.terminating) {
                    return Validation::fail(error);
                }
                let signature = pending.transition.signature();
                if !seen.insert(signature.clone()) {
                    return Validation::fail(RegistrationError::DuplicateTransition {
                        signature: signature.clone(),
                    });
                }
                Validation::success(())
            })
            .collect();

        Validation::all_vec(checks).map(|_| ())
    }

    /// Build the workflow.
    /// Returns every registration error if any transition is invalid.
    pub fn build(self) -> Result<Arc<Workflow>, BuildError> {
        if let Validation::Failure(errors) = self.validate() {
            return Err(BuildError::Registration(errors.iter().cloned().collect()));
        }

        let mut workflow = Workflow::with_config(self.config);
        for pending in self.transitions {
            workflow.register(pending.transition, pending.terminating)?;
        }
        workflow.set_observers(self.on_succeeded, self.on_failed);

        Ok(Arc::new(workflow))
    }
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Terminated;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug, PartialEq)]
    struct Waiting;

    #[derive(Clone, Debug, PartialEq)]
    struct Muted;

    #[derive(Clone, Debug)]
    struct Mute;

    #[derive(Clone, Debug)]
    struct Unmute;

    impl State for Waiting {}
    impl State for Muted {}

    #[test]
    fn empty_builder_builds_empty_workflow() {
        let workflow = WorkflowBuilder::new().build().unwrap();
        assert!(workflow.is_empty());
    }

    #[test]
    fn fluent_api_builds_workflow() {
        let workflow = WorkflowBuilder::new()
            .transition(|_: Waiting, _: Mute| Muted)
            .transition(|_: Muted, _: Unmute| Waiting)
            .termination(|_: Waiting, _: Unmute| Terminated)
            .config(WorkflowConfig::new().max_epsilon_steps(8))
            .build()
            .unwrap();

        assert_eq!(workflow.len(), 3);
        assert_eq!(workflow.config().epsilon_limit(), Some(8));
    }

    #[test]
    fn validation_accumulates_all_errors() {
        let builder = WorkflowBuilder::new()
            .transition(|_: Waiting, _: Mute| Muted)
            .transition(|_: Waiting, _: Mute| Waiting)
            .raw(Signature::new(), |state, _| Ok(state))
            .transition(|_: Waiting, _: Mute| Terminated);

        match builder.validate() {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 3);

                let duplicates = errors
                    .iter()
                    .filter(|e| matches!(e, RegistrationError::DuplicateTransition { .. }))
                    .count();
                let shapes = errors
                    .iter()
                    .filter(|e| matches!(e, RegistrationError::InvalidTransitionShape { .. }))
                    .count();

                assert_eq!(duplicates, 2);
                assert_eq!(shapes, 1);
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn build_reports_errors() {
        let result = WorkflowBuilder::new()
            .transition(|_: Waiting, _: Mute| Muted)
            .transition(|_: Waiting, _: Mute| Muted)
            .build();

        let error = result.unwrap_err();
        assert_eq!(error.errors().len(), 1);
        assert!(error.to_string().contains("already registered"));
    }

    #[test]
    fn raw_termination_without_result_type_is_invalid() {
        let result = WorkflowBuilder::new()
            .termination(Transition::raw(Signature::new().with::<Waiting>(), |state, _| {
                Ok(state)
            }))
            .build();

        assert!(matches!(
            result.unwrap_err().errors(),
            [RegistrationError::InvalidTransitionShape { .. }]
        ));
    }

    #[test]
    fn observers_are_installed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let workflow = WorkflowBuilder::new()
            .transition(|_: Waiting, _: Mute| Muted)
            .on_success(move |new, previous, _| {
                assert!(new.is::<Muted>());
                assert!(previous.is::<Waiting>());
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        workflow.new_instance(Waiting).continue_with(Mute).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
