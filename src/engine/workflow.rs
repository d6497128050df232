//! Transition registry shared by workflow instances.

use crate::core::{Inputs, Signature, State, Terminated, TypeKey};
use crate::engine::config::WorkflowConfig;
use crate::engine::error::RegistrationError;
use crate::engine::instance::WorkflowInstance;
use crate::engine::transition::{IntoTransition, Transition, TransitionFailure};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Observer called after a successful transition with
/// `(new_state, previous_state, inputs)`.
pub type SucceededAction = Box<dyn Fn(&dyn State, &dyn State, &Inputs) + Send + Sync>;

/// Observer called after a failed transition with
/// `(failure, previous_state, inputs)`.
pub type FailedAction = Box<dyn Fn(&TransitionFailure, &dyn State, &Inputs) + Send + Sync>;

/// Registry of transitions keyed by signature.
///
/// A workflow is assembled with `&mut self` methods and then shared through
/// an `Arc`; instances only ever see the shared, immutable registry.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use typeflow::core::State;
/// use typeflow::engine::Workflow;
///
/// #[derive(Clone, Debug)]
/// struct Greeting(String);
/// impl State for Greeting {}
///
/// let mut workflow = Workflow::new();
/// workflow
///     .add_transition(|g: Greeting, name: &'static str| Greeting(format!("{}{}", g.0, name)))
///     .unwrap();
/// let workflow = Arc::new(workflow);
///
/// let instance = workflow.new_instance(Greeting("Hello, ".into()));
/// instance.continue_with("World!").unwrap();
///
/// let state = instance.current_state_as::<Greeting>().unwrap();
/// assert_eq!(state.0, "Hello, World!");
/// ```
pub struct Workflow {
    transitions: HashMap<Signature, Transition>,
    terminal_types: HashSet<TypeKey>,
    on_succeeded: Option<SucceededAction>,
    on_failed: Option<FailedAction>,
    config: WorkflowConfig,
}

impl Workflow {
    /// Create an empty workflow with default configuration.
    pub fn new() -> Self {
        Self::with_config(WorkflowConfig::default())
    }

    pub fn with_config(config: WorkflowConfig) -> Self {
        Self {
            transitions: HashMap::new(),
            terminal_types: HashSet::new(),
            on_succeeded: None,
            on_failed: None,
            config,
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Register a transition.
    ///
    /// Fails with `DuplicateTransition` if a transition with the same
    /// signature exists; the new transition is then not installed.
    pub fn add_transition<Args, T>(&mut self, transition: T) -> Result<(), RegistrationError>
    where
        T: IntoTransition<Args>,
    {
        self.register(transition.into_transition(), false)
    }

    /// Register a transition whose result state marks this workflow as
    /// terminated.
    pub fn add_termination<Args, T>(&mut self, transition: T) -> Result<(), RegistrationError>
    where
        T: IntoTransition<Args>,
    {
        self.register(transition.into_transition(), true)
    }

    /// Register a handler over boxed values for an explicit signature.
    pub fn add_raw_transition<F>(
        &mut self,
        signature: Signature,
        handler: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(Box<dyn State>, Inputs) -> Result<Box<dyn State>, TransitionFailure>
            + Send
            + Sync
            + 'static,
    {
        self.register(Transition::raw(signature, handler), false)
    }

    pub(crate) fn register(
        &mut self,
        transition: Transition,
        terminating: bool,
    ) -> Result<(), RegistrationError> {
        transition.check_shape(terminating)?;

        if self.transitions.contains_key(transition.signature()) {
            return Err(RegistrationError::DuplicateTransition {
                signature: transition.signature().clone(),
            });
        }

        if terminating {
            if let Some(result) = transition.result_type() {
                self.terminal_types.insert(result);
            }
        }

        tracing::debug!(
            signature = %transition.signature(),
            terminating,
            "registered transition"
        );
        self.transitions
            .insert(transition.signature().clone(), transition);
        Ok(())
    }

    /// Set the success observer, replacing any previous one.
    pub fn on_transition_succeeded<F>(&mut self, action: F)
    where
        F: Fn(&dyn State, &dyn State, &Inputs) + Send + Sync + 'static,
    {
        self.on_succeeded = Some(Box::new(action));
    }

    /// Set the failure observer, replacing any previous one.
    pub fn on_transition_failed<F>(&mut self, action: F)
    where
        F: Fn(&TransitionFailure, &dyn State, &Inputs) + Send + Sync + 'static,
    {
        self.on_failed = Some(Box::new(action));
    }

    pub(crate) fn set_observers(
        &mut self,
        on_succeeded: Option<SucceededAction>,
        on_failed: Option<FailedAction>,
    ) {
        if on_succeeded.is_some() {
            self.on_succeeded = on_succeeded;
        }
        if on_failed.is_some() {
            self.on_failed = on_failed;
        }
    }

    /// Start a new instance of this workflow in `initial`.
    pub fn new_instance<S: State + Clone>(self: &Arc<Self>, initial: S) -> WorkflowInstance {
        WorkflowInstance::new(Arc::clone(self), Box::new(initial))
    }

    /// Whether a transition is registered for `signature`.
    pub fn contains(&self, signature: &Signature) -> bool {
        self.transitions.contains_key(signature)
    }

    /// Number of registered transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Whether `state` ends this workflow: it is [`Terminated`] or the
    /// result type of a registered termination.
    pub fn is_terminal(&self, state: &dyn State) -> bool {
        self.is_terminal_type(state.type_key())
    }

    /// Whether states of type `key` end this workflow.
    pub fn is_terminal_type(&self, key: TypeKey) -> bool {
        key == TypeKey::of::<Terminated>() || self.terminal_types.contains(&key)
    }

    pub(crate) fn transition(&self, signature: &Signature) -> Option<&Transition> {
        self.transitions.get(signature)
    }

    pub(crate) fn notify_succeeded(&self, new: &dyn State, previous: &dyn State, inputs: &Inputs) {
        if let Some(action) = &self.on_succeeded {
            action(new, previous, inputs);
        }
    }

    pub(crate) fn notify_failed(
        &self,
        failure: &TransitionFailure,
        previous: &dyn State,
        inputs: &Inputs,
    ) {
        if let Some(action) = &self.on_failed {
            action(failure, previous, inputs);
        }
    }
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("transitions", &self.transitions.len())
            .field("terminal_types", &self.terminal_types)
            .field("on_succeeded", &self.on_succeeded.is_some())
            .field("on_failed", &self.on_failed.is_some())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct OffHook;

    #[derive(Clone, Debug, PartialEq)]
    struct Ringing;

    #[derive(Clone, Debug, PartialEq)]
    struct Destroyed;

    #[derive(Clone, Debug)]
    struct CallDialed(String);

    #[derive(Clone, Debug)]
    struct HurledAgainstWall;

    impl State for OffHook {}
    impl State for Ringing {}
    impl State for Destroyed {}

    #[test]
    fn new_workflow_is_empty() {
        let workflow = Workflow::new();
        assert!(workflow.is_empty());
        assert_eq!(workflow.config(), &WorkflowConfig::default());
    }

    #[test]
    fn add_transition_keys_by_signature() {
        let mut workflow = Workflow::new();
        workflow
            .add_transition(|_: OffHook, _: CallDialed| Ringing)
            .unwrap();

        assert_eq!(workflow.len(), 1);
        assert!(workflow.contains(&Signature::new().with::<OffHook>().with::<CallDialed>()));
        assert!(!workflow.contains(&Signature::new().with::<OffHook>()));
    }

    #[test]
    fn duplicate_signature_is_rejected() {
        let mut workflow = Workflow::new();
        workflow
            .add_transition(|_: OffHook, _: CallDialed| Ringing)
            .unwrap();

        let result = workflow.add_transition(|_: OffHook, _: CallDialed| OffHook);

        assert_eq!(
            result,
            Err(RegistrationError::DuplicateTransition {
                signature: Signature::new().with::<OffHook>().with::<CallDialed>(),
            })
        );
        assert_eq!(workflow.len(), 1);
    }

    #[test]
    fn same_state_with_different_inputs_is_not_duplicate() {
        let mut workflow = Workflow::new();
        workflow
            .add_transition(|_: OffHook, _: CallDialed| Ringing)
            .unwrap();
        workflow
            .add_transition(|_: OffHook, _: HurledAgainstWall| Destroyed)
            .unwrap();
        workflow.add_transition(|_: OffHook| Ringing).unwrap();

        assert_eq!(workflow.len(), 3);
    }

    #[test]
    fn termination_marks_result_type_terminal() {
        let mut workflow = Workflow::new();
        workflow
            .add_termination(|_: Ringing, _: HurledAgainstWall| Destroyed)
            .unwrap();

        assert!(workflow.is_terminal(&Destroyed));
        assert!(workflow.is_terminal(&Terminated));
        assert!(!workflow.is_terminal(&Ringing));
        assert!(workflow.is_terminal_type(TypeKey::of::<Destroyed>()));
        assert!(!workflow.is_terminal_type(TypeKey::of::<Ringing>()));
    }

    #[test]
    fn plain_transition_does_not_mark_terminal() {
        let mut workflow = Workflow::new();
        workflow
            .add_transition(|_: Ringing, _: HurledAgainstWall| Destroyed)
            .unwrap();

        assert!(!workflow.is_terminal(&Destroyed));
    }

    #[test]
    fn raw_transition_with_empty_signature_is_rejected() {
        let mut workflow = Workflow::new();
        let result = workflow.add_raw_transition(Signature::new(), |state, _| Ok(state));

        assert!(matches!(
            result,
            Err(RegistrationError::InvalidTransitionShape { .. })
        ));
        assert!(workflow.is_empty());
    }

    #[test]
    fn later_observer_replaces_earlier() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let mut workflow = Workflow::new();
        let counter = Arc::clone(&first);
        workflow.on_transition_succeeded(move |_, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&second);
        workflow.on_transition_succeeded(move |_, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        workflow.notify_succeeded(&Ringing, &OffHook, &Inputs::new());

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }
}
