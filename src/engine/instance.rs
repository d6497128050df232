//! Running workflow instances.

use crate::core::{Input, Inputs, Signature, State};
use crate::engine::error::DispatchError;
use crate::engine::submachine::Submachine;
use crate::engine::workflow::Workflow;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Outcome of a single dispatch step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    /// The inputs were consumed by a nested instance that is still running.
    Delegated,

    /// A transition of this workflow moved the current state.
    Transitioned,
}

/// One running state machine: a shared workflow plus a current state.
///
/// Cloning an instance yields another handle to the same machine. Every
/// call to [`continue_with`] holds the instance lock until the input and any
/// epsilon transitions it triggers have been applied, so calls from several
/// threads are applied one after another.
///
/// The lock is not reentrant: a transition or observer that synchronously
/// calls `continue_with` on the instance currently dispatching it will
/// deadlock. Handing a clone of the instance to another thread that calls
/// `continue_with` is fine; that call runs after the current one returns.
///
/// [`continue_with`]: WorkflowInstance::continue_with
#[derive(Clone)]
pub struct WorkflowInstance {
    id: Uuid,
    workflow: Arc<Workflow>,
    current: Arc<Mutex<Box<dyn State>>>,
}

impl WorkflowInstance {
    pub(crate) fn new(workflow: Arc<Workflow>, initial: Box<dyn State>) -> Self {
        let id = Uuid::new_v4();
        tracing::trace!(instance = %id, state = initial.name(), "created workflow instance");
        Self {
            id,
            workflow,
            current: Arc::new(Mutex::new(initial)),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn workflow(&self) -> &Arc<Workflow> {
        &self.workflow
    }

    /// Apply a single input to the current state.
    pub fn continue_with<I: Input>(&self, input: I) -> Result<(), DispatchError> {
        self.continue_with_all(Inputs::new().with(input))
    }

    /// Apply any number of inputs, in order, as one dispatch.
    ///
    /// An empty list dispatches the zero-input transition of the current
    /// state, if any.
    pub fn continue_with_all(&self, inputs: Inputs) -> Result<(), DispatchError> {
        let mut current = self.current.lock();
        self.apply(&mut current, &inputs)
    }

    /// Copy of the current state.
    pub fn current_state(&self) -> Box<dyn State> {
        self.current.lock().clone_box()
    }

    /// Copy of the current state if it is a `T`.
    pub fn current_state_as<T: State + Clone>(&self) -> Option<T> {
        self.current.lock().downcast_ref::<T>().cloned()
    }

    /// Run `f` against the current state without copying it.
    ///
    /// The instance lock is held while `f` runs.
    pub fn with_current_state<R>(&self, f: impl FnOnce(&dyn State) -> R) -> R {
        let current = self.current.lock();
        f(&**current)
    }

    /// Whether the current state is terminal for this workflow.
    pub fn is_terminated(&self) -> bool {
        let current = self.current.lock();
        self.workflow.is_terminal(&**current)
    }

    fn apply(&self, current: &mut Box<dyn State>, inputs: &Inputs) -> Result<(), DispatchError> {
        if self.step(current, inputs)? == Step::Delegated {
            return Ok(());
        }

        let mut chained = 0usize;
        loop {
            if self.workflow.is_terminal(&**current) {
                break;
            }
            let signature = Signature::of_state(&**current);
            if !self.workflow.contains(&signature) {
                break;
            }
            if let Some(limit) = self.workflow.config().epsilon_limit() {
                if chained >= limit {
                    tracing::debug!(instance = %self.id, limit, "epsilon chain limit reached");
                    return Err(DispatchError::EpsilonLimitExceeded { limit });
                }
            }
            chained += 1;
            tracing::trace!(instance = %self.id, %signature, step = chained, "chaining epsilon transition");

            if self.step(current, &Inputs::new())? == Step::Delegated {
                break;
            }
        }

        Ok(())
    }

    fn step(&self, current: &mut Box<dyn State>, inputs: &Inputs) -> Result<Step, DispatchError> {
        if let Some(nested) = current.as_submachine() {
            if !nested.is_terminated() {
                tracing::trace!(instance = %self.id, state = current.name(), "delegating to submachine");
                nested.continue_with_inputs(inputs)?;
                if !nested.is_terminated() {
                    return Ok(Step::Delegated);
                }
            }
        }

        let signature = Signature::of_call(&**current, inputs);
        let Some(transition) = self.workflow.transition(&signature) else {
            tracing::debug!(instance = %self.id, %signature, "no matching transition");
            return Err(DispatchError::NoMatchingTransition { signature });
        };

        tracing::debug!(instance = %self.id, %signature, "applying transition");
        match transition.invoke(current.clone_box(), inputs.clone()) {
            Ok(next) => {
                let previous = std::mem::replace(current, next);
                self.workflow
                    .notify_succeeded(&**current, &*previous, inputs);
                Ok(Step::Transitioned)
            }
            Err(failure) => {
                tracing::debug!(instance = %self.id, %signature, %failure, "transition failed");
                self.workflow
                    .notify_failed(&failure, &**current, inputs);
                Err(DispatchError::TransitionFailed(failure))
            }
        }
    }
}

impl Submachine for WorkflowInstance {
    fn continue_with_inputs(&self, inputs: &Inputs) -> Result<(), DispatchError> {
        let mut current = self.current.lock();
        self.apply(&mut current, inputs)
    }

    fn current_state(&self) -> Box<dyn State> {
        WorkflowInstance::current_state(self)
    }

    fn is_terminated(&self) -> bool {
        WorkflowInstance::is_terminated(self)
    }
}

impl fmt::Debug for WorkflowInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("WorkflowInstance");
        debug.field("id", &self.id);
        // Debug may run while this instance is dispatching.
        match self.current.try_lock() {
            Some(current) => debug.field("current", &*current),
            None => debug.field("current", &"<locked>"),
        };
        debug.finish()
    }
}
