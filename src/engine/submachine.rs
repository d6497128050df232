//! Hierarchical composition.
//!
//! A state that owns a nested workflow instance exposes it through
//! [`State::as_submachine`](crate::core::State::as_submachine). While the
//! nested instance has not terminated, the outer instance forwards every
//! input to it instead of looking up its own transitions.

use crate::core::{Inputs, State};
use crate::engine::error::DispatchError;

/// Capability of a state value to act as a nested state machine.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use typeflow::core::{State, Terminated};
/// use typeflow::engine::{Submachine, Workflow, WorkflowInstance};
///
/// #[derive(Clone, Debug)]
/// struct Waiting;
/// impl State for Waiting {}
///
/// #[derive(Clone, Debug)]
/// struct TakenOffHold;
///
/// #[derive(Clone, Debug)]
/// struct OnHold(WorkflowInstance);
///
/// impl State for OnHold {
///     fn as_submachine(&self) -> Option<&dyn Submachine> {
///         Some(&self.0)
///     }
/// }
///
/// let mut on_hold = Workflow::new();
/// on_hold
///     .add_transition(|_: Waiting, _: TakenOffHold| Terminated)
///     .unwrap();
/// let on_hold = Arc::new(on_hold);
///
/// let state = OnHold(on_hold.new_instance(Waiting));
/// let nested = state.as_submachine().unwrap();
/// assert!(!nested.is_terminated());
///
/// state.0.continue_with(TakenOffHold).unwrap();
/// assert!(nested.is_terminated());
/// ```
pub trait Submachine: Send + Sync {
    /// Dispatch `inputs` on the nested instance.
    fn continue_with_inputs(&self, inputs: &Inputs) -> Result<(), DispatchError>;

    /// Copy of the nested instance's current state.
    fn current_state(&self) -> Box<dyn State>;

    /// Whether the nested instance reached a terminal state.
    fn is_terminated(&self) -> bool;
}
