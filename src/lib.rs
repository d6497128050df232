//! Typeflow: a type-directed workflow engine
//!
//! A workflow is a set of transitions. Each transition is an ordinary
//! function from the current state and zero or more inputs to a new state,
//! and it is selected purely by the runtime types of those values.
//!
//! # Core Concepts
//!
//! - **State**: any value implementing [`State`]; its type is what matters
//! - **Inputs**: values passed to [`WorkflowInstance::continue_with`]
//! - **Signature**: the ordered type list `(state, inputs..)` used for lookup
//! - **Epsilon transitions**: transitions without inputs, chained automatically
//! - **Termination**: the [`Terminated`] state, or any state type produced by
//!   a transition registered as a termination
//! - **Submachines**: states holding a nested instance that consumes inputs
//!   until it terminates
//!
//! # Example
//!
//! ```rust
//! use typeflow::{states, WorkflowBuilder};
//!
//! #[derive(Clone, Debug)]
//! struct Parsed(String);
//! states!(Parsed);
//!
//! #[derive(Clone, Debug)]
//! struct Parse;
//!
//! let workflow = WorkflowBuilder::new()
//!     .transition(|text: String, _: Parse| Parsed(text))
//!     .transition(|state: Parsed, suffix: String| {
//!         state.0.trim_end_matches(suffix.as_str()).to_string()
//!     })
//!     .build()
//!     .unwrap();
//!
//! let hello = workflow.new_instance(String::from("Hello"));
//! let ciao = workflow.new_instance(String::from("Ciao"));
//!
//! hello.continue_with(Parse).unwrap();
//! hello.continue_with(String::from("llo")).unwrap();
//!
//! assert_eq!(hello.current_state_as::<String>().unwrap(), "He");
//! assert_eq!(ciao.current_state_as::<String>().unwrap(), "Ciao");
//! ```

pub mod builder;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use builder::{BuildError, WorkflowBuilder};
pub use core::{Input, Inputs, Signature, State, Terminated, TypeKey};
pub use engine::{
    DispatchError, RegistrationError, Submachine, Transition, TransitionFailure, Workflow,
    WorkflowConfig, WorkflowInstance,
};
