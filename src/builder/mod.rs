//! Builder API for ergonomic workflow construction.
//!
//! [`WorkflowBuilder`] collects transitions and observers, validates them
//! together, and produces a shared [`Workflow`](crate::engine::Workflow).
//! The [`states!`](crate::states) and [`inputs!`](crate::inputs) macros
//! remove the remaining boilerplate.

pub mod error;
pub mod macros;
pub mod workflow;

pub use error::BuildError;
pub use workflow::WorkflowBuilder;
