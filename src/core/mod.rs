//! Core value types for type-directed dispatch.
//!
//! This module contains the pieces the engine matches on:
//! - State values via the `State` trait
//! - Input values and ordered input lists
//! - Signatures derived from the concrete types of both

mod input;
mod signature;
mod state;

pub use input::{Input, Inputs};
pub use signature::{Signature, TypeKey};
pub use state::{State, StateObject, Terminated};
