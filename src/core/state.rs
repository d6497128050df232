//! Core State trait for workflow states.
//!
//! A workflow instance stores its current state as a `Box<dyn State>`, so any
//! type implementing this trait can appear as a state. Transitions are
//! selected by the concrete type of that value, never by its contents.

use crate::core::signature::TypeKey;
use crate::engine::Submachine;
use std::any::Any;
use std::fmt::Debug;

/// Trait for workflow states.
///
/// Implementors must also be `Clone`: the engine hands transitions a copy of
/// the current state so that the original survives a failed transition.
///
/// # Required Traits
///
/// - `Clone`: states are copied into transitions and out of `current_state()`
/// - `Debug`: states must be debuggable for diagnostics
/// - `Send` + `Sync`: instances may be driven from several threads
///
/// # Example
///
/// ```rust
/// use typeflow::core::State;
///
/// #[derive(Clone, Debug)]
/// struct Draft {
///     body: String,
/// }
///
/// impl State for Draft {}
///
/// let draft = Draft { body: "hi".to_string() };
/// assert!(draft.name().ends_with("Draft"));
/// assert!(draft.as_submachine().is_none());
/// ```
pub trait State: StateObject + Debug + Send + Sync + 'static {
    /// Get the state's name for display/logging.
    ///
    /// Default implementation returns the full type name.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Expose a nested workflow owned by this state.
    ///
    /// Composite states return their nested instance here; inputs are then
    /// forwarded to it until it terminates.
    ///
    /// Default implementation returns `None`.
    fn as_submachine(&self) -> Option<&dyn Submachine> {
        None
    }
}

/// Object-safe plumbing for `dyn State`, implemented for every `State + Clone`.
#[doc(hidden)]
pub trait StateObject {
    fn clone_box(&self) -> Box<dyn State>;
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
    fn type_key(&self) -> TypeKey;
}

impl<T: State + Clone> StateObject for T {
    fn clone_box(&self) -> Box<dyn State> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }

    fn type_key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }
}

impl dyn State {
    /// Check whether the concrete type of this state is `T`.
    pub fn is<T: State>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Borrow the state as its concrete type.
    pub fn downcast_ref<T: State>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Take the state as its concrete type, handing it back on mismatch.
    pub fn downcast<T: State>(self: Box<Self>) -> Result<Box<T>, Box<dyn State>> {
        if !self.is::<T>() {
            return Err(self);
        }
        match self.into_any().downcast::<T>() {
            Ok(state) => Ok(state),
            Err(_) => unreachable!("state type was checked before downcasting"),
        }
    }
}

impl Clone for Box<dyn State> {
    fn clone(&self) -> Self {
        (**self).clone_box()
    }
}

/// Reserved terminal state.
///
/// A workflow whose current state is `Terminated` reports itself as
/// terminated regardless of which terminations were registered, so a nested
/// workflow can finish simply by transitioning here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Terminated;

impl State for Terminated {
    fn name(&self) -> &str {
        "Terminated"
    }
}

macro_rules! primitive_states {
    ($($ty:ty),* $(,)?) => {
        $(impl State for $ty {})*
    };
}

primitive_states!(
    String,
    &'static str,
    bool,
    char,
    (),
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    struct Initial;

    #[derive(Clone, PartialEq, Debug)]
    struct Processing {
        step: u32,
    }

    impl State for Initial {}

    impl State for Processing {
        fn name(&self) -> &str {
            "Processing"
        }
    }

    #[test]
    fn default_name_is_type_name() {
        assert!(Initial.name().ends_with("Initial"));
        assert_eq!(Processing { step: 1 }.name(), "Processing");
    }

    #[test]
    fn boxed_state_keeps_concrete_type() {
        let state: Box<dyn State> = Box::new(Processing { step: 7 });

        assert!(state.is::<Processing>());
        assert!(!state.is::<Initial>());
        assert_eq!(state.downcast_ref::<Processing>(), Some(&Processing { step: 7 }));
    }

    #[test]
    fn downcast_hands_back_mismatched_state() {
        let state: Box<dyn State> = Box::new(Initial);

        let state = state.downcast::<Processing>().unwrap_err();
        assert!(state.is::<Initial>());

        let initial = state.downcast::<Initial>().unwrap();
        assert_eq!(*initial, Initial);
    }

    #[test]
    fn cloned_box_is_independent_copy() {
        let state: Box<dyn State> = Box::new(String::from("Hello"));
        let cloned = state.clone();

        assert_eq!(cloned.downcast_ref::<String>().map(String::as_str), Some("Hello"));
        assert_eq!(state.type_key(), cloned.type_key());
    }

    #[test]
    fn type_key_distinguishes_primitives() {
        let number: Box<dyn State> = Box::new(1u32);
        let text: Box<dyn State> = Box::new("one");

        assert_ne!(number.type_key(), text.type_key());
        assert_eq!(number.type_key(), TypeKey::of::<u32>());
    }

    #[test]
    fn plain_states_are_not_submachines() {
        assert!(Initial.as_submachine().is_none());
        assert!(Terminated.as_submachine().is_none());
        assert_eq!(Terminated.name(), "Terminated");
    }
}
