//! Transitions and their type-erased form.
//!
//! A transition is an ordinary function or closure whose first parameter is
//! the state it applies to and whose remaining parameters are the inputs it
//! consumes. It returns either the next state or `Result<NextState, E>`.
//! Registration erases it into a [`Transition`] keyed by its signature.

use crate::core::{Input, Inputs, Signature, State, TypeKey};
use crate::engine::error::RegistrationError;
use std::error::Error;
use std::fmt;

/// Failure value reported by a transition.
///
/// Wraps whatever error the transition returned; use [`downcast_ref`] to
/// recover the original type.
///
/// [`downcast_ref`]: TransitionFailure::downcast_ref
pub struct TransitionFailure(Box<dyn Error + Send + Sync + 'static>);

impl TransitionFailure {
    pub fn new<E>(error: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        Self(error.into())
    }

    /// Borrow the underlying error as `E`.
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }

    pub fn into_inner(self) -> Box<dyn Error + Send + Sync + 'static> {
        self.0
    }
}

impl fmt::Debug for TransitionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for TransitionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Error for TransitionFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.source()
    }
}

/// Return value of a transition.
///
/// Implemented for every state type (the transition always succeeds) and for
/// `Result<S, E>` (an `Err` is reported as a [`TransitionFailure`]).
///
/// A transition that picks its next state type at runtime returns
/// `Box<dyn State>` or `Result<Box<dyn State>, E>`. Its result type is then
/// unknown at registration, so it cannot be registered as a termination.
pub trait IntoOutcome {
    /// The state type produced on success, if fixed.
    fn result_type() -> Option<TypeKey>;

    fn into_outcome(self) -> Result<Box<dyn State>, TransitionFailure>;
}

impl<S: State + Clone> IntoOutcome for S {
    fn result_type() -> Option<TypeKey> {
        Some(TypeKey::of::<S>())
    }

    fn into_outcome(self) -> Result<Box<dyn State>, TransitionFailure> {
        Ok(Box::new(self))
    }
}

impl<S, E> IntoOutcome for Result<S, E>
where
    S: State + Clone,
    E: Into<Box<dyn Error + Send + Sync + 'static>>,
{
    fn result_type() -> Option<TypeKey> {
        Some(TypeKey::of::<S>())
    }

    fn into_outcome(self) -> Result<Box<dyn State>, TransitionFailure> {
        match self {
            Ok(state) => Ok(Box::new(state)),
            Err(error) => Err(TransitionFailure::new(error)),
        }
    }
}

impl IntoOutcome for Box<dyn State> {
    fn result_type() -> Option<TypeKey> {
        None
    }

    fn into_outcome(self) -> Result<Box<dyn State>, TransitionFailure> {
        Ok(self)
    }
}

impl<E> IntoOutcome for Result<Box<dyn State>, E>
where
    E: Into<Box<dyn Error + Send + Sync + 'static>>,
{
    fn result_type() -> Option<TypeKey> {
        None
    }

    fn into_outcome(self) -> Result<Box<dyn State>, TransitionFailure> {
        self.map_err(TransitionFailure::new)
    }
}

type Handler =
    Box<dyn Fn(Box<dyn State>, Inputs) -> Result<Box<dyn State>, TransitionFailure> + Send + Sync>;

/// A type-erased transition together with its signature.
pub struct Transition {
    signature: Signature,
    result_type: Option<TypeKey>,
    handler: Handler,
}

impl Transition {
    /// Build a transition from an explicit signature and a handler over the
    /// boxed state and its inputs.
    ///
    /// The handler is only invoked for calls whose signature equals
    /// `signature`, so it may downcast the state and inputs accordingly.
    ///
    /// # Example
    ///
    /// ```rust
    /// use typeflow::core::{Inputs, Signature, State};
    /// use typeflow::engine::{Transition, TransitionFailure};
    ///
    /// let append = Transition::raw(
    ///     Signature::new().with::<String>().with::<char>(),
    ///     |state: Box<dyn State>, inputs: Inputs| {
    ///         let mut text = state.downcast_ref::<String>().cloned().unwrap_or_default();
    ///         if let Some(c) = inputs.get::<char>(0) {
    ///             text.push(*c);
    ///         }
    ///         Ok::<_, TransitionFailure>(Box::new(text) as Box<dyn State>)
    ///     },
    /// );
    ///
    /// assert_eq!(append.signature().arity(), 1);
    /// ```
    pub fn raw<F>(signature: Signature, handler: F) -> Self
    where
        F: Fn(Box<dyn State>, Inputs) -> Result<Box<dyn State>, TransitionFailure>
            + Send
            + Sync
            + 'static,
    {
        Self {
            signature,
            result_type: None,
            handler: Box::new(handler),
        }
    }

    /// Declare the state type this transition produces.
    ///
    /// Required for raw transitions registered as terminations.
    pub fn with_result_type<S: State>(mut self) -> Self {
        self.result_type = Some(TypeKey::of::<S>());
        self
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The declared result state type, if known.
    pub fn result_type(&self) -> Option<TypeKey> {
        self.result_type
    }

    /// Check the structural requirements for registration.
    pub(crate) fn check_shape(&self, terminating: bool) -> Result<(), RegistrationError> {
        if self.signature.is_empty() {
            return Err(RegistrationError::InvalidTransitionShape {
                reason: "a transition must accept at least the state parameter".to_string(),
            });
        }
        if terminating && self.result_type.is_none() {
            return Err(RegistrationError::InvalidTransitionShape {
                reason: format!(
                    "termination {} does not declare its result state type",
                    self.signature
                ),
            });
        }
        Ok(())
    }

    pub(crate) fn invoke(
        &self,
        state: Box<dyn State>,
        inputs: Inputs,
    ) -> Result<Box<dyn State>, TransitionFailure> {
        (self.handler)(state, inputs)
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("signature", &self.signature)
            .field("result_type", &self.result_type)
            .finish_non_exhaustive()
    }
}

/// Conversion of functions and closures into a [`Transition`].
///
/// `Args` is the tuple of parameter types, `(State, Input1, ..)`. It is
/// inferred from the function's signature and only serves to tell the impls
/// for different arities apart.
pub trait IntoTransition<Args> {
    fn into_transition(self) -> Transition;
}

impl IntoTransition<()> for Transition {
    fn into_transition(self) -> Transition {
        self
    }
}

fn take_state<S: State>(state: Box<dyn State>) -> S {
    match state.downcast::<S>() {
        Ok(state) => *state,
        Err(other) => panic!(
            "transition for state {} dispatched with {}",
            std::any::type_name::<S>(),
            other.name()
        ),
    }
}

fn take_input<I: Input>(input: Option<Box<dyn Input>>) -> I {
    match input.and_then(|input| input.downcast::<I>()) {
        Some(input) => input,
        None => panic!(
            "transition expecting input {} dispatched without it",
            std::any::type_name::<I>()
        ),
    }
}

macro_rules! impl_into_transition {
    ($($input:ident),*) => {
        impl<F, S, R, $($input,)*> IntoTransition<(S, $($input,)*)> for F
        where
            F: Fn(S, $($input,)*) -> R + Send + Sync + 'static,
            S: State + Clone,
            $($input: Input,)*
            R: IntoOutcome,
        {
            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn into_transition(self) -> Transition {
                let signature = Signature::new().with::<S>()$(.with::<$input>())*;
                Transition {
                    signature,
                    result_type: R::result_type(),
                    handler: Box::new(move |state: Box<dyn State>, inputs: Inputs| {
                        let mut values = inputs.into_values().into_iter();
                        $(let $input = take_input::<$input>(values.next());)*
                        (self)(take_state::<S>(state), $($input,)*).into_outcome()
                    }),
                }
            }
        }
    };
}

impl_into_transition!();
impl_into_transition!(I1);
impl_into_transition!(I1, I2);
impl_into_transition!(I1, I2, I3);
impl_into_transition!(I1, I2, I3, I4);
