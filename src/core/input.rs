//! Input values fed to a running workflow.
//!
//! Any `Clone + Debug + Send + Sync + 'static` value can be used as an input;
//! its concrete type takes part in transition lookup.

use crate::core::signature::TypeKey;
use std::any::Any;
use std::fmt::Debug;

/// A value that can be passed to `continue_with`.
///
/// Implemented for every `Clone + Debug + Send + Sync + 'static` type.
pub trait Input: Debug + Send + Sync + 'static {
    #[doc(hidden)]
    fn clone_input(&self) -> Box<dyn Input>;

    #[doc(hidden)]
    fn input_as_any(&self) -> &dyn Any;

    #[doc(hidden)]
    fn into_any_input(self: Box<Self>) -> Box<dyn Any + Send + Sync>;

    /// Identity of the concrete input type.
    fn input_type(&self) -> TypeKey;
}

impl<T: Clone + Debug + Send + Sync + 'static> Input for T {
    fn clone_input(&self) -> Box<dyn Input> {
        Box::new(self.clone())
    }

    fn input_as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_input(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }

    fn input_type(&self) -> TypeKey {
        TypeKey::of::<T>()
    }
}

impl dyn Input {
    /// Borrow the input as its concrete type.
    pub fn downcast_ref<T: Input>(&self) -> Option<&T> {
        self.input_as_any().downcast_ref::<T>()
    }

    pub(crate) fn downcast<T: Input>(self: Box<Self>) -> Option<T> {
        self.into_any_input().downcast::<T>().ok().map(|input| *input)
    }
}

/// Ordered list of inputs for one dispatch.
///
/// Observers receive the same list that was used for the lookup.
///
/// # Example
///
/// ```rust
/// use typeflow::core::Inputs;
///
/// let inputs = Inputs::new().with("Superstreet").with(42u16);
///
/// assert_eq!(inputs.len(), 2);
/// assert_eq!(inputs.get::<&str>(0), Some(&"Superstreet"));
/// assert_eq!(inputs.get::<u16>(1), Some(&42));
/// assert_eq!(inputs.get::<u16>(0), None);
/// ```
#[derive(Debug, Default)]
pub struct Inputs {
    values: Vec<Box<dyn Input>>,
}

impl Inputs {
    /// Create an empty input list (an epsilon dispatch).
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Append an input, returning the list.
    pub fn with<I: Input>(mut self, input: I) -> Self {
        self.push(input);
        self
    }

    /// Append an input.
    pub fn push<I: Input>(&mut self, input: I) {
        self.values.push(Box::new(input));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the input at `index` as `T`.
    ///
    /// Returns `None` if the index is out of range or the type differs.
    pub fn get<T: Input>(&self, index: usize) -> Option<&T> {
        self.values
            .get(index)
            .and_then(|input| input.downcast_ref::<T>())
    }

    /// Iterate over the inputs in dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Input> {
        self.values.iter().map(|input| &**input)
    }

    pub(crate) fn type_keys(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.values.iter().map(|input| (**input).input_type())
    }

    pub(crate) fn into_values(self) -> Vec<Box<dyn Input>> {
        self.values
    }
}

impl Clone for Inputs {
    fn clone(&self) -> Self {
        Self {
            values: self
                .values
                .iter()
                .map(|input| (**input).clone_input())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Volume(u8);

    #[test]
    fn new_inputs_are_empty() {
        let inputs = Inputs::new();
        assert!(inputs.is_empty());
        assert_eq!(inputs.type_keys().count(), 0);
    }

    #[test]
    fn inputs_keep_call_order() {
        let inputs = Inputs::new().with(Volume(2)).with("loud");

        let keys: Vec<TypeKey> = inputs.type_keys().collect();
        assert_eq!(keys, vec![TypeKey::of::<Volume>(), TypeKey::of::<&str>()]);
    }

    #[test]
    fn get_checks_type_and_index() {
        let mut inputs = Inputs::new();
        inputs.push(Volume(11));

        assert_eq!(inputs.get::<Volume>(0), Some(&Volume(11)));
        assert_eq!(inputs.get::<String>(0), None);
        assert_eq!(inputs.get::<Volume>(1), None);
    }

    #[test]
    fn clone_copies_every_value() {
        let inputs = Inputs::new().with(Volume(3)).with(String::from("x"));
        let cloned = inputs.clone();

        assert_eq!(cloned.len(), 2);
        assert_eq!(cloned.get::<Volume>(0), Some(&Volume(3)));
        assert_eq!(cloned.get::<String>(1).map(String::as_str), Some("x"));
    }

    #[test]
    fn boxed_input_downcasts_by_value() {
        let mut values = Inputs::new().with(Volume(5)).into_values();
        let input = values.remove(0);

        assert_eq!(input.downcast::<Volume>(), Some(Volume(5)));
    }
}
