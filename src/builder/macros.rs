//! Macros for ergonomic workflow construction.

/// Implement `State` for one or more types.
///
/// Prefix the list with `submachine` for tuple structs whose first field is
/// a nested [`WorkflowInstance`](crate::engine::WorkflowInstance); such
/// states receive inputs until the nested instance terminates.
///
/// # Example
///
/// ```
/// use typeflow::engine::WorkflowInstance;
/// use typeflow::states;
///
/// #[derive(Clone, Debug)]
/// struct OffHook;
///
/// #[derive(Clone, Debug)]
/// struct Ringing;
///
/// #[derive(Clone, Debug)]
/// struct OnHold(WorkflowInstance);
///
/// states!(OffHook, Ringing);
/// states!(submachine OnHold);
/// ```
#[macro_export]
macro_rules! states {
    (submachine $($ty:ty),+ $(,)?) => {
        $(
            impl $crate::core::State for $ty {
                fn as_submachine(
                    &self,
                ) -> ::std::option::Option<&dyn $crate::engine::Submachine> {
                    ::std::option::Option::Some(&self.0)
                }
            }
        )+
    };
    ($($ty:ty),+ $(,)?) => {
        $(impl $crate::core::State for $ty {})+
    };
}

/// Build an [`Inputs`](crate::core::Inputs) list from expressions, in order.
///
/// # Example
///
/// ```
/// use typeflow::inputs;
///
/// let inputs = inputs!["Superstreet", 42u16];
/// assert_eq!(inputs.len(), 2);
/// assert_eq!(inputs.get::<u16>(1), Some(&42));
/// ```
#[macro_export]
macro_rules! inputs {
    () => {
        $crate::core::Inputs::new()
    };
    ($($input:expr),+ $(,)?) => {
        $crate::core::Inputs::new()$(.with($input))+
    };
}
