//! Transition signatures.
//!
//! A signature is the ordered list of concrete types taking part in a
//! dispatch: the state type first, then each input type in call order. The
//! same derivation is used when a transition is registered and when a live
//! state and its inputs are looked up, so the two always agree.

use crate::core::input::Inputs;
use crate::core::state::State;
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a single concrete type.
///
/// Equality and hashing use the `TypeId` only; the name is kept for
/// diagnostics.
#[derive(Clone, Copy, Debug)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Ordered, order-sensitive sequence of type identities.
///
/// # Example
///
/// ```rust
/// use typeflow::core::{Inputs, Signature};
///
/// let registered = Signature::new().with::<String>().with::<u8>();
/// let live = Signature::of_call(&String::from("state"), &Inputs::new().with(7u8));
///
/// assert_eq!(registered, live);
/// assert_eq!(live.arity(), 1);
///
/// let swapped = Signature::new().with::<u8>().with::<String>();
/// assert_ne!(registered, swapped);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Signature {
    types: Vec<TypeKey>,
}

impl Signature {
    /// Create an empty signature.
    pub fn new() -> Self {
        Self { types: Vec::new() }
    }

    /// Append the type `T`, returning the signature.
    pub fn with<T: ?Sized + 'static>(mut self) -> Self {
        self.types.push(TypeKey::of::<T>());
        self
    }

    /// Append a type identity.
    pub fn push(&mut self, key: TypeKey) {
        self.types.push(key);
    }

    /// Signature of a zero-input dispatch from `state`.
    pub fn of_state(state: &dyn State) -> Self {
        Self {
            types: vec![state.type_key()],
        }
    }

    /// Signature of dispatching `inputs` against `state`.
    pub fn of_call(state: &dyn State, inputs: &Inputs) -> Self {
        let mut types = Vec::with_capacity(1 + inputs.len());
        types.push(state.type_key());
        types.extend(inputs.type_keys());
        Self { types }
    }

    /// The state type this signature dispatches on.
    pub fn state_type(&self) -> Option<&TypeKey> {
        self.types.first()
    }

    /// Number of inputs, not counting the state.
    pub fn arity(&self) -> usize {
        self.types.len().saturating_sub(1)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn types(&self) -> &[TypeKey] {
        &self.types
    }
}

impl From<Vec<TypeKey>> for Signature {
    fn from(types: Vec<TypeKey>) -> Self {
        Self { types }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, key) in self.types.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}")?;
        }
        f.write_str(")")
    }
}
