//! Variable cells for generated code.

use std::cell::RefCell;
use std::rc::Rc;

use crate::value::Value;

/// A shared, mutable variable slot.
///
/// Generated code stores every Goblin variable in a `Binding`. A closure
/// captures a variable by cloning its binding, so assignments made after the
/// closure was created (including the function's own definition, for
/// recursion) are visible inside it.
#[derive(Clone, Debug, Default)]
pub struct Binding(Rc<RefCell<Value>>);

impl Binding {
    pub fn new(value: Value) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Current value. Containers come back as shared handles.
    pub fn get(&self) -> Value {
        self.0.borrow().clone()
    }

    pub fn set(&self, value: Value) {
        *self.0.borrow_mut() = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_slot() {
        let x = Binding::new(Value::Integer(1));
        let captured = x.clone();
        x.set(Value::Integer(2));
        assert_eq!(captured.get(), Value::Integer(2));
    }

    #[test]
    fn test_default_is_unit() {
        assert!(Binding::default().get().is_unit());
    }
}
