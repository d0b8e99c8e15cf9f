//! Iteration, indexing, attribute access and calls.

use crate::errors::{
    index_out_of_range, invalid_index_type, key_not_found, not_callable, not_indexable,
    not_iterable, undefined_attribute, Error, RtResult,
};
use crate::methods;
use crate::value::{KwArgs, Value};

impl Value {
    /// The sequence a `for` loop walks.
    ///
    /// Lists yield a snapshot of their elements, strings one single-character
    /// string per code point, dicts their keys in insertion order.
    pub fn iterate(&self) -> Result<Vec<Value>, Error> {
        match self {
            Value::List(items) => Ok(items.borrow().clone()),
            Value::String(s) => Ok(s.chars().map(|c| Value::string(c.to_string())).collect()),
            Value::Dict(dict) => Ok(dict.borrow().keys().cloned().collect()),
            Value::Integer(_)
            | Value::Float(_)
            | Value::Bool(_)
            | Value::Function(_)
            | Value::Namespace(_)
            | Value::Unit => Err(not_iterable(self)),
        }
    }

    /// `self[key]`
    pub fn index(&self, key: &Value) -> RtResult {
        match self {
            Value::List(items) => {
                let Value::Integer(i) = key else {
                    return Err(invalid_index_type(key));
                };
                let element = usize::try_from(*i)
                    .ok()
                    .and_then(|idx| items.borrow().get(idx).cloned());
                element.ok_or_else(|| index_out_of_range(*i))
            }
            Value::Dict(dict) => {
                let value = dict.borrow().get(key).cloned();
                value.ok_or_else(|| key_not_found(key))
            }
            Value::Integer(_)
            | Value::Float(_)
            | Value::Bool(_)
            | Value::String(_)
            | Value::Function(_)
            | Value::Namespace(_)
            | Value::Unit => Err(not_indexable(self)),
        }
    }

    /// `self.name`
    ///
    /// Strings, lists and dicts expose their built-in methods as functions
    /// bound to the receiver. Namespaces look up an exported member.
    pub fn get_attr(&self, name: &str) -> RtResult {
        match self {
            Value::String(s) => methods::string_method(s, name),
            Value::List(items) => methods::list_method(items, name),
            Value::Dict(dict) => methods::dict_method(dict, name),
            Value::Namespace(ns) => ns.get(name),
            Value::Integer(_)
            | Value::Float(_)
            | Value::Bool(_)
            | Value::Function(_)
            | Value::Unit => Err(undefined_attribute(self, name)),
        }
    }

    /// Invoke a function value.
    pub fn call(&self, args: &[Value], kwargs: &KwArgs) -> RtResult {
        match self {
            Value::Function(func) => func.call(args, kwargs),
            _ => Err(not_callable(self)),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ints(values: &[i64]) -> Value {
        Value::list(values.iter().copied().map(Value::Integer).collect())
    }

    #[test]
    fn test_list_index() {
        let list = ints(&[10, 20, 30]);
        assert_eq!(list.index(&Value::Integer(1)), Ok(Value::Integer(20)));

        let err = list.index(&Value::Integer(5)).unwrap_err();
        assert!(err.to_string().contains("out of range"));

        let err = list.index(&Value::Integer(-1)).unwrap_err();
        assert_eq!(err.to_string(), "index -1 out of range");
    }

    #[test]
    fn test_list_index_requires_integer() {
        let err = ints(&[1]).index(&Value::string("0")).unwrap_err();
        assert_eq!(err.to_string(), "list indices must be integers, got String");
    }

    #[test]
    fn test_dict_index() {
        let dict = Value::dict_from([(Value::string("a"), Value::Integer(1))]);
        assert_eq!(dict.index(&Value::string("a")), Ok(Value::Integer(1)));
        assert_eq!(
            dict.index(&Value::string("b")).unwrap_err().to_string(),
            "key not found: b"
        );
    }

    #[test]
    fn test_dict_keys_by_display_form() {
        let dict = Value::dict_from([(Value::Integer(1), Value::string("one"))]);
        assert_eq!(dict.index(&Value::string("1")), Ok(Value::string("one")));
    }

    #[test]
    fn test_not_indexable() {
        assert_eq!(
            Value::string("abc")
                .index(&Value::Integer(0))
                .unwrap_err()
                .to_string(),
            "String is not indexable"
        );
        assert_eq!(
            Value::Unit.index(&Value::Integer(0)).unwrap_err().to_string(),
            "Unit is not indexable"
        );
    }

    #[test]
    fn test_iterate() {
        assert_eq!(ints(&[1, 2]).iterate(), Ok(vec![Value::Integer(1), Value::Integer(2)]));
        assert_eq!(
            Value::string("hé").iterate(),
            Ok(vec![Value::string("h"), Value::string("é")])
        );

        let dict = Value::dict_from([
            (Value::string("b"), Value::Integer(1)),
            (Value::string("a"), Value::Integer(2)),
        ]);
        assert_eq!(dict.iterate(), Ok(vec![Value::string("b"), Value::string("a")]));

        assert_eq!(
            Value::Integer(3).iterate().unwrap_err().to_string(),
            "Integer does not support iteration"
        );
    }

    #[test]
    fn test_iterate_is_a_snapshot() {
        let list = ints(&[1]);
        let seen = list.iterate().unwrap();
        if let Value::List(items) = &list {
            items.borrow_mut().push(Value::Integer(2));
        }
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_call() {
        let double = Value::function("double", |args, _| args[0].add(&args[0]));
        assert_eq!(
            double.call(&[Value::Integer(4)], &KwArgs::default()),
            Ok(Value::Integer(8))
        );
        assert_eq!(
            Value::Integer(1)
                .call(&[], &KwArgs::default())
                .unwrap_err()
                .to_string(),
            "Integer(1) is not callable"
        );
    }

    #[test]
    fn test_unknown_attribute() {
        assert_eq!(
            Value::Integer(1).get_attr("size").unwrap_err().to_string(),
            "Integer has no attribute 'size'"
        );
        assert_eq!(
            Value::string("s").get_attr("nope").unwrap_err().to_string(),
            "String has no attribute 'nope'"
        );
    }

    #[test]
    fn test_namespace_member() {
        let mut members = rustc_hash::FxHashMap::default();
        members.insert("answer".to_string(), Value::Integer(42));
        let ns = Value::namespace("util", members);

        assert_eq!(ns.get_attr("answer"), Ok(Value::Integer(42)));
        assert_eq!(
            ns.get_attr("missing").unwrap_err().to_string(),
            "module 'util' has no attribute 'missing'"
        );
    }
}
