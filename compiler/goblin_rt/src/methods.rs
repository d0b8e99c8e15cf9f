//! Built-in methods of strings, lists and dicts.
//!
//! `get_attr` hands each method out as a function value bound to its
//! receiver. Lists and dicts are bound by handle, so a method observes and
//! mutates the same storage as every other alias.

use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::{invalid_argument, undefined_attribute, wrong_argument_count, Error, RtResult};
use crate::value::{Dict, Value};

fn expect_args(method: &str, args: &[Value], count: usize) -> Result<(), Error> {
    if args.len() == count {
        Ok(())
    } else {
        Err(wrong_argument_count(method, count, args.len()))
    }
}

fn string_arg<'a>(method: &str, arg: &'a Value) -> Result<&'a str, Error> {
    arg.as_str().ok_or_else(|| {
        invalid_argument(format!(
            "{method}() argument must be a string, got {}",
            arg.type_name()
        ))
    })
}

#[expect(clippy::cast_possible_wrap, reason = "lengths fit in i64")]
fn length(len: usize) -> Value {
    Value::Integer(len as i64)
}

/// A method taking no arguments.
fn nullary<F>(name: &'static str, f: F) -> RtResult
where
    F: Fn() -> RtResult + 'static,
{
    Ok(Value::function(name, move |args, _| {
        expect_args(name, args, 0)?;
        f()
    }))
}

/// A method taking one string argument.
fn with_str_arg<F>(name: &'static str, f: F) -> RtResult
where
    F: Fn(&str) -> RtResult + 'static,
{
    Ok(Value::function(name, move |args, _| {
        expect_args(name, args, 1)?;
        f(string_arg(name, &args[0])?)
    }))
}

pub(crate) fn string_method(s: &Rc<str>, name: &str) -> RtResult {
    let s = Rc::clone(s);
    match name {
        "size" => nullary("size", move || Ok(length(s.chars().count()))),
        "upper" => nullary("upper", move || Ok(Value::string(s.to_uppercase()))),
        "lower" => nullary("lower", move || Ok(Value::string(s.to_lowercase()))),
        "trim_space" => nullary("trim_space", move || Ok(Value::string(s.trim()))),
        "has_prefix" => with_str_arg("has_prefix", move |p| Ok(Value::Bool(s.starts_with(p)))),
        "has_suffix" => with_str_arg("has_suffix", move |p| Ok(Value::Bool(s.ends_with(p)))),
        "contains" => with_str_arg("contains", move |p| Ok(Value::Bool(s.contains(p)))),
        "trim" => with_str_arg("trim", move |cutset| {
            Ok(Value::string(s.trim_matches(|c: char| cutset.contains(c))))
        }),
        _ => Err(undefined_attribute(&Value::String(s), name)),
    }
}

pub(crate) fn list_method(items: &Rc<RefCell<Vec<Value>>>, name: &str) -> RtResult {
    let items = Rc::clone(items);
    match name {
        "size" => nullary("size", move || Ok(length(items.borrow().len()))),
        "first" => nullary("first", move || {
            items
                .borrow()
                .first()
                .cloned()
                .ok_or_else(|| invalid_argument("first() called on empty list"))
        }),
        "last" => nullary("last", move || {
            items
                .borrow()
                .last()
                .cloned()
                .ok_or_else(|| invalid_argument("last() called on empty list"))
        }),
        "pop" => nullary("pop", move || {
            items
                .borrow_mut()
                .pop()
                .ok_or_else(|| invalid_argument("pop() called on empty list"))
        }),
        "push" => Ok(Value::function("push", move |args, _| {
            expect_args("push", args, 1)?;
            items.borrow_mut().push(args[0].clone());
            Ok(Value::List(Rc::clone(&items)))
        })),
        "join" => with_str_arg("join", move |sep| {
            let parts: Vec<String> = items.borrow().iter().map(Value::display).collect();
            Ok(Value::string(parts.join(sep)))
        }),
        _ => Err(undefined_attribute(&Value::List(items), name)),
    }
}

pub(crate) fn dict_method(dict: &Rc<RefCell<Dict>>, name: &str) -> RtResult {
    let dict = Rc::clone(dict);
    match name {
        "size" => nullary("size", move || Ok(length(dict.borrow().len()))),
        "keys" => nullary("keys", move || {
            Ok(Value::list(dict.borrow().keys().cloned().collect()))
        }),
        "values" => nullary("values", move || {
            Ok(Value::list(dict.borrow().values().cloned().collect()))
        }),
        "has" => Ok(Value::function("has", move |args, _| {
            expect_args("has", args, 1)?;
            Ok(Value::Bool(dict.borrow().contains_key(&args[0])))
        })),
        "get" => Ok(Value::function("get", move |args, _| {
            expect_args("get", args, 1)?;
            Ok(dict.borrow().get(&args[0]).cloned().unwrap_or(Value::Unit))
        })),
        "set" => Ok(Value::function("set", move |args, _| {
            expect_args("set", args, 2)?;
            let key_str = args[0].to_string();
            dict.borrow_mut()
                .insert_keyed(key_str, args[0].clone(), args[1].clone());
            Ok(Value::Dict(Rc::clone(&dict)))
        })),
        _ => Err(undefined_attribute(&Value::Dict(dict), name)),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
