//! Composite value payloads: dict storage, functions, namespaces.

use std::fmt;

use rustc_hash::FxHashMap;

use super::Value;
use crate::errors::{undefined_member, RtResult};

/// Keyword arguments passed alongside positional ones.
pub type KwArgs = FxHashMap<String, Value>;

/// A namespace's member table.
pub type Members = FxHashMap<String, Value>;

/// Shared signature of native and generated callables.
pub type NativeFn = dyn Fn(&[Value], &KwArgs) -> RtResult;

/// Ordered dict storage.
///
/// Entries keep insertion order. Lookup goes through an index keyed by the
/// key's display string, so `1` and `"1"` name the same entry.
#[derive(Clone, Default)]
pub struct Dict {
    entries: Vec<(Value, Value)>,
    index: FxHashMap<String, usize>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update. An existing key keeps its position.
    pub fn insert(&mut self, key: Value, value: Value) {
        self.insert_keyed(key.to_string(), key, value);
    }

    /// [`Dict::insert`] with the key's display string already rendered.
    ///
    /// Rendering a key can borrow this dict (a dict used as its own key),
    /// so callers holding a `borrow_mut` render it first.
    pub fn insert_keyed(&mut self, key_str: String, key: Value, value: Value) {
        if let Some(&idx) = self.index.get(&key_str) {
            self.entries[idx].1 = value;
        } else {
            self.index.insert(key_str, self.entries.len());
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.index
            .get(&key.to_string())
            .map(|&idx| &self.entries[idx].1)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.index.contains_key(&key.to_string())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl PartialEq for Dict {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for Dict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// A callable value: a native function, a bound method, or a closure
/// produced by generated code.
pub struct Function {
    name: String,
    callable: Box<NativeFn>,
}

impl Function {
    pub fn new<F>(name: impl Into<String>, callable: F) -> Self
    where
        F: Fn(&[Value], &KwArgs) -> RtResult + 'static,
    {
        Self {
            name: name.into(),
            callable: Box::new(callable),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value], kwargs: &KwArgs) -> RtResult {
        (self.callable)(args, kwargs)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function {}>", self.name)
    }
}

/// A module's exported members.
#[derive(Debug)]
pub struct Namespace {
    name: String,
    members: Members,
}

impl Namespace {
    pub fn new(name: impl Into<String>, members: Members) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a member by exact name.
    pub fn get(&self, member: &str) -> RtResult {
        self.members
            .get(member)
            .cloned()
            .ok_or_else(|| undefined_member(&self.name, member))
    }
}
