//! Runtime module cache.
//!
//! Generated programs load every path-imported module through one
//! `Registry`. A module's executor runs at most once per registry; its
//! namespace is cached under the import key. A failed execution caches
//! nothing, so the next `load` runs the executor again.
//!
//! The registry is single-threaded (`Rc<RefCell<_>>`). Its map is never
//! borrowed while an executor runs, so an executor may itself load other
//! modules through a clone of the same handle.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::errors::RtResult;
use crate::value::Value;

/// Path-keyed memoizing module cache. Cloning yields another handle to the
/// same cache.
#[derive(Clone, Default)]
pub struct Registry {
    modules: Rc<RefCell<FxHashMap<String, Value>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached module for `path`, or run `executor` and cache
    /// its result on success.
    pub fn load<F>(&self, path: &str, executor: F) -> RtResult
    where
        F: FnOnce() -> RtResult,
    {
        if let Some(module) = self.get(path) {
            trace!(path, "module cache hit");
            return Ok(module);
        }

        debug!(path, "executing module");
        match executor() {
            Ok(module) => {
                self.modules
                    .borrow_mut()
                    .insert(path.to_string(), module.clone());
                Ok(module)
            }
            Err(err) => {
                debug!(path, error = %err, "module execution failed");
                Err(err)
            }
        }
    }

    /// Peek at the cache without executing anything.
    pub fn get(&self, path: &str) -> Option<Value> {
        self.modules.borrow().get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.modules.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.borrow().is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let modules = self.modules.borrow();
        let mut keys: Vec<&String> = modules.keys().collect();
        keys.sort_unstable();
        f.debug_struct("Registry").field("modules", &keys).finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
