//! Lexically chained environments for the tree-walking evaluator.

use std::{cell::RefCell, rc::Rc};

use ahash::AHashMap;

use crate::value::Value;

/// A name→value scope with an optional parent.
///
/// Function values capture the environment of their definition site; calls
/// extend it with a fresh child frame for parameters. Scopes are shared
/// (`Rc<RefCell<…>>`) because sibling closures observe later bindings in
/// the scope they captured.
#[derive(Debug, Default)]
pub struct Environment {
    store: AHashMap<String, Value>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    /// A fresh top-level environment.
    #[must_use]
    pub fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::default()))
    }

    /// A child environment whose lookups fall back to `outer`.
    #[must_use]
    pub fn new_enclosed(outer: Rc<RefCell<Self>>) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            store: AHashMap::new(),
            outer: Some(outer),
        }))
    }

    /// Looks `name` up in this scope, then the parent chain.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.store.get(name) {
            return Some(value.clone());
        }
        self.outer.as_ref()?.borrow().get(name)
    }

    /// Binds `name` in this scope, shadowing any outer binding.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.store.insert(name.into(), value);
    }
}
