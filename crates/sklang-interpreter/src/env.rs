//! Runtime scopes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

struct Scope {
    /// Variables defined in this scope
    vars: RefCell<HashMap<String, Value>>,
    /// Enclosing scope (None for the global scope)
    parent: Option<Env>,
}

/// A handle to a scope. Cloning the handle shares the scope, which is how
/// closures observe later mutations of the variables they captured.
#[derive(Clone)]
pub struct Env(Rc<Scope>);

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<String> = self.0.vars.borrow().keys().cloned().collect();
        names.sort();
        f.debug_struct("Env")
            .field("vars", &names)
            .field("has_parent", &self.0.parent.is_some())
            .finish()
    }
}

impl Env {
    pub fn new_root() -> Self {
        Env(Rc::new(Scope {
            vars: RefCell::new(HashMap::new()),
            parent: None,
        }))
    }

    pub fn child(&self) -> Env {
        Env(Rc::new(Scope {
            vars: RefCell::new(HashMap::new()),
            parent: Some(self.clone()),
        }))
    }

    /// Bindings of this scope only, sorted by name.
    pub fn vars_snapshot(&self) -> Vec<(String, Value)> {
        let mut vars: Vec<(String, Value)> = self
            .0
            .vars
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        vars.sort_by(|a, b| a.0.cmp(&b.0));
        vars
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(v) = self.0.vars.borrow().get(name) {
            return Some(v.clone());
        }
        self.0.parent.as_ref().and_then(|p| p.get(name))
    }

    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.0.vars.borrow_mut().insert(name.into(), value);
    }

    /// Overwrites the nearest binding of `name`; `false` if there is none.
    pub fn assign(&self, name: &str, value: Value) -> bool {
        if let Some(slot) = self.0.vars.borrow_mut().get_mut(name) {
            *slot = value;
            return true;
        }
        match &self.0.parent {
            Some(parent) => parent.assign(name, value),
            None => false,
        }
    }
}
