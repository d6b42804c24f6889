//! Lexical scopes seen by the checker.

use std::collections::HashMap;

use sklang_syntax::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BindingKind {
    Variable,
    Function,
}

#[derive(Debug, Clone)]
pub(crate) struct Binding {
    pub ty: Type,
    pub kind: BindingKind,
}

/// Stack of scopes; index 0 is the global scope.
#[derive(Debug)]
pub(crate) struct Scopes {
    stack: Vec<HashMap<String, Binding>>,
}

impl Scopes {
    pub fn new() -> Self {
        Self {
            stack: vec![HashMap::new()],
        }
    }

    pub fn push(&mut self) {
        self.stack.push(HashMap::new());
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    /// Declares `name` in the innermost scope; `false` if it already exists there.
    pub fn define(&mut self, name: &str, ty: Type, kind: BindingKind) -> bool {
        let Some(scope) = self.stack.last_mut() else {
            return false;
        };
        if scope.contains_key(name) {
            return false;
        }
        scope.insert(name.to_string(), Binding { ty, kind });
        true
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.stack.iter().rev().find_map(|scope| scope.get(name))
    }
}
