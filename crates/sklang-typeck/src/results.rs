//! The typed program handed from the checker to the interpreter.

use std::collections::HashMap;

use sklang_syntax::ast::{ExprId, Program};
use sklang_syntax::types::Type;

/// Built-in functions callable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `print(value)`: appends the rendered value to the program output.
    Print,
    /// `len(array | string) -> int`
    Len,
    /// `push(array, value)`: appends to an array in place.
    Push,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Builtin> {
        match name {
            "print" => Some(Builtin::Print),
            "len" => Some(Builtin::Len),
            "push" => Some(Builtin::Push),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::Len => "len",
            Builtin::Push => "push",
        }
    }
}

/// How the checker resolved a call or field access.
///
/// Plain calls of function values and plain struct field reads have no
/// entry; the interpreter evaluates them structurally.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Keyed by the call expression.
    Builtin(Builtin),
    /// `value.method(...)`, keyed by the call expression.
    InstanceMethod { strukt: String },
    /// `Type.method(...)`, keyed by the call expression.
    StaticMethod { strukt: String },
    /// `Enum.Variant`, keyed by the field expression.
    EnumVariant { enum_name: String, index: usize },
}

/// A program that passed type checking, with its annotations.
///
/// The AST is untouched; annotations live in side tables keyed by
/// [`ExprId`].
#[derive(Debug, Clone)]
pub struct TypedProgram {
    pub program: Program,
    pub types: HashMap<ExprId, Type>,
    pub resolutions: HashMap<ExprId, Resolution>,
}

impl TypedProgram {
    pub fn type_of(&self, id: ExprId) -> Option<&Type> {
        self.types.get(&id)
    }

    pub fn resolution(&self, id: ExprId) -> Option<&Resolution> {
        self.resolutions.get(&id)
    }
}
