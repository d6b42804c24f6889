//! Semantic types shared by the type checker and the interpreter.

use std::fmt;

/// A resolved SkLang type.
///
/// Struct and enum types are identified by their declared name; everything
/// else compares structurally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    UInt,
    Float,
    Char,
    Bool,
    String,
    Unit,
    Array(Box<Type>),
    Struct(String),
    Enum(String),
    Function(Vec<Type>, Box<Type>),
    /// Placeholder for an expression whose error was already reported.
    Error,
}

impl Type {
    /// Resolves a primitive type name as written in source.
    pub fn primitive(name: &str) -> Option<Type> {
        match name {
            "int" => Some(Type::Int),
            "uint" => Some(Type::UInt),
            "float" => Some(Type::Float),
            "char" => Some(Type::Char),
            "bool" => Some(Type::Bool),
            "string" => Some(Type::String),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::UInt | Type::Float)
    }

    /// Types accepted by `<`, `<=`, `>`, `>=`.
    pub fn is_ordered(&self) -> bool {
        matches!(self, Type::Int | Type::UInt | Type::Float | Type::Char)
    }

    /// Types accepted by `==` and `!=`.
    pub fn is_equatable(&self) -> bool {
        matches!(
            self,
            Type::Int | Type::UInt | Type::Float | Type::Char | Type::Bool | Type::String | Type::Enum(_)
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    /// Exact match, except that an already-reported error matches anything.
    pub fn accepts(&self, other: &Type) -> bool {
        if self.is_error() || other.is_error() {
            return true;
        }
        match (self, other) {
            (Type::Array(a), Type::Array(b)) => a.accepts(b),
            (Type::Function(pa, ra), Type::Function(pb, rb)) => {
                pa.len() == pb.len() && pa.iter().zip(pb).all(|(x, y)| x.accepts(y)) && ra.accepts(rb)
            }
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::UInt => write!(f, "uint"),
            Type::Float => write!(f, "float"),
            Type::Char => write!(f, "char"),
            Type::Bool => write!(f, "bool"),
            Type::String => write!(f, "string"),
            Type::Unit => write!(f, "unit"),
            Type::Array(elem) => write!(f, "[{}]", elem),
            Type::Struct(name) | Type::Enum(name) => write!(f, "{}", name),
            Type::Function(params, ret) => {
                write!(f, "fn(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p)?;
                }
                write!(f, ")")?;
                if **ret != Type::Unit {
                    write!(f, " -> {}", ret)?;
                }
                Ok(())
            }
            Type::Error => write!(f, "<error>"),
        }
    }
}
