//! Runtime values.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use sklang_syntax::ast::{Function, StructDecl};

use crate::env::Env;

/// A function value: the function node plus the scope it closes over.
pub struct Closure {
    pub function: Rc<Function>,
    pub env: Env,
}

// The captured scope may contain this closure, so it is left out.
impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure").field("function", &self.function.name).finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Bool(bool),
    Str(String),
    /// Arrays are shared: copies of an array value alias the same storage.
    Array(Rc<RefCell<Vec<Value>>>),
    /// Structs are copied on assignment; fields follow the declared order.
    Struct {
        decl: Rc<StructDecl>,
        fields: Vec<Value>,
    },
    Enum {
        enum_name: String,
        variant: String,
    },
    Function(Rc<Closure>),
    Unit,
}

impl Value {
    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    /// Name of the value's runtime kind, used in error messages.
    pub fn type_name(&self) -> String {
        match self {
            Value::Int(_) => "int".into(),
            Value::UInt(_) => "uint".into(),
            Value::Float(_) => "float".into(),
            Value::Char(_) => "char".into(),
            Value::Bool(_) => "bool".into(),
            Value::Str(_) => "string".into(),
            Value::Array(_) => "array".into(),
            Value::Struct { decl, .. } => decl.name.clone(),
            Value::Enum { enum_name, .. } => enum_name.clone(),
            Value::Function(_) => "function".into(),
            Value::Unit => "unit".into(),
        }
    }

    /// Reads a struct field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Struct { decl, fields } => decl.field_index(name).and_then(|i| fields.get(i)),
            _ => None,
        }
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Char(c) => write!(f, "{:?}", c),
            other => write!(f, "{}", other),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (
                Value::Struct { decl: da, fields: fa },
                Value::Struct { decl: db, fields: fb },
            ) => da.name == db.name && fa == fb,
            (
                Value::Enum { enum_name: ea, variant: va },
                Value::Enum { enum_name: eb, variant: vb },
            ) => ea == eb && va == vb,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Unit, Value::Unit) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::UInt(n) => write!(f, "{}", n),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Char(c) => write!(f, "{}", c),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{}", s),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, it) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    it.fmt_nested(f)?;
                }
                write!(f, "]")
            }
            Value::Struct { decl, fields } => {
                write!(f, "{} {{", decl.name)?;
                for (i, (field, value)) in decl.fields.iter().zip(fields).enumerate() {
                    write!(f, "{}{}: ", if i > 0 { ", " } else { " " }, field.name)?;
                    value.fmt_nested(f)?;
                }
                if fields.is_empty() {
                    write!(f, "}}")
                } else {
                    write!(f, " }}")
                }
            }
            Value::Enum { enum_name, variant } => write!(f, "{}.{}", enum_name, variant),
            Value::Function(c) => write!(f, "<fn {}>", c.function.name),
            Value::Unit => write!(f, "()"),
        }
    }
}
