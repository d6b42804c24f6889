//! AST (abstract syntax tree) types for the SkLang language.
//!
//! Nodes are created once by the parser and never mutated afterwards. Every
//! node carries the [`Span`] it was parsed from and every expression carries a
//! unique [`ExprId`] that later stages use as a key for side tables (resolved
//! types, call resolutions).
//!
//! Equality on nodes is structural: ids and spans are ignored, so two parses
//! of equivalent text compare equal.

use std::fmt;
use std::rc::Rc;

use crate::token::Span;

/// Compares only the listed fields, leaving ids and spans out.
macro_rules! structural_eq {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                true $(&& self.$field == other.$field)*
            }
        }
    };
}

/// Identity of an expression node within one parsed program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(pub u32);

/// A type as written in source (`int`, `[Point]`, `fn(int) -> bool`).
#[derive(Debug, Clone)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

structural_eq!(TypeExpr { kind });

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExprKind {
    /// A primitive or user-declared type name.
    Named(String),
    /// `[T]`
    Array(Box<TypeExpr>),
    /// `fn(T, U) -> R`; a missing return type means unit.
    Function {
        params: Vec<TypeExpr>,
        ret: Option<Box<TypeExpr>>,
    },
}

/// Literal values as they appear in source.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(String),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem
        )
    }

    pub fn is_relational(self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge)
    }

    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::Ne)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

/// `=` or one of the compound assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl AssignOp {
    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
        }
    }

    /// The arithmetic operator a compound assignment applies, if any.
    pub fn binary_op(self) -> Option<BinaryOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Sub => Some(BinaryOp::Sub),
            AssignOp::Mul => Some(BinaryOp::Mul),
            AssignOp::Div => Some(BinaryOp::Div),
            AssignOp::Rem => Some(BinaryOp::Rem),
        }
    }
}

/// An expression node.
#[derive(Debug, Clone)]
pub struct Expr {
    pub id: ExprId,
    pub kind: ExprKind,
    pub span: Span,
}

structural_eq!(Expr { kind });

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    /// A name reference; `self` inside methods is `Ident("self")`.
    Ident(String),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `object.name`: struct field, method callee, or `Enum.Variant`.
    Field {
        object: Box<Expr>,
        name: String,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Array(Vec<Expr>),
    StructLit {
        name: String,
        fields: Vec<FieldInit>,
    },
    Closure(Rc<Function>),
}

/// `name: value` inside a struct literal.
#[derive(Debug, Clone)]
pub struct FieldInit {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

structural_eq!(FieldInit { name, value });

/// A statement node.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

structural_eq!(Stmt { kind });

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Var {
        name: String,
        ty: Option<TypeExpr>,
        init: Expr,
    },
    Expr(Expr),
    /// `if` / `else if` chain; `branches` is never empty.
    If {
        branches: Vec<(Expr, Vec<Stmt>)>,
        else_body: Option<Vec<Stmt>>,
    },
    Switch {
        subject: Expr,
        arms: Vec<SwitchArm>,
    },
    For {
        init: Box<Stmt>,
        cond: Expr,
        step: Expr,
        body: Vec<Stmt>,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    Return(Option<Expr>),
    Break,
    Continue,
}

/// One `pattern -> { ... }` entry of a switch.
#[derive(Debug, Clone)]
pub struct SwitchArm {
    pub pattern: Pattern,
    pub body: Vec<Stmt>,
    pub span: Span,
}

structural_eq!(SwitchArm { pattern, body });

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Matches by equality with the subject.
    Literal(Literal),
    /// Binds the subject to a fresh name; always matches.
    Binding(String),
    /// `Enum.Variant`
    Variant { enum_name: String, variant: String },
    /// Final catch-all.
    Default,
}

impl Pattern {
    /// Whether this arm matches every subject value.
    pub fn is_catch_all(&self) -> bool {
        matches!(self, Pattern::Binding(_) | Pattern::Default)
    }
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: TypeExpr,
    pub span: Span,
}

structural_eq!(Param { name, ty });

/// A function body with its signature; shared by top-level functions,
/// methods and closure literals.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    /// `None` means the function returns unit.
    pub ret: Option<TypeExpr>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

structural_eq!(Function { name, params, ret, body });

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub span: Span,
}

structural_eq!(FieldDecl { name, ty });

/// How a method is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// First parameter is `self`; called as `value.method(...)`.
    Instance,
    /// No `self`; called as `Type.method(...)`.
    Static,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub receiver: Receiver,
    pub function: Rc<Function>,
}

#[derive(Debug, Clone)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<Method>,
    pub span: Span,
}

structural_eq!(StructDecl { name, fields, methods });

impl StructDecl {
    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.function.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub name: String,
    pub variants: Vec<String>,
    pub span: Span,
}

structural_eq!(EnumDecl { name, variants });

/// Top-level program items.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Function(Rc<Function>),
    Struct(Rc<StructDecl>),
    Enum(Rc<EnumDecl>),
    Stmt(Stmt),
}

/// Entire program consisting of items.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub items: Vec<Item>,
}
