//! Operator semantics on runtime values.

use std::cmp::Ordering;

use sklang_syntax::ast::{BinaryOp, UnaryOp};
use sklang_syntax::error::{Error, Result};
use sklang_syntax::token::Span;

use crate::value::Value;

fn overflow(op: BinaryOp, span: Span) -> Error {
    Error::runtime(format!("Integer overflow in '{}'", op), span)
}

fn division_by_zero(op: BinaryOp, span: Span) -> Error {
    let what = if op == BinaryOp::Rem { "Modulo" } else { "Division" };
    Error::runtime(format!("{} by zero", what), span)
}

macro_rules! checked_int {
    ($op:expr, $a:expr, $b:expr, $zero:expr, $span:expr) => {{
        if matches!($op, BinaryOp::Div | BinaryOp::Rem) && $b == $zero {
            return Err(division_by_zero($op, $span));
        }
        let result = match $op {
            BinaryOp::Add => $a.checked_add($b),
            BinaryOp::Sub => $a.checked_sub($b),
            BinaryOp::Mul => $a.checked_mul($b),
            BinaryOp::Div => $a.checked_div($b),
            _ => $a.checked_rem($b),
        };
        result.ok_or_else(|| overflow($op, $span))
    }};
}

/// Applies an arithmetic operator. Both operands have the same type.
pub(crate) fn arithmetic(op: BinaryOp, lhs: Value, rhs: Value, span: Span) -> Result<Value> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => checked_int!(op, a, b, 0, span).map(Value::Int),
        (Value::UInt(a), Value::UInt(b)) => checked_int!(op, a, b, 0, span).map(Value::UInt),
        (Value::Float(a), Value::Float(b)) => {
            if matches!(op, BinaryOp::Div | BinaryOp::Rem) && b == 0.0 {
                return Err(division_by_zero(op, span));
            }
            Ok(Value::Float(match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                _ => a % b,
            }))
        }
        (Value::Str(a), Value::Str(b)) if op == BinaryOp::Add => Ok(Value::Str(a + &b)),
        (a, b) => Err(Error::runtime(
            format!(
                "Operator '{}' cannot be applied to {} and {}",
                op,
                a.type_name(),
                b.type_name()
            ),
            span,
        )),
    }
}

fn ordering(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
        (Value::UInt(a), Value::UInt(b)) => a.partial_cmp(b),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Char(a), Value::Char(b)) => a.partial_cmp(b),
        (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
        _ => None,
    }
}

/// Applies an equality or relational operator.
pub(crate) fn compare(op: BinaryOp, lhs: &Value, rhs: &Value, span: Span) -> Result<Value> {
    let result = match op {
        BinaryOp::Eq => lhs == rhs,
        BinaryOp::Ne => lhs != rhs,
        _ => {
            let ord = ordering(lhs, rhs).ok_or_else(|| {
                Error::runtime(
                    format!("Cannot compare {} and {} with '{}'", lhs.type_name(), rhs.type_name(), op),
                    span,
                )
            })?;
            match op {
                BinaryOp::Lt => ord == Ordering::Less,
                BinaryOp::Le => ord != Ordering::Greater,
                BinaryOp::Gt => ord == Ordering::Greater,
                _ => ord != Ordering::Less,
            }
        }
    };
    Ok(Value::Bool(result))
}

pub(crate) fn unary(op: UnaryOp, value: Value, span: Span) -> Result<Value> {
    match (op, value) {
        (UnaryOp::Neg, Value::Int(n)) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| Error::runtime("Integer overflow in '-'", span)),
        (UnaryOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (op, v) => Err(Error::runtime(
            format!("Operator '{}' cannot be applied to {}", op.symbol(), v.type_name()),
            span,
        )),
    }
}
