//! Control-flow signals produced by statement execution.

use crate::value::Value;

#[derive(Debug)]
pub(crate) enum Flow {
    /// Fall through to the next statement
    Normal,
    /// Leave the innermost loop
    Break,
    /// Skip to the next iteration of the innermost loop
    Continue,
    /// Return from the current function with the given value
    Return(Value),
}
