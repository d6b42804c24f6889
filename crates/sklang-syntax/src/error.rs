//! Error handling types and utilities for the SkLang toolchain.
//!
//! Every stage of the pipeline reports problems through the same [`Error`]
//! type. An error carries the stage that produced it ([`ErrorKind`]), a
//! human-readable message and, when one is known, the [`Span`] of the source
//! text at fault.
//!
//! # Propagation
//!
//! - Lexical and syntax errors abort their stage at the first occurrence.
//! - Type errors are collected by the checker and reported together.
//! - Runtime errors halt evaluation immediately.
//!
//! # Examples
//!
//! ```rust
//! use sklang_syntax::error::{Error, ErrorKind, Result, error_at};
//! use sklang_syntax::Span;
//!
//! fn check_positive(n: i64, span: Span) -> Result<i64> {
//!     if n < 0 {
//!         error_at(ErrorKind::Type, span, "expected a positive number")
//!     } else {
//!         Ok(n)
//!     }
//! }
//!
//! let err = check_positive(-1, Span::new(3, 7, 20, 2)).unwrap_err();
//! assert_eq!(err.kind, ErrorKind::Type);
//! assert_eq!(err.to_string(), "expected a positive number at 3:7");
//! ```

use std::fmt;

use crate::token::Span;

/// The pipeline stage an [`Error`] originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unrecognized character or malformed literal.
    Lexical,
    /// Token stream does not match the grammar.
    Syntax,
    /// Static type mismatch, unknown name, bad call, duplicate declaration.
    Type,
    /// Fault while evaluating a well-typed program.
    Runtime,
}

impl ErrorKind {
    /// Short label used when rendering diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Lexical => "Lex error",
            ErrorKind::Syntax => "Parse error",
            ErrorKind::Type => "Type error",
            ErrorKind::Runtime => "Runtime error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An error that occurred while processing SkLang source.
///
/// # Fields
///
/// - `kind`: which stage reported the problem
/// - `msg`: human-readable description
/// - `span`: location in the source, when known
///
/// # Examples
///
/// ```rust
/// use sklang_syntax::{Error, ErrorKind, Span};
///
/// let err = Error::with_span(ErrorKind::Syntax, "expected ';'", Span::new(15, 8, 120, 1));
/// assert_eq!(err.line(), Some(15));
/// assert_eq!(err.to_string(), "expected ';' at 15:8");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// Stage that produced the error
    pub kind: ErrorKind,

    /// Human-readable error message
    pub msg: String,

    /// Optional location of the offending source text
    pub span: Option<Span>,
}

impl Error {
    /// Creates a new error without source location information.
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
            span: None,
        }
    }

    /// Creates a new error located at `span`.
    pub fn with_span(kind: ErrorKind, msg: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            msg: msg.into(),
            span: Some(span),
        }
    }

    pub fn lexical(msg: impl Into<String>, span: Span) -> Self {
        Self::with_span(ErrorKind::Lexical, msg, span)
    }

    pub fn syntax(msg: impl Into<String>, span: Span) -> Self {
        Self::with_span(ErrorKind::Syntax, msg, span)
    }

    pub fn type_error(msg: impl Into<String>, span: Span) -> Self {
        Self::with_span(ErrorKind::Type, msg, span)
    }

    pub fn runtime(msg: impl Into<String>, span: Span) -> Self {
        Self::with_span(ErrorKind::Runtime, msg, span)
    }

    /// 1-based line of the error, if located.
    pub fn line(&self) -> Option<usize> {
        self.span.map(|s| s.line)
    }

    /// 1-based column of the error, if located.
    pub fn col(&self) -> Option<usize> {
        self.span.map(|s| s.col)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(f, "{} at {}:{}", self.msg, span.line, span.col),
            None => write!(f, "{}", self.msg),
        }
    }
}

impl std::error::Error for Error {}

/// A specialized `Result` type for SkLang operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience function to create an error result with source location.
///
/// Shorthand for `Err(Error::with_span(kind, msg, span))`.
pub fn error_at<T>(kind: ErrorKind, span: Span, msg: impl Into<String>) -> Result<T> {
    Err(Error::with_span(kind, msg, span))
}
