//! SkLang: a small statically typed language.
//!
//! This crate strings the pipeline together. Source text is tokenized,
//! parsed, type checked as a whole and, only if no stage reported an error,
//! evaluated:
//!
//! ```rust
//! let outcome = sklang::run("print(1 + 2); 10 / 4;").unwrap();
//! assert_eq!(outcome.output, ["3"]);
//! assert_eq!(outcome.value, Some(sklang::Value::Int(2)));
//!
//! let failure = sklang::run("var x: int = \"no\";").unwrap_err();
//! assert_eq!(failure.diagnostics[0].kind, sklang::ErrorKind::Type);
//! ```
//!
//! The core performs no I/O: printed values are collected and returned.
//! Call depth and source nesting are bounded by the pipeline itself, so
//! [`run`] needs no special stack from its caller.

use log::debug;

pub use sklang_interpreter::{Config, Value, DEFAULT_MAX_CALL_DEPTH};
pub use sklang_syntax::{Error, ErrorKind, Span};
pub use sklang_typeck::TypedProgram;

use sklang_interpreter::Interpreter;
use sklang_lexer::Lexer;
use sklang_parser::Parser;

/// A program that ran to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Value of the last top-level expression statement, if any.
    pub value: Option<Value>,
    /// Everything the program printed, one entry per `print` call.
    pub output: Vec<String>,
}

/// A program that was rejected or halted.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    /// One runtime error, one lexical or syntax error, or every type error.
    pub diagnostics: Vec<Error>,
    /// Output printed before a runtime error; empty for compile errors.
    pub output: Vec<String>,
}

impl Failure {
    fn compile(diagnostics: Vec<Error>) -> Self {
        Self {
            diagnostics,
            output: Vec::new(),
        }
    }
}

/// Lexes, parses and type checks `source` without running it.
pub fn check(source: &str) -> Result<TypedProgram, Vec<Error>> {
    let tokens = Lexer::new(source).tokenize().map_err(|e| vec![e])?;
    debug!("lexed {} tokens", tokens.len());
    let program = Parser::new(tokens).parse_program().map_err(|e| vec![e])?;
    debug!("parsed {} top-level items", program.items.len());
    sklang_typeck::check(program)
}

/// Runs `source` with the default [`Config`].
pub fn run(source: &str) -> Result<Outcome, Failure> {
    run_with(source, &Config::default())
}

pub fn run_with(source: &str, config: &Config) -> Result<Outcome, Failure> {
    let typed = check(source).map_err(Failure::compile)?;
    let mut interpreter = Interpreter::new(&typed, config.clone());
    match interpreter.run() {
        Ok(value) => Ok(Outcome {
            value,
            output: interpreter.into_output(),
        }),
        Err(e) => {
            debug!("runtime error: {}", e);
            Err(Failure {
                diagnostics: vec![e],
                output: interpreter.into_output(),
            })
        }
    }
}
