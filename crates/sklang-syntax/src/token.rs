//! Token definitions for the SkLang language.
//!
//! Tokens are the smallest meaningful units of SkLang source code. The lexer
//! produces them with decoded literal values and precise source positions;
//! comments and whitespace never become tokens.
//!
//! # Token Categories
//!
//! - **Identifiers**: `counter`, `Point`, `_tmp`
//! - **Literals**: `42`, `42u`, `3.14`, `'c'`, `"text"`
//! - **Keywords**: `var`, `fn`, `struct`, `switch`, ...
//! - **Operators**: `+`, `+=`, `->`, `==`, `&&`, ...
//! - **Punctuation**: `(`, `{`, `;`, ...
//! - **Special**: end-of-input marker
//!
//! # Examples
//!
//! ```rust
//! use sklang_syntax::{Span, Token, TokenKind};
//!
//! let token = Token {
//!     kind: TokenKind::Int(42),
//!     lexeme: "42".to_string(),
//!     span: Span::new(1, 9, 8, 2),
//! };
//! assert_eq!(token.span.end(), 10);
//! ```

use std::fmt;

/// A region of source text.
///
/// `line` and `col` are 1-based and refer to the first character; `offset`
/// and `len` are byte positions into the source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number of the first character (1-based)
    pub line: usize,
    /// Column number of the first character (1-based)
    pub col: usize,
    /// Byte offset of the first character
    pub offset: usize,
    /// Length in bytes
    pub len: usize,
}

impl Span {
    pub fn new(line: usize, col: usize, offset: usize, len: usize) -> Self {
        Self {
            line,
            col,
            offset,
            len,
        }
    }

    /// Byte offset one past the last character.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Span covering `self` through the end of `other`.
    pub fn to(self, other: Span) -> Span {
        let end = other.end().max(self.end());
        Span {
            len: end - self.offset,
            ..self
        }
    }
}

/// Token types that can be produced by the SkLang lexer.
///
/// Literal variants carry their decoded value, so `'\n'` arrives as
/// `Char('\n')` and `"a\"b"` as `Str("a\"b")`.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // === Literals ===
    /// Identifier such as `foo` or `Point`
    Ident(String),
    /// Signed integer literal: `42`
    Int(i64),
    /// Unsigned integer literal: `42u`
    UInt(u64),
    /// Floating point literal: `3.5`
    Float(f64),
    /// Character literal: `'a'`
    Char(char),
    /// String literal: `"hello"`
    Str(String),

    // === Keywords ===
    Var,
    If,
    Else,
    Switch,
    Default,
    For,
    While,
    Fn,
    Return,
    Struct,
    Enum,
    SelfKw,
    True,
    False,
    Break,
    Continue,
    /// Reserved, not part of the grammar
    Match,

    // === Operators ===
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,
    Bang,
    Equal,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    /// `->` used for return types and switch arms
    Arrow,

    // === Punctuation ===
    Dot,
    Comma,
    Colon,
    Semicolon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    /// End-of-input marker
    Eof,
}

impl TokenKind {
    /// Maps a word to its keyword token, if it is reserved.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "var" => TokenKind::Var,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "switch" => TokenKind::Switch,
            "default" => TokenKind::Default,
            "for" => TokenKind::For,
            "while" => TokenKind::While,
            "fn" => TokenKind::Fn,
            "return" => TokenKind::Return,
            "struct" => TokenKind::Struct,
            "enum" => TokenKind::Enum,
            "self" => TokenKind::SelfKw,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "match" => TokenKind::Match,
            _ => return None,
        };
        Some(kind)
    }

    /// Human-readable description used in syntax errors.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::Int(n) => format!("integer '{}'", n),
            TokenKind::UInt(n) => format!("integer '{}u'", n),
            TokenKind::Float(x) => format!("float '{}'", x),
            TokenKind::Char(c) => format!("character {:?}", c),
            TokenKind::Str(s) => format!("string {:?}", s),
            TokenKind::Eof => "end of input".to_string(),
            other => format!("'{}'", other),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Ident(name) => return write!(f, "{}", name),
            TokenKind::Int(n) => return write!(f, "{}", n),
            TokenKind::UInt(n) => return write!(f, "{}u", n),
            TokenKind::Float(x) => return write!(f, "{:?}", x),
            TokenKind::Char(c) => return write!(f, "{:?}", c),
            TokenKind::Str(s) => return write!(f, "{:?}", s),
            TokenKind::Var => "var",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Switch => "switch",
            TokenKind::Default => "default",
            TokenKind::For => "for",
            TokenKind::While => "while",
            TokenKind::Fn => "fn",
            TokenKind::Return => "return",
            TokenKind::Struct => "struct",
            TokenKind::Enum => "enum",
            TokenKind::SelfKw => "self",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Match => "match",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::LessEq => "<=",
            TokenKind::GreaterEq => ">=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Bang => "!",
            TokenKind::Equal => "=",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::Arrow => "->",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Eof => "<eof>",
        };
        f.write_str(text)
    }
}

/// A token with its source text and location.
///
/// Tokens are immutable once produced. `lexeme` is the exact source slice,
/// which for literals differs from the decoded value in `kind`.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The type and semantic content of this token
    pub kind: TokenKind,

    /// The raw source text of the token
    pub lexeme: String,

    /// Where the token appears in the source
    pub span: Span,
}
