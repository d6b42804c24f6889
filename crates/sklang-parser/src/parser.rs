//! Recursive-descent parser producing a [`Program`].
//!
//! The parser stops at the first mismatch; the error names the construct it
//! expected and the token it found.

mod decl;
mod expr;
mod stmt;

use sklang_syntax::ast::*;
use sklang_syntax::error::{Error, Result};
use sklang_syntax::stack;
use sklang_syntax::token::{Span, Token, TokenKind};

/// Deepest nesting of expressions, blocks and types the parser accepts.
pub const MAX_NESTING: usize = 256;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    next_id: u32,
    depth: usize,
}

impl Parser {
    /// Creates a parser over a token stream terminated by [`TokenKind::Eof`].
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let span = tokens
                .last()
                .map(|t| Span::new(t.span.line, t.span.col + t.span.len, t.span.end(), 0))
                .unwrap_or_default();
            tokens.push(Token {
                kind: TokenKind::Eof,
                lexeme: String::new(),
                span,
            });
        }
        Self {
            tokens,
            pos: 0,
            next_id: 0,
            depth: 0,
        }
    }

    pub fn parse_program(&mut self) -> Result<Program> {
        let mut items = Vec::new();
        while !self.at(&TokenKind::Eof) {
            items.push(self.parse_item()?);
        }
        Ok(Program { items })
    }

    fn parse_item(&mut self) -> Result<Item> {
        match self.peek_kind() {
            TokenKind::Fn if matches!(self.peek_kind_at(1), TokenKind::Ident(_)) => {
                Ok(Item::Function(self.parse_fn_decl()?.into()))
            }
            TokenKind::Struct => Ok(Item::Struct(self.parse_struct_decl()?.into())),
            TokenKind::Enum => Ok(Item::Enum(self.parse_enum_decl()?.into())),
            _ => Ok(Item::Stmt(self.parse_statement()?)),
        }
    }

    // === token helpers ===

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn peek_kind_at(&self, n: usize) -> &TokenKind {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Span of the most recently consumed token.
    fn prev_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    fn expected<T>(&self, what: &str) -> Result<T> {
        let tok = self.peek();
        Err(Error::syntax(
            format!("Expected {}, found {}", what, tok.kind.describe()),
            tok.span,
        ))
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token> {
        if self.at(&kind) {
            Ok(self.advance())
        } else {
            self.expected(what)
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<(String, Span)> {
        match self.peek_kind() {
            TokenKind::Ident(name) => {
                let name = name.clone();
                let span = self.advance().span;
                Ok((name, span))
            }
            _ => self.expected(what),
        }
    }

    /// Runs `f` one nesting level deeper, failing once [`MAX_NESTING`] is hit.
    fn nested<T>(&mut self, what: &str, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING {
            return Err(Error::syntax(
                format!("{} nesting too deep (limit is {})", what, MAX_NESTING),
                self.peek().span,
            ));
        }
        self.depth += 1;
        let result = stack::grow(|| f(self));
        self.depth -= 1;
        result
    }

    fn mk_expr(&mut self, kind: ExprKind, span: Span) -> Expr {
        let id = ExprId(self.next_id);
        self.next_id += 1;
        Expr { id, kind, span }
    }

    // === types ===

    pub(crate) fn parse_type(&mut self) -> Result<TypeExpr> {
        let start = self.peek().span;
        let kind = match self.peek_kind() {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                TypeExprKind::Named(name)
            }
            TokenKind::LBracket => {
                self.advance();
                let elem = self.nested("Type", Parser::parse_type)?;
                self.expect(TokenKind::RBracket, "']' after array element type")?;
                TypeExprKind::Array(Box::new(elem))
            }
            TokenKind::Fn => {
                self.advance();
                self.expect(TokenKind::LParen, "'(' after 'fn' in function type")?;
                let mut params = Vec::new();
                while !self.at(&TokenKind::RParen) {
                    params.push(self.nested("Type", Parser::parse_type)?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RParen, "')' after parameter types")?;
                let ret = if self.eat(&TokenKind::Arrow) {
                    Some(Box::new(self.nested("Type", Parser::parse_type)?))
                } else {
                    None
                };
                TypeExprKind::Function { params, ret }
            }
            _ => return self.expected("a type"),
        };
        Ok(TypeExpr {
            kind,
            span: start.to(self.prev_span()),
        })
    }
}
