//! Expression parsing, one method per precedence level.

use std::rc::Rc;

use sklang_syntax::ast::*;
use sklang_syntax::error::{Error, Result};
use sklang_syntax::token::TokenKind;

use super::Parser;

type Level = fn(&mut Parser) -> Result<Expr>;

impl Parser {
    pub fn parse_expr(&mut self) -> Result<Expr> {
        self.nested("Expression", Parser::parse_assignment)
    }

    /// Right-associative: `a = b = c` parses as `a = (b = c)`.
    fn parse_assignment(&mut self) -> Result<Expr> {
        let target = self.parse_or()?;
        let op = match self.peek_kind() {
            TokenKind::Equal => AssignOp::Assign,
            TokenKind::PlusEq => AssignOp::Add,
            TokenKind::MinusEq => AssignOp::Sub,
            TokenKind::StarEq => AssignOp::Mul,
            TokenKind::SlashEq => AssignOp::Div,
            TokenKind::PercentEq => AssignOp::Rem,
            _ => return Ok(target),
        };
        let op_span = self.advance().span;
        if !matches!(
            target.kind,
            ExprKind::Ident(_) | ExprKind::Field { .. } | ExprKind::Index { .. }
        ) {
            return Err(Error::syntax(
                format!("Invalid assignment target before '{}'", op.symbol()),
                op_span,
            ));
        }
        let value = self.parse_expr()?;
        let span = target.span.to(value.span);
        Ok(self.mk_expr(
            ExprKind::Assign {
                op,
                target: Box::new(target),
                value: Box::new(value),
            },
            span,
        ))
    }

    /// Parses one left-associative binary level.
    fn binary_level(&mut self, ops: &[(TokenKind, BinaryOp)], next: Level) -> Result<Expr> {
        let mut lhs = next(self)?;
        loop {
            let op = match ops.iter().find(|(kind, _)| self.at(kind)) {
                Some(&(_, op)) => op,
                None => return Ok(lhs),
            };
            self.advance();
            let rhs = next(self)?;
            let span = lhs.span.to(rhs.span);
            lhs = self.mk_expr(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
    }

    fn parse_or(&mut self) -> Result<Expr> {
        self.binary_level(&[(TokenKind::OrOr, BinaryOp::Or)], Parser::parse_and)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        self.binary_level(&[(TokenKind::AndAnd, BinaryOp::And)], Parser::parse_equality)
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        self.binary_level(
            &[(TokenKind::EqEq, BinaryOp::Eq), (TokenKind::NotEq, BinaryOp::Ne)],
            Parser::parse_relational,
        )
    }

    fn parse_relational(&mut self) -> Result<Expr> {
        self.binary_level(
            &[
                (TokenKind::Less, BinaryOp::Lt),
                (TokenKind::LessEq, BinaryOp::Le),
                (TokenKind::Greater, BinaryOp::Gt),
                (TokenKind::GreaterEq, BinaryOp::Ge),
            ],
            Parser::parse_additive,
        )
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        self.binary_level(
            &[(TokenKind::Plus, BinaryOp::Add), (TokenKind::Minus, BinaryOp::Sub)],
            Parser::parse_multiplicative,
        )
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        self.binary_level(
            &[
                (TokenKind::Star, BinaryOp::Mul),
                (TokenKind::Slash, BinaryOp::Div),
                (TokenKind::Percent, BinaryOp::Rem),
            ],
            Parser::parse_unary,
        )
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.peek_kind() {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            _ => return self.parse_postfix(),
        };
        let start = self.advance().span;
        let operand = self.nested("Expression", Parser::parse_unary)?;
        let span = start.to(operand.span);
        Ok(self.mk_expr(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_kind() {
                TokenKind::LParen => {
                    self.advance();
                    let args = self.parse_comma_list(TokenKind::RParen, "')' after arguments")?;
                    let span = expr.span.to(self.prev_span());
                    expr = self.mk_expr(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket, "']' after index")?;
                    let span = expr.span.to(self.prev_span());
                    expr = self.mk_expr(
                        ExprKind::Index {
                            object: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                TokenKind::Dot => {
                    self.advance();
                    let (name, name_span) = self.expect_ident("field or method name after '.'")?;
                    let span = expr.span.to(name_span);
                    expr = self.mk_expr(
                        ExprKind::Field {
                            object: Box::new(expr),
                            name,
                        },
                        span,
                    );
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Comma-separated expressions up to `close`, trailing comma allowed.
    fn parse_comma_list(&mut self, close: TokenKind, what: &str) -> Result<Vec<Expr>> {
        let mut items = Vec::new();
        while !self.at(&close) {
            items.push(self.parse_expr()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(close, what)?;
        Ok(items)
    }

    /// `Name { }` or `Name { field: ...`
    fn at_struct_literal(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Ident(_))
            && matches!(self.peek_kind_at(1), TokenKind::LBrace)
            && (matches!(self.peek_kind_at(2), TokenKind::RBrace)
                || (matches!(self.peek_kind_at(2), TokenKind::Ident(_))
                    && matches!(self.peek_kind_at(3), TokenKind::Colon)))
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        if self.at_struct_literal() {
            return self.parse_struct_literal();
        }
        let start = self.peek().span;
        let kind = match self.peek_kind().clone() {
            TokenKind::Int(n) => ExprKind::Literal(Literal::Int(n)),
            TokenKind::UInt(n) => ExprKind::Literal(Literal::UInt(n)),
            TokenKind::Float(x) => ExprKind::Literal(Literal::Float(x)),
            TokenKind::Char(c) => ExprKind::Literal(Literal::Char(c)),
            TokenKind::Str(s) => ExprKind::Literal(Literal::Str(s)),
            TokenKind::True => ExprKind::Literal(Literal::Bool(true)),
            TokenKind::False => ExprKind::Literal(Literal::Bool(false)),
            TokenKind::Ident(name) => ExprKind::Ident(name),
            TokenKind::SelfKw => ExprKind::Ident("self".to_string()),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')' after expression")?;
                return Ok(inner);
            }
            TokenKind::LBracket => {
                self.advance();
                let elems = self.parse_comma_list(TokenKind::RBracket, "']' after array elements")?;
                let span = start.to(self.prev_span());
                return Ok(self.mk_expr(ExprKind::Array(elems), span));
            }
            TokenKind::Fn => {
                self.advance();
                let function = self.parse_function_rest("<closure>".to_string(), start)?;
                let span = function.span;
                return Ok(self.mk_expr(ExprKind::Closure(Rc::new(function)), span));
            }
            _ => return self.expected("an expression"),
        };
        self.advance();
        Ok(self.mk_expr(kind, start))
    }

    fn parse_struct_literal(&mut self) -> Result<Expr> {
        let (name, start) = self.expect_ident("struct name")?;
        self.expect(TokenKind::LBrace, "'{' after struct name")?;
        let mut fields = Vec::new();
        while !self.at(&TokenKind::RBrace) {
            let (field, field_span) = self.expect_ident("field name")?;
            self.expect(TokenKind::Colon, "':' after field name")?;
            let value = self.parse_expr()?;
            let span = field_span.to(value.span);
            fields.push(FieldInit {
                name: field,
                value,
                span,
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "'}' after struct literal fields")?;
        let span = start.to(self.prev_span());
        Ok(self.mk_expr(ExprKind::StructLit { name, fields }, span))
    }
}
