//! Statement parsing.

use sklang_syntax::ast::*;
use sklang_syntax::error::{Error, Result};
use sklang_syntax::token::TokenKind;

use super::Parser;

impl Parser {
    pub fn parse_statement(&mut self) -> Result<Stmt> {
        match self.peek_kind() {
            TokenKind::Var => self.parse_var_decl(),
            TokenKind::If => self.parse_if(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => {
                let start = self.advance().span;
                let value = if self.at(&TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(TokenKind::Semicolon, "';' after return")?;
                Ok(Stmt {
                    kind: StmtKind::Return(value),
                    span: start.to(self.prev_span()),
                })
            }
            TokenKind::Break | TokenKind::Continue => {
                let tok = self.advance();
                let kind = if tok.kind == TokenKind::Break {
                    StmtKind::Break
                } else {
                    StmtKind::Continue
                };
                self.expect(TokenKind::Semicolon, &format!("';' after '{}'", tok.kind))?;
                Ok(Stmt {
                    kind,
                    span: tok.span.to(self.prev_span()),
                })
            }
            TokenKind::Fn if matches!(self.peek_kind_at(1), TokenKind::Ident(_)) => Err(Error::syntax(
                "Function declarations are only allowed at the top level",
                self.peek().span,
            )),
            TokenKind::Match => Err(Error::syntax(
                "'match' is a reserved word; use 'switch' to branch on a value",
                self.peek().span,
            )),
            TokenKind::Struct | TokenKind::Enum => Err(Error::syntax(
                format!("'{}' declarations are only allowed at the top level", self.peek_kind()),
                self.peek().span,
            )),
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_expr_stmt(&mut self) -> Result<Stmt> {
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "';' after expression")?;
        Ok(Stmt {
            span: expr.span.to(self.prev_span()),
            kind: StmtKind::Expr(expr),
        })
    }

    pub(crate) fn parse_block(&mut self) -> Result<Vec<Stmt>> {
        self.expect(TokenKind::LBrace, "'{' to start a block")?;
        self.nested("Block", |p| {
            let mut stmts = Vec::new();
            while !p.at(&TokenKind::RBrace) {
                if p.at(&TokenKind::Eof) {
                    return p.expected("'}' to close the block");
                }
                stmts.push(p.parse_statement()?);
            }
            p.advance();
            Ok(stmts)
        })
    }

    fn parse_var_decl(&mut self) -> Result<Stmt> {
        let start = self.expect(TokenKind::Var, "'var'")?.span;
        let (name, _) = self.expect_ident("variable name after 'var'")?;
        let ty = if self.eat(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.expect(TokenKind::Equal, "'=' in variable declaration")?;
        let init = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "';' after variable declaration")?;
        Ok(Stmt {
            kind: StmtKind::Var { name, ty, init },
            span: start.to(self.prev_span()),
        })
    }

    fn parse_paren_expr(&mut self, keyword: &str) -> Result<Expr> {
        self.expect(TokenKind::LParen, &format!("'(' after '{}'", keyword))?;
        let expr = self.parse_expr()?;
        self.expect(TokenKind::RParen, &format!("')' after {} condition", keyword))?;
        Ok(expr)
    }

    fn parse_if(&mut self) -> Result<Stmt> {
        let start = self.expect(TokenKind::If, "'if'")?.span;
        let cond = self.parse_paren_expr("if")?;
        let body = self.parse_block()?;
        let mut branches = vec![(cond, body)];
        let mut else_body = None;
        while self.eat(&TokenKind::Else) {
            if self.eat(&TokenKind::If) {
                let cond = self.parse_paren_expr("if")?;
                let body = self.parse_block()?;
                branches.push((cond, body));
            } else {
                else_body = Some(self.parse_block()?);
                break;
            }
        }
        Ok(Stmt {
            kind: StmtKind::If { branches, else_body },
            span: start.to(self.prev_span()),
        })
    }

    fn parse_switch(&mut self) -> Result<Stmt> {
        let start = self.expect(TokenKind::Switch, "'switch'")?.span;
        let subject = self.parse_paren_expr("switch")?;
        self.expect(TokenKind::LBrace, "'{' after switch subject")?;
        let mut arms: Vec<SwitchArm> = Vec::new();
        loop {
            if arms.last().map_or(false, |arm| arm.pattern == Pattern::Default) {
                if self.at(&TokenKind::RBrace) {
                    break;
                }
                return Err(Error::syntax("The 'default' arm must be the last arm of a switch", self.peek().span));
            }
            let arm_start = self.peek().span;
            let pattern = self.parse_pattern()?;
            self.expect(TokenKind::Arrow, "'->' after switch pattern")?;
            let body = self.parse_block()?;
            arms.push(SwitchArm {
                pattern,
                body,
                span: arm_start.to(self.prev_span()),
            });
            self.eat(&TokenKind::Comma);
            if self.at(&TokenKind::RBrace) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "'}' after switch arms")?;
        Ok(Stmt {
            kind: StmtKind::Switch { subject, arms },
            span: start.to(self.prev_span()),
        })
    }

    fn parse_pattern(&mut self) -> Result<Pattern> {
        let pattern = match self.peek_kind().clone() {
            TokenKind::Default => Pattern::Default,
            TokenKind::Int(n) => Pattern::Literal(Literal::Int(n)),
            TokenKind::UInt(n) => Pattern::Literal(Literal::UInt(n)),
            TokenKind::Float(x) => Pattern::Literal(Literal::Float(x)),
            TokenKind::Char(c) => Pattern::Literal(Literal::Char(c)),
            TokenKind::Str(s) => Pattern::Literal(Literal::Str(s)),
            TokenKind::True => Pattern::Literal(Literal::Bool(true)),
            TokenKind::False => Pattern::Literal(Literal::Bool(false)),
            TokenKind::Minus => {
                self.advance();
                let lit = match self.peek_kind() {
                    TokenKind::Int(n) => Literal::Int(-n),
                    TokenKind::Float(x) => Literal::Float(-x),
                    _ => return self.expected("a number after '-' in switch pattern"),
                };
                Pattern::Literal(lit)
            }
            TokenKind::Ident(name) => {
                if matches!(self.peek_kind_at(1), TokenKind::Dot) {
                    self.advance();
                    self.advance();
                    let (variant, _) = self.expect_ident("variant name after '.'")?;
                    return Ok(Pattern::Variant {
                        enum_name: name,
                        variant,
                    });
                }
                Pattern::Binding(name)
            }
            _ => return self.expected("a switch pattern (literal, identifier or 'default')"),
        };
        self.advance();
        Ok(pattern)
    }

    fn parse_for(&mut self) -> Result<Stmt> {
        let start = self.expect(TokenKind::For, "'for'")?.span;
        self.expect(TokenKind::LParen, "'(' after 'for'")?;
        let init = if self.at(&TokenKind::Var) {
            self.parse_var_decl()?
        } else {
            self.parse_expr_stmt()?
        };
        let cond = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "';' after for condition")?;
        let step = self.parse_expr()?;
        self.expect(TokenKind::RParen, "')' after for step")?;
        let body = self.parse_block()?;
        Ok(Stmt {
            kind: StmtKind::For {
                init: Box::new(init),
                cond,
                step,
                body,
            },
            span: start.to(self.prev_span()),
        })
    }

    fn parse_while(&mut self) -> Result<Stmt> {
        let start = self.expect(TokenKind::While, "'while'")?.span;
        let cond = self.parse_paren_expr("while")?;
        let body = self.parse_block()?;
        Ok(Stmt {
            kind: StmtKind::While { cond, body },
            span: start.to(self.prev_span()),
        })
    }
}
