//! Function, struct and enum declarations.

use std::rc::Rc;

use sklang_syntax::ast::*;
use sklang_syntax::error::{Error, Result};
use sklang_syntax::token::{Span, TokenKind};

use super::Parser;

impl Parser {
    pub(crate) fn parse_fn_decl(&mut self) -> Result<Function> {
        let start = self.expect(TokenKind::Fn, "'fn'")?.span;
        let (name, _) = self.expect_ident("function name")?;
        self.parse_function_rest(name, start)
    }

    /// Parses `(params) -> T { body }` after the name (or after `fn` for closures).
    pub(crate) fn parse_function_rest(&mut self, name: String, start: Span) -> Result<Function> {
        self.expect(TokenKind::LParen, "'(' before parameters")?;
        let params = self.parse_params()?;
        self.finish_function(name, params, start)
    }

    fn finish_function(&mut self, name: String, params: Vec<Param>, start: Span) -> Result<Function> {
        self.expect(TokenKind::RParen, "')' after parameters")?;
        let ret = if self.eat(&TokenKind::Arrow) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let body = self.parse_block()?;
        Ok(Function {
            name,
            params,
            ret,
            body,
            span: start.to(self.prev_span()),
        })
    }

    fn parse_params(&mut self) -> Result<Vec<Param>> {
        let mut params = Vec::new();
        while !self.at(&TokenKind::RParen) {
            if self.at(&TokenKind::SelfKw) {
                return Err(Error::syntax(
                    "'self' is only allowed as the first parameter of a method",
                    self.peek().span,
                ));
            }
            let (name, span) = self.expect_ident("parameter name")?;
            self.expect(TokenKind::Colon, "':' after parameter name")?;
            let ty = self.parse_type()?;
            params.push(Param {
                name,
                span: span.to(ty.span),
                ty,
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(params)
    }

    fn parse_method(&mut self) -> Result<Method> {
        let start = self.expect(TokenKind::Fn, "'fn'")?.span;
        let (name, _) = self.expect_ident("method name")?;
        self.expect(TokenKind::LParen, "'(' before parameters")?;
        let receiver = if self.eat(&TokenKind::SelfKw) {
            if !self.at(&TokenKind::RParen) {
                self.expect(TokenKind::Comma, "',' or ')' after 'self'")?;
            }
            Receiver::Instance
        } else {
            Receiver::Static
        };
        let params = self.parse_params()?;
        let function = self.finish_function(name, params, start)?;
        Ok(Method {
            receiver,
            function: Rc::new(function),
        })
    }

    /// Fields must all come before the first method.
    pub(crate) fn parse_struct_decl(&mut self) -> Result<StructDecl> {
        let start = self.expect(TokenKind::Struct, "'struct'")?.span;
        let (name, _) = self.expect_ident("struct name")?;
        self.expect(TokenKind::LBrace, "'{' after struct name")?;
        let mut fields = Vec::new();
        let mut methods = Vec::new();
        loop {
            match self.peek_kind() {
                TokenKind::RBrace => break,
                TokenKind::Fn => methods.push(self.parse_method()?),
                TokenKind::Ident(_) => {
                    if !methods.is_empty() {
                        return Err(Error::syntax(
                            format!("Field declarations in struct '{}' must come before its methods", name),
                            self.peek().span,
                        ));
                    }
                    let (field, span) = self.expect_ident("field name")?;
                    self.expect(TokenKind::Colon, "':' after field name")?;
                    let ty = self.parse_type()?;
                    fields.push(FieldDecl {
                        name: field,
                        span: span.to(ty.span),
                        ty,
                    });
                    if !self.eat(&TokenKind::Comma) {
                        self.eat(&TokenKind::Semicolon);
                    }
                }
                _ => return self.expected("field, method or '}' in struct body"),
            }
        }
        self.expect(TokenKind::RBrace, "'}' after struct body")?;
        Ok(StructDecl {
            name,
            fields,
            methods,
            span: start.to(self.prev_span()),
        })
    }

    pub(crate) fn parse_enum_decl(&mut self) -> Result<EnumDecl> {
        let start = self.expect(TokenKind::Enum, "'enum'")?.span;
        let (name, _) = self.expect_ident("enum name")?;
        self.expect(TokenKind::LBrace, "'{' after enum name")?;
        let mut variants = vec![self.expect_ident("variant name")?.0];
        while self.eat(&TokenKind::Comma) {
            if self.at(&TokenKind::RBrace) {
                break;
            }
            variants.push(self.expect_ident("variant name")?.0);
        }
        self.expect(TokenKind::RBrace, "'}' after enum variants")?;
        Ok(EnumDecl {
            name,
            variants,
            span: start.to(self.prev_span()),
        })
    }
}
