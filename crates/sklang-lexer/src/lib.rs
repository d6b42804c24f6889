//! SkLang lexer: converts source text into tokens.
use sklang_syntax::error::{Error, Result};
use sklang_syntax::token::{Span, Token, TokenKind};

/// Streaming character scanner that produces tokens with positions.
pub struct Lexer<'src> {
    input: &'src str,
    src: Vec<(usize, char)>,
    pos: usize,
    line: usize,
    col: usize,
}

/// Position captured at the start of a token.
#[derive(Clone, Copy)]
struct Mark {
    pos: usize,
    line: usize,
    col: usize,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer over the given source string.
    pub fn new(input: &'src str) -> Self {
        Self {
            input,
            src: input.char_indices().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).map(|&(_, c)| c)
    }
    fn peek_next(&self) -> Option<char> {
        self.src.get(self.pos + 1).map(|&(_, c)| c)
    }
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    fn byte_offset(&self, pos: usize) -> usize {
        self.src.get(pos).map_or(self.input.len(), |&(off, _)| off)
    }

    fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            col: self.col,
        }
    }

    fn span_from(&self, start: Mark) -> Span {
        let offset = self.byte_offset(start.pos);
        Span::new(start.line, start.col, offset, self.byte_offset(self.pos) - offset)
    }

    fn make_token(&self, start: Mark, kind: TokenKind) -> Token {
        let span = self.span_from(start);
        Token {
            kind,
            lexeme: self.input[span.offset..span.end()].to_string(),
            span,
        }
    }

    fn error_at(&self, start: Mark, msg: impl Into<String>) -> Error {
        Error::lexical(msg, self.span_from(start))
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else if c == '/' && self.peek_next() == Some('/') {
                while let Some(c2) = self.peek() {
                    if c2 == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> Result<Token> {
        let start = self.mark();
        let mut s = String::new();
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            s.push(c);
            self.advance();
        }
        let is_float = self.peek() == Some('.') && self.peek_next().map_or(false, |c| c.is_ascii_digit());
        if is_float {
            s.push('.');
            self.advance();
            while let Some(c) = self.peek().filter(char::is_ascii_digit) {
                s.push(c);
                self.advance();
            }
            self.reject_suffix(start, &mut s)?;
            let val: f64 = s.parse().map_err(|_| self.error_at(start, "Invalid float literal"))?;
            return Ok(self.make_token(start, TokenKind::Float(val)));
        }
        if self.peek() == Some('u') && !self.peek_next().map_or(false, is_ident_continue) {
            self.advance();
            let val: u64 = s
                .parse()
                .map_err(|_| self.error_at(start, format!("Integer literal '{}u' is out of range", s)))?;
            return Ok(self.make_token(start, TokenKind::UInt(val)));
        }
        self.reject_suffix(start, &mut s)?;
        let val: i64 = s
            .parse()
            .map_err(|_| self.error_at(start, format!("Integer literal '{}' is out of range", s)))?;
        Ok(self.make_token(start, TokenKind::Int(val)))
    }

    /// A number running straight into identifier characters, like `42units`.
    fn reject_suffix(&mut self, start: Mark, s: &mut String) -> Result<()> {
        if !self.peek().map_or(false, is_ident_continue) {
            return Ok(());
        }
        while let Some(c) = self.peek().filter(|&c| is_ident_continue(c)) {
            s.push(c);
            self.advance();
        }
        Err(self.error_at(start, format!("Malformed number literal '{}'", s)))
    }

    fn read_ident_or_keyword(&mut self) -> Token {
        let start = self.mark();
        let mut s = String::new();
        while let Some(c) = self.peek().filter(|&c| is_ident_continue(c)) {
            s.push(c);
            self.advance();
        }
        let kind = TokenKind::keyword(&s).unwrap_or(TokenKind::Ident(s));
        self.make_token(start, kind)
    }

    /// Reads the character after a backslash and decodes the escape.
    fn read_escape(&mut self, start: Mark) -> Result<char> {
        let esc = match self.advance() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('0') => '\0',
            Some('\\') => '\\',
            Some('\'') => '\'',
            Some('"') => '"',
            Some(other) => return Err(self.error_at(start, format!("Unknown escape sequence '\\{}'", other))),
            None => return Err(self.error_at(start, "Unterminated escape sequence")),
        };
        Ok(esc)
    }

    fn read_string(&mut self) -> Result<Token> {
        let start = self.mark();
        self.advance();
        let mut s = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => return Err(self.error_at(start, "Unterminated string")),
                Some('"') => {
                    self.advance();
                    return Ok(self.make_token(start, TokenKind::Str(s)));
                }
                Some('\\') => {
                    self.advance();
                    s.push(self.read_escape(start)?);
                }
                Some(other) => {
                    self.advance();
                    s.push(other);
                }
            }
        }
    }

    fn read_char(&mut self) -> Result<Token> {
        let start = self.mark();
        self.advance();
        let ch = match self.advance() {
            None | Some('\n') => return Err(self.error_at(start, "Unterminated character literal")),
            Some('\'') => return Err(self.error_at(start, "Empty character literal")),
            Some('\\') => self.read_escape(start)?,
            Some(c) => c,
        };
        if self.peek() != Some('\'') {
            return Err(self.error_at(start, "Character literal must contain exactly one character"));
        }
        self.advance();
        Ok(self.make_token(start, TokenKind::Char(ch)))
    }

    /// Consumes one operator character, or two when the second one is `next`.
    fn one_or_two(&mut self, next: char, single: TokenKind, double: TokenKind) -> Token {
        let start = self.mark();
        self.advance();
        if self.peek() == Some(next) {
            self.advance();
            self.make_token(start, double)
        } else {
            self.make_token(start, single)
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.mark();
        self.advance();
        self.make_token(start, kind)
    }

    /// Tokenize the entire input into a vector of tokens ending with Eof.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let start = self.mark();
            let tk = match self.peek() {
                None => {
                    tokens.push(self.make_token(start, TokenKind::Eof));
                    break;
                }
                Some('(') => self.single(TokenKind::LParen),
                Some(')') => self.single(TokenKind::RParen),
                Some('{') => self.single(TokenKind::LBrace),
                Some('}') => self.single(TokenKind::RBrace),
                Some('[') => self.single(TokenKind::LBracket),
                Some(']') => self.single(TokenKind::RBracket),
                Some(',') => self.single(TokenKind::Comma),
                Some(':') => self.single(TokenKind::Colon),
                Some(';') => self.single(TokenKind::Semicolon),
                Some('.') => self.single(TokenKind::Dot),
                Some('%') => self.one_or_two('=', TokenKind::Percent, TokenKind::PercentEq),
                Some('=') => self.one_or_two('=', TokenKind::Equal, TokenKind::EqEq),
                Some('!') => self.one_or_two('=', TokenKind::Bang, TokenKind::NotEq),
                Some('<') => self.one_or_two('=', TokenKind::Less, TokenKind::LessEq),
                Some('>') => self.one_or_two('=', TokenKind::Greater, TokenKind::GreaterEq),
                Some('+') => self.one_or_two('=', TokenKind::Plus, TokenKind::PlusEq),
                Some('*') => self.one_or_two('=', TokenKind::Star, TokenKind::StarEq),
                Some('/') => self.one_or_two('=', TokenKind::Slash, TokenKind::SlashEq),
                Some('-') => match self.peek_next() {
                    Some('>') => self.one_or_two('>', TokenKind::Minus, TokenKind::Arrow),
                    _ => self.one_or_two('=', TokenKind::Minus, TokenKind::MinusEq),
                },
                Some('&') => {
                    if self.peek_next() == Some('&') {
                        self.one_or_two('&', TokenKind::AndAnd, TokenKind::AndAnd)
                    } else {
                        self.advance();
                        return Err(self.error_at(start, "Unexpected character '&' (did you mean '&&'?)"));
                    }
                }
                Some('|') => {
                    if self.peek_next() == Some('|') {
                        self.one_or_two('|', TokenKind::OrOr, TokenKind::OrOr)
                    } else {
                        self.advance();
                        return Err(self.error_at(start, "Unexpected character '|' (did you mean '||'?)"));
                    }
                }
                Some('"') => self.read_string()?,
                Some('\'') => self.read_char()?,
                Some(c) if c.is_ascii_digit() => self.read_number()?,
                Some(c) if c.is_ascii_alphabetic() || c == '_' => self.read_ident_or_keyword(),
                Some(other) => {
                    self.advance();
                    return Err(self.error_at(start, format!("Unexpected character '{}'", other)));
                }
            };
            tokens.push(tk);
        }
        Ok(tokens)
    }
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Convenience wrapper around [`Lexer::tokenize`].
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sklang_syntax::error::ErrorKind;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .expect("Lexing should succeed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("var fn struct enum self selfish match matches _x"),
            vec![
                TokenKind::Var,
                TokenKind::Fn,
                TokenKind::Struct,
                TokenKind::Enum,
                TokenKind::SelfKw,
                TokenKind::Ident("selfish".into()),
                TokenKind::Match,
                TokenKind::Ident("matches".into()),
                TokenKind::Ident("_x".into()),
                TokenKind::Eof,
            ]
        );
        assert_eq!(kinds("true false")[..2], [TokenKind::True, TokenKind::False]);
    }

    #[test]
    fn test_number_literals() {
        assert_eq!(kinds("42")[0], TokenKind::Int(42));
        assert_eq!(kinds("42u")[0], TokenKind::UInt(42));
        assert_eq!(kinds("3.25")[0], TokenKind::Float(3.25));
        // a dot without a following digit is member access
        assert_eq!(
            kinds("1.x"),
            vec![TokenKind::Int(1), TokenKind::Dot, TokenKind::Ident("x".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_longest_match_operators() {
        assert_eq!(
            kinds("-> <= >= == != && || += -= *= /= %= - < % ="),
            vec![
                TokenKind::Arrow,
                TokenKind::LessEq,
                TokenKind::GreaterEq,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::PlusEq,
                TokenKind::MinusEq,
                TokenKind::StarEq,
                TokenKind::SlashEq,
                TokenKind::PercentEq,
                TokenKind::Minus,
                TokenKind::Less,
                TokenKind::Percent,
                TokenKind::Equal,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_char_and_string_escapes() {
        assert_eq!(kinds("'a'")[0], TokenKind::Char('a'));
        assert_eq!(kinds(r"'\n'")[0], TokenKind::Char('\n'));
        assert_eq!(kinds(r"'\''")[0], TokenKind::Char('\''));
        assert_eq!(kinds(r#""say \"hi\"\\""#)[0], TokenKind::Str("say \"hi\"\\".into()));
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("var x = 1; // trailing\n// whole line\nx"),
            vec![
                TokenKind::Var,
                TokenKind::Ident("x".into()),
                TokenKind::Equal,
                TokenKind::Int(1),
                TokenKind::Semicolon,
                TokenKind::Ident("x".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("var x\n  = 10;").unwrap();
        assert_eq!(tokens[0].span, Span::new(1, 1, 0, 3));
        assert_eq!(tokens[1].span, Span::new(1, 5, 4, 1));
        assert_eq!(tokens[2].span, Span::new(2, 3, 8, 1));
        assert_eq!(tokens[3].lexeme, "10");
        assert_eq!(tokens[3].span, Span::new(2, 5, 10, 2));
    }

    #[test]
    fn test_unknown_character() {
        let err = tokenize("var x = 1 @ 2;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lexical);
        assert!(err.msg.contains('@'));
        assert_eq!((err.line(), err.col()), (Some(1), Some(11)));
    }

    #[test]
    fn test_malformed_literals() {
        assert!(tokenize("\"open").is_err());
        assert!(tokenize("'ab'").is_err());
        assert!(tokenize("''").is_err());
        assert!(tokenize("99999999999999999999").is_err());
        assert!(tokenize("a & b").is_err());
    }

    #[test]
    fn test_number_running_into_identifier() {
        let err = tokenize("var d = 42units;").expect_err("should reject");
        assert_eq!(err.kind, ErrorKind::Lexical);
        assert_eq!(err.msg, "Malformed number literal '42units'");
        assert_eq!((err.line(), err.col()), (Some(1), Some(9)));
        assert_eq!(err.span.map(|s| s.len), Some(7));

        assert!(tokenize("1.5x").is_err());
        assert!(tokenize("7uu").is_err());
        assert_eq!(kinds("42u;")[0], TokenKind::UInt(42));
    }
}
