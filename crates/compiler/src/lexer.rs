//! Byte-stream to token-stream scanner.
//!
//! Single pass over the source bytes; no lookahead buffer beyond the one
//! character `peek` needs. Keeps line/column so later stages can render
//! [`crate::diagnostics::Diagnostics::report`]-quality positions.

use crate::token::{Token, TokenKind};

pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source: source.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self, offset: usize) -> u8 {
        *self.source.get(self.pos + offset).unwrap_or(&0)
    }

    fn advance(&mut self) -> u8 {
        let c = self.peek(0);
        if c != 0 {
            self.pos += 1;
            if c == b'\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        c
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn skip_whitespace(&mut self) {
        while !self.at_end() && self.peek(0).is_ascii_whitespace() {
            self.advance();
        }
    }

    /// Tokenizes the whole source, reporting lexical errors to `diags`
    /// as they're found. Unterminated strings and unterminated `extern`
    /// blocks are fatal and abort tokenization early.
    pub fn tokenize(
        mut self,
        diags: &mut crate::diagnostics::Diagnostics,
    ) -> Result<Vec<Token>, String> {
        let mut out = Vec::new();

        loop {
            self.skip_whitespace();
            if self.at_end() {
                break;
            }

            let start_line = self.line;
            let start_col = self.col;
            let c = self.peek(0);

            if c == b'/' && self.peek(1) == b'/' {
                while !self.at_end() && self.peek(0) != b'\n' {
                    self.advance();
                }
                continue;
            }
            if c == b'/' && self.peek(1) == b'*' {
                self.advance();
                self.advance();
                loop {
                    if self.at_end() {
                        break;
                    }
                    if self.peek(0) == b'*' && self.peek(1) == b'/' {
                        self.advance();
                        self.advance();
                        break;
                    }
                    self.advance();
                }
                continue;
            }

            let token = if c.is_ascii_alphabetic() || c == b'_' {
                self.scan_identifier(start_line, start_col)
            } else if c == b'"' {
                match self.scan_string(start_line, start_col) {
                    Ok(t) => t,
                    Err(e) => return Err(e),
                }
            } else if c.is_ascii_digit() || (c == b'.' && self.peek(1).is_ascii_digit()) {
                self.scan_number(start_line, start_col)
            } else {
                match self.scan_operator(start_line, start_col) {
                    Some(t) => t,
                    None => {
                        diags.error(format!(
                            "unexpected character '{}' at {}:{}",
                            c as char, start_line, start_col
                        ));
                        self.advance();
                        continue;
                    }
                }
            };

            if token.kind == TokenKind::Extern && token.lexeme == "extern" {
                self.skip_whitespace();
                if self.peek(0) == b'{' {
                    self.advance();
                    let mut depth: u32 = 1;
                    let mut body = String::new();
                    loop {
                        if self.at_end() {
                            return Err("unterminated 'extern' block".to_string());
                        }
                        let ch = self.advance() as char;
                        if ch == '}' {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        } else if ch == '{' {
                            depth += 1;
                        }
                        if depth > 0 {
                            body.push(ch);
                        }
                    }
                    out.push(Token::new(TokenKind::Extern, body, start_line, start_col));
                    continue;
                }
            }

            out.push(token);
        }

        out.push(Token::new(TokenKind::Eof, "EOF", self.line, self.col));
        Ok(out)
    }

    fn scan_identifier(&mut self, line: usize, col: usize) -> Token {
        let mut value = String::new();
        while self.peek(0).is_ascii_alphanumeric() || self.peek(0) == b'_' {
            value.push(self.advance() as char);
        }
        match TokenKind::keyword(&value) {
            Some(kind) => Token::new(kind, value, line, col),
            None => Token::new(TokenKind::Id, value, line, col),
        }
    }

    fn scan_number(&mut self, line: usize, col: usize) -> Token {
        let mut value = String::new();
        let mut is_float = false;
        while self.peek(0).is_ascii_digit() {
            value.push(self.advance() as char);
        }
        if self.peek(0) == b'.' {
            is_float = true;
            value.push(self.advance() as char);
            while self.peek(0).is_ascii_digit() {
                value.push(self.advance() as char);
            }
        }
        let kind = if is_float {
            TokenKind::Float
        } else {
            TokenKind::Int
        };
        Token::new(kind, value, line, col)
    }

    fn scan_string(&mut self, line: usize, col: usize) -> Result<Token, String> {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            if self.at_end() {
                return Err(format!("unclosed string literal at {line}:{col}"));
            }
            if self.peek(0) == b'"' {
                break;
            }
            value.push(self.advance() as char);
        }
        self.advance(); // closing quote
        Ok(Token::new(TokenKind::Str, value, line, col))
    }

    /// Longest-match scan over the operator/punctuation table (§6.1).
    fn scan_operator(&mut self, line: usize, col: usize) -> Option<Token> {
        let c = self.advance();
        macro_rules! tok {
            ($kind:expr, $lexeme:expr) => {
                Some(Token::new($kind, $lexeme, line, col))
            };
        }
        match c {
            b':' => {
                if self.peek(0) == b':' {
                    self.advance();
                    tok!(TokenKind::StaticCall, "::")
                } else {
                    None
                }
            }
            b'=' => {
                if self.peek(0) == b'=' {
                    self.advance();
                    tok!(TokenKind::EqEq, "==")
                } else {
                    tok!(TokenKind::Assign, "=")
                }
            }
            b'+' => {
                if self.peek(0) == b'+' {
                    self.advance();
                    tok!(TokenKind::Inc, "++")
                } else if self.peek(0) == b'=' {
                    self.advance();
                    tok!(TokenKind::AddAssign, "+=")
                } else {
                    tok!(TokenKind::Add, "+")
                }
            }
            b'-' => {
                if self.peek(0) == b'-' {
                    self.advance();
                    tok!(TokenKind::Dec, "--")
                } else if self.peek(0) == b'=' {
                    self.advance();
                    tok!(TokenKind::SubAssign, "-=")
                } else {
                    tok!(TokenKind::Sub, "-")
                }
            }
            b'*' => {
                if self.peek(0) == b'=' {
                    self.advance();
                    tok!(TokenKind::MulAssign, "*=")
                } else {
                    tok!(TokenKind::Mul, "*")
                }
            }
            b'/' => {
                if self.peek(0) == b'=' {
                    self.advance();
                    tok!(TokenKind::DivAssign, "/=")
                } else {
                    tok!(TokenKind::Div, "/")
                }
            }
            b'%' => {
                if self.peek(0) == b'=' {
                    self.advance();
                    tok!(TokenKind::ModAssign, "%=")
                } else {
                    tok!(TokenKind::Mod, "%")
                }
            }
            b'&' => {
                if self.peek(0) == b'&' {
                    self.advance();
                    tok!(TokenKind::LogAnd, "&&")
                } else if self.peek(0) == b'=' {
                    self.advance();
                    tok!(TokenKind::AndAssign, "&=")
                } else {
                    tok!(TokenKind::BitAnd, "&")
                }
            }
            b'|' => {
                if self.peek(0) == b'|' {
                    self.advance();
                    tok!(TokenKind::LogOr, "||")
                } else if self.peek(0) == b'=' {
                    self.advance();
                    tok!(TokenKind::OrAssign, "|=")
                } else {
                    tok!(TokenKind::BitOr, "|")
                }
            }
            b'^' => {
                if self.peek(0) == b'=' {
                    self.advance();
                    tok!(TokenKind::XorAssign, "^=")
                } else {
                    tok!(TokenKind::BitXor, "^")
                }
            }
            b'!' => {
                if self.peek(0) == b'=' {
                    self.advance();
                    tok!(TokenKind::NotEq, "!=")
                } else {
                    tok!(TokenKind::Not, "!")
                }
            }
            b'~' => tok!(TokenKind::Complement, "~"),
            b'<' => {
                if self.peek(0) == b'<' {
                    self.advance();
                    if self.peek(0) == b'=' {
                        self.advance();
                        tok!(TokenKind::ShlAssign, "<<=")
                    } else {
                        tok!(TokenKind::Shl, "<<")
                    }
                } else if self.peek(0) == b'=' {
                    self.advance();
                    tok!(TokenKind::Le, "<=")
                } else {
                    tok!(TokenKind::Lt, "<")
                }
            }
            b'>' => {
                if self.peek(0) == b'>' {
                    self.advance();
                    if self.peek(0) == b'=' {
                        self.advance();
                        tok!(TokenKind::ShrAssign, ">>=")
                    } else {
                        tok!(TokenKind::Shr, ">>")
                    }
                } else if self.peek(0) == b'=' {
                    self.advance();
                    tok!(TokenKind::Ge, ">=")
                } else {
                    tok!(TokenKind::Gt, ">")
                }
            }
            b'(' => tok!(TokenKind::LParen, "("),
            b')' => tok!(TokenKind::RParen, ")"),
            b'{' => tok!(TokenKind::LBrace, "{"),
            b'}' => tok!(TokenKind::RBrace, "}"),
            b'[' => tok!(TokenKind::LBracket, "["),
            b']' => tok!(TokenKind::RBracket, "]"),
            b';' => tok!(TokenKind::Semicolon, ";"),
            b'.' => tok!(TokenKind::Dot, "."),
            b',' => tok!(TokenKind::Comma, ","),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;

    fn lex(src: &str) -> Vec<Token> {
        let mut diags = Diagnostics::new("t.rill", src);
        Lexer::new(src).tokenize(&mut diags).unwrap()
    }

    #[test]
    fn keywords_and_identifiers() {
        let toks = lex("struct extends Foo");
        assert_eq!(toks[0].kind, TokenKind::Struct);
        assert_eq!(toks[1].kind, TokenKind::Extends);
        assert_eq!(toks[2].kind, TokenKind::Id);
        assert_eq!(toks[2].lexeme, "Foo");
        assert_eq!(toks.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn numbers_int_and_float_and_leading_dot() {
        let toks = lex("1 2.5 .5");
        assert_eq!(toks[0].kind, TokenKind::Int);
        assert_eq!(toks[1].kind, TokenKind::Float);
        assert_eq!(toks[1].lexeme, "2.5");
        assert_eq!(toks[2].kind, TokenKind::Float);
        assert_eq!(toks[2].lexeme, ".5");
    }

    #[test]
    fn longest_match_operators() {
        let toks = lex("<<= << < <= :: =");
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::ShlAssign,
                TokenKind::Shl,
                TokenKind::Lt,
                TokenKind::Le,
                TokenKind::StaticCall,
                TokenKind::Assign,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn line_comment_and_block_comment_are_skipped() {
        let toks = lex("// comment\nint x; /* block\ncomment */ int y;");
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Id,
                TokenKind::Id,
                TokenKind::Semicolon,
                TokenKind::Id,
                TokenKind::Id,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn raw_extern_block_captures_balanced_braces() {
        let toks = lex("extern { void foo() { return; } }");
        assert_eq!(toks[0].kind, TokenKind::Extern);
        assert_eq!(toks[0].lexeme, " void foo() { return; } ");
    }

    #[test]
    fn bare_extern_keyword_is_followed_by_identifier() {
        let toks = lex("extern libm");
        assert_eq!(toks[0].kind, TokenKind::Extern);
        assert_eq!(toks[0].lexeme, "extern");
        assert_eq!(toks[1].kind, TokenKind::Id);
        assert_eq!(toks[1].lexeme, "libm");
    }

    #[test]
    fn unterminated_string_is_fatal() {
        let mut diags = Diagnostics::new("t.rill", "\"abc");
        let result = Lexer::new("\"abc").tokenize(&mut diags);
        assert!(result.is_err());
    }

    #[test]
    fn unexpected_byte_is_reported_and_skipped() {
        let mut diags = Diagnostics::new("t.rill", "a @ b");
        let toks = Lexer::new("a @ b").tokenize(&mut diags).unwrap();
        assert!(diags.has_errors());
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::Id, TokenKind::Id, TokenKind::Eof]);
    }
}
