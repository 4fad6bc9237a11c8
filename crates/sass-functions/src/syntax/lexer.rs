use crate::error::Error;
use crate::syntax::token::{Token, TokenKind};

/// Tokenizer for builtin signature strings such as `$color, $amount: 50%`.
pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source: source.as_bytes(), pos: 0 }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            if self.is_at_end() {
                tokens.push(Token::new(TokenKind::Eof, self.pos + 1));
                return Ok(tokens);
            }
            tokens.push(self.next_token()?);
        }
    }

    fn next_token(&mut self) -> Result<Token, Error> {
        let col = self.pos + 1;
        let ch = self.advance();

        let kind = match ch {
            b':' => TokenKind::Colon,
            b',' => TokenKind::Comma,
            b'.' if self.peek() == b'.' && self.peek_next() == b'.' => {
                self.advance();
                self.advance();
                TokenKind::Ellipsis
            }
            b'$' => {
                if !is_ident_start(self.peek()) {
                    return Err(self.error(col, "expected a parameter name after `$`"));
                }
                let first = self.advance();
                TokenKind::Variable(self.read_ident(first))
            }
            b'#' => TokenKind::HexColor(self.read_hex(col)?),
            b'"' | b'\'' => TokenKind::StringLit(self.read_string(ch, col)?),
            b'0'..=b'9' | b'.' => self.read_number(ch, false, col)?,
            b'-' if self.peek().is_ascii_digit() || self.peek() == b'.' => {
                let first = self.advance();
                self.read_number(first, true, col)?
            }
            c if is_ident_start(c) => TokenKind::Ident(self.read_ident(c)),
            other => {
                return Err(self.error(col, format!("unexpected character `{}`", other as char)));
            }
        };

        Ok(Token::new(kind, col))
    }

    // ─── Primitives ──────────────────────────────────────────────────────────

    fn advance(&mut self) -> u8 {
        let ch = self.source[self.pos];
        self.pos += 1;
        ch
    }

    fn peek(&self) -> u8 {
        if self.is_at_end() { 0 } else { self.source[self.pos] }
    }

    fn peek_next(&self) -> u8 {
        if self.pos + 1 >= self.source.len() { 0 } else { self.source[self.pos + 1] }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.peek().is_ascii_whitespace() {
            self.advance();
        }
    }

    fn error(&self, col: usize, msg: impl Into<String>) -> Error {
        Error::signature(format!("column {col}: {}", msg.into()))
    }

    // ─── Readers ─────────────────────────────────────────────────────────────

    fn read_ident(&mut self, first: u8) -> String {
        let mut s = String::from(first as char);
        while is_ident_char(self.peek()) {
            s.push(self.advance() as char);
        }
        s
    }

    fn read_hex(&mut self, col: usize) -> Result<String, Error> {
        let mut s = String::with_capacity(6);
        while self.peek().is_ascii_hexdigit() {
            s.push(self.advance() as char);
        }
        if s.len() == 3 || s.len() == 6 {
            Ok(s)
        } else {
            Err(self.error(col, format!("invalid hex color `#{s}`")))
        }
    }

    fn read_string(&mut self, quote: u8, col: usize) -> Result<String, Error> {
        let mut bytes = Vec::new();
        loop {
            if self.is_at_end() {
                return Err(self.error(col, "unterminated string literal"));
            }
            let ch = self.advance();
            if ch == quote { break; }
            if ch == b'\\' && !self.is_at_end() {
                bytes.push(self.advance());
            } else {
                bytes.push(ch);
            }
        }
        String::from_utf8(bytes).map_err(|_| self.error(col, "string literal is not valid UTF-8"))
    }

    fn read_number(&mut self, first: u8, negative: bool, col: usize) -> Result<TokenKind, Error> {
        let mut s = String::from(first as char);
        while self.peek().is_ascii_digit() || (self.peek() == b'.' && self.peek_next().is_ascii_digit()) {
            s.push(self.advance() as char);
        }
        let mut unit = String::new();
        if self.peek() == b'%' {
            self.advance();
            unit.push('%');
        } else {
            while self.peek().is_ascii_alphabetic() {
                unit.push(self.advance() as char);
            }
        }
        let magnitude: f64 = s.parse()
            .map_err(|_| self.error(col, format!("malformed number `{s}`")))?;
        Ok(TokenKind::Number(if negative { -magnitude } else { magnitude }, unit))
    }
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'-'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).tokenize().expect("lex failed").into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn variables_and_defaults() {
        assert_eq!(kinds("$color, $weight: 50%"), vec![
            TokenKind::Variable("color".into()),
            TokenKind::Comma,
            TokenKind::Variable("weight".into()),
            TokenKind::Colon,
            TokenKind::Number(50.0, "%".into()),
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn hyphenated_names_and_rest() {
        assert_eq!(kinds("$color-1, $args..."), vec![
            TokenKind::Variable("color-1".into()),
            TokenKind::Comma,
            TokenKind::Variable("args".into()),
            TokenKind::Ellipsis,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn literal_kinds() {
        assert_eq!(kinds("auto -1.5px \"x\" #fff"), vec![
            TokenKind::Ident("auto".into()),
            TokenKind::Number(-1.5, "px".into()),
            TokenKind::StringLit("x".into()),
            TokenKind::HexColor("fff".into()),
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Lexer::new("$a; $b").tokenize().is_err());
        assert!(Lexer::new("$").tokenize().is_err());
        assert!(Lexer::new("\"open").tokenize().is_err());
    }

    #[test]
    fn lone_dot_is_not_a_number() {
        for src in ["$a: .", "$a: -.", "$a: .px"] {
            let err = Lexer::new(src).tokenize().unwrap_err();
            assert_eq!(err.code, ErrorCode::Signature, "{src}");
            assert!(err.message.contains("malformed number"), "{}", err.message);
        }
        assert_eq!(kinds(".5"), vec![TokenKind::Number(0.5, String::new()), TokenKind::Eof]);
    }

    #[test]
    fn strings_keep_non_ascii_text() {
        assert_eq!(kinds("\"café ✓\""), vec![TokenKind::StringLit("café ✓".into()), TokenKind::Eof]);
        assert_eq!(kinds("'it\\'s'"), vec![TokenKind::StringLit("it's".into()), TokenKind::Eof]);
    }
}
