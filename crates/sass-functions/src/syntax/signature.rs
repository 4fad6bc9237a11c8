//! Parser for builtin signatures.
//!
//! Grammar:
//!   signature := (param ("," param)*)?
//!   param     := VAR (":" literal)? | VAR "..."
//!   literal   := NUMBER | IDENT | STRING | HEXCOLOR
//!
//! A rest parameter must come last. `true`, `false` and `null` idents become
//! the corresponding values; other idents become unquoted strings.

use crate::error::{Error, Result};
use crate::runtime::factory::ValueFactory;
use crate::runtime::value::Value;
use crate::syntax::ast::{Expr, Param, ParamList};
use crate::syntax::lexer::Lexer;
use crate::syntax::token::{Token, TokenKind};
use crate::types::color::Color;
use crate::types::unit::Unit;

pub fn parse(signature: &str, factory: &mut ValueFactory) -> Result<ParamList> {
    let tokens = Lexer::new(signature).tokenize()?;
    Parser { tokens, pos: 0, factory }.parse()
        .map_err(|e| e.context(format!("in signature `{signature}`")))
}

struct Parser<'f> {
    tokens: Vec<Token>,
    pos: usize,
    factory: &'f mut ValueFactory,
}

impl Parser<'_> {
    fn parse(mut self) -> Result<ParamList> {
        let mut list = ParamList::default();
        if self.at(&TokenKind::Eof) {
            return Ok(list);
        }

        loop {
            let name = self.expect_variable()?;
            if list.rest.is_some() {
                return Err(self.error("a rest parameter must be the last parameter"));
            }
            if list.names().contains(&name) {
                return Err(self.error(format!("duplicate parameter `${name}`")));
            }

            match self.peek().kind {
                TokenKind::Colon => {
                    self.pos += 1;
                    let default = self.literal()?;
                    list.params.push(Param::optional(name, Expr::Literal(default)));
                }
                TokenKind::Ellipsis => {
                    self.pos += 1;
                    list.rest = Some(name);
                }
                _ => list.params.push(Param::required(name)),
            }

            if self.at(&TokenKind::Comma) {
                self.pos += 1;
                continue;
            }
            if self.at(&TokenKind::Eof) {
                return Ok(list);
            }
            return Err(self.error(format!("expected `,`, found {}", self.peek().kind.describe())));
        }
    }

    fn literal(&mut self) -> Result<Value> {
        let token = self.peek().clone();
        self.pos += 1;
        let f = &mut *self.factory;
        let value = match token.kind {
            TokenKind::Number(v, unit) => f.number(v, Unit::new(&unit)),
            TokenKind::Ident(s) => match s.as_str() {
                "true"  => f.boolean(true),
                "false" => f.boolean(false),
                "null"  => f.null(),
                _ => f.unquoted(s),
            },
            TokenKind::StringLit(s) => f.quoted(s),
            TokenKind::HexColor(hex) => f.color(parse_hex(&hex)),
            other => {
                self.pos -= 1;
                return Err(self.error(format!("expected a default value, found {}", other.describe())));
            }
        };
        Ok(value)
    }

    fn expect_variable(&mut self) -> Result<String> {
        match &self.peek().kind {
            TokenKind::Variable(name) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            other => Err(self.error(format!("expected a parameter, found {}", other.describe()))),
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.peek().kind == *kind
    }

    fn error(&self, msg: impl Into<String>) -> Error {
        Error::signature(format!("column {}: {}", self.peek().column, msg.into()))
    }
}

/// `rgb` or `rrggbb` digits; the lexer guarantees the length.
fn parse_hex(hex: &str) -> Color {
    let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).unwrap_or(0) as f64;
    if hex.len() == 3 {
        Color::rgb(digit(0) * 17.0, digit(1) * 17.0, digit(2) * 17.0)
    } else {
        let pair = |i: usize| digit(i) * 16.0 + digit(i + 1);
        Color::rgb(pair(0), pair(2), pair(4))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn sig(src: &str) -> ParamList {
        parse(src, &mut ValueFactory::new()).expect("signature should parse")
    }

    fn default_of(list: &ParamList, i: usize) -> Value {
        list.params[i].default.as_ref().and_then(Expr::as_literal).cloned().expect("literal default")
    }

    #[test]
    fn required_and_defaulted() {
        let list = sig("$color-1, $color-2, $weight: 50%");
        assert_eq!(list.names(), vec!["color-1", "color-2", "weight"]);
        assert_eq!(list.required(), 2);
        assert_eq!(default_of(&list, 2).to_string(), "50%");
    }

    #[test]
    fn empty_signature() {
        let list = sig("");
        assert!(list.params.is_empty());
        assert!(list.rest.is_none());
    }

    #[test]
    fn rest_parameter() {
        let list = sig("$first, $values...");
        assert_eq!(list.rest.as_deref(), Some("values"));
        assert_eq!(list.params.len(), 1);
    }

    #[test]
    fn default_literals() {
        let list = sig("$a: auto, $b: null, $c: false, $d: \"x\", $e: #ff0000, $f: #fff");
        assert_eq!(default_of(&list, 0).as_string().unwrap(), ("auto", false));
        assert!(default_of(&list, 1).is_null());
        assert_eq!(default_of(&list, 2).as_bool().unwrap(), false);
        assert_eq!(default_of(&list, 3).as_string().unwrap(), ("x", true));
        assert_eq!(default_of(&list, 4).as_color().unwrap(), Color::rgb(255.0, 0.0, 0.0));
        assert_eq!(default_of(&list, 5).as_color().unwrap(), Color::rgb(255.0, 255.0, 255.0));
    }

    #[test]
    fn malformed_signatures() {
        for bad in ["$a...,$b", "$a $b", "$a:", "color", "$a, $a", "$a,"] {
            let err = parse(bad, &mut ValueFactory::new()).unwrap_err();
            assert_eq!(err.code, ErrorCode::Signature, "{bad}");
        }
    }
}
