//! Number literal lexing.

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes an integer or float literal.
    ///
    /// Consumes digits and at most one `.`; a second dot ends the literal.
    /// With a dot the token is a float, otherwise an integer. An integer
    /// literal too large for `i64` falls back to a float token.
    pub(crate) fn lex_number(&mut self) -> Token {
        let pos_start = self.cursor.position();
        let mut text = String::new();
        let mut seen_dot = false;

        while let Some(ch) = self.cursor.current_char() {
            match ch {
                '0'..='9' => text.push(ch),
                '.' if !seen_dot => {
                    seen_dot = true;
                    text.push('.');
                }
                _ => break,
            }
            self.cursor.advance();
        }

        let kind = if seen_dot {
            TokenKind::Float(text.parse().unwrap_or(f64::INFINITY))
        } else {
            match text.parse::<i64>() {
                Ok(value) => TokenKind::Int(value),
                Err(_) => TokenKind::Float(text.parse().unwrap_or(f64::INFINITY)),
            }
        };

        Token::new(kind, pos_start, self.cursor.position())
    }
}
