//! Core lexer implementation.
//!
//! This module contains the main Lexer struct and the dispatch loop.

use std::sync::Arc;

use peanut_util::{Diagnostic, SourceFile};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use crate::Interpolate;

/// Lexer for the Peanut language.
///
/// Consumes a source file and produces the full token list, terminated by
/// EOF, or the first error. String interpolation re-enters the pipeline
/// through the [`Interpolate`] implementation handed in at construction.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    pub(crate) cursor: Cursor,

    /// Interpolation seam for `${…}` fragments.
    pub(crate) interp: &'a mut dyn Interpolate,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer over the given source file.
    pub fn new(file: &Arc<SourceFile>, interp: &'a mut dyn Interpolate) -> Self {
        Self {
            cursor: Cursor::new(file),
            interp,
        }
    }

    /// Scans the whole file into a token list terminated by EOF.
    ///
    /// Lexing is non-recoverable: the first error wins and the partial
    /// token list is discarded.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Diagnostic> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.cursor.current_char() {
            match ch {
                ' ' | '\t' => self.cursor.advance(),
                ';' | '\n' => tokens.push(self.single(TokenKind::Newline)),
                '#' => self.skip_comment(),
                '0'..='9' => tokens.push(self.lex_number()),
                c if c.is_ascii_alphabetic() => tokens.push(self.lex_identifier()),
                '"' => tokens.push(self.lex_string()?),
                '+' => tokens.push(self.single(TokenKind::Plus)),
                '-' => tokens.push(self.single(TokenKind::Minus)),
                '*' => tokens.push(self.single(TokenKind::Mul)),
                '/' => tokens.push(self.single(TokenKind::Div)),
                '^' => tokens.push(self.single(TokenKind::Pow)),
                '%' => tokens.push(self.single(TokenKind::Mod)),
                '(' => tokens.push(self.single(TokenKind::LParen)),
                ')' => tokens.push(self.single(TokenKind::RParen)),
                '[' => tokens.push(self.single(TokenKind::LSquare)),
                ']' => tokens.push(self.single(TokenKind::RSquare)),
                '{' => tokens.push(self.single(TokenKind::LCurly)),
                '}' => tokens.push(self.single(TokenKind::RCurly)),
                ',' => tokens.push(self.single(TokenKind::Comma)),
                ':' => tokens.push(self.single(TokenKind::Colon)),
                '?' => tokens.push(self.single(TokenKind::Question)),
                '!' => tokens.push(self.lex_not_equals()?),
                '=' => tokens.push(self.lex_equals()),
                '<' => tokens.push(self.lex_less_than()),
                '>' => tokens.push(self.lex_greater_than()),
                other => {
                    let pos_start = self.cursor.position();
                    self.cursor.advance();
                    return Err(Diagnostic::illegal_char(
                        format!("'{other}'"),
                        pos_start,
                        self.cursor.position(),
                    ));
                }
            }
        }

        let eof_pos = self.cursor.position();
        tokens.push(Token::new(TokenKind::Eof, eof_pos.clone(), eof_pos));
        Ok(tokens)
    }

    /// Emits a one-character token and moves past it.
    pub(crate) fn single(&mut self, kind: TokenKind) -> Token {
        let pos_start = self.cursor.position();
        self.cursor.advance();
        Token::new(kind, pos_start, self.cursor.position())
    }
}
