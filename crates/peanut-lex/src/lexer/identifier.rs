//! Identifier and keyword lexing.

use peanut_util::Symbol;

use crate::token::{Keyword, Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes an identifier or keyword.
    ///
    /// An identifier starts with an ASCII letter and continues with
    /// letters, digits or underscores. If the lexeme is a reserved word the
    /// token becomes a keyword token instead.
    pub(crate) fn lex_identifier(&mut self) -> Token {
        let pos_start = self.cursor.position();
        let mut lexeme = String::new();

        while let Some(ch) = self.cursor.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                lexeme.push(ch);
                self.cursor.advance();
            } else {
                break;
            }
        }

        let kind = match Keyword::from_str(&lexeme) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier(Symbol::intern(&lexeme)),
        };

        Token::new(kind, pos_start, self.cursor.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoInterpolation;
    use peanut_util::SourceFile;

    fn lex_one(source: &str) -> TokenKind {
        let file = SourceFile::new("t", source);
        let mut interp = NoInterpolation;
        Lexer::new(&file, &mut interp)
            .tokenize()
            .expect("should lex")
            .remove(0)
            .kind
    }

    #[test]
    fn test_identifier() {
        assert_eq!(
            lex_one("my_var2"),
            TokenKind::Identifier(Symbol::intern("my_var2"))
        );
    }

    #[test]
    fn test_keyword() {
        assert_eq!(lex_one("while"), TokenKind::Keyword(Keyword::While));
        assert_eq!(lex_one("function"), TokenKind::Keyword(Keyword::Function));
    }

    #[test]
    fn test_keyword_prefix_stays_identifier() {
        assert_eq!(
            lex_one("whileLoop"),
            TokenKind::Identifier(Symbol::intern("whileLoop"))
        );
    }

    #[test]
    fn test_underscore_cannot_start() {
        // An identifier must start with a letter; a leading underscore is
        // not a recognized character.
        let file = SourceFile::new("t", "_x");
        let mut interp = NoInterpolation;
        let err = Lexer::new(&file, &mut interp).tokenize().unwrap_err();
        assert_eq!(err.details, "'_'");
    }
}
