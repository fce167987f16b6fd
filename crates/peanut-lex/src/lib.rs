//! peanut-lex - Lexical Analyzer (Lexer/Tokenizer)
//!
//! ============================================================================
//! LEXICAL ANALYSIS
//! ============================================================================
//!
//! The lexer transforms Peanut source text into a stream of tokens. It is a
//! direct-coded scanner: each token class has its own lexing method and the
//! main loop dispatches on the current character.
//!
//! ```text
//! Source: var x = 42
//!
//! Tokens: [Keyword(Var)] [Identifier("x")] [Eq] [Int(42)] [Eof]
//!         (whitespace skipped)
//! ```
//!
//! TOKEN CATEGORIES:
//! -----------------
//! 1. KEYWORDS - var, let, scoped, strict, and, or, not, if, then, elif,
//!    else, for, until, step, while, function, end, return, continue, break.
//! 2. IDENTIFIERS - a letter followed by letters, digits or underscores.
//! 3. LITERALS - integers, floats (one dot), and double-quoted strings.
//! 4. OPERATORS & PUNCTUATION - + - * / ^ % ( ) [ ] { } , : ? plus the
//!    multi-character forms == => != <= >= and the bare = < >.
//! 5. SEPARATORS - `;` and line breaks both lex to NEWLINE; `#` starts a
//!    line comment that runs up to (but not through) the newline.
//!
//! STRING INTERPOLATION:
//! ---------------------
//! Inside a string literal, an unescaped `$` immediately followed by `{`
//! opens an interpolation fragment that runs to the matching `}` (braces do
//! not nest). The fragment is a full Peanut program: it is lexed, parsed and
//! evaluated against the *global* context, and the display form of its
//! result is spliced into the string.
//!
//! That re-entry is the one place the pipeline loops back on itself, so the
//! lexer does not call the evaluator directly. Instead it talks to the
//! [`Interpolate`] trait; the runtime implements it with the real pipeline,
//! and tests plug in stubs. Escapes: `\n`, `\t` and `\$` are recognized, any
//! other escaped character passes through unchanged. A lone `$` (not
//! followed by `{`) is an ordinary character.
//!
//! ERRORS:
//! -------
//! Lexing is non-recoverable: the first error aborts the scan. An
//! unrecognized character is an Illegal Character error; a `!` that is not
//! followed by `=` is an Expected Character error, as are unterminated
//! strings and interpolation fragments. Errors produced while evaluating an
//! interpolation fragment propagate unchanged (their spans point into the
//! synthetic `INTERPOLATION` source).

pub mod cursor;
mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{Keyword, Token, TokenKind};

use peanut_util::Diagnostic;

/// The interpolation seam.
///
/// `${…}` fragments re-enter the full lex/parse/evaluate pipeline against
/// the global context. The runtime crate implements this trait; the lexer
/// only knows that a fragment goes in and a display string (or a
/// diagnostic) comes out.
pub trait Interpolate {
    /// Evaluate an interpolation fragment and return the string to splice.
    fn evaluate(&mut self, fragment: &str) -> Result<String, Diagnostic>;
}

/// An [`Interpolate`] that splices fragments back verbatim.
///
/// Used where no runtime is available (benchmarks, lexer-only tooling and
/// tests that do not exercise interpolation).
#[derive(Debug, Default)]
pub struct NoInterpolation;

impl Interpolate for NoInterpolation {
    fn evaluate(&mut self, fragment: &str) -> Result<String, Diagnostic> {
        Ok(fragment.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peanut_util::{ErrorKind, SourceFile};

    fn lex(source: &str) -> Result<Vec<Token>, Diagnostic> {
        let file = SourceFile::new("test.peanut", source);
        let mut interp = NoInterpolation;
        Lexer::new(&file, &mut interp).tokenize()
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source)
            .expect("source should lex")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_arithmetic_statement() {
        assert_eq!(
            kinds("var a = 2 + 3 * 4"),
            vec![
                TokenKind::Keyword(Keyword::Var),
                TokenKind::Identifier(peanut_util::Symbol::intern("a")),
                TokenKind::Eq,
                TokenKind::Int(2),
                TokenKind::Plus,
                TokenKind::Int(3),
                TokenKind::Mul,
                TokenKind::Int(4),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_newline_and_semicolon_both_separate() {
        let kinds = kinds("1;2\n3");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Int(2),
                TokenKind::Newline,
                TokenKind::Int(3),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comment_keeps_newline_separator() {
        assert_eq!(
            kinds("1 # everything after the hash is skipped\n2"),
            vec![
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Int(2),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comment_at_end_of_input() {
        assert_eq!(kinds("1 # no trailing newline"), vec![TokenKind::Int(1), TokenKind::Eof]);
    }

    #[test]
    fn test_multi_char_operators() {
        assert_eq!(
            kinds("== != <= >= => = < >"),
            vec![
                TokenKind::Ee,
                TokenKind::Ne,
                TokenKind::Lte,
                TokenKind::Gte,
                TokenKind::Arrow,
                TokenKind::Eq,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_illegal_character() {
        let err = lex("var a = @").unwrap_err();
        assert_eq!(err.kind, ErrorKind::IllegalCharacter);
        assert_eq!(err.details, "'@'");
    }

    #[test]
    fn test_bare_bang_is_expected_char_error() {
        let err = lex("1 ! 2").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExpectedCharacter);
        assert_eq!(err.details, "'=' (after '!')");
    }

    #[test]
    fn test_token_positions_are_ordered_and_share_the_file() {
        let tokens = lex("var abc = [1, 2]\nprint(abc)").unwrap();
        for token in &tokens {
            assert!(token.pos_start.idx <= token.pos_end.idx);
            assert_eq!(token.pos_start.file_name(), token.pos_end.file_name());
        }
        // Tokens appear in source order.
        assert!(tokens
            .windows(2)
            .all(|w| w[0].pos_start.idx <= w[1].pos_start.idx));
    }
}
