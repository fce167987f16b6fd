//! Diagnostic module - Error and warning reporting.
//!
//! Peanut reports four diagnostic kinds: Illegal Character and Expected
//! Character from the lexer, Invalid Syntax from the parser, and Runtime
//! Error from the evaluator. All of them render with a caret span into the
//! offending source line; runtime errors prepend a traceback of the call
//! chain.
//!
//! Lexing and parsing are non-recoverable: the first diagnostic aborts the
//! phase, so diagnostics travel in `Result` errors rather than being
//! accumulated. Warnings never abort anything and are handed to the host as
//! plain messages.

use crate::span::Position;
use thiserror::Error;

/// Diagnostic kind, displayed as the leading error name.
///
/// # Examples
///
/// ```
/// use peanut_util::diagnostic::ErrorKind;
///
/// assert_eq!(format!("{}", ErrorKind::IllegalCharacter), "Illegal Character");
/// assert_eq!(format!("{}", ErrorKind::Runtime), "Runtime Error");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A byte the lexer does not recognize
    #[error("Illegal Character")]
    IllegalCharacter,

    /// A multi-character token cut short (`!` without `=`)
    #[error("Expected Character")]
    ExpectedCharacter,

    /// A token sequence the grammar does not accept
    #[error("Invalid Syntax")]
    InvalidSyntax,

    /// A failure during evaluation
    #[error("Runtime Error")]
    Runtime,
}

/// One frame of a runtime traceback.
///
/// Frames are recorded outermost-first: the program root comes first, the
/// context that raised the error last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceFrame {
    /// File name of the frame's entry position
    pub file: String,
    /// Line number of the frame's entry position (0-based, displayed 1-based)
    pub line: u32,
    /// Display name of the execution context
    pub display: String,
}

/// A fatal diagnostic with a source span.
///
/// Lexer and parser diagnostics render as
///
/// ```text
/// <name>: <details>
/// Trace: File <fn>, line <L>
///
/// <source line>
/// <caret span>
/// ```
///
/// Runtime diagnostics replace the single `Trace:` line with a full
/// traceback built from [`TraceFrame`]s.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Which kind of error this is
    pub kind: ErrorKind,
    /// Human-readable details
    pub details: String,
    /// Start of the offending span
    pub pos_start: Position,
    /// End of the offending span
    pub pos_end: Position,
    /// Call-chain frames, outermost first (runtime errors only)
    pub trace: Vec<TraceFrame>,
}

impl Diagnostic {
    /// Create a diagnostic of the given kind.
    pub fn new(
        kind: ErrorKind,
        details: impl Into<String>,
        pos_start: Position,
        pos_end: Position,
    ) -> Self {
        Self {
            kind,
            details: details.into(),
            pos_start,
            pos_end,
            trace: Vec::new(),
        }
    }

    /// An Illegal Character error.
    pub fn illegal_char(details: impl Into<String>, pos_start: Position, pos_end: Position) -> Self {
        Self::new(ErrorKind::IllegalCharacter, details, pos_start, pos_end)
    }

    /// An Expected Character error.
    pub fn expected_char(details: impl Into<String>, pos_start: Position, pos_end: Position) -> Self {
        Self::new(ErrorKind::ExpectedCharacter, details, pos_start, pos_end)
    }

    /// An Invalid Syntax error.
    pub fn invalid_syntax(details: impl Into<String>, pos_start: Position, pos_end: Position) -> Self {
        Self::new(ErrorKind::InvalidSyntax, details, pos_start, pos_end)
    }

    /// A Runtime Error with a traceback.
    pub fn runtime(
        details: impl Into<String>,
        pos_start: Position,
        pos_end: Position,
        trace: Vec<TraceFrame>,
    ) -> Self {
        Self {
            kind: ErrorKind::Runtime,
            details: details.into(),
            pos_start,
            pos_end,
            trace,
        }
    }

    /// True when this diagnostic came out of the evaluator.
    #[inline]
    pub fn is_runtime(&self) -> bool {
        self.kind == ErrorKind::Runtime
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_runtime() {
            writeln!(f, "Trace:")?;
            for frame in &self.trace {
                writeln!(
                    f,
                    "  File {}, line {}, in {}",
                    frame.file,
                    frame.line + 1,
                    frame.display
                )?;
            }
            write!(f, "{}: {}", self.kind, self.details)?;
        } else {
            write!(f, "{}: {}", self.kind, self.details)?;
            write!(
                f,
                "\nTrace: File {}, line {}",
                self.pos_start.file_name(),
                self.pos_start.ln + 1
            )?;
        }
        write!(
            f,
            "\n\n{}",
            self.pos_start
                .file
                .underline_span(&self.pos_start, &self.pos_end)
        )
    }
}

impl std::error::Error for Diagnostic {}

/// A non-fatal message for the host.
///
/// Warnings are emitted during evaluation (for example when `scoped` is used
/// at the root context) and never abort the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Warning {
    /// Human-readable details
    pub details: String,
}

impl Warning {
    /// Create a warning.
    pub fn new(details: impl Into<String>) -> Self {
        Self {
            details: details.into(),
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WARNING: {}", self.details)
    }
}
