//! peanut-util - Core Utilities and Foundation Types
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! This crate provides the foundation types shared by every phase of the
//! Peanut interpreter: source positions, diagnostics, and interned symbols.
//!
//! SOURCE TRACKING:
//! ----------------
//! Peanut reports errors with a caret span into the offending source line
//! and, for runtime errors, a traceback of the call chain. To make that
//! possible anywhere in the pipeline, every token and AST node carries two
//! [`Position`] snapshots (start and end). A position records the byte
//! offset, 0-based line and 0-based column, plus a shared handle to the
//! [`SourceFile`] it points into, so a diagnostic can be rendered without
//! access to any other state. Interpolation fragments get their own
//! synthetic `SourceFile` named `INTERPOLATION`.
//!
//! DIAGNOSTICS:
//! ------------
//! Four kinds: Illegal Character and Expected Character (lexer), Invalid
//! Syntax (parser), Runtime Error (evaluator). Lexing and parsing are
//! non-recoverable in Peanut - the first diagnostic wins and aborts the
//! phase - so diagnostics travel inside `Result` errors rather than being
//! collected by a handler. Runtime errors additionally carry a list of
//! [`TraceFrame`]s describing the execution contexts entered between the
//! program root and the failure site.
//!
//! STRING INTERNING:
//! -----------------
//! Identifiers and keywords repeat constantly in source code. The
//! [`Symbol`] type maps each distinct string to a `u32` index into a
//! process-wide table, making name comparison an integer compare and the
//! symbol itself `Copy`. Keywords are pre-interned at table initialization
//! so they have stable indices. See the `symbol` module for details.

pub mod diagnostic;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, ErrorKind, TraceFrame, Warning};
pub use span::{Position, SourceFile};
pub use symbol::Symbol;
