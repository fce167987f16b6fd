//! The runtime: process-wide symbol tables and the pipeline entry point.
//!
//! A [`Runtime`] owns the two long-lived tables - the *global* table
//! (built-ins, the pre-bound constants, and every `var`/`let`/`strict`
//! binding) and the *locked* table (root-level `scoped` bindings) - and
//! drives source text through lex, parse and evaluation. It stays alive
//! across runs, so an interactive shell and `${…}` interpolation sub-runs
//! all see the same bindings.
//!
//! The runtime is also the implementation behind the two upstream seams:
//! [`Interpolate`] (the lexer hands it `${…}` fragments to evaluate) and
//! [`StrictBindings`] (the parser reads strict-declared types out of the
//! global table).

use std::cell::RefCell;
use std::rc::Rc;

use peanut_lex::{Interpolate, Lexer};
use peanut_par::{DeclaredType, Parser, StrictBindings};
use peanut_util::{Diagnostic, Position, SourceFile, Symbol, Warning};

use crate::builtins::BUILTINS;
use crate::context::{Context, SymbolTable};
use crate::flow::Flow;
use crate::interp::Interpreter;
use crate::value::{Number, Value, ValueKind};

/// Display name of the root execution context.
pub const ROOT_CONTEXT_NAME: &str = "BASE_LEVEL_SCRIPT";

/// Synthetic file name for interpolation sub-runs.
pub const INTERPOLATION_FILE: &str = "INTERPOLATION";

/// Process-wide interpreter state.
pub struct Runtime {
    /// Root-level `scoped` bindings; consulted only by root-context lookups
    pub(crate) locked: Rc<RefCell<SymbolTable>>,
    /// Built-ins, constants and `var`/`let`/`strict` bindings
    pub(crate) globals: Rc<RefCell<SymbolTable>>,
    /// Warnings emitted since the last [`Runtime::take_warnings`]
    warnings: Vec<Warning>,
}

impl Runtime {
    /// A runtime with the built-ins and pre-bound constants installed.
    pub fn new() -> Self {
        let runtime = Self {
            locked: Rc::new(RefCell::new(SymbolTable::new(None))),
            globals: Rc::new(RefCell::new(SymbolTable::new(None))),
            warnings: Vec::new(),
        };
        runtime.install_globals();
        runtime
    }

    /// Bind the constants and every built-in into the global table.
    fn install_globals(&self) {
        let file = SourceFile::new("<builtin>", "");
        let pos = Position::start(&file);
        let mut globals = self.globals.borrow_mut();
        let mut bind = |name: &str, kind: ValueKind| {
            globals.set(
                Symbol::intern(name),
                Value::new(kind, pos.clone(), pos.clone()),
            );
        };

        bind("NO_RETURN", ValueKind::Str(crate::value::NO_RETURN_TEXT.to_owned()));
        bind("ZERO", ValueKind::Number(Number::Int(0)));
        bind("FALSE_VALUE", ValueKind::Number(Number::Int(0)));
        bind("TRUE_VALUE", ValueKind::Number(Number::Int(1)));
        bind("false", ValueKind::Number(Number::Int(0)));
        bind("true", ValueKind::Number(Number::Int(1)));
        bind("INFINITY", ValueKind::Number(Number::Float(f64::INFINITY)));
        bind("NEGATIVE_INF", ValueKind::Number(Number::Float(f64::NEG_INFINITY)));

        for spec in BUILTINS {
            bind(spec.name, ValueKind::Builtin(spec));
        }
    }

    /// Run a program: lex, parse, evaluate against the global tables.
    ///
    /// Exactly one of value and error comes back. A `return`, `continue`
    /// or `break` that escapes to the root yields the no-return sentinel.
    pub fn run(&mut self, file_name: &str, source: &str) -> Result<Value, Diagnostic> {
        let file = SourceFile::new(file_name, source);

        let tokens = Lexer::new(&file, self).tokenize()?;
        let root = Parser::new(tokens, &*self).parse()?;

        let root_ctx = Context::root(ROOT_CONTEXT_NAME, Rc::clone(&self.globals));
        let mut interpreter = Interpreter { runtime: self };
        match interpreter.visit(&root, &root_ctx) {
            Flow::Value(value) => Ok(value),
            Flow::Error(diagnostic) => Err(*diagnostic),
            Flow::Return(_) | Flow::Continue | Flow::Break => {
                let pos = Position::start(&file);
                Ok(Value::no_return(pos.clone(), pos))
            }
        }
    }

    /// Record a warning and hand it to the host on stderr.
    pub(crate) fn emit_warning(&mut self, details: impl Into<String>) {
        let warning = Warning::new(details);
        eprintln!("{warning}");
        self.warnings.push(warning);
    }

    /// Warnings emitted so far.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Drain the recorded warnings.
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    /// Read a binding straight out of the global table (test/host hook).
    pub fn global(&self, name: &str) -> Option<Value> {
        self.globals
            .borrow()
            .get(Symbol::intern(name))
            .map(|entry| entry.value)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// `${…}` fragments re-enter the full pipeline against the global context
/// and splice the display form of their result.
impl Interpolate for Runtime {
    fn evaluate(&mut self, fragment: &str) -> Result<String, Diagnostic> {
        let value = self.run(INTERPOLATION_FILE, fragment)?;
        Ok(value.to_string())
    }
}

/// The parser's read-only view of strict-declared types.
impl StrictBindings for Runtime {
    fn strict_type(&self, name: Symbol) -> Option<DeclaredType> {
        self.globals.borrow().strict_type(name)
    }
}
