//! peanut-interp - Tree-Walking Evaluator
//!
//! ============================================================================
//! EVALUATION MODEL
//! ============================================================================
//!
//! The evaluator walks the AST directly - no bytecode, no IR. Each node
//! kind has a visitor, and every visitor returns the same unified result
//! channel ([`Flow`]): a normal value, a runtime error, a function return,
//! or a loop continue/break. Composite visitors propagate any non-value
//! state immediately; loops intercept continue/break, and the function
//! call boundary consumes returns. That single channel is how `return`,
//! `continue` and `break` short-circuit through arbitrarily nested
//! expressions without exceptions or unwinding.
//!
//! VALUES:
//! -------
//! Dynamically typed: Number (integer or double), String, Array, Bool,
//! Function and BuiltIn. Operators dispatch over kind pairs with an
//! "Illegal operation" default (see the `value` module table). Values are
//! copied out of symbol tables on lookup and repositioned to the access
//! site, so runtime errors always point at the code that used the value.
//!
//! SCOPE MODEL:
//! ------------
//! Three tables cooperate (see the `runtime` and `context` modules):
//!
//! - the *global* table: built-ins, pre-bound constants, and every
//!   `var`/`let`/`strict` binding - `var` binds globally even inside a
//!   function body;
//! - the *locked* table: `scoped` bindings made at the root context, which
//!   only root-context lookups can see (with a redundancy warning);
//! - *per-call* tables: one per function application, chained to the
//!   callee's captured table, holding parameters, `scoped` bindings and
//!   named inner functions.
//!
//! Lookup walks the current chain, consults the locked table at the root,
//! and finally falls back to the global table for non-scoped bindings.
//!
//! RE-ENTRY:
//! ---------
//! The [`Runtime`] is the pipeline's entry point and stays alive across
//! runs. It implements the lexer's `Interpolate` seam (so `${…}` fragments
//! evaluate against the same global table, under the synthetic file name
//! `INTERPOLATION`) and the parser's `StrictBindings` seam (so `strict`
//! redeclarations are checked against the live global table at parse
//! time). The `run` and `use` built-ins re-enter the same pipeline for
//! script files.

mod builtins;
mod context;
mod flow;
mod interp;
mod runtime;
mod value;

pub use builtins::{registry, BuiltinCall, BuiltinFn, BuiltinSpec, BUILTINS};
pub use context::{Context, SymbolEntry, SymbolTable};
pub use flow::Flow;
pub use interp::Interpreter;
pub use runtime::{Runtime, INTERPOLATION_FILE, ROOT_CONTEXT_NAME};
pub use value::{display_value, FuncValue, Number, Value, ValueKind, NO_RETURN_TEXT};
