//! Execution contexts and symbol tables.
//!
//! A [`Context`] names one execution frame (the program root, a function
//! call, a built-in call) and links to its parent frame, forming the chain
//! that runtime tracebacks are rendered from. Each context owns a symbol
//! table; child tables hold a shared reference to their parent table, so
//! name lookup walks outward toward the root.
//!
//! Three tables matter globally (see the runtime): the *global* table
//! (built-ins and `var`/`let`/`strict` bindings, shared with interpolation
//! sub-runs), the *locked* table (root-level `scoped` bindings, visible only
//! to root-context lookups), and the per-call tables created at each
//! function application.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use peanut_par::DeclaredType;
use peanut_util::{Position, Symbol};

use crate::value::Value;

/// One execution frame.
#[derive(Debug)]
pub struct Context {
    /// Name shown in tracebacks (`BASE_LEVEL_SCRIPT`, a function name, …)
    pub display_name: String,
    /// The frame that entered this one; `None` at the program root
    pub parent: Option<Rc<Context>>,
    /// Where in the parent this frame was entered (the call site)
    pub parent_entry_pos: Option<Position>,
    /// This frame's symbol table
    pub table: Rc<RefCell<SymbolTable>>,
}

impl Context {
    /// A root context over an existing table.
    pub fn root(display_name: impl Into<String>, table: Rc<RefCell<SymbolTable>>) -> Rc<Self> {
        Rc::new(Self {
            display_name: display_name.into(),
            parent: None,
            parent_entry_pos: None,
            table,
        })
    }

    /// A child context with a fresh table chained to `parent_table`.
    pub fn child(
        display_name: impl Into<String>,
        parent: &Rc<Context>,
        parent_entry_pos: Position,
        parent_table: &Rc<RefCell<SymbolTable>>,
    ) -> Rc<Self> {
        Rc::new(Self {
            display_name: display_name.into(),
            parent: Some(Rc::clone(parent)),
            parent_entry_pos: Some(parent_entry_pos),
            table: Rc::new(RefCell::new(SymbolTable::new(Some(Rc::clone(
                parent_table,
            ))))),
        })
    }

    /// True for the program-root context.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// One binding in a symbol table.
#[derive(Clone, Debug)]
pub struct SymbolEntry {
    /// The bound value
    pub value: Value,
    /// Bound with `var`/`let` (or `strict`)
    pub is_var: bool,
    /// Bound with `scoped`
    pub is_scoped: bool,
    /// Bound with `strict`
    pub is_strict: bool,
    /// Declared type of a `strict` binding
    pub declared: Option<DeclaredType>,
}

/// A name-to-binding map with a parent link.
///
/// Insertion order is preserved, which keeps table dumps and debugging
/// output deterministic.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: IndexMap<Symbol, SymbolEntry>,
    parent: Option<Rc<RefCell<SymbolTable>>>,
}

impl SymbolTable {
    /// A table chained to `parent` (or a root table).
    pub fn new(parent: Option<Rc<RefCell<SymbolTable>>>) -> Self {
        Self {
            symbols: IndexMap::new(),
            parent,
        }
    }

    /// Look up a binding, walking the parent chain.
    pub fn get(&self, name: Symbol) -> Option<SymbolEntry> {
        if let Some(entry) = self.symbols.get(&name) {
            return Some(entry.clone());
        }
        self.parent.as_ref().and_then(|p| p.borrow().get(name))
    }

    /// Look up a binding in this table only.
    pub fn get_local(&self, name: Symbol) -> Option<SymbolEntry> {
        self.symbols.get(&name).cloned()
    }

    /// Bind a plain value (not var/scoped/strict).
    pub fn set(&mut self, name: Symbol, value: Value) {
        self.set_entry(name, value, false, false, false, None);
    }

    /// Bind a value with its declaration flags.
    pub fn set_entry(
        &mut self,
        name: Symbol,
        value: Value,
        is_var: bool,
        is_scoped: bool,
        is_strict: bool,
        declared: Option<DeclaredType>,
    ) {
        self.symbols.insert(
            name,
            SymbolEntry {
                value,
                is_var,
                is_scoped,
                is_strict,
                declared,
            },
        );
    }

    /// The declared type of a strict binding in this table only.
    pub fn strict_type(&self, name: Symbol) -> Option<DeclaredType> {
        self.symbols
            .get(&name)
            .filter(|entry| entry.is_strict)
            .and_then(|entry| entry.declared)
    }

    /// Drop a binding from this table.
    pub fn remove(&mut self, name: Symbol) {
        self.symbols.shift_remove(&name);
    }

    /// Number of bindings in this table only.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True when this table holds no bindings of its own.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
