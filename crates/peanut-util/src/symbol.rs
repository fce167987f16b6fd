//! String interning for identifiers and keywords.
//!
//! Source programs repeat the same names constantly: loop variables,
//! function names, built-in names. Interning stores one copy of each
//! distinct string in a process-wide table and hands out a `u32` index, so
//! name comparison is an integer compare and names are `Copy` everywhere in
//! the token stream, the AST and the symbol tables.
//!
//! The table is lock-free (DashMap keyed with ahash) and append-only;
//! interned strings are leaked to obtain `'static` references, which is
//! safe because the table lives for the whole process and entries are never
//! removed. Language keywords are pre-interned at initialization so they
//! have stable, predictable indices.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::LazyLock;

/// Keywords pre-interned with stable indices, in index order.
const KNOWN_SYMBOLS: &[&str] = &[
    // Declaration keywords
    "var", "let", "scoped", "strict",
    // Logical operators
    "and", "or", "not",
    // Control flow
    "if", "then", "elif", "else", "for", "until", "step", "while",
    "function", "end", "return", "continue", "break",
    // Type names accepted after `strict`
    "string", "int", "float",
];

/// Global string table, initialized on first use.
static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(|| {
    let table = StringTable::new();
    table.initialize_known_symbols();
    table
});

/// Append-only interning table.
///
/// Two maps are kept in step: string -> index for interning, and
/// index -> string for resolution. Both use ahash for fast lookups.
struct StringTable {
    /// Maps an interned string to its symbol index
    by_name: DashMap<&'static str, u32, ahash::RandomState>,
    /// Maps a symbol index back to its string
    by_index: DashMap<u32, &'static str, ahash::RandomState>,
    /// Next free index
    next_index: AtomicU32,
}

impl StringTable {
    fn new() -> Self {
        Self {
            by_name: DashMap::with_capacity_and_hasher(256, ahash::RandomState::new()),
            by_index: DashMap::with_capacity_and_hasher(256, ahash::RandomState::new()),
            next_index: AtomicU32::new(0),
        }
    }

    /// Pre-intern the known keywords so their indices are stable.
    fn initialize_known_symbols(&self) {
        for name in KNOWN_SYMBOLS {
            self.intern(name);
        }
    }

    fn intern(&self, name: &str) -> u32 {
        if let Some(index) = self.by_name.get(name) {
            return *index;
        }

        // Leak to get a 'static reference; the table lives for the whole
        // process and entries are never removed.
        let leaked: &'static str = Box::leak(name.to_owned().into_boxed_str());
        let index = *self
            .by_name
            .entry(leaked)
            .or_insert_with(|| self.next_index.fetch_add(1, Ordering::Relaxed));
        self.by_index.entry(index).or_insert(leaked);
        index
    }

    fn resolve(&self, index: u32) -> &'static str {
        self.by_index
            .get(&index)
            .map(|entry| *entry)
            .unwrap_or("<unknown symbol>")
    }
}

/// An interned string.
///
/// Symbols are 4 bytes, `Copy`, and compare by index. Two symbols are equal
/// exactly when their strings are equal.
///
/// # Examples
///
/// ```
/// use peanut_util::Symbol;
///
/// let a = Symbol::intern("counter");
/// let b = Symbol::intern("counter");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "counter");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// Intern a string, returning its symbol.
    pub fn intern(name: &str) -> Self {
        Self(STRING_TABLE.intern(name))
    }

    /// Get the interned string back.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        STRING_TABLE.resolve(self.0)
    }

    /// Raw table index.
    #[inline]
    pub const fn index(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

static_assertions::assert_impl_all!(Symbol: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_dedups() {
        let a = Symbol::intern("hello");
        let b = Symbol::intern("hello");
        let c = Symbol::intern("world");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_as_str_round_trip() {
        let sym = Symbol::intern("round_trip_name");
        assert_eq!(sym.as_str(), "round_trip_name");
    }

    #[test]
    fn test_keywords_pre_interned() {
        // Keywords were interned at initialization in KNOWN_SYMBOLS order.
        assert_eq!(Symbol::intern("var").index(), 0);
        assert_eq!(Symbol::intern("let").index(), 1);
        assert!(Symbol::intern("while").index() < KNOWN_SYMBOLS.len() as u32);
    }

    #[test]
    fn test_display() {
        let sym = Symbol::intern("shown");
        assert_eq!(format!("{sym}"), "shown");
        assert_eq!(format!("{sym:?}"), "Symbol(\"shown\")");
    }

    #[test]
    fn test_concurrent_interning() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| Symbol::intern("concurrent")))
            .collect();
        let symbols: Vec<Symbol> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(symbols.windows(2).all(|w| w[0] == w[1]));
    }
}
