//! Interned names.
//!
//! Method names, constant names and instance-variable names are interned once and
//! compared by handle afterwards.

use crate::value::{FastIndexSet, fast_hasher};

/// An interned string handle.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Symbol(u32);

impl Symbol {
    /// Create a symbol from a raw index.
    ///
    /// Only meaningful for indices previously handed out by an [`Interner`].
    pub fn from_raw(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// String interner for deduplicating names.
///
/// Symbols are indices into an insertion-ordered set, so resolving is a plain
/// index lookup and interning an existing name never allocates.
#[derive(Clone, Debug)]
pub struct Interner {
    names: FastIndexSet<Box<str>>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    pub fn new() -> Self {
        Self {
            names: FastIndexSet::with_hasher(fast_hasher()),
        }
    }

    /// Intern a string, returning its symbol.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(idx) = self.names.get_index_of(s) {
            return Symbol(idx as u32);
        }
        let (idx, _) = self.names.insert_full(Box::from(s));
        Symbol(idx as u32)
    }

    /// Look up a name without interning it.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.names.get_index_of(s).map(|idx| Symbol(idx as u32))
    }

    /// Resolve a symbol to its string.
    pub fn resolve(&self, symbol: Symbol) -> Option<&str> {
        self.names.get_index(symbol.0 as usize).map(|s| &**s)
    }

    pub fn contains(&self, s: &str) -> bool {
        self.names.contains(s)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
