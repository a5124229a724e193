//! Symbol resolution for the compiler.
//!
//! Tables nest per function scope. Resolving a name that lives in an
//! enclosing *local* scope records a capture: the original symbol is
//! appended to this table's `free_symbols` (in order of first capture)
//! and a `Free`-scoped symbol is handed back. `free_symbols` later
//! becomes the closure's capture vector, so its order is part of the
//! calling convention. Globals and builtins resolve without capture.

use std::rc::Rc;

use ahash::AHashMap;
use strum::IntoEnumIterator;

use crate::builtins::Builtin;

/// Where a resolved name lives at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolScope {
    Global,
    Local,
    Builtin,
    Free,
}

/// A resolved name: its scope decides the load/store opcode, its index
/// the operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: Rc<str>,
    pub scope: SymbolScope,
    pub index: usize,
}

/// One scope's definitions plus a link to the enclosing scope.
#[derive(Debug, Default)]
pub struct SymbolTable {
    outer: Option<Box<SymbolTable>>,
    store: AHashMap<Rc<str>, Symbol>,
    /// Dense count of Global/Local definitions in this table; becomes the
    /// compiled function's `num_locals`.
    pub num_definitions: usize,
    /// Original symbols captured from enclosing scopes, in first-capture
    /// order.
    pub free_symbols: Vec<Symbol>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh global table with every built-in pre-registered at its
    /// fixed index.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        for builtin in Builtin::iter() {
            table.define_builtin(usize::from(builtin.index()), builtin.into());
        }
        table
    }

    /// A function-scope table nested inside `outer`.
    #[must_use]
    pub fn enclosed(outer: Self) -> Self {
        Self {
            outer: Some(Box::new(outer)),
            ..Self::default()
        }
    }

    /// Unwraps back to the enclosing table when a function scope ends.
    #[must_use]
    pub fn into_outer(self) -> Option<Self> {
        self.outer.map(|outer| *outer)
    }

    /// True for the top-level table.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.outer.is_none()
    }

    /// Defines `name` at the next dense index of this table.
    pub fn define(&mut self, name: &str) -> Symbol {
        let scope = if self.is_global() {
            SymbolScope::Global
        } else {
            SymbolScope::Local
        };
        let symbol = Symbol {
            name: Rc::from(name),
            scope,
            index: self.num_definitions,
        };
        self.num_definitions += 1;
        self.store.insert(symbol.name.clone(), symbol.clone());
        symbol
    }

    /// Registers a built-in at its caller-supplied index.
    pub fn define_builtin(&mut self, index: usize, name: &str) -> Symbol {
        let symbol = Symbol {
            name: Rc::from(name),
            scope: SymbolScope::Builtin,
            index,
        };
        self.store.insert(symbol.name.clone(), symbol.clone());
        symbol
    }

    /// Resolves `name` here or in an ancestor, capturing enclosing locals
    /// as free variables along the way.
    pub fn resolve(&mut self, name: &str) -> Option<Symbol> {
        if let Some(symbol) = self.store.get(name) {
            return Some(symbol.clone());
        }
        let resolved = self.outer.as_mut()?.resolve(name)?;
        match resolved.scope {
            SymbolScope::Global | SymbolScope::Builtin => Some(resolved),
            SymbolScope::Local | SymbolScope::Free => Some(self.define_free(resolved)),
        }
    }

    fn define_free(&mut self, original: Symbol) -> Symbol {
        let symbol = Symbol {
            name: original.name.clone(),
            scope: SymbolScope::Free,
            index: self.free_symbols.len(),
        };
        self.free_symbols.push(original);
        self.store.insert(symbol.name.clone(), symbol.clone());
        symbol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(name: &str, scope: SymbolScope, index: usize) -> Symbol {
        Symbol {
            name: Rc::from(name),
            scope,
            index,
        }
    }

    #[test]
    fn define_allocates_dense_indices_per_scope() {
        let mut global = SymbolTable::new();
        assert_eq!(global.define("a"), symbol("a", SymbolScope::Global, 0));
        assert_eq!(global.define("b"), symbol("b", SymbolScope::Global, 1));

        let mut local = SymbolTable::enclosed(global);
        assert_eq!(local.define("c"), symbol("c", SymbolScope::Local, 0));
        assert_eq!(local.define("d"), symbol("d", SymbolScope::Local, 1));

        let mut nested = SymbolTable::enclosed(local);
        assert_eq!(nested.define("e"), symbol("e", SymbolScope::Local, 0));
    }

    #[test]
    fn globals_resolve_without_capture() {
        let mut global = SymbolTable::new();
        global.define("a");
        let mut local = SymbolTable::enclosed(global);
        local.define("c");

        assert_eq!(local.resolve("a"), Some(symbol("a", SymbolScope::Global, 0)));
        assert_eq!(local.resolve("c"), Some(symbol("c", SymbolScope::Local, 0)));
        assert!(local.free_symbols.is_empty());
    }

    #[test]
    fn enclosing_locals_become_free_symbols() {
        let mut global = SymbolTable::new();
        global.define("a");
        let mut outer = SymbolTable::enclosed(global);
        outer.define("c");
        outer.define("d");
        let mut inner = SymbolTable::enclosed(outer);
        inner.define("e");

        assert_eq!(inner.resolve("d"), Some(symbol("d", SymbolScope::Free, 0)));
        assert_eq!(inner.resolve("c"), Some(symbol("c", SymbolScope::Free, 1)));
        // Original symbols are recorded in first-capture order.
        assert_eq!(
            inner.free_symbols,
            vec![symbol("d", SymbolScope::Local, 1), symbol("c", SymbolScope::Local, 0)]
        );
        // Globals still resolve without capture.
        assert_eq!(inner.resolve("a"), Some(symbol("a", SymbolScope::Global, 0)));
        assert_eq!(inner.free_symbols.len(), 2);
        // Resolving again reuses the recorded capture.
        assert_eq!(inner.resolve("d"), Some(symbol("d", SymbolScope::Free, 0)));
        assert_eq!(inner.free_symbols.len(), 2);
    }

    #[test]
    fn free_variables_chain_through_intermediate_scopes() {
        let mut outer = SymbolTable::enclosed(SymbolTable::new());
        outer.define("a");
        let middle = SymbolTable::enclosed(outer);
        let mut inner = SymbolTable::enclosed(middle);

        // Resolving from the innermost scope threads the capture through
        // the middle scope: the middle table records the original local,
        // the inner table records the middle's Free symbol.
        let resolved = inner.resolve("a").unwrap();
        assert_eq!(resolved.scope, SymbolScope::Free);
        assert_eq!(resolved.index, 0);
        assert_eq!(inner.free_symbols, vec![symbol("a", SymbolScope::Free, 0)]);

        let middle = inner.into_outer().unwrap();
        assert_eq!(middle.free_symbols, vec![symbol("a", SymbolScope::Local, 0)]);
        let outer = middle.into_outer().unwrap();
        assert!(outer.free_symbols.is_empty());
    }

    #[test]
    fn builtins_resolve_at_any_depth_without_capture() {
        let mut global = SymbolTable::with_builtins();
        assert_eq!(global.resolve("len"), Some(symbol("len", SymbolScope::Builtin, 0)));
        let mut nested = SymbolTable::enclosed(SymbolTable::enclosed(global));
        assert_eq!(nested.resolve("puts"), Some(symbol("puts", SymbolScope::Builtin, 5)));
        assert!(nested.free_symbols.is_empty());
    }
}
