//! A single lexical scope

use crate::error::{SymbolError, SymbolResult};
use crate::symbol::Symbol;
use rustc_hash::FxHashMap;

/// Kind of scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Program-level bindings, alive for the whole run
    Global,
    /// Function or procedure activation
    Call,
    /// Nested block
    Block,
}

/// Name to symbol bindings of one block or call
#[derive(Debug)]
pub struct Scope {
    /// Kind of scope
    pub kind: ScopeKind,
    symbols: FxHashMap<String, Symbol>,
}

impl Scope {
    /// Create an empty scope
    #[must_use]
    pub fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            symbols: FxHashMap::default(),
        }
    }

    /// Empty call scope
    #[must_use]
    pub fn call() -> Self {
        Self::new(ScopeKind::Call)
    }

    /// Empty block scope
    #[must_use]
    pub fn block() -> Self {
        Self::new(ScopeKind::Block)
    }

    /// Bind `symbol` under its declared name
    ///
    /// # Errors
    ///
    /// Returns `DuplicateDeclaration` if the name is already bound here.
    pub fn insert(&mut self, symbol: Symbol) -> SymbolResult<()> {
        if let Some(existing) = self.symbols.get(symbol.name()) {
            return Err(SymbolError::DuplicateDeclaration {
                name: symbol.name().to_string(),
                first: existing.line(),
                second: symbol.line(),
            });
        }
        self.symbols.insert(symbol.name().to_string(), symbol);
        Ok(())
    }

    /// Symbol bound to `name` in this scope only
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Mutable symbol bound to `name` in this scope only
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Symbol> {
        self.symbols.get_mut(name)
    }

    /// Unbind `name`, returning its symbol
    pub fn remove(&mut self, name: &str) -> Option<Symbol> {
        self.symbols.remove(name)
    }

    /// Whether `name` is bound here
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Number of bindings
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether nothing is bound
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Bound names in sorted order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.symbols.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Drop every binding
    pub fn clear(&mut self) {
        self.symbols.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Variable;
    use crate::ty::Type;
    use ps_span::Line;

    #[test]
    fn test_duplicate_in_same_scope() {
        let mut scope = Scope::block();
        scope
            .insert(Variable::new("x", Type::Integer, Line::new(1)).into())
            .unwrap();
        let err = scope
            .insert(Variable::new("x", Type::Real, Line::new(2)).into())
            .unwrap_err();
        assert!(matches!(
            err,
            SymbolError::DuplicateDeclaration { first, second, .. }
                if first == Line::new(1) && second == Line::new(2)
        ));
        assert_eq!(scope.get("x").and_then(Symbol::declared_type), Some(&Type::Integer));
    }

    #[test]
    fn test_names_sorted() {
        let mut scope = Scope::call();
        for name in ["b", "c", "a"] {
            scope
                .insert(Variable::new(name, Type::Boolean, Line::new(1)).into())
                .unwrap();
        }
        assert_eq!(scope.names(), ["a", "b", "c"]);
        assert!(scope.remove("b").is_some());
        assert!(!scope.contains("b"));
        assert_eq!(scope.len(), 2);
    }
}
