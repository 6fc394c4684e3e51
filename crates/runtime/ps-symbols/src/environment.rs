//! Scope stack and name resolution
//!
//! The environment owns one global scope plus a stack of block and call
//! scopes. Resolution walks the stack from the innermost scope outwards and
//! falls back to the global scope; the first binding found wins, so an inner
//! declaration shadows any outer one with the same name.

use crate::config::RuntimeConfig;
use crate::error::{SymbolError, SymbolResult};
use crate::scope::{Scope, ScopeKind};
use crate::symbol::{FileHandle, FileMode, Symbol, SymbolKind, TypeDefKind};
use crate::ty::{Type, TypeChecker};
use crate::value::Value;
use indexmap::IndexMap;
use ps_span::Line;
use ps_vfs::FileStore;

/// Where a name resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Index into the stack, 0 being the outermost pushed scope
    Stack(usize),
    Global,
}

/// Checker that compares against the expansion of one declared type
///
/// Values are checked against `expanded` wherever the wrapped symbol asks for
/// `declared`; every other type is passed through unchanged.
struct AliasView<'checker> {
    inner: &'checker dyn TypeChecker,
    expansion: Option<(Type, Type)>,
}

impl TypeChecker for AliasView<'_> {
    fn matches(&self, value: &Value, declared: &Type) -> bool {
        match &self.expansion {
            Some((named, expanded)) if named == declared => self.inner.matches(value, expanded),
            _ => self.inner.matches(value, declared),
        }
    }

    fn describe(&self, value: &Value) -> String {
        self.inner.describe(value)
    }
}

/// Runtime binding state, owned by the evaluator
#[derive(Debug)]
pub struct Environment {
    global: Scope,
    /// Innermost scope last
    scopes: Vec<Scope>,
    enforce_constants: bool,
}

impl Environment {
    /// Create an environment with only an empty global scope
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&RuntimeConfig::default())
    }

    /// Create an empty environment honouring `config`
    #[must_use]
    pub fn with_config(config: &RuntimeConfig) -> Self {
        Self {
            global: Scope::new(ScopeKind::Global),
            scopes: Vec::new(),
            enforce_constants: config.enforce_constants,
        }
    }

    /// Make `scope` the innermost scope
    pub fn push(&mut self, scope: Scope) {
        log::trace!("push {:?} scope at depth {}", scope.kind, self.scopes.len() + 1);
        self.scopes.push(scope);
    }

    /// Remove and return the innermost scope
    ///
    /// # Errors
    ///
    /// Returns `EmptyStack` if no scope has been pushed; the global scope is
    /// never popped.
    pub fn pop(&mut self) -> SymbolResult<Scope> {
        let scope = self.scopes.pop().ok_or(SymbolError::EmptyStack)?;
        log::trace!("pop {:?} scope with {} binding(s)", scope.kind, scope.len());
        Ok(scope)
    }

    /// Number of pushed scopes, not counting the global scope
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// The global scope
    #[must_use]
    pub const fn global(&self) -> &Scope {
        &self.global
    }

    /// The scope new declarations go into
    #[must_use]
    pub fn current(&self) -> &Scope {
        self.scopes.last().unwrap_or(&self.global)
    }

    fn current_mut(&mut self) -> &mut Scope {
        self.scopes.last_mut().unwrap_or(&mut self.global)
    }

    /// Bind `symbol` in the current scope under its declared name
    ///
    /// Only the current scope is checked for an existing binding, so a name
    /// from an outer scope may be shadowed.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateDeclaration` if the current scope already binds the
    /// name.
    pub fn declare(&mut self, symbol: impl Into<Symbol>) -> SymbolResult<()> {
        let symbol = symbol.into();
        log::trace!("declare {} '{}' at depth {}", symbol.kind(), symbol.name(), self.depth());
        self.current_mut().insert(symbol)
    }

    fn locate(&self, name: &str) -> Option<Slot> {
        self.scopes
            .iter()
            .rposition(|scope| scope.contains(name))
            .map(Slot::Stack)
            .or_else(|| self.global.contains(name).then_some(Slot::Global))
    }

    fn scope(&self, slot: Slot) -> &Scope {
        match slot {
            Slot::Stack(idx) => &self.scopes[idx],
            Slot::Global => &self.global,
        }
    }

    fn scope_mut(&mut self, slot: Slot) -> &mut Scope {
        match slot {
            Slot::Stack(idx) => &mut self.scopes[idx],
            Slot::Global => &mut self.global,
        }
    }

    fn not_found(name: &str) -> SymbolError {
        SymbolError::SymbolNotFound {
            name: name.to_string(),
        }
    }

    /// Resolve `name` innermost first, then in the global scope
    ///
    /// # Errors
    ///
    /// Returns `SymbolNotFound` if no scope binds the name.
    pub fn lookup(&self, name: &str) -> SymbolResult<&Symbol> {
        self.locate(name)
            .and_then(|slot| self.scope(slot).get(name))
            .ok_or_else(|| Self::not_found(name))
    }

    /// Mutable form of [`Environment::lookup`]
    ///
    /// # Errors
    ///
    /// Returns `SymbolNotFound` if no scope binds the name.
    pub fn lookup_mut(&mut self, name: &str) -> SymbolResult<&mut Symbol> {
        let slot = self.locate(name).ok_or_else(|| Self::not_found(name))?;
        self.scope_mut(slot)
            .get_mut(name)
            .ok_or_else(|| Self::not_found(name))
    }

    /// Unbind the binding `name` resolves to
    ///
    /// # Errors
    ///
    /// Returns `SymbolNotFound` if no scope binds the name.
    pub fn remove(&mut self, name: &str) -> SymbolResult<Symbol> {
        let slot = self.locate(name).ok_or_else(|| Self::not_found(name))?;
        self.scope_mut(slot)
            .remove(name)
            .ok_or_else(|| Self::not_found(name))
    }

    /// Whether `name` resolves in any scope
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.locate(name).is_some()
    }

    /// Drop every pushed scope and every global binding
    pub fn reset(&mut self) {
        log::debug!(
            "reset environment: dropping {} scope(s) and {} global binding(s)",
            self.scopes.len(),
            self.global.len()
        );
        self.scopes.clear();
        self.global.clear();
    }

    /// Type-checked assignment to the binding `name` resolves to
    ///
    /// Plain type aliases in the declared type are expanded first, so a
    /// variable declared as `Age` accepts whatever `Age` stands for.
    /// Constants are rejected unless the environment was configured not to
    /// enforce them.
    ///
    /// # Errors
    ///
    /// Returns `SymbolNotFound` for unbound names, `CyclicTypeAlias` if the
    /// declared type never bottoms out, and any error of
    /// [`Symbol::set_value`].
    pub fn assign(&mut self, name: &str, value: Value, checker: &dyn TypeChecker, line: Line) -> SymbolResult<()> {
        let view = self.alias_view(name, checker, line)?;
        let enforce_constants = self.enforce_constants;
        let symbol = self.lookup_mut(name)?;
        if enforce_constants {
            symbol.set_value(value, &view, line)
        } else {
            symbol.initialize(value, &view, line)
        }
    }

    /// Wrap `checker` so the declared type of `name` is checked in expanded
    /// form
    fn alias_view<'checker>(
        &self,
        name: &str,
        checker: &'checker dyn TypeChecker,
        line: Line,
    ) -> SymbolResult<AliasView<'checker>> {
        let expansion = match self.lookup(name)?.declared_type() {
            Some(declared) => {
                let expanded = self.expand_type(declared, line)?;
                (expanded != *declared).then(|| (declared.clone(), expanded))
            }
            None => None,
        };
        Ok(AliasView {
            inner: checker,
            expansion,
        })
    }

    /// Replace every plain type alias inside `ty` with what it stands for
    ///
    /// Names bound to record, enumeration or pointer types are nominal and
    /// stay as they are, as do names that resolve to nothing.
    ///
    /// # Errors
    ///
    /// Returns `CyclicTypeAlias` if an alias expands back into itself.
    pub fn expand_type(&self, ty: &Type, line: Line) -> SymbolResult<Type> {
        self.expand_aliases(ty, line, &mut Vec::new())
    }

    fn expand_aliases<'env>(
        &'env self,
        ty: &'env Type,
        line: Line,
        expanding: &mut Vec<&'env str>,
    ) -> SymbolResult<Type> {
        match ty {
            Type::Named(name) => {
                let alias = self
                    .lookup(name)
                    .ok()
                    .and_then(Symbol::as_type_def)
                    .filter(|def| def.kind() == TypeDefKind::Plain);
                let Some(def) = alias else {
                    return Ok(ty.clone());
                };
                if expanding.contains(&name.as_str()) {
                    return Err(SymbolError::CyclicTypeAlias {
                        name: name.clone(),
                        line,
                    });
                }
                expanding.push(name);
                let expanded = self.expand_aliases(def.descriptor(), line, expanding)?;
                expanding.pop();
                Ok(expanded)
            }
            Type::Array {
                dimensions,
                element,
            } => Ok(Type::Array {
                dimensions: dimensions.clone(),
                element: Box::new(self.expand_aliases(element, line, expanding)?),
            }),
            Type::Composite(fields) => fields
                .iter()
                .map(|(field, field_ty)| -> SymbolResult<(String, Type)> {
                    Ok((field.clone(), self.expand_aliases(field_ty, line, expanding)?))
                })
                .collect::<SymbolResult<IndexMap<_, _>>>()
                .map(Type::Composite),
            Type::Pointer(target) => Ok(Type::Pointer(Box::new(self.expand_aliases(target, line, expanding)?))),
            Type::Integer | Type::Real | Type::Char | Type::String | Type::Boolean | Type::Enum(_) => Ok(ty.clone()),
        }
    }

    fn kind_mismatch(symbol: &Symbol, expected: SymbolKind, line: Line) -> SymbolError {
        SymbolError::KindMismatch {
            name: symbol.name().to_string(),
            expected,
            found: symbol.kind(),
            line,
        }
    }

    /// Read an element of the array `name` resolves to
    ///
    /// # Errors
    ///
    /// Returns `SymbolNotFound`, `KindMismatch` when the name is not an array,
    /// and any error of [`crate::ArraySymbol::get`].
    pub fn read_element(&self, name: &str, indices: &[i64], line: Line) -> SymbolResult<&Value> {
        let symbol = self.lookup(name)?;
        let array = symbol
            .as_array()
            .ok_or_else(|| Self::kind_mismatch(symbol, SymbolKind::Array, line))?;
        array.get(indices, line)
    }

    /// Type-checked write to an element of the array `name` resolves to
    ///
    /// Plain aliases in the element type are expanded as in
    /// [`Environment::assign`].
    ///
    /// # Errors
    ///
    /// Returns `SymbolNotFound`, `KindMismatch` when the name is not an array,
    /// and any error of [`crate::ArraySymbol::set`].
    pub fn assign_element(
        &mut self,
        name: &str,
        indices: &[i64],
        value: Value,
        checker: &dyn TypeChecker,
        line: Line,
    ) -> SymbolResult<()> {
        let view = self.alias_view(name, checker, line)?;
        match self.lookup_mut(name)? {
            Symbol::Array(array) => array.set(indices, value, &view, line),
            other => Err(Self::kind_mismatch(other, SymbolKind::Array, line)),
        }
    }

    /// Expand a named type to its structural descriptor
    ///
    /// # Errors
    ///
    /// Returns `SymbolNotFound` for unbound names and `KindMismatch` when the
    /// name is bound to something other than a type.
    pub fn resolve_type(&self, name: &str, line: Line) -> SymbolResult<&Type> {
        let symbol = self.lookup(name)?;
        symbol
            .as_type_def()
            .map(|def| def.descriptor())
            .ok_or_else(|| Self::kind_mismatch(symbol, SymbolKind::TypeDef, line))
    }

    /// Open `name` in `mode` and bind the handle in the current scope
    ///
    /// # Errors
    ///
    /// Returns any error of [`FileHandle::open`], or `DuplicateDeclaration`
    /// if the file is already open in the current scope.
    pub fn open_file(&mut self, name: &str, mode: FileMode, store: &dyn FileStore, line: Line) -> SymbolResult<()> {
        if let Some(existing) = self.current().get(name) {
            return Err(SymbolError::DuplicateDeclaration {
                name: name.to_string(),
                first: existing.line(),
                second: line,
            });
        }
        let handle = FileHandle::open(name, mode, store, line)?;
        self.declare(handle)
    }

    /// The open file handle `name` resolves to
    ///
    /// # Errors
    ///
    /// Returns `SymbolNotFound` for unbound names and `KindMismatch` when the
    /// name is not a file.
    pub fn file_mut(&mut self, name: &str, line: Line) -> SymbolResult<&mut FileHandle> {
        match self.lookup_mut(name)? {
            Symbol::File(file) => Ok(file),
            other => Err(Self::kind_mismatch(other, SymbolKind::File, line)),
        }
    }

    /// Close the file handle `name` resolves to
    ///
    /// # Errors
    ///
    /// Returns `SymbolNotFound` for unbound names and `KindMismatch` when the
    /// name is not a file; a non-file binding is left in place.
    pub fn close_file(&mut self, name: &str, line: Line) -> SymbolResult<FileHandle> {
        let symbol = self.lookup(name)?;
        if symbol.kind() != SymbolKind::File {
            return Err(Self::kind_mismatch(symbol, SymbolKind::File, line));
        }
        match self.remove(name)? {
            Symbol::File(file) => {
                log::debug!("closed file '{name}' at {line}");
                Ok(file)
            }
            other => Err(Self::kind_mismatch(&other, SymbolKind::File, line)),
        }
    }

    /// Describe every binding of the current scope, in name order
    ///
    /// Each description is also logged at debug level. The text is meant for
    /// people, not for parsing.
    pub fn dump(&self) -> Vec<String> {
        let scope = self.current();
        log::debug!("Variables ({:?} scope, depth {}):", scope.kind, self.depth());
        scope
            .names()
            .into_iter()
            .filter_map(|name| scope.get(name))
            .map(|symbol| {
                let text = symbol.to_string();
                log::debug!("{text}");
                text
            })
            .collect()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{ArraySymbol, TypeDefSymbol, Variable};
    use crate::ty::{BuiltinTypeChecker, Dimension};
    use expect_test::expect;
    use std::ptr;

    fn int_var(name: &str, line: u32) -> Variable {
        Variable::new(name, Type::Integer, Line::new(line))
    }

    #[test]
    fn test_declare_then_lookup() {
        let mut env = Environment::new();
        env.declare(int_var("x", 1)).unwrap();
        let symbol = env.lookup("x").unwrap();
        assert_eq!(symbol.name(), "x");
        assert_eq!(symbol.line(), Line::new(1));
        assert!(ptr::eq(symbol, env.global().get("x").unwrap()));
    }

    #[test]
    fn test_shadowing_and_pop() {
        let checker = BuiltinTypeChecker;
        let mut env = Environment::new();
        env.push(Scope::block());
        env.declare(int_var("x", 1)).unwrap();
        env.assign("x", Value::Integer(1), &checker, Line::new(1)).unwrap();

        env.push(Scope::block());
        env.declare(int_var("x", 2)).unwrap();
        env.assign("x", Value::Integer(2), &checker, Line::new(2)).unwrap();
        assert_eq!(env.lookup("x").unwrap().value(), Some(&Value::Integer(2)));

        let inner = env.pop().unwrap();
        assert!(inner.contains("x"));
        assert_eq!(env.lookup("x").unwrap().value(), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_duplicate_only_in_target_scope() {
        let mut env = Environment::new();
        env.declare(int_var("n", 1)).unwrap();
        assert!(matches!(
            env.declare(int_var("n", 2)),
            Err(SymbolError::DuplicateDeclaration { .. })
        ));

        env.push(Scope::call());
        env.declare(int_var("n", 3)).unwrap();
        assert_eq!(env.lookup("n").unwrap().line(), Line::new(3));
    }

    #[test]
    fn test_global_fallback() {
        let mut env = Environment::new();
        env.declare(int_var("g", 1)).unwrap();
        env.push(Scope::call());
        env.push(Scope::block());
        assert!(env.exists("g"));
        assert_eq!(env.lookup("g").unwrap().line(), Line::new(1));
        assert!(!env.exists("missing"));
        assert!(matches!(
            env.lookup("missing"),
            Err(SymbolError::SymbolNotFound { ref name }) if name == "missing"
        ));
    }

    #[test]
    fn test_pop_empty_stack() {
        let mut env = Environment::new();
        env.declare(int_var("g", 1)).unwrap();
        assert!(matches!(env.pop(), Err(SymbolError::EmptyStack)));
        assert!(env.exists("g"));
    }

    #[test]
    fn test_remove_innermost_first() {
        let mut env = Environment::new();
        env.declare(int_var("v", 1)).unwrap();
        env.push(Scope::block());
        env.declare(int_var("v", 2)).unwrap();

        assert_eq!(env.remove("v").unwrap().line(), Line::new(2));
        assert_eq!(env.lookup("v").unwrap().line(), Line::new(1));
        assert_eq!(env.remove("v").unwrap().line(), Line::new(1));
        assert!(matches!(env.remove("v"), Err(SymbolError::SymbolNotFound { .. })));
    }

    #[test]
    fn test_reset() {
        let mut env = Environment::new();
        env.declare(int_var("a", 1)).unwrap();
        env.push(Scope::block());
        env.declare(int_var("b", 2)).unwrap();

        env.reset();
        assert_eq!(env.depth(), 0);
        assert!(matches!(env.lookup("a"), Err(SymbolError::SymbolNotFound { .. })));
        assert!(matches!(env.lookup("b"), Err(SymbolError::SymbolNotFound { .. })));
    }

    #[test]
    fn test_constants_respect_config() {
        let checker = BuiltinTypeChecker;
        let limit = || Variable::constant("Limit", Type::Integer, Value::Integer(10), &checker, Line::new(1)).unwrap();

        let mut strict = Environment::new();
        strict.declare(limit()).unwrap();
        assert!(matches!(
            strict.assign("Limit", Value::Integer(11), &checker, Line::new(2)),
            Err(SymbolError::ConstantAssignment { .. })
        ));

        let config = RuntimeConfig {
            enforce_constants: false,
            ..RuntimeConfig::default()
        };
        let mut lax = Environment::with_config(&config);
        lax.declare(limit()).unwrap();
        lax.assign("Limit", Value::Integer(11), &checker, Line::new(2)).unwrap();
        assert_eq!(lax.lookup("Limit").unwrap().value(), Some(&Value::Integer(11)));
    }

    #[test]
    fn test_assign_through_plain_alias() {
        let checker = BuiltinTypeChecker;
        let mut env = Environment::new();
        env.declare(TypeDefSymbol::plain("Age", Type::Integer, Line::new(1))).unwrap();
        env.declare(TypeDefSymbol::plain("Years", Type::named("Age"), Line::new(2))).unwrap();
        env.declare(Variable::new("a", Type::named("Age"), Line::new(3))).unwrap();
        env.declare(Variable::new("y", Type::named("Years"), Line::new(4))).unwrap();

        env.assign("a", Value::Integer(5), &checker, Line::new(5)).unwrap();
        env.assign("y", Value::Integer(6), &checker, Line::new(6)).unwrap();
        assert_eq!(env.lookup("a").unwrap().value(), Some(&Value::Integer(5)));
        assert_eq!(env.lookup("y").unwrap().value(), Some(&Value::Integer(6)));

        let err = env.assign("a", Value::from("old"), &checker, Line::new(7)).unwrap_err();
        assert!(matches!(
            err,
            SymbolError::TypeMismatch { ref expected, ref actual, .. } if expected == "Age" && actual == "STRING"
        ));
    }

    #[test]
    fn test_alias_in_array_element() {
        let checker = BuiltinTypeChecker;
        let mut env = Environment::new();
        env.declare(TypeDefSymbol::plain("Mark", Type::Real, Line::new(1))).unwrap();
        env.declare(
            ArraySymbol::new("marks", vec![Dimension::new(1, 3)], Type::named("Mark"), Line::new(2)).unwrap(),
        )
        .unwrap();

        env.assign_element("marks", &[2], Value::Integer(7), &checker, Line::new(3))
            .unwrap();
        assert_eq!(env.read_element("marks", &[2], Line::new(4)).unwrap(), &Value::Integer(7));
        assert!(matches!(
            env.assign_element("marks", &[1], Value::Boolean(true), &checker, Line::new(5)),
            Err(SymbolError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_expand_nested_and_nominal() {
        let mut env = Environment::new();
        env.declare(TypeDefSymbol::plain("Id", Type::Integer, Line::new(1))).unwrap();
        env.declare(TypeDefSymbol::enumeration("Season", ["Spring"], Line::new(2))).unwrap();

        let pointer = Type::Pointer(Box::new(Type::named("Id")));
        assert_eq!(
            env.expand_type(&pointer, Line::new(3)).unwrap(),
            Type::Pointer(Box::new(Type::Integer))
        );
        assert_eq!(
            env.expand_type(&Type::named("Season"), Line::new(3)).unwrap(),
            Type::named("Season")
        );
        assert_eq!(
            env.expand_type(&Type::named("Unknown"), Line::new(3)).unwrap(),
            Type::named("Unknown")
        );
    }

    #[test]
    fn test_cyclic_alias() {
        let checker = BuiltinTypeChecker;
        let mut env = Environment::new();
        env.declare(TypeDefSymbol::plain("Ping", Type::named("Pong"), Line::new(1))).unwrap();
        env.declare(TypeDefSymbol::plain("Pong", Type::named("Ping"), Line::new(2))).unwrap();
        env.declare(Variable::new("ball", Type::named("Ping"), Line::new(3))).unwrap();

        assert!(matches!(
            env.assign("ball", Value::Integer(1), &checker, Line::new(4)),
            Err(SymbolError::CyclicTypeAlias { ref name, line }) if name == "Ping" && line == Line::new(4)
        ));
    }

    #[test]
    fn test_array_helpers() {
        let checker = BuiltinTypeChecker;
        let mut env = Environment::new();
        env.declare(ArraySymbol::new("a", vec![Dimension::new(1, 5)], Type::Integer, Line::new(1)).unwrap())
            .unwrap();
        env.declare(int_var("n", 2)).unwrap();

        env.assign_element("a", &[3], Value::Integer(9), &checker, Line::new(3))
            .unwrap();
        assert_eq!(env.read_element("a", &[3], Line::new(4)).unwrap(), &Value::Integer(9));
        assert!(matches!(
            env.read_element("n", &[1], Line::new(5)),
            Err(SymbolError::KindMismatch { expected: SymbolKind::Array, found: SymbolKind::Variable, .. })
        ));
        assert!(matches!(
            env.assign("a", Value::Integer(1), &checker, Line::new(6)),
            Err(SymbolError::NotAssignable { kind: SymbolKind::Array, .. })
        ));
    }

    #[test]
    fn test_dump_current_scope() {
        let checker = BuiltinTypeChecker;
        let mut env = Environment::new();
        env.declare(int_var("outer", 1)).unwrap();
        env.push(Scope::call());
        env.declare(int_var("count", 2)).unwrap();
        env.declare(Variable::new("avg", Type::Real, Line::new(3))).unwrap();
        env.assign("count", Value::Integer(4), &checker, Line::new(4)).unwrap();

        let dump = env.dump().join("\n");
        expect![[r#"
            VARIABLE symbol name=avg | type=REAL | value=<uninitialized>
            VARIABLE symbol name=count | type=INTEGER | value=4"#]]
        .assert_eq(&dump);
    }
}
