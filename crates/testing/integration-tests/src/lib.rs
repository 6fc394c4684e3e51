//! Shared fixtures for the runtime integration tests
//!
//! [`Harness`] plays the part of the evaluator: it owns an environment, a type
//! checker and a file store, and exposes the call sequences a program run
//! produces (enter a call, declare, assign, leave).

use ps_span::Line;
use ps_symbols::{
    BuiltinTypeChecker, Environment, RuntimeConfig, Scope, SymbolError, SymbolResult, Type, Value, Variable,
};
use ps_vfs::{FileStore, MemoryFileStore};
use std::sync::Once;

static LOGGER: Once = Once::new();

/// Route `log` output through the test harness; safe to call repeatedly
pub fn init_logging() {
    LOGGER.call_once(|| {
        // Another test binary in the same process may have installed one already
        if env_logger::builder().is_test(true).try_init().is_err() {
            log::trace!("logger already installed");
        }
    });
}

/// Evaluator stand-in
pub struct Harness {
    /// Binding state under test
    pub env: Environment,
    /// Compatibility rules
    pub checker: BuiltinTypeChecker,
    /// Backing store for file handles
    pub store: Box<dyn FileStore>,
}

impl Harness {
    /// Harness with default configuration and an empty in-memory store
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(Box::new(MemoryFileStore::new()))
    }

    /// Harness with default configuration over `store`
    #[must_use]
    pub fn with_store(store: Box<dyn FileStore>) -> Self {
        init_logging();
        Self {
            env: Environment::new(),
            checker: BuiltinTypeChecker,
            store,
        }
    }

    /// Harness built from TOML configuration text
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid or its store cannot be opened.
    #[must_use]
    pub fn from_config(toml: &str) -> Self {
        init_logging();
        let config = RuntimeConfig::from_toml_str(toml).expect("valid config");
        let store = config.files.open_store().expect("store opens");
        Self {
            env: Environment::with_config(&config),
            checker: BuiltinTypeChecker,
            store,
        }
    }

    /// `DECLARE name : ty` followed by `name <- value`
    ///
    /// # Errors
    ///
    /// Returns the declaration or assignment error.
    pub fn declare_with(&mut self, name: &str, ty: Type, value: impl Into<Value>, line: u32) -> SymbolResult<()> {
        let line = Line::new(line);
        self.env.declare(Variable::new(name, ty, line))?;
        self.env.assign(name, value.into(), &self.checker, line)
    }

    /// `name <- value`
    ///
    /// # Errors
    ///
    /// Returns the assignment error.
    pub fn assign(&mut self, name: &str, value: impl Into<Value>, line: u32) -> SymbolResult<()> {
        self.env.assign(name, value.into(), &self.checker, Line::new(line))
    }

    /// Current value bound to `name`
    ///
    /// # Errors
    ///
    /// Returns `SymbolNotFound` or `UninitializedRead`.
    pub fn value_of(&self, name: &str, line: u32) -> SymbolResult<Value> {
        let line = Line::new(line);
        let symbol = self.env.lookup(name)?;
        match symbol.as_variable() {
            Some(var) => var.read(line).cloned(),
            None => symbol
                .value()
                .cloned()
                .ok_or_else(|| SymbolError::UninitializedRead {
                    name: name.to_string(),
                    indices: Vec::new(),
                    line,
                }),
        }
    }

    /// Run `body` inside a fresh call scope, popping it afterwards even when
    /// `body` fails
    ///
    /// # Errors
    ///
    /// Returns the first error from `body`, or `EmptyStack` if `body` popped
    /// the call scope itself.
    pub fn call<T>(&mut self, body: impl FnOnce(&mut Self) -> SymbolResult<T>) -> SymbolResult<T> {
        self.env.push(Scope::call());
        let result = body(self);
        self.env.pop()?;
        result
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
