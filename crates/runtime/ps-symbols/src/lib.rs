//! Symbol table for the pseudocode runtime
//!
//! Tracks every name a running program declares (variables, constants,
//! arrays, functions, procedures, types and open files) across nested scopes,
//! and guards every mutation with a type check and every array access with a
//! bounds check.
//!
//! # Architecture
//!
//! - **Symbols**: a closed enum of binding kinds, each carrying its declared
//!   type, value and declaration line
//! - **Scopes**: name to symbol maps with duplicate detection
//! - **Environment**: the global scope plus a stack of block and call scopes,
//!   resolving names innermost first
//!
//! Type compatibility and file persistence are injected through the
//! [`TypeChecker`] and [`ps_vfs::FileStore`] traits.
//!
//! # Usage
//!
//! ```rust
//! use ps_span::Line;
//! use ps_symbols::{BuiltinTypeChecker, Environment, Scope, Type, Value, Variable};
//!
//! let checker = BuiltinTypeChecker;
//! let mut env = Environment::new();
//! env.declare(Variable::new("x", Type::Integer, Line::new(1)))?;
//!
//! env.push(Scope::block());
//! env.declare(Variable::new("x", Type::Integer, Line::new(2)))?;
//! env.assign("x", Value::Integer(2), &checker, Line::new(3))?;
//! assert_eq!(env.lookup("x")?.value(), Some(&Value::Integer(2)));
//!
//! env.pop()?;
//! assert_eq!(env.lookup("x")?.value(), None);
//! # Ok::<(), ps_symbols::SymbolError>(())
//! ```

pub mod config;
pub mod environment;
pub mod error;
pub mod scope;
pub mod symbol;
pub mod ty;
pub mod value;

pub use config::{ConfigError, FilesConfig, RuntimeConfig, StoreBackend};
pub use environment::Environment;
pub use error::{SymbolError, SymbolResult};
pub use scope::{Scope, ScopeKind};
pub use symbol::{
    ArrayStorage, ArraySymbol, FileHandle, FileMode, FunctionSymbol, MAX_ARRAY_SLOTS, Param, PassingMode,
    ProcedureSymbol, StatementBlock, Symbol, SymbolKind, TypeDefKind, TypeDefSymbol, Variable,
};
pub use ty::{BuiltinTypeChecker, Dimension, Type, TypeChecker};
pub use value::Value;
