//! Symbol kinds bound in a scope
//!
//! The set of kinds is closed, so a binding is a plain enum and every kind
//! specific operation is reached by matching on it.

mod array;
mod callable;
mod file;
mod typedef;
mod variable;

pub use array::{ArrayStorage, ArraySymbol, MAX_ARRAY_SLOTS};
pub use callable::{FunctionSymbol, Param, PassingMode, ProcedureSymbol, StatementBlock};
pub use file::{FileHandle, FileMode};
pub use typedef::{TypeDefKind, TypeDefSymbol};
pub use variable::Variable;

use crate::error::{SymbolError, SymbolResult};
use crate::ty::{Type, TypeChecker};
use crate::value::Value;
use ps_span::Line;
use std::fmt;

/// Kind of a symbol, used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Scalar variable or constant
    Variable,
    /// Bounded array
    Array,
    /// Function returning a value
    Function,
    /// Procedure without a return value
    Procedure,
    /// User-defined type
    TypeDef,
    /// Open file handle
    File,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Variable => "variable",
            Self::Array => "array",
            Self::Function => "function",
            Self::Procedure => "procedure",
            Self::TypeDef => "type",
            Self::File => "file",
        };
        formatter.write_str(text)
    }
}

/// A named binding
#[derive(Debug)]
pub enum Symbol {
    /// Scalar variable or constant
    Variable(Variable),
    /// Bounded array
    Array(ArraySymbol),
    /// Function
    Function(FunctionSymbol),
    /// Procedure
    Procedure(ProcedureSymbol),
    /// User-defined type
    TypeDef(TypeDefSymbol),
    /// Open file handle
    File(FileHandle),
}

impl Symbol {
    /// Declared name, which is also the scope key
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Variable(var) => var.name(),
            Self::Array(array) => array.name(),
            Self::Function(func) => func.name(),
            Self::Procedure(procedure) => procedure.name(),
            Self::TypeDef(def) => def.name(),
            Self::File(file) => file.name(),
        }
    }

    /// Line of the declaration
    #[must_use]
    pub fn line(&self) -> Line {
        match self {
            Self::Variable(var) => var.line(),
            Self::Array(array) => array.line(),
            Self::Function(func) => func.line(),
            Self::Procedure(procedure) => procedure.line(),
            Self::TypeDef(def) => def.line(),
            Self::File(file) => file.line(),
        }
    }

    /// Kind of binding
    #[must_use]
    pub const fn kind(&self) -> SymbolKind {
        match self {
            Self::Variable(_) => SymbolKind::Variable,
            Self::Array(_) => SymbolKind::Array,
            Self::Function(_) => SymbolKind::Function,
            Self::Procedure(_) => SymbolKind::Procedure,
            Self::TypeDef(_) => SymbolKind::TypeDef,
            Self::File(_) => SymbolKind::File,
        }
    }

    /// Declared type descriptor
    ///
    /// Arrays report their element type and functions their return type.
    /// Procedures and file handles have none.
    #[must_use]
    pub fn declared_type(&self) -> Option<&Type> {
        match self {
            Self::Variable(var) => Some(var.ty()),
            Self::Array(array) => Some(array.element_type()),
            Self::Function(func) => Some(func.return_type()),
            Self::TypeDef(def) => Some(def.descriptor()),
            Self::Procedure(_) | Self::File(_) => None,
        }
    }

    /// Current scalar value, or a type's default value
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Variable(var) => var.value(),
            Self::TypeDef(def) => def.default_value(),
            Self::Array(_) | Self::Function(_) | Self::Procedure(_) | Self::File(_) => None,
        }
    }

    /// Whether the binding is a constant
    #[must_use]
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Variable(var) if var.is_constant())
    }

    /// Type-checked assignment
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the checker rejects the value,
    /// `ConstantAssignment` for constants, and `NotAssignable` for kinds that
    /// hold no scalar value.
    pub fn set_value(&mut self, value: Value, checker: &dyn TypeChecker, line: Line) -> SymbolResult<()> {
        match self {
            Self::Variable(var) => var.set_value(value, checker, line),
            Self::TypeDef(def) => def.set_default(value, checker, line),
            Self::Array(_) | Self::Function(_) | Self::Procedure(_) | Self::File(_) => {
                Err(self.not_assignable(line))
            }
        }
    }

    /// Type-checked assignment that also accepts constants
    ///
    /// Used by the host to give a binding its first value, and by
    /// environments configured not to enforce constants.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the checker rejects the value and
    /// `NotAssignable` for kinds that hold no scalar value.
    pub fn initialize(&mut self, value: Value, checker: &dyn TypeChecker, line: Line) -> SymbolResult<()> {
        match self {
            Self::Variable(var) => var.initialize(value, checker, line),
            Self::TypeDef(def) => def.set_default(value, checker, line),
            Self::Array(_) | Self::Function(_) | Self::Procedure(_) | Self::File(_) => {
                Err(self.not_assignable(line))
            }
        }
    }

    fn not_assignable(&self, line: Line) -> SymbolError {
        SymbolError::NotAssignable {
            name: self.name().to_string(),
            kind: self.kind(),
            line,
        }
    }

    /// The array, if this is one
    #[must_use]
    pub const fn as_array(&self) -> Option<&ArraySymbol> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Mutable access to the array, if this is one
    pub const fn as_array_mut(&mut self) -> Option<&mut ArraySymbol> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    /// The variable, if this is one
    #[must_use]
    pub const fn as_variable(&self) -> Option<&Variable> {
        match self {
            Self::Variable(var) => Some(var),
            _ => None,
        }
    }

    /// The function, if this is one
    #[must_use]
    pub const fn as_function(&self) -> Option<&FunctionSymbol> {
        match self {
            Self::Function(func) => Some(func),
            _ => None,
        }
    }

    /// The procedure, if this is one
    #[must_use]
    pub const fn as_procedure(&self) -> Option<&ProcedureSymbol> {
        match self {
            Self::Procedure(procedure) => Some(procedure),
            _ => None,
        }
    }

    /// The type definition, if this is one
    #[must_use]
    pub const fn as_type_def(&self) -> Option<&TypeDefSymbol> {
        match self {
            Self::TypeDef(def) => Some(def),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(var) => fmt::Display::fmt(var, formatter),
            Self::Array(array) => fmt::Display::fmt(array, formatter),
            Self::Function(func) => fmt::Display::fmt(func, formatter),
            Self::Procedure(procedure) => fmt::Display::fmt(procedure, formatter),
            Self::TypeDef(def) => fmt::Display::fmt(def, formatter),
            Self::File(file) => fmt::Display::fmt(file, formatter),
        }
    }
}

impl From<Variable> for Symbol {
    fn from(var: Variable) -> Self {
        Self::Variable(var)
    }
}

impl From<ArraySymbol> for Symbol {
    fn from(array: ArraySymbol) -> Self {
        Self::Array(array)
    }
}

impl From<FunctionSymbol> for Symbol {
    fn from(func: FunctionSymbol) -> Self {
        Self::Function(func)
    }
}

impl From<ProcedureSymbol> for Symbol {
    fn from(procedure: ProcedureSymbol) -> Self {
        Self::Procedure(procedure)
    }
}

impl From<TypeDefSymbol> for Symbol {
    fn from(def: TypeDefSymbol) -> Self {
        Self::TypeDef(def)
    }
}

impl From<FileHandle> for Symbol {
    fn from(file: FileHandle) -> Self {
        Self::File(file)
    }
}

/// Ask `checker` whether `value` fits `declared`, reporting a mismatch
/// against binding `name`
pub(crate) fn check_assignment(
    name: &str,
    declared: &Type,
    value: &Value,
    checker: &dyn TypeChecker,
    line: Line,
) -> SymbolResult<()> {
    if checker.matches(value, declared) {
        Ok(())
    } else {
        Err(SymbolError::TypeMismatch {
            name: name.to_string(),
            expected: declared.to_string(),
            actual: checker.describe(value),
            line,
        })
    }
}
