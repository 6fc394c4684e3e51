//! Functions and procedures
//!
//! Callables are stored, never run here. The evaluator owns the statement
//! representation; this module only keeps it alive behind [`StatementBlock`]
//! and hands it back on lookup.

use crate::ty::Type;
use ps_span::Line;
use std::any::Any;
use std::fmt;

/// How an argument is bound to a parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PassingMode {
    /// The callee receives a copy (`BYVAL`)
    #[default]
    ByValue,
    /// The callee aliases the caller's binding (`BYREF`)
    ByRef,
}

/// A declared parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub ty: Type,
    /// Passing mode
    pub mode: PassingMode,
}

impl Param {
    /// A by-value parameter
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            mode: PassingMode::ByValue,
        }
    }

    /// A by-reference parameter
    #[must_use]
    pub fn by_ref(name: impl Into<String>, ty: Type) -> Self {
        Self {
            mode: PassingMode::ByRef,
            ..Self::new(name, ty)
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mode == PassingMode::ByRef {
            write!(formatter, "BYREF ")?;
        }
        write!(formatter, "{}: {}", self.name, self.ty)
    }
}

/// Opaque statement list owned by a callable
pub struct StatementBlock(Box<dyn Any>);

impl StatementBlock {
    /// Wrap the evaluator's statement representation
    #[must_use]
    pub fn new<T: Any>(statements: T) -> Self {
        Self(Box::new(statements))
    }

    /// Borrow the statements back as the evaluator's type
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    /// Whether the payload is a `T`
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl fmt::Debug for StatementBlock {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("StatementBlock(..)")
    }
}

fn write_params(formatter: &mut fmt::Formatter<'_>, params: &[Param]) -> fmt::Result {
    write!(formatter, "(")?;
    for (idx, param) in params.iter().enumerate() {
        if idx > 0 {
            write!(formatter, ", ")?;
        }
        write!(formatter, "{param}")?;
    }
    write!(formatter, ")")
}

/// A function declaration
#[derive(Debug)]
pub struct FunctionSymbol {
    name: String,
    params: Vec<Param>,
    return_type: Type,
    body: StatementBlock,
    line: Line,
}

impl FunctionSymbol {
    /// Declare a function
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        params: Vec<Param>,
        return_type: Type,
        body: StatementBlock,
        line: Line,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            return_type,
            body,
            line,
        }
    }

    /// Declared name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters in declaration order
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Return type
    #[must_use]
    pub const fn return_type(&self) -> &Type {
        &self.return_type
    }

    /// Statement payload
    #[must_use]
    pub const fn body(&self) -> &StatementBlock {
        &self.body
    }

    /// Declaration line
    #[must_use]
    pub const fn line(&self) -> Line {
        self.line
    }
}

impl fmt::Display for FunctionSymbol {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "FUNCTION symbol name={} | args=", self.name)?;
        write_params(formatter, &self.params)?;
        write!(formatter, " | returns={}", self.return_type)
    }
}

/// A procedure declaration
#[derive(Debug)]
pub struct ProcedureSymbol {
    name: String,
    params: Vec<Param>,
    body: StatementBlock,
    line: Line,
}

impl ProcedureSymbol {
    /// Declare a procedure
    #[must_use]
    pub fn new(name: impl Into<String>, params: Vec<Param>, body: StatementBlock, line: Line) -> Self {
        Self {
            name: name.into(),
            params,
            body,
            line,
        }
    }

    /// Declared name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters in declaration order
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Statement payload
    #[must_use]
    pub const fn body(&self) -> &StatementBlock {
        &self.body
    }

    /// Declaration line
    #[must_use]
    pub const fn line(&self) -> Line {
        self.line
    }
}

impl fmt::Display for ProcedureSymbol {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "PROCEDURE symbol name={} | args=", self.name)?;
        write_params(formatter, &self.params)
    }
}
