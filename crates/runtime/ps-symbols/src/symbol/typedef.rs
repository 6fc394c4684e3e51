//! User-defined types

use super::check_assignment;
use crate::error::SymbolResult;
use crate::ty::{Type, TypeChecker};
use crate::value::Value;
use indexmap::IndexMap;
use ps_span::Line;
use std::fmt;

/// Which `TYPE` form declared the type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDefKind {
    /// Alias of another type
    Plain,
    /// Record with fields
    Composite,
    /// Enumeration
    Enum,
    /// Pointer to another type
    Pointer,
}

/// A named type binding
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefSymbol {
    name: String,
    kind: TypeDefKind,
    descriptor: Type,
    default: Option<Value>,
    line: Line,
}

impl TypeDefSymbol {
    /// Declare a type of the given kind
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TypeDefKind, descriptor: Type, line: Line) -> Self {
        Self {
            name: name.into(),
            kind,
            descriptor,
            default: None,
            line,
        }
    }

    /// `TYPE name = descriptor`
    #[must_use]
    pub fn plain(name: impl Into<String>, descriptor: Type, line: Line) -> Self {
        Self::new(name, TypeDefKind::Plain, descriptor, line)
    }

    /// Record type with `fields`
    #[must_use]
    pub fn composite(name: impl Into<String>, fields: IndexMap<String, Type>, line: Line) -> Self {
        Self::new(name, TypeDefKind::Composite, Type::Composite(fields), line)
    }

    /// Enumeration of `members`
    #[must_use]
    pub fn enumeration<I, S>(name: impl Into<String>, members: I, line: Line) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members = members.into_iter().map(Into::into).collect();
        Self::new(name, TypeDefKind::Enum, Type::Enum(members), line)
    }

    /// Pointer to `target`
    #[must_use]
    pub fn pointer(name: impl Into<String>, target: Type, line: Line) -> Self {
        Self::new(name, TypeDefKind::Pointer, Type::Pointer(Box::new(target)), line)
    }

    /// Declared name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declaration form
    #[must_use]
    pub const fn kind(&self) -> TypeDefKind {
        self.kind
    }

    /// Structural descriptor the name expands to
    #[must_use]
    pub const fn descriptor(&self) -> &Type {
        &self.descriptor
    }

    /// Default value for new instances, if any
    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Declaration line
    #[must_use]
    pub const fn line(&self) -> Line {
        self.line
    }

    /// Type-checked update of the default value
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the checker rejects the value.
    pub fn set_default(&mut self, value: Value, checker: &dyn TypeChecker, line: Line) -> SymbolResult<()> {
        check_assignment(&self.name, &self.descriptor, &value, checker, line)?;
        self.default = Some(value);
        Ok(())
    }
}

impl fmt::Display for TypeDefSymbol {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "TYPE symbol name={} | type={} | value=", self.name, self.descriptor)?;
        match &self.default {
            Some(value) => write!(formatter, "{value}")?,
            None => write!(formatter, "<none>")?,
        }
        write!(formatter, " | {}", self.line)
    }
}
