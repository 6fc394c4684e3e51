//! Scalar variables and constants

use super::check_assignment;
use crate::error::{SymbolError, SymbolResult};
use crate::ty::{Type, TypeChecker};
use crate::value::Value;
use ps_span::Line;
use std::fmt;

/// A scalar binding
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    ty: Type,
    value: Option<Value>,
    line: Line,
    constant: bool,
}

impl Variable {
    /// Declare an uninitialized variable
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Type, line: Line) -> Self {
        Self {
            name: name.into(),
            ty,
            value: None,
            line,
            constant: false,
        }
    }

    /// Declare a constant with its value
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if `value` does not fit `ty`.
    pub fn constant(
        name: impl Into<String>,
        ty: Type,
        value: Value,
        checker: &dyn TypeChecker,
        line: Line,
    ) -> SymbolResult<Self> {
        let name = name.into();
        check_assignment(&name, &ty, &value, checker, line)?;
        Ok(Self {
            name,
            ty,
            value: Some(value),
            line,
            constant: true,
        })
    }

    /// Declared name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    #[must_use]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Declaration line
    #[must_use]
    pub const fn line(&self) -> Line {
        self.line
    }

    /// Whether this is a constant
    #[must_use]
    pub const fn is_constant(&self) -> bool {
        self.constant
    }

    /// Current value, `None` while uninitialized
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Current value for a read at `line`
    ///
    /// # Errors
    ///
    /// Returns `UninitializedRead` if nothing was ever assigned.
    pub fn read(&self, line: Line) -> SymbolResult<&Value> {
        self.value.as_ref().ok_or_else(|| SymbolError::UninitializedRead {
            name: self.name.clone(),
            indices: Vec::new(),
            line,
        })
    }

    /// Type-checked assignment
    ///
    /// # Errors
    ///
    /// Returns `ConstantAssignment` for constants and `TypeMismatch` if the
    /// checker rejects the value.
    pub fn set_value(&mut self, value: Value, checker: &dyn TypeChecker, line: Line) -> SymbolResult<()> {
        if self.constant {
            return Err(SymbolError::ConstantAssignment {
                name: self.name.clone(),
                line,
            });
        }
        self.initialize(value, checker, line)
    }

    /// Type-checked assignment ignoring the constant flag
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the checker rejects the value.
    pub fn initialize(&mut self, value: Value, checker: &dyn TypeChecker, line: Line) -> SymbolResult<()> {
        check_assignment(&self.name, &self.ty, &value, checker, line)?;
        self.value = Some(value);
        Ok(())
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.constant { "CONSTANT" } else { "VARIABLE" };
        write!(formatter, "{kind} symbol name={} | type={} | value=", self.name, self.ty)?;
        match &self.value {
            Some(value) => write!(formatter, "{value}"),
            None => write!(formatter, "<uninitialized>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::BuiltinTypeChecker;

    #[test]
    fn test_read_uninitialized() {
        let var = Variable::new("total", Type::Real, Line::new(1));
        assert!(matches!(
            var.read(Line::new(4)),
            Err(SymbolError::UninitializedRead { ref indices, .. }) if indices.is_empty()
        ));
    }

    #[test]
    fn test_constant_rejects_assignment() {
        let checker = BuiltinTypeChecker;
        let mut rate = Variable::constant("Rate", Type::Real, Value::Real(2.5), &checker, Line::new(1)).unwrap();
        let err = rate.set_value(Value::Real(3.0), &checker, Line::new(7)).unwrap_err();
        assert!(matches!(err, SymbolError::ConstantAssignment { line, .. } if line == Line::new(7)));
        assert_eq!(rate.value(), Some(&Value::Real(2.5)));

        rate.initialize(Value::Real(3.0), &checker, Line::new(8)).unwrap();
        assert_eq!(rate.read(Line::new(9)).unwrap(), &Value::Real(3.0));
    }

    #[test]
    fn test_constant_type_checked() {
        let checker = BuiltinTypeChecker;
        let result = Variable::constant("Max", Type::Integer, Value::from("ten"), &checker, Line::new(2));
        assert!(matches!(result, Err(SymbolError::TypeMismatch { .. })));
    }

    #[test]
    fn test_display() {
        let checker = BuiltinTypeChecker;
        let mut var = Variable::new("count", Type::Integer, Line::new(1));
        assert_eq!(
            var.to_string(),
            "VARIABLE symbol name=count | type=INTEGER | value=<uninitialized>"
        );
        var.set_value(Value::Integer(3), &checker, Line::new(2)).unwrap();
        assert_eq!(var.to_string(), "VARIABLE symbol name=count | type=INTEGER | value=3");
    }
}
