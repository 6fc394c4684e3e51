//! Type descriptors and the type-compatibility capability
//!
//! The symbol table never decides on its own whether a value fits a type. It
//! hands both to a [`TypeChecker`] and only interprets the answer, so hosts can
//! plug in their own compatibility rules. [`BuiltinTypeChecker`] implements the
//! usual pseudocode rules.

use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;

/// Inclusive index range of one array axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimension {
    /// Lowest valid index
    pub low: i64,
    /// Highest valid index
    pub high: i64,
}

impl Dimension {
    /// Create a dimension spanning `low..=high`
    #[must_use]
    pub const fn new(low: i64, high: i64) -> Self {
        Self { low, high }
    }

    /// Whether `index` lies within the bounds
    #[must_use]
    pub const fn contains(self, index: i64) -> bool {
        self.low <= index && index <= self.high
    }

    /// Number of slots along this axis
    ///
    /// Zero for an inverted range, `None` when the count does not fit in a
    /// `usize`.
    #[must_use]
    pub fn slot_count(self) -> Option<usize> {
        if self.is_empty() {
            return Some(0);
        }
        let span = u64::try_from(i128::from(self.high) - i128::from(self.low)).ok()?;
        usize::try_from(span).ok()?.checked_add(1)
    }

    /// Whether the range holds no slots
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.high < self.low
    }
}

impl From<(i64, i64)> for Dimension {
    fn from((low, high): (i64, i64)) -> Self {
        Self::new(low, high)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.low, self.high)
    }
}

/// Structural type descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// `INTEGER`
    Integer,
    /// `REAL`
    Real,
    /// `CHAR`
    Char,
    /// `STRING`
    String,
    /// `BOOLEAN`
    Boolean,
    /// `ARRAY[..] OF element`
    Array {
        /// Axis bounds
        dimensions: Vec<Dimension>,
        /// Element type
        element: Box<Self>,
    },
    /// Reference to a user-defined type by name
    Named(String),
    /// Record with named, typed fields
    Composite(IndexMap<String, Self>),
    /// Enumeration of member names
    Enum(Vec<String>),
    /// Pointer to values of the inner type
    Pointer(Box<Self>),
}

impl Type {
    /// Shorthand for a named type reference
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(formatter, "INTEGER"),
            Self::Real => write!(formatter, "REAL"),
            Self::Char => write!(formatter, "CHAR"),
            Self::String => write!(formatter, "STRING"),
            Self::Boolean => write!(formatter, "BOOLEAN"),
            Self::Array {
                dimensions,
                element,
            } => {
                write!(formatter, "ARRAY[")?;
                for (idx, dim) in dimensions.iter().enumerate() {
                    if idx > 0 {
                        write!(formatter, ", ")?;
                    }
                    write!(formatter, "{dim}")?;
                }
                write!(formatter, "] OF {element}")
            }
            Self::Named(name) => write!(formatter, "{name}"),
            Self::Composite(fields) => {
                write!(formatter, "RECORD(")?;
                for (idx, (field, ty)) in fields.iter().enumerate() {
                    if idx > 0 {
                        write!(formatter, ", ")?;
                    }
                    write!(formatter, "{field}: {ty}")?;
                }
                write!(formatter, ")")
            }
            Self::Enum(members) => write!(formatter, "({})", members.join(", ")),
            Self::Pointer(inner) => write!(formatter, "^{inner}"),
        }
    }
}

/// Decides whether a value may be stored under a declared type
pub trait TypeChecker {
    /// Whether `value` is compatible with `declared`
    fn matches(&self, value: &Value, declared: &Type) -> bool;

    /// Human-readable name of the value's type, used in diagnostics
    fn describe(&self, value: &Value) -> String;
}

/// Pseudocode compatibility rules
///
/// - `INTEGER` widens to `REAL`; the other built-in types match only
///   themselves.
/// - A [`Type::Named`] descriptor is nominal. It accepts any record, enum or
///   pointer value whose `type_name` is that name and does not look at record
///   fields or enum members. Plain aliases such as `TYPE Age = INTEGER` never
///   reach the checker by name, since [`crate::Environment::expand_type`]
///   replaces them first.
/// - A [`Type::Composite`] descriptor compares record fields one by one and
///   ignores the value's `type_name`. A [`Type::Enum`] descriptor checks that
///   the member is listed.
/// - A [`Type::Pointer`] descriptor accepts every pointer value. Pointer
///   values only record their own type name and the target binding, so the
///   target type cannot be checked here.
/// - Whole arrays are never assignable as values.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinTypeChecker;

impl TypeChecker for BuiltinTypeChecker {
    fn matches(&self, value: &Value, declared: &Type) -> bool {
        match (declared, value) {
            (Type::Integer, Value::Integer(_))
            | (Type::Real, Value::Real(_) | Value::Integer(_))
            | (Type::Char, Value::Char(_))
            | (Type::String, Value::String(_))
            | (Type::Boolean, Value::Boolean(_))
            | (Type::Pointer(_), Value::Pointer { .. }) => true,
            (
                Type::Named(name),
                Value::Record { type_name, .. }
                | Value::Enum { type_name, .. }
                | Value::Pointer { type_name, .. },
            ) => name == type_name,
            (Type::Composite(field_types), Value::Record { fields, .. }) => {
                field_types.len() == fields.len()
                    && field_types.iter().all(|(field, ty)| {
                        fields
                            .get(field)
                            .is_some_and(|value| self.matches(value, ty))
                    })
            }
            (Type::Enum(members), Value::Enum { variant, .. }) => members.contains(variant),
            _ => false,
        }
    }

    fn describe(&self, value: &Value) -> String {
        match value {
            Value::Integer(_) => "INTEGER".to_string(),
            Value::Real(_) => "REAL".to_string(),
            Value::Char(_) => "CHAR".to_string(),
            Value::String(_) => "STRING".to_string(),
            Value::Boolean(_) => "BOOLEAN".to_string(),
            Value::Record { type_name, .. }
            | Value::Enum { type_name, .. }
            | Value::Pointer { type_name, .. } => type_name.clone(),
        }
    }
}
