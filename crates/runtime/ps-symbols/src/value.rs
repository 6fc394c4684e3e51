//! Runtime value representation

#![allow(
    clippy::min_ident_chars,
    reason = "Short identifiers like i, r, c, s are conventional in value implementations"
)]

use indexmap::IndexMap;
use std::fmt;

/// Runtime value stored in a binding
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Whole number
    Integer(i64),
    /// Floating point number
    Real(f64),
    /// Single character
    Char(char),
    /// Text
    String(String),
    /// Truth value
    Boolean(bool),
    /// Instance of a composite (record) type
    Record {
        /// Name of the record type
        type_name: String,
        /// Field values in declaration order
        fields: IndexMap<String, Self>,
    },
    /// Member of an enumerated type
    Enum {
        /// Name of the enumerated type
        type_name: String,
        /// Selected member
        variant: String,
    },
    /// Reference to another binding
    Pointer {
        /// Name of the pointer type
        type_name: String,
        /// Name of the referenced binding; `None` is the null pointer
        target: Option<String>,
    },
}

impl Value {
    /// Get the value as an integer, if possible
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a real, widening integers
    #[must_use]
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(r) => Some(*r),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get the value as a boolean, if possible
    #[must_use]
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as text, if possible
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Self::Real(r)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(formatter, "{i}"),
            Self::Real(r) => write!(formatter, "{r:?}"),
            Self::Char(c) => write!(formatter, "'{c}'"),
            Self::String(s) => write!(formatter, "\"{s}\""),
            Self::Boolean(true) => write!(formatter, "TRUE"),
            Self::Boolean(false) => write!(formatter, "FALSE"),
            Self::Record { type_name, fields } => {
                write!(formatter, "{type_name} {{ ")?;
                for (i, (field, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(formatter, ", ")?;
                    }
                    write!(formatter, "{field}: {value}")?;
                }
                write!(formatter, " }}")
            }
            Self::Enum { variant, .. } => write!(formatter, "{variant}"),
            Self::Pointer { target: Some(target), .. } => write!(formatter, "^{target}"),
            Self::Pointer { target: None, .. } => write!(formatter, "NULL"),
        }
    }
}
