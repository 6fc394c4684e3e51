//! Bounded one and two dimensional arrays
//!
//! Bounds are inclusive and may start anywhere, including below zero; a slot
//! lives at `index - low` along each axis.

use super::check_assignment;
use crate::error::{SymbolError, SymbolResult};
use crate::ty::{Dimension, Type, TypeChecker};
use crate::value::Value;
use ps_span::Line;
use std::fmt;

/// Backing slots, shaped to the array's rank
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayStorage {
    /// Rank 1
    Flat(Vec<Option<Value>>),
    /// Rank 2, row-major
    Nested(Vec<Vec<Option<Value>>>),
}

impl ArrayStorage {
    fn slot(&self, offsets: &[usize]) -> Option<&Option<Value>> {
        match (self, offsets) {
            (Self::Flat(slots), [col]) => slots.get(*col),
            (Self::Nested(rows), [row, col]) => rows.get(*row)?.get(*col),
            _ => None,
        }
    }

    fn slot_mut(&mut self, offsets: &[usize]) -> Option<&mut Option<Value>> {
        match (self, offsets) {
            (Self::Flat(slots), [col]) => slots.get_mut(*col),
            (Self::Nested(rows), [row, col]) => rows.get_mut(*row)?.get_mut(*col),
            _ => None,
        }
    }

    fn slots_mut(&mut self) -> Box<dyn Iterator<Item = &mut Option<Value>> + '_> {
        match self {
            Self::Flat(slots) => Box::new(slots.iter_mut()),
            Self::Nested(rows) => Box::new(rows.iter_mut().flatten()),
        }
    }
}

/// Upper bound on the number of slots a single array may hold
pub const MAX_ARRAY_SLOTS: usize = 1 << 22;

/// An array binding
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySymbol {
    name: String,
    element: Type,
    dimensions: Vec<Dimension>,
    storage: ArrayStorage,
    len: usize,
    line: Line,
}

impl ArraySymbol {
    /// Declare an array with every slot uninitialized
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` unless there are one or two dimensions,
    /// each with `low <= high`, holding at most [`MAX_ARRAY_SLOTS`] slots in
    /// total.
    pub fn new(
        name: impl Into<String>,
        dimensions: Vec<Dimension>,
        element: Type,
        line: Line,
    ) -> SymbolResult<Self> {
        let name = name.into();
        let invalid = |reason: String| SymbolError::InvalidDimensions {
            name: name.clone(),
            reason,
            line,
        };

        if !(1..=2).contains(&dimensions.len()) {
            return Err(invalid(format!(
                "expected 1 or 2 dimensions, found {}",
                dimensions.len()
            )));
        }
        let mut len: usize = 1;
        let mut counts = Vec::with_capacity(dimensions.len());
        for dim in &dimensions {
            if dim.is_empty() {
                return Err(invalid(format!("bounds {dim} are empty")));
            }
            let count = dim
                .slot_count()
                .ok_or_else(|| invalid(format!("bounds {dim} span more slots than can be addressed")))?;
            len = len
                .checked_mul(count)
                .filter(|&total| total <= MAX_ARRAY_SLOTS)
                .ok_or_else(|| invalid(format!("more than {MAX_ARRAY_SLOTS} slots requested")))?;
            counts.push(count);
        }

        let storage = match counts.as_slice() {
            [cols] => ArrayStorage::Flat(vec![None; *cols]),
            [rows, cols] => ArrayStorage::Nested(vec![vec![None; *cols]; *rows]),
            _ => return Err(invalid("unsupported rank".to_string())),
        };

        Ok(Self {
            name,
            element,
            dimensions,
            storage,
            len,
            line,
        })
    }

    /// Declared name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element type
    #[must_use]
    pub const fn element_type(&self) -> &Type {
        &self.element
    }

    /// Axis bounds
    #[must_use]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Number of axes
    #[must_use]
    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    /// Total number of slots
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always false; arrays have at least one slot
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Declaration line
    #[must_use]
    pub const fn line(&self) -> Line {
        self.line
    }

    /// Raw slots
    #[must_use]
    pub const fn storage(&self) -> &ArrayStorage {
        &self.storage
    }

    /// Descriptor of the whole array
    #[must_use]
    pub fn array_type(&self) -> Type {
        Type::Array {
            dimensions: self.dimensions.clone(),
            element: Box::new(self.element.clone()),
        }
    }

    /// Check arity and bounds, translating indices to storage offsets
    fn offsets(&self, indices: &[i64], line: Line) -> SymbolResult<Vec<usize>> {
        if indices.len() != self.rank() {
            return Err(SymbolError::ArityMismatch {
                name: self.name.clone(),
                expected: self.rank(),
                actual: indices.len(),
                line,
            });
        }

        self.dimensions
            .iter()
            .zip(indices)
            .enumerate()
            .map(|(axis, (dim, &index))| {
                if dim.contains(index) {
                    Ok(usize::try_from(index.abs_diff(dim.low)).unwrap_or(usize::MAX))
                } else {
                    Err(SymbolError::IndexOutOfRange {
                        name: self.name.clone(),
                        dimension: axis + 1,
                        index,
                        low: dim.low,
                        high: dim.high,
                        line,
                    })
                }
            })
            .collect()
    }

    fn uninitialized(&self, indices: &[i64], line: Line) -> SymbolError {
        SymbolError::UninitializedRead {
            name: self.name.clone(),
            indices: indices.to_vec(),
            line,
        }
    }

    /// Read the element at `indices`
    ///
    /// # Errors
    ///
    /// Returns `ArityMismatch` if the number of indices differs from the rank,
    /// `IndexOutOfRange` if an index is outside its bounds, and
    /// `UninitializedRead` if the slot was never written.
    pub fn get(&self, indices: &[i64], line: Line) -> SymbolResult<&Value> {
        let offsets = self.offsets(indices, line)?;
        self.storage
            .slot(&offsets)
            .and_then(Option::as_ref)
            .ok_or_else(|| self.uninitialized(indices, line))
    }

    /// Type-checked write of the element at `indices`
    ///
    /// # Errors
    ///
    /// Returns `ArityMismatch` or `IndexOutOfRange` for bad indices and
    /// `TypeMismatch` if the checker rejects the value for the element type.
    pub fn set(
        &mut self,
        indices: &[i64],
        value: Value,
        checker: &dyn TypeChecker,
        line: Line,
    ) -> SymbolResult<()> {
        let offsets = self.offsets(indices, line)?;
        check_assignment(&self.name, &self.element, &value, checker, line)?;
        let rank = self.rank();
        let slot = self
            .storage
            .slot_mut(&offsets)
            .ok_or_else(|| SymbolError::ArityMismatch {
                name: self.name.clone(),
                expected: rank,
                actual: indices.len(),
                line,
            })?;
        *slot = Some(value);
        Ok(())
    }

    /// Type-checked write of `value` into every slot
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the checker rejects the value.
    pub fn fill(&mut self, value: &Value, checker: &dyn TypeChecker, line: Line) -> SymbolResult<()> {
        check_assignment(&self.name, &self.element, value, checker, line)?;
        for slot in self.storage.slots_mut() {
            *slot = Some(value.clone());
        }
        Ok(())
    }
}

fn write_slots(formatter: &mut fmt::Formatter<'_>, slots: &[Option<Value>]) -> fmt::Result {
    write!(formatter, "[")?;
    for (idx, slot) in slots.iter().enumerate() {
        if idx > 0 {
            write!(formatter, ", ")?;
        }
        match slot {
            Some(value) => write!(formatter, "{value}")?,
            None => write!(formatter, "_")?,
        }
    }
    write!(formatter, "]")
}

impl fmt::Display for ArraySymbol {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "ARRAY symbol name={} | type={} | dimensions=[", self.name, self.element)?;
        for (idx, dim) in self.dimensions.iter().enumerate() {
            if idx > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{dim}")?;
        }
        write!(formatter, "] | value=")?;
        match &self.storage {
            ArrayStorage::Flat(slots) => write_slots(formatter, slots),
            ArrayStorage::Nested(rows) => {
                write!(formatter, "[")?;
                for (idx, row) in rows.iter().enumerate() {
                    if idx > 0 {
                        write!(formatter, ", ")?;
                    }
                    write_slots(formatter, row)?;
                }
                write!(formatter, "]")
            }
        }
    }
}
