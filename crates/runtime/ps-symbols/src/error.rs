//! Error types for symbol table operations

use crate::symbol::{FileMode, SymbolKind};
use ps_span::Line;
use ps_vfs::FileStoreError;

/// Result alias used throughout the crate
pub type SymbolResult<T> = Result<T, SymbolError>;

/// Errors raised while declaring, resolving or mutating bindings
#[derive(Debug, thiserror::Error)]
pub enum SymbolError {
    /// Name is not bound in any scope on the resolution path
    #[error("symbol '{name}' not found")]
    SymbolNotFound {
        /// The name that was looked up
        name: String,
    },

    /// Name is already bound in the target scope
    #[error("'{name}' declared at {second} is already declared in this scope at {first}")]
    DuplicateDeclaration {
        /// The name that was redeclared
        name: String,
        /// Line of the existing declaration
        first: Line,
        /// Line of the rejected declaration
        second: Line,
    },

    /// `pop` was called with no pushed scope
    #[error("cannot pop scope: scope stack is empty")]
    EmptyStack,

    /// Value is not compatible with the declared type
    #[error("{line}: invalid assignment to '{name}', cannot assign a {actual} to a {expected}")]
    TypeMismatch {
        /// Binding being assigned
        name: String,
        /// Declared type, as rendered by the type descriptor
        expected: String,
        /// Value type, as described by the type checker
        actual: String,
        /// Line of the assignment
        line: Line,
    },

    /// Wrong number of indices for the array's rank
    #[error("{line}: '{name}' is a {expected}-D array, but {actual} index(es) were given")]
    ArityMismatch {
        /// Array name
        name: String,
        /// Rank of the array
        expected: usize,
        /// Number of indices supplied
        actual: usize,
        /// Line of the access
        line: Line,
    },

    /// Index outside its dimension's inclusive bounds
    #[error("{line}: '{name}' index {index} out of range {low}:{high} in dimension {dimension}")]
    IndexOutOfRange {
        /// Array name
        name: String,
        /// 1-based dimension number
        dimension: usize,
        /// Offending index
        index: i64,
        /// Lower bound of the dimension
        low: i64,
        /// Upper bound of the dimension
        high: i64,
        /// Line of the access
        line: Line,
    },

    /// Read of a binding or array slot that was never assigned
    #[error("{line}: '{name}{}' declared, but no value assigned", render_indices(.indices))]
    UninitializedRead {
        /// Binding name
        name: String,
        /// Indices of the slot; empty for scalars
        indices: Vec<i64>,
        /// Line of the read
        line: Line,
    },

    /// File operation not permitted by the handle's open mode
    #[error("{line}: cannot {operation} file '{name}' opened in {mode} mode")]
    ModeViolation {
        /// File name
        name: String,
        /// Mode the handle was opened with
        mode: FileMode,
        /// Rejected operation
        operation: &'static str,
        /// Line of the operation
        line: Line,
    },

    /// Read past the last line of a file
    #[error("{line}: read past end of file '{name}'")]
    EndOfFile {
        /// File name
        name: String,
        /// Line of the read
        line: Line,
    },

    /// Assignment to a constant
    #[error("{line}: cannot assign to constant '{name}'")]
    ConstantAssignment {
        /// Constant name
        name: String,
        /// Line of the assignment
        line: Line,
    },

    /// Assignment to a symbol kind that holds no assignable value
    #[error("{line}: cannot assign a value to {kind} '{name}'")]
    NotAssignable {
        /// Symbol name
        name: String,
        /// Kind of the symbol
        kind: SymbolKind,
        /// Line of the assignment
        line: Line,
    },

    /// Name resolved to a different kind of symbol than the operation needs
    #[error("{line}: '{name}' is a {found}, expected a {expected}")]
    KindMismatch {
        /// Symbol name
        name: String,
        /// Kind the operation required
        expected: SymbolKind,
        /// Kind actually bound
        found: SymbolKind,
        /// Line of the operation
        line: Line,
    },

    /// Type alias that expands back into itself
    #[error("{line}: type '{name}' is defined in terms of itself")]
    CyclicTypeAlias {
        /// Name of the alias where the cycle was detected
        name: String,
        /// Line of the operation that expanded the alias
        line: Line,
    },

    /// Array declared with an unsupported shape
    #[error("{line}: invalid dimensions for array '{name}': {reason}")]
    InvalidDimensions {
        /// Array name
        name: String,
        /// What is wrong with the dimensions
        reason: String,
        /// Line of the declaration
        line: Line,
    },

    /// Failure reported by the backing file store
    #[error(transparent)]
    FileStore(#[from] FileStoreError),
}

fn render_indices(indices: &[i64]) -> String {
    indices.iter().map(|index| format!("[{index}]")).collect()
}
