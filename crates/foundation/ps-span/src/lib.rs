//! Source line positions
//!
//! The runtime only ever reports diagnostics against whole source lines, so a
//! position is a single 1-based line number.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// A 1-based source line number
#[derive(
    Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Display, From, Into, Serialize, Deserialize,
)]
#[display("line {_0}")]
pub struct Line(pub u32);

impl Line {
    /// Create a line number
    #[must_use]
    pub const fn new(line: u32) -> Self {
        Self(line)
    }
}
