//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a field within a simulation.
///
/// Fields are defined at contributor-construction time and assigned
/// sequential IDs. `FieldId(n)` corresponds to the n-th definition made
/// against the field store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u32);

impl FieldId {
    /// The id as a `usize` index into the store's definition table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for FieldId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
