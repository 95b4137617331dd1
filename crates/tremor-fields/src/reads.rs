//! Read-only view of the fields not currently borrowed for writing.

use tremor_core::{FieldDef, FieldError, FieldId};

use crate::table::FieldTable;

#[derive(Clone, Copy, Debug)]
pub(crate) enum Slot<'a> {
    Free(Option<&'a [f64]>),
    Written,
}

/// Shared access to every field except those handed out for writing by
/// [`FieldStore::write_with_reads`](crate::FieldStore::write_with_reads).
///
/// Reading a field that is being written in the same borrow is an
/// [`FieldError::Aliased`] error, so a pass can never observe its own
/// in-progress output.
#[derive(Clone, Debug)]
pub struct FieldReads<'a> {
    table: &'a FieldTable,
    slots: Vec<Slot<'a>>,
}

impl<'a> FieldReads<'a> {
    pub(crate) fn new(table: &'a FieldTable, slots: Vec<Slot<'a>>) -> Self {
        Self { table, slots }
    }

    /// Data of an allocated field.
    pub fn read(&self, id: FieldId) -> Result<&'a [f64], FieldError> {
        let def = self.table.get(id)?;
        match self.slots.get(id.index()) {
            Some(Slot::Free(Some(data))) => Ok(data),
            Some(Slot::Free(None)) | None => Err(FieldError::NotAllocated {
                name: def.long_name.clone(),
            }),
            Some(Slot::Written) => Err(FieldError::Aliased {
                name: def.long_name.clone(),
            }),
        }
    }

    /// Whether a field has storage and is readable through this view.
    pub fn exists(&self, id: FieldId) -> bool {
        matches!(self.slots.get(id.index()), Some(Slot::Free(Some(_))))
    }

    /// Look up a field by short or long name.
    pub fn find(&self, name: &str) -> Result<FieldId, FieldError> {
        self.table.find(name)
    }

    /// Definition of a field.
    pub fn def(&self, id: FieldId) -> Result<&'a FieldDef, FieldError> {
        self.table.get(id)
    }
}
