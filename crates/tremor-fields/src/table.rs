//! Field definition table: `FieldId` → `FieldDef`, name → `FieldId`.

use indexmap::IndexMap;
use tremor_core::{FieldDef, FieldError, FieldId};

/// Registry of field definitions.
///
/// Both the short and the long name of every definition resolve to its id.
/// Names are unique across both namespaces. Iteration is in definition
/// order, which is also `FieldId` order.
#[derive(Clone, Debug, Default)]
pub struct FieldTable {
    defs: Vec<FieldDef>,
    by_name: IndexMap<String, FieldId>,
}

impl FieldTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, returning its id.
    pub fn define(&mut self, def: FieldDef) -> Result<FieldId, FieldError> {
        def.validate()?;
        for name in [&def.short_name, &def.long_name] {
            if self.by_name.contains_key(name.as_str()) {
                return Err(FieldError::Duplicate { name: name.clone() });
            }
        }
        let id = FieldId(self.defs.len() as u32);
        self.by_name.insert(def.short_name.clone(), id);
        self.by_name.insert(def.long_name.clone(), id);
        self.defs.push(def);
        Ok(id)
    }

    /// Look up a field by short or long name.
    pub fn find(&self, name: &str) -> Result<FieldId, FieldError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| FieldError::Undefined {
                name: name.to_string(),
            })
    }

    /// Whether a name is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Definition of a field.
    pub fn get(&self, id: FieldId) -> Result<&FieldDef, FieldError> {
        self.defs.get(id.index()).ok_or(FieldError::UnknownId(id))
    }

    /// Iterate `(id, definition)` in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &FieldDef)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(i, d)| (FieldId(i as u32), d))
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
