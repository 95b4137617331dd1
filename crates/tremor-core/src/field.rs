//! Field definitions, locations, remap categories, and the [`FieldSet`] bitset.

use std::fmt;

use crate::error::FieldError;
use crate::id::FieldId;

/// The mesh entity a field is associated with.
///
/// Element-located fields carry one value block per quadrature point, so
/// their storage length is `elements * points_per_element * components`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    /// One value block per mesh node.
    Node,
    /// One value block per quadrature point of every element.
    Element,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => write!(f, "nodes"),
            Self::Element => write!(f, "elements"),
        }
    }
}

/// How a field's data is carried across a remesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemapKind {
    /// Transient: storage is dropped on remesh and rebuilt by whoever
    /// writes it next.
    None,
    /// Persistent: values are copied onto the new mesh.
    Copy,
    /// Derived from mesh shape (gradients, weights, lengths); recomputed
    /// from the new geometry rather than copied.
    Shape,
}

/// Definition of a field registered with the field store.
///
/// A definition is immutable once registered. Storage is allocated lazily
/// on first write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    /// Short name, e.g. `"p"`. Unique within a store.
    pub short_name: String,
    /// Long, human-readable name, e.g. `"nodal pressure"`. Unique within a store.
    pub long_name: String,
    /// Number of `f64` slots per entity (per node, or per quadrature point).
    pub components: usize,
    /// Mesh entity the field lives on.
    pub location: Location,
    /// Remap category applied on adaptation.
    pub remap: RemapKind,
    /// Mesh-region classes the field is defined over.
    pub classes: Vec<String>,
}

impl FieldDef {
    /// Whether the field survives a remesh.
    pub fn is_persistent(&self) -> bool {
        self.remap != RemapKind::None
    }

    /// Whether the field is carried to the new mesh by value.
    ///
    /// This is the set copied forward on restart and across adaptation.
    pub fn is_copied_on_remap(&self) -> bool {
        self.remap == RemapKind::Copy
    }

    /// Check structural invariants of the definition.
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.short_name.is_empty() || self.long_name.is_empty() {
            return Err(FieldError::EmptyName);
        }
        if self.components == 0 {
            return Err(FieldError::ZeroComponents {
                name: self.short_name.clone(),
            });
        }
        Ok(())
    }
}

/// The fields selected for a bulk operation, stored as a bitset over ids.
///
/// The field store's `select` builds one to name the fields carried
/// through mesh tags on restart and remesh.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldSet {
    words: Vec<u64>,
}

impl FieldSet {
    /// Create an empty field set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add `field` to the set.
    pub fn insert(&mut self, field: FieldId) {
        let (word, mask) = Self::locate(field);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= mask;
    }

    /// Whether `field` is in the set.
    pub fn contains(&self, field: FieldId) -> bool {
        let (word, mask) = Self::locate(field);
        self.words.get(word).is_some_and(|w| w & mask != 0)
    }

    /// Number of fields in the set.
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Field ids in ascending order.
    pub fn iter(&self) -> FieldSetIter<'_> {
        FieldSetIter {
            words: &self.words,
            next: 0,
        }
    }

    fn locate(field: FieldId) -> (usize, u64) {
        let index = field.index();
        (index / 64, 1u64 << (index % 64))
    }
}

impl FromIterator<FieldId> for FieldSet {
    fn from_iter<I: IntoIterator<Item = FieldId>>(iter: I) -> Self {
        let mut set = Self::empty();
        iter.into_iter().for_each(|field| set.insert(field));
        set
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = FieldId;
    type IntoIter = FieldSetIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`FieldSet`], in ascending id order.
pub struct FieldSetIter<'a> {
    words: &'a [u64],
    next: usize,
}

impl Iterator for FieldSetIter<'_> {
    type Item = FieldId;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.words.len() * 64 {
            let index = self.next;
            self.next += 1;
            let word = self.words[index / 64] >> (index % 64);
            if word == 0 {
                // Nothing left in this word.
                self.next = (index / 64 + 1) * 64;
                continue;
            }
            if word & 1 != 0 {
                return Some(FieldId(index as u32));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn def(short: &str, remap: RemapKind) -> FieldDef {
        FieldDef {
            short_name: short.into(),
            long_name: format!("{short} long"),
            components: 1,
            location: Location::Node,
            remap,
            classes: vec!["body".into()],
        }
    }

    #[test]
    fn persistence_follows_remap_kind() {
        assert!(!def("a", RemapKind::None).is_persistent());
        assert!(def("b", RemapKind::Copy).is_persistent());
        assert!(def("c", RemapKind::Shape).is_persistent());
        assert!(def("b", RemapKind::Copy).is_copied_on_remap());
        assert!(!def("c", RemapKind::Shape).is_copied_on_remap());
    }

    #[test]
    fn validate_rejects_zero_components() {
        let mut d = def("p", RemapKind::None);
        d.components = 0;
        assert_eq!(
            d.validate(),
            Err(FieldError::ZeroComponents { name: "p".into() })
        );
        d.components = 1;
        assert!(d.validate().is_ok());
    }

    proptest! {
        #[test]
        fn collected_ids_are_contained_and_counted(ids in prop::collection::vec(0u32..200, 0..40)) {
            let set: FieldSet = ids.iter().copied().map(FieldId).collect();
            for &id in &ids {
                prop_assert!(set.contains(FieldId(id)));
            }
            let mut unique = ids.clone();
            unique.sort_unstable();
            unique.dedup();
            prop_assert_eq!(set.len(), unique.len());
            prop_assert_eq!(set.is_empty(), unique.is_empty());
            let listed: Vec<u32> = set.iter().map(|f| f.0).collect();
            prop_assert_eq!(listed, unique);
        }
    }

    #[test]
    fn absent_ids_beyond_storage_are_not_contained() {
        let set: FieldSet = [FieldId(3), FieldId(64)].into_iter().collect();
        assert!(!set.contains(FieldId(4)));
        assert!(!set.contains(FieldId(1000)));
        assert_eq!((&set).into_iter().collect::<Vec<_>>(), vec![FieldId(3), FieldId(64)]);
    }
}
