//! The [`FieldStore`]: definitions plus lazily allocated storage.

use tremor_core::{FieldDef, FieldError, FieldId, FieldSet, Location, RemapKind};
use tremor_mesh::Discretization;
use tracing::trace;

use crate::reads::{FieldReads, Slot};
use crate::table::FieldTable;

/// Owns every field of a simulation.
///
/// Node fields hold `components` values per node. Element fields hold
/// `components` values per quadrature point of every element, element
/// major. Storage spans the whole mesh regardless of the region classes a
/// field is defined over; the classes are metadata validated at definition.
///
/// # Examples
///
/// ```
/// use tremor_core::Location;
/// use tremor_fields::FieldStore;
/// use tremor_mesh::{Discretization, ElementType};
///
/// let mesh = Discretization::new(ElementType::Bar2, vec![0.0, 1.0, 2.0], vec![0, 1, 1, 2]).unwrap();
/// let mut store = FieldStore::new(&mesh);
/// let p = store.define("p", "nodal pressure", 1, Location::Node, false, &["body"]).unwrap();
/// assert!(!store.exists(p));
/// store.write(p).unwrap()[1] = 4.0;
/// assert_eq!(store.read(p).unwrap(), &[0.0, 4.0, 0.0]);
/// ```
#[derive(Clone, Debug)]
pub struct FieldStore {
    table: FieldTable,
    data: Vec<Option<Vec<f64>>>,
    nodes: usize,
    element_points: usize,
    classes: Vec<String>,
}

impl FieldStore {
    /// Create an empty store sized for `mesh`.
    pub fn new(mesh: &Discretization) -> Self {
        Self {
            table: FieldTable::new(),
            data: Vec::new(),
            nodes: mesh.entity_count(Location::Node),
            element_points: mesh.entity_count(Location::Element),
            classes: mesh.class_names().map(str::to_string).collect(),
        }
    }

    /// Define a field.
    ///
    /// Persistent fields are copied across a remesh; transient ones are
    /// dropped and rebuilt by whoever writes them next.
    pub fn define(
        &mut self,
        short_name: &str,
        long_name: &str,
        components: usize,
        location: Location,
        persistent: bool,
        classes: &[&str],
    ) -> Result<FieldId, FieldError> {
        self.define_def(FieldDef {
            short_name: short_name.to_string(),
            long_name: long_name.to_string(),
            components,
            location,
            remap: if persistent {
                RemapKind::Copy
            } else {
                RemapKind::None
            },
            classes: classes.iter().map(|c| c.to_string()).collect(),
        })
    }

    /// Define a field from a full definition, including shape-remapped ones.
    pub fn define_def(&mut self, def: FieldDef) -> Result<FieldId, FieldError> {
        if let Some(class) = def.classes.iter().find(|c| !self.classes.contains(c)) {
            return Err(FieldError::UnknownClass {
                name: def.short_name.clone(),
                class: class.clone(),
            });
        }
        let id = self.table.define(def)?;
        self.data.push(None);
        if let Ok(def) = self.table.get(id) {
            trace!(field = %def.long_name, id = %id, "defined field");
        }
        Ok(id)
    }

    /// Look up a field by short or long name.
    pub fn find(&self, name: &str) -> Result<FieldId, FieldError> {
        self.table.find(name)
    }

    /// Look up a field by name, checking its shape against expectations.
    pub fn find_checked(
        &self,
        name: &str,
        components: usize,
        location: Location,
    ) -> Result<FieldId, FieldError> {
        let id = self.find(name)?;
        let def = self.table.get(id)?;
        if def.location != location {
            return Err(FieldError::LocationMismatch {
                name: def.long_name.clone(),
                expected: location,
                actual: def.location,
            });
        }
        if def.components != components {
            return Err(FieldError::ComponentMismatch {
                name: def.long_name.clone(),
                expected: components,
                actual: def.components,
            });
        }
        Ok(id)
    }

    /// Definition of a field.
    pub fn def(&self, id: FieldId) -> Result<&FieldDef, FieldError> {
        self.table.get(id)
    }

    /// The definition table.
    pub fn table(&self) -> &FieldTable {
        &self.table
    }

    /// Whether storage has been allocated for a field.
    pub fn exists(&self, id: FieldId) -> bool {
        matches!(self.data.get(id.index()), Some(Some(_)))
    }

    /// Number of entities (nodes, or element quadrature points) at a location.
    pub fn entity_count(&self, location: Location) -> usize {
        match location {
            Location::Node => self.nodes,
            Location::Element => self.element_points,
        }
    }

    /// Storage length of a field once allocated.
    pub fn storage_len(&self, id: FieldId) -> Result<usize, FieldError> {
        let def = self.table.get(id)?;
        Ok(self.entity_count(def.location) * def.components)
    }

    /// Shared view of an allocated field.
    pub fn read(&self, id: FieldId) -> Result<&[f64], FieldError> {
        let def = self.table.get(id)?;
        match self.data.get(id.index()) {
            Some(Some(data)) => Ok(data),
            _ => Err(FieldError::NotAllocated {
                name: def.long_name.clone(),
            }),
        }
    }

    /// Exclusive view of a field, allocating zero-filled storage if needed.
    pub fn write(&mut self, id: FieldId) -> Result<&mut [f64], FieldError> {
        self.allocate(id)?;
        self.read_write(id)
    }

    /// Exclusive view of an already allocated field.
    pub fn read_write(&mut self, id: FieldId) -> Result<&mut [f64], FieldError> {
        let name = &self.table.get(id)?.long_name;
        match self.data.get_mut(id.index()) {
            Some(Some(data)) => Ok(data),
            _ => Err(FieldError::NotAllocated { name: name.clone() }),
        }
    }

    /// Replace a field's contents with `values`.
    pub fn assign(&mut self, id: FieldId, values: Vec<f64>) -> Result<(), FieldError> {
        let expected = self.storage_len(id)?;
        if values.len() != expected {
            return Err(FieldError::LengthMismatch {
                name: self.table.get(id)?.long_name.clone(),
                expected,
                actual: values.len(),
            });
        }
        self.data[id.index()] = Some(values);
        Ok(())
    }

    /// Release a field's storage.
    pub fn deallocate(&mut self, id: FieldId) -> Result<(), FieldError> {
        self.table.get(id)?;
        self.data[id.index()] = None;
        Ok(())
    }

    /// Exclusive views of `writes` (allocated on demand) plus a read view
    /// of every other field.
    ///
    /// All ids in `writes` must be distinct.
    pub fn write_with_reads<const N: usize>(
        &mut self,
        writes: [FieldId; N],
    ) -> Result<([&mut [f64]; N], FieldReads<'_>), FieldError> {
        for (i, id) in writes.iter().enumerate() {
            if writes[..i].contains(id) {
                return Err(FieldError::Aliased {
                    name: self.table.get(*id)?.long_name.clone(),
                });
            }
            self.allocate(*id)?;
        }
        let mut outs: [&mut [f64]; N] = std::array::from_fn(|_| <&mut [f64]>::default());
        let mut slots = Vec::with_capacity(self.data.len());
        for (index, slot) in self.data.iter_mut().enumerate() {
            match writes.iter().position(|id| id.index() == index) {
                Some(pos) => {
                    if let Some(data) = slot.as_deref_mut() {
                        outs[pos] = data;
                    }
                    slots.push(Slot::Written);
                }
                None => slots.push(Slot::Free(slot.as_deref())),
            }
        }
        Ok((outs, FieldReads::new(&self.table, slots)))
    }

    /// Read view of every field, with nothing borrowed for writing.
    pub fn reads(&self) -> FieldReads<'_> {
        let slots = self.data.iter().map(|s| Slot::Free(s.as_deref())).collect();
        FieldReads::new(&self.table, slots)
    }

    /// Ids of every field whose definition satisfies `pred`.
    pub fn select(&self, pred: impl Fn(&FieldDef) -> bool) -> FieldSet {
        self.table
            .iter()
            .filter(|(_, def)| pred(*def))
            .map(|(id, _)| id)
            .collect()
    }

    /// Copy allocated fields in `fields` to `mesh` tags keyed by long name.
    pub fn copy_to_tags(&self, mesh: &mut Discretization, fields: &FieldSet) -> Result<(), FieldError> {
        for id in fields {
            let def = self.table.get(id)?;
            if let Some(Some(data)) = self.data.get(id.index()) {
                mesh.set_tag(def.location, def.long_name.clone(), data.clone());
            }
        }
        Ok(())
    }

    /// Load fields in `fields` from `mesh` tags keyed by long name.
    ///
    /// Fields with no tag are left unallocated.
    pub fn copy_from_tags(&mut self, mesh: &Discretization, fields: &FieldSet) -> Result<(), FieldError> {
        for id in fields {
            let def = self.table.get(id)?;
            if let Some(tag) = mesh.tag(def.location, &def.long_name) {
                self.assign(id, tag.to_vec())?;
            }
        }
        Ok(())
    }

    /// Drop all storage and resize for a new mesh. Definitions are kept.
    pub fn resize(&mut self, mesh: &Discretization) {
        for slot in &mut self.data {
            *slot = None;
        }
        self.nodes = mesh.entity_count(Location::Node);
        self.element_points = mesh.entity_count(Location::Element);
        self.classes = mesh.class_names().map(str::to_string).collect();
    }

    fn allocate(&mut self, id: FieldId) -> Result<(), FieldError> {
        let len = self.storage_len(id)?;
        let slot = &mut self.data[id.index()];
        if slot.is_none() {
            *slot = Some(vec![0.0; len]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tremor_mesh::{build_box, BoxSpec, ElementType};

    fn tri_mesh() -> Discretization {
        let spec = BoxSpec {
            elements: [2, 1, 0],
            size: [2.0, 1.0, 0.0],
        };
        build_box(ElementType::Tri3, &spec).unwrap()
    }

    #[test]
    fn lazy_allocation_is_zero_filled() {
        let mesh = tri_mesh();
        let mut store = FieldStore::new(&mesh);
        let v = store.define("v", "velocity", 2, Location::Node, true, &["body"]).unwrap();
        assert!(matches!(store.read(v), Err(FieldError::NotAllocated { .. })));
        assert!(matches!(store.read_write(v), Err(FieldError::NotAllocated { .. })));
        assert!(store.write(v).unwrap().iter().all(|&x| x == 0.0));
        assert_eq!(store.read(v).unwrap().len(), 6 * 2);
    }

    #[test]
    fn element_fields_are_sized_per_point() {
        let mesh = tri_mesh();
        let mut store = FieldStore::new(&mesh);
        let s = store
            .define("sigma", "stress", 4, Location::Element, false, &["body"])
            .unwrap();
        assert_eq!(store.storage_len(s).unwrap(), 4 * 4);
    }

    #[test]
    fn unknown_class_rejected() {
        let mesh = tri_mesh();
        let mut store = FieldStore::new(&mesh);
        assert_eq!(
            store.define("k", "kappa", 1, Location::Element, true, &["steel"]),
            Err(FieldError::UnknownClass {
                name: "k".into(),
                class: "steel".into()
            })
        );
    }

    #[test]
    fn checked_lookup_reports_shape_mismatch() {
        let mesh = tri_mesh();
        let mut store = FieldStore::new(&mesh);
        store.define("p", "nodal pressure", 1, Location::Node, false, &[]).unwrap();
        assert!(store.find_checked("p", 1, Location::Node).is_ok());
        assert!(matches!(
            store.find_checked("p", 3, Location::Node),
            Err(FieldError::ComponentMismatch { expected: 3, actual: 1, .. })
        ));
        assert!(matches!(
            store.find_checked("p", 1, Location::Element),
            Err(FieldError::LocationMismatch { .. })
        ));
    }

    #[test]
    fn split_borrow_reads_others_and_rejects_alias() {
        let mesh = tri_mesh();
        let mut store = FieldStore::new(&mesh);
        let a = store.define("a", "alpha", 1, Location::Node, false, &[]).unwrap();
        let b = store.define("b", "beta", 1, Location::Node, false, &[]).unwrap();
        let c = store.define("c", "gamma", 1, Location::Node, false, &[]).unwrap();
        store.write(b).unwrap().fill(2.0);
        {
            let ([out], reads) = store.write_with_reads([a]).unwrap();
            let beta = reads.read(b).unwrap();
            for (o, x) in out.iter_mut().zip(beta) {
                *o = 3.0 * x;
            }
            assert!(matches!(reads.read(a), Err(FieldError::Aliased { .. })));
            assert!(matches!(reads.read(c), Err(FieldError::NotAllocated { .. })));
        }
        assert!(store.read(a).unwrap().iter().all(|&x| x == 6.0));
        assert!(matches!(
            store.write_with_reads([a, a]),
            Err(FieldError::Aliased { .. })
        ));
    }

    #[test]
    fn tags_carry_persistent_fields_across_resize() {
        let mut mesh = tri_mesh();
        let mut store = FieldStore::new(&mesh);
        let v = store.define("v", "velocity", 2, Location::Node, true, &[]).unwrap();
        let f = store.define("f", "force", 2, Location::Node, false, &[]).unwrap();
        store.write(v).unwrap()[3] = 1.5;
        store.write(f).unwrap()[0] = 9.0;
        let persistent = store.select(FieldDef::is_copied_on_remap);
        assert!(persistent.contains(v) && !persistent.contains(f));
        store.copy_to_tags(&mut mesh, &persistent).unwrap();
        store.resize(&mesh);
        assert!(!store.exists(v) && !store.exists(f));
        store.copy_from_tags(&mesh, &persistent).unwrap();
        assert_eq!(store.read(v).unwrap()[3], 1.5);
        assert!(!store.exists(f));
    }

    #[test]
    fn assign_checks_length() {
        let mesh = tri_mesh();
        let mut store = FieldStore::new(&mesh);
        let m = store.define("m", "mass", 1, Location::Node, false, &[]).unwrap();
        assert!(matches!(
            store.assign(m, vec![1.0; 2]),
            Err(FieldError::LengthMismatch { expected: 6, actual: 2, .. })
        ));
    }
}
