//! Constant-valued initial and boundary conditions.

use tremor_core::{FieldError, FieldId, Location};
use tremor_fields::FieldStore;
use tremor_mesh::Discretization;
use tremor_model::CoreFields;

use crate::config::ConditionSpec;
use crate::error::RunError;

/// A condition resolved against the field store and the mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct Condition {
    name: String,
    field: FieldId,
    value: Vec<f64>,
    /// Entity indices (nodes or element points); `None` means all.
    entities: Option<Vec<usize>>,
}

impl Condition {
    /// Resolve `spec`: the field must exist, `value` must have one entry
    /// per component, and the set must exist on the mesh.
    pub fn resolve(
        spec: &ConditionSpec,
        fields: &FieldStore,
        mesh: &Discretization,
    ) -> Result<Self, RunError> {
        let field = fields.find(&spec.field)?;
        let def = fields.def(field)?;
        if def.components != spec.value.len() {
            return Err(FieldError::ComponentMismatch {
                name: def.long_name.clone(),
                expected: spec.value.len(),
                actual: def.components,
            }
            .into());
        }
        let entities = match (&spec.set, def.location) {
            (None, _) => None,
            (Some(set), Location::Node) => {
                Some(mesh.node_set(set)?.iter().map(|&n| n as usize).collect())
            }
            (Some(class), Location::Element) => {
                let points = mesh.entity_count(Location::Element) / mesh.element_count().max(1);
                Some(
                    mesh.class(class)?
                        .iter()
                        .flat_map(|&e| (0..points).map(move |pt| e as usize * points + pt))
                        .collect(),
                )
            }
        };
        Ok(Self {
            name: spec.name.clone(),
            field,
            value: spec.value.clone(),
            entities,
        })
    }

    /// Condition name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target field.
    pub fn field(&self) -> FieldId {
        self.field
    }

    /// Overwrite the target entities with the value, allocating the field
    /// if needed.
    pub fn apply(&self, fields: &mut FieldStore) -> Result<(), FieldError> {
        let n = self.value.len();
        let data = fields.write(self.field)?;
        match &self.entities {
            None => data
                .chunks_exact_mut(n)
                .for_each(|slot| slot.copy_from_slice(&self.value)),
            Some(entities) => {
                for &e in entities {
                    data[e * n..(e + 1) * n].copy_from_slice(&self.value);
                }
            }
        }
        Ok(())
    }
}

/// Every condition of a run, grouped by the close slot it runs in.
///
/// The specs are kept so the entity lists can be rebuilt when the mesh
/// changes.
#[derive(Clone, Debug, Default)]
pub struct Conditions {
    initial_specs: Vec<ConditionSpec>,
    boundary_specs: Vec<ConditionSpec>,
    initial: Vec<Condition>,
    force: Vec<Condition>,
    acceleration: Vec<Condition>,
}

impl Conditions {
    /// Resolve initial and boundary conditions.
    ///
    /// Boundary conditions must target the force or the acceleration field.
    pub fn resolve(
        initial: &[ConditionSpec],
        boundary: &[ConditionSpec],
        fields: &FieldStore,
        mesh: &Discretization,
        core: &CoreFields,
    ) -> Result<Self, RunError> {
        let mut out = Self {
            initial_specs: initial.to_vec(),
            boundary_specs: boundary.to_vec(),
            ..Self::default()
        };
        for spec in initial {
            out.initial.push(Condition::resolve(spec, fields, mesh)?);
        }
        for spec in boundary {
            let condition = Condition::resolve(spec, fields, mesh)?;
            if condition.field == core.force {
                out.force.push(condition);
            } else if condition.field == core.acceleration {
                out.acceleration.push(condition);
            } else {
                return Err(RunError::UnsupportedBoundaryField {
                    name: spec.name.clone(),
                    field: spec.field.clone(),
                });
            }
        }
        Ok(out)
    }

    /// Resolve the same specs again against `mesh`, after a remesh.
    ///
    /// Fails if a node set or class named by a condition no longer exists.
    pub fn rebuild(
        &mut self,
        fields: &FieldStore,
        mesh: &Discretization,
        core: &CoreFields,
    ) -> Result<(), RunError> {
        *self = Self::resolve(&self.initial_specs, &self.boundary_specs, fields, mesh, core)?;
        Ok(())
    }

    /// Apply the initial conditions.
    pub fn apply_initial(&self, fields: &mut FieldStore) -> Result<(), FieldError> {
        self.initial.iter().try_for_each(|c| c.apply(fields))
    }

    /// Apply the force boundary conditions.
    pub fn apply_force(&self, fields: &mut FieldStore) -> Result<(), FieldError> {
        self.force.iter().try_for_each(|c| c.apply(fields))
    }

    /// Apply the acceleration boundary conditions.
    pub fn apply_acceleration(&self, fields: &mut FieldStore) -> Result<(), FieldError> {
        self.acceleration.iter().try_for_each(|c| c.apply(fields))
    }
}
