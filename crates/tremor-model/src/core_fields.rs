//! The standard fields every simulation defines before any model is built.

use tremor_core::{FieldDef, FieldError, FieldId, Location, RemapKind};
use tremor_fields::FieldStore;
use tremor_mesh::{ElementType, BODY_CLASS};

/// Ids of the standard kinematic, material, and geometric fields.
///
/// Element fields hold one value block per quadrature point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoreFields {
    /// `x`: current nodal position (`dim`).
    pub position: FieldId,
    /// `v`: nodal velocity (`dim`).
    pub velocity: FieldId,
    /// `a`: nodal acceleration (`dim`).
    pub acceleration: FieldId,
    /// `f`: nodal force (`dim`).
    pub force: FieldId,
    /// `m`: lumped nodal mass.
    pub mass: FieldId,
    /// `rho`: density.
    pub density: FieldId,
    /// `sigma`: Cauchy stress (`dim * dim`, row major).
    pub stress: FieldId,
    /// `c`: wave speed.
    pub wave_speed: FieldId,
    /// `h`: characteristic element length.
    pub length: FieldId,
    /// `dt`: stable point time step.
    pub point_dt: FieldId,
    /// `grad`: basis gradients (`nodes * dim`).
    pub gradients: FieldId,
    /// `w`: quadrature weight times Jacobian determinant.
    pub weight: FieldId,
}

impl CoreFields {
    /// Define the standard fields in `store` for meshes of `element_type`.
    pub fn define(store: &mut FieldStore, element_type: ElementType) -> Result<Self, FieldError> {
        let dim = element_type.dim();
        let nodes = element_type.nodes();
        let mut def = |short: &str, long: &str, components, location, remap| {
            store.define_def(FieldDef {
                short_name: short.to_string(),
                long_name: long.to_string(),
                components,
                location,
                remap,
                classes: vec![BODY_CLASS.to_string()],
            })
        };
        use Location::{Element, Node};
        Ok(Self {
            position: def("x", "position", dim, Node, RemapKind::Copy)?,
            velocity: def("v", "velocity", dim, Node, RemapKind::Copy)?,
            acceleration: def("a", "acceleration", dim, Node, RemapKind::None)?,
            force: def("f", "force", dim, Node, RemapKind::None)?,
            mass: def("m", "nodal mass", 1, Node, RemapKind::None)?,
            density: def("rho", "density", 1, Element, RemapKind::Copy)?,
            stress: def("sigma", "stress", dim * dim, Element, RemapKind::None)?,
            wave_speed: def("c", "wave speed", 1, Element, RemapKind::None)?,
            length: def("h", "element length", 1, Element, RemapKind::Shape)?,
            point_dt: def("dt", "point time step", 1, Element, RemapKind::None)?,
            gradients: def("grad", "basis gradients", nodes * dim, Element, RemapKind::Shape)?,
            weight: def("w", "weight", 1, Element, RemapKind::Shape)?,
        })
    }
}
