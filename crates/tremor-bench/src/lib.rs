//! Benchmark profiles for the Tremor explicit dynamics engine.
//!
//! - [`AssemblyProfile`]: a configured box with smooth nodal data, ready to
//!   feed [`assemble_pressure_rate`](tremor_models::assemble_pressure_rate)
//! - [`impact_profile`]: parameters for a full driver run of a struck
//!   fluid block

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::marker::PhantomData;

use tremor_core::ParameterMap;
use tremor_mesh::{
    build_box, configure, BoxSpec, Discretization, ElementKind, MeshError, PointGeometryFields,
};
use tremor_models::RateInputs;

/// Bulk modulus used by every profile.
pub const BULK_MODULUS: f64 = 2.2;
/// Stabilization coefficient used by the assembly profile.
pub const STABILIZATION: f64 = 0.05;

/// A box mesh plus every array the pressure rate kernel reads.
pub struct AssemblyProfile<K> {
    /// The mesh.
    pub mesh: Discretization,
    pressure: Vec<f64>,
    velocity: Vec<f64>,
    acceleration: Vec<f64>,
    gradients: Vec<f64>,
    weights: Vec<f64>,
    density: Vec<f64>,
    bulk_modulus: Vec<f64>,
    stabilization: Vec<f64>,
    _kind: PhantomData<K>,
}

impl<K: ElementKind> AssemblyProfile<K> {
    /// Build a unit box with `n` cells per axis and configure it.
    ///
    /// Nodal data are smooth functions of position so every term of the
    /// kernel contributes.
    pub fn new(n: usize) -> Result<Self, MeshError> {
        let mesh = build_box(
            K::TYPE,
            &BoxSpec {
                elements: [n; 3],
                size: [1.0; 3],
            },
        )?;
        let points = mesh.element_count() * K::POINTS;

        let mut gradients = vec![0.0; points * K::NODES * K::DIM];
        let mut weights = vec![0.0; points];
        let mut lengths = vec![0.0; points];
        configure::<K>(
            &mesh,
            mesh.coords(),
            PointGeometryFields {
                gradients: &mut gradients,
                weights: &mut weights,
                lengths: &mut lengths,
            },
        );

        let coords = mesh.coords();
        let pressure = coords.chunks_exact(K::DIM).map(|x| x[0] * x[0]).collect();
        let velocity = coords.iter().map(|x| 0.1 * x.sin()).collect();
        let acceleration = coords.iter().map(|x| -0.01 * x).collect();

        Ok(Self {
            pressure,
            velocity,
            acceleration,
            gradients,
            weights,
            density: vec![1.0; points],
            bulk_modulus: vec![BULK_MODULUS; points],
            stabilization: vec![STABILIZATION; points],
            mesh,
            _kind: PhantomData,
        })
    }

    /// Borrow the kernel inputs.
    pub fn inputs(&self) -> RateInputs<'_> {
        RateInputs {
            pressure: &self.pressure,
            velocity: &self.velocity,
            acceleration: &self.acceleration,
            gradients: &self.gradients,
            weights: &self.weights,
            density: &self.density,
            bulk_modulus: &self.bulk_modulus,
            stabilization: &self.stabilization,
        }
    }

    /// A zeroed output buffer, one slot per node.
    pub fn rate_buffer(&self) -> Vec<f64> {
        vec![0.0; self.mesh.node_count()]
    }
}

/// Parameters for a `Tet4` block with `n` cells per axis, struck on `x+`
/// and held on `x-`, run for `steps` steps.
pub fn impact_profile(n: usize, steps: u64) -> ParameterMap {
    let cells = n as i64;
    ParameterMap::new()
        .with("element type", "Tet4")
        .with("end step", steps as i64)
        .with("CFL", 0.5)
        .with(
            "mesh",
            ParameterMap::new()
                .with("x elements", cells)
                .with("y elements", cells)
                .with("z elements", cells),
        )
        .with(
            "models",
            ParameterMap::new()
                .with(
                    "water",
                    ParameterMap::new()
                        .with("type", "hydrostatic")
                        .with("bulk modulus", BULK_MODULUS)
                        .with("stabilization factor", 0.25),
                )
                .with("pressure", ParameterMap::new().with("type", "nodal pressure")),
        )
        .with(
            "initial conditions",
            ParameterMap::new()
                .with(
                    "density",
                    ParameterMap::new().with("field", "rho").with("value", 1.0),
                )
                .with(
                    "impact",
                    ParameterMap::new()
                        .with("field", "v")
                        .with("value", vec![-0.01, 0.0, 0.0])
                        .with("set", "x+"),
                ),
        )
        .with(
            "boundary conditions",
            ParameterMap::new().with(
                "wall",
                ParameterMap::new()
                    .with("field", "a")
                    .with("value", vec![0.0, 0.0, 0.0])
                    .with("set", "x-"),
            ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tremor_core::Communicator;
    use tremor_mesh::Tet4;
    use tremor_model::Factories;
    use tremor_models::assemble_pressure_rate;

    #[test]
    fn assembly_profile_is_consistent() {
        let profile = AssemblyProfile::<Tet4>::new(2).unwrap();
        assert_eq!(profile.mesh.node_count(), 27);
        let volume: f64 = profile.inputs().weights.iter().sum();
        assert!((volume - 1.0).abs() < 1e-12);

        let mut rate = profile.rate_buffer();
        assemble_pressure_rate::<Tet4>(&profile.mesh, &profile.inputs(), &mut rate);
        assert!(rate.iter().all(|r| r.is_finite()));
        assert!(rate.iter().any(|r| *r != 0.0));
    }

    #[test]
    fn impact_profile_runs() {
        let report =
            tremor_engine::run(&Communicator::serial(), &impact_profile(2, 3), &Factories::new())
                .unwrap();
        assert_eq!(report.metrics.steps, 3);
    }
}
