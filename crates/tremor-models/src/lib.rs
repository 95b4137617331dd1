//! Physics contributors for the Tremor explicit dynamics engine.
//!
//! Every contributor here is generic over the element kind and is built
//! through a non-generic factory that dispatches on the run's
//! [`ElementType`](tremor_mesh::ElementType).
//!
//! # Stage participation
//!
//! 1. [`NodalPressure`] `before_material_model`: forward-Euler pressure predictor
//! 2. [`Hydrostatic`] `at_material_model`: stress, bulk modulus, wave speed, stabilization
//! 3. [`NodalPressure`] `before_secondaries`: backtrack to midpoint, zero and assemble the rate
//! 4. [`NodalPressure`] `after_correction`: midpoint corrector

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod assembly;
pub mod fields;
pub mod hydrostatic;
pub mod nodal_pressure;

pub use assembly::{assemble_pressure_rate, nodal_volumes, RateInputs};
pub use hydrostatic::{hydrostatic_factory, Hydrostatic};
pub use nodal_pressure::{nodal_pressure_factory, NodalPressure};

use tremor_model::Factories;

/// Factory key of [`NodalPressure`].
pub const NODAL_PRESSURE: &str = "nodal pressure";
/// Factory key of [`Hydrostatic`].
pub const HYDROSTATIC: &str = "hydrostatic";

/// Factories for every contributor in this crate.
pub fn default_factories() -> Factories {
    Factories::new()
        .with(NODAL_PRESSURE, nodal_pressure_factory)
        .with(HYDROSTATIC, hydrostatic_factory)
}
