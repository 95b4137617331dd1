//! Tremor: explicit dynamics on simplex meshes.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Tremor sub-crates. For most users, adding `tremor` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tremor::prelude::*;
//!
//! let params = ParameterMap::new()
//!     .with("element type", "Bar2")
//!     .with("end step", 10i64)
//!     .with("mesh", ParameterMap::new().with("x elements", 8i64))
//!     .with(
//!         "models",
//!         ParameterMap::new()
//!             .with(
//!                 "water",
//!                 ParameterMap::new()
//!                     .with("type", "hydrostatic")
//!                     .with("bulk modulus", 2.2),
//!             )
//!             .with("pressure", ParameterMap::new().with("type", "nodal pressure")),
//!     )
//!     .with(
//!         "initial conditions",
//!         ParameterMap::new().with(
//!             "density",
//!             ParameterMap::new().with("field", "rho").with("value", 1.0),
//!         ),
//!     );
//!
//! let report = run(&Communicator::serial(), &params, &Factories::new()).unwrap();
//! assert_eq!(report.metrics.steps, 10);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tremor-core` | IDs, field definitions, stages, parameters, errors |
//! | [`fields`] | `tremor-fields` | The field store and split borrows |
//! | [`mesh`] | `tremor-mesh` | Element kinds, discretizations, adjacency, box meshes |
//! | [`model`] | `tremor-model` | Model trait, contexts, factories, registry |
//! | [`models`] | `tremor-models` | Nodal pressure and hydrostatic contributors |
//! | [`engine`] | `tremor-engine` | Time integration driver, conditions, adaptation |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, IDs, stages, and parameters (`tremor-core`).
///
/// Contains field definitions, the [`types::Stages`] flag set, the
/// [`types::ParameterMap`], and the shared error types.
pub use tremor_core as types;

/// Field storage (`tremor-fields`).
///
/// [`fields::FieldStore`] owns every field's definition and data.
pub use tremor_fields as fields;

/// Meshes and element kinds (`tremor-mesh`).
///
/// Provides [`mesh::Discretization`], the element kinds [`mesh::Bar2`],
/// [`mesh::Tri3`], and [`mesh::Tet4`], and [`mesh::build_box`].
pub use tremor_mesh as mesh;

/// Model execution framework (`tremor-model`).
///
/// The [`model::Model`] trait is the main extension point for
/// user-defined physics.
pub use tremor_model as model;

/// Built-in contributors (`tremor-models`).
///
/// [`models::NodalPressure`] and [`models::Hydrostatic`].
pub use tremor_models as models;

/// Time integration driver (`tremor-engine`).
///
/// [`engine::run`] for parameter-driven runs, [`engine::Simulation`] for
/// programmatic control.
pub use tremor_engine as engine;

/// Common imports for typical Tremor usage.
///
/// ```rust
/// use tremor::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use tremor_core::{
        Communicator, FieldDef, FieldId, Location, ModelError, Param, ParameterMap, RemapKind,
        Stage, Stages,
    };

    // Fields and mesh
    pub use tremor_fields::FieldStore;
    pub use tremor_mesh::{Discretization, ElementKind, ElementType};

    // Models
    pub use tremor_model::{Factories, Model, ModelContext, ModelRegistry, ModelSetup};
    pub use tremor_models::{default_factories, Hydrostatic, NodalPressure};

    // Engine
    pub use tremor_engine::{run, RunError, RunReport, Simulation};
}
