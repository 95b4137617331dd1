//! Time-integration driver for Tremor explicit dynamics simulations.
//!
//! [`run`] is the entry point: it reads a [`SimulationConfig`] from the
//! parameter map, builds the mesh, picks the element kind, and drives a
//! [`Simulation`] from the start time to the end condition.
//!
//! # Step structure
//!
//! ```text
//! initialize -> close
//! while time < end_time && step < end_step:
//!     if remeshed: fix-up, re-lump, dt = 0, step += 1, close
//!     update time, position, configuration; after_configuration
//!     step += 1; close; correct velocity; after_correction
//! ```
//!
//! See [`driver`] for the order of passes inside a close.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod adapt;
pub mod conditions;
pub mod config;
pub mod driver;
pub mod error;
pub mod kinematics;
pub mod metrics;
pub mod responses;
pub mod simulation;

pub use adapt::{remesh_with, AdaptError, AdaptRequest, Adapter, NeverAdapt, NoFixup, PostAdaptFixup};
pub use conditions::{Condition, Conditions};
pub use config::{
    ConditionSpec, ConfigError, ModelSpec, Reduction, ResponseKind, ResponseSpec, SimulationConfig,
};
pub use driver::run;
pub use error::RunError;
pub use metrics::RunMetrics;
pub use responses::{Responses, Sample};
pub use simulation::{RunReport, Simulation};
