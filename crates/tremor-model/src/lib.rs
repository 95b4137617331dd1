//! Model trait, stage dispatch, and execution context for Tremor simulations.
//!
//! A [`Model`] is a physics contributor. It declares once, at
//! construction, the [`Stages`](tremor_core::Stages) it takes part in, and
//! implements the matching hooks. The [`ModelRegistry`] keeps models in
//! registration order and, at each stage, invokes exactly the models whose
//! declared set contains that stage.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod core_fields;
pub mod factory;
pub mod model;
pub mod registry;

pub use context::{Clock, ModelContext, ModelSetup};
pub use core_fields::CoreFields;
pub use factory::{Factories, ModelFactory};
pub use model::{invoke_hook, Model};
pub use registry::{ModelRegistry, ModelTiming, RegistryError, StageError};
