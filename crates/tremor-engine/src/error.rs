//! Run-level error type.
//!
//! Every variant is fatal: [`run`](crate::run) stops at the first error and
//! returns it. There is no retry and no partial continuation.

use thiserror::Error;
use tremor_core::{FieldError, ModelError};
use tremor_mesh::{ElementType, MeshError};
use tremor_model::{RegistryError, StageError};

use crate::adapt::AdaptError;
use crate::config::ConfigError;

/// Errors that abort a run.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RunError {
    /// The parameter map was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The mesh could not be built or queried.
    #[error(transparent)]
    Mesh(#[from] MeshError),
    /// A driver-owned field operation failed.
    #[error(transparent)]
    Field(#[from] FieldError),
    /// `"models"` names a type with no factory.
    #[error("model \"{name}\" has unknown type \"{type_name}\"")]
    UnknownModelType {
        /// Instance name.
        name: String,
        /// The unmatched `"type"` value.
        type_name: String,
    },
    /// A factory refused to build a model.
    #[error("model \"{name}\" could not be built: {source}")]
    ModelSetup {
        /// Instance name.
        name: String,
        /// Underlying error.
        source: ModelError,
    },
    /// A model declaration was rejected by the registry.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// A model hook failed.
    #[error(transparent)]
    Stage(#[from] StageError),
    /// The post-adapt fix-up failed.
    #[error("post-adapt fix-up failed: {0}")]
    Fixup(ModelError),
    /// The adapter failed.
    #[error(transparent)]
    Adapt(#[from] AdaptError),
    /// A condition targets a field outside its slot.
    #[error("boundary condition \"{name}\" targets \"{field}\"; only force and acceleration are supported")]
    UnsupportedBoundaryField {
        /// Condition name.
        name: String,
        /// The targeted field.
        field: String,
    },
    /// The mesh handed to a simulation was built for another element type.
    #[error("mesh has {actual} elements but the simulation was built for {expected}")]
    ElementTypeMismatch {
        /// Element type of the simulation.
        expected: ElementType,
        /// Element type of the mesh.
        actual: ElementType,
    },
    /// The stable time step is not a positive finite number.
    #[error("step {step}: stable time step {dt} is not positive and finite")]
    InvalidTimeStep {
        /// Step about to be taken.
        step: u64,
        /// The offending increment.
        dt: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_element_type_message_is_exact() {
        let e: RunError = ConfigError::UnknownElementType("Hex27".into()).into();
        assert_eq!(e.to_string(), "Unknown element type \"Hex27\"");
    }

    #[test]
    fn stage_error_keeps_model_and_stage() {
        let e: RunError = StageError {
            model: "nodal pressure".into(),
            stage: tremor_core::Stage::BeforeSecondaries,
            reason: ModelError::ExecutionFailed {
                reason: "boom".into(),
            },
        }
        .into();
        assert_eq!(
            e.to_string(),
            "model \"nodal pressure\" failed in before_secondaries: execution failed: boom"
        );
    }
}
