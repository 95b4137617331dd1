//! Error types shared across the Tremor workspace.
//!
//! Everything here is fatal to a run. Errors are detected either at setup
//! (field definition, parameter parsing, contributor construction) or
//! raised by a contributor hook; none are raised from inside the
//! per-node / per-element kernels.

use thiserror::Error;

use crate::field::Location;
use crate::id::FieldId;

/// Errors from field definition and field access.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A field with the same short or long name already exists.
    #[error("field \"{name}\" is already defined")]
    Duplicate {
        /// The clashing name.
        name: String,
    },
    /// Lookup by name found nothing.
    #[error("no field named \"{name}\" is defined")]
    Undefined {
        /// The requested name.
        name: String,
    },
    /// A [`FieldId`] that was never issued by this store.
    #[error("field id {0} was not issued by this store")]
    UnknownId(FieldId),
    /// Read access to a field whose storage was never written.
    #[error("field \"{name}\" has no storage yet")]
    NotAllocated {
        /// Long name of the field.
        name: String,
    },
    /// A definition has an empty short or long name.
    #[error("field names must not be empty")]
    EmptyName,
    /// A definition asked for zero components.
    #[error("field \"{name}\" must have at least one component")]
    ZeroComponents {
        /// Short name of the field.
        name: String,
    },
    /// The same field was requested both for writing and for reading, or
    /// twice for writing, within one split borrow.
    #[error("field \"{name}\" is already borrowed for writing")]
    Aliased {
        /// Long name of the field.
        name: String,
    },
    /// A caller expected a different component count than the definition.
    #[error("field \"{name}\" has {actual} components, expected {expected}")]
    ComponentMismatch {
        /// Long name of the field.
        name: String,
        /// Components the caller expected.
        expected: usize,
        /// Components in the definition.
        actual: usize,
    },
    /// A caller expected a different location than the definition.
    #[error("field \"{name}\" lives on {actual}, expected {expected}")]
    LocationMismatch {
        /// Long name of the field.
        name: String,
        /// Location the caller expected.
        expected: Location,
        /// Location in the definition.
        actual: Location,
    },
    /// A definition referenced a region class the mesh does not have.
    #[error("field \"{name}\" references unknown region class \"{class}\"")]
    UnknownClass {
        /// Short name of the field.
        name: String,
        /// The missing class.
        class: String,
    },
    /// Externally supplied data does not match the field's storage size.
    #[error("field \"{name}\" needs {expected} values, got {actual}")]
    LengthMismatch {
        /// Long name of the field.
        name: String,
        /// Required number of values.
        expected: usize,
        /// Supplied number of values.
        actual: usize,
    },
}

/// Errors from reading the parameter map.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParamError {
    /// A required key is absent.
    #[error("missing required parameter \"{key}\"")]
    Missing {
        /// The key.
        key: String,
    },
    /// A key is present but holds the wrong kind of value.
    #[error("parameter \"{key}\" should be {expected}")]
    WrongType {
        /// The key.
        key: String,
        /// Human description of the expected kind.
        expected: &'static str,
    },
    /// A key holds a value outside its admissible range.
    #[error("parameter \"{key}\" is invalid: {reason}")]
    Invalid {
        /// The key.
        key: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Errors raised by a contributor, at construction or from a stage hook.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A field operation failed.
    #[error(transparent)]
    Field(#[from] FieldError),
    /// The contributor's parameters were unusable.
    #[error(transparent)]
    Param(#[from] ParamError),
    /// A setup-time invariant was violated (detected at construction).
    #[error("setup failed: {reason}")]
    Setup {
        /// Human-readable description.
        reason: String,
    },
    /// A hook failed while executing.
    #[error("execution failed: {reason}")]
    ExecutionFailed {
        /// Human-readable description.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_messages_name_the_field() {
        let e = FieldError::Duplicate { name: "p".into() };
        assert_eq!(e.to_string(), "field \"p\" is already defined");
        let e = FieldError::Undefined {
            name: "nodal pressure".into(),
        };
        assert_eq!(e.to_string(), "no field named \"nodal pressure\" is defined");
    }

    #[test]
    fn model_error_wraps_field_error_transparently() {
        let inner = FieldError::NotAllocated { name: "kappa".into() };
        let e: ModelError = inner.clone().into();
        assert_eq!(e.to_string(), inner.to_string());
    }

    #[test]
    fn location_mismatch_display() {
        let e = FieldError::LocationMismatch {
            name: "v".into(),
            expected: Location::Element,
            actual: Location::Node,
        };
        assert_eq!(e.to_string(), "field \"v\" lives on nodes, expected elements");
    }
}
