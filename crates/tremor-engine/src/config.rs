//! Run configuration read from the parameter map, and its validation.
//!
//! [`SimulationConfig::from_params`] turns the untyped [`ParameterMap`]
//! into typed settings and then calls [`validate()`](SimulationConfig::validate),
//! so every configuration error surfaces before the mesh is built or any
//! model is constructed.

use thiserror::Error;
use tremor_core::{ParamError, ParameterMap};
use tremor_mesh::{BoxSpec, ElementType};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while reading or validating the run configuration.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A key was missing or had the wrong kind of value.
    #[error(transparent)]
    Param(#[from] ParamError),
    /// `"element type"` matched no compiled element kind.
    #[error("Unknown element type \"{0}\"")]
    UnknownElementType(String),
    /// `"CFL"` outside `(0, 1]`.
    #[error("CFL must be in (0, 1], got {value}")]
    InvalidCfl {
        /// The configured value.
        value: f64,
    },
    /// Start or end time is unusable.
    #[error("invalid time window: {reason}")]
    InvalidTimes {
        /// Which invariant was violated.
        reason: String,
    },
    /// A `"models"` entry is not a map or has no `"type"`.
    #[error("model \"{name}\": {reason}")]
    InvalidModel {
        /// Instance name.
        name: String,
        /// Description of the problem.
        reason: String,
    },
    /// A condition entry is malformed.
    #[error("condition \"{name}\": {reason}")]
    InvalidCondition {
        /// Condition name.
        name: String,
        /// Description of the problem.
        reason: String,
    },
    /// A response entry is malformed.
    #[error("response \"{name}\": {reason}")]
    InvalidResponse {
        /// Response name.
        name: String,
        /// Description of the problem.
        reason: String,
    },
}

// ── Specs ──────────────────────────────────────────────────────────

/// One entry of `"models"`.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelSpec {
    /// Instance name (the key).
    pub name: String,
    /// Factory key (the `"type"` value).
    pub type_name: String,
    /// The entry's own map, passed unchanged to the factory.
    pub params: ParameterMap,
}

/// A constant-valued initial or boundary condition.
#[derive(Clone, Debug, PartialEq)]
pub struct ConditionSpec {
    /// Condition name (the key).
    pub name: String,
    /// Short or long name of the target field.
    pub field: String,
    /// One value per field component.
    pub value: Vec<f64>,
    /// Node set (node fields) or element class (element fields); `None`
    /// applies everywhere.
    pub set: Option<String>,
}

/// How a history response reduces a field to one number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reduction {
    /// Smallest value.
    Min,
    /// Largest value.
    Max,
    /// Sum of all values.
    Sum,
}

impl Reduction {
    /// Parse `"min"`, `"max"` or `"sum"`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "sum" => Some(Self::Sum),
            _ => None,
        }
    }
}

/// What a response does after every close.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseKind {
    /// Record `(step, time, reduction(field))`.
    History {
        /// Short or long name of the field.
        field: String,
        /// Reduction applied over every value of the field.
        reduction: Reduction,
    },
    /// Emit a progress event every `every` steps.
    Log {
        /// Step interval; positive.
        every: u64,
    },
}

/// One entry of `"responses"`.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseSpec {
    /// Response name (the key).
    pub name: String,
    /// Behavior.
    pub kind: ResponseKind,
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Typed run configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Element kind for the whole run.
    pub element_type: ElementType,
    /// Start time; anything but zero takes the restart path.
    pub initial_time: f64,
    /// The loop stops once `time >= end_time`.
    pub end_time: f64,
    /// The loop stops once `step >= end_step`.
    pub end_step: u64,
    /// Fraction of the smallest point time step taken per step.
    pub cfl: f64,
    /// Box mesh resolution and extent.
    pub mesh: BoxSpec,
    /// Models in registration order.
    pub models: Vec<ModelSpec>,
    /// Conditions applied once at the start time.
    pub initial_conditions: Vec<ConditionSpec>,
    /// Conditions applied during every close.
    pub boundary_conditions: Vec<ConditionSpec>,
    /// Responses evaluated after every close.
    pub responses: Vec<ResponseSpec>,
}

impl SimulationConfig {
    /// Read and validate the configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownElementType`] if `"element type"` names no
    /// compiled kind, [`ConfigError::Param`] for missing or mistyped keys,
    /// and the other variants for values that fail validation.
    pub fn from_params(params: &ParameterMap) -> Result<Self, ConfigError> {
        let type_name = params.get_str("element type")?;
        let element_type = ElementType::from_name(type_name)
            .ok_or_else(|| ConfigError::UnknownElementType(type_name.to_string()))?;

        let config = Self {
            element_type,
            initial_time: params.get_real_or("initial time", 0.0)?,
            end_time: params.get_real_or("end time", f64::INFINITY)?,
            end_step: params.get_count_or("end step", u64::MAX)?,
            cfl: params.get_real_or("CFL", 0.9)?,
            mesh: read_mesh(params.get_map_opt("mesh")?)?,
            models: read_models(params.get_map_opt("models")?)?,
            initial_conditions: read_conditions(params.get_map_opt("initial conditions")?)?,
            boundary_conditions: read_conditions(params.get_map_opt("boundary conditions")?)?,
            responses: read_responses(params.get_map_opt("responses")?)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value invariants. Returns the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cfl > 0.0 && self.cfl <= 1.0) {
            return Err(ConfigError::InvalidCfl { value: self.cfl });
        }
        if !self.initial_time.is_finite() {
            return Err(ConfigError::InvalidTimes {
                reason: format!("initial time {} is not finite", self.initial_time),
            });
        }
        if self.end_time.is_nan() {
            return Err(ConfigError::InvalidTimes {
                reason: "end time is NaN".to_string(),
            });
        }
        if self.end_time < self.initial_time {
            return Err(ConfigError::InvalidTimes {
                reason: format!(
                    "end time {} is before initial time {}",
                    self.end_time, self.initial_time
                ),
            });
        }
        for response in &self.responses {
            if response.kind == (ResponseKind::Log { every: 0 }) {
                return Err(ConfigError::InvalidResponse {
                    name: response.name.clone(),
                    reason: "\"every\" must be positive".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn read_mesh(map: Option<&ParameterMap>) -> Result<BoxSpec, ConfigError> {
    let mut spec = BoxSpec::default();
    let Some(map) = map else {
        return Ok(spec);
    };
    for (axis, name) in ["x", "y", "z"].into_iter().enumerate() {
        let count = map.get_count_or(&format!("{name} elements"), spec.elements[axis] as u64)?;
        spec.elements[axis] = usize::try_from(count).map_err(|_| ParamError::Invalid {
            key: format!("{name} elements"),
            reason: format!("{count} does not fit in memory"),
        })?;
        spec.size[axis] = map.get_real_or(&format!("{name} size"), spec.size[axis])?;
    }
    Ok(spec)
}

fn entries<'a>(
    map: Option<&'a ParameterMap>,
) -> impl Iterator<Item = (&'a str, Option<&'a ParameterMap>)> {
    map.into_iter().flat_map(|m| {
        m.iter().map(|(name, value)| match value {
            tremor_core::Param::Map(inner) => (name, Some(inner)),
            _ => (name, None),
        })
    })
}

fn read_models(map: Option<&ParameterMap>) -> Result<Vec<ModelSpec>, ConfigError> {
    entries(map)
        .map(|(name, inner)| {
            let invalid = |reason: &str| ConfigError::InvalidModel {
                name: name.to_string(),
                reason: reason.to_string(),
            };
            let params = inner.ok_or_else(|| invalid("entry must be a map"))?;
            let type_name = params
                .get_str("type")
                .map_err(|_| invalid("missing string \"type\""))?;
            Ok(ModelSpec {
                name: name.to_string(),
                type_name: type_name.to_string(),
                params: params.clone(),
            })
        })
        .collect()
}

fn read_conditions(map: Option<&ParameterMap>) -> Result<Vec<ConditionSpec>, ConfigError> {
    entries(map)
        .map(|(name, inner)| {
            let invalid = |reason: String| ConfigError::InvalidCondition {
                name: name.to_string(),
                reason,
            };
            let params = inner.ok_or_else(|| invalid("entry must be a map".to_string()))?;
            let field = params.get_str("field").map_err(|e| invalid(e.to_string()))?;
            let value = params.get_reals("value").map_err(|e| invalid(e.to_string()))?;
            let set = match params.get("set") {
                None => None,
                Some(_) => Some(params.get_str("set").map_err(|e| invalid(e.to_string()))?),
            };
            Ok(ConditionSpec {
                name: name.to_string(),
                field: field.to_string(),
                value,
                set: set.map(str::to_string),
            })
        })
        .collect()
}

fn read_responses(map: Option<&ParameterMap>) -> Result<Vec<ResponseSpec>, ConfigError> {
    entries(map)
        .map(|(name, inner)| {
            let invalid = |reason: String| ConfigError::InvalidResponse {
                name: name.to_string(),
                reason,
            };
            let params = inner.ok_or_else(|| invalid("entry must be a map".to_string()))?;
            let kind = match params.get_str("type").map_err(|e| invalid(e.to_string()))? {
                "history" => {
                    let field = params.get_str("field").map_err(|e| invalid(e.to_string()))?;
                    let reduction_name = params
                        .get_str("reduction")
                        .map_err(|e| invalid(e.to_string()))?;
                    let reduction = Reduction::from_name(reduction_name)
                        .ok_or_else(|| invalid(format!("unknown reduction \"{reduction_name}\"")))?;
                    ResponseKind::History {
                        field: field.to_string(),
                        reduction,
                    }
                }
                "log" => ResponseKind::Log {
                    every: params
                        .get_count_or("every", 1)
                        .map_err(|e| invalid(e.to_string()))?,
                },
                other => return Err(invalid(format!("unknown type \"{other}\""))),
            };
            Ok(ResponseSpec {
                name: name.to_string(),
                kind,
            })
        })
        .collect()
}
