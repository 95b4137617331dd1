//! Ordered model registry and stage dispatch.
//!
//! [`ModelRegistry::register`] runs once per model at startup and checks
//! the declaration for structural errors. [`ModelRegistry::run_stage`]
//! is the per-stage hot path: it walks the models in registration order
//! and invokes the hook of every model whose cached stage set contains the
//! stage.

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug_span, trace, warn};
use tremor_core::{ModelError, Stage, Stages};

use crate::context::ModelContext;
use crate::model::{invoke_hook, Model};

/// Errors from model registration (startup-time, not per-stage).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A model's name is empty.
    #[error("model names must not be empty")]
    EmptyName,
    /// Two models share a name.
    #[error("a model named \"{0}\" is already registered")]
    DuplicateName(String),
    /// A model declared bits that name no stage.
    #[error("model \"{model}\" declares undefined stage bits {bits:#x}")]
    UndeclaredStageBits {
        /// The model.
        model: String,
        /// The offending bits.
        bits: u64,
    },
}

/// A model hook failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("model \"{model}\" failed in {stage}: {reason}")]
pub struct StageError {
    /// Name of the failing model.
    pub model: String,
    /// Stage being executed.
    pub stage: Stage,
    /// Underlying error.
    #[source]
    pub reason: ModelError,
}

/// Cumulative execution statistics of one model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModelTiming {
    /// Model name.
    pub name: String,
    /// Number of hook invocations.
    pub calls: u64,
    /// Total wall time spent in hooks.
    pub elapsed: Duration,
}

struct Entry {
    model: Box<dyn Model>,
    stages: Stages,
    timing: ModelTiming,
}

/// Models in registration order, with their declared stages cached.
#[derive(Default)]
pub struct ModelRegistry {
    entries: Vec<Entry>,
}

impl ModelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a model. Its stage set is read here, once.
    pub fn register(&mut self, model: Box<dyn Model>) -> Result<(), RegistryError> {
        let name = model.name().to_string();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.entries.iter().any(|e| e.timing.name == name) {
            return Err(RegistryError::DuplicateName(name));
        }
        let stages = model.stages();
        let bits = stages.undefined_bits();
        if bits != 0 {
            return Err(RegistryError::UndeclaredStageBits { model: name, bits });
        }
        if stages.is_empty() {
            warn!(model = %name, "model declares no stages and will never run");
        }
        trace!(model = %name, stages = %stages, "registered model");
        self.entries.push(Entry {
            model,
            stages,
            timing: ModelTiming {
                name,
                ..ModelTiming::default()
            },
        });
        Ok(())
    }

    /// Invoke `stage` on every model that declared it, in registration order.
    ///
    /// Stops at the first failure.
    pub fn run_stage(&mut self, stage: Stage, ctx: &mut ModelContext<'_>) -> Result<(), StageError> {
        let _span = debug_span!("stage", stage = %stage).entered();
        for entry in &mut self.entries {
            if !entry.stages.has(stage) {
                continue;
            }
            trace!(model = %entry.timing.name, stage = %stage, "invoke");
            let start = Instant::now();
            let result = invoke_hook(entry.model.as_mut(), stage, ctx);
            entry.timing.elapsed += start.elapsed();
            entry.timing.calls += 1;
            result.map_err(|reason| StageError {
                model: entry.timing.name.clone(),
                stage,
                reason,
            })?;
        }
        Ok(())
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no model is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Model names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.timing.name.as_str())
    }

    /// Cached stage set of a model.
    pub fn stages_of(&self, name: &str) -> Option<Stages> {
        self.entries
            .iter()
            .find(|e| e.timing.name == name)
            .map(|e| e.stages)
    }

    /// Union of every registered model's stages.
    pub fn declared(&self) -> Stages {
        self.entries.iter().fold(Stages::NONE, |acc, e| acc | e.stages)
    }

    /// Per-model statistics in registration order.
    pub fn timings(&self) -> impl Iterator<Item = &ModelTiming> {
        self.entries.iter().map(|e| &e.timing)
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| (&e.timing.name, e.stages)))
            .finish()
    }
}
