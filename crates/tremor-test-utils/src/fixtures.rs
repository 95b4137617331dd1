//! Instrumented models for framework and driver tests.

use std::sync::{Arc, Mutex};

use tremor_core::{ModelError, Stage, Stages};
use tremor_model::{Model, ModelContext};

/// One recorded hook invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub model: String,
    pub stage: Stage,
    pub step: u64,
    pub time: f64,
    pub dt: f64,
}

/// Shared, append-only record of hook invocations across models.
#[derive(Clone, Debug, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: Call) {
        if let Ok(mut calls) = self.0.lock() {
            calls.push(call);
        }
    }

    /// Snapshot of every call so far.
    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Models invoked for `stage`, in invocation order.
    pub fn order_for(&self, stage: Stage) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.stage == stage)
            .map(|c| c.model)
            .collect()
    }

    /// Number of times `model` ran `stage`.
    pub fn count(&self, model: &str, stage: Stage) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.model == model && c.stage == stage)
            .count()
    }
}

/// Records every hook call into a [`CallLog`]; does nothing else.
pub struct RecordingModel {
    name: String,
    stages: Stages,
    log: CallLog,
}

impl RecordingModel {
    pub fn new(name: impl Into<String>, stages: Stages, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            stages,
            log: log.clone(),
        }
    }

    fn record(&self, stage: Stage, ctx: &ModelContext<'_>) -> Result<(), ModelError> {
        let clock = ctx.clock();
        self.log.push(Call {
            model: self.name.clone(),
            stage,
            step: clock.step,
            time: clock.time,
            dt: clock.dt,
        });
        Ok(())
    }
}

macro_rules! record_hooks {
    ($($hook:ident => $stage:ident),* $(,)?) => {
        $(
            fn $hook(&mut self, ctx: &mut ModelContext<'_>) -> Result<(), ModelError> {
                self.record(Stage::$stage, ctx)
            }
        )*
    };
}

impl Model for RecordingModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn stages(&self) -> Stages {
        self.stages
    }

    record_hooks! {
        before_field_update => BeforeFieldUpdate,
        at_field_update => AtFieldUpdate,
        after_field_update => AfterFieldUpdate,
        before_material_model => BeforeMaterialModel,
        at_material_model => AtMaterialModel,
        after_material_model => AfterMaterialModel,
        before_secondaries => BeforeSecondaries,
        at_secondaries => AtSecondaries,
        after_secondaries => AfterSecondaries,
        after_correction => AfterCorrection,
        after_configuration => AfterConfiguration,
    }
}

/// Fails in `stage` after a configurable number of successful calls.
pub struct FailingModel {
    name: String,
    stage: Stage,
    succeed_count: usize,
    calls: usize,
}

impl FailingModel {
    /// A model that succeeds `succeed_count` times in `stage`, then fails.
    pub fn new(name: impl Into<String>, stage: Stage, succeed_count: usize) -> Self {
        Self {
            name: name.into(),
            stage,
            succeed_count,
            calls: 0,
        }
    }

    fn tick(&mut self) -> Result<(), ModelError> {
        self.calls += 1;
        if self.calls > self.succeed_count {
            return Err(ModelError::ExecutionFailed {
                reason: format!(
                    "deliberate failure after {} successful calls",
                    self.succeed_count
                ),
            });
        }
        Ok(())
    }
}

macro_rules! failing_hooks {
    ($($hook:ident => $stage:ident),* $(,)?) => {
        $(
            fn $hook(&mut self, _ctx: &mut ModelContext<'_>) -> Result<(), ModelError> {
                if self.stage == Stage::$stage {
                    self.tick()
                } else {
                    Ok(())
                }
            }
        )*
    };
}

impl Model for FailingModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn stages(&self) -> Stages {
        self.stage.flag()
    }

    failing_hooks! {
        before_field_update => BeforeFieldUpdate,
        at_field_update => AtFieldUpdate,
        after_field_update => AfterFieldUpdate,
        before_material_model => BeforeMaterialModel,
        at_material_model => AtMaterialModel,
        after_material_model => AfterMaterialModel,
        before_secondaries => BeforeSecondaries,
        at_secondaries => AtSecondaries,
        after_secondaries => AfterSecondaries,
        after_correction => AfterCorrection,
        after_configuration => AfterConfiguration,
    }
}
