//! Execution contexts passed to models.
//!
//! [`ModelSetup`] is handed to factories while models are constructed;
//! [`ModelContext`] is handed to every stage hook. Both borrow from the
//! simulation that owns the data, so no model ever holds a reference to
//! global state.

use tremor_core::{FieldError, FieldId, Location};
use tremor_fields::FieldStore;
use tremor_mesh::Discretization;

use crate::core_fields::CoreFields;

/// Time-integration state of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clock {
    /// Current simulation time.
    pub time: f64,
    /// Time increment of the current step. Zero on the first close of a
    /// run and on the close that follows a remesh.
    pub dt: f64,
    /// Time at the start of the current step.
    pub prev_time: f64,
    /// Increment of the previous step.
    pub prev_dt: f64,
    /// Step counter. Incremented before every close except the initial one.
    pub step: u64,
    /// Step counter at the last snapshot.
    pub prev_step: u64,
    /// The loop stops once `time >= end_time`.
    pub end_time: f64,
    /// The loop stops once `step >= end_step`.
    pub end_step: u64,
}

impl Clock {
    /// A clock at `time` with the given termination conditions.
    pub fn new(time: f64, end_time: f64, end_step: u64) -> Self {
        Self {
            time,
            dt: 0.0,
            prev_time: time,
            prev_dt: 0.0,
            step: 0,
            prev_step: 0,
            end_time,
            end_step,
        }
    }

    /// Whether the step loop should run another iteration.
    pub fn should_continue(&self) -> bool {
        self.time < self.end_time && self.step < self.end_step
    }

    /// Record the current time and step as the previous ones.
    pub fn snapshot(&mut self) {
        self.prev_time = self.time;
        self.prev_dt = self.dt;
        self.prev_step = self.step;
    }
}

/// Context handed to model factories during construction.
pub struct ModelSetup<'a> {
    fields: &'a mut FieldStore,
    mesh: &'a Discretization,
    core: &'a CoreFields,
}

impl<'a> ModelSetup<'a> {
    /// Construct a setup context. Typically called by the engine.
    pub fn new(fields: &'a mut FieldStore, mesh: &'a Discretization, core: &'a CoreFields) -> Self {
        Self { fields, mesh, core }
    }

    /// Define a field.
    pub fn define(
        &mut self,
        short_name: &str,
        long_name: &str,
        components: usize,
        location: Location,
        persistent: bool,
        classes: &[&str],
    ) -> Result<FieldId, FieldError> {
        self.fields
            .define(short_name, long_name, components, location, persistent, classes)
    }

    /// Look up a field defined earlier.
    pub fn find(&self, name: &str) -> Result<FieldId, FieldError> {
        self.fields.find(name)
    }

    /// Full field store access.
    pub fn fields(&mut self) -> &mut FieldStore {
        &mut *self.fields
    }

    /// The mesh the model is built for.
    pub fn mesh(&self) -> &Discretization {
        self.mesh
    }

    /// Ids of the standard fields.
    pub fn core(&self) -> &CoreFields {
        self.core
    }
}

/// Context handed to every stage hook.
pub struct ModelContext<'a> {
    fields: &'a mut FieldStore,
    mesh: &'a Discretization,
    clock: &'a Clock,
    core: &'a CoreFields,
}

impl<'a> ModelContext<'a> {
    /// Construct a hook context. Typically called by the engine.
    pub fn new(
        fields: &'a mut FieldStore,
        mesh: &'a Discretization,
        clock: &'a Clock,
        core: &'a CoreFields,
    ) -> Self {
        Self {
            fields,
            mesh,
            clock,
            core,
        }
    }

    /// Shared field access.
    pub fn fields(&self) -> &FieldStore {
        &*self.fields
    }

    /// Exclusive field access.
    pub fn fields_mut(&mut self) -> &mut FieldStore {
        &mut *self.fields
    }

    /// The current mesh.
    pub fn mesh(&self) -> &'a Discretization {
        self.mesh
    }

    /// Time-integration state.
    pub fn clock(&self) -> &'a Clock {
        self.clock
    }

    /// Ids of the standard fields.
    pub fn core(&self) -> &'a CoreFields {
        self.core
    }

    /// Current step increment.
    pub fn dt(&self) -> f64 {
        self.clock.dt
    }
}
