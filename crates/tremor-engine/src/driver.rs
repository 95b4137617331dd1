//! Initialize, close, and the step loop.
//!
//! A close runs, in this order:
//!
//! ```text
//! before_field_update -> at_field_update -> after_field_update
//! -> before_material_model -> at_material_model -> after_material_model
//! -> point time steps -> stress divergence -> force BCs
//! -> nodal acceleration -> acceleration BCs
//! -> before_secondaries -> at_secondaries -> after_secondaries
//! -> elapsed compute time -> responses
//! ```
//!
//! Force boundary conditions act on the assembled force before `a = f / m`;
//! acceleration boundary conditions override the derived acceleration.

use std::time::Instant;

use tracing::{debug, debug_span, info};
use tremor_core::{Communicator, ParameterMap, Stage};
use tremor_mesh::{build_box, with_element_kind, ElementKind};
use tremor_model::{Factories, ModelContext};

use crate::adapt::AdaptRequest;
use crate::config::SimulationConfig;
use crate::error::RunError;
use crate::kinematics;
use crate::simulation::{RunReport, Simulation};

const BEFORE_FORCES: [Stage; 6] = [
    Stage::BeforeFieldUpdate,
    Stage::AtFieldUpdate,
    Stage::AfterFieldUpdate,
    Stage::BeforeMaterialModel,
    Stage::AtMaterialModel,
    Stage::AfterMaterialModel,
];

const SECONDARIES: [Stage; 3] = [
    Stage::BeforeSecondaries,
    Stage::AtSecondaries,
    Stage::AfterSecondaries,
];

impl<K: ElementKind> Simulation<K> {
    fn run_stage(&mut self, stage: Stage) -> Result<(), RunError> {
        let mut ctx = ModelContext::new(&mut self.fields, &self.mesh, &self.clock, &self.core);
        self.registry.run_stage(stage, &mut ctx)?;
        Ok(())
    }

    /// Set up the state at the start time and run the first close.
    ///
    /// At time zero the positions come from the mesh and the initial
    /// conditions are applied. At any other time the copy-remapped fields
    /// are loaded from the mesh tags instead.
    pub fn initialize(&mut self, started: Instant) -> Result<(), RunError> {
        let _span = debug_span!("initialize").entered();
        if self.clock.time == 0.0 {
            self.fields
                .assign(self.core.position, self.mesh.coords().to_vec())?;
            self.conditions.apply_initial(&mut self.fields)?;
        } else {
            let carried = self.fields.select(|def| def.is_copied_on_remap());
            self.fields.copy_from_tags(&self.mesh, &carried)?;
            self.mesh.clear_tags();
            if !self.fields.exists(self.core.position) {
                self.fields
                    .assign(self.core.position, self.mesh.coords().to_vec())?;
            }
        }
        if !self.fields.exists(self.core.velocity) {
            self.fields.write(self.core.velocity)?;
        }
        kinematics::initialize_configuration::<K>(&self.mesh, &mut self.fields, &self.core)?;
        self.run_stage(Stage::AfterConfiguration)?;
        kinematics::lump_masses::<K>(&self.mesh, &mut self.fields, &self.core)?;
        self.close(started)
    }

    /// Run the full stage sequence once.
    pub fn close(&mut self, started: Instant) -> Result<(), RunError> {
        let _span = debug_span!("close", step = self.clock.step).entered();
        for stage in BEFORE_FORCES {
            self.run_stage(stage)?;
        }
        kinematics::compute_point_time_steps(&mut self.fields, &self.core)?;
        kinematics::compute_stress_divergence::<K>(&self.mesh, &mut self.fields, &self.core)?;
        self.conditions.apply_force(&mut self.fields)?;
        kinematics::compute_nodal_acceleration::<K>(&mut self.fields, &self.core)?;
        self.conditions.apply_acceleration(&mut self.fields)?;
        for stage in SECONDARIES {
            self.run_stage(stage)?;
        }
        self.metrics.compute_time = started.elapsed();
        self.responses.evaluate(&self.fields, &self.clock)?;
        self.metrics.closes += 1;
        Ok(())
    }

    /// Ask the adapter for a remesh and, if one happened, bring the state
    /// onto the new mesh and re-close with a zero increment.
    fn adapt(&mut self, started: Instant) -> Result<bool, RunError> {
        let remeshed = self.adapter.adapt(AdaptRequest {
            mesh: &mut self.mesh,
            fields: &mut self.fields,
            clock: &self.clock,
        })?;
        if !remeshed {
            return Ok(false);
        }
        let _span = debug_span!("remesh_recovery").entered();
        self.conditions
            .rebuild(&self.fields, &self.mesh, &self.core)?;
        {
            let mut ctx = ModelContext::new(&mut self.fields, &self.mesh, &self.clock, &self.core);
            self.fixup.fixup(&mut ctx).map_err(RunError::Fixup)?;
        }
        kinematics::initialize_configuration::<K>(&self.mesh, &mut self.fields, &self.core)?;
        kinematics::lump_masses::<K>(&self.mesh, &mut self.fields, &self.core)?;
        self.clock.snapshot();
        self.clock.dt = 0.0;
        self.clock.step += 1;
        self.metrics.remeshes += 1;
        if self.comm.is_root() {
            info!(
                step = self.clock.step,
                time = self.clock.time,
                generation = self.mesh.generation(),
                "recovered after remesh"
            );
        }
        self.close(started)?;
        Ok(true)
    }

    /// `dt = CFL * min(dt_pt)`, clamped so the step ends at `end_time`.
    fn update_time(&mut self) -> Result<(), RunError> {
        let stable = kinematics::stable_time_step(&self.fields, &self.core)?;
        let mut dt = self.cfl * stable;
        if !(dt.is_finite() && dt > 0.0) {
            return Err(RunError::InvalidTimeStep {
                step: self.clock.step,
                dt,
            });
        }
        self.clock.snapshot();
        if self.clock.time + dt >= self.clock.end_time {
            dt = self.clock.end_time - self.clock.time;
            self.clock.time = self.clock.end_time;
        } else {
            self.clock.time += dt;
        }
        self.clock.dt = dt;
        Ok(())
    }

    /// Take one step: adapt if needed, advance, close, correct.
    pub fn step(&mut self, started: Instant) -> Result<(), RunError> {
        self.adapt(started)?;

        self.update_time()?;
        let dt = self.clock.dt;
        kinematics::update_position(&mut self.fields, &self.core, dt)?;
        kinematics::update_configuration::<K>(&self.mesh, &mut self.fields, &self.core)?;
        self.run_stage(Stage::AfterConfiguration)?;
        self.clock.step += 1;
        self.close(started)?;
        kinematics::correct_velocity(&mut self.fields, &self.core, dt)?;
        self.run_stage(Stage::AfterCorrection)?;
        self.metrics.steps += 1;
        debug!(step = self.clock.step, time = self.clock.time, dt, "step complete");
        Ok(())
    }

    /// Initialize, then step until `time >= end_time` or `step >= end_step`.
    pub fn run(&mut self) -> Result<(), RunError> {
        let _span = debug_span!("run").entered();
        let started = Instant::now();
        if self.comm.is_root() {
            info!(
                time = self.clock.time,
                end_time = self.clock.end_time,
                end_step = self.clock.end_step,
                "run started"
            );
        }
        self.initialize(started)?;
        while self.clock.should_continue() {
            self.step(started)?;
        }
        if self.comm.is_root() {
            info!(
                steps = self.metrics.steps,
                remeshes = self.metrics.remeshes,
                time = self.clock.time,
                elapsed_ms = self.metrics.compute_time.as_millis() as u64,
                "run finished"
            );
        }
        Ok(())
    }
}

/// Run a simulation described by `params`.
///
/// `"element type"` selects the element kind; an unknown value fails with
/// `Unknown element type "<value>"`. An empty `factories` is replaced by
/// [`tremor_models::default_factories`].
pub fn run(
    comm: &Communicator,
    params: &ParameterMap,
    factories: &Factories,
) -> Result<RunReport, RunError> {
    let config = SimulationConfig::from_params(params)?;
    let defaults;
    let factories = if factories.is_empty() {
        defaults = tremor_models::default_factories();
        &defaults
    } else {
        factories
    };
    let mesh = build_box(config.element_type, &config.mesh)?;
    with_element_kind!(config.element_type, K => {
        let mut simulation = Simulation::<K>::new(*comm, mesh, &config, factories)?;
        simulation.run()?;
        Ok(simulation.into_report())
    })
}
