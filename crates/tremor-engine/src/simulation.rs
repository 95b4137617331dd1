//! The simulation context owned by the driver.
//!
//! [`Simulation`] holds everything a run needs: the mesh, the field store,
//! the clock, the model registry, conditions, responses, the adapter and
//! fix-up collaborators, and metrics. There is no global state; models see
//! the pieces they need through a [`ModelContext`] built per stage.

use std::marker::PhantomData;

use tracing::info;
use tremor_core::Communicator;
use tremor_fields::FieldStore;
use tremor_mesh::{Discretization, ElementKind};
use tremor_model::{Clock, CoreFields, Factories, Model, ModelRegistry, ModelSetup};

use crate::adapt::{Adapter, NeverAdapt, NoFixup, PostAdaptFixup};
use crate::conditions::Conditions;
use crate::config::SimulationConfig;
use crate::error::RunError;
use crate::metrics::RunMetrics;
use crate::responses::Responses;

/// A run over meshes of element kind `K`.
pub struct Simulation<K: ElementKind> {
    pub(crate) comm: Communicator,
    pub(crate) mesh: Discretization,
    pub(crate) fields: FieldStore,
    pub(crate) core: CoreFields,
    pub(crate) clock: Clock,
    pub(crate) cfl: f64,
    pub(crate) registry: ModelRegistry,
    pub(crate) conditions: Conditions,
    pub(crate) responses: Responses,
    pub(crate) adapter: Box<dyn Adapter>,
    pub(crate) fixup: Box<dyn PostAdaptFixup>,
    pub(crate) metrics: RunMetrics,
    pub(crate) _kind: PhantomData<K>,
}

impl<K: ElementKind> Simulation<K> {
    /// Define the core fields, build every configured model in order, and
    /// resolve conditions and responses.
    ///
    /// `mesh` must be made of `K` elements. If `config.initial_time` is not
    /// zero, the mesh's tags are the restart source for copy-remapped
    /// fields.
    pub fn new(
        comm: Communicator,
        mesh: Discretization,
        config: &SimulationConfig,
        factories: &Factories,
    ) -> Result<Self, RunError> {
        if mesh.element_type() != K::TYPE {
            return Err(RunError::ElementTypeMismatch {
                expected: K::TYPE,
                actual: mesh.element_type(),
            });
        }
        let mut fields = FieldStore::new(&mesh);
        let core = CoreFields::define(&mut fields, K::TYPE)?;

        let mut registry = ModelRegistry::new();
        for spec in &config.models {
            let factory = factories
                .get(&spec.type_name)
                .ok_or_else(|| RunError::UnknownModelType {
                    name: spec.name.clone(),
                    type_name: spec.type_name.clone(),
                })?;
            let mut setup = ModelSetup::new(&mut fields, &mesh, &core);
            let model = factory(K::TYPE, &mut setup, &spec.name, &spec.params).map_err(|source| {
                RunError::ModelSetup {
                    name: spec.name.clone(),
                    source,
                }
            })?;
            registry.register(model)?;
        }

        let conditions = Conditions::resolve(
            &config.initial_conditions,
            &config.boundary_conditions,
            &fields,
            &mesh,
            &core,
        )?;
        let responses = Responses::resolve(&config.responses, &fields)?;

        if comm.is_root() {
            info!(
                element_type = %K::TYPE,
                nodes = mesh.node_count(),
                elements = mesh.element_count(),
                models = registry.len(),
                fields = fields.table().len(),
                "simulation created"
            );
        }

        Ok(Self {
            comm,
            mesh,
            fields,
            core,
            clock: Clock::new(config.initial_time, config.end_time, config.end_step),
            cfl: config.cfl,
            registry,
            conditions,
            responses,
            adapter: Box::new(NeverAdapt),
            fixup: Box::new(NoFixup),
            metrics: RunMetrics::default(),
            _kind: PhantomData,
        })
    }

    /// Replace the adapter (default [`NeverAdapt`]).
    pub fn with_adapter(mut self, adapter: impl Adapter + 'static) -> Self {
        self.adapter = Box::new(adapter);
        self
    }

    /// Replace the post-adapt fix-up (default [`NoFixup`]).
    pub fn with_fixup(mut self, fixup: impl PostAdaptFixup + 'static) -> Self {
        self.fixup = Box::new(fixup);
        self
    }

    /// Append a model built outside the factory table.
    pub fn register(&mut self, model: Box<dyn Model>) -> Result<(), RunError> {
        self.registry.register(model)?;
        Ok(())
    }

    /// Setup context for building a model to pass to [`register`](Self::register).
    pub fn setup(&mut self) -> ModelSetup<'_> {
        ModelSetup::new(&mut self.fields, &self.mesh, &self.core)
    }

    /// Current mesh.
    pub fn mesh(&self) -> &Discretization {
        &self.mesh
    }

    /// All fields.
    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }

    /// Ids of the standard fields.
    pub fn core(&self) -> &CoreFields {
        &self.core
    }

    /// Time-integration state.
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Registered models.
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Responses and their recorded histories.
    pub fn responses(&self) -> &Responses {
        &self.responses
    }

    /// Metrics so far.
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Consume the simulation into its final report.
    pub fn into_report(mut self) -> RunReport {
        self.metrics.record_models(self.registry.timings());
        RunReport {
            clock: self.clock,
            metrics: self.metrics,
            histories: self.responses.into_histories(),
        }
    }
}

impl<K: ElementKind> std::fmt::Debug for Simulation<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("element_type", &K::TYPE)
            .field("rank", &self.comm.rank())
            .field("clock", &self.clock)
            .field("models", &self.registry)
            .finish_non_exhaustive()
    }
}

/// What a finished run reports.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Final time-integration state.
    pub clock: Clock,
    /// Counters and timings.
    pub metrics: RunMetrics,
    /// History responses keyed by name.
    pub histories: indexmap::IndexMap<String, Vec<crate::responses::Sample>>,
}
