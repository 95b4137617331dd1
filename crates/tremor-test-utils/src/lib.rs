//! Test utilities and fixture models for Tremor development.
//!
//! Provides instrumented [`Model`](tremor_model::Model) implementations
//! ([`RecordingModel`], [`FailingModel`]), a [`TestBed`] that owns the
//! pieces a [`ModelContext`](tremor_model::ModelContext) borrows from, and
//! small mesh builders.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod mesh;

pub use fixtures::{Call, CallLog, FailingModel, RecordingModel};
pub use mesh::{bar_line, single_element, tet_patch, tri_patch};

use tremor_core::FieldError;
use tremor_fields::FieldStore;
use tremor_mesh::Discretization;
use tremor_model::{Clock, CoreFields, ModelContext, ModelSetup};

/// Owns a mesh, a field store with the core fields, and a clock.
pub struct TestBed {
    pub mesh: Discretization,
    pub fields: FieldStore,
    pub core: CoreFields,
    pub clock: Clock,
}

impl TestBed {
    /// Define the core fields on `mesh` and start the clock at zero.
    pub fn new(mesh: Discretization) -> Result<Self, FieldError> {
        let mut fields = FieldStore::new(&mesh);
        let core = CoreFields::define(&mut fields, mesh.element_type())?;
        Ok(Self {
            mesh,
            fields,
            core,
            clock: Clock::new(0.0, f64::INFINITY, u64::MAX),
        })
    }

    /// Setup context for building models.
    pub fn setup(&mut self) -> ModelSetup<'_> {
        ModelSetup::new(&mut self.fields, &self.mesh, &self.core)
    }

    /// Hook context for invoking models.
    pub fn context(&mut self) -> ModelContext<'_> {
        ModelContext::new(&mut self.fields, &self.mesh, &self.clock, &self.core)
    }
}
