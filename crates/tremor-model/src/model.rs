//! The [`Model`] trait.
//!
//! Models are the physics contributors of a simulation. They declare field
//! dependencies by defining or finding fields at construction, and declare
//! the stages they participate in through [`Model::stages`].

use tremor_core::{ModelError, Stage, Stages};

use crate::context::ModelContext;

/// A physics contributor executed by the [`ModelRegistry`](crate::ModelRegistry).
///
/// # Contract
///
/// - `stages()` is read once, at registration; the set must not change
///   afterwards.
/// - The registry only calls hooks for stages in `stages()`. Every hook
///   defaults to a no-op, so a model implements just the ones it declares.
/// - Hooks may fail; the error aborts the run.
///
/// # Object safety
///
/// This trait is object-safe; the registry stores models as
/// `Vec<Box<dyn Model>>`.
///
/// # Examples
///
/// A model that zeroes the nodal force before stresses are computed:
///
/// ```
/// use tremor_core::{ModelError, Stages};
/// use tremor_model::{Model, ModelContext};
///
/// struct ZeroForce;
///
/// impl Model for ZeroForce {
///     fn name(&self) -> &str { "zero force" }
///
///     fn stages(&self) -> Stages { Stages::BEFORE_FIELD_UPDATE }
///
///     fn before_field_update(&mut self, ctx: &mut ModelContext<'_>) -> Result<(), ModelError> {
///         let f = ctx.core().force;
///         ctx.fields_mut().write(f)?.fill(0.0);
///         Ok(())
///     }
/// }
///
/// assert_eq!(ZeroForce.stages(), Stages::BEFORE_FIELD_UPDATE);
/// ```
#[allow(unused_variables)]
pub trait Model: Send + 'static {
    /// Human-readable name for diagnostics and timing.
    fn name(&self) -> &str;

    /// Stages this model participates in.
    fn stages(&self) -> Stages;

    /// See [`Stage::BeforeFieldUpdate`].
    fn before_field_update(&mut self, ctx: &mut ModelContext<'_>) -> Result<(), ModelError> {
        Ok(())
    }

    /// See [`Stage::AtFieldUpdate`].
    fn at_field_update(&mut self, ctx: &mut ModelContext<'_>) -> Result<(), ModelError> {
        Ok(())
    }

    /// See [`Stage::AfterFieldUpdate`].
    fn after_field_update(&mut self, ctx: &mut ModelContext<'_>) -> Result<(), ModelError> {
        Ok(())
    }

    /// See [`Stage::BeforeMaterialModel`].
    fn before_material_model(&mut self, ctx: &mut ModelContext<'_>) -> Result<(), ModelError> {
        Ok(())
    }

    /// See [`Stage::AtMaterialModel`].
    fn at_material_model(&mut self, ctx: &mut ModelContext<'_>) -> Result<(), ModelError> {
        Ok(())
    }

    /// See [`Stage::AfterMaterialModel`].
    fn after_material_model(&mut self, ctx: &mut ModelContext<'_>) -> Result<(), ModelError> {
        Ok(())
    }

    /// See [`Stage::BeforeSecondaries`].
    fn before_secondaries(&mut self, ctx: &mut ModelContext<'_>) -> Result<(), ModelError> {
        Ok(())
    }

    /// See [`Stage::AtSecondaries`].
    fn at_secondaries(&mut self, ctx: &mut ModelContext<'_>) -> Result<(), ModelError> {
        Ok(())
    }

    /// See [`Stage::AfterSecondaries`].
    fn after_secondaries(&mut self, ctx: &mut ModelContext<'_>) -> Result<(), ModelError> {
        Ok(())
    }

    /// See [`Stage::AfterCorrection`].
    fn after_correction(&mut self, ctx: &mut ModelContext<'_>) -> Result<(), ModelError> {
        Ok(())
    }

    /// See [`Stage::AfterConfiguration`].
    fn after_configuration(&mut self, ctx: &mut ModelContext<'_>) -> Result<(), ModelError> {
        Ok(())
    }
}

/// Call the hook of `model` that corresponds to `stage`.
///
/// Does not consult `model.stages()`; filtering is the registry's job.
pub fn invoke_hook(
    model: &mut dyn Model,
    stage: Stage,
    ctx: &mut ModelContext<'_>,
) -> Result<(), ModelError> {
    match stage {
        Stage::BeforeFieldUpdate => model.before_field_update(ctx),
        Stage::AtFieldUpdate => model.at_field_update(ctx),
        Stage::AfterFieldUpdate => model.after_field_update(ctx),
        Stage::BeforeMaterialModel => model.before_material_model(ctx),
        Stage::AtMaterialModel => model.at_material_model(ctx),
        Stage::AfterMaterialModel => model.after_material_model(ctx),
        Stage::BeforeSecondaries => model.before_secondaries(ctx),
        Stage::AtSecondaries => model.at_secondaries(ctx),
        Stage::AfterSecondaries => model.after_secondaries(ctx),
        Stage::AfterCorrection => model.after_correction(ctx),
        Stage::AfterConfiguration => model.after_configuration(ctx),
    }
}
