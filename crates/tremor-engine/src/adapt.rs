//! Mesh adaptation hooks and the remesh barrier.
//!
//! The driver asks its [`Adapter`] once per step, at the top of the loop,
//! whether the mesh changed. An adapter that wants to remesh calls
//! [`remesh_with`], which carries every copy-remapped field across the
//! change through discretization tags. Transient fields are dropped and
//! rebuilt by whoever writes them next; shape fields are recomputed by the
//! driver.

use thiserror::Error;
use tracing::info;
use tremor_core::{FieldError, ModelError};
use tremor_fields::FieldStore;
use tremor_mesh::{Discretization, ElementType, MeshError};
use tremor_model::{Clock, ModelContext};

/// Errors raised while adapting the mesh.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AdaptError {
    /// Copying fields to or from tags failed.
    #[error(transparent)]
    Field(#[from] FieldError),
    /// The replacement mesh is invalid.
    #[error(transparent)]
    Mesh(#[from] MeshError),
    /// The replacement mesh uses another element type.
    #[error("remesh changed the element type from {before} to {after}")]
    ElementTypeChanged {
        /// Element type before the remesh.
        before: ElementType,
        /// Element type after the remesh.
        after: ElementType,
    },
    /// Adapter-specific failure.
    #[error("adaptation failed: {reason}")]
    Failed {
        /// Human-readable description.
        reason: String,
    },
}

/// State handed to [`Adapter::adapt`].
pub struct AdaptRequest<'a> {
    /// The current mesh; replaced in place on remesh.
    pub mesh: &'a mut Discretization,
    /// All fields.
    pub fields: &'a mut FieldStore,
    /// Time-integration state at the top of the step.
    pub clock: &'a Clock,
}

/// Decides whether and how to change the mesh.
pub trait Adapter: Send {
    /// Possibly replace `request.mesh`. Returns `true` if it did.
    fn adapt(&mut self, request: AdaptRequest<'_>) -> Result<bool, AdaptError>;
}

/// Adapter that never changes the mesh.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverAdapt;

impl Adapter for NeverAdapt {
    fn adapt(&mut self, _request: AdaptRequest<'_>) -> Result<bool, AdaptError> {
        Ok(false)
    }
}

/// Repairs state after a remesh, before masses are re-lumped.
pub trait PostAdaptFixup: Send {
    /// Run the fix-up on the new mesh.
    fn fixup(&mut self, ctx: &mut ModelContext<'_>) -> Result<(), ModelError>;
}

/// Fix-up that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFixup;

impl PostAdaptFixup for NoFixup {
    fn fixup(&mut self, _ctx: &mut ModelContext<'_>) -> Result<(), ModelError> {
        Ok(())
    }
}

/// Replace the mesh through `replace` while keeping copy-remapped fields.
///
/// 1. Copy every allocated copy-remapped field to a mesh tag.
/// 2. Let `replace` modify or swap the mesh. It must carry the tags over.
/// 3. Drop all field storage and resize for the new mesh.
/// 4. Load the tagged fields back, clear the tags, bump the generation.
pub fn remesh_with(
    mesh: &mut Discretization,
    fields: &mut FieldStore,
    replace: impl FnOnce(&mut Discretization) -> Result<(), AdaptError>,
) -> Result<(), AdaptError> {
    let before = mesh.element_type();
    let generation = mesh.generation();
    let carried = fields.select(|def| def.is_copied_on_remap());
    fields.copy_to_tags(mesh, &carried)?;
    replace(mesh)?;
    if mesh.element_type() != before {
        return Err(AdaptError::ElementTypeChanged {
            before,
            after: mesh.element_type(),
        });
    }
    fields.resize(mesh);
    fields.copy_from_tags(mesh, &carried)?;
    mesh.clear_tags();
    mesh.set_generation(generation + 1);
    info!(
        generation = mesh.generation(),
        nodes = mesh.node_count(),
        elements = mesh.element_count(),
        "remeshed"
    );
    Ok(())
}
