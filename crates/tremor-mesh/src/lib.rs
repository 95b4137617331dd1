//! Element kinds, adjacency, and discretization for Tremor simulations.
//!
//! This crate is the mesh provider: it defines the closed set of element
//! kinds through the [`ElementKind`] trait, the node-to-element
//! [`Adjacency`] in CSR form, and the [`Discretization`] that ties
//! coordinates, connectivity, and named entity sets together.
//!
//! # Element kinds
//!
//! - [`Bar2`]: two-node bar, one quadrature point
//! - [`Tri3`]: three-node triangle, one quadrature point
//! - [`Tet4`]: four-node tetrahedron, one quadrature point
//!
//! Kernels are written generically over `K: ElementKind` and instantiated
//! once per kind through [`with_element_kind!`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod adjacency;
pub mod bar2;
pub mod build;
pub mod configure;
pub mod discretization;
pub mod element;
pub mod error;
pub mod gather;
pub mod geom;
pub mod tet4;
pub mod tri3;

#[cfg(test)]
pub(crate) mod compliance;

pub use adjacency::{Adjacency, OrientationCode};
pub use bar2::Bar2;
pub use build::{build_box, BoxSpec};
pub use configure::{configure, PointGeometryFields};
pub use discretization::{Discretization, BODY_CLASS};
pub use element::{ElementKind, ElementType, PointGeometry, MAX_NODES};
pub use error::MeshError;
pub use geom::Vec3;
pub use tet4::Tet4;
pub use tri3::Tri3;
