//! Named field storage for Tremor simulations.
//!
//! The [`FieldStore`] owns every field buffer of a simulation. Fields are
//! defined by name at contributor-construction time and receive a
//! [`FieldId`](tremor_core::FieldId); storage is allocated lazily, zero
//! filled, on first write.
//!
//! # Layout
//!
//! ```text
//! FieldStore
//! ├── FieldTable (FieldId → FieldDef, name → FieldId)
//! ├── Vec<Option<Vec<f64>>> (one slot per FieldId; None = unallocated)
//! └── entity counts (nodes, elements × quadrature points)
//! ```
//!
//! # Access
//!
//! - [`FieldStore::read`]: shared view of an allocated field.
//! - [`FieldStore::write`]: exclusive view, allocating on first use.
//! - [`FieldStore::read_write`]: exclusive view of an allocated field.
//! - [`FieldStore::write_with_reads`]: exclusive views of a few fields plus
//!   a [`FieldReads`] view of everything else, for passes that read many
//!   fields and write one or two.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod reads;
pub mod store;
pub mod table;

pub use reads::FieldReads;
pub use store::FieldStore;
pub use table::FieldTable;
