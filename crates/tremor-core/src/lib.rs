//! Core types and traits for the Tremor explicit dynamics engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other crate in the workspace: field
//! identifiers and definitions, the execution stage enumeration and its
//! flag set, the in-memory parameter map, and the error taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod comm;
pub mod error;
pub mod field;
pub mod id;
pub mod param;
pub mod stage;

pub use comm::Communicator;
pub use error::{FieldError, ModelError, ParamError};
pub use field::{FieldDef, FieldSet, FieldSetIter, Location, RemapKind};
pub use id::FieldId;
pub use param::{Param, ParameterMap};
pub use stage::{Stage, Stages};
