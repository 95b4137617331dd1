//! Error types for mesh construction and queries.

use thiserror::Error;

/// Errors arising from discretization construction or lookups.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MeshError {
    /// Attempted to build a mesh with no elements.
    #[error("mesh must have at least one element")]
    EmptyMesh,
    /// Coordinate array is not a whole number of points.
    #[error("coordinate array of length {len} is not a multiple of dimension {dim}")]
    CoordinateLength {
        /// Length supplied.
        len: usize,
        /// Spatial dimension.
        dim: usize,
    },
    /// Connectivity array is not a whole number of elements.
    #[error("connectivity of length {len} is not a multiple of {nodes_per_element} nodes per element")]
    ConnectivityLength {
        /// Length supplied.
        len: usize,
        /// Nodes per element.
        nodes_per_element: usize,
    },
    /// An element references a node that does not exist.
    #[error("element {element} references node {node}, but the mesh has {node_count} nodes")]
    NodeOutOfRange {
        /// Offending element.
        element: usize,
        /// Referenced node.
        node: u32,
        /// Number of nodes.
        node_count: usize,
    },
    /// A class or node set references an entity that does not exist.
    #[error("\"{set}\" references entity {index}, but only {count} exist")]
    EntityOutOfRange {
        /// Name of the class or node set.
        set: String,
        /// Offending index.
        index: u32,
        /// Number of entities.
        count: usize,
    },
    /// No element class with this name.
    #[error("unknown element class \"{0}\"")]
    UnknownClass(String),
    /// No node set with this name.
    #[error("unknown node set \"{0}\"")]
    UnknownNodeSet(String),
    /// Box builder was given a zero element count or non-positive size.
    #[error("invalid box mesh: {reason}")]
    InvalidBox {
        /// What was wrong.
        reason: String,
    },
}
