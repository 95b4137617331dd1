//! The [`Discretization`]: coordinates, connectivity, adjacency, and named
//! entity sets of one mesh generation.

use indexmap::IndexMap;
use tremor_core::Location;

use crate::adjacency::Adjacency;
use crate::element::ElementType;
use crate::error::MeshError;
use crate::geom::{from_slice, Vec3};

/// Name of the element class that every discretization starts with.
pub const BODY_CLASS: &str = "body";

/// An unstructured simplex mesh plus the data attached to it.
///
/// Besides geometry, a discretization carries named element classes,
/// named node sets (targets for boundary conditions), and tags: raw
/// per-entity arrays used to carry persistent field data across a remesh
/// or a restart. Each replacement of the mesh bumps [`generation`](Self::generation).
///
/// # Examples
///
/// ```
/// use tremor_mesh::{Discretization, ElementType};
///
/// // Two bars: 0--1--2
/// let mesh = Discretization::new(
///     ElementType::Bar2,
///     vec![0.0, 1.0, 2.0],
///     vec![0, 1, 1, 2],
/// ).unwrap();
/// assert_eq!(mesh.node_count(), 3);
/// assert_eq!(mesh.element_count(), 2);
/// assert_eq!(mesh.node_to_element().incident(1).count(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Discretization {
    element_type: ElementType,
    coords: Vec<f64>,
    connectivity: Vec<u32>,
    node_to_element: Adjacency,
    classes: IndexMap<String, Vec<u32>>,
    node_sets: IndexMap<String, Vec<u32>>,
    node_tags: IndexMap<String, Vec<f64>>,
    element_tags: IndexMap<String, Vec<f64>>,
    generation: u64,
}

impl Discretization {
    /// Build a mesh from flat coordinate and connectivity arrays.
    ///
    /// `coords` holds `dim` values per node; `connectivity` holds
    /// `nodes_per_element` node indices per element. Every element starts
    /// in the [`BODY_CLASS`] class.
    pub fn new(
        element_type: ElementType,
        coords: Vec<f64>,
        connectivity: Vec<u32>,
    ) -> Result<Self, MeshError> {
        let dim = element_type.dim();
        let npe = element_type.nodes();
        if coords.len() % dim != 0 {
            return Err(MeshError::CoordinateLength {
                len: coords.len(),
                dim,
            });
        }
        if connectivity.len() % npe != 0 {
            return Err(MeshError::ConnectivityLength {
                len: connectivity.len(),
                nodes_per_element: npe,
            });
        }
        if connectivity.is_empty() {
            return Err(MeshError::EmptyMesh);
        }
        let node_count = coords.len() / dim;
        if let Some((i, &node)) = connectivity
            .iter()
            .enumerate()
            .find(|(_, n)| **n as usize >= node_count)
        {
            return Err(MeshError::NodeOutOfRange {
                element: i / npe,
                node,
                node_count,
            });
        }
        let node_to_element = Adjacency::node_to_element(&connectivity, npe, node_count);
        let element_count = connectivity.len() / npe;
        let mut classes = IndexMap::new();
        classes.insert(BODY_CLASS.to_string(), (0..element_count as u32).collect());
        Ok(Self {
            element_type,
            coords,
            connectivity,
            node_to_element,
            classes,
            node_sets: IndexMap::new(),
            node_tags: IndexMap::new(),
            element_tags: IndexMap::new(),
            generation: 0,
        })
    }

    /// Element kind of every element.
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Spatial dimension.
    pub fn dim(&self) -> usize {
        self.element_type.dim()
    }

    /// Nodes per element.
    pub fn nodes_per_element(&self) -> usize {
        self.element_type.nodes()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.coords.len() / self.dim()
    }

    /// Number of elements.
    pub fn element_count(&self) -> usize {
        self.connectivity.len() / self.nodes_per_element()
    }

    /// Number of entities of a location; element fields store one block per
    /// quadrature point.
    pub fn entity_count(&self, location: Location) -> usize {
        match location {
            Location::Node => self.node_count(),
            Location::Element => self.element_count() * self.element_type.points(),
        }
    }

    /// Reference coordinates, `dim` values per node.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Reference coordinate of one node.
    pub fn node_coords(&self, node: usize) -> Vec3 {
        let dim = self.dim();
        from_slice(&self.coords[node * dim..], dim)
    }

    /// Flat element-to-node connectivity.
    pub fn connectivity(&self) -> &[u32] {
        &self.connectivity
    }

    /// Nodes of one element, in local order.
    pub fn element_nodes(&self, element: usize) -> &[u32] {
        let npe = self.nodes_per_element();
        &self.connectivity[element * npe..(element + 1) * npe]
    }

    /// Node-to-element CSR adjacency.
    pub fn node_to_element(&self) -> &Adjacency {
        &self.node_to_element
    }

    /// Add or replace a named element class.
    pub fn add_class(&mut self, name: impl Into<String>, elements: Vec<u32>) -> Result<(), MeshError> {
        let name = name.into();
        check_range(&name, &elements, self.element_count())?;
        self.classes.insert(name, elements);
        Ok(())
    }

    /// Elements of a class.
    pub fn class(&self, name: &str) -> Result<&[u32], MeshError> {
        self.classes
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| MeshError::UnknownClass(name.to_string()))
    }

    /// Whether a class exists.
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Class names in insertion order.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Add or replace a named node set.
    pub fn add_node_set(&mut self, name: impl Into<String>, nodes: Vec<u32>) -> Result<(), MeshError> {
        let name = name.into();
        check_range(&name, &nodes, self.node_count())?;
        self.node_sets.insert(name, nodes);
        Ok(())
    }

    /// Nodes of a node set.
    pub fn node_set(&self, name: &str) -> Result<&[u32], MeshError> {
        self.node_sets
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| MeshError::UnknownNodeSet(name.to_string()))
    }

    /// Attach a tag array under `name`, replacing any previous one.
    pub fn set_tag(&mut self, location: Location, name: impl Into<String>, data: Vec<f64>) {
        self.tags_mut(location).insert(name.into(), data);
    }

    /// A tag array, if present.
    pub fn tag(&self, location: Location, name: &str) -> Option<&[f64]> {
        self.tags(location).get(name).map(Vec::as_slice)
    }

    /// Names of all tags at a location.
    pub fn tag_names(&self, location: Location) -> impl Iterator<Item = &str> {
        self.tags(location).keys().map(String::as_str)
    }

    /// Drop every tag.
    pub fn clear_tags(&mut self) {
        self.node_tags.clear();
        self.element_tags.clear();
    }

    /// Mesh generation; incremented on every remesh.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Mark this discretization as a new mesh generation.
    pub fn bump_generation(&mut self) {
        self.generation += 1;
    }

    /// Carry the generation counter of a replaced mesh forward.
    pub fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    fn tags(&self, location: Location) -> &IndexMap<String, Vec<f64>> {
        match location {
            Location::Node => &self.node_tags,
            Location::Element => &self.element_tags,
        }
    }

    fn tags_mut(&mut self, location: Location) -> &mut IndexMap<String, Vec<f64>> {
        match location {
            Location::Node => &mut self.node_tags,
            Location::Element => &mut self.element_tags,
        }
    }
}

fn check_range(set: &str, indices: &[u32], count: usize) -> Result<(), MeshError> {
    match indices.iter().find(|&&i| i as usize >= count) {
        Some(&index) => Err(MeshError::EntityOutOfRange {
            set: set.to_string(),
            index,
            count,
        }),
        None => Ok(()),
    }
}
