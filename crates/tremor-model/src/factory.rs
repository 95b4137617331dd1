//! Model construction callbacks keyed by type name.

use indexmap::IndexMap;
use tremor_core::{ModelError, ParameterMap};
use tremor_mesh::ElementType;

use crate::context::ModelSetup;
use crate::model::Model;

/// Builds one model instance.
///
/// Arguments: the run's element type, the setup context, the instance name
/// (the key under `"models"`), and the instance's own parameters.
pub type ModelFactory = fn(
    ElementType,
    &mut ModelSetup<'_>,
    &str,
    &ParameterMap,
) -> Result<Box<dyn Model>, ModelError>;

/// Factory table keyed by the `"type"` value of a model's parameters.
#[derive(Clone, Default)]
pub struct Factories {
    map: IndexMap<String, ModelFactory>,
}

impl Factories {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a factory.
    pub fn insert(&mut self, type_name: impl Into<String>, factory: ModelFactory) {
        self.map.insert(type_name.into(), factory);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, type_name: impl Into<String>, factory: ModelFactory) -> Self {
        self.insert(type_name, factory);
        self
    }

    /// Factory for a type name.
    pub fn get(&self, type_name: &str) -> Option<ModelFactory> {
        self.map.get(type_name).copied()
    }

    /// Registered type names in insertion order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    /// Number of factories.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl std::fmt::Debug for Factories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.map.keys()).finish()
    }
}
